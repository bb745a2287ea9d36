//! Per-frame callback scheduling.
//!
//! The event loop drives one [`FrameScheduler::tick`] per displayed frame
//! and every registered callback runs exactly once per tick with a fresh
//! [`FrameContext`]. Callbacks are independent animated elements (camera
//! rig, light rig, ...): there is no ordering guarantee between them, and a
//! panic inside one of them is caught and logged so the others keep running.
//!
//! Registration and deregistration take effect at the next tick boundary at
//! the latest. Callbacks are expected to be cheap; anything long-running
//! belongs on the async side, not in a tick.

use std::panic::{AssertUnwindSafe, catch_unwind};

use instant::Duration;

/// Per-tick input handed to every callback. Built fresh each tick and
/// discarded afterwards.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    /// Seconds since the scheduler's owner started running.
    pub elapsed: f32,
    /// Time since the previous tick.
    pub dt: Duration,
    /// Pointer position normalized to `[-1, 1]` on both axes, y up.
    pub pointer: (f32, f32),
}

/// Identifies one registered callback for later deregistration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackHandle(u64);

type Callback<S> = Box<dyn FnMut(&FrameContext, &mut S)>;

/// Registry of per-frame callbacks over some shared stage state `S`.
pub struct FrameScheduler<S> {
    callbacks: Vec<(u64, Callback<S>)>,
    next_id: u64,
}

impl<S> FrameScheduler<S> {
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    pub fn register(&mut self, callback: impl FnMut(&FrameContext, &mut S) + 'static) -> CallbackHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        CallbackHandle(id)
    }

    /// Remove a callback. Returns false when the handle was already gone.
    pub fn deregister(&mut self, handle: CallbackHandle) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(id, _)| *id != handle.0);
        self.callbacks.len() != before
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Run every registered callback once with the given context.
    pub fn tick(&mut self, ctx: &FrameContext, state: &mut S) {
        for (id, callback) in self.callbacks.iter_mut() {
            let result = catch_unwind(AssertUnwindSafe(|| callback(ctx, state)));
            if result.is_err() {
                log::error!("frame callback {} panicked, continuing with the rest", id);
            }
        }
    }
}

impl<S> Default for FrameScheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}
