//! Progress aggregation and the loading gate.
//!
//! Raw item counts coming out of the loader are folded into a normalized
//! percentage by [`ProgressAggregator`], and [`LoadingGate`] turns the first
//! arrival at 100% into a one-way `Loading -> Ready` transition. Both are
//! per-session values; a new load gets a new gate.

/// One progress report from the loading subsystem.
///
/// `items_loaded` is non-decreasing within a session and never exceeds
/// `items_total` for well-formed inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgressEvent {
    pub items_loaded: u32,
    pub items_total: u32,
}

/// Folds progress events into a completion percentage in `[0, 100]`.
#[derive(Debug)]
pub struct ProgressAggregator {
    percentage: f32,
}

impl ProgressAggregator {
    pub fn new() -> Self {
        Self { percentage: 0.0 }
    }

    /// Apply one event and return the updated percentage.
    ///
    /// An event with `items_total == 0` leaves the percentage untouched
    /// rather than dividing by zero; the value stays at 0 until a non-zero
    /// total arrives. The percentage never decreases within a session even
    /// if the input counts do.
    pub fn on_event(&mut self, event: LoadProgressEvent) -> f32 {
        if event.items_total == 0 {
            return self.percentage;
        }
        let pct = 100.0 * event.items_loaded as f32 / event.items_total as f32;
        self.percentage = self.percentage.max(pct.clamp(0.0, 100.0));
        self.percentage
    }

    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    /// Pure function of the latest percentage, safe to re-evaluate.
    pub fn is_complete(&self) -> bool {
        self.percentage >= 100.0
    }
}

impl Default for ProgressAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Loading,
    Ready,
}

/// Blocks the scene reveal until the load is complete.
///
/// Starts in `Loading`, exposing the current percentage for the overlay, and
/// switches to `Ready` exactly once when the aggregator first reports
/// completion. There is no way back within a session and observing further
/// events after `Ready` is a no-op.
#[derive(Debug)]
pub struct LoadingGate {
    state: GateState,
    aggregator: ProgressAggregator,
}

impl LoadingGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Loading,
            aggregator: ProgressAggregator::new(),
        }
    }

    pub fn observe(&mut self, event: LoadProgressEvent) {
        if self.state == GateState::Ready {
            return;
        }
        let pct = self.aggregator.on_event(event);
        log::debug!(
            "load progress {}/{} ({:.0}%)",
            event.items_loaded,
            event.items_total,
            pct
        );
        if self.aggregator.is_complete() {
            self.state = GateState::Ready;
            log::info!("loading complete, dismissing overlay");
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == GateState::Ready
    }

    /// The rounded percentage to display while loading, or `None` once the
    /// overlay is dismissed.
    pub fn display_percentage(&self) -> Option<u8> {
        match self.state {
            GateState::Loading => Some(self.aggregator.percentage().round() as u8),
            GateState::Ready => None,
        }
    }
}

impl Default for LoadingGate {
    fn default() -> Self {
        Self::new()
    }
}
