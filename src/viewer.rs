//! The event-loop host tying the pieces together.
//!
//! [`Viewer`] owns the window, one [`LoadSession`] per model, the
//! [`LoadingGate`], the [`FrameScheduler`] and the [`Stage`] the renderer
//! consumes. The load task runs off-thread (tokio on native, a local future
//! on the web) and talks back exclusively through [`ViewerEvent`] user
//! events, so all scene, camera and gate state is only ever touched from the
//! event-loop thread:
//!
//! 1. `resumed` creates the window, builds the renderer and spawns the load
//! 2. progress events drive the gate; the resolution event adopts the scene
//! 3. `RedrawRequested` ticks the scheduler and hands the stage to the renderer
//!
//! Frame ticks never wait on the load; until the gate opens the renderer is
//! told to keep the overlay up, showing the aggregated percentage.

use std::{fmt::Debug, pin::Pin, sync::Arc};

use cgmath::{Deg, Quaternion, Rad, Rotation3, Vector3};
use instant::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use thiserror::Error;

use crate::{
    camera::{Camera, CameraRig},
    data_structures::{
        instance::Instance,
        scene_graph::{self, ContainerNode, SceneAdoptionError, SceneNode},
    },
    lighting::{ContactShadows, Light, LightRig, default_lights},
    progress::{LoadProgressEvent, LoadingGate},
    render::{Renderer, Stage},
    resources,
    scheduler::{FrameContext, FrameScheduler},
    session::{AssetHandle, AssetLoadError, LoadSession},
};

/// Static scene configuration. Everything here is decided before the event
/// loop starts; nothing is negotiated at runtime.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub model: AssetHandle,
    pub model_scale: f32,
    /// Yaw applied to the model root, radians.
    pub model_rotation_y: f32,
    pub camera_position: [f32; 3],
    pub camera_fov: Deg<f32>,
    pub lights: Vec<Light>,
    pub contact_shadows: ContactShadows,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: AssetHandle::new("models/helicopter.glb"),
            model_scale: 0.1,
            model_rotation_y: -0.5,
            camera_position: [0.0, 0.0, 160.0],
            camera_fov: Deg(20.0),
            lights: default_lights(),
            contact_shadows: ContactShadows::default(),
        }
    }
}

/// Terminal failure of one load session, either while loading the asset or
/// while adopting the resolved tree into the scene. Either way the session
/// is spent; retrying means a fresh session.
#[derive(Debug, Error)]
pub enum SessionFailure {
    #[error(transparent)]
    Load(#[from] AssetLoadError),
    #[error(transparent)]
    Adoption(#[from] SceneAdoptionError),
}

/// Type alias for an asynchronous renderer factory.
///
/// Receives the window once it exists and resolves to the boxed engine that
/// will consume the stage each frame.
pub type RendererConstructor =
    Box<dyn FnOnce(Arc<Window>) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn Renderer>>>>>>;

/// User events marshalled onto the event-loop thread.
///
/// Every load-related event carries the id of the session it belongs to;
/// events from a cancelled or superseded session are dropped on arrival so
/// they can never mutate a scene they no longer own.
pub enum ViewerEvent {
    Progress {
        session: u64,
        event: LoadProgressEvent,
    },
    Loaded {
        session: u64,
        scene: Box<dyn SceneNode>,
    },
    Failed {
        session: u64,
        error: AssetLoadError,
    },
    #[cfg(target_arch = "wasm32")]
    RendererReady(Box<dyn Renderer>),
}

impl Debug for ViewerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Progress { session, event } => f
                .debug_struct("Progress")
                .field("session", session)
                .field("event", event)
                .finish(),
            Self::Loaded { session, .. } => {
                f.debug_struct("Loaded").field("session", session).finish()
            }
            Self::Failed { session, error } => f
                .debug_struct("Failed")
                .field("session", session)
                .field("error", error)
                .finish(),
            #[cfg(target_arch = "wasm32")]
            Self::RendererReady(_) => f.write_str("RendererReady"),
        }
    }
}

fn send(proxy: &EventLoopProxy<ViewerEvent>, event: ViewerEvent) {
    if proxy.send_event(event).is_err() {
        log::warn!("event loop closed before a load event could be delivered");
    }
}

pub struct Viewer {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<ViewerEvent>,
    config: ViewerConfig,
    // We use Option to `take()` it after use.
    constructor: Option<RendererConstructor>,
    renderer: Option<Box<dyn Renderer>>,
    window: Option<Arc<Window>>,
    session: LoadSession,
    gate: LoadingGate,
    failure: Option<SessionFailure>,
    scheduler: FrameScheduler<Stage>,
    stage: Stage,
    pointer: (f32, f32),
    started: Instant,
    last_frame: Instant,
}

impl Viewer {
    pub fn new(
        event_loop: &EventLoop<ViewerEvent>,
        config: ViewerConfig,
        constructor: RendererConstructor,
    ) -> Self {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().unwrap();

        let camera = Camera::new(config.camera_position, config.camera_fov);
        let stage = Stage::new(camera, config.lights.clone(), config.contact_shadows);

        // The animated elements are independent registrations; nothing about
        // their relative order is promised.
        let mut scheduler = FrameScheduler::new();
        let camera_rig = CameraRig::default();
        scheduler.register(move |ctx: &FrameContext, stage: &mut Stage| {
            camera_rig.update(&mut stage.camera, ctx);
        });
        let light_rig = LightRig;
        scheduler.register(move |ctx: &FrameContext, stage: &mut Stage| {
            light_rig.update(&mut stage.lights, ctx);
        });

        Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config,
            constructor: Some(constructor),
            renderer: None,
            window: None,
            session: LoadSession::new(),
            gate: LoadingGate::new(),
            failure: None,
            scheduler,
            stage,
            pointer: (0.0, 0.0),
            started: Instant::now(),
            last_frame: Instant::now(),
        }
    }

    /// The session currently owning the load. Cancelling it guarantees no
    /// further progress or resolution events take effect.
    pub fn session(&self) -> &LoadSession {
        &self.session
    }

    /// The terminal failure of the current session, if it failed. Covers
    /// both load and adoption failures; retrying means tearing this viewer
    /// down and starting a new session.
    pub fn failure(&self) -> Option<&SessionFailure> {
        self.failure.as_ref()
    }

    fn spawn_load(&self) {
        let handle = self.config.model.clone();
        let session = self.session.clone();
        let proxy = self.proxy.clone();
        let load = async move {
            let progress_proxy = proxy.clone();
            let progress_session = session.clone();
            let result = resources::load_scene(&handle, &session, move |event| {
                send(
                    &progress_proxy,
                    ViewerEvent::Progress {
                        session: progress_session.id(),
                        event,
                    },
                );
            })
            .await;
            match result {
                Ok(Some(scene)) => send(
                    &proxy,
                    ViewerEvent::Loaded {
                        session: session.id(),
                        scene,
                    },
                ),
                // Cancelled before resolution; nothing to deliver.
                Ok(None) => {}
                Err(error) => send(
                    &proxy,
                    ViewerEvent::Failed {
                        session: session.id(),
                        error,
                    },
                ),
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        self.async_runtime.spawn(load);

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(load);
    }

    fn is_stale(&self, session: u64) -> bool {
        session != self.session.id() || self.session.is_cancelled()
    }

    /// Place the adopted tree under a root carrying the configured model
    /// scale and yaw, then reveal it to the renderer.
    fn install_scene(&mut self, scene: Box<dyn SceneNode>) {
        let s = self.config.model_scale;
        let mut wrapper = ContainerNode::new("model");
        wrapper.set_local_transform(Instance {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::from_angle_y(Rad(self.config.model_rotation_y)),
            scale: Vector3::new(s, s, s),
        });
        wrapper.add_child(scene);
        self.stage.scene = Some(Box::new(wrapper));
    }
}

impl ApplicationHandler<ViewerEvent> for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes();

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
        self.window = Some(window.clone());

        let constructor = self.constructor.take().unwrap();

        #[cfg(not(target_arch = "wasm32"))]
        {
            let renderer = self.async_runtime.block_on(constructor(window));
            match renderer {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(e) => panic!("App initialization failed. Cannot create the renderer: {}", e),
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match constructor(window).await {
                    Ok(renderer) => {
                        assert!(proxy.send_event(ViewerEvent::RendererReady(renderer)).is_ok())
                    }
                    Err(e) => log::error!("Cannot create the renderer: {}", e),
                }
            });
        }

        self.started = Instant::now();
        self.last_frame = Instant::now();
        self.spawn_load();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ViewerEvent) {
        match event {
            ViewerEvent::Progress { session, event } => {
                if self.is_stale(session) {
                    log::debug!("dropping progress event for stale session {}", session);
                    return;
                }
                self.gate.observe(event);
            }
            ViewerEvent::Loaded { session, scene } => {
                if self.is_stale(session) {
                    log::debug!("dropping resolved scene for stale session {}", session);
                    return;
                }
                match scene_graph::adopt(&self.session, scene) {
                    Ok(scene) => self.install_scene(scene),
                    // The gate may already be open by now; the stage stays
                    // empty and the owner reads the failure to react.
                    Err(e) => {
                        log::error!("session {}: {}", session, e);
                        self.failure = Some(SessionFailure::Adoption(e));
                    }
                }
            }
            ViewerEvent::Failed { session, error } => {
                if self.is_stale(session) {
                    return;
                }
                // Terminal for this session; the overlay stays up and the
                // owner decides whether to start a fresh session.
                log::error!("{}", error);
                self.failure = Some(SessionFailure::Load(error));
            }
            #[cfg(target_arch = "wasm32")]
            ViewerEvent::RendererReady(renderer) => {
                self.renderer = Some(renderer);
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if let Some(r) = self.renderer.as_mut() {
                        r.resize(size.width, size.height);
                    }
                    window.request_redraw();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                // Tear-down before resolution must not leave callbacks that
                // mutate a disposed scene.
                self.session.cancel();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if size.width > 0 && size.height > 0 {
                        // Normalized device-style coords, y up.
                        let x = 2.0 * position.x as f32 / size.width as f32 - 1.0;
                        let y = 1.0 - 2.0 * position.y as f32 / size.height as f32;
                        self.pointer = (x, y);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(window) = &self.window else {
                    return;
                };
                window.request_redraw();

                let dt = self.last_frame.elapsed();
                self.last_frame = Instant::now();
                let ctx = FrameContext {
                    elapsed: self.started.elapsed().as_secs_f32(),
                    dt,
                    pointer: self.pointer,
                };
                self.scheduler.tick(&ctx, &mut self.stage);

                if let Some(renderer) = self.renderer.as_mut() {
                    if let Err(e) = renderer.render(&self.stage, self.gate.display_percentage()) {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Initialize logging, build the viewer and run it until the window closes.
pub fn run(config: ViewerConfig, constructor: RendererConstructor) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<ViewerEvent> = EventLoop::with_user_event().build()?;
    let mut viewer = Viewer::new(&event_loop, config, constructor);

    event_loop.run_app(&mut viewer)?;

    Ok(())
}
