//! Standalone editing window backed by winit.
//!
//! Window events run through an [`InputProcessor`] and the resulting
//! commands go to the [`EditorEngine`]. Entering free-fly hides and grabs
//! the cursor so raw mouse motion can drive the look; leaving restores it.
//!
//! ```no_run
//! # use cloud_interpreter::{PointCloud, Viewer};
//! # use glam::Vec3;
//! Viewer::builder()
//!     .with_cloud(PointCloud::from_positions("scan", vec![Vec3::ZERO]))
//!     .on_pick(|event| log::info!("pick: {event:?}"))
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::{
    editor::{PickCallback, PickEvent},
    error::CloudError,
    geometry::PointCloud,
    options::Options,
    EditorCommand, EditorEngine, InputEvent, InputProcessor, MouseButton,
};

/// Default window title.
pub const WINDOW_TITLE: &str = "CloudInterpreter";

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    clouds: Vec<PointCloud>,
    options: Options,
    title: String,
    on_pick: Option<PickCallback>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            clouds: Vec::new(),
            options: Options::default(),
            title: WINDOW_TITLE.into(),
            on_pick: None,
        }
    }

    /// Add a point cloud to load once the window is up. Clouds are added
    /// in call order.
    #[must_use]
    pub fn with_cloud(mut self, cloud: PointCloud) -> Self {
        self.clouds.push(cloud);
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Register the pick callback.
    #[must_use]
    pub fn on_pick(mut self, callback: impl FnMut(PickEvent) + 'static) -> Self {
        self.on_pick = Some(Box::new(callback));
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            clouds: self.clouds,
            options: self.options,
            title: self.title,
            on_pick: self.on_pick,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone point-cloud editing window.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    clouds: Vec<PointCloud>,
    options: Options,
    title: String,
    on_pick: Option<PickCallback>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), CloudError> {
        let event_loop =
            EventLoop::new().map_err(|e| CloudError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            input: InputProcessor::new(&self.options),
            clouds: self.clouds,
            options: Some(self.options),
            title: self.title,
            on_pick: self.on_pick,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| CloudError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<EditorEngine>,
    input: InputProcessor,
    clouds: Vec<PointCloud>,
    options: Option<Options>,
    title: String,
    on_pick: Option<PickCallback>,
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

/// Hide and grab the cursor for free-fly, or release it.
fn set_cursor_captured(window: &Window, captured: bool) {
    if captured {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        if let Err(e) = grabbed {
            log::warn!("cursor grab unavailable: {e}");
        }
    } else if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
        log::warn!("cursor release failed: {e}");
    }
    window.set_cursor_visible(!captured);
}

impl ViewerApp {
    /// Run `event` through the input chain and apply its command.
    fn dispatch(&mut self, event: InputEvent) {
        let Some(command) = self.input.handle_event(event) else {
            return;
        };
        let (Some(window), Some(engine)) = (&self.window, &mut self.engine)
        else {
            return;
        };
        if let EditorCommand::SetFreeFly { enabled } = command {
            set_cursor_captured(window, enabled);
        }
        engine.execute(command);
        if engine.take_redraw() {
            window.request_redraw();
        }
    }

    fn load_clouds(&mut self, engine: &mut EditorEngine) {
        for cloud in self.clouds.drain(..) {
            let id = cloud.id.clone();
            if let Err(e) = engine.add_geometry(&cloud.into()) {
                log::error!("failed to add '{id}': {e}");
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 720.0));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let options = self.options.take().unwrap_or_default();
        let size = viewport_size(window.inner_size());
        let mut engine = match pollster::block_on(EditorEngine::new(
            window.clone(),
            size,
            options,
        )) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        };

        if let Some(callback) = self.on_pick.take() {
            engine.register_onpick_callback(callback);
        }
        self.load_clouds(&mut engine);

        window.request_redraw();
        self.window = Some(window);
        self.engine = Some(engine);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            event_loop.exit();
            return;
        }

        // Guard: both window and engine must be initialised.
        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(event_size) => {
                let (vp_w, vp_h) = viewport_size(event_size);
                if let Some(engine) = &mut self.engine {
                    engine.resize(vp_w, vp_h);
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(engine)) =
                    (&self.window, &mut self.engine)
                else {
                    return;
                };
                match engine.render() {
                    Ok(()) => {}
                    Err(
                        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                    ) => {
                        let (vp_w, vp_h) = viewport_size(window.inner_size());
                        engine.resize(vp_w, vp_h);
                        window.request_redraw();
                    }
                    Err(e) => {
                        log::error!("render error: {e:?}");
                    }
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                self.dispatch(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.dispatch(InputEvent::CursorMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.dispatch(InputEvent::Scroll {
                    delta: scroll_delta,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.dispatch(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                    ctrl: modifiers.state().control_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(input) = InputEvent::from_key_event(&event) {
                    self.dispatch(input);
                }
            }

            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.dispatch(InputEvent::MouseMotion {
                dx: dx as f32,
                dy: dy as f32,
            });
        }
    }
}
