//! The editor engine: point-cloud editing wired to a live GPU context.
//!
//! [`EditorEngine`] owns the [`PointCloudEditor`], the render stage that
//! plays its [`EditorHost`](crate::editor::EditorHost) and the pick engine.
//! Hosts drive it with [`EditorCommand`]s from the input chain plus the
//! direct geometry and pick calls.

pub mod command;
mod stage;

use std::ops::Range;

use self::command::EditorCommand;
use self::stage::RenderStage;
use crate::editor::{PickEvent, PointCloudEditor};
use crate::error::{CloudError, EditorError};
use crate::geometry::Geometry;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::options::Options;
use crate::picking::PickEngine;

/// Point-cloud editor bound to a window surface.
pub struct EditorEngine {
    stage: RenderStage,
    editor: PointCloudEditor,
    pick_engine: PickEngine,
    options: Options,
    free_fly: bool,
    needs_redraw: bool,
}

impl EditorEngine {
    /// Create the GPU context for `window` and build the engine on it.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Gpu`] if no device can be acquired and
    /// [`CloudError::Shader`] if a shader fails to compose.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        options: Options,
    ) -> Result<Self, CloudError> {
        let context = RenderContext::new(window, size).await?;
        Self::from_context(context, options)
    }

    /// Build the engine on an existing render context.
    ///
    /// # Errors
    ///
    /// Returns [`CloudError::Shader`] if a shader fails to compose.
    pub fn from_context(
        context: RenderContext,
        options: Options,
    ) -> Result<Self, CloudError> {
        let mut composer = ShaderComposer::new()?;
        let stage = RenderStage::new(context, &mut composer, &options)?;
        let pick_engine = PickEngine::new(
            &stage.context.device,
            &mut composer,
            &stage.camera_binding.layout,
        )?;

        Ok(Self {
            stage,
            editor: PointCloudEditor::new(),
            pick_engine,
            options,
            free_fly: false,
            needs_redraw: true,
        })
    }

    // -- Editing --

    /// Merge `geometry` into the edited cloud. See
    /// [`PointCloudEditor::add_geometry`].
    ///
    /// # Errors
    ///
    /// Propagates the editor's [`EditorError`]; nothing changes on error.
    pub fn add_geometry(
        &mut self,
        geometry: &Geometry,
    ) -> Result<Range<usize>, EditorError> {
        let range = self.editor.add_geometry(&mut self.stage, geometry)?;
        self.needs_redraw = true;
        Ok(range)
    }

    /// Remove the segment tagged `id`. See
    /// [`PointCloudEditor::remove_geometry`].
    ///
    /// # Errors
    ///
    /// Propagates the editor's [`EditorError`]; nothing changes on error.
    pub fn remove_geometry(
        &mut self,
        id: &str,
    ) -> Result<Range<usize>, EditorError> {
        let range = self.editor.remove_geometry(&mut self.stage, id)?;
        self.sync_picked();
        self.needs_redraw = true;
        Ok(range)
    }

    /// Register the callback run after every pick, replacing any earlier
    /// one.
    pub fn register_onpick_callback(
        &mut self,
        callback: impl FnMut(PickEvent) + 'static,
    ) {
        self.editor.register_onpick_callback(callback);
    }

    // -- Picking --

    /// Pick the point under cursor `(x, y)` in physical pixels.
    ///
    /// A hit is appended to the picked set. The pick callback runs for hits
    /// and misses alike.
    pub fn pick_point(&mut self, x: f32, y: f32) -> PickEvent {
        self.stage.upload_camera();
        let hit = self.pick_engine.pick(
            &self.stage.context,
            &self.stage.camera_binding,
            self.editor.cloud(),
            (x, y),
        );
        let event = self.editor.resolve_pick(hit);
        if let PickEvent::Point {
            index,
            class: Some(class),
        } = event
        {
            log::info!(
                "point #{index} is {}",
                self.options.classes.describe(class)
            );
        }
        self.sync_picked();
        self.needs_redraw = true;
        event
    }

    /// Drop the most recent pick, returning its index.
    pub fn unpick_last(&mut self) -> Option<usize> {
        let index = self.editor.unpick_last()?;
        self.sync_picked();
        self.needs_redraw = true;
        Some(index)
    }

    fn sync_picked(&mut self) {
        let positions = self.editor.picked_positions();
        self.stage.set_picked(&positions);
    }

    // -- Commands --

    /// Apply one command from the input chain.
    ///
    /// Camera commands go through [`CameraController::apply`]; a reset
    /// refits to the whole merged cloud.
    ///
    /// [`CameraController::apply`]: crate::camera::CameraController::apply
    pub fn execute(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::PickPoint { x, y } => {
                let _ = self.pick_point(x, y);
            }
            EditorCommand::UnpickLast => {
                let _ = self.unpick_last();
            }
            EditorCommand::AdjustPointSize { delta } => {
                self.stage.display.adjust_point_size(delta);
                self.options.display.point_size = self.stage.display.point_size;
                self.needs_redraw = true;
            }
            _ => {
                if let EditorCommand::SetFreeFly { enabled } = command {
                    self.free_fly = enabled;
                }
                let editor = &self.editor;
                if self
                    .stage
                    .camera
                    .apply(&command, || editor.cloud().bounds())
                {
                    self.needs_redraw = true;
                }
            }
        }
    }

    // -- Frame --

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the swapchain frame cannot be
    /// acquired.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.needs_redraw = false;
        self.stage.render()
    }

    /// Handle a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stage.resize(width, height);
        self.needs_redraw = true;
    }

    /// Whether a redraw was requested since the last call, clearing the
    /// request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // -- Accessors --

    /// The point-cloud editor.
    #[must_use]
    pub fn editor(&self) -> &PointCloudEditor {
        &self.editor
    }

    /// Options the engine was built with, including runtime point-size
    /// changes.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Whether free-fly mode is active.
    #[must_use]
    pub fn is_free_fly(&self) -> bool {
        self.free_fly
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::camera::controller::{ZOOM_DEFAULT, ZOOM_STEP};
    use crate::camera::CameraController;
    use crate::editor::EditorHost;
    use crate::error::RendererError;
    use crate::geometry::{Aabb, PointCloud};
    use crate::input::{InputEvent, InputProcessor, KeyState};

    /// Host whose view fitting moves a real camera.
    struct CameraHost {
        camera: CameraController,
    }

    impl CameraHost {
        fn new() -> Self {
            Self {
                camera: CameraController::new(
                    Options::default().camera,
                    (800, 600),
                ),
            }
        }
    }

    impl EditorHost for CameraHost {
        fn is_initialized(&self) -> bool {
            true
        }

        fn register_renderer(
            &mut self,
            _cloud: &PointCloud,
        ) -> Result<(), RendererError> {
            Ok(())
        }

        fn geometry_changed(&mut self, _cloud: &PointCloud) {}

        fn fit_view(&mut self, bounds: Aabb) {
            self.camera.fit_in_geometry(bounds);
        }
    }

    fn cube(id: &str, corner: f32) -> Geometry {
        PointCloud::from_positions(
            id,
            vec![Vec3::splat(corner), Vec3::splat(corner + 1.0)],
        )
        .into()
    }

    fn key(code: &str, state: KeyState) -> InputEvent {
        InputEvent::Key {
            code: code.into(),
            state,
        }
    }

    /// Feed `event` through the input chain and apply what it produced to
    /// the camera, the way `EditorEngine::execute` does.
    fn drive(
        input: &mut InputProcessor,
        camera: &mut CameraController,
        event: InputEvent,
    ) -> Option<bool> {
        let command = input.handle_event(event)?;
        Some(camera.apply(&command, || None))
    }

    #[test]
    fn reset_view_fits_every_loaded_cloud() {
        let mut host = CameraHost::new();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cube("A", 0.0)).unwrap();
        let _ = editor.add_geometry(&mut host, &cube("B", 1000.0)).unwrap();
        assert_eq!(host.camera.camera.target, Vec3::splat(0.5));

        let redraw = host
            .camera
            .apply(&EditorCommand::ResetView, || editor.cloud().bounds());
        assert!(redraw);
        assert_eq!(host.camera.camera.target, Vec3::splat(500.5));
    }

    #[test]
    fn reset_view_on_empty_editor_keeps_last_fit() {
        let mut host = CameraHost::new();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cube("A", 4.0)).unwrap();
        let _ = editor.remove_geometry(&mut host, "A").unwrap();
        host.camera.pan(Vec2::new(30.0, -8.0));

        assert!(host
            .camera
            .apply(&EditorCommand::ResetView, || editor.cloud().bounds()));
        assert!(host.camera.camera.target.distance(Vec3::splat(4.5)) < 1e-4);
    }

    #[test]
    fn free_fly_keys_drive_camera() {
        let options = Options::default();
        let mut input = InputProcessor::new(&options);
        let mut camera = CameraController::new(options.camera.clone(), (800, 600));
        camera.fit_in_geometry(Aabb {
            min: Vec3::ZERO,
            max: Vec3::splat(10.0),
        });
        let _ = camera.look(Vec2::ZERO);
        assert!(!camera.is_first_mouse());

        // Entering free-fly: no redraw, fresh look reference.
        assert_eq!(
            drive(&mut input, &mut camera, key("KeyI", KeyState::Pressed)),
            None
        );
        assert_eq!(
            drive(&mut input, &mut camera, key("KeyI", KeyState::Released)),
            Some(false)
        );
        assert!(camera.is_first_mouse());

        assert_eq!(
            drive(&mut input, &mut camera, key("KeyW", KeyState::Pressed)),
            Some(true)
        );
        assert!(
            (camera.zoom_factor() - (ZOOM_DEFAULT - 0.3 * ZOOM_STEP)).abs()
                < 1e-6
        );

        let motion = InputEvent::MouseMotion { dx: 12.0, dy: 0.0 };
        assert_eq!(drive(&mut input, &mut camera, motion), Some(true));
        assert!(!camera.is_first_mouse());

        // Leaving free-fly resets the reference again.
        let _ = drive(&mut input, &mut camera, key("KeyI", KeyState::Pressed));
        assert_eq!(
            drive(&mut input, &mut camera, key("KeyI", KeyState::Released)),
            Some(false)
        );
        assert!(camera.is_first_mouse());
    }
}
