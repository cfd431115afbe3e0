use glam::{Quat, Vec2, Vec3};

use crate::camera::core::{Camera, CameraUniform};
use crate::engine::command::EditorCommand;
use crate::geometry::Aabb;
use crate::options::CameraOptions;

/// Zoom factor after a fit or reset.
pub const ZOOM_DEFAULT: f32 = 0.7;
/// Closest allowed zoom factor.
pub const ZOOM_MIN: f32 = 0.02;
/// Farthest allowed zoom factor.
pub const ZOOM_MAX: f32 = 2.0;
/// Zoom change per unit of [`CameraController::scale`].
pub const ZOOM_STEP: f32 = 0.02;

/// Camera state driven by navigation and free-fly commands.
///
/// The eye orbits `focus` at a distance proportional to `zoom` and the
/// fitted bounds. Free-fly look turns the view in place around the eye.
pub struct CameraController {
    orientation: Quat,
    focus: Vec3,
    zoom: f32,
    /// Bounds of the last fit; the reference for distance and reset.
    bounds: Aabb,
    viewport: (u32, u32),
    /// The next look sample only records its reference.
    first_mouse: bool,

    /// Current camera, rebuilt after every change.
    pub camera: Camera,
    options: CameraOptions,
}

impl CameraController {
    /// Controller looking at a unit box around the origin.
    #[must_use]
    pub fn new(options: CameraOptions, viewport: (u32, u32)) -> Self {
        let camera = Camera {
            eye: Vec3::Z,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect(viewport),
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };
        let mut controller = Self {
            orientation: Quat::IDENTITY,
            focus: Vec3::ZERO,
            zoom: ZOOM_DEFAULT,
            bounds: Aabb {
                min: Vec3::splat(-1.0),
                max: Vec3::splat(1.0),
            },
            viewport,
            first_mouse: true,
            camera,
            options,
        };
        controller.update_camera_pos();
        controller
    }

    /// Distance from focus to eye for the current zoom and bounds.
    fn distance(&self) -> f32 {
        let half_fov = (self.camera.fovy.to_radians() / 2.0).tan();
        self.zoom * 2.0 * self.bounds.radius().max(f32::EPSILON) / half_fov
    }

    /// World units covered by one pixel at the focus plane.
    fn pixel_to_world(&self) -> f32 {
        let half_fov = (self.camera.fovy.to_radians() / 2.0).tan();
        2.0 * self.distance() * half_fov / self.viewport.1.max(1) as f32
    }

    fn update_camera_pos(&mut self) {
        let distance = self.distance();
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus + dir * distance;
        self.camera.target = self.focus;
        self.camera.up = self.orientation * Vec3::Y;
        self.camera.zfar = self
            .options
            .zfar
            .max(distance + 4.0 * self.bounds.radius());
    }

    /// Write the view-projection into `uniform`.
    pub fn fill_uniform(&self, uniform: &mut CameraUniform) {
        uniform.update_view_proj(&self.camera);
        uniform.viewport = [self.viewport.0 as f32, self.viewport.1 as f32];
    }

    /// Track the new viewport size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.viewport = (width, height);
            self.camera.aspect = aspect(self.viewport);
            self.update_camera_pos();
        }
    }

    /// Current zoom factor.
    #[must_use]
    pub fn zoom_factor(&self) -> f32 {
        self.zoom
    }

    /// Whether the next look sample will be treated as the first.
    #[must_use]
    pub fn is_first_mouse(&self) -> bool {
        self.first_mouse
    }

    /// Make the next look sample a fresh reference.
    pub fn reset_first_mouse(&mut self) {
        self.first_mouse = true;
    }

    /// Orbit around the focus by a drag delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let speed = self.options.rotate_speed;
        let up = self.orientation * Vec3::Y;
        self.orientation =
            Quat::from_axis_angle(up, -delta.x * speed) * self.orientation;
        let right = self.orientation * Vec3::X;
        self.orientation =
            Quat::from_axis_angle(right, -delta.y * speed) * self.orientation;
        self.orientation = self.orientation.normalize();
        self.update_camera_pos();
    }

    /// Move eye and focus together by a drag delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        let speed = self.options.pan_speed;
        self.translate(delta.x * speed, delta.y * speed);
    }

    /// Shift eye and focus by `(dx, dy)` screen pixels. Positive `dx`
    /// moves the scene right, positive `dy` moves it down.
    pub fn translate(&mut self, dx: f32, dy: f32) {
        let scale = self.pixel_to_world();
        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        self.focus += (right * -dx + up * dy) * scale;
        self.update_camera_pos();
    }

    /// Step the zoom factor; negative steps move closer.
    pub fn scale(&mut self, step: f32) {
        self.zoom = (self.zoom + step * ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
        self.update_camera_pos();
    }

    /// Scroll zoom; positive `delta` moves closer.
    pub fn zoom(&mut self, delta: f32) {
        self.zoom = (self.zoom * (1.0 - delta * self.options.zoom_speed))
            .clamp(ZOOM_MIN, ZOOM_MAX);
        self.update_camera_pos();
    }

    /// Free-fly look: turn the view around the eye by a mouse delta.
    ///
    /// The first sample after [`reset_first_mouse`](Self::reset_first_mouse)
    /// only establishes the reference and returns `false`.
    pub fn look(&mut self, delta: Vec2) -> bool {
        if self.first_mouse {
            self.first_mouse = false;
            return false;
        }
        let eye = self.camera.eye;
        let speed = self.options.look_speed;
        let yaw = Quat::from_axis_angle(Vec3::Y, -delta.x * speed);
        let right = self.orientation * Vec3::X;
        let pitch = Quat::from_axis_angle(right, -delta.y * speed);
        self.orientation = (yaw * pitch * self.orientation).normalize();

        // Keep the eye fixed; the focus swings in front of it.
        self.focus = eye - (self.orientation * Vec3::Z) * self.distance();
        self.update_camera_pos();
        true
    }

    /// Center on `bounds` and reset orientation and zoom.
    pub fn fit_in_geometry(&mut self, bounds: Aabb) {
        self.bounds = bounds;
        self.reset_view_point();
    }

    /// Restore the default view of the last fitted bounds.
    pub fn reset_view_point(&mut self) {
        self.orientation = Quat::IDENTITY;
        self.zoom = ZOOM_DEFAULT;
        self.focus = self.bounds.center();
        self.update_camera_pos();
    }

    /// Apply the camera side of `command` and report whether the view
    /// needs a redraw.
    ///
    /// `scene_bounds` is only called for [`EditorCommand::ResetView`], which
    /// refits to the bounds it returns, or restores the last fit when
    /// nothing is loaded. Toggling free-fly either way makes the next look
    /// sample a fresh reference. Commands that never touch the camera
    /// return `false`.
    pub fn apply(
        &mut self,
        command: &EditorCommand,
        scene_bounds: impl FnOnce() -> Option<Aabb>,
    ) -> bool {
        match *command {
            EditorCommand::SetFreeFly { .. } => self.reset_first_mouse(),
            EditorCommand::Scale { step } => self.scale(step),
            EditorCommand::Translate { dx, dy } => self.translate(dx, dy),
            EditorCommand::RotateCamera { delta } => self.rotate(delta),
            EditorCommand::PanCamera { delta } => self.pan(delta),
            EditorCommand::Look { delta } => {
                let _ = self.look(delta);
            }
            EditorCommand::Zoom { delta } => self.zoom(delta),
            EditorCommand::ResetView => match scene_bounds() {
                Some(bounds) => self.fit_in_geometry(bounds),
                None => self.reset_view_point(),
            },
            EditorCommand::PickPoint { .. }
            | EditorCommand::UnpickLast
            | EditorCommand::AdjustPointSize { .. } => return false,
        }
        command.requires_redraw()
    }
}

fn aspect((width, height): (u32, u32)) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> CameraController {
        let mut c = CameraController::new(CameraOptions::default(), (800, 600));
        c.fit_in_geometry(Aabb {
            min: Vec3::ZERO,
            max: Vec3::splat(10.0),
        });
        c
    }

    #[test]
    fn fit_centers_on_bounds() {
        let c = controller();
        assert_eq!(c.camera.target, Vec3::splat(5.0));
        assert_eq!(c.zoom_factor(), ZOOM_DEFAULT);
        assert!(c.camera.eye.z > 5.0);
    }

    #[test]
    fn forward_scale_moves_closer_by_fixed_step() {
        let mut c = controller();
        let before = c.camera.eye.distance(c.camera.target);
        c.scale(-0.3);
        assert!((c.zoom_factor() - (ZOOM_DEFAULT - 0.3 * ZOOM_STEP)).abs() < 1e-6);
        assert!(c.camera.eye.distance(c.camera.target) < before);
        c.scale(0.3);
        assert!((c.zoom_factor() - ZOOM_DEFAULT).abs() < 1e-6);
    }

    #[test]
    fn scale_is_clamped() {
        let mut c = controller();
        c.scale(-1000.0);
        assert_eq!(c.zoom_factor(), ZOOM_MIN);
        c.scale(1000.0);
        assert_eq!(c.zoom_factor(), ZOOM_MAX);
    }

    #[test]
    fn positive_translate_moves_focus_left() {
        let mut c = controller();
        let before = c.camera.target;
        c.translate(1.8, 0.0);
        assert!(c.camera.target.x < before.x);
        assert!((c.camera.target.y - before.y).abs() < 1e-5);
        // Eye moves with the focus.
        assert!((c.camera.eye - c.camera.target).length() > 0.0);
    }

    #[test]
    fn first_look_sample_only_sets_reference() {
        let mut c = controller();
        assert!(c.is_first_mouse());
        let target = c.camera.target;
        assert!(!c.look(Vec2::new(40.0, 0.0)));
        assert_eq!(c.camera.target, target);
        assert!(!c.is_first_mouse());
        assert!(c.look(Vec2::new(40.0, 0.0)));
        assert_ne!(c.camera.target, target);
    }

    #[test]
    fn look_keeps_eye_in_place() {
        let mut c = controller();
        c.reset_first_mouse();
        let _ = c.look(Vec2::ZERO);
        let eye = c.camera.eye;
        assert!(c.look(Vec2::new(25.0, -10.0)));
        assert!(c.camera.eye.distance(eye) < 1e-3);
    }

    #[test]
    fn reset_restores_fit() {
        let mut c = controller();
        let fitted = c.camera;
        c.rotate(Vec2::new(30.0, 12.0));
        c.pan(Vec2::new(5.0, 5.0));
        c.zoom(2.0);
        c.reset_view_point();
        assert!(c.camera.eye.distance(fitted.eye) < 1e-4);
        assert!(c.camera.target.distance(fitted.target) < 1e-4);
    }

    #[test]
    fn reset_command_refits_to_scene_bounds() {
        let mut c = controller();
        c.rotate(Vec2::new(30.0, 12.0));
        let scene = Aabb {
            min: Vec3::splat(-20.0),
            max: Vec3::ZERO,
        };
        assert!(c.apply(&EditorCommand::ResetView, || Some(scene)));
        assert_eq!(c.camera.target, Vec3::splat(-10.0));

        c.pan(Vec2::new(40.0, 0.0));
        assert!(c.apply(&EditorCommand::ResetView, || None));
        assert!(c.camera.target.distance(Vec3::splat(-10.0)) < 1e-4);
    }

    #[test]
    fn non_camera_commands_are_ignored() {
        let mut c = controller();
        let before = c.camera;
        for command in [
            EditorCommand::PickPoint { x: 1.0, y: 2.0 },
            EditorCommand::UnpickLast,
            EditorCommand::AdjustPointSize { delta: 1.0 },
        ] {
            assert!(!c.apply(&command, || None));
        }
        assert_eq!(c.camera.eye, before.eye);
        assert_eq!(c.camera.target, before.target);
    }

    #[test]
    fn far_plane_grows_with_bounds() {
        let mut c = CameraController::new(CameraOptions::default(), (800, 600));
        c.fit_in_geometry(Aabb {
            min: Vec3::splat(-5000.0),
            max: Vec3::splat(5000.0),
        });
        assert!(c.camera.zfar > CameraOptions::default().zfar);
    }

    #[test]
    fn uniform_carries_viewport() {
        let mut c = controller();
        c.resize(1024, 768);
        let mut u = CameraUniform::new();
        c.fill_uniform(&mut u);
        assert_eq!(u.viewport, [1024.0, 768.0]);
        assert_eq!(c.camera.aspect, 1024.0 / 768.0);
    }
}
