use crate::gesture::DragStep;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

/// Height of the tracking camera above a body of radius `r` is `r * 15 + 20`.
const TRACKING_HEIGHT_PER_RADIUS: f32 = 15.0;
const TRACKING_BASE_HEIGHT: f32 = 20.0;
/// Distance behind the body, `r * 2`.
const TRACKING_DEPTH_PER_RADIUS: f32 = 2.0;

/// The configuration of the orbit camera
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
#[require(CameraController)]
pub struct OrbitCameraSettings {
    /// Radians per pixel of pointer motion
    pub rotate_sensitivity: f32,
    /// Fraction of the remaining rotation applied each frame
    pub damping: f32,
    /// Pixels a pointer may travel from where it was pressed before the gesture is a drag
    pub drag_threshold: f32,
    /// Relative change of the distance per wheel notch or zoom button press
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCameraSettings {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.01,
            damping: 0.05,
            drag_threshold: 5.0,
            zoom_step: 0.1,
            min_distance: 15.0,
            max_distance: 150.0,
        }
    }
}

impl OrbitCameraSettings {
    #[inline]
    pub fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }
}

/// Camera slaved to a body: placed at `body + offset`, looking at the body.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct Tracking {
    pub target: Entity,
    pub offset: Vec3,
}

impl Tracking {
    /// Larger bodies are framed from further away.
    pub fn for_radius(target: Entity, radius: f32) -> Self {
        Self {
            target,
            offset: Vec3::new(
                0.0,
                radius * TRACKING_HEIGHT_PER_RADIUS + TRACKING_BASE_HEIGHT,
                radius * TRACKING_DEPTH_PER_RADIUS,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    FreeRotate,
    Tracking(Entity),
}

/// The internal state of the orbit camera.
///
/// Rotations are `(x, y)` = (vertical, horizontal) angles. In free-rotate mode the camera sits on a
/// sphere of radius `distance` around the origin; with `tracking` set it follows a body instead.
#[derive(Debug, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct CameraController {
    pub target_rotation: Vec2,
    pub rotation: Vec2,
    pub distance: f32,
    pub tracking: Option<Tracking>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self {
            target_rotation: Vec2::ZERO,
            rotation: Vec2::ZERO,
            distance: 50.0,
            tracking: None,
        }
    }
}

impl CameraController {
    pub fn mode(&self) -> CameraMode {
        match self.tracking {
            Some(tracking) => CameraMode::Tracking(tracking.target),
            None => CameraMode::FreeRotate,
        }
    }

    #[inline]
    pub fn is_tracking(&self) -> bool {
        self.tracking.is_some()
    }

    pub fn track(&mut self, target: Entity, radius: f32) {
        self.tracking = Some(Tracking::for_radius(target, radius));
    }

    /// Returns whether the camera was tracking something.
    pub fn release_tracking(&mut self) -> bool {
        self.tracking.take().is_some()
    }

    pub fn rotate(&mut self, delta: Vec2, settings: &OrbitCameraSettings) {
        self.target_rotation.y += delta.x * settings.rotate_sensitivity;
        self.target_rotation.x = (self.target_rotation.x + delta.y * settings.rotate_sensitivity)
            .clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Applies one pointer move. A drag wins over tracking; returns whether tracking was cancelled.
    pub fn drag(&mut self, step: DragStep, settings: &OrbitCameraSettings) -> bool {
        let cancelled = step.is_drag && self.release_tracking();
        self.rotate(step.delta, settings);
        cancelled
    }

    pub fn zoom_by(&mut self, factor: f32, settings: &OrbitCameraSettings) {
        self.distance = settings.clamp_distance(self.distance * factor);
    }

    pub fn zoom_in(&mut self, settings: &OrbitCameraSettings) {
        self.zoom_by(1.0 - settings.zoom_step, settings);
    }

    pub fn zoom_out(&mut self, settings: &OrbitCameraSettings) {
        self.zoom_by(1.0 + settings.zoom_step, settings);
    }

    /// `scale` is the current finger distance over the previous one; spreading the fingers zooms in.
    pub fn pinch(&mut self, scale: f32, settings: &OrbitCameraSettings) {
        if scale.is_finite() && scale > 0.0 {
            self.distance = settings.clamp_distance(self.distance / scale);
        }
    }

    /// Leaves tracking mode and points the free camera at a fixed framing.
    pub fn frame(&mut self, target_rotation: Vec2, distance: f32, settings: &OrbitCameraSettings) {
        self.tracking = None;
        self.target_rotation = Vec2::new(
            target_rotation.x.clamp(-FRAC_PI_2, FRAC_PI_2),
            target_rotation.y,
        );
        self.distance = settings.clamp_distance(distance);
    }

    /// Moves the current rotation a fixed fraction towards the target.
    pub fn damp(&mut self, settings: &OrbitCameraSettings) {
        self.rotation += (self.target_rotation - self.rotation) * settings.damping;
    }

    pub fn free_position(&self) -> Vec3 {
        let (sin_x, _) = self.rotation.x.sin_cos();
        let (sin_y, cos_y) = self.rotation.y.sin_cos();
        Vec3::new(sin_y, sin_x, cos_y) * self.distance
    }
}

pub fn free_transform(controller: &CameraController) -> Transform {
    Transform::from_translation(controller.free_position()).looking_at(Vec3::ZERO, Vec3::Y)
}

pub fn tracking_transform(body: Vec3, tracking: &Tracking) -> Transform {
    Transform::from_translation(body + tracking.offset).looking_at(body, Vec3::Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn settings() -> OrbitCameraSettings {
        OrbitCameraSettings::default()
    }

    fn step(x: f32, y: f32, is_drag: bool) -> DragStep {
        DragStep {
            delta: Vec2::new(x, y),
            is_drag,
        }
    }

    #[test]
    fn defaults_to_free_rotate() {
        let controller = CameraController::default();
        assert_eq!(controller.mode(), CameraMode::FreeRotate);
        assert_eq!(controller.distance, 50.0);
    }

    #[test]
    fn jupiter_offset_scales_with_radius() {
        let jupiter = Entity::from_raw(5);
        let mut controller = CameraController::default();
        controller.track(jupiter, 3.0);
        let tracking = controller.tracking.unwrap();
        assert_eq!(controller.mode(), CameraMode::Tracking(jupiter));
        assert_eq!(tracking.offset, Vec3::new(0.0, 65.0, 6.0));
    }

    #[test]
    fn drag_cancels_tracking_and_rotates() {
        let settings = settings();
        let mut controller = CameraController::default();
        controller.track(Entity::from_raw(1), 1.0);

        assert!(controller.drag(step(10.0, 0.0, true), &settings));
        assert!(!controller.is_tracking());
        assert_abs_diff_eq!(controller.target_rotation.y, 0.1, epsilon = 1e-6);
        assert_eq!(controller.target_rotation.x, 0.0);

        assert!(!controller.drag(step(10.0, 0.0, true), &settings));
    }

    #[test]
    fn sub_threshold_motion_keeps_tracking_but_still_rotates() {
        let settings = settings();
        let mut controller = CameraController::default();
        controller.track(Entity::from_raw(1), 1.0);
        assert!(!controller.drag(step(3.0, -2.0, false), &settings));
        assert!(controller.is_tracking());
        assert_abs_diff_eq!(controller.target_rotation.y, 0.03, epsilon = 1e-6);
        assert_abs_diff_eq!(controller.target_rotation.x, -0.02, epsilon = 1e-6);
    }

    #[test]
    fn vertical_rotation_stays_clamped() {
        let settings = settings();
        let mut controller = CameraController::default();
        for (i, dy) in [500.0, 90.0, -1000.0, 37.0, -3.0, 10_000.0].into_iter().enumerate() {
            controller.drag(step(i as f32, dy, true), &settings);
            assert!(controller.target_rotation.x >= -FRAC_PI_2);
            assert!(controller.target_rotation.x <= FRAC_PI_2);
        }
        assert_eq!(controller.target_rotation.x, FRAC_PI_2);
    }

    #[test]
    fn zoom_stays_within_bounds() {
        let settings = settings();
        let mut controller = CameraController::default();
        for _ in 0..100 {
            controller.zoom_in(&settings);
        }
        assert_eq!(controller.distance, 15.0);
        for _ in 0..100 {
            controller.zoom_out(&settings);
            assert!(controller.distance <= 150.0);
        }
        assert_eq!(controller.distance, 150.0);
        controller.pinch(0.01, &settings);
        assert_eq!(controller.distance, 150.0);
        controller.pinch(100.0, &settings);
        assert_eq!(controller.distance, 15.0);
    }

    #[test]
    fn zoom_steps_are_multiplicative() {
        let settings = settings();
        let mut controller = CameraController::default();
        controller.zoom_in(&settings);
        assert_abs_diff_eq!(controller.distance, 45.0, epsilon = 1e-4);
        controller.zoom_out(&settings);
        assert_abs_diff_eq!(controller.distance, 49.5, epsilon = 1e-4);
    }

    #[test]
    fn degenerate_pinch_is_ignored() {
        let settings = settings();
        let mut controller = CameraController::default();
        controller.pinch(0.0, &settings);
        controller.pinch(f32::INFINITY, &settings);
        controller.pinch(f32::NAN, &settings);
        assert_eq!(controller.distance, 50.0);
        controller.pinch(2.0, &settings);
        assert_eq!(controller.distance, 25.0);
    }

    #[test]
    fn frame_leaves_tracking() {
        let settings = settings();
        let mut controller = CameraController::default();
        controller.track(Entity::from_raw(3), 2.0);
        controller.frame(Vec2::new(0.3, 0.0), 30.0, &settings);
        assert!(!controller.is_tracking());
        assert_eq!(controller.target_rotation, Vec2::new(0.3, 0.0));
        assert_eq!(controller.distance, 30.0);
    }

    #[test]
    fn damping_converges_on_target() {
        let settings = settings();
        let mut controller = CameraController {
            target_rotation: Vec2::new(0.5, 1.0),
            ..default()
        };
        controller.damp(&settings);
        assert_abs_diff_eq!(controller.rotation.x, 0.025, epsilon = 1e-6);
        assert_abs_diff_eq!(controller.rotation.y, 0.05, epsilon = 1e-6);
        for _ in 0..500 {
            controller.damp(&settings);
        }
        assert_abs_diff_eq!(controller.rotation.x, 0.5, epsilon = 1e-4);
        assert_abs_diff_eq!(controller.rotation.y, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn free_position_lies_on_the_zoom_sphere() {
        let controller = CameraController {
            rotation: Vec2::new(0.0, std::f32::consts::FRAC_PI_2),
            distance: 40.0,
            ..default()
        };
        let p = controller.free_position();
        assert_abs_diff_eq!(p.x, 40.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.z, 0.0, epsilon = 1e-4);

        let transform = free_transform(&controller);
        assert_abs_diff_eq!(transform.forward().x, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn tracking_transform_looks_at_body() {
        let body = Vec3::new(35.0, 0.0, 0.0);
        let tracking = Tracking::for_radius(Entity::from_raw(4), 3.0);
        let transform = tracking_transform(body, &tracking);
        assert_eq!(transform.translation, Vec3::new(35.0, 65.0, 6.0));
        let expected = (body - transform.translation).normalize();
        let forward = *transform.forward();
        assert_abs_diff_eq!(forward.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.y, expected.y, epsilon = 1e-5);
        assert_abs_diff_eq!(forward.z, expected.z, epsilon = 1e-5);
    }
}
