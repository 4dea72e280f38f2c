use bevy::math::bounding::{BoundingSphere, RayCast3d};
use bevy::prelude::*;
use orbit_camera::events::{PointerTap, TapSource};
use orbit_camera::{CameraController, CameraSystems};
use solar_system::body::BodyKind;
use std::time::Duration;

/// Delay before a touch tap is resolved. A new gesture within it cancels the pick.
const TAP_PICK_DELAY: Duration = Duration::from_millis(100);

pub(crate) struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>()
            .init_resource::<PendingPick>()
            .add_systems(
                Update,
                (cancel_pending_pick, pick_on_tap, close_on_escape)
                    .chain()
                    .after(CameraSystems::Input),
            );
    }
}

/// The body shown in the info panel.
#[derive(Debug, Default, Resource)]
pub(crate) struct Selection(Option<BodyKind>);

impl Selection {
    pub(crate) fn get(&self) -> Option<BodyKind> {
        self.0
    }

    pub(crate) fn set(&mut self, kind: Option<BodyKind>) {
        if self.0 != kind {
            debug!("Selection: {:?} -> {:?}", self.0, kind);
            self.0 = kind;
        }
    }

    pub(crate) fn close(&mut self) {
        self.set(None);
    }
}

#[derive(Debug, Resource)]
pub(crate) struct PendingPick {
    timer: Timer,
    position: Option<Vec2>,
}

impl Default for PendingPick {
    fn default() -> Self {
        Self {
            timer: Timer::new(TAP_PICK_DELAY, TimerMode::Once),
            position: None,
        }
    }
}

impl PendingPick {
    pub(crate) fn schedule(&mut self, position: Vec2) {
        self.position = Some(position);
        self.timer.reset();
    }

    /// Returns whether a pick was pending.
    pub(crate) fn cancel(&mut self) -> bool {
        self.position.take().is_some()
    }

    /// The tap position once the delay has elapsed.
    pub(crate) fn tick(&mut self, delta: Duration) -> Option<Vec2> {
        self.position?;
        if self.timer.tick(delta).finished() {
            self.position.take()
        } else {
            None
        }
    }
}

/// First body hit by `ray`. The sun wins whenever it is hit; otherwise the nearest body.
pub(crate) fn pick(
    ray: Ray3d,
    bodies: impl IntoIterator<Item = (BodyKind, Vec3, f32)>,
) -> Option<BodyKind> {
    let cast = RayCast3d::from_ray(ray, f32::MAX);
    let mut nearest: Option<(f32, BodyKind)> = None;
    for (kind, center, radius) in bodies {
        let Some(distance) = cast.sphere_intersection_at(&BoundingSphere::new(center, radius))
        else {
            continue;
        };
        if kind == BodyKind::Sun {
            return Some(kind);
        }
        if nearest.map_or(true, |(d, _)| distance < d) {
            nearest = Some((distance, kind));
        }
    }
    nearest.map(|(_, kind)| kind)
}

fn cancel_pending_pick(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut pending: ResMut<PendingPick>,
) {
    if (mouse_buttons.just_pressed(MouseButton::Left) || touches.any_just_pressed())
        && pending.cancel()
    {
        debug!("Pending pick cancelled by a new gesture");
    }
}

fn pick_on_tap(
    time: Res<Time>,
    mut evr_tap: EventReader<PointerTap>,
    mut pending: ResMut<PendingPick>,
    mut selection: ResMut<Selection>,
    q_camera: Query<(&Camera, &GlobalTransform), With<CameraController>>,
    q_bodies: Query<(&BodyKind, &GlobalTransform)>,
) {
    let mut positions = Vec::new();
    for tap in evr_tap.read() {
        match tap.source {
            TapSource::Mouse => positions.push(tap.position),
            TapSource::Touch => pending.schedule(tap.position),
        }
    }
    positions.extend(pending.tick(time.delta()));
    if positions.is_empty() {
        return;
    }

    let Ok((camera, camera_transform)) = q_camera.get_single() else {
        return;
    };
    for position in positions {
        let ray = match camera.viewport_to_world(camera_transform, position) {
            Ok(ray) => ray,
            Err(err) => {
                debug!("No pick ray through {position}: {err:?}");
                continue;
            }
        };
        let bodies = q_bodies.iter().map(|(kind, transform)| {
            let (scale, _, translation) = transform.to_scale_rotation_translation();
            (*kind, translation, scale.max_element())
        });
        selection.set(pick(ray, bodies));
    }
}

fn close_on_escape(keys: Res<ButtonInput<KeyCode>>, mut selection: ResMut<Selection>) {
    if keys.just_pressed(KeyCode::Escape) {
        selection.close();
    }
}
