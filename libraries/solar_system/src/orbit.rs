use crate::body;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use serde::{Deserialize, Serialize};
use std::f32::consts;

/// Number of segments of the closed polyline drawn for each orbit.
pub const ORBIT_PATH_SEGMENTS: usize = 64;

pub struct OrbitPlugin {
    pub draw_orbits: bool,
}

impl Default for OrbitPlugin {
    fn default() -> Self {
        Self { draw_orbits: true }
    }
}

impl Plugin for OrbitPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CircularOrbit>()
            .register_type::<OrbitalAngle>()
            .insert_resource(DrawOrbits(self.draw_orbits))
            .add_systems(
                Update,
                (advance_orbits, body::spin_bodies).in_set(OrbitSystems),
            )
            .add_systems(
                Update,
                sync_orbit_path_visibility.run_if(resource_changed::<DrawOrbits>),
            );
    }
}

/// Per-frame orbital motion. Camera systems that follow a body run after this set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SystemSet)]
pub struct OrbitSystems;

#[derive(Resource, Deref, DerefMut)]
pub struct DrawOrbits(pub bool);

/// Circular orbit in the XZ plane around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Component, Deserialize, Serialize, Reflect)]
#[reflect(Component)]
pub struct CircularOrbit {
    pub distance: f32,
    /// Radians per frame.
    pub speed: f32,
}

impl CircularOrbit {
    #[inline]
    pub fn position_at(&self, angle: f32) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3::new(self.distance * cos, 0.0, self.distance * sin)
    }

    /// The angle is never wrapped; the trigonometric functions take care of it.
    #[inline]
    pub fn advance(&self, angle: f32) -> f32 {
        angle + self.speed
    }

    /// Points of the closed polyline approximating the orbit; the last point repeats the first.
    pub fn path_points(&self, segments: usize) -> Vec<Vec3> {
        (0..=segments)
            .map(|i| self.position_at(i as f32 / segments as f32 * consts::TAU))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, Component, Deref, DerefMut, Reflect)]
#[reflect(Component)]
pub struct OrbitalAngle(pub f32);

/// Line entity drawing the orbit of `body`.
#[derive(Debug, Clone, Copy, Component)]
pub struct OrbitPath {
    pub body: Entity,
}

pub fn orbit_path_mesh(orbit: &CircularOrbit, segments: usize) -> Mesh {
    let points = orbit
        .path_points(segments)
        .into_iter()
        .map(|p| p.to_array())
        .collect::<Vec<_>>();
    let normals = vec![[0.0, 1.0, 0.0]; points.len()];
    Mesh::new(PrimitiveTopology::LineStrip, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, points)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
}

pub fn advance_orbits(mut q: Query<(&CircularOrbit, &mut OrbitalAngle, &mut Transform)>) {
    for (orbit, mut angle, mut transform) in &mut q {
        **angle = orbit.advance(**angle);
        transform.translation = orbit.position_at(**angle);
    }
}

fn sync_orbit_path_visibility(
    draw_orbits: Res<DrawOrbits>,
    mut q: Query<&mut Visibility, With<OrbitPath>>,
) {
    debug!("Orbit paths visible: {}", **draw_orbits);
    let visibility = if **draw_orbits {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut v in &mut q {
        *v = visibility;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bevy::ecs::system::RunSystemOnce;

    fn orbit() -> CircularOrbit {
        CircularOrbit {
            distance: 20.0,
            speed: 0.001,
        }
    }

    #[test]
    fn position_lies_on_the_xz_circle() {
        let orbit = orbit();
        for angle in [0.0, 0.3, consts::FRAC_PI_2, 2.0, consts::PI, 5.5] {
            let p = orbit.position_at(angle);
            assert_abs_diff_eq!(p.x, 20.0 * angle.cos(), epsilon = 1e-5);
            assert_eq!(p.y, 0.0);
            assert_abs_diff_eq!(p.z, 20.0 * angle.sin(), epsilon = 1e-5);
        }
    }

    #[test]
    fn position_is_periodic_without_wrapping() {
        let orbit = orbit();
        let a = orbit.position_at(1.0);
        let b = orbit.position_at(1.0 + 3.0 * consts::TAU);
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn path_is_closed_with_requested_segments() {
        let points = orbit().path_points(ORBIT_PATH_SEGMENTS);
        assert_eq!(points.len(), ORBIT_PATH_SEGMENTS + 1);
        let first = points[0];
        let last = points[ORBIT_PATH_SEGMENTS];
        assert_abs_diff_eq!(first.x, last.x, epsilon = 1e-4);
        assert_abs_diff_eq!(first.z, last.z, epsilon = 1e-4);
        for p in &points {
            assert_abs_diff_eq!(p.length(), 20.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn path_mesh_is_a_line_strip() {
        let mesh = orbit_path_mesh(&orbit(), ORBIT_PATH_SEGMENTS);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineStrip);
        assert_eq!(mesh.count_vertices(), ORBIT_PATH_SEGMENTS + 1);
    }

    #[test]
    fn angle_accumulates_speed_each_tick() {
        let mut world = World::new();
        let initial = 1.25;
        let entity = world
            .spawn((orbit(), OrbitalAngle(initial), Transform::default()))
            .id();

        const TICKS: usize = 100;
        for _ in 0..TICKS {
            world.run_system_once(advance_orbits).unwrap();
        }

        let angle = **world.get::<OrbitalAngle>(entity).unwrap();
        assert_abs_diff_eq!(angle, initial + TICKS as f32 * 0.001, epsilon = 1e-4);
        let translation = world.get::<Transform>(entity).unwrap().translation;
        let expected = orbit().position_at(angle);
        assert_abs_diff_eq!(translation.x, expected.x, epsilon = 1e-5);
        assert_abs_diff_eq!(translation.z, expected.z, epsilon = 1e-5);
    }
}
