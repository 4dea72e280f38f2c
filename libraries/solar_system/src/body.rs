use crate::catalog::CelestialBody;
use bevy::prelude::*;
use std::collections::HashMap;

pub struct BodyPlugin;

impl Plugin for BodyPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<PlanetaryBody>()
            .register_type::<BodyKind>()
            .register_type::<RotationSpeed>()
            .init_resource::<BodyRegistry>();
    }
}

#[derive(Debug, Copy, Clone, Component, Reflect)]
#[reflect(Component)]
pub struct PlanetaryBody;

/// Index of a planet in the catalog's declaration order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Reflect)]
pub struct PlanetId(pub usize);

/// Tag carried by every pickable body.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Component, Reflect)]
#[reflect(Component)]
pub enum BodyKind {
    Sun,
    Planet(PlanetId),
}

/// Self-rotation about the local Y axis, in radians per frame.
#[derive(Debug, Clone, Copy, Component, Reflect)]
#[reflect(Component)]
pub struct RotationSpeed(pub f32);

impl Default for RotationSpeed {
    fn default() -> Self {
        Self(0.01)
    }
}

/// Spawned bodies keyed by catalog identifier.
#[derive(Debug, Default, Resource)]
pub struct BodyRegistry {
    index: HashMap<String, Entity>,
    order: Vec<(BodyKind, Entity)>,
}

impl BodyRegistry {
    pub fn insert(&mut self, id: impl Into<String>, kind: BodyKind, entity: Entity) {
        self.index.insert(id.into(), entity);
        self.order.push((kind, entity));
    }

    pub fn get(&self, id: &str) -> Option<Entity> {
        self.index.get(id).copied()
    }

    pub fn entity(&self, kind: BodyKind) -> Option<Entity> {
        self.order
            .iter()
            .find_map(|(k, entity)| (*k == kind).then_some(*entity))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyKind, Entity)> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Spawns the visual sphere of a body. The mesh is a unit sphere scaled to the body radius.
pub fn spawn(
    commands: &mut Commands,
    body: &CelestialBody,
    kind: BodyKind,
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
    translation: Vec3,
) -> Entity {
    let transform = Transform::from_translation(translation).with_scale(Vec3::splat(body.radius));
    commands
        .spawn((
            Name::new(body.name.clone()),
            PlanetaryBody,
            kind,
            Mesh3d(mesh),
            MeshMaterial3d(material),
            transform,
        ))
        .id()
}

pub fn spin_bodies(mut q: Query<(&mut Transform, &RotationSpeed)>) {
    for (mut transform, speed) in &mut q {
        transform.rotate_local_y(speed.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_declaration_order() {
        let mut registry = BodyRegistry::default();
        let sun = Entity::from_raw(1);
        let earth = Entity::from_raw(2);
        let mars = Entity::from_raw(3);
        registry.insert("sun", BodyKind::Sun, sun);
        registry.insert("earth", BodyKind::Planet(PlanetId(0)), earth);
        registry.insert("mars", BodyKind::Planet(PlanetId(1)), mars);

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get("mars"), Some(mars));
        assert_eq!(registry.get("pluto"), None);
        assert_eq!(registry.entity(BodyKind::Planet(PlanetId(0))), Some(earth));
        assert_eq!(
            registry.iter().map(|(_, e)| e).collect::<Vec<_>>(),
            [sun, earth, mars]
        );
    }
}
