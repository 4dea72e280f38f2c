use bevy::prelude::*;
use orbit_camera::{CameraController, OrbitCameraSettings};
use solar_system::body::{BodyKind, BodyRegistry, PlanetId};
use solar_system::Catalog;

/// Queries this short only clear the current target.
const MIN_QUERY_CHARS: usize = 3;
/// Camera framing used when the sun is searched for.
const SUN_FRAMING_ROTATION: Vec2 = Vec2::new(0.3, 0.0);
const SUN_FRAMING_DISTANCE: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SearchOutcome {
    ReleaseTracking,
    FrameSun,
    Track { planet: PlanetId, radius: f32 },
    NoMatch,
}

/// Matching is case-insensitive; planets are tried in catalog order, by id then by name.
pub(crate) fn resolve_search(query: &str, catalog: &Catalog) -> SearchOutcome {
    let query = query.to_lowercase();
    if query.chars().count() < MIN_QUERY_CHARS {
        return SearchOutcome::ReleaseTracking;
    }
    if catalog.sun.id.contains(&query) || catalog.sun.name.to_lowercase().contains(&query) {
        return SearchOutcome::FrameSun;
    }
    catalog
        .planets()
        .find(|(_, planet)| {
            planet.id.contains(&query) || planet.name.to_lowercase().contains(&query)
        })
        .map_or(SearchOutcome::NoMatch, |(planet, body)| SearchOutcome::Track {
            planet,
            radius: body.radius,
        })
}

/// Applies a search to the camera. Returns the planet now tracked, if any.
pub(crate) fn apply_search(
    outcome: SearchOutcome,
    registry: &BodyRegistry,
    settings: &OrbitCameraSettings,
    controller: &mut CameraController,
) -> Option<PlanetId> {
    match outcome {
        SearchOutcome::ReleaseTracking => {
            controller.release_tracking();
            None
        }
        SearchOutcome::FrameSun => {
            controller.frame(SUN_FRAMING_ROTATION, SUN_FRAMING_DISTANCE, settings);
            None
        }
        SearchOutcome::Track { planet, radius } => {
            let Some(entity) = registry.entity(BodyKind::Planet(planet)) else {
                warn!("Planet {planet:?} matched but was never spawned");
                return None;
            };
            controller.track(entity, radius);
            Some(planet)
        }
        SearchOutcome::NoMatch => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit_camera::components::CameraMode;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    fn registry(catalog: &Catalog) -> BodyRegistry {
        let mut registry = BodyRegistry::default();
        registry.insert("sun", BodyKind::Sun, Entity::from_raw(0));
        for (id, planet) in catalog.planets() {
            registry.insert(
                planet.id.clone(),
                BodyKind::Planet(id),
                Entity::from_raw(id.0 as u32 + 1),
            );
        }
        registry
    }

    #[test]
    fn jupiter_is_tracked_with_radius_scaled_offset() {
        let catalog = catalog();
        let registry = registry(&catalog);
        let settings = OrbitCameraSettings::default();
        let mut controller = CameraController::default();

        let outcome = resolve_search("jupiter", &catalog);
        assert_eq!(
            outcome,
            SearchOutcome::Track {
                planet: PlanetId(4),
                radius: 3.0
            }
        );
        let tracked = apply_search(outcome, &registry, &settings, &mut controller);
        assert_eq!(tracked, Some(PlanetId(4)));

        let jupiter = registry.get("jupiter").unwrap();
        assert_eq!(controller.mode(), CameraMode::Tracking(jupiter));
        assert_eq!(
            controller.tracking.unwrap().offset,
            Vec3::new(0.0, 65.0, 6.0)
        );
    }

    #[test]
    fn unmatched_long_query_keeps_tracking() {
        let catalog = catalog();
        let registry = registry(&catalog);
        let settings = OrbitCameraSettings::default();
        let mut controller = CameraController::default();
        apply_search(
            resolve_search("mars", &catalog),
            &registry,
            &settings,
            &mut controller,
        );
        let before = controller.mode();

        let outcome = resolve_search("xxx", &catalog);
        assert_eq!(outcome, SearchOutcome::NoMatch);
        apply_search(outcome, &registry, &settings, &mut controller);
        assert_eq!(controller.mode(), before);
    }

    #[test]
    fn short_query_releases_tracking() {
        let catalog = catalog();
        let registry = registry(&catalog);
        let settings = OrbitCameraSettings::default();
        let mut controller = CameraController::default();
        controller.track(registry.get("earth").unwrap(), 1.0);

        for query in ["", "x", "xx", "ju"] {
            assert_eq!(
                resolve_search(query, &catalog),
                SearchOutcome::ReleaseTracking,
                "{query:?}"
            );
        }
        apply_search(
            resolve_search("xx", &catalog),
            &registry,
            &settings,
            &mut controller,
        );
        assert_eq!(controller.mode(), CameraMode::FreeRotate);
    }

    #[test]
    fn sun_query_frames_the_sun() {
        let catalog = catalog();
        let registry = registry(&catalog);
        let settings = OrbitCameraSettings::default();
        let mut controller = CameraController::default();
        controller.track(registry.get("venus").unwrap(), 0.9);

        assert_eq!(resolve_search("SUN", &catalog), SearchOutcome::FrameSun);
        apply_search(SearchOutcome::FrameSun, &registry, &settings, &mut controller);
        assert!(!controller.is_tracking());
        assert_eq!(controller.target_rotation, Vec2::new(0.3, 0.0));
        assert_eq!(controller.distance, 30.0);
    }

    #[test]
    fn partial_query_picks_first_match_in_catalog_order() {
        let catalog = catalog();
        assert!(matches!(
            resolve_search("ear", &catalog),
            SearchOutcome::Track {
                planet: PlanetId(2),
                ..
            }
        ));
        // Both Saturn and Uranus contain "ur"; "tur" only Saturn.
        assert!(matches!(
            resolve_search("tur", &catalog),
            SearchOutcome::Track {
                planet: PlanetId(5),
                ..
            }
        ));
        assert!(matches!(
            resolve_search("NePtUnE", &catalog),
            SearchOutcome::Track {
                planet: PlanetId(7),
                ..
            }
        ));
    }

    #[test]
    fn ambiguous_query_tracks_the_earlier_planet() {
        let catalog = catalog();
        let registry = registry(&catalog);
        let settings = OrbitCameraSettings::default();
        let mut controller = CameraController::default();

        // Venus and Uranus both end in "nus"; Venus comes first.
        let outcome = resolve_search("nus", &catalog);
        assert!(matches!(
            outcome,
            SearchOutcome::Track {
                planet: PlanetId(1),
                ..
            }
        ));
        apply_search(outcome, &registry, &settings, &mut controller);
        assert_eq!(
            controller.mode(),
            CameraMode::Tracking(registry.get("venus").unwrap())
        );

        assert!(matches!(
            resolve_search("URANUS", &catalog),
            SearchOutcome::Track {
                planet: PlanetId(6),
                ..
            }
        ));
    }
}
