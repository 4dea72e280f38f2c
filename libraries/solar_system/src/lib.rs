use bevy::app::PluginGroupBuilder;
use bevy::prelude::*;

pub mod body;
pub mod catalog;
pub mod error;
pub mod orbit;
pub mod scene;
pub mod sun;

pub use catalog::{Catalog, CelestialBody};

pub struct SolarSystemPlugin {
    pub catalog: Catalog,
    pub seed: u64,
    pub draw_orbits: bool,
}

impl SolarSystemPlugin {
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        Self {
            catalog,
            seed,
            draw_orbits: true,
        }
    }
}

impl PluginGroup for SolarSystemPlugin {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::start::<Self>()
            .add(body::BodyPlugin)
            .add(orbit::OrbitPlugin {
                draw_orbits: self.draw_orbits,
            })
            .add(sun::SunPlugin)
            .add(scene::PlanetScenePlugin {
                catalog: self.catalog,
                seed: self.seed,
            })
    }
}
