use crate::body::{BodyKind, PlanetId};
use crate::error::CatalogError;
use crate::orbit::CircularOrbit;
use bevy::color::Srgba;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN_CATALOG: &str = include_str!("../data/solar.system.yaml");

mod serialize_as_hex {
    use bevy::color::Srgba;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Srgba, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_hex().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Srgba, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        Srgba::hex(&hex).map_err(D::Error::custom)
    }
}

/// Reference data for one body of the system. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CelestialBody {
    pub id: String,
    pub name: String,
    pub radius: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glow_radius: Option<f32>,
    #[serde(with = "serialize_as_hex")]
    pub color: Srgba,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<CircularOrbit>,
}

/// The sun plus the planets, in declaration order.
#[derive(Debug, Clone, Deserialize, Serialize, Resource)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub sun: CelestialBody,
    pub planets: Vec<CelestialBody>,
}

impl Catalog {
    /// The dataset embedded in this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    pub fn from_yaml(input: &str) -> Result<Self, CatalogError> {
        let catalog = serde_yaml::from_str::<Self>(input)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn to_yaml(&self) -> Result<String, CatalogError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        use CatalogError::*;

        if self.sun.orbit.is_some() {
            return Err(OrbitingSun);
        }
        let mut seen = HashSet::new();
        for body in std::iter::once(&self.sun).chain(&self.planets) {
            if !seen.insert(body.id.as_str()) {
                return Err(DuplicateId(body.id.clone()));
            }
            ensure_positive(&body.id, "radius", body.radius)?;
            if let Some(glow_radius) = body.glow_radius {
                ensure_positive(&body.id, "glow radius", glow_radius)?;
            }
        }
        for planet in &self.planets {
            let orbit = planet
                .orbit
                .as_ref()
                .ok_or_else(|| MissingOrbit(planet.id.clone()))?;
            ensure_positive(&planet.id, "orbital distance", orbit.distance)?;
        }
        Ok(())
    }

    pub fn body(&self, kind: BodyKind) -> Option<&CelestialBody> {
        match kind {
            BodyKind::Sun => Some(&self.sun),
            BodyKind::Planet(id) => self.planet(id),
        }
    }

    pub fn planet(&self, PlanetId(index): PlanetId) -> Option<&CelestialBody> {
        self.planets.get(index)
    }

    pub fn planets(&self) -> impl Iterator<Item = (PlanetId, &CelestialBody)> {
        self.planets
            .iter()
            .enumerate()
            .map(|(index, body)| (PlanetId(index), body))
    }
}

fn ensure_positive(id: &str, field: &'static str, value: f32) -> Result<(), CatalogError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NonPositive {
            id: id.to_string(),
            field,
            value,
        })
    }
}
