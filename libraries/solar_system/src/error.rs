use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("The sun cannot orbit anything")]
    OrbitingSun,
    #[error("Planet {0:?} has no orbit")]
    MissingOrbit(String),
    #[error("Duplicate body identifier: {0:?}")]
    DuplicateId(String),
    #[error("Body {id:?} has a non-positive {field}: {value}")]
    NonPositive {
        id: String,
        field: &'static str,
        value: f32,
    },
}
