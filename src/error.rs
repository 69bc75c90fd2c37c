use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("No curve `{0}` in lookup tables")]
    MissingCurve(String),
    #[error("No surface `{0}` in lookup tables")]
    MissingSurface(String),
    #[error("Curve has no points")]
    EmptyCurve,
    #[error("Curve has several points at x = {0}")]
    DuplicatePoint(f64),
    #[error("Surface has {found} values, expected {expected}")]
    SurfaceShape { found: usize, expected: usize },
    #[error("Need at least {min} nodes or bin edges, got {found}")]
    TooFewNodes { min: usize, found: usize },
    #[error("Nodes and bin edges must be finite and strictly increasing")]
    NotIncreasing,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
