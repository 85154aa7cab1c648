//! Common primitives shared by the levelmesh pipeline crates
//!
//! Everything here is pure 2D geometry: value types, predicates, and the
//! error taxonomy used across the workspace.

mod geometry;
mod math;
mod shapes;

pub use geometry::*;
pub use math::*;
pub use shapes::*;

/// Represents a 2D position
pub type Vec2 = glam::Vec2;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("triangulation failed: {0}")]
    Triangulation(String),

    #[error("mesh construction failed: {0}")]
    MeshBuild(String),

    #[error("capacity exceeded: {0}")]
    ResourceExhaustion(String),

    #[error("polygon clipping failed: {0}")]
    Clipping(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for levelmesh operations
pub type Result<T> = std::result::Result<T, Error>;
