use thiserror::Error;

use crate::face::Face;

/// The cube's geometry does not support the requested query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// No piece sits at the center of a face.
    #[error("center piece not found for {0} face")]
    MissingCenter(Face),
    /// A face resolved to zero pieces, usually because the model is not
    /// loaded.
    #[error("no pieces found for {0} face")]
    NoPieces(Face),
}

/// Error produced by a queued rotation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// The request was dropped by a reset before it finished.
    #[error("rotation cancelled by reset")]
    Cancelled,
    /// The request arrived while a reset was in progress.
    #[error("cube is resetting")]
    Resetting,
}

/// Error produced when executing a single move token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("unknown move: {0:?}")]
    UnknownMove(String),
    #[error(transparent)]
    Rotation(#[from] RotationError),
}

/// Error produced when loading or saving the cube model.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model asset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model has no node named {0:?}")]
    MissingNode(&'static str),
    #[error("expected {expected} pieces, found {found}")]
    PieceCount { expected: usize, found: usize },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
