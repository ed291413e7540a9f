//! Rubik's Cube State and Rotation Engine
//!
//! Tracks which of the 27 pieces sit on which face, turns faces and the
//! whole cube through a single animated queue, and runs move-notation
//! algorithms forwards and backwards. Rendering is left to the caller, which
//! reads [`Cube::piece_transforms`] every frame.

pub mod anim;
pub mod asset;
pub mod catalog;
pub mod config;
pub mod cube;
pub mod engine;
pub mod error;
pub mod face;
pub mod geometry;
pub mod grid;
pub mod membership;
pub mod model;
pub mod notation;

pub use config::CubeConfig;
pub use cube::{Cube, Playback};
pub use error::{GeometryError, LoadError, MoveError, RotationError};
pub use face::{Axis, Direction, Face};
