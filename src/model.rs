//! The cube's mutable scene state: pieces, pivots and center pieces.
//!
//! Everything a rotation touches lives in one [`CubeModel`]. Resetting the
//! cube throws the whole model away and builds a new one from the loader.

use glam::{Quat, Vec3};
use strum::IntoEnumIterator;

use crate::asset::{extract_pieces, AssetNode};
use crate::error::{GeometryError, LoadError};
use crate::face::{Face, FaceMap};
use crate::geometry::Transform;
use crate::membership;

/// Index of a piece in [`CubeModel::pieces`]. Stable for the model's lifetime.
pub type PieceId = usize;

/// Distance from the cube center to each face pivot.
pub const PIVOT_OFFSET: f32 = 1.0;

/// Where a piece is currently parented.
///
/// A piece has exactly one parent, so it can never be on two pivots at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    /// The permanent cube frame.
    Static,
    FacePivot(Face),
    CubePivot,
}

/// One of the 27 sub-cubes.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub name: String,
    pub parent: Parent,
    /// Transform relative to `parent`.
    pub local: Transform,
}

/// A transient grouping node used to turn a set of pieces together.
///
/// Pivots hang directly off the world and have zero rotation whenever no
/// turn is in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pivot {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pivot {
    fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn world(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }
}

/// The complete geometric state of the cube.
#[derive(Debug, Clone)]
pub struct CubeModel {
    pieces: Vec<Piece>,
    /// World transform of the static cube frame.
    frame: Transform,
    face_pivots: FaceMap<Pivot>,
    cube_pivot: Pivot,
    center_pieces: Option<FaceMap<PieceId>>,
}

impl CubeModel {
    /// A model with no pieces, used when loading fails.
    pub fn empty() -> Self {
        Self {
            pieces: Vec::new(),
            frame: Transform::IDENTITY,
            face_pivots: FaceMap::from_fn(|face| Pivot::at(face.normal() * PIVOT_OFFSET)),
            cube_pivot: Pivot::at(Vec3::ZERO),
            center_pieces: None,
        }
    }

    /// Builds a model from a loaded asset hierarchy.
    ///
    /// Every piece starts in the static frame. Fails if the hierarchy does not
    /// contain exactly one cube of 27 pieces with a center on every face.
    pub fn from_asset(root: &AssetNode) -> Result<Self, LoadError> {
        let extracted = extract_pieces(root)?;
        let mut model = Self::empty();
        model.frame = extracted.frame;
        model.pieces = extracted
            .pieces
            .into_iter()
            .map(|seed| Piece {
                name: seed.name,
                parent: Parent::Static,
                local: seed.local,
            })
            .collect();
        model.refresh_center_pieces()?;
        model.position_face_pivots();
        Ok(model)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id]
    }

    /// World position of the cube's center.
    pub fn center(&self) -> Vec3 {
        self.frame.translation
    }

    pub fn face_pivot(&self, face: Face) -> &Pivot {
        &self.face_pivots[face]
    }

    pub fn cube_pivot(&self) -> &Pivot {
        &self.cube_pivot
    }

    /// Returns the pivot behind `parent`, or `None` for the static frame.
    pub(crate) fn pivot_mut(&mut self, parent: Parent) -> Option<&mut Pivot> {
        match parent {
            Parent::Static => None,
            Parent::FacePivot(face) => Some(&mut self.face_pivots[face]),
            Parent::CubePivot => Some(&mut self.cube_pivot),
        }
    }

    pub fn center_pieces(&self) -> Option<&FaceMap<PieceId>> {
        self.center_pieces.as_ref()
    }

    /// World transform of a parent space.
    pub fn parent_world(&self, parent: Parent) -> Transform {
        match parent {
            Parent::Static => self.frame,
            Parent::FacePivot(face) => self.face_pivots[face].world(),
            Parent::CubePivot => self.cube_pivot.world(),
        }
    }

    pub fn world_transform(&self, id: PieceId) -> Transform {
        let piece = &self.pieces[id];
        self.parent_world(piece.parent).then_child(&piece.local)
    }

    pub fn world_position(&self, id: PieceId) -> Vec3 {
        self.world_transform(id).translation
    }

    /// Re-finds the center piece of every face from current positions.
    ///
    /// On failure the previous center pieces are cleared.
    pub fn refresh_center_pieces(&mut self) -> Result<(), GeometryError> {
        self.center_pieces = None;
        self.center_pieces = Some(membership::find_center_pieces(self)?);
        Ok(())
    }

    /// Puts every face pivot back at its face's offset with zero rotation.
    pub fn position_face_pivots(&mut self) {
        let center = self.center();
        for face in Face::iter() {
            self.face_pivots[face] = Pivot::at(center + face.normal() * PIVOT_OFFSET);
        }
        self.cube_pivot = Pivot::at(center);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{GeneratedCube, ModelLoader};

    #[test]
    fn test_generated_model_starts_static() {
        let asset = GeneratedCube::default().load().unwrap();
        let model = CubeModel::from_asset(&asset).unwrap();
        assert_eq!(model.pieces().len(), 27);
        assert!(model.pieces().iter().all(|p| p.parent == Parent::Static));
        assert_eq!(model.face_pivot(Face::Up).position, Vec3::Y);
        assert_eq!(model.face_pivot(Face::Left).position, -Vec3::X);
        assert_eq!(model.cube_pivot().rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_centers_found_on_load() {
        let asset = GeneratedCube::default().load().unwrap();
        let model = CubeModel::from_asset(&asset).unwrap();
        let centers = model.center_pieces().unwrap();
        assert!(model
            .world_position(centers[Face::Front])
            .abs_diff_eq(Vec3::Z, 1e-6));
        assert!(model
            .world_position(centers[Face::Down])
            .abs_diff_eq(-Vec3::Y, 1e-6));
    }

    #[test]
    fn test_empty_model_has_no_centers() {
        let model = CubeModel::empty();
        assert!(model.pieces().is_empty());
        assert!(model.center_pieces().is_none());
    }
}
