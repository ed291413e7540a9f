//! Rigid transforms and re-parenting of pieces between coordinate spaces.
//!
//! A piece's transform is always stored relative to its current parent. Moving
//! a piece onto a pivot and back rewrites that local transform so the piece's
//! world transform is the same before and after the move; whatever the pivot
//! did in between is what sticks.

use glam::{Quat, Vec3};

use crate::model::{CubeModel, Parent, PieceId};

/// A rotation followed by a translation. Scale is not supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Composes `self` (parent) with `child`, giving the child's transform in
    /// the parent's parent space.
    pub fn then_child(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.translation + self.rotation * child.translation,
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// Expresses a world-space transform relative to this frame.
    ///
    /// Local position is the world offset from the frame origin rotated by
    /// the frame's inverse rotation; local orientation is the inverse frame
    /// rotation premultiplied onto the world orientation.
    pub fn relative(&self, world: &Transform) -> Transform {
        let inverse = self.rotation.inverse();
        Transform {
            translation: inverse * (world.translation - self.translation),
            rotation: (inverse * world.rotation).normalize(),
        }
    }

    /// Whether two transforms describe the same pose within `epsilon`.
    ///
    /// `q` and `-q` are the same orientation, so the rotations are compared
    /// by the absolute value of their dot product.
    pub fn abs_diff_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, epsilon)
            && (1.0 - self.rotation.dot(other.rotation).abs()) <= epsilon
    }
}

/// Moves `piece` onto `pivot` without changing its world transform.
pub fn attach(model: &mut CubeModel, piece: PieceId, pivot: Parent) {
    reparent(model, piece, pivot);
}

/// Moves `piece` from `pivot` back into the static cube frame without
/// changing its world transform.
///
/// A piece that is not on `pivot` is left alone.
pub fn detach(model: &mut CubeModel, piece: PieceId, pivot: Parent) {
    let current = model.piece(piece).parent;
    if current != pivot {
        log::warn!("piece {piece} is on {current:?}, not {pivot:?}; leaving it in place");
        return;
    }
    reparent(model, piece, Parent::Static);
}

fn reparent(model: &mut CubeModel, piece: PieceId, new_parent: Parent) {
    let world = model.world_transform(piece);
    let parent_world = model.parent_world(new_parent);
    let piece = model.piece_mut(piece);
    piece.parent = new_parent;
    piece.local = parent_world.relative(&world);
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;
    use crate::asset::{GeneratedCube, ModelLoader};
    use crate::face::Face;

    fn model() -> CubeModel {
        let asset = GeneratedCube::default().load().unwrap();
        CubeModel::from_asset(&asset).unwrap()
    }

    #[test]
    fn test_relative_inverts_composition() {
        let frame = Transform::new(
            Vec3::new(1.0, -2.0, 0.5),
            Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3),
        );
        let world = Transform::new(Vec3::new(3.0, 1.0, -1.0), Quat::from_rotation_z(1.1));
        let local = frame.relative(&world);
        assert!(frame.then_child(&local).abs_diff_eq(&world, 1e-5));
    }

    #[test]
    fn test_attach_preserves_world_transform() {
        let mut model = model();
        model.pivot_mut(Parent::FacePivot(Face::Right)).unwrap().rotation = Quat::from_rotation_x(0.4);
        for piece in 0..model.pieces().len() {
            let before = model.world_transform(piece);
            attach(&mut model, piece, Parent::FacePivot(Face::Right));
            assert_eq!(model.piece(piece).parent, Parent::FacePivot(Face::Right));
            assert!(model.world_transform(piece).abs_diff_eq(&before, 1e-5));
        }
    }

    #[test]
    fn test_rotation_sticks_after_detach() {
        let mut model = model();
        let piece = 26; // (+1, +1, +1)
        attach(&mut model, piece, Parent::CubePivot);
        model.pivot_mut(Parent::CubePivot).unwrap().rotation = Quat::from_rotation_y(FRAC_PI_2);
        let carried = model.world_transform(piece);
        detach(&mut model, piece, Parent::CubePivot);
        model.pivot_mut(Parent::CubePivot).unwrap().rotation = Quat::IDENTITY;

        assert_eq!(model.piece(piece).parent, Parent::Static);
        assert!(model.world_transform(piece).abs_diff_eq(&carried, 1e-5));
        assert!(model
            .world_position(piece)
            .abs_diff_eq(Vec3::new(1.0, 1.0, -1.0), 1e-5));
    }

    #[test]
    fn test_detach_from_wrong_pivot_is_ignored() {
        let mut model = model();
        attach(&mut model, 0, Parent::FacePivot(Face::Left));
        detach(&mut model, 0, Parent::CubePivot);
        assert_eq!(model.piece(0).parent, Parent::FacePivot(Face::Left));
    }
}
