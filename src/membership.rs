//! Which pieces are on which face, worked out from where they are.
//!
//! Nothing here is cached. A whole-cube turn moves the center pieces, so the
//! answer is only valid for the positions it was computed from.

use strum::IntoEnumIterator;

use crate::error::GeometryError;
use crate::face::{Face, FaceMap};
use crate::model::{CubeModel, PieceId};

/// Maximum distance along an axis for two pieces to share a layer.
///
/// Must stay below half the layer spacing so a piece can never match two
/// layers.
pub const FACE_TOLERANCE: f32 = 0.1;

/// Finds the center piece of each face.
///
/// A center sits within [`FACE_TOLERANCE`] of the cube center on two axes and
/// beyond it, on the face's side, on the third.
pub fn find_center_pieces(model: &CubeModel) -> Result<FaceMap<PieceId>, GeometryError> {
    let center = model.center();
    let mut found: FaceMap<Option<PieceId>> = FaceMap::default();

    for id in 0..model.pieces().len() {
        let offset = model.world_position(id) - center;
        for face in Face::iter() {
            let axis = face.axis();
            let along = axis.component(offset) * if face.is_positive() { 1.0 } else { -1.0 };
            let off_axis_centered = (offset - axis.unit() * axis.component(offset))
                .abs()
                .max_element()
                < FACE_TOLERANCE;
            if off_axis_centered && along > FACE_TOLERANCE {
                match found[face] {
                    Some(existing) => log::warn!(
                        "pieces {existing} and {id} both look like the {face} center; keeping {existing}"
                    ),
                    None => found[face] = Some(id),
                }
            }
        }
    }

    let mut centers = FaceMap::default();
    for face in Face::iter() {
        centers[face] = found[face].ok_or(GeometryError::MissingCenter(face))?;
    }
    Ok(centers)
}

/// Lists the pieces currently on each face.
///
/// A piece is on a face when its world coordinate along the face's axis is
/// within [`FACE_TOLERANCE`] of the face center's. Faces without a known
/// center resolve to no pieces.
pub fn identify_face_pieces(model: &CubeModel) -> FaceMap<Vec<PieceId>> {
    let mut face_pieces: FaceMap<Vec<PieceId>> = FaceMap::default();
    let Some(centers) = model.center_pieces() else {
        for face in Face::iter() {
            log::error!("{}", GeometryError::MissingCenter(face));
        }
        return face_pieces;
    };

    let positions: Vec<_> = (0..model.pieces().len())
        .map(|id| model.world_position(id))
        .collect();

    for face in Face::iter().filter(|face| face.is_positive()) {
        let axis = face.axis();
        let here = axis.component(positions[centers[face]]);
        let there = axis.component(positions[centers[face.opposite()]]);
        if (here - there).abs() < FACE_TOLERANCE {
            log::error!(
                "{face} and {} centers coincide; face membership is unreliable",
                face.opposite()
            );
        }
    }

    for face in Face::iter() {
        let axis = face.axis();
        let layer = axis.component(positions[centers[face]]);
        face_pieces[face] = positions
            .iter()
            .enumerate()
            .filter(|(_, position)| (axis.component(**position) - layer).abs() < FACE_TOLERANCE)
            .map(|(id, _)| id)
            .collect();
    }

    face_pieces
}
