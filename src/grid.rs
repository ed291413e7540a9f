//! Text report of which piece sits in which cell of the 3x3x3 grid.
//!
//! Pieces are labelled by id: `0-9`, then `A-Q`. The grid is shown as three
//! z-slices side by side (back to front), rows from top (y = +1) to bottom,
//! x increasing left to right.

use glam::Vec3;

use crate::face::Face;
use crate::model::{CubeModel, PieceId};

/// Cells per axis.
const DIM: usize = 3;

/// Label for an empty cell.
const EMPTY: char = '.';
/// Label for a cell claimed by more than one piece.
const CROWDED: char = '*';

/// Single-character label for a piece.
pub fn label(id: PieceId) -> char {
    match id {
        0..=9 => char::from(b'0' + id as u8),
        10..=35 => char::from(b'A' + (id - 10) as u8),
        _ => '#',
    }
}

/// Grid cell a world position falls in, relative to the cube center, or
/// `None` if it is off the grid.
fn cell(offset: Vec3, spacing: f32) -> Option<[usize; 3]> {
    let mut cell = [0; 3];
    for (slot, value) in cell.iter_mut().zip(offset.to_array()) {
        let index = (value / spacing).round() as i32 + 1;
        if !(0..DIM as i32).contains(&index) {
            return None;
        }
        *slot = index as usize;
    }
    Some(cell)
}

/// Distance between layers, measured from the cube center to the front
/// center piece. Falls back to 1.0 when no centers are known.
pub fn layer_spacing(model: &CubeModel) -> f32 {
    model
        .center_pieces()
        .map(|centers| model.world_position(centers[Face::Front]).distance(model.center()))
        .filter(|spacing| *spacing > 0.0)
        .unwrap_or(1.0)
}

/// Builds the `[x][y][z]` label grid for the current model.
///
/// Pieces off the grid are skipped and logged.
pub fn state_to_grid(model: &CubeModel, spacing: f32) -> [[[char; DIM]; DIM]; DIM] {
    let mut grid = [[[EMPTY; DIM]; DIM]; DIM];
    let center = model.center();
    for id in 0..model.pieces().len() {
        let position = model.world_position(id);
        let Some([x, y, z]) = cell(position - center, spacing) else {
            log::warn!("piece {id} at {position} is off the grid");
            continue;
        };
        let slot = &mut grid[x][y][z];
        *slot = if *slot == EMPTY { label(id) } else { CROWDED };
    }
    grid
}

/// Formats the current model as three z-slices side by side.
pub fn format_state(model: &CubeModel, spacing: f32) -> String {
    let grid = state_to_grid(model, spacing);

    let mut output = String::new();
    let header: Vec<String> = (0..DIM)
        .map(|z| format!("z={:+}", z as i32 - 1))
        .collect();
    output.push_str(&header.join(" "));
    output.push('\n');

    for y in (0..DIM).rev() {
        let row: Vec<String> = (0..DIM)
            .map(|z| (0..DIM).map(|x| grid[x][y][z]).collect())
            .collect();
        output.push_str(&row.join("  "));
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{GeneratedCube, ModelLoader};

    #[test]
    fn test_labels() {
        assert_eq!(label(0), '0');
        assert_eq!(label(9), '9');
        assert_eq!(label(10), 'A');
        assert_eq!(label(26), 'Q');
    }

    #[test]
    fn test_solved_layout() {
        let asset = GeneratedCube::default().load().unwrap();
        let model = CubeModel::from_asset(&asset).unwrap();
        let expected = "\
z=-1 z=+0 z=+1
6FO  7GP  8HQ
3CL  4DM  5EN
09I  1AJ  2BK
";
        assert_eq!(format_state(&model, 1.0), expected);
    }

    #[test]
    fn test_layer_spacing_follows_model() {
        let asset = GeneratedCube { spacing: 2.0 }.load().unwrap();
        let model = CubeModel::from_asset(&asset).unwrap();
        assert!((layer_spacing(&model) - 2.0).abs() < 1e-6);
        assert_eq!(layer_spacing(&CubeModel::empty()), 1.0);
        assert!(format_state(&model, 2.0).contains("09I"));
    }

    #[test]
    fn test_off_grid_positions() {
        assert_eq!(cell(Vec3::new(1.0, 0.0, -1.0), 1.0), Some([2, 1, 0]));
        assert_eq!(cell(Vec3::new(0.96, 0.04, -1.02), 1.0), Some([2, 1, 0]));
        assert_eq!(cell(Vec3::new(2.0, 0.0, 0.0), 1.0), None);
        assert_eq!(cell(Vec3::new(4.0, 0.0, -4.0), 2.0), None);
    }
}
