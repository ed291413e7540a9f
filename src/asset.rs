//! Cube model assets: the node hierarchy a model source provides, and how
//! pieces are pulled out of it.
//!
//! Hierarchy expected by [`extract_pieces`]:
//! - any number of wrapper nodes above a node named `Cube`
//! - `Cube` → collections → pieces
//! - children named `square` are sticker decorations, not pieces
//!
//! On disk the hierarchy is JSON: each node is
//! `{ "name", "translation": [x, y, z], "rotation": [x, y, z, w], "children" }`
//! with translation and rotation optional.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::geometry::Transform;

/// Name of the node whose grandchildren are the pieces.
pub const CUBE_NODE: &str = "Cube";
/// Name reserved for decorative sub-meshes.
pub const DECORATION_NAME: &str = "square";
/// Pieces in a 3x3x3 cube, including the hidden core.
pub const PIECE_COUNT: usize = 27;

/// One node of a model hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetNode {
    pub name: String,
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "identity_rotation")]
    pub rotation: [f32; 4],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AssetNode>,
}

fn identity_rotation() -> [f32; 4] {
    Quat::IDENTITY.to_array()
}

impl AssetNode {
    pub fn new(name: impl Into<String>, translation: Vec3) -> Self {
        Self {
            name: name.into(),
            translation: translation.to_array(),
            rotation: identity_rotation(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<AssetNode>) -> Self {
        self.children = children;
        self
    }

    /// Transform relative to the parent node.
    pub fn transform(&self) -> Transform {
        Transform::new(
            Vec3::from_array(self.translation),
            Quat::from_array(self.rotation).normalize(),
        )
    }
}

/// Supplies the cube's node hierarchy, at startup and on every reset.
pub trait ModelLoader {
    fn load(&self) -> Result<AssetNode, LoadError>;
}

/// Builds a standard cube procedurally, one unit of `spacing` between layers.
#[derive(Debug, Clone, Copy)]
pub struct GeneratedCube {
    pub spacing: f32,
}

impl Default for GeneratedCube {
    fn default() -> Self {
        Self { spacing: 1.0 }
    }
}

impl ModelLoader for GeneratedCube {
    fn load(&self) -> Result<AssetNode, LoadError> {
        let mut collections = Vec::with_capacity(PIECE_COUNT);
        // x-major order, so piece id = (x + 1) * 9 + (y + 1) * 3 + (z + 1)
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    let cell = Vec3::new(x as f32, y as f32, z as f32);
                    let index = collections.len();
                    let mut children = vec![AssetNode::new(format!("cubelet_{index:02}"), Vec3::ZERO)];
                    // one sticker per outward face
                    for normal in [Vec3::X, Vec3::Y, Vec3::Z] {
                        let side = cell.dot(normal);
                        if side != 0.0 {
                            children.push(AssetNode::new(DECORATION_NAME, normal * side * 0.5));
                        }
                    }
                    collections.push(
                        AssetNode::new(format!("collection_{index:02}"), cell * self.spacing)
                            .with_children(children),
                    );
                }
            }
        }

        let cube = AssetNode::new(CUBE_NODE, Vec3::ZERO).with_children(collections);
        Ok(AssetNode::new("Scene", Vec3::ZERO).with_children(vec![cube]))
    }
}

/// Reads a model hierarchy from a JSON file.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub path: PathBuf,
}

impl AssetFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelLoader for AssetFile {
    fn load(&self) -> Result<AssetNode, LoadError> {
        let file = File::open(&self.path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Writes a model hierarchy as pretty-printed JSON.
pub fn save(path: &std::path::Path, root: &AssetNode) -> Result<(), LoadError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), root)?;
    Ok(())
}

/// A piece found in the hierarchy, positioned relative to the cube frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSeed {
    pub name: String,
    pub local: Transform,
}

/// Result of [`extract_pieces`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedModel {
    /// World transform of the `Cube` node.
    pub frame: Transform,
    pub pieces: Vec<PieceSeed>,
}

/// Pulls the pieces out of a model hierarchy.
///
/// The first node named [`CUBE_NODE`] (depth first) becomes the static
/// frame. Every grandchild of it that is not a decoration is a piece.
pub fn extract_pieces(root: &AssetNode) -> Result<ExtractedModel, LoadError> {
    let (cube, frame) = find_node(root, CUBE_NODE, Transform::IDENTITY)
        .ok_or(LoadError::MissingNode(CUBE_NODE))?;

    let pieces: Vec<PieceSeed> = cube
        .children
        .iter()
        .flat_map(|collection| {
            let collection_transform = collection.transform();
            collection
                .children
                .iter()
                .filter(|child| child.name != DECORATION_NAME)
                .map(move |child| PieceSeed {
                    name: child.name.clone(),
                    local: collection_transform.then_child(&child.transform()),
                })
        })
        .collect();

    if pieces.len() != PIECE_COUNT {
        return Err(LoadError::PieceCount {
            expected: PIECE_COUNT,
            found: pieces.len(),
        });
    }

    Ok(ExtractedModel { frame, pieces })
}

/// Depth-first search for a node by name, accumulating its world transform.
fn find_node<'a>(
    node: &'a AssetNode,
    name: &str,
    parent_world: Transform,
) -> Option<(&'a AssetNode, Transform)> {
    let world = parent_world.then_child(&node.transform());
    if node.name == name {
        return Some((node, world));
    }
    node.children
        .iter()
        .find_map(|child| find_node(child, name, world))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cube_has_27_pieces() {
        let root = GeneratedCube::default().load().unwrap();
        let extracted = extract_pieces(&root).unwrap();
        assert_eq!(extracted.pieces.len(), PIECE_COUNT);
        assert_eq!(extracted.frame, Transform::IDENTITY);
        // x-major ordering
        assert_eq!(extracted.pieces[0].local.translation, Vec3::new(-1.0, -1.0, -1.0));
        assert_eq!(extracted.pieces[13].local.translation, Vec3::ZERO);
        assert_eq!(extracted.pieces[26].local.translation, Vec3::ONE);
        assert!(extracted.pieces.iter().all(|p| p.name != DECORATION_NAME));
    }

    #[test]
    fn test_spacing_scales_positions() {
        let root = GeneratedCube { spacing: 2.0 }.load().unwrap();
        let extracted = extract_pieces(&root).unwrap();
        assert_eq!(extracted.pieces[26].local.translation, Vec3::splat(2.0));
    }

    #[test]
    fn test_missing_cube_node() {
        let root = AssetNode::new("Scene", Vec3::ZERO);
        assert!(matches!(
            extract_pieces(&root),
            Err(LoadError::MissingNode(CUBE_NODE))
        ));
    }

    #[test]
    fn test_wrong_piece_count() {
        let mut root = GeneratedCube::default().load().unwrap();
        root.children[0].children.pop();
        assert!(matches!(
            extract_pieces(&root),
            Err(LoadError::PieceCount {
                expected: 27,
                found: 26
            })
        ));
    }

    #[test]
    fn test_frame_accumulates_wrapper_transforms() {
        let mut root = GeneratedCube::default().load().unwrap();
        root.translation = [0.0, 3.0, 0.0];
        let extracted = extract_pieces(&root).unwrap();
        assert_eq!(extracted.frame.translation, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn test_json_defaults() {
        let node: AssetNode = serde_json::from_str(r#"{ "name": "Cube" }"#).unwrap();
        assert_eq!(node.transform(), Transform::IDENTITY);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("rubik-asset-{}.json", std::process::id()));
        let root = GeneratedCube::default().load().unwrap();
        save(&path, &root).unwrap();
        let loaded = AssetFile::new(&path).load().unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, root);
    }
}
