//! Cube move notation.
//!
//! Singmaster face letters, whole-cube rotations, lowercase double-layer
//! turns and the `M E S` slices, each optionally followed by `2` (half turn)
//! or `'` (counter-clockwise).
//!
//! | Letters       | Turns                                                  |
//! |---------------|--------------------------------------------------------|
//! | `U D F B L R` | that face                                              |
//! | `x y z`       | whole cube, following `R`, `U`, `F`                    |
//! | `u d l r f b` | whole cube except the opposite face                    |
//! | `M E S`       | whole cube except the two outer layers; follow L, D, F |

use std::fmt;
use std::str::FromStr;

use crate::engine::RotationKind;
use crate::error::MoveError;
use crate::face::{Axis, Direction, Face};

/// Which layers a move turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layers {
    /// A single outer face.
    Face(Face),
    /// The whole cube.
    Whole(Axis),
    /// Everything except the face opposite the given one.
    Wide(Face),
    /// The middle layer between two faces.
    Slice(Slice),
}

/// The three middle slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slice {
    /// Between left and right; turns like `L`.
    M,
    /// Between up and down; turns like `D`.
    E,
    /// Between front and back; turns like `F`.
    S,
}

impl Slice {
    /// The face whose turning direction this slice follows.
    pub fn reference_face(self) -> Face {
        match self {
            Slice::M => Face::Left,
            Slice::E => Face::Down,
            Slice::S => Face::Front,
        }
    }
}

/// Letter table.
const LETTERS: &[(char, Layers)] = &[
    ('U', Layers::Face(Face::Up)),
    ('D', Layers::Face(Face::Down)),
    ('F', Layers::Face(Face::Front)),
    ('B', Layers::Face(Face::Back)),
    ('L', Layers::Face(Face::Left)),
    ('R', Layers::Face(Face::Right)),
    ('x', Layers::Whole(Axis::X)),
    ('y', Layers::Whole(Axis::Y)),
    ('z', Layers::Whole(Axis::Z)),
    ('u', Layers::Wide(Face::Up)),
    ('d', Layers::Wide(Face::Down)),
    ('f', Layers::Wide(Face::Front)),
    ('b', Layers::Wide(Face::Back)),
    ('l', Layers::Wide(Face::Left)),
    ('r', Layers::Wide(Face::Right)),
    ('M', Layers::Slice(Slice::M)),
    ('E', Layers::Slice(Slice::E)),
    ('S', Layers::Slice(Slice::S)),
];

/// Suffix table: `(suffix, direction, turns)`.
const SUFFIXES: &[(&str, Direction, u8)] = &[
    ("", Direction::Clockwise, 1),
    ("'", Direction::CounterClockwise, 1),
    ("2", Direction::Clockwise, 2),
    ("2'", Direction::CounterClockwise, 2),
];

/// A single parsed move token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub layers: Layers,
    pub direction: Direction,
    /// 1 or 2.
    pub turns: u8,
}

impl Move {
    /// Returns the move that undoes this one. Half turns undo themselves.
    pub fn inverse(self) -> Self {
        if self.turns == 2 {
            self
        } else {
            Self {
                direction: self.direction.flip(),
                ..self
            }
        }
    }

    /// Rotation engine request that performs this move.
    pub fn rotation(self) -> RotationKind {
        let (reference, exclude) = match self.layers {
            Layers::Face(face) => {
                return RotationKind::Face {
                    face,
                    direction: self.direction,
                    turns: self.turns,
                }
            }
            Layers::Whole(axis) => {
                return RotationKind::Cube {
                    axis,
                    direction: self.direction,
                    turns: self.turns,
                    exclude: Vec::new(),
                }
            }
            Layers::Wide(face) => (face, vec![face.opposite()]),
            Layers::Slice(slice) => {
                let face = slice.reference_face();
                (face, vec![face, face.opposite()])
            }
        };
        RotationKind::Cube {
            axis: reference.axis(),
            direction: reference.axis_direction(self.direction),
            turns: self.turns,
            exclude,
        }
    }

    fn letter(self) -> char {
        LETTERS
            .iter()
            .find(|(_, layers)| *layers == self.layers)
            .map_or('?', |(letter, _)| *letter)
    }
}

impl FromStr for Move {
    type Err = MoveError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || MoveError::UnknownMove(token.to_owned());
        let mut chars = token.chars();
        let letter = chars.next().ok_or_else(unknown)?;
        let suffix = chars.as_str();

        let (_, layers) = LETTERS
            .iter()
            .find(|(c, _)| *c == letter)
            .ok_or_else(unknown)?;
        let (_, direction, turns) = SUFFIXES
            .iter()
            .find(|(s, _, _)| *s == suffix)
            .ok_or_else(unknown)?;

        Ok(Move {
            layers: *layers,
            direction: *direction,
            turns: *turns,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;
        if self.turns == 2 {
            write!(f, "2")?;
        }
        if self.direction == Direction::CounterClockwise {
            write!(f, "'")?;
        }
        Ok(())
    }
}

/// Splits a sequence into tokens on any whitespace.
pub fn tokens(sequence: &str) -> impl DoubleEndedIterator<Item = &str> {
    sequence.split_whitespace()
}

/// Inverts a single token textually.
///
/// Tokens containing `2` are their own inverse; otherwise the `'` is toggled.
/// Works on tokens the parser would reject, too.
pub fn invert_token(token: &str) -> String {
    if token.contains('2') {
        token.to_owned()
    } else if token.contains('\'') {
        token.replacen('\'', "", 1)
    } else {
        format!("{token}'")
    }
}

/// Reverses a sequence and inverts every token.
pub fn invert_sequence(sequence: &str) -> String {
    let inverted: Vec<String> = tokens(sequence).rev().map(invert_token).collect();
    inverted.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;

    fn parse(token: &str) -> Move {
        token.parse().unwrap()
    }

    #[test]
    fn test_parse_face_turns() {
        assert_eq!(
            parse("R"),
            Move {
                layers: Layers::Face(Face::Right),
                direction: Direction::Clockwise,
                turns: 1
            }
        );
        assert_eq!(parse("U'").direction, Direction::CounterClockwise);
        assert_eq!(parse("F2").turns, 2);
        assert_eq!(parse("M2'").turns, 2);
    }

    #[test]
    fn test_unknown_tokens() {
        for token in ["", "Q", "R3", "R''", "U2x", "'"] {
            assert_eq!(
                token.parse::<Move>(),
                Err(MoveError::UnknownMove(token.to_owned())),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_display_round_trips_every_letter() {
        for (letter, _) in LETTERS {
            for suffix in ["", "'", "2"] {
                let token = format!("{letter}{suffix}");
                assert_eq!(parse(&token).to_string(), token);
            }
        }
    }

    #[test]
    fn test_move_inverse() {
        assert_eq!(parse("R").inverse(), parse("R'"));
        assert_eq!(parse("r'").inverse(), parse("r"));
        assert_eq!(parse("M2").inverse(), parse("M2"));
    }

    #[test]
    fn test_wide_moves_exclude_opposite_face() {
        assert_eq!(
            parse("u").rotation(),
            RotationKind::Cube {
                axis: Axis::Y,
                direction: Direction::Clockwise,
                turns: 1,
                exclude: vec![Face::Down],
            }
        );
        // d turns like D: counter-clockwise seen from +y
        assert_eq!(
            parse("d").rotation(),
            RotationKind::Cube {
                axis: Axis::Y,
                direction: Direction::CounterClockwise,
                turns: 1,
                exclude: vec![Face::Up],
            }
        );
    }

    #[test]
    fn test_slice_moves_exclude_both_outer_faces() {
        assert_eq!(
            parse("M'").rotation(),
            RotationKind::Cube {
                axis: Axis::X,
                direction: Direction::Clockwise,
                turns: 1,
                exclude: vec![Face::Left, Face::Right],
            }
        );
        assert_eq!(
            parse("S").rotation(),
            RotationKind::Cube {
                axis: Axis::Z,
                direction: Direction::Clockwise,
                turns: 1,
                exclude: vec![Face::Front, Face::Back],
            }
        );
    }

    #[test]
    fn test_whole_cube_follows_reference_faces() {
        assert_eq!(
            parse("x").rotation(),
            RotationKind::Cube {
                axis: Axis::X,
                direction: Direction::Clockwise,
                turns: 1,
                exclude: vec![],
            }
        );
    }

    #[test]
    fn test_invert_sequence() {
        assert_eq!(invert_sequence("R U R' U R U2 R'"), "R U2 R' U' R U' R'");
        assert_eq!(invert_sequence("  F  R'\tM2 "), "M2 R F'");
        assert_eq!(invert_sequence(""), "");
    }

    #[test]
    fn test_tokens_run_backwards() {
        let reversed: Vec<&str> = tokens(" R  U'\nF2 ").rev().collect();
        assert_eq!(reversed, ["F2", "U'", "R"]);
    }

    #[test]
    fn test_double_inverse_is_identity() {
        for entry in CATALOG {
            assert_eq!(
                invert_sequence(&invert_sequence(entry.moves)),
                entry.moves,
                "{}",
                entry.name
            );
        }
        let mixed = "x y' z2 u d' l r' f b' M E' S2 U D2 F' B L2 R";
        assert_eq!(invert_sequence(&invert_sequence(mixed)), mixed);
    }

    #[test]
    fn test_textual_and_parsed_inverse_agree() {
        for (letter, _) in LETTERS {
            for suffix in ["", "'", "2"] {
                let token = format!("{letter}{suffix}");
                assert_eq!(invert_token(&token), parse(&token).inverse().to_string());
            }
        }
    }
}
