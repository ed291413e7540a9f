//! Faces, axes and turn directions of a 3x3x3 cube.
//!
//! Face identity is spatial: `Front` is always the face whose outward normal
//! points along world +Z, whichever pieces happen to sit there.

use std::f32::consts::FRAC_PI_2;
use std::ops::{Index, IndexMut};

use glam::Vec3;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// One of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the positive end of the axis.
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    /// Returns the component of `v` along this axis.
    #[inline]
    pub fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Turn direction, as seen looking at a face (or at the positive end of an
/// axis) from outside the cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Returns the opposite direction.
    pub fn flip(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Signed rotation angle about the positive end of an axis.
    ///
    /// Right-handed: counter-clockwise is positive, so clockwise quarter turns
    /// are negative.
    pub fn angle(self, turns: u8) -> f32 {
        let magnitude = FRAC_PI_2 * turns as f32;
        match self {
            Direction::Clockwise => -magnitude,
            Direction::CounterClockwise => magnitude,
        }
    }
}

/// One of the six outer faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Face {
    Front = 0,
    Back = 1,
    Up = 2,
    Down = 3,
    Left = 4,
    Right = 5,
}

impl Face {
    /// Axis that the face's normal lies on.
    pub fn axis(self) -> Axis {
        match self {
            Face::Front | Face::Back => Axis::Z,
            Face::Up | Face::Down => Axis::Y,
            Face::Left | Face::Right => Axis::X,
        }
    }

    /// Whether the face's outward normal points along the positive axis.
    pub fn is_positive(self) -> bool {
        matches!(self, Face::Front | Face::Up | Face::Right)
    }

    pub fn opposite(self) -> Self {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
        }
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        if self.is_positive() {
            self.axis().unit()
        } else {
            -self.axis().unit()
        }
    }

    /// Converts a direction seen from this face into a direction seen from
    /// the positive end of the face's axis.
    pub fn axis_direction(self, direction: Direction) -> Direction {
        if self.is_positive() {
            direction
        } else {
            direction.flip()
        }
    }

    /// Signed angle about the positive axis for turning this face.
    pub fn turn_angle(self, direction: Direction, turns: u8) -> f32 {
        self.axis_direction(direction).angle(turns)
    }
}

/// A value for each of the six faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceMap<T>([T; Face::COUNT]);

impl<T> FaceMap<T> {
    pub fn from_fn(mut f: impl FnMut(Face) -> T) -> Self {
        Self(std::array::from_fn(|i| f(FACES[i])))
    }

    /// Iterates over `(face, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Face, &T)> {
        Face::iter().zip(self.0.iter())
    }
}

impl<T> Index<Face> for FaceMap<T> {
    type Output = T;

    fn index(&self, face: Face) -> &T {
        &self.0[face as usize]
    }
}

impl<T> IndexMut<Face> for FaceMap<T> {
    fn index_mut(&mut self, face: Face) -> &mut T {
        &mut self.0[face as usize]
    }
}

/// All faces, indexed by discriminant.
const FACES: [Face; Face::COUNT] = [
    Face::Front,
    Face::Back,
    Face::Up,
    Face::Down,
    Face::Left,
    Face::Right,
];
