use std::convert::From;
use std::fmt;

use smallvec::SmallVec;

use crate::units::{Height, Width};

/// One discrete position in maze-grid space (not world space).
///
/// Identity is the coordinate itself: no two cells of a grid share one.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 6]>;
pub type DirectionSmallVec = SmallVec<[Direction; 6]>;

/// The six axis-aligned directions of a 3D lattice. `Up`/`Down` move along y,
/// the compass directions along x and z.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

pub const ALL_DIRECTIONS: [Direction; 6] = [
    Direction::North,
    Direction::South,
    Direction::East,
    Direction::West,
    Direction::Up,
    Direction::Down,
];

impl GridCoordinate {
    pub fn new(x: u32, y: u32, z: u32) -> GridCoordinate {
        GridCoordinate { x, y, z }
    }

    /// The row major index of this coordinate: x varies fastest, then y, then z.
    ///
    /// Callers are expected to have bounds checked the coordinate against the
    /// same dimensions.
    #[inline]
    pub fn to_row_major_index(self, width: Width, height: Height) -> usize {
        let Width(w) = width;
        let Height(h) = height;
        self.x as usize + self.y as usize * w + self.z as usize * w * h
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width, height: Height) -> GridCoordinate {
        let Width(w) = width;
        let Height(h) = height;
        let x = index % w;
        let y = (index / w) % h;
        let z = index / (w * h);
        GridCoordinate::new(x as u32, y as u32, z as u32)
    }

    /// Manhattan distance 1 on exactly one axis - the candidate adjacency test.
    pub fn is_axis_adjacent(self, other: GridCoordinate) -> bool {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        let dz = (i64::from(self.z) - i64::from(other.z)).abs();
        dx + dy + dz == 1
    }
}

/// Creates a new coordinate offset 1 cell away in the given direction.
/// Returns None if the coordinate is not representable (underflow below zero).
/// Bounds checking against a particular grid is the grid's job.
pub fn offset_coordinate(coord: GridCoordinate, dir: Direction) -> Option<GridCoordinate> {
    let GridCoordinate { x, y, z } = coord;
    match dir {
        Direction::North => {
            if z > 0 {
                Some(GridCoordinate { z: z - 1, ..coord })
            } else {
                None
            }
        }
        Direction::South => Some(GridCoordinate { z: z + 1, ..coord }),
        Direction::East => Some(GridCoordinate { x: x + 1, ..coord }),
        Direction::West => {
            if x > 0 {
                Some(GridCoordinate { x: x - 1, ..coord })
            } else {
                None
            }
        }
        Direction::Up => Some(GridCoordinate { y: y + 1, ..coord }),
        Direction::Down => {
            if y > 0 {
                Some(GridCoordinate { y: y - 1, ..coord })
            } else {
                None
            }
        }
    }
}

/// The directions that stay on a grid of the given dimensions when starting
/// from somewhere inside it. A height 1 slab drops `Up`/`Down` entirely so 2D
/// grids keep the flat 4-neighbour adjacency.
pub fn offset_directions(height: Height) -> DirectionSmallVec {
    if height.0 > 1 {
        ALL_DIRECTIONS.iter().cloned().collect()
    } else {
        [Direction::North, Direction::South, Direction::East, Direction::West]
            .iter()
            .cloned()
            .collect()
    }
}

impl From<(u32, u32, u32)> for GridCoordinate {
    fn from(xyz: (u32, u32, u32)) -> GridCoordinate {
        GridCoordinate::new(xyz.0, xyz.1, xyz.2)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
