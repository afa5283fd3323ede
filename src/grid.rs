use std::fmt;

use rand::Rng;
use rand_xorshift::XorShiftRng;

use crate::cells::{offset_coordinate, offset_directions, CoordinateSmallVec, Direction,
                   GridCoordinate};
use crate::units::{Depth, EdgesCount, Height, NodesCount, Width};

/// The candidate lattice a maze is carved out of: one node per cell of a
/// `width * height * depth` box, with axis-aligned neighbour relations.
///
/// Neighbour relations are the *candidate* adjacency; the passages an
/// algorithm chooses from them live in a [`Maze`](crate::maze::Maze). Cells
/// are addressed by row major index (`x + y*w + z*w*h`), so adjacency lookup
/// is plain index arithmetic and the grid holds no cell objects at all.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub struct GridGraph {
    width: Width,
    height: Height,
    depth: Depth,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// Every dimension must be at least 1.
    ZeroDimension,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::ZeroDimension => write!(f, "all grid dimensions must be at least 1"),
        }
    }
}
impl std::error::Error for GridError {}

impl GridGraph {
    pub fn new(width: Width, height: Height, depth: Depth) -> Result<GridGraph, GridError> {
        if width.0 < 1 || height.0 < 1 || depth.0 < 1 {
            return Err(GridError::ZeroDimension);
        }
        Ok(GridGraph { width, height, depth })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Total cell count of the lattice.
    #[inline]
    pub fn size(&self) -> usize {
        self.width.0 * self.height.0 * self.depth.0
    }

    /// Node count plus an upper bound on the candidate edge count, used to
    /// capacity hint the passage graph.
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let nodes = self.size();
        // 3 leaving edges per cell covers each undirected axis pair once.
        (NodesCount(nodes), EdgesCount(3 * nodes))
    }

    /// Is the grid coordinate within this grid's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width.0
            && (coord.y as usize) < self.height.0
            && (coord.z as usize) < self.depth.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range
    /// 0..grid.size(). Returns None if the coordinate is outside the grid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.to_row_major_index(self.width, self.height))
        } else {
            None
        }
    }

    #[inline]
    pub fn coordinate_from_index(&self, index: usize) -> GridCoordinate {
        GridCoordinate::from_row_major_index(index, self.width, self.height)
    }

    /// Cells axis-adjacent to a particular cell, but not necessarily linked
    /// to it by a passage. Corner cells of a 3D grid have 3, interior cells 6
    /// (4 on a height 1 slab).
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        offset_directions(self.height)
            .iter()
            .filter_map(|&dir| self.neighbour_at_direction(coord, dir))
            .collect()
    }

    pub fn neighbour_at_direction(&self,
                                  coord: GridCoordinate,
                                  direction: Direction)
                                  -> Option<GridCoordinate> {
        offset_coordinate(coord, direction)
            .filter(|&neighbour_coord| self.is_valid_coordinate(neighbour_coord))
    }

    /// Visit every cell in row major order: x varies fastest, then y, then z.
    /// The hunt phase of hunt-and-kill relies on this being a fixed order.
    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            cells_count: self.size(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn random_cell(&self, rng: &mut XorShiftRng) -> GridCoordinate {
        let index = rng.gen_range(0..self.size());
        self.coordinate_from_index(index)
    }
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    cells_count: usize,
    width: Width,
    height: Height,
}
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = GridCoordinate::from_row_major_index(self.current_cell_number,
                                                             self.width,
                                                             self.height);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        (lower_bound, Some(lower_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

impl<'a> IntoIterator for &'a GridGraph {
    type Item = GridCoordinate;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
