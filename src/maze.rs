use std::fmt;
use std::marker::PhantomData;
use std::slice;

use petgraph::graph;
use petgraph::graph::{IndexType, NodeIndex};
use petgraph::{Graph, Undirected};

use crate::cells::GridCoordinate;
use crate::grid::GridGraph;
use crate::units::{EdgesCount, NodesCount};

/// The open passages carved through a [`GridGraph`]: the maze itself.
///
/// One petgraph node per grid cell, one undirected edge per passage. A maze is
/// the explicit return value of a generator run rather than hidden mutation of
/// the grid, so nothing outside the generation call carries incidental state.
///
/// Passage identity is the unordered cell pair - `update_edge` keeps links
/// symmetric and duplicate free - and `iter_passages` replays them in the
/// order the generator carved them.
pub struct Maze<GridIndexType: IndexType> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    grid: GridGraph,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum LinkError {
    InvalidGridCoordinate,
    SelfLink,
    /// Passages may only join cells at Manhattan distance 1 on a single axis.
    /// Seeing this outside a unit test means a generator is defective.
    NotAxisAdjacent,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LinkError::InvalidGridCoordinate => {
                write!(f, "link endpoint is outside the grid")
            }
            LinkError::SelfLink => write!(f, "cannot link a cell to itself"),
            LinkError::NotAxisAdjacent => {
                write!(f, "link endpoints are not axis-adjacent grid cells")
            }
        }
    }
}
impl std::error::Error for LinkError {}

impl<GridIndexType: IndexType> Maze<GridIndexType> {
    /// An empty maze (no passages yet) over the cells of `grid`.
    pub fn new(grid: &GridGraph) -> Maze<GridIndexType> {
        let (NodesCount(nodes), EdgesCount(edges)) = grid.graph_size();

        let mut maze = Maze {
            graph: Graph::with_capacity(nodes, edges),
            grid: *grid,
        };
        for _ in 0..nodes {
            let _ = maze.graph.add_node(());
        }

        maze
    }

    #[inline]
    pub fn grid(&self) -> &GridGraph {
        &self.grid
    }

    pub fn passages_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Record an open passage between two axis-adjacent cells.
    ///
    /// Linking the same pair twice is a no-op: the petgraph edge is updated,
    /// not duplicated.
    pub fn link(&mut self, a: GridCoordinate, b: GridCoordinate) -> Result<(), LinkError> {
        if a == b {
            return Err(LinkError::SelfLink);
        }
        match (self.graph_index(a), self.graph_index(b)) {
            (Some(a_index), Some(b_index)) => {
                if !a.is_axis_adjacent(b) {
                    return Err(LinkError::NotAxisAdjacent);
                }
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(LinkError::InvalidGridCoordinate),
        }
    }

    /// Are two cells joined by an open passage?
    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        if let (Some(a_index), Some(b_index)) = (self.graph_index(a), self.graph_index(b)) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    /// Cells linked to a particular cell by a passage. None for a coordinate
    /// outside the grid.
    pub fn links(&self, coord: GridCoordinate) -> Option<Vec<GridCoordinate>> {
        self.graph_index(coord).map(|index| {
            self.graph
                .neighbors(index)
                .map(|node_index| self.grid.coordinate_from_index(node_index.index()))
                .collect()
        })
    }

    /// Every passage as an endpoint pair, in carve order.
    pub fn iter_passages(&self) -> PassagesIter<GridIndexType> {
        PassagesIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            grid: &self.grid,
            index_type: PhantomData,
        }
    }

    #[inline]
    fn graph_index(&self, coord: GridCoordinate) -> Option<NodeIndex<GridIndexType>> {
        self.grid
            .grid_coordinate_to_index(coord)
            .map(NodeIndex::<GridIndexType>::new)
    }
}

impl<GridIndexType: IndexType> fmt::Debug for Maze<GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Maze :: cells: {}, passages: {}",
               self.grid.size(),
               self.passages_count())
    }
}

pub struct PassagesIter<'a, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    grid: &'a GridGraph,
    index_type: PhantomData<GridIndexType>,
}

impl<'a, GridIndexType: IndexType> Iterator for PassagesIter<'a, GridIndexType> {
    type Item = (GridCoordinate, GridCoordinate);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src = self.grid.coordinate_from_index(edge.source().index());
            let dst = self.grid.coordinate_from_index(edge.target().index());
            (src, dst)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, GridIndexType: IndexType> ExactSizeIterator for PassagesIter<'a, GridIndexType> {
} // default impl using size_hint()

/// Maze constructors gated on the petgraph index width, so a maze never holds
/// more cells than its index type can address.
pub fn small_maze(grid: &GridGraph) -> Option<Maze<u8>> {
    if grid.size() <= u8::MAX as usize {
        Some(Maze::new(grid))
    } else {
        None
    }
}

pub fn medium_maze(grid: &GridGraph) -> Option<Maze<u16>> {
    if grid.size() <= u16::MAX as usize {
        Some(Maze::new(grid))
    } else {
        None
    }
}

pub fn large_maze(grid: &GridGraph) -> Option<Maze<u32>> {
    if grid.size() <= u32::MAX as usize {
        Some(Maze::new(grid))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::units::{Depth, Height, Width};

    fn small_grid(w: usize, h: usize, d: usize) -> GridGraph {
        GridGraph::new(Width(w), Height(h), Depth(d)).expect("valid grid dimensions")
    }

    #[test]
    fn linking_cells() {
        let g = small_grid(1, 1, 4);
        let mut maze = small_maze(&g).expect("grid small enough for a u8 index");
        let a = GridCoordinate::new(0, 0, 0);
        let b = GridCoordinate::new(0, 0, 1);
        let c = GridCoordinate::new(0, 0, 2);

        let sorted_links = |maze: &Maze<u8>, coord| -> Vec<GridCoordinate> {
            maze.links(coord).expect("coordinate is invalid").into_iter().sorted().collect()
        };
        macro_rules! links_sorted {
            ($x:expr) => (sorted_links(&maze, $x))
        }
        // The order of the arguments to `is_linked` must not matter
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => (maze.is_linked($x, $y) && maze.is_linked($y, $x))
        }

        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);

        maze.link(a, b).expect("link failed");
        assert!(bi_check_linked!(a, b));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a]);

        maze.link(b, c).expect("link failed");
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(links_sorted!(b), vec![a, c]);
        assert_eq!(maze.passages_count(), 2);
    }

    #[test]
    fn no_self_linked_cycles() {
        let g = small_grid(2, 2, 2);
        let mut maze = small_maze(&g).unwrap();
        let a = GridCoordinate::new(0, 0, 0);
        assert_eq!(maze.link(a, a), Err(LinkError::SelfLink));
    }

    #[test]
    fn no_links_to_invalid_coordinates() {
        let g = small_grid(2, 2, 2);
        let mut maze = small_maze(&g).unwrap();
        let good = GridCoordinate::new(0, 0, 0);
        let invalid = GridCoordinate::new(100, 100, 100);
        assert_eq!(maze.link(good, invalid), Err(LinkError::InvalidGridCoordinate));
    }

    #[test]
    fn no_links_between_non_adjacent_cells() {
        let g = small_grid(3, 1, 3);
        let mut maze = small_maze(&g).unwrap();
        let a = GridCoordinate::new(0, 0, 0);
        let diagonal = GridCoordinate::new(1, 0, 1);
        let far = GridCoordinate::new(2, 0, 0);
        assert_eq!(maze.link(a, diagonal), Err(LinkError::NotAxisAdjacent));
        assert_eq!(maze.link(a, far), Err(LinkError::NotAxisAdjacent));
    }

    #[test]
    fn no_parallel_duplicated_links() {
        let g = small_grid(2, 1, 1);
        let mut maze = small_maze(&g).unwrap();
        let a = GridCoordinate::new(0, 0, 0);
        let b = GridCoordinate::new(1, 0, 0);
        maze.link(a, b).expect("link failed");
        maze.link(a, b).expect("link failed");
        maze.link(b, a).expect("link failed");
        assert_eq!(maze.passages_count(), 1);
    }

    #[test]
    fn passages_iterate_in_carve_order() {
        let g = small_grid(1, 1, 4);
        let mut maze = small_maze(&g).unwrap();
        let cell = |z| GridCoordinate::new(0, 0, z);
        maze.link(cell(2), cell(3)).unwrap();
        maze.link(cell(0), cell(1)).unwrap();
        maze.link(cell(1), cell(2)).unwrap();

        let passages: Vec<_> = maze.iter_passages().collect();
        assert_eq!(passages,
                   vec![(cell(2), cell(3)), (cell(0), cell(1)), (cell(1), cell(2))]);
        assert_eq!(maze.iter_passages().len(), 3);
    }

    #[test]
    fn maze_size_constructors_respect_index_width() {
        let just_fits_u8 = small_grid(4, 4, 16); // 256 > u8::MAX
        assert!(small_maze(&just_fits_u8).is_none());
        assert!(medium_maze(&just_fits_u8).is_some());

        let small = small_grid(5, 5, 5);
        assert!(small_maze(&small).is_some());
        assert!(large_maze(&small).is_some());
    }
}
