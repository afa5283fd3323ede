use std::fmt;
use std::str::FromStr;

use bit_set::BitSet;
use petgraph::graph::IndexType;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_xorshift::XorShiftRng;

use crate::cells::GridCoordinate;
use crate::disjoint_set::DisjointSet;
use crate::grid::GridGraph;
use crate::maze::{LinkError, Maze};

/// The spanning structure strategies. All four produce a spanning tree over a
/// connected grid; they differ in the texture of the corridors they carve.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeAlgorithm {
    RecursiveBacktracker,
    Prim,
    Kruskal,
    HuntAndKill,
}

impl MazeAlgorithm {
    pub const ALL: [MazeAlgorithm; 4] = [MazeAlgorithm::RecursiveBacktracker,
                                         MazeAlgorithm::Prim,
                                         MazeAlgorithm::Kruskal,
                                         MazeAlgorithm::HuntAndKill];

    pub fn name(self) -> &'static str {
        match self {
            MazeAlgorithm::RecursiveBacktracker => "recursive_backtracker",
            MazeAlgorithm::Prim => "prim",
            MazeAlgorithm::Kruskal => "kruskal",
            MazeAlgorithm::HuntAndKill => "hunt_and_kill",
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub struct ParseAlgorithmError(pub String);

impl fmt::Display for ParseAlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "unknown maze algorithm {:?}, expected one of: recursive_backtracker, prim, \
                kruskal, hunt_and_kill",
               self.0)
    }
}
impl std::error::Error for ParseAlgorithmError {}

impl FromStr for MazeAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<MazeAlgorithm, ParseAlgorithmError> {
        match s {
            "recursive_backtracker" => Ok(MazeAlgorithm::RecursiveBacktracker),
            "prim" => Ok(MazeAlgorithm::Prim),
            "kruskal" => Ok(MazeAlgorithm::Kruskal),
            "hunt_and_kill" => Ok(MazeAlgorithm::HuntAndKill),
            other => Err(ParseAlgorithmError(other.to_owned())),
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GeneratorError {
    /// The requested start cell is not a cell of the grid. Checked before any
    /// other work so a failed run mutates nothing.
    StartOutsideGrid,
    /// A generator tried to carve an impossible passage. Unreachable given a
    /// correct grid; surfaced rather than swallowed because it is a defect.
    Link(LinkError),
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GeneratorError::StartOutsideGrid => {
                write!(f, "maze generation start cell is outside the grid")
            }
            GeneratorError::Link(err) => write!(f, "defective passage carve: {}", err),
        }
    }
}
impl std::error::Error for GeneratorError {}

impl From<LinkError> for GeneratorError {
    fn from(err: LinkError) -> GeneratorError {
        GeneratorError::Link(err)
    }
}

/// Run the selected algorithm over `grid` from `start`.
///
/// A fixed rng seed reproduces an identical passage set in an identical carve
/// order; all randomness flows through the one `rng` argument.
pub fn generate<GridIndexType>(algorithm: MazeAlgorithm,
                               grid: &GridGraph,
                               start: GridCoordinate,
                               rng: &mut XorShiftRng)
                               -> Result<Maze<GridIndexType>, GeneratorError>
    where GridIndexType: IndexType
{
    match algorithm {
        MazeAlgorithm::RecursiveBacktracker => recursive_backtracker(grid, start, rng),
        MazeAlgorithm::Prim => prim(grid, start, rng),
        MazeAlgorithm::Kruskal => kruskal(grid, start, rng),
        MazeAlgorithm::HuntAndKill => hunt_and_kill(grid, start, rng),
    }
}

/// Depth first search with an explicit stack (no recursion limits to hit on
/// large grids). While the cell on top of the stack has unvisited neighbours,
/// pick one at random, carve to it and push it; otherwise pop and backtrack.
/// The DFS bias produces long winding corridors.
pub fn recursive_backtracker<GridIndexType>(grid: &GridGraph,
                                            start: GridCoordinate,
                                            rng: &mut XorShiftRng)
                                            -> Result<Maze<GridIndexType>, GeneratorError>
    where GridIndexType: IndexType
{
    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or(GeneratorError::StartOutsideGrid)?;

    let mut maze = Maze::new(grid);
    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);

    let mut stack = vec![start];
    while let Some(&current) = stack.last() {
        let unvisited = unvisited_neighbours(grid, &visited, current);
        if unvisited.is_empty() {
            stack.pop();
        } else {
            let neighbour = unvisited[rng.gen_range(0..unvisited.len())];
            visited.insert(flat_index(grid, neighbour));
            maze.link(current, neighbour)?;
            stack.push(neighbour);
        }
    }

    Ok(maze)
}

/// Randomized Prim's. A frontier of candidate walls - (visited cell,
/// unvisited neighbour) pairs - starts at the start cell; each step removes
/// one wall uniformly at random and carves it if its far side is still
/// unvisited, pushing that cell's own candidate walls. Branches more evenly
/// and with shorter corridors than the backtracker.
pub fn prim<GridIndexType>(grid: &GridGraph,
                           start: GridCoordinate,
                           rng: &mut XorShiftRng)
                           -> Result<Maze<GridIndexType>, GeneratorError>
    where GridIndexType: IndexType
{
    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or(GeneratorError::StartOutsideGrid)?;

    let mut maze = Maze::new(grid);
    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);

    let mut frontier: Vec<(GridCoordinate, GridCoordinate)> =
        grid.neighbours(start).iter().map(|&n| (start, n)).collect();

    while !frontier.is_empty() {
        let wall_index = rng.gen_range(0..frontier.len());
        let (visited_side, far_side) = frontier.swap_remove(wall_index);

        let far_index = flat_index(grid, far_side);
        if !visited.contains(far_index) {
            visited.insert(far_index);
            maze.link(visited_side, far_side)?;
            for neighbour in unvisited_neighbours(grid, &visited, far_side) {
                frontier.push((far_side, neighbour));
            }
        }
    }

    Ok(maze)
}

/// Randomized Kruskal's. Every candidate (cell, neighbour) pair in the grid
/// is shuffled and processed once; a disjoint set tracks which cells are
/// already connected, and a wall is carved exactly when its endpoints are
/// not. The only strategy that needs no traversal order from the start cell -
/// the parameter is validated for interface uniformity but otherwise unused.
pub fn kruskal<GridIndexType>(grid: &GridGraph,
                              start: GridCoordinate,
                              rng: &mut XorShiftRng)
                              -> Result<Maze<GridIndexType>, GeneratorError>
    where GridIndexType: IndexType
{
    let _ = grid.grid_coordinate_to_index(start)
        .ok_or(GeneratorError::StartOutsideGrid)?;

    let mut maze = Maze::new(grid);
    let mut disjoint_set = DisjointSet::new(grid.size());

    let mut walls: Vec<(GridCoordinate, GridCoordinate)> = Vec::with_capacity(grid.size() * 3);
    for cell in grid.iter() {
        for &neighbour in grid.neighbours(cell).iter() {
            walls.push((cell, neighbour));
        }
    }
    walls.shuffle(rng);

    for (a, b) in walls {
        let a_index = flat_index(grid, a);
        let b_index = flat_index(grid, b);
        if disjoint_set.find(a_index) != disjoint_set.find(b_index) {
            maze.link(a, b)?;
            disjoint_set.union(a_index, b_index);
        }
    }

    Ok(maze)
}

/// Hunt-and-kill. Kill: random walk into unvisited neighbours, carving as it
/// goes, until stuck. Hunt: scan every cell in the grid's fixed row major
/// order for the first unvisited one bordering a visited cell, carve to a
/// random such neighbour and resume killing from there. Finishes when a hunt
/// finds nothing. Dead ends come out shorter than pure backtracking.
pub fn hunt_and_kill<GridIndexType>(grid: &GridGraph,
                                    start: GridCoordinate,
                                    rng: &mut XorShiftRng)
                                    -> Result<Maze<GridIndexType>, GeneratorError>
    where GridIndexType: IndexType
{
    let start_index = grid.grid_coordinate_to_index(start)
        .ok_or(GeneratorError::StartOutsideGrid)?;

    let mut maze = Maze::new(grid);
    let mut visited = BitSet::with_capacity(grid.size());
    visited.insert(start_index);

    let mut current = start;
    loop {
        let unvisited = unvisited_neighbours(grid, &visited, current);
        if !unvisited.is_empty() {
            // Kill phase: keep walking.
            let neighbour = unvisited[rng.gen_range(0..unvisited.len())];
            visited.insert(flat_index(grid, neighbour));
            maze.link(current, neighbour)?;
            current = neighbour;
        } else {
            // Hunt phase: first unvisited cell adjacent to the visited region.
            let target = grid.iter().find(|&cell| {
                !visited.contains(flat_index(grid, cell))
                    && grid.neighbours(cell)
                           .iter()
                           .any(|&n| visited.contains(flat_index(grid, n)))
            });

            match target {
                Some(cell) => {
                    let visited_neighbours: Vec<GridCoordinate> = grid.neighbours(cell)
                        .iter()
                        .cloned()
                        .filter(|&n| visited.contains(flat_index(grid, n)))
                        .collect();
                    let chosen = visited_neighbours[rng.gen_range(0..visited_neighbours.len())];
                    visited.insert(flat_index(grid, cell));
                    maze.link(cell, chosen)?;
                    current = cell;
                }
                None => break,
            }
        }
    }

    Ok(maze)
}

fn unvisited_neighbours(grid: &GridGraph,
                        visited: &BitSet,
                        cell: GridCoordinate)
                        -> Vec<GridCoordinate> {
    grid.neighbours(cell)
        .iter()
        .cloned()
        .filter(|&n| !visited.contains(flat_index(grid, n)))
        .collect()
}

/// Row major index of an already validated cell. Grid neighbour queries only
/// hand out in-bounds coordinates, so no bounds check is repeated here.
#[inline]
fn flat_index(grid: &GridGraph, cell: GridCoordinate) -> usize {
    cell.to_row_major_index(grid.width(), grid.height())
}
