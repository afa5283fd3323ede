use std::fmt;

use petgraph::graph::IndexType;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::cells::GridCoordinate;
use crate::generators::{self, GeneratorError, MazeAlgorithm};
use crate::grid::{GridError, GridGraph};
use crate::maze::Maze;
use crate::rasterize::{cuboid, line3d};
use crate::units::{Depth, Height, Width};
use crate::voxels::{BlockId, WorldPoint, WorldVolume};

/// How many world units one grid cell spans on each axis. The world layout
/// doubles this to leave a one cell thick wall margin between every pair of
/// adjacent cells.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellSize {
    width: usize,
    height: usize,
    depth: usize,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum RenderError {
    /// Every cell size axis must be at least 1.
    ZeroCellSize,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RenderError::ZeroCellSize => write!(f, "all cell size axes must be at least 1"),
        }
    }
}
impl std::error::Error for RenderError {}

impl CellSize {
    pub fn new(width: usize, height: usize, depth: usize) -> Result<CellSize, RenderError> {
        if width < 1 || height < 1 || depth < 1 {
            return Err(RenderError::ZeroCellSize);
        }
        Ok(CellSize { width, height, depth })
    }

    pub fn unit() -> CellSize {
        CellSize { width: 1, height: 1, depth: 1 }
    }

    /// A maze grid coordinate scaled into world space. Cell centres land on
    /// every second multiple of the cell size; the skipped multiples are the
    /// wall margin.
    fn cell_to_world(&self, coord: GridCoordinate) -> WorldPoint {
        WorldPoint::new((coord.x as usize * self.width * 2) as i32,
                        (coord.y as usize * self.height * 2) as i32,
                        (coord.z as usize * self.depth * 2) as i32)
    }

    fn world_extents(&self, grid: &GridGraph) -> WorldPoint {
        WorldPoint::new((grid.width().0 * self.width * 2) as i32,
                        (grid.height().0 * self.height * 2) as i32,
                        (grid.depth().0 * self.depth * 2) as i32)
    }

    /// Per-axis half extent of the cross-section box swept along a carved
    /// passage: floor(size / 2).
    fn half_extents(&self) -> (i32, i32, i32) {
        ((self.width / 2) as i32, (self.height / 2) as i32, (self.depth / 2) as i32)
    }
}

/// The wall, path and outside block identifiers a maze is built from.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockPalette {
    pub wall: BlockId,
    pub path: BlockId,
    pub outside: BlockId,
}

impl BlockPalette {
    pub fn new<W, P, O>(wall: W, path: P, outside: O) -> BlockPalette
        where W: Into<BlockId>,
              P: Into<BlockId>,
              O: Into<BlockId>
    {
        BlockPalette {
            wall: wall.into(),
            path: path.into(),
            outside: outside.into(),
        }
    }
}

/// Assemble the world volume for a generated maze.
///
/// Three write passes, in an order that matters: the outer boundary shell one
/// voxel beyond the world extents, then the default-solid wall fill of the
/// inner extent, then a carved cross-section swept along the rasterized line
/// between the endpoints of every open passage. Later writes overwrite
/// earlier ones, so paths always win over fill and shell even at degenerate
/// cell sizes.
///
/// A height 1 grid is treated as 2D: every write collapses onto the single
/// y = 0 layer.
pub fn render_maze<GridIndexType>(grid: &GridGraph,
                                  maze: &Maze<GridIndexType>,
                                  cell_size: CellSize,
                                  palette: &BlockPalette)
                                  -> WorldVolume
    where GridIndexType: IndexType
{
    let extents = cell_size.world_extents(grid);
    let flat = grid.height().0 == 1;

    let shell_box = cuboid((-1, -1, -1), (extents.x - 1, extents.y - 1, extents.z - 1));
    let mut volume = WorldVolume::with_capacity(shell_box.len());

    let mut put = |volume: &mut WorldVolume, point: WorldPoint, block: &BlockId| {
        if flat {
            volume.set(WorldPoint::new(point.x, 0, point.z), block);
        } else {
            volume.set(point, block);
        }
    };

    // Boundary shell, one voxel beyond the outer extents.
    for point in shell_box {
        put(&mut volume, point, &palette.outside);
    }

    // Solid interior: every passage must be explicitly carved out of it.
    let inner_max = (extents.x - 2 * cell_size.width as i32,
                     extents.y - 2 * cell_size.height as i32,
                     extents.z - 2 * cell_size.depth as i32);
    for point in cuboid((0, 0, 0), inner_max) {
        put(&mut volume, point, &palette.wall);
    }

    // Carve the passages, in the order the generator recorded them.
    let (half_x, half_y, half_z) = cell_size.half_extents();
    for (a, b) in maze.iter_passages() {
        let line = line3d(cell_size.cell_to_world(a), cell_size.cell_to_world(b));
        for point in line {
            let cross_section = cuboid(point.offset(-half_x, -half_y, -half_z),
                                       point.offset(half_x, half_y, half_z));
            for section_point in cross_section {
                put(&mut volume, section_point, &palette.path);
            }
        }
    }

    volume
}

/// One maze generation request: the engine's whole external interface.
#[derive(Clone, Debug)]
pub struct MazeRequest {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub cell_size: CellSize,
    pub palette: BlockPalette,
    pub algorithm: MazeAlgorithm,
    /// Fix for reproducible output; `None` generates a seed, reported back in
    /// the result.
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub struct GeneratedMaze {
    pub volume: WorldVolume,
    /// The seed actually used, whether supplied or generated.
    pub seed: u64,
    pub passages: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Grid(GridError),
    Generator(GeneratorError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            EngineError::Grid(ref err) => write!(f, "invalid maze grid: {}", err),
            EngineError::Generator(ref err) => write!(f, "maze generation failed: {}", err),
        }
    }
}
impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            EngineError::Grid(ref err) => Some(err),
            EngineError::Generator(ref err) => Some(err),
        }
    }
}

impl From<GridError> for EngineError {
    fn from(err: GridError) -> EngineError {
        EngineError::Grid(err)
    }
}

impl From<GeneratorError> for EngineError {
    fn from(err: GeneratorError) -> EngineError {
        EngineError::Generator(err)
    }
}

/// Build a grid, run one algorithm from the origin cell, assemble the block
/// volume. One synchronous call; no state survives it except the returned
/// volume.
pub fn generate_maze(request: &MazeRequest) -> Result<GeneratedMaze, EngineError> {
    let grid = GridGraph::new(Width(request.width),
                              Height(request.height),
                              Depth(request.depth))?;

    let seed = request.seed.unwrap_or_else(rand::random::<u64>);
    let mut rng = XorShiftRng::seed_from_u64(seed);

    let start = GridCoordinate::new(0, 0, 0);
    let maze: Maze<u32> = generators::generate(request.algorithm, &grid, start, &mut rng)?;
    let volume = render_maze(&grid, &maze, request.cell_size, &request.palette);

    Ok(GeneratedMaze {
        volume,
        seed,
        passages: maze.passages_count(),
    })
}

#[cfg(test)]
mod tests {

    use super::*;

    fn palette() -> BlockPalette {
        BlockPalette::new("wall", "path", "outside")
    }

    fn request(w: usize, h: usize, d: usize, algorithm: MazeAlgorithm, seed: u64) -> MazeRequest {
        MazeRequest {
            width: w,
            height: h,
            depth: d,
            cell_size: CellSize::unit(),
            palette: palette(),
            algorithm,
            seed: Some(seed),
        }
    }

    #[test]
    fn zero_cell_size_rejected() {
        assert_eq!(CellSize::new(0, 1, 1), Err(RenderError::ZeroCellSize));
        assert_eq!(CellSize::new(1, 0, 1), Err(RenderError::ZeroCellSize));
        assert_eq!(CellSize::new(1, 1, 0), Err(RenderError::ZeroCellSize));
        assert!(CellSize::new(2, 1, 3).is_ok());
    }

    #[test]
    fn flat_maze_end_to_end() {
        // 3x1x3 grid, unit cells: world extent 6 per horizontal axis.
        // The whole 7x7 collapsed layer: a 24 voxel boundary ring, a 5x5
        // solid interior, and a spanning tree carved through it.
        let generated =
            generate_maze(&request(3, 1, 3, MazeAlgorithm::RecursiveBacktracker, 101))
                .expect("generation failed");
        let volume = &generated.volume;

        let nodes = 9;
        assert_eq!(generated.passages, nodes - 1);

        // Every write collapsed onto the y = 0 layer.
        assert!(volume.iter().all(|(point, _)| point.y == 0));
        assert_eq!(volume.len(), 7 * 7);

        // With unit cells a tree carves one voxel per cell centre plus one
        // midpoint per passage: 2 * nodes - 1.
        assert_eq!(volume.count_of(&BlockId::from("path")), 2 * nodes - 1);
        assert_eq!(volume.count_of(&BlockId::from("outside")), 24);
        assert_eq!(volume.count_of(&BlockId::from("wall")), 5 * 5 - (2 * nodes - 1));
    }

    #[test]
    fn flat_maze_shell_is_a_closed_ring() {
        let generated = generate_maze(&request(3, 1, 3, MazeAlgorithm::Prim, 5)).unwrap();
        let outside = BlockId::from("outside");

        for i in -1..=5 {
            assert_eq!(generated.volume.get(WorldPoint::new(i, 0, -1)), Some(&outside));
            assert_eq!(generated.volume.get(WorldPoint::new(i, 0, 5)), Some(&outside));
            assert_eq!(generated.volume.get(WorldPoint::new(-1, 0, i)), Some(&outside));
            assert_eq!(generated.volume.get(WorldPoint::new(5, 0, i)), Some(&outside));
        }
    }

    #[test]
    fn cubic_maze_block_budget() {
        // 2x2x2 grid, unit cells: 5^3 shell box, 3^3 interior, 8 cell tree.
        let generated = generate_maze(&request(2, 2, 2, MazeAlgorithm::Kruskal, 77)).unwrap();
        let volume = &generated.volume;
        let nodes = 8;

        assert_eq!(generated.passages, nodes - 1);
        assert_eq!(volume.len(), 5 * 5 * 5);
        assert_eq!(volume.count_of(&BlockId::from("path")), 2 * nodes - 1);
        assert_eq!(volume.count_of(&BlockId::from("wall")), 3 * 3 * 3 - (2 * nodes - 1));
        assert_eq!(volume.count_of(&BlockId::from("outside")), 5 * 5 * 5 - 3 * 3 * 3);

        // Paths stay within the interior extent.
        for (point, block) in volume.iter() {
            if *block == BlockId::from("path") {
                assert!(point.x >= 0 && point.x <= 2);
                assert!(point.y >= 0 && point.y <= 2);
                assert!(point.z >= 0 && point.z <= 2);
            }
        }
    }

    #[test]
    fn tall_cells_on_a_flat_grid_still_collapse() {
        let mut req = request(3, 1, 3, MazeAlgorithm::HuntAndKill, 9);
        req.cell_size = CellSize::new(1, 2, 1).expect("valid cell size");
        let generated = generate_maze(&req).unwrap();
        assert!(generated.volume.iter().all(|(point, _)| point.y == 0));
    }

    #[test]
    fn wider_cells_carve_wider_corridors() {
        let mut req = request(2, 1, 1, MazeAlgorithm::RecursiveBacktracker, 3);
        req.cell_size = CellSize::new(3, 1, 3).expect("valid cell size");
        let generated = generate_maze(&req).unwrap();

        // One passage between the two cells: centres x = 0 and x = 6, a 7
        // voxel line, each point sweeping a box of half extent 1 in x and z
        // (y collapsed). The union spans x in -1..=7 and z in -1..=1.
        assert_eq!(generated.passages, 1);
        assert_eq!(generated.volume.count_of(&BlockId::from("path")), 9 * 3);
    }

    #[test]
    fn fixed_seed_reproduces_the_volume() {
        let req = request(4, 2, 3, MazeAlgorithm::HuntAndKill, 1234);
        let first = generate_maze(&req).unwrap();
        let second = generate_maze(&req).unwrap();
        assert_eq!(first.seed, 1234);
        assert_eq!(first.volume, second.volume);
    }

    #[test]
    fn generated_seed_is_reported_and_reproducible() {
        let mut req = request(3, 1, 3, MazeAlgorithm::Kruskal, 0);
        req.seed = None;
        let first = generate_maze(&req).unwrap();

        req.seed = Some(first.seed);
        let replay = generate_maze(&req).unwrap();
        assert_eq!(first.volume, replay.volume);
    }

    #[test]
    fn invalid_dimensions_fail_before_any_output() {
        let req = request(0, 1, 3, MazeAlgorithm::Prim, 1);
        assert_eq!(generate_maze(&req).err(),
                   Some(EngineError::Grid(GridError::ZeroDimension)));
    }
}
