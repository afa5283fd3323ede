use docopt::Docopt;
use itertools::Itertools;
use serde_derive::Deserialize;
use voxmaze::{
    generators::MazeAlgorithm,
    render::{generate_maze, BlockPalette, CellSize, MazeRequest},
    voxels::WorldVolume,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

const USAGE: &str = "Voxmaze

Usage:
    voxmaze_driver -h | --help
    voxmaze_driver generate (recursive-backtracker|prim|kruskal|hunt-and-kill) [--width=<w> --height=<h> --depth=<d>] [--cell-width=<n> --cell-height=<n> --cell-depth=<n>] [--wall-block=<id>] [--path-block=<id>] [--outside-block=<id>] [--seed=<n>] [--blocks-out=<path>]

Options:
    -h --help            Show this screen.
    --width=<w>          Maze grid width in cells [default: 10].
    --height=<h>         Maze grid height in cells. 1 renders a flat, single layer maze [default: 1].
    --depth=<d>          Maze grid depth in cells [default: 10].
    --cell-width=<n>     World units one cell spans along x [default: 1].
    --cell-height=<n>    World units one cell spans along y [default: 1].
    --cell-depth=<n>     World units one cell spans along z [default: 1].
    --wall-block=<id>    Block identifier for the solid maze walls [default: stone].
    --path-block=<id>    Block identifier for the carved passages [default: air].
    --outside-block=<id> Block identifier for the outer boundary shell [default: stone].
    --seed=<n>           Random seed. Omit for a fresh seed, reported on completion.
    --blocks-out=<path>  Write the block volume to a text file: one `x y z block` line per voxel, sorted by coordinate.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_generate: bool,
    cmd_recursive_backtracker: bool,
    cmd_prim: bool,
    cmd_kruskal: bool,
    cmd_hunt_and_kill: bool,
    flag_width: usize,
    flag_height: usize,
    flag_depth: usize,
    flag_cell_width: usize,
    flag_cell_height: usize,
    flag_cell_depth: usize,
    flag_wall_block: String,
    flag_path_block: String,
    flag_outside_block: String,
    flag_seed: Option<u64>,
    flag_blocks_out: String,
}

mod errors {
    // Create the Error, ErrorKind, ResultExt, and Result types.
    // Result is a typedef of std `Result` with the error type our own `Error`,
    // and the From conversions that let try! and ? work for it.
    use error_chain::*;
    error_chain! {

        foreign_links {
            Io(::std::io::Error);
            Engine(::voxmaze::render::EngineError);
            Render(::voxmaze::render::RenderError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: MazeArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    if !args.cmd_generate {
        return Ok(());
    }

    let algorithm = selected_algorithm(&args);
    let request = MazeRequest {
        width: args.flag_width,
        height: args.flag_height,
        depth: args.flag_depth,
        cell_size: CellSize::new(args.flag_cell_width,
                                 args.flag_cell_height,
                                 args.flag_cell_depth)?,
        palette: BlockPalette::new(args.flag_wall_block.as_str(),
                                   args.flag_path_block.as_str(),
                                   args.flag_outside_block.as_str()),
        algorithm,
        seed: args.flag_seed,
    };

    let generated = generate_maze(&request)?;

    println!("Generated a {}x{}x{} {} maze (seed {}): {} passages, {} blocks.",
             request.width,
             request.height,
             request.depth,
             algorithm,
             generated.seed,
             generated.passages,
             generated.volume.len());
    for (block, count) in generated.volume
        .iter()
        .map(|(_, block)| block.as_str())
        .counts()
        .into_iter()
        .sorted()
    {
        println!("  {:>8} x {}", count, block);
    }

    if !args.flag_blocks_out.is_empty() {
        write_blocks_to_file(&generated.volume, Path::new(&args.flag_blocks_out))?;
        println!("Blocks written to {}", args.flag_blocks_out);
    }

    Ok(())
}

fn selected_algorithm(args: &MazeArgs) -> MazeAlgorithm {
    if args.cmd_prim {
        MazeAlgorithm::Prim
    } else if args.cmd_kruskal {
        MazeAlgorithm::Kruskal
    } else if args.cmd_hunt_and_kill {
        MazeAlgorithm::HuntAndKill
    } else {
        MazeAlgorithm::RecursiveBacktracker
    }
}

fn write_blocks_to_file(volume: &WorldVolume, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    for (point, block) in volume.iter().sorted_by_key(|&(point, _)| *point) {
        writeln!(writer, "{} {} {} {}", point.x, point.y, point.z, block)?;
    }
    Ok(())
}
