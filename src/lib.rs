//! **voxmaze** generates mazes over a 3D grid and renders them into voxel
//! block volumes.
//!
//! Four spanning structure algorithms carve the passages (recursive
//! backtracker, randomized Prim's, randomized Kruskal's, hunt-and-kill); the
//! render module rasterizes the passage graph into a sparse block map with an
//! outer shell, solid walls and carved corridors.

pub mod cells;
pub mod disjoint_set;
pub mod generators;
pub mod grid;
pub mod maze;
pub mod rasterize;
pub mod render;
pub mod units;
pub mod voxels;
mod utils;
