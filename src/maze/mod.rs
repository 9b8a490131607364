//! Maze generation module
//!
//! Carves the grid graph into a maze, incrementally.

mod generator;

pub use generator::MazeGenerator;
