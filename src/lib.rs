pub mod error;

pub mod game;

pub mod game_tree;

pub mod render;

pub mod report;

pub mod solver;

pub use error::MalformedTreeError;
pub use solver::solve;
