pub mod cli;
pub mod commands;
pub mod model;
pub mod utils;
