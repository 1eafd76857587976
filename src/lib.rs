pub mod area;
pub mod block;
pub mod cli;
pub mod config;
pub mod error;
pub mod markers;
pub mod report;
pub mod scanner;
pub mod slot;
pub mod source;
pub mod util;
