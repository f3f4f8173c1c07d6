pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod poll;
pub mod render;
pub mod ui;
pub mod utils;

pub use error::{AppError, Result};
