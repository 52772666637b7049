pub mod calendar;
pub mod config;
pub mod display;
pub mod error;
pub mod render;
pub mod shutdown;
pub mod sources;
pub mod startup;
pub mod utils;
