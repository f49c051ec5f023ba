pub mod app;
pub mod backend;
pub mod config;
pub mod engine;
pub mod model;
pub mod tui;
