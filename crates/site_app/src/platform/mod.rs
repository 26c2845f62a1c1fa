pub mod app;
pub mod audio;
pub mod config;
pub mod effects;
pub mod logging;
pub mod render;
