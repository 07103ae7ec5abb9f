// ABOUTME: Library exports for gcode-thumbs modules for testing and external use
// ABOUTME: Makes internal modules available to integration tests

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod gcode;
pub mod renderer;
