//! Configuration management for the N-Queens enumerator

pub mod settings;

pub use settings::{
    BoardConfig, CliOverrides, OutputConfig, OutputFormat, Settings, SolverConfig,
};
