//! Core types and definitions for the tank battle simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! game items, the `GameState` model and its queries, commands, observer
//! events, snapshots, and constants. It has no dependency on any rendering
//! or windowing framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod grid;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
