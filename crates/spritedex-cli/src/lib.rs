//! Spritedex CLI library.
//!
//! This crate provides the command implementations behind the `spritedex`
//! binary and the file input layer that reads native and Tiled tables.

pub mod commands;
pub mod input;
