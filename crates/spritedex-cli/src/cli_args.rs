//! CLI argument definitions for the spritedex command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{Parser, Subcommand};

/// Spritedex - sprite sheet catalog inspection and appearance lookup
#[derive(Parser)]
#[command(name = "spritedex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Validate a tile table and report every error and warning
    Validate {
        /// Path to the table file (.json native, .tsj or .tsx Tiled)
        #[arg(short, long)]
        table: String,

        /// Load profile (default, strict, lenient)
        #[arg(long)]
        profile: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Summarize a catalog: grid, fingerprint, subclasses, imagesets
    Inspect {
        /// Path to the table file (.json native, .tsj or .tsx Tiled)
        #[arg(short, long)]
        table: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Resolve an appearance to a tile and its current frame
    Resolve {
        /// Path to the table file (.json native, .tsj or .tsx Tiled)
        #[arg(short, long)]
        table: String,

        /// Entity kind
        #[arg(long, default_value = "creature")]
        kind: String,

        /// Imageset (skin) name
        #[arg(short, long)]
        imageset: String,

        /// Facing direction (down, left, right, up)
        #[arg(short, long)]
        direction: String,

        /// Subclass (npc, human, player, mob); omitted matches any
        #[arg(short, long)]
        subclass: Option<String>,

        /// Elapsed animation time in milliseconds
        #[arg(long, default_value_t = 0)]
        at: u64,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the frame timeline of a tile
    Sample {
        /// Path to the table file (.json native, .tsj or .tsx Tiled)
        #[arg(short, long)]
        table: String,

        /// Tile id to sample
        #[arg(long)]
        tile: u32,

        /// First elapsed time in milliseconds
        #[arg(long, default_value_t = 0)]
        from: u64,

        /// End of the window in milliseconds, exclusive (default: one loop)
        #[arg(long)]
        to: Option<u64>,

        /// Step in milliseconds (default: shortest frame duration)
        #[arg(long)]
        step: Option<u64>,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Convert a Tiled tileset into a native tile table
    Convert {
        /// Input file (.tsj or .tsx Tiled, or .json)
        #[arg(short, long)]
        input: String,

        /// Output native table path
        #[arg(short, long)]
        output: String,

        /// Write the table even if it does not load
        #[arg(long)]
        allow_invalid: bool,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}
