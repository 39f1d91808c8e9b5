//! Looping animation sampling.
//!
//! Frame selection is a pure function of the frame list and the elapsed time
//! handed in by the caller. Nothing here reads a clock or keeps a frame
//! counter, so two callers sampling the same elapsed time always agree.

use crate::tile::{Frame, TileId};

/// A non-empty looping frame sequence.
///
/// Cumulative end times are computed once at construction so sampling is a
/// binary search rather than a walk over the frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<Frame>,
    /// `ends[i]` is the sum of durations of frames `0..=i`.
    ends: Vec<u64>,
}

impl Animation {
    /// Creates an animation. Returns `None` if `frames` is empty.
    pub fn new(frames: Vec<Frame>) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }

        let ends = frames
            .iter()
            .scan(0u64, |acc, frame| {
                *acc += u64::from(frame.duration_ms.get());
                Some(*acc)
            })
            .collect();

        Some(Self { frames, ends })
    }

    /// Returns the frames in playback order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Total duration of one loop in milliseconds. Always positive.
    pub fn cycle_length_ms(&self) -> u64 {
        self.ends[self.ends.len() - 1]
    }

    /// Returns the position of the active frame after `elapsed_ms`.
    pub fn frame_index_at(&self, elapsed_ms: u64) -> usize {
        let t = elapsed_ms % self.cycle_length_ms();
        // First frame whose end lies strictly after t.
        self.ends.partition_point(|&end| end <= t)
    }

    /// Returns the tile to draw after `elapsed_ms`.
    pub fn sample(&self, elapsed_ms: u64) -> TileId {
        self.frames[self.frame_index_at(elapsed_ms)].tile
    }

    /// Returns the first tile of the loop.
    pub fn first_tile(&self) -> TileId {
        self.frames[0].tile
    }
}

/// Returns the tile to draw for `animation` after `elapsed_ms`.
pub fn sample(animation: &Animation, elapsed_ms: u64) -> TileId {
    animation.sample(elapsed_ms)
}
