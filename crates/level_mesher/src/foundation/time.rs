//! Time management utilities

use serde::Serialize;
use std::time::{Duration, Instant};

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

/// Pipeline stages whose wall time is tracked per import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Tree walk and chunk-root selection
    Subdivide,
    /// Vertex welding, bucketing and mesh assembly
    Assemble,
    /// Normal smoothing pass
    SmoothNormals,
    /// Collision mesh generation
    Collision,
}

/// Accumulated wall time per pipeline stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StageTimings {
    /// Time spent selecting chunk roots
    pub subdivide: Duration,
    /// Time spent welding and assembling meshes
    pub assemble: Duration,
    /// Time spent smoothing normals
    pub smooth_normals: Duration,
    /// Time spent building collision meshes
    pub collision: Duration,
}

impl StageTimings {
    /// Add a measured duration to a stage
    pub fn record(&mut self, stage: Stage, elapsed: Duration) {
        let slot = match stage {
            Stage::Subdivide => &mut self.subdivide,
            Stage::Assemble => &mut self.assemble,
            Stage::SmoothNormals => &mut self.smooth_normals,
            Stage::Collision => &mut self.collision,
        };
        *slot += elapsed;
    }

    /// Run `f`, charging its wall time to `stage`
    pub fn measure<T>(&mut self, stage: Stage, f: impl FnOnce() -> T) -> T {
        let mut stopwatch = Stopwatch::start_new();
        let value = f();
        stopwatch.stop();
        self.record(stage, stopwatch.elapsed());
        value
    }

    /// Total time across all stages
    pub fn total(&self) -> Duration {
        self.subdivide + self.assemble + self.smooth_normals + self.collision
    }
}
