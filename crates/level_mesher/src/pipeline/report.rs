//! Per-import statistics

use serde::Serialize;

use crate::foundation::time::StageTimings;

/// What one import produced and what it dropped along the way
///
/// Nothing counted here is an error; empty chunks and degenerate collision
/// triangles are expected in real levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    /// Chunk roots chosen by the subdivider
    pub chunk_roots: usize,
    /// World chunk meshes handed to the scene
    pub meshes_built: usize,
    /// Brush model meshes handed to the scene
    pub model_meshes_built: usize,
    /// Chunk roots or models that produced no mesh
    pub empty_chunks: usize,
    /// Submeshes dropped by the skip marker
    pub skipped_submeshes: usize,
    /// Collision triangles dropped after vertex merging
    pub degenerate_triangles: usize,
    /// Vertices removed by collision simplification
    pub merged_collision_vertices: usize,
    /// Meshes that needed 32-bit indices
    pub wide_index_meshes: usize,
    /// Meshes too small for a collider
    pub tiny_meshes: usize,
    /// Wall time per stage
    pub timings: StageTimings,
}

impl BuildReport {
    /// All meshes handed to the scene
    pub fn total_meshes(&self) -> usize {
        self.meshes_built + self.model_meshes_built
    }

    /// Log a one-line summary at info level
    pub fn log_summary(&self) {
        log::info!(
            "Level mesh import: {} chunk roots, {} world meshes, {} model meshes, {} empty, {} skipped submeshes",
            self.chunk_roots,
            self.meshes_built,
            self.model_meshes_built,
            self.empty_chunks,
            self.skipped_submeshes
        );
        log::info!(
            "Collision: {} merged vertices, {} degenerate triangles, {} tiny meshes; {} wide-index meshes; {:.2?} total",
            self.merged_collision_vertices,
            self.degenerate_triangles,
            self.tiny_meshes,
            self.wide_index_meshes,
            self.timings.total()
        );
    }
}
