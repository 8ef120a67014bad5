//! State owned by one import
//!
//! Created at the start of [`LevelMesher::import`](super::LevelMesher::import)
//! and threaded by reference through every chunk build. The buffers are
//! cleared between chunks, never reallocated.

use super::report::BuildReport;
use crate::bsp::FaceSet;
use crate::mesh::assembler::NameCounter;
use crate::mesh::{SubmeshBuckets, VertexRemapper};

const INITIAL_FACE_CAPACITY: usize = 256;
const INITIAL_VERTEX_CAPACITY: usize = 1024;
const INITIAL_SUBMESH_CAPACITY: usize = 8;

/// Pooled buffers, name counter and statistics for one import
#[derive(Debug)]
pub struct BuildContext {
    /// Shared face accumulator used while choosing chunk roots
    pub accumulator: FaceSet,
    /// Faces of the chunk currently being built
    pub chunk_faces: FaceSet,
    /// Vertex welding table for the current chunk
    pub remapper: VertexRemapper,
    /// Material buckets for the current chunk
    pub buckets: SubmeshBuckets,
    /// Suffix counter for generated names
    pub names: NameCounter,
    /// Statistics gathered so far
    pub report: BuildReport,
}

impl BuildContext {
    /// Create a context with pre-sized buffers
    pub fn new() -> Self {
        Self {
            accumulator: FaceSet::with_capacity(INITIAL_FACE_CAPACITY),
            chunk_faces: FaceSet::with_capacity(INITIAL_FACE_CAPACITY),
            remapper: VertexRemapper::with_capacity(INITIAL_VERTEX_CAPACITY),
            buckets: SubmeshBuckets::with_capacity(INITIAL_SUBMESH_CAPACITY),
            names: NameCounter::default(),
            report: BuildReport::default(),
        }
    }

    /// Reset the per-chunk buffers
    pub fn begin_chunk(&mut self) {
        self.chunk_faces.clear();
        self.remapper.clear();
        self.buckets.clear();
    }

    /// Statistics gathered so far
    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// Finish the import, keeping only its statistics
    pub fn into_report(self) -> BuildReport {
        self.report
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::new()
    }
}
