//! Fatal import errors
//!
//! Per-chunk problems (no faces, degenerate triangles, wide indices) are not
//! errors: they show up as absent meshes and counters in
//! [`BuildReport`](crate::pipeline::BuildReport). Only broken input data
//! aborts an import.

use thiserror::Error;

use crate::config::ConfigError;

/// Structural problems that abort a whole level import
#[derive(Error, Debug)]
pub enum MeshError {
    /// A node is reachable more than once while walking down from the root
    #[error("BSP tree contains a cycle through node {node}")]
    CyclicTree {
        /// The node visited twice
        node: usize,
    },

    /// A child reference points past the node table
    #[error("node index {index} out of range ({count} nodes)")]
    NodeOutOfRange {
        /// Offending index
        index: usize,
        /// Number of nodes in the tree
        count: usize,
    },

    /// A child reference points past the leaf table
    #[error("leaf index {index} out of range ({count} leaves)")]
    LeafOutOfRange {
        /// Offending index
        index: usize,
        /// Number of leaves in the tree
        count: usize,
    },

    /// A leaf or model face range extends past the face table
    #[error("face index {index} out of range ({count} faces)")]
    FaceOutOfRange {
        /// Offending index
        index: usize,
        /// Number of faces in the tree
        count: usize,
    },

    /// A face's mesh-vertex range extends past the mesh-vertex table
    #[error("mesh vertex index {index} out of range ({count} mesh vertices)")]
    MeshVertexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of mesh-vertex entries
        count: usize,
    },

    /// A resolved base index points past the vertex table
    #[error("vertex index {index} out of range ({count} vertices)")]
    VertexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of vertices
        count: usize,
    },

    /// A face references a texture that does not exist
    #[error("texture info index {index} out of range ({count} texture infos)")]
    TexInfoOutOfRange {
        /// Offending index
        index: usize,
        /// Number of texture infos
        count: usize,
    },

    /// A brush model index points past the model table
    #[error("model index {index} out of range ({count} models)")]
    ModelOutOfRange {
        /// Offending index
        index: usize,
        /// Number of models
        count: usize,
    },

    /// Import settings failed validation
    #[error("invalid import settings: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias used throughout the pipeline
pub type Result<T> = std::result::Result<T, MeshError>;
