//! Vertex welding and per-material triangle bucketing
//!
//! Both buffers live for a whole import and are cleared, not reallocated,
//! between chunk builds.

use std::collections::HashMap;

use super::{MeshVertex, SubMesh};
use crate::bsp::{BspTree, TexInfo};
use crate::error::Result;
use crate::foundation::math::{Quat, Vec2, Vec3};

/// Offset added to every source texture coordinate
const UV_OFFSET: f32 = 0.5;

/// Local space of one chunk build
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkFrame {
    /// Subtracted from every position
    pub origin: Vec3,
    /// Applied to positions (after the origin shift) and normals
    pub rotation: Option<Quat>,
}

impl ChunkFrame {
    /// Frame with no rotation
    pub fn at(origin: Vec3) -> Self {
        Self { origin, rotation: None }
    }
}

/// Maps global vertex indices to chunk-local ones
///
/// Holds exactly one [`MeshVertex`] per distinct global base index seen
/// since the last [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct VertexRemapper {
    vertices: Vec<MeshVertex>,
    lookup: HashMap<usize, u32>,
}

impl VertexRemapper {
    /// Create a remapper with room for `capacity` vertices
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
            lookup: HashMap::with_capacity(capacity),
        }
    }

    /// Reset for the next chunk
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.lookup.clear();
    }

    /// Local index for `base_index`, transforming and appending the vertex on first use
    pub fn find_or_add(&mut self, tree: &BspTree, base_index: usize, frame: &ChunkFrame) -> Result<u32> {
        if let Some(&local) = self.lookup.get(&base_index) {
            return Ok(local);
        }

        let source = tree.vertex(base_index)?;
        let mut position = source.position - frame.origin;
        let mut normal = source.normal;
        if let Some(rotation) = frame.rotation {
            position = rotation * position;
            normal = rotation * normal;
        }

        let local = u32::try_from(self.vertices.len()).unwrap_or(u32::MAX);
        self.vertices.push(MeshVertex {
            position,
            normal,
            uv: source.tex_coord + Vec2::new(UV_OFFSET, UV_OFFSET),
            base_index,
        });
        self.lookup.insert(base_index, local);
        Ok(local)
    }

    /// Welded vertices in insertion order
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Number of welded vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether no vertex has been added
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Per-material triangle lists for one chunk
///
/// Material counts per chunk are small, so lookups scan linearly.
#[derive(Debug, Default)]
pub struct SubmeshBuckets {
    submeshes: Vec<SubMesh>,
}

impl SubmeshBuckets {
    /// Create an empty bucket list
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            submeshes: Vec::with_capacity(capacity),
        }
    }

    /// Reset for the next chunk
    pub fn clear(&mut self) {
        self.submeshes.clear();
    }

    /// Append a local index to the bucket for `material_id`, creating it on first use
    pub fn append(&mut self, material_id: usize, local_index: u32) {
        if let Some(submesh) = self.submeshes.iter_mut().find(|s| s.material_id == material_id) {
            submesh.indices.push(local_index);
            return;
        }

        self.submeshes.push(SubMesh {
            material_id,
            indices: vec![local_index],
        });
    }

    /// Drop every bucket whose material name contains `marker`
    ///
    /// Matching is case-sensitive. Returns the number of buckets removed.
    pub fn remove_skipped(&mut self, tex_infos: &[TexInfo], marker: &str) -> usize {
        let before = self.submeshes.len();
        self.submeshes.retain(|submesh| {
            let skip = tex_infos
                .get(submesh.material_id)
                .is_some_and(|info| info.name.contains(marker));
            if skip {
                log::debug!("Skipping submesh with material id {}", submesh.material_id);
            }
            !skip
        });
        before - self.submeshes.len()
    }

    /// Buckets in creation order
    pub fn submeshes(&self) -> &[SubMesh] {
        &self.submeshes
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.submeshes.len()
    }

    /// Whether there are no buckets
    pub fn is_empty(&self) -> bool {
        self.submeshes.is_empty()
    }
}
