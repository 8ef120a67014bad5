//! Chunk mesh data and the stages that build it
//!
//! A chunk build runs welding and bucketing ([`remap`]), then assembly
//! ([`assembler`]) and optionally smoothing ([`smoothing`]). Bounds and
//! tangents come from a [`GeometryKernel`](kernel::GeometryKernel).

pub mod assembler;
pub mod kernel;
pub mod remap;
pub mod smoothing;

pub use assembler::MeshAssembler;
pub use kernel::{GeometryKernel, StandardKernel};
pub use remap::{ChunkFrame, SubmeshBuckets, VertexRemapper};
pub use smoothing::NormalSmoother;

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{Aabb, Vec2, Vec3, Vec4};

/// Welded vertex in chunk-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshVertex {
    /// Position relative to the chunk origin
    pub position: Vec3,
    /// Normal
    pub normal: Vec3,
    /// Texture coordinate
    pub uv: Vec2,
    /// Global vertex this one was welded from; only used as the dedup key
    pub base_index: usize,
}

/// Triangle-vertex indices sharing one material
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubMesh {
    /// Index into the level's texture infos
    pub material_id: usize,
    /// Local vertex indices, three per triangle
    pub indices: Vec<u32>,
}

impl SubMesh {
    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Width of the index buffers of one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// Index data in the width chosen for its mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    /// 16-bit indices
    U16(Vec<u16>),
    /// 32-bit indices
    U32(Vec<u32>),
}

impl IndexBuffer {
    /// Narrow or keep `indices` according to `format`
    ///
    /// Callers pick `U16` only when every index fits, so narrowing is exact.
    pub fn from_indices(indices: &[u32], format: IndexFormat) -> Self {
        match format {
            IndexFormat::U16 => Self::U16(
                indices
                    .iter()
                    .map(|&i| u16::try_from(i).unwrap_or(u16::MAX))
                    .collect(),
            ),
            IndexFormat::U32 => Self::U32(indices.to_vec()),
        }
    }

    /// Width of this buffer
    pub fn format(&self) -> IndexFormat {
        match self {
            Self::U16(_) => IndexFormat::U16,
            Self::U32(_) => IndexFormat::U32,
        }
    }

    /// Number of indices
    pub fn len(&self) -> usize {
        match self {
            Self::U16(indices) => indices.len(),
            Self::U32(indices) => indices.len(),
        }
    }

    /// Whether the buffer holds no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index at `position`, widened to 32 bits
    pub fn get(&self, position: usize) -> Option<u32> {
        match self {
            Self::U16(indices) => indices.get(position).map(|&i| u32::from(i)),
            Self::U32(indices) => indices.get(position).copied(),
        }
    }

    /// All indices widened to 32 bits
    pub fn to_u32(&self) -> Vec<u32> {
        match self {
            Self::U16(indices) => indices.iter().map(|&i| u32::from(i)).collect(),
            Self::U32(indices) => indices.clone(),
        }
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(indices) => bytemuck::cast_slice(indices),
            Self::U32(indices) => bytemuck::cast_slice(indices),
        }
    }
}

/// One material's index buffer inside a [`BuiltMesh`]
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSubmesh {
    /// Index into the level's texture infos
    pub material_id: usize,
    /// Triangle list
    pub indices: IndexBuffer,
}

/// Interleaved vertex layout for GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    /// Position
    pub position: [f32; 3],
    /// Normal
    pub normal: [f32; 3],
    /// Texture coordinates
    pub tex_coord: [f32; 2],
    /// Tangent, with handedness in `w`
    pub tangent: [f32; 4],
}

/// Final render mesh for one chunk or brush model
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltMesh {
    /// Generated name, always ending in `_mesh`
    pub name: String,
    /// Positions relative to the chunk origin
    pub positions: Vec<Vec3>,
    /// Per-vertex normals
    pub normals: Vec<Vec3>,
    /// Per-vertex texture coordinates
    pub uvs: Vec<Vec2>,
    /// Per-vertex tangents, filled by the geometry kernel
    pub tangents: Vec<Vec4>,
    /// Index buffers in submesh order
    pub submeshes: Vec<BuiltSubmesh>,
    /// Index width shared by every submesh
    pub index_format: IndexFormat,
    /// Local-space bounds, filled by the geometry kernel
    pub bounds: Aabb,
}

impl BuiltMesh {
    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles across all submeshes
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }

    /// Every triangle of every submesh, in submesh order
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.submeshes.iter().flat_map(|submesh| {
            (0..submesh.indices.len() / 3).filter_map(move |t| {
                Some([
                    submesh.indices.get(t * 3)?,
                    submesh.indices.get(t * 3 + 1)?,
                    submesh.indices.get(t * 3 + 2)?,
                ])
            })
        })
    }

    /// Whether the mesh is too small to deserve a collider
    pub fn is_tiny(&self, min_extent: f32) -> bool {
        self.triangle_count() == 0 || self.bounds.max_extent() < min_extent
    }

    /// Interleave vertex streams for upload
    pub fn interleaved(&self) -> Vec<GpuVertex> {
        (0..self.vertex_count())
            .map(|i| GpuVertex {
                position: self.positions[i].into(),
                normal: self.normals[i].into(),
                tex_coord: self.uvs[i].into(),
                tangent: self.tangents.get(i).map_or([0.0; 4], |t| (*t).into()),
            })
            .collect()
    }
}
