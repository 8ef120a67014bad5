//! Final mesh assembly: vertex streams, index width and naming

use super::kernel::GeometryKernel;
use super::{BuiltMesh, BuiltSubmesh, IndexBuffer, IndexFormat, MeshVertex, SubMesh};
use crate::foundation::math::Aabb;

/// Largest index count a single submesh may have with 16-bit indices
pub const MAX_U16_INDEX_COUNT: usize = 65535;

/// Number of distinct vertices addressable by 16-bit indices
const MAX_U16_VERTEX_COUNT: usize = 1 << 16;

/// What a mesh is being built for; decides its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRole<'a> {
    /// Chunk root of the world tree, named after the worldspawn
    ChunkRoot {
        /// Worldspawn base name
        base: &'a str,
    },
    /// Brush entity model
    Entity {
        /// Entity name
        name: &'a str,
    },
}

/// Names generated for one mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshNames {
    /// Name of the render entity
    pub model: String,
    /// Name of the render mesh
    pub mesh: String,
}

impl MeshNames {
    /// Name for the collision mesh derived from this render mesh
    pub fn collision(&self) -> String {
        self.mesh.replace("_mesh", "_collision")
    }
}

/// Per-import counter that suffixes every generated mesh name
#[derive(Debug, Default)]
pub struct NameCounter {
    next: u32,
}

impl NameCounter {
    /// Produce the names for the next mesh
    pub fn next_names(&mut self, role: MeshRole<'_>) -> MeshNames {
        self.next += 1;
        let n = self.next;
        match role {
            MeshRole::ChunkRoot { base } => {
                let model = format!("{base}_{n}");
                let mesh = format!("{model}_mesh");
                MeshNames { model, mesh }
            }
            MeshRole::Entity { name } => MeshNames {
                model: name.to_string(),
                mesh: format!("{name}_{n}_mesh"),
            },
        }
    }

    /// Number of names handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}

/// Turns welded vertices and submesh buckets into a [`BuiltMesh`]
pub struct MeshAssembler<'k> {
    kernel: &'k dyn GeometryKernel,
}

impl<'k> MeshAssembler<'k> {
    /// Create an assembler that recomputes bounds and tangents with `kernel`
    pub fn new(kernel: &'k dyn GeometryKernel) -> Self {
        Self { kernel }
    }

    /// Index width for a whole mesh
    ///
    /// 32-bit as soon as any one submesh exceeds the 16-bit index count, or
    /// when the vertex count itself cannot be addressed with 16 bits.
    pub fn select_index_format(submeshes: &[SubMesh], vertex_count: usize) -> IndexFormat {
        let wide_submesh = submeshes
            .iter()
            .any(|s| s.triangle_count() * 3 > MAX_U16_INDEX_COUNT);
        if wide_submesh || vertex_count > MAX_U16_VERTEX_COUNT {
            IndexFormat::U32
        } else {
            IndexFormat::U16
        }
    }

    /// Emit vertex streams 1:1 from `vertices` and one index buffer per non-empty submesh
    pub fn assemble(&self, name: &str, vertices: &[MeshVertex], submeshes: &[SubMesh]) -> BuiltMesh {
        let index_format = Self::select_index_format(submeshes, vertices.len());
        if index_format == IndexFormat::U32 {
            log::warn!(
                "Note: mesh '{}' uses 32-bit indices due to high index count. Render performance may be reduced!",
                name
            );
        }

        let mut mesh = BuiltMesh {
            name: name.to_string(),
            positions: vertices.iter().map(|v| v.position).collect(),
            normals: vertices.iter().map(|v| v.normal).collect(),
            uvs: vertices.iter().map(|v| v.uv).collect(),
            tangents: Vec::new(),
            submeshes: submeshes
                .iter()
                .filter(|s| !s.indices.is_empty())
                .map(|s| BuiltSubmesh {
                    material_id: s.material_id,
                    indices: IndexBuffer::from_indices(&s.indices, index_format),
                })
                .collect(),
            index_format,
            bounds: Aabb::default(),
        };

        self.kernel.recalculate(&mut mesh);
        mesh
    }
}
