//! Read-only BSP level data
//!
//! These tables are produced by the level loader and are never mutated by
//! the mesh pipeline. Bounding boxes stay in BSP coordinates (Z up);
//! vertex data is already in engine space.

mod query;

#[cfg(test)]
pub(crate) mod fixtures;

pub use query::FaceSet;

use crate::error::{MeshError, Result};
use crate::foundation::math::{Aabb, Vec2, Vec3};

/// Reference to either an interior node or a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// Interior node index
    Node(usize),
    /// Leaf index
    Leaf(usize),
}

impl NodeRef {
    /// Decode the on-disk child encoding: non-negative values are nodes,
    /// negative values `-(leaf + 1)` are leaves
    pub fn from_raw(raw: i32) -> Self {
        match usize::try_from(raw) {
            Ok(node) => Self::Node(node),
            Err(_) => Self::Leaf(raw.unsigned_abs() as usize - 1),
        }
    }

    /// Whether this reference is terminal
    pub fn is_leaf(self) -> bool {
        matches!(self, Self::Leaf(_))
    }
}

/// Interior node with exactly two children
#[derive(Debug, Clone, PartialEq)]
pub struct BspNode {
    /// Bounds of everything below this node, in BSP axes (Z up)
    pub bounds: Aabb,
    /// Front and back children
    pub children: [NodeRef; 2],
}

/// Terminal region owning a contiguous face range
#[derive(Debug, Clone, PartialEq)]
pub struct BspLeaf {
    /// Bounds of the leaf volume, in BSP axes (Z up)
    pub bounds: Aabb,
    /// First face index
    pub first_face: usize,
    /// Number of faces
    pub face_count: usize,
}

/// One renderable face, stored as a triangle list
#[derive(Debug, Clone, PartialEq)]
pub struct BspFace {
    /// Index into [`BspTree::tex_infos`]
    pub tex_id: usize,
    /// Base added to every mesh-vertex offset of this face
    pub first_vertex: usize,
    /// First entry in [`BspTree::mesh_vertices`]
    pub first_mesh_vertex: usize,
    /// Number of mesh-vertex entries (three per triangle)
    pub mesh_vertex_count: usize,
}

/// Vertex as stored in the global vertex table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BspVertex {
    /// Position, already converted to engine space (Y up) by the loader
    pub position: Vec3,
    /// Normal
    pub normal: Vec3,
    /// Texture coordinate
    pub tex_coord: Vec2,
}

/// Texture description referenced by faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TexInfo {
    /// Material name used for lookup and skip filtering
    pub name: String,
}

/// Brush entity model: a contiguous face range outside the world tree
#[derive(Debug, Clone, PartialEq)]
pub struct BspModel {
    /// First face index
    pub first_face: usize,
    /// Number of faces
    pub face_count: usize,
}

/// Parsed level tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BspTree {
    /// Interior nodes
    pub nodes: Vec<BspNode>,
    /// Leaves
    pub leaves: Vec<BspLeaf>,
    /// Faces
    pub faces: Vec<BspFace>,
    /// Per-face vertex offsets, relative to [`BspFace::first_vertex`]
    pub mesh_vertices: Vec<u32>,
    /// Global vertex table
    pub vertices: Vec<BspVertex>,
    /// Texture infos
    pub tex_infos: Vec<TexInfo>,
    /// Brush entity models
    pub models: Vec<BspModel>,
}

impl BspTree {
    /// Root of the world tree
    pub const ROOT: NodeRef = NodeRef::Node(0);

    /// Look up an interior node
    pub fn node(&self, index: usize) -> Result<&BspNode> {
        self.nodes.get(index).ok_or(MeshError::NodeOutOfRange {
            index,
            count: self.nodes.len(),
        })
    }

    /// Look up a leaf
    pub fn leaf(&self, index: usize) -> Result<&BspLeaf> {
        self.leaves.get(index).ok_or(MeshError::LeafOutOfRange {
            index,
            count: self.leaves.len(),
        })
    }

    /// Look up a face
    pub fn face(&self, index: usize) -> Result<&BspFace> {
        self.faces.get(index).ok_or(MeshError::FaceOutOfRange {
            index,
            count: self.faces.len(),
        })
    }

    /// Look up a vertex by global base index
    pub fn vertex(&self, index: usize) -> Result<&BspVertex> {
        self.vertices.get(index).ok_or(MeshError::VertexOutOfRange {
            index,
            count: self.vertices.len(),
        })
    }

    /// Look up a texture info
    pub fn tex_info(&self, index: usize) -> Result<&TexInfo> {
        self.tex_infos.get(index).ok_or(MeshError::TexInfoOutOfRange {
            index,
            count: self.tex_infos.len(),
        })
    }

    /// Look up a brush model
    pub fn model(&self, index: usize) -> Result<&BspModel> {
        self.models.get(index).ok_or(MeshError::ModelOutOfRange {
            index,
            count: self.models.len(),
        })
    }

    /// Bounds of a node or leaf, in BSP coordinates
    pub fn bounds(&self, node: NodeRef) -> Result<Aabb> {
        match node {
            NodeRef::Node(index) => Ok(self.node(index)?.bounds),
            NodeRef::Leaf(index) => Ok(self.leaf(index)?.bounds),
        }
    }

    /// Global base index of the `corner`-th mesh vertex of a face
    pub fn base_index(&self, face: &BspFace, corner: usize) -> Result<usize> {
        let slot = face.first_mesh_vertex + corner;
        let offset = self.mesh_vertices.get(slot).ok_or(MeshError::MeshVertexOutOfRange {
            index: slot,
            count: self.mesh_vertices.len(),
        })?;
        Ok(face.first_vertex + *offset as usize)
    }
}
