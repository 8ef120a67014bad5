//! Small hand-built trees for tests

use super::{BspFace, BspLeaf, BspModel, BspNode, BspTree, BspVertex, NodeRef, TexInfo};
use crate::foundation::math::{Aabb, Vec2, Vec3};

/// Builds a [`BspTree`] face by face
///
/// Triangles lie in the XZ plane (normal +Y) starting at the given X offset,
/// so faces added with different offsets never share positions. Node and
/// leaf bounds are filled in by [`TreeBuilder::build`].
#[derive(Default)]
pub struct TreeBuilder {
    tree: BspTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn tex_id(&mut self, name: &str) -> usize {
        if let Some(index) = self.tree.tex_infos.iter().position(|t| t.name == name) {
            return index;
        }
        self.tree.tex_infos.push(TexInfo { name: name.to_string() });
        self.tree.tex_infos.len() - 1
    }

    fn push_face(&mut self, name: &str, corners: &[Vec3], offsets: &[u32]) {
        let tex_id = self.tex_id(name);
        let first_vertex = self.tree.vertices.len();
        for (i, corner) in corners.iter().enumerate() {
            self.tree.vertices.push(BspVertex {
                position: *corner,
                normal: Vec3::new(0.0, 1.0, 0.0),
                tex_coord: Vec2::new(i as f32 * 0.25, 0.0),
            });
        }
        let first_mesh_vertex = self.tree.mesh_vertices.len();
        self.tree.mesh_vertices.extend_from_slice(offsets);
        self.tree.faces.push(BspFace {
            tex_id,
            first_vertex,
            first_mesh_vertex,
            mesh_vertex_count: offsets.len(),
        });
    }

    /// Right triangle with legs of `size`, area `size² / 2`
    pub fn face_triangle(mut self, name: &str, x: f32, size: f32) -> Self {
        let corners = [
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + size, 0.0, 0.0),
            Vec3::new(x, 0.0, size),
        ];
        self.push_face(name, &corners, &[0, 1, 2]);
        self
    }

    /// Square made of two triangles sharing an edge: 4 vertices, 6 entries
    pub fn face_quad(mut self, name: &str, x: f32, size: f32) -> Self {
        let corners = [
            Vec3::new(x, 0.0, 0.0),
            Vec3::new(x + size, 0.0, 0.0),
            Vec3::new(x + size, 0.0, size),
            Vec3::new(x, 0.0, size),
        ];
        self.push_face(name, &corners, &[0, 1, 2, 0, 2, 3]);
        self
    }

    /// Leaf over an explicit face range
    pub fn leaf(mut self, first_face: usize, face_count: usize) -> Self {
        self.tree.leaves.push(BspLeaf {
            bounds: Aabb::default(),
            first_face,
            face_count,
        });
        self
    }

    /// One triangle face plus a leaf that owns only it
    pub fn leaf_with_triangle(self, name: &str, x: f32, size: f32) -> Self {
        let builder = self.face_triangle(name, x, size);
        let face = builder.tree.faces.len() - 1;
        builder.leaf(face, 1)
    }

    /// Interior node with arbitrary children
    pub fn node(mut self, front: NodeRef, back: NodeRef) -> Self {
        self.tree.nodes.push(BspNode {
            bounds: Aabb::default(),
            children: [front, back],
        });
        self
    }

    /// Interior node over two leaves
    pub fn split_leaves(self, front: usize, back: usize) -> Self {
        self.node(NodeRef::Leaf(front), NodeRef::Leaf(back))
    }

    /// Brush model over a face range
    pub fn model(mut self, first_face: usize, face_count: usize) -> Self {
        self.tree.models.push(BspModel { first_face, face_count });
        self
    }

    /// Finish, filling bounds from the face vertices
    pub fn build(mut self) -> BspTree {
        let leaf_bounds: Vec<Aabb> = self
            .tree
            .leaves
            .iter()
            .map(|leaf| self.faces_bounds(leaf.first_face, leaf.face_count))
            .collect();
        for (leaf, bounds) in self.tree.leaves.iter_mut().zip(leaf_bounds) {
            leaf.bounds = bounds;
        }

        for index in (0..self.tree.nodes.len()).rev() {
            let bounds = self.node_bounds(NodeRef::Node(index), 0);
            self.tree.nodes[index].bounds = bounds;
        }

        self.tree
    }

    fn faces_bounds(&self, first_face: usize, face_count: usize) -> Aabb {
        let positions: Vec<Vec3> = self
            .tree
            .faces
            .iter()
            .skip(first_face)
            .take(face_count)
            .flat_map(|face| {
                (0..face.mesh_vertex_count).filter_map(move |corner| {
                    let offset = *self.tree.mesh_vertices.get(face.first_mesh_vertex + corner)?;
                    let vertex = self.tree.vertices.get(face.first_vertex + offset as usize)?;
                    Some(vertex.position)
                })
            })
            .collect();
        // Vertices are engine space, tree bounds are BSP axes; the swap is its own inverse.
        Aabb::from_points(&positions).unwrap_or_default().to_engine_space(1.0)
    }

    fn node_bounds(&self, node: NodeRef, depth: usize) -> Aabb {
        // Deliberately malformed trees may loop; stop instead of recursing forever.
        if depth > self.tree.nodes.len() {
            return Aabb::default();
        }
        match node {
            NodeRef::Leaf(index) => self.tree.leaves.get(index).map_or_else(Aabb::default, |l| l.bounds),
            NodeRef::Node(index) => match self.tree.nodes.get(index) {
                Some(n) => {
                    let a = self.node_bounds(n.children[0], depth + 1);
                    let b = self.node_bounds(n.children[1], depth + 1);
                    Aabb::new(a.min.inf(&b.min), a.max.sup(&b.max))
                }
                None => Aabb::default(),
            },
        }
    }
}
