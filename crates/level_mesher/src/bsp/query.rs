//! Tree walks: validation, face collection and surface area

use std::collections::HashSet;

use super::{BspFace, BspTree, NodeRef};
use crate::error::{MeshError, Result};
use crate::foundation::math::utils::triangle_area;

/// Insertion-ordered set of face indices
///
/// Faces are kept in the order the walk discovers them so chunk output is
/// deterministic; the hash set only guards against collecting a face twice.
#[derive(Debug, Default, Clone)]
pub struct FaceSet {
    order: Vec<usize>,
    seen: HashSet<usize>,
}

impl FaceSet {
    /// Create an empty set with room for `capacity` faces
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            seen: HashSet::with_capacity(capacity),
        }
    }

    /// Add a face; returns `false` if it was already present
    pub fn insert(&mut self, face: usize) -> bool {
        if self.seen.insert(face) {
            self.order.push(face);
            true
        } else {
            false
        }
    }

    /// Forget every face while keeping allocations
    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }

    /// Number of faces
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no face has been collected
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Faces in discovery order
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }
}

impl BspTree {
    /// Check every reference reachable from `root` and every face in the table
    ///
    /// Fails on the first out-of-range index or on a node that can be reached
    /// twice. Everything after a successful validation may still index
    /// through the checked accessors, but will not hit an error.
    pub fn validate(&self, root: NodeRef) -> Result<()> {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![root];

        while let Some(current) = stack.pop() {
            match current {
                NodeRef::Node(index) => {
                    let node = self.node(index)?;
                    if std::mem::replace(&mut visited[index], true) {
                        return Err(MeshError::CyclicTree { node: index });
                    }
                    stack.extend(node.children);
                }
                NodeRef::Leaf(index) => {
                    let leaf = self.leaf(index)?;
                    self.check_face_range(leaf.first_face, leaf.face_count)?;
                }
            }
        }

        for model in &self.models {
            self.check_face_range(model.first_face, model.face_count)?;
        }

        for face in &self.faces {
            self.tex_info(face.tex_id)?;
            for corner in 0..face.mesh_vertex_count {
                let base = self.base_index(face, corner)?;
                self.vertex(base)?;
            }
        }

        Ok(())
    }

    fn check_face_range(&self, first: usize, count: usize) -> Result<()> {
        if count > 0 {
            self.face(first + count - 1)?;
        }
        Ok(())
    }

    /// Collect every face below `node` into `out`, front child first
    ///
    /// Bounded by the node count, so a cyclic tree is reported instead of
    /// looping forever.
    pub fn collect_faces(&self, node: NodeRef, out: &mut FaceSet) -> Result<()> {
        let mut stack = vec![node];
        let mut nodes_seen = 0usize;

        while let Some(current) = stack.pop() {
            match current {
                NodeRef::Node(index) => {
                    nodes_seen += 1;
                    if nodes_seen > self.nodes.len() {
                        return Err(MeshError::CyclicTree { node: index });
                    }
                    let [front, back] = self.node(index)?.children;
                    stack.push(back);
                    stack.push(front);
                }
                NodeRef::Leaf(index) => {
                    let leaf = self.leaf(index)?;
                    for face in leaf.first_face..leaf.first_face + leaf.face_count {
                        out.insert(face);
                    }
                }
            }
        }

        Ok(())
    }

    /// Total triangle area of one face
    pub fn face_area(&self, face: &BspFace) -> Result<f32> {
        let mut area = 0.0;
        let triangles = face.mesh_vertex_count / 3;
        for triangle in 0..triangles {
            let a = self.vertex(self.base_index(face, triangle * 3)?)?.position;
            let b = self.vertex(self.base_index(face, triangle * 3 + 1)?)?.position;
            let c = self.vertex(self.base_index(face, triangle * 3 + 2)?)?.position;
            area += triangle_area(&a, &b, &c);
        }
        Ok(area)
    }

    /// Squared total surface area of a list of faces
    pub fn surface_area_sqr(&self, faces: &[usize]) -> Result<f32> {
        let mut area = 0.0;
        for &index in faces {
            area += self.face_area(self.face(index)?)?;
        }
        Ok(area * area)
    }
}
