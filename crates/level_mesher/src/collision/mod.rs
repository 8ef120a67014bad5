//! Physics-only collision meshes
//!
//! Collision meshes are derived from a finished render mesh but share no
//! data with it. Positions stay in the same chunk-local space.

mod builder;

pub use builder::CollisionMeshBuilder;

use crate::foundation::math::Vec3;

/// Vertex and triangle arrays for a mesh collider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMesh {
    /// Name, derived from the render mesh name
    pub name: String,
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Triangles; each has three pairwise-distinct indices after simplification
    pub triangles: Vec<[u32; 3]>,
    /// Triangles dropped because merging collapsed them
    pub dropped_triangles: usize,
}

impl CollisionMesh {
    /// Whether the mesh has no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Flat index list, three per triangle
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Radius of the origin-centred sphere enclosing every referenced vertex
    pub fn bounding_radius(&self) -> f32 {
        let mut max_distance_sq = 0.0f32;
        for triangle in &self.triangles {
            for &index in triangle {
                if let Some(vertex) = self.vertices.get(index as usize) {
                    max_distance_sq = max_distance_sq.max(vertex.magnitude_squared());
                }
            }
        }
        max_distance_sq.sqrt()
    }
}
