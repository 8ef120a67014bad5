//! Collision mesh simplification
//!
//! Vertices closer than the configured distance are merged onto the first
//! kept vertex found, then triangles that lost a corner are dropped. The
//! kept-list scan is O(vertices × kept), which is fine for an import-time
//! pass over capped chunk sizes but not for anything per-frame.

use super::CollisionMesh;
use crate::foundation::math::Vec3;
use crate::mesh::BuiltMesh;

/// Builds collision meshes from render meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMeshBuilder {
    /// Merge vertices; when false the collider is a verbatim copy
    pub simplify: bool,
    /// Merge distance
    pub distance_threshold: f32,
}

impl CollisionMeshBuilder {
    /// Create a builder
    pub fn new(simplify: bool, distance_threshold: f32) -> Self {
        Self {
            simplify,
            distance_threshold,
        }
    }

    /// Collision mesh for `source`, named `name`
    pub fn build(&self, source: &BuiltMesh, name: impl Into<String>) -> CollisionMesh {
        let triangles: Vec<[u32; 3]> = source.triangles().collect();
        let mut mesh = if self.simplify {
            Self::simplify(&source.positions, &triangles, self.distance_threshold)
        } else {
            CollisionMesh {
                name: String::new(),
                vertices: source.positions.clone(),
                triangles,
                dropped_triangles: 0,
            }
        };
        mesh.name = name.into();

        log::debug!(
            "Collision mesh '{}': {} -> {} vertices, {} triangles dropped",
            mesh.name,
            source.vertex_count(),
            mesh.vertices.len(),
            mesh.dropped_triangles
        );
        mesh
    }

    /// Merge vertices within `distance_threshold` and drop collapsed triangles
    ///
    /// The first kept vertex within range wins; merged clusters are not
    /// averaged. Output triangles are dense and keep their relative order.
    pub fn simplify(positions: &[Vec3], triangles: &[[u32; 3]], distance_threshold: f32) -> CollisionMesh {
        let sqr_threshold = distance_threshold * distance_threshold;
        let mut kept: Vec<Vec3> = Vec::new();
        let mut remap: Vec<u32> = Vec::with_capacity(positions.len());

        for position in positions {
            let existing = kept
                .iter()
                .position(|k| (position - k).magnitude_squared() <= sqr_threshold);
            let index = existing.unwrap_or_else(|| {
                kept.push(*position);
                kept.len() - 1
            });
            remap.push(u32::try_from(index).unwrap_or(u32::MAX));
        }

        let mut out = Vec::with_capacity(triangles.len());
        let mut dropped = 0;
        for triangle in triangles {
            let mapped = triangle.map(|i| remap.get(i as usize).copied());
            match mapped {
                [Some(a), Some(b), Some(c)] if a != b && a != c && b != c => out.push([a, b, c]),
                _ => dropped += 1,
            }
        }

        CollisionMesh {
            name: String::new(),
            vertices: kept,
            triangles: out,
            dropped_triangles: dropped,
        }
    }
}
