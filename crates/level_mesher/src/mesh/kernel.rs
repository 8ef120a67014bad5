//! Bounds and tangent recomputation
//!
//! Hosts with their own geometry code plug it in through [`GeometryKernel`];
//! [`StandardKernel`] is used otherwise.

use super::BuiltMesh;
use crate::foundation::math::{Aabb, Vec3, Vec4};

/// Recomputes derived mesh data after vertex streams change
pub trait GeometryKernel {
    /// Refresh [`BuiltMesh::bounds`] from the positions
    fn recalculate_bounds(&self, mesh: &mut BuiltMesh);

    /// Refresh [`BuiltMesh::tangents`] from positions, normals, UVs and indices
    fn recalculate_tangents(&self, mesh: &mut BuiltMesh);

    /// Both of the above
    fn recalculate(&self, mesh: &mut BuiltMesh) {
        self.recalculate_bounds(mesh);
        self.recalculate_tangents(mesh);
    }
}

/// Axis-aligned bounds plus per-triangle UV-gradient tangents
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardKernel;

impl GeometryKernel for StandardKernel {
    fn recalculate_bounds(&self, mesh: &mut BuiltMesh) {
        mesh.bounds = Aabb::from_points(&mesh.positions).unwrap_or_default();
    }

    fn recalculate_tangents(&self, mesh: &mut BuiltMesh) {
        let count = mesh.vertex_count();
        let mut tan = vec![Vec3::zeros(); count];
        let mut bitan = vec![Vec3::zeros(); count];

        let triangles: Vec<[u32; 3]> = mesh.triangles().collect();
        for [i0, i1, i2] in triangles {
            let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
            if i0 >= count || i1 >= count || i2 >= count {
                continue;
            }

            let e1 = mesh.positions[i1] - mesh.positions[i0];
            let e2 = mesh.positions[i2] - mesh.positions[i0];
            let d1 = mesh.uvs[i1] - mesh.uvs[i0];
            let d2 = mesh.uvs[i2] - mesh.uvs[i0];

            let det = d1.x * d2.y - d2.x * d1.y;
            if det.abs() <= f32::EPSILON {
                continue;
            }
            let r = 1.0 / det;
            let sdir = (e1 * d2.y - e2 * d1.y) * r;
            let tdir = (e2 * d1.x - e1 * d2.x) * r;

            for i in [i0, i1, i2] {
                tan[i] += sdir;
                bitan[i] += tdir;
            }
        }

        mesh.tangents = (0..count)
            .map(|i| {
                let n = mesh.normals[i];
                // Gram-Schmidt against the normal
                let t = tan[i] - n * n.dot(&tan[i]);
                let t = t.try_normalize(f32::EPSILON).unwrap_or_else(|| fallback_tangent(&n));
                let w = if n.cross(&t).dot(&bitan[i]) < 0.0 { -1.0 } else { 1.0 };
                Vec4::new(t.x, t.y, t.z, w)
            })
            .collect();
    }
}

/// Any unit vector perpendicular to `normal`
fn fallback_tangent(normal: &Vec3) -> Vec3 {
    let axis = if normal.x.abs() < 0.9 { Vec3::x() } else { Vec3::y() };
    normal
        .cross(&axis)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vec3::x)
}
