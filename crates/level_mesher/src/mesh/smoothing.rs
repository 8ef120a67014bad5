//! Normal smoothing across coincident vertices
//!
//! Vertices split along UV seams share a position but carry separate normals.
//! This pass snaps such vertices together and averages normals that lie
//! within the configured angle of each other.

use super::kernel::GeometryKernel;
use super::BuiltMesh;
use crate::foundation::math::utils::deg_to_rad;

/// Distance under which two vertices count as the same point
pub const COINCIDENT_DISTANCE: f32 = 0.01;

/// Averages normals of spatially coincident vertices
pub struct NormalSmoother<'k> {
    kernel: &'k dyn GeometryKernel,
}

impl<'k> NormalSmoother<'k> {
    /// Create a smoother that refreshes bounds and tangents with `kernel`
    pub fn new(kernel: &'k dyn GeometryKernel) -> Self {
        Self { kernel }
    }

    /// Smooth `mesh` in place
    ///
    /// Every pair closer than [`COINCIDENT_DISTANCE`] is snapped onto the
    /// earlier vertex, whatever their normals. Angle tests read the normals
    /// as they were before the pass. The averaged normal is the plain mean of
    /// the group and is not renormalized. Runs in O(n²) over the chunk's
    /// vertices.
    pub fn smooth(&self, mesh: &mut BuiltMesh, max_angle_degrees: f32) {
        let original_normals = mesh.normals.clone();
        let cos_threshold = deg_to_rad(max_angle_degrees).cos();
        let sqr_epsilon = COINCIDENT_DISTANCE * COINCIDENT_DISTANCE;
        let count = mesh.positions.len();

        for i in 0..count {
            let mut group_count = 1u32;
            let mut current_normal = original_normals[i];

            for j in 0..count {
                if i == j {
                    continue;
                }

                let from = mesh.positions[i];
                if (from - mesh.positions[j]).magnitude_squared() >= sqr_epsilon {
                    continue;
                }

                mesh.positions[j] = from;

                if original_normals[i].dot(&original_normals[j]) > cos_threshold {
                    current_normal += original_normals[j];
                    group_count += 1;
                }
            }

            if group_count >= 2 {
                #[allow(clippy::cast_precision_loss)]
                let divisor = group_count as f32;
                mesh.normals[i] = current_normal / divisor;
            }
        }

        self.kernel.recalculate(mesh);
    }
}
