//! Math utilities and types
//!
//! Provides the vector, rotation and bounding-box types shared by every
//! stage of the mesh pipeline.

pub use nalgebra::{Vector2, Vector3, Vector4, Quaternion, Unit};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::zeros(), Vec3::zeros())
    }
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box enclosing every point, or `None` for an empty iterator
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self::new(first, first);
        for point in points {
            bounds.min = bounds.min.inf(point);
            bounds.max = bounds.max.sup(point);
        }
        Some(bounds)
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Largest half-extent across the three axes
    pub fn max_extent(&self) -> f32 {
        self.extents().max()
    }

    /// Convert a box in BSP coordinates (Z up) into engine space (Y up)
    ///
    /// Swaps the Y and Z axes and applies the import scale.
    pub fn to_engine_space(&self, scale: f32) -> Self {
        let swizzle = |v: Vec3| Vec3::new(v.x, v.z, v.y) * scale;
        let a = swizzle(self.min);
        let b = swizzle(self.max);
        Self::new(a.inf(&b), a.sup(&b))
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Area of the triangle spanned by three points
    pub fn triangle_area(a: &Vec3, b: &Vec3, c: &Vec3) -> f32 {
        (b - a).cross(&(c - a)).magnitude() * 0.5
    }
}
