//! Level import settings

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// # Import Settings
///
/// Every knob the mesh pipeline reads during one level import. Missing
/// fields in a config file fall back to [`ImportSettings::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Base name for chunk-root meshes
    pub worldspawn_name: String,
    /// Surface area above which a BSP node is split into its children
    pub max_mesh_surface_area: f32,
    /// Split every node down to its leaves regardless of area
    pub subdivide_all_leaves: bool,
    /// Maximum angle in degrees between normals that get averaged; 0 disables
    pub smoothing_angle: f32,
    /// Pipeline gate for the normal smoothing pass
    pub smooth_mesh_normals: bool,
    /// Merge nearby vertices when building collision meshes
    pub simplify_collision_meshes: bool,
    /// Merge distance used by collision simplification
    pub collision_distance_threshold: f32,
    /// Materials whose name contains this marker are dropped (case-sensitive)
    pub skip_texture_marker: String,
    /// Ask the scene collaborator to unwrap lightmap UVs for static meshes
    pub unwrap_lightmap_uvs: bool,
    /// Padding forwarded with each lightmap unwrap request
    pub lightmap_uv_padding: f32,
    /// Scale applied to BSP bounds when deriving chunk origins
    pub import_scale: f32,
    /// Meshes whose largest half-extent is below this get no collider
    pub tiny_mesh_extent: f32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            worldspawn_name: "worldspawn".to_string(),
            max_mesh_surface_area: 1000.0,
            subdivide_all_leaves: false,
            smoothing_angle: 0.0,
            smooth_mesh_normals: true,
            simplify_collision_meshes: true,
            collision_distance_threshold: 0.01,
            skip_texture_marker: "skip".to_string(),
            unwrap_lightmap_uvs: true,
            lightmap_uv_padding: 2.0,
            import_scale: 1.0,
            tiny_mesh_extent: 0.1,
        }
    }
}

impl ImportSettings {
    /// Set the worldspawn mesh name
    pub fn with_worldspawn_name(mut self, name: impl Into<String>) -> Self {
        self.worldspawn_name = name.into();
        self
    }

    /// Set the subdivision area threshold
    pub fn with_max_mesh_surface_area(mut self, area: f32) -> Self {
        self.max_mesh_surface_area = area;
        self
    }

    /// Force subdivision down to the leaves
    pub fn with_subdivide_all_leaves(mut self, enabled: bool) -> Self {
        self.subdivide_all_leaves = enabled;
        self
    }

    /// Set the smoothing angle in degrees
    pub fn with_smoothing_angle(mut self, degrees: f32) -> Self {
        self.smoothing_angle = degrees;
        self
    }

    /// Configure collision simplification
    pub fn with_collision_simplification(mut self, enabled: bool, threshold: f32) -> Self {
        self.simplify_collision_meshes = enabled;
        self.collision_distance_threshold = threshold;
        self
    }

    /// Set the skip material marker
    pub fn with_skip_texture_marker(mut self, marker: impl Into<String>) -> Self {
        self.skip_texture_marker = marker.into();
        self
    }

    /// Whether the normal smoothing pass runs at all
    pub fn smoothing_enabled(&self) -> bool {
        self.smooth_mesh_normals && self.smoothing_angle > 0.0
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_mesh_surface_area.is_finite() || self.max_mesh_surface_area < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_mesh_surface_area must be a non-negative number, got {}",
                self.max_mesh_surface_area
            )));
        }

        if !(0.0..=180.0).contains(&self.smoothing_angle) {
            return Err(ConfigError::Invalid(format!(
                "smoothing_angle must be within [0, 180] degrees, got {}",
                self.smoothing_angle
            )));
        }

        if !self.collision_distance_threshold.is_finite() || self.collision_distance_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "collision_distance_threshold must be a non-negative number, got {}",
                self.collision_distance_threshold
            )));
        }

        if !self.import_scale.is_finite() || self.import_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "import_scale must be positive, got {}",
                self.import_scale
            )));
        }

        if self.skip_texture_marker.is_empty() {
            return Err(ConfigError::Invalid(
                "skip_texture_marker cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config for ImportSettings {}
