//! # Level Mesher
//!
//! Builds renderable chunk meshes and simplified collision meshes from
//! parsed BSP level geometry.
//!
//! ## Features
//!
//! - **Adaptive chunking**: the BSP tree is cut into meshes by surface area
//! - **Vertex welding**: one stored vertex per physical vertex per chunk
//! - **Material submeshes**: triangles bucketed by material, tool textures dropped
//! - **Normal smoothing**: optional angle-limited averaging across UV seams
//! - **Collision meshes**: distance-threshold vertex merging with degenerate removal
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use level_mesher::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tree = BspTree::default();
//!     let settings = ImportSettings::load_from_file("level_import.toml")?;
//!     let materials = |name: &str| (name != "missing").then_some(MaterialHandle(0));
//!
//!     let mesher = LevelMesher::new(settings, &materials)?;
//!     let mut scene = SceneCollector::new();
//!     let report = mesher.import(&tree, &[], &mut scene)?;
//!     println!("{} meshes", report.total_meshes());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod bsp;
pub mod collision;
pub mod config;
pub mod error;
pub mod foundation;
pub mod mesh;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use error::{MeshError, Result};

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        bsp::{BspTree, NodeRef},
        collision::CollisionMesh,
        config::{Config, ImportSettings},
        error::MeshError,
        foundation::math::{Aabb, Quat, Vec3},
        mesh::{BuiltMesh, IndexFormat},
        pipeline::{
            BuildReport, LevelMesher, MaterialHandle, MaterialResolver, ModelRequest,
            RenderEntity, SceneAssembly, SceneCollector,
        },
    };
}
