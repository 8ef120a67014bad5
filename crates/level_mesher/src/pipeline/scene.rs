//! Collaborators on the output side of an import
//!
//! The pipeline never owns materials or the scene. It asks a
//! [`MaterialResolver`] for handles and hands finished entities to a
//! [`SceneAssembly`], which takes ownership of them.

use std::collections::HashMap;

use crate::collision::CollisionMesh;
use crate::foundation::math::{Quat, Vec3};
use crate::mesh::BuiltMesh;

/// Opaque handle to a material owned by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u32);

/// Name-keyed material lookup
///
/// Called once per retained submesh; caching is up to the implementor.
pub trait MaterialResolver {
    /// Handle for the material called `name`, if one exists
    fn find_material(&self, name: &str) -> Option<MaterialHandle>;
}

impl<F> MaterialResolver for F
where
    F: Fn(&str) -> Option<MaterialHandle>,
{
    fn find_material(&self, name: &str) -> Option<MaterialHandle> {
        self(name)
    }
}

impl MaterialResolver for HashMap<String, MaterialHandle> {
    fn find_material(&self, name: &str) -> Option<MaterialHandle> {
        self.get(name).copied()
    }
}

/// Request for an external lightmap UV unwrap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightmapRequest {
    /// Padding between charts, in texels
    pub padding: f32,
}

/// One chunk root or brush model, ready to place in the scene
#[derive(Debug, Clone)]
pub struct RenderEntity {
    /// Entity name (`worldspawn_3`, or the brush entity's own name)
    pub name: String,
    /// World-space position the mesh is relative to
    pub origin: Vec3,
    /// World-space rotation, for brush models placed with one
    pub rotation: Option<Quat>,
    /// Whether the entity never moves
    pub is_static: bool,
    /// Render mesh
    pub mesh: BuiltMesh,
    /// Resolved material per submesh, parallel to `mesh.submeshes`
    pub materials: Vec<Option<MaterialHandle>>,
    /// Collider, absent for tiny meshes
    pub collision: Option<CollisionMesh>,
    /// Lightmap unwrap request, for static meshes that are not tiny
    pub lightmap: Option<LightmapRequest>,
}

/// Receives the output of an import
pub trait SceneAssembly {
    /// Record that the imported level depends on `material`
    fn add_dependency(&mut self, material: MaterialHandle);

    /// Take ownership of a finished entity
    fn add_entity(&mut self, entity: RenderEntity);
}

/// In-memory [`SceneAssembly`] that keeps everything it is given
#[derive(Debug, Default)]
pub struct SceneCollector {
    /// Entities in the order they were built
    pub entities: Vec<RenderEntity>,
    /// Distinct material dependencies in first-seen order
    pub dependencies: Vec<MaterialHandle>,
}

impl SceneCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entity by name
    pub fn entity(&self, name: &str) -> Option<&RenderEntity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

impl SceneAssembly for SceneCollector {
    fn add_dependency(&mut self, material: MaterialHandle) {
        if !self.dependencies.contains(&material) {
            self.dependencies.push(material);
        }
    }

    fn add_entity(&mut self, entity: RenderEntity) {
        self.entities.push(entity);
    }
}
