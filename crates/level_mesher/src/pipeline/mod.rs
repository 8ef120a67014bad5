//! Level import orchestration
//!
//! [`LevelMesher`] is invoked once per level. It validates the tree, picks
//! chunk roots, then builds one render entity per chunk root and per
//! requested brush model:
//!
//! 1. collect faces
//! 2. weld vertices and bucket triangles by material
//! 3. drop skipped materials and resolve the rest
//! 4. assemble, optionally smooth normals
//! 5. build a collider unless the mesh is tiny
//! 6. hand the entity to the scene

pub mod context;
pub mod report;
pub mod scene;
pub mod subdivide;

pub use context::BuildContext;
pub use report::BuildReport;
pub use scene::{
    LightmapRequest, MaterialHandle, MaterialResolver, RenderEntity, SceneAssembly, SceneCollector,
};
pub use subdivide::ChunkSubdivider;

use crate::bsp::{BspTree, NodeRef};
use crate::collision::CollisionMeshBuilder;
use crate::config::ImportSettings;
use crate::error::Result;
use crate::foundation::math::{Quat, Vec3};
use crate::foundation::time::{Stage, Stopwatch};
use crate::mesh::assembler::MeshRole;
use crate::mesh::{
    ChunkFrame, GeometryKernel, IndexFormat, MeshAssembler, NormalSmoother, StandardKernel,
};

/// A brush entity whose model should be meshed alongside the world
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Index into [`BspTree::models`]
    pub model: usize,
    /// Entity name; the mesh is called `{name}_{n}_mesh`
    pub name: String,
    /// World position the mesh is built around
    pub origin: Vec3,
    /// Rotation applied to positions and normals
    pub rotation: Option<Quat>,
    /// Whether the entity never moves
    pub is_static: bool,
}

impl ModelRequest {
    /// Static, unrotated model at `origin`
    pub fn new(model: usize, name: impl Into<String>, origin: Vec3) -> Self {
        Self {
            model,
            name: name.into(),
            origin,
            rotation: None,
            is_static: true,
        }
    }

    /// Set the rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Mark the model as moving, which disables lightmap requests
    pub fn dynamic(mut self) -> Self {
        self.is_static = false;
        self
    }
}

/// Where one chunk build sits and what it is named after
struct ChunkTarget<'n> {
    role: MeshRole<'n>,
    frame: ChunkFrame,
    is_static: bool,
}

/// # Level Mesher
///
/// Turns a [`BspTree`] into render entities with colliders.
///
/// ## Example
///
/// ```ignore
/// let materials = |name: &str| library.find(name);
/// let mesher = LevelMesher::new(ImportSettings::default(), &materials)?;
/// let mut scene = SceneCollector::new();
/// let report = mesher.import(&tree, &[], &mut scene)?;
/// ```
pub struct LevelMesher<'a> {
    settings: ImportSettings,
    materials: &'a dyn MaterialResolver,
    kernel: &'a dyn GeometryKernel,
}

impl<'a> LevelMesher<'a> {
    /// Create a mesher, rejecting invalid settings
    pub fn new(settings: ImportSettings, materials: &'a dyn MaterialResolver) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            materials,
            kernel: &StandardKernel,
        })
    }

    /// Use a host-provided geometry kernel for bounds and tangents
    pub fn with_kernel(mut self, kernel: &'a dyn GeometryKernel) -> Self {
        self.kernel = kernel;
        self
    }

    /// Settings in use
    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Mesh the whole world tree plus the requested brush models
    ///
    /// Fails only if the tree itself is malformed; nothing is handed to the
    /// scene in that case.
    pub fn import(
        &self,
        tree: &BspTree,
        models: &[ModelRequest],
        scene: &mut dyn SceneAssembly,
    ) -> Result<BuildReport> {
        log::info!(
            "Importing level geometry: {} nodes, {} leaves, {} faces, {} models requested",
            tree.nodes.len(),
            tree.leaves.len(),
            tree.faces.len(),
            models.len()
        );

        if let Some(root) = world_root(tree) {
            tree.validate(root)?;
        }
        for request in models {
            tree.model(request.model)?;
        }

        let mut ctx = BuildContext::new();
        self.build_world(&mut ctx, tree, scene)?;
        for request in models {
            self.build_model(&mut ctx, tree, request, scene)?;
        }

        let report = ctx.into_report();
        report.log_summary();
        Ok(report)
    }

    /// Split the world tree into chunks and build one entity per chunk root
    pub fn build_world(
        &self,
        ctx: &mut BuildContext,
        tree: &BspTree,
        scene: &mut dyn SceneAssembly,
    ) -> Result<()> {
        let Some(root) = world_root(tree) else {
            log::debug!("Level has no world geometry");
            return Ok(());
        };

        let subdivider = ChunkSubdivider::from_settings(&self.settings);
        let mut roots = Vec::new();
        ctx.accumulator.clear();
        ctx.report.timings.measure(Stage::Subdivide, || {
            subdivider.subdivide(tree, root, &mut ctx.accumulator, &mut roots)
        })?;
        ctx.report.chunk_roots += roots.len();
        log::debug!("Selected {} chunk roots", roots.len());

        for node in roots {
            let bounds = tree.bounds(node)?.to_engine_space(self.settings.import_scale);
            ctx.begin_chunk();
            tree.collect_faces(node, &mut ctx.chunk_faces)?;
            log::debug!("Chunk root {:?}: {} faces", node, ctx.chunk_faces.len());

            let target = ChunkTarget {
                role: MeshRole::ChunkRoot {
                    base: &self.settings.worldspawn_name,
                },
                frame: ChunkFrame::at(bounds.center()),
                is_static: true,
            };
            self.build_chunk(ctx, tree, &target, scene)?;
        }

        Ok(())
    }

    /// Build the mesh for one brush model
    pub fn build_model(
        &self,
        ctx: &mut BuildContext,
        tree: &BspTree,
        request: &ModelRequest,
        scene: &mut dyn SceneAssembly,
    ) -> Result<()> {
        let model = tree.model(request.model)?;
        ctx.begin_chunk();
        for face in model.first_face..model.first_face + model.face_count {
            ctx.chunk_faces.insert(face);
        }
        log::debug!(
            "Model {} '{}': {} faces",
            request.model,
            request.name,
            ctx.chunk_faces.len()
        );

        let target = ChunkTarget {
            role: MeshRole::Entity { name: &request.name },
            frame: ChunkFrame {
                origin: request.origin,
                rotation: request.rotation,
            },
            is_static: request.is_static,
        };
        self.build_chunk(ctx, tree, &target, scene)
    }

    /// Build and hand over one entity from the faces in `ctx.chunk_faces`
    fn build_chunk(
        &self,
        ctx: &mut BuildContext,
        tree: &BspTree,
        target: &ChunkTarget<'_>,
        scene: &mut dyn SceneAssembly,
    ) -> Result<()> {
        if ctx.chunk_faces.is_empty() {
            log::debug!("Chunk has no faces, skipping");
            ctx.report.empty_chunks += 1;
            return Ok(());
        }

        let mut stopwatch = Stopwatch::start_new();
        for &face_index in ctx.chunk_faces.as_slice() {
            let face = tree.face(face_index)?;
            for corner in 0..face.mesh_vertex_count {
                let base_index = tree.base_index(face, corner)?;
                let local = ctx.remapper.find_or_add(tree, base_index, &target.frame)?;
                ctx.buckets.append(face.tex_id, local);
            }
        }

        ctx.report.skipped_submeshes += ctx
            .buckets
            .remove_skipped(&tree.tex_infos, &self.settings.skip_texture_marker);
        if ctx.buckets.is_empty() {
            stopwatch.stop();
            ctx.report.timings.record(Stage::Assemble, stopwatch.elapsed());
            log::debug!("Chunk has no visible submeshes, skipping");
            ctx.report.empty_chunks += 1;
            return Ok(());
        }

        let names = ctx.names.next_names(target.role);
        let mut mesh = MeshAssembler::new(self.kernel).assemble(
            &names.mesh,
            ctx.remapper.vertices(),
            ctx.buckets.submeshes(),
        );
        stopwatch.stop();
        ctx.report.timings.record(Stage::Assemble, stopwatch.elapsed());

        log::debug!(
            "Built '{}': {} vertices, {} submeshes, {} triangles",
            mesh.name,
            mesh.vertex_count(),
            mesh.submeshes.len(),
            mesh.triangle_count()
        );
        if mesh.index_format == IndexFormat::U32 {
            ctx.report.wide_index_meshes += 1;
        }

        let mut materials = Vec::with_capacity(mesh.submeshes.len());
        for submesh in &mesh.submeshes {
            let name = &tree.tex_info(submesh.material_id)?.name;
            let handle = self.materials.find_material(name);
            match handle {
                Some(handle) => scene.add_dependency(handle),
                None => log::debug!("No material found for '{}'", name),
            }
            materials.push(handle);
        }

        if self.settings.smoothing_enabled() {
            let smoother = NormalSmoother::new(self.kernel);
            let angle = self.settings.smoothing_angle;
            ctx.report
                .timings
                .measure(Stage::SmoothNormals, || smoother.smooth(&mut mesh, angle));
        }

        let is_tiny = mesh.is_tiny(self.settings.tiny_mesh_extent);
        let collision = if is_tiny {
            log::debug!("'{}' is tiny, no collider", mesh.name);
            ctx.report.tiny_meshes += 1;
            None
        } else {
            let builder = CollisionMeshBuilder::new(
                self.settings.simplify_collision_meshes,
                self.settings.collision_distance_threshold,
            );
            let collision = ctx
                .report
                .timings
                .measure(Stage::Collision, || builder.build(&mesh, names.collision()));
            ctx.report.degenerate_triangles += collision.dropped_triangles;
            ctx.report.merged_collision_vertices +=
                mesh.vertex_count().saturating_sub(collision.vertices.len());
            Some(collision)
        };

        let lightmap = (target.is_static && self.settings.unwrap_lightmap_uvs && !is_tiny).then_some(
            LightmapRequest {
                padding: self.settings.lightmap_uv_padding,
            },
        );

        match target.role {
            MeshRole::ChunkRoot { .. } => ctx.report.meshes_built += 1,
            MeshRole::Entity { .. } => ctx.report.model_meshes_built += 1,
        }

        scene.add_entity(RenderEntity {
            name: names.model,
            origin: target.frame.origin,
            rotation: target.frame.rotation,
            is_static: target.is_static,
            mesh,
            materials,
            collision,
            lightmap,
        });
        Ok(())
    }
}

/// Where the world walk starts; a tree without nodes is a single leaf
fn world_root(tree: &BspTree) -> Option<NodeRef> {
    if !tree.nodes.is_empty() {
        Some(BspTree::ROOT)
    } else if !tree.leaves.is_empty() {
        Some(NodeRef::Leaf(0))
    } else {
        None
    }
}
