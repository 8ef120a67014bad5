//! Chunk-root selection over the BSP tree
//!
//! A node becomes a chunk root once its faces are small enough in total
//! area, or when it is a leaf. Larger nodes are split into their children.

use crate::bsp::{BspTree, FaceSet, NodeRef};
use crate::config::ImportSettings;
use crate::error::{MeshError, Result};

/// Decides where the world tree is cut into meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkSubdivider {
    /// Area above which a node is split
    pub max_surface_area: f32,
    /// Split every interior node regardless of area
    pub force_full_subdivision: bool,
}

impl ChunkSubdivider {
    /// Create a subdivider
    pub fn new(max_surface_area: f32, force_full_subdivision: bool) -> Self {
        Self {
            max_surface_area,
            force_full_subdivision,
        }
    }

    /// Subdivider configured from import settings
    pub fn from_settings(settings: &ImportSettings) -> Self {
        Self::new(settings.max_mesh_surface_area, settings.subdivide_all_leaves)
    }

    /// Chunk roots below `root`, in depth-first front-to-back order
    pub fn chunk_roots(&self, tree: &BspTree, root: NodeRef) -> Result<Vec<NodeRef>> {
        let mut accumulator = FaceSet::default();
        let mut roots = Vec::new();
        self.subdivide(tree, root, &mut accumulator, &mut roots)?;
        Ok(roots)
    }

    /// Walk from `node`, appending every chunk root to `roots`
    ///
    /// `accumulator` is shared by the whole walk. Each node adds the faces
    /// below it and measures only the ones not already pooled, then clears
    /// it once before descending into both children.
    pub fn subdivide(
        &self,
        tree: &BspTree,
        node: NodeRef,
        accumulator: &mut FaceSet,
        roots: &mut Vec<NodeRef>,
    ) -> Result<()> {
        self.subdivide_at(tree, node, accumulator, roots, 0)
    }

    fn subdivide_at(
        &self,
        tree: &BspTree,
        node: NodeRef,
        accumulator: &mut FaceSet,
        roots: &mut Vec<NodeRef>,
        depth: usize,
    ) -> Result<()> {
        if let NodeRef::Node(index) = node {
            if depth > tree.nodes.len() {
                return Err(MeshError::CyclicTree { node: index });
            }
            let children = tree.node(index)?.children;

            if self.should_split(tree, node, accumulator)? {
                log::trace!("Splitting node {index} at depth {depth}");
                accumulator.clear();
                for child in children {
                    self.subdivide_at(tree, child, accumulator, roots, depth + 1)?;
                }
                return Ok(());
            }
        }

        log::trace!("Chunk root {node:?} at depth {depth}");
        roots.push(node);
        Ok(())
    }

    fn should_split(&self, tree: &BspTree, node: NodeRef, accumulator: &mut FaceSet) -> Result<bool> {
        if self.force_full_subdivision {
            return Ok(true);
        }

        let start = accumulator.len();
        tree.collect_faces(node, accumulator)?;
        let area_sqr = tree.surface_area_sqr(&accumulator.as_slice()[start..])?;
        Ok(area_sqr > self.max_surface_area * self.max_surface_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::fixtures::TreeBuilder;

    /// Root over two subtrees of two leaves each; every triangle has area 2.
    fn two_level_tree() -> BspTree {
        TreeBuilder::new()
            .leaf_with_triangle("a", 0.0, 2.0)
            .leaf_with_triangle("b", 10.0, 2.0)
            .leaf_with_triangle("c", 20.0, 2.0)
            .leaf_with_triangle("d", 30.0, 2.0)
            .node(NodeRef::Node(1), NodeRef::Node(2))
            .split_leaves(0, 1)
            .split_leaves(2, 3)
            .build()
    }

    #[test]
    fn test_small_tree_is_one_chunk() {
        let roots = ChunkSubdivider::new(100.0, false)
            .chunk_roots(&two_level_tree(), BspTree::ROOT)
            .unwrap();
        assert_eq!(roots, vec![BspTree::ROOT]);
    }

    #[test]
    fn test_minimal_depth_nodes_under_threshold() {
        // Whole tree is 8, each half is 4.
        let roots = ChunkSubdivider::new(5.0, false)
            .chunk_roots(&two_level_tree(), BspTree::ROOT)
            .unwrap();
        assert_eq!(roots, vec![NodeRef::Node(1), NodeRef::Node(2)]);
    }

    #[test]
    fn test_large_area_splits_down_to_leaves() {
        let roots = ChunkSubdivider::new(1.0, false)
            .chunk_roots(&two_level_tree(), BspTree::ROOT)
            .unwrap();
        assert_eq!(
            roots,
            vec![NodeRef::Leaf(0), NodeRef::Leaf(1), NodeRef::Leaf(2), NodeRef::Leaf(3)]
        );
    }

    #[test]
    fn test_forced_subdivision_yields_only_leaves() {
        let roots = ChunkSubdivider::new(f32::MAX, true)
            .chunk_roots(&two_level_tree(), BspTree::ROOT)
            .unwrap();
        assert_eq!(roots.len(), 4);
        assert!(roots.iter().all(|r| r.is_leaf()));
    }

    #[test]
    fn test_leaf_root_is_always_terminal() {
        let tree = TreeBuilder::new().leaf_with_triangle("a", 0.0, 100.0).build();
        let roots = ChunkSubdivider::new(0.0, false)
            .chunk_roots(&tree, NodeRef::Leaf(0))
            .unwrap();
        assert_eq!(roots, vec![NodeRef::Leaf(0)]);
    }

    #[test]
    fn test_pooled_faces_are_not_measured_again() {
        // Leaf 1 repeats face 0 from leaf 0 and adds face 1; leaf 2 is empty.
        let tree = TreeBuilder::new()
            .face_triangle("a", 0.0, 2.0)
            .face_triangle("b", 10.0, 2.0)
            .leaf(0, 1)
            .leaf(0, 2)
            .leaf(0, 0)
            .node(NodeRef::Node(1), NodeRef::Node(2))
            .split_leaves(0, 2)
            .split_leaves(1, 2)
            .build();

        // Root (area 4) splits. Node 1 pools face 0 (area 2). Node 2 then only
        // adds face 1, so it measures 2 rather than 4 and stays whole.
        let roots = ChunkSubdivider::new(3.0, false)
            .chunk_roots(&tree, BspTree::ROOT)
            .unwrap();
        assert_eq!(roots, vec![NodeRef::Node(1), NodeRef::Node(2)]);
    }

    #[test]
    fn test_cyclic_tree_is_an_error() {
        let mut tree = two_level_tree();
        tree.nodes[2].children = [NodeRef::Node(0), NodeRef::Leaf(3)];
        let result = ChunkSubdivider::new(0.0, true).chunk_roots(&tree, BspTree::ROOT);
        assert!(matches!(result, Err(MeshError::CyclicTree { .. })));
    }
}
