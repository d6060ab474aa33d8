use bevy::math::{Mat4, Vec3};
use slotmap::{SlotMap, new_key_type};

use super::overlay::PlaneOverlay;
use super::prototype::PlacedObject;
use crate::engine::anchors::AnchorId;

new_key_type! {
    /// Stable handle of a node in the scene arena.
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
pub enum NodeContent {
    Root,
    /// Node the tracking subsystem moves along with an anchor.
    Anchor(AnchorId),
    Placed(PlacedObject),
    Overlay(PlaneOverlay),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    /// Transform relative to the parent node.
    pub transform: Mat4,
    pub hidden: bool,
    pub content: NodeContent,
}

impl SceneNode {
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn translation(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Arena-backed scene graph. Every node records its parent and its children;
/// removing a node removes its whole subtree and its entry in the parent's
/// child list, so no edge ever points at a dead key.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode {
            parent: None,
            children: Vec::new(),
            transform: Mat4::IDENTITY,
            hidden: false,
            content: NodeContent::Root,
        });
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Insert a new node under `parent`. Returns `None` if the parent is gone.
    pub fn attach(&mut self, parent: NodeKey, content: NodeContent, transform: Mat4) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }

        let key = self.nodes.insert(SceneNode {
            parent: Some(parent),
            children: Vec::new(),
            transform,
            hidden: false,
            content,
        });
        self.nodes[parent].children.push(key);
        Some(key)
    }

    /// Remove `key` and everything below it. Returns how many nodes were
    /// removed; detaching the root or a dead key removes nothing.
    pub fn detach(&mut self, key: NodeKey) -> usize {
        if key == self.root {
            return 0;
        }
        let Some(parent) = self.nodes.get(key).and_then(|node| node.parent) else {
            return 0;
        };

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|child| *child != key);
        }

        let mut removed = 0;
        let mut pending = vec![key];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(next) {
                pending.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Move `key` under `new_parent` with a new local transform. Refuses to
    /// create cycles or to move the root.
    pub fn reparent(&mut self, key: NodeKey, new_parent: NodeKey, transform: Mat4) -> bool {
        if key == self.root || !self.nodes.contains_key(key) || !self.nodes.contains_key(new_parent) {
            return false;
        }
        if self.is_ancestor_or_self(key, new_parent) {
            return false;
        }

        let old_parent = self.nodes[key].parent;
        if let Some(old_parent) = old_parent {
            if let Some(old) = self.nodes.get_mut(old_parent) {
                old.children.retain(|child| *child != key);
            }
        }

        let node = &mut self.nodes[key];
        node.parent = Some(new_parent);
        node.transform = transform;
        self.nodes[new_parent].children.push(key);
        true
    }

    /// Transform of `key` in scene-root space.
    pub fn world_transform(&self, key: NodeKey) -> Option<Mat4> {
        let mut node = self.nodes.get(key)?;
        let mut world = node.transform;
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.transform * world;
        }
        Some(world)
    }

    /// Drop every node except the root.
    pub fn clear(&mut self) {
        let root = self.root;
        self.nodes.retain(|key, _| key == root);
        self.nodes[root].children.clear();
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, mut key: NodeKey) -> bool {
        loop {
            if key == ancestor {
                return true;
            }
            match self.nodes.get(key).and_then(|node| node.parent) {
                Some(parent) => key = parent,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_node(graph: &mut SceneGraph, id: u64, transform: Mat4) -> NodeKey {
        let root = graph.root();
        graph
            .attach(root, NodeContent::Anchor(AnchorId(id)), transform)
            .unwrap()
    }

    #[test]
    fn detach_removes_subtree_and_parent_edge() {
        let mut graph = SceneGraph::new();
        let anchor = anchor_node(&mut graph, 1, Mat4::IDENTITY);
        let child = anchor_node(&mut graph, 2, Mat4::IDENTITY);
        assert!(graph.reparent(child, anchor, Mat4::IDENTITY));

        assert_eq!(graph.detach(anchor), 2);
        assert!(!graph.contains(child));
        assert!(graph.get(graph.root()).unwrap().children().is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn root_cannot_be_detached_or_moved() {
        let mut graph = SceneGraph::new();
        let anchor = anchor_node(&mut graph, 1, Mat4::IDENTITY);
        let root = graph.root();

        assert_eq!(graph.detach(root), 0);
        assert!(!graph.reparent(root, anchor, Mat4::IDENTITY));
    }

    #[test]
    fn reparent_refuses_cycles() {
        let mut graph = SceneGraph::new();
        let a = anchor_node(&mut graph, 1, Mat4::IDENTITY);
        let b = anchor_node(&mut graph, 2, Mat4::IDENTITY);
        assert!(graph.reparent(b, a, Mat4::IDENTITY));

        assert!(!graph.reparent(a, b, Mat4::IDENTITY));
        assert_eq!(graph.get(b).unwrap().parent, Some(a));
    }

    #[test]
    fn world_transform_composes_parents() {
        let mut graph = SceneGraph::new();
        let anchor = anchor_node(&mut graph, 1, Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let child = graph
            .attach(
                anchor,
                NodeContent::Anchor(AnchorId(2)),
                Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)),
            )
            .unwrap();

        let world = graph.world_transform(child).unwrap();
        assert_eq!(world.w_axis.truncate(), Vec3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn attach_to_dead_parent_fails() {
        let mut graph = SceneGraph::new();
        let anchor = anchor_node(&mut graph, 1, Mat4::IDENTITY);
        graph.detach(anchor);

        assert!(graph
            .attach(anchor, NodeContent::Anchor(AnchorId(2)), Mat4::IDENTITY)
            .is_none());
    }

    #[test]
    fn clear_keeps_only_root() {
        let mut graph = SceneGraph::new();
        anchor_node(&mut graph, 1, Mat4::IDENTITY);
        anchor_node(&mut graph, 2, Mat4::IDENTITY);
        graph.clear();

        assert_eq!(graph.len(), 1);
        assert!(graph.contains(graph.root()));
    }
}
