use std::collections::HashMap;

use bevy::log::{debug, info};
use bevy::math::Mat4;

use super::graph::{NodeContent, NodeKey, SceneGraph, SceneNode};
use super::overlay::PlaneOverlay;
use super::prototype::{PlacedObject, Prototype};
use crate::engine::anchors::{AnchorId, TrackedAnchor};

/// Where a new placement is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Anchor(AnchorId),
}

/// Authoritative owner of placed objects, plane overlays and anchor nodes.
///
/// All mutation goes through this type. The placed list only grows at the
/// end and only shrinks through `undo_last` (last element) or `reset` (all).
#[derive(Debug, Default)]
pub struct SceneStore {
    graph: SceneGraph,
    anchors: HashMap<AnchorId, NodeKey>,
    placed: Vec<NodeKey>,
    overlays: HashMap<AnchorId, NodeKey>,
    show_plane_overlay: bool,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    // Anchors

    /// Create the node for a newly tracked anchor, or move the existing one.
    pub fn register_anchor(&mut self, anchor: &TrackedAnchor) -> Option<NodeKey> {
        if let Some(key) = self.update_anchor_pose(anchor.id, anchor.pose) {
            return Some(key);
        }

        let root = self.graph.root();
        let key = self
            .graph
            .attach(root, NodeContent::Anchor(anchor.id), anchor.pose)?;
        self.anchors.insert(anchor.id, key);
        Some(key)
    }

    pub fn update_anchor_pose(&mut self, id: AnchorId, pose: Mat4) -> Option<NodeKey> {
        let key = *self.anchors.get(&id)?;
        let node = self.graph.get_mut(key)?;
        node.transform = pose;
        Some(key)
    }

    /// Drop an anchor node. Its overlay goes with it; objects placed on it are
    /// moved to the scene root where they were last seen, so the placed list
    /// keeps its order. Returns false if the anchor was not tracked, which
    /// makes repeated removals harmless.
    pub fn remove_anchor(&mut self, id: AnchorId) -> bool {
        let Some(key) = self.anchors.remove(&id) else {
            return false;
        };
        if self.overlays.remove(&id).is_some() {
            debug!("overlay removed for {}", id);
        }

        let orphans: Vec<NodeKey> = self
            .graph
            .get(key)
            .map(|node| {
                node.children()
                    .iter()
                    .copied()
                    .filter(|child| self.is_placed(*child))
                    .collect()
            })
            .unwrap_or_default();

        let root = self.graph.root();
        for orphan in orphans {
            let world = self.graph.world_transform(orphan).unwrap_or(Mat4::IDENTITY);
            self.graph.reparent(orphan, root, world);
            debug!("{} removed, placed object kept at its last pose", id);
        }

        self.graph.detach(key);
        true
    }

    pub fn anchor_node(&self, id: AnchorId) -> Option<NodeKey> {
        self.anchors.get(&id).copied()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    // Placed objects

    /// Clone `prototype` under `parent` with the given local transform and
    /// append it to the placed list. Fails only when the parent anchor is not
    /// tracked.
    pub fn add_object(&mut self, prototype: &Prototype, parent: ParentRef, transform: Mat4) -> Option<NodeKey> {
        let parent_key = match parent {
            ParentRef::Root => self.graph.root(),
            ParentRef::Anchor(id) => match self.anchors.get(&id) {
                Some(key) => *key,
                None => {
                    debug!("cannot attach '{}' to untracked {}", prototype.name, id);
                    return None;
                }
            },
        };

        let key = self.graph.attach(
            parent_key,
            NodeContent::Placed(prototype.instantiate()),
            transform,
        )?;
        self.placed.push(key);
        info!(
            "placed '{}' ({} object(s) in scene)",
            prototype.name,
            self.placed.len()
        );
        Some(key)
    }

    /// Remove the most recent placement. Empty list is a no-op.
    pub fn undo_last(&mut self) -> Option<NodeKey> {
        let key = self.placed.pop()?;
        self.graph.detach(key);
        info!("undid last placement ({} left)", self.placed.len());
        Some(key)
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    /// Placement order, oldest first.
    pub fn placed_keys(&self) -> &[NodeKey] {
        &self.placed
    }

    pub fn placed_object(&self, key: NodeKey) -> Option<&PlacedObject> {
        match &self.graph.get(key)?.content {
            NodeContent::Placed(object) => Some(object),
            _ => None,
        }
    }

    pub fn last_placed_mut(&mut self) -> Option<&mut PlacedObject> {
        let key = *self.placed.last()?;
        match &mut self.graph.get_mut(key)?.content {
            NodeContent::Placed(object) => Some(object),
            _ => None,
        }
    }

    /// Anchor the object is attached to, `None` when it sits at the root.
    pub fn placed_anchor(&self, key: NodeKey) -> Option<AnchorId> {
        let parent = self.graph.get(key)?.parent?;
        match self.graph.get(parent)?.content {
            NodeContent::Anchor(id) => Some(id),
            _ => None,
        }
    }

    pub fn world_transform(&self, key: NodeKey) -> Option<Mat4> {
        self.graph.world_transform(key)
    }

    fn is_placed(&self, key: NodeKey) -> bool {
        matches!(
            self.graph.get(key).map(|node| &node.content),
            Some(NodeContent::Placed(_))
        )
    }

    // Plane overlays

    /// Attach an overlay under its anchor's node. Visibility follows the
    /// current overlay flag. Refuses a second overlay for the same anchor.
    pub fn insert_overlay(&mut self, id: AnchorId, overlay: PlaneOverlay, transform: Mat4) -> Option<NodeKey> {
        if self.overlays.contains_key(&id) {
            return None;
        }
        let anchor_key = *self.anchors.get(&id)?;
        let key = self
            .graph
            .attach(anchor_key, NodeContent::Overlay(overlay), transform)?;
        if let Some(node) = self.graph.get_mut(key) {
            node.hidden = !self.show_plane_overlay;
        }
        self.overlays.insert(id, key);
        Some(key)
    }

    pub fn overlay_key(&self, id: AnchorId) -> Option<NodeKey> {
        self.overlays.get(&id).copied()
    }

    pub fn overlay_node(&self, id: AnchorId) -> Option<&SceneNode> {
        self.graph.get(*self.overlays.get(&id)?)
    }

    pub fn overlay_node_mut(&mut self, id: AnchorId) -> Option<&mut SceneNode> {
        self.graph.get_mut(*self.overlays.get(&id)?)
    }

    pub fn overlay(&self, id: AnchorId) -> Option<&PlaneOverlay> {
        match &self.overlay_node(id)?.content {
            NodeContent::Overlay(overlay) => Some(overlay),
            _ => None,
        }
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn show_plane_overlay(&self) -> bool {
        self.show_plane_overlay
    }

    /// Show or hide every overlay; later overlays inherit the flag.
    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.show_plane_overlay = visible;
        for key in self.overlays.values() {
            if let Some(node) = self.graph.get_mut(*key) {
                node.hidden = !visible;
            }
        }
    }

    pub fn toggle_overlay_visible(&mut self) -> bool {
        self.set_overlay_visible(!self.show_plane_overlay);
        self.show_plane_overlay
    }

    /// Forget every placed object, overlay and anchor node. The overlay flag
    /// is kept.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.anchors.clear();
        self.placed.clear();
        self.overlays.clear();
        info!("scene reset");
    }
}
