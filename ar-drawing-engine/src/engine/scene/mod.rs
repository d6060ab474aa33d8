//! Scene state: the node arena, placed objects, prototypes and plane overlays.
//!
//! ## Ownership
//!
//! ```text
//! SceneStore
//!   └─> SceneGraph (slotmap arena, stable NodeKey handles)
//!       root
//!        ├─ Placed            freeform / plane-snap placements
//!        └─ Anchor(id)        one per tracked anchor
//!            ├─ Overlay       plane anchors only, exactly one
//!            └─ Placed        image-attach placements
//! ```
//!
//! `SceneStore` is the single writer. Placements are append-only and leave
//! the list through undo (last) or reset (all). Overlay visibility is a
//! projection of one flag.

/// Slotmap-backed node arena with explicit parent and child edges.
pub mod graph;

/// Plane overlay geometry and its per-anchor synchroniser.
pub mod overlay;

/// Prototype templates, placed instances and the weak selection handle.
pub mod prototype;

/// Authoritative store of placements, overlays and anchor nodes.
pub mod store;

pub use graph::{NodeContent, NodeKey, SceneGraph, SceneNode};
pub use overlay::{PlaneOverlay, PlaneOverlaySynchronizer};
pub use prototype::{
    AnimationClip, AnimationPlayer, PlacedObject, Prototype, Repeat, SelectedPrototype,
    SharedGeometry,
};
pub use store::{ParentRef, SceneStore};
