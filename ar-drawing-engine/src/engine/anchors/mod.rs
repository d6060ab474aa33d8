//! Tracked anchors and normalisation of platform tracking callbacks.
//!
//! The tracking subsystem reports anchors through three callbacks (added,
//! updated, removed) carrying platform-shaped payloads. The `adapter` module
//! filters and normalises them into `SceneEvent`s over `TrackedAnchor`
//! values, keeping a registry of live anchor ids so duplicate and
//! out-of-order notifications never reach the scene.
//!
//! ```text
//! PlatformAnchor callback
//!   └─> AnchorEventAdapter
//!       ├─> SceneEvent::AnchorAdded / AnchorUpdated / AnchorRemoved
//!       └─> (dropped) unknown kind, unknown id, kind mismatch
//! ```

/// Anchor identity, kind and plane geometry.
pub mod anchor;

/// Platform callback normalisation with a live-anchor registry.
pub mod adapter;

pub use adapter::{AnchorCallback, AnchorEventAdapter, PlatformAnchor, PlatformAnchorPayload};
pub use anchor::{AnchorId, AnchorKind, PlaneAlignment, PlaneGeometry, TrackedAnchor};
