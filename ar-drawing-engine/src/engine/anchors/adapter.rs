use std::collections::HashMap;

use bevy::log::debug;
use bevy::math::{Mat4, Vec3};

use super::anchor::{AnchorId, AnchorKind, PlaneAlignment, PlaneGeometry, TrackedAnchor};
use crate::engine::events::SceneEvent;

/// Anchor payload as delivered by the tracking subsystem.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformAnchorPayload {
    Plane {
        extent: Vec3,
        center: Vec3,
        alignment: PlaneAlignment,
    },
    Image {
        reference_name: Option<String>,
    },
    /// Any other anchor class (faces, objects, environment probes, ...).
    Unsupported(String),
}

/// Anchor handed over by a tracking callback.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformAnchor {
    pub identifier: u64,
    pub transform: Mat4,
    pub payload: PlatformAnchorPayload,
}

impl PlatformAnchor {
    pub fn plane(
        identifier: u64,
        transform: Mat4,
        extent: Vec3,
        center: Vec3,
        alignment: PlaneAlignment,
    ) -> Self {
        Self {
            identifier,
            transform,
            payload: PlatformAnchorPayload::Plane {
                extent,
                center,
                alignment,
            },
        }
    }

    pub fn image(identifier: u64, transform: Mat4, reference_name: Option<String>) -> Self {
        Self {
            identifier,
            transform,
            payload: PlatformAnchorPayload::Image { reference_name },
        }
    }
}

/// One raw tracking callback.
#[derive(Debug, Clone, PartialEq)]
pub enum AnchorCallback {
    Added(PlatformAnchor),
    Updated(PlatformAnchor),
    Removed(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveKind {
    Plane,
    Image,
}

/// Turns tracking callbacks into `SceneEvent`s.
///
/// Keeps the set of anchors it has announced so that:
/// - a repeated "added" is forwarded as an update,
/// - an "updated" or "removed" for an id never announced is dropped,
/// - an update that changes an anchor's kind is dropped.
#[derive(Debug, Default)]
pub struct AnchorEventAdapter {
    live: HashMap<AnchorId, LiveKind>,
}

impl AnchorEventAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, callback: &AnchorCallback) -> Option<SceneEvent> {
        match callback {
            AnchorCallback::Added(anchor) => self.did_add(anchor),
            AnchorCallback::Updated(anchor) => self.did_update(anchor),
            AnchorCallback::Removed(identifier) => self.did_remove(*identifier),
        }
    }

    pub fn did_add(&mut self, anchor: &PlatformAnchor) -> Option<SceneEvent> {
        let tracked = normalise(anchor)?;
        let kind = live_kind(&tracked);

        match self.live.insert(tracked.id, kind) {
            None => Some(SceneEvent::AnchorAdded(tracked)),
            Some(previous) if previous == kind => {
                debug!("{} announced twice, forwarding as update", tracked.id);
                Some(SceneEvent::AnchorUpdated(tracked))
            }
            Some(previous) => {
                // Keep the first registration; the scene still holds it.
                self.live.insert(tracked.id, previous);
                debug!("{} re-announced with a different kind, ignored", tracked.id);
                None
            }
        }
    }

    pub fn did_update(&mut self, anchor: &PlatformAnchor) -> Option<SceneEvent> {
        let tracked = normalise(anchor)?;

        match self.live.get(&tracked.id) {
            Some(kind) if *kind == live_kind(&tracked) => Some(SceneEvent::AnchorUpdated(tracked)),
            Some(_) => {
                debug!("{} updated with a different kind, ignored", tracked.id);
                None
            }
            None => {
                debug!("update for unknown {}, ignored", tracked.id);
                None
            }
        }
    }

    pub fn did_remove(&mut self, identifier: u64) -> Option<SceneEvent> {
        let id = AnchorId(identifier);
        if self.live.remove(&id).is_some() {
            Some(SceneEvent::AnchorRemoved(id))
        } else {
            debug!("removal of unknown {}, ignored", id);
            None
        }
    }

    /// Forget every anchor, used when the session restarts without its anchors.
    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn is_live(&self, id: AnchorId) -> bool {
        self.live.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

fn normalise(anchor: &PlatformAnchor) -> Option<TrackedAnchor> {
    let id = AnchorId(anchor.identifier);
    match &anchor.payload {
        PlatformAnchorPayload::Plane {
            extent,
            center,
            alignment,
        } => Some(TrackedAnchor::plane(
            id,
            anchor.transform,
            PlaneGeometry::new(*extent, *center, *alignment),
        )),
        PlatformAnchorPayload::Image { reference_name } => Some(TrackedAnchor::image(
            id,
            anchor.transform,
            reference_name.clone(),
        )),
        PlatformAnchorPayload::Unsupported(class) => {
            debug!("{} of class '{}' is not tracked", id, class);
            None
        }
    }
}

fn live_kind(anchor: &TrackedAnchor) -> LiveKind {
    match anchor.kind {
        AnchorKind::Plane(_) => LiveKind::Plane,
        AnchorKind::Image { .. } => LiveKind::Image,
    }
}
