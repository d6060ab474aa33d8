use std::collections::BTreeMap;
use std::sync::Arc;

use bevy::prelude::*;

use super::scene_core::{SceneCore, ViewPhase};
use super::status::SceneStatus;
use crate::engine::anchors::AnchorCallback;
use crate::engine::events::SceneEvent;
use crate::engine::scene::Prototype;
use crate::engine::session::TrackingSession;
use crate::tools::tool_manager::{OptionsCommandEvent, apply_options_command};

/// The scene core as an ECS resource.
#[derive(Resource, Debug, Default)]
pub struct ArScene(pub SceneCore);

/// The platform session the scene core drives. Inserted by the host before
/// `ArDrawingPlugin` is added.
#[derive(Resource, Debug)]
pub struct TrackingSessionHandle<S: TrackingSession + Send + Sync + 'static>(pub S);

/// Prototypes offered by the options UI, keyed by name. Holds the only strong
/// references; the scene keeps a weak selection.
#[derive(Resource, Debug, Default)]
pub struct PrototypeLibrary {
    prototypes: BTreeMap<String, Arc<Prototype>>,
}

impl PrototypeLibrary {
    pub fn insert(&mut self, prototype: Prototype) -> Arc<Prototype> {
        let prototype = Arc::new(prototype);
        self.prototypes
            .insert(prototype.name.clone(), Arc::clone(&prototype));
        prototype
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Prototype>> {
        self.prototypes.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Prototype>> {
        self.prototypes.remove(name)
    }

    /// Names in sorted order, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prototypes.keys().map(String::as_str)
    }
}

/// One input from the host, in the order it happened.
///
/// View lifecycle changes, options commands, tracking callbacks and pointer
/// gestures share this single queue so the scene sees them exactly as they
/// were delivered, however many arrive in one frame.
#[derive(Event, Debug, Clone)]
pub enum HostInput {
    /// The AR view changed visibility.
    View(ViewPhase),
    Options(OptionsCommandEvent),
    /// Raw tracking callback, normalised by the scene's anchor adapter.
    Anchor(AnchorCallback),
    /// Pointer gesture or an already normalised anchor event.
    Scene(SceneEvent),
}

impl From<ViewPhase> for HostInput {
    fn from(phase: ViewPhase) -> Self {
        Self::View(phase)
    }
}

impl From<OptionsCommandEvent> for HostInput {
    fn from(event: OptionsCommandEvent) -> Self {
        Self::Options(event)
    }
}

impl From<AnchorCallback> for HostInput {
    fn from(callback: AnchorCallback) -> Self {
        Self::Anchor(callback)
    }
}

impl From<SceneEvent> for HostInput {
    fn from(event: SceneEvent) -> Self {
        Self::Scene(event)
    }
}

/// Apply every queued host input to the scene in arrival order.
pub fn apply_host_inputs<S: TrackingSession + Send + Sync + 'static>(
    mut inputs: EventReader<HostInput>,
    mut scene: ResMut<ArScene>,
    mut session: ResMut<TrackingSessionHandle<S>>,
    library: Res<PrototypeLibrary>,
) {
    let core = &mut scene.0;
    for input in inputs.read() {
        match input {
            HostInput::View(phase) => core.view_lifecycle(*phase, &mut session.0),
            HostInput::Options(event) => {
                apply_options_command(core, event, &library, &mut session.0)
            }
            HostInput::Anchor(callback) => {
                core.ingest(callback, &session.0);
            }
            HostInput::Scene(event) => {
                core.dispatch(event.clone(), &session.0);
            }
        }
    }
}

/// Mirror the core's observable state into `SceneStatus`, touching the
/// resource only when something changed.
pub fn publish_scene_status(scene: Res<ArScene>, mut status: ResMut<SceneStatus>) {
    status.set_if_neq(scene.0.status());
}
