use std::marker::PhantomData;

use bevy::log::LogPlugin;
use bevy::prelude::*;

// Crate engine modules
use crate::engine::core::app_state::{
    ArScene, HostInput, PrototypeLibrary, TrackingSessionHandle, apply_host_inputs,
    publish_scene_status,
};
use crate::engine::core::scene_core::SceneCore;
use crate::engine::core::status::SceneStatus;
use crate::engine::session::TrackingSession;
use crate::engine::settings::EngineSettings;
// Options RPC modules
use crate::rpc::options_rpc::OptionsRpcPlugin;

/// Hosts the scene core in a Bevy app, driving a `TrackingSession` of type
/// `S`. The host inserts `TrackingSessionHandle<S>` before the first update.
pub struct ArDrawingPlugin<S> {
    settings: EngineSettings,
    _session: PhantomData<fn() -> S>,
}

impl<S> ArDrawingPlugin<S> {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            _session: PhantomData,
        }
    }
}

impl<S> Default for ArDrawingPlugin<S> {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl<S: TrackingSession + Send + Sync + 'static> Plugin for ArDrawingPlugin<S> {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .insert_resource(ArScene(SceneCore::new(&self.settings)))
            .init_resource::<PrototypeLibrary>()
            .init_resource::<SceneStatus>()
            .add_event::<HostInput>()
            .add_systems(
                Update,
                (
                    apply_host_inputs::<S>, // Lifecycle, options, anchors, pointers
                    publish_scene_status,
                )
                    .chain(),
            );

        info!(
            "AR drawing plugin ready (plane detection: {:?}, drag placement: {})",
            self.settings.plane_detection, self.settings.drag_placement
        );
    }
}

/// Headless app: scheduling, logging, the scene core and the options bridge.
pub fn create_app<S: TrackingSession + Send + Sync + 'static>(
    settings: EngineSettings,
    session: S,
) -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin {
            filter: settings.log_filter.clone(),
            ..default()
        })
        .insert_resource(TrackingSessionHandle(session))
        .add_plugins(ArDrawingPlugin::<S>::new(settings))
        .add_plugins(OptionsRpcPlugin);

    app
}
