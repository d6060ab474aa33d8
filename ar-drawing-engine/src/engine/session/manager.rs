use bevy::log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::config::{PlaneDetectionScope, RunOptions, TrackingConfiguration};
use super::platform::TrackingSession;
use crate::engine::mode::PlacementMode;
use crate::engine::scene::SceneStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Derives the tracking configuration from the placement mode and (re)runs
/// the session with it.
#[derive(Debug)]
pub struct SessionConfigManager {
    scope: PlaneDetectionScope,
    image_group: String,
    state: SessionState,
    current: Option<TrackingConfiguration>,
}

impl SessionConfigManager {
    pub fn new(scope: PlaneDetectionScope, image_group: impl Into<String>) -> Self {
        Self {
            scope,
            image_group: image_group.into(),
            state: SessionState::Idle,
            current: None,
        }
    }

    /// Rebuild the configuration for `mode` and run it. A purge clears the
    /// scene store and asks the session to drop its anchors; otherwise the
    /// running session keeps everything it tracks.
    pub fn reconfigure(
        &mut self,
        mode: PlacementMode,
        purge: bool,
        store: &mut SceneStore,
        session: &mut dyn TrackingSession,
    ) -> TrackingConfiguration {
        let images = match mode {
            PlacementMode::ImageAttach => {
                let images = session.reference_images(&self.image_group);
                if images.is_none() {
                    warn!(
                        "Reference image group '{}' is missing, image detection disabled",
                        self.image_group
                    );
                }
                images
            }
            PlacementMode::Freeform | PlacementMode::PlaneSnap => None,
        };

        let configuration = TrackingConfiguration::for_mode(mode, self.scope, images);

        if purge {
            store.reset();
            info!("Session purged, running {} configuration", mode.as_str());
        } else {
            debug!("Running {} configuration", mode.as_str());
        }

        session.run(
            &configuration,
            RunOptions {
                remove_existing_anchors: purge,
            },
        );

        self.state = SessionState::Running;
        self.current = Some(configuration.clone());
        configuration
    }

    /// Pause tracking. Scene state is left untouched.
    pub fn pause(&mut self, session: &mut dyn TrackingSession) {
        if self.state == SessionState::Running {
            session.pause();
            self.state = SessionState::Paused;
            debug!("Session paused");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration of the last run, if any.
    pub fn current(&self) -> Option<&TrackingConfiguration> {
        self.current.as_ref()
    }

    pub fn scope(&self) -> PlaneDetectionScope {
        self.scope
    }
}
