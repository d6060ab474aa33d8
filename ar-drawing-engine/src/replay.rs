//! Scripted tracking traces for the desktop binary.
//!
//! A trace is a JSON document listing prototypes and a sequence of steps
//! (view lifecycle, options commands, camera moves, anchor callbacks and
//! pointer gestures). Each step is applied to an app hosting a
//! `SimulatedSession` and followed by one `App::update`.

use std::path::Path;

use bevy::math::{Mat4, Quat, Vec2, Vec3};
use bevy::prelude::*;
use constants::session::{SIMULATED_VERTICAL_FOV, SIMULATED_VIEWPORT_SIZE};
use serde::Deserialize;

use crate::engine::anchors::{AnchorCallback, PlaneAlignment, PlatformAnchor, PlatformAnchorPayload};
use crate::engine::core::app_state::{HostInput, PrototypeLibrary, TrackingSessionHandle};
use crate::engine::core::scene_core::ViewPhase;
use crate::engine::core::status::SceneStatus;
use crate::engine::events::SceneEvent;
use crate::engine::mode::PlacementMode;
use crate::engine::scene::{Prototype, SharedGeometry};
use crate::engine::session::{ReferenceImage, ReferenceImageSet, SimulatedSession};
use crate::engine::settings::EngineSettings;
use crate::rpc::options_rpc::OptionsRpcInterface;
use crate::tools::animation::AnimationCommand;
use crate::tools::tool_manager::{CommandSource, OptionsCommand, OptionsCommandEvent};

#[derive(Debug)]
pub enum ReplayError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
}

impl From<std::io::Error> for ReplayError {
    fn from(err: std::io::Error) -> Self {
        ReplayError::IoError(err)
    }
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::ParseError(err)
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::IoError(e) => write!(f, "IO error: {}", e),
            ReplayError::ParseError(e) => write!(f, "Trace parse error: {}", e),
        }
    }
}

impl std::error::Error for ReplayError {}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipSpec {
    pub key: String,
    pub duration: f32,
}

/// Prototype offered to the options UI during the replay.
#[derive(Debug, Clone, Deserialize)]
pub struct PrototypeSpec {
    pub name: String,
    pub mesh: String,
    pub material: String,
    /// Local offset applied when attached to an image anchor.
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default)]
    pub animations: Vec<ClipSpec>,
}

impl PrototypeSpec {
    pub fn build(&self) -> Prototype {
        let prototype = Prototype::new(
            self.name.clone(),
            SharedGeometry {
                mesh: self.mesh.clone(),
                material: self.material.clone(),
            },
        )
        .with_transform(Mat4::from_translation(Vec3::from_array(self.translation)));

        self.animations
            .iter()
            .fold(prototype, |prototype, clip| {
                prototype.with_animation(clip.key.clone(), clip.duration)
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceImageSpec {
    pub name: String,
    pub physical_width: f32,
}

fn identity_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

/// One replay step.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceStep {
    View {
        phase: ViewPhase,
    },
    Mode {
        mode: PlacementMode,
    },
    Select {
        name: String,
    },
    ClearSelection,
    ToggleOverlay,
    Undo,
    Reset,
    Animation {
        command: AnimationCommand,
    },
    Camera {
        translation: [f32; 3],
        /// Quaternion as `[x, y, z, w]`.
        #[serde(default = "identity_rotation")]
        rotation: [f32; 4],
    },
    PlaneAdded {
        id: u64,
        translation: [f32; 3],
        /// Plane size along its local x and z axes.
        extent: [f32; 2],
        #[serde(default)]
        center: [f32; 3],
        #[serde(default)]
        alignment: PlaneAlignment,
    },
    PlaneUpdated {
        id: u64,
        translation: [f32; 3],
        extent: [f32; 2],
        #[serde(default)]
        center: [f32; 3],
        #[serde(default)]
        alignment: PlaneAlignment,
    },
    ImageAdded {
        id: u64,
        translation: [f32; 3],
        #[serde(default)]
        name: Option<String>,
    },
    AnchorRemoved {
        id: u64,
    },
    PointerDown {
        x: f32,
        y: f32,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp,
    /// Raw JSON-RPC message pushed through the options bridge.
    Rpc {
        message: serde_json::Value,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Trace {
    #[serde(default)]
    pub viewport: Option<[f32; 2]>,
    #[serde(default)]
    pub vertical_fov: Option<f32>,
    #[serde(default)]
    pub prototypes: Vec<PrototypeSpec>,
    #[serde(default)]
    pub reference_images: Vec<ReferenceImageSpec>,
    pub steps: Vec<TraceStep>,
}

impl Trace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Simulated session configured with this trace's camera and images.
    pub fn session(&self, settings: &EngineSettings) -> SimulatedSession {
        let viewport = self
            .viewport
            .map(Vec2::from_array)
            .unwrap_or(Vec2::from_array(SIMULATED_VIEWPORT_SIZE));
        let mut session =
            SimulatedSession::new(viewport, self.vertical_fov.unwrap_or(SIMULATED_VERTICAL_FOV));
        if !self.reference_images.is_empty() {
            session.add_reference_images(ReferenceImageSet {
                group: settings.reference_image_group.clone(),
                images: self
                    .reference_images
                    .iter()
                    .map(|image| ReferenceImage {
                        name: image.name.clone(),
                        physical_width: image.physical_width,
                    })
                    .collect(),
            });
        }
        session
    }

    /// Register the trace's prototypes with the app's library.
    pub fn install_prototypes(&self, app: &mut App) {
        let mut library = app.world_mut().resource_mut::<PrototypeLibrary>();
        for spec in &self.prototypes {
            library.insert(spec.build());
        }
    }

    /// Apply every step, returning the status observed after each one.
    pub fn replay(&self, app: &mut App) -> Vec<SceneStatus> {
        self.steps
            .iter()
            .map(|step| {
                apply_step(app, step);
                app.update();
                app.world().resource::<SceneStatus>().clone()
            })
            .collect()
    }
}

fn pose(translation: [f32; 3], rotation: [f32; 4]) -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_array(rotation).normalize(),
        Vec3::from_array(translation),
    )
}

fn plane_anchor(
    id: u64,
    translation: [f32; 3],
    extent: [f32; 2],
    center: [f32; 3],
    alignment: PlaneAlignment,
) -> PlatformAnchor {
    PlatformAnchor {
        identifier: id,
        transform: pose(translation, identity_rotation()),
        payload: PlatformAnchorPayload::Plane {
            extent: Vec3::new(extent[0], 0.0, extent[1]),
            center: Vec3::from_array(center),
            alignment,
        },
    }
}

fn send_command(app: &mut App, command: OptionsCommand) {
    send_input(
        app,
        OptionsCommandEvent {
            command,
            source: CommandSource::Ui,
        },
    );
}

/// Feed a tracking callback to both the simulated session and the scene.
fn send_callback(app: &mut App, callback: AnchorCallback) {
    app.world_mut()
        .resource_mut::<TrackingSessionHandle<SimulatedSession>>()
        .0
        .track(&callback);
    send_input(app, callback);
}

fn send_input(app: &mut App, input: impl Into<HostInput>) {
    app.world_mut().send_event(input.into());
}

/// Turn one step into events or session changes. Does not update the app.
pub fn apply_step(app: &mut App, step: &TraceStep) {
    match step {
        TraceStep::View { phase } => {
            send_input(app, *phase);
        }
        TraceStep::Mode { mode } => send_command(app, OptionsCommand::SetMode(*mode)),
        TraceStep::Select { name } => {
            send_command(app, OptionsCommand::SelectPrototype(name.clone()))
        }
        TraceStep::ClearSelection => send_command(app, OptionsCommand::ClearSelection),
        TraceStep::ToggleOverlay => send_command(app, OptionsCommand::TogglePlaneOverlay),
        TraceStep::Undo => send_command(app, OptionsCommand::UndoLastObject),
        TraceStep::Reset => send_command(app, OptionsCommand::ResetScene),
        TraceStep::Animation { command } => send_command(app, OptionsCommand::Animation(*command)),
        TraceStep::Camera {
            translation,
            rotation,
        } => {
            app.world_mut()
                .resource_mut::<TrackingSessionHandle<SimulatedSession>>()
                .0
                .set_camera(pose(*translation, *rotation));
        }
        TraceStep::PlaneAdded {
            id,
            translation,
            extent,
            center,
            alignment,
        } => send_callback(
            app,
            AnchorCallback::Added(plane_anchor(*id, *translation, *extent, *center, *alignment)),
        ),
        TraceStep::PlaneUpdated {
            id,
            translation,
            extent,
            center,
            alignment,
        } => send_callback(
            app,
            AnchorCallback::Updated(plane_anchor(*id, *translation, *extent, *center, *alignment)),
        ),
        TraceStep::ImageAdded {
            id,
            translation,
            name,
        } => send_callback(
            app,
            AnchorCallback::Added(PlatformAnchor::image(
                *id,
                pose(*translation, identity_rotation()),
                name.clone(),
            )),
        ),
        TraceStep::AnchorRemoved { id } => send_callback(app, AnchorCallback::Removed(*id)),
        TraceStep::PointerDown { x, y } => {
            send_input(app, SceneEvent::PointerDown(Vec2::new(*x, *y)))
        }
        TraceStep::PointerMove { x, y } => {
            send_input(app, SceneEvent::PointerMove(Vec2::new(*x, *y)))
        }
        TraceStep::PointerUp => send_input(app, SceneEvent::PointerUp),
        TraceStep::Rpc { message } => {
            app.world_mut()
                .resource_mut::<OptionsRpcInterface>()
                .push_message(message.to_string());
        }
    }
}
