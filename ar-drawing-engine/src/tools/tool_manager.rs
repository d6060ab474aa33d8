use bevy::log::{debug, warn};

use super::animation::AnimationCommand;
use crate::engine::core::app_state::PrototypeLibrary;
use crate::engine::core::scene_core::SceneCore;
use crate::engine::mode::PlacementMode;
use crate::engine::session::TrackingSession;

/// Actions the options UI forwards to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsCommand {
    SelectPrototype(String),
    ClearSelection,
    TogglePlaneOverlay,
    UndoLastObject,
    ResetScene,
    SetMode(PlacementMode),
    Animation(AnimationCommand),
}

impl OptionsCommand {
    /// Identifier used in logs and RPC acknowledgements.
    pub fn to_string(&self) -> &'static str {
        match self {
            Self::SelectPrototype(_) => "select_prototype",
            Self::ClearSelection => "clear_selection",
            Self::TogglePlaneOverlay => "toggle_plane_overlay",
            Self::UndoLastObject => "undo_last_object",
            Self::ResetScene => "reset_scene",
            Self::SetMode(_) => "set_placement_mode",
            Self::Animation(_) => "animation_control",
        }
    }
}

/// A command together with where it came from.
#[derive(Debug, Clone)]
pub struct OptionsCommandEvent {
    pub command: OptionsCommand,
    pub source: CommandSource,
}

/// Source of a command for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Rpc,
    Ui,
}

/// Apply one options command to the scene.
pub fn apply_options_command(
    scene: &mut SceneCore,
    event: &OptionsCommandEvent,
    library: &PrototypeLibrary,
    session: &mut dyn TrackingSession,
) {
    debug!("{} via {:?}", event.command.to_string(), event.source);

    match &event.command {
        OptionsCommand::SelectPrototype(name) => match library.get(name) {
            Some(prototype) => scene.select_prototype(prototype),
            None => warn!(
                "Unknown prototype '{}', selection unchanged (available: {})",
                name,
                library.names().collect::<Vec<_>>().join(", ")
            ),
        },
        OptionsCommand::ClearSelection => scene.clear_selection(),
        OptionsCommand::TogglePlaneOverlay => {
            scene.toggle_plane_overlay();
        }
        OptionsCommand::UndoLastObject => {
            scene.undo_last();
        }
        OptionsCommand::ResetScene => scene.reset(session),
        OptionsCommand::SetMode(mode) => scene.set_mode(*mode, session),
        OptionsCommand::Animation(command) => {
            scene.animation_control(*command);
        }
    }
}
