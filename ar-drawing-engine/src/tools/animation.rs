use bevy::log::debug;
use serde::{Deserialize, Serialize};

use crate::engine::scene::{AnimationPlayer, PlacedObject, Repeat};

/// Playback control for the most recently placed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationCommand {
    /// Pause, then loop the second half of every clip.
    HoldMidpoint,
    Resume,
    None,
}

impl AnimationCommand {
    /// Index of the options sheet's segmented control.
    pub fn from_segment(segment: u8) -> Option<Self> {
        match segment {
            0 => Some(Self::HoldMidpoint),
            1 => Some(Self::Resume),
            2 => Some(Self::None),
            _ => None,
        }
    }
}

/// Returns whether the object changed.
pub fn apply_animation_command(object: &mut PlacedObject, command: AnimationCommand) -> bool {
    match command {
        AnimationCommand::HoldMidpoint => {
            object.paused = true;
            object.players = object.players.iter().map(midpoint_loop).collect();
            debug!("'{}' holding clip midpoint", object.prototype);
            true
        }
        AnimationCommand::Resume => {
            object.paused = false;
            debug!("'{}' resumed", object.prototype);
            true
        }
        AnimationCommand::None => false,
    }
}

fn midpoint_loop(player: &AnimationPlayer) -> AnimationPlayer {
    let half = player.clip_duration / 2.0;
    AnimationPlayer {
        key: player.key.clone(),
        clip_duration: player.clip_duration,
        time_offset: half,
        duration: half,
        repeat: Repeat::Forever,
        playing: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::{Prototype, SharedGeometry};

    fn dancer() -> PlacedObject {
        Prototype::new(
            "dancer",
            SharedGeometry {
                mesh: "dancer.mesh".into(),
                material: "skin".into(),
            },
        )
        .with_animation("spin", 4.0)
        .with_animation("wave", 1.0)
        .instantiate()
    }

    #[test]
    fn segments_map_to_commands() {
        assert_eq!(AnimationCommand::from_segment(0), Some(AnimationCommand::HoldMidpoint));
        assert_eq!(AnimationCommand::from_segment(1), Some(AnimationCommand::Resume));
        assert_eq!(AnimationCommand::from_segment(2), Some(AnimationCommand::None));
        assert_eq!(AnimationCommand::from_segment(3), None);
    }

    #[test]
    fn hold_midpoint_loops_second_half_of_each_clip() {
        let mut object = dancer();
        assert!(apply_animation_command(&mut object, AnimationCommand::HoldMidpoint));

        assert!(object.paused);
        let spin = &object.players[0];
        assert_eq!(spin.time_offset, 2.0);
        assert_eq!(spin.duration, 2.0);
        assert_eq!(spin.repeat, Repeat::Forever);
        assert!(spin.playing);
        assert_eq!(object.players[1].time_offset, 0.5);
    }

    #[test]
    fn resume_unpauses_and_keeps_players() {
        let mut object = dancer();
        apply_animation_command(&mut object, AnimationCommand::HoldMidpoint);
        assert!(apply_animation_command(&mut object, AnimationCommand::Resume));

        assert!(!object.paused);
        assert_eq!(object.players[0].repeat, Repeat::Forever);
    }

    #[test]
    fn none_changes_nothing() {
        let mut object = dancer();
        assert!(!apply_animation_command(&mut object, AnimationCommand::None));
        assert!(!object.paused);
        assert_eq!(object.players[0].time_offset, 0.0);
    }
}
