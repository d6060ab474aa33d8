use std::sync::{Arc, Weak};

use bevy::math::Mat4;

/// Mesh and material shared by a prototype and all of its clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedGeometry {
    pub mesh: String,
    pub material: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub key: String,
    /// Seconds.
    pub duration: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

/// Playback state of one clip on one placed instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlayer {
    pub key: String,
    pub clip_duration: f32,
    /// Where in the clip playback starts, in seconds.
    pub time_offset: f32,
    /// Length of one playback cycle, in seconds.
    pub duration: f32,
    pub repeat: Repeat,
    pub playing: bool,
}

impl AnimationPlayer {
    fn from_clip(clip: &AnimationClip) -> Self {
        Self {
            key: clip.key.clone(),
            clip_duration: clip.duration,
            time_offset: 0.0,
            duration: clip.duration,
            repeat: Repeat::Once,
            playing: true,
        }
    }
}

/// Template object chosen in the options UI. Owned by the UI side; the scene
/// core only ever holds a `SelectedPrototype`.
#[derive(Debug, Clone)]
pub struct Prototype {
    pub name: String,
    pub geometry: Arc<SharedGeometry>,
    /// Local transform applied to clones attached to an anchor.
    pub transform: Mat4,
    pub animations: Vec<AnimationClip>,
}

impl Prototype {
    pub fn new(name: impl Into<String>, geometry: SharedGeometry) -> Self {
        Self {
            name: name.into(),
            geometry: Arc::new(geometry),
            transform: Mat4::IDENTITY,
            animations: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_animation(mut self, key: impl Into<String>, duration: f32) -> Self {
        self.animations.push(AnimationClip {
            key: key.into(),
            duration,
        });
        self
    }

    /// Clone for placement: geometry is shared, animation state is fresh.
    pub fn instantiate(&self) -> PlacedObject {
        PlacedObject {
            prototype: self.name.clone(),
            geometry: Arc::clone(&self.geometry),
            paused: false,
            players: self.animations.iter().map(AnimationPlayer::from_clip).collect(),
        }
    }
}

/// An independent instance of a prototype living in the scene.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub prototype: String,
    pub geometry: Arc<SharedGeometry>,
    pub paused: bool,
    pub players: Vec<AnimationPlayer>,
}

impl PlacedObject {
    pub fn shares_geometry_with(&self, other: &PlacedObject) -> bool {
        Arc::ptr_eq(&self.geometry, &other.geometry)
    }
}

/// Weak reference to the currently chosen prototype. Empty when nothing is
/// selected or when the UI dropped the prototype.
#[derive(Debug, Clone, Default)]
pub struct SelectedPrototype(Weak<Prototype>);

impl SelectedPrototype {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(prototype: &Arc<Prototype>) -> Self {
        Self(Arc::downgrade(prototype))
    }

    pub fn get(&self) -> Option<Arc<Prototype>> {
        self.0.upgrade()
    }

    pub fn name(&self) -> Option<String> {
        self.get().map(|prototype| prototype.name.clone())
    }
}
