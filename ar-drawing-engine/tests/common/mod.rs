#![allow(dead_code)]

use std::sync::Arc;

use ar_drawing_engine::engine::scene::{Prototype, SharedGeometry};
use ar_drawing_engine::engine::session::{
    HitTestResult, HitTestType, ReferenceImageSet, RunOptions, TrackingConfiguration,
    TrackingSession,
};
use bevy::math::{Mat4, Vec2};

/// Tracking session double: a fixed camera, a fixed hit result and a log of
/// every run request.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    pub camera: Option<Mat4>,
    pub hit: Option<Mat4>,
    pub images: Option<ReferenceImageSet>,
    pub runs: Vec<(TrackingConfiguration, RunOptions)>,
    pub pauses: usize,
}

impl ScriptedSession {
    pub fn with_camera(camera: Mat4) -> Self {
        Self {
            camera: Some(camera),
            ..Default::default()
        }
    }

    pub fn with_hit(hit: Mat4) -> Self {
        Self {
            camera: Some(Mat4::IDENTITY),
            hit: Some(hit),
            ..Default::default()
        }
    }
}

impl TrackingSession for ScriptedSession {
    fn run(&mut self, configuration: &TrackingConfiguration, options: RunOptions) {
        self.runs.push((configuration.clone(), options));
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn current_camera_transform(&self) -> Option<Mat4> {
        self.camera
    }

    fn hit_test(&self, _point: Vec2, _types: &[HitTestType]) -> Vec<HitTestResult> {
        self.hit
            .map(|world_transform| HitTestResult {
                world_transform,
                distance: 1.0,
                anchor: None,
            })
            .into_iter()
            .collect()
    }

    fn reference_images(&self, _group: &str) -> Option<ReferenceImageSet> {
        self.images.clone()
    }
}

pub fn prototype(name: &str) -> Arc<Prototype> {
    Arc::new(Prototype::new(
        name,
        SharedGeometry {
            mesh: format!("{name}.mesh"),
            material: "default".into(),
        },
    ))
}
