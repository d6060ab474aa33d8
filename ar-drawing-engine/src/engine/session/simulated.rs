use std::collections::{BTreeMap, HashMap};

use bevy::log::debug;
use bevy::math::{Mat4, Vec2, Vec3};
use constants::session::{SIMULATED_VERTICAL_FOV, SIMULATED_VIEWPORT_SIZE};

use super::config::{RunOptions, TrackingConfiguration};
use super::platform::{HitTestResult, HitTestType, ReferenceImageSet, TrackingSession};
use super::ray::{PlaneHit, ray_hits_infinite_plane, ray_hits_plane_extent};
use crate::engine::anchors::{AnchorCallback, AnchorId, PlatformAnchorPayload, PlaneGeometry};

#[derive(Debug, Clone, Copy)]
struct SimulatedPlane {
    pose: Mat4,
    geometry: PlaneGeometry,
}

/// Desktop stand-in for the platform tracking session.
///
/// A pinhole camera over a set of known planes. Hit-tests cast a ray through
/// the screen point; plane geometry is fed from the same anchor callbacks the
/// scene receives.
#[derive(Debug)]
pub struct SimulatedSession {
    camera: Option<Mat4>,
    viewport: Vec2,
    vertical_fov: f32,
    planes: BTreeMap<AnchorId, SimulatedPlane>,
    image_sets: HashMap<String, ReferenceImageSet>,
    runs: Vec<(TrackingConfiguration, RunOptions)>,
    running: bool,
}

impl Default for SimulatedSession {
    fn default() -> Self {
        Self::new(Vec2::from_array(SIMULATED_VIEWPORT_SIZE), SIMULATED_VERTICAL_FOV)
    }
}

impl SimulatedSession {
    pub fn new(viewport: Vec2, vertical_fov: f32) -> Self {
        Self {
            camera: None,
            viewport,
            vertical_fov,
            planes: BTreeMap::new(),
            image_sets: HashMap::new(),
            runs: Vec::new(),
            running: false,
        }
    }

    pub fn set_camera(&mut self, transform: Mat4) {
        self.camera = Some(transform);
    }

    pub fn add_reference_images(&mut self, set: ReferenceImageSet) {
        self.image_sets.insert(set.group.clone(), set);
    }

    /// Mirror an anchor callback into the hit-testable plane set.
    pub fn track(&mut self, callback: &AnchorCallback) {
        match callback {
            AnchorCallback::Added(anchor) | AnchorCallback::Updated(anchor) => {
                if let PlatformAnchorPayload::Plane {
                    extent,
                    center,
                    alignment,
                } = &anchor.payload
                {
                    self.planes.insert(
                        AnchorId(anchor.identifier),
                        SimulatedPlane {
                            pose: anchor.transform,
                            geometry: PlaneGeometry::new(*extent, *center, *alignment),
                        },
                    );
                }
            }
            AnchorCallback::Removed(identifier) => {
                self.planes.remove(&AnchorId(*identifier));
            }
        }
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Runs requested so far, oldest first.
    pub fn runs(&self) -> &[(TrackingConfiguration, RunOptions)] {
        &self.runs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// World-space ray through a screen point (origin top-left, y down).
    pub fn screen_ray(&self, point: Vec2) -> Option<(Vec3, Vec3)> {
        let camera = self.camera?;
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }

        let ndc = Vec2::new(
            2.0 * point.x / self.viewport.x - 1.0,
            1.0 - 2.0 * point.y / self.viewport.y,
        );
        let tan_half = (self.vertical_fov * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;
        let local = Vec3::new(ndc.x * tan_half * aspect, ndc.y * tan_half, -1.0);

        let origin = camera.transform_point3(Vec3::ZERO);
        let direction = camera.transform_vector3(local).normalize_or_zero();
        (direction != Vec3::ZERO).then_some((origin, direction))
    }
}

impl TrackingSession for SimulatedSession {
    fn run(&mut self, configuration: &TrackingConfiguration, options: RunOptions) {
        if options.remove_existing_anchors {
            self.planes.clear();
        }
        self.runs.push((configuration.clone(), options));
        self.running = true;
    }

    fn pause(&mut self) {
        self.running = false;
    }

    fn current_camera_transform(&self) -> Option<Mat4> {
        if self.running { self.camera } else { None }
    }

    fn hit_test(&self, point: Vec2, types: &[HitTestType]) -> Vec<HitTestResult> {
        if !self.running {
            return Vec::new();
        }
        let Some((origin, direction)) = self.screen_ray(point) else {
            return Vec::new();
        };

        let use_extent = types.contains(&HitTestType::ExistingPlaneUsingExtent);
        let use_infinite = types.contains(&HitTestType::ExistingPlane);

        let mut results: Vec<HitTestResult> = self
            .planes
            .iter()
            .filter_map(|(id, plane)| {
                let hit: Option<PlaneHit> = if use_extent {
                    ray_hits_plane_extent(origin, direction, plane.pose, &plane.geometry)
                } else if use_infinite {
                    ray_hits_infinite_plane(origin, direction, plane.pose, &plane.geometry)
                } else {
                    None
                };
                hit.map(|hit| HitTestResult {
                    world_transform: plane.pose * Mat4::from_translation(hit.local_point),
                    distance: hit.distance,
                    anchor: Some(*id),
                })
            })
            .collect();

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        debug!("hit-test at {:?}: {} result(s)", point, results.len());
        results
    }

    fn reference_images(&self, group: &str) -> Option<ReferenceImageSet> {
        self.image_sets.get(group).cloned()
    }
}
