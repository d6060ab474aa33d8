//! Tracking session boundary and configuration.
//!
//! The scene core never talks to the platform directly. It drives a
//! `TrackingSession` implementation with configurations derived from the
//! placement mode:
//!
//! ```text
//! PlacementMode + purge
//!   └─> SessionConfigManager::reconfigure
//!       ├─> TrackingConfiguration (planes always, images in image-attach)
//!       ├─> SceneStore::reset (purge only)
//!       └─> TrackingSession::run(config, RunOptions)
//! ```

/// Immutable tracking configuration values.
pub mod config;

/// Reconfiguration and pause handling.
pub mod manager;

/// The `TrackingSession` trait and its hit-test types.
pub mod platform;

/// Ray casting against plane anchors.
pub mod ray;

/// Pinhole-camera session used by the desktop binary and tests.
pub mod simulated;

pub use config::{PlaneDetection, PlaneDetectionScope, RunOptions, TrackingConfiguration};
pub use manager::{SessionConfigManager, SessionState};
pub use platform::{HitTestResult, HitTestType, ReferenceImage, ReferenceImageSet, TrackingSession};
pub use simulated::SimulatedSession;
