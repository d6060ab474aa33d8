//! Scene-anchor synchronisation core for AR drawing and placement.
//!
//! Reconciles a noisy, asynchronous tracking feed (plane and image anchors
//! appearing, moving and disappearing) with the user's placed objects and
//! per-plane overlays, enforcing placement policy per mode.
//!
//! ```text
//! Tracking callbacks ─> AnchorEventAdapter ─┐
//!                                           ├─> SceneCore ─> SceneStore
//! Pointer gestures ───> PlacementPolicy ────┘        │
//! Options UI ─> OptionsCommand ─────────────────────-┤
//!                                                    └─> SessionConfigManager
//!                                                          └─> TrackingSession
//! ```
//!
//! The core is plain Rust; `ArDrawingPlugin` hosts it in a Bevy app, where
//! every host input travels through one `HostInput` event queue and is
//! applied in arrival order.

pub mod engine;
pub mod replay;
pub mod rpc;
pub mod tools;

pub use engine::core::app_setup::{ArDrawingPlugin, create_app};
pub use engine::core::app_state::{ArScene, HostInput, PrototypeLibrary, TrackingSessionHandle};
pub use engine::core::scene_core::{SceneCore, ViewPhase};
pub use engine::core::status::SceneStatus;
pub use engine::events::SceneEvent;
pub use engine::mode::PlacementMode;
pub use engine::settings::{EngineSettings, SettingsError};
