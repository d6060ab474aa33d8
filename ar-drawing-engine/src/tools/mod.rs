//! Interactive tools driven by pointer input and the options UI.
//!
//! ## Command Flow
//!
//! ```text
//! Options UI / RPC
//!   └─> HostInput::Options(OptionsCommandEvent)
//!       └─> apply_options_command()
//!           ├─> selection, overlay toggle, undo, animation
//!           └─> reset / mode change -> SessionConfigManager
//!
//! Pointer input
//!   └─> HostInput::Scene(SceneEvent::Pointer*)
//!       └─> PlacementPolicy -> SceneStore::add_object
//! ```
//!
//! ### Placement Policy
//! - **Freeform**: camera pose pushed 0.2 m forward, pointer position ignored
//! - **PlaneSnap**: hit-test against plane extents, drag re-places after
//!   the pointer travels more than 40 units
//! - **ImageAttach**: pointer never places; image detection does

/// Playback control of the most recent placement.
pub mod animation;

/// Pointer gesture to placement decisions, per mode.
pub mod placement;

/// Options commands and how they are applied to the scene.
pub mod tool_manager;
