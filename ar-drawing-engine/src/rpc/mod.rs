//! JSON-RPC 2.0 bridge between the options UI and the scene.
//!
//! The options sheet (prototype picker, overlay toggle, undo, reset, mode
//! selector, animation control) talks to the engine through queued JSON-RPC
//! messages rather than direct calls, so any UI host can drive it.
//!
//! ## Message Flow
//!
//! ```text
//! Options UI                                 Bevy
//!     │                                        │
//!     ├─ push_message(Request) ──────────────> │ PreUpdate: parse, validate
//!     │                                        ├─ HostInput::Options
//!     │                                        │ Update: apply to ArScene
//!     │                                        │ PostUpdate:
//!     │ <──────────── scene_status_changed ────┤   status notification
//!     │ <──────────── Response (with ID) ──────┤   responses
//!     │             take_outgoing()            │
//! ```
//!
//! ## Methods
//!
//! - `select_prototype {name}`: choose the prototype to place
//! - `clear_selection`
//! - `toggle_plane_overlay`
//! - `undo_last_object`
//! - `reset_scene`: purge objects, overlays and anchors
//! - `set_placement_mode {mode}`: `freeform`, `plane_snap` or `image_attach`
//! - `animation_control {segment}`: 0 hold midpoint, 1 resume, 2 none
//! - `get_scene_status`: current `SceneStatus`
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32700`: Parse error
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// Request parsing, command dispatch and outgoing message queues.
pub mod options_rpc;
