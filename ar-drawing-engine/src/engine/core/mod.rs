//! Scene core and its Bevy hosting.
//!
//! `SceneCore` is plain Rust and owns every writer of scene state. The app
//! layer wraps it in resources and feeds it events in a fixed order each
//! frame: view lifecycle, options commands, anchor callbacks, pointer input,
//! then status publication.

/// Plugin registration and headless app construction.
///
/// Creates the app with logging, the scene plugin and the options RPC bridge.
pub mod app_setup;

/// ECS resources, host events and the systems feeding the scene core.
pub mod app_state;

/// Event dispatch over the store, overlays, placement policy and session.
pub mod scene_core;

/// Observable scene snapshot for the options UI.
pub mod status;
