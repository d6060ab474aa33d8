pub mod anchors;
pub mod core;
pub mod events;
pub mod mode;
pub mod scene;
pub mod session;
pub mod settings;
