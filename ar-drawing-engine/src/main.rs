/// Headless trace replay for the AR drawing engine
use std::env;

use ar_drawing_engine::engine::session::SimulatedSession;
use ar_drawing_engine::replay::Trace;
use ar_drawing_engine::rpc::options_rpc::OptionsRpcInterface;
use ar_drawing_engine::{EngineSettings, SceneStatus, create_app};
use bevy::log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <trace.json> [settings.json]", args[0]);
        std::process::exit(1);
    }

    let settings = match args.get(2) {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };
    let trace = Trace::load(&args[1])?;

    let session = trace.session(&settings);
    let mut app = create_app::<SimulatedSession>(settings, session);
    app.finish();
    app.cleanup();
    trace.install_prototypes(&mut app);

    let statuses = trace.replay(&mut app);

    for message in app
        .world_mut()
        .resource_mut::<OptionsRpcInterface>()
        .take_outgoing()
    {
        info!("rpc -> {}", message);
    }

    let status = app.world().resource::<SceneStatus>();
    info!(
        "Replayed {} step(s): mode {}, {} placed, {} overlay(s), {} anchor(s)",
        statuses.len(),
        status.mode.as_str(),
        status.placed_count,
        status.overlay_count,
        status.anchor_count
    );
    println!("{}", serde_json::to_string_pretty(status)?);

    Ok(())
}
