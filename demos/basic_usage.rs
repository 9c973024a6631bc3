//! Basic usage example for wormhole-signal.
//!
//! Demonstrates:
//! - Creating signals and listing them in a registry
//! - Subscribing no-arg, any-value and typed observers
//! - Calling with and without a value
//! - Resolving signals by GUID and by name
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::Arc;
use wormhole_signal::{Payload, Signal, SignalRegistry};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== wormhole-signal: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Create and list signals
    // -------------------------------------------------------------------------
    println!("1. Creating signals...");

    let registry = SignalRegistry::new();
    let door = Arc::new(Signal::with_guid("door-guid", "Door"));
    let score = Arc::new(Signal::new("Score"));
    registry.add(&door);
    registry.add(&score);

    println!("   Door  -> {}", door.guid());
    println!("   Score -> {}", score.guid());

    // -------------------------------------------------------------------------
    // 2. Subscribe from code that only knows names
    // -------------------------------------------------------------------------
    println!("\n2. Subscribing observers...");

    let door_signal = registry.resolve_by_name("Door").expect("Door is listed");
    door_signal.subscribe(|| println!("   [no-arg] the door was used"));
    door_signal.subscribe_any_value(|payload: &Payload<'_>| {
        println!("   [any-value] door called with a {}", payload.tag())
    });
    door_signal.subscribe_typed(|id: &u32| println!("   [u32] opened by player {id}"));

    let score_signal = registry
        .resolve_by_guid(score.guid())
        .expect("Score is listed");
    score_signal.subscribe_typed(|points: &i64| println!("   [i64] +{points} points"));

    // -------------------------------------------------------------------------
    // 3. Call
    // -------------------------------------------------------------------------
    println!("\n3. Calling...");

    door.call();
    door.call_with(7u32);
    door.call_with("knock knock");
    score.call_with(100i64);

    // -------------------------------------------------------------------------
    // 4. Missing keys are errors
    // -------------------------------------------------------------------------
    println!("\n4. Resolving an unknown name...");

    match registry.resolve_by_name("Window") {
        Ok(_) => println!("   unexpected: found Window"),
        Err(err) => println!("   {err}"),
    }

    println!("\n=== Done ===");
}
