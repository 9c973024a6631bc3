//! Host tooling example for wormhole-signal.
//!
//! Demonstrates the calls an editor makes into a process-wide registry:
//! - listing a signal asset every time it is inspected
//! - unlisting an asset that is about to be deleted
//! - cleaning entries left behind by assets that vanished
//! - the duplicate-name diagnostic
//!
//! Run with: `cargo run --example host_tooling`

use std::sync::Arc;
use wormhole_signal::{define_signal_registry, Signal};

// The editor's process-wide registry
define_signal_registry!(editor);

fn inspect(asset: &Arc<Signal>) {
    // listing is a no-op when already present
    editor::add(asset);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== wormhole-signal: Host Tooling ===\n");

    editor::set_trace_callback(|event| println!("   [registry] {event}"));

    println!("1. Inspecting assets...");
    let jump = Arc::new(Signal::with_guid("0f6c", "Jump"));
    let land = Arc::new(Signal::with_guid("91ab", "Land"));
    let jump_copy = Arc::new(Signal::with_guid("77d2", "Jump"));
    for asset in [&jump, &land, &jump, &jump_copy] {
        inspect(asset);
    }

    println!("\n2. Resolving by name (duplicate names are reported once)...");
    if let Ok(found) = editor::resolve_by_name("Jump") {
        println!("   Jump resolves to {}", found.guid());
    }

    println!("\n3. Deleting the Land asset...");
    editor::remove(&land);

    println!("\n4. The Jump copy disappears without a deletion hook...");
    editor::release(&jump_copy);
    println!("   listed slots: {}", editor::registry().len());

    println!("\n5. Clean List...");
    let removed = editor::clean();
    println!("   removed {removed}, listed slots: {}", editor::registry().len());

    println!("\n=== Done ===");
}
