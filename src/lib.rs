//! # Wormhole Signal
//!
//! Decoupled event dispatch for game engines. A [`Signal`] is a named event channel that any
//! component can call or observe without holding a reference to the other side; a
//! [`SignalRegistry`] resolves signals by stable GUID or by display name.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use wormhole_signal::{Signal, SignalRegistry};
//!
//! let registry = SignalRegistry::new();
//! let door = Arc::new(Signal::with_guid("g1", "Door"));
//! registry.add(&door);
//!
//! // Somewhere else, knowing only the name
//! let opened = Arc::new(Mutex::new(Vec::new()));
//! let sink = opened.clone();
//! registry
//!     .resolve_by_name("Door")
//!     .unwrap()
//!     .subscribe_typed(move |id: &u32| sink.lock().unwrap().push(*id));
//!
//! door.call_with(7u32);
//! assert_eq!(*opened.lock().unwrap(), vec![7]);
//! ```
//!
//! ## Observer collections
//!
//! - **no-arg**: run by [`Signal::call`]
//! - **any-call**: run by every call, with `None` for calls without a value
//! - **any-value**: run by every call that carries a value
//! - **typed**: run when a call is routed under one exact [`TypeTag`]
//!
//! Subscribing returns a [`SubscriptionToken`], which [`Signal::unsubscribe`] takes back.
//!
//! ## Main Types
//!
//! - [`Signal`] - the dispatcher
//! - [`SignalRegistry`] - GUID and name lookup over the known signals
//! - [`define_signal_registry!`] - declare a process-wide registry in a named module
//! - [`RegistryEvent`] - events passed to a registry's trace callback
//! - [`SignalError`] - lookup failures

mod macros;
mod payload;
mod registry;
mod registry_event;
mod signal;
mod signal_error;
mod subscription;

// Re-export the main public API
pub use payload::{Payload, TypeTag};
pub use registry::{RegistryConfig, SignalRegistry, TraceCallback};
pub use registry_event::{LookupKey, RegistryEvent};
pub use signal::Signal;
pub use signal_error::SignalError;
pub use subscription::{ObserverKind, SubscriptionToken};
