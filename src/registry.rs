//! The signal registry: a directory of every known [`Signal`], resolvable by GUID or by name.
//!
//! The registry owns a canonical, ordered list of signals: a listed signal stays alive and
//! resolvable until the host unlists it. [`SignalRegistry::remove`] unlists an entry outright;
//! [`SignalRegistry::release`] only empties its slot, leaving a placeholder that
//! [`SignalRegistry::add`] reuses and [`SignalRegistry::clean`] purges.
//!
//! Lookups go through two derived indexes (GUID and name). They are built lazily, as whole maps,
//! on the first resolve after the canonical list changed.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use wormhole_signal::{Signal, SignalRegistry};
//!
//! let registry = SignalRegistry::new();
//! let door = Arc::new(Signal::with_guid("g1", "Door"));
//! registry.add(&door);
//!
//! let by_guid = registry.resolve_by_guid("g1").unwrap();
//! let by_name = registry.resolve_by_name("Door").unwrap();
//! assert!(Arc::ptr_eq(&by_guid, &door));
//! assert!(Arc::ptr_eq(&by_name, &door));
//!
//! registry.remove(&door);
//! assert!(registry.resolve_by_guid("g1").is_err());
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::{LookupKey, RegistryEvent, Signal, SignalError};

// -------------------------------------------------------------------------------------------------
// Configuration & tracing
// -------------------------------------------------------------------------------------------------

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` on every `add`, `remove`, `release`,
/// `clean`, `clear` and resolve, and whenever a resolve rebuilds the indexes. Read-only queries
/// (`contains`, `len`, `signals`) and `invalidate_indexes` emit nothing. It must be thread-safe
/// because a registry may be shared between threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Construction-time options of a [`SignalRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Log a warning when two listed signals share a display name.
    ///
    /// The `DuplicateName` trace event is emitted either way.
    pub warn_on_duplicate_names: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            warn_on_duplicate_names: true,
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Canonical list and indexes
// -------------------------------------------------------------------------------------------------

struct Indexes {
    by_guid: FxHashMap<String, Arc<Signal>>,
    by_name: FxHashMap<String, Arc<Signal>>,
}

/// What a rebuild found, reported once the registry lock is released.
struct Rebuild {
    signals: usize,
    duplicates: Vec<RegistryEvent>,
}

/// `None` slots are placeholders.
struct State {
    signals: Vec<Option<Arc<Signal>>>,
    indexes: Option<Indexes>,
}

fn is_same(entry: &Option<Arc<Signal>>, signal: &Arc<Signal>) -> bool {
    entry
        .as_ref()
        .is_some_and(|listed| Arc::ptr_eq(listed, signal))
}

impl State {
    fn position(&self, signal: &Arc<Signal>) -> Option<usize> {
        self.signals.iter().position(|entry| is_same(entry, signal))
    }

    /// Drops placeholder slots, keeping the order of live entries.
    fn compact(&mut self) -> usize {
        let before = self.signals.len();
        self.signals.retain(Option::is_some);
        let removed = before - self.signals.len();
        if removed > 0 {
            self.indexes = None;
        }
        removed
    }

    fn ensure_indexes(&mut self) -> Option<Rebuild> {
        if self.indexes.is_some() {
            return None;
        }

        let mut by_guid: FxHashMap<String, Arc<Signal>> = FxHashMap::default();
        let mut by_name: FxHashMap<String, Arc<Signal>> = FxHashMap::default();
        let mut duplicates = Vec::new();

        for signal in self.signals.iter().flatten() {
            if let Some(kept) = by_guid.get(signal.guid()) {
                warn!(
                    "signal GUID {} is listed twice ({:?} and {:?}); keeping the first",
                    signal.guid(),
                    kept.name(),
                    signal.name()
                );
            } else {
                by_guid.insert(signal.guid().to_owned(), Arc::clone(signal));
            }

            let name = signal.name();
            match by_name.get(&name) {
                Some(kept) => duplicates.push(RegistryEvent::DuplicateName {
                    name,
                    kept_guid: kept.guid().to_owned(),
                    dropped_guid: signal.guid().to_owned(),
                }),
                None => {
                    by_name.insert(name, Arc::clone(signal));
                }
            }
        }

        let signals = by_guid.len();
        self.indexes = Some(Indexes { by_guid, by_name });

        Some(Rebuild {
            signals,
            duplicates,
        })
    }
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// Directory of signals, resolvable by GUID or by display name.
///
/// A registry is an ordinary value: create one at the application's composition root and hand
/// it (or an `Arc` of it) to whatever needs to resolve signals. All methods take `&self`; the
/// canonical list is guarded by a mutex.
///
/// Listed signals are held by strong reference, so the host may drop its own handles and still
/// resolve them later.
pub struct SignalRegistry {
    config: RegistryConfig,
    state: Mutex<State>,
    trace: Mutex<Option<Arc<TraceCallback>>>,
}

impl Default for SignalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State {
                signals: Vec::new(),
                indexes: None,
            }),
            trace: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry interaction.
    ///
    /// The callback runs with no registry lock held, so it may call back into the registry it
    /// traces.
    ///
    /// # Example
    /// ```rust
    /// use wormhole_signal::SignalRegistry;
    ///
    /// let registry = SignalRegistry::new();
    /// registry.set_trace_callback(|event| println!("[signal-registry] {event}"));
    /// ```
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        let callback = self
            .trace
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn report_rebuild(&self, rebuild: Option<Rebuild>) {
        let Some(rebuild) = rebuild else {
            return;
        };

        for event in &rebuild.duplicates {
            if let RegistryEvent::DuplicateName {
                name, dropped_guid, ..
            } = event
            {
                if self.config.warn_on_duplicate_names {
                    warn!(
                        "several signals are named {name:?}; lookups by that name resolve to the \
                         first one only (signal {dropped_guid} is unreachable by name)"
                    );
                }
            }
            self.emit_event(event);
        }

        debug!("signal indexes rebuilt over {} signals", rebuild.signals);
        self.emit_event(&RegistryEvent::IndexRebuild {
            signals: rebuild.signals,
        });
    }

    // -------------------------------------------------------------------------------------------------
    // Canonical list
    // -------------------------------------------------------------------------------------------------

    // Every mutation leaves the list consistent before releasing the guard, so a poisoned lock
    // is recovered.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Returns `true` if this exact signal instance is listed.
    pub fn contains(&self, signal: &Arc<Signal>) -> bool {
        self.state().position(signal).is_some()
    }

    /// Lists `signal`, reusing the first placeholder slot if there is one.
    ///
    /// Does nothing if the signal is already listed, so hosts can call it on every use.
    pub fn add(&self, signal: &Arc<Signal>) {
        let added = {
            let mut state = self.state();
            if state.position(signal).is_some() {
                false
            } else {
                let entry = Some(Arc::clone(signal));
                match state.signals.iter().position(Option::is_none) {
                    Some(slot) => state.signals[slot] = entry,
                    None => state.signals.push(entry),
                }
                state.compact();
                state.indexes = None;
                true
            }
        };

        if added {
            debug!("signal {} ({:?}) added to registry", signal.guid(), signal.name());
        }
        self.emit_event(&RegistryEvent::Add {
            guid: signal.guid().to_owned(),
            added,
        });
    }

    /// Unlists the first entry for this exact signal instance. Does nothing if it is absent.
    pub fn remove(&self, signal: &Arc<Signal>) {
        let removed = {
            let mut state = self.state();
            let removed = match state.position(signal) {
                Some(index) => {
                    state.signals.remove(index);
                    state.indexes = None;
                    true
                }
                None => false,
            };
            state.compact();
            removed
        };

        if removed {
            debug!("signal {} removed from registry", signal.guid());
        }
        self.emit_event(&RegistryEvent::Remove {
            guid: signal.guid().to_owned(),
            removed,
        });
    }

    /// Empties the slot of `signal` without compacting the list, leaving a placeholder.
    ///
    /// This is what an asset that vanished without a deletion hook leaves behind. The signal is
    /// no longer resolvable; the slot is reused by the next `add` and purged by `clean`. Returns
    /// `false` if the signal was not listed.
    pub fn release(&self, signal: &Arc<Signal>) -> bool {
        let released = {
            let mut state = self.state();
            match state.position(signal) {
                Some(index) => {
                    state.signals[index] = None;
                    state.indexes = None;
                    true
                }
                None => false,
            }
        };

        if released {
            debug!("signal {} released, slot left vacant", signal.guid());
        }
        self.emit_event(&RegistryEvent::Release {
            guid: signal.guid().to_owned(),
            released,
        });
        released
    }

    /// Purges placeholder entries and returns how many were removed.
    pub fn clean(&self) -> usize {
        let removed = self.state().compact();
        if removed > 0 {
            debug!("purged {removed} placeholder entries from signal registry");
        }
        self.emit_event(&RegistryEvent::Clean { removed });
        removed
    }

    /// Number of slots in the canonical list, placeholders included.
    pub fn len(&self) -> usize {
        self.state().signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().signals.is_empty()
    }

    /// Listed signals in canonical order, placeholders skipped.
    pub fn signals(&self) -> Vec<Arc<Signal>> {
        self.state().signals.iter().flatten().cloned().collect()
    }

    /// Drops both derived indexes; the next resolve rebuilds them.
    ///
    /// Needed after renaming a listed signal, since the name index is cached.
    pub fn invalidate_indexes(&self) {
        self.state().indexes = None;
    }

    /// Unlists every signal. Signals themselves are untouched.
    #[doc(hidden)]
    pub fn clear(&self) {
        self.emit_event(&RegistryEvent::Clear {});

        let mut state = self.state();
        state.signals.clear();
        state.indexes = None;
    }

    // -------------------------------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------------------------------

    /// Resolves the signal with the given GUID.
    ///
    /// # Errors
    ///
    /// - [`SignalError::GuidNotFound`] if no listed signal has that GUID
    /// - [`SignalError::RegistryLock`] if the registry lock is poisoned
    pub fn resolve_by_guid(&self, guid: &str) -> Result<Arc<Signal>, SignalError> {
        let (found, rebuild) = self.lookup(|indexes| indexes.by_guid.get(guid))?;
        self.report_rebuild(rebuild);

        self.emit_event(&RegistryEvent::Resolve {
            key: LookupKey::Guid(guid.to_owned()),
            found: found.is_some(),
        });

        found.ok_or_else(|| SignalError::GuidNotFound {
            guid: guid.to_owned(),
        })
    }

    /// Resolves the signal with the given display name.
    ///
    /// When several listed signals share the name, the one listed first wins.
    ///
    /// # Errors
    ///
    /// - [`SignalError::NameNotFound`] if no listed signal has that name
    /// - [`SignalError::RegistryLock`] if the registry lock is poisoned
    pub fn resolve_by_name(&self, name: &str) -> Result<Arc<Signal>, SignalError> {
        let (found, rebuild) = self.lookup(|indexes| indexes.by_name.get(name))?;
        self.report_rebuild(rebuild);

        self.emit_event(&RegistryEvent::Resolve {
            key: LookupKey::Name(name.to_owned()),
            found: found.is_some(),
        });

        found.ok_or_else(|| SignalError::NameNotFound {
            name: name.to_owned(),
        })
    }

    fn lookup(
        &self,
        find: impl FnOnce(&Indexes) -> Option<&Arc<Signal>>,
    ) -> Result<(Option<Arc<Signal>>, Option<Rebuild>), SignalError> {
        let mut state = self.state.lock().map_err(|_| SignalError::RegistryLock)?;
        let rebuild = state.ensure_indexes();
        let found = state
            .indexes
            .as_ref()
            .and_then(find)
            .cloned();
        Ok((found, rebuild))
    }
}

impl fmt::Debug for SignalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRegistry")
            .field("config", &self.config)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
