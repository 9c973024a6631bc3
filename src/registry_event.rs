/// Which index a lookup went through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Guid(String),
    Name(String),
}

impl std::fmt::Display for LookupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupKey::Guid(guid) => write!(f, "guid {guid:?}"),
            LookupKey::Name(name) => write!(f, "name {name:?}"),
        }
    }
}

/// Events emitted by a [`SignalRegistry`](crate::SignalRegistry) during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use wormhole_signal::RegistryEvent;
///
/// let event = RegistryEvent::Clean { removed: 2 };
/// assert_eq!(event.to_string(), "clean { removed: 2 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// `add` was called. `added` is false when the signal was already listed.
    Add { guid: String, added: bool },

    /// `remove` was called. `removed` is false when the signal was not listed.
    Remove { guid: String, removed: bool },

    /// `release` was called. `released` is false when the signal was not listed.
    Release { guid: String, released: bool },

    /// Placeholder entries were purged from the canonical list.
    Clean {
        /// Number of placeholders dropped
        removed: usize,
    },

    /// A signal was resolved by GUID or by name.
    Resolve { key: LookupKey, found: bool },

    /// The derived indexes were rebuilt from the canonical list.
    IndexRebuild {
        /// Number of live signals indexed
        signals: usize,
    },

    /// Two listed signals share a display name; only the first one is reachable by name.
    DuplicateName {
        name: String,
        kept_guid: String,
        dropped_guid: String,
    },

    /// The registry was cleared.
    Clear {},
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Add { guid, added } => {
                write!(f, "add {{ guid: {guid}, added: {added} }}")
            }
            RegistryEvent::Remove { guid, removed } => {
                write!(f, "remove {{ guid: {guid}, removed: {removed} }}")
            }
            RegistryEvent::Release { guid, released } => {
                write!(f, "release {{ guid: {guid}, released: {released} }}")
            }
            RegistryEvent::Clean { removed } => write!(f, "clean {{ removed: {removed} }}"),
            RegistryEvent::Resolve { key, found } => {
                write!(f, "resolve {{ {key}, found: {found} }}")
            }
            RegistryEvent::IndexRebuild { signals } => {
                write!(f, "index rebuild {{ signals: {signals} }}")
            }
            RegistryEvent::DuplicateName {
                name,
                kept_guid,
                dropped_guid,
            } => write!(
                f,
                "duplicate name {{ name: {name}, kept: {kept_guid}, dropped: {dropped_guid} }}"
            ),
            RegistryEvent::Clear {} => write!(f, "Clearing the Registry"),
        }
    }
}
