//! Macro for declaring a named, process-wide signal registry.

/// Declares a module holding one lazily initialized [`SignalRegistry`](crate::SignalRegistry).
///
/// Most applications create a registry at their composition root and pass it around. When a
/// host wants exactly one registry for the whole process instead, this macro declares it in a
/// named module, with free functions forwarding to it.
///
/// The generated module contains:
/// - the registry static (hidden), created on first access
/// - `registry()` returning `&'static SignalRegistry`
/// - forwarding functions for the registry operations
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use wormhole_signal::{define_signal_registry, Signal};
///
/// define_signal_registry!(signals);
///
/// let door = Arc::new(Signal::with_guid("g1", "Door"));
/// signals::add(&door);
///
/// let found = signals::resolve_by_name("Door").unwrap();
/// assert!(Arc::ptr_eq(&found, &door));
/// ```
///
/// # Configuration
///
/// A second argument sets the [`RegistryConfig`](crate::RegistryConfig). It is evaluated inside
/// the generated module, so refer to items by absolute path:
///
/// ```rust
/// use wormhole_signal::define_signal_registry;
///
/// define_signal_registry!(
///     quiet,
///     wormhole_signal::RegistryConfig {
///         warn_on_duplicate_names: false,
///     }
/// );
///
/// assert!(!quiet::registry().config().warn_on_duplicate_names);
/// ```
#[macro_export]
macro_rules! define_signal_registry {
    ($name:ident) => {
        $crate::define_signal_registry!($name, $crate::RegistryConfig::default());
    };
    ($name:ident, $config:expr) => {
        pub mod $name {
            use std::sync::{Arc, LazyLock};

            // Registry storage (module-private)
            static REGISTRY: LazyLock<$crate::SignalRegistry> =
                LazyLock::new(|| $crate::SignalRegistry::with_config($config));

            /// The registry this module forwards to.
            pub fn registry() -> &'static $crate::SignalRegistry {
                &REGISTRY
            }

            /// List a signal in the registry.
            pub fn add(signal: &Arc<$crate::Signal>) {
                REGISTRY.add(signal)
            }

            /// Unlist a signal from the registry.
            pub fn remove(signal: &Arc<$crate::Signal>) {
                REGISTRY.remove(signal)
            }

            /// Check if a signal instance is listed.
            pub fn contains(signal: &Arc<$crate::Signal>) -> bool {
                REGISTRY.contains(signal)
            }

            /// Empty a signal's slot, leaving a placeholder.
            pub fn release(signal: &Arc<$crate::Signal>) -> bool {
                REGISTRY.release(signal)
            }

            /// Purge placeholder entries.
            pub fn clean() -> usize {
                REGISTRY.clean()
            }

            /// Resolve a signal by GUID.
            pub fn resolve_by_guid(guid: &str) -> Result<Arc<$crate::Signal>, $crate::SignalError> {
                REGISTRY.resolve_by_guid(guid)
            }

            /// Resolve a signal by display name.
            pub fn resolve_by_name(name: &str) -> Result<Arc<$crate::Signal>, $crate::SignalError> {
                REGISTRY.resolve_by_name(name)
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(
                callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static,
            ) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}
