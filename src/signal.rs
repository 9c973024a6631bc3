//! The signal dispatcher.
//!
//! A [`Signal`] is one named event channel. It keeps four independent observer collections:
//!
//! - **no-arg** observers, run by [`Signal::call`];
//! - **any-call** observers, run by every call and handed `None` when the call has no value;
//! - **any-value** observers, run by every call that carries a value;
//! - **typed** observers, bucketed by [`TypeTag`] and run only when a call is routed under
//!   exactly that tag.
//!
//! Every subscribe returns a [`SubscriptionToken`]; unsubscribing takes the token back. The same
//! callback may be subscribed several times and then runs once per live token.
//!
//! # Re-entrancy
//!
//! A call copies the observer lists it needs, releases the signal's lock and only then runs the
//! observers. Observers may therefore subscribe, unsubscribe or call again on the same signal;
//! such changes take effect from the next call, and an observer removed mid-dispatch still runs
//! for the call already in flight.

use std::any::Any;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{trace, warn};
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::subscription::ObserverList;
use crate::{ObserverKind, Payload, SubscriptionToken, TypeTag};

type NoArgObserver = dyn Fn() + Send + Sync;
type AnyCallObserver = dyn Fn(Option<&Payload<'_>>) + Send + Sync;
type ValueObserver = dyn Fn(&Payload<'_>) + Send + Sync;

struct Observers {
    no_arg: ObserverList<NoArgObserver>,
    any_call: ObserverList<AnyCallObserver>,
    any_value: ObserverList<ValueObserver>,
    typed: FxHashMap<TypeTag, ObserverList<ValueObserver>>,
}

impl Observers {
    fn new() -> Self {
        Self {
            no_arg: ObserverList::new(),
            any_call: ObserverList::new(),
            any_value: ObserverList::new(),
            typed: FxHashMap::default(),
        }
    }
}

/// A single event channel, identified by a GUID and looked up by display name.
pub struct Signal {
    guid: String,
    name: Mutex<String>,
    observers: Mutex<Observers>,
}

impl Signal {
    /// Creates a signal with a freshly generated GUID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_guid(Uuid::new_v4().to_string(), name)
    }

    /// Creates a signal whose GUID comes from the host's own stable identity for it.
    ///
    /// The GUID never changes after this point.
    pub fn with_guid(guid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            name: Mutex::new(name.into()),
            observers: Mutex::new(Observers::new()),
        }
    }

    pub fn guid(&self) -> &str {
        &self.guid
    }

    pub fn name(&self) -> String {
        self.name.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Renames the signal.
    ///
    /// Registries cache their name index; call
    /// [`SignalRegistry::invalidate_indexes`](crate::SignalRegistry::invalidate_indexes)
    /// afterwards so lookups by name see the new name.
    pub fn set_name(&self, name: impl Into<String>) {
        *self.name.lock().unwrap_or_else(|p| p.into_inner()) = name.into();
    }

    // Observer lists are only ever pushed to or drained under this lock, so a poisoned
    // guard still holds consistent data.
    fn observers(&self) -> MutexGuard<'_, Observers> {
        self.observers.lock().unwrap_or_else(|p| p.into_inner())
    }

    // -------------------------------------------------------------------------------------------------
    // Subscribe
    // -------------------------------------------------------------------------------------------------

    /// Runs `callback` on every [`call`](Self::call) without a value.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> SubscriptionToken {
        let token = SubscriptionToken::issue(ObserverKind::NoArg);
        self.observers().no_arg.push(token, Arc::new(callback));
        token
    }

    /// Runs `callback` on every call, with `None` when the call carries no value.
    pub fn subscribe_any_call(
        &self,
        callback: impl Fn(Option<&Payload<'_>>) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken::issue(ObserverKind::AnyCall);
        self.observers().any_call.push(token, Arc::new(callback));
        token
    }

    /// Zero-argument form of [`subscribe_any_call`](Self::subscribe_any_call).
    pub fn subscribe_any_call_unit(
        &self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionToken {
        self.subscribe_any_call(move |_| callback())
    }

    /// Runs `callback` on every call that carries a value, whatever its type.
    pub fn subscribe_any_value(
        &self,
        callback: impl Fn(&Payload<'_>) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken::issue(ObserverKind::AnyValue);
        self.observers().any_value.push(token, Arc::new(callback));
        token
    }

    /// Zero-argument form of [`subscribe_any_value`](Self::subscribe_any_value).
    pub fn subscribe_any_value_unit(
        &self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionToken {
        self.subscribe_any_value(move |_| callback())
    }

    /// Runs `callback` on every call routed under `tag`.
    pub fn subscribe_tagged(
        &self,
        tag: TypeTag,
        callback: impl Fn(&Payload<'_>) + Send + Sync + 'static,
    ) -> SubscriptionToken {
        let token = SubscriptionToken::issue(ObserverKind::Typed(tag));
        self.observers()
            .typed
            .entry(tag)
            .or_insert_with(ObserverList::new)
            .push(token, Arc::new(callback));
        token
    }

    /// Zero-argument form of [`subscribe_tagged`](Self::subscribe_tagged).
    ///
    /// With [`TypeTag::any()`] the callback runs on calls explicitly routed into the catch-all
    /// bucket, whatever concrete value they carry.
    pub fn subscribe_tagged_unit(
        &self,
        tag: TypeTag,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionToken {
        self.subscribe_tagged(tag, move |_| callback())
    }

    /// Runs `callback` with the value of every call routed under `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wormhole_signal::Signal;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let signal = Signal::new("Score");
    /// let total = Arc::new(AtomicI32::new(0));
    /// let sink = total.clone();
    /// signal.subscribe_typed(move |points: &i32| {
    ///     sink.fetch_add(*points, Ordering::SeqCst);
    /// });
    ///
    /// signal.call_with(10i32);
    /// signal.call_with(2.5f32); // different type, not delivered
    /// assert_eq!(total.load(Ordering::SeqCst), 10);
    /// ```
    pub fn subscribe_typed<T, F>(&self, callback: F) -> SubscriptionToken
    where
        T: Any,
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.subscribe_tagged(TypeTag::of::<T>(), move |payload: &Payload<'_>| {
            match payload.downcast_ref::<T>() {
                Some(value) => callback(value),
                None => warn!(
                    "typed observer for {} skipped: call was routed under {} with a value of \
                     another type",
                    std::any::type_name::<T>(),
                    payload.tag()
                ),
            }
        })
    }

    /// Zero-argument form of [`subscribe_typed`](Self::subscribe_typed): runs `callback` on every
    /// call routed under `T`, ignoring the value.
    pub fn subscribe_typed_unit<T: Any>(
        &self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> SubscriptionToken {
        self.subscribe_tagged_unit(TypeTag::of::<T>(), callback)
    }

    /// Removes the observer `token` was issued for.
    ///
    /// Returns `false` and does nothing if the token is unknown to this signal or was already
    /// unsubscribed.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut observers = self.observers();
        match token.kind() {
            ObserverKind::NoArg => observers.no_arg.remove(token),
            ObserverKind::AnyCall => observers.any_call.remove(token),
            ObserverKind::AnyValue => observers.any_value.remove(token),
            ObserverKind::Typed(tag) => {
                let Some(bucket) = observers.typed.get_mut(&tag) else {
                    return false;
                };
                let removed = bucket.remove(token);
                if bucket.is_empty() {
                    observers.typed.remove(&tag);
                }
                removed
            }
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Call
    // -------------------------------------------------------------------------------------------------

    /// Calls without a value: no-arg observers, then any-call observers with `None`.
    pub fn call(&self) {
        let (no_arg, any_call) = {
            let observers = self.observers();
            (observers.no_arg.snapshot(), observers.any_call.snapshot())
        };

        trace!(
            "signal {}: call() -> {} no-arg, {} any-call",
            self.guid,
            no_arg.len(),
            any_call.len()
        );

        for observer in &no_arg {
            observer();
        }
        for observer in &any_call {
            observer(None);
        }
    }

    /// Calls with `value`, routed under its declared type `T`.
    pub fn call_with<T: Any>(&self, value: T) {
        self.call_tagged(TypeTag::of::<T>(), &value);
    }

    /// Calls with a type-erased value, routed under its concrete runtime type.
    ///
    /// Pass the erased value itself (`boxed.as_ref()`), not a reference to its box: `&boxed`
    /// would be routed under `Box<dyn Any>`.
    pub fn call_any(&self, value: &dyn Any) {
        self.call_tagged(TypeTag::of_val(value), value);
    }

    /// Calls with `value`, routed under `tag`.
    ///
    /// Any-call observers run first, then any-value observers, then the typed bucket for `tag`
    /// if one exists. Buckets match the tag exactly.
    pub fn call_tagged(&self, tag: TypeTag, value: &dyn Any) {
        let (any_call, any_value, typed) = {
            let observers = self.observers();
            (
                observers.any_call.snapshot(),
                observers.any_value.snapshot(),
                observers
                    .typed
                    .get(&tag)
                    .map(ObserverList::snapshot)
                    .unwrap_or_default(),
            )
        };

        trace!(
            "signal {}: call({}) -> {} any-call, {} any-value, {} typed",
            self.guid,
            tag,
            any_call.len(),
            any_value.len(),
            typed.len()
        );

        let payload = Payload::new(value, tag);
        for observer in &any_call {
            observer(Some(&payload));
        }
        for observer in &any_value {
            observer(&payload);
        }
        for observer in &typed {
            observer(&payload);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------------------------------

    /// Number of live subscriptions in one collection.
    pub fn observer_count(&self, kind: ObserverKind) -> usize {
        let observers = self.observers();
        match kind {
            ObserverKind::NoArg => observers.no_arg.len(),
            ObserverKind::AnyCall => observers.any_call.len(),
            ObserverKind::AnyValue => observers.any_value.len(),
            ObserverKind::Typed(tag) => observers.typed.get(&tag).map_or(0, ObserverList::len),
        }
    }

    pub fn has_observers(&self) -> bool {
        let observers = self.observers();
        !observers.no_arg.is_empty()
            || !observers.any_call.is_empty()
            || !observers.any_value.is_empty()
            || !observers.typed.is_empty()
    }

    /// Drops every subscription. Outstanding tokens become no-ops.
    pub fn clear_observers(&self) {
        let mut observers = self.observers();
        observers.no_arg.clear();
        observers.any_call.clear();
        observers.any_value.clear();
        observers.typed.clear();
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("guid", &self.guid)
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
