//! Subscription tokens and the ordered observer lists they index into.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::TypeTag;

/// Process-wide source of token ids, so tokens never collide across signals.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// The observer collection a subscription lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObserverKind {
    /// Zero-argument observers, run by `call()` only.
    NoArg,
    /// Observers run by every call; they see `None` for no-argument calls.
    AnyCall,
    /// Observers run by every call that carries a value.
    AnyValue,
    /// Observers run when a call is routed under this exact tag.
    Typed(TypeTag),
}

impl fmt::Display for ObserverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObserverKind::NoArg => write!(f, "no-arg"),
            ObserverKind::AnyCall => write!(f, "any-call"),
            ObserverKind::AnyValue => write!(f, "any-value"),
            ObserverKind::Typed(tag) => write!(f, "typed({tag})"),
        }
    }
}

/// Handle returned by every subscribe call; pass it to `Signal::unsubscribe`.
///
/// Each subscribe issues a new token, even for the same callback, so one token always stands
/// for exactly one invocation per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken {
    id: u64,
    kind: ObserverKind,
}

impl SubscriptionToken {
    pub(crate) fn issue(kind: ObserverKind) -> Self {
        Self {
            id: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            kind,
        }
    }

    pub fn kind(&self) -> ObserverKind {
        self.kind
    }
}

impl fmt::Display for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.id, self.kind)
    }
}

/// Ordered multiset of observers keyed by the token that added them.
pub(crate) struct ObserverList<F: ?Sized> {
    entries: Vec<(SubscriptionToken, Arc<F>)>,
}

impl<F: ?Sized> ObserverList<F> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, token: SubscriptionToken, observer: Arc<F>) {
        self.entries.push((token, observer));
    }

    /// Removes the entry added under `token`. Unknown tokens are ignored.
    pub(crate) fn remove(&mut self, token: SubscriptionToken) -> bool {
        match self.entries.iter().position(|(t, _)| *t == token) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Copies the observers out in subscription order, so they can run without the lock held.
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries.iter().map(|(_, f)| Arc::clone(f)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
