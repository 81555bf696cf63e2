//! Scoped host listeners
//!
//! While the dropdown is open the widget needs two host subscriptions:
//! pointer-down events outside the widget (to close it) and scroll events
//! from the list container (the direct scroll path). Each subscription is held
//! by a [`ListenerGuard`] that unsubscribes on drop, so releasing a
//! [`ListenerScope`] or dropping the controller always detaches everything.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use smallvec::SmallVec;

/// Host event a listener is attached to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer pressed outside the widget container
    PointerDownOutside,
    /// Scroll on the dropdown list container
    ListScroll,
}

/// Subscription id handed out by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// What the controller needs from the embedding UI
pub trait WidgetHost: Send + Sync + 'static {
    fn subscribe(&self, kind: ListenerKind) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId);

    /// Move keyboard focus to the text input
    fn focus_input(&self);
}

/// Host that ignores subscriptions and focus requests
#[derive(Debug, Default)]
pub struct DetachedHost {
    next: AtomicU64,
}

impl WidgetHost for DetachedHost {
    fn subscribe(&self, _kind: ListenerKind) -> ListenerId {
        ListenerId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    fn unsubscribe(&self, _id: ListenerId) {}

    fn focus_input(&self) {}
}

/// One live subscription; unsubscribes when dropped
pub struct ListenerGuard {
    host: Arc<dyn WidgetHost>,
    kind: ListenerKind,
    id: ListenerId,
}

impl ListenerGuard {
    pub fn new(host: Arc<dyn WidgetHost>, kind: ListenerKind) -> Self {
        let id = host.subscribe(kind);
        tracing::trace!("Subscribed {:?} as {:?}", kind, id);
        Self { host, kind, id }
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        tracing::trace!("Unsubscribing {:?} ({:?})", self.kind, self.id);
        self.host.unsubscribe(self.id);
    }
}

impl fmt::Debug for ListenerGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerGuard")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .finish()
    }
}

/// The set of subscriptions held while the dropdown is open
#[derive(Debug, Default)]
pub struct ListenerScope {
    guards: SmallVec<[ListenerGuard; 2]>,
}

impl ListenerScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `kind` unless already subscribed
    pub fn attach(&mut self, host: &Arc<dyn WidgetHost>, kind: ListenerKind) {
        if self.is_attached(kind) {
            return;
        }
        self.guards.push(ListenerGuard::new(Arc::clone(host), kind));
    }

    pub fn is_attached(&self, kind: ListenerKind) -> bool {
        self.guards.iter().any(|g| g.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Drop every subscription
    pub fn release(&mut self) {
        self.guards.clear();
    }
}
