use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use thiserror::Error;

use crate::value::{ObjectRef, TaggedValue};

/// Error conditions raised by the notification channel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// `notify` was called on a channel nobody listens to. Producers must
    /// register at least one subscriber before dispatching.
    #[error("cannot notify a channel with no subscribers")]
    NoSubscribers,
}

/// Listener capability: anything that wants to receive notifications
/// implements the single `update` method.
pub trait Subscriber: Send + Sync {
    /// Called once per notification, synchronously on the dispatching
    /// thread. `source` is the channel's owner when it is still alive, and
    /// `None` otherwise (never the channel itself).
    fn update(&self, source: Option<&ObjectRef>, value: &TaggedValue);
}

/// One-to-many dispatch of a [`TaggedValue`] to every subscribed listener,
/// on behalf of an optional owning object.
///
/// The channel holds strong references to its subscribers until they are
/// removed, and only a weak back-reference to its owner: a channel never
/// extends its owner's lifetime, and once the owner drops, subscribers see
/// `source = None`.
///
/// Every operation serializes on the channel's own lock. `notify` snapshots
/// the subscriber list and releases the lock before fanning out, so the set
/// of listeners notified is exactly the set subscribed when the call
/// started, and an `update` implementation may re-enter the same channel
/// without deadlocking.
pub struct NotificationChannel {
    owner: Option<Weak<dyn Any + Send + Sync>>,
    subscribers: Mutex<Vec<Arc<dyn Subscriber>>>,
}

impl NotificationChannel {
    /// Creates an empty channel with no owner.
    pub fn new() -> Self {
        Self {
            owner: None,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Creates an empty channel notifying on behalf of `owner`. Only a weak
    /// reference is kept.
    pub fn with_owner<T>(owner: &Arc<T>) -> Self
    where
        T: Any + Send + Sync,
    {
        let weak = Arc::downgrade(owner);
        let weak: Weak<dyn Any + Send + Sync> = weak;
        Self {
            owner: Some(weak),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Returns the owner if it is still alive.
    pub fn owner(&self) -> Option<ObjectRef> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    /// Registers a subscriber, returning `false` if the same subscriber
    /// (by allocation identity) is already present.
    pub fn add_subscriber(&self, subscriber: Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.lock_subscribers();
        if subscribers
            .iter()
            .any(|existing| same_subscriber(existing, &subscriber))
        {
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Removes a subscriber by identity and returns whether it was present.
    pub fn remove_subscriber(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        let mut subscribers = self.lock_subscribers();
        let initial_len = subscribers.len();
        subscribers.retain(|existing| !same_subscriber(existing, subscriber));
        initial_len != subscribers.len()
    }

    /// Releases every subscriber held by the channel.
    pub fn remove_all_subscribers(&self) {
        self.lock_subscribers().clear();
    }

    /// Current number of subscribers.
    pub fn count_subscribers(&self) -> usize {
        self.lock_subscribers().len()
    }

    /// Delivers `value` to every currently-subscribed listener, in
    /// insertion order, before returning.
    pub fn notify(&self, value: &TaggedValue) -> Result<(), NotifyError> {
        let snapshot: Vec<Arc<dyn Subscriber>> = {
            let subscribers = self.lock_subscribers();
            if subscribers.is_empty() {
                return Err(NotifyError::NoSubscribers);
            }
            subscribers.clone()
        };

        let source = self.owner();
        for subscriber in &snapshot {
            subscriber.update(source.as_ref(), value);
        }
        Ok(())
    }

    pub fn dispatch_bool(&self, value: bool) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Bool(value))
    }

    pub fn dispatch_int8(&self, value: i8) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Int8(value))
    }

    pub fn dispatch_int(&self, value: i32) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Int(value))
    }

    pub fn dispatch_long(&self, value: i64) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Long(value))
    }

    pub fn dispatch_float(&self, value: f32) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Float(value))
    }

    pub fn dispatch_double(&self, value: f64) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Double(value))
    }

    pub fn dispatch_string(&self, value: Option<&str>) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Str(value.map(str::to_owned)))
    }

    pub fn dispatch_pointer(&self, value: *const c_void) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Pointer(value))
    }

    pub fn dispatch_object(&self, value: ObjectRef) -> Result<(), NotifyError> {
        self.notify(&TaggedValue::Object(value))
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<Arc<dyn Subscriber>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationChannel")
            .field("has_owner", &self.owner.is_some())
            .field("subscribers", &self.count_subscribers())
            .finish()
    }
}

/// Identity comparison on the underlying allocation, ignoring vtables.
fn same_subscriber(a: &Arc<dyn Subscriber>, b: &Arc<dyn Subscriber>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
