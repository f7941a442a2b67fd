//! Change-notification primitive shared across RustLexica components.
//!
//! Model objects (settings, dictionary sources, lookup controllers) own a
//! [`NotificationChannel`] and push a [`TaggedValue`] to every registered
//! [`Subscriber`] whenever an observable property changes. Subscribers are
//! typically UI adapters that translate `update` calls into widget refreshes;
//! the channel makes no assumption about what a subscriber does with the
//! payload. Fan-out is synchronous: `notify` returns only after every
//! subscriber has run on the calling thread.

pub mod channel;
pub mod value;

pub use channel::{NotificationChannel, NotifyError, Subscriber};
pub use value::{ObjectRef, TaggedValue, ValueKind};
