use std::any::Any;
use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

/// Shared handle to an arbitrary application object. Used both as the
/// payload of [`TaggedValue::Object`] and as the `source` argument handed to
/// subscribers.
pub type ObjectRef = Arc<dyn Any + Send + Sync>;

/// Discriminant of a [`TaggedValue`], for subscribers that only need to know
/// which payload kind arrived.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int8,
    Int,
    Long,
    Float,
    Double,
    Str,
    Pointer,
    Object,
}

/// Payload carried by a single notification: exactly one of the supported
/// kinds.
///
/// Producers normally never build a `TaggedValue` by hand; the typed
/// `dispatch_*` helpers on [`NotificationChannel`](crate::NotificationChannel)
/// wrap the matching variant for them.
#[derive(Clone)]
pub enum TaggedValue {
    Bool(bool),
    Int8(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// UTF-8 text; `None` models a null string.
    Str(Option<String>),
    /// Opaque pointer, forwarded untouched and never dereferenced by the
    /// channel.
    Pointer(*const c_void),
    /// Reference to a shared application object.
    Object(ObjectRef),
}

impl TaggedValue {
    /// Returns the discriminant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            TaggedValue::Bool(_) => ValueKind::Bool,
            TaggedValue::Int8(_) => ValueKind::Int8,
            TaggedValue::Int(_) => ValueKind::Int,
            TaggedValue::Long(_) => ValueKind::Long,
            TaggedValue::Float(_) => ValueKind::Float,
            TaggedValue::Double(_) => ValueKind::Double,
            TaggedValue::Str(_) => ValueKind::Str,
            TaggedValue::Pointer(_) => ValueKind::Pointer,
            TaggedValue::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TaggedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int8(&self) -> Option<i8> {
        match self {
            TaggedValue::Int8(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            TaggedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            TaggedValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            TaggedValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            TaggedValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, or `None` for non-string values and for
    /// the null string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TaggedValue::Str(value) => value.as_deref(),
            _ => None,
        }
    }

    /// Distinguishes `Str(None)` from "not a string at all".
    pub fn is_null_str(&self) -> bool {
        matches!(self, TaggedValue::Str(None))
    }

    pub fn as_pointer(&self) -> Option<*const c_void> {
        match self {
            TaggedValue::Pointer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            TaggedValue::Object(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for TaggedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TaggedValue::Bool(a), TaggedValue::Bool(b)) => a == b,
            (TaggedValue::Int8(a), TaggedValue::Int8(b)) => a == b,
            (TaggedValue::Int(a), TaggedValue::Int(b)) => a == b,
            (TaggedValue::Long(a), TaggedValue::Long(b)) => a == b,
            (TaggedValue::Float(a), TaggedValue::Float(b)) => a == b,
            (TaggedValue::Double(a), TaggedValue::Double(b)) => a == b,
            (TaggedValue::Str(a), TaggedValue::Str(b)) => a == b,
            (TaggedValue::Pointer(a), TaggedValue::Pointer(b)) => std::ptr::eq(*a, *b),
            // Objects compare by identity, matching subscriber semantics.
            (TaggedValue::Object(a), TaggedValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaggedValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            TaggedValue::Int8(value) => f.debug_tuple("Int8").field(value).finish(),
            TaggedValue::Int(value) => f.debug_tuple("Int").field(value).finish(),
            TaggedValue::Long(value) => f.debug_tuple("Long").field(value).finish(),
            TaggedValue::Float(value) => f.debug_tuple("Float").field(value).finish(),
            TaggedValue::Double(value) => f.debug_tuple("Double").field(value).finish(),
            TaggedValue::Str(value) => f.debug_tuple("Str").field(value).finish(),
            TaggedValue::Pointer(value) => f.debug_tuple("Pointer").field(value).finish(),
            TaggedValue::Object(value) => write!(f, "Object({:p})", Arc::as_ptr(value)),
        }
    }
}
