use std::any::Any;
use std::fmt;

use crate::model::EventName;

/// An event delivered to a `step` call.
///
/// `payload` is opaque to the engine: it is passed through to actions and
/// conditions unchanged (§3.1). Actions/conditions that know the concrete
/// payload type for a given event name can recover it with
/// [`Event::payload_ref`].
pub struct Event {
    pub name: EventName,
    pub payload: Option<Box<dyn Any + Send + Sync>>,
}

impl Event {
    /// An event with no payload.
    pub fn new(name: impl Into<EventName>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// An event carrying an opaque payload.
    pub fn with_payload(name: impl Into<EventName>, payload: impl Any + Send + Sync) -> Self {
        Self {
            name: name.into(),
            payload: Some(Box::new(payload)),
        }
    }

    /// Downcast the payload to `T`, if present and of that type.
    pub fn payload_ref<T: Any>(&self) -> Option<&T> {
        self.payload.as_deref().and_then(|p| p.downcast_ref::<T>())
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.name)
            .field("payload", &self.payload.as_ref().map(|_| ".."))
            .finish()
    }
}

