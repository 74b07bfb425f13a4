use super::message::{Address, Message};
use super::timer::Timer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Label of the edge from a parent state to a child state.
#[derive(Debug, Clone, Default)]
pub enum Event {
    #[default]
    Empty,
    UnknownDestination(Arc<dyn Message>),
    Partition(Arc<dyn Message>),
    DropOff(Arc<dyn Message>),
    Handle(Arc<dyn Message>),
    HandleDuplicate(Arc<dyn Message>),
    Trigger {
        address: Address,
        timer: Arc<dyn Timer>,
    },
}

/// Payload-free discriminant of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Empty,
    UnknownDestination,
    Partition,
    DropOff,
    Handle,
    HandleDuplicate,
    Trigger,
}

impl EventKind {
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Empty => "empty",
            EventKind::UnknownDestination => "unknown destination",
            EventKind::Partition => "partition",
            EventKind::DropOff => "drop off",
            EventKind::Handle => "handle",
            EventKind::HandleDuplicate => "handle duplicate",
            EventKind::Trigger => "trigger",
        }
    }

    /// Whether a protocol handler ran for this kind of event.
    pub fn invokes_handler(&self) -> bool {
        matches!(
            self,
            EventKind::Handle | EventKind::HandleDuplicate | EventKind::Trigger
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Event {
    pub fn trigger(address: Address, timer: &dyn Timer) -> Self {
        Event::Trigger {
            address,
            timer: Arc::from(timer.clone_box()),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Empty => EventKind::Empty,
            Event::UnknownDestination(_) => EventKind::UnknownDestination,
            Event::Partition(_) => EventKind::Partition,
            Event::DropOff(_) => EventKind::DropOff,
            Event::Handle(_) => EventKind::Handle,
            Event::HandleDuplicate(_) => EventKind::HandleDuplicate,
            Event::Trigger { .. } => EventKind::Trigger,
        }
    }

    /// The message involved, for every message-related event.
    pub fn message(&self) -> Option<&Arc<dyn Message>> {
        match self {
            Event::UnknownDestination(m)
            | Event::Partition(m)
            | Event::DropOff(m)
            | Event::Handle(m)
            | Event::HandleDuplicate(m) => Some(m),
            Event::Empty | Event::Trigger { .. } => None,
        }
    }

    pub fn timer(&self) -> Option<(&Address, &dyn Timer)> {
        match self {
            Event::Trigger { address, timer } => Some((address, timer.as_ref())),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Empty => write!(f, "{}", self.kind()),
            Event::Trigger { address, timer } => {
                write!(f, "{} {} {:?}", self.kind(), address, timer)
            }
            other => match other.message() {
                Some(m) => write!(f, "{} {:?}", other.kind(), m),
                None => write!(f, "{}", other.kind()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(EventKind::DropOff.to_string(), "drop off");
        assert_eq!(EventKind::HandleDuplicate.to_string(), "handle duplicate");
        assert_eq!(EventKind::UnknownDestination.label(), "unknown destination");
        assert_eq!(Event::default().kind(), EventKind::Empty);
    }

    #[test]
    fn test_handler_kinds() {
        assert!(EventKind::Handle.invokes_handler());
        assert!(EventKind::Trigger.invokes_handler());
        assert!(!EventKind::Partition.invokes_handler());
        assert!(!EventKind::DropOff.invokes_handler());
    }
}
