use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Name of a node; also the source/destination of a message.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(Arc<str>);

impl Address {
    pub fn new(name: &str) -> Self {
        Address(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(name: &str) -> Self {
        Address::new(name)
    }
}

impl From<String> for Address {
    fn from(name: String) -> Self {
        Address(Arc::from(name))
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Address {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Address {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Upcast to `Any` for every `'static` type, so trait objects can be
/// downcast back to their protocol-specific variant.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A packet in flight between two addresses.
///
/// Messages are immutable once sent. `hash_code` must agree with `equals`:
/// equal messages hash to the same value.
pub trait Message: AsAny + fmt::Debug + Send + Sync {
    fn from(&self) -> &Address;

    fn to(&self) -> &Address;

    fn hash_code(&self) -> u64;

    fn equals(&self, other: &dyn Message) -> bool;
}

impl dyn Message {
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Message>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn is_local(&self) -> bool {
        self.from() == self.to()
    }
}

/// Source/destination pair to embed in concrete message types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    from: Address,
    to: Address,
}

impl MessageHeader {
    pub fn new(from: impl Into<Address>, to: impl Into<Address>) -> Self {
        MessageHeader {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &Address {
        &self.from
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    /// Header for a reply travelling the opposite way.
    pub fn reversed(&self) -> Self {
        MessageHeader {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }
}
