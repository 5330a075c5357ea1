use std::fmt;

#[cfg(test)]
use mockall::automock;

/// One caller's registration of a `(key, value)` pair.
///
/// Only equality is meaningful; handles carry no ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    pub fn new(id: impl Into<String>) -> Self {
        Handle(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of globally unique handles
#[cfg_attr(test, automock)]
pub trait HandleGenerator: Send + Sync + 'static {
    fn next_handle(&self) -> Handle;
}

/// Default generator backed by random nanoid strings
#[derive(Debug, Default, Clone, Copy)]
pub struct NanoidHandleGenerator;

impl HandleGenerator for NanoidHandleGenerator {
    fn next_handle(&self) -> Handle {
        Handle(nanoid::nanoid!())
    }
}
