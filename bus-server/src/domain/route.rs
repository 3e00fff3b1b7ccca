//! Route name type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a bus route, as stored in a state's route table.
///
/// Names are only unique within one state's table. The same text may name
/// routes in several states.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteName(String);

impl RouteName {
    /// Wrap a route name read from the store or submitted by the user.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the route name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name begins with `prefix`, ignoring ASCII case.
    ///
    /// This mirrors a case-insensitive `LIKE 'prefix%'` under the default
    /// MySQL collation.
    pub fn starts_with_ignore_ascii_case(&self, prefix: &str) -> bool {
        self.0
            .as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    }
}

impl fmt::Debug for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteName({:?})", self.0)
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
