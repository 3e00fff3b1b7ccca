//! State route-table selector.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an unknown state identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state: {given:?}")]
pub struct InvalidState {
    given: String,
}

impl InvalidState {
    /// The rejected input.
    pub fn given(&self) -> &str {
        &self.given
    }
}

/// One of the ten states that have a route table in the store.
///
/// Each variant maps to a fixed table identifier, so user input never
/// reaches identifier position in a query.
///
/// # Examples
///
/// ```
/// use bus_server::domain::State;
///
/// let kerala = State::parse("kerala").unwrap();
/// assert_eq!(kerala.table_name(), "kerala_routes");
///
/// // Identifiers are case-sensitive
/// assert!(State::parse("Kerala").is_err());
///
/// // Anything outside the enumeration is rejected
/// assert!(State::parse("kerala_routes; DROP TABLE x").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    #[default]
    Kerala,
    Andhra,
    Telangana,
    Kadamba,
    Rajasthan,
    SouthBengal,
    Haryana,
    Assam,
    UttarPradesh,
    WestBengal,
}

impl State {
    /// All states, in the order they are offered to the user.
    pub const ALL: [State; 10] = [
        State::Kerala,
        State::Andhra,
        State::Telangana,
        State::Kadamba,
        State::Rajasthan,
        State::SouthBengal,
        State::Haryana,
        State::Assam,
        State::UttarPradesh,
        State::WestBengal,
    ];

    /// Parse a state from its lowercase identifier.
    pub fn parse(s: &str) -> Result<Self, InvalidState> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| InvalidState { given: s.to_string() })
    }

    /// The lowercase identifier, as used in forms and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Kerala => "kerala",
            State::Andhra => "andhra",
            State::Telangana => "telangana",
            State::Kadamba => "kadamba",
            State::Rajasthan => "rajasthan",
            State::SouthBengal => "southbengal",
            State::Haryana => "haryana",
            State::Assam => "assam",
            State::UttarPradesh => "uttarpradesh",
            State::WestBengal => "westbengal",
        }
    }

    /// The route table holding this state's route names.
    pub fn table_name(&self) -> &'static str {
        match self {
            State::Kerala => "kerala_routes",
            State::Andhra => "andhra_routes",
            State::Telangana => "telangana_routes",
            State::Kadamba => "kadamba_routes",
            State::Rajasthan => "rajasthan_routes",
            State::SouthBengal => "southbengal_routes",
            State::Haryana => "haryana_routes",
            State::Assam => "assam_routes",
            State::UttarPradesh => "uttarpradesh_routes",
            State::WestBengal => "westbengal_routes",
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            State::Kerala => "Kerala",
            State::Andhra => "Andhra Pradesh",
            State::Telangana => "Telangana",
            State::Kadamba => "Kadamba (Goa)",
            State::Rajasthan => "Rajasthan",
            State::SouthBengal => "South Bengal",
            State::Haryana => "Haryana",
            State::Assam => "Assam",
            State::UttarPradesh => "Uttar Pradesh",
            State::WestBengal => "West Bengal",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for State {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
