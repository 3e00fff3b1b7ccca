//! Bookable offerings and the attributes they are filtered on.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::RouteName;

/// Error returned when a rating is not a finite, non-negative number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid rating: {reason}")]
pub struct InvalidRating {
    reason: &'static str,
}

/// A passenger rating attached to an offering.
///
/// Ratings are finite and non-negative, which gives them total equality and
/// ordering, so they can be held in sets and compared by membership.
///
/// # Examples
///
/// ```
/// use bus_server::domain::Rating;
///
/// let r: Rating = "4.2".parse().unwrap();
/// assert_eq!(r.value(), 4.2);
/// assert_eq!(r.to_string(), "4.2");
///
/// assert!(Rating::new(f64::NAN).is_err());
/// assert!(Rating::new(-1.0).is_err());
/// ```
#[derive(Clone, Copy)]
pub struct Rating(f64);

impl Rating {
    /// Create a rating, rejecting NaN, infinities and negative values.
    pub fn new(value: f64) -> Result<Self, InvalidRating> {
        if !value.is_finite() {
            return Err(InvalidRating {
                reason: "must be a finite number",
            });
        }
        if value < 0.0 {
            return Err(InvalidRating {
                reason: "must not be negative",
            });
        }
        // -0.0 and 0.0 must compare and hash identically
        Ok(Rating(if value == 0.0 { 0.0 } else { value }))
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for Rating {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for Rating {}

impl Hash for Rating {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for Rating {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rating {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl FromStr for Rating {
    type Err = InvalidRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| InvalidRating {
            reason: "not a number",
        })?;
        Rating::new(value)
    }
}

impl fmt::Debug for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rating({})", self.0)
    }
}

/// Shortest decimal form that parses back to the same value.
impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.0)
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Rating::new(value).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a bus type label is empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bus type must not be empty")]
pub struct InvalidBusType;

/// Bus type label, e.g. "A/C Sleeper (2+1)".
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BusType(String);

impl BusType {
    /// Create a bus type from a non-blank label.
    pub fn new(label: impl Into<String>) -> Result<Self, InvalidBusType> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(InvalidBusType);
        }
        Ok(Self(label))
    }

    /// Returns the label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BusType({:?})", self.0)
    }
}

impl fmt::Display for BusType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BusType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        BusType::new(label).map_err(serde::de::Error::custom)
    }
}

/// One bookable service on a route: an operator running a bus type.
///
/// Offerings are read-only snapshots of store rows. Booking never changes
/// `seats_available`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    pub route_name: RouteName,

    /// Operator name.
    pub bus_name: String,

    pub bus_type: BusType,

    pub rating: Rating,

    /// Fare per seat in rupees.
    pub price: f64,

    pub seats_available: u32,

    #[serde(default)]
    pub departing_time: Option<String>,

    #[serde(default)]
    pub duration: Option<String>,

    #[serde(default)]
    pub reaching_time: Option<String>,
}
