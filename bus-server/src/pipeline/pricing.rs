//! Seat availability and price quotes.
//!
//! The price per seat is the plain mean of the filtered offerings' prices.
//! It is not weighted by how many seats each offering holds.

use serde::Serialize;

use crate::domain::Offering;

/// Why a quote could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// The filtered offerings hold no seats at all
    #[error("no seats available for the selected filters")]
    NoAvailability,

    /// The requested seat count is outside `1..=available`
    #[error("{requested} seats requested; choose between 1 and {available}")]
    SeatsOutOfRange { requested: u32, available: u64 },
}

/// Seats and average price across a set of filtered offerings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Availability {
    /// Sum of `seats_available` over the filtered offerings.
    pub total_seats: u64,

    /// Unweighted mean price of the filtered offerings.
    pub price_per_seat: f64,

    /// Number of offerings summarised.
    pub offering_count: usize,
}

impl Availability {
    /// Summarise the filtered offerings.
    ///
    /// Fails with [`QuoteError::NoAvailability`] when they hold no seats,
    /// which includes the empty set; no mean is computed in that case.
    pub fn summarize(filtered: &[Offering]) -> Result<Self, QuoteError> {
        let total_seats: u64 = filtered.iter().map(|o| u64::from(o.seats_available)).sum();
        if total_seats == 0 {
            return Err(QuoteError::NoAvailability);
        }

        let price_sum: f64 = filtered.iter().map(|o| o.price).sum();
        let price_per_seat = price_sum / filtered.len() as f64;

        Ok(Self {
            total_seats,
            price_per_seat,
            offering_count: filtered.len(),
        })
    }

    /// Price `seats_requested` seats.
    pub fn quote(&self, seats_requested: u32) -> Result<BookingQuote, QuoteError> {
        if seats_requested == 0 || u64::from(seats_requested) > self.total_seats {
            return Err(QuoteError::SeatsOutOfRange {
                requested: seats_requested,
                available: self.total_seats,
            });
        }

        Ok(BookingQuote {
            seats_requested,
            price_per_seat: self.price_per_seat,
            total_price: round_to_paise(f64::from(seats_requested) * self.price_per_seat),
            total_available: self.total_seats,
        })
    }
}

/// A computed price for a number of seats. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BookingQuote {
    pub seats_requested: u32,

    /// Unrounded mean price.
    pub price_per_seat: f64,

    /// `seats_requested * price_per_seat`, rounded to two decimals.
    pub total_price: f64,

    pub total_available: u64,
}

impl BookingQuote {
    /// Confirmation text shown after a booking.
    pub fn confirmation(&self, route: &str) -> String {
        format!(
            "Successfully booked {} seats for {} at {}!",
            self.seats_requested,
            route,
            format_rupees(self.total_price)
        )
    }
}

/// Quote `seats_requested` seats across the filtered offerings.
///
/// # Examples
///
/// ```
/// use bus_server::domain::{BusType, Offering, Rating, RouteName};
/// use bus_server::pipeline::compute_quote;
///
/// let offering = |price: f64, seats: u32, rating: f64| Offering {
///     route_name: RouteName::new("Kochi to Bangalore"),
///     bus_name: "KSRTC".into(),
///     bus_type: BusType::new("AC").unwrap(),
///     rating: Rating::new(rating).unwrap(),
///     price,
///     seats_available: seats,
///     departing_time: None,
///     duration: None,
///     reaching_time: None,
/// };
///
/// let filtered = [offering(500.0, 10, 4.0), offering(700.0, 5, 5.0)];
/// let quote = compute_quote(&filtered, 3).unwrap();
///
/// assert_eq!(quote.price_per_seat, 600.0);
/// assert_eq!(quote.total_price, 1800.0);
/// assert_eq!(quote.total_available, 15);
/// ```
pub fn compute_quote(
    filtered: &[Offering],
    seats_requested: u32,
) -> Result<BookingQuote, QuoteError> {
    Availability::summarize(filtered)?.quote(seats_requested)
}

/// Round a rupee amount to two decimal places.
pub fn round_to_paise(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Format a rupee amount for display, e.g. `₹1800.00`.
pub fn format_rupees(amount: f64) -> String {
    format!("₹{amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BusType, Rating, RouteName};

    fn offering(price: f64, seats: u32) -> Offering {
        Offering {
            route_name: RouteName::new("Kochi to Bangalore"),
            bus_name: "KSRTC".into(),
            bus_type: BusType::new("AC").unwrap(),
            rating: Rating::new(4.0).unwrap(),
            price,
            seats_available: seats,
            departing_time: None,
            duration: None,
            reaching_time: None,
        }
    }

    #[test]
    fn mean_price_is_unweighted() {
        // 10 seats at 500 and 5 at 700 still average to 600
        let filtered = [offering(500.0, 10), offering(700.0, 5)];
        let availability = Availability::summarize(&filtered).unwrap();

        assert_eq!(availability.total_seats, 15);
        assert_eq!(availability.price_per_seat, 600.0);
        assert_eq!(availability.offering_count, 2);
    }

    #[test]
    fn sold_out_offerings_still_count_towards_mean() {
        let filtered = [offering(500.0, 0), offering(700.0, 4)];
        let quote = compute_quote(&filtered, 2).unwrap();

        assert_eq!(quote.price_per_seat, 600.0);
        assert_eq!(quote.total_price, 1200.0);
        assert_eq!(quote.total_available, 4);
    }

    #[test]
    fn no_seats_is_no_availability() {
        let filtered = [offering(500.0, 0), offering(700.0, 0)];
        assert_eq!(
            compute_quote(&filtered, 1),
            Err(QuoteError::NoAvailability)
        );
    }

    #[test]
    fn empty_set_is_no_availability() {
        assert_eq!(
            Availability::summarize(&[]),
            Err(QuoteError::NoAvailability)
        );
    }

    #[test]
    fn seat_count_bounds() {
        let filtered = [offering(500.0, 10), offering(700.0, 5)];

        assert_eq!(
            compute_quote(&filtered, 0),
            Err(QuoteError::SeatsOutOfRange {
                requested: 0,
                available: 15
            })
        );
        assert_eq!(
            compute_quote(&filtered, 16),
            Err(QuoteError::SeatsOutOfRange {
                requested: 16,
                available: 15
            })
        );
        assert!(compute_quote(&filtered, 1).is_ok());
        assert!(compute_quote(&filtered, 15).is_ok());
    }

    #[test]
    fn total_rounded_to_two_places() {
        let filtered = [offering(100.0, 5), offering(100.0, 5), offering(101.0, 5)];
        // mean = 100.333..., 3 seats = 301.0 after rounding
        let quote = compute_quote(&filtered, 3).unwrap();
        assert_eq!(quote.total_price, 301.0);

        // 1 seat = 100.33
        let quote = compute_quote(&filtered, 1).unwrap();
        assert_eq!(quote.total_price, 100.33);
    }

    #[test]
    fn rupee_formatting() {
        assert_eq!(format_rupees(1800.0), "₹1800.00");
        assert_eq!(format_rupees(100.333), "₹100.33");
        assert_eq!(format_rupees(0.5), "₹0.50");
    }

    #[test]
    fn confirmation_message() {
        let filtered = [offering(500.0, 10), offering(700.0, 5)];
        let quote = compute_quote(&filtered, 3).unwrap();
        assert_eq!(
            quote.confirmation("Kochi to Bangalore"),
            "Successfully booked 3 seats for Kochi to Bangalore at ₹1800.00!"
        );
    }

    #[test]
    fn error_display() {
        assert_eq!(
            QuoteError::NoAvailability.to_string(),
            "no seats available for the selected filters"
        );
        assert_eq!(
            QuoteError::SeatsOutOfRange {
                requested: 20,
                available: 15
            }
            .to_string(),
            "20 seats requested; choose between 1 and 15"
        );
    }
}
