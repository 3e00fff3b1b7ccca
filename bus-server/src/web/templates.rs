//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Offering, State};
use crate::pipeline::{Availability, BookingQuote, BookingView, Notice, Selection, format_rupees};

use super::dto::BookingResponse;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Booking page: every stage of the pipeline that ran for this request.
#[derive(Template)]
#[template(path = "booking.html")]
pub struct BookingTemplate {
    pub states: Vec<StateOption>,

    /// Prefix exactly as typed
    pub prefix: String,

    pub routes: Vec<RouteOption>,
    pub route: Option<String>,
    pub offerings: Vec<OfferingView>,
    pub rating_options: Vec<FilterOption>,
    pub bus_type_options: Vec<FilterOption>,
    pub filtered: Option<Vec<OfferingView>>,
    pub availability: Option<AvailabilityView>,

    /// Seat input value
    pub seats: String,

    pub quote: Option<QuoteView>,
    pub notice: Option<NoticeView>,
}

impl BookingTemplate {
    /// Build the page from a pipeline result and the selection that produced it.
    pub fn new(view: &BookingView, selection: &Selection) -> Self {
        let selected_route = view.route.as_ref().map(|r| r.as_str());

        Self {
            states: State::ALL
                .into_iter()
                .map(|s| StateOption::new(s, s == view.state))
                .collect(),
            prefix: selection.prefix.clone(),
            routes: view
                .routes
                .iter()
                .map(|r| RouteOption {
                    name: r.to_string(),
                    selected: Some(r.as_str()) == selected_route,
                })
                .collect(),
            route: selected_route.map(str::to_string),
            offerings: view.offerings.iter().map(OfferingView::from).collect(),
            rating_options: view
                .rating_options
                .iter()
                .map(|r| FilterOption {
                    value: r.to_string(),
                    selected: view.filter.ratings.contains(r),
                })
                .collect(),
            bus_type_options: view
                .bus_type_options
                .iter()
                .map(|t| FilterOption {
                    value: t.to_string(),
                    selected: view.filter.bus_types.contains(t),
                })
                .collect(),
            filtered: view
                .filtered
                .as_ref()
                .map(|rows| rows.iter().map(OfferingView::from).collect()),
            availability: view.availability.as_ref().map(AvailabilityView::from),
            seats: selection.seats.unwrap_or(1).to_string(),
            quote: view.quote.as_ref().map(QuoteView::from),
            notice: view.notice.as_ref().map(NoticeView::from),
        }
    }
}

/// Booking acknowledgment page.
#[derive(Template)]
#[template(path = "booking_confirmed.html")]
pub struct BookingConfirmedTemplate {
    pub message: String,
    pub route: String,
    pub seats: u32,
    pub price_per_seat: String,
    pub total_price: String,
    pub booked_at: String,
}

impl From<&BookingResponse> for BookingConfirmedTemplate {
    fn from(b: &BookingResponse) -> Self {
        Self {
            message: b.message.clone(),
            route: b.route.to_string(),
            seats: b.seats,
            price_per_seat: format_rupees(b.price_per_seat),
            total_price: format_rupees(b.total_price),
            booked_at: b.booked_at.clone(),
        }
    }
}

/// Terms and conditions page.
#[derive(Template)]
#[template(path = "terms.html")]
pub struct TermsTemplate;

/// Frequently asked questions page.
#[derive(Template)]
#[template(path = "faq.html")]
pub struct FaqTemplate;

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// An entry in the state select.
#[derive(Debug, Clone)]
pub struct StateOption {
    pub id: &'static str,
    pub name: &'static str,
    pub selected: bool,
}

impl StateOption {
    fn new(state: State, selected: bool) -> Self {
        Self {
            id: state.as_str(),
            name: state.display_name(),
            selected,
        }
    }
}

/// A route radio button.
#[derive(Debug, Clone)]
pub struct RouteOption {
    pub name: String,
    pub selected: bool,
}

/// A rating or bus type checkbox.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub selected: bool,
}

/// One row of an offerings table.
#[derive(Debug, Clone)]
pub struct OfferingView {
    pub bus_name: String,
    pub bus_type: String,
    pub rating: String,
    pub price: String,
    pub seats_available: u32,
    pub departing_time: String,
    pub duration: String,
    pub reaching_time: String,
}

impl From<&Offering> for OfferingView {
    fn from(o: &Offering) -> Self {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
        Self {
            bus_name: o.bus_name.clone(),
            bus_type: o.bus_type.to_string(),
            rating: o.rating.to_string(),
            price: format_rupees(o.price),
            seats_available: o.seats_available,
            departing_time: or_dash(&o.departing_time),
            duration: or_dash(&o.duration),
            reaching_time: or_dash(&o.reaching_time),
        }
    }
}

/// Seats and mean price of the filtered offerings.
#[derive(Debug, Clone)]
pub struct AvailabilityView {
    pub total_seats: u64,
    pub price_per_seat: String,
    pub offering_count: usize,
}

impl From<&Availability> for AvailabilityView {
    fn from(a: &Availability) -> Self {
        Self {
            total_seats: a.total_seats,
            price_per_seat: format_rupees(a.price_per_seat),
            offering_count: a.offering_count,
        }
    }
}

/// A priced seat request.
#[derive(Debug, Clone)]
pub struct QuoteView {
    pub seats: u32,
    pub price_per_seat: String,
    pub total_price: String,
}

impl From<&BookingQuote> for QuoteView {
    fn from(q: &BookingQuote) -> Self {
        Self {
            seats: q.seats_requested,
            price_per_seat: format_rupees(q.price_per_seat),
            total_price: format_rupees(q.total_price),
        }
    }
}

/// An informational message in place of later stages.
#[derive(Debug, Clone)]
pub struct NoticeView {
    pub message: String,
    pub is_warning: bool,
}

impl From<&Notice> for NoticeView {
    fn from(n: &Notice) -> Self {
        Self {
            message: n.message(),
            is_warning: n.is_warning(),
        }
    }
}
