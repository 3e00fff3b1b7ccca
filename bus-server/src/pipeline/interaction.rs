//! One user interaction, from selections to a rendered view.

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::domain::{BusType, Offering, Rating, RouteName, State};
use crate::store::StoreSession;

use super::error::PipelineError;
use super::filter::{FilterSelection, distinct_bus_types, distinct_ratings, filter_offerings};
use super::lookup::{load_offerings, normalize_prefix, resolve_routes};
use super::pricing::{Availability, BookingQuote, QuoteError};

/// Prefix used when the user has not typed one.
pub const DEFAULT_PREFIX: &str = "A";

/// Everything the user has chosen so far, held for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub state: State,

    /// Prefix as typed; normalised before use.
    pub prefix: String,

    /// Chosen route. Falls back to the first resolved route when absent
    /// or no longer offered.
    pub route: Option<RouteName>,

    pub filter: FilterSelection,

    /// Requested seat count; no quote is computed without one.
    pub seats: Option<u32>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            state: State::default(),
            prefix: DEFAULT_PREFIX.to_string(),
            route: None,
            filter: FilterSelection::default(),
            seats: None,
        }
    }
}

/// Informational outcome shown instead of later pipeline stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    NoRoutesFound,
    NoOfferingsFound { route: RouteName },
    NoAvailability,
    SeatsOutOfRange { requested: u32, available: u64 },
}

impl Notice {
    /// Text shown to the user.
    pub fn message(&self) -> String {
        match self {
            Notice::NoRoutesFound => {
                "No routes found starting with the specified letter.".to_string()
            }
            Notice::NoOfferingsFound { route } => format!("No data found for Route: {route}."),
            Notice::NoAvailability => "No seats available for the selected filters.".to_string(),
            Notice::SeatsOutOfRange {
                requested,
                available,
            } => format!("Cannot book {requested} seats; choose between 1 and {available}."),
        }
    }

    /// Whether the notice should be styled as a warning.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Notice::NoAvailability | Notice::SeatsOutOfRange { .. }
        )
    }
}

impl From<QuoteError> for Notice {
    fn from(e: QuoteError) -> Self {
        match e {
            QuoteError::NoAvailability => Notice::NoAvailability,
            QuoteError::SeatsOutOfRange {
                requested,
                available,
            } => Notice::SeatsOutOfRange {
                requested,
                available,
            },
        }
    }
}

impl Serialize for Notice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.message())
    }
}

/// Result of running the pipeline for one interaction.
///
/// Stages that did not run are left empty or `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BookingView {
    pub state: State,

    /// Normalised prefix, if one was given.
    pub prefix: Option<String>,

    pub routes: Vec<RouteName>,
    pub route: Option<RouteName>,
    pub offerings: Vec<Offering>,

    /// Filter choices offered, in order of first appearance.
    pub rating_options: Vec<Rating>,
    pub bus_type_options: Vec<BusType>,

    pub filter: FilterSelection,

    /// Present once both filter sets are non-empty.
    pub filtered: Option<Vec<Offering>>,

    pub availability: Option<Availability>,
    pub quote: Option<BookingQuote>,
    pub notice: Option<Notice>,
}

/// Run every pipeline stage for `selection` over one store session.
///
/// Empty results and missing seats are reported through
/// [`BookingView::notice`]; only store failures and unknown states are errors.
pub async fn run_interaction(
    session: &mut dyn StoreSession,
    selection: &Selection,
) -> Result<BookingView, PipelineError> {
    let mut view = BookingView {
        state: selection.state,
        filter: selection.filter.clone(),
        ..BookingView::default()
    };

    let Some(prefix) = normalize_prefix(&selection.prefix) else {
        return Ok(view);
    };
    view.routes = resolve_routes(session, selection.state, &prefix).await?;
    view.prefix = Some(prefix);

    let route = selection
        .route
        .as_ref()
        .filter(|r| view.routes.contains(r))
        .or_else(|| view.routes.first())
        .cloned();
    let Some(route) = route else {
        view.notice = Some(Notice::NoRoutesFound);
        return Ok(view);
    };

    view.offerings = load_offerings(session, &route).await?;
    view.route = Some(route.clone());
    if view.offerings.is_empty() {
        view.notice = Some(Notice::NoOfferingsFound { route });
        return Ok(view);
    }

    view.rating_options = distinct_ratings(&view.offerings);
    view.bus_type_options = distinct_bus_types(&view.offerings);

    if !selection.filter.is_complete() {
        return Ok(view);
    }

    let filtered = filter_offerings(&view.offerings, &selection.filter);
    debug!(
        route = route.as_str(),
        kept = filtered.len(),
        of = view.offerings.len(),
        "filtered offerings"
    );
    let availability = Availability::summarize(&filtered);
    view.filtered = Some(filtered);

    let availability = match availability {
        Ok(a) => a,
        Err(e) => {
            view.notice = Some(e.into());
            return Ok(view);
        }
    };
    view.availability = Some(availability);

    if let Some(seats) = selection.seats {
        match availability.quote(seats) {
            Ok(quote) => view.quote = Some(quote),
            Err(e) => view.notice = Some(e.into()),
        }
    }

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryRouteStore, RouteStore};

    fn offering(bus: &str, kind: &str, rating: f64, price: f64, seats: u32) -> Offering {
        Offering {
            route_name: RouteName::new("Kochi to Bangalore"),
            bus_name: bus.to_string(),
            bus_type: BusType::new(kind).unwrap(),
            rating: Rating::new(rating).unwrap(),
            price,
            seats_available: seats,
            departing_time: None,
            duration: None,
            reaching_time: None,
        }
    }

    fn store() -> MemoryRouteStore {
        MemoryRouteStore::new()
            .with_routes(
                State::Kerala,
                [
                    "Kochi to Bangalore",
                    "Kannur to Mangalore",
                    "Alleppey to Kochi",
                ],
            )
            .with_routes(State::Assam, Vec::<String>::new())
            .with_offerings([
                offering("KSRTC", "AC", 4.0, 500.0, 10),
                offering("Kallada", "AC", 5.0, 700.0, 5),
            ])
    }

    fn selection(prefix: &str) -> Selection {
        Selection {
            prefix: prefix.to_string(),
            ..Selection::default()
        }
    }

    fn ratings(values: &[f64]) -> Vec<Rating> {
        values.iter().map(|v| Rating::new(*v).unwrap()).collect()
    }

    fn types(labels: &[&str]) -> Vec<BusType> {
        labels.iter().map(|l| BusType::new(*l).unwrap()).collect()
    }

    async fn run(selection: &Selection) -> BookingView {
        let store = store();
        let mut session = store.session().await.unwrap();
        run_interaction(session.as_mut(), selection).await.unwrap()
    }

    #[tokio::test]
    async fn blank_prefix_runs_nothing() {
        let view = run(&selection("  ")).await;
        assert!(view.prefix.is_none());
        assert!(view.routes.is_empty());
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn no_routes_is_a_notice() {
        let view = run(&selection("z")).await;
        assert_eq!(view.prefix.as_deref(), Some("z"));
        assert!(view.routes.is_empty());
        assert_eq!(view.notice, Some(Notice::NoRoutesFound));
    }

    #[tokio::test]
    async fn first_route_chosen_by_default() {
        let view = run(&selection("K")).await;
        assert_eq!(
            view.routes,
            vec![
                RouteName::new("Kannur to Mangalore"),
                RouteName::new("Kochi to Bangalore"),
            ]
        );
        assert_eq!(view.route, Some(RouteName::new("Kannur to Mangalore")));
        assert_eq!(
            view.notice,
            Some(Notice::NoOfferingsFound {
                route: RouteName::new("Kannur to Mangalore")
            })
        );
    }

    #[tokio::test]
    async fn stale_route_falls_back_to_first() {
        let view = run(&Selection {
            route: Some(RouteName::new("Trivandrum to Chennai")),
            ..selection("k")
        })
        .await;
        assert_eq!(view.route, Some(RouteName::new("Kannur to Mangalore")));
    }

    #[tokio::test]
    async fn offerings_and_options_without_filter() {
        let view = run(&Selection {
            route: Some(RouteName::new("Kochi to Bangalore")),
            ..selection("k")
        })
        .await;

        assert_eq!(view.offerings.len(), 2);
        assert_eq!(view.rating_options, ratings(&[4.0, 5.0]));
        assert_eq!(view.bus_type_options, types(&["AC"]));
        assert!(view.filtered.is_none());
        assert!(view.availability.is_none());
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn full_interaction_quotes() {
        let view = run(&Selection {
            route: Some(RouteName::new("Kochi to Bangalore")),
            filter: FilterSelection::new(ratings(&[4.0, 5.0]), types(&["AC"])),
            seats: Some(3),
            ..selection("k")
        })
        .await;

        assert_eq!(view.filtered.as_ref().map(Vec::len), Some(2));
        let availability = view.availability.unwrap();
        assert_eq!(availability.total_seats, 15);
        assert_eq!(availability.price_per_seat, 600.0);

        let quote = view.quote.unwrap();
        assert_eq!(quote.total_price, 1800.0);
        assert!(view.notice.is_none());
    }

    #[tokio::test]
    async fn unmatched_filter_is_no_availability() {
        let view = run(&Selection {
            route: Some(RouteName::new("Kochi to Bangalore")),
            filter: FilterSelection::new(ratings(&[5.0]), types(&["Non-AC"])),
            seats: Some(1),
            ..selection("k")
        })
        .await;

        assert_eq!(view.filtered, Some(Vec::new()));
        assert!(view.availability.is_none());
        assert!(view.quote.is_none());
        assert_eq!(view.notice, Some(Notice::NoAvailability));
    }

    #[tokio::test]
    async fn too_many_seats_is_a_notice() {
        let view = run(&Selection {
            route: Some(RouteName::new("Kochi to Bangalore")),
            filter: FilterSelection::new(ratings(&[4.0]), types(&["AC"])),
            seats: Some(11),
            ..selection("k")
        })
        .await;

        assert!(view.availability.is_some());
        assert!(view.quote.is_none());
        assert_eq!(
            view.notice,
            Some(Notice::SeatsOutOfRange {
                requested: 11,
                available: 10
            })
        );
    }

    #[tokio::test]
    async fn missing_state_table_is_error() {
        let store = store();
        let mut session = store.session().await.unwrap();
        let err = run_interaction(
            session.as_mut(),
            &Selection {
                state: State::WestBengal,
                ..Selection::default()
            },
        )
        .await
        .unwrap_err();

        assert!(err.is_caller_error());
    }

    #[tokio::test]
    async fn empty_state_table_is_no_routes() {
        let view = run(&Selection {
            state: State::Assam,
            ..Selection::default()
        })
        .await;
        assert_eq!(view.notice, Some(Notice::NoRoutesFound));
    }

    #[test]
    fn notice_messages() {
        assert_eq!(
            Notice::NoRoutesFound.message(),
            "No routes found starting with the specified letter."
        );
        assert_eq!(
            Notice::NoOfferingsFound {
                route: RouteName::new("Goa to Pune")
            }
            .message(),
            "No data found for Route: Goa to Pune."
        );
        assert!(Notice::NoAvailability.is_warning());
        assert!(!Notice::NoRoutesFound.is_warning());
    }
}
