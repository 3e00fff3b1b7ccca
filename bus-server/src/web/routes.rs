//! HTTP route handlers.

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::domain::{RouteName, State as RouteState};
use crate::pipeline::{
    Availability, Notice, PipelineError, QuoteError, Selection, distinct_bus_types,
    distinct_ratings, filter_offerings, load_offerings, normalize_prefix, resolve_routes,
    run_interaction,
};
use crate::store::StoreError;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Shown in place of store details when the store cannot be reached.
const UNAVAILABLE_MESSAGE: &str =
    "The booking service is temporarily unavailable. Please try again later.";

/// Shown in place of internal failure details.
const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(booking_page))
        .route("/book", post(book))
        .route("/terms", get(terms_page))
        .route("/faq", get(faq_page))
        .route("/health", get(health))
        .route("/api/states", get(list_states))
        .route("/api/routes", get(search_routes))
        .route("/api/offerings", get(route_offerings))
        .route("/api/quote", get(quote))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Booking page, recomputed from the query string on every load.
async fn booking_page(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    match render_booking(&state, &pairs).await {
        Ok(html) => html.into_response(),
        Err(e) => e.into_page_response(),
    }
}

async fn render_booking(
    state: &AppState,
    pairs: &[(String, String)],
) -> Result<Html<String>, AppError> {
    let selection = parse_selection(pairs)?;

    // The session is returned to the pool before rendering.
    let view = {
        let mut session = state.store.session().await?;
        run_interaction(session.as_mut(), &selection).await?
    };

    if let Some(notice) = &view.notice {
        warn!(state = %view.state, notice = %notice.message(), "interaction stopped early");
    }

    render(&BookingTemplate::new(&view, &selection))
}

/// Terms and conditions page.
async fn terms_page() -> Response {
    render(&TermsTemplate).map_or_else(AppError::into_page_response, IntoResponse::into_response)
}

/// FAQ page.
async fn faq_page() -> Response {
    render(&FaqTemplate).map_or_else(AppError::into_page_response, IntoResponse::into_response)
}

/// Acknowledge a booking.
///
/// Returns the confirmation page for browsers and JSON otherwise. Nothing is
/// stored; the acknowledgment is only logged.
async fn book(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let result = confirm_booking(&state, &pairs).await;

    if accepts_html(&headers) {
        result
            .and_then(|booking| render(&BookingConfirmedTemplate::from(&booking)))
            .map_or_else(AppError::into_page_response, IntoResponse::into_response)
    } else {
        result.map(Json).into_response()
    }
}

async fn confirm_booking(
    state: &AppState,
    pairs: &[(String, String)],
) -> Result<BookingResponse, AppError> {
    let selection = parse_selection(pairs)?;
    let priced = price_selection(state, &selection).await?;
    let booked_at = Local::now();

    info!(
        route = priced.route.as_str(),
        seats = priced.quote.seats_requested,
        total = priced.quote.total_price,
        %booked_at,
        "booking acknowledged"
    );

    Ok(BookingResponse {
        message: priced.quote.confirmation(priced.route.as_str()),
        seats: priced.quote.seats_requested,
        price_per_seat: priced.quote.price_per_seat,
        total_price: priced.quote.total_price,
        booked_at: booked_at.to_rfc3339(),
        route: priced.route,
    })
}

/// List the known states.
async fn list_states() -> Json<StatesResponse> {
    Json(StatesResponse {
        states: RouteState::ALL.into_iter().map(StateResult::from).collect(),
    })
}

/// Route names for a state and prefix.
async fn search_routes(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RoutesResponse>, AppError> {
    let selection = parse_selection(&pairs)?;
    let prefix = normalize_prefix(&selection.prefix);

    let routes = match &prefix {
        Some(prefix) => {
            let mut session = state.store.session().await?;
            resolve_routes(session.as_mut(), selection.state, prefix).await?
        }
        None => Vec::new(),
    };

    Ok(Json(RoutesResponse {
        state: selection.state,
        prefix,
        routes,
    }))
}

/// Offerings of one route, with the filter choices they allow.
async fn route_offerings(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<OfferingsResponse>, AppError> {
    let selection = parse_selection(&pairs)?;
    let route = require_route(&selection)?;

    let offerings = {
        let mut session = state.store.session().await?;
        load_offerings(session.as_mut(), &route).await?
    };

    Ok(Json(OfferingsResponse {
        ratings: distinct_ratings(&offerings),
        bus_types: distinct_bus_types(&offerings),
        route,
        offerings,
    }))
}

/// Filtered offerings and a price for a complete selection.
async fn quote(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<QuoteResponse>, AppError> {
    let selection = parse_selection(&pairs)?;
    Ok(Json(price_selection(&state, &selection).await?))
}

/// Price a selection that names a route, both filter sets and a seat count.
///
/// Unlike the booking page, anything missing or unavailable is an error.
async fn price_selection(
    state: &AppState,
    selection: &Selection,
) -> Result<QuoteResponse, AppError> {
    let route = require_route(selection)?;
    if !selection.filter.is_complete() {
        return Err(AppError::BadRequest {
            message: "Select at least one rating and one bus type".to_string(),
        });
    }
    let seats = selection.seats.ok_or_else(|| AppError::BadRequest {
        message: "Missing seat count".to_string(),
    })?;

    let offerings = {
        let mut session = state.store.session().await?;
        load_offerings(session.as_mut(), &route).await?
    };
    if offerings.is_empty() {
        return Err(AppError::NotFound {
            message: Notice::NoOfferingsFound { route }.message(),
        });
    }

    let filtered = filter_offerings(&offerings, &selection.filter);
    let availability = Availability::summarize(&filtered)?;
    let quote = availability.quote(seats)?;

    Ok(QuoteResponse {
        route,
        filtered,
        availability,
        quote,
    })
}

fn require_route(selection: &Selection) -> Result<RouteName, AppError> {
    selection.route.clone().ok_or_else(|| AppError::BadRequest {
        message: "Missing route".to_string(),
    })
}

/// Render a template to HTML.
fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    template.render().map(Html).map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The store could not be reached; `message` is logged, not shown
    ServiceUnavailable { message: String },
    /// A fault on our side; `message` is logged, not shown
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log the error and return the status and user-facing message.
    fn report(self) -> (StatusCode, String) {
        let status = self.status();
        match self {
            AppError::BadRequest { message } | AppError::NotFound { message } => {
                warn!(%status, "{message}");
                (status, message)
            }
            AppError::ServiceUnavailable { message } => {
                error!(%status, "{message}");
                (status, UNAVAILABLE_MESSAGE.to_string())
            }
            AppError::Internal { message } => {
                error!(%status, "{message}");
                (status, INTERNAL_MESSAGE.to_string())
            }
        }
    }

    /// Render the error as an HTML page.
    pub fn into_page_response(self) -> Response {
        let (status, message) = self.report();
        let template = ErrorTemplate {
            title: status
                .canonical_reason()
                .unwrap_or("Something went wrong")
                .to_string(),
            message,
        };

        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("Template error: {e}");
                status.into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(_) => AppError::ServiceUnavailable {
                message: e.to_string(),
            },
            _ if e.is_caller_error() => AppError::BadRequest {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Store(e @ StoreError::Unavailable(_)) => AppError::from(e),
            e if e.is_caller_error() => AppError::BadRequest {
                message: e.to_string(),
            },
            e => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<SelectionError> for AppError {
    fn from(e: SelectionError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<QuoteError> for AppError {
    fn from(e: QuoteError) -> Self {
        AppError::BadRequest {
            message: Notice::from(e).message(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.report();
        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
