//! Route name resolution and offering lookup.

use tracing::debug;

use crate::domain::{Offering, RouteName, State};
use crate::store::{StoreError, StoreSession};

use super::error::PipelineError;

/// Normalise a user-typed prefix: trimmed and lowercased.
///
/// Returns `None` for a blank prefix, which means no lookup should run.
pub fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Route names in `state` starting with `prefix`.
///
/// The result is sorted ascending by byte order and free of duplicates
/// whatever order the store returns. An empty result is not an error.
/// A missing route table means the state itself was wrong, so it is
/// reported as an invalid state selection.
pub async fn resolve_routes(
    session: &mut dyn StoreSession,
    state: State,
    prefix: &str,
) -> Result<Vec<RouteName>, PipelineError> {
    let mut names = session
        .route_names(state, prefix)
        .await
        .map_err(|e| match e {
            StoreError::MissingTable { table } => PipelineError::InvalidStateSelection(format!(
                "no route table {table} for state {state}"
            )),
            other => PipelineError::Store(other),
        })?;

    names.sort();
    names.dedup();

    debug!(%state, prefix, count = names.len(), "resolved routes");
    Ok(names)
}

/// All offerings for `route`, in store order.
pub async fn load_offerings(
    session: &mut dyn StoreSession,
    route: &RouteName,
) -> Result<Vec<Offering>, PipelineError> {
    let offerings = session.offerings(route).await?;
    debug!(route = route.as_str(), count = offerings.len(), "loaded offerings");
    Ok(offerings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Session returning canned, deliberately unsorted results.
    struct CannedSession {
        names: Vec<&'static str>,
        missing_table: bool,
    }

    #[async_trait]
    impl StoreSession for CannedSession {
        async fn route_names(
            &mut self,
            state: State,
            _prefix: &str,
        ) -> Result<Vec<RouteName>, StoreError> {
            if self.missing_table {
                return Err(StoreError::MissingTable {
                    table: state.table_name().to_string(),
                });
            }
            Ok(self.names.iter().copied().map(RouteName::new).collect())
        }

        async fn offerings(&mut self, _route: &RouteName) -> Result<Vec<Offering>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn prefix_normalisation() {
        assert_eq!(normalize_prefix("A"), Some("a".to_string()));
        assert_eq!(normalize_prefix("  Ko "), Some("ko".to_string()));
        assert_eq!(normalize_prefix(""), None);
        assert_eq!(normalize_prefix("   "), None);
    }

    #[tokio::test]
    async fn resolved_names_sorted_and_distinct() {
        let mut session = CannedSession {
            names: vec!["b route", "a route", "b route", "A route"],
            missing_table: false,
        };

        let names = resolve_routes(&mut session, State::Kerala, "a").await.unwrap();
        let names: Vec<&str> = names.iter().map(RouteName::as_str).collect();

        assert_eq!(names, vec!["A route", "a route", "b route"]);
    }

    #[tokio::test]
    async fn missing_table_is_invalid_state() {
        let mut session = CannedSession {
            names: vec![],
            missing_table: true,
        };

        let err = resolve_routes(&mut session, State::Haryana, "a")
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::InvalidStateSelection(_)));
        assert!(err.to_string().contains("haryana_routes"));
    }

    #[tokio::test]
    async fn empty_offerings_are_not_an_error() {
        let mut session = CannedSession {
            names: vec![],
            missing_table: false,
        };

        let offerings = load_offerings(&mut session, &RouteName::new("Nowhere"))
            .await
            .unwrap();
        assert!(offerings.is_empty());
    }
}
