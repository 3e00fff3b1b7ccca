//! In-memory route store for demos and tests.
//!
//! Loads route tables and offerings from a JSON fixture and serves them as
//! if they were query results, so the service runs without a database.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Offering, RouteName, State};

use super::error::StoreError;
use super::{RouteStore, StoreSession};

/// On-disk fixture layout.
#[derive(Debug, Deserialize)]
struct RouteFixture {
    /// Route names keyed by state identifier.
    routes: BTreeMap<String, Vec<String>>,
    offerings: Vec<Offering>,
}

#[derive(Debug, Clone, Default)]
struct RouteData {
    /// Route tables; a state without an entry has no table.
    tables: HashMap<State, Vec<RouteName>>,
    offerings: Vec<Offering>,
}

/// Route store serving fixed data from memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteStore {
    data: Arc<RouteData>,
}

impl MemoryRouteStore {
    /// Create an empty store with no route tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the route table for a state.
    pub fn with_routes<I, S>(mut self, state: State, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names.into_iter().map(RouteName::new).collect();
        Arc::make_mut(&mut self.data).tables.insert(state, names);
        self
    }

    /// Append offerings.
    pub fn with_offerings(mut self, offerings: impl IntoIterator<Item = Offering>) -> Self {
        Arc::make_mut(&mut self.data).offerings.extend(offerings);
        self
    }

    /// Parse a JSON fixture.
    ///
    /// Expects `{"routes": {"kerala": [...], ...}, "offerings": [...]}`.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let fixture: RouteFixture = serde_json::from_str(json).map_err(|e| StoreError::Load {
            message: format!("invalid fixture JSON: {e}"),
        })?;

        let mut tables = HashMap::new();
        for (key, names) in fixture.routes {
            let state = State::parse(&key).map_err(|e| StoreError::Load {
                message: e.to_string(),
            })?;
            tables.insert(state, names.into_iter().map(RouteName::new).collect());
        }

        Ok(Self {
            data: Arc::new(RouteData {
                tables,
                offerings: fixture.offerings,
            }),
        })
    }

    /// Load a JSON fixture from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StoreError::Load {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_json_str(&json)
    }

    /// States that have a route table.
    pub fn states(&self) -> Vec<State> {
        let mut states: Vec<State> = self.data.tables.keys().copied().collect();
        states.sort();
        states
    }

    /// Total number of offerings held.
    pub fn offering_count(&self) -> usize {
        self.data.offerings.len()
    }
}

#[async_trait]
impl RouteStore for MemoryRouteStore {
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError> {
        Ok(Box::new(MemorySession {
            data: Arc::clone(&self.data),
        }))
    }
}

struct MemorySession {
    data: Arc<RouteData>,
}

#[async_trait]
impl StoreSession for MemorySession {
    async fn route_names(
        &mut self,
        state: State,
        prefix: &str,
    ) -> Result<Vec<RouteName>, StoreError> {
        let table = self
            .data
            .tables
            .get(&state)
            .ok_or_else(|| StoreError::MissingTable {
                table: state.table_name().to_string(),
            })?;

        let mut names: Vec<RouteName> = table
            .iter()
            .filter(|name| name.starts_with_ignore_ascii_case(prefix))
            .cloned()
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn offerings(&mut self, route: &RouteName) -> Result<Vec<Offering>, StoreError> {
        Ok(self
            .data
            .offerings
            .iter()
            .filter(|o| &o.route_name == route)
            .cloned()
            .collect())
    }
}
