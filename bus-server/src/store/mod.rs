//! Data store access.
//!
//! The store holds one route table per state (`{state}_routes`) and a
//! unified `project_info` table with one row per offering. Two read queries
//! are exposed through [`StoreSession`]; a session owns one connection for
//! the duration of a page load and releases it when dropped.

mod error;
mod memory;
mod sql;

use async_trait::async_trait;

use crate::domain::{Offering, RouteName, State};

pub use error::StoreError;
pub use memory::MemoryRouteStore;
pub use sql::{SqlRouteStore, StoreConfig};

/// A source of per-interaction store sessions.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Acquire a session for one page load.
    ///
    /// Fails with [`StoreError::Unavailable`] if no connection can be made.
    async fn session(&self) -> Result<Box<dyn StoreSession>, StoreError>;
}

/// Read access to the store over a single acquired connection.
#[async_trait]
pub trait StoreSession: Send {
    /// Distinct route names in `state`'s table that start with `prefix`,
    /// in the store's ascending order.
    ///
    /// `prefix` is matched literally; it is never interpreted as a pattern.
    async fn route_names(
        &mut self,
        state: State,
        prefix: &str,
    ) -> Result<Vec<RouteName>, StoreError>;

    /// All offerings whose route name equals `route`, in store order.
    async fn offerings(&mut self, route: &RouteName) -> Result<Vec<Offering>, StoreError>;
}
