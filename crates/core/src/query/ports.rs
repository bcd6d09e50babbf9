//! Port interfaces for the backend table API
//!
//! [`TableBackend`] opens a query against a table and [`QueryBuilder`] is the
//! chain surface every builder exposes. The instrumentation proxy implements
//! the same builder trait, so adding a chain method here forces the proxy to
//! decide how to log it.

use async_trait::async_trait;
use gymtrack_domain::{OrderOptions, QueryError, QueryResponse};
use serde_json::Value;

/// Chainable query under construction, resolved once by [`execute`].
///
/// [`execute`]: QueryBuilder::execute
#[async_trait]
pub trait QueryBuilder: Send + Sized {
    /// `column = value`
    #[must_use]
    fn eq(self, column: &str, value: Value) -> Self;

    /// `column <> value`
    #[must_use]
    fn neq(self, column: &str, value: Value) -> Self;

    /// `column > value`
    #[must_use]
    fn gt(self, column: &str, value: Value) -> Self;

    /// `column >= value`
    #[must_use]
    fn gte(self, column: &str, value: Value) -> Self;

    /// `column < value`
    #[must_use]
    fn lt(self, column: &str, value: Value) -> Self;

    /// `column <= value`
    #[must_use]
    fn lte(self, column: &str, value: Value) -> Self;

    /// SQL `LIKE` with `%` and `_` wildcards.
    #[must_use]
    fn like(self, column: &str, pattern: &str) -> Self;

    /// `column IN (values)`
    #[must_use]
    fn in_list(self, column: &str, values: Vec<Value>) -> Self;

    #[must_use]
    fn order(self, column: &str, options: OrderOptions) -> Self;

    #[must_use]
    fn limit(self, count: usize) -> Self;

    /// Inclusive row window `from..=to`.
    #[must_use]
    fn range(self, from: usize, to: usize) -> Self;

    /// Resolve to one object instead of an array.
    #[must_use]
    fn single(self) -> Self;

    /// Return the affected rows of a mutation, projected to `columns`.
    #[must_use]
    fn select(self, columns: &str) -> Self;

    /// Run the query. Consumes the builder.
    async fn execute(self) -> Result<QueryResponse, QueryError>;
}

/// Entry points of the backend's table API.
pub trait TableBackend: Send + Sync {
    /// Builder returned by every entry point.
    type Query: QueryBuilder;

    fn select(&self, table: &str, columns: &str) -> Self::Query;

    /// `rows` is a single object or an array of objects.
    fn insert(&self, table: &str, rows: Value) -> Self::Query;

    fn update(&self, table: &str, changes: Value) -> Self::Query;

    fn delete(&self, table: &str) -> Self::Query;
}
