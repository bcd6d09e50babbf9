//! Backend query ports and the logging proxy around them

pub mod client;
pub mod logged_query;
pub mod ports;

pub use client::{LoggedClient, LoggedTable};
pub use logged_query::LoggedQuery;
pub use ports::{QueryBuilder, TableBackend};
