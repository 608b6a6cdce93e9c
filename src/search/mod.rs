//! Search filter helpers

pub mod query;

pub use query::quote_filter_string;
