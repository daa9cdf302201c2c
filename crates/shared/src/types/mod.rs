//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{checked_sum, format_amount, or_zero, parse_lenient, saturating_sum};
pub use pagination::{DataResponse, ListQuery, ListResponse, Pagination};
