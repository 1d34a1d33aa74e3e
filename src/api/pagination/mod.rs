//! List pagination: operation descriptions, the fetch engine and the
//! accumulated result set.

pub mod controller;
pub mod result;
pub mod spec;

pub use controller::{FetchSummary, PaginationController, RequestMode};
pub use result::{Cursor, ResultStore};
pub use spec::{CountSpec, ListSpec, OperationRef};
