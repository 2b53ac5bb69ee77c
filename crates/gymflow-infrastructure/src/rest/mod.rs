//! REST access to the hosted backend.

mod client;
mod error;
mod query;

pub use client::{FunctionReply, RestClient};
pub use error::{NO_ROWS_CODE, is_no_rows, map_http_error};
pub use query::TableQuery;
