pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod types;

pub use error::FilterError;
pub use filter::{compose_company_filter, compose_job_filter, Filter};
pub use types::*;
