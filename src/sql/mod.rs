pub mod error;
pub mod partial_update;
pub mod value;

pub use error::SqlError;
pub use partial_update::{sql_for_partial_update, PartialUpdate, UpdateFields};
pub use value::SqlValue;
