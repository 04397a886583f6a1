use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("{min_field} cannot exceed {max_field}")]
    MinExceedsMax {
        min_field: &'static str,
        max_field: &'static str,
    },
}
