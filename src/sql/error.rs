use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqlError {
    #[error("No data")]
    NoData,
}
