pub mod company_service;
pub mod error;
pub mod job_service;
pub mod user_service;

pub use company_service::CompanyService;
pub use error::{ErrorKind, ServiceError, ServiceResult};
pub use job_service::JobService;
pub use user_service::UserService;
