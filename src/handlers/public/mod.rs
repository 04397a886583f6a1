// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus read-only browsing of companies and jobs.

pub mod auth;
pub mod companies;
pub mod jobs;
