// handlers/elevated/mod.rs - Elevated handlers (admin JWT required)
//
// Every route here sits behind `ensure_admin`.

pub mod companies;
pub mod jobs;
pub mod users;
