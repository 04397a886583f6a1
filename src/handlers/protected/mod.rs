// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Routes here sit behind `ensure_logged_in`. Each handler also checks that
// the caller owns the user record or is an admin.

pub mod users;
