//! HTTP tests against the full router.
//!
//! Only paths that never reach the database are covered here, so the suite
//! runs without Postgres.

mod common;
mod handlers;
