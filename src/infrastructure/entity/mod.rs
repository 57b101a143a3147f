//! Table definitions for the tables this tool reads and writes.
//!
//! The schema itself is owned elsewhere; these only mirror the columns used here.

pub mod corporate_customers;
pub mod user_roles;
pub mod users;
