//! Business rules. Handlers stay thin and delegate here; every function takes the
//! store explicitly so the same rules run against Postgres or the in-memory store.

pub mod accounts;
pub mod categories;
pub mod dashboard;
pub mod expenses;
