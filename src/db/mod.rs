pub mod categories;
pub mod expenses;
pub mod reports;
pub mod users;
