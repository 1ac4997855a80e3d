mod category;
mod expense;
pub mod money;
mod user;

pub use category::{Category, CategoryTotal};
pub use expense::{AdminExpenseView, ExpenseChanges, ExpenseView, NewExpense};
pub use user::{NewUser, Role, User, UserIdentity};
