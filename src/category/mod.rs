//! Expense categories: named groupings of a profile's expenses.
//!
//! The functions in [actions] are the operations other parts of the app call;
//! they tell the rendering layer which views to invalidate after a change.

pub mod actions;
mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use actions::{create_category, delete_category, list_categories, update_category};
pub use db::{count_categories, create_category_table, get_category};
pub use domain::{CategoryId, CategoryName, CategoryUpdate, CategoryWithProfile, ExpenseCategory};
pub(crate) use create::{create_category_endpoint, get_new_category_page};
pub(crate) use delete::delete_category_endpoint;
pub(crate) use edit::{get_edit_category_page, update_category_endpoint};
pub(crate) use list::get_categories_page;
