//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod category;
pub mod profile;
pub mod recurring_rule;
pub mod transaction;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use profile::{Column as ProfileColumn, Entity as Profile, Model as ProfileModel};
pub use recurring_rule::{
    Column as RecurringRuleColumn, Entity as RecurringRule, Model as RecurringRuleModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, FlowDirection, Model as TransactionModel,
};
