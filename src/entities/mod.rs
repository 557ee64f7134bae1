//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod activity;
pub mod activity_template;
pub mod budget;
pub mod city;
pub mod expense;
pub mod popular_destination;
pub mod sea_orm_active_enums;
pub mod trip;
pub mod user;

// Re-export specific types to avoid conflicts
pub use activity::{Column as ActivityColumn, Entity as Activity, Model as ActivityModel};
pub use activity_template::{
    Column as ActivityTemplateColumn, Entity as ActivityTemplate, Model as ActivityTemplateModel,
};
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use city::{Column as CityColumn, Entity as City, Model as CityModel};
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use popular_destination::{
    Column as PopularDestinationColumn, Entity as PopularDestination,
    Model as PopularDestinationModel,
};
pub use sea_orm_active_enums::{ActivityCategory, ExpenseCategory, Role, TripStatus};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
