//! Catalog common types and traits
//!
//! Entities, request and response shapes, and the storage traits shared by every catalog
//! backend.

pub mod common;
pub mod database;
pub mod entities;
pub mod query;
pub mod util;

pub use common::{Created, Listing, WriteOutcome, TOTAL_COUNT_HEADER};
pub use database::{ConversionError, Error};
pub use entities::{
    Department, Employee, EntityId, NewDepartment, NewEmployee, NewProduct, Product,
    ProductUpdate,
};
pub use query::{ProductQuery, SortMode};
