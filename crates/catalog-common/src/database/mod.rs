//! Catalog database

use std::fmt::Debug;

use async_trait::async_trait;

use crate::common::{Listing, WriteOutcome};
use crate::entities::{
    Department, Employee, EntityId, NewDepartment, NewEmployee, NewProduct, Product,
    ProductUpdate,
};
use crate::query::ProductQuery;

#[cfg(feature = "test")]
pub mod test;

/// Catalog database error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database Error
    #[error(transparent)]
    Database(Box<dyn std::error::Error + Send + Sync>),
    /// Duplicate entry
    #[error("Duplicate entry")]
    Duplicate,
    /// The requested entity does not exist
    #[error("No {entity} found with ID of {id}")]
    NotFound {
        /// Entity name
        entity: &'static str,
        /// Requested id
        id: EntityId,
    },
    /// A keyed write touched no rows even though the row exists
    #[error("No rows affected")]
    NoRowsAffected,
    /// The computed pagination window cannot be executed
    #[error("Invalid pagination window: offset {offset}, limit {limit}")]
    InvalidPagination {
        /// Row offset
        offset: i64,
        /// Row limit
        limit: i64,
    },
    /// A statement placeholder was never bound
    #[error("Missing placeholder value {0}")]
    MissingPlaceholder(String),
    /// The database replied with an unexpected response type
    #[error("Invalid database response")]
    InvalidDbResponse,
    /// Row conversion error
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Internal error
    #[error("Internal {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error is a [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors converting a database row into an entity
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    /// Missing columns
    #[error("Not enough elements: expected {0}, got {1}")]
    MissingColumn(usize, usize),
    /// Invalid db type
    #[error("Invalid type from db, expected {0} got {1}")]
    InvalidType(String, String),
    /// Invalid conversion
    #[error("Cannot convert {0}, expecting type {1}")]
    InvalidConversion(String, String),
    /// Invalid decimal
    #[error(transparent)]
    Decimal(#[from] rust_decimal::Error),
}

/// Departments storage
#[async_trait]
pub trait DepartmentsDatabase: Debug + Send + Sync {
    /// All departments in id order, with or without their employees
    async fn list_departments(&self, include_employees: bool) -> Result<Vec<Department>, Error>;

    /// A single department without its employees
    async fn get_department(&self, id: EntityId) -> Result<Option<Department>, Error>;

    /// A single department with its employees
    async fn get_department_with_employees(
        &self,
        id: EntityId,
    ) -> Result<Option<Department>, Error>;

    /// Inserts a department, returning it with the store assigned id
    async fn add_department(&self, department: NewDepartment) -> Result<Department, Error>;

    /// Replaces a department
    async fn update_department(
        &self,
        id: EntityId,
        department: NewDepartment,
    ) -> Result<WriteOutcome, Error>;

    /// Removes a department
    async fn remove_department(&self, id: EntityId) -> Result<WriteOutcome, Error>;
}

/// Employees storage
#[async_trait]
pub trait EmployeesDatabase: Debug + Send + Sync {
    /// A single employee
    async fn get_employee(&self, id: EntityId) -> Result<Option<Employee>, Error>;

    /// Inserts an employee, returning it with the store assigned id
    async fn add_employee(&self, employee: NewEmployee) -> Result<Employee, Error>;
}

/// Products storage
#[async_trait]
pub trait ProductsDatabase: Debug + Send + Sync {
    /// Filtered, sorted and paginated products plus the unpaginated match count
    async fn list_products(&self, query: &ProductQuery) -> Result<Listing<Product>, Error>;

    /// A single product
    async fn get_product(&self, id: EntityId) -> Result<Option<Product>, Error>;

    /// Inserts a product stamped with the current time
    async fn add_product(&self, product: NewProduct) -> Result<Product, Error>;

    /// Replaces a product
    async fn update_product(
        &self,
        id: EntityId,
        product: ProductUpdate,
    ) -> Result<WriteOutcome, Error>;

    /// Removes a product
    async fn remove_product(&self, id: EntityId) -> Result<WriteOutcome, Error>;
}

/// Full catalog storage
pub trait Database: DepartmentsDatabase + EmployeesDatabase + ProductsDatabase {}

impl<T> Database for T where T: DepartmentsDatabase + EmployeesDatabase + ProductsDatabase {}

/// Shared handle to any catalog storage
pub type DynCatalogDatabase = std::sync::Arc<dyn Database + Send + Sync>;
