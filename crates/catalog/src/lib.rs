//! Department, employee and product catalog
//!
//! [`Catalog`] is the request facing surface: listings with their match count, single entity
//! fetches that fail with [`Error::NotFound`], creates that report where the new entity lives,
//! and keyed writes that tell "absent" apart from a real fault.

#![warn(missing_docs)]
#![warn(rustdoc::bare_urls)]

use std::sync::Arc;

pub use catalog_common::database::{DynCatalogDatabase, Error};
pub use catalog_common::{
    Created, Department, Employee, EntityId, Listing, NewDepartment, NewEmployee, NewProduct,
    Product, ProductQuery, ProductUpdate, SortMode, WriteOutcome, TOTAL_COUNT_HEADER,
};
use tracing::instrument;

/// Route prefix for departments
pub const DEPARTMENTS_PATH: &str = "/api/departments";
/// Route prefix for employees
pub const EMPLOYEES_PATH: &str = "/api/employees";
/// Route prefix for products
pub const PRODUCTS_PATH: &str = "/api/products";

/// Catalog service
#[derive(Debug, Clone)]
pub struct Catalog {
    localstore: DynCatalogDatabase,
}

fn not_found(entity: &'static str, id: EntityId) -> Error {
    Error::NotFound { entity, id }
}

fn location(prefix: &str, id: EntityId) -> String {
    format!("{}/{}", prefix, id)
}

/// Folds a keyed write outcome into the facade's result
fn applied(outcome: WriteOutcome, entity: &'static str, id: EntityId) -> Result<(), Error> {
    match outcome {
        WriteOutcome::Applied => Ok(()),
        WriteOutcome::NotFound => Err(not_found(entity, id)),
    }
}

impl Catalog {
    /// Creates a catalog over the given storage
    pub fn new(localstore: DynCatalogDatabase) -> Self {
        Self { localstore }
    }

    /// Creates a catalog from any concrete storage
    pub fn from_database<DB>(db: DB) -> Self
    where
        DB: catalog_common::database::Database + Send + Sync + 'static,
    {
        Self::new(Arc::new(db))
    }

    /// Filtered, sorted and paginated products.
    ///
    /// `total_count` is the number of matches before pagination, surfaced to HTTP clients as
    /// [`TOTAL_COUNT_HEADER`].
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &ProductQuery) -> Result<Listing<Product>, Error> {
        let listing = self.localstore.list_products(query).await?;
        tracing::debug!(
            "Listed {} of {} matching products",
            listing.items.len(),
            listing.total_count
        );
        Ok(listing)
    }

    /// Every department, without employees
    #[instrument(skip(self))]
    pub async fn list_departments(&self) -> Result<Vec<Department>, Error> {
        self.localstore.list_departments(false).await
    }

    /// Every department together with its employees
    #[instrument(skip(self))]
    pub async fn list_departments_with_employees(&self) -> Result<Vec<Department>, Error> {
        self.localstore.list_departments(true).await
    }

    /// A single department. Any `include` value pulls in its employees.
    #[instrument(skip(self))]
    pub async fn get_department(
        &self,
        id: EntityId,
        include: Option<String>,
    ) -> Result<Department, Error> {
        let department = match include {
            Some(_) => self.localstore.get_department_with_employees(id).await?,
            None => self.localstore.get_department(id).await?,
        };

        department.ok_or_else(|| not_found("department", id))
    }

    /// A single product
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: EntityId) -> Result<Product, Error> {
        self.localstore
            .get_product(id)
            .await?
            .ok_or_else(|| not_found("product", id))
    }

    /// A single employee
    #[instrument(skip(self))]
    pub async fn get_employee(&self, id: EntityId) -> Result<Employee, Error> {
        self.localstore
            .get_employee(id)
            .await?
            .ok_or_else(|| not_found("employee", id))
    }

    /// Creates a department
    #[instrument(skip(self))]
    pub async fn create_department(
        &self,
        department: NewDepartment,
    ) -> Result<Created<Department>, Error> {
        let entity = self.localstore.add_department(department).await?;
        tracing::info!("Created department {}", entity.id);

        Ok(Created {
            location: location(DEPARTMENTS_PATH, entity.id),
            entity,
        })
    }

    /// Creates an employee
    #[instrument(skip(self))]
    pub async fn create_employee(&self, employee: NewEmployee) -> Result<Created<Employee>, Error> {
        let entity = self.localstore.add_employee(employee).await?;
        tracing::info!("Created employee {}", entity.id);

        Ok(Created {
            location: location(EMPLOYEES_PATH, entity.id),
            entity,
        })
    }

    /// Creates a product stamped with the current time
    #[instrument(skip(self))]
    pub async fn create_product(&self, product: NewProduct) -> Result<Created<Product>, Error> {
        let entity = self.localstore.add_product(product).await?;
        tracing::info!("Created product {}", entity.id);

        Ok(Created {
            location: location(PRODUCTS_PATH, entity.id),
            entity,
        })
    }

    /// Replaces a department
    #[instrument(skip(self))]
    pub async fn update_department(
        &self,
        id: EntityId,
        department: NewDepartment,
    ) -> Result<(), Error> {
        let outcome = self.localstore.update_department(id, department).await?;
        applied(outcome, "department", id)
    }

    /// Deletes a department
    #[instrument(skip(self))]
    pub async fn delete_department(&self, id: EntityId) -> Result<(), Error> {
        let outcome = self.localstore.remove_department(id).await?;
        applied(outcome, "department", id)
    }

    /// Replaces a product. A missing `date_added` keeps the stored one.
    #[instrument(skip(self))]
    pub async fn update_product(&self, id: EntityId, product: ProductUpdate) -> Result<(), Error> {
        let outcome = self.localstore.update_product(id, product).await?;
        applied(outcome, "product", id)
    }

    /// Deletes a product
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: EntityId) -> Result<(), Error> {
        let outcome = self.localstore.remove_product(id).await?;
        applied(outcome, "product", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_the_key() {
        assert_eq!(
            not_found("department", 12).to_string(),
            "No department found with ID of 12"
        );
        assert_eq!(
            not_found("product", 3).to_string(),
            "No product found with ID of 3"
        );
    }

    #[test]
    fn outcomes_fold_into_results() {
        assert!(applied(WriteOutcome::Applied, "product", 1).is_ok());
        assert!(applied(WriteOutcome::NotFound, "product", 1)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn locations_point_at_single_fetches() {
        assert_eq!(location(PRODUCTS_PATH, 9), "/api/products/9");
        assert_eq!(location(DEPARTMENTS_PATH, 1), "/api/departments/1");
    }
}
