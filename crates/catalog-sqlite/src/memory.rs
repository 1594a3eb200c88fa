//! In-memory database that is provided by the `catalog-sqlite` crate, mainly for testing purposes.
use catalog_common::database::{self, DepartmentsDatabase};
use catalog_common::NewDepartment;

use super::CatalogSqliteDatabase;

/// Creates a new in-memory [`CatalogSqliteDatabase`] instance
pub async fn empty() -> Result<CatalogSqliteDatabase, database::Error> {
    CatalogSqliteDatabase::new(":memory:").await
}

/// Creates a new in-memory [`CatalogSqliteDatabase`] instance with the given departments
pub async fn new_with_departments(
    departments: Vec<NewDepartment>,
) -> Result<CatalogSqliteDatabase, database::Error> {
    let db = empty().await?;

    for department in departments {
        db.add_department(department).await?;
    }

    Ok(db)
}
