//! Macro with default tests
//!
//! This set is generic and checks the default and expected behaviour for a catalog database
//! implementation. Only the storage traits are used, so no lookup rows (customers, computers)
//! are required.
#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use super::*;

fn department(name: &str, budget: i64) -> NewDepartment {
    NewDepartment {
        name: name.to_owned(),
        budget,
    }
}

/// Departments can be created, read, replaced and removed
pub async fn department_lifecycle<DB>(db: DB)
where
    DB: Database,
{
    let created = db.add_department(department("Sales", 1_000)).await.unwrap();
    assert!(created.employees.is_empty());

    let fetched = db.get_department(created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let outcome = db
        .update_department(created.id, department("Marketing", 2_500))
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Applied);

    let fetched = db.get_department(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Marketing");
    assert_eq!(fetched.budget, 2_500);

    let outcome = db.remove_department(created.id).await.unwrap();
    assert_eq!(outcome, WriteOutcome::Applied);
    assert!(db.get_department(created.id).await.unwrap().is_none());
}

/// Creating the same payload twice yields two distinct rows
pub async fn create_is_not_idempotent<DB>(db: DB)
where
    DB: Database,
{
    let first = db.add_department(department("Ops", 10)).await.unwrap();
    let second = db.add_department(department("Ops", 10)).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(db.list_departments(false).await.unwrap().len(), 2);
}

/// Writes against an absent key are reported as not found
pub async fn missing_keys_are_not_found<DB>(db: DB)
where
    DB: Database,
{
    assert_eq!(
        db.update_department(4242, department("Ghost", 0))
            .await
            .unwrap(),
        WriteOutcome::NotFound
    );
    assert_eq!(
        db.remove_department(4242).await.unwrap(),
        WriteOutcome::NotFound
    );

    let update = ProductUpdate {
        product_type_id: 1,
        customer_id: 1,
        price: Decimal::new(999, 2),
        description: "none".to_owned(),
        title: "none".to_owned(),
        date_added: None,
    };
    assert_eq!(
        db.update_product(4242, update).await.unwrap(),
        WriteOutcome::NotFound
    );
    assert_eq!(
        db.remove_product(4242).await.unwrap(),
        WriteOutcome::NotFound
    );
    assert!(db.get_product(4242).await.unwrap().is_none());
    assert!(db.get_employee(4242).await.unwrap().is_none());
}

/// Replacing a row with identical values still counts as applied
pub async fn unchanged_update_is_applied<DB>(db: DB)
where
    DB: Database,
{
    let created = db.add_department(department("Legal", 700)).await.unwrap();
    assert_eq!(
        db.update_department(created.id, department("Legal", 700))
            .await
            .unwrap(),
        WriteOutcome::Applied
    );
}

/// Single department reads use the requested key, with or without employees
pub async fn single_department_uses_requested_key<DB>(db: DB)
where
    DB: Database,
{
    let first = db.add_department(department("First", 1)).await.unwrap();
    let second = db.add_department(department("Second", 2)).await.unwrap();

    let fetched = db.get_department(second.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, second.id);
    assert_eq!(fetched.name, "Second");

    let fetched = db
        .get_department_with_employees(second.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, second.id);
    assert!(fetched.employees.is_empty());

    let fetched = db
        .get_department_with_employees(first.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.id, first.id);

    assert!(db
        .get_department_with_employees(second.id + 100)
        .await
        .unwrap()
        .is_none());
}

/// Listing an empty catalog, or filtering by an unmatched term, reports zero matches
pub async fn empty_listing_has_zero_total<DB>(db: DB)
where
    DB: Database,
{
    let listing = db.list_products(&ProductQuery::default()).await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total_count, 0);

    let query = ProductQuery {
        q: Some("nothing matches this".to_owned()),
        items_per_page: Some(10),
        current_page: Some(1),
        ..Default::default()
    };
    let listing = db.list_products(&query).await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total_count, 0);
}

/// A non positive page is rejected instead of silently corrected
pub async fn negative_offset_is_a_fault<DB>(db: DB)
where
    DB: Database,
{
    let query = ProductQuery {
        items_per_page: Some(10),
        current_page: Some(0),
        ..Default::default()
    };
    let err = db.list_products(&query).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidPagination {
            offset: -10,
            limit: 10
        }
    ));
}

/// Unit test that is expected to be passed for a correct catalog database implementation
#[macro_export]
macro_rules! catalog_db_test {
    ($make_db_fn:ident) => {
        $crate::catalog_db_test!(department_lifecycle, $make_db_fn);
        $crate::catalog_db_test!(create_is_not_idempotent, $make_db_fn);
        $crate::catalog_db_test!(missing_keys_are_not_found, $make_db_fn);
        $crate::catalog_db_test!(unchanged_update_is_applied, $make_db_fn);
        $crate::catalog_db_test!(single_department_uses_requested_key, $make_db_fn);
        $crate::catalog_db_test!(empty_listing_has_zero_total, $make_db_fn);
        $crate::catalog_db_test!(negative_offset_is_a_fault, $make_db_fn);
    };
    ($name:ident, $make_db_fn:ident) => {
        #[tokio::test]
        async fn $name() {
            $crate::database::test::$name($make_db_fn().await).await;
        }
    };
}
