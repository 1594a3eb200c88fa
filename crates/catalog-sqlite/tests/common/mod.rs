//! Shared fixture: a file backed catalog plus a side connection for lookup rows
#![allow(dead_code, clippy::unwrap_used)]

use std::path::PathBuf;

use catalog_common::database::ProductsDatabase;
use catalog_common::{EntityId, NewProduct, Product, ProductUpdate};
use catalog_sqlite::CatalogSqliteDatabase;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tempfile::TempDir;

pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
    pub db: CatalogSqliteDatabase,
}

impl Fixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.sqlite");
        let db = CatalogSqliteDatabase::new(path.clone()).await.unwrap();

        let fixture = Self {
            _dir: dir,
            path,
            db,
        };
        fixture
            .side()
            .execute_batch(
                r#"
                INSERT INTO product_type (name) VALUES ('Furniture');
                INSERT INTO customer (first_name, last_name) VALUES ('Sam', 'Jones');
                INSERT INTO customer_order (customer_id) VALUES (1);
                INSERT INTO computer (make, manufacturer, purchase_date) VALUES ('XPS', 'Dell', 0);
                "#,
            )
            .unwrap();
        fixture
    }

    /// A second connection to the same file, for rows the catalog does not manage
    pub fn side(&self) -> Connection {
        let conn = Connection::open(&self.path).unwrap();
        conn.pragma_update(None, "busy_timeout", 5000).unwrap();
        conn
    }

    pub fn order_lines(&self, product_id: EntityId, count: usize) {
        let conn = self.side();
        for _ in 0..count {
            conn.execute(
                "INSERT INTO order_product (order_id, product_id) VALUES (1, ?1)",
                params![product_id],
            )
            .unwrap();
        }
    }

    pub async fn product(&self, title: &str, description: &str, price: Decimal) -> Product {
        self.db
            .add_product(NewProduct {
                product_type_id: 1,
                customer_id: 1,
                price,
                description: description.to_owned(),
                title: title.to_owned(),
            })
            .await
            .unwrap()
    }

    /// Pins `date_added` so recency order is deterministic
    pub async fn product_added_at(&self, title: &str, date_added: u64) -> Product {
        let product = self.product(title, "plain", Decimal::ONE).await;
        let update = ProductUpdate {
            date_added: Some(date_added),
            ..ProductUpdate::from(NewProduct {
                product_type_id: product.product_type_id,
                customer_id: product.customer_id,
                price: product.price,
                description: product.description.clone(),
                title: product.title.clone(),
            })
        };
        self.db.update_product(product.id, update).await.unwrap();
        self.db.get_product(product.id).await.unwrap().unwrap()
    }
}
