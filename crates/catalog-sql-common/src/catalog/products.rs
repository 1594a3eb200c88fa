use async_trait::async_trait;
use catalog_common::database::{Error, ProductsDatabase};
use catalog_common::util::unix_time;
use catalog_common::{
    EntityId, Listing, NewProduct, Product, ProductQuery, ProductUpdate, WriteOutcome,
};
use tracing::instrument;

use super::{SQLCatalogDatabase, Table};
use crate::listing::{order_by, search_predicate, total_count, ListingQuery, Page};
use crate::pool::DatabasePool;
use crate::stmt::{query, Column};
use crate::value::Value;
use crate::{column_as_decimal, column_as_number, column_as_string, unpack_into};

const PRODUCT_COLUMNS: &str = r#"
    p.id,
    p.product_type_id,
    p.customer_id,
    p.price,
    p.description,
    p.title,
    p.date_added,
    COUNT(op.product_id) AS popularity_index
"#;

const PRODUCT_FROM: &str = "product p LEFT JOIN order_product op ON op.product_id = p.id";

/// Converts the leading `PRODUCT_COLUMNS` of a row, anything after them is ignored
fn sql_row_to_product(row: Vec<Column>) -> Result<Product, Error> {
    unpack_into!(
        let (
            id,
            product_type_id,
            customer_id,
            price,
            description,
            title,
            date_added,
            popularity_index
        ) = row
    );

    Ok(Product {
        id: column_as_number!(id),
        product_type_id: column_as_number!(product_type_id),
        customer_id: column_as_number!(customer_id),
        price: column_as_decimal!(price),
        description: column_as_string!(description),
        title: column_as_string!(title),
        date_added: column_as_number!(date_added),
        popularity_index: column_as_number!(popularity_index),
    })
}

/// Listing statement for a product query
fn listing_query(request: &ProductQuery) -> Result<ListingQuery, Error> {
    let page = Page::from_request(request.items_per_page, request.current_page)
        .map(|page| page.to_fragment())
        .transpose()?;

    Ok(ListingQuery::new(PRODUCT_COLUMNS.trim(), PRODUCT_FROM)
        .group_by("p.id")
        .filter(search_predicate(request.search_term()))
        .order_by(order_by(request.sort_by, request.asc))
        .page(page))
}

#[async_trait]
impl<RM> ProductsDatabase for SQLCatalogDatabase<RM>
where
    RM: DatabasePool + 'static,
{
    #[instrument(skip(self))]
    async fn list_products(&self, request: &ProductQuery) -> Result<Listing<Product>, Error> {
        let statement = listing_query(request)?.build()?;
        let conn = self.conn()?;

        let rows = statement.fetch_all(&*conn).await?;
        let total_count = total_count(&rows)?;

        Ok(Listing {
            items: rows
                .into_iter()
                .map(sql_row_to_product)
                .collect::<Result<Vec<_>, _>>()?,
            total_count,
        })
    }

    #[instrument(skip(self))]
    async fn get_product(&self, id: EntityId) -> Result<Option<Product>, Error> {
        let conn = self.conn()?;

        query(&format!(
            "SELECT {} FROM {} WHERE p.id = :id GROUP BY p.id",
            PRODUCT_COLUMNS, PRODUCT_FROM
        ))?
        .bind("id", id)
        .fetch_one(&*conn)
        .await?
        .map(sql_row_to_product)
        .transpose()
    }

    #[instrument(skip(self))]
    async fn add_product(&self, product: NewProduct) -> Result<Product, Error> {
        let conn = self.conn()?;
        let date_added = unix_time();

        let id = query(
            r#"
            INSERT INTO product
            (date_added, product_type_id, customer_id, price, title, description)
            VALUES
            (:date_added, :product_type_id, :customer_id, :price, :title, :description)
            RETURNING id
            "#,
        )?
        .bind("date_added", Value::try_from(date_added)?)
        .bind("product_type_id", product.product_type_id)
        .bind("customer_id", product.customer_id)
        .bind("price", product.price)
        .bind("title", product.title.clone())
        .bind("description", product.description.clone())
        .pluck(&*conn)
        .await?
        .ok_or(Error::InvalidDbResponse)?;

        Ok(Product {
            id: column_as_number!(id),
            product_type_id: product.product_type_id,
            customer_id: product.customer_id,
            price: product.price,
            description: product.description,
            title: product.title,
            date_added,
            popularity_index: 0,
        })
    }

    #[instrument(skip(self))]
    async fn update_product(
        &self,
        id: EntityId,
        product: ProductUpdate,
    ) -> Result<WriteOutcome, Error> {
        let date_added = product.date_added.map(Value::try_from).transpose()?;

        let statement = query(
            r#"
            UPDATE product SET
                product_type_id = :product_type_id,
                customer_id = :customer_id,
                price = :price,
                title = :title,
                description = :description,
                date_added = COALESCE(:date_added, date_added)
            WHERE
                id = :id
            "#,
        )?
        .bind("product_type_id", product.product_type_id)
        .bind("customer_id", product.customer_id)
        .bind("price", product.price)
        .bind("title", product.title)
        .bind("description", product.description)
        .bind("date_added", date_added)
        .bind("id", id);

        self.guarded_write(Table::Product, id, statement).await
    }

    #[instrument(skip(self))]
    async fn remove_product(&self, id: EntityId) -> Result<WriteOutcome, Error> {
        let statement = query(r#"DELETE FROM product WHERE id = :id"#)?.bind("id", id);

        self.guarded_write(Table::Product, id, statement).await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use catalog_common::SortMode;
    use rust_decimal::Decimal;

    use super::*;

    fn row(price: Value) -> Vec<Column> {
        vec![
            Value::Integer(5),
            Value::Integer(1),
            Value::Integer(2),
            price,
            Value::Text("Oak desk".to_owned()),
            Value::Text("Desk".to_owned()),
            Value::Integer(1_700_000_000),
            Value::Integer(4),
            Value::Integer(31),
        ]
    }

    #[test]
    fn listing_row_ignores_trailing_count() {
        let product = sql_row_to_product(row(Value::Real(19.99))).expect("product");
        assert_eq!(product.id, 5);
        assert_eq!(product.price, Decimal::from_str("19.99").expect("decimal"));
        assert_eq!(product.date_added, 1_700_000_000);
        assert_eq!(product.popularity_index, 4);
    }

    #[test]
    fn integral_and_text_prices_convert() {
        let product = sql_row_to_product(row(Value::Integer(20))).expect("product");
        assert_eq!(product.price, Decimal::new(2000, 2));

        let product = sql_row_to_product(row(Value::Text("0.5".to_owned()))).expect("product");
        assert_eq!(product.price, Decimal::new(5, 1));

        assert!(sql_row_to_product(row(Value::Null)).is_err());
    }

    #[test]
    fn query_without_paging_has_no_window() {
        let (sql, values) = listing_query(&ProductQuery {
            items_per_page: Some(10),
            ..Default::default()
        })
        .expect("query")
        .to_sql();
        assert!(!sql.contains("LIMIT"));
        assert!(!sql.contains("HAVING"));
        assert!(values.is_empty());
    }

    #[test]
    fn query_with_everything() {
        let (sql, values) = listing_query(&ProductQuery {
            q: Some("desk".to_owned()),
            asc: Some(true),
            items_per_page: Some(10),
            current_page: Some(3),
            sort_by: SortMode::Price,
        })
        .expect("query")
        .to_sql();
        assert!(sql.contains("HAVING (LOWER(p.title)"));
        assert!(sql.contains("ORDER BY p.price ASC"));
        assert!(sql.ends_with("LIMIT :limit OFFSET :offset"));
        assert_eq!(values.len(), 3);
        assert_eq!(values[2], ("offset".to_owned(), Value::Integer(20)));
    }

    #[test]
    fn bad_page_fails_before_reaching_the_store() {
        let err = listing_query(&ProductQuery {
            items_per_page: Some(10),
            current_page: Some(-1),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidPagination {
                offset: -20,
                limit: 10
            }
        ));
    }
}
