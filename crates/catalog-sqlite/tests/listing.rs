//! Product listing against a file backed catalog
#![allow(clippy::unwrap_used)]

mod common;

use catalog_common::database::{Error, ProductsDatabase};
use catalog_common::{ProductQuery, SortMode};
use common::Fixture;
use rust_decimal::Decimal;

fn page(items_per_page: i64, current_page: i64) -> ProductQuery {
    ProductQuery {
        items_per_page: Some(items_per_page),
        current_page: Some(current_page),
        ..Default::default()
    }
}

#[tokio::test]
async fn total_does_not_depend_on_the_page() {
    let fixture = Fixture::new().await;
    for i in 0..25 {
        fixture
            .product(&format!("Lamp {}", i), "desk lamp", Decimal::new(1000 + i, 2))
            .await;
    }

    let first = fixture.db.list_products(&page(10, 1)).await.unwrap();
    let third = fixture.db.list_products(&page(10, 3)).await.unwrap();

    assert_eq!(first.items.len(), 10);
    assert_eq!(third.items.len(), 5);
    assert_eq!(first.total_count, 25);
    assert_eq!(third.total_count, first.total_count);
}

#[tokio::test]
async fn third_page_is_rows_twenty_to_twenty_nine() {
    let fixture = Fixture::new().await;
    for i in 0..35 {
        fixture
            .product_added_at(&format!("Chair {}", i), 1_000 + i)
            .await;
    }

    let everything = fixture
        .db
        .list_products(&ProductQuery::default())
        .await
        .unwrap();
    assert_eq!(everything.items.len(), 35);
    assert_eq!(everything.total_count, 35);
    assert!(everything
        .items
        .windows(2)
        .all(|pair| pair[0].date_added >= pair[1].date_added));

    let third = fixture.db.list_products(&page(10, 3)).await.unwrap();
    assert_eq!(third.items, everything.items[20..30].to_vec());
}

#[tokio::test]
async fn price_sort_follows_the_direction_flag() {
    let fixture = Fixture::new().await;
    for cents in [1999, 500, 2500, 999, 500, 12345] {
        fixture.product("Rug", "wool", Decimal::new(cents, 2)).await;
    }

    let ascending = fixture
        .db
        .list_products(&ProductQuery {
            sort_by: SortMode::Price,
            asc: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(ascending
        .items
        .windows(2)
        .all(|pair| pair[0].price <= pair[1].price));
    assert_eq!(ascending.items[0].price, Decimal::new(500, 2));

    for asc in [Some(false), None] {
        let descending = fixture
            .db
            .list_products(&ProductQuery {
                sort_by: SortMode::Price,
                asc,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(descending
            .items
            .windows(2)
            .all(|pair| pair[0].price >= pair[1].price));
        assert_eq!(descending.items[0].price, Decimal::new(12345, 2));
    }
}

#[tokio::test]
async fn popularity_counts_order_lines() {
    let fixture = Fixture::new().await;
    let quiet = fixture.product("Quiet", "none sold", Decimal::ONE).await;
    let hit = fixture.product("Hit", "best seller", Decimal::ONE).await;
    let steady = fixture.product("Steady", "some sold", Decimal::ONE).await;
    fixture.order_lines(hit.id, 3);
    fixture.order_lines(steady.id, 1);

    let listing = fixture
        .db
        .list_products(&ProductQuery {
            sort_by: SortMode::Popularity,
            ..Default::default()
        })
        .await
        .unwrap();

    let order = listing
        .items
        .iter()
        .map(|p| (p.id, p.popularity_index))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(hit.id, 3), (steady.id, 1), (quiet.id, 0)]);
    assert_eq!(listing.total_count, 3);

    let single = fixture.db.get_product(hit.id).await.unwrap().unwrap();
    assert_eq!(single.popularity_index, 3);
}

#[tokio::test]
async fn search_is_case_insensitive_over_title_and_description() {
    let fixture = Fixture::new().await;
    let desk = fixture
        .product("Walnut Desk", "a sturdy piece", Decimal::ONE)
        .await;
    let table = fixture
        .product("Dining set", "Includes a TABLE", Decimal::ONE)
        .await;
    fixture.product("Sofa", "three seats", Decimal::ONE).await;

    let search = |q: &str| ProductQuery {
        q: Some(q.to_owned()),
        ..Default::default()
    };

    let found = fixture.db.list_products(&search("DESK")).await.unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, desk.id);
    assert_eq!(found.total_count, 1);

    let found = fixture.db.list_products(&search("table")).await.unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, table.id);

    let found = fixture.db.list_products(&search("chair")).await.unwrap();
    assert!(found.items.is_empty());
    assert_eq!(found.total_count, 0);

    let all = fixture.db.list_products(&search("   ")).await.unwrap();
    assert_eq!(all.total_count, 3);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let fixture = Fixture::new().await;
    let cotton = fixture
        .product("Shirt", "100% cotton", Decimal::ONE)
        .await;
    let scarf = fixture.product("Scarf", "wool_blend", Decimal::ONE).await;
    fixture.product("Hat", "wool blend", Decimal::ONE).await;
    fixture.product("Socks", "cotton", Decimal::ONE).await;

    let found = fixture
        .db
        .list_products(&ProductQuery {
            q: Some("%".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].id, cotton.id);

    let found = fixture
        .db
        .list_products(&ProductQuery {
            q: Some("l_b".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].id, scarf.id);
}

#[tokio::test]
async fn filter_sort_and_page_combine() {
    let fixture = Fixture::new().await;
    for i in 0..12 {
        fixture
            .product(&format!("Oak shelf {}", i), "oak", Decimal::new(100 * (i + 1), 2))
            .await;
        fixture
            .product(&format!("Pine shelf {}", i), "pine", Decimal::new(50, 2))
            .await;
    }

    let listing = fixture
        .db
        .list_products(&ProductQuery {
            q: Some("oak".to_owned()),
            asc: Some(true),
            items_per_page: Some(5),
            current_page: Some(2),
            sort_by: SortMode::Price,
        })
        .await
        .unwrap();

    assert_eq!(listing.total_count, 12);
    let prices = listing.items.iter().map(|p| p.price).collect::<Vec<_>>();
    assert_eq!(
        prices,
        (6..=10)
            .map(|i| Decimal::new(100 * i, 2))
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn page_past_the_end_is_empty() {
    let fixture = Fixture::new().await;
    fixture.product("Only", "one", Decimal::ONE).await;

    let listing = fixture.db.list_products(&page(10, 2)).await.unwrap();
    assert!(listing.items.is_empty());
    assert_eq!(listing.total_count, 0);
}

#[tokio::test]
async fn half_a_page_request_is_unpaginated() {
    let fixture = Fixture::new().await;
    for i in 0..4 {
        fixture
            .product(&format!("Mug {}", i), "ceramic", Decimal::ONE)
            .await;
    }

    let listing = fixture
        .db
        .list_products(&ProductQuery {
            items_per_page: Some(2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(listing.items.len(), 4);
    assert_eq!(listing.total_count, 4);
}

#[tokio::test]
async fn negative_page_is_a_fault() {
    let fixture = Fixture::new().await;
    fixture.product("Pan", "steel", Decimal::ONE).await;

    let err = fixture.db.list_products(&page(10, -1)).await.unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidPagination {
            offset: -20,
            limit: 10
        }
    ));
}

#[tokio::test]
async fn uppercase_non_ascii_term_finds_lowercase_rows() {
    let fixture = Fixture::new().await;
    let eclair = fixture
        .product("éclair", "choux pastry", Decimal::new(350, 2))
        .await;
    fixture.product("Crème brûlée", "custard", Decimal::ONE).await;

    let found = fixture
        .db
        .list_products(&ProductQuery {
            q: Some("ÉCLAIR".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
    assert_eq!(found.items[0].id, eclair.id);

    let found = fixture
        .db
        .list_products(&ProductQuery {
            q: Some("CRÈME".to_owned()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.total_count, 1);
}
