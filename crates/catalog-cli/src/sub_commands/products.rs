use anyhow::Result;
use catalog::{
    Catalog, EntityId, NewProduct, ProductQuery, ProductUpdate, SortMode, TOTAL_COUNT_HEADER,
};
use clap::Args;
use rust_decimal::Decimal;

use super::print_json;

#[derive(Args)]
pub struct ListProductsSubCommand {
    /// Free text matched against title and description
    #[arg(short, long)]
    q: Option<String>,
    /// Sort mode: recent, popularity or price
    #[arg(long, default_value = "recent")]
    sort_by: String,
    /// Ascending price order, only used when sorting by price
    #[arg(long)]
    asc: Option<bool>,
    /// Page size, paging needs both page size and page
    #[arg(long)]
    items_per_page: Option<i64>,
    /// 1-indexed page
    #[arg(long)]
    current_page: Option<i64>,
}

#[derive(Args)]
pub struct GetProductSubCommand {
    /// Product id
    id: EntityId,
}

#[derive(Args)]
pub struct AddProductSubCommand {
    #[arg(long)]
    product_type_id: EntityId,
    #[arg(long)]
    customer_id: EntityId,
    /// Price, as an exact decimal
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
}

#[derive(Args)]
pub struct UpdateProductSubCommand {
    /// Product id
    id: EntityId,
    #[arg(long)]
    product_type_id: EntityId,
    #[arg(long)]
    customer_id: EntityId,
    /// Price, as an exact decimal
    #[arg(long)]
    price: Decimal,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// New unix timestamp, the stored one is kept when absent
    #[arg(long)]
    date_added: Option<u64>,
}

#[derive(Args)]
pub struct DeleteProductSubCommand {
    /// Product id
    id: EntityId,
}

pub async fn list_products(
    catalog: &Catalog,
    sub_command_args: &ListProductsSubCommand,
) -> Result<()> {
    let listing = catalog
        .list_products(&ProductQuery {
            q: sub_command_args.q.clone(),
            asc: sub_command_args.asc,
            items_per_page: sub_command_args.items_per_page,
            current_page: sub_command_args.current_page,
            sort_by: SortMode::from_token(&sub_command_args.sort_by),
        })
        .await?;

    println!("{}: {}", TOTAL_COUNT_HEADER, listing.total_count);
    print_json(&listing.items)
}

pub async fn get_product(catalog: &Catalog, sub_command_args: &GetProductSubCommand) -> Result<()> {
    let product = catalog.get_product(sub_command_args.id).await?;

    print_json(&product)
}

pub async fn add_product(catalog: &Catalog, sub_command_args: &AddProductSubCommand) -> Result<()> {
    let created = catalog
        .create_product(NewProduct {
            product_type_id: sub_command_args.product_type_id,
            customer_id: sub_command_args.customer_id,
            price: sub_command_args.price,
            description: sub_command_args.description.clone(),
            title: sub_command_args.title.clone(),
        })
        .await?;

    println!("Location: {}", created.location);
    print_json(&created.entity)
}

pub async fn update_product(
    catalog: &Catalog,
    sub_command_args: &UpdateProductSubCommand,
) -> Result<()> {
    catalog
        .update_product(
            sub_command_args.id,
            ProductUpdate {
                product_type_id: sub_command_args.product_type_id,
                customer_id: sub_command_args.customer_id,
                price: sub_command_args.price,
                description: sub_command_args.description.clone(),
                title: sub_command_args.title.clone(),
                date_added: sub_command_args.date_added,
            },
        )
        .await?;

    println!("Updated product {}", sub_command_args.id);
    Ok(())
}

pub async fn delete_product(
    catalog: &Catalog,
    sub_command_args: &DeleteProductSubCommand,
) -> Result<()> {
    catalog.delete_product(sub_command_args.id).await?;

    println!("Deleted product {}", sub_command_args.id);
    Ok(())
}
