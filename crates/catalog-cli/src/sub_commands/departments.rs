use anyhow::Result;
use catalog::{Catalog, EntityId, NewDepartment};
use clap::Args;

use super::print_json;

#[derive(Args)]
pub struct ListDepartmentsSubCommand {
    /// Include each department's employees
    #[arg(long, default_value_t = false)]
    include_employees: bool,
}

#[derive(Args)]
pub struct GetDepartmentSubCommand {
    /// Department id
    id: EntityId,
    /// Related entities to include, any value pulls in the employees
    #[arg(long)]
    include: Option<String>,
}

#[derive(Args)]
pub struct AddDepartmentSubCommand {
    /// Name
    #[arg(long)]
    name: String,
    /// Budget
    #[arg(long)]
    budget: i64,
}

#[derive(Args)]
pub struct UpdateDepartmentSubCommand {
    /// Department id
    id: EntityId,
    /// Name
    #[arg(long)]
    name: String,
    /// Budget
    #[arg(long)]
    budget: i64,
}

#[derive(Args)]
pub struct DeleteDepartmentSubCommand {
    /// Department id
    id: EntityId,
}

pub async fn list_departments(
    catalog: &Catalog,
    sub_command_args: &ListDepartmentsSubCommand,
) -> Result<()> {
    let departments = if sub_command_args.include_employees {
        catalog.list_departments_with_employees().await?
    } else {
        catalog.list_departments().await?
    };

    print_json(&departments)
}

pub async fn get_department(
    catalog: &Catalog,
    sub_command_args: &GetDepartmentSubCommand,
) -> Result<()> {
    let department = catalog
        .get_department(sub_command_args.id, sub_command_args.include.clone())
        .await?;

    print_json(&department)
}

pub async fn add_department(
    catalog: &Catalog,
    sub_command_args: &AddDepartmentSubCommand,
) -> Result<()> {
    let created = catalog
        .create_department(NewDepartment {
            name: sub_command_args.name.clone(),
            budget: sub_command_args.budget,
        })
        .await?;

    println!("Location: {}", created.location);
    print_json(&created.entity)
}

pub async fn update_department(
    catalog: &Catalog,
    sub_command_args: &UpdateDepartmentSubCommand,
) -> Result<()> {
    catalog
        .update_department(
            sub_command_args.id,
            NewDepartment {
                name: sub_command_args.name.clone(),
                budget: sub_command_args.budget,
            },
        )
        .await?;

    println!("Updated department {}", sub_command_args.id);
    Ok(())
}

pub async fn delete_department(
    catalog: &Catalog,
    sub_command_args: &DeleteDepartmentSubCommand,
) -> Result<()> {
    catalog.delete_department(sub_command_args.id).await?;

    println!("Deleted department {}", sub_command_args.id);
    Ok(())
}
