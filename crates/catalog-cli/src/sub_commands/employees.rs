use anyhow::Result;
use catalog::{Catalog, EntityId, NewEmployee};
use clap::Args;

use super::print_json;

#[derive(Args)]
pub struct GetEmployeeSubCommand {
    /// Employee id
    id: EntityId,
}

#[derive(Args)]
pub struct AddEmployeeSubCommand {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    department_id: EntityId,
    #[arg(long)]
    computer_id: EntityId,
    /// Whether the employee supervises the department
    #[arg(long, default_value_t = false)]
    supervisor: bool,
    #[arg(long)]
    email: String,
}

pub async fn get_employee(catalog: &Catalog, sub_command_args: &GetEmployeeSubCommand) -> Result<()> {
    let employee = catalog.get_employee(sub_command_args.id).await?;

    print_json(&employee)
}

pub async fn add_employee(catalog: &Catalog, sub_command_args: &AddEmployeeSubCommand) -> Result<()> {
    let created = catalog
        .create_employee(NewEmployee {
            first_name: sub_command_args.first_name.clone(),
            last_name: sub_command_args.last_name.clone(),
            department_id: sub_command_args.department_id,
            computer_id: sub_command_args.computer_id,
            is_supervisor: sub_command_args.supervisor,
            email: sub_command_args.email.clone(),
        })
        .await?;

    println!("Location: {}", created.location);
    print_json(&created.entity)
}
