use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use catalog::Catalog;
use catalog_sqlite::CatalogSqliteDatabase;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod config;
mod sub_commands;

const DEFAULT_WORK_DIR: &str = ".catalog";

/// Command line client for the department, employee and product catalog
#[derive(Parser)]
#[command(name = "catalog-cli")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to working dir
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Path to the config file, defaults to `config.toml` in the work dir
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// SQLite database file, overrides the config file
    #[arg(long)]
    db: Option<PathBuf>,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with search, sort and paging
    ListProducts(sub_commands::products::ListProductsSubCommand),
    /// Show one product
    GetProduct(sub_commands::products::GetProductSubCommand),
    /// Create a product
    AddProduct(sub_commands::products::AddProductSubCommand),
    /// Replace a product
    UpdateProduct(sub_commands::products::UpdateProductSubCommand),
    /// Delete a product
    DeleteProduct(sub_commands::products::DeleteProductSubCommand),
    /// List departments
    ListDepartments(sub_commands::departments::ListDepartmentsSubCommand),
    /// Show one department
    GetDepartment(sub_commands::departments::GetDepartmentSubCommand),
    /// Create a department
    AddDepartment(sub_commands::departments::AddDepartmentSubCommand),
    /// Replace a department
    UpdateDepartment(sub_commands::departments::UpdateDepartmentSubCommand),
    /// Delete a department
    DeleteDepartment(sub_commands::departments::DeleteDepartmentSubCommand),
    /// Show one employee
    GetEmployee(sub_commands::employees::GetEmployeeSubCommand),
    /// Create an employee
    AddEmployee(sub_commands::employees::AddEmployeeSubCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let env_filter = EnvFilter::new(default_filter.to_string());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let work_dir = match &args.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => home::home_dir()
            .ok_or(anyhow!("Unknown home dir"))?
            .join(DEFAULT_WORK_DIR),
    };

    fs::create_dir_all(&work_dir)?;

    let config_file = args
        .config
        .clone()
        .unwrap_or_else(|| work_dir.join("config.toml"));
    let mut settings = config::Settings::new(config_file).from_env();

    if let Some(db) = &args.db {
        settings.database.path = Some(db.to_string_lossy().to_string());
    }

    let pool_config = settings
        .database
        .pool_config(work_dir.join("catalog.sqlite"));
    tracing::debug!("Using database {}", pool_config.path);

    let catalog = Catalog::from_database(CatalogSqliteDatabase::new(pool_config).await?);

    match &args.command {
        Commands::ListProducts(sub_command_args) => {
            sub_commands::products::list_products(&catalog, sub_command_args).await
        }
        Commands::GetProduct(sub_command_args) => {
            sub_commands::products::get_product(&catalog, sub_command_args).await
        }
        Commands::AddProduct(sub_command_args) => {
            sub_commands::products::add_product(&catalog, sub_command_args).await
        }
        Commands::UpdateProduct(sub_command_args) => {
            sub_commands::products::update_product(&catalog, sub_command_args).await
        }
        Commands::DeleteProduct(sub_command_args) => {
            sub_commands::products::delete_product(&catalog, sub_command_args).await
        }
        Commands::ListDepartments(sub_command_args) => {
            sub_commands::departments::list_departments(&catalog, sub_command_args).await
        }
        Commands::GetDepartment(sub_command_args) => {
            sub_commands::departments::get_department(&catalog, sub_command_args).await
        }
        Commands::AddDepartment(sub_command_args) => {
            sub_commands::departments::add_department(&catalog, sub_command_args).await
        }
        Commands::UpdateDepartment(sub_command_args) => {
            sub_commands::departments::update_department(&catalog, sub_command_args).await
        }
        Commands::DeleteDepartment(sub_command_args) => {
            sub_commands::departments::delete_department(&catalog, sub_command_args).await
        }
        Commands::GetEmployee(sub_command_args) => {
            sub_commands::employees::get_employee(&catalog, sub_command_args).await
        }
        Commands::AddEmployee(sub_command_args) => {
            sub_commands::employees::add_employee(&catalog, sub_command_args).await
        }
    }
}
