/// Migrations as `(driver, name, sql)`, in the order they must run
pub static MIGRATIONS: &[(&str, &str, &str)] = &[(
    "sqlite",
    "20250901000000_init.sql",
    include_str!("migrations/sqlite/20250901000000_init.sql"),
)];
