//! Schema and dialect listing commands

use colored::Colorize;
use prettytable::{format, Table};

use crate::catalog::{Catalog, Dialect};
use crate::error::{Result, SqlwiseError};

/// Handle the `schemas` command
///
/// Without an id, lists the catalog; with an id, shows that schema's tables
/// and columns.
pub fn handle_schemas(catalog: &Catalog, id: Option<&str>) -> Result<()> {
    match id {
        None => list_schemas(catalog),
        Some(id) => show_schema(catalog, id),
    }
}

fn list_schemas(catalog: &Catalog) -> Result<()> {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Tables".bold(),
        "Description".bold()
    ]);

    for schema in catalog.schemas() {
        table.add_row(prettytable::row![
            schema.id.cyan(),
            schema.name,
            schema.tables.len(),
            schema.description
        ]);
    }

    println!("\nAvailable schemas:");
    table.printstd();
    println!();
    println!(
        "Use {} to inspect one.",
        "sqlwise schemas --id <ID>".cyan()
    );
    println!();

    Ok(())
}

fn show_schema(catalog: &Catalog, id: &str) -> Result<()> {
    let schema = catalog
        .get(id)
        .ok_or_else(|| SqlwiseError::UnknownSchema(id.to_string()))?;

    println!("\n{}: {}", schema.name.bold(), schema.description);

    for table_def in &schema.tables {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

        table.add_row(prettytable::row![
            "Column".bold(),
            "Type".bold(),
            "Description".bold()
        ]);

        for column in &table_def.columns {
            table.add_row(prettytable::row![
                column.name.cyan(),
                column.column_type,
                column.description.as_deref().unwrap_or("-")
            ]);
        }

        println!("\n{}", table_def.name.green());
        table.printstd();
    }
    println!();

    Ok(())
}

/// Handle the `dialects` command
pub fn handle_dialects() {
    println!("\nSupported SQL dialects:");
    for dialect in Dialect::SELECTABLE {
        println!("  {}", dialect.to_string().cyan());
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_schemas_listing() {
        let catalog = Catalog::builtin();
        assert!(handle_schemas(&catalog, None).is_ok());
    }

    #[test]
    fn test_handle_schemas_known_id() {
        let catalog = Catalog::builtin();
        assert!(handle_schemas(&catalog, Some("iot-mesh")).is_ok());
    }

    #[test]
    fn test_handle_schemas_unknown_id() {
        let catalog = Catalog::builtin();
        let err = handle_schemas(&catalog, Some("warehouse")).unwrap_err();
        let err = err.downcast::<SqlwiseError>().unwrap();
        assert!(matches!(err, SqlwiseError::UnknownSchema(_)));
    }
}
