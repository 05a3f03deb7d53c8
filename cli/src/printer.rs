use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use log::info;
use prettytable::{cell, format, row, Table};
use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tableau_client::DatabaseTable;

/// Where the discovered tables end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File { dir: PathBuf },
    Stdout,
}

pub fn serialize_tables(tables: &[DatabaseTable]) -> Result<String> {
    serde_json::to_string_pretty(tables).context("Could not serialise database tables.")
}

/// `tables-<timestamp>.json`, with the `:` of the timestamp replaced so the
/// name is valid on every filesystem.
pub fn output_file_name(now: DateTime<Utc>) -> String {
    format!(
        "tables-{}.json",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
            .replace(':', "_")
    )
}

/// Write the tables to the output target. Returns the path of the created
/// file, if any.
pub fn write_tables(
    target: &OutputTarget,
    tables: &[DatabaseTable],
    now: DateTime<Utc>,
) -> Result<Option<PathBuf>> {
    let serialized = serialize_tables(tables)?;
    match target {
        OutputTarget::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{serialized}")
                .and_then(|_| stdout.flush())
                .context("Failed to write database tables to stdout.")?;
            Ok(None)
        }
        OutputTarget::File { dir } => {
            let path = dir.join(output_file_name(now));
            write_file(&path, &serialized)?;
            info!("File {} created", path.display().to_string().bold());
            print_summary(tables);
            Ok(Some(path))
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write file {}", path.display()))
}

/// Number of tables per connection type, ordered by connection type.
pub fn count_by_connection_type(tables: &[DatabaseTable]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for table in tables {
        *counts
            .entry(table.connection_type().unwrap_or_default())
            .or_insert(0) += 1;
    }
    counts
}

fn print_summary(tables: &[DatabaseTable]) {
    if tables.is_empty() {
        return;
    }

    let mut table = new_table();
    table.set_titles(row![bFg => "Connection Type", "Tables"]);
    for (connection_type, count) in count_by_connection_type(tables) {
        table.add_row(row![connection_type, r->count]);
    }
    table.printstd();
}

fn new_table() -> Table {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .column_separator(' ')
        .borders(' ')
        .separators(&[], format::LineSeparator::new('-', '+', '+', '+'))
        .padding(0, 1)
        .build();
    table.set_format(format);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tables() -> Vec<DatabaseTable> {
        serde_json::from_value(json!([
            {
                "id": "6d9a3b1c",
                "name": "orders",
                "connectionType": "bigquery",
                "fullName": "[analytics].[orders]",
                "database": {"id": "d1", "name": "analytics", "connectionType": "bigquery"},
                "columns": [{"id": "c1", "name": "order_id", "remoteType": "INT64"}]
            },
            {
                "id": "0f3e8a7d",
                "name": "customers",
                "connectionType": "snowflake",
                "schema": "PUBLIC",
                "columns": []
            },
            {
                "id": "9b2c4e5f",
                "name": "events",
                "connectionType": "bigquery",
                "schema": null
            }
        ]))
        .unwrap()
    }

    #[test]
    fn test_output_file_name() {
        let now = Utc.with_ymd_and_hms(2023, 5, 17, 9, 4, 31).unwrap();

        assert_eq!(output_file_name(now), "tables-2023-05-17T09_04_31Z.json");
    }

    #[test]
    fn test_serialized_tables_parse_back() {
        let tables = tables();

        let serialized = serialize_tables(&tables).unwrap();
        let parsed: Vec<DatabaseTable> = serde_json::from_str(&serialized).unwrap();

        assert_eq!(parsed, tables);
        assert!(serialized.starts_with(
            "[\n  {\n    \"connectionType\": \"bigquery\",\n    \"id\": \"6d9a3b1c\","
        ));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap();
        let target = OutputTarget::File {
            dir: dir.path().to_owned(),
        };

        let path = write_tables(&target, &tables(), now).unwrap().unwrap();

        assert_eq!(path, dir.path().join("tables-2023-01-02T03_04_05Z.json"));
        let written: Vec<DatabaseTable> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, tables());
    }

    #[test]
    fn test_write_file_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = OutputTarget::File {
            dir: dir.path().join("does-not-exist"),
        };

        let error = write_tables(&target, &tables(), Utc::now()).unwrap_err();

        assert!(error.to_string().starts_with("Failed to write file "));
    }

    #[test]
    fn test_count_by_connection_type() {
        let tables = tables();
        let counts = count_by_connection_type(&tables);

        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            vec![("bigquery", 2), ("snowflake", 1)]
        );
    }
}
