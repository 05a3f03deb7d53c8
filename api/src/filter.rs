use crate::resources::metadata::DatabaseTable;
use std::collections::BTreeSet;

/// Warehouse connection types kept when no other list is given.
pub const DEFAULT_CONNECTION_TYPES: [&str; 4] = ["bigquery", "snowflake", "redshift", "clickhouse"];

/// Allow-list of connection types. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTypeFilter {
    connection_types: BTreeSet<String>,
}

impl Default for ConnectionTypeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECTION_TYPES)
    }
}

impl ConnectionTypeFilter {
    pub fn new(connection_types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            connection_types: connection_types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn connection_types(&self) -> impl Iterator<Item = &str> {
        self.connection_types.iter().map(String::as_str)
    }

    pub fn accepts(&self, table: &DatabaseTable) -> bool {
        table
            .connection_type()
            .is_some_and(|connection_type| self.connection_types.contains(connection_type))
    }

    /// Keep the accepted tables, in their original order.
    pub fn apply(&self, tables: impl IntoIterator<Item = DatabaseTable>) -> Vec<DatabaseTable> {
        tables
            .into_iter()
            .filter(|table| self.accepts(table))
            .collect()
    }
}
