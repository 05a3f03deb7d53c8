use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) const DATABASE_TABLES_QUERY: &str = r#"query GetDatabaseTablesDefinitions($first: Int, $offset: Int) {
  databaseTablesConnection(first: $first, offset: $offset) {
    nodes {
      id
      luid
      name
      fullName
      schema
      connectionType
      isEmbedded
      isCertified
      description
      projectName
      database {
        id
        luid
        name
        connectionType
      }
      columns {
        id
        name
        remoteType
        description
      }
    }
    totalCount
  }
}"#;

/// A database table as reported by the metadata API.
///
/// Only the connection type is interpreted; every other field of the node is
/// kept as-is in `fields` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DatabaseTable {
    #[serde(rename = "connectionType", default)]
    pub connection_type: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DatabaseTable {
    pub fn connection_type(&self) -> Option<&str> {
        self.connection_type.as_deref()
    }
}

/// One page of database tables.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTablesConnection {
    pub nodes: Vec<DatabaseTable>,
    pub total_count: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a, VariablesT> {
    pub query: &'a str,
    pub variables: VariablesT,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct DatabaseTablesVariables {
    pub first: usize,
    pub offset: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DatabaseTablesData {
    pub database_tables_connection: DatabaseTablesConnection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<DataT> {
    data: Option<DataT>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl<DataT> GraphQlResponse<DataT> {
    pub(crate) fn into_result(self, status_code: StatusCode) -> Result<DataT> {
        match (self.data, self.errors) {
            (_, Some(errors)) if !errors.is_empty() => Err(Error::Query {
                messages: errors.into_iter().map(|error| error.message).collect(),
            }),
            (Some(data), _) => Ok(data),
            (None, _) => Err(Error::BadProtocol {
                status_code,
                message: "GraphQL response contained neither data nor errors".to_owned(),
            }),
        }
    }
}
