use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tableau_client::{fetch_all, Client, DatabaseTable, Error};

use crate::{config::RunConfig, printer::write_tables};

/// Sign in, fetch every database table and keep those with a wanted
/// connection type.
///
/// The session is signed out afterwards whether or not fetching succeeded; a
/// failed sign out is only logged.
pub fn discover_tables(config: &RunConfig) -> Result<Vec<DatabaseTable>> {
    if config.page_size == 0 {
        return Err(Error::InvalidPageSize.into());
    }

    let client = Client::new(config.client_config()).context("Failed to create the HTTP client")?;

    let api_version = client
        .resolve_api_version()
        .context("Failed to resolve API version")?;

    let session = client
        .sign_in(&api_version, &config.credentials)
        .context("Failed to sign in")?;
    let client = client
        .authenticated(&api_version, &session)
        .context("Failed to sign in")?;
    info!(
        "Signed in to site `{}` (id {})",
        config.credentials.site(),
        client.site_id()
    );

    let tables = fetch_all(&client, config.page_size, &config.connection_types)
        .context("Failed to fetch database tables");

    if let Err(error) = client.sign_out() {
        warn!("Failed to sign out: {error}");
    }

    let tables = tables?;
    info!("Discovered {} database tables", tables.len());
    Ok(tables)
}

pub fn run(config: &RunConfig) -> Result<()> {
    let tables = discover_tables(config)?;
    write_tables(&config.output, &tables, Utc::now())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::OutputTarget;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use tableau_client::{ConnectionTypeFilter, Credentials};
    use url::Url;

    const SERVER_INFO_BODY: &str = r#"{
        "serverInfo": {
            "productVersion": { "value": "2023.3.0", "build": "20233.23.1017.0948" },
            "restApiVersion": "3.21"
        }
    }"#;

    const SIGN_IN_BODY: &str = r#"{"credentials": {
        "site": { "id": "9a8b7c6d", "contentUrl": "synqtest" },
        "user": { "id": "1f2e3d4c" },
        "token": "session-token"
    }}"#;

    fn config(server: &Server, dir: &std::path::Path) -> RunConfig {
        RunConfig {
            endpoint: Url::parse(&server.url()).unwrap(),
            credentials: Credentials::PersonalAccessToken {
                site: "synqtest".to_owned(),
                token_name: "synq".to_owned(),
                token_secret: "s3cr3t".to_owned(),
            },
            output: OutputTarget::File {
                dir: dir.to_owned(),
            },
            page_size: 100,
            connection_types: ConnectionTypeFilter::default(),
            accept_invalid_certificates: false,
            proxy: None,
            timeout: Duration::from_secs(10),
        }
    }

    fn page(offset: usize, connection_types: &[(&str, usize)]) -> String {
        let nodes: Vec<_> = connection_types
            .iter()
            .flat_map(|&(connection_type, count)| (0..count).map(move |_| connection_type))
            .enumerate()
            .map(|(index, connection_type)| {
                json!({
                    "id": format!("table-{}", offset + index),
                    "connectionType": connection_type,
                })
            })
            .collect();
        json!({ "data": { "databaseTablesConnection": {
            "nodes": nodes,
            "totalCount": 150
        }}})
        .to_string()
    }

    #[test]
    fn test_discover_tables() {
        let mut server = Server::new();
        let dir = tempfile::tempdir().unwrap();
        let server_info = server
            .mock("GET", "/api/2.4/serverInfo")
            .with_status(200)
            .with_body(SERVER_INFO_BODY)
            .expect(1)
            .create();
        let sign_in = server
            .mock("POST", "/api/3.21/auth/signin")
            .with_status(200)
            .with_body(SIGN_IN_BODY)
            .expect(1)
            .create();
        let first_page = server
            .mock("POST", "/api/metadata/graphql")
            .match_header("authorization", "Bearer session-token")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "first": 100, "offset": 0 }
            })))
            .with_status(200)
            .with_body(page(0, &[("bigquery", 60), ("hyper", 40)]))
            .expect(1)
            .create();
        let second_page = server
            .mock("POST", "/api/metadata/graphql")
            .match_header("authorization", "Bearer session-token")
            .match_body(Matcher::PartialJson(json!({
                "variables": { "first": 100, "offset": 100 }
            })))
            .with_status(200)
            .with_body(page(100, &[("snowflake", 30), ("excel-direct", 20)]))
            .expect(1)
            .create();
        let sign_out = server
            .mock("POST", "/api/3.21/auth/signout")
            .with_status(204)
            .expect(1)
            .create();

        let tables = discover_tables(&config(&server, dir.path())).unwrap();

        assert_eq!(tables.len(), 90);
        assert!(tables[..60]
            .iter()
            .all(|table| table.connection_type() == Some("bigquery")));
        assert!(tables[60..]
            .iter()
            .all(|table| table.connection_type() == Some("snowflake")));
        assert_eq!(tables[60].fields["id"], json!("table-100"));
        for mock in [server_info, sign_in, first_page, second_page, sign_out] {
            mock.assert();
        }
    }

    #[test]
    fn test_sign_in_rejected() {
        let mut server = Server::new();
        let dir = tempfile::tempdir().unwrap();
        server
            .mock("GET", "/api/2.4/serverInfo")
            .with_status(200)
            .with_body(SERVER_INFO_BODY)
            .create();
        server
            .mock("POST", "/api/3.21/auth/signin")
            .with_status(401)
            .with_body("login failed")
            .create();
        let metadata = server
            .mock("POST", "/api/metadata/graphql")
            .expect(0)
            .create();

        let error = run(&config(&server, dir.path())).unwrap_err();

        let message = format!("{error:#}");
        assert!(message.starts_with("Failed to sign in"));
        assert!(message.contains("401"));
        assert!(message.contains("login failed"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        metadata.assert();
    }

    #[test]
    fn test_zero_page_size_sends_no_request() {
        let mut server = Server::new();
        let dir = tempfile::tempdir().unwrap();
        let server_info = server
            .mock("GET", "/api/2.4/serverInfo")
            .expect(0)
            .create();

        let error = discover_tables(&RunConfig {
            page_size: 0,
            ..config(&server, dir.path())
        })
        .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<Error>(),
            Some(Error::InvalidPageSize)
        ));
        server_info.assert();
    }

    #[test]
    fn test_fetch_failure_still_signs_out() {
        let mut server = Server::new();
        let dir = tempfile::tempdir().unwrap();
        server
            .mock("GET", "/api/2.4/serverInfo")
            .with_status(200)
            .with_body(SERVER_INFO_BODY)
            .create();
        server
            .mock("POST", "/api/3.21/auth/signin")
            .with_status(200)
            .with_body(SIGN_IN_BODY)
            .create();
        server
            .mock("POST", "/api/metadata/graphql")
            .with_status(200)
            .with_body(r#"{"errors": [{"message": "Showing partial results"}]}"#)
            .create();
        let sign_out = server
            .mock("POST", "/api/3.21/auth/signout")
            .with_status(500)
            .expect(1)
            .create();

        let error = run(&config(&server, dir.path())).unwrap_err();

        assert!(format!("{error:#}").starts_with("Failed to fetch database tables"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        sign_out.assert();
    }
}
