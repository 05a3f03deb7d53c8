#![deny(clippy::all)]
mod error;
mod filter;
mod pagination;
pub mod resources;
mod transport;

use log::{debug, info, warn};
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response as HttpResponse},
    header, Method, Proxy, StatusCode,
};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::resources::{
    auth::{SignInRequest, SignInResponse},
    metadata::{
        DatabaseTablesData, DatabaseTablesVariables, GraphQlRequest, GraphQlResponse,
        DATABASE_TABLES_QUERY,
    },
    server_info::{GetServerInfoResponse, SERVER_INFO_API_VERSION},
};

pub use crate::{
    error::{Error, Result},
    filter::{ConnectionTypeFilter, DEFAULT_CONNECTION_TYPES},
    pagination::{fetch_all, DatabaseTablesIter, DatabaseTablesSource, DEFAULT_PAGE_SIZE},
    resources::{
        auth::{Credentials, Session},
        metadata::{DatabaseTable, DatabaseTablesConnection},
        server_info::{ProductVersion, ServerInfo},
    },
    transport::AuthenticatedTransport,
};

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 120;

pub struct Config {
    pub endpoint: Url,
    pub accept_invalid_certificates: bool,
    pub proxy: Option<Url>,
    pub timeout: Duration,
}

impl Config {
    pub fn new(endpoint: Url) -> Self {
        Config {
            endpoint,
            accept_invalid_certificates: false,
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
        }
    }
}

/// Unauthenticated client, used to discover the server version and sign in.
#[derive(Debug)]
pub struct Client {
    endpoints: Endpoints,
    http_client: HttpClient,
}

impl Client {
    /// Create a new API client.
    pub fn new(config: Config) -> Result<Client> {
        let http_client = build_http_client(&config)?;
        let endpoints = Endpoints::new(config.endpoint)?;
        Ok(Client {
            endpoints,
            http_client,
        })
    }

    /// Get the product and REST API versions of the server.
    pub fn get_server_info(&self) -> Result<ServerInfo> {
        let url = &self.endpoints.server_info;
        let request = self
            .http_client
            .get(url.clone())
            .header(header::ACCEPT, "application/json");

        let (status, body) = send(request, &Method::GET, url)?;
        if !status.is_success() {
            return Err(Error::Api {
                status_code: status,
                message: body,
            });
        }

        let server_info = deserialize_body::<GetServerInfoResponse>(&body)?.server_info;
        info!(
            "Tableau server version: {} (build {})",
            server_info.product_version.value, server_info.product_version.build
        );
        info!("Tableau API version: {}", server_info.rest_api_version);
        Ok(server_info)
    }

    /// Get the newest REST API version supported by the server.
    pub fn resolve_api_version(&self) -> Result<String> {
        Ok(self.get_server_info()?.rest_api_version)
    }

    /// Exchange credentials for a session token.
    pub fn sign_in(&self, api_version: &str, credentials: &Credentials) -> Result<Session> {
        let url = self.endpoints.sign_in(api_version)?;
        let request = self
            .http_client
            .post(url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&SignInRequest::from(credentials));

        let (status, body) = send(request, &Method::POST, &url)?;
        if !status.is_success() {
            return Err(Error::SignIn {
                status_code: status,
                message: body,
            });
        }

        serde_json::from_str::<SignInResponse>(&body)
            .map_err(|error| Error::BadProtocol {
                status_code: status,
                message: format!("could not parse sign in response: {error}"),
            })?
            .into_session(status)
    }

    /// Create a client which authenticates every request with the session.
    pub fn authenticated(
        &self,
        api_version: &str,
        session: &Session,
    ) -> Result<AuthenticatedClient> {
        Ok(AuthenticatedClient {
            endpoints: self.endpoints.clone(),
            api_version: api_version.to_owned(),
            site_id: session.site_id.clone(),
            transport: AuthenticatedTransport::new(self.http_client.clone(), session)?,
        })
    }
}

/// Client for the endpoints that require a signed in session.
#[derive(Debug)]
pub struct AuthenticatedClient {
    endpoints: Endpoints,
    api_version: String,
    site_id: String,
    transport: AuthenticatedTransport,
}

impl AuthenticatedClient {
    /// Id of the site the session is signed in to.
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Query the metadata API for `first` database tables starting at `offset`.
    pub fn get_database_tables_page(
        &self,
        first: usize,
        offset: usize,
    ) -> Result<DatabaseTablesConnection> {
        let url = &self.endpoints.metadata;
        let request = self
            .transport
            .request(Method::POST, url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&GraphQlRequest {
                query: DATABASE_TABLES_QUERY,
                variables: DatabaseTablesVariables { first, offset },
            });

        let (status, body) = send(request, &Method::POST, url)?;
        if !status.is_success() {
            return Err(Error::Api {
                status_code: status,
                message: body,
            });
        }

        Ok(deserialize_body::<GraphQlResponse<DatabaseTablesData>>(&body)?
            .into_result(status)?
            .database_tables_connection)
    }

    /// Invalidate the session token.
    pub fn sign_out(&self) -> Result<()> {
        let url = self.endpoints.sign_out(&self.api_version)?;
        let request = self.transport.request(Method::POST, url.clone());

        let (status, body) = send(request, &Method::POST, &url)?;
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Api {
                status_code: status,
                message: body,
            })
        }
    }
}

impl DatabaseTablesSource for AuthenticatedClient {
    fn get_database_tables_page(
        &self,
        first: usize,
        offset: usize,
    ) -> Result<DatabaseTablesConnection> {
        AuthenticatedClient::get_database_tables_page(self, first, offset)
    }
}

/// Send a request and read the whole response body.
///
/// If the body of an unsuccessful response cannot be read, the status alone is
/// returned so that the caller still reports the status.
fn send(request: RequestBuilder, method: &Method, url: &Url) -> Result<(StatusCode, String)> {
    debug!("Attempting {method} `{url}`");
    let http_response = request.send().map_err(|source| Error::ReqwestError {
        source,
        message: format!("{method} operation failed."),
    })?;
    read_body(http_response)
}

fn read_body(http_response: HttpResponse) -> Result<(StatusCode, String)> {
    let status = http_response.status();
    let url = http_response.url().clone();
    match http_response.text() {
        Ok(body) => Ok((status, body)),
        Err(error) if !status.is_success() => {
            warn!("Could not read body of {status} response from `{url}`: {error}");
            Ok((status, String::new()))
        }
        Err(source) => Err(Error::ReqwestError {
            source,
            message: format!("Could not read response from `{url}`."),
        }),
    }
}

fn deserialize_body<SuccessT: DeserializeOwned>(body: &str) -> Result<SuccessT> {
    serde_json::from_str(body).map_err(Error::BadJsonResponse)
}

#[derive(Debug, Clone)]
struct Endpoints {
    base: Url,
    server_info: Url,
    metadata: Url,
}

fn construct_endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut endpoint = base.clone();

    let mut endpoint_segments = endpoint
        .path_segments_mut()
        .map_err(|_| Error::BadEndpoint {
            endpoint: base.clone(),
        })?;

    endpoint_segments.pop_if_empty();
    for segment in segments {
        endpoint_segments.push(segment);
    }

    drop(endpoint_segments);

    Ok(endpoint)
}

impl Endpoints {
    pub fn new(base: Url) -> Result<Self> {
        let server_info = construct_endpoint(&base, &["api", SERVER_INFO_API_VERSION, "serverInfo"])?;
        let metadata = construct_endpoint(&base, &["api", "metadata", "graphql"])?;

        Ok(Endpoints {
            base,
            server_info,
            metadata,
        })
    }

    fn sign_in(&self, api_version: &str) -> Result<Url> {
        construct_endpoint(&self.base, &["api", api_version, "auth", "signin"])
    }

    fn sign_out(&self, api_version: &str) -> Result<Url> {
        construct_endpoint(&self.base, &["api", api_version, "auth", "signout"])
    }
}

fn build_http_client(config: &Config) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .danger_accept_invalid_certs(config.accept_invalid_certificates)
        .timeout(Some(config.timeout));

    if let Some(proxy) = config.proxy.clone() {
        builder = builder.proxy(Proxy::all(proxy).map_err(Error::BuildHttpClient)?);
    }
    builder.build().map_err(Error::BuildHttpClient)
}
