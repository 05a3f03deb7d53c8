use serde::{Deserialize, Serialize};

/// Version of the REST API used to look up the server info. Every Tableau release
/// since 10.1 answers on this version, whatever the newest version it supports.
pub(crate) const SERVER_INFO_API_VERSION: &str = "2.4";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub product_version: ProductVersion,
    pub rest_api_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductVersion {
    pub value: String,
    #[serde(default)]
    pub build: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GetServerInfoResponse {
    pub server_info: ServerInfo,
}
