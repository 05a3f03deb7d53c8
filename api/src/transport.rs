use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder},
    header::{self, HeaderMap, HeaderName, HeaderValue},
    IntoUrl, Method,
};

use crate::{
    error::{Error, Result},
    resources::auth::Session,
};

/// Header the REST API reads the session token from. The metadata API accepts
/// either this or a bearer `Authorization` header, so both are sent.
const TABLEAU_AUTH_HEADER: HeaderName = HeaderName::from_static("x-tableau-auth");

/// Wraps an HTTP client so that every request built through it carries the
/// session token.
///
/// The token is neither refreshed nor validated; once it expires requests fail
/// like any other rejected request.
#[derive(Debug, Clone)]
pub struct AuthenticatedTransport {
    http_client: HttpClient,
    headers: HeaderMap,
}

impl AuthenticatedTransport {
    pub fn new(http_client: HttpClient, session: &Session) -> Result<Self> {
        Ok(Self {
            http_client,
            headers: build_headers(&session.token)?,
        })
    }

    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .headers(self.headers.clone())
    }
}

fn build_headers(token: &str) -> Result<HeaderMap> {
    let sensitive_value = |value: String| {
        HeaderValue::from_str(&value)
            .map(|mut value| {
                value.set_sensitive(true);
                value
            })
            .map_err(|_| Error::BadToken)
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        sensitive_value(format!("Bearer {token}"))?,
    );
    headers.insert(TABLEAU_AUTH_HEADER, sensitive_value(token.to_owned())?);
    Ok(headers)
}
