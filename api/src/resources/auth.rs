use crate::error::{Error, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};

/// Credentials exchanged for a session token at sign in.
///
/// `site` is the content URL of the site to sign in to, e.g. `synqtest` for
/// `https://prod-uk-a.online.tableau.com/#/site/synqtest/`. It is empty for the
/// default site of a self-hosted server.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password {
        site: String,
        username: String,
        password: String,
    },
    PersonalAccessToken {
        site: String,
        token_name: String,
        token_secret: String,
    },
}

impl Credentials {
    pub fn site(&self) -> &str {
        match self {
            Credentials::Password { site, .. } | Credentials::PersonalAccessToken { site, .. } => {
                site
            }
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { site, username, .. } => formatter
                .debug_struct("Password")
                .field("site", site)
                .field("username", username)
                .field("password", &"<hidden>")
                .finish(),
            Credentials::PersonalAccessToken {
                site, token_name, ..
            } => formatter
                .debug_struct("PersonalAccessToken")
                .field("site", site)
                .field("token_name", token_name)
                .field("token_secret", &"<hidden>")
                .finish(),
        }
    }
}

/// An authenticated session, as returned by a successful sign in.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub site_id: String,
    pub user_id: Option<String>,
}

impl Debug for Session {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"<hidden>")
            .field("site_id", &self.site_id)
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SignInRequest<'a> {
    credentials: SignInCredentials<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInCredentials<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    personal_access_token_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    personal_access_token_secret: Option<&'a str>,
    site: SiteContentUrl<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SiteContentUrl<'a> {
    content_url: &'a str,
}

impl<'a> From<&'a Credentials> for SignInRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        let site = SiteContentUrl {
            content_url: credentials.site(),
        };
        let credentials = match credentials {
            Credentials::Password {
                username, password, ..
            } => SignInCredentials {
                name: Some(username.as_str()),
                password: Some(password.as_str()),
                personal_access_token_name: None,
                personal_access_token_secret: None,
                site,
            },
            Credentials::PersonalAccessToken {
                token_name,
                token_secret,
                ..
            } => SignInCredentials {
                name: None,
                password: None,
                personal_access_token_name: Some(token_name.as_str()),
                personal_access_token_secret: Some(token_secret.as_str()),
                site,
            },
        };
        SignInRequest { credentials }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SignInResponse {
    credentials: SignedInCredentials,
}

#[derive(Debug, Deserialize)]
struct SignedInCredentials {
    #[serde(default)]
    token: Option<String>,
    site: IdReference,
    #[serde(default)]
    user: Option<IdReference>,
}

#[derive(Debug, Deserialize)]
struct IdReference {
    id: String,
}

impl SignInResponse {
    pub(crate) fn into_session(self, status_code: StatusCode) -> Result<Session> {
        let SignedInCredentials { token, site, user } = self.credentials;
        match token {
            Some(token) if !token.is_empty() => Ok(Session {
                token,
                site_id: site.id,
                user_id: user.map(|user| user.id),
            }),
            _ => Err(Error::BadProtocol {
                status_code,
                message: "sign in response did not contain a session token".to_owned(),
            }),
        }
    }
}
