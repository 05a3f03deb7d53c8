use anyhow::Result;
use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
    path::PathBuf,
    time::Duration,
};
use tableau_client::{Config, ConnectionTypeFilter, Credentials, Error, DEFAULT_PAGE_SIZE};
use url::Url;

use crate::{
    args::Args,
    printer::OutputTarget,
    utils::{
        guess_site,
        io::{prompt_secret, prompt_site, prompt_text, prompt_url},
        parse_server_url,
    },
};

const DEFAULT_TOKEN_NAME: &str = "synq";

/// Whether parameters missing from the command line are asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompts {
    Enabled,
    Disabled,
}

/// Everything a run needs, resolved once from the arguments and prompts.
#[derive(Debug)]
pub struct RunConfig {
    pub endpoint: Url,
    pub credentials: Credentials,
    pub output: OutputTarget,
    pub page_size: usize,
    pub connection_types: ConnectionTypeFilter,
    pub accept_invalid_certificates: bool,
    pub proxy: Option<Url>,
    pub timeout: Duration,
}

/// Required parameters that were neither passed nor entered at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingParameters(pub Vec<&'static str>);

impl Display for MissingParameters {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Not all required parameters provided (missing {})",
            self.0.join(", ")
        )
    }
}

impl StdError for MissingParameters {}

impl RunConfig {
    pub fn from_args(args: &Args, prompts: Prompts) -> Result<Self> {
        let page_size = args.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(Error::InvalidPageSize.into());
        }

        let mut missing = Vec::new();

        let url = value_or_prompt(&args.url, prompts, prompt_url)?;
        let endpoint = url.as_deref().map(parse_server_url).transpose()?;
        if endpoint.is_none() {
            missing.push("url");
        }

        let site = match &args.site {
            Some(site) => site.clone(),
            None => {
                let guessed_site = url.as_deref().and_then(guess_site);
                match prompts {
                    Prompts::Enabled => prompt_site(guessed_site.as_deref())?,
                    Prompts::Disabled => guessed_site.unwrap_or_default(),
                }
            }
        };

        let credentials = match args.username.as_deref().filter(|name| !name.is_empty()) {
            Some(username) => {
                let password =
                    value_or_prompt(&args.password, prompts, || prompt_secret("Password"))?;
                if password.is_none() {
                    missing.push("password");
                }
                password.map(|password| Credentials::Password {
                    site,
                    username: username.to_owned(),
                    password,
                })
            }
            None => {
                let token_name = value_or_prompt(&args.token_name, prompts, || {
                    prompt_text("Name of the Personal Access Token", Some(DEFAULT_TOKEN_NAME))
                })?;
                if token_name.is_none() {
                    missing.push("token-name");
                }
                let token = value_or_prompt(&args.token, prompts, || {
                    prompt_secret("Value of Personal Access Token for Tableau with Admin permissions")
                })?;
                if token.is_none() {
                    missing.push("token");
                }
                token_name
                    .zip(token)
                    .map(|(token_name, token_secret)| Credentials::PersonalAccessToken {
                        site,
                        token_name,
                        token_secret,
                    })
            }
        };

        let (Some(endpoint), Some(credentials)) = (endpoint, credentials) else {
            return Err(MissingParameters(missing).into());
        };

        let output = if args.stdout {
            OutputTarget::Stdout
        } else {
            OutputTarget::File {
                dir: args.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            }
        };

        let connection_types = if args.connection_types.is_empty() {
            ConnectionTypeFilter::default()
        } else {
            ConnectionTypeFilter::new(args.connection_types.iter().cloned())
        };

        Ok(RunConfig {
            endpoint,
            credentials,
            output,
            page_size,
            connection_types,
            accept_invalid_certificates: args.accept_invalid_certificates,
            proxy: args.proxy.clone(),
            timeout: Duration::from_secs(args.timeout),
        })
    }

    pub fn client_config(&self) -> Config {
        Config {
            endpoint: self.endpoint.clone(),
            accept_invalid_certificates: self.accept_invalid_certificates,
            proxy: self.proxy.clone(),
            timeout: self.timeout,
        }
    }
}

/// The given value if not empty, otherwise whatever is entered at the prompt
/// (if prompts are enabled).
fn value_or_prompt(
    value: &Option<String>,
    prompts: Prompts,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<Option<String>> {
    let non_empty = |value: String| Some(value).filter(|value| !value.is_empty());
    match value.clone().and_then(non_empty) {
        Some(value) => Ok(Some(value)),
        None if prompts == Prompts::Enabled => prompt().map(non_empty),
        None => Ok(None),
    }
}
