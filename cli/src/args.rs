use std::path::PathBuf;
use structopt::StructOpt;
use url::Url;

/// Small utility to collect Tableau information which is only available with
/// Admin permissions.
///
/// Signs in to Tableau, lists the database tables known to the metadata API and
/// writes the ones backed by a supported warehouse to a JSON file.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "connections-tableau",
    global_settings = &[structopt::clap::AppSettings::ColoredHelp]
)]
pub struct Args {
    #[structopt(long = "url", env = "TABLEAU_URL")]
    /// Full URL of Tableau (e.g. `https://prod-uk-a.online.tableau.com`)
    pub url: Option<String>,

    #[structopt(long = "site", env = "TABLEAU_SITE")]
    /// Site name (e.g. `synqtest` from https://prod-uk-a.online.tableau.com/t/synqtest/).
    /// Leave empty for the default site of Tableau Server.
    pub site: Option<String>,

    #[structopt(long = "token-name", alias = "token_name", env = "TABLEAU_TOKEN_NAME")]
    /// Name of the Personal Access Token (e.g. `synq`)
    pub token_name: Option<String>,

    #[structopt(long = "token", env = "TABLEAU_TOKEN", hide_env_values = true)]
    /// Value of Personal Access Token for Tableau with Admin permissions
    pub token: Option<String>,

    #[structopt(long = "username")]
    /// Sign in with this username and a password instead of a Personal Access Token
    pub username: Option<String>,

    #[structopt(long = "password", env = "TABLEAU_PASSWORD", hide_env_values = true)]
    /// Password for `--username`. Prompted for if missing.
    pub password: Option<String>,

    #[structopt(long = "stdout")]
    /// Print the tables to stdout instead of writing a file
    pub stdout: bool,

    #[structopt(long = "output-dir", parse(from_os_str), conflicts_with = "stdout")]
    /// Directory to write the `tables-<timestamp>.json` file to. Defaults to the
    /// current directory.
    pub output_dir: Option<PathBuf>,

    #[structopt(long = "page-size")]
    /// Number of tables to request from the metadata API at a time
    pub page_size: Option<usize>,

    #[structopt(long = "connection-type", number_of_values = 1)]
    /// Connection type to keep (repeatable). Defaults to bigquery, snowflake,
    /// redshift and clickhouse.
    pub connection_types: Vec<String>,

    #[structopt(long = "timeout", default_value = "120")]
    /// Timeout in seconds for each HTTP request
    pub timeout: u64,

    #[structopt(long = "proxy")]
    /// URL for an HTTP proxy that will be used for all requests if specified
    pub proxy: Option<Url>,

    #[structopt(short = "k", long = "accept-invalid-certificates")]
    /// Whether to accept invalid TLS certificates
    pub accept_invalid_certificates: bool,

    #[structopt(short = "v", long = "verbose")]
    /// Enable more verbose logging.
    pub verbose: bool,
}
