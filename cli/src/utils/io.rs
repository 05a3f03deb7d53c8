use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use dialoguer::{Input, Password};
use env_logger::{fmt::Formatter as LogFormatter, Builder as LogBuilder};
use log::{Level as LogLevel, LevelFilter as LogLevelFilter, Record as LogRecord};
use once_cell::sync::Lazy;
use std::{env, io::Write, ops::Deref};

use super::url::parse_server_url;

pub fn init_env_logger(verbose: bool) {
    // this closure formats logging, choose colour and determines level of verbosity
    let format = |formatter: &mut LogFormatter, record: &LogRecord<'_>| {
        let level = match record.level() {
            LogLevel::Debug => LOG_PREFIX_DEBUG.deref(),
            LogLevel::Info => LOG_PREFIX_INFO.deref(),
            LogLevel::Warn => LOG_PREFIX_WARN.deref(),
            LogLevel::Error => LOG_PREFIX_ERROR.deref(),
            LogLevel::Trace => LOG_PREFIX_TRACE.deref(),
        };
        writeln!(formatter, "{} {}", level, record.args())
    };

    let mut builder = LogBuilder::new();
    builder.format(format).filter(
        None,
        if verbose {
            LogLevelFilter::Debug
        } else {
            LogLevelFilter::Info
        },
    );

    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}

pub fn prompt_url() -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt_message(
            "Full URL of Tableau (e.g. `https://prod-uk-a.online.tableau.com`)",
        ))
        .validate_with(|input: &String| -> Result<(), String> {
            parse_server_url(input)
                .map(|_| ())
                .map_err(|error| error.to_string())
        })
        .interact_text()
        .context("Failed to read the Tableau URL.")
}

pub fn prompt_site(default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new()
        .with_prompt(prompt_message(
            "Site name (e.g. `synqtest` from https://prod-uk-a.online.tableau.com/t/synqtest/), empty for the default site",
        ))
        .allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_owned());
    }
    input
        .interact_text()
        .context("Failed to read the site name.")
}

pub fn prompt_text(message: &str, default: Option<&str>) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt_message(message));
    if let Some(default) = default {
        input = input.default(default.to_owned());
    }
    input
        .interact_text()
        .with_context(|| format!("Failed to read `{message}`."))
}

pub fn prompt_secret(message: &str) -> Result<String> {
    Password::new()
        .with_prompt(prompt_message(message))
        .interact()
        .with_context(|| format!("Failed to read `{message}`."))
}

fn prompt_message(message: &str) -> String {
    format!("{} {}", LOG_PREFIX_INPUT.deref(), message)
}

pub static LOG_PREFIX_DEBUG: Lazy<ColoredString> = Lazy::new(|| "D".normal());
pub static LOG_PREFIX_INFO: Lazy<ColoredString> = Lazy::new(|| "I".green());
pub static LOG_PREFIX_WARN: Lazy<ColoredString> = Lazy::new(|| "W".yellow().bold());
pub static LOG_PREFIX_ERROR: Lazy<ColoredString> = Lazy::new(|| "E".red().bold());
pub static LOG_PREFIX_TRACE: Lazy<ColoredString> = Lazy::new(|| "T".normal());
pub static LOG_PREFIX_INPUT: Lazy<ColoredString> = Lazy::new(|| "*".blue().bold());
