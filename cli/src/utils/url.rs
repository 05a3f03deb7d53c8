use anyhow::{anyhow, Context, Result};
use url::Url;

/// Parse the Tableau URL given by the user, dropping any fragment so that a URL
/// copied from the browser (`https://host/#/site/synqtest/home`) points at the
/// server itself.
pub fn parse_server_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.is_empty() {
        return Err(anyhow!("Value is required"));
    }

    let mut url = Url::parse(input).with_context(|| format!("Invalid URL `{input}`"))?;
    if url.cannot_be_a_base() || url.host_str().unwrap_or_default().is_empty() {
        return Err(anyhow!(
            "Full URL is required, e.g. `https://prod-uk-a.online.tableau.com`"
        ));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Guess the site content URL from a URL copied from the browser, either
/// `https://host/#/site/<site>/...` or `https://host/t/<site>/...`.
pub fn guess_site(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let fragment_segments = url
        .fragment()
        .map(|fragment| fragment.split('/').collect::<Vec<_>>())
        .unwrap_or_default();
    let path_segments = url
        .path_segments()
        .map(|segments| segments.collect::<Vec<_>>())
        .unwrap_or_default();

    site_after(&fragment_segments, "site").or_else(|| site_after(&path_segments, "t"))
}

fn site_after(segments: &[&str], marker: &str) -> Option<String> {
    segments
        .windows(2)
        .find(|pair| pair[0] == marker && !pair[1].is_empty())
        .map(|pair| pair[1].to_owned())
}
