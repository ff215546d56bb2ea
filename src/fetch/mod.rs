// src/fetch/mod.rs
//! Thin HTTP collaborators around the two parsing engines.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::precincts::{self, PrecinctResults, RaceOption};
use crate::summary::{self, Race};

/// Election-night location of the fixed-width summary export.
pub const SUMMARY_URL: &str = "https://chicagoelections.gov/ap/SummaryExport.txt";
/// Pre-election location of the same export, kept live for testing.
pub const TEST_SUMMARY_URL: &str = "https://chicagoelections.gov/results/ap/SummaryExport.txt";

const ELECTION_INDEX_URL: &str = "https://chicagoelections.gov/en/election-results.html";
const ELECTION_RESULTS_URL: &str = "https://chicagoelections.gov/en/election-results.asp";
const DATA_EXPORT_URL: &str = "https://chicagoelections.gov/en/data-export.asp";

static ELECTION_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"a[href^="election-results.asp?election="]"#)
        .expect("selector should parse")
});
static RACE_OPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"select[name="race"] option"#).expect("selector should parse"));

/// An election listed on the results index.
#[derive(Debug, Clone)]
pub struct Election {
    pub code: String,
    pub name: String,
}

async fn get_text(client: &Client, url: &str, query: &[(&str, &str)]) -> Result<String> {
    client
        .get(url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("GET {url}"))?
        .error_for_status()?
        .text()
        .await
        .with_context(|| format!("reading body from {url}"))
}

/// Fetch and parse the racewide summary export.
pub async fn fetch_summary(client: &Client, url: &str) -> Result<Vec<Race>> {
    let text = get_text(client, url, &[]).await?;
    Ok(summary::parse(&text))
}

/// List every election linked from the results index page.
pub async fn elections(client: &Client) -> Result<Vec<Election>> {
    let html = get_text(client, ELECTION_INDEX_URL, &[]).await?;
    let base = Url::parse(ELECTION_INDEX_URL).context("parsing election index URL")?;
    let doc = Html::parse_document(&html);

    let mut out = Vec::new();
    for link in doc.select(&ELECTION_LINK) {
        let Some(href) = link.value().attr("href") else { continue };
        let Ok(resolved) = base.join(href) else { continue };
        let Some(code) = resolved
            .query_pairs()
            .find(|(k, _)| k.as_ref() == "election")
            .map(|(_, v)| v.to_string())
        else {
            continue;
        };
        out.push(Election {
            code,
            name: link.text().collect::<String>().trim().to_string(),
        });
    }
    debug!(elections = out.len(), "scraped election index");
    Ok(out)
}

/// List the race options for one election, with the registered-voters
/// turnout entry split out of the race list.
pub async fn race_options(
    client: &Client,
    elec_code: &str,
) -> Result<(Vec<RaceOption>, Option<RaceOption>)> {
    let html = get_text(client, ELECTION_RESULTS_URL, &[("election", elec_code)]).await?;
    let doc = Html::parse_document(&html);

    let options = doc
        .select(&RACE_OPTION)
        .filter_map(|opt| {
            let number = opt.value().attr("value")?.to_string();
            let name = opt.text().collect::<String>().trim().to_string();
            Some(RaceOption { name, number })
        })
        .collect();
    Ok(precincts::split_turnout(options))
}

/// Fetch one race's precinct-level tables and parse them.
pub async fn fetch_precincts(
    client: &Client,
    elec_code: &str,
    race_number: &str,
) -> Result<PrecinctResults> {
    let html = get_text(
        client,
        DATA_EXPORT_URL,
        &[("election", elec_code), ("race", race_number)],
    )
    .await?;
    precincts::parse_data_export(&html)
        .with_context(|| format!("parsing precinct tables for race {race_number}"))
}
