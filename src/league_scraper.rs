use std::collections::HashSet;

use log::debug;
use scraper::Html;

use crate::{
    ScrapeError,
    commented_tables::{ScanMode, find_commented_tables},
    config::ScrapingConfig,
    text_manipulators::{get_absolute_link, parse_selector, team_name_from_url},
};

/// A squad found on the league page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamReference {
    pub name: String,
    pub url: String,
}

impl TeamReference {
    pub fn from_url(url: String, suffix: &str) -> Self {
        TeamReference {
            name: team_name_from_url(&url, suffix),
            url,
        }
    }
}

/// Every squad link in `table_html`, made absolute, in table order.
/// Duplicates are kept.
pub fn extract_squad_links(
    table_html: &str,
    squad_path_marker: &str,
    origin: &str,
) -> anyhow::Result<Vec<String>> {
    let link_selector = parse_selector("a[href]")?;
    let fragment = Html::parse_fragment(table_html);
    let links = fragment
        .select(&link_selector)
        .filter_map(|node| node.value().attr("href"))
        .filter(|href| href.contains(squad_path_marker))
        .map(|href| get_absolute_link(origin, href))
        .collect();
    Ok(links)
}

#[derive(Debug)]
pub struct LeagueScraper {
    pub url: String,
    pub teams: Vec<TeamReference>,
}

impl LeagueScraper {
    pub fn new(url: String) -> Self {
        LeagueScraper { url, teams: vec![] }
    }

    /// Reads the squads off an already fetched league page. The first
    /// commented stats table is the one carrying the squad links.
    pub fn scrape(&mut self, html: &str, config: &ScrapingConfig) -> anyhow::Result<()> {
        let tables = find_commented_tables(html, &config.table_marker, ScanMode::AllMatches)?;
        let Some(table) = tables.first() else {
            return Err(ScrapeError::TableNotFound {
                marker: config.table_marker.clone(),
            }
            .into());
        };

        debug!("Reading squad links from {}", self.url);
        let links = extract_squad_links(table, &config.squad_path_marker, &config.site_origin)?;
        let mut seen = HashSet::new();
        for url in links {
            if !seen.insert(url.clone()) {
                debug!("Dropping repeated squad link {url} on {}", self.url);
                continue;
            }
            self.teams.push(TeamReference::from_url(url, &config.squad_name_suffix));
        }
        Ok(())
    }
}
