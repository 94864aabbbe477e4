use std::{fmt, path::PathBuf};

use anyhow::Context;
use log::{debug, info, warn};

use crate::{
    ScrapeError,
    commented_tables::{ScanMode, find_commented_tables},
    config::ScrapingConfig,
    dataset::ConsolidatedDataset,
    league_scraper::{LeagueScraper, TeamReference},
    ratelimit::RateLimiter,
    requests::PageFetcher,
    stats_table::{StatsTable, TableConverter},
};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingLeague,
    ExtractingTeamLinks,
    FetchingTeam,
    LocatingTable,
    ConvertingTable,
    Tagging,
    Concatenating,
    Persisting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::FetchingLeague => "fetching league",
            Stage::ExtractingTeamLinks => "extracting team links",
            Stage::FetchingTeam => "fetching team",
            Stage::LocatingTable => "locating table",
            Stage::ConvertingTable => "converting table",
            Stage::Tagging => "tagging",
            Stage::Concatenating => "concatenating",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct SkippedTeam {
    pub team: TeamReference,
    pub reason: String,
}

#[derive(Debug)]
pub struct ScrapeReport {
    pub teams_found: usize,
    pub dataset: ConsolidatedDataset,
    pub skipped: Vec<SkippedTeam>,
}

pub struct Pipeline<F> {
    fetcher: F,
    config: ScrapingConfig,
    rate_limiter: RateLimiter,
    converter: TableConverter,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(fetcher: F, config: ScrapingConfig) -> anyhow::Result<Self> {
        let rate_limiter = RateLimiter::new(config.request_delay);
        let converter = TableConverter::new()?;
        Ok(Self {
            fetcher,
            config,
            rate_limiter,
            converter,
        })
    }

    /// Scrapes and writes the output file. Nothing is written unless at
    /// least one team made it through.
    pub async fn run(&self) -> anyhow::Result<PathBuf> {
        let report = self.collect().await?;

        enter(Stage::Persisting);
        let path = self.config.output_path.clone();
        report.dataset.save(&path)?;

        enter(Stage::Done);
        info!(
            "Saved {} rows from {} of {} teams to {}",
            report.dataset.len(),
            report.teams_found - report.skipped.len(),
            report.teams_found,
            path.display()
        );
        Ok(path)
    }

    /// Everything but the file write.
    pub async fn collect(&self) -> anyhow::Result<ScrapeReport> {
        let teams = self.discover_teams().await?;
        info!("Found {} teams", teams.len());

        let mut tables = vec![];
        let mut skipped = vec![];
        for (index, team) in teams.iter().enumerate() {
            if index > 0 {
                self.rate_limiter.wait_until_ready().await;
            }

            info!("Scraping {}", team.name);
            match self.scrape_team(team).await {
                Ok(table) => tables.push(table),
                Err(err) => {
                    warn!("Skipping {}: {err:#}", team.name);
                    skipped.push(SkippedTeam {
                        team: team.clone(),
                        reason: format!("{err:#}"),
                    });
                }
            }
        }

        enter(Stage::Concatenating);
        let dataset = ConsolidatedDataset::concat(tables)?;
        Ok(ScrapeReport {
            teams_found: teams.len(),
            dataset,
            skipped,
        })
    }

    async fn discover_teams(&self) -> anyhow::Result<Vec<TeamReference>> {
        enter(Stage::FetchingLeague);
        let html = self
            .fetcher
            .fetch_page(&self.config.league_url)
            .await
            .context("could not fetch the league page")?;

        enter(Stage::ExtractingTeamLinks);
        let mut league = LeagueScraper::new(self.config.league_url.clone());
        league
            .scrape(&html, &self.config)
            .context("could not read squads from the league page")?;
        Ok(league.teams)
    }

    /// One team, end to end. Any failure in here only costs this team.
    async fn scrape_team(&self, team: &TeamReference) -> anyhow::Result<StatsTable> {
        enter(Stage::FetchingTeam);
        let html = self.fetcher.fetch_page(&team.url).await?;

        enter(Stage::LocatingTable);
        let tables = find_commented_tables(&html, &self.config.table_marker, ScanMode::FirstMatch)?;

        enter(Stage::ConvertingTable);
        let Some(table_html) = tables.first() else {
            return Err(ScrapeError::TableNotFound {
                marker: self.config.table_marker.clone(),
            }
            .into());
        };
        let mut table = self.converter.convert(table_html)?;

        enter(Stage::Tagging);
        table.tag("Team", &team.name);
        Ok(table)
    }
}

fn enter(stage: Stage) {
    debug!("stage: {stage}");
}
