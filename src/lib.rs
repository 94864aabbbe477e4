mod scrape_error;
mod text_manipulators;

pub mod commented_tables;
pub mod config;
pub mod dataset;
pub mod league_scraper;
pub mod pipeline;
pub mod ratelimit;
pub mod requests;
pub mod scraping_context;
pub mod stats_table;

pub use commented_tables::{ScanMode, find_commented_tables};
pub use dataset::ConsolidatedDataset;
pub use league_scraper::{LeagueScraper, TeamReference, extract_squad_links};
pub use pipeline::{Pipeline, ScrapeReport, SkippedTeam, Stage};
pub use requests::{PageFetcher, RequestClient};
pub use scrape_error::ScrapeError;
pub use scraping_context::ScrapingContext;
pub use stats_table::{StatsTable, TableConverter};
pub use text_manipulators::team_name_from_url;
