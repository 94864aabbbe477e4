/// Everything that can go wrong while scraping the league or a single squad.
#[derive(Debug)]
pub enum ScrapeError {
    /// The request could not complete: connection failure, timeout or a
    /// non-success status.
    Network { url: String, reason: String },
    /// No HTML comment on the page holds a table with the marker class.
    TableNotFound { marker: String },
    /// A table was found but could not be read into rows and columns.
    MalformedTable(String),
    /// Not a single team produced a dataset.
    EmptyResult,
}

impl ScrapeError {
    pub fn network(url: &str, err: impl std::fmt::Display) -> Self {
        ScrapeError::Network {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeError::Network { url, reason } => {
                write!(f, "request to {url} failed: {reason}")
            }
            ScrapeError::TableNotFound { marker } => {
                write!(f, "could not find a commented table with class '{marker}'")
            }
            ScrapeError::MalformedTable(details) => write!(f, "malformed table: {details}"),
            ScrapeError::EmptyResult => write!(f, "no team produced any stats"),
        }
    }
}

impl std::error::Error for ScrapeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_names_the_url() {
        let err = ScrapeError::network("https://fbref.com/en/squads/x/Foo-Stats", "timed out");
        assert_eq!(
            err.to_string(),
            "request to https://fbref.com/en/squads/x/Foo-Stats failed: timed out"
        );
    }

    #[test]
    fn scrape_error_survives_anyhow() {
        let err: anyhow::Error = ScrapeError::EmptyResult.into();
        assert!(matches!(
            err.downcast_ref::<ScrapeError>(),
            Some(ScrapeError::EmptyResult)
        ));
    }
}
