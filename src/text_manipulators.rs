use scraper::{ElementRef, Selector};

pub fn extract_text(node: ElementRef) -> String {
    node.text().collect::<String>().trim().to_string()
}

pub fn parse_selector(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector).map_err(|err| anyhow::anyhow!("bad selector {selector:?}: {err}"))
}

pub fn get_absolute_link(origin: &str, href: &str) -> String {
    format!("{origin}{href}")
}

/// `.../squads/b8fd03ef/Manchester-City-Stats` becomes `Manchester City`.
///
/// Nothing is validated: a URL with an odd last segment yields an odd name.
pub fn team_name_from_url(url: &str, suffix: &str) -> String {
    let slug = url.rsplit('/').next().unwrap_or_default();
    slug.replace(suffix, "").replace('-', " ")
}
