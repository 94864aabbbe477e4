//! Turns an isolated `<table>` fragment into rows of named, loosely typed
//! cells.

use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::{Map, Number, Value};

use crate::{
    ScrapeError,
    text_manipulators::{extract_text, parse_selector},
};

/// Rows the site repeats mid-table as visual separators or header echoes.
const REPEATED_HEADER_CLASSES: [&str; 3] = ["thead", "over_header", "spacer"];

/// One team's table. Every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl StatsTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// The row as a column-name keyed record.
    pub fn record(&self, row: usize) -> Option<Map<String, Value>> {
        let cells = self.rows.get(row)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(cells.iter().cloned())
                .collect(),
        )
    }

    /// Sets `column` to `value` on every row, appending the column if the
    /// table doesn't have it yet.
    pub fn tag(&mut self, column: &str, value: &str) {
        let value = Value::String(value.to_string());
        match self.column_index(column) {
            Some(index) => {
                for row in &mut self.rows {
                    row[index] = value.clone();
                }
            }
            None => {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }
}

pub struct TableConverter {
    // Plain or comma-grouped integers and decimals, optionally signed.
    numeric_cell_regex: Regex,
}

impl TableConverter {
    pub fn new() -> anyhow::Result<Self> {
        let numeric_cell_regex =
            Regex::new(r"^[+-]?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+)$")?;
        Ok(Self { numeric_cell_regex })
    }

    pub fn convert(&self, table_html: &str) -> Result<StatsTable, ScrapeError> {
        let table_selector =
            parse_selector("table").map_err(|err| ScrapeError::MalformedTable(err.to_string()))?;
        let fragment = Html::parse_fragment(table_html);
        let Some(table) = fragment.select(&table_selector).next() else {
            return Err(ScrapeError::MalformedTable(
                "no table element in fragment".to_string(),
            ));
        };

        let mut header_rows = vec![];
        let mut body_rows = vec![];
        let mut footer_rows = vec![];
        for section in child_elements(table) {
            match section.value().name() {
                "thead" => header_rows.extend(table_rows(section)),
                "tbody" => body_rows.extend(table_rows(section)),
                "tfoot" => footer_rows.extend(table_rows(section)),
                "tr" => body_rows.push(section),
                _ => {}
            }
        }

        // Without a thead, leading all-th rows are the header.
        if header_rows.is_empty() {
            let promoted = body_rows.iter().take_while(|row| is_all_th(**row)).count();
            header_rows = body_rows.drain(..promoted).collect();
        }
        if header_rows.is_empty() {
            return Err(ScrapeError::MalformedTable("no header row".to_string()));
        }

        let columns = column_names(&header_rows)?;
        body_rows.extend(footer_rows);

        let rows: Vec<Vec<Value>> = body_rows
            .into_iter()
            .filter(|row| !is_repeated_header(*row))
            .map(expand_cells)
            .filter(|cells| !cells.is_empty())
            .map(|cells| {
                let mut row: Vec<Value> =
                    cells.iter().map(|text| self.coerce_cell(text)).collect();
                row.resize(columns.len(), Value::Null);
                row
            })
            .collect();

        if rows.is_empty() {
            return Err(ScrapeError::MalformedTable("no body rows".to_string()));
        }
        Ok(StatsTable { columns, rows })
    }

    /// Numbers where the text reads as one, empty for blank cells, the text
    /// itself otherwise.
    pub fn coerce_cell(&self, text: &str) -> Value {
        let text = text.trim();
        if text.is_empty() {
            return Value::Null;
        }
        if !self.numeric_cell_regex.is_match(text) {
            return Value::String(text.to_string());
        }

        let compact = text.replace(',', "");
        if !compact.contains('.') {
            if let Ok(int) = compact.parse::<i64>() {
                return Value::Number(int.into());
            }
        }
        compact
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string()))
    }
}

fn child_elements(parent: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    parent.children().filter_map(ElementRef::wrap)
}

fn table_rows(section: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(section).filter(|el| el.value().name() == "tr")
}

fn cells(row: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    child_elements(row).filter(|el| matches!(el.value().name(), "th" | "td"))
}

fn is_all_th(row: ElementRef) -> bool {
    let mut cells = cells(row).peekable();
    cells.peek().is_some() && cells.all(|cell| cell.value().name() == "th")
}

fn is_repeated_header(row: ElementRef) -> bool {
    row.value()
        .classes()
        .any(|class| REPEATED_HEADER_CLASSES.contains(&class))
}

/// Cell texts of a row with `colspan` unrolled.
fn expand_cells(row: ElementRef) -> Vec<String> {
    let mut texts = vec![];
    for cell in cells(row) {
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|span| span.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1);
        let text = extract_text(cell);
        texts.extend(std::iter::repeat_n(text, span));
    }
    texts
}

/// Names columns from the last header row, prefixed with any group labels
/// from the rows above it.
fn column_names(header_rows: &[ElementRef]) -> Result<Vec<String>, ScrapeError> {
    let levels: Vec<Vec<String>> = header_rows.iter().map(|row| expand_cells(*row)).collect();
    let width = levels.last().map(Vec::len).unwrap_or_default();
    if width == 0 {
        return Err(ScrapeError::MalformedTable(
            "header row has no cells".to_string(),
        ));
    }

    let mut names = Vec::with_capacity(width);
    for index in 0..width {
        let mut parts: Vec<&str> = vec![];
        for level in &levels {
            let Some(label) = level.get(index) else {
                continue;
            };
            if !label.is_empty() && parts.last() != Some(&label.as_str()) {
                parts.push(label);
            }
        }
        if parts.is_empty() {
            names.push(format!("Unnamed: {index}"));
        } else {
            names.push(parts.join(" "));
        }
    }
    Ok(dedupe_column_names(names))
}

/// `Gls, Gls, Gls` becomes `Gls, Gls.1, Gls.2`.
fn dedupe_column_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            let deduped = if *count == 0 {
                name
            } else {
                format!("{name}.{count}")
            };
            *count += 1;
            deduped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn converter() -> TableConverter {
        TableConverter::new().unwrap()
    }

    #[test]
    fn simple_table_keeps_order_and_types() {
        let html = r#"<table class="stats_table">
            <thead><tr><th>Date</th><th>Opponent</th><th>GF</th><th>GA</th></tr></thead>
            <tbody>
              <tr><th>2024-08-17</th><td>Chelsea</td><td>2</td><td>0</td></tr>
              <tr><th>2024-08-24</th><td>Ipswich Town</td><td>4</td><td>1</td></tr>
            </tbody>
        </table>"#;
        let table = converter().convert(html).unwrap();

        assert_eq!(table.columns, vec!["Date", "Opponent", "GF", "GA"]);
        assert_eq!(table.len(), 2);
        let first = table.record(0).unwrap();
        assert_eq!(first["Date"], json!("2024-08-17"));
        assert_eq!(first["Opponent"], json!("Chelsea"));
        assert_eq!(first["GF"], json!(2));
        assert_eq!(first["GA"], json!(0));
        let second = table.record(1).unwrap();
        assert_eq!(second["Opponent"], json!("Ipswich Town"));
        assert_eq!(second["GF"], json!(4));
        assert!(second["GA"].is_number());
    }

    #[test]
    fn coerces_cells_one_at_a_time() {
        let converter = converter();
        assert_eq!(converter.coerce_cell("12"), json!(12));
        assert_eq!(converter.coerce_cell("-3"), json!(-3));
        assert_eq!(converter.coerce_cell("1,234"), json!(1234));
        assert_eq!(converter.coerce_cell("1.75"), json!(1.75));
        assert_eq!(converter.coerce_cell(" 0.5 "), json!(0.5));
        assert_eq!(converter.coerce_cell(""), Value::Null);
        assert_eq!(converter.coerce_cell("61.5%"), json!("61.5%"));
        assert_eq!(converter.coerce_cell("W 2–1"), json!("W 2–1"));
        assert_eq!(converter.coerce_cell("1,2"), json!("1,2"));
        assert_eq!(converter.coerce_cell("NaN"), json!("NaN"));
    }

    #[test]
    fn grouped_headers_are_joined_and_deduped() {
        let html = r#"<table>
            <thead>
              <tr class="over_header"><th colspan="2"></th><th colspan="2">Performance</th><th colspan="2">Per 90</th></tr>
              <tr><th>Player</th><th>Pos</th><th>Gls</th><th>Ast</th><th>Gls</th><th>Gls</th></tr>
            </thead>
            <tbody><tr><th>Rodri</th><td>MF</td><td>1</td><td>2</td><td>0.1</td><td>0.2</td></tr></tbody>
        </table>"#;
        let table = converter().convert(html).unwrap();
        assert_eq!(
            table.columns,
            vec![
                "Player",
                "Pos",
                "Performance Gls",
                "Performance Ast",
                "Per 90 Gls",
                "Per 90 Gls.1"
            ]
        );
    }

    #[test]
    fn blank_header_cells_get_placeholder_names() {
        let html = r#"<table><thead><tr><th></th><th>Gls</th></tr></thead>
            <tbody><tr><td>x</td><td>1</td></tr></tbody></table>"#;
        let table = converter().convert(html).unwrap();
        assert_eq!(table.columns, vec!["Unnamed: 0", "Gls"]);
    }

    #[test]
    fn skips_repeated_header_rows_and_reads_footer() {
        let html = r#"<table>
            <thead><tr><th>Player</th><th>MP</th></tr></thead>
            <tbody>
              <tr><th>Ederson</th><td>26</td></tr>
              <tr class="thead"><th>Player</th><th>MP</th></tr>
              <tr><th>Walker</th><td>21</td></tr>
            </tbody>
            <tfoot><tr><th>Squad Total</th><td>38</td></tr></tfoot>
        </table>"#;
        let table = converter().convert(html).unwrap();
        let players: Vec<_> = (0..table.len())
            .map(|row| table.get(row, "Player").unwrap().clone())
            .collect();
        assert_eq!(players, vec![json!("Ederson"), json!("Walker"), json!("Squad Total")]);
    }

    #[test]
    fn promotes_th_rows_without_thead() {
        let html = r#"<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>x</td></tr></table>"#;
        let table = converter().convert(html).unwrap();
        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec![json!(1), json!("x")]]);
    }

    #[test]
    fn ragged_rows_are_padded_and_truncated() {
        let html = r#"<table><thead><tr><th>A</th><th>B</th></tr></thead><tbody>
            <tr><td>1</td></tr>
            <tr><td>1</td><td>2</td><td>3</td></tr>
            <tr><td colspan="2">both</td></tr>
        </tbody></table>"#;
        let table = converter().convert(html).unwrap();
        assert_eq!(table.rows[0], vec![json!(1), Value::Null]);
        assert_eq!(table.rows[1], vec![json!(1), json!(2)]);
        assert_eq!(table.rows[2], vec![json!("both"), json!("both")]);
    }

    #[test]
    fn header_only_table_is_malformed() {
        let html = r#"<table><thead><tr><th>A</th></tr></thead><tbody></tbody></table>"#;
        let err = converter().convert(html).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedTable(_)));
    }

    #[test]
    fn headerless_table_is_malformed() {
        let html = r#"<table><tbody><tr><td>1</td></tr></tbody></table>"#;
        let err = converter().convert(html).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedTable(_)));
    }

    #[test]
    fn tag_appends_or_overwrites_column() {
        let mut table = StatsTable {
            columns: vec!["Player".to_string()],
            rows: vec![vec![json!("Saka")], vec![json!("Rice")]],
        };
        table.tag("Team", "Arsenal");
        assert_eq!(table.columns, vec!["Player", "Team"]);
        assert!(table.rows.iter().all(|row| row[1] == json!("Arsenal")));

        table.tag("Team", "Gunners");
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.get(1, "Team"), Some(&json!("Gunners")));
    }
}
