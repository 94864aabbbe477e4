use std::{io::Write, path::Path};

use anyhow::Context;
use serde_json::Value;

use crate::{ScrapeError, stats_table::StatsTable};

/// All teams' tables stacked in the order the teams were scraped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedDataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ConsolidatedDataset {
    /// Columns are the union of every table's columns in first-seen order;
    /// a row missing one of them gets an empty cell.
    pub fn concat(tables: Vec<StatsTable>) -> Result<Self, ScrapeError> {
        if tables.is_empty() {
            return Err(ScrapeError::EmptyResult);
        }

        let mut columns: Vec<String> = vec![];
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let row_count = tables.iter().map(StatsTable::len).sum();
        let mut rows: Vec<Vec<Value>> = Vec::with_capacity(row_count);
        for table in tables {
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|column| table.column_index(column))
                .collect();
            for row in table.rows {
                let cells: Vec<Value> = positions
                    .iter()
                    .map(|position| {
                        position
                            .and_then(|index| row.get(index).cloned())
                            .unwrap_or(Value::Null)
                    })
                    .collect();
                rows.push(cells);
            }
        }
        Ok(ConsolidatedDataset { columns, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Writes the dataset as CSV, each record led by its 0-based row index
    /// under a blank header.
    pub fn write_csv<W: Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = vec![String::new()];
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for (index, row) in self.rows.iter().enumerate() {
            let mut record = vec![index.to_string()];
            record.extend(row.iter().map(cell_to_field));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        self.write_csv(file)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

fn cell_to_field(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
