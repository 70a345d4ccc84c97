//! Light parsing of the meta and counts tables, so malformed datasets are
//! rejected before the analysis is started.

use cellq_core::{FailureKind, JobFailure, key_extension};

/// Delimited text formats accepted for datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
}

impl TableFormat {
    pub fn from_key(key: &str) -> Option<Self> {
        match key_extension(key)?.as_str() {
            "csv" => Some(TableFormat::Csv),
            "tsv" | "txt" => Some(TableFormat::Tsv),
            _ => None,
        }
    }

    fn delimiter(&self) -> char {
        match self {
            TableFormat::Csv => ',',
            TableFormat::Tsv => '\t',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse a table from a stored object, picking the format from its key
    pub fn read(key: &str, bytes: &[u8]) -> Result<Self, JobFailure> {
        let format = TableFormat::from_key(key).ok_or_else(|| {
            JobFailure::new(FailureKind::ReadFile)
                .description(format!("File type of '{}' is not supported", key))
                .hint("Use a .txt, .tsv or .csv file")
        })?;
        let text = std::str::from_utf8(bytes).map_err(|_| {
            JobFailure::new(FailureKind::ReadFile)
                .description(format!("File '{}' is not UTF-8 text", key))
        })?;
        Ok(Self::parse(text, format))
    }

    pub fn parse(text: &str, format: TableFormat) -> Self {
        let delimiter = format.delimiter();
        let mut lines = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                line.split(delimiter)
                    .map(|field| field.trim().trim_matches('"').to_string())
                    .collect::<Vec<_>>()
            });
        let header = lines.next().unwrap_or_default();
        let rows = lines.collect();
        Self { header, rows }
    }
}

/// Meta: one row per cell with at least the cell id and its cell type
pub fn validate_meta(key: &str, bytes: &[u8]) -> Result<Table, JobFailure> {
    let table = Table::read(key, bytes)?;
    let parse_meta = |description: String| {
        JobFailure::new(FailureKind::ParseMeta)
            .description(description)
            .hint("The meta file needs a cell column and a cell type column")
    };

    if table.header.len() < 2 {
        return Err(parse_meta(format!(
            "Meta file '{}' has {} column(s)",
            key,
            table.header.len()
        )));
    }
    if table.rows.is_empty() {
        return Err(parse_meta(format!("Meta file '{}' has no cells", key)));
    }
    if let Some(line) = table
        .rows
        .iter()
        .position(|row| row.len() < 2 || row[0].is_empty() || row[1].is_empty())
    {
        return Err(parse_meta(format!(
            "Meta file '{}' has an incomplete row at line {}",
            key,
            line + 2
        )));
    }
    Ok(table)
}

/// Counts: genes as rows, cells as columns, decimal values
pub fn validate_counts(key: &str, bytes: &[u8]) -> Result<Table, JobFailure> {
    let table = Table::read(key, bytes)?;
    let parse_counts = |description: String| {
        JobFailure::new(FailureKind::ParseCounts)
            .description(description)
            .hint("The counts file needs a gene column followed by one column per cell")
    };

    if table.header.len() < 2 {
        return Err(parse_counts(format!("Counts file '{}' has no cell columns", key)));
    }
    if table.rows.is_empty() {
        return Err(parse_counts(format!("Counts file '{}' has no genes", key)));
    }
    for (index, row) in table.rows.iter().enumerate() {
        // R exports leave the gene column of the header unnamed
        if row.len() != table.header.len() && row.len() != table.header.len() + 1 {
            return Err(parse_counts(format!(
                "Counts file '{}' has {} fields at line {}, expected {}",
                key,
                row.len(),
                index + 2,
                table.header.len()
            )));
        }
        if row[1..].iter().any(|value| value.parse::<f64>().is_err()) {
            return Err(parse_counts(format!(
                "Counts file '{}' has non-decimal values at line {}",
                key,
                index + 2
            )));
        }
    }
    Ok(table)
}
