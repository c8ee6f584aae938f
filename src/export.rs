//! Writing match tables to disk.

use crate::vocabulary::MatchTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write table rows: {0}")]
    Csv(#[from] csv::Error),
}

/// Row written in place of matches when a table is empty, so the sheet is never blank.
pub const NO_MATCHES_LABEL: &str = "(no matches)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Tsv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Tsv => "tsv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = &'static str;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        match format {
            "json" => Ok(Self::Json),
            "tsv" => Ok(Self::Tsv),
            _ => Err("Could not parse an export format"),
        }
    }
}

/// Render a table in the given format.
pub fn render(table: &MatchTable, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_vec_pretty(table)?),
        ExportFormat::Tsv => render_tsv(table),
    }
}

fn render_tsv(table: &MatchTable) -> Result<Vec<u8>, ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(["Word", "Count"])?;
    if table.is_empty() {
        wtr.write_record([NO_MATCHES_LABEL, "0"])?;
    }
    for row in &table.rows {
        wtr.write_record([row.word.as_str(), row.count.to_string().as_str()])?;
    }

    wtr.into_inner()
        .map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))
}

/// File name for a table: `<vocab>.<ext>`, or `<vocab>_selected.<ext>` for a selection.
pub fn file_name(table: &MatchTable, format: ExportFormat) -> String {
    if table.selected {
        format!("{}_selected.{}", table.vocabulary, format.extension())
    } else {
        format!("{}.{}", table.vocabulary, format.extension())
    }
}

/// Write `table` into `out_dir`, returning the path written.
pub fn export_table(table: &MatchTable, format: ExportFormat, out_dir: &Path) -> Result<PathBuf, ExportError> {
    let content = render(table, format)?;
    let path = out_dir.join(file_name(table, format));
    fs::write(&path, content).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    log::info!("Exported {} rows to {:?}", table.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::MatchRow;

    fn table() -> MatchTable {
        MatchTable {
            vocabulary: "cet4".to_string(),
            rows: vec![
                MatchRow {
                    word: "quick".to_string(),
                    count: 3,
                },
                MatchRow {
                    word: "slow".to_string(),
                    count: 1,
                },
            ],
            selected: false,
        }
    }

    #[test]
    fn test_render_tsv() {
        assert_eq!(render(&table(), ExportFormat::Tsv).unwrap(), b"Word\tCount\nquick\t3\nslow\t1\n");
    }

    #[test]
    fn test_render_tsv_quotes_awkward_words() {
        let mut awkward = table();
        awkward.rows[0].word = "\"tis".to_string();
        awkward.rows[1].word = "a\tb".to_string();

        let out = String::from_utf8(render(&awkward, ExportFormat::Tsv).unwrap()).unwrap();
        assert_eq!(out, "Word\tCount\n\"\"\"tis\"\t3\n\"a\tb\"\t1\n");
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value = serde_json::from_slice(&render(&table(), ExportFormat::Json).unwrap()).unwrap();
        assert_eq!(json["vocabulary"], "cet4");
        assert_eq!(json["rows"][0]["word"], "quick");
        assert_eq!(json["rows"][1]["count"], 1);
        assert!(json.get("selected").is_none());
    }

    #[test]
    fn test_file_names() {
        let full = table();
        assert_eq!(file_name(&full, ExportFormat::Json), "cet4.json");
        assert_eq!(file_name(&full.top(1), ExportFormat::Tsv), "cet4_selected.tsv");
    }

    #[test]
    fn test_export_empty_table_writes_placeholder_row() {
        let dir = tempfile::tempdir().unwrap();
        let empty = MatchTable {
            vocabulary: "none".to_string(),
            rows: Vec::new(),
            selected: false,
        };

        let path = export_table(&empty, ExportFormat::Tsv, dir.path()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "Word\tCount\n(no matches)\t0\n");

        let path = export_table(&empty, ExportFormat::Json, dir.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("tsv".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }
}
