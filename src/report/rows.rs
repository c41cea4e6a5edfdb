use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One extracted table row: header-cell texts, data-cell texts, and
/// sparse span hints keyed by data-cell position. The data-cell count
/// is the row's shape and drives classification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Row {
    pub labels: Vec<String>,
    pub cells: Vec<String>,
    pub spans: BTreeMap<usize, u32>,
}

impl Row {
    pub fn shape(&self) -> usize {
        self.cells.len()
    }

    /// Data cell by position; absent cells read as empty text.
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn label(&self, idx: usize) -> &str {
        self.labels.get(idx).map(String::as_str).unwrap_or("")
    }

    pub fn span(&self, idx: usize) -> u32 {
        self.spans.get(&idx).copied().unwrap_or(1)
    }

    fn normalize(&mut self) {
        for text in self.labels.iter_mut().chain(self.cells.iter_mut()) {
            *text = text.trim().to_string();
        }
    }
}

/// Serialized output of the external row-extraction step: the two
/// header tables split out, plus every audit table concatenated into
/// one flat row stream in page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDump {
    pub term: String,
    pub request_no: String,
    pub ident: String,
    pub overview: Vec<Row>,
    pub summary: Vec<Row>,
    pub audit: Vec<Row>,
}

impl ReportDump {
    pub fn normalize(&mut self) {
        let rows = self
            .overview
            .iter_mut()
            .chain(self.summary.iter_mut())
            .chain(self.audit.iter_mut());
        for row in rows {
            row.normalize();
        }
    }
}

pub fn load_dump(path: &Path) -> Result<ReportDump> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading dump {}", path.display()))?;
    let mut dump: ReportDump =
        serde_json::from_str(&text).with_context(|| format!("parsing dump {}", path.display()))?;
    dump.normalize();
    Ok(dump)
}
