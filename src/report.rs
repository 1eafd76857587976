use crate::slot::{RunKind, Slot};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "NOK")]
    Nok,
    #[serde(rename = "TBC")]
    Tbc,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Ok => "OK",
            Status::Nok => "NOK",
            Status::Tbc => "TBC",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "markers", rename_all = "snake_case")]
pub enum Reason {
    FileNotFound,
    Unreadable,
    NoBlockInWindow,
    NoBlocks,
    NegativeMarker(Vec<String>),
    EndedWithoutSuccess,
    Incomplete,
    MissingMarkers(Vec<String>),
    AllMarkersPresent,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::FileNotFound => f.write_str("file not found"),
            Reason::Unreadable => f.write_str("file not found/unreadable"),
            Reason::NoBlockInWindow => f.write_str("no lines captured in window"),
            Reason::NoBlocks => f.write_str("no run recorded in file"),
            Reason::NegativeMarker(m) => write!(f, "negative marker found: {}", m.join(", ")),
            Reason::EndedWithoutSuccess => f.write_str("run ended without success"),
            Reason::Incomplete => f.write_str("run has not finished"),
            Reason::MissingMarkers(m) => write!(f, "missing success markers: {}", m.join(", ")),
            Reason::AllMarkersPresent => {
                f.write_str("GoodFiles + totals match + 100% + ending successfully")
            }
        }
    }
}

/// Outcome for one area of one (date, slot) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    pub area: String,
    pub status: Status,
    pub reason: Reason,
    pub path: Option<PathBuf>,
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub block: Vec<String>,
}

impl StatusResult {
    pub fn tbc(area: &str, reason: Reason, path: Option<PathBuf>) -> Self {
        Self {
            area: area.to_string(),
            status: Status::Tbc,
            reason,
            path,
            start: None,
            block: Vec::new(),
        }
    }

    /// `<area>: <STATUS> (<path>)`, followed in verbose mode by the reason and
    /// the captured block, indented.
    pub fn render(&self, verbose: bool) -> String {
        let path = self
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "file not found".to_string());
        let mut out = format!("{}: {} ({})", self.area, self.status, path);
        if verbose {
            out.push_str(&format!("\n   - {}", self.reason));
            if let Some(start) = &self.start {
                out.push_str(&format!("\n   - start={start}"));
            }
            for line in &self.block {
                out.push_str("\n     ");
                out.push_str(line.trim_end());
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub date: String,
    pub slot: Slot,
    pub run_kind: RunKind,
    pub generated_at: String,
    pub results: Vec<StatusResult>,
}
