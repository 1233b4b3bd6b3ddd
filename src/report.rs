//! Build results, one record per document.
//!
//! Serialized with `serde_json` for `build --manifest`:
//!
//! ```json
//! {
//!   "documents": [
//!     { "source": "index.html", "status": "rendered",
//!       "title": "Hello World", "description": "",
//!       "card": { "path": "out/index.png", "url": "https://x.example/index.png" } },
//!     { "source": "broken.html", "status": "failed",
//!       "stage": "load_background", "message": "..." }
//!   ],
//!   "cache": { "hits": 1, "misses": 1 }
//! }
//! ```

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cache::CacheStats;
use crate::pipeline::{PipelineError, Stage};
use crate::types::CardRef;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub source: PathBuf,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Card written and document rewritten.
    Rendered {
        title: String,
        description: String,
        card: CardRef,
    },
    /// Resolved but not rendered (`check`).
    Planned {
        title: String,
        description: String,
        card: CardRef,
    },
    /// Null document, passed through.
    Skipped,
    Failed { stage: Stage, message: String },
}

impl DocumentRecord {
    pub fn failed(source: impl Into<PathBuf>, error: &PipelineError) -> Self {
        Self {
            source: source.into(),
            status: DocumentStatus::Failed {
                stage: error.stage(),
                message: error.to_string(),
            },
        }
    }

    pub fn title(&self) -> Option<&str> {
        match &self.status {
            DocumentStatus::Rendered { title, .. } | DocumentStatus::Planned { title, .. } => {
                Some(title)
            }
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub documents: Vec<DocumentRecord>,
    pub cache: CacheStats,
}

/// Per-status totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportCounts {
    pub rendered: usize,
    pub planned: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BuildReport {
    pub fn push(&mut self, record: DocumentRecord) {
        self.documents.push(record);
    }

    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for doc in &self.documents {
            match doc.status {
                DocumentStatus::Rendered { .. } => counts.rendered += 1,
                DocumentStatus::Planned { .. } => counts.planned += 1,
                DocumentStatus::Skipped => counts.skipped += 1,
                DocumentStatus::Failed { .. } => counts.failed += 1,
            }
        }
        counts
    }

    pub fn has_failures(&self) -> bool {
        self.documents.iter().any(DocumentRecord::is_failed)
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_manifest(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::OutputError;
    use tempfile::TempDir;

    fn rendered(source: &str) -> DocumentRecord {
        DocumentRecord {
            source: source.into(),
            status: DocumentStatus::Rendered {
                title: "Hello".into(),
                description: String::new(),
                card: CardRef::new(Path::new("out"), "https://x.example", "index"),
            },
        }
    }

    fn write_failure() -> PipelineError {
        PipelineError::Output(OutputError::Write {
            path: "out/index.png".into(),
            source: std::io::Error::other("disk full"),
        })
    }

    #[test]
    fn failed_record_carries_stage_and_message() {
        let record = DocumentRecord::failed("index.html", &write_failure());
        assert!(record.is_failed());
        match record.status {
            DocumentStatus::Failed { stage, message } => {
                assert_eq!(stage, Stage::ComposeAndWrite);
                assert!(message.contains("disk full"));
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn counts_by_status() {
        let mut report = BuildReport::default();
        report.push(rendered("a.html"));
        report.push(rendered("b.html"));
        report.push(DocumentRecord {
            source: "c.html".into(),
            status: DocumentStatus::Skipped,
        });
        report.push(DocumentRecord::failed("d.html", &write_failure()));

        let counts = report.counts();
        assert_eq!(counts.rendered, 2);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.failed, 1);
        assert!(report.has_failures());
    }

    #[test]
    fn manifest_json_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("manifest.json");
        let mut report = BuildReport::default();
        report.push(rendered("index.html"));
        report.push(DocumentRecord::failed("x.html", &write_failure()));
        report.write_manifest(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let docs = json["documents"].as_array().unwrap();
        assert_eq!(docs[0]["status"], "rendered");
        assert_eq!(docs[0]["source"], "index.html");
        assert_eq!(docs[0]["card"]["url"], "https://x.example/index.png");
        assert_eq!(docs[1]["status"], "failed");
        assert_eq!(docs[1]["stage"], "compose_and_write");
        assert_eq!(json["cache"]["misses"], 0);
    }
}
