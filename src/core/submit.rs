//! Grading submission collaborators
//!
//! The real grading service is external; these sinks accept a finished
//! evaluation and acknowledge it. No retry or backoff is attempted.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;

use crate::session::state::EvaluationPayload;

/// Receipt returned by a sink for an accepted evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acknowledgement {
    pub receipt: String,
}

pub trait SubmissionSink {
    fn submit(&mut self, payload: &EvaluationPayload) -> anyhow::Result<Acknowledgement>;
}

fn receipt_for(payload: &EvaluationPayload) -> String {
    format!("{}-p{}", payload.workbook_id, payload.page_index)
}

/// Accepts everything and only logs it
#[derive(Debug, Default)]
pub struct LoggingSubmission {
    accepted: usize,
}

impl LoggingSubmission {
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl SubmissionSink for LoggingSubmission {
    fn submit(&mut self, payload: &EvaluationPayload) -> anyhow::Result<Acknowledgement> {
        self.accepted += 1;
        log::info!(
            "Evaluation submitted: workbook {} page {} mark {} ({} byte raster)",
            payload.workbook_id,
            payload.page_index,
            payload.mark_value,
            payload.annotation_raster.len()
        );
        Ok(Acknowledgement {
            receipt: receipt_for(payload),
        })
    }
}

/// Writes `<receipt>.json` metadata and `<receipt>.png` annotation raster into a directory
#[derive(Debug, Clone)]
pub struct DirectorySubmission {
    dir: PathBuf,
}

impl DirectorySubmission {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl SubmissionSink for DirectorySubmission {
    fn submit(&mut self, payload: &EvaluationPayload) -> anyhow::Result<Acknowledgement> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating {}", self.dir.display()))?;

        let receipt = receipt_for(payload);
        let meta_path = self.dir.join(format!("{receipt}.json"));
        let meta = serde_json::to_string_pretty(payload)?;
        fs::write(&meta_path, meta)
            .with_context(|| format!("writing {}", meta_path.display()))?;

        if !payload.annotation_raster.is_empty() {
            let raster_path = self.dir.join(format!("{receipt}.png"));
            fs::write(&raster_path, &payload.annotation_raster)
                .with_context(|| format!("writing {}", raster_path.display()))?;
        }

        log::info!("Evaluation {receipt} written to {}", self.dir.display());
        Ok(Acknowledgement { receipt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::state::EvaluationSession;
    use crate::session::state::tests::workbook;

    #[test]
    fn test_directory_submission_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = EvaluationSession::new(workbook());
        session.mark.select(6.5);
        let payload = session.payload(vec![0x89, b'P', b'N', b'G']);

        let mut sink = DirectorySubmission::new(dir.path().join("out"));
        let ack = sink.submit(&payload).unwrap();
        assert_eq!(ack.receipt, "W-1234-p1");

        let meta = std::fs::read_to_string(dir.path().join("out/W-1234-p1.json")).unwrap();
        let meta: serde_json::Value = serde_json::from_str(&meta).unwrap();
        assert_eq!(meta["markValue"], 6.5);
        assert_eq!(meta["pageIndex"], 1);
        assert!(dir.path().join("out/W-1234-p1.png").exists());
    }

    #[test]
    fn test_directory_submission_reports_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let session = EvaluationSession::new(workbook());
        let mut sink = DirectorySubmission::new(blocker.join("sub"));
        assert!(sink.submit(&session.payload(Vec::new())).is_err());
    }

    #[test]
    fn test_logging_submission_counts() {
        let session = EvaluationSession::new(workbook());
        let mut sink = LoggingSubmission::default();
        sink.submit(&session.payload(Vec::new())).unwrap();
        assert_eq!(sink.accepted(), 1);
    }
}
