//! Scripted evaluation replay
//!
//! Drives an evaluation view from a JSON script without a window system:
//!
//! ```json
//! {
//!   "pages": ["scans/page-1.png", "scans/page-2.png"],
//!   "layout": { "image_box": {...}, "parent_box": {...} },
//!   "actions": [
//!     { "action": "select-tool", "value": "pen" },
//!     { "action": "pointer", "value": { "phase": "down", "source": { "kind": "mouse", "client_x": 10, "client_y": 10 } } },
//!     { "action": "select-mark", "value": 7.5 },
//!     { "action": "submit" }
//!   ]
//! }
//! ```
//!
//! Page paths are resolved relative to the script. When `workbook` is omitted
//! the mock data service supplies one.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use super::data::{DashboardData, MockData};
use super::submit::{Acknowledgement, DirectorySubmission};
use crate::capture::image::PageListSource;
use crate::config::{self, AppConfig};
use crate::session::messages::{EvalMsg, Update};
use crate::session::state::WorkbookInfo;
use crate::session::view::{EvaluationView, ViewportLayout};

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub workbook: Option<WorkbookInfo>,
    #[serde(default)]
    pub pages: Vec<PathBuf>,
    pub layout: ViewportLayout,
    pub actions: Vec<EvalMsg>,
}

impl ReplayScript {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut script: Self = config::read_json(path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        for page in &mut script.pages {
            if page.is_relative() {
                *page = base.join(&*page);
            }
        }
        Ok(script)
    }
}

/// What a replay produced
#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub submitted: Vec<Acknowledgement>,
    /// Sheet-plus-annotation images written for review
    pub composites: Vec<PathBuf>,
}

/// Run every action of `script`, writing submissions and composites into `out_dir`
pub fn run(script: ReplayScript, config: &AppConfig, out_dir: &Path) -> anyhow::Result<ReplayOutcome> {
    let workbook = match script.workbook {
        Some(workbook) => workbook,
        None => MockData {
            max_marks: config.default_max_marks,
            total_pages: config.default_total_pages,
        }
        .next_workbook()
        .context("no workbook to replay")?,
    };

    let source = Box::new(PageListSource::new(script.pages));
    let mut view = EvaluationView::open(workbook, config, source, script.layout);
    let mut sink = DirectorySubmission::new(out_dir);
    let mut outcome = ReplayOutcome::default();

    for (index, msg) in script.actions.into_iter().enumerate() {
        if msg == EvalMsg::Submit && !view.is_finished() {
            // The overlay is torn down on submit, so render the review image first
            outcome.composites.push(write_composite(&view, out_dir)?);
        }
        let update = view
            .update(msg, &mut sink)
            .with_context(|| format!("replaying action {index}"))?;
        log::debug!("Action {index}: {:?}", update);
        if let Update::Submitted(ack) = update {
            outcome.submitted.push(ack);
        }
    }

    if !view.is_finished() {
        outcome.composites.push(write_composite(&view, out_dir)?);
        view.close();
    }
    Ok(outcome)
}

fn write_composite(view: &EvaluationView, out_dir: &Path) -> anyhow::Result<PathBuf> {
    let session = view.session();
    let path = out_dir.join(format!(
        "{}-p{}-composite.png",
        session.workbook_id(),
        session.page.current()
    ));
    let Some(img) = view.composite() else {
        anyhow::bail!("no sheet loaded for {}", path.display());
    };
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("Composite written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "pages": ["missing-1.png"],
        "layout": {
            "image_box": {"left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0},
            "parent_box": {"left": 0.0, "top": 0.0, "width": 400.0, "height": 300.0}
        },
        "actions": [
            {"action": "select-tool", "value": "check-stamp"},
            {"action": "pointer", "value": {"phase": "down", "source": {"kind": "touch", "touches": [{"x": 100.0, "y": 100.0}]}}},
            {"action": "pointer", "value": {"phase": "up", "source": {"kind": "touch", "touches": []}}},
            {"action": "enter-mark", "value": "12"},
            {"action": "set-comment", "value": "Good answer"},
            {"action": "submit"}
        ]
    }"#;

    #[test]
    fn test_replay_writes_submission_and_composite() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("script.json");
        std::fs::write(&script_path, SCRIPT).unwrap();

        let script = ReplayScript::load(&script_path).unwrap();
        assert_eq!(script.pages[0], dir.path().join("missing-1.png"));

        let out = dir.path().join("out");
        let outcome = run(script, &AppConfig::default(), &out).unwrap();
        assert_eq!(outcome.submitted.len(), 1);
        assert_eq!(outcome.submitted[0].receipt, "W-1234-p1");
        assert_eq!(outcome.composites, vec![out.join("W-1234-p1-composite.png")]);

        let meta = std::fs::read_to_string(out.join("W-1234-p1.json")).unwrap();
        let meta: serde_json::Value = serde_json::from_str(&meta).unwrap();
        // Manual entry clamps to the question maximum
        assert_eq!(meta["markValue"], 10.0);
        assert_eq!(meta["comment"], "Good answer");
        assert!(out.join("W-1234-p1.png").exists());
    }

    #[test]
    fn test_unsubmitted_replay_still_writes_composite() {
        let dir = tempfile::tempdir().unwrap();
        let script: ReplayScript = serde_json::from_str(
            r#"{
                "layout": {
                    "image_box": {"left": 0.0, "top": 0.0, "width": 80.0, "height": 60.0},
                    "parent_box": {"left": 0.0, "top": 0.0, "width": 80.0, "height": 60.0}
                },
                "actions": [{"action": "next-page"}]
            }"#,
        )
        .unwrap();

        let outcome = run(script, &AppConfig::default(), dir.path()).unwrap();
        assert!(outcome.submitted.is_empty());
        assert_eq!(outcome.composites, vec![dir.path().join("W-1234-p2-composite.png")]);
    }

    #[test]
    fn test_load_reports_bad_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();
        let err = ReplayScript::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
