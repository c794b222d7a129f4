use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Question shown alongside the sheet, as supplied by the data service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionInfo {
    pub text: String,
    pub max_marks: f64,
    pub model_answer: String,
}

/// Workbook opened for evaluation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkbookInfo {
    pub workbook_id: String,
    pub question: QuestionInfo,
    pub total_pages: u32,
}

/// Most quick-select buttons a question gets (0 to 100 in half points)
pub const MAX_QUICK_STEPS: u32 = 200;

/// Quick-select mark options: every half point from 0 to `max_marks` inclusive
///
/// The list stops at [`MAX_QUICK_STEPS`] half points; larger marks are only
/// reachable through manual entry.
pub fn quick_options(max_marks: f64) -> Vec<f64> {
    let steps = half_steps(sanitize_max(max_marks));
    let capped = steps.min(MAX_QUICK_STEPS);
    if capped < steps {
        log::warn!(
            "Max marks {max_marks} gives {steps} quick options; showing the first {}",
            capped + 1
        );
    }
    (0..=capped).map(|i| i as f64 * 0.5).collect()
}

/// Whole half points in `[0, max]`
fn half_steps(max: f64) -> u32 {
    (max * 2.0).floor() as u32
}

/// Format a mark with one decimal, or two when the hundredths digit is non-zero
pub fn format_mark(value: f64) -> String {
    if !value.is_finite() {
        return "0.0".to_string();
    }
    let hundredths = (value * 100.0).round() as i64;
    if hundredths % 10 != 0 {
        format!("{value:.2}")
    } else {
        format!("{value:.1}")
    }
}

fn sanitize_max(max_marks: f64) -> f64 {
    if max_marks.is_finite() && max_marks > 0.0 {
        max_marks
    } else {
        0.0
    }
}

/// Mark awarded for the current page, always within `[0, max]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkAssignment {
    value: f64,
    max: f64,
}

impl MarkAssignment {
    pub fn new(max_marks: f64) -> Self {
        Self {
            value: 0.0,
            max: sanitize_max(max_marks),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn quick_options(&self) -> Vec<f64> {
        quick_options(self.max)
    }

    /// Quick-select button press
    ///
    /// Snaps to the nearest half point not above the maximum; free values go
    /// through [`MarkAssignment::enter`].
    pub fn select(&mut self, value: f64) {
        if value.is_nan() {
            self.value = 0.0;
            return;
        }
        let top = half_steps(self.max) as f64 * 0.5;
        let snapped = ((value * 2.0).round() * 0.5).clamp(0.0, top);
        if snapped != value {
            log::debug!("Quick mark {value} snapped to {snapped}");
        }
        self.value = snapped;
    }

    /// Direct numeric entry; non-numeric input counts as 0
    pub fn enter(&mut self, input: &str) {
        let parsed = input.trim().parse::<f64>().unwrap_or(0.0);
        self.value = self.clamp(parsed);
    }

    /// Whether a quick-select option is the current value
    pub fn is_selected(&self, option: f64) -> bool {
        (self.value - option).abs() < 1e-9
    }

    /// Current value formatted for display
    pub fn display(&self) -> String {
        format_mark(self.value)
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, self.max)
    }
}

/// 1-based page position within a workbook
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageCursor {
    current: u32,
    total: u32,
}

impl PageCursor {
    pub fn new(total: u32) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn can_next(&self) -> bool {
        self.current < self.total
    }

    pub fn can_previous(&self) -> bool {
        self.current > 1
    }

    /// Advance one page; returns false at the last page
    pub fn next(&mut self) -> bool {
        if !self.can_next() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one page; returns false at the first page
    pub fn previous(&mut self) -> bool {
        if !self.can_previous() {
            return false;
        }
        self.current -= 1;
        true
    }

    pub fn label(&self) -> String {
        format!("Page: {} / {}", self.current, self.total)
    }
}

/// Finished evaluation handed to the submission service
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationPayload {
    pub workbook_id: String,
    pub page_index: u32,
    pub mark_value: f64,
    pub comment: String,
    /// PNG blob of the annotation overlay; stored next to the metadata, not inline
    #[serde(skip)]
    pub annotation_raster: Vec<u8>,
    pub submitted_at: DateTime<Utc>,
}

/// Ephemeral evaluation state for the page currently on screen
#[derive(Clone, Debug)]
pub struct EvaluationSession {
    workbook: WorkbookInfo,
    pub page: PageCursor,
    pub mark: MarkAssignment,
    pub comment: String,
    pub show_model_answer: bool,
}

impl EvaluationSession {
    pub fn new(workbook: WorkbookInfo) -> Self {
        let page = PageCursor::new(workbook.total_pages);
        let mark = MarkAssignment::new(workbook.question.max_marks);
        Self {
            workbook,
            page,
            mark,
            comment: String::new(),
            show_model_answer: false,
        }
    }

    pub fn workbook(&self) -> &WorkbookInfo {
        &self.workbook
    }

    pub fn workbook_id(&self) -> &str {
        &self.workbook.workbook_id
    }

    pub fn toggle_model_answer(&mut self) {
        self.show_model_answer = !self.show_model_answer;
    }

    /// Model answer text, only while it is toggled visible
    pub fn visible_model_answer(&self) -> Option<&str> {
        self.show_model_answer
            .then_some(self.workbook.question.model_answer.as_str())
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.page.next();
        if moved {
            self.reset_page_state();
        }
        moved
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.page.previous();
        if moved {
            self.reset_page_state();
        }
        moved
    }

    /// Marks bar text, e.g. "Marks: 4.5 / 10.0"
    pub fn marks_summary(&self) -> String {
        format!(
            "Marks: {} / {}",
            self.mark.display(),
            format_mark(self.mark.max())
        )
    }

    pub fn payload(&self, annotation_raster: Vec<u8>) -> EvaluationPayload {
        EvaluationPayload {
            workbook_id: self.workbook.workbook_id.clone(),
            page_index: self.page.current(),
            mark_value: self.mark.value(),
            comment: self.comment.clone(),
            annotation_raster,
            submitted_at: Utc::now(),
        }
    }

    fn reset_page_state(&mut self) {
        self.mark = MarkAssignment::new(self.workbook.question.max_marks);
        self.comment.clear();
        self.show_model_answer = false;
    }
}
