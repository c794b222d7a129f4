//! Business data collaborators
//!
//! Workbook lists, dashboard metrics and question text come from an external
//! data service. `MockData` supplies the fixed wireframe values.

use super::routes::Role;
use crate::session::state::{QuestionInfo, WorkbookInfo};

/// One dashboard metric card
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub detail: Option<String>,
}

impl MetricCard {
    fn new(title: &str, value: &str, detail: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            detail: detail.map(str::to_string),
        }
    }
}

pub trait DashboardData {
    /// Metric cards for the role's dashboard
    fn metrics(&self, role: Role) -> Vec<MetricCard>;
    /// Workbook the evaluator should open next, if any
    fn next_workbook(&self) -> Option<WorkbookInfo>;
}

/// Fixed wireframe data
#[derive(Clone, Debug)]
pub struct MockData {
    pub max_marks: f64,
    pub total_pages: u32,
}

impl Default for MockData {
    fn default() -> Self {
        Self {
            max_marks: 10.0,
            total_pages: 4,
        }
    }
}

impl DashboardData for MockData {
    fn metrics(&self, role: Role) -> Vec<MetricCard> {
        match role {
            Role::Admin => vec![
                MetricCard::new("Workbooks Scanned", "120/N", Some("View all")),
                MetricCard::new(
                    "Workbooks Checked",
                    "15/N",
                    Some("Review access only to super admin"),
                ),
                MetricCard::new("Active Evaluators", "8", Some("Manage")),
                MetricCard::new("Questions Assigned", "2/N", Some("Assign Now")),
            ],
            Role::Evaluator => vec![
                MetricCard::new("Sheets Left", "5", None),
                MetricCard::new("Questions Assigned", "1, 5", None),
                MetricCard::new("Total Sheets", "10", None),
            ],
            Role::User => vec![MetricCard::new(
                "Welcome",
                "Select an item from the sidebar",
                None,
            )],
        }
    }

    fn next_workbook(&self) -> Option<WorkbookInfo> {
        Some(WorkbookInfo {
            workbook_id: "W-1234".to_string(),
            question: QuestionInfo {
                text: format!(
                    "Q1. Explain and differentiate between Prim's algorithm and Kruskal's algorithm. (Max Marks: {})",
                    self.max_marks
                ),
                max_marks: self.max_marks,
                model_answer: "Prim's algorithm is a greedy algorithm that grows the MST one edge at a time from a single vertex, always choosing the smallest edge leaving the tree. Kruskal's algorithm starts from all vertices and no edges and adds edges in increasing order of weight, skipping any that would form a cycle.".to_string(),
            },
            total_pages: self.total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_per_role() {
        let data = MockData::default();
        assert_eq!(data.metrics(Role::Admin).len(), 4);
        assert_eq!(data.metrics(Role::Evaluator)[0].title, "Sheets Left");
        assert_eq!(data.metrics(Role::User).len(), 1);
    }

    #[test]
    fn test_next_workbook_uses_configured_limits() {
        let data = MockData {
            max_marks: 5.0,
            total_pages: 2,
        };
        let workbook = data.next_workbook().unwrap();
        assert_eq!(workbook.question.max_marks, 5.0);
        assert_eq!(workbook.total_pages, 2);
    }
}
