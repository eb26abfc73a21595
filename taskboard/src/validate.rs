//! Client-side checks run before a draft is submitted.
//!
//! These mirror the form's inline messages. The server validates again on
//! its own terms.

use taskboard_proto::tags;

use crate::cache::TaskDraft;

/// One failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormIssue {
    /// Title is empty or whitespace.
    #[error("Title is required")]
    MissingTitle,
    /// No due date entered.
    #[error("dueDate is required")]
    MissingDueDate,
    /// At least one tag exceeds the length limit.
    #[error("Each tag must be at most 10 characters")]
    TagTooLong,
}

/// Every check a draft failed, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_issues(.issues))]
pub struct FormErrors {
    issues: Vec<FormIssue>,
}

impl FormErrors {
    /// The failed checks, in form order.
    #[must_use]
    pub fn issues(&self) -> &[FormIssue] {
        &self.issues
    }

    /// True when `issue` is among the failures.
    #[must_use]
    pub fn contains(&self, issue: FormIssue) -> bool {
        self.issues.contains(&issue)
    }
}

fn join_issues(issues: &[FormIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Checks a draft, collecting every failure.
///
/// # Errors
///
/// Returns [`FormErrors`] listing each failed check when any fails.
pub fn validate_draft(draft: &TaskDraft) -> Result<(), FormErrors> {
    let mut issues = Vec::new();
    if draft.title.trim().is_empty() {
        issues.push(FormIssue::MissingTitle);
    }
    if draft.due_date.trim().is_empty() {
        issues.push(FormIssue::MissingDueDate);
    }
    if !tags::oversized_tags(&draft.tags).is_empty() {
        issues.push(FormIssue::TagTooLong);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(FormErrors { issues })
    }
}
