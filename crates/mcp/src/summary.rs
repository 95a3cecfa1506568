//! Plain-text entity rendering for tool output.

use loopline_db::models::initiative::Initiative;
use loopline_db::models::status::WorkflowStatus;
use loopline_db::models::task::Task;

/// Human name for a status id, falling back to the raw number for rows
/// written by a newer schema.
fn status_name(status_id: i16) -> String {
    match WorkflowStatus::from_id(status_id) {
        Some(status) => status.as_name().to_string(),
        None => format!("status#{status_id}"),
    }
}

/// One-line initiative summary: `I-003 [in_progress] Title -- description`.
pub fn format_initiative(initiative: &Initiative) -> String {
    let mut line = format!(
        "{} (id {}) [{}] {}",
        initiative.identifier,
        initiative.id,
        status_name(initiative.status_id),
        initiative.title
    );
    if let Some(desc) = &initiative.description {
        if !desc.trim().is_empty() {
            line.push_str(" -- ");
            line.push_str(desc.trim());
        }
    }
    line
}

/// One-line task summary, same shape as [`format_initiative`].
pub fn format_task(task: &Task) -> String {
    let mut line = format!(
        "{} (id {}) [{}] {}",
        task.identifier,
        task.id,
        status_name(task.status_id),
        task.title
    );
    if let Some(desc) = &task.description {
        if !desc.trim().is_empty() {
            line.push_str(" -- ");
            line.push_str(desc.trim());
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_initiative() -> Initiative {
        Initiative {
            id: 3,
            workspace_id: 1,
            identifier: "I-003".into(),
            title: "Ship onboarding".into(),
            description: Some("First-run experience".into()),
            status_id: 3,
            user_id: 1,
            ai_pending: false,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn initiative_line_includes_identifier_status_and_description() {
        let line = format_initiative(&sample_initiative());
        assert_eq!(
            line,
            "I-003 (id 3) [in_progress] Ship onboarding -- First-run experience"
        );
    }

    #[test]
    fn blank_description_is_omitted() {
        let mut initiative = sample_initiative();
        initiative.description = Some("   ".into());
        let line = format_initiative(&initiative);
        assert!(!line.contains("--"));
    }

    #[test]
    fn unknown_status_id_is_rendered_raw() {
        let mut initiative = sample_initiative();
        initiative.status_id = 99;
        assert!(format_initiative(&initiative).contains("[status#99]"));
    }
}
