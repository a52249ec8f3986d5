//! Desktop notification acknowledging an export

use crate::session::ExportOutcome;
use notify_rust::Notification;

pub fn notification_text(outcome: &ExportOutcome) -> (String, String) {
    match outcome {
        ExportOutcome::Completed { path, samples } => (
            "Profile exported".to_string(),
            format!("{} samples written to {}", samples, path.display()),
        ),
        ExportOutcome::Failed { path, error } => (
            "Profile export failed".to_string(),
            format!("{}: {}", path.display(), error),
        ),
    }
}

pub fn send_export_notification(outcome: &ExportOutcome) -> Result<(), notify_rust::error::Error> {
    let (summary, body) = notification_text(outcome);
    Notification::new()
        .summary(&summary)
        .body(&body)
        .appname("Hazel Profiler")
        .show()?;
    Ok(())
}
