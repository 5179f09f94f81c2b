//! Texts the bot sends back to chat.

use crate::base::types::{Incident, OnCallUser};

pub const STATUS_FAILED: &str = "Failed to get pagerduty status!";
pub const TRIGGER_FAILED: &str = "Trigger failed!";
pub const TRIGGER_EMPTY: &str = "A trigger must include a message. No action performed.";
pub const TRIGGER_SUCCEEDED: &str = "Alert triggered successfully!";
pub const ON_CALL_FAILED: &str = "Failed to get on call users!";
pub const NO_INCIDENTS: &str = "- No unresolved incidents -";

/// Longest message, in characters, that Discord accepts.
pub const MAX_MESSAGE_LEN: usize = 2000;

/// Usage text listing the recognized commands.
pub fn help(prefix: &str) -> String {
    format!(
        "To check current on call and incident status:\n{prefix} status\nTo trigger an alert and start the escalation process:\n{prefix} trigger <message>"
    )
}

/// Hint sent after a successful trigger.
pub fn status_hint(prefix: &str) -> String {
    format!("Check status with {prefix} status")
}

/// One-line on-call summary sent after a successful trigger.
pub fn on_call_line(users: &[OnCallUser]) -> String {
    format!("On call now: {}", users.join(", "))
}

/// A failure reply: the fixed prefix followed by the error description.
pub fn failure(prefix: &str, err: &anyhow::Error) -> String {
    format!("{prefix} {err}")
}

/// A single incident: header line, then its URL.
pub fn incident(incident: &Incident) -> String {
    format!("#{} ({}) {}\n{}", incident.number, incident.status, incident.title, incident.url)
}

/// The full status report.
///
/// Incidents that would push the report past `MAX_MESSAGE_LEN` are left out and
/// counted in a trailing `... and N more` line.
pub fn status(users: &[OnCallUser], incidents: &[Incident]) -> String {
    let header = format!("On call now:\n{}\n\nUnresolved incidents:\n", users.join("\n"));

    if incidents.is_empty() {
        return header + NO_INCIDENTS;
    }

    let blocks = incidents.iter().map(incident).collect::<Vec<_>>();
    let full = blocks.join("\n\n");

    if char_len(&header) + char_len(&full) <= MAX_MESSAGE_LEN {
        return header + &full;
    }

    let mut body = String::new();
    let mut shown = 0;

    for block in &blocks {
        let sep = if shown == 0 { "" } else { "\n\n" };
        let tail = more_tail(blocks.len() - shown - 1, true);

        if char_len(&header) + char_len(&body) + char_len(sep) + char_len(block) + char_len(&tail) > MAX_MESSAGE_LEN {
            break;
        }

        body.push_str(sep);
        body.push_str(block);
        shown += 1;
    }

    let text = header + &body + &more_tail(blocks.len() - shown, shown > 0);

    // A very long on-call list can still overflow on its own.
    text.chars().take(MAX_MESSAGE_LEN).collect()
}

fn more_tail(remaining: usize, separated: bool) -> String {
    match (remaining, separated) {
        (0, _) => String::new(),
        (n, true) => format!("\n\n... and {n} more"),
        (n, false) => format!("... and {n} more"),
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
