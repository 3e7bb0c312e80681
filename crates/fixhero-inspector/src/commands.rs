//! Host message contract
//!
//! The inspector's boundary with whatever drives it is message passing, not
//! a direct API: discriminated inbound commands and one outbound event
//! carrying the assembled issue. Free-form command strings used by hosts
//! with keyboard shortcuts ("mark-bug", "take-screenshot", "add-note")
//! normalize into the same enum.

use fixhero_core::Issue;
use serde::{Deserialize, Serialize};

/// Inbound commands from the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InspectorCommand {
    StartInspection,
    StopInspection,
    /// Capture a specific element without entering inspection mode
    CaptureElement { selector: String },
    /// Capture the page without element details
    TakeScreenshot,
    /// Attach a freestanding note as an issue without element details
    AddNote { note: String },
}

impl std::str::FromStr for InspectorCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (command, argument) = match s.split_once(':') {
            Some((command, argument)) => (command.trim(), argument.trim()),
            None => (s.trim(), ""),
        };

        match command {
            "start-inspection" | "mark-bug" => Ok(Self::StartInspection),
            "stop-inspection" => Ok(Self::StopInspection),
            "capture-element" if !argument.is_empty() => Ok(Self::CaptureElement {
                selector: argument.to_string(),
            }),
            "take-screenshot" => Ok(Self::TakeScreenshot),
            "add-note" => Ok(Self::AddNote {
                note: argument.to_string(),
            }),
            _ => Err(format!("Unknown inspector command: {}", s)),
        }
    }
}

/// Outbound events to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InspectorEvent {
    /// A capture finished; the host persists the issue
    AddIssue { issue: Issue },
}
