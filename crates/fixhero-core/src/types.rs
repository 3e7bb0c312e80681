//! Core type definitions for the FixHero capture pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Issue severity levels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical = 0,
    High = 1,
    #[default]
    Medium = 2,
    Low = 3,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" | "0" => Ok(Self::Critical),
            "high" | "1" => Ok(Self::High),
            "medium" | "2" => Ok(Self::Medium),
            "low" | "3" => Ok(Self::Low),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

/// Review status of a captured issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
    Archived,
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Resolved => write!(f, "resolved"),
            Self::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Invalid status: {}", s)),
        }
    }
}

/// Viewport-relative element geometry at capture time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Check if a viewport point falls inside this rect
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// Center point of the rect (x, y)
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Point-in-time description of one DOM node
///
/// Immutable once built; re-inspecting an element produces a new snapshot.
/// The `selector` and `xpath` each resolve back to the captured node at
/// capture time only — snapshots are historical, not live references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Shortest CSS selector identifying the element (best-effort unique)
    pub selector: String,
    /// Absolute XPath from the document root
    pub xpath: String,
    /// All HTML attributes at capture time
    pub attributes: HashMap<String, String>,
    /// Allow-listed computed style properties
    pub computed_styles: HashMap<String, String>,
    /// Viewport-relative geometry
    pub bounding_rect: BoundingRect,
    /// Serialized markup snapshot
    pub outer_html: String,
}

/// Buffered `console.error` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleErrorRecord {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Event origin, always "console" for this record type
    pub source: String,
    /// Line number parsed from the stack trace, 0 when unknown
    pub line_number: u32,
}

impl ConsoleErrorRecord {
    pub fn new(message: impl Into<String>, line_number: u32) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            source: "console".to_string(),
            line_number,
        }
    }
}

/// Buffered failed-request event (HTTP error status or transport failure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkErrorRecord {
    pub url: String,
    /// HTTP status, 0 for transport-level failures
    pub status: u16,
    pub status_text: String,
    pub method: String,
    pub timestamp: DateTime<Utc>,
}

impl NetworkErrorRecord {
    pub fn new(
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            status_text: status_text.into(),
            method: method.into(),
            timestamp: Utc::now(),
        }
    }

    /// Record a request that never produced a response (DNS failure,
    /// connection refused, CORS rejection). Status is 0 and the exception
    /// message stands in for the status text.
    pub fn transport_failure(
        url: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(url, 0, message, method)
    }
}

/// Page identity at capture time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    /// `location.href`
    pub url: String,
    /// `document.title`
    pub title: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// A captured bug/observation: the externally persisted unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Time-based token: capture timestamp in milliseconds, base 36
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Page URL at capture time
    pub url: String,
    /// Issue title, derived from the page title unless overridden
    pub title: String,
    /// Snapshot of the captured element, if one was selected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementSnapshot>,
    /// Screenshot as a `data:image/png;base64,` URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Most recent console errors at capture time
    #[serde(default)]
    pub console_errors: Vec<ConsoleErrorRecord>,
    /// Most recent network errors at capture time
    #[serde(default)]
    pub network_errors: Vec<NetworkErrorRecord>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Issue {
    /// Create an issue stamped with the current time
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self::at(Utc::now(), url, title)
    }

    /// Create an issue stamped with an explicit capture time
    pub fn at(timestamp: DateTime<Utc>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: issue_token(timestamp),
            timestamp,
            url: url.into(),
            title: title.into(),
            element: None,
            screenshot: None,
            console_errors: Vec::new(),
            network_errors: Vec::new(),
            severity: Severity::default(),
            status: IssueStatus::default(),
            tags: Vec::new(),
        }
    }

    pub fn with_element(mut self, element: ElementSnapshot) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_screenshot(mut self, screenshot: impl Into<String>) -> Self {
        self.screenshot = Some(screenshot.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Issue id token: capture time in milliseconds rendered in base 36
pub fn issue_token(timestamp: DateTime<Utc>) -> String {
    to_base36(timestamp.timestamp_millis().max(0) as u64)
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical < Severity::High);
        assert!(Severity::High < Severity::Medium);
        assert!(Severity::Medium < Severity::Low);
    }

    #[test]
    fn test_severity_parsing() {
        let sev: Severity = "high".parse().unwrap();
        assert_eq!(sev, Severity::High);
        assert_eq!(sev.to_string(), "high");
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_status_parsing() {
        let status: IssueStatus = "in_progress".parse().unwrap();
        assert_eq!(status, IssueStatus::InProgress);
        assert_eq!(status.to_string(), "in_progress");
    }

    #[test]
    fn test_bounding_rect_contains_and_center() {
        let rect = BoundingRect::new(10.0, 20.0, 100.0, 50.0);
        assert!(rect.contains(70.0, 35.0));
        assert!(!rect.contains(5.0, 5.0));
        assert_eq!(rect.center(), (70.0, 35.0));
    }

    #[test]
    fn test_base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_issue_token_round_trips() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let token = issue_token(ts);
        let millis = u64::from_str_radix(&token, 36).unwrap();
        assert_eq!(millis, 1_700_000_000_000);
    }

    #[test]
    fn test_issue_defaults() {
        let issue = Issue::new("https://example.com", "Example Domain");
        assert_eq!(issue.severity, Severity::Medium);
        assert_eq!(issue.status, IssueStatus::Open);
        assert!(issue.element.is_none());
        assert!(issue.screenshot.is_none());
        assert!(issue.tags.is_empty());
        assert_eq!(issue.id, issue_token(issue.timestamp));
    }

    #[test]
    fn test_transport_failure_record() {
        let record =
            NetworkErrorRecord::transport_failure("https://api.test/x", "GET", "Failed to fetch");
        assert_eq!(record.status, 0);
        assert_eq!(record.status_text, "Failed to fetch");
        assert_eq!(record.method, "GET");
    }
}
