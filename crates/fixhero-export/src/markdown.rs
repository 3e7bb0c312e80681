//! Markdown report generation

use fixhero_core::Issue;
use std::fmt::Write as _;

/// Render issues as one Markdown report, in the order given
pub fn to_markdown(issues: &[Issue]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# FixHero Issues");
    let _ = writeln!(out);
    let _ = writeln!(out, "{} issue(s)", issues.len());

    for issue in issues {
        let _ = writeln!(out);
        write_issue(&mut out, issue);
    }
    out
}

fn write_issue(out: &mut String, issue: &Issue) {
    let _ = writeln!(out, "## {} (`{}`)", issue.title, issue.id);
    let _ = writeln!(out);
    let _ = writeln!(out, "- **Severity**: {}", issue.severity);
    let _ = writeln!(out, "- **Status**: {}", issue.status);
    let _ = writeln!(out, "- **URL**: {}", issue.url);
    let _ = writeln!(
        out,
        "- **Captured**: {}",
        issue.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if !issue.tags.is_empty() {
        let _ = writeln!(out, "- **Tags**: {}", issue.tags.join(", "));
    }

    if let Some(element) = &issue.element {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Element");
        let _ = writeln!(out);
        let _ = writeln!(out, "- **Selector**: `{}`", element.selector);
        let _ = writeln!(out, "- **XPath**: `{}`", element.xpath);
        let rect = element.bounding_rect;
        let _ = writeln!(
            out,
            "- **Bounding rect**: {}x{} at ({}, {})",
            rect.width, rect.height, rect.left, rect.top
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "```html");
        let _ = writeln!(out, "{}", element.outer_html);
        let _ = writeln!(out, "```");
    }

    if issue.screenshot.is_some() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Screenshot: embedded in issue document");
    }

    if !issue.console_errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Console errors");
        let _ = writeln!(out);
        for error in &issue.console_errors {
            let _ = writeln!(out, "- line {}: {}", error.line_number, error.message);
        }
    }

    if !issue.network_errors.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "### Network errors");
        let _ = writeln!(out);
        for error in &issue.network_errors {
            let _ = writeln!(
                out,
                "- {} {} -> {} {}",
                error.method, error.url, error.status, error.status_text
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixhero_core::{
        BoundingRect, ConsoleErrorRecord, ElementSnapshot, NetworkErrorRecord, Severity,
    };
    use std::collections::HashMap;

    fn issue_with_element() -> Issue {
        let element = ElementSnapshot {
            selector: "#submit".to_string(),
            xpath: "/html/body/button[1]".to_string(),
            attributes: HashMap::new(),
            computed_styles: HashMap::new(),
            bounding_rect: BoundingRect::new(10.0, 20.0, 120.0, 32.0),
            outer_html: "<button id=\"submit\">Go</button>".to_string(),
        };
        let mut issue = Issue::new("https://app.test/checkout", "Checkout")
            .with_element(element)
            .with_severity(Severity::High)
            .with_tags(vec!["payment".to_string()]);
        issue.console_errors = vec![ConsoleErrorRecord::new("boom", 42)];
        issue.network_errors = vec![NetworkErrorRecord::new(
            "https://api.test/pay",
            500,
            "Internal Server Error",
            "POST",
        )];
        issue
    }

    #[test]
    fn test_report_header_and_count() {
        let report = to_markdown(&[issue_with_element()]);
        assert!(report.starts_with("# FixHero Issues"));
        assert!(report.contains("1 issue(s)"));
    }

    #[test]
    fn test_issue_sections_carry_data_contract() {
        let issue = issue_with_element();
        let report = to_markdown(&[issue.clone()]);

        assert!(report.contains(&format!("## Checkout (`{}`)", issue.id)));
        assert!(report.contains("- **Severity**: high"));
        assert!(report.contains("- **Tags**: payment"));
        assert!(report.contains("- **Selector**: `#submit`"));
        assert!(report.contains("- **XPath**: `/html/body/button[1]`"));
        assert!(report.contains("<button id=\"submit\">Go</button>"));
        assert!(report.contains("- line 42: boom"));
        assert!(report.contains("- POST https://api.test/pay -> 500 Internal Server Error"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let issue = Issue::new("https://app.test", "Plain");
        let report = to_markdown(&[issue]);

        assert!(!report.contains("### Element"));
        assert!(!report.contains("### Console errors"));
        assert!(!report.contains("### Network errors"));
        assert!(!report.contains("- **Tags**"));
    }

    #[test]
    fn test_empty_export() {
        let report = to_markdown(&[]);
        assert!(report.contains("0 issue(s)"));
    }
}
