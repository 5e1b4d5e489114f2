//! Colored progress reporting for conversion runs.
//!
//! Everything human-facing goes to stderr, so generated paths and document
//! URLs stay readable when stdout is redirected.

use console::{Style, Term};

/// Width of the rule printed before the end-of-run tally.
const SUMMARY_RULE_WIDTH: usize = 70;

/// Reports conversion progress to the terminal.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    fn line(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print an unstyled info message.
    pub(crate) fn info(&self, msg: &str) {
        self.line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        self.line(&Style::new().green().apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        self.line(&Style::new().yellow().apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        self.line(&Style::new().red().apply_to(msg).to_string());
    }

    /// Announce the document a directory run is about to convert.
    pub(crate) fn processing(&self, title: &str) {
        self.line(&format!("\nProcessing: {title}"));
    }

    /// Show the URL of a freshly created document (cyan bold, so it stands
    /// out from the surrounding progress lines).
    pub(crate) fn document_url(&self, url: &str) {
        let styled = Style::new().cyan().bold().apply_to(url_line(url));
        self.line(&styled.to_string());
    }

    /// Close a directory run: a rule followed by the conversion tally.
    pub(crate) fn summary(&self, converted: usize, total: usize) {
        self.line(&"=".repeat(SUMMARY_RULE_WIDTH));
        self.line(&summary_line(converted, total));
    }
}

fn url_line(url: &str) -> String {
    format!("URL: {url}")
}

fn summary_line(converted: usize, total: usize) -> String {
    format!("Completed: {converted} of {total} files converted successfully")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_summary_line_reports_tally() {
        assert_eq!(
            summary_line(2, 3),
            "Completed: 2 of 3 files converted successfully"
        );
        assert_eq!(
            summary_line(0, 1),
            "Completed: 0 of 1 files converted successfully"
        );
    }

    #[test]
    fn test_url_line_prefixes_url() {
        assert_eq!(
            url_line("https://docs.google.com/document/d/abc/edit"),
            "URL: https://docs.google.com/document/d/abc/edit"
        );
    }
}
