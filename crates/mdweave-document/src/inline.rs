//! Inline style scanner.
//!
//! Turns one line of raw text into an ordered sequence of styled
//! [`InlineRun`]s. Code spans bind tightest; their contents are never
//! reinterpreted. Bold (`**`/`__`) and italic (`*`/`_`) nest, producing runs
//! with both flags set. `[text](url)` links keep only the label text in the
//! run, with the URL carried on the side. A delimiter without a matching
//! closer is literal text: the scanner never drops characters and never
//! fails.

use crate::block::InlineRun;

/// Scan `text` left to right into styled runs.
///
/// Adjacent runs with identical style flags are merged, so the result is a
/// minimal sequence whose concatenated text equals `text` with the style and
/// link markers removed.
#[must_use]
pub fn format_inline(text: &str) -> Vec<InlineRun> {
    let mut scanner = Scanner::default();
    scanner.scan(text);
    scanner.finish()
}

/// Scanner state: the styles currently open and the text accumulated since
/// the last style change.
#[derive(Default)]
struct Scanner {
    runs: Vec<InlineRun>,
    buf: String,
    /// Marker char that opened the active bold span (`*` or `_`).
    bold: Option<char>,
    /// Marker char that opened the active italic span.
    italic: Option<char>,
    /// URL of the link whose label is being scanned.
    link: Option<String>,
}

impl Scanner {
    /// Consume `text`, appending runs. Re-entered for link labels.
    fn scan(&mut self, text: &str) {
        let mut rest = text;

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('`') {
                rest = self.code_span(after);
                continue;
            }
            if rest.starts_with("**") || rest.starts_with("__") {
                rest = self.bold_marker(rest);
                continue;
            }
            if rest.starts_with('*') || rest.starts_with('_') {
                rest = self.italic_marker(rest);
                continue;
            }
            if rest.starts_with('[')
                && let Some(after) = self.link(rest)
            {
                rest = after;
                continue;
            }
            let ch = rest.chars().next().expect("rest is non-empty");
            self.buf.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }

    /// Handle a code span. `after` starts just past the opening backtick.
    /// Without a closing backtick the opener is literal text.
    fn code_span<'a>(&mut self, after: &'a str) -> &'a str {
        match after.find('`') {
            Some(end) => {
                self.flush();
                self.push_run(&after[..end], true);
                &after[end + 1..]
            }
            None => {
                self.buf.push('`');
                after
            }
        }
    }

    /// Handle a two-char bold marker at the start of `rest`.
    fn bold_marker<'a>(&mut self, rest: &'a str) -> &'a str {
        let marker = if rest.starts_with("**") { "**" } else { "__" };
        let ch = marker.chars().next().expect("marker is non-empty");

        if self.bold == Some(ch) {
            self.flush();
            self.bold = None;
        } else if self.bold.is_none() && rest[2..].contains(marker) {
            self.flush();
            self.bold = Some(ch);
        } else {
            // No matching closer ahead (or already bold with the other
            // marker): keep the characters.
            self.buf.push_str(marker);
        }
        &rest[2..]
    }

    /// Handle a one-char italic marker at the start of `rest`.
    fn italic_marker<'a>(&mut self, rest: &'a str) -> &'a str {
        let ch = rest.chars().next().expect("rest is non-empty");

        if self.italic == Some(ch) {
            self.flush();
            self.italic = None;
        } else if self.italic.is_none() && rest[1..].contains(ch) {
            self.flush();
            self.italic = Some(ch);
        } else {
            self.buf.push(ch);
        }
        &rest[1..]
    }

    /// Handle a `[label](url)` link at the start of `rest`. The label is
    /// scanned for nested styles with the link URL active; the URL itself
    /// never becomes run text. Returns `None` when the shape does not match,
    /// leaving the `[` literal.
    fn link<'a>(&mut self, rest: &'a str) -> Option<&'a str> {
        let inner = &rest[1..];
        let close = inner.find("](")?;
        let url_len = inner[close + 2..].find(')')?;
        let label = &inner[..close];
        let url = &inner[close + 2..close + 2 + url_len];
        if label.is_empty() || url.is_empty() {
            return None;
        }

        self.flush();
        let outer = self.link.replace(url.to_owned());
        self.scan(label);
        self.flush();
        self.link = outer;
        Some(&inner[close + 3 + url_len..])
    }

    /// Emit the accumulated buffer as a run with the current style flags.
    fn flush(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.buf);
        self.push_run(&text, false);
    }

    fn push_run(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        let (bold, italic) = (self.bold.is_some(), self.italic.is_some());
        if let Some(last) = self.runs.last_mut()
            && last.bold == bold
            && last.italic == italic
            && last.code == code
            && last.link == self.link
        {
            last.text.push_str(text);
            return;
        }
        self.runs.push(InlineRun {
            text: text.to_owned(),
            bold,
            italic,
            code,
            link: self.link.clone(),
        });
    }

    fn finish(mut self) -> Vec<InlineRun> {
        self.flush();
        self.runs
    }
}
