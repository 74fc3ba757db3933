//! Terminal output for the CLI, written to stderr.

use std::fmt::Display;

use console::{Style, Term};

/// Styled stderr printer.
pub(crate) struct Output {
    term: Term,
    label: Style,
    url: Style,
    ok: Style,
    warn: Style,
    fail: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            url: Style::new().cyan().bold(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }

    /// Print an aligned `label: value` line.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = format!("{label:>10}:");
        self.line(&format!("{} {value}", self.label.apply_to(label)));
    }

    /// Print a `label: http://host` line with the host highlighted.
    pub(crate) fn site(&self, label: &str, host: &str) {
        let url = format!("http://{host}");
        self.field(label, self.url.apply_to(url));
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.ok.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warn.apply_to(format!("warning: {msg}")).to_string());
    }

    /// Print an error in red, prefixed with `Error:`.
    pub(crate) fn error(&self, err: impl Display) {
        self.line(&self.fail.apply_to(format!("Error: {err}")).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
