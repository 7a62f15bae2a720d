//! Colored terminal output.
//!
//! Status messages go to stderr, compiled documents to stdout, so
//! `mark compile doc.md > doc.xml` captures only the document.

use std::io;

use console::{Style, Term};

/// Terminal output formatter.
pub(crate) struct Output {
    status: Term,
    document: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            document: Term::stdout(),
        }
    }

    /// Plain status line.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.status.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.styled(&Style::new().green(), msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.styled(&Style::new().yellow(), msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.styled(&Style::new().red(), msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.styled(&Style::new().cyan().bold(), msg);
    }

    /// Write compiled storage format to stdout, newline-terminated.
    pub(crate) fn document(&self, storage: &str) -> io::Result<()> {
        self.document.write_str(storage)?;
        if !storage.ends_with('\n') {
            self.document.write_line("")?;
        }
        Ok(())
    }

    fn styled(&self, style: &Style, msg: &str) {
        let _ = self.status.write_line(&style.apply_to(msg).to_string());
    }
}
