//! User-friendly diagnostic messages.
//!
//! Every fatal error names the offending project and manifest so it can be
//! located and fixed without re-running with extra logging.

use std::fmt;
use std::path::PathBuf;

/// Canned help lines shared by several errors.
pub mod suggestions {
    pub const FIX_MANIFEST: &str = "Fix the pom.xml and run the command again";

    pub const CHECK_MODULES: &str =
        "Check that every `<module>` entry points to a directory containing a pom.xml";

    pub const NO_WORKSPACE: &str = "Run from a directory containing nx.json or pass --root";

    pub const STALE_CACHE: &str = "Run `pomgraph cache clean` to drop cached workspace data";
}

const BOLD_RED: &str = "1;31";
const BOLD_YELLOW: &str = "1;33";
const BOLD_GREEN: &str = "1;32";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => BOLD_RED,
            Severity::Warning => BOLD_YELLOW,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A message for the terminal, with the manifest it concerns and how to fix it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub location: Option<PathBuf>,
    /// `= ...` lines under the headline.
    pub notes: Vec<String>,
    /// Ways out; numbered when there is more than one.
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(severity: Severity, message: String) -> Self {
        Diagnostic {
            severity,
            message,
            location: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, message.into())
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, message.into())
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Render for stderr, with ANSI colors when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_to(&mut out, color);
        out
    }

    fn write_to(&self, out: &mut impl fmt::Write, color: bool) -> fmt::Result {
        let severity = paint(color, self.severity.ansi(), self.severity.label());
        writeln!(out, "{}: {}", severity, self.message)?;

        if let Some(path) = &self.location {
            writeln!(out, "  --> {}", path.display())?;
        }
        for note in &self.notes {
            writeln!(out, "  = {}", note)?;
        }

        let help = paint(color, BOLD_GREEN, "help");
        match self.help.as_slice() {
            [] => {}
            [only] => write!(out, "\n{}: {}\n", help, only)?,
            many => {
                write!(out, "\n{}: consider:\n", help)?;
                for (n, line) in many.iter().enumerate() {
                    writeln!(out, "  {}. {}", n + 1, line)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}

fn paint(color: bool, code: &str, text: &str) -> String {
    if color {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.render(color));
}
