//! Line-oriented run report on stdout.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;

use ncx_core::{EventSink, RunEvent, RunSummary};

use crate::cli::ColorMode;

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

/// Writes one line per run event.
pub struct Reporter<W> {
    out: W,
    color: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Closing tally line.
    pub fn finish(&mut self, summary: &RunSummary) {
        let line = format!(
            "Done: {} of {} target(s) fully succeeded; {} item(s) created or already present, {} failure(s).",
            summary.targets_succeeded, summary.targets, summary.succeeded, summary.failed
        );
        let _ = writeln!(self.out, "{}", self.paint(&line, summary.failed > 0));
    }

    fn paint(&self, line: &str, failed: bool) -> String {
        if !self.color {
            return line.to_owned();
        }
        if failed {
            line.yellow().to_string()
        } else {
            line.green().to_string()
        }
    }

    fn render(&self, event: &RunEvent) -> String {
        let line = event.to_string();
        if !self.color {
            return line;
        }
        match event {
            RunEvent::Started { .. } => line,
            RunEvent::ResourceCreated { .. }
            | RunEvent::ResourceExists { .. }
            | RunEvent::SiteReady { .. } => line.green().to_string(),
            RunEvent::SiteUnverified { .. } => line.yellow().to_string(),
            RunEvent::Failed { .. } => line.red().to_string(),
            RunEvent::TargetSucceeded { .. } => line.green().bold().to_string(),
        }
    }
}

impl<W: Write> EventSink for Reporter<W> {
    fn emit(&mut self, event: RunEvent) {
        let line = self.render(&event);
        let _ = writeln!(self.out, "{line}");
        if matches!(event, RunEvent::TargetSucceeded { .. }) {
            let _ = writeln!(self.out);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ncx_core::{TargetMode, TargetSelector};

    use super::*;

    #[test]
    fn plain_output_matches_event_text() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.emit(RunEvent::TargetSucceeded {
            target: TargetSelector::new(TargetMode::DeviceId, "111"),
        });
        reporter.finish(&RunSummary {
            targets: 1,
            targets_succeeded: 1,
            succeeded: 2,
            failed: 0,
        });
        let text = String::from_utf8(reporter.out).unwrap();
        assert_eq!(
            text,
            "Success!\n\nDone: 1 of 1 target(s) fully succeeded; 2 item(s) created or already present, 0 failure(s).\n"
        );
    }

    #[test]
    fn colored_output_wraps_in_escapes() {
        let reporter = Reporter::new(Vec::new(), true);
        let line = reporter.render(&RunEvent::TargetSucceeded {
            target: TargetSelector::new(TargetMode::DeviceId, "1"),
        });
        assert!(line.contains("\u{1b}["), "{line:?}");
        assert!(line.contains("Success!"));
    }
}
