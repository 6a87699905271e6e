//! Terminal rendering surface for the controller.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use sqldoc_core::{DownloadLink, Preview};
use sqldoc_engine::View;

const TICK: Duration = Duration::from_millis(80);

/// Draws previews as Markdown on stdout and job progress as an indicatif bar on stderr.
#[derive(Default)]
pub struct TerminalView {
    bar: Option<ProgressBar>,
    error_shown: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_shown(&self) -> bool {
        self.error_shown
    }

    /// Clears any live progress line. Call before printing the final summary.
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn emit(&self, text: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }

    fn emit_err(&self, text: &str) {
        match &self.bar {
            Some(bar) => bar.suspend(|| eprintln!("{text}")),
            None => eprintln!("{text}"),
        }
    }
}

impl View for TerminalView {
    fn show_preview(&mut self, preview: &Preview) {
        self.error_shown = false;
        self.emit(&render_preview_text(preview));
    }

    fn show_error(&mut self, message: &str) {
        self.error_shown = true;
        self.emit_err(&format!("\x1b[31m{message}\x1b[0m"));
    }

    fn set_progress(&mut self, progress: Option<u8>) {
        let Some(bar) = &self.bar else {
            return;
        };
        match progress {
            Some(percent) => {
                bar.set_style(bar_style());
                bar.set_length(100);
                bar.set_position(u64::from(percent));
            }
            None => bar.set_style(spinner_style()),
        }
    }

    fn set_download(&mut self, link: Option<&DownloadLink>) {
        if let Some(link) = link {
            self.emit(&format!("Result ready: {} ({})", link.filename, link.url));
        }
    }

    fn set_busy(&mut self, busy: bool) {
        if busy {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.set_message("Running…");
            bar.enable_steady_tick(TICK);
            self.bar = Some(bar);
        } else {
            self.finish();
        }
    }
}

/// Terminal rendering of the server's HTML fragments.
pub fn render_preview_text(preview: &Preview) -> String {
    let translation = html2md::parse_html(&preview.html_trans);
    let code = html2md::parse_html(&preview.code_html);
    format!(
        "\x1b[1m── Translation ──\x1b[0m\n{}\n\n\x1b[1m── SQL ──\x1b[0m\n{}",
        translation.trim_end(),
        code.trim_end()
    )
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} [{bar:40.green/238}] {pos:>3}%")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}
