//! Progress rendering for CLI downloads

use std::io::Write;
use std::time::Duration;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};

use super::{DownloadEvent, DownloadProgress};

/// Format a duration as "1h 2m 3s", dropping zero hours and minutes
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}

/// ETA text, "0s" when unknown
pub fn format_eta(eta: Option<Duration>) -> String {
    eta.map(format_duration).unwrap_or_else(|| "0s".to_string())
}

/// Single-line progress bar redrawn in place
pub struct ProgressBar {
    width: usize,
}

impl ProgressBar {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(1) }
    }

    /// `█████░░░░░ | 50% | 3.20 MB/s | ETA: 1m 4s`
    pub fn render(&self, progress: &DownloadProgress) -> String {
        let filled = ((progress.fraction * self.width as f64) as usize).min(self.width);
        format!(
            "{}{} | {}% | {:.2} MB/s | ETA: {}",
            "█".repeat(filled),
            "░".repeat(self.width - filled),
            progress.percent(),
            progress.speed_mbps(),
            format_eta(progress.eta)
        )
    }

    /// Draw one event to `out`
    pub fn draw<W: Write>(&self, out: &mut W, event: &DownloadEvent) -> std::io::Result<()> {
        match event {
            DownloadEvent::Started { name } => {
                writeln!(out, "Started downloading: {}", name)?;
            }
            DownloadEvent::Progress(progress) => {
                execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                write!(out, "{}", self.render(progress))?;
            }
            DownloadEvent::Completed => {
                let done = DownloadProgress {
                    fraction: 1.0,
                    ..Default::default()
                };
                execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                writeln!(out, "{}", self.render(&done))?;
                writeln!(out, "Download complete!")?;
            }
            DownloadEvent::Failed(message) => {
                writeln!(out)?;
                writeln!(out, "Error during download: {}", message)?;
            }
        }
        out.flush()
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new(40)
    }
}
