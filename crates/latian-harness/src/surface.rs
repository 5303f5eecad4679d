//! Emulated line surface.

use latian_core::{Message, OverlaySurface, render};

/// A screen of whole lines plus one transient overlay line.
///
/// Writes append rendered lines; retractions remove them from the bottom,
/// the way the local terminal's erase sequences do.
#[derive(Debug, Default, Clone)]
pub struct TerminalSurface {
    lines: Vec<String>,
    overlay: Option<String>,
    overlay_draws: usize,
    underflows: usize,
}

impl TerminalSurface {
    /// Empty surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered message.
    pub fn write(&mut self, message: &Message) {
        self.lines.push(render::render(message));
    }

    /// Erase the `count` bottom lines.
    pub fn retract(&mut self, count: usize) {
        if count > self.lines.len() {
            self.underflows += 1;
        }
        let keep = self.lines.len().saturating_sub(count);
        self.lines.truncate(keep);
    }

    /// Visible lines, top first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Current overlay text, if a timer is showing.
    pub fn overlay(&self) -> Option<&str> {
        self.overlay.as_deref()
    }

    /// Total overlay redraws.
    pub fn overlay_draws(&self) -> usize {
        self.overlay_draws
    }

    /// Retractions that asked for more lines than were visible.
    pub fn underflows(&self) -> usize {
        self.underflows
    }
}

impl OverlaySurface for TerminalSurface {
    fn draw(&mut self, text: &str) {
        self.overlay = Some(text.to_string());
        self.overlay_draws += 1;
    }

    fn clear(&mut self) {
        self.overlay = None;
    }
}
