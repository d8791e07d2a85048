//! Failure isolation for panel rendering.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

const FALLBACK_HEADING: &str = " Something went wrong ";
const GENERIC_FAILURE: &str = "an unexpected rendering failure occurred";
const RECOVERY_HINT: &str = "press r to try again";

/// Wraps a panel's draw path and contains any panic it raises.
///
/// Once a panic is caught the boundary stays failed and keeps showing the
/// fallback on every subsequent render, even if the wrapped content would no
/// longer panic. Only `reset` returns it to normal rendering.
pub struct RenderBoundary {
    name: &'static str,
    failure: Option<Box<dyn Any + Send>>,
}

impl RenderBoundary {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            failure: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Best-effort text for the stored panic payload, if any.
    pub fn failure_message(&self) -> Option<String> {
        self.failure
            .as_ref()
            .map(|payload| describe_payload(payload.as_ref()))
    }

    /// Drop the stored failure so the next render attempts the wrapped
    /// content again. Driven by the user's recovery key, never automatic.
    pub fn reset(&mut self) {
        self.failure = None;
    }

    /// Render the wrapped content, or the fallback when failed.
    pub fn render(
        &mut self,
        frame: &mut Frame<'_>,
        area: Rect,
        draw: impl FnOnce(&mut Frame<'_>, Rect),
    ) {
        if self.failure.is_some() {
            self.render_fallback(frame, area);
            return;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| draw(&mut *frame, area)));
        if let Err(payload) = outcome {
            // Report before rendering the fallback; neither step may panic.
            tracing::error!(
                boundary = self.name,
                failure = %describe_payload(payload.as_ref()),
                "rendering failure contained"
            );
            self.failure = Some(payload);
            self.render_fallback(frame, area);
        }
    }

    fn render_fallback(&self, frame: &mut Frame<'_>, area: Rect) {
        let detail = self
            .failure_message()
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        // The panicking draw may have left partial widget output behind.
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(FALLBACK_HEADING);
        let lines = vec![
            Line::raw(""),
            Line::styled(detail, Style::default().fg(Color::Red)),
            Line::raw(""),
            Line::styled(
                RECOVERY_HINT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
            area,
        );
    }
}

/// Panic payloads are arbitrary; only `&str` and `String` carry readable
/// text, everything else gets the generic message.
fn describe_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        GENERIC_FAILURE.to_string()
    }
}
