//! Frame layout for the client.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, Panel};
use crate::form::FormField;

/// Draw the whole screen: header, the boundary-wrapped panels, and the key
/// hint footer.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let root = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Min(0),    // body
        Constraint::Length(1), // footer
    ])
    .split(frame.area());

    draw_header(frame, app, root[0]);
    draw_footer(frame, app, root[2]);

    let App {
        bugs,
        loading,
        list_error,
        submitting,
        submit_error,
        form,
        list,
        root_boundary,
        form_boundary,
        list_boundary,
        ..
    } = app;

    root_boundary.render(frame, root[1], |frame, area| {
        let cols =
            Layout::horizontal([Constraint::Percentage(38), Constraint::Percentage(62)])
                .split(area);

        form_boundary.render(frame, cols[0], |frame, area| {
            form.render(frame, area, *submitting, submit_error.as_deref());
        });
        list_boundary.render(frame, cols[1], |frame, area| {
            list.render(frame, area, bugs, *loading, list_error.as_deref());
        });
    });
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " bugboard ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} bugs tracked", app.bugs.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hint = if app.any_boundary_failed() {
        "r try again  esc quit"
    } else {
        match app.focus {
            Panel::Form if app.form.focused() == FormField::Status => {
                "tab list  up/down field  left/right status  enter submit  esc quit"
            }
            Panel::Form => "tab list  up/down field  enter submit  esc quit",
            Panel::List => "tab form  j/k select  1/2/3 status  d delete  r refresh  esc quit",
        }
    };
    frame.render_widget(
        Paragraph::new(Line::styled(hint, Style::default().fg(Color::DarkGray))),
        area,
    );
}
