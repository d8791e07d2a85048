//! Bug creation form.

use std::cell::RefCell;
use std::rc::Rc;

use db::models::bug::{BugStatus, CreateBug, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

#[derive(Debug, Clone, Default, PartialEq)]
struct Draft {
    title: String,
    description: String,
    status: BugStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Status,
}

/// Clears the draft back to its initial state. Handed to the submit
/// operation so that clearing is tied to confirmed persistence, not to the
/// act of submitting.
pub struct ResetHandle {
    draft: Rc<RefCell<Draft>>,
}

impl ResetHandle {
    pub fn reset(self) {
        *self.draft.borrow_mut() = Draft::default();
    }
}

/// Draft state and validation for the new-bug form. Submission itself is
/// delegated to the caller-supplied operation.
pub struct BugForm {
    draft: Rc<RefCell<Draft>>,
    focus: FormField,
    validation_error: Option<String>,
}

impl Default for BugForm {
    fn default() -> Self {
        Self::new()
    }
}

impl BugForm {
    pub fn new() -> Self {
        Self {
            draft: Rc::new(RefCell::new(Draft::default())),
            focus: FormField::Title,
            validation_error: None,
        }
    }

    pub fn title(&self) -> String {
        self.draft.borrow().title.clone()
    }

    pub fn description(&self) -> String {
        self.draft.borrow().description.clone()
    }

    pub fn status(&self) -> BugStatus {
        self.draft.borrow().status
    }

    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn focused(&self) -> FormField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Status,
            FormField::Status => FormField::Title,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormField::Title => FormField::Status,
            FormField::Description => FormField::Title,
            FormField::Status => FormField::Description,
        };
    }

    /// Append a character to the focused text field. Length caps are
    /// enforced here at the input level; the store enforces them again.
    pub fn input_char(&mut self, c: char) {
        let mut draft = self.draft.borrow_mut();
        let edited = match self.focus {
            FormField::Title => push_capped(&mut draft.title, c, TITLE_MAX_CHARS),
            FormField::Description => push_capped(&mut draft.description, c, DESCRIPTION_MAX_CHARS),
            FormField::Status => false,
        };
        drop(draft);
        if edited {
            self.validation_error = None;
        }
    }

    pub fn backspace(&mut self) {
        let mut draft = self.draft.borrow_mut();
        let edited = match self.focus {
            FormField::Title => draft.title.pop().is_some(),
            FormField::Description => draft.description.pop().is_some(),
            FormField::Status => false,
        };
        drop(draft);
        if edited {
            self.validation_error = None;
        }
    }

    /// Cycle the draft status; only active while the status field is
    /// focused.
    pub fn cycle_status(&mut self, step: isize) {
        if self.focus != FormField::Status {
            return;
        }
        let mut draft = self.draft.borrow_mut();
        let all = BugStatus::ALL;
        let current = all.iter().position(|s| *s == draft.status).unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(all.len() as isize) as usize;
        draft.status = all[next];
        drop(draft);
        self.validation_error = None;
    }

    /// Validate the draft and hand it to `submit_op` together with a reset
    /// handle. The draft is only trimmed for the emptiness check; the
    /// payload carries the fields as typed. While `loading` is set the
    /// submit attempt is a no-op.
    pub fn submit(&mut self, loading: bool, submit_op: impl FnOnce(CreateBug, ResetHandle)) {
        if loading {
            return;
        }

        let draft = self.draft.borrow();
        if draft.title.trim().is_empty() || draft.description.trim().is_empty() {
            drop(draft);
            self.validation_error = Some("title and description are required".to_string());
            return;
        }

        let payload = CreateBug {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: Some(draft.status),
        };
        drop(draft);

        self.validation_error = None;
        submit_op(
            payload,
            ResetHandle {
                draft: Rc::clone(&self.draft),
            },
        );
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        submitting: bool,
        submit_error: Option<&str>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" New bug ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(3), // title
            Constraint::Length(5), // description
            Constraint::Length(1), // status
            Constraint::Length(1), // spacing
            Constraint::Length(1), // submit control
            Constraint::Min(0),    // errors
        ])
        .split(inner);

        let draft = self.draft.borrow();
        self.render_text_field(frame, rows[0], " Title ", &draft.title, FormField::Title);
        self.render_text_field(
            frame,
            rows[1],
            " Description ",
            &draft.description,
            FormField::Description,
        );

        let status_style = if self.focus == FormField::Status {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" status ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("< {} >", draft.status), status_style),
            ])),
            rows[2],
        );
        drop(draft);

        let submit_label = if submitting {
            " [ Submitting... ] "
        } else {
            " [ Submit ] "
        };
        let submit_style = if submitting {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        };
        frame.render_widget(
            Paragraph::new(Line::styled(submit_label, submit_style)),
            rows[4],
        );

        let mut error_lines = Vec::new();
        if let Some(message) = &self.validation_error {
            error_lines.push(Line::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ));
        }
        if let Some(message) = submit_error {
            error_lines.push(Line::styled(
                message.to_string(),
                Style::default().fg(Color::Red),
            ));
        }
        if !error_lines.is_empty() {
            frame.render_widget(
                Paragraph::new(error_lines).wrap(Wrap { trim: false }),
                rows[5],
            );
        }
    }

    fn render_text_field(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: &'static str,
        value: &str,
        field: FormField,
    ) {
        let border_style = if self.focus == field {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        frame.render_widget(
            Paragraph::new(value.to_string())
                .wrap(Wrap { trim: false })
                .block(block),
            area,
        );
    }
}

fn push_capped(value: &mut String, c: char, max_chars: usize) -> bool {
    if value.chars().count() >= max_chars {
        return false;
    }
    value.push(c);
    true
}
