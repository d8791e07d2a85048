//! Record list panel and per-item controls.

use crossterm::event::KeyCode;
use db::models::bug::{Bug, BugStatus};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use utils::time::format_timestamp;
use uuid::Uuid;

const EMPTY_MESSAGE: &str = "No bugs yet. Create one with the form.";
const LOADING_MESSAGE: &str = "Loading bugs...";

/// Which of the four mutually exclusive list views applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Error,
    Loading,
    Empty,
    Items,
}

/// A non-empty error wins over everything, including the loading state; an
/// empty set only shows the empty message once loading has finished clean.
pub fn view_state(record_count: usize, loading: bool, error: Option<&str>) -> ListView {
    if error.is_some_and(|message| !message.is_empty()) {
        ListView::Error
    } else if loading {
        ListView::Loading
    } else if record_count == 0 {
        ListView::Empty
    } else {
        ListView::Items
    }
}

/// Item-level action delegated up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    SetStatus(Uuid, BugStatus),
    Delete(Uuid),
}

/// Selection state for the list panel. Rendering is a pure function of the
/// records and flags passed in; mutations are delegated via `ItemAction`.
#[derive(Default)]
pub struct BugList {
    selected: usize,
}

impl BugList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection valid after the record set shrinks.
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Map a key press to an action on the selected record.
    pub fn action_for_key(&self, bugs: &[Bug], key: KeyCode) -> Option<ItemAction> {
        let bug = bugs.get(self.selected)?;
        match key {
            KeyCode::Char('1') => Some(ItemAction::SetStatus(bug.id, BugStatus::Open)),
            KeyCode::Char('2') => Some(ItemAction::SetStatus(bug.id, BugStatus::InProgress)),
            KeyCode::Char('3') => Some(ItemAction::SetStatus(bug.id, BugStatus::Resolved)),
            KeyCode::Char('d') => Some(ItemAction::Delete(bug.id)),
            _ => None,
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        bugs: &[Bug],
        loading: bool,
        error: Option<&str>,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" Bugs ({}) ", bugs.len()));

        match view_state(bugs.len(), loading, error) {
            ListView::Error => {
                let message = error.unwrap_or_default().to_string();
                frame.render_widget(
                    Paragraph::new(Line::styled(message, Style::default().fg(Color::Red)))
                        .wrap(Wrap { trim: false })
                        .block(block),
                    area,
                );
            }
            ListView::Loading => {
                frame.render_widget(
                    Paragraph::new(Line::styled(
                        LOADING_MESSAGE,
                        Style::default().fg(Color::DarkGray),
                    ))
                    .block(block),
                    area,
                );
            }
            ListView::Empty => {
                frame.render_widget(
                    Paragraph::new(Line::styled(
                        EMPTY_MESSAGE,
                        Style::default().fg(Color::DarkGray),
                    ))
                    .block(block),
                    area,
                );
            }
            ListView::Items => {
                let items: Vec<ListItem<'_>> = bugs.iter().map(render_item).collect();
                let mut state = ListState::default().with_selected(Some(self.selected));
                let list = List::new(items)
                    .block(block)
                    .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
                frame.render_stateful_widget(list, area, &mut state);
            }
        }
    }
}

fn render_item(bug: &Bug) -> ListItem<'static> {
    let badge_style = Style::default()
        .fg(Color::Black)
        .bg(status_color(bug.status))
        .add_modifier(Modifier::BOLD);
    let muted = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::styled(bug.title.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(format!(" {} ", bug.status), badge_style),
        ]),
        Line::styled(bug.description.clone(), Style::default()),
        Line::styled(
            format!(
                "created {}  updated {}",
                format_timestamp(&bug.created_at),
                format_timestamp(&bug.updated_at)
            ),
            muted,
        ),
        Line::raw(""),
    ];
    ListItem::new(lines)
}

fn status_color(status: BugStatus) -> Color {
    match status {
        BugStatus::Open => Color::Yellow,
        BugStatus::InProgress => Color::Blue,
        BugStatus::Resolved => Color::Green,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn sample_bug(title: &str) -> Bug {
        let now = Utc::now();
        Bug {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{title} description"),
            status: BugStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    fn render_to_text(list: &BugList, bugs: &[Bug], loading: bool, error: Option<&str>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                list.render(frame, area, bugs, loading, error);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_error_takes_precedence_over_loading() {
        assert_eq!(view_state(0, true, Some("fetch failed")), ListView::Error);
    }

    #[test]
    fn test_error_takes_precedence_over_empty_set() {
        assert_eq!(view_state(0, false, Some("fetch failed")), ListView::Error);
    }

    #[test]
    fn test_empty_error_string_is_not_an_error() {
        assert_eq!(view_state(0, true, Some("")), ListView::Loading);
    }

    #[test]
    fn test_view_state_table() {
        assert_eq!(view_state(0, true, None), ListView::Loading);
        assert_eq!(view_state(0, false, None), ListView::Empty);
        assert_eq!(view_state(3, false, None), ListView::Items);
        assert_eq!(view_state(3, true, None), ListView::Loading);
    }

    #[test]
    fn test_empty_state_message_rendered() {
        let list = BugList::new();
        let text = render_to_text(&list, &[], false, None);
        assert!(text.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_one_item_per_record() {
        let list = BugList::new();
        let bugs = vec![sample_bug("First bug"), sample_bug("Second bug")];
        let text = render_to_text(&list, &bugs, false, None);
        assert!(text.contains("First bug"));
        assert!(text.contains("Second bug"));
        assert!(!text.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_error_view_shows_message_not_items() {
        let list = BugList::new();
        let bugs = vec![sample_bug("Hidden bug")];
        let text = render_to_text(&list, &bugs, false, Some("server unreachable"));
        assert!(text.contains("server unreachable"));
        assert!(!text.contains("Hidden bug"));
    }

    #[test]
    fn test_action_for_key_targets_selected_record() {
        let bugs = vec![sample_bug("First bug"), sample_bug("Second bug")];
        let mut list = BugList::new();
        list.select_next(bugs.len());

        assert_eq!(
            list.action_for_key(&bugs, KeyCode::Char('3')),
            Some(ItemAction::SetStatus(bugs[1].id, BugStatus::Resolved))
        );
        assert_eq!(
            list.action_for_key(&bugs, KeyCode::Char('d')),
            Some(ItemAction::Delete(bugs[1].id))
        );
        assert_eq!(list.action_for_key(&bugs, KeyCode::Enter), None);
    }

    #[test]
    fn test_action_for_key_with_no_records() {
        let list = BugList::new();
        assert_eq!(list.action_for_key(&[], KeyCode::Char('d')), None);
    }

    #[test]
    fn test_selection_clamps_after_shrink() {
        let mut list = BugList::new();
        list.select_next(3);
        list.select_next(3);
        assert_eq!(list.selected(), 2);

        list.clamp(1);
        assert_eq!(list.selected(), 0);

        list.clamp(0);
        assert_eq!(list.selected(), 0);
    }
}
