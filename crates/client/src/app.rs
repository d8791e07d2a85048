//! Application state for the bug tracker TUI.

use db::models::bug::Bug;
use uuid::Uuid;

use crate::api::ApiClientError;
use crate::boundary::RenderBoundary;
use crate::form::{BugForm, ResetHandle};
use crate::list::BugList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Form,
    List,
}

/// All client state, owned by the event loop. API calls run in spawned
/// tasks; only their settled results come back here, so nothing below is
/// ever mutated concurrently.
pub struct App {
    pub bugs: Vec<Bug>,
    pub loading: bool,
    pub list_error: Option<String>,
    pub submitting: bool,
    pub submit_error: Option<String>,
    pub form: BugForm,
    pub list: BugList,
    pub focus: Panel,
    pub pending_reset: Option<ResetHandle>,
    pub should_quit: bool,
    pub root_boundary: RenderBoundary,
    pub form_boundary: RenderBoundary,
    pub list_boundary: RenderBoundary,
}

impl App {
    pub fn new() -> Self {
        Self {
            bugs: Vec::new(),
            loading: true,
            list_error: None,
            submitting: false,
            submit_error: None,
            form: BugForm::new(),
            list: BugList::new(),
            focus: Panel::Form,
            pending_reset: None,
            should_quit: false,
            root_boundary: RenderBoundary::new("root"),
            form_boundary: RenderBoundary::new("form"),
            list_boundary: RenderBoundary::new("list"),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Panel::Form => Panel::List,
            Panel::List => Panel::Form,
        };
    }

    /// A failed fetch leaves the previously known records untouched.
    pub fn on_bugs_loaded(&mut self, result: Result<Vec<Bug>, ApiClientError>) {
        self.loading = false;
        match result {
            Ok(bugs) => {
                self.bugs = bugs;
                self.list_error = None;
                self.list.clamp(self.bugs.len());
            }
            Err(error) => {
                self.list_error = Some(error.to_string());
            }
        }
    }

    /// The draft is cleared only here, once the store has confirmed the
    /// record; on failure the draft stays so the user can retry.
    pub fn on_bug_created(&mut self, result: Result<Bug, ApiClientError>) {
        self.submitting = false;
        match result {
            Ok(bug) => {
                self.bugs.insert(0, bug);
                self.submit_error = None;
                if let Some(handle) = self.pending_reset.take() {
                    handle.reset();
                }
            }
            Err(error) => {
                self.submit_error = Some(error.to_string());
                self.pending_reset = None;
            }
        }
    }

    pub fn on_bug_updated(&mut self, result: Result<Bug, ApiClientError>) {
        match result {
            Ok(bug) => {
                if let Some(existing) = self.bugs.iter_mut().find(|b| b.id == bug.id) {
                    *existing = bug;
                }
                self.list_error = None;
            }
            Err(error) => {
                self.list_error = Some(error.to_string());
            }
        }
    }

    pub fn on_bug_deleted(&mut self, id: Uuid, result: Result<(), ApiClientError>) {
        match result {
            Ok(()) => {
                self.bugs.retain(|bug| bug.id != id);
                self.list.clamp(self.bugs.len());
                self.list_error = None;
            }
            Err(error) => {
                self.list_error = Some(error.to_string());
            }
        }
    }

    pub fn any_boundary_failed(&self) -> bool {
        self.root_boundary.is_failed()
            || self.form_boundary.is_failed()
            || self.list_boundary.is_failed()
    }

    pub fn reset_boundaries(&mut self) {
        self.root_boundary.reset();
        self.form_boundary.reset();
        self.list_boundary.reset();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use db::models::bug::BugStatus;
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_bug(title: &str) -> Bug {
        let now = Utc::now();
        Bug {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: "details".to_string(),
            status: BugStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    fn api_error(message: &str) -> ApiClientError {
        ApiClientError::Api(message.to_string())
    }

    #[test]
    fn test_fetch_failure_keeps_previous_records() {
        let mut app = App::new();
        app.bugs = vec![sample_bug("Existing bug")];
        app.loading = true;

        app.on_bugs_loaded(Err(api_error("server unreachable")));

        assert!(!app.loading);
        assert_eq!(app.bugs.len(), 1);
        assert_eq!(app.list_error.as_deref(), Some("server unreachable"));
    }

    #[test]
    fn test_fetch_success_replaces_records_and_clears_error() {
        let mut app = App::new();
        app.list_error = Some("old failure".to_string());

        app.on_bugs_loaded(Ok(vec![sample_bug("A"), sample_bug("B")]));

        assert!(!app.loading);
        assert_eq!(app.bugs.len(), 2);
        assert!(app.list_error.is_none());
    }

    #[test]
    fn test_create_success_patches_front_and_resets_draft() {
        let mut app = App::new();
        app.bugs = vec![sample_bug("Older bug")];
        for c in "Test Bug".chars() {
            app.form.input_char(c);
        }
        app.form.focus_next();
        for c in "Test Description".chars() {
            app.form.input_char(c);
        }

        let mut sent = None;
        let mut pending = None;
        app.form.submit(app.submitting, |payload, handle| {
            sent = Some(payload);
            pending = Some(handle);
        });
        app.pending_reset = pending;
        app.submitting = true;

        let created = sample_bug(&sent.unwrap().title);
        app.on_bug_created(Ok(created.clone()));

        assert!(!app.submitting);
        assert_eq!(app.bugs[0].id, created.id);
        assert_eq!(app.bugs.len(), 2);
        assert_eq!(app.form.title(), "");
        assert_eq!(app.form.description(), "");
        assert!(app.pending_reset.is_none());
    }

    #[test]
    fn test_create_failure_keeps_draft_and_surfaces_error() {
        let mut app = App::new();
        for c in "Test Bug".chars() {
            app.form.input_char(c);
        }
        app.form.focus_next();
        for c in "Test Description".chars() {
            app.form.input_char(c);
        }

        let mut pending = None;
        app.form.submit(false, |_, handle| pending = Some(handle));
        app.pending_reset = pending;
        app.submitting = true;

        app.on_bug_created(Err(api_error("description is required")));

        // Busy flag is cleared on the failure arm too.
        assert!(!app.submitting);
        assert_eq!(app.submit_error.as_deref(), Some("description is required"));
        assert_eq!(app.form.title(), "Test Bug");
        assert!(app.pending_reset.is_none());
    }

    #[test]
    fn test_update_patches_only_matching_record() {
        let mut app = App::new();
        app.bugs = vec![sample_bug("First"), sample_bug("Second")];

        let mut updated = app.bugs[1].clone();
        updated.status = BugStatus::Resolved;
        app.on_bug_updated(Ok(updated.clone()));

        assert_eq!(app.bugs[0].status, BugStatus::Open);
        assert_eq!(app.bugs[1].status, BugStatus::Resolved);
    }

    #[test]
    fn test_update_failure_surfaces_error_without_mutation() {
        let mut app = App::new();
        app.bugs = vec![sample_bug("First")];

        app.on_bug_updated(Err(api_error("bug not found")));

        assert_eq!(app.bugs[0].status, BugStatus::Open);
        assert_eq!(app.list_error.as_deref(), Some("bug not found"));
    }

    #[test]
    fn test_delete_removes_record_and_clamps_selection() {
        let mut app = App::new();
        app.bugs = vec![sample_bug("First"), sample_bug("Second")];
        app.list.select_next(2);

        let removed = app.bugs[1].id;
        app.on_bug_deleted(removed, Ok(()));

        assert_eq!(app.bugs.len(), 1);
        assert_eq!(app.list.selected(), 0);
    }

    #[test]
    fn test_delete_failure_keeps_record() {
        let mut app = App::new();
        let bug = sample_bug("First");
        app.bugs = vec![bug.clone()];

        app.on_bug_deleted(bug.id, Err(api_error("bug not found")));

        assert_eq!(app.bugs.len(), 1);
        assert_eq!(app.list_error.as_deref(), Some("bug not found"));
    }
}
