//! Events driving the client's single event loop.

use crossterm::event::KeyEvent;
use db::models::bug::Bug;
use uuid::Uuid;

use crate::api::ApiClientError;

/// Emitted by the input thread, the tick task, or a settled API call.
#[derive(Debug)]
pub enum AppEvent {
    Input(KeyEvent),
    Tick,
    BugsLoaded(Result<Vec<Bug>, ApiClientError>),
    BugCreated(Result<Bug, ApiClientError>),
    BugUpdated(Result<Bug, ApiClientError>),
    BugDeleted {
        id: Uuid,
        result: Result<(), ApiClientError>,
    },
}
