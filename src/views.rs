// Headless view models for the console screens. Each view owns its state
// behind a lock and a `Mount`; async loads return `'static` futures so the
// console may spawn them, and completions are dropped once the view is gone.

pub mod hotel_form;
pub mod hotel_list;
pub mod navbar;
pub mod room_form;
pub mod room_list;

use std::time::Duration;

use crate::api::ApiError;
use crate::routes::Route;

pub use hotel_form::{HotelFormState, HotelFormView};
pub use hotel_list::{HotelListModel, HotelListView};
pub use navbar::{NavLink, NavbarModel};
pub use room_form::{HotelRoomFormState, HotelRoomFormView};
pub use room_list::{HotelRoomsListState, HotelRoomsListView};

pub const REDIRECT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct ViewConfig {
    // Pause between a successful submission and the automatic navigation
    pub redirect_delay: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            redirect_delay: REDIRECT_DELAY,
        }
    }
}

// Blocking yes/no prompt shown before destructive actions
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(crate::models::Id),
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    InitialLoading,
    Ready,
    Submitting,
    SubmittedSuccess,
    SubmittedError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    // Client-side validation failed; nothing was sent
    Invalid,
    // The form is still loading or already submitting
    Busy,
    // The entity the form belongs to could not be loaded; nothing was sent
    NotFound,
    Saved { redirect: Option<Redirect> },
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListStatus<T> {
    Loading,
    Empty,
    Rows(Vec<T>),
}

impl<T> ListStatus<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Rows(rows)
        }
    }
}

// The backend's own message when it sent one, otherwise `fallback`
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    err.server_message().unwrap_or(fallback).to_string()
}
