use std::time::Instant;

use ratatui::Frame;

use crate::app::{App, Screen as AppScreen};
use crate::ui::{dialog, form::render_form, list::render_list};

/// A UI screen boundary: responsible for rendering one app screen
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, now: Instant);
}

/// Filterable table of stored apps
pub struct ListScreen;

impl Screen for ListScreen {
    fn render(&self, app: &App, f: &mut Frame, now: Instant) {
        render_list(app, f, now);
    }
}

/// Add-entry form
pub struct FormScreen;

impl Screen for FormScreen {
    fn render(&self, app: &App, f: &mut Frame, _now: Instant) {
        render_form(app, f);
    }
}

/// Clear confirmation drawn over the list
pub struct ConfirmClearScreen;

impl Screen for ConfirmClearScreen {
    fn render(&self, app: &App, f: &mut Frame, now: Instant) {
        render_list(app, f, now);
        dialog::render_confirm_clear(app, f);
    }
}

/// File path entry for import or export, drawn over the list
pub struct PathPromptScreen;

impl Screen for PathPromptScreen {
    fn render(&self, app: &App, f: &mut Frame, now: Instant) {
        render_list(app, f, now);
        dialog::render_path_prompt(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppScreen) -> Box<dyn Screen> {
    match state {
        AppScreen::List => Box::new(ListScreen),
        AppScreen::AddForm => Box::new(FormScreen),
        AppScreen::ConfirmClear => Box::new(ConfirmClearScreen),
        AppScreen::PathPrompt(_) => Box::new(PathPromptScreen),
    }
}
