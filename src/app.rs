use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use itertools::Itertools;
use webbrowser::Browser;

use crate::config::{Config, ConfigStore};
use crate::form::FormState;
use crate::notice::{NoticeKind, Notices};
use crate::query::{ListQuery, SortMode};
use crate::record::{AppRecord, DOMAINS};
use crate::store::AppStore;
use crate::theme::Theme;
use crate::transfer::{self, Format, DEFAULT_EXPORT_FILE};

pub const TICK_RATE_MS: u64 = 50;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);
/// Pause between a successful add and returning to the list
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(500);
pub const SKELETON_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAction {
    Import,
    Export,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    List,
    AddForm,
    ConfirmClear,
    PathPrompt(PathAction),
}

pub struct App {
    store: Box<dyn AppStore>,
    config_store: Box<dyn ConfigStore>,
    pub config: Config,
    pub list: Vec<AppRecord>,
    pub query: ListQuery,
    pub screen: Screen,
    /// Search box has keyboard focus
    pub searching: bool,
    pub search_input: String,
    search_deadline: Option<Instant>,
    /// Row index within the current page
    pub selected: usize,
    pub expanded: HashSet<String>,
    pub form: FormState,
    pub prompt_input: String,
    pub notices: Notices,
    loading_until: Option<Instant>,
    /// Header border is mid-transition until then
    elevation_settles_at: Option<Instant>,
    navigate_at: Option<Instant>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: Box<dyn AppStore>, config_store: Box<dyn ConfigStore>) -> Self {
        let config = config_store.load();
        Self::with_config(store, config_store, config, Instant::now())
    }

    /// Starts with an explicit config (e.g. CLI overrides) at `now`
    pub fn with_config(
        store: Box<dyn AppStore>,
        config_store: Box<dyn ConfigStore>,
        config: Config,
        now: Instant,
    ) -> Self {
        let delay = config.skeleton_delay();
        let mut app = Self {
            store,
            config_store,
            query: Self::initial_query(&config),
            config,
            list: Vec::new(),
            screen: Screen::List,
            searching: false,
            search_input: String::new(),
            search_deadline: None,
            selected: 0,
            expanded: HashSet::new(),
            form: FormState::default(),
            prompt_input: String::new(),
            notices: Notices::default(),
            loading_until: (!delay.is_zero()).then(|| now + delay),
            elevation_settles_at: None,
            navigate_at: None,
            should_quit: false,
        };
        app.refresh();
        app
    }

    fn initial_query(config: &Config) -> ListQuery {
        ListQuery {
            sort: config.default_sort,
            page_size: config.page_size.max(1),
            ..ListQuery::default()
        }
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }

    /// Re-reads the stored list and keeps the selection in range
    pub fn refresh(&mut self) {
        self.list = self.store.load();
        self.clamp_selection();
    }

    /// Like a page reload: fresh list, default filters, nothing expanded
    fn reload(&mut self) {
        self.query = Self::initial_query(&self.config);
        self.search_input.clear();
        self.search_deadline = None;
        self.searching = false;
        self.expanded.clear();
        self.selected = 0;
        self.refresh();
    }

    pub fn filtered(&self) -> Vec<&AppRecord> {
        self.query.apply_filters(&self.list)
    }

    pub fn results_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn page_items(&self) -> Vec<&AppRecord> {
        let filtered = self.filtered();
        self.query.paginate(&filtered).to_vec()
    }

    pub fn page_count(&self) -> usize {
        self.query.page_count(self.results_count())
    }

    pub fn selected_record(&self) -> Option<&AppRecord> {
        self.page_items().get(self.selected).copied()
    }

    pub fn is_expanded(&self, app: &AppRecord) -> bool {
        self.expanded.contains(&app.id)
    }

    pub fn is_loading(&self, now: Instant) -> bool {
        self.loading_until.is_some_and(|t| now < t)
    }

    /// Rows scrolled past, counting earlier pages
    pub fn scroll_offset(&self) -> usize {
        (self.query.page - 1) * self.query.page_size + self.selected
    }

    /// Header gets the raised style once the list is scrolled
    pub fn header_elevated(&self) -> bool {
        self.scroll_offset() > 0
    }

    /// True while the header is still moving between flat and raised
    pub fn header_in_transition(&self, now: Instant) -> bool {
        self.elevation_settles_at.is_some_and(|t| now < t)
    }

    /// Form choices first, then any other domain present in the data
    pub fn domain_options(&self) -> Vec<String> {
        DOMAINS
            .iter()
            .map(|d| d.to_string())
            .chain(self.list.iter().map(|a| a.domain.clone()))
            .filter(|d| !d.is_empty())
            .unique()
            .collect()
    }

    fn clamp_selection(&mut self) {
        let len = self.page_items().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Time-driven transitions; true when the screen should be redrawn
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut dirty = false;

        if self.loading_until.is_some_and(|t| now >= t) {
            self.loading_until = None;
            dirty = true;
        }
        if self.elevation_settles_at.is_some_and(|t| now >= t) {
            self.elevation_settles_at = None;
            dirty = true;
        }
        if self.search_deadline.is_some_and(|t| now >= t) {
            self.apply_search();
            dirty = true;
        }
        if self.navigate_at.is_some_and(|t| now >= t) {
            self.navigate_at = None;
            self.screen = Screen::List;
            self.reload();
            dirty = true;
        }
        dirty | self.notices.prune(now)
    }

    fn apply_search(&mut self) {
        self.search_deadline = None;
        let input = self.search_input.clone();
        self.query.set_q(&input);
        self.selected = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let was_elevated = self.header_elevated();
        match self.screen.clone() {
            Screen::List if self.searching => self.on_search_key(key, now),
            Screen::List => self.on_list_key(key),
            Screen::AddForm => self.on_form_key(key, now),
            Screen::ConfirmClear => self.on_confirm_key(key),
            Screen::PathPrompt(action) => self.on_prompt_key(key, action),
        }
        if self.header_elevated() != was_elevated {
            let speed = self.config.motion_speed();
            self.elevation_settles_at = (!speed.is_zero()).then(|| now + speed);
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.searching = false;
                self.apply_search();
            }
            KeyCode::Backspace => {
                self.search_input.pop();
                self.search_deadline = Some(now + SEARCH_DEBOUNCE);
            }
            KeyCode::Char(c) => {
                self.search_input.push(c);
                self.search_deadline = Some(now + SEARCH_DEBOUNCE);
            }
            _ => {}
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.page_items().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => self.prev_page(),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => self.next_page(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_details(),
            KeyCode::Char('d') => self.cycle_domain(),
            KeyCode::Char('f') => {
                let next = self.query.free.next();
                self.query.set_free(next);
                self.clamp_selection();
            }
            KeyCode::Char('s') => {
                let next = self.query.sort.next();
                self.set_sort(next);
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('a') => self.screen = Screen::AddForm,
            KeyCode::Char('i') => self.open_prompt(PathAction::Import),
            KeyCode::Char('e') => self.open_prompt(PathAction::Export),
            KeyCode::Char('x') => self.screen = Screen::ConfirmClear,
            KeyCode::Char('o') => self.open_selected_website(),
            KeyCode::Char('r') => self.refresh(),
            _ => {}
        }
    }

    fn on_form_key(&mut self, key: KeyEvent, now: Instant) {
        if self.navigate_at.is_some() {
            return;
        }
        match key.code {
            KeyCode::Esc => self.screen = Screen::List,
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.form.reset()
            }
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Left => self.form.cycle_choice(false),
            KeyCode::Right => self.form.cycle_choice(true),
            KeyCode::Char(' ') if self.form.focused().is_choice() => self.form.cycle_choice(true),
            KeyCode::Char(c) => self.form.push_char(c),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => self.submit_form(now),
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.screen = Screen::List;
                self.clear_all();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.screen = Screen::List,
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent, action: PathAction) {
        match key.code {
            KeyCode::Esc => self.screen = Screen::List,
            KeyCode::Backspace => {
                self.prompt_input.pop();
            }
            KeyCode::Char(c) => self.prompt_input.push(c),
            KeyCode::Enter => {
                self.screen = Screen::List;
                let path = PathBuf::from(self.prompt_input.trim());
                if path.as_os_str().is_empty() {
                    return;
                }
                match action {
                    PathAction::Import => self.import_from(&path),
                    PathAction::Export => self.export_to(&path, Format::from_path(&path)),
                }
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, action: PathAction) {
        self.prompt_input = match action {
            PathAction::Import => String::new(),
            PathAction::Export => DEFAULT_EXPORT_FILE.to_string(),
        };
        self.screen = Screen::PathPrompt(action);
    }

    pub fn prev_page(&mut self) {
        if self.query.prev_page() {
            self.selected = 0;
        }
    }

    pub fn next_page(&mut self) {
        let total = self.results_count();
        if self.query.next_page(total) {
            self.selected = 0;
        }
    }

    pub fn set_sort(&mut self, sort: SortMode) {
        self.query.set_sort(sort);
        self.clamp_selection();
    }

    fn cycle_domain(&mut self) {
        let options = self.domain_options();
        let next = match options.iter().position(|d| *d == self.query.domain) {
            None if self.query.domain.is_empty() => options.first().cloned(),
            Some(i) => options.get(i + 1).cloned(),
            None => None,
        };
        self.query.set_domain(&next.unwrap_or_default());
        self.clamp_selection();
    }

    pub fn toggle_details(&mut self) {
        let Some(id) = self.selected_record().map(|a| a.id.clone()) else {
            return;
        };
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Flips and persists the theme flag
    pub fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        tracing::info!(theme = %self.config.theme, "theme changed");
        // session overrides (page size, motion) stay out of the saved file
        let mut persisted = self.config_store.load();
        persisted.theme = self.config.theme;
        if let Err(e) = self.config_store.save(&persisted) {
            self.notices.error(format!("Could not save theme: {e}"));
        }
    }

    fn submit_form(&mut self, now: Instant) {
        let Some(record) = self.form.submit() else {
            return;
        };
        tracing::info!(id = %record.id, name = %record.app_name, "adding app");

        let mut list = self.store.load();
        list.insert(0, record);
        match self.store.save(&list) {
            Ok(()) => {
                self.notices
                    .push_at(NoticeKind::Success, "App added successfully", now);
                self.form.reset();
                self.navigate_at = Some(now + NAVIGATE_DELAY);
            }
            Err(e) => self.notices.push_at(NoticeKind::Error, format!("Save failed: {e}"), now),
        }
    }

    /// Replaces the stored list with the file's contents; storage is untouched on failure
    pub fn import_from(&mut self, path: &Path) {
        let result = transfer::import_file(path).and_then(|list| {
            self.store.save(&list)?;
            Ok(list.len())
        });
        match result {
            Ok(count) => {
                tracing::info!(count, "import completed");
                self.notices.success("Import completed");
                self.reload();
            }
            Err(e) => self.notices.error(format!("Import failed: {e}")),
        }
    }

    pub fn export_to(&mut self, path: &Path, format: Format) {
        let list = self.store.load();
        match transfer::export_file(&list, path, format) {
            Ok(()) => self
                .notices
                .success(format!("Exported {} apps to {}", list.len(), path.display())),
            Err(e) => self.notices.error(e.to_string()),
        }
    }

    pub fn clear_all(&mut self) {
        match self.store.clear() {
            Ok(()) => {
                self.notices.success("Data cleared");
                self.reload();
            }
            Err(e) => self.notices.error(format!("Clear failed: {e}")),
        }
    }

    fn open_selected_website(&mut self) {
        let Some(url) = self.selected_record().map(|a| a.website.clone()) else {
            return;
        };
        if !Browser::is_available() {
            self.notices.push(NoticeKind::Info, "No browser available");
            return;
        }
        if let Err(e) = webbrowser::open(&url) {
            self.notices.error(format!("Could not open {url}: {e}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;
    use crate::query::FreeFilter;
    use crate::record::{sample, Pricing};
    use crate::store::MemoryAppStore;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn fixture() -> Vec<AppRecord> {
        (1..=10)
            .map(|i| {
                sample(
                    &format!("App{}", (b'a' + i as u8) as char),
                    "Acme",
                    if i % 2 == 0 { "Health" } else { "Design" },
                    if i % 3 == 0 { Pricing::Paid } else { Pricing::Free },
                    &format!("2024-01-{:02}T00:00:00.000Z", i),
                )
            })
            .collect()
    }

    fn test_app(list: Vec<AppRecord>) -> (App, Instant) {
        let now = Instant::now();
        let config = Config {
            reduced_motion: true,
            ..Config::default()
        };
        let app = App::with_config(
            Box::new(MemoryAppStore::with_list(list)),
            Box::new(MemoryConfigStore::new(config.clone())),
            config,
            now,
        );
        (app, now)
    }

    #[test]
    fn starts_on_first_page_of_newest() {
        let (app, now) = test_app(fixture());
        assert!(!app.is_loading(now));
        assert_eq!(app.results_count(), 10);
        assert_eq!(app.page_items().len(), 8);
        assert_eq!(app.page_count(), 2);
        assert_eq!(app.page_items()[0].created_at, "2024-01-10T00:00:00.000Z");
    }

    #[test]
    fn skeleton_shows_until_delay_passes() {
        let now = Instant::now();
        let mut app = App::with_config(
            Box::new(MemoryAppStore::new()),
            Box::new(MemoryConfigStore::default()),
            Config::default(),
            now,
        );
        assert!(app.is_loading(now));
        assert!(app.on_tick(now + Duration::from_millis(250)));
        assert!(!app.is_loading(now + Duration::from_millis(250)));
    }

    #[test]
    fn paging_is_clamped_and_resets_selection() {
        let (mut app, _) = test_app(fixture());
        app.handle_key(key(KeyCode::Down), Instant::now());
        assert_eq!(app.selected, 1);
        assert!(app.header_elevated());
        app.handle_key(key(KeyCode::Right), Instant::now());
        assert_eq!(app.query.page, 2);
        assert_eq!(app.selected, 0);
        assert_eq!(app.page_items().len(), 2);
        app.handle_key(key(KeyCode::Right), Instant::now());
        assert_eq!(app.query.page, 2);
        app.handle_key(key(KeyCode::Left), Instant::now());
        app.handle_key(key(KeyCode::Left), Instant::now());
        assert_eq!(app.query.page, 1);
        assert!(!app.header_elevated());
    }

    #[test]
    fn header_transition_follows_motion_speed() {
        let now = Instant::now();
        let mut app = App::with_config(
            Box::new(MemoryAppStore::with_list(fixture())),
            Box::new(MemoryConfigStore::default()),
            Config::default(),
            now,
        );
        app.handle_key(key(KeyCode::Down), now);
        assert!(app.header_elevated());
        assert!(app.header_in_transition(now + Duration::from_millis(100)));
        assert!(app.on_tick(now + Duration::from_millis(180)));
        assert!(!app.header_in_transition(now + Duration::from_millis(180)));

        let (mut reduced, now) = test_app(fixture());
        reduced.handle_key(key(KeyCode::Down), now);
        assert!(reduced.header_elevated());
        assert!(!reduced.header_in_transition(now));
    }

    #[test]
    fn search_is_debounced() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Char('/')), now);
        for c in "appc".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        assert_eq!(app.query.q, "");
        assert!(!app.on_tick(now + Duration::from_millis(100)));
        assert!(app.on_tick(now + SEARCH_DEBOUNCE));
        assert_eq!(app.query.q, "appc");
        assert_eq!(app.results_count(), 1);
        app.handle_key(key(KeyCode::Enter), now);
        assert!(!app.searching);
    }

    #[test]
    fn filters_cycle_and_reset_page() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Right), now);
        app.handle_key(key(KeyCode::Char('f')), now);
        assert_eq!(app.query.free, FreeFilter::Free);
        assert_eq!(app.query.page, 1);
        app.handle_key(key(KeyCode::Char('f')), now);
        assert_eq!(app.results_count(), 3);

        app.handle_key(key(KeyCode::Char('d')), now);
        assert_eq!(app.query.domain, DOMAINS[0]);
        assert_eq!(app.results_count(), 0);
    }

    #[test]
    fn details_toggle_per_record() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Enter), now);
        let first = app.selected_record().unwrap().clone();
        assert!(app.is_expanded(&first));
        app.handle_key(key(KeyCode::Char(' ')), now);
        assert!(!app.is_expanded(&first));
    }

    #[test]
    fn theme_toggle_persists() {
        let (mut app, now) = test_app(vec![]);
        app.handle_key(key(KeyCode::Char('t')), now);
        assert_eq!(app.theme(), Theme::Light);
        assert_eq!(app.config_store.load().theme, Theme::Light);
    }

    #[test]
    fn theme_toggle_saves_only_the_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let session = Config {
            page_size: 3,
            reduced_motion: true,
            ..Config::default()
        };
        let now = Instant::now();
        let mut app = App::with_config(
            Box::new(MemoryAppStore::with_list(fixture())),
            Box::new(crate::config::FileConfigStore::with_path(&path)),
            session,
            now,
        );
        app.handle_key(key(KeyCode::Char('t')), now);

        let saved = crate::config::FileConfigStore::with_path(&path).load();
        assert_eq!(saved.theme, Theme::Light);
        assert_eq!(saved.page_size, Config::default().page_size);
        assert!(!saved.reduced_motion);
        assert_eq!(app.query.page_size, 3);
    }

    #[test]
    fn submitting_form_prepends_and_navigates_back() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Char('a')), now);
        assert_eq!(app.screen, Screen::AddForm);

        app.handle_key(key(KeyCode::Enter), now);
        assert_eq!(app.screen, Screen::AddForm);
        assert!(!app.form.errors.is_empty());

        for (text, tabs) in [("Zapp", 1), ("Zed", 1), ("https://zapp.io", 1)] {
            for c in text.chars() {
                app.handle_key(key(KeyCode::Char(c)), now);
            }
            for _ in 0..tabs {
                app.handle_key(key(KeyCode::Tab), now);
            }
        }
        app.handle_key(key(KeyCode::Right), now);
        app.handle_key(key(KeyCode::Tab), now);
        app.handle_key(key(KeyCode::Right), now);
        app.handle_key(key(KeyCode::Tab), now);
        for c in "Fast".chars() {
            app.handle_key(key(KeyCode::Char(c)), now);
        }
        app.handle_key(key(KeyCode::Enter), now);

        assert!(app.form.errors.is_empty());
        assert_eq!(app.notices.len(), 1);
        assert_eq!(app.store.load()[0].app_name, "Zapp");
        assert_eq!(app.store.load().len(), 11);

        assert!(!app.on_tick(now + Duration::from_millis(100)));
        assert_eq!(app.screen, Screen::AddForm);
        assert!(app.on_tick(now + NAVIGATE_DELAY));
        assert_eq!(app.screen, Screen::List);
        assert_eq!(app.results_count(), 11);
    }

    #[test]
    fn clear_requires_confirmation() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Char('x')), now);
        app.handle_key(key(KeyCode::Char('n')), now);
        assert_eq!(app.results_count(), 10);
        app.handle_key(key(KeyCode::Char('x')), now);
        app.handle_key(key(KeyCode::Char('y')), now);
        assert_eq!(app.screen, Screen::List);
        assert_eq!(app.results_count(), 0);
        assert!(app.store.load().is_empty());
    }

    #[test]
    fn failed_import_keeps_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"not":"an array"}"#).unwrap();

        let (mut app, _) = test_app(fixture());
        app.import_from(&path);
        assert_eq!(app.store.load().len(), 10);
        let msg = &app.notices.iter().last().unwrap().message;
        assert_eq!(msg, "Import failed: Invalid format: expected a JSON array.");
    }

    #[test]
    fn export_of_empty_list_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.csv");
        let (mut app, _) = test_app(vec![]);
        app.export_to(&path, Format::Csv);
        assert!(!path.exists());
        let notice = app.notices.iter().last().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, "Nothing to export");
    }

    #[test]
    fn export_prompt_defaults_to_csv_file() {
        let (mut app, now) = test_app(fixture());
        app.handle_key(key(KeyCode::Char('e')), now);
        assert_eq!(app.screen, Screen::PathPrompt(PathAction::Export));
        assert_eq!(app.prompt_input, DEFAULT_EXPORT_FILE);
        app.handle_key(key(KeyCode::Esc), now);
        assert_eq!(app.screen, Screen::List);
    }

    #[test]
    fn domain_options_include_data_domains_once() {
        let mut list = fixture();
        list[0].domain = "Robotics".into();
        let (app, _) = test_app(list);
        let options = app.domain_options();
        assert_eq!(options.iter().filter(|d| *d == "Robotics").count(), 1);
        assert_eq!(options.iter().filter(|d| *d == "Health").count(), 1);
        assert_eq!(options.len(), DOMAINS.len() + 1);
    }
}
