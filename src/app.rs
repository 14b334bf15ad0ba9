//! App state and core application logic
//!
//! Manages the interactive state machine and navigation stack. Key handling
//! never blocks: anything that touches the network or the disk is returned
//! as an [`Action`] for the event loop to run, and its outcome comes back as
//! an [`AppEvent`] applied with [`App::apply`].

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::download::{DownloadEvent, DownloadProgress, DownloadRequest};
use crate::models::{GameRecord, RankedEntry};
use crate::search::SearchResults;

// =============================================================================
// App State Enum
// =============================================================================

/// Text prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    /// Game title to search for
    Search,
    /// hydralinks catalog URL
    ProviderUrl,
    /// New games folder path
    GamesFolder,
}

impl Prompt {
    pub fn title(&self) -> &'static str {
        match self {
            Prompt::Search => "Enter the name of the game",
            Prompt::ProviderUrl => "Paste a provider link from https://hydralinks.cloud",
            Prompt::GamesFolder => "Enter a new path for your games folder",
        }
    }
}

/// Application state enum representing current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Main menu
    #[default]
    Home,
    /// Text input screen
    Prompt(Prompt),
    /// Ranked search results
    Results,
    /// URI choice for a release with several
    Uris,
    /// Game details and download path input
    Destination,
    /// Download progress
    Downloading,
    /// Installed games
    Library,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode
    Editing,
}

// =============================================================================
// Actions and Events
// =============================================================================

/// Work requested by a key press, run by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search(String),
    Download(DownloadRequest),
    AddProvider(String),
    SaveGamesFolder(PathBuf),
    LoadLibrary(PathBuf),
    Uninstall(String),
    Reinstall(String),
}

/// Outcome of an [`Action`], sent back to the app
#[derive(Debug, Clone)]
pub enum AppEvent {
    SearchFinished(SearchResults),
    Download(DownloadEvent),
    ProviderAdded(Result<String, String>),
    GamesFolderSaved(Result<PathBuf, String>),
    LibraryLoaded(Result<Vec<String>, String>),
    Uninstalled(Result<String, String>),
    Reinstalled(Result<String, String>),
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Jump to a 1-based number typed by the user
    pub fn select_number(&mut self, n: usize) -> bool {
        if n >= 1 && n <= self.len {
            self.selected = n - 1;
            true
        } else {
            false
        }
    }
}

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text input; the cursor counts characters
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.chars().count();
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Main menu entries
pub const MENU_ITEMS: [&str; 5] = [
    "Search games",
    "Library",
    "Add provider",
    "Set games folder",
    "Quit",
];

/// Search results view state
#[derive(Debug, Clone, Default)]
pub struct ResultsState {
    /// Query of the search in flight; results for any other query are stale
    pub pending: Option<String>,
    pub results: SearchResults,
    pub list: ListState,
    pub loading: LoadingState,
}

impl ResultsState {
    /// Show `results` unless they answer a superseded search
    ///
    /// Returns false when the results were dropped.
    pub fn set_results(&mut self, results: SearchResults) -> bool {
        if self.pending.as_deref() != Some(results.query.as_str()) {
            return false;
        }
        self.pending = None;
        self.list = ListState::new(results.len());
        self.loading = if results.is_empty() {
            LoadingState::Error("No game found in local databases or on FitGirl Repacks.".into())
        } else {
            LoadingState::Idle
        };
        self.results = results;
        true
    }

    pub fn selected_entry(&self) -> Option<&RankedEntry> {
        self.results.get(self.list.selected)
    }
}

/// The release being downloaded and its chosen URI
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub record: Option<GameRecord>,
    /// 0-based index into `record.uris`
    pub uri: Option<usize>,
    /// URI list state for multi-URI releases
    pub uris: ListState,
}

/// Where a running download stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DownloadStatus {
    #[default]
    Resolving,
    Running,
    Completed,
    Failed(String),
}

/// Download view state
#[derive(Debug, Clone, Default)]
pub struct DownloadState {
    pub title: String,
    pub destination: PathBuf,
    /// Torrent name once metadata is known
    pub name: Option<String>,
    pub progress: DownloadProgress,
    pub status: DownloadStatus,
}

impl DownloadState {
    pub fn is_finished(&self) -> bool {
        matches!(self.status, DownloadStatus::Completed | DownloadStatus::Failed(_))
    }
}

/// Destructive library operations; both delete the game folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryOp {
    Reinstall,
    Uninstall,
}

impl LibraryOp {
    pub fn verb(self) -> &'static str {
        match self {
            LibraryOp::Reinstall => "Reinstall",
            LibraryOp::Uninstall => "Uninstall",
        }
    }
}

/// Pending question over the selected library game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryPrompt {
    /// Reinstall / Uninstall / Back
    Choose,
    /// Waiting for `y` before the folder is deleted
    Confirm(LibraryOp),
}

/// Library view state
#[derive(Debug, Clone, Default)]
pub struct LibraryState {
    pub games: Vec<String>,
    pub list: ListState,
    pub loading: LoadingState,
    pub prompt: Option<LibraryPrompt>,
}

impl LibraryState {
    pub fn set_games(&mut self, games: Vec<String>) {
        self.list.set_len(games.len());
        self.games = games;
        self.loading = LoadingState::Idle;
    }

    pub fn selected_game(&self) -> Option<&str> {
        self.games.get(self.list.selected).map(String::as_str)
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Error message shown in the status bar
    pub error: Option<String>,
    /// Informational message shown in the status bar
    pub status: Option<String>,

    /// Configured games folder
    pub games_folder: Option<PathBuf>,
    /// Default download destination
    pub download_dir: PathBuf,
    /// Set while reinstalling, so the destination defaults to the games folder
    pub reinstalling: bool,

    // View-specific states
    pub menu: ListState,
    pub input: TextInput,
    pub results: ResultsState,
    pub selection: SelectionState,
    pub download: DownloadState,
    pub library: LibraryState,
}

impl App {
    pub fn new(games_folder: Option<PathBuf>, download_dir: PathBuf) -> Self {
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            status: None,

            games_folder,
            download_dir,
            reinstalling: false,

            menu: ListState::new(MENU_ITEMS.len()),
            input: TextInput::default(),
            results: ResultsState::default(),
            selection: SelectionState::default(),
            download: DownloadState::default(),
            library: LibraryState::default(),
        }
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            self.input_mode = match prev {
                AppState::Prompt(_) | AppState::Destination => InputMode::Editing,
                _ => InputMode::Normal,
            };
            true
        } else {
            false
        }
    }

    /// Return to the main menu, dropping history
    pub fn home(&mut self) {
        self.nav_stack.clear();
        self.state = AppState::Home;
        self.input_mode = InputMode::Normal;
        self.reinstalling = false;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Open a text prompt with an initial value
    pub fn open_prompt(&mut self, prompt: Prompt, initial: impl Into<String>) {
        self.input = TextInput::with_value(initial);
        self.navigate(AppState::Prompt(prompt));
        self.input_mode = InputMode::Editing;
    }

    /// Start a search for `query`, showing the results screen
    fn start_search(&mut self, query: String) -> Option<Action> {
        if query.trim().is_empty() {
            self.set_error("Please enter a game name");
            return None;
        }
        self.results = ResultsState {
            pending: Some(query.clone()),
            loading: LoadingState::Loading(Some(format!("Searching for '{}'...", query))),
            ..Default::default()
        };
        self.navigate(AppState::Results);
        Some(Action::Search(query))
    }

    /// Pick the release to download
    fn choose_entry(&mut self) -> Option<Action> {
        let record = self.results.selected_entry()?.record.clone();
        let uri_count = record.uris.len();
        self.selection = SelectionState {
            record: Some(record),
            uri: None,
            uris: ListState::new(uri_count),
        };

        if uri_count > 1 {
            self.navigate(AppState::Uris);
        } else {
            self.selection.uri = Some(0);
            self.open_destination();
        }
        None
    }

    fn open_destination(&mut self) {
        let default = match (self.reinstalling, &self.games_folder) {
            (true, Some(folder)) => folder.clone(),
            _ => self.download_dir.clone(),
        };
        self.input = TextInput::with_value(default.to_string_lossy());
        self.navigate(AppState::Destination);
        self.input_mode = InputMode::Editing;
    }

    /// Validate the destination and hand the selection to the downloader
    fn confirm_destination(&mut self) -> Option<Action> {
        let record = self.selection.record.as_ref()?;
        let path = PathBuf::from(self.input.value.trim());

        match DownloadRequest::from_selection(record, self.selection.uri, &path) {
            Ok(request) => {
                self.download = DownloadState {
                    title: request.title.clone(),
                    destination: request.destination.clone(),
                    ..Default::default()
                };
                self.navigate(AppState::Downloading);
                Some(Action::Download(request))
            }
            Err(e) => {
                self.set_error(e.to_string());
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returning work for the event loop if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                if !self.back() {
                    self.input_mode = InputMode::Normal;
                }
                None
            }
            KeyCode::Enter => self.submit_input(),
            KeyCode::Char(c) => {
                self.input.insert(c);
                None
            }
            KeyCode::Backspace => {
                self.input.backspace();
                None
            }
            KeyCode::Delete => {
                self.input.delete();
                None
            }
            KeyCode::Left => {
                self.input.left();
                None
            }
            KeyCode::Right => {
                self.input.right();
                None
            }
            KeyCode::Home => {
                self.input.home();
                None
            }
            KeyCode::End => {
                self.input.end();
                None
            }
            _ => None,
        }
    }

    fn submit_input(&mut self) -> Option<Action> {
        let value = self.input.value.trim().to_string();
        match self.state {
            AppState::Prompt(Prompt::Search) => self.start_search(self.input.value.clone()),
            AppState::Prompt(Prompt::ProviderUrl) => {
                if value.is_empty() {
                    self.set_error("Please paste a provider URL");
                    return None;
                }
                self.status = Some("Fetching provider...".into());
                Some(Action::AddProvider(value))
            }
            AppState::Prompt(Prompt::GamesFolder) => {
                if value.is_empty() {
                    self.set_error("Please enter a folder path");
                    return None;
                }
                Some(Action::SaveGamesFolder(PathBuf::from(value)))
            }
            AppState::Destination => self.confirm_destination(),
            _ => None,
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.state == AppState::Library && self.library.prompt.is_some() {
            return self.handle_library_prompt_key(key);
        }

        match key.code {
            KeyCode::Char('q') if self.state == AppState::Home => {
                self.quit();
                return None;
            }
            KeyCode::Esc | KeyCode::Char('0') => {
                if self.state == AppState::Downloading {
                    if self.download.is_finished() {
                        self.home();
                    }
                } else {
                    self.back();
                }
                return None;
            }
            _ => {}
        }

        match self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Results => self.handle_results_key(key),
            AppState::Uris => self.handle_uris_key(key),
            AppState::Downloading => {
                if key.code == KeyCode::Enter && self.download.is_finished() {
                    self.home();
                }
                None
            }
            AppState::Library => self.handle_library_key(key),
            AppState::Prompt(_) | AppState::Destination => {
                if key.code == KeyCode::Enter || key.code == KeyCode::Char('i') {
                    self.input_mode = InputMode::Editing;
                }
                None
            }
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.menu.up(),
            KeyCode::Down | KeyCode::Char('j') => self.menu.down(),
            KeyCode::Char(c @ '1'..='5') => {
                self.menu.select_number(c as usize - '0' as usize);
                return self.activate_menu();
            }
            KeyCode::Enter => return self.activate_menu(),
            _ => {}
        }
        None
    }

    fn activate_menu(&mut self) -> Option<Action> {
        self.status = None;
        match self.menu.selected {
            0 => {
                self.reinstalling = false;
                self.open_prompt(Prompt::Search, "");
                None
            }
            1 => match self.games_folder.clone() {
                Some(folder) => {
                    self.library = LibraryState {
                        loading: LoadingState::Loading(Some("Reading games folder...".into())),
                        ..Default::default()
                    };
                    self.navigate(AppState::Library);
                    Some(Action::LoadLibrary(folder))
                }
                None => {
                    self.status = Some("Set a games folder first.".into());
                    let initial = self.download_dir.to_string_lossy().into_owned();
                    self.open_prompt(Prompt::GamesFolder, initial);
                    None
                }
            },
            2 => {
                self.open_prompt(Prompt::ProviderUrl, "");
                None
            }
            3 => {
                let current = self.games_folder.as_ref().unwrap_or(&self.download_dir);
                let current = current.to_string_lossy().into_owned();
                self.open_prompt(Prompt::GamesFolder, current);
                None
            }
            _ => {
                self.quit();
                None
            }
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.results.loading.is_loading() {
            return None;
        }
        let list = &mut self.results.list;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => list.up(),
            KeyCode::Down | KeyCode::Char('j') => list.down(),
            KeyCode::PageUp => list.page_up(10),
            KeyCode::PageDown => list.page_down(10),
            KeyCode::Home => list.first(),
            KeyCode::End => list.last(),
            KeyCode::Char(c @ '1'..='9') => {
                if list.select_number(c as usize - '0' as usize) {
                    return self.choose_entry();
                }
            }
            KeyCode::Enter => return self.choose_entry(),
            _ => {}
        }
        None
    }

    fn handle_uris_key(&mut self, key: KeyEvent) -> Option<Action> {
        let list = &mut self.selection.uris;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => list.up(),
            KeyCode::Down | KeyCode::Char('j') => list.down(),
            KeyCode::Char(c @ '1'..='9') => {
                list.select_number(c as usize - '0' as usize);
            }
            KeyCode::Enter => {
                self.selection.uri = Some(self.selection.uris.selected);
                self.open_destination();
            }
            _ => {}
        }
        None
    }

    fn handle_library_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.library.list.up(),
            KeyCode::Down | KeyCode::Char('j') => self.library.list.down(),
            KeyCode::Enter => self.ask_library(LibraryPrompt::Choose),
            KeyCode::Char('r') => self.ask_library(LibraryPrompt::Confirm(LibraryOp::Reinstall)),
            KeyCode::Char('u') | KeyCode::Delete => {
                self.ask_library(LibraryPrompt::Confirm(LibraryOp::Uninstall))
            }
            _ => {}
        }
        None
    }

    fn ask_library(&mut self, prompt: LibraryPrompt) {
        if self.library.selected_game().is_some() {
            self.library.prompt = Some(prompt);
        }
    }

    /// Keys while a library prompt is open; nothing is deleted without `y`
    fn handle_library_prompt_key(&mut self, key: KeyEvent) -> Option<Action> {
        let prompt = self.library.prompt?;

        match (prompt, key.code) {
            (LibraryPrompt::Choose, KeyCode::Char('r')) => {
                self.library.prompt = Some(LibraryPrompt::Confirm(LibraryOp::Reinstall));
            }
            (LibraryPrompt::Choose, KeyCode::Char('u') | KeyCode::Delete) => {
                self.library.prompt = Some(LibraryPrompt::Confirm(LibraryOp::Uninstall));
            }
            (LibraryPrompt::Confirm(op), KeyCode::Char('y') | KeyCode::Char('Y')) => {
                self.library.prompt = None;
                let name = self.library.selected_game()?.to_string();
                return Some(match op {
                    LibraryOp::Reinstall => {
                        self.status = Some(format!("Removing '{}'...", name));
                        Action::Reinstall(name)
                    }
                    LibraryOp::Uninstall => {
                        self.status = Some(format!("Uninstalling '{}'...", name));
                        Action::Uninstall(name)
                    }
                });
            }
            (_, KeyCode::Esc | KeyCode::Char('0') | KeyCode::Char('n') | KeyCode::Char('b')) => {
                self.library.prompt = None;
            }
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------------
    // Async Results
    // -------------------------------------------------------------------------

    /// Apply the outcome of an action; may request follow-up work
    pub fn apply(&mut self, event: AppEvent) -> Option<Action> {
        match event {
            AppEvent::SearchFinished(results) => {
                let query = results.query.clone();
                if !self.results.set_results(results) {
                    debug!(query = %query, "Dropping results of a superseded search");
                }
            }
            AppEvent::Download(event) => self.apply_download(event),
            AppEvent::ProviderAdded(Ok(name)) => {
                self.home();
                self.status = Some(format!("Provider {} added.", name));
            }
            AppEvent::ProviderAdded(Err(e)) => {
                self.status = None;
                self.set_error(e);
            }
            AppEvent::GamesFolderSaved(Ok(folder)) => {
                self.status = Some(format!("Games folder updated to {}", folder.display()));
                self.games_folder = Some(folder);
                self.home();
            }
            AppEvent::GamesFolderSaved(Err(e)) => self.set_error(e),
            AppEvent::LibraryLoaded(Ok(games)) => {
                if games.is_empty() {
                    self.status = Some("No game folders found in the specified games folder.".into());
                }
                self.library.set_games(games);
            }
            AppEvent::LibraryLoaded(Err(e)) => {
                self.library.loading = LoadingState::Error(e);
            }
            AppEvent::Uninstalled(Ok(name)) => {
                self.library.games.retain(|g| g != &name);
                let remaining = self.library.games.len();
                self.library.list.set_len(remaining);
                self.status = Some(format!("Game folder '{}' uninstalled.", name));
            }
            AppEvent::Uninstalled(Err(e)) | AppEvent::Reinstalled(Err(e)) => {
                self.status = None;
                self.set_error(e);
            }
            AppEvent::Reinstalled(Ok(query)) => {
                self.library.games.retain(|g| g != &query);
                let remaining = self.library.games.len();
                self.library.list.set_len(remaining);
                self.status = Some(format!("Game folder '{}' removed. Reinstalling...", query));
                self.reinstalling = true;
                return self.start_search(query);
            }
        }
        None
    }

    fn apply_download(&mut self, event: DownloadEvent) {
        match event {
            DownloadEvent::Started { name } => {
                self.download.name = Some(name);
                self.download.status = DownloadStatus::Running;
            }
            DownloadEvent::Progress(progress) => {
                self.download.progress = progress;
                self.download.status = DownloadStatus::Running;
            }
            DownloadEvent::Completed => {
                self.download.progress.fraction = 1.0;
                self.download.progress.eta = None;
                self.download.status = DownloadStatus::Completed;
            }
            DownloadEvent::Failed(message) => {
                self.download.status = DownloadStatus::Failed(message);
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
