//! TUI tests
//!
//! Drives the app state machine with key events and renders it into a
//! ratatui test backend.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use repackgrab::app::{Action, AppEvent, InputMode, LibraryOp, LibraryPrompt, Prompt};
use repackgrab::download::{DownloadEvent, DownloadProgress};
use repackgrab::search::{rank, SearchResults};
use repackgrab::ui::render::gauge_label;
use repackgrab::ui::render_ui;
use repackgrab::{App, AppState, GameRecord};
use tempfile::TempDir;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        assert_eq!(app.handle_key(key(KeyCode::Char(c))), None);
    }
}

fn doom_results(query: &str) -> SearchResults {
    let local = vec![GameRecord::new(
        "Doom 3: BFG Edition",
        vec!["magnet:bfg".into(), "magnet:bfg-alt".into()],
        "dodi",
    )];
    let remote = GameRecord::remote("Doom 3", "magnet:fg");
    SearchResults {
        query: query.into(),
        local_matches: 1,
        remote_hit: true,
        entries: rank(query, local, Some(remote)),
        ..Default::default()
    }
}

fn screen(app: &App) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|frame| render_ui(frame, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

// =============================================================================
// Navigation Tests
// =============================================================================

/// Test: search, pick the top result, confirm the path, start the download
#[test]
fn test_search_to_download_flow() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(None, dir.path().to_path_buf());

    assert_eq!(app.handle_key(key(KeyCode::Char('1'))), None);
    assert_eq!(app.state, AppState::Prompt(Prompt::Search));
    assert_eq!(app.input_mode, InputMode::Editing);

    type_text(&mut app, "Doom 3");
    let action = app.handle_key(key(KeyCode::Enter));
    assert_eq!(action, Some(Action::Search("Doom 3".into())));
    assert_eq!(app.state, AppState::Results);
    assert!(app.results.loading.is_loading());

    assert_eq!(app.apply(AppEvent::SearchFinished(doom_results("Doom 3"))), None);
    assert_eq!(app.results.results.len(), 2);

    // single-URI top result skips the URI list
    assert_eq!(app.handle_key(key(KeyCode::Char('1'))), None);
    assert_eq!(app.state, AppState::Destination);
    assert_eq!(app.input.value, dir.path().to_string_lossy());

    match app.handle_key(key(KeyCode::Enter)) {
        Some(Action::Download(request)) => {
            assert_eq!(request.uri, "magnet:fg");
            assert_eq!(request.title, "Doom 3");
            assert_eq!(request.source.as_deref(), Some("FitGirl Repacks"));
        }
        other => panic!("expected download action, got {:?}", other),
    }
    assert_eq!(app.state, AppState::Downloading);
}

/// Test: a multi-URI release goes through the URI list
#[test]
fn test_multi_uri_selection() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(None, dir.path().to_path_buf());
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom 3");
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::SearchFinished(doom_results("doom 3")));

    app.handle_key(key(KeyCode::Char('2')));
    assert_eq!(app.state, AppState::Uris);

    app.handle_key(key(KeyCode::Char('2')));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.state, AppState::Destination);
    assert_eq!(app.selection.uri, Some(1));

    match app.handle_key(key(KeyCode::Enter)) {
        Some(Action::Download(request)) => assert_eq!(request.uri, "magnet:bfg-alt"),
        other => panic!("expected download action, got {:?}", other),
    }
}

/// Test: a bad destination keeps the user on the path prompt
#[test]
fn test_invalid_destination_shows_error() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(None, dir.path().join("missing"));
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom");
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::SearchFinished(doom_results("doom")));
    app.handle_key(key(KeyCode::Enter));

    assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    assert_eq!(app.state, AppState::Destination);
    assert!(app.error.as_deref().unwrap_or_default().contains("Invalid path"));
}

/// Test: an empty query never reaches the search engine
#[test]
fn test_empty_query_rejected() {
    let mut app = App::new(None, PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "   ");

    assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    assert_eq!(app.error.as_deref(), Some("Please enter a game name"));
}

/// Test: library without a games folder asks for one
#[test]
fn test_library_requires_games_folder() {
    let mut app = App::new(None, PathBuf::from("/downloads"));
    assert_eq!(app.handle_key(key(KeyCode::Char('2'))), None);
    assert_eq!(app.state, AppState::Prompt(Prompt::GamesFolder));

    let dir = TempDir::new().unwrap();
    let mut app = App::new(Some(dir.path().to_path_buf()), PathBuf::from("."));
    assert_eq!(
        app.handle_key(key(KeyCode::Char('2'))),
        Some(Action::LoadLibrary(dir.path().to_path_buf()))
    );
    assert_eq!(app.state, AppState::Library);
}

/// Test: reinstall searches again and defaults the path to the games folder
#[test]
fn test_reinstall_searches_again() {
    let games = TempDir::new().unwrap();
    let mut app = App::new(Some(games.path().to_path_buf()), PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('2')));
    app.apply(AppEvent::LibraryLoaded(Ok(vec!["Doom 3".into(), "Hades".into()])));

    assert_eq!(app.handle_key(key(KeyCode::Char('r'))), None);
    assert_eq!(
        app.library.prompt,
        Some(LibraryPrompt::Confirm(LibraryOp::Reinstall))
    );
    assert_eq!(
        app.handle_key(key(KeyCode::Char('y'))),
        Some(Action::Reinstall("Doom 3".into()))
    );
    let follow_up = app.apply(AppEvent::Reinstalled(Ok("Doom 3".into())));
    assert_eq!(follow_up, Some(Action::Search("Doom 3".into())));
    assert_eq!(app.library.games, vec!["Hades".to_string()]);

    app.apply(AppEvent::SearchFinished(doom_results("Doom 3")));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.input.value, games.path().to_string_lossy());
}

/// Test: Enter on a library game only opens the action choice
#[test]
fn test_library_enter_removes_nothing() {
    let games = TempDir::new().unwrap();
    std::fs::create_dir(games.path().join("Hades")).unwrap();
    let mut app = App::new(Some(games.path().to_path_buf()), PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('2')));
    app.apply(AppEvent::LibraryLoaded(Ok(vec!["Hades".into()])));

    assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    assert_eq!(app.library.prompt, Some(LibraryPrompt::Choose));
    assert_eq!(app.handle_key(key(KeyCode::Enter)), None);

    assert_eq!(app.handle_key(key(KeyCode::Char('u'))), None);
    assert_eq!(
        app.library.prompt,
        Some(LibraryPrompt::Confirm(LibraryOp::Uninstall))
    );
    assert_eq!(app.handle_key(key(KeyCode::Enter)), None);

    // Esc cancels the prompt without leaving the library
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.library.prompt, None);
    assert_eq!(app.state, AppState::Library);
    assert!(games.path().join("Hades").exists());

    app.handle_key(key(KeyCode::Char('u')));
    assert_eq!(
        app.handle_key(key(KeyCode::Char('y'))),
        Some(Action::Uninstall("Hades".into()))
    );
    assert_eq!(app.library.prompt, None);
}

/// Test: results of a superseded search never replace the current ones
#[test]
fn test_stale_search_results_dropped() {
    let mut app = App::new(None, PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom");
    app.handle_key(key(KeyCode::Enter));
    // back to the prompt, then home
    app.handle_key(key(KeyCode::Esc));
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Home);
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "hades");
    assert_eq!(app.handle_key(key(KeyCode::Enter)), Some(Action::Search("hades".into())));

    let hades = SearchResults {
        query: "hades".into(),
        local_matches: 1,
        entries: rank("hades", vec![GameRecord::new("Hades", vec!["magnet:h".into()], "dodi")], None),
        ..Default::default()
    };
    app.apply(AppEvent::SearchFinished(hades));
    app.apply(AppEvent::SearchFinished(doom_results("doom")));

    assert_eq!(app.results.results.query, "hades");
    assert_eq!(
        app.results.selected_entry().map(|e| e.record.title.as_str()),
        Some("Hades")
    );
}

/// Test: the download screen only closes once the transfer is over
#[test]
fn test_download_screen_exit() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(None, dir.path().to_path_buf());
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom 3");
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::SearchFinished(doom_results("doom 3")));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.state, AppState::Downloading);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Downloading);

    app.apply(AppEvent::Download(DownloadEvent::Completed));
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Home);
}

#[test]
fn test_ctrl_c_quits_anywhere() {
    let mut app = App::new(None, PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('1')));
    app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(!app.running);
}

// =============================================================================
// Rendering Tests
// =============================================================================

#[test]
fn test_render_home_menu() {
    let app = App::new(None, PathBuf::from("."));
    let text = screen(&app);
    assert!(text.contains("Search games"));
    assert!(text.contains("Set games folder"));
}

#[test]
fn test_render_results_marks_top_result() {
    let mut app = App::new(None, PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom 3");
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::SearchFinished(doom_results("doom 3")));

    let text = screen(&app);
    assert!(text.contains("Top Result: Doom 3 (FitGirl Repacks)"));
    assert!(text.contains("Doom 3: BFG Edition (dodi)"));
}

#[test]
fn test_render_library_confirmation() {
    let games = TempDir::new().unwrap();
    let mut app = App::new(Some(games.path().to_path_buf()), PathBuf::from("."));
    app.handle_key(key(KeyCode::Char('2')));
    app.apply(AppEvent::LibraryLoaded(Ok(vec!["Hades".into()])));
    app.handle_key(key(KeyCode::Char('u')));

    assert!(screen(&app).contains("Uninstall 'Hades'? Its folder will be deleted."));
}

#[test]
fn test_render_download_progress() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(None, dir.path().to_path_buf());
    app.handle_key(key(KeyCode::Char('1')));
    type_text(&mut app, "doom 3");
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::SearchFinished(doom_results("doom 3")));
    app.handle_key(key(KeyCode::Enter));
    app.handle_key(key(KeyCode::Enter));
    app.apply(AppEvent::Download(DownloadEvent::Progress(DownloadProgress::new(
        250,
        1000,
        1024 * 1024,
    ))));

    assert_eq!(gauge_label(&app), "25% | 1.00 MB/s | ETA: 0s");
    assert!(screen(&app).contains("25% | 1.00 MB/s"));
}
