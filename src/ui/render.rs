//! Screen rendering
//!
//! Pure functions of [`App`] state; nothing here mutates the app.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Clear, Gauge, List, ListItem, ListState as WidgetListState,
        Paragraph, Wrap,
    },
    Frame,
};

use super::Theme;
use crate::app::{
    App, AppState, DownloadStatus, InputMode, LibraryPrompt, LoadingState, Prompt, TextInput, MENU_ITEMS,
};
use crate::download::progress::format_eta;

/// Main render function - dispatches to view-specific renderers
pub fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

fn panel(title: impl Into<String>, focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(format!(" {} ", title.into()), Theme::title()))
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let folder = app
        .games_folder
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not set".to_string());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("REPACK", Theme::title()),
        Span::styled("GRAB", Theme::source()),
        Span::styled(format!("   games folder: {}", folder), Theme::dimmed()),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(header, area);
}

fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.state {
        AppState::Home => render_home(frame, area, app),
        AppState::Prompt(prompt) => render_prompt(frame, area, app, prompt),
        AppState::Results => render_results(frame, area, app),
        AppState::Uris => render_uris(frame, area, app),
        AppState::Destination => render_destination(frame, area, app),
        AppState::Downloading => render_downloading(frame, area, app),
        AppState::Library => render_library(frame, area, app),
    }
}

/// Selectable list with the highlighted row marked
fn render_list(frame: &mut Frame, area: Rect, items: Vec<ListItem<'_>>, selected: usize) {
    let list = List::new(items)
        .style(Theme::text())
        .highlight_style(Theme::highlighted())
        .highlight_symbol("▸ ");
    let mut state = WidgetListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_message(frame: &mut Frame, area: Rect, loading: &LoadingState) {
    let style = match loading {
        LoadingState::Error(_) => Theme::error(),
        _ => Theme::loading(),
    };
    let text = loading.message().unwrap_or("Loading...");
    let para = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("MENU", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, item)| ListItem::new(format!("{}. {}", i + 1, item)))
        .collect();
    render_list(frame, inner, items, app.menu.selected);
}

fn input_line(input: &TextInput, editing: bool) -> Line<'_> {
    if !editing {
        return Line::from(Span::styled(input.value.as_str(), Theme::input()));
    }
    let split = input
        .value
        .char_indices()
        .nth(input.cursor)
        .map(|(i, _)| i)
        .unwrap_or(input.value.len());
    let (before, after) = input.value.split_at(split);
    Line::from(vec![
        Span::styled(before, Theme::input()),
        Span::styled("│", Theme::keybind()),
        Span::styled(after, Theme::input()),
    ])
}

fn render_input_box(frame: &mut Frame, area: Rect, app: &App, title: &str) {
    let editing = app.input_mode == InputMode::Editing;
    let input = Paragraph::new(input_line(&app.input, editing)).block(panel(title, editing));
    frame.render_widget(input, area);
}

fn render_prompt(frame: &mut Frame, area: Rect, app: &App, prompt: Prompt) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_input_box(frame, chunks[0], app, prompt.title());

    let hint = match prompt {
        Prompt::Search => "Local catalogs and FitGirl Repacks are searched together.",
        Prompt::ProviderUrl => "Open https://hydralinks.cloud, choose Copy Link on a provider and paste it here.",
        Prompt::GamesFolder => "Each game lives in its own folder inside the games folder.",
    };
    let help = Paragraph::new(hint)
        .style(Theme::dimmed())
        .wrap(Wrap { trim: true });
    frame.render_widget(help, chunks[1]);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let results = &app.results;
    let block = panel(
        format!("RESULTS FOR '{}' ({})", results.results.query, results.results.len()),
        true,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if results.loading != LoadingState::Idle {
        render_message(frame, inner, &results.loading);
        return;
    }

    let items = results
        .results
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let mut spans = vec![Span::raw(format!("{}. ", i + 1))];
            if entry.top {
                spans.push(Span::styled("★ Top Result: ", Theme::top_result()));
            }
            spans.push(Span::raw(entry.record.title.clone()));
            spans.push(Span::styled(format!(" ({})", entry.record.source), Theme::source()));
            ListItem::new(Line::from(spans))
        })
        .collect();
    render_list(frame, inner, items, results.list.selected);
}

fn render_uris(frame: &mut Frame, area: Rect, app: &App) {
    let block = panel("MULTIPLE URIS FOUND, SELECT ONE", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let uris = app
        .selection
        .record
        .as_ref()
        .map(|r| r.uris.as_slice())
        .unwrap_or_default();
    let items = uris
        .iter()
        .enumerate()
        .map(|(i, uri)| ListItem::new(format!("{}. {}", i + 1, uri)))
        .collect();
    render_list(frame, inner, items, app.selection.uris.selected);
}

fn details_lines(app: &App) -> Vec<Line<'_>> {
    let Some(record) = app.selection.record.as_ref() else {
        return Vec::new();
    };
    record
        .details()
        .into_iter()
        .map(|(label, value)| {
            let style = if label == "Source" {
                Theme::source()
            } else {
                Theme::text()
            };
            Line::from(vec![
                Span::styled(format!("{}: ", label), Theme::title()),
                Span::styled(value, style),
            ])
        })
        .collect()
}

fn render_destination(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let details = Paragraph::new(details_lines(app))
        .wrap(Wrap { trim: false })
        .block(panel("GAME DETAILS", false));
    frame.render_widget(details, chunks[0]);

    render_input_box(frame, chunks[1], app, "Enter the download path");
}

/// Gauge label: `42% | 3.20 MB/s | ETA: 1m 4s`
pub fn gauge_label(app: &App) -> String {
    let progress = &app.download.progress;
    format!(
        "{}% | {:.2} MB/s | ETA: {}",
        progress.percent(),
        progress.speed_mbps(),
        format_eta(progress.eta)
    )
}

fn render_downloading(frame: &mut Frame, area: Rect, app: &App) {
    let download = &app.download;
    let block = panel(format!("DOWNLOADING {}", download.title), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let name = download.name.as_deref().unwrap_or("Fetching torrent metadata...");
    let info = Paragraph::new(vec![
        Line::from(Span::styled(name, Theme::text())),
        Line::from(Span::styled(
            format!("into {}", download.destination.display()),
            Theme::dimmed(),
        )),
    ]);
    frame.render_widget(info, chunks[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).border_style(Theme::border()))
        .gauge_style(Theme::gauge())
        .ratio(download.progress.fraction.clamp(0.0, 1.0))
        .label(gauge_label(app));
    frame.render_widget(gauge, chunks[1]);

    let status = match download.status {
        DownloadStatus::Resolving | DownloadStatus::Running => Line::from(Span::styled(
            "Downloading... (Ctrl+C to abort)",
            Theme::loading(),
        )),
        DownloadStatus::Completed => Line::from(Span::styled(
            "Download complete! Press Enter to return to the menu.",
            Theme::success(),
        )),
        DownloadStatus::Failed(ref msg) => Line::from(Span::styled(
            format!("Error during download: {}", msg),
            Theme::error(),
        )),
    };
    frame.render_widget(Paragraph::new(status).wrap(Wrap { trim: true }), chunks[2]);
}

fn render_library(frame: &mut Frame, area: Rect, app: &App) {
    let library = &app.library;
    let block = panel(format!("LIBRARY ({})", library.games.len()), true);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if library.loading != LoadingState::Idle {
        render_message(frame, inner, &library.loading);
        return;
    }

    let (list_area, prompt_area) = match library.prompt {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(2)])
                .split(inner);
            (chunks[0], Some(chunks[1]))
        }
        None => (inner, None),
    };

    let items = library
        .games
        .iter()
        .enumerate()
        .map(|(i, game)| ListItem::new(format!("{}. {}", i + 1, game)))
        .collect();
    render_list(frame, list_area, items, library.list.selected);

    if let (Some(prompt), Some(area)) = (library.prompt, prompt_area) {
        let game = library.selected_game().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(library_prompt_text(prompt, game)).style(Theme::error()),
            area,
        );
    }
}

fn library_prompt_text(prompt: LibraryPrompt, game: &str) -> String {
    match prompt {
        LibraryPrompt::Choose => format!("'{}': r:reinstall  u:uninstall  ESC:back", game),
        LibraryPrompt::Confirm(op) => format!(
            "{} '{}'? Its folder will be deleted.  y:confirm  n:cancel",
            op.verb(),
            game
        ),
    }
}

fn key_help(state: AppState) -> &'static str {
    match state {
        AppState::Home => " ↑↓:move  ↵:select  q:quit ",
        AppState::Prompt(_) | AppState::Destination => " ↵:confirm  ESC:back ",
        AppState::Results | AppState::Uris => " ↑↓:move  1-9/↵:select  0/ESC:go back ",
        AppState::Downloading => " ↵:menu when done  Ctrl+C:quit ",
        AppState::Library => " ↵:actions  r:reinstall  u:uninstall  0/ESC:back ",
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", Theme::highlighted()),
        InputMode::Editing => Span::styled(" INSERT ", Theme::top_result()),
    };

    let mut spans = vec![mode, Span::styled(key_help(app.state), Theme::dimmed())];
    if let Some(ref status) = app.status {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(status.as_str(), Theme::text()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(Theme::status_bar()), area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(Line::from(Span::styled(error, Theme::error())))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Theme::error())
                .title(Span::styled(" ERROR ", Theme::error()))
                .style(Theme::text()),
        );

    frame.render_widget(error_block, popup_area);
}
