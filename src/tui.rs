use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::catalog::{FilterCatalog, FilterOption};
use crate::client::HttpCandidateSource;
use crate::config::Settings;
use crate::controller::{Completion, RetrievalController, RetrievalResult};
use crate::models::Candidate;
use crate::pagination::{self, PaginationMode};
use crate::search::{DebouncedInput, DEFAULT_DEBOUNCE};
use crate::state::ListingState;
use crate::truncate;

const TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Search,
    Filters,
    Chips,
}

struct AppState {
    listing: ListingState,
    controller: RetrievalController<HttpCandidateSource>,
    catalog: FilterCatalog,
    filter_rows: Vec<(&'static str, &'static FilterOption)>,
    search: DebouncedInput,
    focus: Focus,
    selected: usize,
    scroll_offset: u16,
    filter_cursor: usize,
    chip_cursor: usize,
    tx: UnboundedSender<Completion>,
}

impl AppState {
    fn new(settings: &Settings, tx: UnboundedSender<Completion>) -> Self {
        let catalog = FilterCatalog::default();
        let filter_rows = catalog
            .sections()
            .iter()
            .flat_map(|section| section.options.iter().map(move |option| (section.title, option)))
            .collect();

        Self {
            listing: ListingState::new(settings.per_page),
            controller: RetrievalController::new(
                HttpCandidateSource::new(&settings.api_base_url),
                catalog,
                settings.pagination,
            ),
            catalog,
            filter_rows,
            search: DebouncedInput::new(DEFAULT_DEBOUNCE),
            focus: Focus::List,
            selected: 0,
            scroll_offset: 0,
            filter_cursor: 0,
            chip_cursor: 0,
            tx,
        }
    }

    fn reload(&mut self) {
        self.controller.spawn_refresh(&self.listing, self.tx.clone());
        self.selected = 0;
        self.scroll_offset = 0;
    }

    fn visible(&self) -> &[Candidate] {
        self.controller.visible(self.listing.query())
    }

    fn current_candidate(&self) -> Option<&Candidate> {
        self.visible().get(self.selected)
    }

    fn total_pages(&self) -> usize {
        self.controller.total_pages(self.listing.query().page_size)
    }

    fn next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn go_to_page(&mut self, page: usize) {
        let total_pages = self.total_pages();
        if !self.listing.set_page(page, total_pages) {
            return;
        }
        // Client mode already holds every row; only the slice moves.
        if self.controller.mode() == PaginationMode::Server {
            self.reload();
        } else {
            self.selected = 0;
            self.scroll_offset = 0;
        }
    }

    fn next_page(&mut self) {
        self.go_to_page(self.listing.query().page + 1);
    }

    fn prev_page(&mut self) {
        self.go_to_page(self.listing.query().page.saturating_sub(1));
    }

    fn toggle_full_text(&mut self) {
        self.listing.toggle_full_text_search();
        self.reload();
    }

    fn cycle_sort(&mut self) {
        let sort = self.listing.query().sort.next();
        self.listing.set_sort(sort);
        self.reload();
    }

    fn toggle_filter_at_cursor(&mut self) {
        if let Some((_, option)) = self.filter_rows.get(self.filter_cursor) {
            let key = option.key();
            self.listing.toggle_filter(key);
            self.reload();
        }
    }

    fn focus_chips(&mut self) {
        if !self.listing.selection().is_empty() {
            self.chip_cursor = self.listing.selection().len() - 1;
            self.focus = Focus::Chips;
        }
    }

    fn move_chip_cursor(&mut self, forward: bool) {
        let len = self.listing.selection().len();
        if forward && self.chip_cursor + 1 < len {
            self.chip_cursor += 1;
        } else if !forward {
            self.chip_cursor = self.chip_cursor.saturating_sub(1);
        }
    }

    fn remove_chip_at_cursor(&mut self) {
        if self.listing.remove_filter_at(self.chip_cursor).is_none() {
            return;
        }
        self.reload();
        let len = self.listing.selection().len();
        if len == 0 {
            self.focus = Focus::List;
        }
        self.chip_cursor = self.chip_cursor.min(len.saturating_sub(1));
    }

    fn clear_filters(&mut self) {
        if !self.listing.selection().is_empty() {
            self.listing.clear_filters();
            self.reload();
        }
    }

    fn commit_search(&mut self, text: String) {
        self.listing.set_search_text(&text);
        self.reload();
    }

    fn tick(&mut self, rx: &mut UnboundedReceiver<Completion>) {
        if let Some(text) = self.search.poll(Instant::now()).map(str::to_string) {
            self.commit_search(text);
        }

        while let Ok(done) = rx.try_recv() {
            if self.controller.apply(done.ticket, done.outcome) {
                self.selected = 0;
                self.scroll_offset = 0;
            }
        }
    }
}

pub fn run_browse(settings: &Settings) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut state = AppState::new(settings, tx);
    state.reload();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, &mut rx);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    rx: &mut UnboundedReceiver<Completion>,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        state.tick(rx);
        list_state.select(if state.visible().is_empty() { None } else { Some(state.selected) });
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match state.focus {
            Focus::Search => match key.code {
                KeyCode::Enter | KeyCode::Esc => {
                    if let Some(text) = state.search.flush().map(str::to_string) {
                        state.commit_search(text);
                    }
                    state.focus = Focus::List;
                }
                KeyCode::Backspace => state.search.pop(Instant::now()),
                KeyCode::Delete => state.search.clear(Instant::now()),
                KeyCode::Char(c) => state.search.push(c, Instant::now()),
                _ => {}
            },
            Focus::Filters => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Tab | KeyCode::Esc => state.focus = Focus::List,
                KeyCode::Down | KeyCode::Char('j') => {
                    if state.filter_cursor + 1 < state.filter_rows.len() {
                        state.filter_cursor += 1;
                    }
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    state.filter_cursor = state.filter_cursor.saturating_sub(1);
                }
                KeyCode::Char(' ') | KeyCode::Enter => state.toggle_filter_at_cursor(),
                KeyCode::Char('x') => state.clear_filters(),
                _ => {}
            },
            Focus::Chips => match key.code {
                KeyCode::Char('q') => break,
                KeyCode::Esc | KeyCode::Tab => state.focus = Focus::List,
                KeyCode::Right | KeyCode::Char('l') => state.move_chip_cursor(true),
                KeyCode::Left | KeyCode::Char('h') => state.move_chip_cursor(false),
                KeyCode::Char('d') | KeyCode::Enter | KeyCode::Backspace | KeyCode::Delete => {
                    state.remove_chip_at_cursor()
                }
                KeyCode::Char('x') => {
                    state.clear_filters();
                    state.focus = Focus::List;
                }
                _ => {}
            },
            Focus::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Right | KeyCode::Char('l') => state.next_page(),
                KeyCode::Left | KeyCode::Char('h') => state.prev_page(),
                KeyCode::Char('/') => state.focus = Focus::Search,
                KeyCode::Tab => state.focus = Focus::Filters,
                KeyCode::Char('f') => state.toggle_full_text(),
                KeyCode::Char('s') => state.cycle_sort(),
                KeyCode::Char('d') => state.focus_chips(),
                KeyCode::Char('x') => state.clear_filters(),
                KeyCode::Char('r') => {
                    state.controller.invalidate();
                    state.reload();
                }
                _ => {}
            },
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    frame.render_widget(build_search_bar(state), rows[0]);
    frame.render_widget(build_chips(state), rows[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(32),
            Constraint::Percentage(40),
        ])
        .split(rows[2]);

    draw_filters(frame, state, columns[0]);
    draw_candidates(frame, state, list_state, columns[1]);

    let detail_widget = Paragraph::new(build_detail(state))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));
    frame.render_widget(detail_widget, columns[2]);

    frame.render_widget(build_pagination(state), rows[3]);

    let help = match state.focus {
        Focus::List => {
            " j/k:select  h/l:page  /:search  f:full-text  s:sort  Tab:filters  d:pick chip  x:clear  r:reload  q:quit"
        }
        Focus::Search => " type to search  Backspace:delete  Del:clear  Enter/Esc:done",
        Focus::Filters => " j/k:move  Space:toggle  x:clear  Tab/Esc:back  q:quit",
        Focus::Chips => " h/l:move  d/Enter:remove chip  x:clear all  Esc:back  q:quit",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[4],
    );
}

fn focused_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

fn build_search_bar(state: &AppState) -> Paragraph<'_> {
    let query = state.listing.query();
    let cursor = if state.focus == Focus::Search { "_" } else { "" };
    let full_text = if query.full_text_search { "[x]" } else { "[ ]" };

    let line = Line::from(vec![
        Span::raw(format!(" {}{}", state.search.text(), cursor)),
        Span::styled(
            format!("   {} Full text   Sort: {}", full_text, query.sort.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    Paragraph::new(line).block(focused_block(
        format!(" All Candidates | {} ", state.controller.base_url()),
        state.focus == Focus::Search,
    ))
}

fn build_chips(state: &AppState) -> Paragraph<'_> {
    let mut spans = vec![Span::raw(format!(
        " Showing {} candidate applications  ",
        state.controller.total()
    ))];
    for (idx, key) in state.listing.selection().iter().enumerate() {
        let style = if state.focus == Focus::Chips && idx == state.chip_cursor {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::Green)
        };
        spans.push(Span::styled(format!("[{} x]", state.catalog.label_for(key)), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true })
}

fn draw_filters(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut items: Vec<ListItem> = Vec::new();
    let mut cursor_row = 0;
    let mut last_section = "";

    for (idx, (section, option)) in state.filter_rows.iter().enumerate() {
        if *section != last_section {
            let open = state
                .catalog
                .sections()
                .iter()
                .any(|s| s.title == *section && s.default_open);
            let style = if open {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            items.push(ListItem::new(Span::styled(section.to_string(), style)));
            last_section = *section;
        }
        if idx == state.filter_cursor {
            cursor_row = items.len();
        }
        let mark = if state.listing.selection().contains(option.key()) { "[x]" } else { "[ ]" };
        items.push(ListItem::new(format!("  {} {}", mark, option.label)));
    }

    let mut filter_state = ListState::default();
    if state.focus == Focus::Filters {
        filter_state.select(Some(cursor_row));
    }

    let list = List::new(items)
        .block(focused_block(" Filters ".to_string(), state.focus == Focus::Filters))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(list, area, &mut filter_state);
}

fn draw_candidates(frame: &mut Frame, state: &AppState, list_state: &mut ListState, area: Rect) {
    let count = if state.controller.is_loading() {
        "loading".to_string()
    } else {
        state.controller.total().to_string()
    };
    let block = focused_block(
        format!(" Candidates ({}) ", count),
        state.focus == Focus::List,
    );

    let placeholder = match state.controller.result() {
        RetrievalResult::Loading => Some(Text::styled(
            "Loading candidates...",
            Style::default().fg(Color::DarkGray),
        )),
        RetrievalResult::Error { message } => Some(Text::from(vec![
            Line::from(Span::styled(
                "Connection Error",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(message.as_str()),
        ])),
        RetrievalResult::Success { candidates } if candidates.is_empty() => Some(Text::raw(
            "No candidates found. Try adjusting your search or filters.",
        )),
        RetrievalResult::Success { .. } => None,
    };

    if let Some(text) = placeholder {
        frame.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: true }), area);
        return;
    }

    let items: Vec<ListItem> = state
        .visible()
        .iter()
        .map(|candidate| {
            let status = candidate.status.as_deref().unwrap_or("-");
            ListItem::new(format!(
                "#{:<4} {} | {}",
                candidate.id,
                truncate(&candidate.name, 24),
                status
            ))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, list_state);
}

fn build_pagination(state: &AppState) -> Paragraph<'_> {
    let total_pages = state.total_pages();
    if !pagination::shows_controls(total_pages) {
        return Paragraph::new("");
    }

    let current = state.listing.query().page;
    let mut spans = vec![Span::raw(" < ")];
    for page in pagination::page_window(current, total_pages) {
        match page {
            Some(p) if p == current => spans.push(Span::styled(
                format!("[{}]", p),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Some(p) => spans.push(Span::raw(format!(" {} ", p))),
            None => spans.push(Span::raw(" ... ")),
        }
    }
    spans.push(Span::raw(" > "));
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}

fn build_detail(state: &AppState) -> Text<'_> {
    let Some(candidate) = state.current_candidate() else {
        return Text::raw("No candidate selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    // Header
    lines.push(Line::from(Span::styled(
        candidate.name.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if let Some(headline) = candidate.headline() {
        lines.push(Line::from(headline));
    }

    if let Some(status) = &candidate.status {
        lines.push(Line::from(Span::styled(
            format!("Status: {}", status),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));

    if let Some(job_title) = &candidate.job_title {
        lines.push(Line::from(Span::styled(
            job_title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(action) = &candidate.action_link {
        lines.push(Line::from(Span::styled(
            format!("{} for {}", action, candidate.name),
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(source) = &candidate.source {
        lines.push(Line::from(format!("Source: {}", source)));
    }
    if let Some(activity) = &candidate.last_activity {
        lines.push(Line::from(format!("Last activity: {}", activity)));
    }

    if candidate.availability_status.as_deref() == Some("Not Requested") {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Availability: Not Requested",
            Style::default().fg(Color::DarkGray),
        )));
    }

    if candidate.has_interviews && !candidate.interviews.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Interviews",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for interview in &candidate.interviews {
            for line in textwrap::fill(&interview.name, 60).lines() {
                lines.push(Line::from(format!("  {}", line)));
            }
        }
    }

    Text::from(lines)
}
