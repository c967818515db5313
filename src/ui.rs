use chrono::NaiveDate;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use mood_diary::{
    analyzer::{DailySummaryStats, Tone},
    auth::{Credentials, MAX_LOGIN_ATTEMPTS},
    diary_entry::DiaryEntry,
    diary_state::DiaryState,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthChar;

const PREVIEW_WIDTH: usize = 48;

pub enum Action {
    WriteToday,
    WriteYesterday,
    View,
    Delete,
    Search,
    Chart,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cursor_position: usize,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

fn title(text: impl Into<String>) -> Paragraph<'static> {
    Paragraph::new(text.into())
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn instructions(text: impl Into<String>) -> Paragraph<'static> {
    Paragraph::new(text.into())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn screen(area: Rect, body: Constraint) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(3), body, Constraint::Length(3)])
        .split(area)
        .to_vec()
}

/// First line of the entry, cut to fit a list row.
fn preview(content: &str) -> String {
    let first = content.lines().next().unwrap_or("");
    let mut width = 0;
    let mut out = String::new();
    for c in first.chars() {
        width += c.width().unwrap_or(0);
        if width > PREVIEW_WIDTH {
            out.push('…');
            break;
        }
        out.push(c);
    }
    out
}

fn entry_item(date: &str, entry: &DiaryEntry) -> ListItem<'static> {
    let tone = match entry.tone {
        Some(tone) => tone.to_string(),
        None => "not analyzed".to_string(),
    };
    ListItem::new(vec![
        Line::from(Span::raw(format!("[{}] {}", date, preview(&entry.content)))),
        Line::from(Span::styled(
            format!("Tone: {}", tone),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn day_label(day: Option<NaiveDate>) -> String {
    day.map(|d| d.to_string()).unwrap_or_else(|| "None".to_string())
}

fn render_editor(f: &mut Frame, heading: &str, content: &str, footer: &str) {
    let chunks = screen(f.area(), Constraint::Min(10));
    f.render_widget(title(heading.to_string()), chunks[0]);
    let input = Paragraph::new(content.to_string())
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Content"));
    f.render_widget(input, chunks[1]);
    f.render_widget(instructions(footer.to_string()), chunks[2]);
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            cursor_position: 0,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    /// Blocks until a key press arrives, ignoring releases and other events.
    fn next_key(&self) -> Result<KeyCode> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key.code);
                }
            }
        }
    }

    /// Returns true once the user has entered the right credentials.
    pub fn login(&mut self, credentials: &Credentials) -> Result<bool> {
        let mut username = String::new();
        let mut password = String::new();
        let mut on_password = false;
        let mut failures = 0;
        let mut message = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(2),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Login"), chunks[0]);

                let focused = Style::default().fg(Color::Cyan);
                let user_block = Block::default().borders(Borders::ALL).title("Username");
                let pass_block = Block::default().borders(Borders::ALL).title("Password");
                let (user_block, pass_block) = if on_password {
                    (user_block, pass_block.border_style(focused))
                } else {
                    (user_block.border_style(focused), pass_block)
                };
                f.render_widget(Paragraph::new(username.clone()).block(user_block), chunks[1]);
                f.render_widget(
                    Paragraph::new("*".repeat(password.chars().count())).block(pass_block),
                    chunks[2],
                );
                f.render_widget(
                    Paragraph::new(message.clone()).style(Style::default().fg(Color::Red)),
                    chunks[3],
                );
                f.render_widget(
                    instructions("Tab: Switch field, Enter: Login, Esc: Quit"),
                    chunks[5],
                );
            })?;

            match self.next_key()? {
                KeyCode::Esc => return Ok(false),
                KeyCode::Tab | KeyCode::Up | KeyCode::Down => on_password = !on_password,
                KeyCode::Enter if !on_password => on_password = true,
                KeyCode::Enter => {
                    if credentials.verify(&username, &password) {
                        return Ok(true);
                    }
                    failures += 1;
                    if failures >= MAX_LOGIN_ATTEMPTS {
                        return Ok(false);
                    }
                    message = format!(
                        "Invalid username or password ({} attempts left)",
                        MAX_LOGIN_ATTEMPTS - failures
                    );
                    password.clear();
                }
                KeyCode::Char(c) if on_password => password.push(c),
                KeyCode::Char(c) => username.push(c),
                KeyCode::Backspace if on_password => {
                    password.pop();
                }
                KeyCode::Backspace => {
                    username.pop();
                }
                _ => {}
            }
        }
    }

    pub fn display(
        &mut self,
        diary_state: &DiaryState,
        stats: &DailySummaryStats,
        status: &str,
    ) -> Result<()> {
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(title("Mood Diary"), chunks[0]);

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(chunks[1]);

            // newest first
            let entries: Vec<ListItem> = diary_state
                .get_entries()
                .iter()
                .rev()
                .map(|(date, entry)| entry_item(date, entry))
                .collect();
            let entries_list =
                List::new(entries).block(Block::default().borders(Borders::ALL).title("Entries"));
            f.render_widget(entries_list, body[0]);

            let notable = Paragraph::new(vec![
                Line::from(format!("Toughest day: {}", day_label(stats.toughest_day))),
                Line::from(format!("Most fun day: {}", day_label(stats.most_fun_day))),
                Line::from(format!(
                    "Most romantic day: {}",
                    day_label(stats.most_romantic_day)
                )),
            ])
            .block(Block::default().borders(Borders::ALL).title("Analysis"));
            f.render_widget(notable, body[1]);

            f.render_widget(
                Paragraph::new(status.to_string()).style(Style::default().fg(Color::Green)),
                chunks[2],
            );

            let key = |k: &'static str| {
                Span::styled(k, Style::default().add_modifier(Modifier::BOLD))
            };
            let mut controls = vec![
                Span::raw("Press "),
                key("w"),
                Span::raw(" to write today, "),
                key("y"),
                Span::raw(" for yesterday, "),
            ];
            if !diary_state.get_entries().is_empty() {
                controls.extend([
                    key("v"),
                    Span::raw(" to view, "),
                    key("d"),
                    Span::raw(" to delete, "),
                    key("s"),
                    Span::raw(" to search, "),
                    key("m"),
                    Span::raw(" for mood trends, "),
                ]);
            }
            controls.extend([key("q"), Span::raw(" to quit")]);
            let controls_paragraph = Paragraph::new(Line::from(controls))
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            f.render_widget(controls_paragraph, chunks[3]);
        })?;

        Ok(())
    }

    pub fn handle_input(&self, diary_state: &DiaryState) -> Result<Option<Action>> {
        let has_entries = !diary_state.get_entries().is_empty();
        let action = match self.next_key()? {
            KeyCode::Char('w') => Some(Action::WriteToday),
            KeyCode::Char('y') => Some(Action::WriteYesterday),
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('v') if has_entries => Some(Action::View),
            KeyCode::Char('d') if has_entries => Some(Action::Delete),
            KeyCode::Char('s') if has_entries => Some(Action::Search),
            KeyCode::Char('m') if has_entries => Some(Action::Chart),
            _ => None,
        };
        Ok(action)
    }

    /// Free-text editor. Esc finishes, returning the trimmed text.
    pub fn get_new_entry(&mut self, date: NaiveDate, existing: Option<&str>) -> Result<String> {
        let mut content = existing.unwrap_or_default().to_string();
        self.cursor_position = content.len();
        let heading = format!("Diary Entry for {}", date.format("%B %d, %Y"));
        let footer = if existing.is_some() {
            "Saving replaces the existing entry for this day. Esc: Finish"
        } else {
            "Esc: Finish"
        };
        let mut last_content_update = Instant::now();

        loop {
            let now = Instant::now();
            let should_update_cursor =
                now.duration_since(self.last_cursor_update) >= Duration::from_millis(500);
            let should_redraw = should_update_cursor
                || now.duration_since(last_content_update) < Duration::from_millis(50);

            if should_redraw {
                let shown = if self.cursor_visible {
                    let mut with_cursor = content.clone();
                    with_cursor.insert(self.cursor_position, '|');
                    with_cursor
                } else {
                    content.clone()
                };
                self.terminal
                    .draw(|f| render_editor(f, &heading, &shown, footer))?;

                if should_update_cursor {
                    self.cursor_visible = !self.cursor_visible;
                    self.last_cursor_update = now;
                }
            }

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Esc => break,
                KeyCode::Char(c) => {
                    content.insert(self.cursor_position, c);
                    self.cursor_position += c.len_utf8();
                }
                KeyCode::Enter => {
                    content.insert(self.cursor_position, '\n');
                    self.cursor_position += 1;
                }
                KeyCode::Backspace => {
                    if let Some(c) = content[..self.cursor_position].chars().next_back() {
                        self.cursor_position -= c.len_utf8();
                        content.remove(self.cursor_position);
                    }
                }
                KeyCode::Delete => {
                    if self.cursor_position < content.len() {
                        content.remove(self.cursor_position);
                    }
                }
                KeyCode::Left => {
                    if let Some(c) = content[..self.cursor_position].chars().next_back() {
                        self.cursor_position -= c.len_utf8();
                    }
                }
                KeyCode::Right => {
                    if let Some(c) = content[self.cursor_position..].chars().next() {
                        self.cursor_position += c.len_utf8();
                    }
                }
                KeyCode::Home => {
                    self.cursor_position = content[..self.cursor_position]
                        .rfind('\n')
                        .map(|i| i + 1)
                        .unwrap_or(0);
                }
                KeyCode::End => {
                    self.cursor_position = content[self.cursor_position..]
                        .find('\n')
                        .map(|i| self.cursor_position + i)
                        .unwrap_or(content.len());
                }
                _ => continue,
            }
            last_content_update = Instant::now();
        }

        Ok(content.trim().to_string())
    }

    pub fn show_analyzing(&mut self) -> Result<()> {
        self.terminal.draw(|f| {
            let chunks = screen(f.area(), Constraint::Min(3));
            f.render_widget(title("Saving"), chunks[0]);
            let body = Paragraph::new("Entry saved. Analyzing your entry...")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, chunks[1]);
        })?;
        Ok(())
    }

    pub fn show_message(&mut self, heading: &str, message: &str) -> Result<()> {
        self.terminal.draw(|f| {
            let chunks = screen(f.area(), Constraint::Min(3));
            f.render_widget(title(heading.to_string()), chunks[0]);
            let body = Paragraph::new(message.to_string())
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, chunks[1]);
            f.render_widget(instructions("Press any key to continue"), chunks[2]);
        })?;
        self.next_key()?;
        Ok(())
    }

    /// Scrollable list of entries; returns the index picked with Enter.
    fn select_entry(
        &mut self,
        heading: &str,
        entries: &[(String, DiaryEntry)],
        help: &str,
        selected_index: &mut usize,
    ) -> Result<Option<usize>> {
        if entries.is_empty() {
            self.show_message(heading, "No matching entries.")?;
            return Ok(None);
        }

        loop {
            self.terminal.draw(|f| {
                let chunks = screen(f.area(), Constraint::Min(10));
                f.render_widget(title(heading.to_string()), chunks[0]);

                let items: Vec<ListItem> = entries
                    .iter()
                    .map(|(date, entry)| entry_item(date, entry))
                    .collect();
                let entries_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("Entries"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(*selected_index)),
                );

                f.render_widget(instructions(help.to_string()), chunks[2]);
            })?;

            match self.next_key()? {
                KeyCode::Up => *selected_index = selected_index.saturating_sub(1),
                KeyCode::Down => {
                    if *selected_index + 1 < entries.len() {
                        *selected_index += 1;
                    }
                }
                KeyCode::Enter => return Ok(Some(*selected_index)),
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }

    pub fn view_entries(&mut self, heading: &str, entries: &[(String, DiaryEntry)]) -> Result<()> {
        let mut selected_index = 0;
        while let Some(i) = self.select_entry(
            heading,
            entries,
            "Up/Down: Navigate, Enter: View full entry, Esc: Back",
            &mut selected_index,
        )? {
            let (date, entry) = &entries[i];
            self.view_full_entry(date, entry)?;
        }
        Ok(())
    }

    fn view_full_entry(&mut self, date: &str, entry: &DiaryEntry) -> Result<()> {
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(6),
                    Constraint::Length(7),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(title(format!("Entry from {}", date)), chunks[0]);

            let content = Paragraph::new(entry.content.clone())
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Content"));
            f.render_widget(content, chunks[1]);

            let analysis = Paragraph::new(vec![
                Line::from(format!("Summary: {}", entry.summary)),
                Line::from(format!("Tone: {}", entry.tone_label())),
                Line::from(Span::styled(
                    format!("AI Comment: {}", entry.comment),
                    Style::default().add_modifier(Modifier::ITALIC),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("AI Analysis"));
            f.render_widget(analysis, chunks[2]);

            f.render_widget(instructions("Press any key to go back"), chunks[3]);
        })?;

        self.next_key()?;
        Ok(())
    }

    /// Returns the date key of the entry to delete after a y/n confirmation.
    pub fn select_entry_to_delete(&mut self, diary_state: &DiaryState) -> Result<Option<String>> {
        let entries: Vec<(String, DiaryEntry)> = diary_state
            .get_entries()
            .iter()
            .rev()
            .map(|(d, e)| (d.clone(), e.clone()))
            .collect();
        let mut selected_index = 0;

        while let Some(i) = self.select_entry(
            "Select Entry to Delete",
            &entries,
            "Up/Down: Navigate, Enter: Select, Esc: Cancel",
            &mut selected_index,
        )? {
            let date = &entries[i].0;
            self.terminal.draw(|f| {
                let chunks = screen(f.area(), Constraint::Min(3));
                f.render_widget(title("Confirm Delete"), chunks[0]);
                let body = Paragraph::new(format!("Delete the entry for {}?", date))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(body, chunks[1]);
                f.render_widget(instructions("y: Delete, any other key: Cancel"), chunks[2]);
            })?;
            if let KeyCode::Char('y') | KeyCode::Char('Y') = self.next_key()? {
                return Ok(Some(date.clone()));
            }
        }
        Ok(None)
    }

    pub fn get_search_query(&mut self) -> Result<Option<String>> {
        let mut query = String::new();

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(1),
                    ])
                    .split(f.area());

                f.render_widget(title("Search Entries"), chunks[0]);

                let search_input = Paragraph::new(query.clone())
                    .block(Block::default().borders(Borders::ALL).title("Search Query"));
                f.render_widget(search_input, chunks[1]);

                f.render_widget(instructions("Enter: Submit, Esc: Cancel"), chunks[2]);
            })?;

            match self.next_key()? {
                KeyCode::Enter => return Ok(Some(query)),
                KeyCode::Char(c) => query.push(c),
                KeyCode::Backspace => {
                    query.pop();
                }
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }

    /// Bar chart of how many entries carry each tone.
    pub fn show_mood_chart(&mut self, counts: &[(Tone, u64)]) -> Result<()> {
        let data: Vec<(&str, u64)> = counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();

        self.terminal.draw(|f| {
            let chunks = screen(f.area(), Constraint::Min(10));
            f.render_widget(title("Mood Distribution"), chunks[0]);

            let chart = BarChart::default()
                .block(Block::default().borders(Borders::ALL).title("Count per mood"))
                .data(data.as_slice())
                .bar_width(9)
                .bar_gap(2)
                .bar_style(Style::default().fg(Color::Cyan))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );
            f.render_widget(chart, chunks[1]);

            f.render_widget(instructions("Press any key to go back"), chunks[2]);
        })?;

        self.next_key()?;
        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
