use std::io::{self, Stdout, Write};

use colored::Colorize;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{self, ClearType},
    ExecutableCommand,
};

use crate::cli::output::current_preferences;
use crate::cli::ui::table_renderer::{rule, Table};

const DEFAULT_HIGHLIGHT: &str = "> ";
const DEFAULT_NORMAL: &str = "  ";
const FOOTER_HINT: &str = "Use ↑ ↓ to navigate, Enter to select, ESC to return.";

#[derive(Debug, PartialEq, Eq)]
pub enum ListSelectionResult {
    Selected(usize),
    Escaped,
    Empty,
}

enum Step {
    Move(usize),
    Done(ListSelectionResult),
    Ignore,
}

fn step(current: usize, len: usize, key: KeyCode) -> Step {
    match key {
        KeyCode::Up => Step::Move(current.checked_sub(1).unwrap_or(len - 1)),
        KeyCode::Down => Step::Move((current + 1) % len),
        KeyCode::Enter => Step::Done(ListSelectionResult::Selected(current)),
        KeyCode::Esc | KeyCode::Char('q') => Step::Done(ListSelectionResult::Escaped),
        _ => Step::Ignore,
    }
}

/// Arrow-key row picker drawn over a rendered [`Table`].
pub struct ListSelector<'a> {
    pub table: &'a Table,
    pub initial: usize,
}

impl<'a> ListSelector<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table, initial: 0 }
    }

    /// Starts with the cursor on `index`, e.g. the current selection.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.initial = index;
        self
    }

    fn start_index(&self) -> usize {
        self.initial.min(self.table.rows.len().saturating_sub(1))
    }

    pub fn run(&self) -> io::Result<ListSelectionResult> {
        if self.table.rows.is_empty() {
            return Ok(ListSelectionResult::Empty);
        }

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        let cursor_hidden = stdout.execute(cursor::Hide).is_ok();
        let result = self.event_loop(&mut stdout);
        if cursor_hidden {
            stdout.execute(cursor::Show).ok();
        }
        terminal::disable_raw_mode().ok();
        result
    }

    fn event_loop(&self, stdout: &mut Stdout) -> io::Result<ListSelectionResult> {
        let len = self.table.rows.len();
        let mut current = self.start_index();
        let mut drawn = 0u16;

        loop {
            drawn = self.draw(stdout, current, drawn)?;
            let key = match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => key.code,
                _ => continue,
            };
            match step(current, len, key) {
                Step::Move(next) => current = next,
                Step::Done(result) => return Ok(result),
                Step::Ignore => {}
            }
        }
    }

    fn draw(&self, stdout: &mut Stdout, index: usize, previous: u16) -> io::Result<u16> {
        if previous > 0 {
            stdout.execute(cursor::MoveUp(previous))?;
        }
        stdout.execute(cursor::MoveToColumn(0))?;
        stdout.execute(terminal::Clear(ClearType::FromCursorDown))?;

        let lines = self.render_with_highlight(index);
        for line in &lines {
            write!(stdout, "{}\r\n", line)?;
        }
        stdout.flush()?;
        Ok(lines.len() as u16)
    }

    fn render_with_highlight(&self, index: usize) -> Vec<String> {
        let plain = current_preferences().plain_mode;
        let widths = self.table.widths();
        let mut lines = Vec::with_capacity(self.table.rows.len() + 3);

        let header = self.table.render_header(&widths);
        let header = if plain { header } else { header.bold().to_string() };
        lines.push(format!("{DEFAULT_NORMAL}{header}"));
        lines.push(format!("{DEFAULT_NORMAL}{}", rule(&widths)));

        for (row_idx, row) in self.table.rows.iter().enumerate() {
            let content = self.table.render_row(row, &widths);
            if row_idx == index {
                let line = format!("{DEFAULT_HIGHLIGHT}{content}");
                lines.push(if plain { line } else { line.reversed().to_string() });
            } else {
                lines.push(format!("{DEFAULT_NORMAL}{content}"));
            }
        }

        lines.push(FOOTER_HINT.to_string());
        lines
    }

    /// Replays `keys` without touching the terminal.
    pub fn run_simulated(&self, keys: &[KeyCode]) -> ListSelectionResult {
        if self.table.rows.is_empty() {
            return ListSelectionResult::Empty;
        }

        let len = self.table.rows.len();
        let mut current = self.start_index();
        for key in keys {
            match step(current, len, *key) {
                Step::Move(next) => current = next,
                Step::Done(result) => return result,
                Step::Ignore => {}
            }
        }

        ListSelectionResult::Escaped
    }
}
