//! Pager: a scrollable full-screen view of rendered lines

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;

/// Pager state
pub struct App {
    /// Every line of every display, in order
    pub lines: Vec<Line<'static>>,

    /// Index of the first visible line
    pub scroll: usize,

    /// Rows available for lines in the last frame
    pub viewport: usize,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(lines: Vec<Line<'static>>) -> Self {
        App {
            lines,
            scroll: 0,
            viewport: 0,
            should_quit: false,
        }
    }

    /// Run the pager until the user quits
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    fn max_scroll(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport)
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        self.viewport = chunks[0].height as usize;
        self.scroll = self.scroll.min(self.max_scroll());

        let visible: Vec<Line<'static>> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(self.viewport)
            .cloned()
            .collect();
        frame.render_widget(Paragraph::new(visible), chunks[0]);

        super::panes::render_status_bar(
            frame,
            chunks[1],
            self.scroll,
            self.viewport,
            self.lines.len(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let page = self.viewport.max(1);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Enter => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            KeyCode::PageUp | KeyCode::Char('b') => {
                self.scroll = self.scroll.saturating_sub(page);
            }
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.scroll = (self.scroll + page).min(self.max_scroll());
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.scroll = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.scroll = self.max_scroll();
            }
            _ => {}
        }
    }
}

/// Show `lines` in the pager on the alternate screen
pub fn page(lines: Vec<Line<'static>>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(lines);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
