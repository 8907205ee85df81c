use crate::state::{Config, RunState, Snapshot};
use crate::Cell;
use std::{io::{Stdout, Write, stdout}, process::exit, time::Duration};

use crossterm::{cursor, execute, queue, terminal};
use crossterm::style::{Color, Print, SetForegroundColor};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};

pub type TermInt = u16;
type TermPos = (TermInt, TermInt);

// Terminal glyphs are taller than wide, so each grid cell spans two
// columns to read as roughly square.
const CELL_WIDTH: TermInt = 2;

const SNAKE_CELL: &str = "██";
const DEAD_SNAKE_CELL: &str = "XX";
const FOOD_CELL: &str = "()";
const EMPTY_CELL: &str = "  ";

/// Projects snapshots onto the terminal: a bordered grid centered on
/// screen, a score line above it, and centered message overlays.
pub struct TermManager {
    term_width: TermInt,
    term_height: TermInt,
    grid_origin: TermPos,
    config: Config,
    stdout: Stdout,
    current_msg: Option<Message>,
}

struct Message {
    top_left: TermPos,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new(config: Config) -> Self {
        let (term_width, term_height) = terminal::size().expect("Error reading size.");
        TermManager {
            term_width,
            term_height,
            grid_origin: (0, 0),
            config,
            stdout: stdout(),
            current_msg: None,
        }
    }

    pub fn setup(&mut self) {
        // Grid frame plus the score line above it.
        let frame_width = self.config.width as TermInt * CELL_WIDTH + 2;
        let frame_height = self.config.height as TermInt + 2;

        // One extra row keeps the score line above the top border on screen.
        if self.term_width < frame_width || self.term_height < frame_height + 2 {
            eprintln!(
                "Terminal too small: need at least {}x{} characters.",
                frame_width,
                frame_height + 2
            );
            exit(1);
        }

        self.grid_origin = (
            (self.term_width - frame_width) / 2 + 1,
            (self.term_height - frame_height) / 2 + 1,
        );

        execute!(self.stdout, EnterAlternateScreen).expect("Error entering alt screen");
        self.set_raw_mode(true);
        self.set_cursor_visibility(false);
        self.clear();
        self.draw_borders();
    }

    pub fn restore(&mut self) {
        self.set_raw_mode(false);
        self.set_cursor_visibility(true);
        execute!(self.stdout, LeaveAlternateScreen).expect("Error leaving alt screen");
    }

    pub fn read_key_events_queue(&self) -> Vec<KeyEvent> {
        let mut events = vec![];

        while poll(Duration::from_millis(1)).unwrap() {
            if let Event::Key(ev) = read().unwrap() {
                events.push(ev);
            }
        }

        events
    }

    /// Repaints the whole grid from a snapshot. Same snapshot, same frame.
    pub fn draw_frame(&mut self, snap: &Snapshot) {
        let snake_color = match snap.state {
            RunState::GameOver => Color::DarkRed,
            _ => Color::Green,
        };
        let snake_cell = match snap.state {
            RunState::GameOver => DEAD_SNAKE_CELL,
            _ => SNAKE_CELL,
        };

        for y in 0..self.config.height {
            for x in 0..self.config.width {
                let cell = (x, y);
                let (s, color) = if snap.snake.contains(&cell) {
                    (snake_cell, snake_color)
                } else if cell == snap.food {
                    (FOOD_CELL, Color::Red)
                } else {
                    (EMPTY_CELL, Color::Reset)
                };
                self.print_cell(cell, s, color);
            }
        }

        let score_pos = (self.grid_origin.0 - 1, self.grid_origin.1 - 2);
        self.print_str(score_pos, &format!("Score: {}", snap.score), Color::Reset);

        self.flush();
    }

    pub fn show_message(&mut self, lines: &[&str]) {
        if self.has_message() {
            self.hide_message();
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.len()).max().unwrap() + 2) as TermInt;
        let center = (self.term_width / 2, self.term_height / 2);
        let top_left = (center.0 - msg_width / 2, center.1 - msg_height / 2);

        // Top and bottom padding rows
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            self.print_str((top_left.0, *y), &" ".repeat(msg_width as usize), Color::Reset);
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            self.print_str((top_left.0, top_left.1 + i as TermInt + 1), &padded_line, Color::Reset);
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush();
    }

    /// Blanks the message rectangle; the caller repaints the frame on top.
    pub fn hide_message(&mut self) {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return,
        };

        let blank = " ".repeat(msg.width as usize);
        for y_diff in 0..msg.height {
            self.print_str((msg.top_left.0, msg.top_left.1 + y_diff), &blank, Color::Reset);
        }

        self.flush();
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self) {
        let width = self.config.width as TermInt * CELL_WIDTH + 2;
        let height = self.config.height as TermInt + 2;
        let (left, top) = (self.grid_origin.0 - 1, self.grid_origin.1 - 1);

        for x in 0..width {
            let ch = if x == 0 || x == width - 1 { "+" } else { "-" };
            self.print_str((left + x, top), ch, Color::Reset);
            self.print_str((left + x, top + height - 1), ch, Color::Reset);
        }

        for y in 1..height - 1 {
            self.print_str((left, top + y), "|", Color::Reset);
            self.print_str((left + width - 1, top + y), "|", Color::Reset);
        }

        self.flush();
    }

    fn print_cell(&mut self, (x, y): Cell, s: &str, color: Color) {
        let pos = (
            self.grid_origin.0 + x as TermInt * CELL_WIDTH,
            self.grid_origin.1 + y as TermInt,
        );
        self.print_str(pos, s, color);
    }

    fn print_str(&mut self, pos: TermPos, s: &str, color: Color) {
        queue!(
            self.stdout,
            cursor::MoveTo(pos.0, pos.1),
            SetForegroundColor(color),
            Print(s),
            SetForegroundColor(Color::Reset)
        )
        .unwrap();
    }

    fn clear(&mut self) {
        execute!(self.stdout, terminal::Clear(ClearType::All)).expect("Error clearing.");
    }

    fn flush(&mut self) {
        self.stdout.flush().expect("Error flushing.");
    }

    fn set_raw_mode(&self, option: bool) {
        let res = if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        };

        res.expect("Error setting raw mode.");
    }

    fn set_cursor_visibility(&mut self, option: bool) {
        let res = if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        };

        res.expect("Error setting cursor visibility.");
    }
}
