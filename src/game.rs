use std::{process::exit, thread::sleep, time::Duration};

use crate::state::{Config, GameState, Heading, RunState, Snapshot};
use crate::term::TermManager;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const POLL_INTERVAL_MS: u64 = 10;

/// Everything the keyboard can ask of the simulation.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Command {
    Steer(Heading),
    Start,
    TogglePause,
    Reset,
    Quit,
}

/// Host side of the game: owns the terminal, the simulation and the
/// clock that drives it.
pub struct SnakeGame {
    state: GameState,
    term: TermManager,
}

impl SnakeGame {
    pub fn new(config: Config) -> Self {
        SnakeGame {
            state: GameState::new(config),
            term: TermManager::new(config),
        }
    }

    pub fn run(&mut self) {
        self.term.setup();

        self.render(&self.state.snapshot());
        self.term.show_message(&[
            "Arrow keys or WASD to steer",
            "Enter to start, Esc to pause,",
            "R to reset, CTRL+C to quit",
        ]);

        let polls_per_step = (self.state.config().tick_ms / POLL_INTERVAL_MS).max(1);
        let mut polls_until_step = polls_per_step;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue() {
                if let Some(cmd) = map_key(&key_ev) {
                    self.apply(cmd);
                }
            }

            if self.state.run_state() != RunState::Running {
                continue;
            }

            polls_until_step -= 1;
            if polls_until_step == 0 {
                polls_until_step = polls_per_step;
                let snap = self.state.tick();
                self.render(&snap);
                if snap.state == RunState::GameOver {
                    self.show_game_over(&snap);
                }
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, cmd: Command) {
        let snap = match cmd {
            Command::Quit => self.clean_exit(),
            Command::Steer(heading) => {
                self.state.set_heading(heading);
                return; // takes effect on the next step, nothing to redraw
            }
            Command::Start => self.state.start(),
            Command::Reset => self.state.reset(),
            Command::TogglePause => match self.state.run_state() {
                RunState::Running => self.state.pause(),
                RunState::Paused => self.state.resume(),
                _ => return,
            },
        };

        self.render(&snap);
        match snap.state {
            RunState::Paused => self.term.show_message(&["Paused", "Esc to resume"]),
            RunState::Idle => self.term.show_message(&["Enter to start"]),
            _ => {}
        }
    }

    fn render(&mut self, snap: &Snapshot) {
        self.term.hide_message();
        self.term.draw_frame(snap);
    }

    fn show_game_over(&mut self, snap: &Snapshot) {
        self.term.show_message(&[
            "Game over!",
            &*format!("Score: {}", snap.score),
            "",
            "Enter to play again,",
            "or CTRL+C to quit.",
        ]);
    }

    fn clean_exit(&mut self) -> ! {
        self.term.restore();
        exit(0);
    }
}

/// Stateless key-to-command map; anything unrecognized is ignored.
pub fn map_key(ev: &KeyEvent) -> Option<Command> {
    use Heading::*;

    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Command::Steer(Up)),
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Steer(Left)),
        KeyCode::Char('s') | KeyCode::Down => Some(Command::Steer(Down)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Steer(Right)),
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Char('r') => Some(Command::Reset),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Heading::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn directional_keys_steer() {
        for (code, heading) in [
            (KeyCode::Up, Up),
            (KeyCode::Char('w'), Up),
            (KeyCode::Down, Down),
            (KeyCode::Char('s'), Down),
            (KeyCode::Left, Left),
            (KeyCode::Char('a'), Left),
            (KeyCode::Right, Right),
            (KeyCode::Char('d'), Right),
        ]
        .iter()
        {
            assert_eq!(map_key(&key(*code)), Some(Command::Steer(*heading)));
        }
    }

    #[test]
    fn command_keys_map() {
        assert_eq!(map_key(&key(KeyCode::Enter)), Some(Command::Start));
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(Command::TogglePause));
        assert_eq!(map_key(&key(KeyCode::Char('r'))), Some(Command::Reset));
        assert_eq!(
            map_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn everything_else_is_ignored() {
        assert_eq!(map_key(&key(KeyCode::Char('x'))), None);
        assert_eq!(map_key(&key(KeyCode::Tab)), None);
        assert_eq!(map_key(&key(KeyCode::F(1))), None);
    }
}
