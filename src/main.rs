mod game;
mod state;
mod term;

/// Signed so that stepping off the left/top edge is representable.
pub type GridInt = i16;
pub type Cell = (GridInt, GridInt);

fn main() {
    let config = state::Config::default();
    let mut game = game::SnakeGame::new(config);

    // The game loop takes care of exiting cleanly on CTRL+C
    game.run();
}
