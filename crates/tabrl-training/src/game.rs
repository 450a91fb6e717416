use tabrl_agent::Player;
use tabrl_engine::{Environment as _, GameStatus, PlayerNum, TicTacToe};

use crate::GameError;

/// Plays one game of tic-tac-toe to completion.
///
/// Seats alternate starting with `players[0]` as player one. Each seat gets a
/// copy of the grid and returns a coordinate. A rejected move ends the game
/// at once as a forfeit: the offender loses and the opponent wins. Either way
/// each seat receives exactly one outcome callback.
///
/// A seat that cannot produce a move at all is a fatal error; no outcome is
/// reported in that case.
pub fn play_game(mut seats: [&mut dyn Player; 2]) -> Result<GameStatus, GameError> {
    for seat in &mut seats {
        seat.start_episode();
    }

    let mut game = TicTacToe::new();
    while !game.is_terminal() {
        let me = game.active_player();
        let grid = *game.grid();
        let coord = seats[me.index()].choose_move(me, &grid)?;
        if let Err(err) = game.apply(me, coord) {
            log::debug!("player {me} forfeits: {err}");
            game.forfeit(me);
        }
    }

    let status = game.status();
    for player in PlayerNum::ALL {
        // terminal, so an outcome exists for both seats
        if let Some(outcome) = status.outcome_for(player) {
            seats[player.index()].finish(outcome);
        }
    }
    log::trace!("game over: {status:?}\n{}", game.grid());
    Ok(status)
}
