use serde::{Deserialize, Serialize};

use super::TurnController;
use crate::error::Result;
use crate::model::Phase;
use crate::{tile_from_input, Point};

/**
 * These commands are the sole method outside of the game core crate
 * of changing the game session.
 *
 * It is marked as non_exhaustive, as new commands might be added in the
 * future.
 */
#[non_exhaustive]
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum GameCommand {
    /// Raw tile input from a pointer. Selects or targets depending on the
    /// phase. Coordinates off the board mean nothing was clicked.
    Tile { x: i32, y: i32 },
    Select(Point),
    Target(Point),
    Deselect,
    /// Throws the current war away and sets the board out again.
    Restart,
    ShutDown,
}

pub(super) fn apply_command_dispatch(tc: &mut TurnController, command: &GameCommand) -> Result<()> {
    use GameCommand::*;
    if *command == ShutDown {
        tc.running = false;
        return Ok(());
    }
    if tc.session.phase() == Phase::ResolvingCombat {
        log::debug!("Ignoring {:?} while the battle is being told", command);
        return Ok(());
    }
    match command {
        Tile { x, y } => tc.handle_tile(tile_from_input(*x, *y)),
        Select(pt) => tc.select(*pt),
        Target(pt) => tc.target(*pt),
        Deselect => tc.deselect(),
        Restart => tc.restart(),
        ShutDown => Ok(()),
    }
}
