mod board;
pub mod layout;
mod piece;
mod session;

pub use board::Board;
pub use piece::{Allegiance, Piece, PieceId, PieceType};
pub use session::{GameSession, Phase, TurnState};
