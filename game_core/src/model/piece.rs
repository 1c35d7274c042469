use std::collections::BTreeSet;
use std::fmt;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::Point;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub usize);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Allegiance {
    White = 0,
    Black = 1,
}

impl Allegiance {
    pub fn other(self) -> Allegiance {
        match self {
            Allegiance::White => Allegiance::Black,
            Allegiance::Black => Allegiance::White,
        }
    }

    /// Direction a pawn of this allegiance advances along y.
    pub fn forward(self) -> isize {
        match self {
            Allegiance::White => 1,
            Allegiance::Black => -1,
        }
    }

    pub fn pawn_start_rank(self) -> usize {
        match self {
            Allegiance::White => 1,
            Allegiance::Black => 6,
        }
    }

    pub fn promotion_rank(self) -> usize {
        match self {
            Allegiance::White => 7,
            Allegiance::Black => 0,
        }
    }

    pub fn kingdom(self) -> &'static str {
        match self {
            Allegiance::White => "England",
            Allegiance::Black => "France",
        }
    }
}

impl fmt::Display for Allegiance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Allegiance::White => write!(f, "White"),
            Allegiance::Black => write!(f, "Black"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters, Serialize, Deserialize)]
pub struct Piece {
    #[get_copy = "pub"]
    id: PieceId,
    #[get_copy = "pub"]
    allegiance: Allegiance,
    #[get_copy = "pub"]
    piece_type: PieceType,
    #[get_copy = "pub"]
    position: Point,
    name: String,
    #[get = "pub"]
    friends: BTreeSet<PieceId>,
    modifier: String,
}

impl Piece {
    pub fn new<S: ToString>(
        id: PieceId,
        allegiance: Allegiance,
        piece_type: PieceType,
        position: Point,
        name: S,
    ) -> Piece {
        Piece {
            id,
            allegiance,
            piece_type,
            position,
            name: name.to_string(),
            friends: BTreeSet::new(),
            modifier: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Remembered events that color every story this piece takes part in.
    pub fn modifier(&self) -> &str {
        self.modifier.as_str()
    }

    pub fn is_friend_of(&self, other: PieceId) -> bool {
        self.friends.contains(&other)
    }

    pub fn is_enemy_of(&self, other: &Piece) -> bool {
        self.allegiance != other.allegiance
    }

    pub fn befriend(&mut self, other: PieceId) {
        self.friends.insert(other);
    }

    pub(crate) fn set_modifier(&mut self, modifier: String) {
        self.modifier = modifier;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// The pawn is crowned. It keeps its id, friends and mood, but from now
    /// on the stories call it a queen.
    pub(crate) fn promote(&mut self) {
        self.piece_type = PieceType::Queen;
        self.name = format!("Queen of {}", self.allegiance.kingdom());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn allegiance_directions_mirror() {
        assert_eq!(Allegiance::White.other(), Allegiance::Black);
        assert_eq!(Allegiance::Black.other(), Allegiance::White);
        assert_eq!(Allegiance::White.forward(), -Allegiance::Black.forward());
        assert_eq!(Allegiance::White.promotion_rank(), 7);
        assert_eq!(Allegiance::Black.promotion_rank(), 0);
    }

    #[test]
    fn promotion_crowns_but_keeps_identity() {
        let mut pawn = Piece::new(
            PieceId(9),
            Allegiance::White,
            PieceType::Pawn,
            (1, 6),
            "English foot soldier",
        );
        pawn.befriend(PieceId(3));
        pawn.set_modifier("Grim.".to_string());
        pawn.promote();
        assert_eq!(pawn.piece_type(), PieceType::Queen);
        assert_eq!(pawn.name(), "Queen of England");
        assert_eq!(pawn.id(), PieceId(9));
        assert_eq!(pawn.allegiance(), Allegiance::White);
        assert!(pawn.is_friend_of(PieceId(3)));
        assert_eq!(pawn.modifier(), "Grim.");
    }
}
