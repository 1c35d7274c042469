use super::piece::{Allegiance, Piece, PieceId, PieceType};
use crate::Point;

/// One row of the opening layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnDef {
    pub id: usize,
    pub allegiance: Allegiance,
    pub piece_type: PieceType,
    pub position: Point,
    pub name: &'static str,
}

const fn spawn(
    id: usize,
    allegiance: Allegiance,
    piece_type: PieceType,
    position: Point,
    name: &'static str,
) -> SpawnDef {
    SpawnDef {
        id,
        allegiance,
        piece_type,
        position,
        name,
    }
}

use Allegiance::{Black, White};
use PieceType::*;

const ENGLISH_PAWN: &str = "English foot soldier";
const FRENCH_PAWN: &str = "French foot soldier";

/// The English army takes ids 0-15, the French 16-31.
pub const STANDARD_LAYOUT: [SpawnDef; 32] = [
    spawn(0, White, King, (3, 0), "King of England"),
    spawn(1, White, Queen, (4, 0), "Queen of England"),
    spawn(2, White, Rook, (0, 0), "Archer of the English Army"),
    spawn(3, White, Rook, (7, 0), "Archer of the English Army"),
    spawn(4, White, Bishop, (2, 0), "English Bishop"),
    spawn(5, White, Bishop, (5, 0), "English Bishop"),
    spawn(6, White, Knight, (1, 0), "Knight of England"),
    spawn(7, White, Knight, (6, 0), "Knight of England"),
    spawn(8, White, Pawn, (0, 1), ENGLISH_PAWN),
    spawn(9, White, Pawn, (1, 1), ENGLISH_PAWN),
    spawn(10, White, Pawn, (2, 1), ENGLISH_PAWN),
    spawn(11, White, Pawn, (3, 1), ENGLISH_PAWN),
    spawn(12, White, Pawn, (4, 1), ENGLISH_PAWN),
    spawn(13, White, Pawn, (5, 1), ENGLISH_PAWN),
    spawn(14, White, Pawn, (6, 1), ENGLISH_PAWN),
    spawn(15, White, Pawn, (7, 1), ENGLISH_PAWN),
    spawn(16, Black, King, (4, 7), "King of France"),
    spawn(17, Black, Queen, (3, 7), "Queen of France"),
    spawn(18, Black, Rook, (0, 7), "Archer of the French Army"),
    spawn(19, Black, Rook, (7, 7), "Archer of the French Army"),
    spawn(20, Black, Bishop, (2, 7), "French Bishop"),
    spawn(21, Black, Bishop, (5, 7), "French Bishop"),
    spawn(22, Black, Knight, (1, 7), "French Chevalier"),
    spawn(23, Black, Knight, (6, 7), "French Chevalier"),
    spawn(24, Black, Pawn, (0, 6), FRENCH_PAWN),
    spawn(25, Black, Pawn, (1, 6), FRENCH_PAWN),
    spawn(26, Black, Pawn, (2, 6), FRENCH_PAWN),
    spawn(27, Black, Pawn, (3, 6), FRENCH_PAWN),
    spawn(28, Black, Pawn, (4, 6), FRENCH_PAWN),
    spawn(29, Black, Pawn, (5, 6), FRENCH_PAWN),
    spawn(30, Black, Pawn, (6, 6), FRENCH_PAWN),
    spawn(31, Black, Pawn, (7, 6), FRENCH_PAWN),
];

impl SpawnDef {
    pub fn to_piece(&self) -> Piece {
        Piece::new(
            PieceId(self.id),
            self.allegiance,
            self.piece_type,
            self.position,
            self.name,
        )
    }
}

pub fn standard_pieces() -> Vec<Piece> {
    STANDARD_LAYOUT.iter().map(SpawnDef::to_piece).collect()
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn armies_are_complete() {
        for allegiance in [White, Black] {
            let army: Vec<_> = STANDARD_LAYOUT
                .iter()
                .filter(|def| def.allegiance == allegiance)
                .collect();
            assert_eq!(army.len(), 16);
            let count = |piece_type| army.iter().filter(|def| def.piece_type == piece_type).count();
            assert_eq!(count(King), 1);
            assert_eq!(count(Queen), 1);
            assert_eq!(count(Rook), 2);
            assert_eq!(count(Bishop), 2);
            assert_eq!(count(Knight), 2);
            assert_eq!(count(Pawn), 8);
        }
    }

    #[test]
    fn ids_are_sequential_by_army() {
        for (index, def) in STANDARD_LAYOUT.iter().enumerate() {
            assert_eq!(def.id, index);
            let expected = if index < 16 { White } else { Black };
            assert_eq!(def.allegiance, expected);
        }
    }

    #[test]
    fn no_two_pieces_share_a_square() {
        let squares: HashSet<_> = STANDARD_LAYOUT.iter().map(|def| def.position).collect();
        assert_eq!(squares.len(), 32);
        for def in STANDARD_LAYOUT.iter().filter(|def| def.piece_type == Pawn) {
            assert_eq!(def.position.1, def.allegiance.pawn_start_rank());
        }
    }
}
