//! Which squares a piece may move to.
//!
//! Every piece type maps onto one [`Movement`] rule. Sliding pieces scan each
//! ray until the first occupied square; an enemy there can be taken, a friend
//! cannot, and either way the scan stops.

use crate::common::{offset, DIAGONAL_STEPS, KNIGHT_STEPS, ORTHOGONAL_STEPS};
use crate::model::{Board, Piece, PieceType};
use crate::{LegalityMask, Point, Step};

const ROYAL_STEPS: [Step; 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Single jumps, each landing square checked on its own.
    Steps(&'static [Step]),
    /// Repeated steps in each direction until blocked.
    Rays(&'static [Step]),
    Pawn,
}

impl PieceType {
    pub fn movement(self) -> Movement {
        match self {
            PieceType::King => Movement::Steps(&ROYAL_STEPS),
            PieceType::Queen => Movement::Rays(&ROYAL_STEPS),
            PieceType::Rook => Movement::Rays(&ORTHOGONAL_STEPS),
            PieceType::Bishop => Movement::Rays(&DIAGONAL_STEPS),
            PieceType::Knight => Movement::Steps(&KNIGHT_STEPS),
            PieceType::Pawn => Movement::Pawn,
        }
    }
}

/// Legal destinations for `piece` on `board`. `en_passant` is the square a
/// pawn skipped over on the previous move, if any.
pub fn possible_moves(piece: &Piece, board: &Board, en_passant: Option<Point>) -> LegalityMask {
    let mut mask = LegalityMask::default();
    match piece.piece_type().movement() {
        Movement::Steps(steps) => {
            for step in steps {
                if let Some(pt) = offset(piece.position(), *step) {
                    mark(piece, board, pt, &mut mask);
                }
            }
        },
        Movement::Rays(steps) => {
            for step in steps {
                let mut current = piece.position();
                while let Some(pt) = offset(current, *step) {
                    if mark(piece, board, pt, &mut mask) {
                        break;
                    }
                    current = pt;
                }
            }
        },
        Movement::Pawn => pawn_moves(piece, board, en_passant, &mut mask),
    }
    mask
}

/// Allows `pt` if it is free or holds an enemy. Returns whether the square was
/// occupied, which ends a ray.
fn mark(piece: &Piece, board: &Board, pt: Point, mask: &mut LegalityMask) -> bool {
    match board.piece_at(pt) {
        None => {
            mask.allow(pt);
            false
        },
        Some(other) => {
            if other.is_enemy_of(piece) {
                mask.allow(pt);
            }
            true
        },
    }
}

fn pawn_moves(piece: &Piece, board: &Board, en_passant: Option<Point>, mask: &mut LegalityMask) {
    let forward = piece.allegiance().forward();
    let position = piece.position();

    for dx in [-1, 1] {
        if let Some(pt) = offset(position, (dx, forward)) {
            match board.piece_at(pt) {
                Some(other) if other.is_enemy_of(piece) => mask.allow(pt),
                None if en_passant == Some(pt) => mask.allow(pt),
                _ => {},
            }
        }
    }

    if let Some(one_ahead) = offset(position, (0, forward)) {
        if board.square_is_empty(one_ahead) {
            mask.allow(one_ahead);
            if position.1 == piece.allegiance().pawn_start_rank() {
                if let Some(two_ahead) = offset(position, (0, 2 * forward)) {
                    if board.square_is_empty(two_ahead) {
                        mask.allow(two_ahead);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{layout, Allegiance, PieceId};
    use crate::BOARD_SIZE;

    fn board_with(pieces: Vec<Piece>) -> Board {
        let mut board = Board::new();
        for piece in pieces {
            board.place(piece).unwrap();
        }
        board
    }

    fn piece(id: usize, allegiance: Allegiance, piece_type: PieceType, pt: Point) -> Piece {
        Piece::new(PieceId(id), allegiance, piece_type, pt, format!("{:?}", piece_type))
    }

    fn standard_board() -> Board {
        board_with(layout::standard_pieces())
    }

    #[test]
    fn opening_position_has_twenty_moves_per_side() {
        let board = standard_board();
        for allegiance in [Allegiance::White, Allegiance::Black] {
            let total: usize = board
                .pieces()
                .filter(|piece| piece.allegiance() == allegiance)
                .map(|piece| possible_moves(piece, &board, None).count())
                .sum();
            assert_eq!(total, 20, "{:?}", allegiance);
        }
    }

    #[test]
    fn never_off_board_or_onto_a_friend() {
        let board = standard_board();
        for piece in board.pieces() {
            let mask = possible_moves(piece, &board, None);
            for pt in mask.points() {
                assert!(pt.0 < BOARD_SIZE && pt.1 < BOARD_SIZE);
                if let Some(occupant) = board.piece_at(pt) {
                    assert!(occupant.is_enemy_of(piece));
                }
            }
        }
        // And in an open, crowded middle game
        let board = board_with(vec![
            piece(0, Allegiance::White, PieceType::Queen, (3, 3)),
            piece(1, Allegiance::White, PieceType::Knight, (3, 5)),
            piece(2, Allegiance::White, PieceType::King, (0, 0)),
            piece(16, Allegiance::Black, PieceType::Rook, (6, 3)),
            piece(17, Allegiance::Black, PieceType::Bishop, (1, 1)),
            piece(18, Allegiance::Black, PieceType::King, (7, 7)),
        ]);
        for piece in board.pieces() {
            for pt in possible_moves(piece, &board, None).points() {
                if let Some(occupant) = board.piece_at(pt) {
                    assert!(occupant.is_enemy_of(piece));
                }
            }
        }
    }

    #[test]
    fn rays_stop_at_first_piece() {
        let board = board_with(vec![
            piece(0, Allegiance::White, PieceType::Rook, (0, 0)),
            piece(1, Allegiance::White, PieceType::Pawn, (0, 3)),
            piece(16, Allegiance::Black, PieceType::Pawn, (4, 0)),
        ]);
        let rook = board.piece(PieceId(0)).unwrap();
        let mask = possible_moves(rook, &board, None);
        assert!(mask.allows((0, 1)));
        assert!(mask.allows((0, 2)));
        assert!(!mask.allows((0, 3)));
        assert!(!mask.allows((0, 4)));
        assert!(mask.allows((3, 0)));
        assert!(mask.allows((4, 0)));
        assert!(!mask.allows((5, 0)));
        assert_eq!(mask.count(), 6);
    }

    #[test]
    fn queen_covers_rook_and_bishop_lines() {
        let board = board_with(vec![piece(0, Allegiance::White, PieceType::Queen, (3, 3))]);
        let queen = board.piece(PieceId(0)).unwrap();
        assert_eq!(possible_moves(queen, &board, None).count(), 27);
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = standard_board();
        let knight = board.piece(PieceId(6)).unwrap();
        let mask = possible_moves(knight, &board, None);
        assert_eq!(mask.points().collect::<Vec<_>>(), vec![(0, 2), (2, 2)]);
    }

    #[test]
    fn king_steps_one_square() {
        let board = board_with(vec![
            piece(0, Allegiance::White, PieceType::King, (0, 0)),
            piece(1, Allegiance::White, PieceType::Pawn, (1, 1)),
            piece(16, Allegiance::Black, PieceType::Pawn, (0, 1)),
        ]);
        let king = board.piece(PieceId(0)).unwrap();
        let mask = possible_moves(king, &board, None);
        assert_eq!(mask.points().collect::<Vec<_>>(), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn pawn_double_step_only_from_start_rank() {
        let board = board_with(vec![
            piece(8, Allegiance::White, PieceType::Pawn, (4, 1)),
            piece(9, Allegiance::White, PieceType::Pawn, (5, 2)),
            piece(24, Allegiance::Black, PieceType::Pawn, (2, 6)),
        ]);
        let start = possible_moves(board.piece(PieceId(8)).unwrap(), &board, None);
        assert_eq!(start.points().collect::<Vec<_>>(), vec![(4, 2), (4, 3)]);
        let moved = possible_moves(board.piece(PieceId(9)).unwrap(), &board, None);
        assert_eq!(moved.points().collect::<Vec<_>>(), vec![(5, 3)]);
        let black = possible_moves(board.piece(PieceId(24)).unwrap(), &board, None);
        assert_eq!(black.points().collect::<Vec<_>>(), vec![(2, 4), (2, 5)]);
    }

    #[test]
    fn blocked_pawn_cannot_advance_or_jump() {
        let board = board_with(vec![
            piece(8, Allegiance::White, PieceType::Pawn, (4, 1)),
            piece(24, Allegiance::Black, PieceType::Pawn, (4, 2)),
            piece(9, Allegiance::White, PieceType::Pawn, (6, 1)),
            piece(25, Allegiance::Black, PieceType::Pawn, (6, 3)),
        ]);
        assert!(!possible_moves(board.piece(PieceId(8)).unwrap(), &board, None).any());
        let partly = possible_moves(board.piece(PieceId(9)).unwrap(), &board, None);
        assert_eq!(partly.points().collect::<Vec<_>>(), vec![(6, 2)]);
    }

    #[test]
    fn pawn_captures_diagonally_and_en_passant() {
        let board = board_with(vec![
            piece(27, Allegiance::Black, PieceType::Pawn, (3, 3)),
            piece(12, Allegiance::White, PieceType::Pawn, (4, 3)),
            piece(10, Allegiance::White, PieceType::Pawn, (2, 2)),
        ]);
        let black_pawn = board.piece(PieceId(27)).unwrap();
        let without = possible_moves(black_pawn, &board, None);
        assert_eq!(without.points().collect::<Vec<_>>(), vec![(2, 2), (3, 2)]);
        let with = possible_moves(black_pawn, &board, Some((4, 2)));
        assert_eq!(
            with.points().collect::<Vec<_>>(),
            vec![(2, 2), (3, 2), (4, 2)]
        );
    }
}
