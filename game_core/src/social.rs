//! Friendships between comrades, and how a death changes the survivors.

use rand::Rng;

use crate::model::{Board, Piece, PieceId};

/// Each piece rolls once for every other piece of its own army. The rolls are
/// independent, so A may count B as a friend while B does not return the
/// favour.
pub fn roll_friendships<R: Rng + ?Sized>(pieces: &mut [Piece], probability: f64, rng: &mut R) {
    let armies: Vec<_> = pieces
        .iter()
        .map(|piece| (piece.id(), piece.allegiance()))
        .collect();
    for piece in pieces.iter_mut() {
        for (other_id, other_allegiance) in armies.iter() {
            if *other_id != piece.id()
                && *other_allegiance == piece.allegiance()
                && rng.random_bool(probability)
            {
                piece.befriend(*other_id);
            }
        }
    }
}

pub fn grief_modifier(mourner_name: &str, dead_name: &str) -> String {
    format!(
        "The {} was enraged by the death of their friend, the {}. ",
        mourner_name, dead_name
    )
}

/// Overwrites the modifier of every living piece that counted the dead piece
/// as a friend. Returns the ids of the pieces that changed.
pub fn apply_death_reaction(board: &mut Board, dead_id: PieceId, dead_name: &str) -> Vec<PieceId> {
    let mut mourners = Vec::new();
    for piece in board.pieces_mut() {
        if piece.id() != dead_id && piece.is_friend_of(dead_id) {
            let modifier = grief_modifier(piece.name(), dead_name);
            piece.set_modifier(modifier);
            mourners.push(piece.id());
        }
    }
    if !mourners.is_empty() {
        log::debug!("{} mourns {} ({})", mourners.len(), dead_name, dead_id);
    }
    mourners
}

#[cfg(test)]
mod test {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_log::test;

    use super::*;
    use crate::model::{layout, Allegiance, PieceType};

    #[test]
    fn friends_only_within_an_army() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pieces = layout::standard_pieces();
        roll_friendships(&mut pieces, 1.0, &mut rng);
        for piece in pieces.iter() {
            assert_eq!(piece.friends().len(), 15);
            assert!(!piece.is_friend_of(piece.id()));
            let offset = if piece.allegiance() == Allegiance::White { 0 } else { 16 };
            for friend in piece.friends() {
                assert!((offset..offset + 16).contains(&friend.0));
            }
        }
    }

    #[test]
    fn zero_probability_makes_no_friends() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pieces = layout::standard_pieces();
        roll_friendships(&mut pieces, 0.0, &mut rng);
        assert!(pieces.iter().all(|piece| piece.friends().is_empty()));
    }

    #[test]
    fn friendship_rate_converges() {
        let mut rng = StdRng::seed_from_u64(70);
        let spawns = 10_000;
        let mut friendships = 0usize;
        let mut pairs = 0usize;
        for _ in 0..spawns {
            let mut pieces = layout::standard_pieces();
            roll_friendships(&mut pieces, 0.70, &mut rng);
            friendships += pieces.iter().map(|piece| piece.friends().len()).sum::<usize>();
            pairs += pieces.len() * 15;
        }
        let rate = friendships as f64 / pairs as f64;
        assert!((rate - 0.70).abs() <= 0.02, "rate was {}", rate);
    }

    #[test]
    fn friendships_need_not_be_mutual() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pieces = layout::standard_pieces();
        roll_friendships(&mut pieces, 0.5, &mut rng);
        let one_sided = pieces.iter().any(|piece| {
            piece.friends().iter().any(|friend| {
                !pieces
                    .iter()
                    .find(|other| other.id() == *friend)
                    .map(|other| other.is_friend_of(piece.id()))
                    .unwrap_or(false)
            })
        });
        assert!(one_sided);
    }

    #[test]
    fn death_overwrites_only_friends_modifiers() {
        let mut board = Board::new();
        let mut archer = Piece::new(PieceId(2), Allegiance::White, PieceType::Rook, (0, 0), "Archer");
        archer.befriend(PieceId(8));
        archer.set_modifier("Old grudge. ".to_string());
        let mut bishop =
            Piece::new(PieceId(4), Allegiance::White, PieceType::Bishop, (2, 0), "Bishop");
        bishop.set_modifier("Calm. ".to_string());
        board.place(archer).unwrap();
        board.place(bishop).unwrap();

        let mourners = apply_death_reaction(&mut board, PieceId(8), "English foot soldier");

        assert_eq!(mourners, vec![PieceId(2)]);
        assert_eq!(
            board.piece(PieceId(2)).unwrap().modifier(),
            "The Archer was enraged by the death of their friend, the English foot soldier. "
        );
        assert_eq!(board.piece(PieceId(4)).unwrap().modifier(), "Calm. ");
    }
}
