use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::piece::{Allegiance, Piece, PieceId, PieceType};
use crate::error::{ErrorMsg as _, Result};
use crate::{Point, BOARD_SIZE};

/// The authoritative grid. Pieces live in an arena keyed by id and the cells
/// only hold ids, so removing a piece never invalidates anything else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pieces: BTreeMap<PieceId, Piece>,
    cells: [[Option<PieceId>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn place(&mut self, piece: Piece) -> Result<()> {
        let (x, y) = piece.position();
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return format!("Cannot place {} off the board at {:?}", piece.id(), (x, y))
                .fail_critical();
        }
        if let Some(occupant) = self.cells[x][y] {
            return format!(
                "Cannot place {} at {:?}, already occupied by {}",
                piece.id(),
                (x, y),
                occupant
            )
            .fail_critical();
        }
        if self.pieces.contains_key(&piece.id()) {
            return format!("Piece {} is already on the board", piece.id()).fail_critical();
        }
        self.cells[x][y] = Some(piece.id());
        self.pieces.insert(piece.id(), piece);
        Ok(())
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    pub fn piece_id_at(&self, (x, y): Point) -> Option<PieceId> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            self.cells[x][y]
        } else {
            None
        }
    }

    pub fn piece_at(&self, pt: Point) -> Option<&Piece> {
        self.piece_id_at(pt).and_then(|id| self.pieces.get(&id))
    }

    pub fn square_is_empty(&self, pt: Point) -> bool {
        self.piece_id_at(pt).is_none()
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub(crate) fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.values_mut()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn king(&self, allegiance: Allegiance) -> Option<&Piece> {
        self.pieces
            .values()
            .find(|piece| piece.piece_type() == PieceType::King && piece.allegiance() == allegiance)
    }

    /// Takes the piece off the board. The returned piece is the only thing
    /// left of it.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let piece = self.pieces.remove(&id)?;
        let (x, y) = piece.position();
        if self.cells[x][y] == Some(id) {
            self.cells[x][y] = None;
        }
        Some(piece)
    }

    /// Moves a piece to an empty square.
    pub fn move_piece(&mut self, id: PieceId, (x, y): Point) -> Result<()> {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return format!("Cannot move {} off the board to {:?}", id, (x, y)).fail_critical();
        }
        if let Some(occupant) = self.cells[x][y] {
            if occupant != id {
                return format!(
                    "Cannot move {} to {:?}, occupied by {}",
                    id,
                    (x, y),
                    occupant
                )
                .fail_critical();
            }
        }
        let piece = self
            .pieces
            .get_mut(&id)
            .ok_or_else(|| format!("No piece {} to move", id).fail_critical_msg())?;
        let (old_x, old_y) = piece.position();
        self.cells[old_x][old_y] = None;
        piece.set_position((x, y));
        self.cells[x][y] = Some(id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pieces.clear();
        self.cells = Default::default();
    }

    /// Every live piece sits on the cell matching its position, and no cell
    /// points at a piece that lives elsewhere.
    pub fn check_occupancy(&self) -> Result<()> {
        for piece in self.pieces.values() {
            if self.piece_id_at(piece.position()) != Some(piece.id()) {
                return format!(
                    "Piece {} believes it is at {:?} but the board disagrees",
                    piece.id(),
                    piece.position()
                )
                .fail_critical();
            }
        }
        let occupied = self.cells.iter().flatten().filter(|cell| cell.is_some()).count();
        if occupied != self.pieces.len() {
            return format!(
                "{} occupied cells for {} live pieces",
                occupied,
                self.pieces.len()
            )
            .fail_critical();
        }
        Ok(())
    }

    pub fn check_kings(&self) -> Result<()> {
        for allegiance in [Allegiance::White, Allegiance::Black] {
            let kings = self
                .pieces
                .values()
                .filter(|piece| {
                    piece.piece_type() == PieceType::King && piece.allegiance() == allegiance
                })
                .count();
            if kings != 1 {
                return format!("{} has {} kings on the board", allegiance, kings).fail_critical();
            }
        }
        Ok(())
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.check_occupancy()?;
        self.check_kings()
    }
}
