use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;

pub type Point = (usize, usize);

/// A signed offset between two squares, x first.
pub type Step = (isize, isize);

pub const ORTHOGONAL_STEPS: [Step; 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const DIAGONAL_STEPS: [Step; 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
pub const KNIGHT_STEPS: [Step; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Square reached by taking `step` from `pt`, if it is still on the board.
pub fn offset(pt: Point, (dx, dy): Step) -> Option<Point> {
    let x = pt.0.checked_add_signed(dx)?;
    let y = pt.1.checked_add_signed(dy)?;
    on_board(x, y)
}

pub fn on_board(x: usize, y: usize) -> Option<Point> {
    (x < BOARD_SIZE && y < BOARD_SIZE).then_some((x, y))
}

/// Raw input coordinates can be anything, including "nothing was under the
/// cursor" as negative numbers.
pub fn tile_from_input(x: i32, y: i32) -> Option<Point> {
    let x = usize::try_from(x).ok()?;
    let y = usize::try_from(y).ok()?;
    on_board(x, y)
}

/// Every square a piece may move to, indexed `[x][y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalityMask([[bool; BOARD_SIZE]; BOARD_SIZE]);

impl LegalityMask {
    pub fn allow(&mut self, (x, y): Point) {
        self.0[x][y] = true;
    }

    pub fn allows(&self, (x, y): Point) -> bool {
        x < BOARD_SIZE && y < BOARD_SIZE && self.0[x][y]
    }

    pub fn any(&self) -> bool {
        self.0.iter().flatten().any(|allowed| *allowed)
    }

    pub fn count(&self) -> usize {
        self.0.iter().flatten().filter(|allowed| **allowed).count()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|x| (0..BOARD_SIZE).map(move |y| (x, y)))
            .filter(|pt| self.allows(*pt))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(offset((0, 0), (1, 2)), Some((1, 2)));
        assert_eq!(offset((0, 0), (-1, 0)), None);
        assert_eq!(offset((7, 7), (1, 0)), None);
        assert_eq!(offset((7, 7), (-7, -7)), Some((0, 0)));
    }

    #[test]
    fn input_outside_the_board_is_no_selection() {
        assert_eq!(tile_from_input(-1, -1), None);
        assert_eq!(tile_from_input(8, 0), None);
        assert_eq!(tile_from_input(0, 8), None);
        assert_eq!(tile_from_input(3, 5), Some((3, 5)));
    }

    #[test]
    fn mask_reports_allowed_points() {
        let mut mask = LegalityMask::default();
        assert!(!mask.any());
        mask.allow((2, 3));
        mask.allow((7, 0));
        assert!(mask.any());
        assert!(mask.allows((2, 3)));
        assert!(!mask.allows((3, 2)));
        assert!(!mask.allows((9, 9)));
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.points().collect::<Vec<_>>(), vec![(2, 3), (7, 0)]);
    }
}
