/// Board: the tile array built from a layout table, plus pellet presence.
///
/// Two layers:
///   - `tiles`   : tile types as built. **Never mutated** after build.
///   - `pellets` : whether the pellet on a tile is still there.
///
/// `reset()` refills `pellets` from `tiles`, which is the whole of a
/// board rebuild since tile types cannot change.

use super::entity::Direction;
use super::maze;
use super::tile::{Tile, WallEdges};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pellet {
    Dot,
    Power,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
    pellets: Vec<bool>,
    width: usize,
    height: usize,
}

impl Board {
    /// Build the board for the built-in maze.
    pub fn build() -> Self {
        Board::from_rows(&maze::LAYOUT)
    }

    /// Build from layout rows (see `maze` for the legend).
    /// Width is taken from the first row; short rows are padded with empty.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut tiles = vec![Tile::Empty; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().take(width).enumerate() {
                tiles[y * width + x] = maze::tile_for(ch);
            }
        }

        let mut board = Board {
            pellets: tiles.iter().map(|t| t.holds_pellet()).collect(),
            tiles,
            width,
            height,
        };
        board.tag_wall_edges();
        board
    }

    /// An edge is drawn on each side of a wall that faces an open tile.
    fn tag_wall_edges(&mut self) {
        for i in 0..self.tiles.len() {
            if !self.tiles[i].is_wall() {
                continue;
            }
            let open = |dir| {
                self.neighbour(i, dir)
                    .map_or(false, |n| !self.tiles[n].is_wall())
            };
            let edges = WallEdges {
                left: open(Direction::Left),
                top: open(Direction::Up),
                right: open(Direction::Right),
                bottom: open(Direction::Down),
            };
            self.tiles[i] = Tile::Wall(edges);
        }
    }

    // ── Geometry ──

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    pub fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    /// One step in `dir`, or None if that leaves the grid.
    /// Never wraps between rows; wraparound is the shortcut rule's job.
    pub fn neighbour(&self, index: usize, dir: Direction) -> Option<usize> {
        if index >= self.tiles.len() {
            return None;
        }
        let (x, y) = self.coords(index);
        let (dx, dy) = dir.delta();
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if nx < 0 || ny < 0 {
            return None;
        }
        self.index(nx as usize, ny as usize)
    }

    // ── Tile predicates ──

    #[inline]
    pub fn tile(&self, index: usize) -> Option<Tile> {
        self.tiles.get(index).copied()
    }

    pub fn is_wall(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_wall)
    }

    /// Pac-dot tile whose dot has not been eaten yet.
    pub fn is_pac_dot(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_pac_dot) && self.pellets[index]
    }

    /// Power-pellet tile whose pellet has not been eaten yet.
    pub fn is_power_pellet(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_power_pellet) && self.pellets[index]
    }

    pub fn is_lair(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_lair)
    }

    pub fn is_left_entrance(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_left_entrance)
    }

    pub fn is_right_entrance(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_right_entrance)
    }

    pub fn is_forbidden(&self, index: usize) -> bool {
        self.tile(index).map_or(false, Tile::is_forbidden)
    }

    pub fn ready_marker(&self) -> Option<usize> {
        self.tiles.iter().position(|t| t.is_ready_marker())
    }

    // ── Pellets ──

    /// Remove whatever pellet sits on `index` and report it.
    pub fn eat_pellet(&mut self, index: usize) -> Option<Pellet> {
        let pellet = if self.is_pac_dot(index) {
            Pellet::Dot
        } else if self.is_power_pellet(index) {
            Pellet::Power
        } else {
            return None;
        };
        self.pellets[index] = false;
        Some(pellet)
    }

    pub fn pellets_remaining(&self) -> usize {
        self.pellets.iter().filter(|&&p| p).count()
    }

    /// Restore every pellet eaten since the board was built.
    pub fn reset(&mut self) {
        for (present, tile) in self.pellets.iter_mut().zip(&self.tiles) {
            *present = tile.holds_pellet();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_board_dimensions() {
        let b = Board::build();
        assert_eq!(b.width(), maze::WIDTH);
        assert_eq!(b.height(), maze::LAYOUT.len());
        assert_eq!(b.len(), maze::WIDTH * maze::LAYOUT.len());
    }

    #[test]
    fn wall_edges_face_open_tiles() {
        let b = Board::from_rows(&[
            "###",
            "#.#",
            "###",
        ]);
        match b.tile(1) {
            Some(Tile::Wall(e)) => {
                assert!(e.bottom);
                assert!(!e.top && !e.left && !e.right);
            }
            other => panic!("expected wall, got {other:?}"),
        }
        // Corner touches no open tile.
        match b.tile(0) {
            Some(Tile::Wall(e)) => assert!(!e.any()),
            other => panic!("expected wall, got {other:?}"),
        }
    }

    #[test]
    fn eat_pellet_clears_flag_once() {
        let mut b = Board::from_rows(&[".o "]);
        assert_eq!(b.pellets_remaining(), 2);
        assert_eq!(b.eat_pellet(0), Some(Pellet::Dot));
        assert!(!b.is_pac_dot(0));
        assert_eq!(b.eat_pellet(0), None);
        assert_eq!(b.eat_pellet(1), Some(Pellet::Power));
        assert!(!b.is_power_pellet(1));
        assert_eq!(b.eat_pellet(2), None);
        assert_eq!(b.pellets_remaining(), 0);
    }

    #[test]
    fn reset_restores_pellets() {
        let mut b = Board::build();
        let fresh = b.clone();
        let total = b.pellets_remaining();
        for i in 0..b.len() {
            b.eat_pellet(i);
        }
        assert_eq!(b.pellets_remaining(), 0);
        b.reset();
        assert_eq!(b.pellets_remaining(), total);
        assert_eq!(b, fresh);
    }

    #[test]
    fn neighbour_never_wraps_rows() {
        let b = Board::from_rows(&[
            "...",
            "...",
        ]);
        assert_eq!(b.neighbour(2, Direction::Right), None);
        assert_eq!(b.neighbour(3, Direction::Left), None);
        assert_eq!(b.neighbour(0, Direction::Up), None);
        assert_eq!(b.neighbour(4, Direction::Down), None);
        assert_eq!(b.neighbour(4, Direction::Up), Some(1));
    }

    #[test]
    fn out_of_range_predicates_are_false() {
        let b = Board::from_rows(&["#"]);
        assert!(!b.is_wall(5));
        assert!(!b.is_forbidden(5));
        assert_eq!(b.tile(5), None);
    }

    #[test]
    fn builtin_ready_marker_is_forbidden() {
        let b = Board::build();
        let r = b.ready_marker().unwrap();
        assert!(b.is_forbidden(r));
    }
}
