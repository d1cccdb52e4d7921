/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

/// Which sides of a wall tile face open space (drawn as an edge).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WallEdges {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl WallEdges {
    pub fn any(self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Wall(WallEdges),
    PacDot,
    PowerPellet,
    Lair,
    LeftEntrance,  // wraps to the right edge when left
    RightEntrance, // wraps to the left edge when left
    Forbidden,     // ghosts never enter
    ReadyMarker,   // forbidden, and carries the "Ready!" text
}

impl Tile {
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall(_))
    }

    pub fn is_pac_dot(self) -> bool {
        matches!(self, Tile::PacDot)
    }

    pub fn is_power_pellet(self) -> bool {
        matches!(self, Tile::PowerPellet)
    }

    /// Does this tile start the round with something to eat?
    pub fn holds_pellet(self) -> bool {
        self.is_pac_dot() || self.is_power_pellet()
    }

    pub fn is_lair(self) -> bool {
        matches!(self, Tile::Lair)
    }

    pub fn is_left_entrance(self) -> bool {
        matches!(self, Tile::LeftEntrance)
    }

    pub fn is_right_entrance(self) -> bool {
        matches!(self, Tile::RightEntrance)
    }

    pub fn is_forbidden(self) -> bool {
        matches!(self, Tile::Forbidden | Tile::ReadyMarker)
    }

    pub fn is_ready_marker(self) -> bool {
        matches!(self, Tile::ReadyMarker)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_marker_counts_as_forbidden() {
        assert!(Tile::ReadyMarker.is_forbidden());
        assert!(Tile::Forbidden.is_forbidden());
        assert!(!Tile::ReadyMarker.is_wall());
        assert!(!Tile::Lair.is_forbidden());
    }

    #[test]
    fn wall_edges() {
        let wall = Tile::Wall(WallEdges::default());
        assert!(wall.is_wall());
        assert!(!WallEdges::default().any());
        assert!(WallEdges { bottom: true, ..WallEdges::default() }.any());
    }

    #[test]
    fn pellet_tiles() {
        assert!(Tile::PacDot.holds_pellet());
        assert!(Tile::PowerPellet.holds_pellet());
        assert!(!Tile::Empty.holds_pellet());
        assert!(!Tile::LeftEntrance.holds_pellet());
    }
}
