/// Entities: Player and Ghost.
/// Positions are linear tile indices (`y * width + x`).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];

    /// Grid step as (dx, dy).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GhostColour {
    Red,
    Pink,
    Blue,
    Orange,
}

impl GhostColour {
    pub fn name(self) -> &'static str {
        match self {
            GhostColour::Red => "red",
            GhostColour::Pink => "pink",
            GhostColour::Blue => "blue",
            GhostColour::Orange => "orange",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub position: usize,
    pub facing: Direction,
    pub start: usize,
}

impl Player {
    pub fn new(start: usize) -> Self {
        Player {
            position: start,
            facing: Direction::Right,
            start,
        }
    }

    pub fn reset(&mut self) {
        self.position = self.start;
        self.facing = Direction::Right;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ghost {
    pub colour: GhostColour,
    pub start: usize,
    pub period_ms: u64,
    pub position: usize,
    pub last_position: usize, // never stepped back onto unless boxed in
    pub scared: bool,
}

impl Ghost {
    pub fn new(colour: GhostColour, start: usize, period_ms: u64) -> Self {
        Ghost {
            colour,
            start,
            period_ms,
            position: start,
            last_position: start,
            scared: false,
        }
    }

    /// Back to the starting tile, un-scared. Used when eaten and on game over.
    pub fn reset(&mut self) {
        self.position = self.start;
        self.last_position = self.start;
        self.scared = false;
    }

    /// Commit a step, remembering where we came from.
    pub fn step_to(&mut self, target: usize) {
        self.last_position = self.position;
        self.position = target;
    }
}
