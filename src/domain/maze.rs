/// The fixed maze layout and everything placed on it at round start.
///
/// ## Tile legend:
///   '#' = Wall                   '.' = Pac-dot
///   'o' = Power pellet           'L' = Ghost lair
///   '<' = Left shortcut          '>' = Right shortcut
///   'x' = Forbidden (no ghosts)  'R' = Ready marker (forbidden)
///   ' ' = Empty
///
/// Wall edges are not part of the table; the board derives them from
/// which neighbours are open.

use super::entity::GhostColour;
use super::tile::{Tile, WallEdges};

pub const WIDTH: usize = 28;

pub const PLAYER_START: usize = 489;

/// One row of the ghost roster: who, where, and how often it steps.
#[derive(Clone, Copy, Debug)]
pub struct GhostSpec {
    pub colour: GhostColour,
    pub start: usize,
    pub period_ms: u64,
}

pub const GHOSTS: [GhostSpec; 4] = [
    GhostSpec { colour: GhostColour::Red, start: 294, period_ms: 500 },
    GhostSpec { colour: GhostColour::Pink, start: 348, period_ms: 600 },
    GhostSpec { colour: GhostColour::Blue, start: 351, period_ms: 700 },
    GhostSpec { colour: GhostColour::Orange, start: 349, period_ms: 800 },
];

pub const LAYOUT: [&str; 23] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###LL### ##.######",
    "<     .   #LLLLLL#   .     >",
    "######.## ######## ##.######",
    "######.## xxxRxxxx ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

/// Map one layout character to its tile type.
/// Walls come back edgeless; `Board::build` fills the edges in.
pub fn tile_for(ch: char) -> Tile {
    match ch {
        '#' => Tile::Wall(WallEdges::default()),
        '.' => Tile::PacDot,
        'o' => Tile::PowerPellet,
        'L' => Tile::Lair,
        '<' => Tile::LeftEntrance,
        '>' => Tile::RightEntrance,
        'x' => Tile::Forbidden,
        'R' => Tile::ReadyMarker,
        _ => Tile::Empty,
    }
}
