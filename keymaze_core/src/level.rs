use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Position,
    map::{Grid, GridError},
};

/// The level every fresh engine starts from.
///
/// `#` wall, `P` player, `B` block, `K` key, `D` door, `E` enemy, space floor.
pub const BUILTIN_LEVEL: &str = "\
###############
#P   #    K   #
# B  # ####  E#
#    #        #
## ###  B  ####
#K     E      #
#  ####### B  #
#  #    K#    #
#  # B   #  E #
#       ##   D#
###############";

/// Static type of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

/// A key on the floor. Collected keys stay in the list but leave play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub position: Position,
    pub collected: bool,
}

/// The exit. Opens once every key is collected and never closes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub position: Position,
    pub open: bool,
}

/// Horizontal patrol direction of an enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    #[default]
    Right,
}

impl Heading {
    /// Returns the x step taken per patrol move.
    pub fn dx(self) -> isize {
        match self {
            Heading::Left => -1,
            Heading::Right => 1,
        }
    }

    /// Returns the opposite heading.
    pub fn reversed(self) -> Heading {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// A patroller walking back and forth along its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Position,
    pub heading: Heading,
}

/// Problems found while parsing a textual level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelError {
    #[error("Level map is empty")]
    Empty,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown map marker '{marker}' at ({x}, {y})")]
    UnknownMarker { marker: char, x: usize, y: usize },
    #[error("No player start ('P') found in map")]
    MissingPlayer,
    #[error("Multiple player starts ('P') found, second at ({x}, {y})")]
    MultiplePlayers { x: usize, y: usize },
    #[error("No door ('D') found in map")]
    MissingDoor,
    #[error("Multiple doors ('D') found, second at ({x}, {y})")]
    MultipleDoors { x: usize, y: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// The complete mutable state of one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub terrain: Grid<Tile>,
    pub player: Position,
    /// Blocks in declaration order.
    pub blocks: Vec<Position>,
    pub keys: Vec<Key>,
    pub door: Door,
    pub enemies: Vec<Enemy>,
    pub keys_collected: usize,
    pub total_keys: usize,
}

impl GameState {
    /// Returns the width of the level.
    pub fn width(&self) -> usize {
        self.terrain.width()
    }

    /// Returns the height of the level.
    pub fn height(&self) -> usize {
        self.terrain.height()
    }

    /// Checks if `pos` lies inside the level.
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.terrain.contains(pos)
    }

    /// Cells outside the grid are not walls; callers check bounds first.
    pub fn is_wall(&self, pos: Position) -> bool {
        matches!(self.terrain.get(pos), Some(Tile::Wall))
    }

    /// Checks if `pos` is the door cell, open or not.
    pub fn is_door(&self, pos: Position) -> bool {
        self.door.position == pos
    }

    /// Index of the block at `pos`, if any.
    pub fn block_at(&self, pos: Position) -> Option<usize> {
        self.blocks.iter().position(|&block| block == pos)
    }

    /// Index of the first enemy at `pos`, if any.
    pub fn enemy_at(&self, pos: Position) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.position == pos)
    }

    /// Index of the key still lying at `pos`, if any.
    pub fn uncollected_key_at(&self, pos: Position) -> Option<usize> {
        self.keys
            .iter()
            .position(|key| !key.collected && key.position == pos)
    }

    /// Returns how many keys are still to be collected.
    pub fn keys_remaining(&self) -> usize {
        self.total_keys - self.keys_collected
    }
}

/// Parses a textual level into a fresh [`GameState`].
///
/// Rows are separated by newlines; leading and trailing blank lines are
/// ignored, everything else (including spaces) is significant. Enemies
/// start heading right. A level without keys starts with its door open.
pub fn load_level_from_string(map: &str) -> Result<GameState, LevelError> {
    let rows: Vec<Vec<char>> = map
        .trim_matches(|c: char| c == '\n' || c == '\r')
        .lines()
        .map(|line| line.trim_end_matches('\r').chars().collect())
        .collect();
    if rows.is_empty() || rows[0].is_empty() {
        return Err(LevelError::Empty);
    }

    let height = rows.len();
    let width = rows[0].len();
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(LevelError::RaggedRow {
            row,
            expected: width,
            found,
        });
    }

    let mut terrain: Grid<Tile> = Grid::new(width, height);
    let mut player: Option<Position> = None;
    let mut door: Option<Position> = None;
    let mut blocks = Vec::new();
    let mut keys = Vec::new();
    let mut enemies = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, &marker) in row.iter().enumerate() {
            let pos = Position { x, y };
            match marker {
                ' ' => {}
                '#' => terrain.set(pos, Tile::Wall)?,
                'P' => {
                    if player.replace(pos).is_some() {
                        return Err(LevelError::MultiplePlayers { x, y });
                    }
                }
                'D' => {
                    if door.replace(pos).is_some() {
                        return Err(LevelError::MultipleDoors { x, y });
                    }
                }
                'B' => blocks.push(pos),
                'K' => keys.push(Key {
                    position: pos,
                    collected: false,
                }),
                'E' => enemies.push(Enemy {
                    position: pos,
                    heading: Heading::default(),
                }),
                unknown => {
                    return Err(LevelError::UnknownMarker {
                        marker: unknown,
                        x,
                        y,
                    });
                }
            }
        }
    }

    let player = player.ok_or(LevelError::MissingPlayer)?;
    let door = door.ok_or(LevelError::MissingDoor)?;
    let total_keys = keys.len();

    info!(
        width,
        height,
        blocks = blocks.len(),
        keys = total_keys,
        enemies = enemies.len(),
        "level loaded"
    );

    Ok(GameState {
        terrain,
        player,
        blocks,
        keys,
        door: Door {
            position: door,
            open: total_keys == 0,
        },
        enemies,
        keys_collected: 0,
        total_keys,
    })
}
