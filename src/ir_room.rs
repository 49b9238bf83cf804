// src/ir_room.rs
use macroquad::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global tile offset of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPosition {
    /// Short region identifier, e.g. `CC`.
    #[serde(rename = "name")]
    pub code: String,
    /// Offset in tiles (may be negative).
    pub x: i32,
    /// Offset in tiles (may be negative).
    pub y: i32,
}

/// Signed tile offset of a room relative to its region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPosition {
    /// Tiles.
    pub x: i32,
    /// Tiles.
    pub y: i32,
}

/// Cache/index key of a room: owning region plus room file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomKey {
    /// Region code.
    pub region: String,
    /// Room name (file name without extension).
    pub room: String,
}

impl RoomKey {
    /// Build a key from anything string-like.
    pub fn new(region: impl Into<String>, room: impl Into<String>) -> Self {
        RoomKey {
            region: region.into(),
            room: room.into(),
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.room)
    }
}

/// One parsed room file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    /// Identifier derived from the file name.
    pub name: String,
    /// Label from the file's `Piece :` line, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Owning region.
    #[serde(default)]
    pub region_code: String,
    /// Tiles; 0 means "invalid/unparsed".
    pub width: u32,
    /// Tiles; 0 means "invalid/unparsed".
    pub height: u32,
    /// Offset inside the region, in tiles.
    #[serde(default)]
    pub position: LocalPosition,
    /// Raw tile rows, untrimmed and possibly ragged.
    #[serde(default, rename = "tileMap")]
    pub tile_grid: Vec<String>,
    /// Raw connection lines, passed through untouched.
    #[serde(default)]
    pub geometry_lines: Vec<String>,
}

impl RoomRecord {
    /// Empty record for `region_code`/`name`; every other field at its default.
    pub fn new(region_code: &str, name: &str) -> Self {
        RoomRecord {
            name: name.to_owned(),
            region_code: region_code.to_owned(),
            ..Default::default()
        }
    }

    /// Only rooms with a positive size are ever placed or drawn.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Cache key of this room.
    pub fn key(&self) -> RoomKey {
        RoomKey::new(self.region_code.clone(), self.name.clone())
    }

    /// Display label: the part of the piece name after the region prefix
    /// (`CC_A07` -> `A07`), else the whole piece name, else the file name.
    pub fn short_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(full) => match full.split_once('_') {
                Some((_, rest)) => rest.split('_').next().unwrap_or(rest),
                None => full,
            },
            None => &self.name,
        }
    }

    /// Tile at `(col, row)` if that cell exists in the (ragged) grid.
    pub fn tile_at(&self, col: usize, row: usize) -> Option<TileKind> {
        self.tile_grid
            .get(row)
            .and_then(|line| line.chars().nth(col))
            .and_then(TileKind::from_char)
    }
}

/// The recognised tile characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// `.`
    Empty,
    /// `#`
    Wall,
    /// `|`
    VerticalPole,
    /// `-`
    HorizontalPole,
    /// `+`
    PoleCross,
    /// `=`
    Platform,
    /// `H`
    Hazard,
    /// `/`
    Slope,
}

impl TileKind {
    /// Every character that may start a tile row.
    pub const CHARS: [char; 8] = ['.', '#', '|', '+', '-', '=', 'H', '/'];

    /// Map a tile character to its kind.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '.' => TileKind::Empty,
            '#' => TileKind::Wall,
            '|' => TileKind::VerticalPole,
            '-' => TileKind::HorizontalPole,
            '+' => TileKind::PoleCross,
            '=' => TileKind::Platform,
            'H' => TileKind::Hazard,
            '/' => TileKind::Slope,
            _ => return None,
        })
    }

    /// Fill colour used when rasterising a room.
    pub fn color(self) -> Color {
        match self {
            TileKind::Empty => Color::from_rgba(0x1a, 0x1a, 0x1a, 255),
            TileKind::Wall => Color::from_rgba(0x44, 0x44, 0x44, 255),
            TileKind::VerticalPole | TileKind::HorizontalPole | TileKind::Platform => {
                Color::from_rgba(0x66, 0x66, 0x66, 255)
            }
            TileKind::PoleCross => Color::from_rgba(0x88, 0x88, 0x88, 255),
            TileKind::Slope => Color::from_rgba(0x55, 0x55, 0x55, 255),
            TileKind::Hazard => Color::from_rgba(0xff, 0x66, 0x00, 255),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_region_prefix() {
        let mut room = RoomRecord::new("CC", "cc_a07");
        assert_eq!(room.short_name(), "cc_a07");
        room.full_name = Some("CC_A07".into());
        assert_eq!(room.short_name(), "A07");
        room.full_name = Some("Lobby".into());
        assert_eq!(room.short_name(), "Lobby");
    }

    #[test]
    fn tile_at_tolerates_ragged_rows() {
        let mut room = RoomRecord::new("CC", "r");
        room.tile_grid = vec!["#.".into(), "#".into()];
        assert_eq!(room.tile_at(1, 0), Some(TileKind::Empty));
        assert_eq!(room.tile_at(1, 1), None);
        assert_eq!(room.tile_at(0, 5), None);
    }
}
