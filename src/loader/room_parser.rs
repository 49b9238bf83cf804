// src/loader/room_parser.rs
//! Line classifier and scanner for room geometry files.
use crate::ir_room::{LocalPosition, RoomRecord, TileKind};

const PIECE_MARKER: &str = "Piece :";
const END_MARKER: &str = "end file : ";

/// What a single room-file line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `Piece : <full name>`
    Piece(&'a str),
    /// `<W>x<H>`
    Size {
        /// Tiles.
        width: u32,
        /// Tiles.
        height: u32,
    },
    /// `<x>x<y>`, both optionally negative
    Position {
        /// Tiles.
        x: i32,
        /// Tiles.
        y: i32,
    },
    /// Tile row; carries the untrimmed line
    TileRow(&'a str),
    /// Connection description (contains `(` and `|`)
    Geometry(&'a str),
    /// `end file : <full name>`
    EndMarker,
    /// Blank, comment or anything else
    Unrecognized,
}

/// Scanner state the classifier depends on.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanState<'s> {
    /// Set once the first geometry line is seen.
    pub geometry_started: bool,
    /// Piece name captured so far.
    pub full_name: Option<&'s str>,
}

/// Classify one raw line. Matchers run in priority order; the first hit wins.
pub fn classify_line<'a>(line: &'a str, state: &ScanState<'_>) -> LineKind<'a> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed.strip_prefix(PIECE_MARKER) {
        return LineKind::Piece(rest.trim());
    }
    if let Some((width, height)) = split_dims::<u32>(trimmed, false) {
        return LineKind::Size { width, height };
    }
    if let Some((x, y)) = split_dims::<i32>(trimmed, true) {
        return LineKind::Position { x, y };
    }
    if !state.geometry_started
        && trimmed
            .chars()
            .next()
            .is_some_and(|c| TileKind::CHARS.contains(&c))
    {
        return LineKind::TileRow(line);
    }
    if trimmed.contains('(') && trimmed.contains('|') {
        return LineKind::Geometry(trimmed);
    }
    if state.full_name.is_some() && trimmed.strip_prefix(END_MARKER) == state.full_name {
        return LineKind::EndMarker;
    }
    LineKind::Unrecognized
}

/// `<num>x<num>` where each number is plain digits, optionally with a
/// leading `-` when `signed`. Values that overflow `T` do not match.
fn split_dims<T: std::str::FromStr>(s: &str, signed: bool) -> Option<(T, T)> {
    let (a, b) = s.split_once('x')?;
    if !is_number(a, signed) || !is_number(b, signed) {
        return None;
    }
    Some((a.parse().ok()?, b.parse().ok()?))
}

fn is_number(s: &str, signed: bool) -> bool {
    let digits = if signed {
        s.strip_prefix('-').unwrap_or(s)
    } else {
        s
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse one room file. Never fails: missing or malformed fields keep their
/// defaults and the caller decides whether the record is usable.
pub fn parse_room(text: &str, region_code: &str, room_name: &str) -> RoomRecord {
    let mut room = RoomRecord::new(region_code, room_name);
    let mut state = ScanState::default();

    for line in text.lines() {
        match classify_line(line, &state) {
            LineKind::Piece(name) => {
                state.full_name = Some(name);
                room.full_name = Some(name.to_owned());
            }
            LineKind::Size { width, height } => {
                room.width = width;
                room.height = height;
            }
            LineKind::Position { x, y } => room.position = LocalPosition { x, y },
            LineKind::TileRow(raw) => room.tile_grid.push(raw.to_owned()),
            LineKind::Geometry(conn) => {
                state.geometry_started = true;
                room.geometry_lines.push(conn.to_owned());
            }
            LineKind::EndMarker => break,
            LineKind::Unrecognized => {}
        }
    }

    room
}
