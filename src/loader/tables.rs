// src/loader/tables.rs
//! Region offset table, region list and room list formats.
use crate::ir_room::RegionPosition;

/// Name of the region-offset table under the map root.
pub const REGION_POS_FILE: &str = "region_pos.txt";
/// Name of the region list under the map root.
pub const REGIONS_FILE: &str = "regions.txt";

const LIST_PREFIX: &str = "cf-";
const FOLDER_SUFFIX: &str = "-rooms";

/// Parse `CODE:XxY` lines. Lines without a `:` or without two integers are
/// skipped; later duplicates replace earlier ones in place.
pub fn parse_region_positions(text: &str) -> Vec<RegionPosition> {
    let mut out: Vec<RegionPosition> = Vec::new();
    for line in text.lines() {
        let Some((code, coords)) = line.trim().split_once(':') else {
            continue;
        };
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        let nums = signed_ints(coords);
        let [x, y] = nums.as_slice() else {
            continue;
        };
        let pos = RegionPosition {
            code: code.to_owned(),
            x: *x,
            y: *y,
        };
        match out.iter_mut().find(|p| p.code == pos.code) {
            Some(existing) => *existing = pos,
            None => out.push(pos),
        }
    }
    out
}

/// Every `-?\d+` token in `s`, in order. Tokens that overflow are dropped.
fn signed_ints(s: &str) -> Vec<i32> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        if bytes[i] == b'-' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if bytes[i].is_ascii_digit() {
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if let Ok(n) = s[start..i].parse() {
                out.push(n);
            }
        } else {
            i += 1;
        }
    }
    out
}

/// One region folder name per non-blank line.
pub fn parse_region_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Region code of a folder: `CC-rooms` -> `CC`.
pub fn region_code(folder: &str) -> &str {
    folder.strip_suffix(FOLDER_SUFFIX).unwrap_or(folder)
}

/// Room names listed in a region's room list, skipping list-file entries
/// and dropping a `.txt` extension.
pub fn parse_room_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with(LIST_PREFIX))
        .map(|l| l.strip_suffix(".txt").unwrap_or(l).to_owned())
        .collect()
}

/// Path of a region's room list relative to the map root.
pub fn room_list_path(folder: &str) -> String {
    format!("{folder}/{LIST_PREFIX}{}{FOLDER_SUFFIX}.txt", region_code(folder))
}

/// Path of one room file relative to the map root.
pub fn room_file_path(folder: &str, room: &str) -> String {
    format!("{folder}/{room}.txt")
}
