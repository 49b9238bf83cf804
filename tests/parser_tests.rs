// tests/parser_tests.rs

use room_map_viewer::{parse_room, LocalPosition};

const ROOM_FILE: &str = "\
Piece : CC_A07

24x12
-749x-582

  ########
#......#
|..H...|   +
=====
(1,2)|(3,4) door
#### this is after geometry
end file : CC_A07
##########
";

#[test]
fn parses_full_room_file() {
    let room = parse_room(ROOM_FILE, "CC", "CC_A07");
    assert_eq!(room.name, "CC_A07");
    assert_eq!(room.region_code, "CC");
    assert_eq!(room.full_name.as_deref(), Some("CC_A07"));
    assert_eq!((room.width, room.height), (24, 12));
    assert_eq!(room.position, LocalPosition { x: -749, y: -582 });
    assert_eq!(
        room.tile_grid,
        vec!["  ########", "#......#", "|..H...|   +", "====="]
    );
    assert_eq!(room.geometry_lines, vec!["(1,2)|(3,4) door"]);
    assert!(room.is_renderable());
}

#[test]
fn size_and_position_values_are_exact() {
    for (w, h) in [(1u32, 1u32), (7, 300), (4096, 2)] {
        let room = parse_room(&format!("{w}x{h}\n"), "CC", "r");
        assert_eq!((room.width, room.height), (w, h));
    }
    for (x, y) in [(0, 0), (-1, 5), (12, -7), (-900, -900)] {
        let room = parse_room(&format!("1x1\n{x}x{y}\n"), "CC", "r");
        let expected = if x >= 0 && y >= 0 {
            // An unsigned pair is read as a size line.
            LocalPosition::default()
        } else {
            LocalPosition { x, y }
        };
        assert_eq!(room.position, expected);
    }
}

#[test]
fn missing_size_line_makes_room_unrenderable() {
    let room = parse_room("Piece : CC_X\n-1x-1\n####\n", "CC", "CC_X");
    assert_eq!((room.width, room.height), (0, 0));
    assert!(!room.is_renderable());
    assert_eq!(room.position, LocalPosition { x: -1, y: -1 });
}

#[test]
fn malformed_size_line_keeps_defaults() {
    let room = parse_room("12 x 4\n12x4x\nax4\n", "CC", "r");
    assert_eq!((room.width, room.height), (0, 0));
    assert_eq!(room.position, LocalPosition::default());
}

#[test]
fn geometry_line_stops_tile_collection() {
    let text = "3x3\n###\n(0,0)|(1,1)\n#.#\n.|.\n###\n";
    let room = parse_room(text, "CC", "r");
    assert_eq!(room.tile_grid, vec!["###"]);
    assert_eq!(room.geometry_lines, vec!["(0,0)|(1,1)"]);
}

#[test]
fn tile_rows_are_kept_verbatim_and_ragged() {
    let text = "2x2\n\t#.\n   .\n#......#   \n";
    let room = parse_room(text, "CC", "r");
    assert_eq!(room.tile_grid, vec!["\t#.", "   .", "#......#   "]);
}

#[test]
fn without_piece_line_scan_runs_to_end() {
    let text = "end file : \n3x3\n###\n";
    let room = parse_room(text, "CC", "r");
    assert!(room.full_name.is_none());
    assert_eq!((room.width, room.height), (3, 3));
    assert_eq!(room.tile_grid, vec!["###"]);
}

#[test]
fn empty_input_gives_default_record() {
    let room = parse_room("", "SU", "empty");
    assert_eq!(room.name, "empty");
    assert_eq!(room.region_code, "SU");
    assert!(room.tile_grid.is_empty());
    assert!(room.geometry_lines.is_empty());
    assert!(!room.is_renderable());
}
