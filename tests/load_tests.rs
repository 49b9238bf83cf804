// tests/load_tests.rs

use futures::executor::block_on;
use macroquad::prelude::vec2;
use room_map_viewer::loader::bulk::{decode_bulk, encode_bulk};
use room_map_viewer::{FsSource, MapError, MapLoader, MapSource, RoomKey};
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir() -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("room_map_viewer_{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

fn write(root: &PathBuf, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("failed to create dir");
    }
    fs::write(path, text).expect("failed to write file");
}

/// CC has three good rooms, one empty room and one missing file; SU has a
/// room but no offset.
fn sample_world() -> PathBuf {
    let root = temp_dir();
    write(&root, "region_pos.txt", "CC:-570x897\nbad\n");
    write(&root, "regions.txt", "CC-rooms\nSU-rooms\n");
    write(
        &root,
        "CC-rooms/cf-CC-rooms.txt",
        "cf-CC-rooms.txt\nCC_A01\nCC_A02.txt\nCC_A03\nCC_EMPTY\nCC_GONE\n",
    );
    write(
        &root,
        "CC-rooms/CC_A01.txt",
        "Piece : CC_A01\n4x3\n-749x-582\n####\n#..#\n####\n(0,1)|(3,1)\nend file : CC_A01\n",
    );
    write(&root, "CC-rooms/CC_A02.txt", "Piece : CC_A02\n2x2\n-745x-582\n##\n##\n");
    write(&root, "CC-rooms/CC_A03.txt", "Piece : CC_A03\n2x2\n-743x-582\n..\n..\n");
    write(&root, "CC-rooms/CC_EMPTY.txt", "Piece : CC_EMPTY\nno size here\n");
    write(&root, "SU-rooms/cf-SU-rooms.txt", "SU_A01\n");
    write(&root, "SU-rooms/SU_A01.txt", "3x3\n0x-1\n");
    root
}

struct Counting {
    inner: FsSource,
    fetched: RefCell<Vec<String>>,
    yields: Cell<usize>,
}

impl Counting {
    fn new(root: &PathBuf) -> Self {
        Counting {
            inner: FsSource::new(root),
            fetched: RefCell::new(Vec::new()),
            yields: Cell::new(0),
        }
    }
}

impl MapSource for Counting {
    async fn fetch_text(&self, path: &str) -> Result<String, MapError> {
        self.fetched.borrow_mut().push(path.to_owned());
        self.inner.fetch_text(path).await
    }

    async fn yield_now(&self) {
        self.yields.set(self.yields.get() + 1);
    }
}

#[test]
fn loads_whole_world_and_degrades_on_bad_rooms() {
    let root = sample_world();
    let loader = MapLoader::new(FsSource::new(&root), 2);
    let data = block_on(loader.load_world());

    assert_eq!(data.region_positions().len(), 1);
    assert_eq!(data.room_count(), 4);
    assert_eq!(data.index().len(), 3);

    let a01 = data.room(&RoomKey::new("CC", "CC_A01")).expect("CC_A01 cached");
    assert_eq!(a01.geometry_lines, vec!["(0,1)|(3,1)"]);
    assert!(data.room(&RoomKey::new("CC", "CC_EMPTY")).is_none());
    assert!(data.room(&RoomKey::new("CC", "CC_GONE")).is_none());
    assert!(data.room(&RoomKey::new("SU", "SU_A01")).is_some());
    assert!(!data.index().contains_key(&RoomKey::new("SU", "SU_A01")));

    let hit = data.room_at(vec2(-26380.0 + 1.0, 6300.0 + 1.0)).expect("hit");
    assert_eq!(hit.key, RoomKey::new("CC", "CC_A01"));

    let cc = &data.region_rooms()[0];
    assert_eq!(cc.code, "CC");
    assert_eq!(cc.rooms, vec!["CC_A01", "CC_A02", "CC_A03", "CC_EMPTY", "CC_GONE"]);

    fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_index_files_give_empty_world() {
    let root = temp_dir();
    let loader = MapLoader::new(FsSource::new(&root), 8);
    let data = block_on(loader.load_world());
    assert_eq!(data.room_count(), 0);
    assert!(data.index().is_empty());
    fs::remove_dir_all(&root).ok();
}

#[test]
fn yields_between_batches_only() {
    let root = sample_world();
    let loader = MapLoader::new(Counting::new(&root), 2);
    let mut data = room_map_viewer::MapData::new();
    block_on(loader.load_region_positions(&mut data));
    let placed = block_on(loader.load_region(&mut data, "CC-rooms"));

    assert_eq!(placed, 3);
    // Five rooms in batches of two: three batches, two yields.
    assert_eq!(loader.source().yields.get(), 2);
    fs::remove_dir_all(&root).ok();
}

#[test]
fn ensure_room_fetches_once_then_uses_cache() {
    let root = sample_world();
    let loader = MapLoader::new(Counting::new(&root), 4);
    let mut data = room_map_viewer::MapData::new();
    block_on(loader.load_region_positions(&mut data));

    let room = block_on(loader.ensure_room(&mut data, "CC", "CC_A02")).expect("room");
    assert_eq!((room.width, room.height), (2, 2));
    assert!(data.index().contains_key(&RoomKey::new("CC", "CC_A02")));

    let before = loader.source().fetched.borrow().len();
    assert!(block_on(loader.ensure_room(&mut data, "CC", "CC_A02")).is_some());
    assert_eq!(loader.source().fetched.borrow().len(), before);

    assert!(block_on(loader.ensure_room(&mut data, "CC", "CC_GONE")).is_none());
    fs::remove_dir_all(&root).ok();
}

#[test]
fn bulk_file_reproduces_placements() {
    let root = sample_world();
    let loader = MapLoader::new(FsSource::new(&root), 3);
    let data = block_on(loader.load_world());

    let json = encode_bulk(&data).expect("encode");
    write(&root, "map-data.json", &json);
    let restored = block_on(loader.load_bulk("map-data.json")).expect("bulk load");

    let placed: Vec<_> = data.index().iter().cloned().collect();
    let again: Vec<_> = restored.index().iter().cloned().collect();
    assert_eq!(placed, again);
    assert_eq!(restored.room_count(), data.room_count());

    let direct = decode_bulk(&json).expect("decode");
    assert_eq!(direct.index().len(), 3);
    fs::remove_dir_all(&root).ok();
}

#[test]
fn missing_bulk_file_is_not_found() {
    let root = temp_dir();
    let loader = MapLoader::new(FsSource::new(&root), 3);
    let err = block_on(loader.load_bulk("map-data.json"))
        .err()
        .expect("expected error");
    assert!(err.is_not_found());
    fs::remove_dir_all(&root).ok();
}
