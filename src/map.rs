use crate::error::MapError;
use crate::ir_room::{RegionPosition, RoomKey, RoomRecord};
use crate::loader::bulk::decode_bulk;
use crate::loader::room_parser::parse_room;
use crate::loader::source::MapSource;
use crate::loader::tables::*;
use crate::spatial::{PlacedRoom, Placement, RoomIndex};
use futures::future::join_all;
use log::{debug, info, warn};
use macroquad::prelude::*;
use std::collections::HashMap;

/// Rooms of one region, in room-list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionRooms {
    /// Region code.
    pub code: String,
    /// Folder the region's files live in.
    pub folder: String,
    /// Room names, in list order.
    pub rooms: Vec<String>,
}

/// Everything known about the world: region offsets, the room cache, the
/// per-region room lists, the placed-room index and the selection.
///
/// The room cache only grows; rooms are never evicted during a session.
#[derive(Debug, Default)]
pub struct MapData {
    regions: Vec<RegionPosition>,
    region_lookup: HashMap<String, usize>,
    rooms: HashMap<RoomKey, RoomRecord>,
    region_rooms: Vec<RegionRooms>,
    index: RoomIndex,
    selected: Option<RoomKey>,
}

impl MapData {
    /// Empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the region offset table.
    pub fn set_region_positions(&mut self, positions: Vec<RegionPosition>) {
        self.region_lookup = positions
            .iter()
            .enumerate()
            .map(|(i, p)| (p.code.clone(), i))
            .collect();
        self.regions = positions;
    }

    /// Offset of region `code`.
    pub fn region(&self, code: &str) -> Option<&RegionPosition> {
        self.region_lookup.get(code).map(|&i| &self.regions[i])
    }

    /// Every known region offset, in table order.
    pub fn region_positions(&self) -> &[RegionPosition] {
        &self.regions
    }

    /// Per-region room lists, in region-list order.
    pub fn region_rooms(&self) -> &[RegionRooms] {
        &self.region_rooms
    }

    /// Register a region folder and its room list. Re-registering replaces
    /// the list but keeps the region's position in the order.
    pub fn set_region_rooms(&mut self, folder: &str, rooms: Vec<String>) {
        let code = region_code(folder).to_owned();
        let entry = RegionRooms {
            code,
            folder: folder.to_owned(),
            rooms,
        };
        match self.region_rooms.iter_mut().find(|r| r.code == entry.code) {
            Some(existing) => *existing = entry,
            None => self.region_rooms.push(entry),
        }
    }

    fn folder_of(&self, code: &str) -> String {
        self.region_rooms
            .iter()
            .find(|r| r.code == code)
            .map(|r| r.folder.clone())
            .unwrap_or_else(|| format!("{code}-rooms"))
    }

    /// Cache a parsed room. Unrenderable records are treated as absent and
    /// are not stored.
    pub fn insert_room(&mut self, room: RoomRecord) -> Option<RoomKey> {
        if !room.is_renderable() {
            debug!("Skipping {}/{}: no size", room.region_code, room.name);
            return None;
        }
        let key = room.key();
        if let Some(list) = self.region_rooms.iter_mut().find(|r| r.code == key.region) {
            if !list.rooms.contains(&key.room) {
                list.rooms.push(key.room.clone());
            }
        } else {
            self.region_rooms.push(RegionRooms {
                code: key.region.clone(),
                folder: format!("{}-rooms", key.region),
                rooms: vec![key.room.clone()],
            });
        }
        self.rooms.insert(key.clone(), room);
        Some(key)
    }

    /// Cached room.
    pub fn room(&self, key: &RoomKey) -> Option<&RoomRecord> {
        self.rooms.get(key)
    }

    /// Number of cached rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Compute `key`'s placement and put it in the index. `None` when the
    /// room is not cached or its region has no offset.
    pub fn place_room(&mut self, key: &RoomKey) -> Option<Placement> {
        let room = self.rooms.get(key)?;
        let Some(placement) = Placement::compute(self.region(&key.region), room) else {
            debug!("No placement for {key}: unknown region, empty room or out of world range");
            return None;
        };
        self.index.insert(key.clone(), placement);
        Some(placement)
    }

    /// Place every cached room of region `code`, in list order.
    pub fn place_region(&mut self, code: &str) -> usize {
        let Some(list) = self.region_rooms.iter().find(|r| r.code == code) else {
            return 0;
        };
        let keys: Vec<RoomKey> = list
            .rooms
            .iter()
            .map(|name| RoomKey::new(code, name.as_str()))
            .collect();
        keys.iter().filter(|k| self.place_room(k).is_some()).count()
    }

    /// Place every cached room, region by region.
    pub fn place_all(&mut self) -> usize {
        let codes: Vec<String> = self.region_rooms.iter().map(|r| r.code.clone()).collect();
        codes.iter().map(|c| self.place_region(c)).sum()
    }

    /// Placed-room index.
    pub fn index(&self) -> &RoomIndex {
        &self.index
    }

    /// First placed room containing world point `p`.
    pub fn room_at(&self, p: Vec2) -> Option<&PlacedRoom> {
        self.index.room_at(p)
    }

    /// Select the room under `p`, or clear the selection if there is none.
    pub fn select_at(&mut self, p: Vec2) -> Option<&RoomKey> {
        self.selected = self.index.room_at(p).map(|r| r.key.clone());
        self.selected.as_ref()
    }

    /// Select a placed room. Returns false (and changes nothing) otherwise.
    pub fn select(&mut self, key: &RoomKey) -> bool {
        if !self.index.contains_key(key) {
            return false;
        }
        self.selected = Some(key.clone());
        true
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Key of the selected room.
    pub fn selected_key(&self) -> Option<&RoomKey> {
        self.selected.as_ref()
    }

    /// The selected room's record.
    pub fn selected(&self) -> Option<&RoomRecord> {
        self.selected.as_ref().and_then(|k| self.rooms.get(k))
    }
}

/// Fetches map files through a [`MapSource`] and fills a [`MapData`].
pub struct MapLoader<S: MapSource> {
    source: S,
    batch_size: usize,
}

impl<S: MapSource> MapLoader<S> {
    /// Loader issuing at most `batch_size` concurrent room fetches.
    pub fn new(source: S, batch_size: usize) -> Self {
        MapLoader {
            source,
            batch_size: batch_size.max(1),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    async fn fetch_or_empty(&self, path: &str) -> String {
        match self.source.fetch_text(path).await {
            Ok(text) => text,
            Err(err) => {
                warn!("{err}");
                String::new()
            }
        }
    }

    /// Load offsets, the region list and every region, then place all rooms.
    pub async fn load_world(&self) -> MapData {
        let mut data = MapData::new();
        self.load_region_positions(&mut data).await;

        let folders = parse_region_list(&self.fetch_or_empty(REGIONS_FILE).await);
        info!("Found {} regions", folders.len());
        for folder in &folders {
            self.load_region(&mut data, folder).await;
        }
        info!(
            "Loaded {} rooms, placed {}",
            data.room_count(),
            data.index().len()
        );
        data
    }

    /// Fetch and install the region offset table.
    pub async fn load_region_positions(&self, data: &mut MapData) {
        let positions = parse_region_positions(&self.fetch_or_empty(REGION_POS_FILE).await);
        info!("Loaded {} region positions", positions.len());
        data.set_region_positions(positions);
    }

    /// Fetch one region's room list and rooms in batches, cache and place
    /// them. Returns how many rooms were placed.
    pub async fn load_region(&self, data: &mut MapData, folder: &str) -> usize {
        let code = region_code(folder).to_owned();
        let names = parse_room_list(&self.fetch_or_empty(&room_list_path(folder)).await);
        data.set_region_rooms(folder, names.clone());

        let mut batches = names.chunks(self.batch_size).peekable();
        while let Some(batch) = batches.next() {
            let fetched = join_all(batch.iter().map(|name| self.fetch_room(folder, &code, name))).await;
            for room in fetched.into_iter().flatten() {
                data.insert_room(room);
            }
            if batches.peek().is_some() {
                self.source.yield_now().await;
            }
        }

        let placed = data.place_region(&code);
        info!("{code}: {placed}/{} rooms placed", names.len());
        placed
    }

    /// Fetch and parse one room file. Missing files and unrenderable
    /// records come back as `None`.
    pub async fn fetch_room(&self, folder: &str, code: &str, name: &str) -> Option<RoomRecord> {
        let path = room_file_path(folder, name);
        let text = match self.source.fetch_text(&path).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Room {code}/{name} unavailable: {err}");
                return None;
            }
        };
        let room = parse_room(&text, code, name);
        room.is_renderable().then_some(room)
    }

    /// Lazy single-room path: return the cached room, or fetch, cache and
    /// place it.
    pub async fn ensure_room<'d>(
        &self,
        data: &'d mut MapData,
        code: &str,
        name: &str,
    ) -> Option<&'d RoomRecord> {
        let key = RoomKey::new(code, name);
        if !data.rooms.contains_key(&key) {
            let folder = data.folder_of(code);
            let room = self.fetch_room(&folder, code, name).await?;
            data.insert_room(room);
            data.place_room(&key);
        }
        data.room(&key)
    }

    /// Fetch and decode a precompiled bulk file.
    pub async fn load_bulk(&self, path: &str) -> Result<MapData, MapError> {
        let text = self.source.fetch_text(path).await?;
        let data = decode_bulk(&text)?;
        info!(
            "Loaded bulk map {path}: {} rooms, {} placed",
            data.room_count(),
            data.index().len()
        );
        Ok(data)
    }
}
