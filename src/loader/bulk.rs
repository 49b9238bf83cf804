// src/loader/bulk.rs
//! Precompiled single-file world data (JSON).
use crate::error::MapError;
use crate::ir_room::{RegionPosition, RoomKey, RoomRecord};
use crate::map::MapData;
use crate::spatial::{Placement, TILE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Format version written by [`encode_bulk`].
pub const BULK_VERSION: &str = "1.0";

const BULK_SOURCE: &str = "<bulk map>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct WorldPos {
    x: i32,
    y: i32,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkRoom {
    #[serde(flatten)]
    record: RoomRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    world_pos: Option<WorldPos>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkMap {
    #[serde(default = "default_version")]
    version: String,
    tile_size: i32,
    #[serde(default)]
    region_positions: BTreeMap<String, RegionPosition>,
    #[serde(default)]
    rooms: BTreeMap<String, Vec<BulkRoom>>,
    /// Region order of the source data; JSON objects do not keep it.
    #[serde(default)]
    region_order: Vec<String>,
    #[serde(default)]
    total_rooms: usize,
}

fn default_version() -> String {
    BULK_VERSION.to_owned()
}

fn json_err(source: serde_json::Error) -> MapError {
    MapError::Json {
        path: PathBuf::from(BULK_SOURCE),
        source,
    }
}

/// Serialise every cached room and region offset into one compact JSON
/// document. Rooms whose region is known carry their world position.
pub fn encode_bulk(data: &MapData) -> Result<String, MapError> {
    let region_positions = data
        .region_positions()
        .iter()
        .map(|p| (p.code.clone(), p.clone()))
        .collect();

    let mut rooms: BTreeMap<String, Vec<BulkRoom>> = BTreeMap::new();
    let mut total_rooms = 0;
    for list in data.region_rooms() {
        let entries = rooms.entry(list.code.clone()).or_default();
        for name in &list.rooms {
            let Some(record) = data.room(&RoomKey::new(list.code.as_str(), name.as_str())) else {
                continue;
            };
            let world_pos = Placement::compute(data.region(&list.code), record)
                .map(|p| WorldPos { x: p.x, y: p.y });
            entries.push(BulkRoom {
                record: record.clone(),
                world_pos,
            });
            total_rooms += 1;
        }
    }

    let bulk = BulkMap {
        version: BULK_VERSION.to_owned(),
        tile_size: TILE_SIZE,
        region_positions,
        rooms,
        region_order: data.region_rooms().iter().map(|r| r.code.clone()).collect(),
        total_rooms,
    };
    serde_json::to_string(&bulk).map_err(json_err)
}

/// Rebuild a placed [`MapData`] from a bulk document.
pub fn decode_bulk(text: &str) -> Result<MapData, MapError> {
    let mut bulk: BulkMap = serde_json::from_str(text).map_err(json_err)?;
    if bulk.tile_size != TILE_SIZE {
        return Err(MapError::InvalidMap(format!(
            "bulk map uses tile size {}, expected {}",
            bulk.tile_size, TILE_SIZE
        )));
    }

    let mut data = MapData::new();
    data.set_region_positions(bulk.region_positions.into_values().collect());

    let mut order = std::mem::take(&mut bulk.region_order);
    for code in bulk.rooms.keys() {
        if !order.contains(code) {
            order.push(code.clone());
        }
    }

    for code in order {
        let Some(rooms) = bulk.rooms.remove(&code) else {
            continue;
        };
        let names = rooms.iter().map(|r| r.record.name.clone()).collect();
        data.set_region_rooms(&format!("{code}-rooms"), names);
        for BulkRoom { mut record, .. } in rooms {
            record.region_code = code.clone();
            data.insert_room(record);
        }
    }
    data.place_all();
    Ok(data)
}
