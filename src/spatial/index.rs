use crate::ir_room::{RegionPosition, RoomKey, RoomRecord};
use macroquad::prelude::*;
use std::collections::HashMap;

/// World pixels per tile.
pub const TILE_SIZE: i32 = 20;

/// Side of one hit-test bucket in world pixels.
pub const CHUNK_SIZE: i32 = 1024;

/// Rooms covering more buckets than this are kept in a separate list and
/// tested against every query instead.
pub const MAX_ROOM_CHUNKS: i64 = 256;

/// Bucket coordinate of the hit-test grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

/// Bucket holding world point `p`.
#[inline]
pub fn world_to_chunk(p: Vec2) -> ChunkCoord {
    ChunkCoord {
        x: (p.x.floor() as i32).div_euclid(CHUNK_SIZE),
        y: (p.y.floor() as i32).div_euclid(CHUNK_SIZE),
    }
}

/// Absolute world-pixel rectangle of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Pixels.
    pub width: i32,
    /// Pixels.
    pub height: i32,
}

impl Placement {
    /// Place `room` using its region's offset. `None` if the region is
    /// unknown, the room has no size, or the box does not fit in `i32`
    /// world pixels (right and bottom edges included).
    pub fn compute(region: Option<&RegionPosition>, room: &RoomRecord) -> Option<Self> {
        let region = region?;
        if !room.is_renderable() {
            return None;
        }
        let tile = i64::from(TILE_SIZE);
        let x = (i64::from(region.x) + i64::from(room.position.x)) * tile;
        let y = (i64::from(region.y) + i64::from(room.position.y)) * tile;
        let width = i64::from(room.width) * tile;
        let height = i64::from(room.height) * tile;
        i32::try_from(x + width).ok()?;
        i32::try_from(y + height).ok()?;
        Some(Placement {
            x: i32::try_from(x).ok()?,
            y: i32::try_from(y).ok()?,
            width: i32::try_from(width).ok()?,
            height: i32::try_from(height).ok()?,
        })
    }

    /// Half-open containment: left/top edges are inside, right/bottom are not.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        let (x, y) = (self.x as f32, self.y as f32);
        p.x >= x && p.x < x + self.width as f32 && p.y >= y && p.y < y + self.height as f32
    }

    /// Overlap test against the `[min, max)` box.
    #[inline]
    pub fn intersects(&self, min: Vec2, max: Vec2) -> bool {
        let (x, y) = (self.x as f32, self.y as f32);
        x < max.x && x + self.width as f32 > min.x && y < max.y && y + self.height as f32 > min.y
    }

    /// As a macroquad `Rect`.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    fn chunk_span(&self) -> (ChunkCoord, ChunkCoord) {
        let right = (i64::from(self.x) + i64::from(self.width) - 1).div_euclid(CHUNK_SIZE as i64);
        let bottom = (i64::from(self.y) + i64::from(self.height) - 1).div_euclid(CHUNK_SIZE as i64);
        let lo = ChunkCoord {
            x: self.x.div_euclid(CHUNK_SIZE),
            y: self.y.div_euclid(CHUNK_SIZE),
        };
        let hi = ChunkCoord {
            x: right as i32,
            y: bottom as i32,
        };
        (lo, hi)
    }

    fn chunk_count(&self) -> i64 {
        let (lo, hi) = self.chunk_span();
        (i64::from(hi.x) - i64::from(lo.x) + 1) * (i64::from(hi.y) - i64::from(lo.y) + 1)
    }

    fn chunks(&self) -> impl Iterator<Item = ChunkCoord> {
        let (lo, hi) = self.chunk_span();
        (lo.y..=hi.y).flat_map(move |y| (lo.x..=hi.x).map(move |x| ChunkCoord { x, y }))
    }
}

/// Index entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedRoom {
    /// Which room.
    pub key: RoomKey,
    /// Where it sits in the world.
    pub placement: Placement,
}

/// Placed rooms in insertion order, bucketed by chunk for point queries.
#[derive(Debug, Default)]
pub struct RoomIndex {
    rooms: Vec<PlacedRoom>,
    buckets: HashMap<ChunkCoord, Vec<usize>>,
    oversized: Vec<usize>,
    by_key: HashMap<RoomKey, usize>,
}

impl RoomIndex {
    /// Empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a room. A room placed again keeps its original
    /// insertion slot, so hit-test priority does not change.
    pub fn insert(&mut self, key: RoomKey, placement: Placement) -> usize {
        if let Some(&idx) = self.by_key.get(&key) {
            let old = self.rooms[idx].placement;
            self.remove_from_buckets(idx, old);
            self.rooms[idx].placement = placement;
            self.add_to_buckets(idx, placement);
            return idx;
        }

        let idx = self.rooms.len();
        self.by_key.insert(key.clone(), idx);
        self.rooms.push(PlacedRoom { key, placement });
        self.add_to_buckets(idx, placement);
        idx
    }

    fn add_to_buckets(&mut self, idx: usize, placement: Placement) {
        if placement.chunk_count() > MAX_ROOM_CHUNKS {
            // Kept sorted so hit-test order stays insertion order.
            let pos = self.oversized.partition_point(|&i| i < idx);
            self.oversized.insert(pos, idx);
            return;
        }
        for cc in placement.chunks() {
            self.buckets.entry(cc).or_default().push(idx);
        }
    }

    fn remove_from_buckets(&mut self, idx: usize, placement: Placement) {
        if placement.chunk_count() > MAX_ROOM_CHUNKS {
            self.oversized.retain(|&i| i != idx);
            return;
        }
        for cc in placement.chunks() {
            if let Some(bucket) = self.buckets.get_mut(&cc) {
                bucket.retain(|&i| i != idx);
            }
        }
    }

    /// First-inserted room whose box contains `p`.
    pub fn room_at(&self, p: Vec2) -> Option<&PlacedRoom> {
        let bucket = self
            .buckets
            .get(&world_to_chunk(p))
            .map(Vec::as_slice)
            .unwrap_or_default();
        bucket
            .iter()
            .chain(&self.oversized)
            .copied()
            .filter(|&i| self.rooms[i].placement.contains(p))
            .min()
            .map(|i| &self.rooms[i])
    }

    /// Rooms overlapping the `[min, max)` box, in insertion order.
    pub fn query_rect(&self, min: Vec2, max: Vec2) -> Vec<&PlacedRoom> {
        let mut lo = world_to_chunk(min);
        let mut hi = world_to_chunk(max);
        if lo.x > hi.x {
            std::mem::swap(&mut lo.x, &mut hi.x);
        }
        if lo.y > hi.y {
            std::mem::swap(&mut lo.y, &mut hi.y);
        }

        let chunk_count = (hi.x - lo.x + 1) as i64 * (hi.y - lo.y + 1) as i64;
        let mut hits: Vec<usize> = if chunk_count > self.buckets.len() as i64 {
            // Zoomed far out: walking the buckets is cheaper than the grid.
            self.buckets
                .iter()
                .filter(|(cc, _)| cc.x >= lo.x && cc.x <= hi.x && cc.y >= lo.y && cc.y <= hi.y)
                .flat_map(|(_, b)| b.iter().copied())
                .collect()
        } else {
            let mut v = Vec::new();
            for cy in lo.y..=hi.y {
                for cx in lo.x..=hi.x {
                    if let Some(b) = self.buckets.get(&ChunkCoord { x: cx, y: cy }) {
                        v.extend_from_slice(b);
                    }
                }
            }
            v
        };
        hits.extend_from_slice(&self.oversized);
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter()
            .map(|i| &self.rooms[i])
            .filter(|r| r.placement.intersects(min, max))
            .collect()
    }

    /// Union of every placement, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect> {
        let mut it = self.rooms.iter().map(|r| r.placement);
        let first = it.next()?;
        let right = |p: Placement| i64::from(p.x) + i64::from(p.width);
        let bottom = |p: Placement| i64::from(p.y) + i64::from(p.height);
        let (mut x0, mut y0) = (i64::from(first.x), i64::from(first.y));
        let (mut x1, mut y1) = (right(first), bottom(first));
        for p in it {
            x0 = x0.min(i64::from(p.x));
            y0 = y0.min(i64::from(p.y));
            x1 = x1.max(right(p));
            y1 = y1.max(bottom(p));
        }
        Some(Rect::new(
            x0 as f32,
            y0 as f32,
            (x1 - x0) as f32,
            (y1 - y0) as f32,
        ))
    }

    /// Entry for `key`, if placed.
    pub fn get(&self, key: &RoomKey) -> Option<&PlacedRoom> {
        self.by_key.get(key).map(|&i| &self.rooms[i])
    }

    /// Whether `key` is placed.
    pub fn contains_key(&self, key: &RoomKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedRoom> {
        self.rooms.iter()
    }

    /// Number of placed rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// No room placed yet.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Drop every placement.
    pub fn clear(&mut self) {
        self.rooms.clear();
        self.buckets.clear();
        self.oversized.clear();
        self.by_key.clear();
    }
}
