// src/render/room_image.rs
//! Raster images of rooms.
use crate::ir_room::RoomRecord;
use macroquad::prelude::*;

/// Raster pixels per tile in a room image. Images are scaled up to
/// `TILE_SIZE` when drawn.
pub const RASTER_TILE_PX: u32 = 4;

/// Longest side of a room image. Larger rooms get fewer pixels per tile.
pub const MAX_RASTER_SIDE: u32 = 4096;

/// Colour of the room outline.
pub const OUTLINE_COLOR: Color = Color::new(0.8, 0.8, 0.8, 1.0);

/// Minimal drawing surface rooms are rasterised onto.
pub trait Canvas {
    /// Pixel size.
    fn size(&self) -> (u32, u32);
    /// Fill an axis-aligned rectangle, clipped to the canvas.
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    /// Stroke a straight line `width` pixels thick.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, width: f32);
}

impl Canvas for Image {
    fn size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let (cw, ch) = (self.width as u32, self.height as u32);
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(cw);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(ch);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Color, width: f32) {
        let width = width.max(1.0);
        let half = (width - 1.0) / 2.0;
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x1 + (x2 - x1) * t;
            let y = y1 + (y2 - y1) * t;
            self.draw_rect(x.round() - half, y.round() - half, width, width, color);
        }
    }
}

/// Raster pixels per tile for `room`: [`RASTER_TILE_PX`], lowered so the
/// longest side stays within [`MAX_RASTER_SIDE`].
pub fn raster_tile_px(room: &RoomRecord) -> f32 {
    let longest = room.width.max(room.height).max(1) as f32;
    (MAX_RASTER_SIDE as f32 / longest).min(RASTER_TILE_PX as f32)
}

/// Pixel size of a room's raster image.
pub fn raster_size(room: &RoomRecord) -> (u16, u16) {
    let scale = raster_tile_px(room);
    let px = |tiles: u32| ((tiles as f32 * scale).ceil() as u32).clamp(1, MAX_RASTER_SIDE) as u16;
    (px(room.width), px(room.height))
}

/// Paint `room`'s tiles onto `canvas`. Cells outside the declared size are
/// clipped; unknown characters are left unpainted.
pub fn paint_room<C: Canvas>(canvas: &mut C, room: &RoomRecord) {
    let px = raster_tile_px(room);
    for (row, line) in room.tile_grid.iter().take(room.height as usize).enumerate() {
        for (col, c) in line.chars().take(room.width as usize).enumerate() {
            if let Some(kind) = crate::ir_room::TileKind::from_char(c) {
                canvas.draw_rect(col as f32 * px, row as f32 * px, px, px, kind.color());
            }
        }
    }

    let (w, h) = canvas.size();
    let (r, b) = (w.saturating_sub(1) as f32, h.saturating_sub(1) as f32);
    canvas.draw_line(0.0, 0.0, r, 0.0, OUTLINE_COLOR, 1.0);
    canvas.draw_line(r, 0.0, r, b, OUTLINE_COLOR, 1.0);
    canvas.draw_line(r, b, 0.0, b, OUTLINE_COLOR, 1.0);
    canvas.draw_line(0.0, b, 0.0, 0.0, OUTLINE_COLOR, 1.0);
}

/// Fixed-size raster image of one room, used as its cached texture source.
pub fn rasterize_room(room: &RoomRecord) -> Image {
    let (w, h) = raster_size(room);
    let mut img = Image::gen_image_color(w, h, BLANK);
    paint_room(&mut img, room);
    img
}
