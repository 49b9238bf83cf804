//! Macroquad drawing of placed rooms.
use crate::ir_room::RoomKey;
use crate::map::MapData;
use crate::render::cull::visible_rooms;
use crate::render::room_image::rasterize_room;
use crate::view::ViewRect;
use macroquad::prelude::*;
use std::collections::HashMap;

const SELECTED_COLOR: Color = YELLOW;
const LABEL_COLOR: Color = LIGHTGRAY;
/// Labels are only drawn for rooms at least this wide on screen.
const LABEL_MIN_SCREEN_W: f32 = 48.0;
const LABEL_FONT_PX: f32 = 14.0;

/// Draws placed rooms with macroquad, caching one texture per room.
#[derive(Default)]
pub struct MapPainter {
    textures: HashMap<RoomKey, Texture2D>,
}

impl MapPainter {
    /// Painter with an empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the cached texture of `key`, e.g. after the room changed.
    pub fn invalidate(&mut self, key: &RoomKey) {
        self.textures.remove(key);
    }

    /// Number of cached textures.
    pub fn cached_textures(&self) -> usize {
        self.textures.len()
    }

    fn texture_for(&mut self, data: &MapData, key: &RoomKey) -> Option<&Texture2D> {
        if !self.textures.contains_key(key) {
            let room = data.room(key)?;
            let tex = Texture2D::from_image(&rasterize_room(room));
            tex.set_filter(FilterMode::Nearest);
            self.textures.insert(key.clone(), tex);
        }
        self.textures.get(key)
    }

    /// Draw every room overlapping `view` into the current render target,
    /// then restore the default camera.
    pub fn draw(&mut self, data: &MapData, view: &ViewRect) {
        set_camera(&view.camera());

        let px_per_world = screen_width() / view.w;
        let visible = visible_rooms(data.index(), view);
        for placed in &visible {
            let r = placed.placement.rect();
            if let Some(tex) = self.texture_for(data, &placed.key) {
                draw_texture_ex(
                    tex,
                    r.x,
                    r.y,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(r.w, r.h)),
                        ..Default::default()
                    },
                );
            }
        }

        // Labels and highlight go on top of every room image.
        let line = 1.0 / px_per_world;
        for placed in &visible {
            let r = placed.placement.rect();
            if r.w * px_per_world < LABEL_MIN_SCREEN_W {
                continue;
            }
            if let Some(room) = data.room(&placed.key) {
                let size = LABEL_FONT_PX / px_per_world;
                draw_text(room.short_name(), r.x + 4.0 * line, r.y + size, size, LABEL_COLOR);
            }
        }

        if let Some(sel) = data.selected_key().and_then(|k| data.index().get(k)) {
            let r = sel.placement.rect();
            draw_rectangle_lines(r.x, r.y, r.w, r.h, 3.0 * line, SELECTED_COLOR);
        }

        set_default_camera();
    }
}
