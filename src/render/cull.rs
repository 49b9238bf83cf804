//! View culling.
use crate::spatial::{PlacedRoom, RoomIndex};
use crate::view::ViewRect;
use macroquad::prelude::*;

/// Extra world pixels around the view that still count as visible, so rooms
/// sliding in during a pan are already drawn.
const CULL_MARGIN: f32 = 64.0;

/// Placed rooms overlapping `view`, in insertion (draw) order.
pub fn visible_rooms<'g>(index: &'g RoomIndex, view: &ViewRect) -> Vec<&'g PlacedRoom> {
    let pad = vec2(CULL_MARGIN, CULL_MARGIN);
    index.query_rect(view.min() - pad, view.max() + pad)
}
