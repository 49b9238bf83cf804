// tests/view_tests.rs

use macroquad::prelude::{vec2, Vec2};
use room_map_viewer::{Placement, RoomIndex, RoomKey, ViewController, ViewLimits, ViewRect};

const EPS: f32 = 1e-2;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPS * a.abs().max(b.abs()).max(1.0)
}

fn screen_point_of(rect: &ViewRect, world: Vec2) -> Vec2 {
    vec2((world.x - rect.x) / rect.w, (world.y - rect.y) / rect.h)
}

#[test]
fn zoom_in_then_out_restores_rect_and_keeps_anchor() {
    let limits = ViewLimits::default();
    let start = ViewRect::new(-5000.0, 1200.0, 8000.0, 4500.0);
    let anchor = vec2(-1234.0, 2000.0);
    let before = screen_point_of(&start, anchor);

    let zoomed = start.zoom_at(anchor, 1.0, &limits);
    assert!(zoomed.w < start.w && zoomed.h < start.h);
    let mid = screen_point_of(&zoomed, anchor);
    assert!(close(mid.x, before.x) && close(mid.y, before.y));

    let back = zoomed.zoom_at(anchor, -1.0, &limits);
    assert!(close(back.x, start.x));
    assert!(close(back.y, start.y));
    assert!(close(back.w, start.w));
    assert!(close(back.h, start.h));
}

#[test]
fn zoom_keeps_aspect_and_respects_limits() {
    let limits = ViewLimits {
        min_extent: 100.0,
        max_extent: 10_000.0,
        zoom_step: 1.5,
    };
    let mut r = ViewRect::new(0.0, 0.0, 1600.0, 900.0);
    for _ in 0..50 {
        r = r.zoom_at(vec2(800.0, 450.0), -1.0, &limits);
    }
    assert!(close(r.w, 10_000.0));
    assert!(close(r.w / r.h, 1600.0 / 900.0));

    for _ in 0..100 {
        r = r.zoom_at(vec2(800.0, 450.0), 1.0, &limits);
    }
    assert!(close(r.h, 100.0));
    assert!(r.w >= 100.0);
    assert!(close(r.w / r.h, 1600.0 / 900.0));
}

#[test]
fn zero_direction_is_a_no_op() {
    let r = ViewRect::new(1.0, 2.0, 300.0, 400.0);
    assert_eq!(r.zoom_at(vec2(5.0, 5.0), 0.0, &ViewLimits::default()), r);
}

#[test]
fn reset_with_no_rooms_gives_default_rect() {
    let default = ViewRect::new(-2000.0, -2000.0, 4000.0, 4000.0);
    let r = ViewRect::reset(&RoomIndex::new(), 400.0, default);
    assert_eq!(r, default);
}

#[test]
fn reset_fits_rooms_plus_padding() {
    let mut index = RoomIndex::new();
    index.insert(
        RoomKey::new("CC", "a"),
        Placement {
            x: -100,
            y: 0,
            width: 100,
            height: 50,
        },
    );
    index.insert(
        RoomKey::new("CC", "b"),
        Placement {
            x: 300,
            y: 200,
            width: 100,
            height: 100,
        },
    );
    let r = ViewRect::reset(&index, 10.0, ViewRect::new(0.0, 0.0, 1.0, 1.0));
    assert_eq!(r, ViewRect::new(-110.0, -10.0, 520.0, 320.0));
}

#[test]
fn screen_world_conversions_invert() {
    let r = ViewRect::new(-300.0, 50.0, 1200.0, 600.0);
    let viewport = vec2(800.0, 400.0);
    let w = r.screen_to_world(vec2(200.0, 100.0), viewport);
    assert_eq!(w, vec2(0.0, 200.0));
    assert_eq!(r.world_to_screen(w, viewport), vec2(200.0, 100.0));
}

#[test]
fn drag_pans_from_start_rect_and_is_suppressed_on_rooms() {
    let mut index = RoomIndex::new();
    index.insert(
        RoomKey::new("CC", "a"),
        Placement {
            x: 0,
            y: 0,
            width: 100,
            height: 100,
        },
    );
    let viewport = vec2(1000.0, 1000.0);
    let mut ctl = ViewController::new(
        ViewRect::new(0.0, 0.0, 2000.0, 2000.0),
        ViewLimits::default(),
        0.0,
    );

    // (10, 10) on screen is world (20, 20), inside the room.
    assert!(!ctl.pointer_down(vec2(10.0, 10.0), viewport, &index));
    ctl.pointer_move(vec2(500.0, 500.0), viewport);
    assert_eq!(ctl.rect, ViewRect::new(0.0, 0.0, 2000.0, 2000.0));
    ctl.pointer_up();

    assert!(ctl.pointer_down(vec2(500.0, 500.0), viewport, &index));
    ctl.pointer_move(vec2(510.0, 490.0), viewport);
    ctl.pointer_move(vec2(550.0, 450.0), viewport);
    assert_eq!(ctl.rect, ViewRect::new(-100.0, 100.0, 2000.0, 2000.0));
    ctl.pointer_up();
    assert!(!ctl.is_dragging());
}

#[test]
fn controller_reset_matches_viewport_aspect() {
    let mut ctl = ViewController::new(
        ViewRect::new(-50.0, -50.0, 100.0, 100.0),
        ViewLimits::default(),
        0.0,
    );
    ctl.reset(&RoomIndex::new(), vec2(200.0, 100.0));
    assert_eq!(ctl.rect, ViewRect::new(-100.0, -50.0, 200.0, 100.0));
}
