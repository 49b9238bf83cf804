use crate::spatial::RoomIndex;
use macroquad::prelude::*;

/// Visible part of world space, in world pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

/// Zoom bounds and step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewLimits {
    /// Smallest allowed width/height.
    pub min_extent: f32,
    /// Largest allowed width/height.
    pub max_extent: f32,
    /// Extent multiplier of one zoom-out notch (> 1).
    pub zoom_step: f32,
}

impl Default for ViewLimits {
    fn default() -> Self {
        ViewLimits {
            min_extent: 200.0,
            max_extent: 200_000.0,
            zoom_step: 1.1,
        }
    }
}

impl ViewRect {
    /// Rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        ViewRect { x, y, w, h }
    }

    /// Centre point.
    pub fn center(&self) -> Vec2 {
        vec2(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Top-left corner.
    pub fn min(&self) -> Vec2 {
        vec2(self.x, self.y)
    }

    /// Bottom-right corner.
    pub fn max(&self) -> Vec2 {
        vec2(self.x + self.w, self.y + self.h)
    }

    /// One notch of zoom around `anchor` (world point). Positive `direction`
    /// zooms in, negative zooms out, zero leaves the rect alone.
    pub fn zoom_at(&self, anchor: Vec2, direction: f32, limits: &ViewLimits) -> ViewRect {
        if direction == 0.0 {
            return *self;
        }
        let factor = if direction > 0.0 {
            1.0 / limits.zoom_step
        } else {
            limits.zoom_step
        };
        self.zoom_by(anchor, factor, limits)
    }

    /// Scale both extents by `factor` keeping `anchor` fixed. The factor is
    /// clamped so neither extent leaves `[min_extent, max_extent]`; both
    /// extents share it, so the aspect ratio never drifts.
    pub fn zoom_by(&self, anchor: Vec2, factor: f32, limits: &ViewLimits) -> ViewRect {
        if self.w <= 0.0 || self.h <= 0.0 || !factor.is_finite() || factor <= 0.0 {
            return *self;
        }
        let lo = (limits.min_extent / self.w).max(limits.min_extent / self.h);
        let hi = (limits.max_extent / self.w).min(limits.max_extent / self.h);
        // Extremely thin rects cannot satisfy both bounds; keep them inside max.
        let factor = if lo > hi { hi } else { factor.clamp(lo, hi) };

        ViewRect {
            x: anchor.x - (anchor.x - self.x) * factor,
            y: anchor.y - (anchor.y - self.y) * factor,
            w: self.w * factor,
            h: self.h * factor,
        }
    }

    /// Rect after dragging by `screen_delta` pixels, measured against the
    /// rect that was active when the drag started.
    pub fn panned(start: &ViewRect, screen_delta: Vec2, viewport: Vec2) -> ViewRect {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return *start;
        }
        ViewRect {
            x: start.x - screen_delta.x * start.w / viewport.x,
            y: start.y - screen_delta.y * start.h / viewport.y,
            ..*start
        }
    }

    /// Bounding box of every placed room plus `padding` on each side, or
    /// `default` when nothing is placed.
    pub fn reset(index: &RoomIndex, padding: f32, default: ViewRect) -> ViewRect {
        match index.bounds() {
            Some(b) => ViewRect {
                x: b.x - padding,
                y: b.y - padding,
                w: b.w + padding * 2.0,
                h: b.h + padding * 2.0,
            },
            None => default,
        }
    }

    /// Grow the short side around the centre so the rect has the
    /// viewport's aspect ratio.
    pub fn fit_aspect(&self, viewport: Vec2) -> ViewRect {
        if viewport.x <= 0.0 || viewport.y <= 0.0 || self.w <= 0.0 || self.h <= 0.0 {
            return *self;
        }
        let target = viewport.x / viewport.y;
        let c = self.center();
        let (w, h) = if self.w / self.h < target {
            (self.h * target, self.h)
        } else {
            (self.w, self.w / target)
        };
        ViewRect::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }

    /// Screen pixel -> world pixel.
    pub fn screen_to_world(&self, screen: Vec2, viewport: Vec2) -> Vec2 {
        vec2(
            self.x + screen.x * self.w / viewport.x,
            self.y + screen.y * self.h / viewport.y,
        )
    }

    /// World pixel -> screen pixel.
    pub fn world_to_screen(&self, world: Vec2, viewport: Vec2) -> Vec2 {
        vec2(
            (world.x - self.x) * viewport.x / self.w,
            (world.y - self.y) * viewport.y / self.h,
        )
    }

    /// Camera showing exactly this rect.
    pub fn camera(&self) -> Camera2D {
        Camera2D::from_display_rect(Rect::new(self.x, self.y, self.w, self.h))
    }
}

struct DragState {
    origin: Vec2,
    start: ViewRect,
}

/// Pointer-driven pan/zoom on top of a [`ViewRect`].
pub struct ViewController {
    /// Current view.
    pub rect: ViewRect,
    /// Zoom limits.
    pub limits: ViewLimits,
    /// Margin used by [`ViewController::reset`].
    pub padding: f32,
    /// View used when nothing is placed.
    pub default_view: ViewRect,
    drag: Option<DragState>,
}

impl ViewController {
    /// Controller starting at `default_view`.
    pub fn new(default_view: ViewRect, limits: ViewLimits, padding: f32) -> Self {
        ViewController {
            rect: default_view,
            limits,
            padding,
            default_view,
            drag: None,
        }
    }

    /// Pointer pressed at `screen`. Presses on a placed room never start a
    /// drag so the release can select it. Returns whether a drag started.
    pub fn pointer_down(&mut self, screen: Vec2, viewport: Vec2, index: &RoomIndex) -> bool {
        let world = self.rect.screen_to_world(screen, viewport);
        if index.room_at(world).is_some() {
            self.drag = None;
            return false;
        }
        self.drag = Some(DragState {
            origin: screen,
            start: self.rect,
        });
        true
    }

    /// Pointer moved while pressed.
    pub fn pointer_move(&mut self, screen: Vec2, viewport: Vec2) {
        if let Some(drag) = &self.drag {
            self.rect = ViewRect::panned(&drag.start, screen - drag.origin, viewport);
        }
    }

    /// Pointer released; ends any drag.
    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Wheel notch at `screen`.
    pub fn wheel(&mut self, screen: Vec2, direction: f32, viewport: Vec2) {
        let anchor = self.rect.screen_to_world(screen, viewport);
        self.rect = self.rect.zoom_at(anchor, direction, &self.limits);
    }

    /// Fit every placed room, matching the viewport aspect.
    pub fn reset(&mut self, index: &RoomIndex, viewport: Vec2) {
        self.drag = None;
        self.rect = ViewRect::reset(index, self.padding, self.default_view).fit_aspect(viewport);
    }
}
