use glam::Vec2;

use crate::physics::Aabb;

/// The visible window onto the world: a fixed-size rectangle whose
/// bottom-left corner sits at (`left`, `bottom`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            left: 0.0,
            bottom: 0.0,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn top(&self) -> f32 {
        self.bottom + self.height
    }

    /// Window coordinates (origin bottom-left, y up) to world coordinates.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x + self.left, screen.y + self.bottom)
    }

    /// World coordinates to window coordinates (origin bottom-left, y up).
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.left, world.y - self.bottom)
    }
}

/// Scroll just far enough to bring `actor` back inside a `margin`-wide band
/// along every edge of the window.
///
/// Each axis shifts at most once: the low edge is checked first and the high
/// edge only when the low edge did not fire. Inside the band nothing moves,
/// so calling this twice with the same bounds is a no-op the second time.
pub fn scroll(view: Viewport, actor: Aabb, margin: f32) -> Viewport {
    let mut next = view;

    let left_boundary = view.left + margin;
    let right_boundary = view.right() - margin;
    if actor.left() < left_boundary {
        next.left -= left_boundary - actor.left();
    } else if actor.right() > right_boundary {
        next.left += actor.right() - right_boundary;
    }

    let bottom_boundary = view.bottom + margin;
    let top_boundary = view.top() - margin;
    if actor.bottom() < bottom_boundary {
        next.bottom -= bottom_boundary - actor.bottom();
    } else if actor.top() > top_boundary {
        next.bottom += actor.top() - top_boundary;
    }

    next
}
