//! Flat-colour box drawing onto an SDL canvas.

use glam::{Vec2, Vec3};
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::Canvas;
use sdl2::video::Window;

use crate::camera::Viewport;
use crate::components::PhysicsSprite;

pub const BACKGROUND: Color = Color::RGB(132, 182, 244);

/// Below this rotation a box is drawn as a plain filled rectangle.
const FLAT_ANGLE: f32 = 0.01;

pub fn to_color(c: Vec3) -> Color {
    let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Color::RGB(c.x as u8, c.y as u8, c.z as u8)
}

/// World point to SDL pixel coordinates (origin top-left, y down).
pub fn to_pixel(viewport: &Viewport, world: Vec2) -> Point {
    let screen = viewport.world_to_screen(world);
    Point::new(screen.x.round() as i32, (viewport.height - screen.y).round() as i32)
}

/// Closed outline of a sprite's box, rotated by its body angle.
pub fn outline(viewport: &Viewport, sprite: &PhysicsSprite) -> [Point; 5] {
    let half = sprite.size * 0.5;
    let rot = Vec2::from_angle(sprite.transform.angle);
    let center = sprite.transform.position;
    let corner = |x: f32, y: f32| to_pixel(viewport, center + rot.rotate(Vec2::new(x, y)));
    let first = corner(-half.x, -half.y);
    [
        first,
        corner(half.x, -half.y),
        corner(half.x, half.y),
        corner(-half.x, half.y),
        first,
    ]
}

fn visible(viewport: &Viewport, sprite: &PhysicsSprite) -> bool {
    // Rotated boxes can reach out to their half diagonal.
    let reach = sprite.size.length() * 0.5;
    let p = sprite.transform.position;
    p.x + reach >= viewport.left
        && p.x - reach <= viewport.right()
        && p.y + reach >= viewport.bottom
        && p.y - reach <= viewport.top()
}

pub struct Renderer {
    culled_last_frame: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            culled_last_frame: 0,
        }
    }

    /// Sprites skipped as off-screen during the last draw.
    pub fn culled_last_frame(&self) -> usize {
        self.culled_last_frame
    }

    pub fn draw<'a>(
        &mut self,
        canvas: &mut Canvas<Window>,
        viewport: &Viewport,
        sprites: impl Iterator<Item = &'a PhysicsSprite>,
    ) -> Result<(), String> {
        self.culled_last_frame = 0;
        for sprite in sprites {
            if !visible(viewport, sprite) {
                self.culled_last_frame += 1;
                continue;
            }
            let points = outline(viewport, sprite);
            canvas.set_draw_color(to_color(sprite.color));
            if sprite.transform.angle.abs() < FLAT_ANGLE {
                let top_left = points[3];
                let w = sprite.size.x.round() as u32;
                let h = sprite.size.y.round() as u32;
                canvas.fill_rect(Rect::new(top_left.x(), top_left.y(), w, h))?;
            }
            canvas.set_draw_color(to_color(sprite.color * 0.6));
            canvas.draw_lines(&points[..])?;
        }
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
