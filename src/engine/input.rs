use glam::Vec2;
use sdl2::event::Event;
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// Game actions bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Punch,
    Grab,
}

impl Key {
    pub fn from_scancode(sc: Scancode) -> Option<Self> {
        match sc {
            Scancode::Left => Some(Key::Left),
            Scancode::Right => Some(Key::Right),
            Scancode::Up => Some(Key::Up),
            Scancode::Space => Some(Key::Punch),
            Scancode::G => Some(Key::Grab),
            _ => None,
        }
    }
}

/// Discrete input edges. Pointer positions are window coordinates with the
/// origin at the bottom-left and y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    PointerPressed(Vec2),
    PointerReleased(Vec2),
    PointerMoved { position: Vec2, delta: Vec2 },
}

/// Per-frame event buffer filled from SDL.
pub struct InputState {
    pub events: Vec<InputEvent>,
    pub quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            quit: false,
        }
    }

    /// Drain SDL's queue. `window_height` flips SDL's y-down pointer
    /// coordinates into the game's y-up convention.
    pub fn update(&mut self, event_pump: &mut EventPump, window_height: f32) {
        self.events.clear();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(Scancode::Escape),
                    ..
                } => self.quit = true,
                // Held keys auto-repeat; the controller only wants edges.
                Event::KeyDown { repeat: true, .. } => {}
                Event::KeyDown {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = Key::from_scancode(sc) {
                        self.events.push(InputEvent::KeyPressed(key));
                    }
                }
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => {
                    if let Some(key) = Key::from_scancode(sc) {
                        self.events.push(InputEvent::KeyReleased(key));
                    }
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    self.events
                        .push(InputEvent::PointerPressed(flip(x, y, window_height)));
                }
                Event::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => {
                    self.events
                        .push(InputEvent::PointerReleased(flip(x, y, window_height)));
                }
                Event::MouseMotion {
                    x, y, xrel, yrel, ..
                } => {
                    self.events.push(InputEvent::PointerMoved {
                        position: flip(x, y, window_height),
                        delta: Vec2::new(xrel as f32, -(yrel as f32)),
                    });
                }
                _ => {}
            }
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

fn flip(x: i32, y: i32, window_height: f32) -> Vec2 {
    Vec2::new(x as f32, window_height - y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings() {
        assert_eq!(Key::from_scancode(Scancode::Right), Some(Key::Right));
        assert_eq!(Key::from_scancode(Scancode::Space), Some(Key::Punch));
        assert_eq!(Key::from_scancode(Scancode::G), Some(Key::Grab));
        assert_eq!(Key::from_scancode(Scancode::Q), None);
    }

    #[test]
    fn pointer_y_is_flipped() {
        assert_eq!(flip(10, 0, 800.0), Vec2::new(10.0, 800.0));
        assert_eq!(flip(10, 800, 800.0), Vec2::new(10.0, 0.0));
    }
}
