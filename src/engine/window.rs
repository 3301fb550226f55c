use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::Sdl;

use crate::app::AppError;

pub struct GameWindow {
    canvas: Canvas<Window>,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, title: &str, width: u32, height: u32) -> Result<Self, AppError> {
        let video = sdl.video()?;

        let window = video
            .window(title, width, height)
            .position_centered()
            .build()?;

        let canvas = window.into_canvas().accelerated().present_vsync().build()?;
        log::info!("Window opened: {width}x{height}");

        Ok(Self { canvas })
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas<Window> {
        &mut self.canvas
    }

    pub fn clear(&mut self, color: Color) {
        self.canvas.set_draw_color(color);
        self.canvas.clear();
    }

    pub fn present(&mut self) {
        self.canvas.present();
    }

    pub fn set_title(&mut self, title: &str) -> Result<(), AppError> {
        self.canvas.window_mut().set_title(title)?;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.canvas.window().size()
    }
}
