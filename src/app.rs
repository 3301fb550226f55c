use std::ffi::NulError;
use std::fmt;

use sdl2::video::WindowBuildError;
use sdl2::IntegerOrSdlError;

use crate::config::ConfigError;
use crate::engine::input::InputState;
use crate::engine::time::{FrameTimer, Timings};
use crate::engine::window::GameWindow;
use crate::game::Game;
use crate::physics::BoxWorld;
use crate::renderer::{Renderer, BACKGROUND};

pub const TITLE: &str = "boxbrawl";

pub const INSTRUCTIONS: &str =
    "Arrows move and jump, mouse drags boxes, space punches, hold G to grab an item to the right.";

/// How often the timing readout in the title bar is refreshed, in seconds.
const TITLE_REFRESH: f32 = 0.5;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    /// SDL reports most failures as bare strings.
    Sdl(String),
    Window(String),
    Canvas(String),
    Title(NulError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{e}"),
            AppError::Sdl(msg) => write!(f, "SDL error: {msg}"),
            AppError::Window(e) => write!(f, "failed to create window: {e}"),
            AppError::Canvas(e) => write!(f, "failed to create renderer: {e}"),
            AppError::Title(e) => write!(f, "bad window title: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Title(e) => Some(e),
            AppError::Sdl(_) | AppError::Window(_) | AppError::Canvas(_) => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Sdl(msg)
    }
}

impl From<WindowBuildError> for AppError {
    fn from(e: WindowBuildError) -> Self {
        AppError::Window(e.to_string())
    }
}

impl From<IntegerOrSdlError> for AppError {
    fn from(e: IntegerOrSdlError) -> Self {
        AppError::Canvas(e.to_string())
    }
}

impl From<NulError> for AppError {
    fn from(e: NulError) -> Self {
        AppError::Title(e)
    }
}

/// Interactive shell around a [`Game`]: SDL events in, boxes out.
pub struct GameApp {
    game: Game<BoxWorld>,
    renderer: Renderer,
    timings: Timings,
}

impl GameApp {
    pub fn new(game: Game<BoxWorld>) -> Self {
        Self {
            game,
            renderer: Renderer::new(),
            timings: Timings::default(),
        }
    }

    pub fn run(&mut self, sdl: &sdl2::Sdl, window: &mut GameWindow) -> Result<(), AppError> {
        let mut event_pump = sdl.event_pump()?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();
        let mut since_title = TITLE_REFRESH;

        log::info!("{INSTRUCTIONS}");

        loop {
            timer.tick();
            input.update(&mut event_pump, self.game.viewport.height);
            if input.should_quit() {
                break;
            }

            let game = &mut self.game;
            let ((), processing) = Timings::measure(|| {
                for &event in &input.events {
                    game.handle_event(event);
                }
                game.advance(timer.dt);
            });
            self.timings.processing = processing;

            window.clear(BACKGROUND);
            let renderer = &mut self.renderer;
            let game = &self.game;
            let (drawn, drawing) = Timings::measure(|| {
                renderer.draw(window.canvas_mut(), &game.viewport, game.sprites())
            });
            drawn?;
            self.timings.drawing = drawing;
            window.present();

            since_title += timer.dt;
            if since_title >= TITLE_REFRESH {
                since_title = 0.0;
                log::debug!(
                    "{} sprites off-screen, {} crates left",
                    self.renderer.culled_last_frame(),
                    self.game.dynamics.len()
                );
                window.set_title(&format!(
                    "{TITLE} | {} | {INSTRUCTIONS}",
                    self.timings.summary()
                ))?;
            }
        }

        log::info!(
            "Quit after {} ticks, {} crates left",
            self.game.ticks(),
            self.game.dynamics.len()
        );
        Ok(())
    }
}

/// Open a window sized from the game's tuning and play until quit.
pub fn run(game: Game<BoxWorld>) -> Result<(), AppError> {
    let sdl = sdl2::init()?;
    let width = game.tuning.screen_width.round() as u32;
    let height = game.tuning.screen_height.round() as u32;
    let mut window = GameWindow::new(&sdl, TITLE, width, height)?;
    GameApp::new(game).run(&sdl, &mut window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_errors_keep_their_source() {
        let err = AppError::from(ConfigError::Invalid("physics_dt must be positive"));
        assert_eq!(err.to_string(), "invalid tuning: physics_dt must be positive");
        assert!(err.source().is_some());
    }

    #[test]
    fn sdl_strings_convert() {
        let err: AppError = String::from("no video device").into();
        assert_eq!(err.to_string(), "SDL error: no video device");
        assert!(err.source().is_none());
    }
}
