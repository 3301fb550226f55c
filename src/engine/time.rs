use std::time::{Duration, Instant};

pub struct FrameTimer {
    last: Instant,
    pub dt: f32,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            dt: 0.0,
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock cost of the last update and draw, for the title readout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timings {
    pub processing: Duration,
    pub drawing: Duration,
}

impl Timings {
    /// Time `f`, returning its result and how long it took.
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
        let start = Instant::now();
        let out = f();
        (out, start.elapsed())
    }

    pub fn summary(&self) -> String {
        format!(
            "Processing time: {:.3}  Drawing time: {:.3}",
            self.processing.as_secs_f64(),
            self.drawing.as_secs_f64()
        )
    }
}
