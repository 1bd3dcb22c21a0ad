//! Rising-edge detector for the session-start button.
//!
//! The button level is sampled once per loop iteration.  A press is
//! reported exactly once, on the sample where the level goes from
//! inactive to active; holding the button produces nothing further until
//! it is released and pressed again.  The input is assumed electrically
//! stable, so there is no software debounce window here.

#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeDetector {
    previous: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { previous: false }
    }

    /// Feed the current level.  Returns `true` on a rising edge only.
    pub fn update(&mut self, level: bool) -> bool {
        let rising = level && !self.previous;
        self.previous = level;
        rising
    }

    /// Level seen on the last call to [`update`](Self::update).
    pub const fn previous(&self) -> bool {
        self.previous
    }
}
