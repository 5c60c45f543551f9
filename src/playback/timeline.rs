//! The playback surface the scheduler calls into, plus a minimal reference
//! implementation.
//!
//! Real players own actual clocks and audio; [`Timeline`] only tracks a frame
//! counter with a rational speed accumulator, which is enough for tests, demos, and
//! headless timeline discovery.

use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CadenzaError, CadenzaResult};

/// Rational playback rate (frames advanced per tick = `num / den`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Speed {
    /// Numerator, must be > 0.
    pub num: u32,
    /// Denominator, must be > 0.
    pub den: u32,
}

impl Speed {
    /// Validated constructor.
    pub fn new(num: u32, den: u32) -> CadenzaResult<Self> {
        if num == 0 {
            return Err(CadenzaError::validation("Speed num must be > 0"));
        }
        if den == 0 {
            return Err(CadenzaError::validation("Speed den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Real-time playback (1/1).
    pub fn normal() -> Self {
        Self { num: 1, den: 1 }
    }

    /// The rate as a float, for display purposes.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::normal()
    }
}

/// What the scheduler needs from whatever tracks logical time.
pub trait Playback {
    /// Current integer frame.
    fn frame(&self) -> FrameIndex;
    /// Current playback rate.
    fn speed(&self) -> Speed;
    /// Jump to `frame`.
    fn seek(&mut self, frame: FrameIndex) -> CadenzaResult<()>;
    /// Advance by one tick at the current speed.
    fn advance_time(&mut self) -> CadenzaResult<()>;
}

/// Shared, single-threaded handle to a playback surface.
pub type SharedPlayback = Rc<RefCell<dyn Playback>>;

/// Minimal playback: a frame counter with exact rational speed accumulation.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    frame: FrameIndex,
    speed: Speed,
    carry: u32,
}

impl Timeline {
    /// Timeline at frame 0, normal speed.
    pub fn new() -> Self {
        Self::with_speed(Speed::normal())
    }

    /// Timeline at frame 0 with the given rate.
    pub fn with_speed(speed: Speed) -> Self {
        Self {
            frame: FrameIndex(0),
            speed,
            carry: 0,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Playback for Timeline {
    fn frame(&self) -> FrameIndex {
        self.frame
    }

    fn speed(&self) -> Speed {
        self.speed
    }

    fn seek(&mut self, frame: FrameIndex) -> CadenzaResult<()> {
        self.frame = frame;
        self.carry = 0;
        Ok(())
    }

    fn advance_time(&mut self) -> CadenzaResult<()> {
        // Integer accumulation keeps fractional rates exact.
        self.carry += self.speed.num;
        self.frame = self.frame.advanced(u64::from(self.carry / self.speed.den));
        self.carry %= self.speed.den;
        Ok(())
    }
}
