//! Frame-driven bounce simulation.
//!
//! The ball's center moves along x inside `[radius, box_size - radius]`.
//! Every frame integrates `velocity * dt`; if that carries the leading edge
//! past a wall the position is clamped to the wall, the direction flips and
//! a [`Bounce`] is reported in the same frame. There is no interpolation
//! back to the exact contact time, so a very long frame simply lands on the
//! wall.

use crate::settings::Settings;
use glam::Vec2;
use instant::Instant;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounce {
    pub wall: Wall,
    pub position: f64,
}

/// Live motion of the ball. Never persisted.
#[derive(Clone, Debug)]
pub struct MotionState {
    pub position: f64,
    pub direction: Direction,
    pub speed: f64,
    pub center_y: f64,
    pub last_update: Option<Instant>,
}

impl MotionState {
    /// Signed velocity in px/s.
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.direction.sign() * self.speed
    }
}

#[derive(Clone, Debug)]
pub struct BounceSimulation {
    pub motion: MotionState,
    box_size: f64,
    radius: f64,
}

impl BounceSimulation {
    /// Ball starts against the left wall heading right.
    pub fn new(settings: &Settings) -> Self {
        let radius = settings.ball_radius();
        let box_size = settings.box_size as f64;
        Self {
            motion: MotionState {
                position: radius,
                direction: Direction::Right,
                speed: settings.ball_speed as f64,
                center_y: box_size / 2.0,
                last_update: None,
            },
            box_size,
            radius,
        }
    }

    #[inline]
    pub fn bounds(&self) -> (f64, f64) {
        (self.radius, self.box_size - self.radius)
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn box_size(&self) -> f64 {
        self.box_size
    }

    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.box_size - 2.0 * self.radius <= 0.0 || self.motion.speed <= 0.0
    }

    /// Advance by `dt` and report a bounce if a wall was hit this frame.
    pub fn advance(&mut self, dt: Duration) -> Option<Bounce> {
        if self.is_stationary() {
            return None;
        }
        let m = &mut self.motion;
        m.position += m.velocity() * dt.as_secs_f64();

        let (min, max) = (self.radius, self.box_size - self.radius);
        if m.position > max {
            m.position = max;
            // A ball left outside by a shrinking box is only pulled back in.
            if m.direction == Direction::Right {
                m.direction = Direction::Left;
                return Some(Bounce {
                    wall: Wall::Right,
                    position: max,
                });
            }
        } else if m.position < min {
            m.position = min;
            if m.direction == Direction::Left {
                m.direction = Direction::Right;
                return Some(Bounce {
                    wall: Wall::Left,
                    position: min,
                });
            }
        }
        None
    }

    /// Advance to `now`, measuring dt from the previous call.
    ///
    /// The first call only records the timestamp.
    pub fn step(&mut self, now: Instant) -> Option<Bounce> {
        let dt = match self.motion.last_update {
            Some(last) if now > last => now - last,
            _ => Duration::ZERO,
        };
        self.motion.last_update = Some(now);
        self.advance(dt)
    }

    /// Record `now` as the last update without moving, so time spent paused
    /// is not integrated on the next step.
    #[inline]
    pub fn hold(&mut self, now: Instant) {
        self.motion.last_update = Some(now);
    }

    #[inline]
    pub fn reverse(&mut self) {
        self.motion.direction = self.motion.direction.reversed();
    }

    /// Only the magnitude changes; the current heading is kept.
    #[inline]
    pub fn set_speed(&mut self, speed: i32) {
        self.motion.speed = speed as f64;
    }

    /// Resizing the box re-centers the orthogonal axis only.
    pub fn set_box_size(&mut self, box_size: i32) {
        self.box_size = box_size as f64;
        self.motion.center_y = self.box_size / 2.0;
    }

    #[inline]
    pub fn set_ball_size(&mut self, ball_size: i32) {
        self.radius = ball_size as f64 / 2.0;
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.motion.position as f32, self.motion.center_y as f32)
    }
}
