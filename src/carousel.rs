use std::time::Duration;

use crate::driver::{Simulation, Tick};
use crate::error::CarouselError;
use crate::parameters::CarouselParameters;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    /// Auto-advancing; the field is the time left until the next advance.
    Idle(Duration),
    Dragging { origin: f32, offset: f32 },
    /// Paused after an interaction; the field is the time left to resume.
    PendingResume(Duration),
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Where an item sits relative to the active one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Center,
    Beside(Side),
    Hidden(Side),
}

impl Slot {
    pub fn scale(self) -> f32 {
        match self {
            Slot::Center => 1.05,
            Slot::Beside(_) => 0.85,
            Slot::Hidden(_) => 0.7,
        }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Slot::Center => 1.0,
            Slot::Beside(_) => 0.7,
            Slot::Hidden(_) => 0.0,
        }
    }

    /// Horizontal shift as a fraction of the card width.
    pub fn shift(self) -> f32 {
        match self {
            Slot::Center => 0.0,
            Slot::Beside(Side::Right) => 0.5,
            Slot::Beside(Side::Left) => -0.5,
            Slot::Hidden(Side::Right) => 1.0,
            Slot::Hidden(Side::Left) => -1.0,
        }
    }
}

/// Cyclic index over a fixed list, advanced by a timer or a drag.
#[derive(Debug)]
pub struct Carousel {
    parameters: CarouselParameters,
    len: usize,
    index: usize,
    phase: Phase,
}

impl Carousel {
    pub fn new(len: usize, parameters: CarouselParameters) -> Result<Self, CarouselError> {
        if len == 0 {
            return Err(CarouselError::Empty);
        }
        let index = if len >= 3 { 1 } else { 0 };
        let phase = Phase::Idle(parameters.advance_interval());
        Ok(Carousel {
            parameters,
            len,
            index,
            phase,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % self.len;
    }

    pub fn previous(&mut self) {
        self.index = (self.index + self.len - 1) % self.len;
    }

    /// Manual navigation pauses auto-advance like a drag does.
    pub fn navigate(&mut self, forward: bool) {
        if self.phase == Phase::Stopped {
            return;
        }
        if forward {
            self.next();
        } else {
            self.previous();
        }
        self.pause();
    }

    pub fn begin_drag(&mut self, x: f32) {
        if self.phase == Phase::Stopped {
            return;
        }
        log::debug!("carousel drag started at {}", x);
        self.phase = Phase::Dragging {
            origin: x,
            offset: 0.0,
        };
    }

    pub fn drag_to(&mut self, x: f32) {
        if let Phase::Dragging { origin, .. } = self.phase {
            self.phase = Phase::Dragging {
                origin,
                offset: x - origin,
            };
        }
    }

    #[cfg(test)]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Finishes a drag. Returns whether the index changed.
    pub fn end_drag(&mut self) -> bool {
        let offset = match self.phase {
            Phase::Dragging { offset, .. } => offset,
            _ => return false,
        };

        let threshold = self.parameters.drag_threshold;
        let changed = if offset > threshold {
            self.previous();
            true
        } else if offset < -threshold {
            self.next();
            true
        } else {
            false
        };
        log::debug!(
            "carousel drag ended with offset {}, index {}",
            offset,
            self.index
        );
        self.pause();
        changed
    }

    fn pause(&mut self) {
        self.phase = Phase::PendingResume(self.parameters.resume_delay());
    }

    /// Advances timers by `dt`. Returns whether the index changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        match self.phase {
            Phase::Idle(remaining) => {
                let interval = self.parameters.advance_interval();
                let mut remaining = remaining;
                let mut elapsed = dt;
                let mut changed = false;
                while elapsed >= remaining && interval > Duration::from_millis(0) {
                    elapsed -= remaining;
                    remaining = interval;
                    self.next();
                    changed = true;
                }
                self.phase = Phase::Idle(remaining - elapsed);
                changed
            }
            Phase::PendingResume(remaining) => {
                if dt >= remaining {
                    log::debug!("carousel auto-advance resumed");
                    self.phase = Phase::Idle(self.parameters.advance_interval());
                } else {
                    self.phase = Phase::PendingResume(remaining - dt);
                }
                false
            }
            Phase::Dragging { .. } | Phase::Stopped => false,
        }
    }

    pub fn stop(&mut self) {
        self.phase = Phase::Stopped;
    }

    pub fn slot(&self, item: usize) -> Slot {
        let offset = (item + self.len - self.index % self.len) % self.len;
        if offset == 0 {
            Slot::Center
        } else if offset == 1 {
            Slot::Beside(Side::Right)
        } else if offset == self.len - 1 {
            Slot::Beside(Side::Left)
        } else if (offset as f32) < self.len as f32 / 2.0 {
            Slot::Hidden(Side::Right)
        } else {
            Slot::Hidden(Side::Left)
        }
    }
}

impl Simulation for Carousel {
    fn tick(&mut self, dt: Duration) -> Tick {
        if self.phase == Phase::Stopped {
            return Tick::Idle;
        }
        self.advance(dt);
        Tick::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn carousel(len: usize) -> Carousel {
        Carousel::new(len, CarouselParameters::default()).unwrap()
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(
            Carousel::new(0, CarouselParameters::default()).unwrap_err(),
            CarouselError::Empty
        );
    }

    #[test]
    fn starts_on_second_item_when_three_or_more() {
        assert_eq!(carousel(3).index(), 1);
        assert_eq!(carousel(2).index(), 0);
        assert_eq!(carousel(1).index(), 0);
    }

    #[test]
    fn ticks_cycle_back_to_start() {
        let mut c = carousel(3);
        let mut seen = Vec::new();
        for _ in 0..3 {
            assert!(c.advance(ms(5000)));
            seen.push(c.index());
        }
        assert_eq!(seen, vec![2, 0, 1]);
    }

    #[test]
    fn partial_frames_accumulate() {
        let mut c = carousel(3);
        for _ in 0..4 {
            assert!(!c.advance(ms(1000)));
        }
        assert!(c.advance(ms(1000)));
        assert_eq!(c.index(), 2);
        assert_eq!(c.phase(), Phase::Idle(ms(5000)));
    }

    #[test]
    fn drag_of_exactly_threshold_keeps_index() {
        let mut c = carousel(3);
        c.begin_drag(100.0);
        c.drag_to(150.0);
        assert!(!c.end_drag());
        assert_eq!(c.index(), 1);

        c.begin_drag(100.0);
        c.drag_to(50.0);
        assert!(!c.end_drag());
        assert_eq!(c.index(), 1);
    }

    #[test]
    fn drag_past_threshold_moves_one_step() {
        let mut c = carousel(3);
        c.begin_drag(0.0);
        c.drag_to(51.0);
        assert!(c.end_drag());
        assert_eq!(c.index(), 0);

        c.begin_drag(0.0);
        c.drag_to(-51.0);
        assert!(c.end_drag());
        assert_eq!(c.index(), 1);

        c.begin_drag(0.0);
        c.drag_to(-400.0);
        assert!(c.end_drag());
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn timer_is_silent_while_dragging() {
        let mut c = carousel(3);
        c.begin_drag(0.0);
        assert!(!c.advance(ms(60_000)));
        assert!(c.is_dragging());
    }

    #[test]
    fn resume_waits_for_the_full_delay() {
        let mut c = carousel(3);
        c.advance(ms(4900));
        c.begin_drag(0.0);
        c.end_drag();
        assert_eq!(c.phase(), Phase::PendingResume(ms(7000)));

        // tick interval is shorter than the resume delay
        assert!(!c.advance(ms(5000)));
        assert!(!c.advance(ms(1999)));
        assert_eq!(c.index(), 1);
        assert!(!c.advance(ms(1)));
        assert_eq!(c.phase(), Phase::Idle(ms(5000)));

        assert!(!c.advance(ms(4999)));
        assert!(c.advance(ms(1)));
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn drag_during_resume_cancels_the_countdown() {
        let mut c = carousel(3);
        c.navigate(true);
        assert_eq!(c.phase(), Phase::PendingResume(ms(7000)));

        c.begin_drag(0.0);
        assert!(!c.advance(ms(3000)));
        assert!(!c.advance(ms(5000)));
        assert!(c.is_dragging());
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn navigation_rearms_resume() {
        let mut c = carousel(3);
        c.navigate(true);
        assert_eq!(c.index(), 2);
        c.advance(ms(6000));
        c.navigate(false);
        assert_eq!(c.index(), 1);
        assert_eq!(c.phase(), Phase::PendingResume(ms(7000)));
    }

    #[test]
    fn stopped_carousel_is_inert() {
        let mut c = carousel(3);
        c.stop();
        c.begin_drag(0.0);
        c.navigate(true);
        assert!(!c.advance(ms(60_000)));
        assert_eq!(c.index(), 1);
        assert_eq!(c.tick(ms(16)), Tick::Idle);
    }

    #[test]
    fn slots_place_neighbours_around_center() {
        let c = carousel(3);
        assert_eq!(c.slot(1), Slot::Center);
        assert_eq!(c.slot(2), Slot::Beside(Side::Right));
        assert_eq!(c.slot(0), Slot::Beside(Side::Left));

        let mut c = carousel(5);
        c.next();
        assert_eq!(c.index(), 2);
        assert_eq!(c.slot(4), Slot::Hidden(Side::Right));
        assert_eq!(c.slot(0), Slot::Hidden(Side::Left));
    }

    #[test]
    fn small_lists_degrade_gracefully() {
        let c = carousel(1);
        assert_eq!(c.slot(0), Slot::Center);

        let mut c = carousel(2);
        assert_eq!(c.slot(1), Slot::Beside(Side::Right));
        c.navigate(true);
        c.navigate(true);
        assert_eq!(c.index(), 0);
    }
}
