use std::time::{Duration, Instant};

/// What a simulation wants after being ticked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Idle,
}

/// Anything advanced once per display refresh.
pub trait Simulation {
    fn tick(&mut self, dt: Duration) -> Tick;
}

/// Feeds frame callbacks to a set of simulations and tracks whether any of
/// them still needs the frame clock.
#[derive(Debug)]
pub struct Driver {
    last_frame: Option<Instant>,
    max_step: Duration,
    awake: bool,
    frames: u64,
}

impl Driver {
    pub fn new(max_step: Duration) -> Self {
        Driver {
            last_frame: None,
            max_step,
            awake: true,
            frames: 0,
        }
    }

    /// Runs one frame. The first frame after waking uses a zero step.
    pub fn frame(&mut self, now: Instant, simulations: &mut [&mut dyn Simulation]) -> bool {
        let dt = match self.last_frame {
            Some(last) => now.saturating_duration_since(last).min(self.max_step),
            None => Duration::from_secs(0),
        };
        self.last_frame = Some(now);
        self.frames += 1;

        let mut keep = false;
        for simulation in simulations.iter_mut() {
            if simulation.tick(dt) == Tick::Continue {
                keep = true;
            }
        }

        if !keep {
            self.sleep();
        }
        keep
    }

    pub fn wake(&mut self) {
        self.awake = true;
    }

    pub fn sleep(&mut self) {
        self.awake = false;
        self.last_frame = None;
    }

    pub fn is_awake(&self) -> bool {
        self.awake
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Countdown {
        left: u32,
        seen: Vec<Duration>,
    }

    impl Simulation for Countdown {
        fn tick(&mut self, dt: Duration) -> Tick {
            self.seen.push(dt);
            if self.left == 0 {
                return Tick::Idle;
            }
            self.left -= 1;
            Tick::Continue
        }
    }

    #[test]
    fn sleeps_once_every_simulation_is_idle() {
        let mut driver = Driver::new(Duration::from_millis(100));
        let mut a = Countdown {
            left: 1,
            seen: Vec::new(),
        };
        let mut b = Countdown {
            left: 3,
            seen: Vec::new(),
        };
        let start = Instant::now();

        let mut frames = 0;
        while driver.frame(start + Duration::from_millis(16 * frames), &mut [&mut a, &mut b]) {
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert!(!driver.is_awake());

        driver.wake();
        assert!(driver.is_awake());
    }

    #[test]
    fn step_is_clamped_and_reset_after_sleep() {
        let mut driver = Driver::new(Duration::from_millis(100));
        let mut sim = Countdown {
            left: 10,
            seen: Vec::new(),
        };
        let start = Instant::now();
        driver.frame(start, &mut [&mut sim]);
        driver.frame(start + Duration::from_secs(5), &mut [&mut sim]);
        driver.sleep();
        driver.frame(start + Duration::from_secs(6), &mut [&mut sim]);

        assert_eq!(
            sim.seen,
            vec![
                Duration::from_secs(0),
                Duration::from_millis(100),
                Duration::from_secs(0)
            ]
        );
    }
}
