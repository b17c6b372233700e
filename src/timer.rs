//! Timer state machine with drift-free timekeeping.
//!
//! A running timer never accumulates per-tick deltas. It remembers the wall
//! clock and the displayed seconds at the moment it was started, and every
//! tick recomputes the display from `now - start`. Late, throttled or skipped
//! ticks therefore cannot make the timer drift; the next tick simply lands on
//! the correct value.
//!
//! All transitions are plain methods on [`TimerState`] taking the current time
//! where it matters, so the scheduler (a browser interval, a test loop) stays
//! outside the state machine.

use crate::config::{MAX_HOURS, MAX_MINUTES, MAX_SECONDS};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TimerMode {
    CountDown,
    CountUp,
}

impl TimerMode {
    pub fn label(self) -> &'static str {
        match self {
            TimerMode::CountDown => "Countdown",
            TimerMode::CountUp => "Stopwatch",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TimerPhase {
    Idle,
    Running,
    /// Countdown reached zero; stays here until acknowledged or reset.
    Alarming,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimeUnit {
    Hours,
    Minutes,
    Seconds,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    Up,
    Down,
}

/// A configured duration. Fields stay within 0-23 / 0-59 / 0-59.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Hms {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl Hms {
    /// Build a duration, clamping each unit to its maximum.
    pub fn new(hours: u8, minutes: u8, seconds: u8) -> Self {
        Self {
            hours: hours.min(MAX_HOURS),
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    pub fn total_secs(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    pub fn get(&self, unit: TimeUnit) -> u8 {
        match unit {
            TimeUnit::Hours => self.hours,
            TimeUnit::Minutes => self.minutes,
            TimeUnit::Seconds => self.seconds,
        }
    }

    /// Move one unit by one step, wrapping at both ends.
    pub fn stepped(self, unit: TimeUnit, step: Step) -> Self {
        let modulus: i16 = match unit {
            TimeUnit::Hours => MAX_HOURS as i16 + 1,
            TimeUnit::Minutes => MAX_MINUTES as i16 + 1,
            TimeUnit::Seconds => MAX_SECONDS as i16 + 1,
        };
        let delta = match step {
            Step::Up => 1,
            Step::Down => -1,
        };
        let value = (self.get(unit) as i16 + delta).rem_euclid(modulus) as u8;

        let mut next = self;
        match unit {
            TimeUnit::Hours => next.hours = value,
            TimeUnit::Minutes => next.minutes = value,
            TimeUnit::Seconds => next.seconds = value,
        }
        next
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Zero-padded display components of a second count.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Readout {
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Readout {
    pub fn from_secs(total: u32) -> Self {
        Self {
            hours: format!("{:02}", total / 3600),
            minutes: format!("{:02}", (total % 3600) / 60),
            seconds: format!("{:02}", total % 60),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hours, self.minutes, self.seconds)
    }
}

#[derive(Clone, Debug)]
pub struct TimerState {
    mode: TimerMode,
    phase: TimerPhase,
    duration: Hms,
    target_secs: u32,
    total_secs: u32,
    start_wall_ms: u64,
    start_secs: u32,
}

impl TimerState {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            phase: TimerPhase::Idle,
            duration: Hms::default(),
            target_secs: 0,
            total_secs: 0,
            start_wall_ms: 0,
            start_secs: 0,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn duration(&self) -> Hms {
        self.duration
    }

    pub fn target_secs(&self) -> u32 {
        self.target_secs
    }

    pub fn total_secs(&self) -> u32 {
        self.total_secs
    }

    pub fn readout(&self) -> Readout {
        Readout::from_secs(self.total_secs)
    }

    pub fn set_mode(&mut self, mode: TimerMode) {
        if self.is_running() {
            debug!("mode change ignored while running");
            return;
        }
        self.mode = mode;
        self.reset();
    }

    pub fn set_duration(&mut self, hours: u8, minutes: u8, seconds: u8) {
        if self.is_running() {
            debug!("duration change ignored while running");
            return;
        }
        if self.phase == TimerPhase::Alarming {
            self.acknowledge_alarm();
        }
        self.duration = Hms::new(hours, minutes, seconds);
        self.target_secs = self.duration.total_secs();
        if self.mode == TimerMode::CountDown {
            self.total_secs = self.target_secs;
        }
    }

    pub fn step_duration(&mut self, unit: TimeUnit, step: Step) {
        if self.is_running() {
            debug!("duration step ignored while running");
            return;
        }
        let next = self.duration.stepped(unit, step);
        self.set_duration(next.hours, next.minutes, next.seconds);
    }

    pub fn start(&mut self, now_ms: u64) {
        if self.is_running() {
            return;
        }
        if self.mode == TimerMode::CountDown && self.total_secs == 0 {
            debug!("start ignored: nothing to count down");
            return;
        }
        self.start_wall_ms = now_ms;
        self.start_secs = self.total_secs;
        self.phase = TimerPhase::Running;
    }

    /// Recompute the display from elapsed wall-clock time.
    ///
    /// Returns true when the displayed seconds or the phase changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.is_running() {
            return false;
        }
        let elapsed_secs = (now_ms.saturating_sub(self.start_wall_ms) / 1000)
            .min(u32::MAX as u64) as u32;
        let before = self.total_secs;

        match self.mode {
            TimerMode::CountUp => {
                self.total_secs = self.start_secs.saturating_add(elapsed_secs);
            }
            TimerMode::CountDown => {
                self.total_secs = self.start_secs.saturating_sub(elapsed_secs);
                if self.total_secs == 0 {
                    self.phase = TimerPhase::Alarming;
                    return true;
                }
            }
        }
        self.total_secs != before
    }

    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.phase = TimerPhase::Idle;
    }

    pub fn reset(&mut self) {
        self.phase = TimerPhase::Idle;
        self.total_secs = match self.mode {
            TimerMode::CountDown => self.target_secs,
            TimerMode::CountUp => 0,
        };
    }

    pub fn acknowledge_alarm(&mut self) {
        if self.phase == TimerPhase::Alarming {
            self.phase = TimerPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countdown(h: u8, m: u8, s: u8) -> TimerState {
        let mut t = TimerState::new(TimerMode::CountDown);
        t.set_duration(h, m, s);
        t
    }

    #[test]
    fn test_set_duration_total() {
        for &(h, m, s) in &[(0, 0, 0), (0, 0, 59), (1, 2, 3), (23, 59, 59), (12, 0, 30)] {
            let t = countdown(h, m, s);
            assert_eq!(
                t.total_secs(),
                h as u32 * 3600 + m as u32 * 60 + s as u32
            );
            assert_eq!(t.target_secs(), t.total_secs());
        }
    }

    #[test]
    fn test_set_duration_clamps_out_of_range() {
        let t = countdown(30, 75, 99);
        assert_eq!(t.duration(), Hms::new(23, 59, 59));
    }

    #[test]
    fn test_step_wraps() {
        let hms = Hms::new(23, 59, 59);
        assert_eq!(hms.stepped(TimeUnit::Hours, Step::Up).hours, 0);
        assert_eq!(hms.stepped(TimeUnit::Minutes, Step::Up).minutes, 0);
        assert_eq!(hms.stepped(TimeUnit::Seconds, Step::Up).seconds, 0);

        let zero = Hms::default();
        assert_eq!(zero.stepped(TimeUnit::Hours, Step::Down).hours, 23);
        assert_eq!(zero.stepped(TimeUnit::Minutes, Step::Down).minutes, 59);
        assert_eq!(zero.stepped(TimeUnit::Seconds, Step::Down).seconds, 59);
    }

    #[test]
    fn test_step_duration_updates_countdown_total() {
        let mut t = TimerState::new(TimerMode::CountDown);
        t.step_duration(TimeUnit::Minutes, Step::Up);
        t.step_duration(TimeUnit::Seconds, Step::Down);
        assert_eq!(t.duration(), Hms::new(0, 1, 59));
        assert_eq!(t.total_secs(), 119);
    }

    #[test]
    fn test_countdown_reaches_zero_and_alarms() {
        let mut t = countdown(0, 0, 5);
        t.start(10_000);
        assert!(t.is_running());

        assert!(t.tick(12_000));
        assert_eq!(t.total_secs(), 3);

        assert!(t.tick(15_000));
        assert_eq!(t.total_secs(), 0);
        assert!(!t.is_running());
        assert_eq!(t.phase(), TimerPhase::Alarming);

        // Further ticks are inert.
        assert!(!t.tick(20_000));
        assert_eq!(t.phase(), TimerPhase::Alarming);
    }

    #[test]
    fn test_countdown_overshoot_floors_at_zero() {
        let mut t = countdown(0, 0, 5);
        t.start(0);
        t.tick(60_000);
        assert_eq!(t.total_secs(), 0);
        assert_eq!(t.phase(), TimerPhase::Alarming);
    }

    #[test]
    fn test_countdown_start_at_zero_is_noop() {
        let mut t = TimerState::new(TimerMode::CountDown);
        t.start(0);
        assert!(!t.is_running());
        assert_eq!(t.phase(), TimerPhase::Idle);
    }

    #[test]
    fn test_countup_anchors_to_start() {
        let mut t = TimerState::new(TimerMode::CountUp);
        t.start(1_000);
        t.tick(4_000);
        assert_eq!(t.total_secs(), 3);
        // Ticks between 4s and 6s were skipped entirely.
        t.tick(6_000);
        assert_eq!(t.total_secs(), 5);
    }

    #[test]
    fn test_partial_seconds_are_floored() {
        let mut t = TimerState::new(TimerMode::CountUp);
        t.start(0);
        assert!(!t.tick(999));
        assert_eq!(t.total_secs(), 0);
        assert!(t.tick(1_000));
        assert_eq!(t.total_secs(), 1);
    }

    #[test]
    fn test_stop_then_start_resumes() {
        let mut t = countdown(0, 1, 0);
        t.start(0);
        t.tick(10_000);
        t.stop();
        assert_eq!(t.total_secs(), 50);
        assert!(!t.is_running());

        // Time passes while stopped; nothing changes.
        assert!(!t.tick(100_000));
        assert_eq!(t.total_secs(), 50);

        t.start(200_000);
        t.tick(205_000);
        assert_eq!(t.total_secs(), 45);
    }

    #[test]
    fn test_start_while_running_keeps_anchor() {
        let mut t = TimerState::new(TimerMode::CountUp);
        t.start(0);
        t.start(5_000);
        t.tick(6_000);
        assert_eq!(t.total_secs(), 6);
    }

    #[test]
    fn test_reset_from_alarming() {
        let mut t = countdown(0, 0, 2);
        t.start(0);
        t.tick(2_000);
        assert_eq!(t.phase(), TimerPhase::Alarming);
        t.reset();
        assert_eq!(t.phase(), TimerPhase::Idle);
        assert_eq!(t.total_secs(), 2);
    }

    #[test]
    fn test_reset_countup_goes_to_zero() {
        let mut t = TimerState::new(TimerMode::CountUp);
        t.start(0);
        t.tick(7_000);
        t.reset();
        assert!(!t.is_running());
        assert_eq!(t.total_secs(), 0);
    }

    #[test]
    fn test_mode_change_only_when_not_running() {
        let mut t = countdown(0, 0, 30);
        t.start(0);
        t.set_mode(TimerMode::CountUp);
        assert_eq!(t.mode(), TimerMode::CountDown);

        t.stop();
        t.set_mode(TimerMode::CountUp);
        assert_eq!(t.mode(), TimerMode::CountUp);
        assert_eq!(t.total_secs(), 0);

        t.set_mode(TimerMode::CountDown);
        assert_eq!(t.total_secs(), 30);
    }

    #[test]
    fn test_duration_ignored_while_running() {
        let mut t = countdown(0, 0, 30);
        t.start(0);
        t.set_duration(0, 5, 0);
        t.step_duration(TimeUnit::Hours, Step::Up);
        assert_eq!(t.target_secs(), 30);
    }

    #[test]
    fn test_set_duration_while_alarming_acknowledges() {
        let mut t = countdown(0, 0, 1);
        t.start(0);
        t.tick(1_000);
        t.set_duration(0, 0, 10);
        assert_eq!(t.phase(), TimerPhase::Idle);
        assert_eq!(t.total_secs(), 10);
    }

    #[test]
    fn test_acknowledge_leaves_zero() {
        let mut t = countdown(0, 0, 1);
        t.start(0);
        t.tick(1_500);
        t.acknowledge_alarm();
        assert_eq!(t.phase(), TimerPhase::Idle);
        assert_eq!(t.total_secs(), 0);
    }

    #[test]
    fn test_clock_going_backwards() {
        let mut t = TimerState::new(TimerMode::CountUp);
        t.start(10_000);
        assert!(!t.tick(5_000));
        assert_eq!(t.total_secs(), 0);
    }

    #[test]
    fn test_readout_padding() {
        assert_eq!(Readout::from_secs(0).to_string(), "00:00:00");
        assert_eq!(Readout::from_secs(3_661).to_string(), "01:01:01");
        assert_eq!(Readout::from_secs(100 * 3600).hours, "100");
        assert_eq!(Hms::new(1, 2, 3).to_string(), "01:02:03");
    }
}
