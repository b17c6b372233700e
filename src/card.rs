//! Timer card controller: one timer, its input intents and its view-model.

use crate::alarm::{AlarmSignal, CardId};
use crate::clock::Clock;
use crate::modes::TemplateKind;
use crate::timer::{Hms, Readout, Step, TimeUnit, TimerMode, TimerPhase, TimerState};
use log::{debug, info};
use std::rc::Rc;

/// User intents forwarded from the view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardIntent {
    ChangeMode(TimerMode),
    StepDuration(TimeUnit, Step),
    SetDuration(Hms),
    Start,
    Stop,
    Reset,
    AcknowledgeAlarm,
    ToggleRecording,
}

/// Everything the view needs to draw one card.
#[derive(Clone, PartialEq, Debug)]
pub struct CardView {
    pub id: CardId,
    pub label: String,
    pub readout: Readout,
    pub duration: Hms,
    pub mode: TimerMode,
    pub phase: TimerPhase,
    /// The card offers a countdown/stopwatch switch at all.
    pub mode_switch: bool,
    pub can_change_mode: bool,
    pub can_start: bool,
    pub can_edit_duration: bool,
    pub recording: Option<bool>,
}

impl CardView {
    pub fn running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn alarming(&self) -> bool {
        self.phase == TimerPhase::Alarming
    }
}

pub struct TimerCard<C: Clock> {
    id: CardId,
    label: String,
    template: TemplateKind,
    timer: TimerState,
    clock: C,
    alarm: Rc<AlarmSignal>,
    recording: Option<bool>,
    destroyed: bool,
}

impl<C: Clock> TimerCard<C> {
    pub fn new(
        id: CardId,
        label: impl Into<String>,
        template: TemplateKind,
        recording_toggle: bool,
        clock: C,
        alarm: Rc<AlarmSignal>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            template,
            timer: TimerState::new(TimerMode::CountDown),
            clock,
            alarm,
            recording: recording_toggle.then_some(false),
            destroyed: false,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether a periodic poll should be driving [`TimerCard::tick`].
    pub fn wants_polling(&self) -> bool {
        !self.destroyed && self.timer.is_running()
    }

    /// Apply one user intent. Returns true if the view changed.
    pub fn handle(&mut self, intent: CardIntent) -> bool {
        if self.destroyed {
            debug!("{}: {:?} after destroy ignored", self.id, intent);
            return false;
        }
        let before = self.view();
        match intent {
            CardIntent::ChangeMode(mode) => {
                if self.template.allows_count_up() {
                    self.transition(|t, _| t.set_mode(mode));
                } else {
                    debug!("{}: template {:?} is countdown only", self.id, self.template);
                }
            }
            CardIntent::StepDuration(unit, step) => {
                self.transition(|t, _| t.step_duration(unit, step));
            }
            CardIntent::SetDuration(hms) => {
                self.transition(|t, _| t.set_duration(hms.hours, hms.minutes, hms.seconds));
            }
            CardIntent::Start => {
                self.alarm.prime();
                self.transition(|t, now| t.start(now));
                if self.timer.is_running() {
                    info!("{} started at {}", self.id, self.timer.readout());
                }
            }
            CardIntent::Stop => self.transition(|t, _| t.stop()),
            CardIntent::Reset => self.transition(|t, _| t.reset()),
            CardIntent::AcknowledgeAlarm => self.transition(|t, _| t.acknowledge_alarm()),
            CardIntent::ToggleRecording => {
                if let Some(on) = self.recording.as_mut() {
                    *on = !*on;
                    info!("{} recording {}", self.id, if *on { "on" } else { "off" });
                }
            }
        }
        self.view() != before
    }

    /// Recompute from the clock. Returns true if the view changed.
    pub fn tick(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let mut changed = false;
        self.transition(|t, now| changed = t.tick(now));
        changed
    }

    /// Stop the timer and release this card's alarm. Idempotent; every later
    /// call into the card is a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.timer.stop();
        self.alarm.clear(self.id);
        self.destroyed = true;
        debug!("{} destroyed", self.id);
    }

    pub fn view(&self) -> CardView {
        let idle_or_alarming = !self.timer.is_running();
        CardView {
            id: self.id,
            label: self.label.clone(),
            readout: self.timer.readout(),
            duration: self.timer.duration(),
            mode: self.timer.mode(),
            phase: self.timer.phase(),
            mode_switch: self.template.allows_count_up(),
            can_change_mode: self.template.allows_count_up() && idle_or_alarming,
            can_start: match self.timer.phase() {
                TimerPhase::Idle => {
                    self.timer.mode() == TimerMode::CountUp || self.timer.total_secs() > 0
                }
                TimerPhase::Running | TimerPhase::Alarming => false,
            },
            can_edit_duration: idle_or_alarming && self.timer.mode() == TimerMode::CountDown,
            recording: self.recording,
        }
    }

    /// Run one state-machine transition and keep the shared alarm in step with
    /// the phase change it caused.
    fn transition(&mut self, f: impl FnOnce(&mut TimerState, u64)) {
        let was = self.timer.phase();
        let now = self.clock.now_ms();
        f(&mut self.timer, now);
        let is = self.timer.phase();

        match (was == TimerPhase::Alarming, is == TimerPhase::Alarming) {
            (false, true) => {
                info!("{} reached zero", self.id);
                self.alarm.raise(self.id);
            }
            (true, false) => self.alarm.clear(self.id),
            _ => {}
        }
    }
}

impl<C: Clock> Drop for TimerCard<C> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::tests::CountingSink;
    use crate::clock::ManualClock;

    fn card(template: TemplateKind, recording: bool) -> (TimerCard<ManualClock>, ManualClock, CountingSink, Rc<AlarmSignal>) {
        let clock = ManualClock::new(0);
        let sink = CountingSink::default();
        let alarm = Rc::new(AlarmSignal::new(sink.clone()));
        let card = TimerCard::new(
            CardId(1),
            "Timer 1",
            template,
            recording,
            clock.clone(),
            Rc::clone(&alarm),
        );
        (card, clock, sink, alarm)
    }

    fn run_ticks(card: &mut TimerCard<ManualClock>, clock: &ManualClock, ms: u64) {
        for _ in 0..(ms / 250) {
            clock.advance(250);
            card.tick();
        }
    }

    #[test]
    fn test_countdown_alarms_exactly_once() {
        let (mut c, clock, sink, alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::SetDuration(Hms::new(0, 0, 5)));
        c.handle(CardIntent::Start);
        assert!(c.wants_polling());

        run_ticks(&mut c, &clock, 5_000);
        assert_eq!(c.timer().total_secs(), 0);
        assert!(!c.timer().is_running());
        assert!(c.view().alarming());
        assert!(!c.wants_polling());

        // Stray ticks after expiry must not replay the alarm.
        run_ticks(&mut c, &clock, 2_000);
        assert_eq!(sink.plays.get(), 1);
        assert!(alarm.is_alarming(CardId(1)));
    }

    #[test]
    fn test_start_primes_audio() {
        let (mut c, _clock, sink, _alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::Start);
        assert_eq!(sink.primes.get(), 1);
        assert!(!c.timer().is_running());
    }

    #[test]
    fn test_acknowledge_stops_sink() {
        let (mut c, clock, sink, alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::SetDuration(Hms::new(0, 0, 1)));
        c.handle(CardIntent::Start);
        clock.advance(1_000);
        c.tick();
        assert!(c.handle(CardIntent::AcknowledgeAlarm));
        assert_eq!(sink.stops.get(), 1);
        assert!(!alarm.is_sounding());
        assert_eq!(c.timer().total_secs(), 0);
    }

    #[test]
    fn test_reset_while_alarming() {
        let (mut c, clock, sink, _alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::SetDuration(Hms::new(0, 0, 3)));
        c.handle(CardIntent::Start);
        clock.advance(3_000);
        c.tick();
        c.handle(CardIntent::Reset);
        assert_eq!(sink.stops.get(), 1);
        assert_eq!(c.view().phase, TimerPhase::Idle);
        assert_eq!(c.timer().total_secs(), 3);
    }

    #[test]
    fn test_destroy_stops_mutation() {
        let (mut c, clock, sink, _alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::SetDuration(Hms::new(0, 0, 2)));
        c.handle(CardIntent::Start);
        clock.advance(1_000);
        c.tick();
        c.destroy();
        assert!(!c.wants_polling());

        let frozen = c.timer().total_secs();
        clock.advance(10_000);
        assert!(!c.tick());
        assert!(!c.handle(CardIntent::Start));
        assert_eq!(c.timer().total_secs(), frozen);
        assert_eq!(sink.plays.get(), 0);
    }

    #[test]
    fn test_drop_clears_alarm() {
        let (mut c, clock, sink, alarm) = card(TemplateKind::SimpleCountdown, false);
        c.handle(CardIntent::SetDuration(Hms::new(0, 0, 1)));
        c.handle(CardIntent::Start);
        clock.advance(1_000);
        c.tick();
        assert!(alarm.is_sounding());
        drop(c);
        assert!(!alarm.is_sounding());
        assert_eq!(sink.stops.get(), 1);
    }

    #[test]
    fn test_mode_change_needs_triple_template() {
        let (mut simple, ..) = card(TemplateKind::SimpleCountdown, false);
        assert!(!simple.handle(CardIntent::ChangeMode(TimerMode::CountUp)));
        assert_eq!(simple.timer().mode(), TimerMode::CountDown);

        assert!(!simple.view().mode_switch);
        let (mut triple, clock, ..) = card(TemplateKind::TripleWithCountUp, false);
        assert!(triple.view().mode_switch);
        assert!(triple.view().can_change_mode);
        assert!(triple.handle(CardIntent::ChangeMode(TimerMode::CountUp)));
        assert!(triple.view().can_start);

        triple.handle(CardIntent::Start);
        assert!(!triple.view().can_change_mode);
        clock.advance(3_000);
        assert!(triple.tick());
        assert_eq!(triple.view().readout.seconds, "03");
    }

    #[test]
    fn test_recording_toggle() {
        let (mut plain, ..) = card(TemplateKind::SimpleCountdown, false);
        assert_eq!(plain.view().recording, None);
        assert!(!plain.handle(CardIntent::ToggleRecording));

        let (mut rec, ..) = card(TemplateKind::CountdownWithRecording, true);
        assert_eq!(rec.view().recording, Some(false));
        assert!(rec.handle(CardIntent::ToggleRecording));
        assert_eq!(rec.view().recording, Some(true));
    }

    #[test]
    fn test_view_flags() {
        let (mut c, ..) = card(TemplateKind::SimpleCountdown, false);
        let v = c.view();
        assert!(!v.can_start);
        assert!(v.can_edit_duration);

        c.handle(CardIntent::StepDuration(TimeUnit::Seconds, Step::Up));
        assert!(c.view().can_start);
        c.handle(CardIntent::Start);
        let v = c.view();
        assert!(v.running());
        assert!(!v.can_edit_duration);
        assert!(!v.can_start);
    }
}
