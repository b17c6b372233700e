//! The shared alarm signal.
//!
//! One [`AlarmSignal`] exists per app and is handed to every card. It keeps the
//! set of cards currently alarming and drives a single [`AlarmSink`]: the sound
//! starts when the first card raises and stops only when the last one clears,
//! so acknowledging one card never silences another card's alarm.

use log::{debug, info};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;

/// Identifies one card for the lifetime of the app.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "card#{}", self.0)
    }
}

/// Something that can make (or fake) an alarm sound.
///
/// Both operations must be idempotent and must never fail loudly: an alarm
/// that cannot sound is still an alarm as far as the timers are concerned.
pub trait AlarmSink {
    /// Begin the looping signal.
    fn play(&mut self);
    /// Halt the loop and cut off any tone that is still sounding.
    fn stop(&mut self);
    /// Called from a user gesture so a later `play` is allowed to make sound.
    fn prime(&mut self) {}
}

/// A sink that never makes a sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AlarmSink for SilentSink {
    fn play(&mut self) {}
    fn stop(&mut self) {}
}

pub struct AlarmSignal {
    sink: RefCell<Box<dyn AlarmSink>>,
    alarming: RefCell<BTreeSet<CardId>>,
}

impl AlarmSignal {
    pub fn new(sink: impl AlarmSink + 'static) -> Self {
        Self {
            sink: RefCell::new(Box::new(sink)),
            alarming: RefCell::new(BTreeSet::new()),
        }
    }

    pub fn silent() -> Self {
        Self::new(SilentSink)
    }

    /// Mark `card` as alarming. Plays the sink if nothing was sounding yet.
    pub fn raise(&self, card: CardId) {
        let first = {
            let mut alarming = self.alarming.borrow_mut();
            let was_empty = alarming.is_empty();
            alarming.insert(card) && was_empty
        };
        if first {
            info!("alarm started by {}", card);
            self.sink.borrow_mut().play();
        } else {
            debug!("{} joined an alarm already sounding", card);
        }
    }

    /// Clear `card`. Stops the sink once no card is alarming.
    pub fn clear(&self, card: CardId) {
        let last = {
            let mut alarming = self.alarming.borrow_mut();
            alarming.remove(&card) && alarming.is_empty()
        };
        if last {
            info!("alarm stopped by {}", card);
            self.sink.borrow_mut().stop();
        }
    }

    pub fn silence_all(&self) {
        let had_any = {
            let mut alarming = self.alarming.borrow_mut();
            let had_any = !alarming.is_empty();
            alarming.clear();
            had_any
        };
        if had_any {
            self.sink.borrow_mut().stop();
        }
    }

    pub fn prime(&self) {
        self.sink.borrow_mut().prime();
    }

    pub fn is_sounding(&self) -> bool {
        !self.alarming.borrow().is_empty()
    }

    pub fn is_alarming(&self, card: CardId) -> bool {
        self.alarming.borrow().contains(&card)
    }

    pub fn alarming_count(&self) -> usize {
        self.alarming.borrow().len()
    }
}

impl fmt::Debug for AlarmSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlarmSignal")
            .field("alarming", &*self.alarming.borrow())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts calls instead of making sound.
    #[derive(Clone, Default)]
    pub(crate) struct CountingSink {
        pub plays: Rc<Cell<u32>>,
        pub stops: Rc<Cell<u32>>,
        pub primes: Rc<Cell<u32>>,
    }

    impl AlarmSink for CountingSink {
        fn play(&mut self) {
            self.plays.set(self.plays.get() + 1);
        }
        fn stop(&mut self) {
            self.stops.set(self.stops.get() + 1);
        }
        fn prime(&mut self) {
            self.primes.set(self.primes.get() + 1);
        }
    }

    #[test]
    fn test_raise_plays_once() {
        let sink = CountingSink::default();
        let signal = AlarmSignal::new(sink.clone());
        signal.raise(CardId(1));
        signal.raise(CardId(1));
        assert_eq!(sink.plays.get(), 1);
        assert!(signal.is_sounding());
    }

    #[test]
    fn test_sound_persists_until_last_card_clears() {
        let sink = CountingSink::default();
        let signal = AlarmSignal::new(sink.clone());
        signal.raise(CardId(1));
        signal.raise(CardId(2));
        assert_eq!(sink.plays.get(), 1);
        assert_eq!(signal.alarming_count(), 2);

        signal.clear(CardId(1));
        assert_eq!(sink.stops.get(), 0);
        assert!(signal.is_sounding());
        assert!(signal.is_alarming(CardId(2)));

        signal.clear(CardId(2));
        assert_eq!(sink.stops.get(), 1);
        assert!(!signal.is_sounding());
    }

    #[test]
    fn test_clear_unknown_card_is_noop() {
        let sink = CountingSink::default();
        let signal = AlarmSignal::new(sink.clone());
        signal.clear(CardId(9));
        assert_eq!(sink.stops.get(), 0);
    }

    #[test]
    fn test_silence_all() {
        let sink = CountingSink::default();
        let signal = AlarmSignal::new(sink.clone());
        signal.silence_all();
        assert_eq!(sink.stops.get(), 0);

        signal.raise(CardId(1));
        signal.raise(CardId(2));
        signal.silence_all();
        assert_eq!(sink.stops.get(), 1);
        assert_eq!(signal.alarming_count(), 0);
    }

    #[test]
    fn test_prime_reaches_sink() {
        let sink = CountingSink::default();
        let signal = AlarmSignal::new(sink.clone());
        signal.prime();
        assert_eq!(sink.primes.get(), 1);
    }
}
