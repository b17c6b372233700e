//! App controller: the mode-selection screen and the timer screen.
//!
//! Switching screens destroys every card (silencing its alarm) before the new
//! set is built, so nothing from an old screen can keep ticking or ringing.

use crate::alarm::{AlarmSignal, CardId};
use crate::card::{CardIntent, CardView, TimerCard};
use crate::clock::Clock;
use crate::modes::ModeKey;
use log::{debug, info};
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Screen {
    ModeSelect,
    Timers(ModeKey),
}

pub struct AppController<C: Clock + Clone> {
    clock: C,
    alarm: Rc<AlarmSignal>,
    screen: Screen,
    cards: Vec<TimerCard<C>>,
    next_card_id: u32,
    generation: u32,
}

impl<C: Clock + Clone> AppController<C> {
    pub fn new(clock: C, alarm: Rc<AlarmSignal>) -> Self {
        Self {
            clock,
            alarm,
            screen: Screen::ModeSelect,
            cards: Vec::new(),
            next_card_id: 0,
            generation: 0,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Bumped every time the card set is rebuilt.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn alarm(&self) -> &Rc<AlarmSignal> {
        &self.alarm
    }

    pub fn cards(&self) -> &[TimerCard<C>] {
        &self.cards
    }

    pub fn views(&self) -> Vec<CardView> {
        self.cards.iter().map(TimerCard::view).collect()
    }

    /// Indices of cards that currently need a poll.
    pub fn polling_cards(&self) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.wants_polling())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn enter_mode(&mut self, key: ModeKey) {
        self.teardown();

        let spec = key.spec();
        info!("entering {} mode with {} card(s)", key, spec.cards);
        for n in 1..=spec.cards {
            let id = CardId(self.next_card_id);
            self.next_card_id += 1;
            let label = if spec.cards == 1 {
                spec.title.to_string()
            } else {
                format!("Timer {}", n)
            };
            self.cards.push(TimerCard::new(
                id,
                label,
                spec.template,
                spec.recording_toggle,
                self.clock.clone(),
                Rc::clone(&self.alarm),
            ));
        }
        self.screen = Screen::Timers(key);
    }

    pub fn leave_mode(&mut self) {
        self.teardown();
        self.screen = Screen::ModeSelect;
    }

    pub fn handle(&mut self, index: usize, intent: CardIntent) -> bool {
        match self.cards.get_mut(index) {
            Some(card) => card.handle(intent),
            None => {
                debug!("intent {:?} for missing card {}", intent, index);
                false
            }
        }
    }

    pub fn tick(&mut self, index: usize) -> bool {
        self.cards.get_mut(index).map(TimerCard::tick).unwrap_or(false)
    }

    fn teardown(&mut self) {
        for card in self.cards.iter_mut() {
            card.destroy();
        }
        self.cards.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<C: Clock + Clone> Drop for AppController<C> {
    fn drop(&mut self) {
        self.teardown();
        self.alarm.silence_all();
    }
}
