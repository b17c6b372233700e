use gloo_timers::callback::Interval;
use multi_timer::config::POLL_INTERVAL_MS;
use multi_timer::utils::parse_duration;
use multi_timer::{AppController, Hms, SystemClock};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub type SharedController = Rc<RefCell<AppController<SystemClock>>>;

/// State and callbacks for a typed duration field.
#[derive(Clone)]
pub struct DurationEntry {
    /// The current text content of the input field.
    pub text: String,
    /// Why the last committed text was rejected, if it was.
    pub error: Option<String>,
    /// Callback for the text input's `oninput` event.
    pub on_text_input: Callback<InputEvent>,
    /// Parse the current text and hand a valid duration to the card.
    /// Typically used with `onchange` or after an Enter key press.
    pub on_commit: Callback<()>,
}

/// Custom hook for the free-text duration field of a card.
#[hook]
pub fn use_duration_entry(on_duration: Callback<Hms>) -> DurationEntry {
    let text = use_state(String::new);
    let error = use_state(|| None::<String>);

    let on_text_input = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    let on_commit = {
        let text = text.clone();
        let error = error.clone();
        Callback::from(move |_: ()| {
            if text.trim().is_empty() {
                error.set(None);
                return;
            }
            match parse_duration(&text) {
                Ok(hms) => {
                    on_duration.emit(hms);
                    // The steppers show the value now; clear the field.
                    text.set(String::new());
                    error.set(None);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        })
    };

    DurationEntry {
        text: (*text).clone(),
        error: (*error).clone(),
        on_text_input,
        on_commit,
    }
}

/// Keep one interval per running card, rebuilt whenever the card set or the
/// set of running cards changes. Dropping an interval cancels it before any
/// further callback can fire, so a destroyed card is never ticked.
#[hook]
pub fn use_card_polling(
    controller: SharedController,
    generation: u32,
    polling: Vec<usize>,
    on_change: Callback<()>,
) {
    use_effect_with((generation, polling), move |(_, polling)| {
        let intervals: Vec<Interval> = polling
            .iter()
            .map(|&index| {
                let controller = Rc::clone(&controller);
                let on_change = on_change.clone();
                Interval::new(POLL_INTERVAL_MS, move || {
                    let changed = controller.borrow_mut().tick(index);
                    if changed {
                        on_change.emit(());
                    }
                })
            })
            .collect();
        move || drop(intervals)
    });
}
