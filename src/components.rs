//! Pure Yew view components for the timer UI.
//!
//! Components render from a [`CardView`] or the mode table and report user
//! intents through callbacks; no timer logic lives here.

use crate::hooks::use_duration_entry;
use multi_timer::utils::format_hms;
use multi_timer::{CardIntent, CardView, Hms, ModeKey, Step, TimeUnit, TimerMode, MODES};
use yew::prelude::*;

/// Mode selection screen: one button per registered mode.
#[derive(Properties, PartialEq)]
pub struct ModeSelectProps {
    pub on_select: Callback<ModeKey>,
}

#[function_component(ModeSelect)]
pub fn mode_select(props: &ModeSelectProps) -> Html {
    html! {
        <div class="mode-select">
            <h1>{ "Multi Timer" }</h1>
            <div class="mode-list">
                { MODES.iter().map(|mode| {
                    let key = mode.key;
                    let onclick = props.on_select.reform(move |_| key);
                    let cards = if mode.cards == 1 {
                        "1 timer".to_string()
                    } else {
                        format!("{} timers", mode.cards)
                    };
                    html! {
                        <button class="mode-button" {onclick}>
                            <span class="mode-title">{ mode.title }</span>
                            <span class="mode-cards">{ cards }</span>
                        </button>
                    }
                }).collect::<Html>() }
            </div>
        </div>
    }
}

/// One column of the time display: digits with up/down steppers.
#[derive(Properties, PartialEq)]
struct DigitColumnProps {
    unit: TimeUnit,
    digits: String,
    editable: bool,
    on_intent: Callback<CardIntent>,
}

#[function_component(DigitColumn)]
fn digit_column(props: &DigitColumnProps) -> Html {
    let unit = props.unit;
    let up = props.on_intent.reform(move |_| CardIntent::StepDuration(unit, Step::Up));
    let down = props.on_intent.reform(move |_| CardIntent::StepDuration(unit, Step::Down));

    html! {
        <div class="digit-column">
            if props.editable {
                <button class="step up" onclick={up}>{ "▲" }</button>
            }
            <span class="digits">{ &props.digits }</span>
            if props.editable {
                <button class="step down" onclick={down}>{ "▼" }</button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct DurationFieldProps {
    current: Hms,
    on_intent: Callback<CardIntent>,
}

/// Free-text duration entry ("25:00", "1h30m", "90s").
#[function_component(DurationField)]
fn duration_field(props: &DurationFieldProps) -> Html {
    let entry = use_duration_entry(props.on_intent.reform(CardIntent::SetDuration));

    // `change` fires on Enter and on blur.
    let onchange = entry.on_commit.reform(|_: Event| ());

    html! {
        <div class="duration-field">
            <input
                type="text"
                placeholder={format_hms(props.current.total_secs())}
                value={entry.text.clone()}
                class={classes!(entry.error.is_some().then_some("invalid"))}
                oninput={entry.on_text_input.clone()}
                {onchange}
            />
            if let Some(ref err) = entry.error {
                <div class="input-error">{ err }</div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TimerCardPanelProps {
    pub view: CardView,
    pub on_intent: Callback<CardIntent>,
}

/// One timer card: readout, duration controls, mode switch, buttons.
#[function_component(TimerCardPanel)]
pub fn timer_card_panel(props: &TimerCardPanelProps) -> Html {
    let view = &props.view;
    let on_intent = &props.on_intent;

    let mut classes = classes!("timer-card");
    if view.running() {
        classes.push("running");
    }
    if view.alarming() {
        classes.push("alarming");
    }

    let start_stop = if view.running() {
        html! { <button class="btn stop" onclick={on_intent.reform(|_| CardIntent::Stop)}>{ "Stop" }</button> }
    } else {
        html! {
            <button class="btn start" disabled={!view.can_start}
                onclick={on_intent.reform(|_| CardIntent::Start)}>{ "Start" }</button>
        }
    };

    html! {
        <div class={classes}>
            <div class="card-header">
                <span class="card-label">{ &view.label }</span>
                if view.mode_switch {
                    { mode_switch(view, on_intent) }
                }
                if let Some(on) = view.recording {
                    <button
                        class={classes!("rec-toggle", on.then_some("on"))}
                        onclick={on_intent.reform(|_| CardIntent::ToggleRecording)}
                    >
                        { if on { "● REC" } else { "○ REC" } }
                    </button>
                }
            </div>

            <div class="readout">
                <DigitColumn unit={TimeUnit::Hours} digits={view.readout.hours.clone()}
                    editable={view.can_edit_duration} on_intent={on_intent.clone()} />
                <span class="sep">{ ":" }</span>
                <DigitColumn unit={TimeUnit::Minutes} digits={view.readout.minutes.clone()}
                    editable={view.can_edit_duration} on_intent={on_intent.clone()} />
                <span class="sep">{ ":" }</span>
                <DigitColumn unit={TimeUnit::Seconds} digits={view.readout.seconds.clone()}
                    editable={view.can_edit_duration} on_intent={on_intent.clone()} />
            </div>

            if view.can_edit_duration {
                <DurationField current={view.duration} on_intent={on_intent.clone()} />
            }

            <div class="controls">
                if view.alarming() {
                    <button class="btn dismiss"
                        onclick={on_intent.reform(|_| CardIntent::AcknowledgeAlarm)}>{ "Dismiss" }</button>
                } else {
                    { start_stop }
                }
                <button class="btn reset" onclick={on_intent.reform(|_| CardIntent::Reset)}>{ "Reset" }</button>
            </div>
        </div>
    }
}

/// Countdown / stopwatch switch, disabled while the card runs.
fn mode_switch(view: &CardView, on_intent: &Callback<CardIntent>) -> Html {
    [TimerMode::CountDown, TimerMode::CountUp]
        .into_iter()
        .map(|mode| {
            let selected = view.mode == mode;
            html! {
                <button
                    class={classes!("mode-tab", selected.then_some("selected"))}
                    disabled={!view.can_change_mode}
                    onclick={on_intent.reform(move |_| CardIntent::ChangeMode(mode))}
                >
                    { mode.label() }
                </button>
            }
        })
        .collect::<Html>()
}
