//! Multi Timer front end using Yew.
//! Owns the app controller, drives card polls and registers the service worker.

use log::{info, warn};
use multi_timer::audio::WebAudioAlarm;
use multi_timer::config::{LaunchOptions, SERVICE_WORKER_SCRIPT};
use multi_timer::{logging, AlarmSignal, AppController, CardIntent, ModeKey, Screen, SystemClock};
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use yew::prelude::*;

mod components;
mod hooks;

use components::{ModeSelect, TimerCardPanel};
use hooks::{use_card_polling, SharedController};

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub options: LaunchOptions,
}

/// Top-level component: mode selection or the active mode's cards.
#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let controller: SharedController = {
        let options = props.options.clone();
        use_mut_ref(move || {
            let alarm = if options.muted {
                info!("audio muted by launch options");
                AlarmSignal::silent()
            } else {
                AlarmSignal::new(WebAudioAlarm::new())
            };
            let mut app = AppController::new(SystemClock, Rc::new(alarm));
            if let Some(key) = options.mode {
                app.enter_mode(key);
            }
            app
        })
    };
    let refresh = use_force_update();
    let on_change = Callback::from(move |_: ()| refresh.force_update());

    let (screen, generation, polling, views) = {
        let app = controller.borrow();
        (app.screen(), app.generation(), app.polling_cards(), app.views())
    };
    use_card_polling(Rc::clone(&controller), generation, polling, on_change.clone());

    let on_select = {
        let controller = Rc::clone(&controller);
        let on_change = on_change.clone();
        Callback::from(move |key: ModeKey| {
            controller.borrow_mut().enter_mode(key);
            on_change.emit(());
        })
    };

    let on_back = {
        let controller = Rc::clone(&controller);
        let on_change = on_change.clone();
        Callback::from(move |_: MouseEvent| {
            controller.borrow_mut().leave_mode();
            on_change.emit(());
        })
    };

    let on_intent = {
        let controller = Rc::clone(&controller);
        Callback::from(move |(index, intent): (usize, CardIntent)| {
            let changed = controller.borrow_mut().handle(index, intent);
            if changed {
                on_change.emit(());
            }
        })
    };

    match screen {
        Screen::ModeSelect => html! { <ModeSelect {on_select} /> },
        Screen::Timers(key) => html! {
            <div class="timer-screen">
                <header class="screen-header">
                    <button class="back" onclick={on_back}>{ "‹ Modes" }</button>
                    <h1>{ key.spec().title }</h1>
                </header>
                <div class={classes!("cards", format!("cards-{}", views.len()))}>
                    { for views.into_iter().enumerate().map(|(index, view)| {
                        let id = view.id.0;
                        html! {
                            <TimerCardPanel
                                key={id}
                                {view}
                                on_intent={on_intent.reform(move |intent| (index, intent))}
                            />
                        }
                    }) }
                </div>
            </div>
        },
    }
}

fn launch_options() -> LaunchOptions {
    match gloo_utils::window().location().search() {
        Ok(query) => LaunchOptions::from_query(&query),
        Err(e) => {
            warn!("Could not read launch options: {:?}", e);
            LaunchOptions::default()
        }
    }
}

/// Offline support is optional; a failed registration only logs.
fn register_service_worker() {
    let container = gloo_utils::window().navigator().service_worker();
    wasm_bindgen_futures::spawn_local(async move {
        match JsFuture::from(container.register(SERVICE_WORKER_SCRIPT)).await {
            Ok(_) => info!("service worker registered"),
            Err(e) => warn!("Service worker registration failed: {:?}", e),
        }
    });
}

/// Entry point: sets up logging and renders the App component.
fn main() {
    console_error_panic_hook::set_once();
    let options = launch_options();
    logging::init(options.log_level);
    register_service_worker();
    yew::Renderer::<App>::with_props(AppProps { options }).render();
}
