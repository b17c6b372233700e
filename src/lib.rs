//! Multi Timer: a countdown/stopwatch web app with one to three timer cards,
//! a shared alarm and offline support.
//!
//! The timekeeping core ([`timer`], [`card`], [`alarm`], [`app`]) is plain Rust
//! driven by an injected [`clock::Clock`], so it runs and is tested on the host.
//! Browser-only pieces ([`audio`], [`logging`], the Yew UI in `main.rs` and the
//! service worker binary) sit at the edges.

pub mod alarm;
pub mod app;
pub mod audio;
pub mod cache;
pub mod card;
pub mod clock;
pub mod config;
pub mod logging;
pub mod modes;
pub mod timer;
pub mod utils;

pub use alarm::{AlarmSignal, AlarmSink, CardId, SilentSink};
pub use app::{AppController, Screen};
pub use card::{CardIntent, CardView, TimerCard};
pub use clock::{Clock, ManualClock, SystemClock};
pub use modes::{ModeKey, ModeSpec, TemplateKind, MODES};
pub use timer::{Hms, Readout, Step, TimeUnit, TimerMode, TimerPhase, TimerState};
