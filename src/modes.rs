//! Static registry of app modes: how many cards a screen shows and which
//! controls each card gets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKey {
    Single,
    Recording,
    Dual,
    Triple,
}

/// Which card layout a mode uses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TemplateKind {
    SimpleCountdown,
    CountdownWithRecording,
    /// Three cards, each switchable between countdown and stopwatch.
    TripleWithCountUp,
}

impl TemplateKind {
    pub fn allows_count_up(self) -> bool {
        self == TemplateKind::TripleWithCountUp
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModeSpec {
    pub key: ModeKey,
    pub title: &'static str,
    pub cards: usize,
    pub template: TemplateKind,
    pub recording_toggle: bool,
}

pub const MODES: [ModeSpec; 4] = [
    ModeSpec {
        key: ModeKey::Single,
        title: "Timer",
        cards: 1,
        template: TemplateKind::SimpleCountdown,
        recording_toggle: false,
    },
    ModeSpec {
        key: ModeKey::Recording,
        title: "Recording",
        cards: 1,
        template: TemplateKind::CountdownWithRecording,
        recording_toggle: true,
    },
    ModeSpec {
        key: ModeKey::Dual,
        title: "Dual Timer",
        cards: 2,
        template: TemplateKind::SimpleCountdown,
        recording_toggle: false,
    },
    ModeSpec {
        key: ModeKey::Triple,
        title: "Triple Timer",
        cards: 3,
        template: TemplateKind::TripleWithCountUp,
        recording_toggle: false,
    },
];

impl ModeKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKey::Single => "single",
            ModeKey::Recording => "recording",
            ModeKey::Dual => "dual",
            ModeKey::Triple => "triple",
        }
    }

    pub fn spec(self) -> &'static ModeSpec {
        // MODES is declared in ModeKey order.
        &MODES[self as usize]
    }
}

impl fmt::Display for ModeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for ModeKey {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        MODES
            .iter()
            .map(|m| m.key)
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}
