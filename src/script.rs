//! Recorded input replayed against the navigator.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::deal::DealId;
use crate::navigation::Navigator;

/// One timed input event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScriptStep {
    /// Time since the start of the replay.
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ScriptEvent {
    TouchDown { y: f64 },
    TouchMove { dx: f64, dy: f64 },
    TouchUp { dx: f64 },
    TouchCancel,
    Select { key: DealId },
    Back,
    Type { text: String },
}

impl ScriptStep {
    pub fn timestamp(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }

    pub fn apply(&self, navigator: &mut Navigator) {
        let timestamp = self.timestamp();

        match &self.event {
            ScriptEvent::TouchDown { y } => navigator.touch_down(*y),
            ScriptEvent::TouchMove { dx, dy } => navigator.touch_move(*dx, *dy, timestamp),
            ScriptEvent::TouchUp { dx } => {
                if let Some(decision) = navigator.touch_up(*dx, timestamp) {
                    debug!("release at {dx}: {decision:?}");
                }
            }
            ScriptEvent::TouchCancel => navigator.touch_cancel(),
            ScriptEvent::Select { key } => {
                navigator.select(key);
            }
            ScriptEvent::Back => {
                navigator.back();
            }
            ScriptEvent::Type { text } => navigator.search_input(text),
        }
    }
}

/// Loads a script, ordering the steps by time.
pub fn load(path: &Path) -> anyhow::Result<Vec<ScriptStep>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("error reading {}", path.display()))?;
    parse(&contents).with_context(|| format!("error parsing script {}", path.display()))
}

pub fn parse(text: &str) -> anyhow::Result<Vec<ScriptStep>> {
    let mut steps: Vec<ScriptStep> = serde_json::from_str(text)?;
    // Stable, so steps at the same time keep their order.
    steps.sort_by_key(|step| step.at_ms);
    Ok(steps)
}
