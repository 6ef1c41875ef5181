use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::event::ChartEvent;
use crate::schema::{self, ChartFile};

/// An authored chart: tempo metadata plus the ordered event sequence.
///
/// Event order is dispatch order. The scheduler walks the sequence front to
/// back, accumulating spawn time, so insertion order is load-bearing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    /// Tempo in beats per minute
    pub bpm: f32,
    /// Time signature numerator (beats in one bar)
    pub beats_per_bar: i32,
    /// Events in dispatch order
    pub events: Vec<ChartEvent>,
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            beats_per_bar: 4,
            events: Vec::new(),
        }
    }
}

impl Chart {
    pub fn new(bpm: f32, beats_per_bar: i32) -> Self {
        Self {
            bpm,
            beats_per_bar,
            events: Vec::new(),
        }
    }

    /// Duration of one beat in seconds.
    pub fn seconds_per_beat(&self) -> f32 {
        60.0 / self.bpm
    }

    /// Duration of one bar in seconds.
    pub fn seconds_per_bar(&self) -> f32 {
        self.seconds_per_beat() * self.beats_per_bar as f32
    }

    pub fn total_events(&self) -> usize {
        self.events.len()
    }

    /// Offset of an event's authored hit position from the chart start, in
    /// seconds.
    pub fn hit_time_seconds(&self, event: &ChartEvent) -> f64 {
        let beats = event.bar as f64 * self.beats_per_bar as f64 + event.beat as f64;
        beats * self.seconds_per_beat() as f64
    }

    /// Check tempo metadata. Per-event data is validated at dispatch time so
    /// a single malformed event cannot reject a whole chart.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.bpm > 0.0, "bpm must be positive, got {}", self.bpm);
        ensure!(
            self.beats_per_bar > 0,
            "beats_per_bar must be positive, got {}",
            self.beats_per_bar
        );
        Ok(())
    }

    /// Decode a chart from its JSON schema text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let file: ChartFile = serde_json::from_str(text).context("failed to parse chart JSON")?;
        let chart = schema::decode(file);
        chart.validate()?;
        Ok(chart)
    }

    /// Encode the chart to its JSON schema text.
    pub fn to_json_string(&self) -> Result<String> {
        let file = schema::encode(self);
        serde_json::to_string_pretty(&file).context("failed to serialize chart")
    }

    /// Load a chart from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chart file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Write the chart to a JSON file on disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write chart file {}", path.display()))
    }
}
