// Chart JSON schema (serde layer).
//
// The on-disk schema is tolerant: every field of an event record may be
// absent, in which case integers default to 0 and booleans to false. The
// decode step converts raw records into the in-memory model without
// reordering; per-event semantic validation happens at dispatch time.

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::event::{ChartEvent, EventKind, GridCell, HitCategory, NoteAxis, NoteDirection};

fn default_bpm() -> f32 {
    120.0
}

fn default_beats_per_bar() -> i32 {
    4
}

/// Root chart file object
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFile {
    #[serde(default = "default_bpm")]
    pub bpm: f32,
    #[serde(default = "default_beats_per_bar")]
    pub beats_per_bar: i32,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

/// One event entry as written by the authoring tool
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub kind: EventKind,
    #[serde(default)]
    pub hit_category: HitCategory,
    #[serde(default)]
    pub direction: NoteDirection,
    #[serde(default)]
    pub axis: NoteAxis,
    #[serde(default)]
    pub start_cell: [i32; 2],
    #[serde(default)]
    pub target_cell: [i32; 2],
    #[serde(default)]
    pub bar: i32,
    #[serde(default)]
    pub beat: i32,
    #[serde(default)]
    pub start_index: i32,
    #[serde(default)]
    pub arc_length: i32,
    #[serde(default)]
    pub is_symmetric: bool,
    #[serde(default)]
    pub is_clockwise: bool,
    #[serde(default)]
    pub duration_bars: i32,
    #[serde(default)]
    pub duration_beats: i32,
}

/// Convert a raw chart file into the in-memory model, preserving order.
pub fn decode(file: ChartFile) -> Chart {
    let mut chart = Chart::new(file.bpm, file.beats_per_bar);
    chart.events.reserve(file.events.len());
    for record in file.events {
        chart.events.push(ChartEvent {
            kind: record.kind,
            hit_category: record.hit_category,
            direction: record.direction,
            axis: record.axis,
            start_cell: GridCell::from(record.start_cell),
            target_cell: GridCell::from(record.target_cell),
            bar: record.bar,
            beat: record.beat,
            start_index: record.start_index,
            arc_length: record.arc_length,
            is_symmetric: record.is_symmetric,
            is_clockwise: record.is_clockwise,
            duration_bars: record.duration_bars,
            duration_beats: record.duration_beats,
        });
    }
    chart
}

/// Convert the in-memory model back into the file schema.
pub fn encode(chart: &Chart) -> ChartFile {
    ChartFile {
        bpm: chart.bpm,
        beats_per_bar: chart.beats_per_bar,
        events: chart
            .events
            .iter()
            .map(|ev| EventRecord {
                kind: ev.kind,
                hit_category: ev.hit_category,
                direction: ev.direction,
                axis: ev.axis,
                start_cell: ev.start_cell.into(),
                target_cell: ev.target_cell.into(),
                bar: ev.bar,
                beat: ev.beat,
                start_index: ev.start_index,
                arc_length: ev.arc_length,
                is_symmetric: ev.is_symmetric,
                is_clockwise: ev.is_clockwise,
                duration_bars: ev.duration_bars,
                duration_beats: ev.duration_beats,
            })
            .collect(),
    }
}
