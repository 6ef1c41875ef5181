// Chart data model and JSON schema for the stage rhythm engine.

mod chart;
mod event;
mod schema;

pub use chart::Chart;
pub use event::{ChartEvent, EventKind, GridCell, HitCategory, NoteAxis, NoteDirection};
pub use schema::{ChartFile, EventRecord, decode, encode};
