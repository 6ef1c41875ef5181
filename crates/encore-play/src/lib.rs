// Ring geometry, arc trains, and the audio-clock-driven event scheduler.

mod arc;
mod descriptor;
mod geometry;
mod grid;
mod spawner;

pub use arc::{derived_arc_length, end_index};
pub use descriptor::{NoteDescriptor, NoteSink, SegmentDescriptor, SpawnHandle};
pub use geometry::{RingConfig, RingPointTable, Vec3};
pub use grid::{GridLayout, GridOrigin, PlaneGrid};
pub use spawner::{NoteSpawner, SpawnTiming, SpawnerConfig};
