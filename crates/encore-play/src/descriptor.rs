use encore_chart::{EventKind, GridCell, HitCategory, NoteAxis, NoteDirection};

use crate::geometry::Vec3;

/// Opaque identifier returned by the instantiation collaborator. The
/// scheduler never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpawnHandle(pub u64);

/// Fully-populated runtime record for a spawned note.
///
/// The kind tag is carried explicitly so hit detection can branch on it
/// without probing the spawned object.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteDescriptor {
    pub kind: EventKind,
    pub hit_category: HitCategory,
    pub direction: NoteDirection,
    pub axis: NoteAxis,
    pub start_cell: GridCell,
    pub target_cell: GridCell,
    pub start_position: Vec3,
    pub target_position: Vec3,
    /// Units per second along the travel path
    pub speed: f32,
    pub bar: i32,
    pub beat: i32,
}

/// Runtime record for one segment of a long event's arc train.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentDescriptor {
    /// Ring index this segment spawned at
    pub ring_index: usize,
    pub source_position: Vec3,
    pub target_position: Vec3,
    pub speed: f32,
    /// True for segments of the mirrored twin train
    pub is_symmetric_train: bool,
    pub is_clockwise: bool,
    pub hit_category: HitCategory,
    pub bar: i32,
    pub beat: i32,
}

/// The instantiation collaborator. The engine requests creation through
/// this trait and otherwise knows nothing about the spawned objects.
pub trait NoteSink {
    fn spawn_note(&mut self, descriptor: &NoteDescriptor) -> SpawnHandle;
    fn spawn_segment(&mut self, descriptor: &SegmentDescriptor) -> SpawnHandle;
}
