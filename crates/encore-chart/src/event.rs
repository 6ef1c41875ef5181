use serde::{Deserialize, Serialize};

/// Base shape of an authored event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    #[default]
    Short,
    Long,
}

/// Which hit surface the event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitCategory {
    #[default]
    Hand,
    Primary,
    Secondary,
}

/// Approach direction hint passed through to the instantiation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteDirection {
    #[default]
    None,
    East,
    West,
    South,
    North,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

/// Travel axis hint passed through to the instantiation collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteAxis {
    #[default]
    PosZ,
    NegZ,
    PosX,
    NegX,
}

/// Grid coordinates of a cell. Serialized as a `[x, y]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for GridCell {
    fn from(v: [i32; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<GridCell> for [i32; 2] {
    fn from(c: GridCell) -> Self {
        [c.x, c.y]
    }
}

/// A single authored event in a chart.
///
/// Short events travel from a start cell to a target cell on the hit grid.
/// Long events decompose into a train of arc segments walking the ring
/// index space; their grid cells are unused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEvent {
    pub kind: EventKind,
    pub hit_category: HitCategory,
    pub direction: NoteDirection,
    pub axis: NoteAxis,
    /// Grid cell the note spawns at (Short only)
    pub start_cell: GridCell,
    /// Grid cell the note travels to (Short only)
    pub target_cell: GridCell,
    /// Bar position within the chart (0-indexed)
    pub bar: i32,
    /// Beat position within the bar (0-indexed)
    pub beat: i32,
    /// First ring index of the arc (Long only)
    pub start_index: i32,
    /// Ring-index span of the arc (Long only)
    pub arc_length: i32,
    /// Spawn a mirrored second train at the half-ring offset
    pub is_symmetric: bool,
    /// Walk direction around the ring
    pub is_clockwise: bool,
    /// Held duration in whole bars (Long only)
    pub duration_bars: i32,
    /// Held duration in extra beats (Long only)
    pub duration_beats: i32,
}

impl ChartEvent {
    /// Create a short event at a grid cell. The target cell defaults to the
    /// start cell; irregular travel is set on the returned value.
    pub fn short(hit_category: HitCategory, cell: GridCell, bar: i32, beat: i32) -> Self {
        Self {
            kind: EventKind::Short,
            hit_category,
            direction: NoteDirection::None,
            axis: NoteAxis::PosZ,
            start_cell: cell,
            target_cell: cell,
            bar,
            beat,
            start_index: 0,
            arc_length: 0,
            is_symmetric: false,
            is_clockwise: false,
            duration_bars: 0,
            duration_beats: 0,
        }
    }

    /// Create a long (arc) event starting at a ring index.
    pub fn long_arc(
        start_index: i32,
        arc_length: i32,
        is_clockwise: bool,
        bar: i32,
        beat: i32,
    ) -> Self {
        Self {
            kind: EventKind::Long,
            hit_category: HitCategory::Hand,
            direction: NoteDirection::None,
            axis: NoteAxis::PosZ,
            start_cell: GridCell::default(),
            target_cell: GridCell::default(),
            bar,
            beat,
            start_index,
            arc_length,
            is_symmetric: false,
            is_clockwise,
            duration_bars: 0,
            duration_beats: 0,
        }
    }

    pub fn is_long(&self) -> bool {
        self.kind == EventKind::Long
    }

    /// Total held duration in beats for a given bar length (Long only)
    pub fn duration_in_beats(&self, beats_per_bar: i32) -> i32 {
        self.duration_bars * beats_per_bar + self.duration_beats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_event_targets_its_start_cell() {
        let ev = ChartEvent::short(HitCategory::Primary, GridCell::new(2, 3), 1, 2);
        assert_eq!(ev.kind, EventKind::Short);
        assert_eq!(ev.start_cell, ev.target_cell);
        assert_eq!(ev.bar, 1);
        assert_eq!(ev.beat, 2);
    }

    #[test]
    fn long_event_carries_arc_fields() {
        let ev = ChartEvent::long_arc(10, 8, true, 0, 0);
        assert!(ev.is_long());
        assert_eq!(ev.start_index, 10);
        assert_eq!(ev.arc_length, 8);
        assert!(ev.is_clockwise);
    }

    #[test]
    fn duration_in_beats_combines_bars_and_beats() {
        let mut ev = ChartEvent::long_arc(0, 4, true, 0, 0);
        ev.duration_bars = 2;
        ev.duration_beats = 1;
        assert_eq!(ev.duration_in_beats(4), 9);
    }

    #[test]
    fn grid_cell_serializes_as_pair() {
        let cell = GridCell::new(3, 5);
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, "[3,5]");
        let back: GridCell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
