use encore_chart::HitCategory;

/// Terminal ring index of an arc: start advanced by its length, wrapped.
pub fn end_index(start_index: usize, arc_length: usize, segment_count: usize) -> usize {
    (start_index + arc_length) % segment_count
}

/// Arc length derived from a long event's held duration: one segment per
/// spawn interval over the duration, never shorter than one segment.
/// Used when the authored arc length is absent.
pub fn derived_arc_length(
    duration_beats: i32,
    seconds_per_beat: f64,
    segment_spawn_interval: f32,
) -> i32 {
    let duration_seconds = duration_beats as f64 * seconds_per_beat;
    let segments = (duration_seconds / segment_spawn_interval as f64).round() as i32;
    segments.max(1)
}

/// Outcome of advancing a train by one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcStep {
    /// A segment was emitted at `index`; `done` marks the terminal index.
    Emitted { index: usize, done: bool },
    /// The safety bound tripped before the end index was reached.
    Aborted,
}

/// One in-flight train of a long event.
///
/// Walks the ring index space one segment per spawn interval, from its
/// start index to its end index inclusive. The walk stops the instant the
/// current index equals the end index; a train that has not terminated
/// within `2 * segment_count` emissions aborts instead of looping forever.
#[derive(Debug, Clone)]
pub struct ArcTrain {
    current: usize,
    end: usize,
    clockwise: bool,
    emitted: usize,
    max_emissions: usize,
    pub symmetric_train: bool,
    pub hit_category: HitCategory,
    pub bar: i32,
    pub beat: i32,
}

impl ArcTrain {
    pub fn new(
        start: usize,
        end: usize,
        clockwise: bool,
        segment_count: usize,
        symmetric_train: bool,
        hit_category: HitCategory,
        bar: i32,
        beat: i32,
    ) -> Self {
        Self {
            current: start,
            end,
            clockwise,
            emitted: 0,
            max_emissions: 2 * segment_count,
            symmetric_train,
            hit_category,
            bar,
            beat,
        }
    }

    pub fn clockwise(&self) -> bool {
        self.clockwise
    }

    /// Emit the segment at the current index and advance the walk.
    pub fn step(&mut self, segment_count: usize) -> ArcStep {
        if self.emitted >= self.max_emissions {
            return ArcStep::Aborted;
        }
        self.emitted += 1;

        let index = self.current;
        let done = index == self.end;
        if !done {
            self.current = if self.clockwise {
                (index + 1) % segment_count
            } else {
                (index + segment_count - 1) % segment_count
            };
        }
        ArcStep::Emitted { index, done }
    }
}
