use anyhow::{Result, bail, ensure};
use log::{error, info, warn};

use encore_chart::{Chart, ChartEvent, EventKind, GridCell};
use encore_timing::TaskQueue;

use crate::arc::{ArcStep, ArcTrain, derived_arc_length, end_index};
use crate::descriptor::{NoteDescriptor, NoteSink, SegmentDescriptor};
use crate::geometry::{RingConfig, RingPointTable, Vec3};
use crate::grid::{GridLayout, GridOrigin};

/// How dispatch timestamps are derived from the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnTiming {
    /// One event per beat in authored order, starting at the session
    /// origin. The default pattern.
    UniformBeat,
    /// Events are sorted by (bar, beat) and each spawns so that it
    /// *arrives* on its authored beat: `pre_roll` seconds after the origin
    /// the music starts, and every spawn leads its hit time by the travel
    /// time.
    BarBeat { pre_roll: f64 },
}

/// Spawner configuration, fixed for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnerConfig {
    /// Wait between consecutive segments of an arc train, in seconds
    pub segment_spawn_interval: f32,
    pub source_radius: f32,
    pub target_radius: f32,
    pub segment_count: usize,
    /// Offset applied to both ring centers
    pub circle_offset: Vec3,
    pub timing: SpawnTiming,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            segment_spawn_interval: 0.1,
            source_radius: 5.0,
            target_radius: 5.0,
            segment_count: 36,
            circle_offset: Vec3::ZERO,
            timing: SpawnTiming::UniformBeat,
        }
    }
}

/// A suspended timeline multiplexed onto the session tick.
enum Timeline {
    /// The chart walk; the value is the index of the next event to dispatch.
    ChartWalk(usize),
    ArcTrain(ArcTrain),
}

/// Per-session state, created by `start_spawning` and dropped on stop or
/// exhaustion.
struct Session {
    /// Events in dispatch order, paired with their spawn timestamps for
    /// bar/beat timing (None in uniform mode, where the cursor advances by
    /// one beat per event).
    events: Vec<ChartEvent>,
    dispatch_times: Option<Vec<f64>>,
    origin: f64,
    seconds_per_beat: f64,
    beats_per_bar: i32,
    speed: f32,
    /// Set once the chart walk has dispatched its last event
    walk_finished: bool,
}

/// The event scheduler: converts a chart into absolute spawn timestamps on
/// the audio clock and dispatches them from a periodic tick.
///
/// All timelines of one session (the chart walk and every arc train) live
/// in a single task registry; `stop_spawning` cancels them atomically via
/// the registry epoch. Per-event failures are logged and skipped, never
/// allowed to halt the session.
pub struct NoteSpawner {
    config: SpawnerConfig,
    ring: RingPointTable,
    queue: TaskQueue<Timeline>,
    session: Option<Session>,
}

impl NoteSpawner {
    /// Build a spawner for a stage layout. The ring centers derive from the
    /// center of the hand grid on each plane, as the stage places its arc
    /// rings around where the hands rest.
    pub fn new(config: SpawnerConfig, grid: &dyn GridLayout) -> Self {
        let center_x = grid.total_horizontal_cells() - grid.hand_grid_size() / 2 - 1;
        let center_y = grid.vertical_cells() / 2;

        let source_center = grid
            .cell_position(GridOrigin::Source, center_x, center_y)
            .add(config.circle_offset);
        let target_center = grid
            .cell_position(GridOrigin::Target, center_x, center_y)
            .add(config.circle_offset);

        let ring = RingPointTable::new(&RingConfig {
            source_center,
            target_center,
            source_radius: config.source_radius,
            target_radius: config.target_radius,
            segment_count: config.segment_count,
        });

        Self {
            config,
            ring,
            queue: TaskQueue::new(),
            session: None,
        }
    }

    /// Begin a playback session at the current clock time.
    ///
    /// Samples the session origin, computes the per-session note speed and
    /// seeds the chart walk. Rejects empty charts and tempo or layout
    /// values that would make the speed computation meaningless.
    pub fn start_spawning(&mut self, chart: &Chart, grid: &dyn GridLayout, now: f64) -> Result<()> {
        if chart.events.is_empty() {
            bail!("chart has no events");
        }
        chart.validate()?;
        let distance = grid.grid_distance();
        ensure!(
            distance > 0.0,
            "grid travel distance must be positive, got {distance}"
        );

        if self.session.is_some() {
            warn!("start_spawning while a session is active; canceling it");
            self.stop_spawning();
        }

        let seconds_per_beat = 60.0 / chart.bpm as f64;
        // A note crosses the full travel distance in exactly one bar.
        let speed = distance / (seconds_per_beat as f32 * chart.beats_per_bar as f32);

        let (events, dispatch_times, first_due) = match self.config.timing {
            SpawnTiming::UniformBeat => (chart.events.clone(), None, now),
            SpawnTiming::BarBeat { pre_roll } => {
                let mut ordered = chart.events.clone();
                ordered.sort_by_key(|ev| (ev.bar, ev.beat));
                let travel_time = (distance / speed) as f64;
                let times: Vec<f64> = ordered
                    .iter()
                    .map(|ev| now + pre_roll + chart.hit_time_seconds(ev) - travel_time)
                    .collect();
                let first = times[0];
                (ordered, Some(times), first)
            }
        };

        info!(
            "spawn session start: bpm={}, beats_per_bar={}, events={}, speed={:.2} units/s",
            chart.bpm,
            chart.beats_per_bar,
            events.len(),
            speed
        );

        self.session = Some(Session {
            events,
            dispatch_times,
            origin: now,
            seconds_per_beat,
            beats_per_bar: chart.beats_per_bar,
            speed,
            walk_finished: false,
        });
        self.queue.schedule(first_due, Timeline::ChartWalk(0));
        Ok(())
    }

    /// Mark the session inactive and cancel every pending timeline,
    /// in-flight arc trains included.
    pub fn stop_spawning(&mut self) {
        if self.session.take().is_some() {
            info!("spawn session stopped");
        }
        self.queue.cancel_all();
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Per-session note speed in units per second, 0 when idle.
    pub fn note_speed(&self) -> f32 {
        self.session.as_ref().map(|s| s.speed).unwrap_or(0.0)
    }

    /// Chart position reached at the given clock time, as (bar, beat).
    pub fn position(&self, now: f64) -> Option<(i32, i32)> {
        let session = self.session.as_ref()?;
        let elapsed = (now - session.origin).max(0.0);
        let total_beats = elapsed / session.seconds_per_beat;
        let bar = (total_beats / session.beats_per_bar as f64).floor() as i32;
        let beat = (total_beats % session.beats_per_bar as f64).floor() as i32;
        Some((bar, beat))
    }

    /// Run every timeline whose wait has elapsed. Call once per host tick;
    /// late ticks dispatch late, they never skip.
    pub fn tick(&mut self, now: f64, grid: &dyn GridLayout, sink: &mut dyn NoteSink) {
        if self.session.is_none() {
            return;
        }

        while let Some((due, timeline)) = self.queue.pop_due(now) {
            match timeline {
                Timeline::ChartWalk(index) => self.dispatch_event(index, due, grid, sink),
                Timeline::ArcTrain(train) => self.advance_train(train, due, sink),
            }
        }

        let finished = self
            .session
            .as_ref()
            .is_some_and(|s| s.walk_finished && self.queue.is_empty());
        if finished {
            info!("all chart events dispatched; session complete");
            self.session = None;
        }
    }

    /// Dispatch one chart event and reschedule the walk for the next one.
    fn dispatch_event(
        &mut self,
        index: usize,
        due: f64,
        grid: &dyn GridLayout,
        sink: &mut dyn NoteSink,
    ) {
        let session = self.session.as_ref().expect("active session");
        let event = session.events[index].clone();
        let speed = session.speed;
        let bar_beat = (event.bar, event.beat);

        match event.kind {
            EventKind::Short => self.spawn_short(&event, speed, grid, sink),
            EventKind::Long => self.spawn_long(&event, due),
        }

        let session = self.session.as_mut().expect("active session");
        let next = index + 1;
        if next < session.events.len() {
            let next_due = match &session.dispatch_times {
                // Uniform pattern: advance the cursor one beat per event.
                None => due + session.seconds_per_beat,
                Some(times) => times[next],
            };
            self.queue.schedule(next_due, Timeline::ChartWalk(next));
        } else {
            session.walk_finished = true;
            log::debug!(
                "chart walk finished at bar {} beat {}",
                bar_beat.0,
                bar_beat.1
            );
        }
    }

    fn spawn_short(
        &self,
        event: &ChartEvent,
        speed: f32,
        grid: &dyn GridLayout,
        sink: &mut dyn NoteSink,
    ) {
        // An unauthored target cell means the note travels straight across.
        let target_cell = if event.target_cell == GridCell::default() {
            event.start_cell
        } else {
            event.target_cell
        };

        let start_position =
            grid.cell_position(GridOrigin::Source, event.start_cell.x, event.start_cell.y);
        let target_position = grid.cell_position(GridOrigin::Target, target_cell.x, target_cell.y);

        sink.spawn_note(&NoteDescriptor {
            kind: EventKind::Short,
            hit_category: event.hit_category,
            direction: event.direction,
            axis: event.axis,
            start_cell: event.start_cell,
            target_cell,
            start_position,
            target_position,
            speed,
            bar: event.bar,
            beat: event.beat,
        });
    }

    /// Start the arc train(s) for a long event. The first segment of each
    /// train emits at the event's own dispatch time.
    fn spawn_long(&mut self, event: &ChartEvent, due: f64) {
        let n = self.ring.segment_count();

        if event.start_index < 0 || event.start_index as usize >= n {
            error!(
                "long event at bar {} beat {} has start index {} outside 0..{}; skipping",
                event.bar, event.beat, event.start_index, n
            );
            return;
        }
        let start = event.start_index as usize;

        let session = self.session.as_ref().expect("active session");
        let mut arc_length = event.arc_length;
        if arc_length <= 0 {
            let duration = event.duration_in_beats(session.beats_per_bar);
            arc_length = derived_arc_length(
                duration,
                session.seconds_per_beat,
                self.config.segment_spawn_interval,
            );
            warn!(
                "long event at bar {} beat {} has no arc length; derived {} from duration",
                event.bar, event.beat, arc_length
            );
        }
        let end = end_index(start, arc_length as usize, n);

        self.queue.schedule(
            due,
            Timeline::ArcTrain(ArcTrain::new(
                start,
                end,
                event.is_clockwise,
                n,
                false,
                event.hit_category,
                event.bar,
                event.beat,
            )),
        );

        if event.is_symmetric {
            let sym_start = self.ring.symmetric_index(start);
            let sym_end = self.ring.symmetric_index(end);
            self.queue.schedule(
                due,
                Timeline::ArcTrain(ArcTrain::new(
                    sym_start,
                    sym_end,
                    event.is_clockwise,
                    n,
                    true,
                    event.hit_category,
                    event.bar,
                    event.beat,
                )),
            );
        }
    }

    /// Emit one segment of a train and suspend it until the next interval.
    fn advance_train(&mut self, mut train: ArcTrain, due: f64, sink: &mut dyn NoteSink) {
        let session = self.session.as_ref().expect("active session");
        let speed = session.speed;
        let n = self.ring.segment_count();

        match train.step(n) {
            ArcStep::Emitted { index, done } => {
                sink.spawn_segment(&SegmentDescriptor {
                    ring_index: index,
                    source_position: self.ring.source_point(index),
                    target_position: self.ring.target_point(index),
                    speed,
                    is_symmetric_train: train.symmetric_train,
                    is_clockwise: train.clockwise(),
                    hit_category: train.hit_category,
                    bar: train.bar,
                    beat: train.beat,
                });
                if !done {
                    let next_due = due + self.config.segment_spawn_interval as f64;
                    self.queue.schedule(next_due, Timeline::ArcTrain(train));
                }
            }
            ArcStep::Aborted => {
                error!(
                    "arc train for bar {} beat {} exceeded {} steps without reaching its end; aborting train",
                    train.bar,
                    train.beat,
                    2 * n
                );
            }
        }
    }
}
