// Session driver: loads a chart, runs a playback session against a clock,
// autoplays every spawn into the scoring engine and prints the result.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;

use encore_chart::{Chart, EventKind};
use encore_play::{
    NoteDescriptor, NoteSink, NoteSpawner, PlaneGrid, SegmentDescriptor, SpawnHandle, SpawnTiming,
    SpawnerConfig,
};
use encore_rule::{Rating, ResultRank, ScoreRule, ScoringEngine, SegmentResult};
use encore_timing::{ClockSource, MockClock, SystemClock};

#[derive(Parser)]
#[command(name = "encore", about = "Run a chart through the spawn/scoring engine")]
struct Args {
    /// Chart JSON file
    chart: PathBuf,

    /// Scheduler tick rate in Hz
    #[arg(long, default_value_t = 120.0)]
    tick_hz: f64,

    /// Run against the realtime clock instead of simulating instantly
    #[arg(long)]
    realtime: bool,

    /// Schedule by authored bar/beat with this pre-roll in seconds instead
    /// of the uniform one-event-per-beat pattern
    #[arg(long)]
    pre_roll: Option<f64>,

    /// Base score fed to the scoring engine per autoplayed hit
    #[arg(long, default_value_t = 100.0)]
    base_score: f32,
}

/// Instantiation stand-in: counts spawns and autoplays them as hits.
struct AutoplaySink {
    engine: ScoringEngine,
    base_score: f32,
    next_handle: u64,
    notes: u64,
    segments: u64,
}

impl AutoplaySink {
    fn new(engine: ScoringEngine, base_score: f32) -> Self {
        Self {
            engine,
            base_score,
            next_handle: 0,
            notes: 0,
            segments: 0,
        }
    }

    fn handle(&mut self) -> SpawnHandle {
        self.next_handle += 1;
        SpawnHandle(self.next_handle)
    }

    fn apply(&mut self, raw_score: f32, rating: Rating) {
        let outcome = self.engine.judge(raw_score, rating);
        if let Some(tier) = outcome.band_changed {
            info!("band engagement -> {tier:?}");
        }
        if let Some(tier) = outcome.spectator_changed {
            info!("spectator engagement -> {tier:?}");
        }
    }
}

impl NoteSink for AutoplaySink {
    fn spawn_note(&mut self, descriptor: &NoteDescriptor) -> SpawnHandle {
        self.notes += 1;
        info!(
            "note bar {} beat {} at cell ({}, {})",
            descriptor.bar, descriptor.beat, descriptor.start_cell.x, descriptor.start_cell.y
        );
        self.apply(self.base_score, Rating::Perfect);
        self.handle()
    }

    fn spawn_segment(&mut self, descriptor: &SegmentDescriptor) -> SpawnHandle {
        self.segments += 1;
        self.apply(self.base_score, Rating::from(SegmentResult::Success));
        self.handle()
    }
}

/// Number of judgeable spawns a chart will produce, so the scoring engine
/// knows the session's total up front: one per short note, one per visited
/// ring index per arc train.
fn judgeable_spawns(chart: &Chart, segment_count: usize) -> i32 {
    let n = segment_count as i32;
    chart
        .events
        .iter()
        .map(|ev| match ev.kind {
            EventKind::Short => 1,
            EventKind::Long => {
                let span = ev.arc_length.rem_euclid(n);
                let steps = if ev.is_clockwise { span } else { (n - span) % n };
                let train = steps + 1;
                if ev.is_symmetric { train * 2 } else { train }
            }
        })
        .sum()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let chart = Chart::load(&args.chart)?;
    info!(
        "loaded {}: bpm={}, {} events",
        args.chart.display(),
        chart.bpm,
        chart.total_events()
    );

    let grid = PlaneGrid::default();
    let config = SpawnerConfig {
        timing: match args.pre_roll {
            Some(pre_roll) => SpawnTiming::BarBeat { pre_roll },
            None => SpawnTiming::UniformBeat,
        },
        ..SpawnerConfig::default()
    };
    let total = judgeable_spawns(&chart, config.segment_count);
    let mut spawner = NoteSpawner::new(config, &grid);
    let mut sink = AutoplaySink::new(
        ScoringEngine::new(ScoreRule::default(), total),
        args.base_score,
    );

    let step = 1.0 / args.tick_hz;
    if args.realtime {
        let clock = SystemClock::new();
        spawner.start_spawning(&chart, &grid, clock.now_seconds())?;
        while spawner.is_active() {
            std::thread::sleep(std::time::Duration::from_secs_f64(step));
            spawner.tick(clock.now_seconds(), &grid, &mut sink);
        }
    } else {
        let clock = MockClock::new();
        spawner.start_spawning(&chart, &grid, clock.now_seconds())?;
        while spawner.is_active() {
            clock.advance(step);
            spawner.tick(clock.now_seconds(), &grid, &mut sink);
        }
    }

    let state = sink.engine.state();
    println!("notes spawned:    {}", sink.notes);
    println!("segments spawned: {}", sink.segments);
    println!("score:            {:.0}", state.score());
    println!("high combo:       {}", state.high_combo());
    println!("rank:             {:?}", ResultRank::from_state(state));
    Ok(())
}
