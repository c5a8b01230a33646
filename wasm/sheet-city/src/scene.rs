//! Scene update protocol.
//!
//! `Scene::handle` is the only place state changes. Timers are plain values
//! advanced by `Tick` events, so a test can drive the whole sequence with a
//! fake clock.

use crate::dataset::{Cell, Dataset, DatasetError, GridLine};
use crate::graph::{DependencyGraph, SpanScalars};
use crate::highlight::HighlightState;
use crate::projection::{build_frame, Frame};
use crate::settings::SceneSettings;

/// Immutable inputs of every redraw, fixed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub cells: Vec<Cell>,
    pub rows: Vec<GridLine>,
    pub cols: Vec<GridLine>,
    pub span: SpanScalars,
}

impl SceneState {
    pub fn from_dataset(dataset: Dataset) -> Self {
        let graph = DependencyGraph::build(&dataset.cells);
        if graph.dropped_references() > 0 {
            log::debug!(
                "dropped {} reference(s) to cells missing from the dataset",
                graph.dropped_references()
            );
        }
        Self {
            span: graph.span(),
            cells: dataset.cells,
            rows: dataset.rows,
            cols: dataset.cols,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Steady { animating: bool },
}

#[derive(Debug)]
pub enum SceneEvent {
    DatasetLoaded(Dataset),
    DatasetFailed(DatasetError),
    AnimationStart,
    Tick { dt_s: f64 },
    Hover(HighlightState),
    Teardown,
}

/// What a call to `Scene::handle` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Update {
    pub redrawn: bool,
    pub trail_advanced: bool,
}

impl Update {
    fn merge(self, other: Update) -> Update {
        Update {
            redrawn: self.redrawn || other.redrawn,
            trail_advanced: self.trail_advanced || other.trail_advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct OneShot {
    remaining_s: f64,
}

impl OneShot {
    fn new(delay_s: f64) -> Self {
        Self {
            remaining_s: delay_s.max(0.0),
        }
    }

    /// Once the delay has elapsed, the part of `dt_s` left over past the deadline.
    fn advance(&mut self, dt_s: f64) -> Option<f64> {
        self.remaining_s -= dt_s;
        if self.remaining_s <= 0.0 {
            Some(-self.remaining_s)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Interval {
    period_s: f64,
    elapsed_s: f64,
}

impl Interval {
    /// `None` unless the period is positive and finite.
    fn new(period_s: f64) -> Option<Self> {
        if period_s.is_finite() && period_s > 0.0 {
            Some(Self {
                period_s,
                elapsed_s: 0.0,
            })
        } else {
            None
        }
    }

    /// Number of whole periods completed during `dt_s`, saturating at `u32::MAX`.
    fn advance(&mut self, dt_s: f64) -> u32 {
        self.elapsed_s += dt_s;
        let fired = (self.elapsed_s / self.period_s).floor();
        if fired < 1.0 {
            return 0;
        }
        self.elapsed_s %= self.period_s;
        fired.min(u32::MAX as f64) as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Timers {
    animation_start: Option<OneShot>,
    trail_start: Option<OneShot>,
    trail_clock: Option<Interval>,
}

impl Timers {
    fn is_idle(&self) -> bool {
        self.animation_start.is_none() && self.trail_start.is_none() && self.trail_clock.is_none()
    }

    fn cancel(&mut self) {
        *self = Timers::default();
    }
}

pub struct Scene {
    settings: SceneSettings,
    phase: Phase,
    state: Option<SceneState>,
    highlight: HighlightState,
    timers: Timers,
    frame: Option<Frame>,
    trail_time: u32,
    torn_down: bool,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            phase: Phase::Loading,
            state: None,
            highlight: HighlightState::None,
            timers: Timers::default(),
            frame: None,
            trail_time: 0,
            torn_down: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn highlight(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn state(&self) -> Option<&SceneState> {
        self.state.as_ref()
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Current motion-trail clock.
    pub fn trail_time(&self) -> u32 {
        self.trail_time
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_idle()
    }

    pub fn tooltip(&self) -> Option<String> {
        let state = self.state.as_ref()?;
        self.highlight.tooltip(&state.cells)
    }

    pub fn handle(&mut self, event: SceneEvent) -> Update {
        if self.torn_down {
            return Update::default();
        }

        match event {
            SceneEvent::DatasetLoaded(dataset) => self.on_loaded(dataset),
            SceneEvent::DatasetFailed(err) => {
                log::error!("{}", err);
                Update::default()
            }
            SceneEvent::AnimationStart => self.on_animation_start(),
            SceneEvent::Tick { dt_s } => self.on_tick(dt_s),
            SceneEvent::Hover(next) => self.on_hover(next),
            SceneEvent::Teardown => {
                self.timers.cancel();
                self.frame = None;
                self.torn_down = true;
                log::info!("scene torn down");
                Update::default()
            }
        }
    }

    fn on_loaded(&mut self, dataset: Dataset) -> Update {
        if self.phase != Phase::Loading {
            log::warn!("ignoring dataset: scene already loaded");
            return Update::default();
        }

        self.state = Some(SceneState::from_dataset(dataset));
        self.phase = Phase::Steady { animating: false };
        self.timers.animation_start = Some(OneShot::new(
            self.settings.timers.animation_start_delay_s,
        ));
        self.timers.trail_start = Some(OneShot::new(self.settings.timers.trail_start_delay_s));
        self.redraw()
    }

    fn on_animation_start(&mut self) -> Update {
        match self.phase {
            Phase::Steady { animating: false } => {
                self.timers.animation_start = None;
                self.phase = Phase::Steady { animating: true };
                self.redraw()
            }
            _ => Update::default(),
        }
    }

    fn on_hover(&mut self, next: HighlightState) -> Update {
        if self.phase == Phase::Loading || next == self.highlight {
            return Update::default();
        }
        self.highlight = next;
        self.redraw()
    }

    fn on_tick(&mut self, dt_s: f64) -> Update {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Update::default();
        }
        let mut update = Update::default();

        if let Some(timer) = self.timers.animation_start.as_mut() {
            if timer.advance(dt_s).is_some() {
                self.timers.animation_start = None;
                update = update.merge(self.on_animation_start());
            }
        }

        // A clock started during this tick only sees the time past its start.
        let mut clock_dt_s = dt_s;
        if let Some(timer) = self.timers.trail_start.as_mut() {
            if let Some(overshoot_s) = timer.advance(dt_s) {
                self.timers.trail_start = None;
                let step_s = self.settings.timers.trail_step_s;
                self.timers.trail_clock = Interval::new(step_s);
                if self.timers.trail_clock.is_none() {
                    log::warn!("trail clock disabled: step of {}s is not positive", step_s);
                }
                clock_dt_s = overshoot_s;
            }
        }

        if let Some(clock) = self.timers.trail_clock.as_mut() {
            let steps = clock.advance(clock_dt_s);
            self.advance_trail_clock(steps);
            update.trail_advanced = steps > 0;
        }

        update
    }

    /// Same result as stepping `steps` times, where each step increments and
    /// jumps back to `trail_wrap_to` on reaching `trail_wrap_at`.
    fn advance_trail_clock(&mut self, steps: u32) {
        if steps == 0 {
            return;
        }
        let wrap_at = self.settings.timers.trail_wrap_at as u64;
        let wrap_to = self.settings.timers.trail_wrap_to as u64;
        let time = self.trail_time as u64 + steps as u64;
        self.trail_time = if time < wrap_at {
            time as u32
        } else {
            let cycle = wrap_at.saturating_sub(wrap_to).max(1);
            (wrap_to + (time - wrap_at) % cycle) as u32
        };
    }

    fn redraw(&mut self) -> Update {
        let Some(state) = self.state.as_ref() else {
            return Update::default();
        };
        let animating = matches!(self.phase, Phase::Steady { animating: true });
        self.frame = Some(build_frame(state, &self.highlight, animating, &self.settings));
        Update {
            redrawn: true,
            trail_advanced: false,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneSettings::default())
    }
}
