//! Loop driver
//!
//! [`Visualization`] owns one independent scene together with its random
//! source, latest pointer position and render settings. The host calls
//! [`Visualization::frame`] once per display refresh and keeps rescheduling
//! only while it returns true, so `stop` takes effect on the next callback.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::achievements::CollectionSink;
use crate::catalog::Catalog;
use crate::renderer::{Surface, hover_caption, render};
use crate::settings::Settings;
use crate::sim::{RandomSource, SceneState, TickInput, Variant, click, layout, relayout, seeded, tick};

/// Loop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

/// One visualization instance (one per canvas)
#[derive(Debug)]
pub struct Visualization<R: RandomSource = Pcg32> {
    state: SceneState,
    rng: R,
    input: TickInput,
    pub settings: Settings,
    loop_state: LoopState,
    frames: u64,
}

impl Visualization<Pcg32> {
    /// Seeded instance, laid out for `size`
    pub fn new(variant: Variant, catalog: Catalog, size: Vec2, seed: u64) -> Self {
        Self::with_rng(variant, catalog, size, seeded(seed))
    }
}

impl<R: RandomSource> Visualization<R> {
    pub fn with_rng(variant: Variant, catalog: Catalog, size: Vec2, mut rng: R) -> Self {
        let mut state = SceneState::new(variant, catalog, size);
        layout(&mut state, &mut rng);
        Self {
            state,
            rng,
            input: TickInput::default(),
            settings: Settings::default(),
            loop_state: LoopState::Stopped,
            frames: 0,
        }
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SceneState {
        &mut self.state
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn is_running(&self) -> bool {
        self.loop_state == LoopState::Running
    }

    /// Frames simulated and drawn since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stopped -> Running. Returns false if already running, in which case
    /// the caller must not schedule a second frame chain.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.loop_state = LoopState::Running;
        log::info!("Visualization started (grade {})", self.state.catalog.grade);
        true
    }

    /// Running -> Stopped. The pending frame callback sees this and ends the chain.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.loop_state = LoopState::Stopped;
            log::info!(
                "Visualization stopped after {} frames (grade {})",
                self.frames,
                self.state.catalog.grade
            );
        }
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.input.pointer
    }

    pub fn pointer_moved(&mut self, at: Vec2) {
        self.input.pointer = Some(at);
    }

    pub fn pointer_left(&mut self) {
        self.input.pointer = None;
    }

    /// Route a click to the scene. Notifications go out with the next frame.
    pub fn click(&mut self, at: Vec2) -> usize {
        click(&mut self.state, at, &mut self.rng)
    }

    /// Re-layout for a new surface size; no-op if unchanged or degenerate
    pub fn resize(&mut self, size: Vec2) {
        if size == self.state.size || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        relayout(&mut self.state, size, &mut self.rng);
    }

    /// Info line for whatever is under the pointer
    pub fn hover_caption(&self) -> Option<String> {
        hover_caption(&self.state, self.input.pointer)
    }

    /// One display refresh: simulate, deliver notifications, draw.
    /// Returns whether the host should schedule another frame.
    pub fn frame(&mut self, surface: &mut impl Surface, sink: &mut impl CollectionSink) -> bool {
        if !self.is_running() {
            return false;
        }

        self.resize(surface.size());
        tick(&mut self.state, &self.input, &mut self.rng);
        for event in self.state.drain_events() {
            sink.notify(&event);
        }
        render(&self.state, self.input.pointer, &self.settings, surface);

        self.frames += 1;
        true
    }
}
