// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The per-frame phase sequence.
//!
//! One frame runs, in order:
//!
//! 1. the startup sweep, so services added since the last frame start ticking;
//! 2. zero or more fixed steps, each dispatching [`UpdateTiming::FIXED_STEP_ORDER`];
//! 3. [`UpdateTiming::FRAME_ORDER`], once;
//! 4. the cleanup sweep, so services removed during the frame are erased.

use crate::clock::FixedStepClock;
use crate::config::{ConfigError, RuntimeConfig};
use anyhow::bail;
use std::time::{Duration, Instant};
use tessera_core::service::{ServiceManager, UpdateTiming};
use tessera_core::EngineContext;

/// What a single frame did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Index of the frame that ran.
    pub frame: u64,
    /// Number of fixed steps run during the frame.
    pub fixed_steps: u32,
}

/// Runs frames against an [`EngineContext`].
#[derive(Debug)]
pub struct FrameDriver {
    config: RuntimeConfig,
    clock: FixedStepClock,
    last_tick: Option<Instant>,
}

impl FrameDriver {
    /// Creates a driver, rejecting settings it cannot run with.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = FixedStepClock::new(config.fixed_timestep()?, config.max_frame_delta());
        Ok(Self {
            config,
            clock,
            last_tick: None,
        })
    }

    /// The settings the driver runs with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The fixed-step clock, for interpolation between steps.
    pub fn clock(&self) -> &FixedStepClock {
        &self.clock
    }

    /// Runs one frame that lasted `delta`.
    ///
    /// The first error raised by a hook or callback aborts the frame and is
    /// returned unchanged; the frame counter is not advanced in that case.
    pub fn step(&mut self, context: &mut EngineContext, delta: Duration) -> anyhow::Result<FrameReport> {
        if context.is_stopped() {
            bail!("Cannot run a frame on a stopped engine context");
        }

        let frame = context.frame();
        let services = context.services_mut();
        services.startup_services()?;

        self.clock.advance(delta);
        let fixed_steps = self.run_fixed_steps(services)?;

        dispatch_all(services, &UpdateTiming::FRAME_ORDER)?;
        services.cleanup_services()?;

        context.advance_frame();
        log::trace!(
            "Frame {frame} done: {fixed_steps} fixed step(s), {} service(s)",
            context.services().len()
        );
        Ok(FrameReport { frame, fixed_steps })
    }

    /// Runs one frame, measuring its delta from the previous call.
    ///
    /// The first tick has a zero delta and runs no fixed step.
    pub fn tick(&mut self, context: &mut EngineContext) -> anyhow::Result<FrameReport> {
        let now = Instant::now();
        let delta = self
            .last_tick
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_tick = Some(now);
        self.step(context, delta)
    }

    /// Ticks until the configured frame limit is reached.
    ///
    /// Without a frame limit this only returns on error. Returns the number
    /// of frames run by this call.
    pub fn run(&mut self, context: &mut EngineContext) -> anyhow::Result<u64> {
        log::info!(
            "Frame driver running at {} Hz fixed step (frame limit: {:?})",
            self.config.fixed_timestep_hz,
            self.config.frame_limit
        );

        let mut frames = 0;
        while !self.limit_reached(context) {
            self.tick(context)?;
            frames += 1;
        }
        Ok(frames)
    }

    fn limit_reached(&self, context: &EngineContext) -> bool {
        match self.config.frame_limit {
            Some(limit) => context.frame() >= limit,
            None => false,
        }
    }

    fn run_fixed_steps(&mut self, services: &mut ServiceManager) -> anyhow::Result<u32> {
        let mut steps = 0;
        while self.clock.should_step() && steps < self.config.max_fixed_steps_per_frame {
            dispatch_all(services, &UpdateTiming::FIXED_STEP_ORDER)?;
            self.clock.consume_step();
            steps += 1;
        }

        if self.clock.should_step() {
            log::trace!("Fixed step budget exhausted, dropping pending steps");
            self.clock.discard_pending_steps();
        }
        Ok(steps)
    }
}

fn dispatch_all(services: &mut ServiceManager, order: &[UpdateTiming]) -> anyhow::Result<()> {
    for &timing in order {
        services.update_services(timing)?;
    }
    Ok(())
}
