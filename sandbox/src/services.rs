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

//! Demo services registered by the sandbox.

use std::time::Instant;

use tessera_core::service::{Service, StartupInfo, UpdateTable, UpdateTiming};
use tessera_core::service_kind;
use tessera_core::telemetry::{FrameTimings, PerformanceRenderer, TimingSource};

/// Base kind of every simulation service.
pub enum Simulation {}
service_kind!(Simulation);

/// A falling body integrated at the fixed step rate.
pub struct Gravity {
    pub height: f32,
    velocity: f32,
    step: f32,
}
service_kind!(Gravity: Simulation);

impl Gravity {
    pub fn new(height: f32, fixed_timestep_hz: f64) -> Self {
        Self {
            height,
            velocity: 0.0,
            step: (1.0 / fixed_timestep_hz) as f32,
        }
    }
}

impl Service for Gravity {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        log::info!("Gravity starts at height {:.2}", self.height);
        Ok(StartupInfo::new(UpdateTable::new().on(
            UpdateTiming::FixedStep,
            |g: &mut Gravity| {
                g.velocity -= 9.81 * g.step;
                g.height = (g.height + g.velocity * g.step).max(0.0);
                Ok(())
            },
        )))
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        log::info!("Gravity stops at height {:.2}", self.height);
        Ok(())
    }
}

/// Shown for the first frames, then removed.
#[derive(Default)]
pub struct Splash {
    frames_shown: u32,
}
service_kind!(Splash);

impl Service for Splash {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        Ok(StartupInfo::new(UpdateTable::new().on(
            UpdateTiming::Draw,
            |s: &mut Splash| {
                s.frames_shown += 1;
                Ok(())
            },
        )))
    }

    fn shutdown(&mut self) -> anyhow::Result<()> {
        log::info!("Splash removed after {} frame(s)", self.frames_shown);
        Ok(())
    }
}

/// Times the frame and draw phases of each frame with its own bracketing callbacks.
#[derive(Default)]
pub struct FrameProfiler {
    frame: u64,
    phase_start: Option<Instant>,
    current: FrameTimings,
    latest: Option<FrameTimings>,
}
service_kind!(FrameProfiler);

impl FrameProfiler {
    fn begin(&mut self) -> anyhow::Result<()> {
        self.phase_start = Some(Instant::now());
        Ok(())
    }

    fn end(&mut self, timing: UpdateTiming) -> anyhow::Result<()> {
        if let Some(start) = self.phase_start.take() {
            self.current.set(timing, start.elapsed().as_secs_f32() * 1000.0);
        }
        Ok(())
    }
}

impl Service for FrameProfiler {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        let table = UpdateTable::new()
            .on(UpdateTiming::BeforeFrame, |p: &mut FrameProfiler| p.begin())
            .on(UpdateTiming::AfterFrame, |p: &mut FrameProfiler| {
                p.end(UpdateTiming::Frame)
            })
            .on(UpdateTiming::BeforeDraw, |p: &mut FrameProfiler| p.begin())
            .on(UpdateTiming::AfterDraw, |p: &mut FrameProfiler| {
                p.end(UpdateTiming::Draw)?;
                p.latest = Some(p.current);
                p.frame += 1;
                p.current = FrameTimings::new(p.frame);
                Ok(())
            });
        Ok(StartupInfo::new(table))
    }
}

impl TimingSource for FrameProfiler {
    fn latest_timings(&self) -> Option<FrameTimings> {
        self.latest
    }
}

/// Starts asleep; woken up by the sandbox once the splash is gone.
#[derive(Default)]
pub struct DebugOverlay {
    pub frames_drawn: u64,
}
service_kind!(DebugOverlay);

impl Service for DebugOverlay {
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        Ok(StartupInfo::new(UpdateTable::new().on(
            UpdateTiming::AfterDraw,
            |o: &mut DebugOverlay| {
                o.frames_drawn += 1;
                Ok(())
            },
        )))
    }
}

/// Prints timings through the logger.
#[derive(Default)]
pub struct LogRenderer {
    lines: Vec<String>,
}

impl PerformanceRenderer for LogRenderer {
    fn begin_render(&mut self) {
        self.lines.clear();
    }

    fn render(&mut self, timings: &FrameTimings) {
        self.lines.push(format!("frame {}", timings.frame));
        for (timing, ms) in timings.iter().filter(|(_, ms)| *ms > 0.0) {
            self.lines.push(format!("  {timing}: {ms:.3} ms"));
        }
    }

    fn end_render(&mut self) {
        for line in &self.lines {
            log::info!("{line}");
        }
    }
}
