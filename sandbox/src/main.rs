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

// Tessera Sandbox
// Registers a handful of demo services and drives them for a bounded run.

mod services;

use std::time::Duration;

use anyhow::Result;
use tessera_core::telemetry::present_timings;
use tessera_core::EngineContext;
use tessera_runtime::logging::init_logging;
use tessera_runtime::{FrameDriver, RuntimeConfig};

use services::{DebugOverlay, FrameProfiler, Gravity, LogRenderer, Simulation, Splash};

const SPLASH_FRAMES: u64 = 30;
const REPORT_EVERY: u64 = 60;

fn load_config() -> Result<RuntimeConfig> {
    match std::env::args().nth(1) {
        Some(path) => Ok(RuntimeConfig::from_file(path)?),
        None => Ok(RuntimeConfig {
            frame_limit: Some(180),
            ..RuntimeConfig::default()
        }),
    }
}

fn main() -> Result<()> {
    let config = load_config()?;
    init_logging(&config.log_filter);

    let mut context = EngineContext::new();
    let services = context.services_mut();
    services.add_service(Gravity::new(10.0, config.fixed_timestep_hz))?;
    services.add_service(Splash::default())?;
    services.add_service(FrameProfiler::default())?;
    services.add_service(DebugOverlay::default())?;
    services.set_active_service::<DebugOverlay>(false)?;

    let frame_budget = config.fixed_timestep()?;
    let frame_limit = config.frame_limit;
    let mut driver = FrameDriver::new(config)?;
    let mut renderer = LogRenderer::default();

    while frame_limit.map_or(true, |limit| context.frame() < limit) {
        let report = driver.tick(&mut context)?;

        if report.frame + 1 == SPLASH_FRAMES {
            let services = context.services_mut();
            services.remove_service::<Splash>()?;
            services.set_active_service::<DebugOverlay>(true)?;
        }
        if (report.frame + 1) % REPORT_EVERY == 0 {
            present_timings::<FrameProfiler>(context.services(), &mut renderer);
        }

        std::thread::sleep(frame_budget.min(Duration::from_millis(16)));
    }

    if let Some(gravity) = context
        .services()
        .try_get_service::<Simulation>()
        .and_then(|simulation| simulation.downcast_ref::<Gravity>())
    {
        log::info!("Simulated body rests at height {:.2}", gravity.height);
    }
    if let Ok(overlay) = context.services().get_service_as::<DebugOverlay>() {
        log::info!("Debug overlay drew {} frame(s)", overlay.frames_drawn);
    }
    context.stop()
}
