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

//! Application-level context owning the service registry.

use crate::service::ServiceManager;

/// Per-application state shared by the frame driver and user code.
///
/// The context is the single owner of the [`ServiceManager`]; frame drivers
/// borrow it for the duration of a frame.
pub struct EngineContext {
    services: ServiceManager,
    frame: u64,
    stopped: bool,
}

impl EngineContext {
    /// Creates a context with an empty registry.
    pub fn new() -> Self {
        log::info!("Engine context created");
        Self {
            services: ServiceManager::new(),
            frame: 0,
            stopped: false,
        }
    }

    /// The service registry.
    pub fn services(&self) -> &ServiceManager {
        &self.services
    }

    /// Mutable access to the service registry.
    pub fn services_mut(&mut self) -> &mut ServiceManager {
        &mut self.services
    }

    /// Index of the frame currently being run, starting at 0.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Moves on to the next frame and returns its index.
    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    /// Returns `true` once [`stop`](Self::stop) succeeded.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Shuts every service down. Calling it again is a no-op.
    pub fn stop(&mut self) -> anyhow::Result<()> {
        if self.stopped {
            return Ok(());
        }
        log::info!("Stopping engine context after {} frame(s)", self.frame);
        self.services.shutdown_services()?;
        self.stopped = true;
        Ok(())
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EngineContext {
    fn drop(&mut self) {
        if !self.stopped && !self.services.is_empty() {
            log::warn!(
                "Engine context dropped without stop(); {} service(s) never shut down",
                self.services.len()
            );
        }
    }
}
