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

//! What a service hands back to the registry when it starts.

use super::{Service, UpdateTiming};
use anyhow::anyhow;
use std::any::type_name;
use std::fmt;

/// A type-erased per-slot callback, invoked with the service that registered it.
pub type UpdateCallback = Box<dyn FnMut(&mut dyn Service) -> anyhow::Result<()>>;

/// The per-slot dispatch table of one service.
///
/// Built once when the service starts and reused every frame. Slots are
/// stored in a fixed array indexed by [`UpdateTiming::index`], so dispatch
/// never hashes or allocates.
pub struct UpdateTable {
    slots: [Vec<UpdateCallback>; UpdateTiming::COUNT],
}

impl UpdateTable {
    /// Creates a table with no callback in any slot.
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn on<S, F>(mut self, timing: UpdateTiming, callback: F) -> Self
    where
        S: Service,
        F: FnMut(&mut S) -> anyhow::Result<()> + 'static,
    {
        self.register(timing, callback);
        self
    }

    /// Registers a callback receiving the concrete service `S`.
    ///
    /// Callbacks of one slot run in registration order. The callback fails
    /// if the table ends up attached to a service that is not an `S`.
    pub fn register<S, F>(&mut self, timing: UpdateTiming, mut callback: F) -> &mut Self
    where
        S: Service,
        F: FnMut(&mut S) -> anyhow::Result<()> + 'static,
    {
        self.register_erased(
            timing,
            Box::new(move |service: &mut dyn Service| {
                let service = service.downcast_mut::<S>().ok_or_else(|| {
                    anyhow!(
                        "Update callback for {} was attached to another service",
                        type_name::<S>()
                    )
                })?;
                callback(service)
            }),
        )
    }

    /// Registers an already type-erased callback.
    pub fn register_erased(&mut self, timing: UpdateTiming, callback: UpdateCallback) -> &mut Self {
        self.slots[timing.index()].push(callback);
        self
    }

    /// Number of callbacks registered for `timing`.
    pub fn len(&self, timing: UpdateTiming) -> usize {
        self.slots[timing.index()].len()
    }

    /// Returns `true` if no slot holds a callback.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }

    pub(crate) fn slot_mut(&mut self, timing: UpdateTiming) -> &mut [UpdateCallback] {
        &mut self.slots[timing.index()]
    }
}

impl Default for UpdateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UpdateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for timing in UpdateTiming::ALL {
            let count = self.len(timing);
            if count > 0 {
                map.entry(&timing.as_str(), &count);
            }
        }
        map.finish()
    }
}

/// The result of a service's startup hook.
///
/// A missing table is the same as an empty one: the service is running but
/// registers nothing to tick.
#[derive(Debug, Default)]
pub struct StartupInfo {
    /// The callbacks the service wants invoked every frame.
    pub update_table: Option<UpdateTable>,
}

impl StartupInfo {
    /// Startup info carrying `table`.
    pub fn new(update_table: UpdateTable) -> Self {
        Self {
            update_table: Some(update_table),
        }
    }

    /// Startup info without any callbacks.
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn into_table(self) -> UpdateTable {
        self.update_table.unwrap_or_default()
    }
}
