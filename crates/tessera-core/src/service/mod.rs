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

//! Long-lived services, their hierarchy and the registry that ticks them.

mod entry;
mod error;
mod kind;
mod manager;
mod startup;
mod timing;

pub use self::entry::ServiceStatus;
pub use self::error::{ServiceError, ServiceResult};
pub use self::kind::{
    ServiceIdentity, ServiceKind, ServiceKindId, ServiceLineage, ServiceRoot, MAX_LINEAGE_DEPTH,
};
pub use self::manager::ServiceManager;
pub use self::startup::{StartupInfo, UpdateCallback, UpdateTable};
pub use self::timing::UpdateTiming;

/// A long-lived unit of application logic owned by a [`ServiceManager`].
///
/// Both hooks are optional. `startup` runs once, during the first startup
/// sweep after the service was added, and returns the callbacks to tick.
/// `shutdown` runs once, during the cleanup sweep following the removal of a
/// service that had started.
pub trait Service: ServiceIdentity {
    /// Called once when the service starts.
    fn startup(&mut self) -> anyhow::Result<StartupInfo> {
        Ok(StartupInfo::none())
    }

    /// Called once when a started service is erased.
    fn shutdown(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<'a> dyn Service + 'a {
    /// Returns `true` if the service is an `S`.
    pub fn is<S: Service>(&self) -> bool {
        self.as_any().is::<S>()
    }

    /// Downcasts to the concrete service type.
    pub fn downcast_ref<S: Service>(&self) -> Option<&S> {
        self.as_any().downcast_ref::<S>()
    }

    /// Mutable variant of [`downcast_ref`](Self::downcast_ref).
    pub fn downcast_mut<S: Service>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut::<S>()
    }
}
