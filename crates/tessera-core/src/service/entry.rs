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

//! Per-service bookkeeping owned by the [`ServiceManager`](super::ServiceManager).

use super::{Service, ServiceKindId, ServiceLineage, UpdateTable, UpdateTiming};

/// Lifecycle state of a registered service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceStatus {
    /// Added, waiting for the next startup sweep.
    Ready,
    /// Added and told to start dormant.
    ReadyButSleeping,
    /// Started and ticking.
    Running,
    /// Started but not ticking.
    Sleeping,
    /// Marked for removal; its shutdown hook runs at the next cleanup sweep.
    Shutdown,
    /// Marked for removal before it ever started; erased without a hook.
    SilentShutdown,
}

impl ServiceStatus {
    /// Returns `true` if lookups by kind may return the entry.
    pub fn is_queryable(self) -> bool {
        !self.is_terminal()
    }

    /// Returns `true` once the entry is marked for removal.
    pub fn is_terminal(self) -> bool {
        matches!(self, ServiceStatus::Shutdown | ServiceStatus::SilentShutdown)
    }

    /// Returns `true` for the non-dormant, non-terminal states.
    pub fn is_active(self) -> bool {
        matches!(self, ServiceStatus::Ready | ServiceStatus::Running)
    }

    /// Returns `true` before the first startup sweep.
    pub fn is_pending(self) -> bool {
        matches!(self, ServiceStatus::Ready | ServiceStatus::ReadyButSleeping)
    }
}

/// A registered service together with its lifecycle state and dispatch table.
pub(crate) struct ServiceEntry {
    service: Box<dyn Service>,
    status: ServiceStatus,
    lineage: ServiceLineage,
    update_table: UpdateTable,
    /// Set when a running service is marked for removal: it keeps ticking
    /// until the cleanup sweep erases it.
    ticks_until_cleanup: bool,
}

impl ServiceEntry {
    pub(crate) fn new(service: Box<dyn Service>, lineage: ServiceLineage) -> Self {
        Self {
            service,
            status: ServiceStatus::Ready,
            lineage,
            update_table: UpdateTable::new(),
            ticks_until_cleanup: false,
        }
    }

    pub(crate) fn service(&self) -> &dyn Service {
        self.service.as_ref()
    }

    pub(crate) fn service_mut(&mut self) -> &mut dyn Service {
        self.service.as_mut()
    }

    pub(crate) fn status(&self) -> ServiceStatus {
        self.status
    }

    pub(crate) fn kind(&self) -> ServiceKindId {
        self.lineage.concrete()
    }

    pub(crate) fn base_kind(&self) -> ServiceKindId {
        self.lineage.base()
    }

    /// Returns `true` if `kind` is this entry's concrete kind or one of its ancestors.
    pub(crate) fn answers_to(&self, kind: &ServiceKindId) -> bool {
        self.lineage.contains(kind)
    }

    /// Returns `true` if the entry's callbacks run during dispatch.
    pub(crate) fn is_dispatching(&self) -> bool {
        match self.status {
            ServiceStatus::Running => true,
            ServiceStatus::Shutdown => self.ticks_until_cleanup,
            _ => false,
        }
    }

    /// Promotes a pending entry: runs the startup hook and caches its table.
    ///
    /// The status advances before the hook runs, so a failing hook is never
    /// retried by a later sweep.
    pub(crate) fn start(&mut self) -> anyhow::Result<()> {
        self.status = match self.status {
            ServiceStatus::Ready => ServiceStatus::Running,
            ServiceStatus::ReadyButSleeping => ServiceStatus::Sleeping,
            _ => return Ok(()),
        };
        let info = self.service.startup()?;
        self.update_table = info.into_table();
        Ok(())
    }

    /// Marks the entry for removal at the next cleanup sweep.
    pub(crate) fn mark_for_removal(&mut self) {
        self.status = match self.status {
            ServiceStatus::Ready | ServiceStatus::ReadyButSleeping => ServiceStatus::SilentShutdown,
            ServiceStatus::Running => {
                self.ticks_until_cleanup = true;
                ServiceStatus::Shutdown
            }
            ServiceStatus::Sleeping => ServiceStatus::Shutdown,
            terminal => terminal,
        };
    }

    /// Switches between the active and dormant variant of the current state.
    ///
    /// Terminal entries are left untouched; callers check for them first.
    pub(crate) fn set_active(&mut self, active: bool) {
        self.status = match (self.status, active) {
            (ServiceStatus::Ready | ServiceStatus::ReadyButSleeping, true) => ServiceStatus::Ready,
            (ServiceStatus::Ready | ServiceStatus::ReadyButSleeping, false) => {
                ServiceStatus::ReadyButSleeping
            }
            (ServiceStatus::Running | ServiceStatus::Sleeping, true) => ServiceStatus::Running,
            (ServiceStatus::Running | ServiceStatus::Sleeping, false) => ServiceStatus::Sleeping,
            (terminal, _) => terminal,
        };
    }

    /// Runs the shutdown hook if the entry needs one.
    ///
    /// Afterwards the entry is `SilentShutdown`, even when the hook failed,
    /// so the hook runs at most once.
    pub(crate) fn finish(&mut self) -> anyhow::Result<()> {
        if self.status != ServiceStatus::Shutdown {
            return Ok(());
        }
        self.status = ServiceStatus::SilentShutdown;
        self.ticks_until_cleanup = false;
        self.service.shutdown()
    }

    /// Invokes this entry's callbacks for `timing`, stopping at the first failure.
    #[inline]
    pub(crate) fn dispatch(&mut self, timing: UpdateTiming) -> anyhow::Result<()> {
        let service = self.service.as_mut();
        for callback in self.update_table.slot_mut(timing) {
            callback(&mut *service)?;
        }
        Ok(())
    }

    pub(crate) fn update_table(&self) -> &UpdateTable {
        &self.update_table
    }
}
