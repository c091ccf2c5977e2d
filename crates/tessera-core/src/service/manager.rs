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

//! The registry that owns every service and drives its lifecycle.
//!
//! # Deferred mutation
//!
//! Nothing a caller does takes effect in the middle of a frame:
//!
//! * [`add_service`](ServiceManager::add_service) stores a `Ready` entry. It
//!   is visible to lookups at once but only ticks after the next
//!   [`startup_services`](ServiceManager::startup_services) sweep.
//! * [`remove_service`](ServiceManager::remove_service) only changes the
//!   entry's status. The entry keeps its base kind reserved until
//!   [`cleanup_services`](ServiceManager::cleanup_services) erases it.
//!
//! A frame driver therefore calls `startup_services`, then
//! [`update_services`](ServiceManager::update_services) once per slot, then
//! `cleanup_services`.

use super::entry::ServiceEntry;
use super::{
    Service, ServiceError, ServiceKind, ServiceKindId, ServiceLineage, ServiceResult,
    ServiceStatus, UpdateTiming,
};

/// Owns every registered service, enforces one service per base kind and
/// dispatches per-slot callbacks.
///
/// Entries are kept in registration order, which is also dispatch order.
///
/// # Example
///
/// ```rust
/// use tessera_core::service::{Service, ServiceManager, StartupInfo, UpdateTable, UpdateTiming};
/// use tessera_core::service_kind;
///
/// #[derive(Default)]
/// struct Score { frames: u32 }
/// service_kind!(Score);
///
/// impl Service for Score {
///     fn startup(&mut self) -> anyhow::Result<StartupInfo> {
///         Ok(StartupInfo::new(UpdateTable::new().on(UpdateTiming::Frame, |s: &mut Score| {
///             s.frames += 1;
///             Ok(())
///         })))
///     }
/// }
///
/// let mut services = ServiceManager::new();
/// services.add_service(Score::default()).unwrap();
/// services.startup_services().unwrap();
/// services.update_services(UpdateTiming::Frame).unwrap();
///
/// assert_eq!(services.get_service_as::<Score>().unwrap().frames, 1);
/// ```
#[derive(Default)]
pub struct ServiceManager {
    entries: Vec<ServiceEntry>,
}

impl ServiceManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    // --- Collection -------------------------------------------------------

    /// Registers `service` in the `Ready` state.
    ///
    /// Fails with [`ServiceError::AlreadyExists`] if any entry still held by
    /// the registry, including one marked for removal, shares the base kind
    /// of `service`.
    pub fn add_service<S: Service>(&mut self, service: S) -> ServiceResult<()> {
        self.add_boxed(Box::new(service))
    }

    /// Registers an already boxed service. See [`add_service`](Self::add_service).
    pub fn add_boxed(&mut self, service: Box<dyn Service>) -> ServiceResult<()> {
        let lineage = ServiceLineage::resolve(service.kind())?;
        let base = lineage.base();

        if let Some(existing) = self.entries.iter().find(|e| e.base_kind() == base) {
            log::warn!(
                "Rejected service {}: base kind {} is held by {} ({:?})",
                lineage.concrete(),
                base,
                existing.kind(),
                existing.status()
            );
            return Err(ServiceError::AlreadyExists {
                kind: lineage.concrete().name(),
                base: base.name(),
            });
        }

        log::debug!("Added service {} (base kind {})", lineage.concrete(), base);
        self.entries.push(ServiceEntry::new(service, lineage));
        Ok(())
    }

    /// Same as [`add_service`](Self::add_service), reporting the outcome as a flag.
    pub fn try_add_service<S: Service>(&mut self, service: S) -> bool {
        self.add_service(service).is_ok()
    }

    /// Returns the service answering to kind `K`.
    ///
    /// `K` may be the concrete kind of a registered service or any of its
    /// ancestors. Entries marked for removal are never returned, and
    /// [`ServiceRoot`](super::ServiceRoot) never resolves.
    pub fn get_service<K: ServiceKind>(&self) -> ServiceResult<&dyn Service> {
        self.try_get_service::<K>().ok_or_else(not_found::<K>)
    }

    /// Mutable variant of [`get_service`](Self::get_service).
    pub fn get_service_mut<K: ServiceKind>(&mut self) -> ServiceResult<&mut dyn Service> {
        self.try_get_service_mut::<K>().ok_or_else(not_found::<K>)
    }

    /// Returns the service answering to kind `K`, if any.
    #[must_use]
    pub fn try_get_service<K: ServiceKind>(&self) -> Option<&dyn Service> {
        self.find_service(&ServiceKindId::of::<K>())
    }

    /// Mutable variant of [`try_get_service`](Self::try_get_service).
    pub fn try_get_service_mut<K: ServiceKind>(&mut self) -> Option<&mut dyn Service> {
        let kind = ServiceKindId::of::<K>();
        self.entries
            .iter_mut()
            .find(|e| e.status().is_queryable() && e.answers_to(&kind))
            .map(ServiceEntry::service_mut)
    }

    /// Returns the service answering to `S`, downcast to `S`.
    ///
    /// Fails with [`ServiceError::NotFound`] when the entry answering to `S`
    /// is a descendant of `S` rather than an `S`.
    pub fn get_service_as<S: Service + ServiceKind>(&self) -> ServiceResult<&S> {
        self.try_get_service::<S>()
            .and_then(|service| service.downcast_ref::<S>())
            .ok_or_else(not_found::<S>)
    }

    /// Mutable variant of [`get_service_as`](Self::get_service_as).
    pub fn get_service_as_mut<S: Service + ServiceKind>(&mut self) -> ServiceResult<&mut S> {
        self.try_get_service_mut::<S>()
            .and_then(|service| service.downcast_mut::<S>())
            .ok_or_else(not_found::<S>)
    }

    /// Marks the service answering to `K` for removal.
    ///
    /// A started service moves to `Shutdown` and its shutdown hook runs at
    /// the next cleanup sweep; a service that never started moves to
    /// `SilentShutdown` and is erased without a hook. Fails with
    /// [`ServiceError::NotFound`] if nothing answers to `K`.
    pub fn remove_service<K: ServiceKind>(&mut self) -> ServiceResult<()> {
        let index = self.find_queryable(&ServiceKindId::of::<K>()).ok_or_else(not_found::<K>)?;
        let entry = &mut self.entries[index];
        entry.mark_for_removal();
        log::debug!("Marked service {} for removal ({:?})", entry.kind(), entry.status());
        Ok(())
    }

    /// Same as [`remove_service`](Self::remove_service), returning `false`
    /// when nothing answers to `K`.
    pub fn try_remove_service<K: ServiceKind>(&mut self) -> bool {
        self.remove_service::<K>().is_ok()
    }

    // --- Activity control -------------------------------------------------

    /// Puts the service answering to `K` to sleep or wakes it up.
    ///
    /// A sleeping service keeps its dispatch table but its callbacks are
    /// skipped. Calling this before the first startup sweep decides whether
    /// the service starts dormant.
    ///
    /// Fails with [`ServiceError::NotFound`] if nothing answers to `K`, and
    /// with [`ServiceError::InvalidOperation`] if the service is already
    /// marked for removal.
    pub fn set_active_service<K: ServiceKind>(&mut self, active: bool) -> ServiceResult<()> {
        let index = self.find_live::<K>()?;
        let entry = &mut self.entries[index];
        entry.set_active(active);
        log::debug!("Service {} is now {:?}", entry.kind(), entry.status());
        Ok(())
    }

    /// Returns `true` if the service answering to `K` is `Ready` or `Running`.
    ///
    /// Fails like [`set_active_service`](Self::set_active_service).
    pub fn is_active_service<K: ServiceKind>(&self) -> ServiceResult<bool> {
        let index = self.find_live::<K>()?;
        Ok(self.entries[index].status().is_active())
    }

    /// Returns the lifecycle status of the entry answering to `K`.
    ///
    /// Unlike lookups, this also reports entries already marked for removal.
    pub fn service_status<K: ServiceKind>(&self) -> ServiceResult<ServiceStatus> {
        let kind = ServiceKindId::of::<K>();
        self.entries
            .iter()
            .find(|e| e.answers_to(&kind))
            .map(ServiceEntry::status)
            .ok_or_else(not_found::<K>)
    }

    /// Number of entries held, including those waiting to be erased.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the manager holds no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // --- Frame phases -----------------------------------------------------

    /// Starts every pending entry, in registration order.
    ///
    /// `Ready` entries become `Running` and `ReadyButSleeping` entries become
    /// `Sleeping`; both cache the dispatch table their startup hook returns.
    /// A failing hook aborts the sweep and its error is returned unchanged.
    pub fn startup_services(&mut self) -> anyhow::Result<()> {
        for entry in self.entries.iter_mut().filter(|e| e.status().is_pending()) {
            entry.start()?;
            log::debug!(
                "Started service {} ({:?}, table {:?})",
                entry.kind(),
                entry.status(),
                entry.update_table()
            );
        }
        Ok(())
    }

    /// Invokes every dispatching entry's callbacks for `timing`.
    ///
    /// Running entries dispatch, as do entries removed while running during
    /// the current frame. The first failing callback stops the dispatch and
    /// its error is returned unchanged.
    pub fn update_services(&mut self, timing: UpdateTiming) -> anyhow::Result<()> {
        for entry in &mut self.entries {
            if entry.is_dispatching() {
                entry.dispatch(timing)?;
            }
        }
        Ok(())
    }

    /// Runs pending shutdown hooks and erases every entry marked for removal.
    ///
    /// Does not touch the collection when nothing is marked. A failing
    /// shutdown hook does not stop the sweep: every pending hook still runs
    /// and every marked entry is erased, then the first error is returned.
    pub fn cleanup_services(&mut self) -> anyhow::Result<()> {
        if !self.entries.iter().any(|e| e.status().is_terminal()) {
            return Ok(());
        }

        let mut first_error = None;
        for entry in &mut self.entries {
            if entry.status() != ServiceStatus::Shutdown {
                continue;
            }
            log::debug!("Shutting down service {}", entry.kind());
            if let Err(err) = entry.finish() {
                log::warn!("Shutdown hook of service {} failed: {err:#}", entry.kind());
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        let before = self.entries.len();
        self.entries.retain(|e| !e.status().is_terminal());
        log::debug!("Erased {} service(s)", before - self.entries.len());

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Stops every service at application exit.
    ///
    /// Dispatches [`UpdateTiming::OnShutdown`], marks every entry for removal
    /// and runs a cleanup sweep, leaving the manager empty on success.
    pub fn shutdown_services(&mut self) -> anyhow::Result<()> {
        self.update_services(UpdateTiming::OnShutdown)?;
        for entry in &mut self.entries {
            entry.mark_for_removal();
        }
        self.cleanup_services()
    }

    // --- Resolution -------------------------------------------------------

    pub(crate) fn find_service(&self, kind: &ServiceKindId) -> Option<&dyn Service> {
        self.find_queryable(kind).map(|index| self.entries[index].service())
    }

    fn find_queryable(&self, kind: &ServiceKindId) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.status().is_queryable() && e.answers_to(kind))
    }

    fn find_live<K: ServiceKind>(&self) -> ServiceResult<usize> {
        let kind = ServiceKindId::of::<K>();
        let index = self
            .entries
            .iter()
            .position(|e| e.answers_to(&kind))
            .ok_or_else(not_found::<K>)?;

        let status = self.entries[index].status();
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation {
                kind: kind.name(),
                status,
            });
        }
        Ok(index)
    }
}

fn not_found<K: ServiceKind>() -> ServiceError {
    ServiceError::NotFound {
        kind: ServiceKindId::of::<K>().name(),
    }
}
