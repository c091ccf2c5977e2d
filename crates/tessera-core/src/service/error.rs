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

//! Errors reported by registry operations.

use super::entry::ServiceStatus;
use thiserror::Error;

/// A specialized `Result` type for registry operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// An expected, synchronous outcome of a registry operation.
///
/// Faults raised by a service's own hooks are not represented here; they
/// travel as [`anyhow::Error`] straight to the frame driver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// A live entry already occupies the base kind of the service being added.
    #[error("Service {kind} cannot be added: base kind {base} is already registered")]
    AlreadyExists {
        /// The concrete kind that was rejected.
        kind: &'static str,
        /// The base kind both services share.
        base: &'static str,
    },
    /// No live, queryable entry resolves for the requested kind.
    #[error("Service not found: {kind}")]
    NotFound {
        /// The kind that was requested.
        kind: &'static str,
    },
    /// An activity toggle or query targeted an entry already marked for removal.
    #[error("Invalid operation on service {kind}: it is in state {status:?}")]
    InvalidOperation {
        /// The kind that was requested.
        kind: &'static str,
        /// The terminal status of the resolved entry.
        status: ServiceStatus,
    },
    /// The kind's parent declarations never reach the service root.
    #[error("Service kind {kind} does not descend from the service root")]
    DetachedLineage {
        /// The kind whose lineage could not be resolved.
        kind: &'static str,
    },
}
