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

//! Declared service hierarchies.
//!
//! Rust has no class inheritance, so every type taking part in a service
//! hierarchy declares the kind it refines through [`ServiceKind::parent`].
//! Walking those declarations from a concrete kind up to [`ServiceRoot`]
//! yields its [`ServiceLineage`]; the last kind before the root is the
//! *base kind*, which is the registry's uniqueness key.
//!
//! ```rust
//! use tessera_core::service::{ServiceKindId, ServiceLineage};
//! use tessera_core::service_kind;
//!
//! struct Audio;
//! struct Mixer;
//! service_kind!(Audio);
//! service_kind!(Mixer: Audio);
//!
//! let lineage = ServiceLineage::resolve(ServiceKindId::of::<Mixer>()).unwrap();
//! assert_eq!(lineage.base(), ServiceKindId::of::<Audio>());
//! ```

use super::error::{ServiceError, ServiceResult};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Upper bound on the number of kinds between a concrete kind and the root.
///
/// Declarations are written by hand, so a cycle is a possible mistake; the
/// bound turns it into a [`ServiceError::DetachedLineage`] instead of a hang.
pub const MAX_LINEAGE_DEPTH: usize = 16;

/// The abstract root every service hierarchy descends from.
///
/// It cannot be instantiated and never resolves in a lookup: querying the
/// registry by `ServiceRoot` always reports that nothing was found.
pub enum ServiceRoot {}

/// A type that takes part in a service hierarchy.
///
/// Prefer the [`service_kind!`](crate::service_kind) macro over writing the
/// impl by hand.
pub trait ServiceKind: 'static {
    /// The kind this one directly refines.
    ///
    /// Base kinds return `Some(ServiceKindId::root())`. Only [`ServiceRoot`]
    /// itself returns `None`.
    fn parent() -> Option<ServiceKindId>;
}

impl ServiceKind for ServiceRoot {
    fn parent() -> Option<ServiceKindId> {
        None
    }
}

/// Runtime tag of a [`ServiceKind`].
///
/// Two ids are equal when they name the same Rust type.
#[derive(Clone, Copy)]
pub struct ServiceKindId {
    type_id: TypeId,
    name: &'static str,
    parent: fn() -> Option<ServiceKindId>,
}

impl ServiceKindId {
    /// Returns the tag of `K`.
    pub fn of<K: ServiceKind>() -> Self {
        Self {
            type_id: TypeId::of::<K>(),
            name: type_name::<K>(),
            parent: K::parent,
        }
    }

    /// Returns the tag of [`ServiceRoot`].
    pub fn root() -> Self {
        Self::of::<ServiceRoot>()
    }

    /// The [`TypeId`] of the tagged type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The fully qualified type name of the tagged type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared parent kind.
    pub fn parent(&self) -> Option<ServiceKindId> {
        (self.parent)()
    }

    /// Returns `true` for the tag of [`ServiceRoot`].
    pub fn is_root(&self) -> bool {
        self.type_id == TypeId::of::<ServiceRoot>()
    }
}

impl PartialEq for ServiceKindId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKindId {}

impl Hash for ServiceKindId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ServiceKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKindId").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The resolved ancestry of a concrete kind.
///
/// Ordered from the concrete kind to the base kind; the root is not part of
/// the chain. A lineage always holds at least one kind.
#[derive(Debug, Clone)]
pub struct ServiceLineage {
    chain: Vec<ServiceKindId>,
}

impl ServiceLineage {
    /// Walks the parent declarations of `kind` up to [`ServiceRoot`].
    ///
    /// Fails with [`ServiceError::DetachedLineage`] when `kind` is the root
    /// itself, when a declaration ends without reaching the root, or when
    /// the chain is longer than [`MAX_LINEAGE_DEPTH`].
    pub fn resolve(kind: ServiceKindId) -> ServiceResult<Self> {
        let detached = || ServiceError::DetachedLineage { kind: kind.name() };

        let mut chain = Vec::new();
        let mut current = kind;
        while !current.is_root() {
            if chain.len() == MAX_LINEAGE_DEPTH {
                return Err(detached());
            }
            chain.push(current);
            current = current.parent().ok_or_else(detached)?;
        }

        if chain.is_empty() {
            return Err(detached());
        }
        Ok(Self { chain })
    }

    /// The concrete kind the lineage was resolved from.
    pub fn concrete(&self) -> ServiceKindId {
        self.chain[0]
    }

    /// The kind directly refining the root: the uniqueness key.
    pub fn base(&self) -> ServiceKindId {
        self.chain[self.chain.len() - 1]
    }

    /// Returns `true` if `kind` is the concrete kind or one of its ancestors.
    pub fn contains(&self, kind: &ServiceKindId) -> bool {
        self.chain.iter().any(|k| k == kind)
    }

    /// Number of kinds in the chain, concrete and base kind included.
    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    /// Iterates from the concrete kind to the base kind.
    pub fn iter(&self) -> impl Iterator<Item = &ServiceKindId> {
        self.chain.iter()
    }
}

/// Object-level identity of a service instance.
///
/// Implemented automatically for every [`ServiceKind`]; it is what lets a
/// `dyn Service` report its kind and be downcast.
pub trait ServiceIdentity: Any {
    /// The concrete kind of this instance.
    fn kind(&self) -> ServiceKindId;

    /// Allows downcasting to the concrete service type.
    fn as_any(&self) -> &dyn Any;

    /// Allows mutable downcasting to the concrete service type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: ServiceKind> ServiceIdentity for T {
    fn kind(&self) -> ServiceKindId {
        ServiceKindId::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Declares the position of a type in a service hierarchy.
///
/// `service_kind!(Base)` makes `Base` a base kind (it directly refines the
/// root); `service_kind!(Leaf: Parent)` makes `Leaf` refine `Parent`.
#[macro_export]
macro_rules! service_kind {
    ($kind:ty : $parent:ty) => {
        impl $crate::service::ServiceKind for $kind {
            fn parent() -> ::std::option::Option<$crate::service::ServiceKindId> {
                ::std::option::Option::Some($crate::service::ServiceKindId::of::<$parent>())
            }
        }
    };
    ($kind:ty) => {
        impl $crate::service::ServiceKind for $kind {
            fn parent() -> ::std::option::Option<$crate::service::ServiceKindId> {
                ::std::option::Option::Some($crate::service::ServiceKindId::root())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Base;
    struct Mid;
    struct Leaf;
    struct Sibling;
    struct Orphan;
    struct Ouroboros;

    crate::service_kind!(Base);
    crate::service_kind!(Mid: Base);
    crate::service_kind!(Leaf: Mid);
    crate::service_kind!(Sibling: Mid);

    impl ServiceKind for Orphan {
        fn parent() -> Option<ServiceKindId> {
            None
        }
    }

    impl ServiceKind for Ouroboros {
        fn parent() -> Option<ServiceKindId> {
            Some(ServiceKindId::of::<Ouroboros>())
        }
    }

    #[test]
    fn test_lineage_runs_from_concrete_to_base() {
        let lineage = ServiceLineage::resolve(ServiceKindId::of::<Leaf>()).unwrap();
        let chain: Vec<_> = lineage.iter().copied().collect();

        assert_eq!(
            chain,
            vec![
                ServiceKindId::of::<Leaf>(),
                ServiceKindId::of::<Mid>(),
                ServiceKindId::of::<Base>()
            ]
        );
        assert_eq!(lineage.concrete(), ServiceKindId::of::<Leaf>());
        assert_eq!(lineage.base(), ServiceKindId::of::<Base>());
        assert_eq!(lineage.depth(), 3);
    }

    #[test]
    fn test_lineage_excludes_root_and_siblings() {
        let lineage = ServiceLineage::resolve(ServiceKindId::of::<Leaf>()).unwrap();
        assert!(!lineage.contains(&ServiceKindId::root()));
        assert!(!lineage.contains(&ServiceKindId::of::<Sibling>()));
        assert!(lineage.contains(&ServiceKindId::of::<Mid>()));
    }

    #[test]
    fn test_base_kind_is_its_own_base() {
        let lineage = ServiceLineage::resolve(ServiceKindId::of::<Base>()).unwrap();
        assert_eq!(lineage.depth(), 1);
        assert_eq!(lineage.base(), ServiceKindId::of::<Base>());
    }

    #[test]
    fn test_root_and_detached_kinds_are_rejected() {
        for kind in [
            ServiceKindId::root(),
            ServiceKindId::of::<Orphan>(),
            ServiceKindId::of::<Ouroboros>(),
        ] {
            match ServiceLineage::resolve(kind) {
                Err(ServiceError::DetachedLineage { kind: name }) => {
                    assert_eq!(name, kind.name())
                }
                other => panic!("expected a detached lineage for {kind}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_kind_ids_compare_by_type() {
        assert_eq!(ServiceKindId::of::<Leaf>(), ServiceKindId::of::<Leaf>());
        assert_ne!(ServiceKindId::of::<Leaf>(), ServiceKindId::of::<Sibling>());
        assert!(ServiceKindId::root().is_root());
        assert!(ServiceKindId::of::<Base>().name().ends_with("Base"));
        assert_eq!(
            ServiceKindId::of::<Mid>().parent(),
            Some(ServiceKindId::of::<Base>())
        );
    }

    #[test]
    fn test_identity_reports_concrete_kind() {
        let leaf = Leaf;
        let identity: &dyn ServiceIdentity = &leaf;
        assert_eq!(identity.kind(), ServiceKindId::of::<Leaf>());
        assert!(identity.as_any().is::<Leaf>());
    }
}
