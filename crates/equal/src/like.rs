//! Structural ("duck-typed") instance matching.
//!
//! [`looks_like`] approximates `candidate instanceof C` for the built-in
//! families in [`Family`] when nominal checks are unreliable: cross-realm
//! values, rewritten prototypes, proxies. The candidate must expose every
//! member of the family's [`Signature`] with the same coarse kind.
//!
//! This is a heuristic. Member values are never inspected beyond their
//! kind, and a reference with an empty shape accepts any object.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::trace;
use whether_object_model::{Builtin, Heap, ObjectId, PropertyKey, Value, ValueKind};

use crate::error::MatchError;
use crate::keys::{all_keys, KeySet};

/// Built-in families the matcher knows a shape for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Date,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Promise,
    Error,
}

impl Family {
    pub const ALL: [Family; 8] = [
        Family::Date,
        Family::RegExp,
        Family::Map,
        Family::Set,
        Family::WeakMap,
        Family::WeakSet,
        Family::Promise,
        Family::Error,
    ];

    pub fn builtin(self) -> Builtin {
        match self {
            Self::Date => Builtin::Date,
            Self::RegExp => Builtin::RegExp,
            Self::Map => Builtin::Map,
            Self::Set => Builtin::Set,
            Self::WeakMap => Builtin::WeakMap,
            Self::WeakSet => Builtin::WeakSet,
            Self::Promise => Builtin::Promise,
            Self::Error => Builtin::Error,
        }
    }

    pub fn from_builtin(builtin: Builtin) -> Option<Family> {
        Self::ALL.into_iter().find(|family| family.builtin() == builtin)
    }

    /// Cached shape of a canonical instance of this family.
    pub fn signature(self) -> &'static Signature {
        &SIGNATURES[self as usize]
    }
}

static SIGNATURES: Lazy<Vec<Signature>> = Lazy::new(|| {
    Family::ALL
        .iter()
        .map(|family| {
            let signature = Signature::of_builtin(family.builtin());
            trace!(?family, members = signature.len(), "built family signature");
            signature
        })
        .collect()
});

/// Member names and coarse kinds visible on the prototype chain of a
/// canonical instance. The nearest definition of a shadowed key wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    members: Vec<(PropertyKey, ValueKind)>,
}

impl Signature {
    fn of_builtin(builtin: Builtin) -> Self {
        let mut seen = KeySet::new();
        let mut members = Vec::new();
        let mut link = Some(builtin);
        while let Some(current) = link {
            for (key, kind) in current.prototype_members() {
                if seen.insert(key.clone()) {
                    members.push((key, kind));
                }
            }
            link = current.parent();
        }
        Self { members }
    }

    /// Shape of the prototype chain starting at `proto` on a live heap.
    fn of_prototype(heap: &Heap, proto: ObjectId) -> Self {
        let members = all_keys(heap, proto)
            .into_iter()
            .filter_map(|key| {
                let kind = heap.property_kind(proto, &key)?;
                Some((key, kind))
            })
            .collect();
        Self { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: &PropertyKey) -> bool {
        self.members.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, ValueKind)> {
        self.members.iter().map(|(key, kind)| (key, *kind))
    }

    /// Steps 4-7 of the match: cardinality floor, then every member present
    /// with the same kind.
    fn admits(&self, heap: &Heap, candidate: ObjectId) -> bool {
        let keys = all_keys(heap, candidate);
        if self.len() > keys.len() {
            return false;
        }
        self.iter()
            .all(|(key, kind)| keys.contains(key) && heap.property_kind(candidate, key) == Some(kind))
    }
}

/// Does `candidate` structurally resemble an instance of `family`?
///
/// Instances whose chain contains the main realm's family prototype are
/// accepted without a shape check.
pub fn looks_like(heap: &Heap, family: Family, candidate: &Value) -> bool {
    let Value::Object(obj) = candidate else {
        return false;
    };
    let proto = heap.main_realm().prototype(family.builtin());
    if heap.chain_contains(*obj, proto) {
        return true;
    }
    if heap.is_callable(*obj) {
        return false;
    }
    family.signature().admits(heap, *obj)
}

/// [`looks_like`] for an arbitrary constructor.
///
/// Intrinsic constructors of any realm use their family's cached signature.
/// Other constructors must be invocable with no meaningful arguments; the
/// reference shape is the prototype chain a fresh instance would get.
/// A constructor whose prototype chain contributes no keys matches every
/// non-callable object.
pub fn looks_like_instance(
    heap: &Heap,
    ctor: ObjectId,
    candidate: &Value,
) -> Result<bool, MatchError> {
    let proto = heap.reference_prototype(ctor)?;
    if heap.instance_of(candidate, ctor) {
        return Ok(true);
    }
    if let Some(family) = heap.builtin_of(ctor).and_then(Family::from_builtin) {
        return Ok(looks_like(heap, family, candidate));
    }
    let Value::Object(obj) = candidate else {
        return Ok(false);
    };
    if heap.is_callable(*obj) {
        return Ok(false);
    }
    Ok(Signature::of_prototype(heap, proto).admits(heap, *obj))
}

pub fn looks_like_date(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::Date, value)
}

pub fn looks_like_reg_exp(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::RegExp, value)
}

pub fn looks_like_map(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::Map, value)
}

pub fn looks_like_set(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::Set, value)
}

pub fn looks_like_weak_map(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::WeakMap, value)
}

pub fn looks_like_weak_set(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::WeakSet, value)
}

pub fn looks_like_promise(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::Promise, value)
}

pub fn looks_like_error(heap: &Heap, value: &Value) -> bool {
    looks_like(heap, Family::Error, value)
}
