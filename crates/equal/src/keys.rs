//! Prototype-chain key enumeration.

use indexmap::IndexSet;
use whether_object_model::{Heap, ObjectId, PropertyKey, Value};

/// Deduplicated property keys. Only membership and count are meaningful.
pub type KeySet = IndexSet<PropertyKey>;

/// Every own key (string and symbol) of `obj` and of each link of its
/// prototype chain, each key once.
///
/// Uses the reflection-level `own_keys` / `get_prototype_of` operations, so
/// proxy traps are honored. A proxy that reports a cyclic chain makes this
/// loop forever.
pub fn all_keys(heap: &Heap, obj: ObjectId) -> KeySet {
    collect_chain(heap, Some(obj))
}

/// Like [`all_keys`] but starts at the prototype of `obj`, leaving out its
/// own keys.
pub fn prototype_keys(heap: &Heap, obj: ObjectId) -> KeySet {
    collect_chain(heap, heap.get_prototype_of(obj))
}

/// [`all_keys`] for an arbitrary value; `None` for primitives.
pub fn value_keys(heap: &Heap, value: &Value) -> Option<KeySet> {
    value.as_object().map(|obj| all_keys(heap, obj))
}

fn collect_chain(heap: &Heap, start: Option<ObjectId>) -> KeySet {
    let mut keys = KeySet::new();
    let mut current = start;
    while let Some(link) = current {
        keys.extend(heap.own_keys(link));
        current = heap.get_prototype_of(link);
    }
    keys
}
