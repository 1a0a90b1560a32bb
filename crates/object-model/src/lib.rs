//! whether-object-model - Dynamic object model inspected by the `whether`
//! crates.
//!
//! Values live on an arena [`Heap`]: every object has a prototype link,
//! string/symbol keyed properties and an internal slot (array elements, date
//! time value, pattern source and flags, map entries, set values, ...).
//! A heap holds one or more [`Realm`]s, each with its own intrinsic
//! prototypes and constructors, so cross-realm values can be modelled.
//! Proxies honor `ownKeys`, `getPrototypeOf` and `get` traps.
//!
//! Reflection operations ([`Heap::own_keys`], [`Heap::get_prototype_of`],
//! [`Heap::get`], [`Heap::property_kind`]) borrow the heap immutably.

mod error;
mod heap;
mod intrinsics;
mod json;
mod object;
mod value;

pub use error::ObjectError;
pub use heap::{Heap, RealmScope};
pub use intrinsics::{Builtin, Realm, RealmId};
pub use object::{FunctionKind, NativeGetter, PromiseState, Property, ProxyTraps};
pub use value::{
    same_value, same_value_zero, ObjectId, PropertyKey, SymbolId, Value, ValueKind,
    WellKnownSymbol,
};
