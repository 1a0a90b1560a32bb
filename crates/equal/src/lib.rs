//! whether-equal - Structural comparison engine.
//!
//! Three layers, each built on the previous one:
//!
//! - [`all_keys`]: the deduplicated keys of an object's whole prototype
//!   chain, read through reflection so proxy traps are honored.
//! - [`looks_like`]: duck-typed membership in a built-in [`Family`] (Date,
//!   RegExp, Map, Set, WeakMap, WeakSet, Promise, Error), tolerant of
//!   cross-realm values and rewritten prototypes.
//! - [`equal`]: recursive deep equality over arrays, maps, sets, dates,
//!   patterns and keyed objects, with order-sensitive and order-insensitive
//!   rules per family and a cycle guard.

mod deep_equal;
mod error;
mod keys;
mod like;

pub use deep_equal::{equal, equal_with, Comparator, EqualOptions, FlagOrder};
pub use error::MatchError;
pub use keys::{all_keys, prototype_keys, value_keys, KeySet};
pub use like::{
    looks_like, looks_like_date, looks_like_error, looks_like_instance, looks_like_map,
    looks_like_promise, looks_like_reg_exp, looks_like_set, looks_like_weak_map,
    looks_like_weak_set, Family, Signature,
};
