//! whether - type and shape predicates for runtime values.
//!
//! [`Whether`] bundles the predicates over one [`Heap`]: `typeof`-style tag
//! tests, number classification, emptiness checks, structural family
//! checks backed by [`whether_equal::looks_like`], and deep equality. Every
//! single-argument tag test has an `or_*` twin that also accepts
//! `undefined`, for optional fields.
//!
//! ```
//! use whether::Whether;
//! use whether_object_model::{Heap, Value};
//!
//! let mut heap = Heap::new();
//! let set = heap.alloc_set(vec![1.into()]);
//! let w = Whether::new(&heap);
//! assert!(w.is_set(&set.into()));
//! assert!(w.or_string(&Value::Undefined));
//! ```

mod optional;
mod predicates;

pub use predicates::Whether;
pub use whether_object_model::{Heap, Value};
