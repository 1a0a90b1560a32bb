//! Deep value equality with per-family rules and a cycle guard.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use whether_object_model::{
    same_value, Heap, ObjectError, ObjectId, PropertyKey, Value, ValueKind,
};

use crate::keys::all_keys;
use crate::like::{looks_like, Family};

/// How pattern flag strings are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagOrder {
    /// `"gi"` and `"ig"` differ.
    #[default]
    Exact,
    /// Flags compare as sets of characters.
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualOptions {
    /// Track object pairs under comparison so cyclic graphs terminate.
    /// When off, nothing is tracked or memoized: a self-referential input
    /// recurses until the stack is exhausted.
    pub guard_cycles: bool,
    pub flag_order: FlagOrder,
}

impl Default for EqualOptions {
    fn default() -> Self {
        Self {
            guard_cycles: true,
            flag_order: FlagOrder::Exact,
        }
    }
}

type Pair = (ObjectId, ObjectId);

/// Deep-equality state for comparisons over one heap.
///
/// Pairs under comparison are kept with their nesting depth; meeting one
/// again assumes it equal. Finished results are memoized, so each object
/// pair is compared at most once per call. A `true` result is only
/// memoized when it rests on no assumption about a pair that is still open:
/// a pair found unequal inside a set search is never taken for an equal one
/// later on.
pub struct Comparator<'h> {
    heap: &'h Heap,
    options: EqualOptions,
    in_progress: HashMap<Pair, usize>,
    memo: HashMap<Pair, bool>,
    /// Shallowest open pair assumed equal in the current subtree.
    assumed: usize,
}

impl<'h> Comparator<'h> {
    pub fn new(heap: &'h Heap) -> Self {
        Self::with_options(heap, EqualOptions::default())
    }

    pub fn with_options(heap: &'h Heap, options: EqualOptions) -> Self {
        Self {
            heap,
            options,
            in_progress: HashMap::new(),
            memo: HashMap::new(),
            assumed: usize::MAX,
        }
    }

    pub fn options(&self) -> &EqualOptions {
        &self.options
    }

    /// Compares two values; see [`equal`].
    pub fn equal(&mut self, a: &Value, b: &Value) -> bool {
        self.in_progress.clear();
        self.memo.clear();
        self.assumed = usize::MAX;
        self.compare(a, b)
    }

    fn compare(&mut self, a: &Value, b: &Value) -> bool {
        let heap = self.heap;
        let kind = heap.type_of(a);
        if kind != heap.type_of(b) {
            return false;
        }
        if same_value(a, b) {
            return true;
        }
        if kind != ValueKind::Object {
            return false;
        }
        // Exactly one side is null.
        let (Value::Object(x), Value::Object(y)) = (a, b) else {
            return false;
        };
        if !self.options.guard_cycles {
            return self.compare_objects(*x, *y);
        }
        let pair = (*x, *y);
        if let Some(&result) = self.memo.get(&pair) {
            return result;
        }
        if let Some(&depth) = self.in_progress.get(&pair) {
            debug!(a = ?x, b = ?y, "pair already under comparison, assuming equal");
            self.assumed = self.assumed.min(depth);
            return true;
        }

        let depth = self.in_progress.len();
        self.in_progress.insert(pair, depth);
        let outer = std::mem::replace(&mut self.assumed, usize::MAX);
        let result = self.compare_objects(*x, *y);
        self.in_progress.remove(&pair);

        // Assumptions at `depth` or deeper are settled now that `pair` is done.
        let settled = self.assumed >= depth;
        if !result || settled {
            self.memo.insert(pair, result);
        }
        self.assumed = if settled {
            outer
        } else {
            outer.min(self.assumed)
        };
        result
    }

    fn compare_objects(&mut self, x: ObjectId, y: ObjectId) -> bool {
        let heap = self.heap;
        let (a, b) = (Value::Object(x), Value::Object(y));
        let both = |family| looks_like(heap, family, &a) && looks_like(heap, family, &b);

        if both(Family::Date) {
            return match read_both("Date", heap.date_value(x), heap.date_value(y)) {
                Some((l, r)) => l == r,
                None => false,
            };
        }
        if both(Family::RegExp) {
            let sources = read_both("RegExp", heap.regexp_source(x), heap.regexp_source(y));
            let flags = read_both("RegExp", heap.regexp_flags(x), heap.regexp_flags(y));
            return match (sources, flags) {
                (Some((ls, rs)), Some((lf, rf))) => ls == rs && self.flags_equal(lf, rf),
                _ => false,
            };
        }
        if heap.is_array(&a) && heap.is_array(&b) {
            return self.compare_arrays(x, y);
        }
        if both(Family::Map) {
            return self.compare_maps(x, y);
        }
        if both(Family::Set) {
            return self.compare_sets(x, y);
        }
        self.compare_keyed(x, y)
    }

    fn flags_equal(&self, l: &str, r: &str) -> bool {
        match self.options.flag_order {
            FlagOrder::Exact => l == r,
            FlagOrder::Unordered => {
                let mut l: Vec<char> = l.chars().collect();
                let mut r: Vec<char> = r.chars().collect();
                l.sort_unstable();
                r.sort_unstable();
                l == r
            }
        }
    }

    fn compare_arrays(&mut self, x: ObjectId, y: ObjectId) -> bool {
        let heap = self.heap;
        let Some((len, other_len)) = read_both("Array", heap.array_length(x), heap.array_length(y))
        else {
            return false;
        };
        if len != other_len {
            return false;
        }
        for i in 0..len {
            let key = PropertyKey::index(i);
            let Some((l, r)) = read_both("Array", heap.get(x, &key), heap.get(y, &key)) else {
                return false;
            };
            if !self.compare(&l, &r) {
                return false;
            }
        }
        true
    }

    /// Keys must match exactly (SameValueZero); values recursively.
    fn compare_maps(&mut self, x: ObjectId, y: ObjectId) -> bool {
        let heap = self.heap;
        let Some((entries, other)) = read_both("Map", heap.map_entries(x), heap.map_entries(y))
        else {
            return false;
        };
        if entries.len() != other.len() {
            return false;
        }
        for (key, value) in entries {
            let Ok(Some(other_value)) = heap.map_get(y, key) else {
                return false;
            };
            if !self.compare(value, other_value) {
                return false;
            }
        }
        true
    }

    /// Quadratic: every element of `x` needs some equal element in `y`.
    fn compare_sets(&mut self, x: ObjectId, y: ObjectId) -> bool {
        let heap = self.heap;
        let Some((values, other)) = read_both("Set", heap.set_values(x), heap.set_values(y))
        else {
            return false;
        };
        if values.len() != other.len() {
            return false;
        }
        values
            .iter()
            .all(|value| other.iter().any(|candidate| self.compare(value, candidate)))
    }

    fn compare_keyed(&mut self, x: ObjectId, y: ObjectId) -> bool {
        let heap = self.heap;
        let keys = all_keys(heap, x);
        let other_keys = all_keys(heap, y);
        if keys.len() != other_keys.len() {
            return false;
        }
        for key in &keys {
            if !other_keys.contains(key) {
                return false;
            }
            let Some((l, r)) = read_both("Object", heap.get(x, key), heap.get(y, key)) else {
                return false;
            };
            if !self.compare(&l, &r) {
                return false;
            }
        }
        true
    }
}

/// Pairs two slot reads; a failure on either side makes the pair unequal.
fn read_both<T>(
    family: &'static str,
    l: Result<T, ObjectError>,
    r: Result<T, ObjectError>,
) -> Option<(T, T)> {
    match (l, r) {
        (Ok(l), Ok(r)) => Some((l, r)),
        (Err(err), _) | (_, Err(err)) => {
            debug!(family, %err, "slot read failed during comparison");
            None
        }
    }
}

/// Deep value equality.
///
/// Rules, first match wins:
/// 1. different `typeof` → unequal;
/// 2. SameValue → equal (`NaN` equals `NaN`, `+0` differs from `-0`);
/// 3. non-objects → unequal; exactly one `null` → unequal;
/// 4. Date-like pair → same time value;
/// 5. RegExp-like pair → same source and same flag string;
/// 6. arrays → same length, elements equal in index order;
/// 7. Map-like pair → same size, every key of `a` in `b` with an equal value;
/// 8. Set-like pair → same size, every element of `a` equal to one in `b`;
/// 9. otherwise → same prototype-chain key sets with equal values.
///
/// Object pairs already under comparison are assumed equal, so cyclic
/// graphs terminate, and settled pairs are not compared twice: the work is
/// bounded by the number of distinct reachable object pairs.
///
/// # Examples
///
/// ```
/// use whether_equal::equal;
/// use whether_object_model::Heap;
///
/// let mut heap = Heap::new();
/// let a = heap.alloc_set(vec![1.into(), 2.into(), 3.into()]);
/// let b = heap.alloc_set(vec![3.into(), 2.into(), 1.into()]);
/// assert!(equal(&heap, &a.into(), &b.into()));
/// ```
pub fn equal(heap: &Heap, a: &Value, b: &Value) -> bool {
    Comparator::new(heap).equal(a, b)
}

pub fn equal_with(heap: &Heap, a: &Value, b: &Value, options: &EqualOptions) -> bool {
    Comparator::with_options(heap, options.clone()).equal(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use whether_object_model::{Builtin, FunctionKind, ProxyTraps};

    #[test]
    fn functions_compare_by_identity() {
        let mut heap = Heap::new();
        let f = heap.alloc_function(FunctionKind::Plain);
        let g = heap.alloc_function(FunctionKind::Plain);
        assert!(equal(&heap, &f.into(), &f.into()));
        assert!(!equal(&heap, &f.into(), &g.into()));
    }

    #[test]
    fn null_against_object() {
        let mut heap = Heap::new();
        let obj = heap.alloc_plain();
        assert!(!equal(&heap, &Value::Null, &obj.into()));
        assert!(!equal(&heap, &obj.into(), &Value::Null));
        assert!(equal(&heap, &Value::Null, &Value::Null));
    }

    #[test]
    fn self_cycle_terminates() {
        let mut heap = Heap::new();
        let a = heap.alloc_plain();
        let b = heap.alloc_plain();
        heap.define(a, "self", a);
        heap.define(b, "self", b);
        assert!(equal(&heap, &a.into(), &b.into()));
    }

    #[test]
    fn crossed_cycle_with_difference() {
        let mut heap = Heap::new();
        let a = heap.alloc_plain();
        let b = heap.alloc_plain();
        heap.define(a, "foo", 1);
        heap.define(b, "foo", 2);
        heap.define(a, "peer", b);
        heap.define(b, "peer", a);
        assert!(!equal(&heap, &a.into(), &b.into()));
    }

    #[test]
    fn visited_pairs_do_not_leak_out_of_set_search() {
        let mut heap = Heap::new();
        let x1 = heap.import_json(&serde_json::json!({"v": 1}));
        let x2 = heap.import_json(&serde_json::json!({"v": 2}));
        let y1 = heap.import_json(&serde_json::json!({"v": 1}));
        let y2 = heap.import_json(&serde_json::json!({"v": 2}));
        let a = heap.alloc_set(vec![x1.clone(), x2.clone()]);
        let b = heap.alloc_set(vec![y2.clone(), y1.clone()]);
        // Inside the set search x1 is tried against y2 first and fails.
        let left = heap.alloc_array(vec![a.into(), x1]);
        let right = heap.alloc_array(vec![b.into(), y2]);
        assert!(!equal(&heap, &left.into(), &right.into()));
    }

    fn shared_chain(heap: &mut Heap, depth: usize, leaf: i32) -> Value {
        let mut node = Value::from(leaf);
        for _ in 0..depth {
            let obj = heap.alloc_plain();
            heap.define(obj, "l", node.clone());
            heap.define(obj, "r", node);
            node = obj.into();
        }
        node
    }

    #[test]
    fn shared_subgraphs_are_compared_once() {
        let mut heap = Heap::new();
        let a = shared_chain(&mut heap, 12, 1);
        let b = shared_chain(&mut heap, 12, 1);
        let mut comparator = Comparator::new(&heap);
        assert!(comparator.options().guard_cycles);
        assert!(comparator.equal(&a, &b));
        // One memo entry per chain level.
        assert_eq!(comparator.memo.len(), 12);
        assert!(comparator.in_progress.is_empty());
    }

    #[test]
    fn cycle_assumption_is_not_memoized_early() {
        let mut heap = Heap::new();
        // a -> inner_a -> a, b -> inner_b -> b
        let a = heap.alloc_plain();
        let b = heap.alloc_plain();
        let inner_a = heap.alloc_plain();
        let inner_b = heap.alloc_plain();
        heap.define(inner_a, "back", a);
        heap.define(inner_b, "back", b);
        heap.define(a, "inner", inner_a);
        heap.define(b, "inner", inner_b);
        let mut comparator = Comparator::new(&heap);
        assert!(comparator.equal(&a.into(), &b.into()));
        assert_eq!(comparator.memo.get(&(a, b)), Some(&true));
        // The inner pair leaned on the open outer pair.
        assert_eq!(comparator.memo.get(&(inner_a, inner_b)), None);
    }

    #[test]
    fn flag_order_option() {
        let mut heap = Heap::new();
        let gi = heap.alloc_regexp("abc", "gi");
        let ig = heap.alloc_regexp("abc", "ig");
        assert!(!equal(&heap, &gi.into(), &ig.into()));
        let options = EqualOptions {
            flag_order: FlagOrder::Unordered,
            ..EqualOptions::default()
        };
        assert!(equal_with(&heap, &gi.into(), &ig.into(), &options));
        let comparator = Comparator::with_options(&heap, options.clone());
        assert_eq!(comparator.options(), &options);
    }

    #[test]
    fn fake_date_shells_are_unequal() {
        let mut heap = Heap::new();
        let proto = heap.main_realm().prototype(Builtin::Date);
        let a = heap.alloc_object(Some(proto));
        let b = heap.alloc_object(Some(proto));
        assert!(equal(&heap, &a.into(), &a.into()));
        assert!(!equal(&heap, &a.into(), &b.into()));
    }

    #[test]
    fn proxied_arrays_compare_elementwise() {
        let mut heap = Heap::new();
        let arr = heap.alloc_array(vec![1.into(), 2.into()]);
        let other = heap.alloc_array(vec![1.into(), 2.into()]);
        let proxy = heap.alloc_proxy(arr, ProxyTraps::transparent());
        assert!(equal(&heap, &proxy.into(), &other.into()));
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: EqualOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, EqualOptions::default());
        let options: EqualOptions =
            serde_json::from_str(r#"{"flag_order":"unordered","guard_cycles":false}"#).unwrap();
        assert_eq!(options.flag_order, FlagOrder::Unordered);
        assert!(!options.guard_cycles);
    }
}
