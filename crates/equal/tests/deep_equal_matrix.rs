//! Deep equality matrix: reflexivity, symmetry, type mismatches, family
//! rules (dates, patterns, arrays, maps, sets) and keyed objects.

use serde_json::json;
use whether_equal::{equal, equal_with, EqualOptions};
use whether_object_model::{Heap, PropertyKey, ProxyTraps, Value};

fn json_equal(a: serde_json::Value, b: serde_json::Value) -> bool {
    let mut heap = Heap::new();
    let a = heap.import_json(&a);
    let b = heap.import_json(&b);
    equal(&heap, &a, &b)
}

fn symmetric(heap: &Heap, a: &Value, b: &Value) -> bool {
    let forward = equal(heap, a, b);
    assert_eq!(forward, equal(heap, b, a), "asymmetric result");
    forward
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

#[test]
fn primitives_with_same_value() {
    let heap = Heap::new();
    for v in [
        Value::from(1),
        Value::from("a"),
        Value::Bool(true),
        Value::Null,
        Value::Undefined,
        Value::Number(f64::NAN),
        Value::Number(0.0),
        Value::Number(-0.0),
        Value::BigInt(7),
    ] {
        assert!(equal(&heap, &v, &v.clone()), "{v:?}");
    }
}

#[test]
fn primitives_with_different_value() {
    let heap = Heap::new();
    assert!(!symmetric(&heap, &Value::from(1), &Value::from(2)));
    assert!(!symmetric(&heap, &Value::from("a"), &Value::from("b")));
    assert!(!symmetric(&heap, &Value::Bool(true), &Value::Bool(false)));
    assert!(!symmetric(&heap, &Value::Null, &Value::Undefined));
    assert!(!symmetric(&heap, &Value::BigInt(1), &Value::BigInt(2)));
}

#[test]
fn signed_zero_is_distinct() {
    let heap = Heap::new();
    assert!(!symmetric(&heap, &Value::Number(0.0), &Value::Number(-0.0)));
}

#[test]
fn no_coercion_across_kinds() {
    let heap = Heap::new();
    assert!(!symmetric(&heap, &Value::from(1), &Value::from("1")));
    assert!(!symmetric(&heap, &Value::from(1), &Value::BigInt(1)));
    assert!(!symmetric(&heap, &Value::from(0), &Value::Bool(false)));
    assert!(!symmetric(&heap, &Value::from(""), &Value::Undefined));
}

#[test]
fn symbols_compare_by_identity() {
    let mut heap = Heap::new();
    let a = heap.alloc_symbol("x");
    let b = heap.alloc_symbol("x");
    assert!(equal(&heap, &a.into(), &a.into()));
    assert!(!symmetric(&heap, &a.into(), &b.into()));
}

// ---------------------------------------------------------------------------
// JSON-shaped data
// ---------------------------------------------------------------------------

#[test]
fn null_not_equal_empty_containers() {
    assert!(!json_equal(json!(null), json!(0)));
    assert!(!json_equal(json!(null), json!([])));
    assert!(!json_equal(json!(null), json!({})));
    assert!(!json_equal(json!({}), json!(null)));
}

#[test]
fn arrays_are_order_sensitive() {
    assert!(json_equal(json!([1, 2, 3]), json!([1, 2, 3])));
    assert!(!json_equal(json!([1, 2]), json!([2, 1])));
    assert!(json_equal(json!([1, [2, 3]]), json!([1, [2, 3]])));
    assert!(!json_equal(json!([1, [2, 3]]), json!([1, [3, 2]])));
}

#[test]
fn arrays_of_different_length() {
    assert!(!json_equal(json!([1, 2]), json!([1, 2, 3])));
    assert!(!json_equal(json!([1, 2, 3]), json!([1, 2])));
}

#[test]
fn objects_ignore_key_order() {
    assert!(json_equal(json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})));
    assert!(!json_equal(json!({"a": 1, "b": 2}), json!({"a": 1, "b": 3})));
    assert!(json_equal(json!({"a": {"b": 2}}), json!({"a": {"b": 2}})));
    assert!(!json_equal(json!({"a": {"b": 2}}), json!({"a": {"b": 3}})));
}

#[test]
fn objects_with_extra_or_different_keys() {
    assert!(!json_equal(json!({"a": 1}), json!({"a": 1, "b": 2})));
    assert!(!json_equal(json!({"a": 1}), json!({"b": 1})));
}

#[test]
fn undefined_valued_key_still_counts() {
    let mut heap = Heap::new();
    let a = heap.alloc_plain();
    let b = heap.alloc_plain();
    heap.define(a, "a", 1);
    heap.define(b, "a", 1);
    heap.define(b, "b", Value::Undefined);
    assert!(!symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn deeply_nested_equal() {
    let a = json!({
        "prop1": "value1",
        "prop4": {
            "subProp1": "sub value1",
            "subProp2": {
                "subSubProp1": "sub sub value1",
                "subSubProp2": [1, 2, {"prop2": 1, "prop": 2}, 4, 5]
            }
        },
        "prop5": 1000
    });
    let b = json!({
        "prop5": 1000,
        "prop1": "value1",
        "prop4": {
            "subProp2": {
                "subSubProp2": [1, 2, {"prop": 2, "prop2": 1}, 4, 5],
                "subSubProp1": "sub sub value1"
            },
            "subProp1": "sub value1"
        }
    });
    assert!(json_equal(a, b));
}

#[test]
fn arrays_are_not_plain_objects() {
    assert!(!json_equal(json!([]), json!({})));
    assert!(!json_equal(json!({}), json!([])));
}

// ---------------------------------------------------------------------------
// Dates and patterns
// ---------------------------------------------------------------------------

#[test]
fn dates_compare_by_time_value() {
    let mut heap = Heap::new();
    let a = heap.alloc_date(123.0);
    let b = heap.alloc_date(123.0);
    let c = heap.alloc_date(456.0);
    assert!(symmetric(&heap, &a.into(), &b.into()));
    assert!(!symmetric(&heap, &a.into(), &c.into()));
}

#[test]
fn invalid_dates_are_never_equal() {
    let mut heap = Heap::new();
    let a = heap.alloc_date(f64::NAN);
    let b = heap.alloc_date(f64::NAN);
    assert!(!symmetric(&heap, &a.into(), &b.into()));
    assert!(equal(&heap, &a.into(), &a.into()));
}

#[test]
fn date_is_not_a_plain_object() {
    let mut heap = Heap::new();
    let date = heap.alloc_date(0.0);
    let plain = heap.alloc_plain();
    assert!(!symmetric(&heap, &date.into(), &plain.into()));
}

#[test]
fn patterns_compare_source_and_flags() {
    let mut heap = Heap::new();
    let gi = heap.alloc_regexp("abc", "gi");
    let gi2 = heap.alloc_regexp("abc", "gi");
    let g = heap.alloc_regexp("abc", "g");
    let i = heap.alloc_regexp("abc", "i");
    let def = heap.alloc_regexp("def", "g");
    assert!(symmetric(&heap, &gi.into(), &gi2.into()));
    assert!(!symmetric(&heap, &g.into(), &i.into()));
    assert!(!symmetric(&heap, &g.into(), &def.into()));
}

#[test]
fn pattern_flags_are_order_sensitive_by_default() {
    let mut heap = Heap::new();
    let gi = heap.alloc_regexp("abc", "gi");
    let ig = heap.alloc_regexp("abc", "ig");
    assert!(!symmetric(&heap, &gi.into(), &ig.into()));
}

// ---------------------------------------------------------------------------
// Maps and sets
// ---------------------------------------------------------------------------

#[test]
fn maps_ignore_entry_order() {
    let mut heap = Heap::new();
    let m1 = heap.alloc_map(vec![(1.into(), "a".into()), (2.into(), "b".into())]);
    let m2 = heap.alloc_map(vec![(1.into(), "a".into()), (2.into(), "b".into())]);
    let m3 = heap.alloc_map(vec![(2.into(), "b".into()), (1.into(), "a".into())]);
    let m4 = heap.alloc_map(vec![(1.into(), "a".into()), (2.into(), "c".into())]);
    assert!(symmetric(&heap, &m1.into(), &m2.into()));
    assert!(symmetric(&heap, &m1.into(), &m3.into()));
    assert!(!symmetric(&heap, &m1.into(), &m4.into()));
}

#[test]
fn map_keys_match_exactly() {
    let mut heap = Heap::new();
    let k1 = heap.alloc_plain();
    let k2 = heap.alloc_plain();
    let a = heap.alloc_map(vec![(k1.into(), 1.into())]);
    let b = heap.alloc_map(vec![(k2.into(), 1.into())]);
    let c = heap.alloc_map(vec![(k1.into(), 1.into())]);
    // Structurally equal keys are still different keys.
    assert!(!symmetric(&heap, &a.into(), &b.into()));
    assert!(symmetric(&heap, &a.into(), &c.into()));
}

#[test]
fn map_values_compare_deeply() {
    let mut heap = Heap::new();
    let v1 = heap.import_json(&json!({"b": 2}));
    let v2 = heap.import_json(&json!({"b": 2}));
    let a = heap.alloc_map(vec![(1.into(), v1)]);
    let b = heap.alloc_map(vec![(1.into(), v2)]);
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn map_signed_zero_keys_are_one_key() {
    let mut heap = Heap::new();
    let a = heap.alloc_map(vec![(Value::Number(0.0), 1.into())]);
    let b = heap.alloc_map(vec![(Value::Number(-0.0), 1.into())]);
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn sets_ignore_order_but_not_size() {
    let mut heap = Heap::new();
    let s1 = heap.alloc_set(vec![1.into(), 2.into(), 3.into()]);
    let s2 = heap.alloc_set(vec![3.into(), 2.into(), 1.into()]);
    let s3 = heap.alloc_set(vec![1.into(), 2.into()]);
    assert!(symmetric(&heap, &s1.into(), &s2.into()));
    assert!(!symmetric(&heap, &s1.into(), &s3.into()));
}

#[test]
fn set_elements_compare_deeply() {
    let mut heap = Heap::new();
    let x = heap.import_json(&json!([1, 2]));
    let y = heap.import_json(&json!([1, 2]));
    let a = heap.alloc_set(vec![x, "z".into()]);
    let b = heap.alloc_set(vec!["z".into(), y]);
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn set_is_not_a_map() {
    let mut heap = Heap::new();
    let set = heap.alloc_set(vec![]);
    let map = heap.alloc_map(vec![]);
    assert!(!symmetric(&heap, &set.into(), &map.into()));
}

// ---------------------------------------------------------------------------
// Keyed objects
// ---------------------------------------------------------------------------

#[test]
fn symbol_keys_take_part() {
    let mut heap = Heap::new();
    let sym = heap.alloc_symbol("x");
    let a = heap.alloc_plain();
    let b = heap.alloc_plain();
    let c = heap.alloc_plain();
    heap.define(a, sym, 1);
    heap.define(b, sym, 1);
    heap.define(c, sym, 2);
    assert!(symmetric(&heap, &a.into(), &b.into()));
    assert!(!symmetric(&heap, &a.into(), &c.into()));
}

#[test]
fn inherited_keys_take_part() {
    let mut heap = Heap::new();
    let base = heap.alloc_plain();
    heap.define(base, "shared", 1);
    let a = heap.alloc_object(Some(base));
    let b = heap.alloc_plain();
    heap.define(b, "shared", 1);
    // Same key set and same values, wherever the key lives.
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn nested_mixed_structures() {
    let mut heap = Heap::new();
    let build = |heap: &mut Heap, order: [i32; 2]| {
        let set = heap.alloc_set(vec![order[0].into(), order[1].into()]);
        let inner = heap.alloc_plain();
        heap.define(inner, "y", set);
        let x = heap.alloc_array(vec![1.into(), inner.into()]);
        let map_value = heap.import_json(&json!({"b": 2}));
        let z = heap.alloc_map(vec![(1.into(), map_value)]);
        let root = heap.alloc_plain();
        heap.define(root, "x", x);
        heap.define(root, "z", z);
        root
    };
    let a = build(&mut heap, [2, 3]);
    let b = build(&mut heap, [3, 2]);
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

// ---------------------------------------------------------------------------
// Cross-realm values and proxies
// ---------------------------------------------------------------------------

#[test]
fn cross_realm_dates_compare_by_time() {
    let mut heap = Heap::new();
    let other = heap.new_realm();
    let local = heap.alloc_date(5.0);
    let foreign = heap.in_realm(other).alloc_date(5.0);
    let later = heap.in_realm(other).alloc_date(6.0);
    assert!(symmetric(&heap, &local.into(), &foreign.into()));
    assert!(!symmetric(&heap, &local.into(), &later.into()));
}

#[test]
fn cross_realm_sets_and_maps() {
    let mut heap = Heap::new();
    let other = heap.new_realm();
    let local_set = heap.alloc_set(vec![1.into(), 2.into()]);
    let foreign_set = heap.in_realm(other).alloc_set(vec![2.into(), 1.into()]);
    assert!(symmetric(&heap, &local_set.into(), &foreign_set.into()));

    let local_map = heap.alloc_map(vec![("k".into(), 1.into())]);
    let foreign_map = heap.in_realm(other).alloc_map(vec![("k".into(), 1.into())]);
    assert!(symmetric(&heap, &local_map.into(), &foreign_map.into()));
}

#[test]
fn cross_realm_plain_objects_differ_in_inherited_methods() {
    let mut heap = Heap::new();
    let other = heap.new_realm();
    let local = heap.import_json(&json!({"a": 1}));
    let foreign = heap.import_json_in(other, &json!({"a": 1}));
    // `toString` and friends are distinct function objects per realm.
    assert!(!symmetric(&heap, &local, &foreign));
}

#[test]
fn proxy_keys_are_seen_through() {
    let mut heap = Heap::new();
    let target = heap.import_json(&json!({"a": 1})).as_object().unwrap();
    let proxy = heap.alloc_proxy(target, ProxyTraps::transparent());
    let copy = heap.import_json(&json!({"a": 1}));
    assert!(symmetric(&heap, &proxy.into(), &copy));
}

#[test]
fn proxied_array_with_bogus_length_is_unequal() {
    let mut heap = Heap::new();
    let target = heap.alloc_array(vec![1.into(), 2.into()]);
    let copy = heap.alloc_array(vec![1.into(), 2.into()]);
    let huge = heap.alloc_proxy(target, ProxyTraps::transparent().with_get("length", 1e300));
    let fractional = heap.alloc_proxy(target, ProxyTraps::transparent().with_get("length", 2.5));
    assert!(!symmetric(&heap, &huge.into(), &copy.into()));
    assert!(!symmetric(&heap, &fractional.into(), &copy.into()));
}

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

#[test]
fn mutually_referencing_objects_terminate() {
    let mut heap = Heap::new();
    let a = heap.alloc_plain();
    let b = heap.alloc_plain();
    heap.define(a, "foo", 1);
    heap.define(b, "foo", 1);
    heap.define(a, "self", b);
    heap.define(b, "self", a);
    assert!(symmetric(&heap, &a.into(), &b.into()));
}

#[test]
fn cyclic_arrays_terminate() {
    let mut heap = Heap::new();
    let a = heap.alloc_array(vec![1.into()]);
    let b = heap.alloc_array(vec![1.into()]);
    heap.define(a, PropertyKey::index(1), a);
    heap.define(b, PropertyKey::index(1), b);
    assert!(symmetric(&heap, &a.into(), &b.into()));

    let c = heap.alloc_array(vec![2.into()]);
    heap.define(c, PropertyKey::index(1), c);
    assert!(!symmetric(&heap, &a.into(), &c.into()));
}

fn doubled_chain(heap: &mut Heap, depth: usize, leaf: &str) -> Value {
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
fn shared_nodes_do_not_blow_up() {
    // 2^30 paths but only 30 distinct node pairs.
    let mut heap = Heap::new();
    let a = doubled_chain(&mut heap, 30, "leaf");
    let b = doubled_chain(&mut heap, 30, "leaf");
    let c = doubled_chain(&mut heap, 30, "other");
    let started = std::time::Instant::now();
    assert!(symmetric(&heap, &a, &b));
    assert!(!symmetric(&heap, &a, &c));
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

#[test]
fn shared_nodes_inside_cycles() {
    let mut heap = Heap::new();
    let a = doubled_chain(&mut heap, 20, "leaf");
    let b = doubled_chain(&mut heap, 20, "leaf");
    let (ra, rb) = (a.as_object().unwrap(), b.as_object().unwrap());
    heap.define(ra, "root", ra);
    heap.define(rb, "root", rb);
    assert!(symmetric(&heap, &a, &b));
}

#[test]
fn acyclic_input_is_unaffected_by_guard_option() {
    let mut heap = Heap::new();
    let a = heap.import_json(&json!({"a": [1, {"b": null}]}));
    let b = heap.import_json(&json!({"a": [1, {"b": null}]}));
    let unguarded = EqualOptions {
        guard_cycles: false,
        ..EqualOptions::default()
    };
    assert!(equal_with(&heap, &a, &b, &unguarded));
    assert!(equal(&heap, &a, &b));
}
