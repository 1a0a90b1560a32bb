use whether_equal::{equal, equal_with, looks_like, EqualOptions, Family};
use whether_object_model::{
    same_value, Builtin, FunctionKind, Heap, ObjectId, PropertyKey, Value, ValueKind,
};

/// `Number.MAX_SAFE_INTEGER`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Predicate facade over one heap.
#[derive(Clone, Copy)]
pub struct Whether<'h> {
    heap: &'h Heap,
}

impl<'h> Whether<'h> {
    pub fn new(heap: &'h Heap) -> Self {
        Self { heap }
    }

    pub fn heap(&self) -> &'h Heap {
        self.heap
    }

    // -- conceptual checks -------------------------------------------------

    /// `Object.is`.
    pub fn is(&self, a: &Value, b: &Value) -> bool {
        same_value(a, b)
    }

    /// Not one of `undefined`, `null`, `false`, `±0`, `NaN`, `0n` or `""`.
    pub fn is_truthy(&self, value: &Value) -> bool {
        value.is_truthy()
    }

    pub fn is_falsy(&self, value: &Value) -> bool {
        !value.is_truthy()
    }

    /// Falsy values, zero-length arrays and non-callable objects without
    /// own keys.
    pub fn is_empty(&self, value: &Value) -> bool {
        if !value.is_truthy() {
            return true;
        }
        if let Some(len) = self.array_len(value) {
            return len == 0;
        }
        match value {
            Value::Object(obj) if !self.heap.is_callable(*obj) => {
                self.heap.own_keys(*obj).is_empty()
            }
            _ => false,
        }
    }

    /// `None` unless `value` is a non-null, non-callable object.
    pub fn is_empty_object(&self, value: &Value) -> Option<bool> {
        match value {
            Value::Object(obj) if !self.heap.is_callable(*obj) => {
                Some(self.heap.own_keys(*obj).is_empty())
            }
            _ => None,
        }
    }

    /// `None` unless `value` is an array.
    pub fn is_empty_array(&self, value: &Value) -> Option<bool> {
        self.array_len(value).map(|len| len == 0)
    }

    pub fn is_negative_zero(&self, value: &Value) -> bool {
        same_value(value, &Value::Number(-0.0))
    }

    pub fn is_positive_zero(&self, value: &Value) -> bool {
        same_value(value, &Value::Number(0.0))
    }

    pub fn is_error(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::Error, value)
    }

    pub fn is_date(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::Date, value)
    }

    pub fn is_promise(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::Promise, value)
    }

    pub fn is_set(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::Set, value)
    }

    pub fn is_map(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::Map, value)
    }

    pub fn is_weak_set(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::WeakSet, value)
    }

    pub fn is_weak_map(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::WeakMap, value)
    }

    pub fn is_reg_exp(&self, value: &Value) -> bool {
        looks_like(self.heap, Family::RegExp, value)
    }

    /// Non-empty strings, and objects whose `Symbol.iterator` is a function.
    pub fn is_iterable(&self, value: &Value) -> bool {
        self.heap.is_iterable(value)
    }

    /// An object whose prototype is the main realm's `Object.prototype` or
    /// `null`. Proxies report their `getPrototypeOf` trap.
    pub fn is_plain_object(&self, value: &Value) -> bool {
        let Value::Object(obj) = value else {
            return false;
        };
        if self.heap.is_callable(*obj) {
            return false;
        }
        match self.heap.get_prototype_of(*obj) {
            None => true,
            Some(proto) => proto == self.heap.main_realm().prototype(Builtin::Object),
        }
    }

    // -- tag checks --------------------------------------------------------

    /// `typeof value === "object"` and not `null`.
    pub fn is_object(&self, value: &Value) -> bool {
        self.kind(value) == ValueKind::Object && !value.is_null()
    }

    /// A non-null object or a function.
    pub fn like_object(&self, value: &Value) -> bool {
        matches!(value, Value::Object(_))
    }

    pub fn is_function(&self, value: &Value) -> bool {
        self.kind(value) == ValueKind::Function
    }

    pub fn is_string(&self, value: &Value) -> bool {
        matches!(value, Value::String(_))
    }

    pub fn is_number(&self, value: &Value) -> bool {
        matches!(value, Value::Number(_))
    }

    pub fn is_boolean(&self, value: &Value) -> bool {
        matches!(value, Value::Bool(_))
    }

    pub fn is_undefined(&self, value: &Value) -> bool {
        value.is_undefined()
    }

    pub fn is_null(&self, value: &Value) -> bool {
        value.is_null()
    }

    pub fn is_symbol(&self, value: &Value) -> bool {
        matches!(value, Value::Symbol(_))
    }

    pub fn is_big_int(&self, value: &Value) -> bool {
        matches!(value, Value::BigInt(_))
    }

    pub fn is_nullish(&self, value: &Value) -> bool {
        value.is_nullish()
    }

    pub fn is_primitive(&self, value: &Value) -> bool {
        !matches!(value, Value::Object(_))
    }

    /// A string or a symbol.
    pub fn is_field(&self, value: &Value) -> bool {
        matches!(value, Value::String(_) | Value::Symbol(_))
    }

    /// A string, a symbol or a number.
    pub fn is_property_key(&self, value: &Value) -> bool {
        matches!(value, Value::String(_) | Value::Symbol(_) | Value::Number(_))
    }

    /// `None` for non-numbers.
    pub fn is_nan(&self, value: &Value) -> Option<bool> {
        value.as_number().map(f64::is_nan)
    }

    pub fn is_finite(&self, value: &Value) -> bool {
        value.as_number().is_some_and(f64::is_finite)
    }

    /// `Number.isInteger`.
    pub fn is_integer(&self, value: &Value) -> bool {
        value
            .as_number()
            .is_some_and(|n| n.is_finite() && n.trunc() == n)
    }

    /// `Number.isSafeInteger`.
    pub fn is_safe_integer(&self, value: &Value) -> bool {
        self.is_integer(value) && value.as_number().is_some_and(|n| n.abs() <= MAX_SAFE_INTEGER)
    }

    /// A number within `±Number.MAX_SAFE_INTEGER`; `NaN` is not.
    pub fn is_safe_number(&self, value: &Value) -> bool {
        value
            .as_number()
            .is_some_and(|n| (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&n))
    }

    /// Class constructors and the built-in constructors. Plain `function`
    /// declarations are not classes.
    pub fn is_class(&self, value: &Value) -> bool {
        matches!(
            self.function_kind(value),
            Some(FunctionKind::Class { .. } | FunctionKind::Builtin(_))
        )
    }

    /// `Array.isArray`.
    pub fn is_array(&self, value: &Value) -> bool {
        self.heap.is_array(value)
    }

    /// [`is_array`](Self::is_array), and `predicate(element, index)` holds
    /// for every element. Stops at the first element it rejects.
    pub fn is_array_with<F>(&self, value: &Value, mut predicate: F) -> bool
    where
        F: FnMut(&Value, usize) -> bool,
    {
        let (Some(len), Value::Object(obj)) = (self.array_len(value), value) else {
            return false;
        };
        (0..len).all(|i| match self.heap.get(*obj, &PropertyKey::index(i)) {
            Ok(element) => predicate(&element, i),
            Err(_) => false,
        })
    }

    pub fn is_arrow_function(&self, value: &Value) -> bool {
        matches!(self.function_kind(value), Some(FunctionKind::Arrow))
    }

    /// Deep equality, see [`whether_equal::equal`].
    pub fn equal(&self, a: &Value, b: &Value) -> bool {
        equal(self.heap, a, b)
    }

    pub fn equal_with(&self, a: &Value, b: &Value, options: &EqualOptions) -> bool {
        equal_with(self.heap, a, b, options)
    }

    // -- helpers -----------------------------------------------------------

    fn kind(&self, value: &Value) -> ValueKind {
        self.heap.type_of(value)
    }

    fn function_kind(&self, value: &Value) -> Option<&'h FunctionKind> {
        value.as_object().and_then(|obj| self.heap.function_kind(obj))
    }

    fn array_len(&self, value: &Value) -> Option<usize> {
        let obj: ObjectId = value.as_object()?;
        if !self.heap.is_array(value) {
            return None;
        }
        self.heap.array_length(obj).ok()
    }
}
