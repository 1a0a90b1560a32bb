//! `or_*` predicates: `undefined`, or the named check.

use whether_object_model::Value;

use crate::predicates::Whether;

macro_rules! or_undefined {
    ($($or:ident => $is:ident),* $(,)?) => {
        impl Whether<'_> {
            $(
                #[doc = concat!("`undefined`, or [`", stringify!($is), "`](Self::", stringify!($is), ").")]
                pub fn $or(&self, value: &Value) -> bool {
                    value.is_undefined() || self.$is(value)
                }
            )*
        }
    };
}

or_undefined! {
    or_negative_zero => is_negative_zero,
    or_positive_zero => is_positive_zero,
    or_function => is_function,
    or_object => is_object,
    or_like_object => like_object,
    or_string => is_string,
    or_number => is_number,
    or_boolean => is_boolean,
    or_undefined => is_undefined,
    or_null => is_null,
    or_symbol => is_symbol,
    or_big_int => is_big_int,
    or_field => is_field,
    or_property_key => is_property_key,
    or_integer => is_integer,
    or_safe_integer => is_safe_integer,
    or_safe_number => is_safe_number,
    or_class => is_class,
    or_array => is_array,
}

impl Whether<'_> {
    /// `Some(true)` for `undefined`, otherwise [`is_nan`](Self::is_nan).
    pub fn or_nan(&self, value: &Value) -> Option<bool> {
        if value.is_undefined() {
            return Some(true);
        }
        self.is_nan(value)
    }

    pub fn or_array_with<F>(&self, value: &Value, predicate: F) -> bool
    where
        F: FnMut(&Value, usize) -> bool,
    {
        value.is_undefined() || self.is_array_with(value, predicate)
    }
}
