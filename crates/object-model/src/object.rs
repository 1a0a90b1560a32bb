//! Heap object layout: prototype link, properties and internal slot.

use indexmap::IndexMap;

use crate::intrinsics::Builtin;
use crate::value::{ObjectId, PropertyKey, Value, ValueKind};

/// A property slot on an object.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Data(Value),
    /// Native getter; its result kind is fixed so it can be reported without
    /// running the getter.
    Accessor(NativeGetter),
}

/// Getters installed on intrinsic prototypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeGetter {
    MapSize,
    SetSize,
    RegExpSource,
    RegExpFlags,
    /// One boolean flag accessor (`global`, `ignoreCase`, ...), keyed by its
    /// flag character.
    RegExpFlag(char),
}

impl NativeGetter {
    pub fn kind(self) -> ValueKind {
        match self {
            Self::MapSize | Self::SetSize => ValueKind::Number,
            Self::RegExpSource | Self::RegExpFlags => ValueKind::String,
            Self::RegExpFlag(_) => ValueKind::Boolean,
        }
    }
}

/// How a callable object behaves when invoked with `new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionKind {
    /// Intrinsic constructor of a realm.
    Builtin(Builtin),
    /// Intrinsic method. Not constructible.
    Native,
    /// `class` declaration. Construction with no arguments fails when
    /// `required_args > 0`.
    Class { name: String, required_args: usize },
    /// Ordinary `function` declaration.
    Plain,
    /// Arrow function. Not constructible.
    Arrow,
}

impl FunctionKind {
    pub fn is_constructor(&self) -> bool {
        !matches!(self, Self::Native | Self::Arrow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    Pending,
    Fulfilled(Value),
    Rejected(Value),
}

/// Proxy handler. Each trap is optional; absent traps forward to the target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyTraps {
    pub own_keys: Option<Vec<PropertyKey>>,
    /// `Some(None)` reports a null prototype.
    pub get_prototype_of: Option<Option<ObjectId>>,
    pub get: IndexMap<PropertyKey, Value>,
}

impl ProxyTraps {
    /// A handler with no traps: every operation reaches the target.
    pub fn transparent() -> Self {
        Self::default()
    }

    pub fn with_own_keys(mut self, keys: Vec<PropertyKey>) -> Self {
        self.own_keys = Some(keys);
        self
    }

    pub fn with_prototype(mut self, proto: Option<ObjectId>) -> Self {
        self.get_prototype_of = Some(proto);
        self
    }

    pub fn with_get(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.get.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ProxySlot {
    pub(crate) target: ObjectId,
    pub(crate) traps: ProxyTraps,
}

/// Internal slot carried by an object.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot {
    Ordinary,
    Array(Vec<Value>),
    Date(f64),
    RegExp { source: String, flags: String },
    Map(Vec<(Value, Value)>),
    Set(Vec<Value>),
    WeakMap,
    WeakSet,
    Promise(PromiseState),
    Error,
    Function(FunctionKind),
    Proxy(ProxySlot),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Object {
    pub(crate) proto: Option<ObjectId>,
    pub(crate) properties: IndexMap<PropertyKey, Property>,
    pub(crate) slot: Slot,
}

impl Object {
    pub(crate) fn new(proto: Option<ObjectId>, slot: Slot) -> Self {
        Self {
            proto,
            properties: IndexMap::new(),
            slot,
        }
    }

    /// Own keys in enumeration order: array indices ascending, then other
    /// strings in insertion order, then symbols in insertion order.
    pub(crate) fn own_keys(&self) -> Vec<PropertyKey> {
        let mut indices: Vec<usize> = Vec::new();
        let mut strings = Vec::new();
        let mut symbols = Vec::new();
        if let Slot::Array(elements) = &self.slot {
            indices.extend(0..elements.len());
        }
        for key in self.properties.keys() {
            match key {
                PropertyKey::Symbol(_) => symbols.push(key.clone()),
                _ => match key.as_index() {
                    Some(i) => indices.push(i),
                    None => strings.push(key.clone()),
                },
            }
        }
        indices.sort_unstable();
        indices.dedup();
        let mut keys: Vec<PropertyKey> = indices.into_iter().map(PropertyKey::index).collect();
        if matches!(self.slot, Slot::Array(_)) {
            keys.push(PropertyKey::from("length"));
        }
        keys.extend(strings);
        keys.extend(symbols);
        keys
    }

    /// Array elements and `length` live in the slot, not in `properties`.
    pub(crate) fn own_element(&self, key: &PropertyKey) -> Option<Value> {
        let Slot::Array(elements) = &self.slot else {
            return None;
        };
        if let Some(i) = key.as_index() {
            return elements.get(i).cloned();
        }
        match key {
            PropertyKey::String(s) if s == "length" => Some(Value::Number(elements.len() as f64)),
            _ => None,
        }
    }
}
