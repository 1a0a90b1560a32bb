//! Arena heap: allocation, realms and reflection-level operations.

use crate::error::ObjectError;
use crate::intrinsics::{layout, Builtin, Member, Realm, RealmId};
use crate::object::{
    FunctionKind, NativeGetter, Object, PromiseState, Property, ProxySlot, ProxyTraps, Slot,
};
use crate::value::{
    same_value_zero, ObjectId, PropertyKey, SymbolId, Value, ValueKind, WellKnownSymbol,
};

/// `2^32 - 1`.
const MAX_ARRAY_LENGTH: f64 = 4_294_967_295.0;

/// Owns every object and symbol, plus one or more realms of intrinsics.
///
/// All reflection operations take `&self`; only allocation and definition
/// need `&mut self`.
#[derive(Debug, Clone)]
pub struct Heap {
    objects: Vec<Object>,
    symbols: Vec<String>,
    realms: Vec<Realm>,
}

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Creates a heap whose main realm is fully populated.
    pub fn new() -> Self {
        let mut heap = Self {
            objects: Vec::new(),
            symbols: WellKnownSymbol::ALL
                .iter()
                .map(|sym| sym.description().to_string())
                .collect(),
            realms: Vec::new(),
        };
        heap.new_realm();
        heap
    }

    /// Adds a realm with its own, distinct intrinsic objects.
    pub fn new_realm(&mut self) -> RealmId {
        let object_proto = self.push(Object::new(None, Slot::Ordinary));
        let function_proto = self.push(Object::new(
            Some(object_proto),
            Slot::Function(FunctionKind::Native),
        ));
        let mut prototypes = [object_proto; 11];
        prototypes[Builtin::Function.slot()] = function_proto;
        for builtin in Builtin::ALL {
            if matches!(builtin, Builtin::Object | Builtin::Function) {
                continue;
            }
            let slot = match builtin {
                // Array.prototype is itself an array exotic object.
                Builtin::Array => Slot::Array(Vec::new()),
                _ => Slot::Ordinary,
            };
            prototypes[builtin.slot()] = self.push(Object::new(Some(object_proto), slot));
        }

        let mut constructors = [object_proto; 11];
        for builtin in Builtin::ALL {
            let ctor = self.push(Object::new(
                Some(function_proto),
                Slot::Function(FunctionKind::Builtin(builtin)),
            ));
            let proto = prototypes[builtin.slot()];
            self.insert(ctor, "prototype".into(), Property::Data(Value::Object(proto)));
            self.insert(ctor, "name".into(), Property::Data(builtin.name().into()));
            constructors[builtin.slot()] = ctor;
        }

        for builtin in Builtin::ALL {
            let proto = prototypes[builtin.slot()];
            for (key, member) in layout(builtin) {
                let property = match *member {
                    Member::Constructor => {
                        Property::Data(Value::Object(constructors[builtin.slot()]))
                    }
                    Member::Method => {
                        let method = self.push(Object::new(
                            Some(function_proto),
                            Slot::Function(FunctionKind::Native),
                        ));
                        Property::Data(Value::Object(method))
                    }
                    Member::Getter(getter) => Property::Accessor(getter),
                    Member::Text(text) => Property::Data(text.into()),
                };
                self.insert(proto, key.key(), property);
            }
        }

        self.realms.push(Realm {
            prototypes,
            constructors,
        });
        RealmId((self.realms.len() - 1) as u32)
    }

    pub fn main_realm(&self) -> &Realm {
        &self.realms[0]
    }

    pub fn realm(&self, id: RealmId) -> Option<&Realm> {
        self.realms.get(id.0 as usize)
    }

    /// Allocation scope bound to `realm`. Objects created through it inherit
    /// from that realm's intrinsic prototypes.
    ///
    /// Unknown realm ids fall back to the main realm.
    pub fn in_realm(&mut self, realm: RealmId) -> RealmScope<'_> {
        let realm = if (realm.0 as usize) < self.realms.len() {
            realm
        } else {
            RealmId::MAIN
        };
        RealmScope { heap: self, realm }
    }

    /// Number of allocated objects, intrinsics included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // -- allocation -------------------------------------------------------

    /// `Object.create(proto)`.
    pub fn alloc_object(&mut self, proto: Option<ObjectId>) -> ObjectId {
        self.push(Object::new(proto, Slot::Ordinary))
    }

    pub fn alloc_plain(&mut self) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_plain()
    }

    pub fn alloc_array(&mut self, elements: Vec<Value>) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_array(elements)
    }

    pub fn alloc_date(&mut self, time: f64) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_date(time)
    }

    pub fn alloc_regexp(&mut self, source: &str, flags: &str) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_regexp(source, flags)
    }

    pub fn alloc_map(&mut self, entries: Vec<(Value, Value)>) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_map(entries)
    }

    pub fn alloc_set(&mut self, values: Vec<Value>) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_set(values)
    }

    pub fn alloc_weak_map(&mut self) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_weak_map()
    }

    pub fn alloc_weak_set(&mut self) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_weak_set()
    }

    pub fn alloc_promise(&mut self, state: PromiseState) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_promise(state)
    }

    pub fn alloc_error(&mut self, message: &str) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_error(message)
    }

    pub fn alloc_function(&mut self, kind: FunctionKind) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_function(kind)
    }

    pub fn alloc_class(&mut self, name: &str, required_args: usize) -> ObjectId {
        self.in_realm(RealmId::MAIN).alloc_class(name, required_args)
    }

    pub fn alloc_proxy(&mut self, target: ObjectId, traps: ProxyTraps) -> ObjectId {
        self.push(Object::new(None, Slot::Proxy(ProxySlot { target, traps })))
    }

    pub fn alloc_symbol(&mut self, description: &str) -> SymbolId {
        self.symbols.push(description.to_string());
        SymbolId((self.symbols.len() - 1) as u32)
    }

    pub fn symbol_description(&self, id: SymbolId) -> Option<&str> {
        self.symbols.get(id.0 as usize).map(String::as_str)
    }

    // -- mutation ---------------------------------------------------------

    /// Defines (or overwrites) a data property. Proxies forward to their
    /// target. Index keys on arrays write elements, growing the array with
    /// `undefined` as needed.
    pub fn define(&mut self, obj: ObjectId, key: impl Into<PropertyKey>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let obj = self.proxy_target(obj);
        let object = &mut self.objects[obj.index()];
        if let Slot::Array(elements) = &mut object.slot {
            if let Some(i) = key.as_index() {
                if i >= elements.len() {
                    elements.resize(i + 1, Value::Undefined);
                }
                elements[i] = value;
                return;
            }
        }
        object.properties.insert(key, Property::Data(value));
    }

    /// `Reflect.setPrototypeOf`. Rejects links that would close a cycle;
    /// the walk stops at proxies the same way the ordinary algorithm does.
    pub fn set_prototype_of(
        &mut self,
        obj: ObjectId,
        proto: Option<ObjectId>,
    ) -> Result<(), ObjectError> {
        let obj = self.proxy_target(obj);
        let mut current = proto;
        while let Some(id) = current {
            if id == obj {
                return Err(ObjectError::PrototypeCycle);
            }
            let object = self.object(id);
            if matches!(object.slot, Slot::Proxy(_)) {
                break;
            }
            current = object.proto;
        }
        self.objects[obj.index()].proto = proto;
        Ok(())
    }

    // -- reflection -------------------------------------------------------

    /// `Reflect.ownKeys`, honoring the `ownKeys` proxy trap.
    pub fn own_keys(&self, obj: ObjectId) -> Vec<PropertyKey> {
        match &self.object(obj).slot {
            Slot::Proxy(proxy) => match &proxy.traps.own_keys {
                Some(keys) => keys.clone(),
                None => self.own_keys(proxy.target),
            },
            _ => self.object(obj).own_keys(),
        }
    }

    /// `Reflect.getPrototypeOf`, honoring the `getPrototypeOf` proxy trap.
    pub fn get_prototype_of(&self, obj: ObjectId) -> Option<ObjectId> {
        match &self.object(obj).slot {
            Slot::Proxy(proxy) => match proxy.traps.get_prototype_of {
                Some(proto) => proto,
                None => self.get_prototype_of(proxy.target),
            },
            _ => self.object(obj).proto,
        }
    }

    /// `Reflect.get` with `obj` as receiver. Accessors run against the
    /// receiver and fail if it lacks the slot they read.
    pub fn get(&self, obj: ObjectId, key: &PropertyKey) -> Result<Value, ObjectError> {
        match self.lookup(obj, key) {
            Some(Lookup::Value(value)) => Ok(value),
            Some(Lookup::Accessor(getter)) => self.call_getter(getter, obj),
            None => Ok(Value::Undefined),
        }
    }

    /// Coarse kind of the value found at `key`, without running accessors:
    /// an accessor reports its declared result kind. `None` when the key is
    /// absent from the whole chain.
    pub fn property_kind(&self, obj: ObjectId, key: &PropertyKey) -> Option<ValueKind> {
        match self.lookup(obj, key)? {
            Lookup::Value(value) => Some(self.type_of(&value)),
            Lookup::Accessor(getter) => Some(getter.kind()),
        }
    }

    pub fn has_property(&self, obj: ObjectId, key: &PropertyKey) -> bool {
        self.lookup(obj, key).is_some()
    }

    /// `typeof`.
    pub fn type_of(&self, value: &Value) -> ValueKind {
        match value {
            Value::Object(id) if self.is_callable(*id) => ValueKind::Function,
            Value::Object(_) => ValueKind::Object,
            other => other.primitive_kind().unwrap_or(ValueKind::Object),
        }
    }

    pub fn is_callable(&self, obj: ObjectId) -> bool {
        match &self.object(obj).slot {
            Slot::Function(_) => true,
            Slot::Proxy(proxy) => self.is_callable(proxy.target),
            _ => false,
        }
    }

    /// Callable kind of `obj`, looking through proxies.
    pub fn function_kind(&self, obj: ObjectId) -> Option<&FunctionKind> {
        match &self.object(obj).slot {
            Slot::Function(kind) => Some(kind),
            Slot::Proxy(proxy) => self.function_kind(proxy.target),
            _ => None,
        }
    }

    /// `Array.isArray`: true for arrays and for proxies whose target is one.
    pub fn is_array(&self, value: &Value) -> bool {
        let Value::Object(id) = value else {
            return false;
        };
        match &self.object(*id).slot {
            Slot::Array(_) => true,
            Slot::Proxy(proxy) => self.is_array(&Value::Object(proxy.target)),
            _ => false,
        }
    }

    /// `value instanceof ctor`: walks the prototype chain of `value` looking
    /// for `ctor.prototype`. `Symbol.hasInstance` overrides are not run.
    pub fn instance_of(&self, value: &Value, ctor: ObjectId) -> bool {
        let Value::Object(obj) = value else {
            return false;
        };
        let Ok(Value::Object(target)) = self.get(ctor, &"prototype".into()) else {
            return false;
        };
        self.chain_contains(*obj, target)
    }

    /// True if `proto` appears on the prototype chain of `obj` (excluding
    /// `obj` itself).
    pub fn chain_contains(&self, obj: ObjectId, proto: ObjectId) -> bool {
        let mut current = self.get_prototype_of(obj);
        while let Some(id) = current {
            if id == proto {
                return true;
            }
            current = self.get_prototype_of(id);
        }
        false
    }

    /// Iterability probe: `!!o && typeof o[Symbol.iterator] === 'function'`.
    pub fn is_iterable(&self, value: &Value) -> bool {
        match value {
            Value::String(s) => !s.is_empty(),
            Value::Object(id) => {
                self.property_kind(*id, &WellKnownSymbol::Iterator.key())
                    == Some(ValueKind::Function)
            }
            _ => false,
        }
    }

    // -- internal slots ---------------------------------------------------

    /// `Date.prototype.getTime`.
    pub fn date_value(&self, obj: ObjectId) -> Result<f64, ObjectError> {
        match &self.object(obj).slot {
            Slot::Date(time) => Ok(*time),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "Date" }),
        }
    }

    pub fn regexp_source(&self, obj: ObjectId) -> Result<&str, ObjectError> {
        match &self.object(obj).slot {
            Slot::RegExp { source, .. } => Ok(source),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "RegExp" }),
        }
    }

    pub fn regexp_flags(&self, obj: ObjectId) -> Result<&str, ObjectError> {
        match &self.object(obj).slot {
            Slot::RegExp { flags, .. } => Ok(flags),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "RegExp" }),
        }
    }

    pub fn map_entries(&self, obj: ObjectId) -> Result<&[(Value, Value)], ObjectError> {
        match &self.object(obj).slot {
            Slot::Map(entries) => Ok(entries),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "Map" }),
        }
    }

    /// `Map.prototype.get`; keys match under SameValueZero.
    pub fn map_get(&self, obj: ObjectId, key: &Value) -> Result<Option<&Value>, ObjectError> {
        Ok(self
            .map_entries(obj)?
            .iter()
            .find(|(k, _)| same_value_zero(k, key))
            .map(|(_, v)| v))
    }

    pub fn set_values(&self, obj: ObjectId) -> Result<&[Value], ObjectError> {
        match &self.object(obj).slot {
            Slot::Set(values) => Ok(values),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "Set" }),
        }
    }

    pub fn promise_state(&self, obj: ObjectId) -> Result<&PromiseState, ObjectError> {
        match &self.object(obj).slot {
            Slot::Promise(state) => Ok(state),
            _ => Err(ObjectError::IncompatibleReceiver { expected: "Promise" }),
        }
    }

    /// `length` of an array, read through `get` so proxies forward. Only
    /// valid array lengths (integers in `0..=2^32 - 1`) are accepted.
    pub fn array_length(&self, obj: ObjectId) -> Result<usize, ObjectError> {
        match self.get(obj, &"length".into())? {
            Value::Number(n) if (0.0..=MAX_ARRAY_LENGTH).contains(&n) && n.fract() == 0.0 => {
                Ok(n as usize)
            }
            _ => Err(ObjectError::IncompatibleReceiver { expected: "Array" }),
        }
    }

    // -- construction -----------------------------------------------------

    /// Builtin behind an intrinsic constructor of any realm.
    pub fn builtin_of(&self, ctor: ObjectId) -> Option<Builtin> {
        match self.function_kind(ctor)? {
            FunctionKind::Builtin(builtin) => Some(*builtin),
            _ => None,
        }
    }

    /// Checks that `new ctor()` can run without meaningful arguments and
    /// returns the prototype the fresh instance would receive.
    pub fn reference_prototype(&self, ctor: ObjectId) -> Result<ObjectId, ObjectError> {
        match self.function_kind(ctor) {
            // Promise takes a no-op executor; every other builtin has a
            // zero-argument form.
            Some(FunctionKind::Builtin(_)) | Some(FunctionKind::Plain) => {}
            Some(FunctionKind::Class { required_args, .. }) if *required_args > 0 => {
                return Err(ObjectError::RequiresArguments {
                    required: *required_args,
                });
            }
            Some(FunctionKind::Class { .. }) => {}
            Some(FunctionKind::Native) | Some(FunctionKind::Arrow) | None => {
                return Err(ObjectError::NotConstructor);
            }
        }
        match self.get(ctor, &"prototype".into())? {
            Value::Object(proto) => Ok(proto),
            _ => Ok(self.main_realm().prototype(Builtin::Object)),
        }
    }

    // -- internals --------------------------------------------------------

    #[inline]
    pub(crate) fn object(&self, id: ObjectId) -> &Object {
        &self.objects[id.index()]
    }

    fn push(&mut self, object: Object) -> ObjectId {
        self.objects.push(object);
        ObjectId((self.objects.len() - 1) as u32)
    }

    fn insert(&mut self, obj: ObjectId, key: PropertyKey, property: Property) {
        self.objects[obj.index()].properties.insert(key, property);
    }

    fn proxy_target(&self, mut obj: ObjectId) -> ObjectId {
        while let Slot::Proxy(proxy) = &self.object(obj).slot {
            obj = proxy.target;
        }
        obj
    }

    /// Walks the chain the way `[[Get]]` does: proxies consult their `get`
    /// trap and then forward to the target's own chain.
    fn lookup(&self, obj: ObjectId, key: &PropertyKey) -> Option<Lookup> {
        let mut current = Some(obj);
        while let Some(id) = current {
            let object = self.object(id);
            if let Slot::Proxy(proxy) = &object.slot {
                if let Some(value) = proxy.traps.get.get(key) {
                    return Some(Lookup::Value(value.clone()));
                }
                current = Some(proxy.target);
                continue;
            }
            if let Some(value) = object.own_element(key) {
                return Some(Lookup::Value(value));
            }
            match object.properties.get(key) {
                Some(Property::Data(value)) => return Some(Lookup::Value(value.clone())),
                Some(Property::Accessor(getter)) => return Some(Lookup::Accessor(*getter)),
                None => current = object.proto,
            }
        }
        None
    }

    fn call_getter(&self, getter: NativeGetter, receiver: ObjectId) -> Result<Value, ObjectError> {
        Ok(match getter {
            NativeGetter::MapSize => Value::Number(self.map_entries(receiver)?.len() as f64),
            NativeGetter::SetSize => Value::Number(self.set_values(receiver)?.len() as f64),
            NativeGetter::RegExpSource => Value::from(self.regexp_source(receiver)?),
            NativeGetter::RegExpFlags => Value::from(self.regexp_flags(receiver)?),
            NativeGetter::RegExpFlag(flag) => {
                Value::Bool(self.regexp_flags(receiver)?.contains(flag))
            }
        })
    }
}

enum Lookup {
    Value(Value),
    Accessor(NativeGetter),
}

/// Allocation bound to one realm, see [`Heap::in_realm`].
pub struct RealmScope<'h> {
    heap: &'h mut Heap,
    realm: RealmId,
}

impl RealmScope<'_> {
    fn proto(&self, builtin: Builtin) -> ObjectId {
        self.heap.realms[self.realm.0 as usize].prototype(builtin)
    }

    fn alloc(&mut self, builtin: Builtin, slot: Slot) -> ObjectId {
        let proto = self.proto(builtin);
        self.heap.push(Object::new(Some(proto), slot))
    }

    pub fn alloc_plain(&mut self) -> ObjectId {
        self.alloc(Builtin::Object, Slot::Ordinary)
    }

    pub fn alloc_array(&mut self, elements: Vec<Value>) -> ObjectId {
        self.alloc(Builtin::Array, Slot::Array(elements))
    }

    pub fn alloc_date(&mut self, time: f64) -> ObjectId {
        self.alloc(Builtin::Date, Slot::Date(time))
    }

    pub fn alloc_regexp(&mut self, source: &str, flags: &str) -> ObjectId {
        self.alloc(
            Builtin::RegExp,
            Slot::RegExp {
                source: source.to_string(),
                flags: flags.to_string(),
            },
        )
    }

    /// Later duplicates (under SameValueZero) overwrite the earlier value
    /// but keep its position.
    pub fn alloc_map(&mut self, entries: Vec<(Value, Value)>) -> ObjectId {
        let mut unique: Vec<(Value, Value)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            match unique.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
                Some(entry) => entry.1 = value,
                None => unique.push((key, value)),
            }
        }
        self.alloc(Builtin::Map, Slot::Map(unique))
    }

    pub fn alloc_set(&mut self, values: Vec<Value>) -> ObjectId {
        let mut unique: Vec<Value> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.iter().any(|v| same_value_zero(v, &value)) {
                unique.push(value);
            }
        }
        self.alloc(Builtin::Set, Slot::Set(unique))
    }

    pub fn alloc_weak_map(&mut self) -> ObjectId {
        self.alloc(Builtin::WeakMap, Slot::WeakMap)
    }

    pub fn alloc_weak_set(&mut self) -> ObjectId {
        self.alloc(Builtin::WeakSet, Slot::WeakSet)
    }

    pub fn alloc_promise(&mut self, state: PromiseState) -> ObjectId {
        self.alloc(Builtin::Promise, Slot::Promise(state))
    }

    pub fn alloc_error(&mut self, message: &str) -> ObjectId {
        let id = self.alloc(Builtin::Error, Slot::Error);
        self.heap
            .insert(id, "message".into(), Property::Data(message.into()));
        id
    }

    /// Allocates a callable. Constructible kinds also get a fresh
    /// `prototype` object whose `constructor` points back.
    pub fn alloc_function(&mut self, kind: FunctionKind) -> ObjectId {
        let constructible = matches!(kind, FunctionKind::Class { .. } | FunctionKind::Plain);
        let name = match &kind {
            FunctionKind::Class { name, .. } => Some(name.clone()),
            _ => None,
        };
        let func = self.alloc(Builtin::Function, Slot::Function(kind));
        if let Some(name) = name {
            self.heap
                .insert(func, "name".into(), Property::Data(name.into()));
        }
        if constructible {
            let proto = self.alloc_plain();
            self.heap
                .insert(proto, "constructor".into(), Property::Data(func.into()));
            self.heap
                .insert(func, "prototype".into(), Property::Data(proto.into()));
        }
        func
    }

    pub fn alloc_class(&mut self, name: &str, required_args: usize) -> ObjectId {
        self.alloc_function(FunctionKind::Class {
            name: name.to_string(),
            required_args,
        })
    }
}
