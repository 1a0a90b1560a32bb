//! Intrinsic constructors and prototypes, and the realms that own them.
//!
//! Prototype layouts are static tables so that shape information about a
//! built-in family is available without a heap.

use crate::object::NativeGetter;
use crate::value::{ObjectId, PropertyKey, ValueKind, WellKnownSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Object,
    Function,
    Array,
    Date,
    RegExp,
    Map,
    Set,
    WeakMap,
    WeakSet,
    Promise,
    Error,
}

impl Builtin {
    pub const ALL: [Builtin; 11] = [
        Builtin::Object,
        Builtin::Function,
        Builtin::Array,
        Builtin::Date,
        Builtin::RegExp,
        Builtin::Map,
        Builtin::Set,
        Builtin::WeakMap,
        Builtin::WeakSet,
        Builtin::Promise,
        Builtin::Error,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::Function => "Function",
            Self::Array => "Array",
            Self::Date => "Date",
            Self::RegExp => "RegExp",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::WeakMap => "WeakMap",
            Self::WeakSet => "WeakSet",
            Self::Promise => "Promise",
            Self::Error => "Error",
        }
    }

    /// Builtin whose prototype the prototype of `self` inherits from.
    pub fn parent(self) -> Option<Builtin> {
        match self {
            Self::Object => None,
            _ => Some(Self::Object),
        }
    }

    /// Own members of this builtin's prototype object, with the kind a
    /// reader observes on a canonical instance.
    pub fn prototype_members(self) -> impl Iterator<Item = (PropertyKey, ValueKind)> {
        layout(self).iter().map(|(key, member)| (key.key(), member.kind()))
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum MemberKey {
    Name(&'static str),
    Symbol(WellKnownSymbol),
}

impl MemberKey {
    pub(crate) fn key(self) -> PropertyKey {
        match self {
            Self::Name(name) => PropertyKey::from(name),
            Self::Symbol(sym) => sym.key(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Member {
    /// Back-reference to the realm's constructor.
    Constructor,
    Method,
    Getter(NativeGetter),
    Text(&'static str),
}

impl Member {
    pub(crate) fn kind(self) -> ValueKind {
        match self {
            Self::Constructor | Self::Method => ValueKind::Function,
            Self::Getter(getter) => getter.kind(),
            Self::Text(_) => ValueKind::String,
        }
    }
}

use Member::{Constructor, Getter, Method, Text};
use MemberKey::{Name, Symbol};

const OBJECT_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("__defineGetter__"), Method),
    (Name("__defineSetter__"), Method),
    (Name("hasOwnProperty"), Method),
    (Name("__lookupGetter__"), Method),
    (Name("__lookupSetter__"), Method),
    (Name("isPrototypeOf"), Method),
    (Name("propertyIsEnumerable"), Method),
    (Name("toString"), Method),
    (Name("valueOf"), Method),
    (Name("toLocaleString"), Method),
];

const FUNCTION_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("apply"), Method),
    (Name("bind"), Method),
    (Name("call"), Method),
    (Name("toString"), Method),
    (Symbol(WellKnownSymbol::HasInstance), Method),
];

const ARRAY_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("at"), Method),
    (Name("concat"), Method),
    (Name("copyWithin"), Method),
    (Name("fill"), Method),
    (Name("find"), Method),
    (Name("findIndex"), Method),
    (Name("findLast"), Method),
    (Name("findLastIndex"), Method),
    (Name("lastIndexOf"), Method),
    (Name("pop"), Method),
    (Name("push"), Method),
    (Name("reverse"), Method),
    (Name("shift"), Method),
    (Name("unshift"), Method),
    (Name("slice"), Method),
    (Name("sort"), Method),
    (Name("splice"), Method),
    (Name("includes"), Method),
    (Name("indexOf"), Method),
    (Name("join"), Method),
    (Name("keys"), Method),
    (Name("entries"), Method),
    (Name("values"), Method),
    (Name("forEach"), Method),
    (Name("filter"), Method),
    (Name("flat"), Method),
    (Name("flatMap"), Method),
    (Name("map"), Method),
    (Name("every"), Method),
    (Name("some"), Method),
    (Name("reduce"), Method),
    (Name("reduceRight"), Method),
    (Name("toLocaleString"), Method),
    (Name("toString"), Method),
    (Name("toReversed"), Method),
    (Name("toSorted"), Method),
    (Name("toSpliced"), Method),
    (Name("with"), Method),
    (Symbol(WellKnownSymbol::Iterator), Method),
];

const DATE_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("toString"), Method),
    (Name("toDateString"), Method),
    (Name("toTimeString"), Method),
    (Name("toISOString"), Method),
    (Name("toUTCString"), Method),
    (Name("getDate"), Method),
    (Name("setDate"), Method),
    (Name("getDay"), Method),
    (Name("getFullYear"), Method),
    (Name("setFullYear"), Method),
    (Name("getHours"), Method),
    (Name("setHours"), Method),
    (Name("getMilliseconds"), Method),
    (Name("setMilliseconds"), Method),
    (Name("getMinutes"), Method),
    (Name("setMinutes"), Method),
    (Name("getMonth"), Method),
    (Name("setMonth"), Method),
    (Name("getSeconds"), Method),
    (Name("setSeconds"), Method),
    (Name("getTime"), Method),
    (Name("setTime"), Method),
    (Name("getTimezoneOffset"), Method),
    (Name("getUTCDate"), Method),
    (Name("setUTCDate"), Method),
    (Name("getUTCDay"), Method),
    (Name("getUTCFullYear"), Method),
    (Name("setUTCFullYear"), Method),
    (Name("getUTCHours"), Method),
    (Name("setUTCHours"), Method),
    (Name("getUTCMilliseconds"), Method),
    (Name("setUTCMilliseconds"), Method),
    (Name("getUTCMinutes"), Method),
    (Name("setUTCMinutes"), Method),
    (Name("getUTCMonth"), Method),
    (Name("setUTCMonth"), Method),
    (Name("getUTCSeconds"), Method),
    (Name("setUTCSeconds"), Method),
    (Name("valueOf"), Method),
    (Name("toJSON"), Method),
    (Name("toLocaleString"), Method),
    (Name("toLocaleDateString"), Method),
    (Name("toLocaleTimeString"), Method),
    (Symbol(WellKnownSymbol::ToPrimitive), Method),
];

const REGEXP_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("exec"), Method),
    (Name("dotAll"), Getter(NativeGetter::RegExpFlag('s'))),
    (Name("flags"), Getter(NativeGetter::RegExpFlags)),
    (Name("global"), Getter(NativeGetter::RegExpFlag('g'))),
    (Name("hasIndices"), Getter(NativeGetter::RegExpFlag('d'))),
    (Name("ignoreCase"), Getter(NativeGetter::RegExpFlag('i'))),
    (Name("multiline"), Getter(NativeGetter::RegExpFlag('m'))),
    (Name("source"), Getter(NativeGetter::RegExpSource)),
    (Name("sticky"), Getter(NativeGetter::RegExpFlag('y'))),
    (Name("unicode"), Getter(NativeGetter::RegExpFlag('u'))),
    (Name("unicodeSets"), Getter(NativeGetter::RegExpFlag('v'))),
    (Name("compile"), Method),
    (Name("toString"), Method),
    (Name("test"), Method),
    (Symbol(WellKnownSymbol::Match), Method),
    (Symbol(WellKnownSymbol::MatchAll), Method),
    (Symbol(WellKnownSymbol::Replace), Method),
    (Symbol(WellKnownSymbol::Search), Method),
    (Symbol(WellKnownSymbol::Split), Method),
];

const MAP_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("get"), Method),
    (Name("set"), Method),
    (Name("has"), Method),
    (Name("delete"), Method),
    (Name("clear"), Method),
    (Name("entries"), Method),
    (Name("forEach"), Method),
    (Name("keys"), Method),
    (Name("size"), Getter(NativeGetter::MapSize)),
    (Name("values"), Method),
    (Symbol(WellKnownSymbol::ToStringTag), Text("Map")),
    (Symbol(WellKnownSymbol::Iterator), Method),
];

const SET_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("has"), Method),
    (Name("add"), Method),
    (Name("delete"), Method),
    (Name("clear"), Method),
    (Name("entries"), Method),
    (Name("forEach"), Method),
    (Name("size"), Getter(NativeGetter::SetSize)),
    (Name("values"), Method),
    (Name("keys"), Method),
    (Name("union"), Method),
    (Name("intersection"), Method),
    (Name("difference"), Method),
    (Name("symmetricDifference"), Method),
    (Name("isSubsetOf"), Method),
    (Name("isSupersetOf"), Method),
    (Name("isDisjointFrom"), Method),
    (Symbol(WellKnownSymbol::ToStringTag), Text("Set")),
    (Symbol(WellKnownSymbol::Iterator), Method),
];

const WEAK_MAP_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("delete"), Method),
    (Name("get"), Method),
    (Name("set"), Method),
    (Name("has"), Method),
    (Symbol(WellKnownSymbol::ToStringTag), Text("WeakMap")),
];

const WEAK_SET_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("delete"), Method),
    (Name("has"), Method),
    (Name("add"), Method),
    (Symbol(WellKnownSymbol::ToStringTag), Text("WeakSet")),
];

const PROMISE_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("then"), Method),
    (Name("catch"), Method),
    (Name("finally"), Method),
    (Symbol(WellKnownSymbol::ToStringTag), Text("Promise")),
];

const ERROR_PROTO: &[(MemberKey, Member)] = &[
    (Name("constructor"), Constructor),
    (Name("name"), Text("Error")),
    (Name("message"), Text("")),
    (Name("toString"), Method),
];

pub(crate) fn layout(builtin: Builtin) -> &'static [(MemberKey, Member)] {
    match builtin {
        Builtin::Object => OBJECT_PROTO,
        Builtin::Function => FUNCTION_PROTO,
        Builtin::Array => ARRAY_PROTO,
        Builtin::Date => DATE_PROTO,
        Builtin::RegExp => REGEXP_PROTO,
        Builtin::Map => MAP_PROTO,
        Builtin::Set => SET_PROTO,
        Builtin::WeakMap => WEAK_MAP_PROTO,
        Builtin::WeakSet => WEAK_SET_PROTO,
        Builtin::Promise => PROMISE_PROTO,
        Builtin::Error => ERROR_PROTO,
    }
}

/// Identifies a realm on its heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RealmId(pub(crate) u32);

impl RealmId {
    pub const MAIN: RealmId = RealmId(0);
}

/// The intrinsic objects of one realm.
#[derive(Debug, Clone)]
pub struct Realm {
    pub(crate) prototypes: [ObjectId; 11],
    pub(crate) constructors: [ObjectId; 11],
}

impl Realm {
    pub fn prototype(&self, builtin: Builtin) -> ObjectId {
        self.prototypes[builtin.slot()]
    }

    pub fn constructor(&self, builtin: Builtin) -> ObjectId {
        self.constructors[builtin.slot()]
    }

    /// Maps one of this realm's prototypes back to its builtin.
    pub fn builtin_of_prototype(&self, proto: ObjectId) -> Option<Builtin> {
        Builtin::ALL
            .into_iter()
            .find(|b| self.prototypes[b.slot()] == proto)
    }
}
