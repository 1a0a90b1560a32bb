//! Import of plain JSON documents into the heap.

use serde_json::Value as Json;

use crate::heap::Heap;
use crate::intrinsics::RealmId;
use crate::value::Value;

impl Heap {
    /// Builds the runtime value of a JSON document: objects become plain
    /// objects of the main realm, arrays become arrays, numbers become
    /// `f64`.
    pub fn import_json(&mut self, json: &Json) -> Value {
        self.import_json_in(RealmId::MAIN, json)
    }

    pub fn import_json_in(&mut self, realm: RealmId, json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => {
                let elements = items
                    .iter()
                    .map(|item| self.import_json_in(realm, item))
                    .collect();
                Value::Object(self.in_realm(realm).alloc_array(elements))
            }
            Json::Object(map) => {
                let obj = self.in_realm(realm).alloc_plain();
                for (key, item) in map {
                    let value = self.import_json_in(realm, item);
                    self.define(obj, key.as_str(), value);
                }
                Value::Object(obj)
            }
        }
    }
}
