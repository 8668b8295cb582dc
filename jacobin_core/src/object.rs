use crate::jvm_values::{
    host_bytes_from_java_bytes, host_string_from_java_bytes, java_bytes_from_host_string,
    HostResource, JavaByte, ObjectRef, Value,
};
use crate::string_pool::{
    get_string_index, get_string_pointer, OBJECT_CLASS_INDEX, STRING_CLASS_INDEX,
};
use bitfield_struct::bitfield;
use indexmap::IndexMap;
use num_bigint::BigInt;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

pub const STRING_DESCRIPTOR: &str = "Ljava/lang/String;";
pub const BIG_INTEGER_DESCRIPTOR: &str = "Ljava/math/BigInteger;";

/// 对象头。低 32 位是 identity hash，高 32 位留给锁和调试用
#[bitfield(u64)]
#[derive(PartialEq, Eq)]
pub struct MarkWord {
    pub hash: u32,
    pub misc: u32,
}

/// Host payload of a field. Arrays keep their elements inline; the length is the vector's.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Ref(ObjectRef),
    Null,
    Raw(Arc<HostResource>),
    /// `[B`
    Bytes(Vec<JavaByte>),
    /// `[C [I [J [S [Z`
    Ints(Vec<i64>),
    /// `[F [D`
    Floats(Vec<f64>),
    /// `[L...;`
    Refs(Vec<Value>),
    BigInt(BigInt),
}

impl FieldValue {
    /// The scalar payload as a stack value; arrays and big integers have none.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            FieldValue::Int(v) => Some(Value::Int(*v)),
            FieldValue::Float(v) => Some(Value::Float(*v)),
            FieldValue::Ref(obj) => Some(Value::ObjectRef(obj.clone())),
            FieldValue::Null => Some(Value::Null),
            FieldValue::Raw(res) => Some(Value::RawPointer(res.clone())),
            _ => None,
        }
    }

    pub fn array_len(&self) -> Option<usize> {
        match self {
            FieldValue::Bytes(v) => Some(v.len()),
            FieldValue::Ints(v) => Some(v.len()),
            FieldValue::Floats(v) => Some(v.len()),
            FieldValue::Refs(v) => Some(v.len()),
            _ => None,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(v) => FieldValue::Int(v),
            Value::Float(v) => FieldValue::Float(v),
            Value::ObjectRef(obj) => FieldValue::Ref(obj),
            Value::Null => FieldValue::Null,
            Value::RawPointer(res) => FieldValue::Raw(res),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub ftype: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(ftype: &str, value: FieldValue) -> Field {
        Field {
            ftype: ftype.to_string(),
            value,
        }
    }
}

pub struct Object {
    mark: AtomicU64,
    klass: u32,
    fields: RwLock<IndexMap<String, Field>>,
    monitor: ReentrantMutex<()>,
}

static HASH_SEED: AtomicU32 = AtomicU32::new(0x2545_f491);

fn next_identity_hash() -> u32 {
    let mut x = HASH_SEED.fetch_add(0x9e37_79b9, Ordering::Relaxed);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    match x & 0x7fff_ffff {
        0 => 1,
        h => h,
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Object({}@{:x})", self.class_name(), self.hash_code())
    }
}

impl Object {
    fn new(klass: u32) -> Object {
        let mark = MarkWord::new().with_hash(next_identity_hash());
        Object {
            mark: AtomicU64::new(mark.into()),
            klass,
            fields: RwLock::new(IndexMap::new()),
            monitor: ReentrantMutex::new(()),
        }
    }

    pub fn klass(&self) -> u32 {
        self.klass
    }

    pub fn class_name(&self) -> String {
        get_string_pointer(self.klass)
            .map(|s| s.to_string())
            .unwrap_or_default()
    }

    pub fn mark(&self) -> MarkWord {
        MarkWord::from(self.mark.load(Ordering::Acquire))
    }

    pub fn set_misc(&self, misc: u32) {
        let _ = self
            .mark
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |bits| {
                Some(MarkWord::from(bits).with_misc(misc).into())
            });
    }

    /// Identity hash, as returned by `System.identityHashCode`.
    pub fn hash_code(&self) -> u32 {
        self.mark().hash()
    }

    pub fn get_field(&self, name: &str) -> Option<Field> {
        self.fields.read().get(name).cloned()
    }

    pub fn get_field_value(&self, name: &str) -> Option<FieldValue> {
        self.fields.read().get(name).map(|f| f.value.clone())
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.read().contains_key(name)
    }

    pub fn set_field(&self, name: &str, ftype: &str, value: FieldValue) {
        self.fields
            .write()
            .insert(name.to_string(), Field::new(ftype, value));
    }

    pub fn remove_field(&self, name: &str) -> Option<Field> {
        self.fields.write().shift_remove(name)
    }

    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }

    pub fn fields(&self) -> RwLockReadGuard<'_, IndexMap<String, Field>> {
        self.fields.read()
    }

    pub fn fields_mut(&self) -> RwLockWriteGuard<'_, IndexMap<String, Field>> {
        self.fields.write()
    }

    /// Holds the object's monitor; re-entrant for the owning thread.
    pub fn lock_monitor(&self) -> ReentrantMutexGuard<'_, ()> {
        self.monitor.lock()
    }

    pub fn int_field(&self, name: &str) -> Option<i64> {
        match self.get_field_value(name)? {
            FieldValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn ref_field(&self, name: &str) -> Option<ObjectRef> {
        match self.get_field_value(name)? {
            FieldValue::Ref(obj) => Some(obj),
            _ => None,
        }
    }
}

pub fn make_empty_object() -> ObjectRef {
    Arc::new(Object::new(OBJECT_CLASS_INDEX))
}

pub fn make_empty_object_with_class_name(class_name: &str) -> ObjectRef {
    if class_name.is_empty() {
        return make_empty_object();
    }
    Arc::new(Object::new(get_string_index(class_name)))
}

/// An object whose single `value` field holds the logical contents, e.g. `java/lang/Integer`.
pub fn make_primitive_object(class_name: &str, ftype: &str, value: FieldValue) -> ObjectRef {
    let obj = make_empty_object_with_class_name(class_name);
    obj.set_field("value", ftype, value);
    obj
}

/// Arrays are objects named by their array class, elements inline in `value`.
pub fn make_array_object(array_class: &str, value: FieldValue) -> ObjectRef {
    make_primitive_object(array_class, array_class, value)
}

pub fn make_ref_array(array_class: &str, items: Vec<Value>) -> ObjectRef {
    make_array_object(array_class, FieldValue::Refs(items))
}

pub fn make_2_elem_ref_array(array_class: &str, first: Value, second: Value) -> ObjectRef {
    make_ref_array(array_class, vec![first, second])
}

pub fn string_object_from_java_bytes(bytes: Vec<JavaByte>) -> ObjectRef {
    let obj = Arc::new(Object::new(STRING_CLASS_INDEX));
    obj.set_field("value", "[B", FieldValue::Bytes(bytes));
    obj
}

pub fn string_object_from_str(s: &str) -> ObjectRef {
    string_object_from_java_bytes(java_bytes_from_host_string(s))
}

/// `IsNull`: a missing reference or the null sentinel.
pub fn is_null(value: Option<&Value>) -> bool {
    value.map_or(true, Value::is_null)
}

pub fn clear_field_table(obj: &Object) {
    obj.fields_mut().clear();
}

pub fn is_string_object(obj: &Object) -> bool {
    obj.klass() == STRING_CLASS_INDEX
        && obj
            .fields()
            .get("value")
            .is_some_and(|f| f.ftype == "[B")
}

pub fn java_bytes_from_string_object(obj: &Object) -> Option<Vec<JavaByte>> {
    if obj.klass() != STRING_CLASS_INDEX {
        return None;
    }
    match obj.get_field_value("value")? {
        FieldValue::Bytes(bytes) => Some(bytes),
        _ => None,
    }
}

pub fn string_from_string_object(obj: &Object) -> Option<String> {
    java_bytes_from_string_object(obj).map(|bytes| host_string_from_java_bytes(&bytes))
}

/// Last `/` segment of the class name; with `only_base` an inner class keeps only its own name.
pub fn get_class_name_suffix(obj: &Object, only_base: bool) -> String {
    let name = obj.class_name();
    let suffix = name.rsplit('/').next().unwrap_or(&name);
    if only_base {
        suffix.rsplit('$').next().unwrap_or(suffix).to_string()
    } else {
        suffix.to_string()
    }
}

fn sorted_keys(fields: &IndexMap<String, Field>) -> Vec<String> {
    let mut keys: Vec<String> = fields.keys().cloned().collect();
    keys.sort_by_key(|k| k.to_lowercase());
    keys
}

fn join_elements<T>(items: &[T], f: impl Fn(&T) -> String) -> String {
    let parts: Vec<String> = items.iter().map(f).collect();
    format!("[{}]", parts.join(", "))
}

fn hex_string(bytes: &[JavaByte]) -> String {
    let mut out = String::from("0x");
    for b in host_bytes_from_java_bytes(bytes) {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

/// Debug rendering of a single field, as used by `println(Object)` diagnostics.
pub fn stringify_field(field: &Field) -> String {
    match (&field.value, field.ftype.as_str()) {
        (FieldValue::Null, _) => "null".to_string(),
        (FieldValue::Int(v), "Z") => (*v != 0).to_string(),
        (FieldValue::Int(v), "B") => format!("0x{:02x}", *v as u8),
        (FieldValue::Int(v), "C") => char::from_u32(*v as u32)
            .map(String::from)
            .unwrap_or_else(|| v.to_string()),
        (FieldValue::Int(v), _) => v.to_string(),
        (FieldValue::Float(v), "F") => (*v as f32).to_string(),
        (FieldValue::Float(v), _) => v.to_string(),
        (FieldValue::Bytes(bytes), STRING_DESCRIPTOR) => host_string_from_java_bytes(bytes),
        (FieldValue::Bytes(bytes), _) => hex_string(bytes),
        (FieldValue::Ints(items), "[Z") => join_elements(items, |v| (*v != 0).to_string()),
        (FieldValue::Ints(items), "[C") => items
            .iter()
            .filter_map(|v| char::from_u32(*v as u32))
            .collect(),
        (FieldValue::Ints(items), _) => join_elements(items, |v| v.to_string()),
        (FieldValue::Floats(items), "[F") => join_elements(items, |v| (*v as f32).to_string()),
        (FieldValue::Floats(items), _) => join_elements(items, |v| v.to_string()),
        (FieldValue::Refs(items), _) => join_elements(items, stringify_anything),
        (FieldValue::BigInt(v), _) => v.to_string(),
        (FieldValue::Ref(obj), _) => stringify_object(obj),
        (FieldValue::Raw(res), _) => format!("{:?}", res),
    }
}

/// Debug rendering of an object: strings and boxed primitives by value, others as
/// `Class{field=value, ...}`.
pub fn stringify_object(obj: &Object) -> String {
    let suffix = get_class_name_suffix(obj, true);
    let fields = obj.fields();
    let value_field = fields.get("value");
    match (suffix.as_str(), value_field) {
        ("String", Some(f))
        | ("Boolean", Some(f))
        | ("Byte", Some(f))
        | ("Character", Some(f))
        | ("Double", Some(f))
        | ("Float", Some(f))
        | ("Integer", Some(f))
        | ("Long", Some(f))
        | ("Short", Some(f)) => stringify_field(f),
        (_, Some(f)) if obj.class_name().starts_with('[') => stringify_field(f),
        _ => {
            let parts: Vec<String> = sorted_keys(&fields)
                .iter()
                .filter_map(|k| fields.get(k).map(|f| format!("{}={}", k, stringify_field(f))))
                .collect();
            format!("{}{{{}}}", suffix, parts.join(", "))
        }
    }
}

pub fn stringify_anything(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::ObjectRef(obj) => stringify_object(obj),
        Value::RawPointer(res) => format!("{:?}", res),
    }
}

/// Multi-line listing of the class and the field table, fields sorted case-insensitively.
pub fn dump_object(obj: &Object, title: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = format!("{}DumpObject {} {{\n", pad, title);
    let class_name = obj.class_name();
    if class_name.is_empty() {
        out.push_str(&format!("{}\t<class MISSING>\n", pad));
    } else {
        out.push_str(&format!("{}\tClass: {}\n", pad, class_name));
    }
    let fields = obj.fields();
    if fields.is_empty() {
        out.push_str(&format!("{}\tField Table is <empty>\n", pad));
    } else {
        out.push_str(&format!("{}\tField Table ({}):\n", pad, fields.len()));
        for key in sorted_keys(&fields) {
            if let Some(field) = fields.get(&key) {
                out.push_str(&format!(
                    "{}\t\tFld {}: ({}) {}\n",
                    pad,
                    key,
                    field.ftype,
                    stringify_field(field)
                ));
            }
        }
    }
    out.push_str(&format!("{}}}\n", pad));
    out
}
