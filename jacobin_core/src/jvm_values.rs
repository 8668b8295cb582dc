use crate::jvm_error::{VmError, VmExecResult};
use crate::object::Object;
use parking_lot::Mutex;
use std::fmt::{Debug, Formatter};
use std::fs::File;
use std::sync::Arc;

///https://docs.oracle.com/javase/specs/jvms/se21/html/jvms-2.html#jvms-2.3
///
/// Java 的 byte 是有符号的
pub type JavaByte = i8;

pub type ObjectRef = Arc<Object>;

/// A host-side resource carried through an object's field table.
#[derive(Debug)]
pub enum HostResource {
    Stdin,
    Stdout,
    Stderr,
    /// `None` once the owning stream has been closed.
    File(Mutex<Option<File>>),
}

impl HostResource {
    pub fn from_file(file: File) -> Arc<HostResource> {
        Arc::new(HostResource::File(Mutex::new(Some(file))))
    }
}

/// Slot content of operand stacks, locals and gfunction arguments.
///
/// Every integral Java type (boolean, byte, short, char, int, long) is widened to `Int`,
/// float and double to `Float`.
#[derive(Clone, Default)]
pub enum Value {
    Int(i64),
    Float(f64),
    ObjectRef(ObjectRef),
    #[default]
    Null,
    RawPointer(Arc<HostResource>),
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(v) => write!(f, "Int({})", v),
            Value::Float(v) => write!(f, "Float({})", v),
            Value::ObjectRef(obj) => write!(f, "ObjectRef({:?})", obj),
            Value::Null => f.write_str("Null"),
            Value::RawPointer(res) => write!(f, "RawPointer({:?})", res),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::ObjectRef(a), Value::ObjectRef(b)) => Arc::ptr_eq(a, b),
            (Value::Null, Value::Null) => true,
            (Value::RawPointer(a), Value::RawPointer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Value {
    pub fn bool(b: bool) -> Value {
        Value::Int(b as i64)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn get_int(&self) -> VmExecResult<i64> {
        if let Value::Int(v) = self {
            Ok(*v)
        } else {
            Err(VmError::ValueTypeMissMatch)
        }
    }

    pub fn get_float(&self) -> VmExecResult<f64> {
        if let Value::Float(v) = self {
            Ok(*v)
        } else {
            Err(VmError::ValueTypeMissMatch)
        }
    }

    pub fn get_object(&self) -> VmExecResult<ObjectRef> {
        if let Value::ObjectRef(obj) = self {
            Ok(obj.clone())
        } else {
            Err(VmError::ValueTypeMissMatch)
        }
    }

    pub fn get_raw(&self) -> VmExecResult<Arc<HostResource>> {
        if let Value::RawPointer(res) = self {
            Ok(res.clone())
        } else {
            Err(VmError::ValueTypeMissMatch)
        }
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::ObjectRef(value)
    }
}

impl From<Option<ObjectRef>> for Value {
    fn from(value: Option<ObjectRef>) -> Self {
        value.map_or(Value::Null, Value::ObjectRef)
    }
}

pub fn java_bytes_from_host_bytes(bytes: &[u8]) -> Vec<JavaByte> {
    bytes.iter().map(|b| *b as JavaByte).collect()
}

pub fn host_bytes_from_java_bytes(bytes: &[JavaByte]) -> Vec<u8> {
    bytes.iter().map(|b| *b as u8).collect()
}

pub fn host_string_from_java_bytes(bytes: &[JavaByte]) -> String {
    String::from_utf8_lossy(&host_bytes_from_java_bytes(bytes)).into_owned()
}

pub fn java_bytes_from_host_string(s: &str) -> Vec<JavaByte> {
    java_bytes_from_host_bytes(s.as_bytes())
}
