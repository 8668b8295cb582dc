use crate::jvm_error::{VmError, VmExecResult};
use crate::jvm_values::{HostResource, Value};
use crate::object::{make_primitive_object, stringify_object, FieldValue};
use indexmap::IndexMap;
use log::debug;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock, Once};

/// 静态区。key 是 `<class>.<field>`
#[derive(Debug, Clone, PartialEq)]
pub struct Static {
    pub ftype: String,
    pub value: Value,
}

impl Static {
    pub fn new(ftype: &str, value: Value) -> Static {
        Static {
            ftype: ftype.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticsSelector {
    All,
    /// Everything outside the JDK namespaces and `main.`.
    User,
    Class(String),
}

static STATICS: LazyLock<RwLock<IndexMap<String, Static>>> =
    LazyLock::new(|| RwLock::new(IndexMap::new()));

static PRELOAD: Once = Once::new();

fn static_key(class_name: &str, field_name: &str) -> String {
    format!("{}.{}", class_name, field_name)
}

/// Adds or replaces a static.
pub fn add_static(key: &str, entry: Static) -> VmExecResult<()> {
    if key.is_empty() {
        return Err(VmError::EmptyStaticName);
    }
    debug!("add static {} ({})", key, entry.ftype);
    STATICS.write().insert(key.to_string(), entry);
    Ok(())
}

pub fn get_static(class_name: &str, field_name: &str) -> Option<Static> {
    STATICS
        .read()
        .get(&static_key(class_name, field_name))
        .cloned()
}

/// The static's value, `Value::Null` when absent.
pub fn get_static_value(class_name: &str, field_name: &str) -> Value {
    get_static(class_name, field_name)
        .map(|s| s.value)
        .unwrap_or(Value::Null)
}

/// Bulk publish of `(name, type, value)` triples for one class.
pub fn preload_class_statics(class_name: &str, entries: Vec<(&str, &str, Value)>) {
    let mut statics = STATICS.write();
    for (name, ftype, value) in entries {
        statics.insert(static_key(class_name, name), Static::new(ftype, value));
    }
}

pub fn statics_count() -> usize {
    STATICS.read().len()
}

/// Publishes the statics every run expects before any class is initialised.
pub fn preload_statics() {
    PRELOAD.call_once(|| {
        preload_class_statics("main", vec![("$assertionsDisabled", "Z", Value::Int(1))]);
        preload_class_statics(
            "java/lang/String",
            vec![
                ("COMPACT_STRINGS", "Z", Value::Int(1)),
                ("LATIN1", "B", Value::Int(0)),
                ("UTF16", "B", Value::Int(1)),
            ],
        );
        let boolean = |b: i64| {
            Value::ObjectRef(make_primitive_object(
                "java/lang/Boolean",
                "Z",
                FieldValue::Int(b),
            ))
        };
        preload_class_statics(
            "java/lang/Boolean",
            vec![
                ("TRUE", "Ljava/lang/Boolean;", boolean(1)),
                ("FALSE", "Ljava/lang/Boolean;", boolean(0)),
            ],
        );
        preload_class_statics(
            "java/lang/System",
            vec![
                (
                    "in",
                    "Ljava/io/InputStream;",
                    Value::RawPointer(Arc::new(HostResource::Stdin)),
                ),
                (
                    "out",
                    "Ljava/io/PrintStream;",
                    Value::RawPointer(Arc::new(HostResource::Stdout)),
                ),
                (
                    "err",
                    "Ljava/io/PrintStream;",
                    Value::RawPointer(Arc::new(HostResource::Stderr)),
                ),
            ],
        );
    });
}

fn selected(key: &str, selector: &StaticsSelector) -> bool {
    match selector {
        StaticsSelector::All => true,
        StaticsSelector::User => !["java/", "jdk/", "javax/", "sun/", "main."]
            .iter()
            .any(|prefix| key.starts_with(prefix)),
        StaticsSelector::Class(name) => key
            .strip_prefix(name.as_str())
            .is_some_and(|rest| rest.starts_with('.')),
    }
}

fn format_static_value(value: &Value) -> String {
    match value {
        Value::Null => "<null>".to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::ObjectRef(obj) => stringify_object(obj),
        Value::RawPointer(res) => format!("{:?}", res),
    }
}

pub fn dump_statics(label: &str, selector: StaticsSelector) -> String {
    let statics = STATICS.read();
    let mut keys: Vec<&String> = statics.keys().filter(|k| selected(k, &selector)).collect();
    keys.sort_by_key(|k| k.to_lowercase());
    let mut out = format!("===== DumpStatics BEGIN: {}\n", label);
    for key in keys {
        if let Some(entry) = statics.get(key) {
            out.push_str(&format!(
                "{:<40}   {} {}\n",
                key,
                entry.ftype,
                format_static_value(&entry.value)
            ));
        }
    }
    out.push_str(&format!("===== DumpStatics END: {}\n", label));
    out
}

#[cfg(test)]
mod tests {
    use crate::jvm_error::VmError;
    use crate::jvm_values::Value;
    use crate::static_field_area::{
        add_static, dump_statics, get_static, get_static_value, preload_class_statics,
        preload_statics, Static, StaticsSelector,
    };

    #[test]
    fn test_add_and_get() {
        add_static("test/statics/A.count", Static::new("I", Value::Int(3))).unwrap();
        assert_eq!(get_static_value("test/statics/A", "count"), Value::Int(3));
        add_static("test/statics/A.count", Static::new("I", Value::Int(4))).unwrap();
        assert_eq!(get_static("test/statics/A", "count").unwrap().value, Value::Int(4));
        assert_eq!(get_static_value("test/statics/A", "missing"), Value::Null);
        assert_eq!(
            add_static("", Static::new("I", Value::Int(0))),
            Err(VmError::EmptyStaticName)
        );
    }

    #[test]
    fn test_preload() {
        preload_statics();
        preload_statics();
        assert_eq!(get_static_value("java/lang/String", "UTF16"), Value::Int(1));
        assert!(matches!(
            get_static_value("java/lang/System", "out"),
            Value::RawPointer(_)
        ));
        let t = get_static_value("java/lang/Boolean", "TRUE");
        assert_eq!(t.get_object().unwrap().int_field("value"), Some(1));
    }

    #[test]
    fn test_dump_selectors() {
        preload_statics();
        preload_class_statics(
            "test/statics/Dump",
            vec![("b", "I", Value::Int(2)), ("A", "Ljava/lang/Object;", Value::Null)],
        );
        let dump = dump_statics("sel", StaticsSelector::Class("test/statics/Dump".to_string()));
        let a = dump.find("test/statics/Dump.A").unwrap();
        let b = dump.find("test/statics/Dump.b").unwrap();
        assert!(a < b);
        assert!(dump.contains("<null>"));
        assert!(!dump.contains("java/lang/String.UTF16"));

        let user = dump_statics("user", StaticsSelector::User);
        assert!(user.contains("test/statics/Dump.b"));
        assert!(!user.contains("main.$assertionsDisabled"));
        assert!(dump_statics("all", StaticsSelector::All).contains("java/lang/String.LATIN1"));
    }
}
