use crate::utils::{init_logger, string, text};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::invoke;
use jacobin_core::object::{make_primitive_object, make_ref_array, FieldValue};

fn boxed(class_name: &str, ftype: &str, v: i64) -> Value {
    Value::ObjectRef(make_primitive_object(class_name, ftype, FieldValue::Int(v)))
}

fn format(fmt: &str, args: Vec<Value>) -> String {
    let array = Value::ObjectRef(make_ref_array("[Ljava/lang/Object;", args));
    let result = invoke(
        "java/lang/String.format(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
        &[string(fmt), array],
    )
    .unwrap()
    .unwrap();
    text(&result).unwrap()
}

#[test]
fn test_mixed_integers() {
    init_logger();
    let args = vec![boxed("java/lang/Integer", "I", 1), boxed("java/lang/Integer", "I", 2)];
    assert_eq!(format("Hello %d and %d!\n", args), "Hello 1 and 2!\n");
}

#[test]
fn test_hex_at_primitive_width() {
    init_logger();
    let args = vec![boxed("java/lang/Byte", "B", -1), boxed("java/lang/Long", "J", -1)];
    assert_eq!(format("%x %x", args), "ff ffffffffffffffff");
    assert_eq!(format("%x", vec![boxed("java/lang/Integer", "I", -1)]), "ffffffff");
}

#[test]
fn test_hash_conversion() {
    init_logger();
    assert_eq!(format("%h", vec![Value::Null]), "null");
    assert_eq!(format("%h", vec![string("a")]), "61");
}
