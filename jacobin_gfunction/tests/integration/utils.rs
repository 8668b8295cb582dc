use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::invoke;
use jacobin_core::object::{make_empty_object_with_class_name, string_from_string_object, string_object_from_str};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
    jacobin_gfunction::load_gfunctions();
}

pub fn string(s: &str) -> Value {
    Value::ObjectRef(string_object_from_str(s))
}

pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::ObjectRef(obj) => string_from_string_object(obj),
        _ => None,
    }
}

/// `new <class>(args...)` through the registered constructor `descriptor`.
pub fn construct(class_name: &str, descriptor: &str, args: &[Value]) -> Value {
    let obj = Value::ObjectRef(make_empty_object_with_class_name(class_name));
    let mut all = vec![obj.clone()];
    all.extend_from_slice(args);
    invoke(&format!("{}.<init>{}", class_name, descriptor), &all).unwrap();
    obj
}

pub fn big_decimal(literal: &str) -> Value {
    construct("java/math/BigDecimal", "(Ljava/lang/String;)V", &[string(literal)])
}
