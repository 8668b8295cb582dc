use crate::gfunction_helpers::{illegal_argument, string_arg, string_value};
use crate::java_io_console::CONSOLE_CLASS;
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{with_gfunction_table, GFunctionResult};
use jacobin_core::object::make_empty_object_with_class_name;
use jacobin_core::system_properties::{
    get_system_property, remove_system_property, set_system_property,
};
use log::debug;

pub const SYSTEM_CLASS: &str = "java/lang/System";

/// Property keys may not be null or empty.
fn key_arg(args: &[Value], index: usize, who: &str) -> Result<String, ErrorBlock> {
    let key = string_arg(args, index, who)?;
    if key.is_empty() {
        return Err(illegal_argument(who, "key can't be empty"));
    }
    Ok(key)
}

fn optional_string(value: Option<String>) -> Value {
    value.map_or(Value::Null, |v| string_value(&v))
}

fn system_get_property(args: &[Value]) -> GFunctionResult {
    let key = key_arg(args, 0, "System.getProperty(String)")?;
    Ok(Some(optional_string(get_system_property(&key))))
}

/// Falls back to the second argument, which may itself be null.
fn system_get_property_default(args: &[Value]) -> GFunctionResult {
    let who = "System.getProperty(String,String)";
    let key = key_arg(args, 0, who)?;
    match get_system_property(&key) {
        Some(value) => Ok(Some(string_value(&value))),
        None => Ok(Some(args.get(1).cloned().unwrap_or(Value::Null))),
    }
}

fn system_set_property(args: &[Value]) -> GFunctionResult {
    let who = "System.setProperty(String,String)";
    let key = key_arg(args, 0, who)?;
    let value = string_arg(args, 1, who)?;
    debug!("{}: {}={}", who, key, value);
    Ok(Some(optional_string(set_system_property(&key, &value))))
}

fn system_clear_property(args: &[Value]) -> GFunctionResult {
    let key = key_arg(args, 0, "System.clearProperty(String)")?;
    Ok(Some(optional_string(remove_system_property(&key))))
}

fn system_line_separator(_args: &[Value]) -> GFunctionResult {
    let separator = get_system_property("line.separator").unwrap_or_else(|| "\n".to_string());
    Ok(Some(string_value(&separator)))
}

fn system_getenv(args: &[Value]) -> GFunctionResult {
    let name = string_arg(args, 0, "System.getenv(String)")?;
    Ok(Some(optional_string(std::env::var(name).ok())))
}

fn system_console(_args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::ObjectRef(make_empty_object_with_class_name(CONSOLE_CLASS))))
}

pub fn load_system() {
    with_gfunction_table(|t| {
        let c = SYSTEM_CLASS;
        t.registry_gfunction(c, "clearProperty", "(Ljava/lang/String;)Ljava/lang/String;", 1, system_clear_property);
        t.registry_gfunction(c, "console", "()Ljava/io/Console;", 0, system_console);
        t.registry_gfunction(c, "getenv", "(Ljava/lang/String;)Ljava/lang/String;", 1, system_getenv);
        t.registry_gfunction(c, "getProperty", "(Ljava/lang/String;)Ljava/lang/String;", 1, system_get_property);
        t.registry_gfunction(
            c,
            "getProperty",
            "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
            2,
            system_get_property_default,
        );
        t.registry_gfunction(c, "lineSeparator", "()Ljava/lang/String;", 0, system_line_separator);
        t.registry_gfunction(
            c,
            "setProperty",
            "(Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
            2,
            system_set_property,
        );
    });
}
