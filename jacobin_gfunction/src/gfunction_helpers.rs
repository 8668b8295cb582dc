use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::{JavaByte, ObjectRef, Value};
use jacobin_core::object::{string_from_string_object, string_object_from_str, FieldValue};

pub fn illegal_argument(who: &str, what: &str) -> ErrorBlock {
    get_error_block(
        ExceptionKind::IllegalArgumentException,
        format!("{}: {}", who, what),
    )
}

pub fn null_pointer(who: &str, what: &str) -> ErrorBlock {
    get_error_block(ExceptionKind::NullPointerException, format!("{}: {}", who, what))
}

pub fn arg<'a>(args: &'a [Value], index: usize, who: &str) -> Result<&'a Value, ErrorBlock> {
    args.get(index)
        .ok_or_else(|| illegal_argument(who, "missing argument"))
}

/// An object argument; `null` is a `NullPointerException`.
pub fn object_arg(args: &[Value], index: usize, who: &str) -> Result<ObjectRef, ErrorBlock> {
    match arg(args, index, who)? {
        Value::ObjectRef(obj) => Ok(obj.clone()),
        Value::Null => Err(null_pointer(who, "null argument")),
        _ => Err(illegal_argument(who, "argument is not an object")),
    }
}

pub fn optional_object_arg(
    args: &[Value],
    index: usize,
    who: &str,
) -> Result<Option<ObjectRef>, ErrorBlock> {
    match arg(args, index, who)? {
        Value::ObjectRef(obj) => Ok(Some(obj.clone())),
        Value::Null => Ok(None),
        _ => Err(illegal_argument(who, "argument is not an object")),
    }
}

pub fn int_arg(args: &[Value], index: usize, who: &str) -> Result<i64, ErrorBlock> {
    match arg(args, index, who)? {
        Value::Int(v) => Ok(*v),
        _ => Err(illegal_argument(who, "argument is not an integral value")),
    }
}

pub fn float_arg(args: &[Value], index: usize, who: &str) -> Result<f64, ErrorBlock> {
    match arg(args, index, who)? {
        Value::Float(v) => Ok(*v),
        _ => Err(illegal_argument(who, "argument is not a floating-point value")),
    }
}

pub fn string_arg(args: &[Value], index: usize, who: &str) -> Result<String, ErrorBlock> {
    let obj = object_arg(args, index, who)?;
    string_from_string_object(&obj).ok_or_else(|| illegal_argument(who, "argument is not a String"))
}

pub fn string_value(s: &str) -> Value {
    Value::ObjectRef(string_object_from_str(s))
}

/// Rejects `off`/`len` pairs outside `[0, length]`.
pub fn check_bounds(length: usize, off: i64, len: i64, who: &str) -> Result<(usize, usize), ErrorBlock> {
    if off < 0 || len < 0 || off.saturating_add(len) > length as i64 {
        return Err(get_error_block(
            ExceptionKind::IndexOutOfBoundsException,
            format!("{}: offset {}, length {}, array length {}", who, off, len, length),
        ));
    }
    Ok((off as usize, len as usize))
}

pub fn byte_array(obj: &ObjectRef, who: &str) -> Result<Vec<JavaByte>, ErrorBlock> {
    match obj.get_field_value("value") {
        Some(FieldValue::Bytes(bytes)) => Ok(bytes),
        _ => Err(illegal_argument(who, "argument is not a byte array")),
    }
}

/// Elements of a `[C`, `[I`, `[J`, `[S` or `[Z` array.
pub fn int_array(obj: &ObjectRef, who: &str) -> Result<Vec<i64>, ErrorBlock> {
    match obj.get_field_value("value") {
        Some(FieldValue::Ints(items)) => Ok(items),
        _ => Err(illegal_argument(who, "argument is not an integral array")),
    }
}

pub fn ref_array(obj: &ObjectRef, who: &str) -> Result<Vec<Value>, ErrorBlock> {
    match obj.get_field_value("value") {
        Some(FieldValue::Refs(items)) => Ok(items),
        _ => Err(illegal_argument(who, "argument is not an object array")),
    }
}

/// Copies `src` into the byte array's elements starting at `off`.
pub fn store_bytes(obj: &ObjectRef, off: usize, src: &[JavaByte], who: &str) -> Result<(), ErrorBlock> {
    let mut fields = obj.fields_mut();
    match fields.get_mut("value").map(|f| &mut f.value) {
        Some(FieldValue::Bytes(bytes)) if off + src.len() <= bytes.len() => {
            bytes[off..off + src.len()].copy_from_slice(src);
            Ok(())
        }
        _ => Err(illegal_argument(who, "argument is not a large enough byte array")),
    }
}

pub fn store_ints(obj: &ObjectRef, off: usize, src: &[i64], who: &str) -> Result<(), ErrorBlock> {
    let mut fields = obj.fields_mut();
    match fields.get_mut("value").map(|f| &mut f.value) {
        Some(FieldValue::Ints(items)) if off + src.len() <= items.len() => {
            items[off..off + src.len()].copy_from_slice(src);
            Ok(())
        }
        _ => Err(illegal_argument(who, "argument is not a large enough char array")),
    }
}
