use crate::java_math_big_decimal::{decimal_value, BIG_DECIMAL_CLASS};
use crate::java_math_big_integer::{big_integer_value, BIG_INTEGER_CLASS};
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::Value;
use jacobin_core::object::{stringify_anything, string_from_string_object, FieldValue, Object};

/// Shortest round-tripping digits of a finite, non-zero value as `(digits, exponent)`,
/// meaning `d.ddd × 10^exponent`. Trailing zeros are removed.
fn scientific_digits(shortest: &str) -> (String, i32) {
    let (mantissa, exp) = match shortest.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (shortest, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all: String = format!("{}{}", int_part, frac_part);
    let leading = all.bytes().take_while(|b| *b == b'0').count();
    let digits = all[leading..].trim_end_matches('0');
    let exponent = int_part.len() as i32 - 1 - leading as i32 + exp;
    let digits = if digits.is_empty() { "0" } else { digits };
    (digits.to_string(), exponent)
}

fn java_render(negative: bool, shortest: &str) -> String {
    let (digits, exp) = scientific_digits(shortest);
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if (-3..7).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.push_str(&"0".repeat(int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat((-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        out.push('.');
        out.push_str(if digits.len() > 1 { &digits[1..] } else { "0" });
        out.push('E');
        out.push_str(&exp.to_string());
    }
    out
}

/// `Double.toString`: plain between 10^-3 and 10^7, otherwise computerized scientific notation.
pub fn java_double_to_string(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    let mut buffer = ryu::Buffer::new();
    java_render(v < 0.0, buffer.format_finite(v.abs()))
}

/// `Float.toString`, with the shortest digits that round-trip at single precision.
pub fn java_float_to_string(v: f32) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    let mut buffer = ryu::Buffer::new();
    java_render(v < 0.0, buffer.format_finite(v.abs()))
}

/// `Object.toString()` default: dotted class name and the identity hash in hex.
pub fn default_object_string(obj: &Object) -> String {
    format!("{}@{:x}", obj.class_name().replace('/', "."), obj.hash_code())
}

fn boxed_int(obj: &Object) -> Option<i64> {
    match obj.get_field_value("value") {
        Some(FieldValue::Int(v)) => Some(v),
        _ => None,
    }
}

fn boxed_float(obj: &Object) -> Option<f64> {
    match obj.get_field_value("value") {
        Some(FieldValue::Float(v)) => Some(v),
        _ => None,
    }
}

/// `String.valueOf(Object)` for the objects the runtime models natively.
pub fn object_string(obj: &Object) -> Result<String, ErrorBlock> {
    let class_name = obj.class_name();
    let rendered = match class_name.as_str() {
        "java/lang/String" => string_from_string_object(obj),
        "java/lang/Boolean" => boxed_int(obj).map(|v| (v != 0).to_string()),
        "java/lang/Character" => boxed_int(obj)
            .map(|v| char::from_u32(v as u32).unwrap_or(char::REPLACEMENT_CHARACTER).to_string()),
        "java/lang/Byte" | "java/lang/Short" | "java/lang/Integer" | "java/lang/Long" => {
            boxed_int(obj).map(|v| v.to_string())
        }
        "java/lang/Float" => boxed_float(obj).map(|v| java_float_to_string(v as f32)),
        "java/lang/Double" => boxed_float(obj).map(java_double_to_string),
        BIG_INTEGER_CLASS => Some(big_integer_value(obj, "String.valueOf")?.to_string()),
        BIG_DECIMAL_CLASS => Some(decimal_value(obj, "String.valueOf")?.to_plain_string()),
        _ => None,
    };
    Ok(rendered.unwrap_or_else(|| default_object_string(obj)))
}

/// Java string coercion of any operand value.
pub fn object_to_string(value: &Value) -> Result<String, ErrorBlock> {
    match value {
        Value::ObjectRef(obj) => object_string(obj),
        Value::Float(v) => Ok(java_double_to_string(*v)),
        other => Ok(stringify_anything(other)),
    }
}

#[cfg(test)]
mod tests {
    use crate::string_coercion::{
        default_object_string, java_double_to_string, java_float_to_string, object_to_string,
    };
    use jacobin_core::jvm_values::Value;
    use jacobin_core::object::{make_empty_object_with_class_name, make_primitive_object, FieldValue};

    #[test]
    fn test_double_to_string() {
        let cases = [
            (6.0, "6.0"),
            (0.1, "0.1"),
            (-2.5, "-2.5"),
            (100.0, "100.0"),
            (1234567.0, "1234567.0"),
            (1.0e7, "1.0E7"),
            (12345678.9, "1.23456789E7"),
            (0.001, "0.001"),
            (0.0001, "1.0E-4"),
            (1.0e-10, "1.0E-10"),
            (3.141592653589793, "3.141592653589793"),
            (f64::MAX, "1.7976931348623157E308"),
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (f64::NAN, "NaN"),
            (f64::NEG_INFINITY, "-Infinity"),
        ];
        for (v, expected) in cases {
            assert_eq!(java_double_to_string(v), expected, "{}", v);
        }
    }

    #[test]
    fn test_float_to_string() {
        assert_eq!(java_float_to_string(0.1), "0.1");
        assert_eq!(java_float_to_string(1.5e10), "1.5E10");
        assert_eq!(java_float_to_string(3.0), "3.0");
    }

    #[test]
    fn test_object_to_string() {
        let boxed = make_primitive_object("java/lang/Integer", "I", FieldValue::Int(42));
        assert_eq!(object_to_string(&Value::ObjectRef(boxed)).unwrap(), "42");
        let flag = make_primitive_object("java/lang/Boolean", "Z", FieldValue::Int(0));
        assert_eq!(object_to_string(&Value::ObjectRef(flag)).unwrap(), "false");
        let d = make_primitive_object("java/lang/Double", "D", FieldValue::Float(2.0));
        assert_eq!(object_to_string(&Value::ObjectRef(d)).unwrap(), "2.0");
        assert_eq!(object_to_string(&Value::Null).unwrap(), "null");

        let plain = make_empty_object_with_class_name("com/example/Thing");
        let text = default_object_string(&plain);
        assert_eq!(text, format!("com.example.Thing@{:x}", plain.hash_code()));
        assert_eq!(object_to_string(&Value::ObjectRef(plain)).unwrap(), text);
    }
}
