use crate::gfunction_helpers::{illegal_argument, object_arg, optional_object_arg, ref_array, string_value};
use crate::java_math_big_decimal::{decimal_value, java_big_decimal_hash, BIG_DECIMAL_CLASS};
use crate::java_math_big_integer::{big_integer_value, java_big_integer_hash, BIG_INTEGER_CLASS};
use crate::string_coercion::{java_double_to_string, java_float_to_string, object_string};
use bitflags::bitflags;
use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::{ObjectRef, Value};
use jacobin_core::native_method_area::{with_gfunction_table, GFunctionResult};
use jacobin_core::object::{string_from_string_object, stringify_anything, FieldValue, Object};
use log::trace;
use num_bigint::BigInt;
use num_traits::Signed;

bitflags! {
    /// Flags of a `%[index$][flags][width][.precision]conversion` specifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FormatFlags: u8 {
        const LEFT_JUSTIFY = 0x01;
        const ALTERNATE = 0x02;
        const PLUS = 0x04;
        const LEADING_SPACE = 0x08;
        const ZERO_PAD = 0x10;
        const GROUPING = 0x20;
        const PARENTHESES = 0x40;
    }
}

impl FormatFlags {
    fn from_char(c: char) -> Option<FormatFlags> {
        match c {
            '-' => Some(FormatFlags::LEFT_JUSTIFY),
            '#' => Some(FormatFlags::ALTERNATE),
            '+' => Some(FormatFlags::PLUS),
            ' ' => Some(FormatFlags::LEADING_SPACE),
            '0' => Some(FormatFlags::ZERO_PAD),
            ',' => Some(FormatFlags::GROUPING),
            '(' => Some(FormatFlags::PARENTHESES),
            _ => None,
        }
    }
}

/// A format argument reduced to the Java type it had, not just its runtime tag.
#[derive(Debug, Clone)]
pub enum FormatArg {
    Null,
    Boolean(bool),
    Char(u32),
    Integral { value: i64, bits: u32 },
    Float(f32),
    Double(f64),
    BigInteger(BigInt),
    BigDecimal { text: String, hash: i32, approx: f64 },
    Text(String),
    Other(ObjectRef),
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

fn normalize_object(obj: &ObjectRef) -> Result<FormatArg, ErrorBlock> {
    let who = "StringFormatter";
    let class_name = obj.class_name();
    let integral = |bits| boxed_int(obj).map(|value| FormatArg::Integral { value, bits });
    let arg = match class_name.as_str() {
        "java/lang/String" => string_from_string_object(obj).map(FormatArg::Text),
        "java/lang/Boolean" => boxed_int(obj).map(|v| FormatArg::Boolean(v != 0)),
        "java/lang/Character" => boxed_int(obj).map(|v| FormatArg::Char(v as u32)),
        "java/lang/Byte" => integral(8),
        "java/lang/Short" => integral(16),
        "java/lang/Integer" => integral(32),
        "java/lang/Long" => integral(64),
        "java/lang/Float" => boxed_float(obj).map(|v| FormatArg::Float(v as f32)),
        "java/lang/Double" => boxed_float(obj).map(FormatArg::Double),
        BIG_INTEGER_CLASS => Some(FormatArg::BigInteger(big_integer_value(obj, who)?)),
        BIG_DECIMAL_CLASS => {
            let d = decimal_value(obj, who)?;
            Some(FormatArg::BigDecimal {
                text: d.to_plain_string(),
                hash: java_big_decimal_hash(&d),
                approx: d.to_f64(),
            })
        }
        _ => Some(FormatArg::Other(obj.clone())),
    };
    arg.ok_or_else(|| illegal_argument(who, &format!("malformed {} argument", class_name)))
}

pub fn normalize_arg(value: &Value) -> Result<FormatArg, ErrorBlock> {
    match value {
        Value::Null => Ok(FormatArg::Null),
        Value::Int(v) => Ok(FormatArg::Integral { value: *v, bits: 64 }),
        Value::Float(v) => Ok(FormatArg::Double(*v)),
        Value::ObjectRef(obj) => normalize_object(obj),
        Value::RawPointer(_) => Ok(FormatArg::Text(stringify_anything(value))),
    }
}

fn java_type_name(arg: &FormatArg) -> String {
    match arg {
        FormatArg::Null => "null".to_string(),
        FormatArg::Boolean(_) => "java.lang.Boolean".to_string(),
        FormatArg::Char(_) => "java.lang.Character".to_string(),
        FormatArg::Integral { bits: 8, .. } => "java.lang.Byte".to_string(),
        FormatArg::Integral { bits: 16, .. } => "java.lang.Short".to_string(),
        FormatArg::Integral { bits: 32, .. } => "java.lang.Integer".to_string(),
        FormatArg::Integral { .. } => "java.lang.Long".to_string(),
        FormatArg::Float(_) => "java.lang.Float".to_string(),
        FormatArg::Double(_) => "java.lang.Double".to_string(),
        FormatArg::BigInteger(_) => "java.math.BigInteger".to_string(),
        FormatArg::BigDecimal { .. } => "java.math.BigDecimal".to_string(),
        FormatArg::Text(_) => "java.lang.String".to_string(),
        FormatArg::Other(obj) => obj.class_name().replace('/', "."),
    }
}

fn java_string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// The JDK `hashCode()` of each boxed type.
pub fn java_hash(arg: &FormatArg) -> Option<i32> {
    let hash = match arg {
        FormatArg::Null => return None,
        FormatArg::Boolean(b) => {
            if *b {
                1231
            } else {
                1237
            }
        }
        FormatArg::Char(c) => *c as i32,
        FormatArg::Integral { value, bits: 64 } => (*value ^ ((*value as u64) >> 32) as i64) as i32,
        FormatArg::Integral { value, .. } => *value as i32,
        FormatArg::Float(v) => {
            if v.is_nan() {
                0x7fc0_0000
            } else {
                v.to_bits() as i32
            }
        }
        FormatArg::Double(v) => {
            let bits = if v.is_nan() { 0x7ff8_0000_0000_0000 } else { v.to_bits() };
            (bits ^ (bits >> 32)) as i32
        }
        FormatArg::BigInteger(v) => java_big_integer_hash(v),
        FormatArg::BigDecimal { hash, .. } => *hash,
        FormatArg::Text(s) => java_string_hash(s),
        FormatArg::Other(obj) => obj.hash_code() as i32,
    };
    Some(hash)
}

fn coerce_to_string(arg: &FormatArg) -> Result<String, ErrorBlock> {
    Ok(match arg {
        FormatArg::Null => "null".to_string(),
        FormatArg::Boolean(b) => b.to_string(),
        FormatArg::Char(c) => char::from_u32(*c).unwrap_or(char::REPLACEMENT_CHARACTER).to_string(),
        FormatArg::Integral { value, .. } => value.to_string(),
        FormatArg::Float(v) => java_float_to_string(*v),
        FormatArg::Double(v) => java_double_to_string(*v),
        FormatArg::BigInteger(v) => v.to_string(),
        FormatArg::BigDecimal { text, .. } => text.clone(),
        FormatArg::Text(s) => s.clone(),
        FormatArg::Other(obj) => object_string(obj)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ArgSelector {
    Next,
    Previous,
    Explicit(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Specifier {
    text: String,
    selector: ArgSelector,
    flags: FormatFlags,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

fn unknown_conversion(conversion: &str) -> ErrorBlock {
    get_error_block(
        ExceptionKind::UnknownFormatConversionException,
        format!("Conversion = '{}'", conversion),
    )
}

fn take_digits(chars: &[char], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return None;
    }
    chars[start..*pos].iter().collect::<String>().parse().ok()
}

/// Parses the specifier whose `%` is at `chars[start]`; returns it and the index past it.
fn parse_specifier(chars: &[char], start: usize) -> Result<(Specifier, usize), ErrorBlock> {
    let mut pos = start + 1;
    let mut selector = ArgSelector::Next;
    let mut flags = FormatFlags::empty();

    // argument index `N$` or reuse `<`
    let digits_start = pos;
    if let Some(n) = take_digits(chars, &mut pos) {
        if chars.get(pos) == Some(&'$') {
            selector = ArgSelector::Explicit(n.max(1));
            pos += 1;
        } else {
            pos = digits_start;
        }
    }
    if chars.get(pos) == Some(&'<') {
        selector = ArgSelector::Previous;
        pos += 1;
    }
    while let Some(flag) = chars.get(pos).and_then(|c| FormatFlags::from_char(*c)) {
        flags |= flag;
        pos += 1;
    }
    let width = take_digits(chars, &mut pos);
    let precision = if chars.get(pos) == Some(&'.') {
        pos += 1;
        Some(take_digits(chars, &mut pos).ok_or_else(|| unknown_conversion("."))?)
    } else {
        None
    };
    let conversion = *chars
        .get(pos)
        .ok_or_else(|| unknown_conversion("%"))?;
    pos += 1;
    if matches!(conversion, 't' | 'T') {
        // the date/time suffix is consumed but not interpreted
        chars
            .get(pos)
            .ok_or_else(|| unknown_conversion(&conversion.to_string()))?;
        pos += 1;
    }
    let spec = Specifier {
        text: chars[start..pos].iter().collect(),
        selector,
        flags,
        width,
        precision,
        conversion,
    };
    Ok((spec, pos))
}

fn pad(body: String, spec: &Specifier) -> String {
    let width = spec.width.unwrap_or(0);
    let len = body.chars().count();
    if len >= width {
        return body;
    }
    let fill = " ".repeat(width - len);
    if spec.flags.contains(FormatFlags::LEFT_JUSTIFY) {
        body + &fill
    } else {
        fill + &body
    }
}

fn group_thousands(int_digits: &str) -> String {
    let mut out = String::with_capacity(int_digits.len() + int_digits.len() / 3);
    for (i, c) in int_digits.chars().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Applies sign, grouping, and zero padding to an unsigned numeric body.
fn decorate_signed(negative: bool, magnitude: &str, spec: &Specifier) -> String {
    let flags = spec.flags;
    let body = if flags.contains(FormatFlags::GROUPING) {
        let split = magnitude
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(magnitude.len());
        format!("{}{}", group_thousands(&magnitude[..split]), &magnitude[split..])
    } else {
        magnitude.to_string()
    };
    let (prefix, suffix) = if negative && flags.contains(FormatFlags::PARENTHESES) {
        ("(", ")")
    } else if negative {
        ("-", "")
    } else if flags.contains(FormatFlags::PLUS) {
        ("+", "")
    } else if flags.contains(FormatFlags::LEADING_SPACE) {
        (" ", "")
    } else {
        ("", "")
    };
    let mut body = body;
    if flags.contains(FormatFlags::ZERO_PAD) {
        let used = prefix.len() + suffix.len() + body.chars().count();
        let width = spec.width.unwrap_or(0);
        if used < width {
            body = "0".repeat(width - used) + &body;
        }
    }
    pad(format!("{}{}{}", prefix, body, suffix), spec)
}

fn mismatch(spec: &Specifier, arg: &FormatArg) -> ErrorBlock {
    get_error_block(
        ExceptionKind::IllegalFormatConversionException,
        format!("{} != {}", spec.conversion, java_type_name(arg)),
    )
}

fn format_integer(spec: &Specifier, arg: &FormatArg) -> Result<String, ErrorBlock> {
    let radix = match spec.conversion.to_ascii_lowercase() {
        'o' => 8,
        'x' => 16,
        _ => 10,
    };
    let alternate = spec.flags.contains(FormatFlags::ALTERNATE);
    let prefix = match radix {
        8 if alternate => "0",
        16 if alternate => "0x",
        _ => "",
    };
    match arg {
        FormatArg::Integral { value, .. } if radix == 10 => {
            Ok(decorate_signed(*value < 0, &value.unsigned_abs().to_string(), spec))
        }
        FormatArg::Integral { value, bits } => {
            let mask = if *bits >= 64 { u64::MAX } else { (1u64 << bits) - 1 };
            let unsigned = (*value as u64) & mask;
            let digits = if radix == 8 {
                format!("{:o}", unsigned)
            } else {
                format!("{:x}", unsigned)
            };
            Ok(zero_padded_unsigned(prefix, digits, spec))
        }
        FormatArg::BigInteger(v) if radix == 10 => {
            Ok(decorate_signed(v.is_negative(), &v.magnitude().to_string(), spec))
        }
        FormatArg::BigInteger(v) => {
            let digits = format!("{}{}", prefix, v.magnitude().to_str_radix(radix));
            Ok(decorate_signed(v.is_negative(), &digits, spec))
        }
        FormatArg::Null => Ok(pad("null".to_string(), spec)),
        other => Err(mismatch(spec, other)),
    }
}

fn zero_padded_unsigned(prefix: &str, digits: String, spec: &Specifier) -> String {
    let width = spec.width.unwrap_or(0);
    let used = prefix.len() + digits.len();
    if spec.flags.contains(FormatFlags::ZERO_PAD) && used < width {
        return format!("{}{}{}", prefix, "0".repeat(width - used), digits);
    }
    pad(format!("{}{}", prefix, digits), spec)
}

/// `%e` body for a non-negative finite value: mantissa, `e`, sign, at least two exponent digits.
fn scientific(v: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, v);
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.unsigned_abs())
        }
        None => raw,
    }
}

fn general(v: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if v == 0.0 {
        return format!("{:.*}", precision - 1, v);
    }
    // the decision uses the value after rounding to `precision` significant digits
    let rounded: f64 = format!("{:.*e}", precision - 1, v).parse().unwrap_or(v);
    if (1e-4..10f64.powi(precision as i32)).contains(&rounded) {
        let exponent = rounded.log10().floor() as i32;
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        format!("{:.*}", decimals, v)
    } else {
        scientific(v, precision - 1)
    }
}

fn format_floating(spec: &Specifier, arg: &FormatArg) -> Result<String, ErrorBlock> {
    let v = match arg {
        FormatArg::Double(v) => *v,
        FormatArg::Float(v) => *v as f64,
        FormatArg::BigDecimal { approx, .. } => *approx,
        FormatArg::Null => return Ok(pad("null".to_string(), spec)),
        other => return Err(mismatch(spec, other)),
    };
    if v.is_nan() {
        return Ok(pad("NaN".to_string(), spec));
    }
    if v.is_infinite() {
        let body = if v < 0.0 {
            if spec.flags.contains(FormatFlags::PARENTHESES) {
                "(Infinity)"
            } else {
                "-Infinity"
            }
        } else if spec.flags.contains(FormatFlags::PLUS) {
            "+Infinity"
        } else {
            "Infinity"
        };
        return Ok(pad(body.to_string(), spec));
    }
    let precision = spec.precision.unwrap_or(6);
    let magnitude = v.abs();
    let body = match spec.conversion.to_ascii_lowercase() {
        'e' => scientific(magnitude, precision),
        'g' => general(magnitude, precision),
        _ => format!("{:.*}", precision, magnitude),
    };
    let negative = v.is_sign_negative() && body.bytes().any(|b| (b'1'..=b'9').contains(&b));
    Ok(decorate_signed(negative, &body, spec))
}

fn format_one(spec: &Specifier, arg: &FormatArg) -> Result<String, ErrorBlock> {
    let truncate = |s: String| match spec.precision {
        Some(p) => s.chars().take(p).collect(),
        None => s,
    };
    let body = match spec.conversion.to_ascii_lowercase() {
        'b' => {
            let b = match arg {
                FormatArg::Null => false,
                FormatArg::Boolean(b) => *b,
                _ => true,
            };
            pad(truncate(b.to_string()), spec)
        }
        's' | 't' => pad(truncate(coerce_to_string(arg)?), spec),
        'c' => {
            let code = match arg {
                FormatArg::Null => return Ok(pad("null".to_string(), spec)),
                FormatArg::Char(c) => *c,
                FormatArg::Integral { value, bits } if *bits <= 32 => *value as u32,
                other => return Err(mismatch(spec, other)),
            };
            let c = char::from_u32(code).ok_or_else(|| {
                illegal_argument("StringFormatter", &format!("invalid code point 0x{:x}", code))
            })?;
            pad(c.to_string(), spec)
        }
        'd' | 'o' | 'x' => format_integer(spec, arg)?,
        'e' | 'f' | 'g' => format_floating(spec, arg)?,
        'h' => {
            let text = java_hash(arg).map_or_else(|| "null".to_string(), |h| format!("{:x}", h as u32));
            pad(truncate(text), spec)
        }
        _ => return Err(unknown_conversion(&spec.conversion.to_string())),
    };
    if spec.conversion.is_ascii_uppercase() {
        Ok(body.to_uppercase())
    } else {
        Ok(body)
    }
}

fn line_separator() -> &'static str {
    if cfg!(windows) {
        "\r\n"
    } else {
        "\n"
    }
}

/// Java `Formatter` semantics over already-normalized arguments.
pub fn format_with_args(format: &str, args: &[FormatArg]) -> Result<String, ErrorBlock> {
    let chars: Vec<char> = format.chars().collect();
    let mut out = String::with_capacity(format.len());
    let mut next = 0usize;
    let mut last: Option<usize> = None;
    let mut pos = 0;
    while pos < chars.len() {
        if chars[pos] != '%' {
            out.push(chars[pos]);
            pos += 1;
            continue;
        }
        let (spec, after) = parse_specifier(&chars, pos)?;
        pos = after;
        match spec.conversion {
            '%' => {
                out.push_str(&pad("%".to_string(), &spec));
                continue;
            }
            'n' => {
                out.push_str(line_separator());
                continue;
            }
            _ => {}
        }
        let index = match spec.selector {
            ArgSelector::Next => {
                next += 1;
                next - 1
            }
            ArgSelector::Explicit(n) => n - 1,
            ArgSelector::Previous => last.ok_or_else(|| {
                get_error_block(
                    ExceptionKind::MissingFormatArgumentException,
                    format!("Format specifier '{}'", spec.text),
                )
            })?,
        };
        let arg = args.get(index).ok_or_else(|| {
            get_error_block(
                ExceptionKind::MissingFormatArgumentException,
                format!("Format specifier '{}'", spec.text),
            )
        })?;
        last = Some(index);
        trace!("format specifier {} -> argument {}", spec.text, index);
        out.push_str(&format_one(&spec, arg)?);
    }
    Ok(out)
}

/// `String.format(fmt, args)` over runtime values: `params` is the format String and the
/// `Object[]` of arguments (null meaning none).
pub fn string_formatter(params: &[Value]) -> Result<String, ErrorBlock> {
    let who = "StringFormatter";
    if params.len() != 2 {
        return Err(illegal_argument(
            who,
            &format!("Invalid parameter count: {}", params.len()),
        ));
    }
    let format_obj = object_arg(params, 0, who)?;
    let format = string_from_string_object(&format_obj)
        .ok_or_else(|| illegal_argument(who, "format is not a String"))?;
    let raw_args = match optional_object_arg(params, 1, who)? {
        Some(array) => ref_array(&array, who)?,
        None => Vec::new(),
    };
    let args = raw_args
        .iter()
        .map(normalize_arg)
        .collect::<Result<Vec<FormatArg>, ErrorBlock>>()?;
    format_with_args(&format, &args)
}

fn string_format(args: &[Value]) -> GFunctionResult {
    Ok(Some(string_value(&string_formatter(args)?)))
}

fn string_formatted(args: &[Value]) -> GFunctionResult {
    Ok(Some(string_value(&string_formatter(args)?)))
}

pub fn load_string_formatter() {
    with_gfunction_table(|t| {
        t.registry_gfunction(
            "java/lang/String",
            "format",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
            2,
            string_format,
        );
        t.registry_gfunction(
            "java/lang/String",
            "formatted",
            "([Ljava/lang/Object;)Ljava/lang/String;",
            1,
            string_formatted,
        );
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::string_formatter::{format_with_args, java_hash, string_formatter, FormatArg};
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::object::{make_primitive_object, make_ref_array, FieldValue};
    use num_bigint::BigInt;

    fn int(value: i64, bits: u32) -> FormatArg {
        FormatArg::Integral { value, bits }
    }

    fn fmt(format: &str, args: &[FormatArg]) -> String {
        format_with_args(format, args).unwrap()
    }

    #[test]
    fn test_unsigned_hex_at_primitive_width() {
        assert_eq!(fmt("%x %x", &[int(-1, 8), int(-1, 64)]), "ff ffffffffffffffff");
        assert_eq!(fmt("%x", &[int(-1, 32)]), "ffffffff");
        assert_eq!(fmt("%X", &[int(-2, 16)]), "FFFE");
        assert_eq!(fmt("%o", &[int(-1, 8)]), "377");
        assert_eq!(fmt("%#x", &[int(255, 32)]), "0xff");
        assert_eq!(fmt("%08x", &[int(255, 32)]), "000000ff");
    }

    #[test]
    fn test_decimal_flags() {
        assert_eq!(fmt("Hello %d and %d!\n", &[int(1, 32), int(2, 32)]), "Hello 1 and 2!\n");
        assert_eq!(fmt("%,d", &[int(1234567, 32)]), "1,234,567");
        assert_eq!(fmt("%+d", &[int(5, 32)]), "+5");
        assert_eq!(fmt("%(d", &[int(-5, 32)]), "(5)");
        assert_eq!(fmt("%05d", &[int(-42, 32)]), "-0042");
        assert_eq!(fmt("[%-5d]", &[int(7, 32)]), "[7    ]");
        assert_eq!(fmt("[%5d]", &[int(7, 32)]), "[    7]");
        assert_eq!(fmt("%d", &[FormatArg::BigInteger(BigInt::from(-12))]), "-12");
    }

    #[test]
    fn test_floating() {
        assert_eq!(fmt("%.2f", &[FormatArg::Double(3.14159)]), "3.14");
        assert_eq!(fmt("%f", &[FormatArg::Double(1.5)]), "1.500000");
        assert_eq!(fmt("%e", &[FormatArg::Double(12345.678)]), "1.234568e+04");
        assert_eq!(fmt("%.3E", &[FormatArg::Double(0.000123)]), "1.230E-04");
        assert_eq!(fmt("%g", &[FormatArg::Double(123.456)]), "123.456");
        assert_eq!(fmt("%g", &[FormatArg::Double(0.00001)]), "1.00000e-05");
        assert_eq!(fmt("%,.1f", &[FormatArg::Double(-1234.56)]), "-1,234.6");
        assert_eq!(fmt("%f", &[FormatArg::Double(f64::NAN)]), "NaN");
        let bd = FormatArg::BigDecimal {
            text: "2.50".to_string(),
            hash: 31 * 250 + 2,
            approx: 2.5,
        };
        assert_eq!(fmt("%.1f %s", &[bd.clone(), bd]), "2.5 2.50");
    }

    #[test]
    fn test_strings_chars_booleans() {
        assert_eq!(fmt("%s|%S", &[FormatArg::Text("ab".into()), FormatArg::Text("ab".into())]), "ab|AB");
        assert_eq!(fmt("%.1s", &[FormatArg::Text("xyz".into())]), "x");
        assert_eq!(fmt("%c%C", &[FormatArg::Char('q' as u32), int('r' as i64, 32)]), "qR");
        assert_eq!(fmt("%b %b %B", &[FormatArg::Null, FormatArg::Boolean(false), int(0, 32)]), "false false TRUE");
        assert_eq!(fmt("%s", &[FormatArg::Double(6.0)]), "6.0");
        assert_eq!(fmt("100%%%n", &[]), format!("100%{}", if cfg!(windows) { "\r\n" } else { "\n" }));
    }

    #[test]
    fn test_hash_codes() {
        assert_eq!(fmt("%h", &[FormatArg::Null]), "null");
        assert_eq!(fmt("%h", &[FormatArg::Text("a".into())]), "61");
        assert_eq!(fmt("%h", &[FormatArg::Text("hello".into())]), "5e918d2");
        assert_eq!(fmt("%h", &[int(-1, 64)]), "0");
        assert_eq!(fmt("%H", &[FormatArg::Double(1.0)]), "3FF00000");
        assert_eq!(java_hash(&FormatArg::Float(f32::NAN)), Some(0x7fc0_0000));
        assert_eq!(java_hash(&FormatArg::Boolean(true)), Some(1231));
    }

    #[test]
    fn test_argument_selection() {
        assert_eq!(fmt("%2$s %1$s", &[int(1, 32), int(2, 32)]), "2 1");
        assert_eq!(fmt("%d %<x", &[int(255, 32)]), "255 ff");
        assert_eq!(fmt("%tY", &[FormatArg::Text("2024".into())]), "2024");
    }

    #[test]
    fn test_errors() {
        let err = format_with_args("%d %d", &[int(1, 32)]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::MissingFormatArgumentException);
        let err = format_with_args("%q", &[int(1, 32)]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::UnknownFormatConversionException);
        let err = format_with_args("%d", &[FormatArg::Text("x".into())]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IllegalFormatConversionException);
        assert_eq!(err.message, "d != java.lang.String");
    }

    #[test]
    fn test_runtime_values() {
        let byte = make_primitive_object("java/lang/Byte", "B", FieldValue::Int(-1));
        let long = make_primitive_object("java/lang/Long", "J", FieldValue::Int(-1));
        let array = make_ref_array("[Ljava/lang/Object;", vec![Value::ObjectRef(byte), Value::ObjectRef(long)]);
        let out = string_formatter(&[string_value("%x %x"), Value::ObjectRef(array)]).unwrap();
        assert_eq!(out, "ff ffffffffffffffff");
        assert_eq!(string_formatter(&[string_value("plain"), Value::Null]).unwrap(), "plain");
        let err = string_formatter(&[string_value("plain")]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IllegalArgumentException);
    }
}
