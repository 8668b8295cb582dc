use crate::utils::{big_decimal, init_logger, string, text};
use jacobin_core::class_initializer::get_static_initialized;
use jacobin_core::java_exception::ExceptionKind;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::invoke;

const BD: &str = "java/math/BigDecimal";

fn bd_call(key: &str, args: &[Value]) -> Value {
    invoke(&format!("{}.{}", BD, key), args).unwrap().unwrap()
}

fn bd_string(value: &Value) -> String {
    text(&bd_call("toString()Ljava/lang/String;", &[value.clone()])).unwrap()
}

fn scale(value: &Value) -> Value {
    bd_call("scale()I", &[value.clone()])
}

#[test]
fn test_divide_with_scale_and_half_up() {
    init_logger();
    let a = big_decimal("963963963963963963963963963963963963963963963963963963963.963");
    let b = big_decimal("2.87654876548765487654876548765487654876548765487654");
    let half_up = get_static_initialized("java/math/RoundingMode", "HALF_UP").unwrap();
    let q = bd_call(
        "divide(Ljava/math/BigDecimal;ILjava/math/RoundingMode;)Ljava/math/BigDecimal;",
        &[a, b, Value::Int(3), half_up],
    );
    assert_eq!(
        bd_string(&q),
        "335111288753189383117212577810800663414238150377653296938.250"
    );
}

#[test]
fn test_divide_non_terminating() {
    init_logger();
    let a = big_decimal("987654321098765432109876543210987654321098765.43210");
    let b = big_decimal("12345678901234567890123456789012345678901234567.890");
    let err = invoke(
        "java/math/BigDecimal.divide(Ljava/math/BigDecimal;)Ljava/math/BigDecimal;",
        &[a, b],
    )
    .unwrap_err();
    assert_eq!(err.kind, ExceptionKind::ArithmeticException);
}

#[test]
fn test_pow_is_exact() {
    init_logger();
    let b = big_decimal("2.87654876548765487654876548765487654876548765487654");
    let p = bd_call("pow(I)Ljava/math/BigDecimal;", &[b, Value::Int(5)]);
    assert_eq!(
        bd_string(&p),
        "196.9512332632041425648903952282597858571550912228881576467059003975279194556093059395958737271613605818429385286431679948696259759708157256485445979026081037557688179566936520311094050547107546448817694942476182957384867462249103941371639497016916093024"
    );
    assert_eq!(scale(&p), Value::Int(250));
}

#[test]
fn test_long_value_keeps_low_bits() {
    init_logger();
    let a = big_decimal("963963963963963963963963963963963963963963963963963963963.963");
    assert_eq!(bd_call("longValue()J", &[a]), Value::Int(-5163478405204313541));
}

#[test]
fn test_rounding_mode_lookup() {
    init_logger();
    let half_up = get_static_initialized("java/math/RoundingMode", "HALF_UP").unwrap();
    let by_ordinal = invoke("java/math/RoundingMode.valueOf(I)Ljava/math/RoundingMode;", &[Value::Int(4)])
        .unwrap()
        .unwrap();
    assert_eq!(by_ordinal, half_up);
    let by_name = invoke(
        "java/math/RoundingMode.valueOf(Ljava/lang/String;)Ljava/math/RoundingMode;",
        &[string("HALF_UP")],
    )
    .unwrap()
    .unwrap();
    assert_eq!(by_name, half_up);

    let key = "java/math/RoundingMode.valueOf(Ljava/lang/String;)Ljava/math/RoundingMode;";
    assert_eq!(
        invoke(key, &[string("ROUND_UP")]).unwrap_err().kind,
        ExceptionKind::IllegalArgumentException
    );
    assert_eq!(invoke(key, &[Value::Null]).unwrap_err().kind, ExceptionKind::NullPointerException);
}

#[test]
fn test_arithmetic_scales() {
    init_logger();
    let a = big_decimal("1.25");
    let b = big_decimal("-3.1");
    let key = |op: &str| format!("{}(Ljava/math/BigDecimal;)Ljava/math/BigDecimal;", op);
    assert_eq!(scale(&bd_call(&key("add"), &[a.clone(), b.clone()])), Value::Int(2));
    assert_eq!(scale(&bd_call(&key("subtract"), &[b.clone(), a.clone()])), Value::Int(2));
    let product = bd_call(&key("multiply"), &[a.clone(), b.clone()]);
    assert_eq!(scale(&product), Value::Int(3));
    assert_eq!(bd_string(&product), "-3.875");
    let cube = bd_call("pow(I)Ljava/math/BigDecimal;", &[a, Value::Int(3)]);
    assert_eq!(scale(&cube), Value::Int(6));
    assert_eq!(bd_string(&cube), "1.953125");
}

#[test]
fn test_string_round_trip() {
    init_logger();
    for literal in ["0", "-0.000", "123.4500", "1E+3", "-7.25E-12", "98765432109876543210.0123456789"] {
        let first = bd_string(&big_decimal(literal));
        let second = bd_string(&big_decimal(&first));
        assert_eq!(first, second, "{}", literal);
    }
}

#[test]
fn test_big_integer_signum_matches_value() {
    init_logger();
    for literal in ["-12345678901234567890", "0", "98765"] {
        let n = crate::utils::construct("java/math/BigInteger", "(Ljava/lang/String;)V", &[string(literal)]);
        let signum = invoke("java/math/BigInteger.signum()I", &[n]).unwrap().unwrap();
        let expected = match literal.chars().next() {
            Some('-') => -1,
            Some('0') => 0,
            _ => 1,
        };
        assert_eq!(signum, Value::Int(expected));
    }
}
