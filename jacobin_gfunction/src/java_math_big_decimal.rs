use crate::decimal_arith::{Decimal, DecimalError, RoundingMode};
use crate::gfunction_helpers::{
    float_arg, illegal_argument, int_arg, object_arg, optional_object_arg, string_arg, string_value,
};
use crate::java_math_big_integer::{big_integer_value, java_big_integer_hash, make_big_integer};
use crate::java_math_math_context::math_context_arg;
use crate::java_math_rounding_mode::rounding_mode_arg;
use crate::string_coercion::java_double_to_string;
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::{ObjectRef, Value};
use jacobin_core::native_method_area::{
    trap_deprecated, trap_function, with_gfunction_table, GFunctionResult,
};
use jacobin_core::object::{
    clear_field_table, make_2_elem_ref_array, make_empty_object_with_class_name, FieldValue, Object,
    BIG_INTEGER_DESCRIPTOR,
};
use jacobin_core::static_field_area::preload_class_statics;
use log::debug;
use num_bigint::BigInt;
use std::cmp::Ordering;

pub const BIG_DECIMAL_CLASS: &str = "java/math/BigDecimal";
const BIG_DECIMAL_DESCRIPTOR: &str = "Ljava/math/BigDecimal;";

/// Stores `d` into the receiver as `intVal` (a BigInteger object), `scale` and `precision`.
pub fn set_big_decimal(obj: &Object, d: &Decimal) {
    clear_field_table(obj);
    obj.set_field(
        "intVal",
        BIG_INTEGER_DESCRIPTOR,
        FieldValue::Ref(make_big_integer(d.unscaled.clone())),
    );
    obj.set_field("scale", "I", FieldValue::Int(d.scale));
    obj.set_field("precision", "I", FieldValue::Int(d.precision()));
}

pub fn make_big_decimal(d: &Decimal) -> ObjectRef {
    let obj = make_empty_object_with_class_name(BIG_DECIMAL_CLASS);
    set_big_decimal(&obj, d);
    obj
}

pub fn decimal_value(obj: &Object, who: &str) -> Result<Decimal, ErrorBlock> {
    let int_val = obj
        .ref_field("intVal")
        .ok_or_else(|| illegal_argument(who, "object is not a BigDecimal"))?;
    let scale = obj
        .int_field("scale")
        .ok_or_else(|| illegal_argument(who, "BigDecimal has no scale"))?;
    Ok(Decimal::new(big_integer_value(&int_val, who)?, scale))
}

/// `31 * intVal.hashCode() + scale`.
pub fn java_big_decimal_hash(d: &Decimal) -> i32 {
    java_big_integer_hash(&d.unscaled)
        .wrapping_mul(31)
        .wrapping_add(d.scale as i32)
}

fn this_decimal(args: &[Value], who: &str) -> Result<Decimal, ErrorBlock> {
    let obj = object_arg(args, 0, who)?;
    decimal_value(&obj, who)
}

fn other_decimal(args: &[Value], index: usize, who: &str) -> Result<Decimal, ErrorBlock> {
    let obj = object_arg(args, index, who)?;
    decimal_value(&obj, who)
}

fn decimal_result(d: Decimal) -> GFunctionResult {
    Ok(Some(Value::ObjectRef(make_big_decimal(&d))))
}

fn unary_op(
    args: &[Value],
    who: &str,
    op: impl FnOnce(Decimal) -> Result<Decimal, DecimalError>,
) -> GFunctionResult {
    decimal_result(op(this_decimal(args, who)?)?)
}

/// A unary operation whose exact result is rounded by the MathContext at `args[ctx_index]`.
fn unary_op_mc(
    args: &[Value],
    who: &str,
    ctx_index: usize,
    op: impl FnOnce(Decimal) -> Result<Decimal, DecimalError>,
) -> GFunctionResult {
    let d = this_decimal(args, who)?;
    let ctx = math_context_arg(args, ctx_index, who)?;
    decimal_result(op(d)?.round(ctx)?)
}

fn binary_op(
    args: &[Value],
    who: &str,
    op: impl FnOnce(&Decimal, &Decimal) -> Result<Decimal, DecimalError>,
) -> GFunctionResult {
    let a = this_decimal(args, who)?;
    let b = other_decimal(args, 1, who)?;
    decimal_result(op(&a, &b)?)
}

fn binary_op_mc(
    args: &[Value],
    who: &str,
    op: impl FnOnce(&Decimal, &Decimal) -> Result<Decimal, DecimalError>,
) -> GFunctionResult {
    let a = this_decimal(args, who)?;
    let b = other_decimal(args, 1, who)?;
    let ctx = math_context_arg(args, 2, who)?;
    decimal_result(op(&a, &b)?.round(ctx)?)
}

fn big_decimal_clinit(_args: &[Value]) -> GFunctionResult {
    let mut entries: Vec<(&str, &str, Value)> = [("ZERO", 0), ("ONE", 1), ("TWO", 2), ("TEN", 10)]
        .into_iter()
        .map(|(name, v)| {
            (
                name,
                BIG_DECIMAL_DESCRIPTOR,
                Value::ObjectRef(make_big_decimal(&Decimal::from_i64(v))),
            )
        })
        .collect();
    entries.push(("INFLATED", "J", Value::Int(i64::MIN)));
    preload_class_statics(BIG_DECIMAL_CLASS, entries);
    Ok(None)
}

// constructors

fn init_with(args: &[Value], who: &str, d: Decimal) -> GFunctionResult {
    let this = object_arg(args, 0, who)?;
    set_big_decimal(&this, &d);
    Ok(None)
}

fn init_with_mc(args: &[Value], who: &str, d: Decimal, ctx_index: usize) -> GFunctionResult {
    let ctx = math_context_arg(args, ctx_index, who)?;
    init_with(args, who, d.round(ctx)?)
}

fn big_decimal_init_double(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(double)";
    let d = Decimal::from_f64_exact(float_arg(args, 1, who)?)?;
    init_with(args, who, d)
}

fn big_decimal_init_double_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(double,MathContext)";
    let d = Decimal::from_f64_exact(float_arg(args, 1, who)?)?;
    init_with_mc(args, who, d, 2)
}

fn big_decimal_init_long(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(long)";
    let d = Decimal::from_i64(int_arg(args, 1, who)?);
    init_with(args, who, d)
}

fn big_decimal_init_long_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(long,MathContext)";
    let d = Decimal::from_i64(int_arg(args, 1, who)?);
    init_with_mc(args, who, d, 2)
}

fn big_decimal_init_string(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(String)";
    let d = Decimal::parse(&string_arg(args, 1, who)?)?;
    init_with(args, who, d)
}

fn big_decimal_init_string_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(String,MathContext)";
    let d = Decimal::parse(&string_arg(args, 1, who)?)?;
    init_with_mc(args, who, d, 2)
}

fn big_decimal_init_big_integer(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(BigInteger)";
    let obj = object_arg(args, 1, who)?;
    let unscaled = big_integer_value(&obj, who)?;
    init_with(args, who, Decimal::new(unscaled, 0))
}

fn big_decimal_init_big_integer_scale(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(BigInteger,int)";
    let obj = object_arg(args, 1, who)?;
    let unscaled = big_integer_value(&obj, who)?;
    let scale = int_arg(args, 2, who)?;
    init_with(args, who, Decimal::with_scale(unscaled, scale)?)
}

fn big_decimal_init_big_integer_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(BigInteger,MathContext)";
    let obj = object_arg(args, 1, who)?;
    let unscaled = big_integer_value(&obj, who)?;
    init_with_mc(args, who, Decimal::new(unscaled, 0), 2)
}

fn big_decimal_init_big_integer_scale_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.<init>(BigInteger,int,MathContext)";
    let obj = object_arg(args, 1, who)?;
    let unscaled = big_integer_value(&obj, who)?;
    let scale = int_arg(args, 2, who)?;
    init_with_mc(args, who, Decimal::with_scale(unscaled, scale)?, 3)
}

// arithmetic

fn big_decimal_abs(args: &[Value]) -> GFunctionResult {
    unary_op(args, "BigDecimal.abs()", |d| Ok(d.abs()))
}

fn big_decimal_abs_mc(args: &[Value]) -> GFunctionResult {
    unary_op_mc(args, "BigDecimal.abs(MathContext)", 1, |d| Ok(d.abs()))
}

fn big_decimal_add(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.add()", |a, b| a.add(b))
}

fn big_decimal_add_mc(args: &[Value]) -> GFunctionResult {
    binary_op_mc(args, "BigDecimal.add(MathContext)", |a, b| a.add(b))
}

fn big_decimal_subtract(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.subtract()", |a, b| a.subtract(b))
}

fn big_decimal_subtract_mc(args: &[Value]) -> GFunctionResult {
    binary_op_mc(args, "BigDecimal.subtract(MathContext)", |a, b| a.subtract(b))
}

fn big_decimal_multiply(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.multiply()", |a, b| a.multiply(b))
}

fn big_decimal_multiply_mc(args: &[Value]) -> GFunctionResult {
    binary_op_mc(args, "BigDecimal.multiply(MathContext)", |a, b| a.multiply(b))
}

fn big_decimal_divide(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.divide()", |a, b| a.divide_exact(b))
}

fn big_decimal_divide_mode(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divide(BigDecimal,RoundingMode)";
    let mode = rounding_mode_arg(args, 2, who)?;
    binary_op(args, who, |a, b| a.divide_to_scale(b, a.scale, mode))
}

fn big_decimal_divide_scale_mode(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divide(BigDecimal,int,RoundingMode)";
    let scale = int_arg(args, 2, who)?;
    let mode = rounding_mode_arg(args, 3, who)?;
    binary_op(args, who, |a, b| a.divide_to_scale(b, scale, mode))
}

fn big_decimal_divide_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divide(BigDecimal,MathContext)";
    let ctx = math_context_arg(args, 2, who)?;
    binary_op(args, who, |a, b| a.divide_with_context(b, ctx))
}

fn pair_result(q: Decimal, r: Decimal) -> GFunctionResult {
    Ok(Some(Value::ObjectRef(make_2_elem_ref_array(
        "[Ljava/math/BigDecimal;",
        Value::ObjectRef(make_big_decimal(&q)),
        Value::ObjectRef(make_big_decimal(&r)),
    ))))
}

fn big_decimal_divide_and_remainder(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divideAndRemainder()";
    let a = this_decimal(args, who)?;
    let b = other_decimal(args, 1, who)?;
    let (q, r) = a.divide_and_remainder(&b)?;
    pair_result(q, r)
}

fn big_decimal_divide_and_remainder_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divideAndRemainder(MathContext)";
    let a = this_decimal(args, who)?;
    let b = other_decimal(args, 1, who)?;
    let ctx = math_context_arg(args, 2, who)?;
    let q = a.divide_to_integral_value_with_context(&b, ctx)?;
    let r = a.subtract(&q.multiply(&b)?)?;
    pair_result(q, r)
}

fn big_decimal_divide_to_integral_value(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.divideToIntegralValue()", |a, b| {
        a.divide_to_integral_value(b)
    })
}

fn big_decimal_divide_to_integral_value_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.divideToIntegralValue(MathContext)";
    let ctx = math_context_arg(args, 2, who)?;
    binary_op(args, who, |a, b| a.divide_to_integral_value_with_context(b, ctx))
}

fn big_decimal_remainder(args: &[Value]) -> GFunctionResult {
    binary_op(args, "BigDecimal.remainder()", |a, b| a.remainder(b))
}

fn big_decimal_remainder_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.remainder(MathContext)";
    let ctx = math_context_arg(args, 2, who)?;
    binary_op(args, who, |a, b| a.remainder_with_context(b, ctx))
}

fn big_decimal_negate(args: &[Value]) -> GFunctionResult {
    unary_op(args, "BigDecimal.negate()", |d| Ok(d.negate()))
}

fn big_decimal_negate_mc(args: &[Value]) -> GFunctionResult {
    unary_op_mc(args, "BigDecimal.negate(MathContext)", 1, |d| Ok(d.negate()))
}

fn big_decimal_plus(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "BigDecimal.plus()")?;
    Ok(Some(Value::ObjectRef(this)))
}

fn big_decimal_plus_mc(args: &[Value]) -> GFunctionResult {
    unary_op_mc(args, "BigDecimal.plus(MathContext)", 1, Ok)
}

fn big_decimal_round(args: &[Value]) -> GFunctionResult {
    unary_op_mc(args, "BigDecimal.round(MathContext)", 1, Ok)
}

fn big_decimal_pow(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.pow(int)";
    let n = int_arg(args, 1, who)?;
    unary_op(args, who, |d| d.pow(n))
}

fn big_decimal_pow_mc(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.pow(int,MathContext)";
    let n = int_arg(args, 1, who)?;
    unary_op_mc(args, who, 2, |d| d.pow(n))
}

/// Computed in double precision, then rounded to the context.
fn big_decimal_sqrt(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.sqrt(MathContext)";
    let d = this_decimal(args, who)?;
    let ctx = math_context_arg(args, 1, who)?;
    match d.signum() {
        -1 => Err(DecimalError::NegativeSquareRoot.into()),
        0 => decimal_result(Decimal::new(BigInt::from(0), d.scale / 2)),
        _ => {
            let root = Decimal::parse(&java_double_to_string(d.to_f64().sqrt()))?;
            debug!("BigDecimal.sqrt({}) via double: {}", d.to_plain_string(), root.to_plain_string());
            decimal_result(root.round(ctx)?)
        }
    }
}

// scale and point movement

fn big_decimal_move_point_left(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.movePointLeft()";
    let n = int_arg(args, 1, who)?;
    unary_op(args, who, |d| d.move_point_left(n))
}

fn big_decimal_move_point_right(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.movePointRight()";
    let n = int_arg(args, 1, who)?;
    unary_op(args, who, |d| d.move_point_right(n))
}

fn big_decimal_scale_by_power_of_ten(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.scaleByPowerOfTen()";
    let n = int_arg(args, 1, who)?;
    unary_op(args, who, |d| d.scale_by_power_of_ten(n))
}

fn big_decimal_set_scale(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.setScale(int)";
    let scale = int_arg(args, 1, who)?;
    unary_op(args, who, |d| d.set_scale(scale, RoundingMode::Unnecessary))
}

fn big_decimal_set_scale_mode(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.setScale(int,RoundingMode)";
    let scale = int_arg(args, 1, who)?;
    let mode = rounding_mode_arg(args, 2, who)?;
    unary_op(args, who, |d| d.set_scale(scale, mode))
}

fn big_decimal_strip_trailing_zeros(args: &[Value]) -> GFunctionResult {
    unary_op(args, "BigDecimal.stripTrailingZeros()", |d| Ok(d.strip_trailing_zeros()))
}

fn big_decimal_ulp(args: &[Value]) -> GFunctionResult {
    unary_op(args, "BigDecimal.ulp()", |d| Ok(d.ulp()))
}

// comparison

fn big_decimal_compare_to(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.compareTo()";
    let a = this_decimal(args, who)?;
    let b = other_decimal(args, 1, who)?;
    let order = match a.compare(&b)? {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    };
    Ok(Some(Value::Int(order)))
}

/// Equal in value and scale: `2.0` is not equal to `2.00`.
fn big_decimal_equals(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.equals()";
    let a = this_decimal(args, who)?;
    let equal = match optional_object_arg(args, 1, who)? {
        Some(other) if other.class_name() == BIG_DECIMAL_CLASS => decimal_value(&other, who)? == a,
        _ => false,
    };
    Ok(Some(Value::bool(equal)))
}

fn pick(args: &[Value], who: &str, keep_this: impl FnOnce(Ordering) -> bool) -> GFunctionResult {
    let this = object_arg(args, 0, who)?;
    let other = object_arg(args, 1, who)?;
    let order = decimal_value(&this, who)?.compare(&decimal_value(&other, who)?)?;
    Ok(Some(Value::ObjectRef(if keep_this(order) { this } else { other })))
}

fn big_decimal_max(args: &[Value]) -> GFunctionResult {
    pick(args, "BigDecimal.max()", |order| order != Ordering::Less)
}

fn big_decimal_min(args: &[Value]) -> GFunctionResult {
    pick(args, "BigDecimal.min()", |order| order != Ordering::Greater)
}

fn big_decimal_hash_code(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.hashCode()")?;
    Ok(Some(Value::Int(java_big_decimal_hash(&d) as i64)))
}

// accessors and conversions

fn big_decimal_precision(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(this_decimal(args, "BigDecimal.precision()")?.precision())))
}

fn big_decimal_scale(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(this_decimal(args, "BigDecimal.scale()")?.scale)))
}

fn big_decimal_signum(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(this_decimal(args, "BigDecimal.signum()")?.signum())))
}

fn big_decimal_unscaled_value(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.unscaledValue()")?;
    Ok(Some(Value::ObjectRef(make_big_integer(d.unscaled))))
}

fn big_decimal_to_big_integer(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.toBigInteger()")?;
    Ok(Some(Value::ObjectRef(make_big_integer(d.to_big_integer()?))))
}

fn big_decimal_to_big_integer_exact(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.toBigIntegerExact()")?;
    Ok(Some(Value::ObjectRef(make_big_integer(d.to_big_integer_exact()?))))
}

fn big_decimal_double_value(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Float(this_decimal(args, "BigDecimal.doubleValue()")?.to_f64())))
}

fn big_decimal_float_value(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.floatValue()")?;
    Ok(Some(Value::Float(d.to_f32() as f64)))
}

fn big_decimal_int_value(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.intValue()")?;
    Ok(Some(Value::Int(d.long_value()? as i32 as i64)))
}

fn big_decimal_long_value(args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(this_decimal(args, "BigDecimal.longValue()")?.long_value()?)))
}

fn exact_value(args: &[Value], who: &str, min: i64, max: i64) -> GFunctionResult {
    Ok(Some(Value::Int(this_decimal(args, who)?.exact_in_range(min, max)?)))
}

fn big_decimal_byte_value_exact(args: &[Value]) -> GFunctionResult {
    exact_value(args, "BigDecimal.byteValueExact()", i8::MIN as i64, i8::MAX as i64)
}

fn big_decimal_short_value_exact(args: &[Value]) -> GFunctionResult {
    exact_value(args, "BigDecimal.shortValueExact()", i16::MIN as i64, i16::MAX as i64)
}

fn big_decimal_int_value_exact(args: &[Value]) -> GFunctionResult {
    exact_value(args, "BigDecimal.intValueExact()", i32::MIN as i64, i32::MAX as i64)
}

fn big_decimal_long_value_exact(args: &[Value]) -> GFunctionResult {
    exact_value(args, "BigDecimal.longValueExact()", i64::MIN, i64::MAX)
}

fn big_decimal_to_string(args: &[Value]) -> GFunctionResult {
    let d = this_decimal(args, "BigDecimal.toString()")?;
    Ok(Some(string_value(&d.to_plain_string())))
}

// statics

fn big_decimal_value_of_double(args: &[Value]) -> GFunctionResult {
    let v = float_arg(args, 0, "BigDecimal.valueOf(double)")?;
    if !v.is_finite() {
        return Err(DecimalError::NumberFormat("Infinite or NaN").into());
    }
    decimal_result(Decimal::parse(&java_double_to_string(v))?)
}

fn big_decimal_value_of_long(args: &[Value]) -> GFunctionResult {
    decimal_result(Decimal::from_i64(int_arg(args, 0, "BigDecimal.valueOf(long)")?))
}

fn big_decimal_value_of_long_scale(args: &[Value]) -> GFunctionResult {
    let who = "BigDecimal.valueOf(long,int)";
    let unscaled = int_arg(args, 0, who)?;
    let scale = int_arg(args, 1, who)?;
    decimal_result(Decimal::with_scale(BigInt::from(unscaled), scale)?)
}

pub fn load_big_decimal() {
    const BD: &str = "Ljava/math/BigDecimal;";
    const MC: &str = "Ljava/math/MathContext;";
    const RM: &str = "Ljava/math/RoundingMode;";
    const BI: &str = "Ljava/math/BigInteger;";
    with_gfunction_table(|t| {
        let c = BIG_DECIMAL_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, big_decimal_clinit);

        let constructors: [(String, usize, fn(&[Value]) -> GFunctionResult); 12] = [
            ("(D)V".to_string(), 1, big_decimal_init_double),
            (format!("(D{})V", MC), 2, big_decimal_init_double_mc),
            ("(I)V".to_string(), 1, big_decimal_init_long),
            (format!("(I{})V", MC), 2, big_decimal_init_long_mc),
            ("(J)V".to_string(), 1, big_decimal_init_long),
            (format!("(J{})V", MC), 2, big_decimal_init_long_mc),
            ("(Ljava/lang/String;)V".to_string(), 1, big_decimal_init_string),
            (format!("(Ljava/lang/String;{})V", MC), 2, big_decimal_init_string_mc),
            (format!("({})V", BI), 1, big_decimal_init_big_integer),
            (format!("({}I)V", BI), 2, big_decimal_init_big_integer_scale),
            (format!("({}{})V", BI, MC), 2, big_decimal_init_big_integer_mc),
            (format!("({}I{})V", BI, MC), 3, big_decimal_init_big_integer_scale_mc),
        ];
        for (desc, slots, body) in constructors {
            t.registry_gfunction(c, "<init>", &desc, slots, body);
        }
        t.registry_gfunction(c, "<init>", "([C)V", 1, trap_function);
        t.registry_gfunction(c, "<init>", "([CII)V", 3, trap_function);
        t.registry_gfunction(c, "<init>", &format!("([C{})V", MC), 2, trap_function);
        t.registry_gfunction(c, "<init>", &format!("([CII{})V", MC), 4, trap_function);

        let unary: [(&str, fn(&[Value]) -> GFunctionResult); 6] = [
            ("abs", big_decimal_abs),
            ("negate", big_decimal_negate),
            ("plus", big_decimal_plus),
            ("stripTrailingZeros", big_decimal_strip_trailing_zeros),
            ("ulp", big_decimal_ulp),
            ("toBigInteger", big_decimal_to_big_integer),
        ];
        for (name, body) in unary {
            let ret = if name == "toBigInteger" { BI } else { BD };
            t.registry_gfunction(c, name, &format!("(){}", ret), 0, body);
        }
        let with_context: [(&str, fn(&[Value]) -> GFunctionResult); 4] = [
            ("abs", big_decimal_abs_mc),
            ("negate", big_decimal_negate_mc),
            ("plus", big_decimal_plus_mc),
            ("round", big_decimal_round),
        ];
        for (name, body) in with_context {
            t.registry_gfunction(c, name, &format!("({}){}", MC, BD), 1, body);
        }
        let binary: [(&str, fn(&[Value]) -> GFunctionResult); 8] = [
            ("add", big_decimal_add),
            ("divide", big_decimal_divide),
            ("divideToIntegralValue", big_decimal_divide_to_integral_value),
            ("max", big_decimal_max),
            ("min", big_decimal_min),
            ("multiply", big_decimal_multiply),
            ("remainder", big_decimal_remainder),
            ("subtract", big_decimal_subtract),
        ];
        for (name, body) in binary {
            t.registry_gfunction(c, name, &format!("({}){}", BD, BD), 1, body);
        }
        let binary_with_context: [(&str, fn(&[Value]) -> GFunctionResult); 6] = [
            ("add", big_decimal_add_mc),
            ("divide", big_decimal_divide_mc),
            ("divideToIntegralValue", big_decimal_divide_to_integral_value_mc),
            ("multiply", big_decimal_multiply_mc),
            ("remainder", big_decimal_remainder_mc),
            ("subtract", big_decimal_subtract_mc),
        ];
        for (name, body) in binary_with_context {
            t.registry_gfunction(c, name, &format!("({}{}){}", BD, MC, BD), 2, body);
        }
        let by_int: [(&str, fn(&[Value]) -> GFunctionResult); 5] = [
            ("movePointLeft", big_decimal_move_point_left),
            ("movePointRight", big_decimal_move_point_right),
            ("pow", big_decimal_pow),
            ("scaleByPowerOfTen", big_decimal_scale_by_power_of_ten),
            ("setScale", big_decimal_set_scale),
        ];
        for (name, body) in by_int {
            t.registry_gfunction(c, name, &format!("(I){}", BD), 1, body);
        }

        t.registry_gfunction(c, "divide", &format!("({}{}){}", BD, RM, BD), 2, big_decimal_divide_mode);
        t.registry_gfunction(
            c,
            "divide",
            &format!("({}I{}){}", BD, RM, BD),
            3,
            big_decimal_divide_scale_mode,
        );
        t.registry_gfunction(c, "divide", &format!("({}I){}", BD, BD), 2, trap_deprecated);
        t.registry_gfunction(c, "divide", &format!("({}II){}", BD, BD), 3, trap_deprecated);
        t.registry_gfunction(
            c,
            "divideAndRemainder",
            &format!("({})[{}", BD, BD),
            1,
            big_decimal_divide_and_remainder,
        );
        t.registry_gfunction(
            c,
            "divideAndRemainder",
            &format!("({}{})[{}", BD, MC, BD),
            2,
            big_decimal_divide_and_remainder_mc,
        );
        t.registry_gfunction(c, "pow", &format!("(I{}){}", MC, BD), 2, big_decimal_pow_mc);
        t.registry_gfunction(c, "setScale", &format!("(I{}){}", RM, BD), 2, big_decimal_set_scale_mode);
        t.registry_gfunction(c, "setScale", &format!("(II){}", BD), 2, trap_deprecated);
        t.registry_gfunction(c, "sqrt", &format!("({}){}", MC, BD), 1, big_decimal_sqrt);

        t.registry_gfunction(c, "byteValueExact", "()B", 0, big_decimal_byte_value_exact);
        t.registry_gfunction(c, "compareTo", &format!("({})I", BD), 1, big_decimal_compare_to);
        t.registry_gfunction(c, "doubleValue", "()D", 0, big_decimal_double_value);
        t.registry_gfunction(c, "equals", "(Ljava/lang/Object;)Z", 1, big_decimal_equals);
        t.registry_gfunction(c, "floatValue", "()F", 0, big_decimal_float_value);
        t.registry_gfunction(c, "hashCode", "()I", 0, big_decimal_hash_code);
        t.registry_gfunction(c, "intValue", "()I", 0, big_decimal_int_value);
        t.registry_gfunction(c, "intValueExact", "()I", 0, big_decimal_int_value_exact);
        t.registry_gfunction(c, "longValue", "()J", 0, big_decimal_long_value);
        t.registry_gfunction(c, "longValueExact", "()J", 0, big_decimal_long_value_exact);
        t.registry_gfunction(c, "precision", "()I", 0, big_decimal_precision);
        t.registry_gfunction(c, "scale", "()I", 0, big_decimal_scale);
        t.registry_gfunction(c, "shortValueExact", "()S", 0, big_decimal_short_value_exact);
        t.registry_gfunction(c, "signum", "()I", 0, big_decimal_signum);
        t.registry_gfunction(
            c,
            "toBigIntegerExact",
            &format!("(){}", BI),
            0,
            big_decimal_to_big_integer_exact,
        );
        for name in ["toEngineeringString", "toPlainString", "toString"] {
            t.registry_gfunction(c, name, "()Ljava/lang/String;", 0, big_decimal_to_string);
        }
        t.registry_gfunction(c, "unscaledValue", &format!("(){}", BI), 0, big_decimal_unscaled_value);
        t.registry_gfunction(c, "valueOf", &format!("(D){}", BD), 1, big_decimal_value_of_double);
        t.registry_gfunction(c, "valueOf", &format!("(J){}", BD), 1, big_decimal_value_of_long);
        t.registry_gfunction(c, "valueOf", &format!("(JI){}", BD), 2, big_decimal_value_of_long_scale);
    });
}
