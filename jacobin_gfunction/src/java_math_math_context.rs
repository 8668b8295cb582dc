use crate::decimal_arith::{DecimalContext, RoundingMode};
use crate::gfunction_helpers::{illegal_argument, int_arg, null_pointer, object_arg, optional_object_arg, string_value};
use crate::java_math_rounding_mode::{
    rounding_mode_arg, rounding_mode_object, rounding_mode_of, ROUNDING_MODE_CLASS,
    ROUNDING_MODE_DESCRIPTOR,
};
use jacobin_core::class_initializer::ensure_initialized;
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::{ObjectRef, Value};
use jacobin_core::native_method_area::{with_gfunction_table, GFunctionResult};
use jacobin_core::object::{
    clear_field_table, make_empty_object_with_class_name, string_from_string_object, FieldValue,
    Object,
};
use jacobin_core::static_field_area::preload_class_statics;

pub const MATH_CONTEXT_CLASS: &str = "java/math/MathContext";
const MATH_CONTEXT_DESCRIPTOR: &str = "Ljava/math/MathContext;";

fn populate(obj: &Object, ctx: DecimalContext) -> Result<(), ErrorBlock> {
    let mode = rounding_mode_object(ctx.rounding)?;
    clear_field_table(obj);
    obj.set_field("precision", "I", FieldValue::Int(ctx.precision));
    obj.set_field("roundingMode", ROUNDING_MODE_DESCRIPTOR, FieldValue::Ref(mode));
    Ok(())
}

pub fn make_math_context(ctx: DecimalContext) -> Result<ObjectRef, ErrorBlock> {
    let obj = make_empty_object_with_class_name(MATH_CONTEXT_CLASS);
    populate(&obj, ctx)?;
    Ok(obj)
}

pub fn decimal_context_of(obj: &Object) -> Result<DecimalContext, ErrorBlock> {
    let precision = obj
        .int_field("precision")
        .ok_or_else(|| illegal_argument("MathContext", "missing precision"))?;
    let mode = obj
        .ref_field("roundingMode")
        .ok_or_else(|| illegal_argument("MathContext", "missing roundingMode"))?;
    Ok(DecimalContext::new(precision, rounding_mode_of(&mode)?))
}

/// A required MathContext argument; null is a `NullPointerException`.
pub fn math_context_arg(args: &[Value], index: usize, who: &str) -> Result<DecimalContext, ErrorBlock> {
    match optional_object_arg(args, index, who)? {
        Some(obj) => decimal_context_of(&obj),
        None => Err(null_pointer(who, "MathContext is null")),
    }
}

/// `precision=N roundingMode=NAME`; keys are case-insensitive and commas separate like spaces.
pub fn parse_math_context(text: &str) -> Result<DecimalContext, ErrorBlock> {
    let who = "MathContext.<init>(String)";
    let text = text.trim();
    if text.is_empty() {
        return Err(illegal_argument(who, "empty string"));
    }
    let normalized = text.replace(',', " ");
    let mut precision = None;
    let mut rounding = RoundingMode::HalfUp;
    for (key, value) in normalized.split_whitespace().filter_map(|p| p.split_once('=')) {
        match key.trim().to_lowercase().as_str() {
            "precision" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(illegal_argument(who, "missing precision value"));
                }
                let p = value
                    .parse::<i64>()
                    .map_err(|_| illegal_argument(who, "invalid precision"))?;
                if p < 0 {
                    return Err(illegal_argument(who, "negative precision"));
                }
                precision = Some(p);
            }
            "roundingmode" => {
                rounding = RoundingMode::from_name(value.trim()).ok_or_else(|| {
                    illegal_argument(who, &format!("No enum constant java.math.RoundingMode.{}", value))
                })?;
            }
            _ => {}
        }
    }
    let precision = precision.ok_or_else(|| illegal_argument(who, "precision not specified"))?;
    Ok(DecimalContext::new(precision, rounding))
}

fn math_context_clinit(_args: &[Value]) -> GFunctionResult {
    ensure_initialized(ROUNDING_MODE_CLASS)?;
    let presets = [
        ("DECIMAL32", DecimalContext::new(7, RoundingMode::HalfEven)),
        ("DECIMAL64", DecimalContext::new(16, RoundingMode::HalfEven)),
        ("DECIMAL128", DecimalContext::new(34, RoundingMode::HalfEven)),
        ("UNLIMITED", DecimalContext::UNLIMITED),
    ];
    let mut entries = Vec::with_capacity(presets.len());
    for (name, ctx) in presets {
        entries.push((name, MATH_CONTEXT_DESCRIPTOR, Value::ObjectRef(make_math_context(ctx)?)));
    }
    preload_class_statics(MATH_CONTEXT_CLASS, entries);
    Ok(None)
}

fn checked_precision(args: &[Value], who: &str) -> Result<i64, ErrorBlock> {
    let precision = int_arg(args, 1, who)?;
    if precision < 0 {
        return Err(illegal_argument(who, "negative precision"));
    }
    Ok(precision)
}

fn math_context_init_int(args: &[Value]) -> GFunctionResult {
    let who = "MathContext.<init>(int)";
    let this = object_arg(args, 0, who)?;
    let precision = checked_precision(args, who)?;
    populate(&this, DecimalContext::new(precision, RoundingMode::HalfUp))?;
    Ok(None)
}

fn math_context_init_int_mode(args: &[Value]) -> GFunctionResult {
    let who = "MathContext.<init>(int,RoundingMode)";
    let this = object_arg(args, 0, who)?;
    let precision = checked_precision(args, who)?;
    let mode = rounding_mode_arg(args, 2, who)?;
    populate(&this, DecimalContext::new(precision, mode))?;
    Ok(None)
}

fn math_context_init_string(args: &[Value]) -> GFunctionResult {
    let who = "MathContext.<init>(String)";
    let this = object_arg(args, 0, who)?;
    let text = match optional_object_arg(args, 1, who)? {
        Some(obj) => string_from_string_object(&obj)
            .ok_or_else(|| illegal_argument(who, "argument is not a String"))?,
        None => return Err(null_pointer(who, "null")),
    };
    populate(&this, parse_math_context(&text)?)?;
    Ok(None)
}

fn this_context(args: &[Value], who: &str) -> Result<(ObjectRef, DecimalContext), ErrorBlock> {
    let this = object_arg(args, 0, who)?;
    let ctx = decimal_context_of(&this)?;
    Ok((this, ctx))
}

fn math_context_get_precision(args: &[Value]) -> GFunctionResult {
    let (_, ctx) = this_context(args, "MathContext.getPrecision()")?;
    Ok(Some(Value::Int(ctx.precision)))
}

fn math_context_get_rounding_mode(args: &[Value]) -> GFunctionResult {
    let (_, ctx) = this_context(args, "MathContext.getRoundingMode()")?;
    Ok(Some(Value::ObjectRef(rounding_mode_object(ctx.rounding)?)))
}

fn math_context_equals(args: &[Value]) -> GFunctionResult {
    let who = "MathContext.equals()";
    let (_, ctx) = this_context(args, who)?;
    let equal = match optional_object_arg(args, 1, who)? {
        Some(other) if other.class_name() == MATH_CONTEXT_CLASS => {
            decimal_context_of(&other).is_ok_and(|o| o == ctx)
        }
        _ => false,
    };
    Ok(Some(Value::bool(equal)))
}

/// `roundingMode.hashCode() + (precision << 2)`.
fn math_context_hash_code(args: &[Value]) -> GFunctionResult {
    let (_, ctx) = this_context(args, "MathContext.hashCode()")?;
    let mode_hash = rounding_mode_object(ctx.rounding)?.hash_code() as i32;
    let hash = mode_hash.wrapping_add((ctx.precision as i32).wrapping_shl(2));
    Ok(Some(Value::Int(hash as i64)))
}

fn math_context_to_string(args: &[Value]) -> GFunctionResult {
    let (_, ctx) = this_context(args, "MathContext.toString()")?;
    Ok(Some(string_value(&format!(
        "precision={} roundingMode={}",
        ctx.precision,
        ctx.rounding.name()
    ))))
}

pub fn load_math_context() {
    with_gfunction_table(|t| {
        let c = MATH_CONTEXT_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, math_context_clinit);
        t.registry_gfunction(c, "<init>", "(I)V", 1, math_context_init_int);
        t.registry_gfunction(c, "<init>", "(ILjava/math/RoundingMode;)V", 2, math_context_init_int_mode);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, math_context_init_string);
        t.registry_gfunction(c, "getPrecision", "()I", 0, math_context_get_precision);
        t.registry_gfunction(
            c,
            "getRoundingMode",
            "()Ljava/math/RoundingMode;",
            0,
            math_context_get_rounding_mode,
        );
        t.registry_gfunction(c, "equals", "(Ljava/lang/Object;)Z", 1, math_context_equals);
        t.registry_gfunction(c, "hashCode", "()I", 0, math_context_hash_code);
        t.registry_gfunction(c, "toString", "()Ljava/lang/String;", 0, math_context_to_string);
    });
}
