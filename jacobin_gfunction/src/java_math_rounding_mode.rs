use crate::decimal_arith::RoundingMode;
use crate::gfunction_helpers::{
    illegal_argument, int_arg, null_pointer, object_arg, optional_object_arg, string_value,
};
use jacobin_core::class_initializer::ensure_initialized;
use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::{ObjectRef, Value};
use jacobin_core::native_method_area::{with_gfunction_table, GFunctionResult};
use jacobin_core::object::{
    make_empty_object_with_class_name, make_ref_array, string_from_string_object,
    string_object_from_str, FieldValue, Object, STRING_DESCRIPTOR,
};
use jacobin_core::static_field_area::{get_static_value, preload_class_statics};
use std::sync::Arc;

pub const ROUNDING_MODE_CLASS: &str = "java/math/RoundingMode";
pub const ROUNDING_MODE_DESCRIPTOR: &str = "Ljava/math/RoundingMode;";

/// The canonical singleton for `mode`, initialising the class on first use.
pub fn rounding_mode_object(mode: RoundingMode) -> Result<ObjectRef, ErrorBlock> {
    ensure_initialized(ROUNDING_MODE_CLASS)?;
    match get_static_value(ROUNDING_MODE_CLASS, mode.name()) {
        Value::ObjectRef(obj) => Ok(obj),
        _ => Err(get_error_block(
            ExceptionKind::InternalError,
            format!("RoundingMode.{} is not published", mode.name()),
        )),
    }
}

/// Reads the mode back from a RoundingMode object through its ordinal.
pub fn rounding_mode_of(obj: &Object) -> Result<RoundingMode, ErrorBlock> {
    obj.int_field("ordinal")
        .and_then(RoundingMode::from_ordinal)
        .ok_or_else(|| illegal_argument("RoundingMode", "invalid rounding mode object"))
}

/// A required RoundingMode argument; null is a `NullPointerException`.
pub fn rounding_mode_arg(args: &[Value], index: usize, who: &str) -> Result<RoundingMode, ErrorBlock> {
    match optional_object_arg(args, index, who)? {
        Some(obj) => rounding_mode_of(&obj),
        None => Err(null_pointer(who, "RoundingMode is null")),
    }
}

fn make_rounding_mode(mode: RoundingMode) -> ObjectRef {
    let obj = make_empty_object_with_class_name(ROUNDING_MODE_CLASS);
    obj.set_field(
        "name",
        STRING_DESCRIPTOR,
        FieldValue::Ref(string_object_from_str(mode.name())),
    );
    obj.set_field("ordinal", "I", FieldValue::Int(mode.ordinal()));
    obj
}

fn rounding_mode_clinit(_args: &[Value]) -> GFunctionResult {
    let entries = RoundingMode::ALL
        .iter()
        .map(|mode| {
            (
                mode.name(),
                ROUNDING_MODE_DESCRIPTOR,
                Value::ObjectRef(make_rounding_mode(*mode)),
            )
        })
        .collect();
    preload_class_statics(ROUNDING_MODE_CLASS, entries);
    Ok(None)
}

fn rounding_mode_value_of_int(args: &[Value]) -> GFunctionResult {
    let who = "RoundingMode.valueOf(int)";
    let mode = RoundingMode::from_ordinal(int_arg(args, 0, who)?)
        .ok_or_else(|| illegal_argument(who, "invalid rounding mode"))?;
    Ok(Some(Value::ObjectRef(rounding_mode_object(mode)?)))
}

fn rounding_mode_value_of_string(args: &[Value]) -> GFunctionResult {
    let who = "RoundingMode.valueOf(String)";
    let name_obj = match optional_object_arg(args, 0, who)? {
        Some(obj) => obj,
        None => return Err(null_pointer(who, "name is null")),
    };
    let name = string_from_string_object(&name_obj)
        .ok_or_else(|| illegal_argument(who, "argument is not a String"))?;
    let mode = RoundingMode::from_name(&name).ok_or_else(|| {
        illegal_argument(who, &format!("No enum constant java.math.RoundingMode.{}", name))
    })?;
    Ok(Some(Value::ObjectRef(rounding_mode_object(mode)?)))
}

fn rounding_mode_values(_args: &[Value]) -> GFunctionResult {
    let items = RoundingMode::ALL
        .iter()
        .map(|mode| rounding_mode_object(*mode).map(Value::ObjectRef))
        .collect::<Result<Vec<Value>, ErrorBlock>>()?;
    Ok(Some(Value::ObjectRef(make_ref_array(
        "[Ljava/math/RoundingMode;",
        items,
    ))))
}

fn rounding_mode_name(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "RoundingMode.name()")?;
    let mode = rounding_mode_of(&this)?;
    Ok(Some(string_value(mode.name())))
}

fn rounding_mode_ordinal(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "RoundingMode.ordinal()")?;
    Ok(Some(Value::Int(rounding_mode_of(&this)?.ordinal())))
}

fn rounding_mode_equals(args: &[Value]) -> GFunctionResult {
    let who = "RoundingMode.equals()";
    let this = object_arg(args, 0, who)?;
    let same = optional_object_arg(args, 1, who)?.is_some_and(|other| Arc::ptr_eq(&this, &other));
    Ok(Some(Value::bool(same)))
}

fn rounding_mode_hash_code(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "RoundingMode.hashCode()")?;
    Ok(Some(Value::Int(this.hash_code() as i64)))
}

pub fn load_rounding_mode() {
    with_gfunction_table(|t| {
        let c = ROUNDING_MODE_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, rounding_mode_clinit);
        t.registry_gfunction(c, "valueOf", "(I)Ljava/math/RoundingMode;", 1, rounding_mode_value_of_int);
        t.registry_gfunction(
            c,
            "valueOf",
            "(Ljava/lang/String;)Ljava/math/RoundingMode;",
            1,
            rounding_mode_value_of_string,
        );
        t.registry_gfunction(c, "values", "()[Ljava/math/RoundingMode;", 0, rounding_mode_values);
        t.registry_gfunction(c, "name", "()Ljava/lang/String;", 0, rounding_mode_name);
        t.registry_gfunction(c, "ordinal", "()I", 0, rounding_mode_ordinal);
        t.registry_gfunction(c, "toString", "()Ljava/lang/String;", 0, rounding_mode_name);
        t.registry_gfunction(c, "equals", "(Ljava/lang/Object;)Z", 1, rounding_mode_equals);
        t.registry_gfunction(c, "hashCode", "()I", 0, rounding_mode_hash_code);
    });
}

#[cfg(test)]
mod tests {
    use crate::decimal_arith::RoundingMode;
    use crate::gfunction_helpers::string_value;
    use crate::java_math_rounding_mode::{rounding_mode_object, ROUNDING_MODE_CLASS};
    use crate::load_gfunctions;
    use jacobin_core::class_initializer::get_static_initialized;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{string_from_string_object, FieldValue};

    #[test]
    fn test_value_of_is_the_static_singleton() {
        load_gfunctions();
        let by_int = invoke("java/math/RoundingMode.valueOf(I)Ljava/math/RoundingMode;", &[Value::Int(4)])
            .unwrap()
            .unwrap();
        let by_name = invoke(
            "java/math/RoundingMode.valueOf(Ljava/lang/String;)Ljava/math/RoundingMode;",
            &[string_value("HALF_UP")],
        )
        .unwrap()
        .unwrap();
        let published = get_static_initialized(ROUNDING_MODE_CLASS, "HALF_UP").unwrap();
        assert_eq!(by_int, published);
        assert_eq!(by_name, published);
    }

    #[test]
    fn test_value_of_errors() {
        load_gfunctions();
        let err = invoke(
            "java/math/RoundingMode.valueOf(Ljava/lang/String;)Ljava/math/RoundingMode;",
            &[string_value("ROUND_UP")],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IllegalArgumentException);
        let err = invoke(
            "java/math/RoundingMode.valueOf(Ljava/lang/String;)Ljava/math/RoundingMode;",
            &[Value::Null],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::NullPointerException);
        let err = invoke("java/math/RoundingMode.valueOf(I)Ljava/math/RoundingMode;", &[Value::Int(8)])
            .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IllegalArgumentException);
    }

    #[test]
    fn test_values_and_name() {
        load_gfunctions();
        let values = invoke("java/math/RoundingMode.values()[Ljava/math/RoundingMode;", &[])
            .unwrap()
            .unwrap();
        let items = match values.get_object().unwrap().get_field_value("value") {
            Some(FieldValue::Refs(items)) => items,
            other => panic!("unexpected {:?}", other),
        };
        assert_eq!(items.len(), 8);
        let name = invoke("java/math/RoundingMode.name()Ljava/lang/String;", &[items[6].clone()])
            .unwrap()
            .unwrap();
        assert_eq!(
            string_from_string_object(&name.get_object().unwrap()).unwrap(),
            "HALF_EVEN"
        );
        let ordinal = invoke("java/math/RoundingMode.ordinal()I", &[items[7].clone()])
            .unwrap()
            .unwrap();
        assert_eq!(ordinal, Value::Int(7));
        let floor = Value::ObjectRef(rounding_mode_object(RoundingMode::Floor).unwrap());
        let equals = invoke(
            "java/math/RoundingMode.equals(Ljava/lang/Object;)Z",
            &[items[3].clone(), floor],
        )
        .unwrap()
        .unwrap();
        assert_eq!(equals, Value::Int(1));
    }
}
