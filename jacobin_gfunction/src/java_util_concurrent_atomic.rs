use crate::gfunction_helpers::{int_arg, object_arg, string_value};
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{clinit_generic, with_gfunction_table, GFunctionResult};
use jacobin_core::object::{FieldValue, Object};
use parking_lot::Mutex;

pub const ATOMIC_INTEGER_CLASS: &str = "java/util/concurrent/atomic/AtomicInteger";
pub const ATOMIC_LONG_CLASS: &str = "java/util/concurrent/atomic/AtomicLong";

/// Serialises every read-modify-write on atomic objects.
static ATOMIC_LOCK: Mutex<()> = Mutex::new(());

/// AtomicInteger arithmetic wraps at 32 bits, AtomicLong at 64.
fn wrap(obj: &Object, v: i64) -> i64 {
    if obj.class_name() == ATOMIC_INTEGER_CLASS {
        v as i32 as i64
    } else {
        v
    }
}

fn ftype(obj: &Object) -> &'static str {
    if obj.class_name() == ATOMIC_INTEGER_CLASS {
        "I"
    } else {
        "J"
    }
}

fn load(obj: &Object) -> i64 {
    obj.int_field("value").unwrap_or(0)
}

fn store(obj: &Object, v: i64) {
    obj.set_field("value", ftype(obj), FieldValue::Int(wrap(obj, v)));
}

/// Applies `op` under the lock; returns `(old, new)`.
fn update(args: &[Value], who: &str, op: impl FnOnce(i64) -> i64) -> Result<(i64, i64), ErrorBlock> {
    let this = object_arg(args, 0, who)?;
    let _guard = ATOMIC_LOCK.lock();
    let old = load(&this);
    let new = wrap(&this, op(old));
    store(&this, new);
    Ok((old, new))
}

fn atomic_init(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.<init>()";
    let this = object_arg(args, 0, who)?;
    store(&this, 0);
    Ok(None)
}

fn atomic_init_value(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.<init>(value)";
    let this = object_arg(args, 0, who)?;
    let initial = int_arg(args, 1, who)?;
    store(&this, initial);
    Ok(None)
}

fn atomic_get(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "Atomic.get()")?;
    let _guard = ATOMIC_LOCK.lock();
    Ok(Some(Value::Int(load(&this))))
}

fn atomic_double_value(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "Atomic.doubleValue()")?;
    let _guard = ATOMIC_LOCK.lock();
    Ok(Some(Value::Float(load(&this) as f64)))
}

fn atomic_int_value(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "Atomic.intValue()")?;
    let _guard = ATOMIC_LOCK.lock();
    Ok(Some(Value::Int(load(&this) as i32 as i64)))
}

fn atomic_to_string(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "Atomic.toString()")?;
    let _guard = ATOMIC_LOCK.lock();
    Ok(Some(string_value(&load(&this).to_string())))
}

fn atomic_set(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.set";
    let v = int_arg(args, 1, who)?;
    update(args, who, |_| v)?;
    Ok(None)
}

fn atomic_get_and_set(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.getAndSet";
    let v = int_arg(args, 1, who)?;
    let (old, _) = update(args, who, |_| v)?;
    Ok(Some(Value::Int(old)))
}

/// Stores `update` only when the current value equals `expect`.
fn atomic_compare_and_set(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.compareAndSet";
    let this = object_arg(args, 0, who)?;
    let expect = int_arg(args, 1, who)?;
    let new = int_arg(args, 2, who)?;
    let _guard = ATOMIC_LOCK.lock();
    if load(&this) == wrap(&this, expect) {
        store(&this, new);
        Ok(Some(Value::bool(true)))
    } else {
        Ok(Some(Value::bool(false)))
    }
}

fn atomic_get_and_add(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.getAndAdd";
    let delta = int_arg(args, 1, who)?;
    let (old, _) = update(args, who, |v| v.wrapping_add(delta))?;
    Ok(Some(Value::Int(old)))
}

fn atomic_add_and_get(args: &[Value]) -> GFunctionResult {
    let who = "Atomic.addAndGet";
    let delta = int_arg(args, 1, who)?;
    let (_, new) = update(args, who, |v| v.wrapping_add(delta))?;
    Ok(Some(Value::Int(new)))
}

fn atomic_get_and_increment(args: &[Value]) -> GFunctionResult {
    let (old, _) = update(args, "Atomic.getAndIncrement()", |v| v.wrapping_add(1))?;
    Ok(Some(Value::Int(old)))
}

fn atomic_get_and_decrement(args: &[Value]) -> GFunctionResult {
    let (old, _) = update(args, "Atomic.getAndDecrement()", |v| v.wrapping_sub(1))?;
    Ok(Some(Value::Int(old)))
}

fn atomic_increment_and_get(args: &[Value]) -> GFunctionResult {
    let (_, new) = update(args, "Atomic.incrementAndGet()", |v| v.wrapping_add(1))?;
    Ok(Some(Value::Int(new)))
}

fn atomic_decrement_and_get(args: &[Value]) -> GFunctionResult {
    let (_, new) = update(args, "Atomic.decrementAndGet()", |v| v.wrapping_sub(1))?;
    Ok(Some(Value::Int(new)))
}

fn register_atomic(class_name: &str, t: char) {
    let unary = format!("(){}", t);
    let setter = format!("({})V", t);
    let exchange = format!("({}){}", t, t);
    let cas = format!("({}{})Z", t, t);
    with_gfunction_table(|table| {
        let c = class_name;
        table.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        table.registry_gfunction(c, "<init>", "()V", 0, atomic_init);
        table.registry_gfunction(c, "<init>", &setter, 1, atomic_init_value);
        table.registry_gfunction(c, "addAndGet", &exchange, 1, atomic_add_and_get);
        table.registry_gfunction(c, "compareAndSet", &cas, 2, atomic_compare_and_set);
        table.registry_gfunction(c, "decrementAndGet", &unary, 0, atomic_decrement_and_get);
        table.registry_gfunction(c, "doubleValue", "()D", 0, atomic_double_value);
        table.registry_gfunction(c, "get", &unary, 0, atomic_get);
        table.registry_gfunction(c, "getAndAdd", &exchange, 1, atomic_get_and_add);
        table.registry_gfunction(c, "getAndDecrement", &unary, 0, atomic_get_and_decrement);
        table.registry_gfunction(c, "getAndIncrement", &unary, 0, atomic_get_and_increment);
        table.registry_gfunction(c, "getAndSet", &exchange, 1, atomic_get_and_set);
        table.registry_gfunction(c, "incrementAndGet", &unary, 0, atomic_increment_and_get);
        table.registry_gfunction(c, "intValue", "()I", 0, atomic_int_value);
        table.registry_gfunction(c, "lazySet", &setter, 1, atomic_set);
        table.registry_gfunction(c, "longValue", "()J", 0, atomic_get);
        table.registry_gfunction(c, "set", &setter, 1, atomic_set);
        table.registry_gfunction(c, "toString", "()Ljava/lang/String;", 0, atomic_to_string);
    });
}

pub fn load_atomics() {
    register_atomic(ATOMIC_INTEGER_CLASS, 'I');
    register_atomic(ATOMIC_LONG_CLASS, 'J');
}
