use crate::utils::init_logger;
use jacobin_core::class_initializer::{clinit_state, ClinitState};
use jacobin_core::java_exception::{ExceptionKind, MethodCallError};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{
    dispatch_gfunction, invoke, with_gfunction_table, GFunctionResult, GMeth,
};
use jacobin_core::object::{make_empty_object_with_class_name, FieldValue};
use jacobin_core::stack_frame::Frame;
use jacobin_core::static_field_area::{add_static, get_static_value, Static};
use std::sync::atomic::{AtomicUsize, Ordering};

static CLINIT_RUNS: AtomicUsize = AtomicUsize::new(0);

fn counter_clinit(_args: &[Value]) -> GFunctionResult {
    CLINIT_RUNS.fetch_add(1, Ordering::SeqCst);
    add_static("t/dispatch/Counter.START", Static::new("J", Value::Int(100)))?;
    Ok(None)
}

fn counter_next(args: &[Value]) -> GFunctionResult {
    let obj = args[0].get_object()?;
    let current = obj.int_field("count").unwrap_or(0);
    let step = args[1].get_int()?;
    obj.set_field("count", "J", FieldValue::Int(current + step));
    Ok(Some(Value::Int(current + step)))
}

fn counter_start(_args: &[Value]) -> GFunctionResult {
    Ok(Some(get_static_value("t/dispatch/Counter", "START")))
}

fn register_counter() {
    with_gfunction_table(|table| {
        table.registry_gfunction("t/dispatch/Counter", "<clinit>", "()V", 0, counter_clinit);
        table.registry_gfunction("t/dispatch/Counter", "next", "(J)J", 1, counter_next);
        table.registry_gfunction("t/dispatch/Counter", "start", "()J", 0, counter_start);
    });
}

#[test]
fn test_dispatch_runs_clinit_first() {
    init_logger();
    register_counter();
    let mut frame = Frame::for_method(1, "t/Main", "main", "()V", 4, 0);
    dispatch_gfunction(&mut frame, "t/dispatch/Counter.start()J", false).unwrap();
    assert_eq!(frame.pop().unwrap(), Value::Int(100));
    assert_eq!(clinit_state("t/dispatch/Counter"), ClinitState::Done);

    let receiver = make_empty_object_with_class_name("t/dispatch/Counter");
    for _ in 0..3 {
        frame.push(Value::ObjectRef(receiver.clone())).unwrap();
        frame.push(Value::Int(5)).unwrap();
        dispatch_gfunction(&mut frame, "t/dispatch/Counter.next(J)J", true).unwrap();
    }
    assert_eq!(frame.pop().unwrap(), Value::Int(15));
    assert_eq!(frame.op_stack.tos(), -1);
    assert_eq!(CLINIT_RUNS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_invoke_composes() {
    register_counter();
    let receiver = make_empty_object_with_class_name("t/dispatch/Counter");
    let result = invoke(
        "t/dispatch/Counter.next(J)J",
        &[Value::ObjectRef(receiver), Value::Int(2)],
    )
    .unwrap();
    assert_eq!(result, Some(Value::Int(2)));
}

fn locked_increment(args: &[Value]) -> GFunctionResult {
    let obj = args[0].get_object()?;
    let current = obj.int_field("n").unwrap_or(0);
    std::thread::yield_now();
    obj.set_field("n", "I", FieldValue::Int(current + 1));
    Ok(None)
}

#[test]
fn test_synchronized_gfunction() {
    with_gfunction_table(|table| {
        table
            .register(
                "t/dispatch/Locked.bump()V",
                GMeth::new(0, locked_increment).synchronized(),
            )
            .unwrap();
    });
    let obj = make_empty_object_with_class_name("t/dispatch/Locked");
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let obj = obj.clone();
            std::thread::spawn(move || {
                for _ in 0..50 {
                    invoke("t/dispatch/Locked.bump()V", &[Value::ObjectRef(obj.clone())]).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(obj.int_field("n"), Some(400));

    let err = invoke("t/dispatch/Locked.bump()V", &[]).unwrap_err();
    assert_eq!(err.kind, ExceptionKind::IllegalArgumentException);
}

#[test]
fn test_missing_arguments_is_internal_error() {
    register_counter();
    let mut frame = Frame::for_method(1, "t/Main", "main", "()V", 4, 0);
    let err = dispatch_gfunction(&mut frame, "t/dispatch/Counter.next(J)J", true).unwrap_err();
    assert!(matches!(err, MethodCallError::InternalError(_)));
}
