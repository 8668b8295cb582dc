use crate::utils::init_logger;
use jacobin_core::class_initializer::{clinit_state, ensure_initialized, ClinitState};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{dispatch_gfunction, invoke};
use jacobin_core::stack_frame::Frame;
use jacobin_core::thread_table::MAIN_THREAD_ID;
use jacobin_core::static_field_area::get_static_value;
use std::sync::{Arc, Barrier};
use std::thread;

const CLASS: &str = "java/math/BigInteger";

fn constants() -> Vec<Value> {
    ["ZERO", "ONE", "TWO", "TEN"]
        .iter()
        .map(|name| get_static_value(CLASS, name))
        .collect()
}

#[test]
fn test_two_threads_see_one_initialisation() {
    init_logger();
    let start = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|i| {
            let start = start.clone();
            thread::spawn(move || {
                start.wait();
                invoke("java/math/BigInteger.valueOf(J)Ljava/math/BigInteger;", &[Value::Int(i)]).unwrap();
                constants()
            })
        })
        .collect();
    let seen: Vec<Vec<Value>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(clinit_state(CLASS), ClinitState::Done);
    for values in &seen {
        assert!(values.iter().all(|v| matches!(v, Value::ObjectRef(_))));
    }
    // A second <clinit> run would have replaced the constants with new objects.
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0], constants());
}

#[test]
fn test_explicit_clinit_call_keeps_statics() {
    init_logger();
    ensure_initialized(CLASS).unwrap();
    let before = constants();
    assert_eq!(invoke("java/math/BigInteger.<clinit>()V", &[]).unwrap(), None);
    let mut frame = Frame::for_method(MAIN_THREAD_ID, "main", "main", "([Ljava/lang/String;)V", 2, 1);
    dispatch_gfunction(&mut frame, "java/math/BigInteger.<clinit>()V", false).unwrap();
    assert_eq!(frame.op_stack.tos(), -1);
    assert_eq!(before, constants());
    assert_eq!(clinit_state(CLASS), ClinitState::Done);
}
