use crate::utils::init_logger;
use jacobin_core::jvm_error::VmError;
use jacobin_core::jvm_values::Value;
use jacobin_core::stack::FrameStack;
use jacobin_core::stack_frame::{Frame, FrameKind};
use jacobin_core::string_pool::{get_string_index, get_string_pointer, get_string_pool_size};

#[test]
fn test_frame_stack_depth_law() {
    init_logger();
    let mut stack = FrameStack::new();
    for n in 0..10usize {
        for k in 0..=n {
            for i in 0..n {
                stack.push_frame(Frame::for_method(1, "t/F", &format!("m{}", i), "()V", 2, 1));
            }
            for _ in 0..k {
                stack.pop_frame().unwrap();
            }
            assert_eq!(stack.depth(), n - k);
            while !stack.is_empty() {
                stack.pop_frame().unwrap();
            }
        }
    }
    assert!(matches!(stack.pop_frame(), Err(VmError::PopFromEmptyStack)));
}

#[test]
fn test_operand_stack_pointer_bounds() {
    let mut frame = Frame::for_method(1, "t/F", "m", "()V", 3, 0).with_kind(FrameKind::G);
    assert_eq!(frame.op_stack.tos(), -1);
    for i in 0..3 {
        frame.push(Value::Int(i)).unwrap();
        assert!(frame.op_stack.tos() <= frame.op_stack.capacity() as isize - 1);
    }
    assert_eq!(frame.push(Value::Null), Err(VmError::StackOverFlow));
    assert_eq!(frame.op_stack.tos(), 2);
}

#[test]
fn test_string_pool_bijection() {
    let names = ["t/pool/One", "t/pool/Two", "", "java/lang/Object", "t/pool/One"];
    for name in names {
        let index = get_string_index(name);
        assert_eq!(get_string_pointer(index).unwrap().as_ref(), name);
    }
    for i in 0..get_string_pool_size() as u32 {
        let s = get_string_pointer(i).unwrap();
        assert_eq!(get_string_index(&s), i);
    }
    assert_eq!(get_string_index("java/lang/Thread"), 3);
}
