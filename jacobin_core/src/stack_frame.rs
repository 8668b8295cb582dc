use crate::jvm_error::{VmError, VmExecResult};
use crate::jvm_values::{ObjectRef, Value};
use crate::operand_stack::OperandStack;
use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// What kind of code a frame is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Java bytecode
    J,
    /// gfunction
    G,
    /// JNI, reserved
    N,
}

/// Handle to the owning class's constant pool; opaque to the core.
pub type ConstantPoolHandle = Arc<dyn Any + Send + Sync>;

macro_rules! generate_get_local {
    ($name:ident, $getter:ident, $type:ty) => {
        pub fn $name(&self, index: usize) -> VmExecResult<$type> {
            self.get_local(index)?.$getter()
        }
    };
}

macro_rules! generate_pop {
    ($name:ident, $getter:ident, $type:ty) => {
        pub fn $name(&mut self) -> VmExecResult<$type> {
            self.op_stack.pop()?.$getter()
        }
    };
}

/// 一次方法调用的活动记录
pub struct Frame {
    pub thread: u64,
    pub class_name: String,
    pub method_name: String,
    pub signature: String,
    pub code: Arc<[u8]>,
    pub constant_pool: Option<ConstantPoolHandle>,
    pub locals: Vec<Value>,
    pub op_stack: OperandStack,
    pub pc: usize,
    /// Set on throw, `-1` otherwise.
    pub exc_pc: isize,
    pub kind: FrameKind,
    pub wide: bool,
}

impl Debug for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("thread", &self.thread)
            .field("method", &self.qualified_name())
            .field("kind", &self.kind)
            .field("pc", &self.pc)
            .field("tos", &self.op_stack.tos())
            .finish()
    }
}

impl Frame {
    /// `CreateFrame`: empty operand stack of `max_stack` slots, `pc = 0`, no pending exception.
    pub fn new(max_stack: usize) -> Frame {
        Frame {
            thread: 0,
            class_name: String::new(),
            method_name: String::new(),
            signature: String::new(),
            code: Arc::from(Vec::new()),
            constant_pool: None,
            locals: Vec::new(),
            op_stack: OperandStack::new(max_stack),
            pc: 0,
            exc_pc: -1,
            kind: FrameKind::J,
            wide: false,
        }
    }

    pub fn for_method(
        thread: u64,
        class_name: &str,
        method_name: &str,
        signature: &str,
        max_stack: usize,
        max_locals: usize,
    ) -> Frame {
        let mut frame = Frame::new(max_stack);
        frame.thread = thread;
        frame.class_name = class_name.to_string();
        frame.method_name = method_name.to_string();
        frame.signature = signature.to_string();
        frame.locals = vec![Value::Null; max_locals];
        frame
    }

    pub fn with_kind(mut self, kind: FrameKind) -> Frame {
        self.kind = kind;
        self
    }

    pub fn with_code(mut self, code: Arc<[u8]>, constant_pool: Option<ConstantPoolHandle>) -> Frame {
        self.code = code;
        self.constant_pool = constant_pool;
        self
    }

    /// `class.method`, as shown in exception messages.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.method_name)
    }

    pub fn get_local(&self, index: usize) -> VmExecResult<&Value> {
        self.locals.get(index).ok_or(VmError::IndexOutOfBounds)
    }

    pub fn set_local(&mut self, index: usize, value: Value) -> VmExecResult<()> {
        let slot = self.locals.get_mut(index).ok_or(VmError::IndexOutOfBounds)?;
        *slot = value;
        Ok(())
    }

    generate_get_local!(get_local_int, get_int, i64);
    generate_get_local!(get_local_float, get_float, f64);
    generate_get_local!(get_local_object, get_object, ObjectRef);

    pub fn push(&mut self, value: Value) -> VmExecResult<()> {
        self.op_stack.push(value)
    }

    pub fn pop(&mut self) -> VmExecResult<Value> {
        self.op_stack.pop()
    }

    generate_pop!(pop_int, get_int, i64);
    generate_pop!(pop_float, get_float, f64);
    generate_pop!(pop_object, get_object, ObjectRef);
}
