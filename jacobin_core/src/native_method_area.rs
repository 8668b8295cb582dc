use crate::class_initializer::ensure_initialized;
use crate::globals::get_charset_name;
use crate::java_exception::{
    get_error_block, ErrorBlock, ExceptionKind, InvokeMethodResult, MethodCallError,
};
use crate::jvm_error::{VmError, VmExecResult};
use crate::jvm_values::Value;
use crate::object::string_object_from_str;
use crate::stack_frame::Frame;
use crate::thread_table::get_thread_name;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `Ok(None)` is void, `Ok(Some(v))` is pushed, `Err` becomes a Java throw.
pub type GFunctionResult = Result<Option<Value>, ErrorBlock>;

/// Uniform shape of every host-implemented Java method. `args[0]` is the receiver
/// for instance methods.
pub type GFunction = fn(&[Value]) -> GFunctionResult;

#[derive(Clone, Copy)]
pub struct GMeth {
    /// Operand-stack slots the caller pops, receiver excluded. Longs and doubles take one.
    pub param_slots: usize,
    pub body: GFunction,
    /// Run while holding the receiver's monitor.
    pub synchronized: bool,
}

impl GMeth {
    pub fn new(param_slots: usize, body: GFunction) -> GMeth {
        GMeth {
            param_slots,
            body,
            synchronized: false,
        }
    }

    pub fn synchronized(mut self) -> GMeth {
        self.synchronized = true;
        self
    }
}

/// Splits `<class>.<method>(<params>)<ret>` into class, method and descriptor.
pub fn split_key(key: &str) -> Option<(&str, &str, &str)> {
    let paren = key.find('(')?;
    let (head, desc) = key.split_at(paren);
    let (class_name, method_name) = head.rsplit_once('.')?;
    if class_name.is_empty() || method_name.is_empty() {
        return None;
    }
    let close = desc.find(')')?;
    if close + 1 >= desc.len() {
        return None;
    }
    Some((class_name, method_name, desc))
}

pub fn check_key(key: &str) -> bool {
    split_key(key).is_some()
}

/// gfunction 表，key 是完整的方法签名
#[derive(Default)]
pub struct GFunctionTable {
    methods: HashMap<String, GMeth>,
}

impl GFunctionTable {
    pub fn new() -> GFunctionTable {
        GFunctionTable {
            methods: HashMap::new(),
        }
    }

    pub fn register(&mut self, key: &str, gmeth: GMeth) -> VmExecResult<()> {
        if !check_key(key) {
            return Err(VmError::ClassNotFound(key.to_string()));
        }
        self.methods.insert(key.to_string(), gmeth);
        Ok(())
    }

    pub fn registry_gfunction(
        &mut self,
        class_name: &str,
        method_name: &str,
        descriptor: &str,
        param_slots: usize,
        body: GFunction,
    ) {
        let key = format!("{}.{}{}", class_name, method_name, descriptor);
        self.methods.insert(key, GMeth::new(param_slots, body));
    }

    pub fn get(&self, key: &str) -> Option<GMeth> {
        self.methods.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.methods.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

static GFUNCTIONS: LazyLock<RwLock<GFunctionTable>> =
    LazyLock::new(|| RwLock::new(GFunctionTable::new()));

/// Runs `f` with the process-wide table locked for writing.
pub fn with_gfunction_table<R>(f: impl FnOnce(&mut GFunctionTable) -> R) -> R {
    f(&mut GFUNCTIONS.write())
}

pub fn register_gfunction(key: &str, gmeth: GMeth) -> VmExecResult<()> {
    GFUNCTIONS.write().register(key, gmeth)
}

pub fn lookup_gfunction(key: &str) -> Option<GMeth> {
    GFUNCTIONS.read().get(key)
}

pub fn gfunction_count() -> usize {
    GFUNCTIONS.read().len()
}

/// `<clinit>` body for classes with nothing to set up; running it through the
/// initialiser barrier is what marks the class `Done`.
pub fn clinit_generic(_args: &[Value]) -> GFunctionResult {
    Ok(None)
}

pub fn just_return(_args: &[Value]) -> GFunctionResult {
    Ok(None)
}

pub fn return_charset_name(_args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::ObjectRef(string_object_from_str(
        &get_charset_name(),
    ))))
}

pub fn return_false(_args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(0)))
}

pub fn return_true(_args: &[Value]) -> GFunctionResult {
    Ok(Some(Value::Int(1)))
}

pub fn trap_class(_args: &[Value]) -> GFunctionResult {
    Err(get_error_block(
        ExceptionKind::UnsupportedOperationException,
        "TRAP: The requested class is not yet supported",
    ))
}

pub fn trap_deprecated(_args: &[Value]) -> GFunctionResult {
    Err(get_error_block(
        ExceptionKind::UnsupportedOperationException,
        "TRAP: The requested class or function is deprecated and, therefore, not supported",
    ))
}

pub fn trap_function(_args: &[Value]) -> GFunctionResult {
    Err(get_error_block(
        ExceptionKind::UnsupportedOperationException,
        "TRAP: The requested function is not yet supported",
    ))
}

fn run_gmeth(gmeth: &GMeth, args: &[Value]) -> GFunctionResult {
    if gmeth.synchronized {
        if let Some(Value::ObjectRef(receiver)) = args.first() {
            let _monitor = receiver.lock_monitor();
            return (gmeth.body)(args);
        }
        return Err(get_error_block(
            ExceptionKind::IllegalArgumentException,
            "synchronized gfunction called without an object reference",
        ));
    }
    (gmeth.body)(args)
}

/// A `<clinit>` key only ever runs through the initialiser barrier, so a class that is
/// already `Done` (or being initialised by this thread) makes the call a no-op.
fn run_with_class_init(class_name: &str, method_name: &str, gmeth: &GMeth, args: &[Value]) -> GFunctionResult {
    ensure_initialized(class_name)?;
    if method_name == "<clinit>" {
        return Ok(None);
    }
    run_gmeth(gmeth, args)
}

/// Calls a registered gfunction by key; how native bodies compose with each other.
pub fn invoke(key: &str, args: &[Value]) -> GFunctionResult {
    let gmeth = lookup_gfunction(key)
        .ok_or_else(|| get_error_block(ExceptionKind::NoSuchMethodException, key))?;
    match split_key(key) {
        Some((class_name, method_name, _)) => run_with_class_init(class_name, method_name, &gmeth, args),
        None => run_gmeth(&gmeth, args),
    }
}

/// Runs the gfunction `key` on behalf of `frame`: pops its arguments (and the receiver
/// when `has_receiver`), runs the class initialiser on first use, pushes any result.
pub fn dispatch_gfunction(frame: &mut Frame, key: &str, has_receiver: bool) -> InvokeMethodResult {
    let gmeth = lookup_gfunction(key).ok_or_else(|| {
        MethodCallError::ExceptionThrown(get_error_block(ExceptionKind::NoSuchMethodError, key))
    })?;
    let (class_name, method_name, _) =
        split_key(key).ok_or_else(|| VmError::ClassNotFound(key.to_string()))?;
    // receiver and arguments leave the stack together or not at all
    let args = frame.op_stack.pop_n(gmeth.param_slots + has_receiver as usize)?;
    debug!("dispatch gfunction {} with {} args", key, args.len());

    match run_with_class_init(class_name, method_name, &gmeth, &args) {
        Ok(Some(value)) => Ok(frame.push(value)?),
        Ok(None) => Ok(()),
        Err(block) => {
            let message = format!(
                "{} in thread: {}, method: {}.{}",
                block.message,
                get_thread_name(frame.thread),
                class_name,
                method_name
            );
            debug!("gfunction {} threw {}", key, block.kind);
            Err(MethodCallError::ExceptionThrown(get_error_block(
                block.kind, message,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::class_initializer::{clinit_state, ClinitState};
    use crate::java_exception::{ExceptionKind, MethodCallError};
    use crate::jvm_values::Value;
    use crate::native_method_area::{
        check_key, clinit_generic, dispatch_gfunction, invoke, register_gfunction, split_key,
        trap_deprecated, trap_function, GFunctionResult, GFunctionTable, GMeth,
    };
    use crate::stack_frame::Frame;
    use crate::thread_table::MAIN_THREAD_ID;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static CLINIT_RUNS: AtomicUsize = AtomicUsize::new(0);

    fn counted_clinit(_args: &[Value]) -> GFunctionResult {
        CLINIT_RUNS.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    fn add(args: &[Value]) -> GFunctionResult {
        let a = args[0].get_int()?;
        let b = args[1].get_int()?;
        Ok(Some(Value::Int(a + b)))
    }

    #[test]
    fn test_key_shape() {
        assert!(check_key(
            "java/math/BigDecimal.add(Ljava/math/BigDecimal;)Ljava/math/BigDecimal;"
        ));
        assert_eq!(
            split_key("java/lang/Object.<init>()V"),
            Some(("java/lang/Object", "<init>", "()V"))
        );
        assert!(!check_key("java/lang/Object.<init>()"));
        assert!(!check_key("noDot(I)V"));
        assert!(!check_key("java/lang/Object.hashCode"));
    }

    #[test]
    fn test_table_register() {
        let mut table = GFunctionTable::new();
        table.registry_gfunction("test/Native", "add", "(JJ)J", 2, add);
        assert!(table.contains("test/Native.add(JJ)J"));
        assert!(table.register("bad", GMeth::new(0, add)).is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_trap_messages() {
        let block = trap_function(&[]).unwrap_err();
        assert_eq!(block.kind, ExceptionKind::UnsupportedOperationException);
        assert_eq!(block.message, "TRAP: The requested function is not yet supported");
        assert!(trap_deprecated(&[]).unwrap_err().message.contains("deprecated"));
    }

    #[test]
    fn test_invoke_missing() {
        let block = invoke("test/Native.nothing()V", &[]).unwrap_err();
        assert_eq!(block.kind, ExceptionKind::NoSuchMethodException);
    }

    #[test]
    fn test_dispatch_pushes_result() {
        register_gfunction("test/dispatch/Adder.add(JJ)J", GMeth::new(2, add)).unwrap();
        let mut frame = Frame::for_method(MAIN_THREAD_ID, "test/Caller", "run", "()V", 4, 0);
        frame.push(Value::Int(40)).unwrap();
        frame.push(Value::Int(2)).unwrap();
        dispatch_gfunction(&mut frame, "test/dispatch/Adder.add(JJ)J", false).unwrap();
        assert_eq!(frame.pop().unwrap(), Value::Int(42));
        assert_eq!(frame.op_stack.tos(), -1);
    }

    #[test]
    fn test_dispatch_decorates_exception() {
        register_gfunction("test/dispatch/Trap.go()V", GMeth::new(0, trap_function)).unwrap();
        let mut frame = Frame::for_method(MAIN_THREAD_ID, "test/Caller", "run", "()V", 2, 0);
        let err = dispatch_gfunction(&mut frame, "test/dispatch/Trap.go()V", false).unwrap_err();
        match err {
            MethodCallError::ExceptionThrown(block) => {
                assert_eq!(
                    block.message,
                    "TRAP: The requested function is not yet supported in thread: main, method: test/dispatch/Trap.go"
                );
            }
            other => panic!("unexpected {:?}", other),
        }
        let err = dispatch_gfunction(&mut frame, "test/dispatch/Missing.go()V", false).unwrap_err();
        assert!(matches!(
            err,
            MethodCallError::ExceptionThrown(block) if block.kind == ExceptionKind::NoSuchMethodError
        ));
    }

    #[test]
    fn test_clinit_key_runs_body_once() {
        register_gfunction("test/dispatch/Init.<clinit>()V", GMeth::new(0, counted_clinit)).unwrap();
        register_gfunction("test/dispatch/Init.go()V", GMeth::new(0, clinit_generic)).unwrap();
        invoke("test/dispatch/Init.go()V", &[]).unwrap();
        assert_eq!(CLINIT_RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(invoke("test/dispatch/Init.<clinit>()V", &[]).unwrap(), None);
        let mut frame = Frame::for_method(MAIN_THREAD_ID, "test/Caller", "run", "()V", 2, 0);
        dispatch_gfunction(&mut frame, "test/dispatch/Init.<clinit>()V", false).unwrap();
        assert_eq!(CLINIT_RUNS.load(Ordering::SeqCst), 1);
        assert_eq!(clinit_state("test/dispatch/Init"), ClinitState::Done);
    }

    #[test]
    fn test_clinit_generic_marks_done() {
        register_gfunction("test/dispatch/Empty.<clinit>()V", GMeth::new(0, clinit_generic)).unwrap();
        assert_eq!(clinit_state("test/dispatch/Empty"), ClinitState::NotStarted);
        invoke("test/dispatch/Empty.<clinit>()V", &[]).unwrap();
        assert_eq!(clinit_state("test/dispatch/Empty"), ClinitState::Done);
    }

    #[test]
    fn test_dispatch_short_stack_leaves_operands() {
        register_gfunction("test/dispatch/Pair.add(JJ)J", GMeth::new(2, add)).unwrap();
        let mut frame = Frame::for_method(MAIN_THREAD_ID, "test/Caller", "run", "()V", 4, 0);
        frame.push(Value::Int(1)).unwrap();
        frame.push(Value::Int(2)).unwrap();
        assert!(dispatch_gfunction(&mut frame, "test/dispatch/Pair.add(JJ)J", true).is_err());
        assert_eq!(frame.op_stack.len(), 2);
        assert_eq!(frame.pop().unwrap(), Value::Int(2));
    }
}
