use crate::jvm_error::VmError;
use log::{error, warn};
use parking_lot::{const_rwlock, RwLock};
use std::fmt::{Display, Formatter};
use strum_macros::IntoStaticStr;
use thiserror::Error;

/// Java throwables a gfunction or the core may raise.
///
/// `Display` gives the simple name, `Into<&'static str>` the JVM internal class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr)]
pub enum ExceptionKind {
    #[strum(serialize = "java/lang/Throwable")]
    Unknown,
    #[strum(serialize = "java/lang/ArithmeticException")]
    ArithmeticException,
    #[strum(serialize = "java/lang/ArrayIndexOutOfBoundsException")]
    ArrayIndexOutOfBoundsException,
    #[strum(serialize = "java/lang/ArrayStoreException")]
    ArrayStoreException,
    #[strum(serialize = "java/lang/ClassCastException")]
    ClassCastException,
    #[strum(serialize = "java/lang/ClassNotFoundException")]
    ClassNotFoundException,
    #[strum(serialize = "com/sun/jdi/ClassNotLoadedException")]
    ClassNotLoadedException,
    #[strum(serialize = "java/lang/CloneNotSupportedException")]
    CloneNotSupportedException,
    #[strum(serialize = "java/util/EmptyStackException")]
    EmptyStackException,
    #[strum(serialize = "java/io/EOFException")]
    EOFException,
    #[strum(serialize = "java/io/FileNotFoundException")]
    FileNotFoundException,
    #[strum(serialize = "java/lang/IllegalAccessException")]
    IllegalAccessException,
    #[strum(serialize = "java/lang/IllegalArgumentException")]
    IllegalArgumentException,
    #[strum(serialize = "java/util/IllegalFormatConversionException")]
    IllegalFormatConversionException,
    #[strum(serialize = "java/lang/IllegalMonitorStateException")]
    IllegalMonitorStateException,
    #[strum(serialize = "java/lang/IllegalStateException")]
    IllegalStateException,
    #[strum(serialize = "java/lang/IndexOutOfBoundsException")]
    IndexOutOfBoundsException,
    #[strum(serialize = "java/lang/InterruptedException")]
    InterruptedException,
    #[strum(serialize = "com/sun/jdi/InvalidTypeException")]
    InvalidTypeException,
    #[strum(serialize = "java/io/IOException")]
    IOException,
    #[strum(serialize = "java/util/MissingFormatArgumentException")]
    MissingFormatArgumentException,
    #[strum(serialize = "java/lang/NegativeArraySizeException")]
    NegativeArraySizeException,
    #[strum(serialize = "java/util/NoSuchElementException")]
    NoSuchElementException,
    #[strum(serialize = "java/lang/NoSuchFieldException")]
    NoSuchFieldException,
    #[strum(serialize = "java/lang/NoSuchMethodException")]
    NoSuchMethodException,
    #[strum(serialize = "java/lang/NullPointerException")]
    NullPointerException,
    #[strum(serialize = "java/lang/NumberFormatException")]
    NumberFormatException,
    #[strum(serialize = "java/lang/SecurityException")]
    SecurityException,
    #[strum(serialize = "java/io/UncheckedIOException")]
    UncheckedIOException,
    #[strum(serialize = "java/util/UnknownFormatConversionException")]
    UnknownFormatConversionException,
    #[strum(serialize = "java/lang/UnsupportedOperationException")]
    UnsupportedOperationException,
    // errors
    #[strum(serialize = "java/lang/ExceptionInInitializerError")]
    ExceptionInInitializerError,
    #[strum(serialize = "java/lang/InternalError")]
    InternalError,
    #[strum(serialize = "java/lang/NoClassDefFoundError")]
    NoClassDefFoundError,
    #[strum(serialize = "java/lang/NoSuchMethodError")]
    NoSuchMethodError,
    #[strum(serialize = "java/lang/OutOfMemoryError")]
    OutOfMemoryError,
    #[strum(serialize = "java/lang/StackOverflowError")]
    StackOverflowError,
    #[strum(serialize = "java/lang/VirtualMachineError")]
    VirtualMachineError,
}

impl Display for ExceptionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = self.java_class_name();
        f.write_str(name.rsplit('/').next().unwrap_or(name))
    }
}

impl ExceptionKind {
    pub fn java_class_name(self) -> &'static str {
        self.into()
    }

    /// Dotted form as printed by `Throwable.toString()`.
    pub fn java_dotted_name(self) -> String {
        self.java_class_name().replace('/', ".")
    }
}

/// Structured failure returned by a gfunction. The interpreter turns it into a Java throw.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {message}")]
pub struct ErrorBlock {
    pub kind: ExceptionKind,
    pub message: String,
}

pub fn get_error_block(kind: ExceptionKind, message: impl Into<String>) -> ErrorBlock {
    ErrorBlock {
        kind,
        message: message.into(),
    }
}

impl From<VmError> for ErrorBlock {
    fn from(value: VmError) -> Self {
        let kind = match &value {
            VmError::PopFromEmptyStack | VmError::IndexOutOfBounds => {
                ExceptionKind::IndexOutOfBoundsException
            }
            VmError::ValueTypeMissMatch | VmError::FieldNotFound(_) | VmError::EmptyStaticName => {
                ExceptionKind::IllegalArgumentException
            }
            VmError::Io(_) => ExceptionKind::IOException,
            VmError::ClassNotFound(_) => ExceptionKind::ClassNotFoundException,
            VmError::StackOverFlow => ExceptionKind::StackOverflowError,
            VmError::GlobalsInit(_) => ExceptionKind::VirtualMachineError,
        };
        get_error_block(kind, value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodCallError {
    InternalError(VmError),
    ExceptionThrown(ErrorBlock),
}

impl From<VmError> for MethodCallError {
    fn from(value: VmError) -> Self {
        Self::InternalError(value)
    }
}

impl From<ErrorBlock> for MethodCallError {
    fn from(value: ErrorBlock) -> Self {
        Self::ExceptionThrown(value)
    }
}

pub type InvokeMethodResult = Result<(), MethodCallError>;

/// Delivers a Java exception; true when a handler caught it.
pub type ThrowExceptionHook = fn(ExceptionKind, &str) -> bool;
/// Reports an unrecoverable startup failure and ends the process.
pub type MinimalAbortHook = fn(ExceptionKind, &str);

struct Hooks {
    throw_exception: ThrowExceptionHook,
    minimal_abort: MinimalAbortHook,
}

static HOOKS: RwLock<Hooks> = const_rwlock(Hooks {
    throw_exception: default_throw_exception,
    minimal_abort: default_minimal_abort,
});

fn default_throw_exception(kind: ExceptionKind, msg: &str) -> bool {
    warn!("no interpreter throw path installed: {}: {}", kind.java_dotted_name(), msg);
    false
}

fn default_minimal_abort(kind: ExceptionKind, msg: &str) {
    error!("minimal abort: {}: {}", kind, msg);
    eprintln!("{}: {}", kind.java_dotted_name(), msg);
    std::process::exit(1);
}

pub fn set_throw_exception_hook(hook: ThrowExceptionHook) {
    HOOKS.write().throw_exception = hook;
}

pub fn set_minimal_abort_hook(hook: MinimalAbortHook) {
    HOOKS.write().minimal_abort = hook;
}

pub fn throw_exception(kind: ExceptionKind, msg: &str) -> bool {
    let hook = HOOKS.read().throw_exception;
    hook(kind, msg)
}

pub fn minimal_abort(kind: ExceptionKind, msg: &str) {
    let hook = HOOKS.read().minimal_abort;
    hook(kind, msg)
}
