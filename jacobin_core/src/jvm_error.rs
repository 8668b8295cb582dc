use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VmError {
    #[error("ClassNotFound {0}")]
    ClassNotFound(String),
    #[error("FieldNotFound {0}")]
    FieldNotFound(String),
    #[error("static field name is empty")]
    EmptyStaticName,
    #[error("GlobalsInit {0}")]
    GlobalsInit(String),
    #[error("Io {0}")]
    Io(String),
    #[error("value type miss match")]
    ValueTypeMissMatch,

    #[error("index out of bounds")]
    IndexOutOfBounds,
    #[error("can't pop from empty stack")]
    PopFromEmptyStack,
    #[error("stack over flow")]
    StackOverFlow,
}

impl From<std::io::Error> for VmError {
    fn from(value: std::io::Error) -> Self {
        VmError::Io(value.to_string())
    }
}

pub type VmExecResult<T> = Result<T, VmError>;
