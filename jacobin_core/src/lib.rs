pub mod class_initializer;
pub mod globals;
pub mod java_exception;
pub mod jvm_error;
pub mod jvm_values;
pub mod native_method_area;
pub mod object;
pub mod operand_stack;
pub mod stack;
pub mod stack_frame;
pub mod static_field_area;
pub mod string_pool;
pub mod system_properties;
pub mod thread_table;
