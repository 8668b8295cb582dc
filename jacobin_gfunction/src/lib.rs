use jacobin_core::static_field_area::preload_statics;
use log::debug;
use std::sync::Once;

pub mod decimal_arith;
pub mod gfunction_helpers;
pub mod java_io_buffered_reader;
pub mod java_io_buffered_writer;
pub mod java_io_console;
pub mod java_io_file;
pub mod java_io_file_input_stream;
pub mod java_io_file_output_stream;
pub mod java_io_file_reader;
pub mod java_io_file_writer;
pub mod java_io_helpers;
pub mod java_io_print_stream;
pub mod java_lang_system;
pub mod java_math_big_decimal;
pub mod java_math_big_integer;
pub mod java_math_math_context;
pub mod java_math_rounding_mode;
pub mod java_util_concurrent_atomic;
pub mod string_coercion;
pub mod string_formatter;

static LOAD: Once = Once::new();

/// Registers every gfunction into the process-wide table. Later calls do nothing.
pub fn load_gfunctions() {
    LOAD.call_once(|| {
        preload_statics();
        java_math_big_integer::load_big_integer();
        java_math_rounding_mode::load_rounding_mode();
        java_math_math_context::load_math_context();
        java_math_big_decimal::load_big_decimal();
        string_formatter::load_string_formatter();
        java_io_file::load_file();
        java_io_file_input_stream::load_file_input_stream();
        java_io_file_output_stream::load_file_output_stream();
        java_io_file_reader::load_file_reader();
        java_io_file_writer::load_file_writer();
        java_io_buffered_reader::load_buffered_reader();
        java_io_buffered_writer::load_buffered_writer();
        java_io_console::load_console();
        java_io_print_stream::load_print_stream();
        java_util_concurrent_atomic::load_atomics();
        java_lang_system::load_system();
        debug!("gfunctions loaded: {}", jacobin_core::native_method_area::gfunction_count());
    });
}
