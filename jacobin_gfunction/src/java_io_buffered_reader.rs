use crate::gfunction_helpers::{object_arg, string_value};
use crate::java_io_file_reader::{
    reader_close, reader_read_one, reader_read_range, reader_ready,
};
use crate::java_io_helpers::{eof_get, eof_set, read_line, share_handle, with_file};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{
    clinit_generic, return_false, trap_function, with_gfunction_table, GFunctionResult,
};

pub const BUFFERED_READER_CLASS: &str = "java/io/BufferedReader";

/// Wraps a `Reader`: both objects then read from the same host file.
fn buffered_reader_init(args: &[Value]) -> GFunctionResult {
    let who = "BufferedReader.<init>(Reader)";
    let this = object_arg(args, 0, who)?;
    let reader = object_arg(args, 1, who)?;
    share_handle(&this, &reader, who)?;
    Ok(None)
}

/// The next line without its terminator, or null once the file is exhausted.
fn buffered_reader_read_line(args: &[Value]) -> GFunctionResult {
    let who = "BufferedReader.readLine()";
    let this = object_arg(args, 0, who)?;
    if eof_get(&this) {
        return Ok(Some(Value::Null));
    }
    match with_file(&this, who, read_line)? {
        Some(line) => Ok(Some(string_value(&line))),
        None => {
            eof_set(&this, true);
            Ok(Some(Value::Null))
        }
    }
}

pub fn load_buffered_reader() {
    with_gfunction_table(|t| {
        let c = BUFFERED_READER_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/Reader;)V", 1, buffered_reader_init);
        t.registry_gfunction(c, "<init>", "(Ljava/io/Reader;I)V", 2, trap_function);
        t.registry_gfunction(c, "close", "()V", 0, reader_close);
        t.registry_gfunction(c, "lines", "()Ljava/util/stream/Stream;", 0, trap_function);
        t.registry_gfunction(c, "mark", "(I)V", 1, trap_function);
        t.registry_gfunction(c, "markSupported", "()Z", 0, return_false);
        t.registry_gfunction(c, "read", "()I", 0, reader_read_one);
        t.registry_gfunction(c, "read", "([CII)I", 3, reader_read_range);
        t.registry_gfunction(c, "readLine", "()Ljava/lang/String;", 0, buffered_reader_read_line);
        t.registry_gfunction(c, "ready", "()Z", 0, reader_ready);
        t.registry_gfunction(c, "reset", "()V", 0, trap_function);
    });
}
