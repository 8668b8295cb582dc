use crate::gfunction_helpers::{arg, illegal_argument, int_arg, int_array, float_arg, null_pointer};
use crate::java_io_helpers::{encode_chars, io_error, with_file};
use crate::string_coercion::{java_double_to_string, java_float_to_string, object_to_string};
use crate::string_formatter::string_formatter;
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::{HostResource, Value};
use jacobin_core::native_method_area::{clinit_generic, with_gfunction_table, GFunctionResult};
use jacobin_core::object::string_from_string_object;
use std::io::{self, Write};

pub const PRINT_STREAM_CLASS: &str = "java/io/PrintStream";

fn write_host(resource: &HostResource, bytes: &[u8], who: &str) -> Result<(), ErrorBlock> {
    let written = match resource {
        HostResource::Stdout => {
            let mut out = io::stdout().lock();
            out.write_all(bytes).and_then(|_| out.flush())
        }
        HostResource::Stderr => {
            let mut err = io::stderr().lock();
            err.write_all(bytes).and_then(|_| err.flush())
        }
        HostResource::File(slot) => match slot.lock().as_mut() {
            Some(file) => file.write_all(bytes),
            None => Err(io::Error::other("stream closed")),
        },
        HostResource::Stdin => return Err(illegal_argument(who, "cannot print to standard input")),
    };
    written.map_err(|err| io_error(who, err))
}

/// Writes to a stream receiver: `System.out`/`System.err` or any object holding a file handle.
pub fn write_to_stream(receiver: &Value, bytes: &[u8], who: &str) -> Result<(), ErrorBlock> {
    match receiver {
        Value::RawPointer(resource) => write_host(resource, bytes, who),
        Value::ObjectRef(obj) => with_file(obj, who, |file| file.write_all(bytes)),
        Value::Null => Err(null_pointer(who, "stream is null")),
        _ => Err(illegal_argument(who, "receiver is not a stream")),
    }
}

/// Text of `args[1]` as `print` renders a value of descriptor type `kind`.
fn render(args: &[Value], kind: char, who: &str) -> Result<String, ErrorBlock> {
    let text = match kind {
        'Z' => (int_arg(args, 1, who)? != 0).to_string(),
        'C' => {
            let unit = (int_arg(args, 1, who)? & 0xffff) as u16;
            String::from_utf16_lossy(&[unit])
        }
        'I' | 'J' => int_arg(args, 1, who)?.to_string(),
        'F' => java_float_to_string(float_arg(args, 1, who)? as f32),
        'D' => java_double_to_string(float_arg(args, 1, who)?),
        '[' => match arg(args, 1, who)? {
            Value::ObjectRef(obj) => String::from_utf8_lossy(&encode_chars(&int_array(obj, who)?)).into_owned(),
            _ => return Err(null_pointer(who, "char array is null")),
        },
        'S' => match arg(args, 1, who)? {
            Value::ObjectRef(obj) => string_from_string_object(obj)
                .ok_or_else(|| illegal_argument(who, "argument is not a String"))?,
            _ => "null".to_string(),
        },
        _ => object_to_string(arg(args, 1, who)?)?,
    };
    Ok(text)
}

fn print_with(args: &[Value], kind: char, newline: bool, who: &str) -> GFunctionResult {
    let mut text = render(args, kind, who)?;
    if newline {
        text.push('\n');
    }
    write_to_stream(arg(args, 0, who)?, text.as_bytes(), who)?;
    Ok(None)
}

macro_rules! generate_print {
    ($print:ident, $println:ident, $kind:expr) => {
        fn $print(args: &[Value]) -> GFunctionResult {
            print_with(args, $kind, false, stringify!($print))
        }

        fn $println(args: &[Value]) -> GFunctionResult {
            print_with(args, $kind, true, stringify!($println))
        }
    };
}

generate_print!(print_boolean, println_boolean, 'Z');
generate_print!(print_char, println_char, 'C');
generate_print!(print_int, println_int, 'I');
generate_print!(print_long, println_long, 'J');
generate_print!(print_float, println_float, 'F');
generate_print!(print_double, println_double, 'D');
generate_print!(print_chars, println_chars, '[');
generate_print!(print_string, println_string, 'S');
generate_print!(print_object, println_object, 'L');

fn println_empty(args: &[Value]) -> GFunctionResult {
    let who = "PrintStream.println()";
    write_to_stream(arg(args, 0, who)?, b"\n", who)?;
    Ok(None)
}

/// `printf` and `format`: formats the rest of the arguments and returns the stream.
fn print_stream_printf(args: &[Value]) -> GFunctionResult {
    let who = "PrintStream.printf";
    let receiver = arg(args, 0, who)?.clone();
    let text = string_formatter(args.get(1..).unwrap_or_default())?;
    write_to_stream(&receiver, text.as_bytes(), who)?;
    Ok(Some(receiver))
}

fn print_stream_flush(args: &[Value]) -> GFunctionResult {
    let who = "PrintStream.flush()";
    write_to_stream(arg(args, 0, who)?, b"", who)?;
    Ok(None)
}

fn print_stream_write(args: &[Value]) -> GFunctionResult {
    let who = "PrintStream.write(I)";
    let byte = int_arg(args, 1, who)? as u8;
    write_to_stream(arg(args, 0, who)?, &[byte], who)?;
    Ok(None)
}

pub fn load_print_stream() {
    with_gfunction_table(|t| {
        let c = PRINT_STREAM_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "flush", "()V", 0, print_stream_flush);
        t.registry_gfunction(
            c,
            "format",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/PrintStream;",
            2,
            print_stream_printf,
        );
        t.registry_gfunction(
            c,
            "printf",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/PrintStream;",
            2,
            print_stream_printf,
        );
        t.registry_gfunction(c, "print", "(Z)V", 1, print_boolean);
        t.registry_gfunction(c, "print", "(C)V", 1, print_char);
        t.registry_gfunction(c, "print", "(I)V", 1, print_int);
        t.registry_gfunction(c, "print", "(J)V", 1, print_long);
        t.registry_gfunction(c, "print", "(F)V", 1, print_float);
        t.registry_gfunction(c, "print", "(D)V", 1, print_double);
        t.registry_gfunction(c, "print", "([C)V", 1, print_chars);
        t.registry_gfunction(c, "print", "(Ljava/lang/String;)V", 1, print_string);
        t.registry_gfunction(c, "print", "(Ljava/lang/Object;)V", 1, print_object);
        t.registry_gfunction(c, "println", "()V", 0, println_empty);
        t.registry_gfunction(c, "println", "(Z)V", 1, println_boolean);
        t.registry_gfunction(c, "println", "(C)V", 1, println_char);
        t.registry_gfunction(c, "println", "(I)V", 1, println_int);
        t.registry_gfunction(c, "println", "(J)V", 1, println_long);
        t.registry_gfunction(c, "println", "(F)V", 1, println_float);
        t.registry_gfunction(c, "println", "(D)V", 1, println_double);
        t.registry_gfunction(c, "println", "([C)V", 1, println_chars);
        t.registry_gfunction(c, "println", "(Ljava/lang/String;)V", 1, println_string);
        t.registry_gfunction(c, "println", "(Ljava/lang/Object;)V", 1, println_object);
        t.registry_gfunction(c, "write", "(I)V", 1, print_stream_write);
    });
}
