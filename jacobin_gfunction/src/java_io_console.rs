use crate::gfunction_helpers::{arg, string_value};
use crate::java_io_helpers::io_error;
use crate::string_formatter::string_formatter;
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{
    clinit_generic, trap_function, with_gfunction_table, GFunctionResult,
};
use jacobin_core::object::{make_array_object, FieldValue};
use std::io::{self, BufRead, Write};

pub const CONSOLE_CLASS: &str = "java/io/Console";

fn write_stdout(bytes: &[u8], who: &str) -> Result<(), ErrorBlock> {
    let mut out = io::stdout().lock();
    out.write_all(bytes)
        .and_then(|_| out.flush())
        .map_err(|err| io_error(who, err))
}

/// One line of standard input without its terminator; `None` at end of input.
fn read_stdin_line(who: &str) -> Result<Option<String>, ErrorBlock> {
    let mut line = String::new();
    let count = io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|err| io_error(who, err))?;
    if count == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

/// Runs `read` with terminal echo switched off on standard input, when it is a terminal.
#[cfg(unix)]
fn without_echo<R>(read: impl FnOnce() -> R) -> R {
    let fd = libc::STDIN_FILENO;
    let mut term: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &mut term) } != 0 {
        return read();
    }
    let saved = term;
    term.c_lflag &= !libc::ECHO;
    unsafe { libc::tcsetattr(fd, libc::TCSANOW, &term) };
    let result = read();
    unsafe { libc::tcsetattr(fd, libc::TCSANOW, &saved) };
    result
}

#[cfg(not(unix))]
fn without_echo<R>(read: impl FnOnce() -> R) -> R {
    read()
}

fn prompt(args: &[Value], who: &str) -> Result<(), ErrorBlock> {
    let text = string_formatter(args.get(1..).unwrap_or_default())?;
    write_stdout(text.as_bytes(), who)
}

fn line_value(line: Option<String>) -> Value {
    line.map_or(Value::Null, |l| string_value(&l))
}

fn password_value(line: Option<String>) -> Value {
    match line {
        Some(l) => {
            let chars = l.encode_utf16().map(|unit| unit as i64).collect();
            Value::ObjectRef(make_array_object("[C", FieldValue::Ints(chars)))
        }
        None => Value::Null,
    }
}

fn console_flush(_args: &[Value]) -> GFunctionResult {
    write_stdout(b"", "Console.flush()")?;
    Ok(None)
}

/// `format` and `printf` write to standard output and return the console.
fn console_printf(args: &[Value]) -> GFunctionResult {
    let who = "Console.printf";
    let this = arg(args, 0, who)?.clone();
    prompt(args, who)?;
    Ok(Some(this))
}

fn console_read_line(_args: &[Value]) -> GFunctionResult {
    Ok(Some(line_value(read_stdin_line("Console.readLine()")?)))
}

fn console_read_line_prompt(args: &[Value]) -> GFunctionResult {
    let who = "Console.readLine(String,[Object)";
    prompt(args, who)?;
    Ok(Some(line_value(read_stdin_line(who)?)))
}

fn read_password(who: &str) -> GFunctionResult {
    let line = without_echo(|| read_stdin_line(who))?;
    write_stdout(b"\n", who)?;
    Ok(Some(password_value(line)))
}

fn console_read_password(_args: &[Value]) -> GFunctionResult {
    read_password("Console.readPassword()")
}

fn console_read_password_prompt(args: &[Value]) -> GFunctionResult {
    let who = "Console.readPassword(String,[Object)";
    prompt(args, who)?;
    read_password(who)
}

pub fn load_console() {
    with_gfunction_table(|t| {
        let c = CONSOLE_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "charset", "()Ljava/nio/charset/Charset;", 0, trap_function);
        t.registry_gfunction(c, "flush", "()V", 0, console_flush);
        t.registry_gfunction(
            c,
            "format",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/Console;",
            2,
            console_printf,
        );
        t.registry_gfunction(
            c,
            "printf",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/io/Console;",
            2,
            console_printf,
        );
        t.registry_gfunction(c, "readLine", "()Ljava/lang/String;", 0, console_read_line);
        t.registry_gfunction(
            c,
            "readLine",
            "(Ljava/lang/String;[Ljava/lang/Object;)Ljava/lang/String;",
            2,
            console_read_line_prompt,
        );
        t.registry_gfunction(c, "readPassword", "()[C", 0, console_read_password);
        t.registry_gfunction(
            c,
            "readPassword",
            "(Ljava/lang/String;[Ljava/lang/Object;)[C",
            2,
            console_read_password_prompt,
        );
        t.registry_gfunction(c, "reader", "()Ljava/io/Reader;", 0, trap_function);
        t.registry_gfunction(c, "writer", "()Ljava/io/PrintWriter;", 0, trap_function);
    });
}
