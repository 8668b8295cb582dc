use crate::gfunction_helpers::{byte_array, check_bounds, int_arg, object_arg};
use crate::java_io_helpers::{attach_handle, close_handle, open_for_write, path_arg, with_file};
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::{host_bytes_from_java_bytes, Value};
use jacobin_core::native_method_area::{
    clinit_generic, trap_function, with_gfunction_table, GFunctionResult,
};
use jacobin_core::object::Object;
use log::debug;
use std::io::Write;

pub const FILE_OUTPUT_STREAM_CLASS: &str = "java/io/FileOutputStream";

/// Opens the target named by `args[1]`; `args[2]`, when present, is the append flag.
pub fn open_writer(args: &[Value], who: &str) -> Result<(), ErrorBlock> {
    let this = object_arg(args, 0, who)?;
    let path = path_arg(args, 1, who)?;
    let append = match args.get(2) {
        Some(_) => int_arg(args, 2, who)? != 0,
        None => false,
    };
    let file = open_for_write(&path, append, who)?;
    debug!("{}: opened {} (append={})", who, path, append);
    attach_handle(&this, &path, file);
    Ok(())
}

pub fn write_bytes(this: &Object, bytes: &[u8], who: &str) -> Result<(), ErrorBlock> {
    with_file(this, who, |file| file.write_all(bytes))
}

pub fn sync_file(this: &Object, who: &str) -> Result<(), ErrorBlock> {
    with_file(this, who, |file| file.sync_all())
}

fn fos_init(args: &[Value]) -> GFunctionResult {
    open_writer(args, "FileOutputStream.<init>")?;
    Ok(None)
}

fn fos_close(args: &[Value]) -> GFunctionResult {
    let who = "FileOutputStream.close()";
    let obj = object_arg(args, 0, who)?;
    close_handle(&obj, who)?;
    Ok(None)
}

fn fos_flush(args: &[Value]) -> GFunctionResult {
    let who = "FileOutputStream.flush()";
    let obj = object_arg(args, 0, who)?;
    sync_file(&obj, who)?;
    Ok(None)
}

/// Writes the low eight bits of the argument.
fn fos_write_one(args: &[Value]) -> GFunctionResult {
    let who = "FileOutputStream.write(I)";
    let this = object_arg(args, 0, who)?;
    let byte = int_arg(args, 1, who)? as u8;
    write_bytes(&this, &[byte], who)?;
    Ok(None)
}

fn write_from(args: &[Value], off_len: Option<(i64, i64)>, who: &str) -> GFunctionResult {
    let this = object_arg(args, 0, who)?;
    let bytes = byte_array(&object_arg(args, 1, who)?, who)?;
    let (off, len) = match off_len {
        Some((off, len)) => check_bounds(bytes.len(), off, len, who)?,
        None => (0, bytes.len()),
    };
    if len > 0 {
        write_bytes(&this, &host_bytes_from_java_bytes(&bytes[off..off + len]), who)?;
    }
    Ok(None)
}

fn fos_write_array(args: &[Value]) -> GFunctionResult {
    write_from(args, None, "FileOutputStream.write([B)")
}

fn fos_write_range(args: &[Value]) -> GFunctionResult {
    let who = "FileOutputStream.write([BII)";
    write_from(args, Some((int_arg(args, 2, who)?, int_arg(args, 3, who)?)), who)
}

pub fn load_file_output_stream() {
    with_gfunction_table(|t| {
        let c = FILE_OUTPUT_STREAM_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;)V", 1, fos_init);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;Z)V", 2, fos_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, fos_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;Z)V", 2, fos_init);
        t.registry_gfunction(c, "close", "()V", 0, fos_close);
        t.registry_gfunction(c, "flush", "()V", 0, fos_flush);
        t.registry_gfunction(c, "getFD", "()Ljava/io/FileDescriptor;", 0, trap_function);
        t.registry_gfunction(c, "write", "(I)V", 1, fos_write_one);
        t.registry_gfunction(c, "write", "([B)V", 1, fos_write_array);
        t.registry_gfunction(c, "write", "([BII)V", 3, fos_write_range);
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::java_io_file_output_stream::FILE_OUTPUT_STREAM_CLASS;
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{make_array_object, make_empty_object_with_class_name, FieldValue};
    use std::fs;

    fn open(path: &std::path::Path, append: bool) -> Value {
        let stream = Value::ObjectRef(make_empty_object_with_class_name(FILE_OUTPUT_STREAM_CLASS));
        invoke(
            "java/io/FileOutputStream.<init>(Ljava/lang/String;Z)V",
            &[stream.clone(), string_value(&path.to_string_lossy()), Value::bool(append)],
        )
        .unwrap();
        stream
    }

    #[test]
    fn test_write_and_append() {
        load_gfunctions();
        let path = std::env::temp_dir().join(format!("jacobin_fos_{}", std::process::id()));
        let stream = open(&path, false);
        let arr = Value::ObjectRef(make_array_object("[B", FieldValue::Bytes(vec![0x61, 0x62, 0x63, 0x64])));
        invoke("java/io/FileOutputStream.write(I)V", &[stream.clone(), Value::Int(0x15a)]).unwrap();
        invoke(
            "java/io/FileOutputStream.write([BII)V",
            &[stream.clone(), arr.clone(), Value::Int(1), Value::Int(2)],
        )
        .unwrap();
        invoke(
            "java/io/FileOutputStream.write([BII)V",
            &[stream.clone(), arr.clone(), Value::Int(4), Value::Int(0)],
        )
        .unwrap();
        let err = invoke(
            "java/io/FileOutputStream.write([BII)V",
            &[stream.clone(), arr.clone(), Value::Int(3), Value::Int(2)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IndexOutOfBoundsException);
        invoke("java/io/FileOutputStream.flush()V", &[stream.clone()]).unwrap();
        invoke("java/io/FileOutputStream.close()V", &[stream.clone()]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"Zbc");

        let err = invoke("java/io/FileOutputStream.write(I)V", &[stream, Value::Int(1)]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IOException);

        let again = open(&path, true);
        invoke("java/io/FileOutputStream.write([B)V", &[again.clone(), arr]).unwrap();
        invoke("java/io/FileOutputStream.close()V", &[again]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"Zbcabcd");
        fs::remove_file(path).unwrap();
    }
}
