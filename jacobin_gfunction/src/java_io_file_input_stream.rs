use crate::gfunction_helpers::{byte_array, check_bounds, int_arg, object_arg, store_bytes};
use crate::java_io_helpers::{
    attach_handle, close_handle, open_for_read, path_arg, read_byte, read_fully, remaining,
    skip_bytes, with_file,
};
use jacobin_core::jvm_values::{java_bytes_from_host_bytes, Value};
use jacobin_core::native_method_area::{
    clinit_generic, trap_function, with_gfunction_table, GFunctionResult,
};
use log::debug;

pub const FILE_INPUT_STREAM_CLASS: &str = "java/io/FileInputStream";

/// Both `<init>(File)` and `<init>(String)`.
fn fis_init(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.<init>";
    let this = object_arg(args, 0, who)?;
    let path = path_arg(args, 1, who)?;
    let file = open_for_read(&path, who)?;
    debug!("{}: opened {}", who, path);
    attach_handle(&this, &path, file);
    Ok(None)
}

fn fis_available(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.available()";
    let this = object_arg(args, 0, who)?;
    let left = with_file(&this, who, remaining)?;
    Ok(Some(Value::Int(left.min(i32::MAX as u64) as i64)))
}

fn fis_close(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.close()";
    let obj = object_arg(args, 0, who)?;
    close_handle(&obj, who)?;
    Ok(None)
}

fn fis_read_one(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.read()";
    let this = object_arg(args, 0, who)?;
    let byte = with_file(&this, who, read_byte)?;
    Ok(Some(Value::Int(byte.map_or(-1, |b| b as i64))))
}

/// Reads into `array[off..off+len]`; `-1` at end of file, `0` when `len` is 0.
fn read_into(args: &[Value], off_len: Option<(i64, i64)>, who: &str) -> GFunctionResult {
    let this = object_arg(args, 0, who)?;
    let array = object_arg(args, 1, who)?;
    let length = byte_array(&array, who)?.len();
    let (off, len) = match off_len {
        Some((off, len)) => check_bounds(length, off, len, who)?,
        None => (0, length),
    };
    if len == 0 {
        return Ok(Some(Value::Int(0)));
    }
    let mut buf = vec![0u8; len];
    let count = with_file(&this, who, |file| read_fully(file, &mut buf))?;
    if count == 0 {
        return Ok(Some(Value::Int(-1)));
    }
    store_bytes(&array, off, &java_bytes_from_host_bytes(&buf[..count]), who)?;
    Ok(Some(Value::Int(count as i64)))
}

fn fis_read_array(args: &[Value]) -> GFunctionResult {
    read_into(args, None, "FileInputStream.read([B)")
}

fn fis_read_range(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.read([BII)";
    read_into(args, Some((int_arg(args, 2, who)?, int_arg(args, 3, who)?)), who)
}

/// Unlike `read`, reports `0` rather than `-1` at end of file.
fn fis_read_n_bytes(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.readNBytes([BII)";
    let count = read_into(args, Some((int_arg(args, 2, who)?, int_arg(args, 3, who)?)), who)?;
    match count {
        Some(Value::Int(-1)) => Ok(Some(Value::Int(0))),
        other => Ok(other),
    }
}

fn fis_skip(args: &[Value]) -> GFunctionResult {
    let who = "FileInputStream.skip(J)";
    let this = object_arg(args, 0, who)?;
    let n = int_arg(args, 1, who)?;
    let skipped = with_file(&this, who, |file| skip_bytes(file, n))?;
    Ok(Some(Value::Int(skipped)))
}

pub fn load_file_input_stream() {
    with_gfunction_table(|t| {
        let c = FILE_INPUT_STREAM_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;)V", 1, fis_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, fis_init);
        t.registry_gfunction(c, "<init>", "(Ljava/io/FileDescriptor;)V", 1, trap_function);
        t.registry_gfunction(c, "available", "()I", 0, fis_available);
        t.registry_gfunction(c, "close", "()V", 0, fis_close);
        t.registry_gfunction(c, "getChannel", "()Ljava/nio/channels/FileChannel;", 0, trap_function);
        t.registry_gfunction(c, "getFD", "()Ljava/io/FileDescriptor;", 0, trap_function);
        t.registry_gfunction(c, "read", "()I", 0, fis_read_one);
        t.registry_gfunction(c, "read", "([B)I", 1, fis_read_array);
        t.registry_gfunction(c, "read", "([BII)I", 3, fis_read_range);
        t.registry_gfunction(c, "readNBytes", "([BII)I", 3, fis_read_n_bytes);
        t.registry_gfunction(c, "skip", "(J)J", 1, fis_skip);
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::java_io_file_input_stream::FILE_INPUT_STREAM_CLASS;
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{make_array_object, make_empty_object_with_class_name, FieldValue};
    use std::fs;

    fn open(name: &str, contents: &[u8]) -> (Value, std::path::PathBuf) {
        load_gfunctions();
        let path = std::env::temp_dir().join(format!("jacobin_fis_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        let stream = Value::ObjectRef(make_empty_object_with_class_name(FILE_INPUT_STREAM_CLASS));
        invoke(
            "java/io/FileInputStream.<init>(Ljava/lang/String;)V",
            &[stream.clone(), string_value(&path.to_string_lossy())],
        )
        .unwrap();
        (stream, path)
    }

    fn call(key: &str, args: &[Value]) -> Value {
        invoke(&format!("java/io/FileInputStream.{}", key), args).unwrap().unwrap()
    }

    #[test]
    fn test_read_bytes_then_eof() {
        let (stream, path) = open("bytes", &[0x41, 0xff, 0x43]);
        assert_eq!(call("available()I", &[stream.clone()]), Value::Int(3));
        assert_eq!(call("read()I", &[stream.clone()]), Value::Int(0x41));
        assert_eq!(call("read()I", &[stream.clone()]), Value::Int(0xff));

        let array = make_array_object("[B", FieldValue::Bytes(vec![0; 4]));
        let arr = Value::ObjectRef(array.clone());
        assert_eq!(call("read([BII)I", &[stream.clone(), arr.clone(), Value::Int(1), Value::Int(3)]), Value::Int(1));
        assert!(matches!(array.get_field_value("value"), Some(FieldValue::Bytes(b)) if b == vec![0, 0x43, 0, 0]));
        assert_eq!(call("read([B)I", &[stream.clone(), arr.clone()]), Value::Int(-1));
        assert_eq!(call("read()I", &[stream.clone()]), Value::Int(-1));
        assert_eq!(call("read()I", &[stream.clone()]), Value::Int(-1));
        assert_eq!(call("readNBytes([BII)I", &[stream.clone(), arr, Value::Int(0), Value::Int(2)]), Value::Int(0));

        invoke("java/io/FileInputStream.close()V", &[stream.clone()]).unwrap();
        invoke("java/io/FileInputStream.close()V", &[stream.clone()]).unwrap();
        let err = invoke("java/io/FileInputStream.read()I", &[stream]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IOException);
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_bounds_and_skip() {
        let (stream, path) = open("skip", b"abcdef");
        let arr = Value::ObjectRef(make_array_object("[B", FieldValue::Bytes(vec![0; 4])));
        let err = invoke(
            "java/io/FileInputStream.read([BII)I",
            &[stream.clone(), arr.clone(), Value::Int(2), Value::Int(3)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IndexOutOfBoundsException);
        assert_eq!(call("read([BII)I", &[stream.clone(), arr, Value::Int(4), Value::Int(0)]), Value::Int(0));
        assert_eq!(call("skip(J)J", &[stream.clone(), Value::Int(4)]), Value::Int(4));
        assert_eq!(call("read()I", &[stream.clone()]), Value::Int(b'e' as i64));
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        load_gfunctions();
        let stream = Value::ObjectRef(make_empty_object_with_class_name(FILE_INPUT_STREAM_CLASS));
        let err = invoke(
            "java/io/FileInputStream.<init>(Ljava/lang/String;)V",
            &[stream, string_value("/definitely/not/here/jacobin.txt")],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::FileNotFoundException);
    }
}
