use crate::gfunction_helpers::{check_bounds, int_arg, int_array, object_arg, store_ints};
use crate::java_io_helpers::{
    attach_handle, close_handle, open_for_read, path_arg, read_char, read_chars, remaining,
    skip_bytes, with_file,
};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{
    clinit_generic, return_charset_name, return_false, with_gfunction_table, GFunctionResult,
};
use log::debug;

pub const FILE_READER_CLASS: &str = "java/io/FileReader";

fn reader_init(args: &[Value]) -> GFunctionResult {
    let who = "FileReader.<init>";
    let this = object_arg(args, 0, who)?;
    let path = path_arg(args, 1, who)?;
    let file = open_for_read(&path, who)?;
    debug!("{}: opened {}", who, path);
    attach_handle(&this, &path, file);
    Ok(None)
}

pub fn reader_close(args: &[Value]) -> GFunctionResult {
    let who = "Reader.close()";
    let obj = object_arg(args, 0, who)?;
    close_handle(&obj, who)?;
    Ok(None)
}

/// One character, or `-1` at end of file.
pub fn reader_read_one(args: &[Value]) -> GFunctionResult {
    let who = "Reader.read()";
    let this = object_arg(args, 0, who)?;
    let ch = with_file(&this, who, read_char)?;
    Ok(Some(Value::Int(ch.map_or(-1, |c| c as i64))))
}

fn read_into(args: &[Value], off_len: Option<(i64, i64)>, who: &str) -> GFunctionResult {
    let this = object_arg(args, 0, who)?;
    let array = object_arg(args, 1, who)?;
    let length = int_array(&array, who)?.len();
    let (off, len) = match off_len {
        Some((off, len)) => check_bounds(length, off, len, who)?,
        None => (0, length),
    };
    if len == 0 {
        return Ok(Some(Value::Int(0)));
    }
    match with_file(&this, who, |file| read_chars(file, len))? {
        Some(chars) => {
            store_ints(&array, off, &chars, who)?;
            Ok(Some(Value::Int(chars.len() as i64)))
        }
        None => Ok(Some(Value::Int(-1))),
    }
}

fn reader_read_array(args: &[Value]) -> GFunctionResult {
    read_into(args, None, "Reader.read([C)")
}

pub fn reader_read_range(args: &[Value]) -> GFunctionResult {
    let who = "Reader.read([CII)";
    read_into(args, Some((int_arg(args, 2, who)?, int_arg(args, 3, who)?)), who)
}

/// True while unread bytes remain.
pub fn reader_ready(args: &[Value]) -> GFunctionResult {
    let who = "Reader.ready()";
    let this = object_arg(args, 0, who)?;
    let left = with_file(&this, who, remaining)?;
    Ok(Some(Value::bool(left > 0)))
}

fn reader_skip(args: &[Value]) -> GFunctionResult {
    let who = "Reader.skip(J)";
    let this = object_arg(args, 0, who)?;
    let n = int_arg(args, 1, who)?;
    let skipped = with_file(&this, who, |file| skip_bytes(file, n))?;
    Ok(Some(Value::Int(skipped)))
}

pub fn load_file_reader() {
    with_gfunction_table(|t| {
        let c = FILE_READER_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;)V", 1, reader_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, reader_init);
        t.registry_gfunction(c, "close", "()V", 0, reader_close);
        t.registry_gfunction(c, "getEncoding", "()Ljava/lang/String;", 0, return_charset_name);
        t.registry_gfunction(c, "markSupported", "()Z", 0, return_false);
        t.registry_gfunction(c, "read", "()I", 0, reader_read_one);
        t.registry_gfunction(c, "read", "([C)I", 1, reader_read_array);
        t.registry_gfunction(c, "read", "([CII)I", 3, reader_read_range);
        t.registry_gfunction(c, "ready", "()Z", 0, reader_ready);
        t.registry_gfunction(c, "skip", "(J)J", 1, reader_skip);
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::java_io_file_reader::FILE_READER_CLASS;
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{make_array_object, make_empty_object_with_class_name, FieldValue};
    use std::fs;

    fn call(key: &str, args: &[Value]) -> Value {
        invoke(&format!("java/io/FileReader.{}", key), args).unwrap().unwrap()
    }

    #[test]
    fn test_read_chars() {
        load_gfunctions();
        let path = std::env::temp_dir().join(format!("jacobin_reader_{}", std::process::id()));
        fs::write(&path, "héllo").unwrap();
        let reader = Value::ObjectRef(make_empty_object_with_class_name(FILE_READER_CLASS));
        invoke(
            "java/io/FileReader.<init>(Ljava/lang/String;)V",
            &[reader.clone(), string_value(&path.to_string_lossy())],
        )
        .unwrap();

        assert_eq!(call("markSupported()Z", &[reader.clone()]), Value::Int(0));
        assert_eq!(call("ready()Z", &[reader.clone()]), Value::Int(1));
        assert_eq!(call("read()I", &[reader.clone()]), Value::Int('h' as i64));
        assert_eq!(call("read()I", &[reader.clone()]), Value::Int(0xe9));

        let array = make_array_object("[C", FieldValue::Ints(vec![0; 5]));
        let arr = Value::ObjectRef(array.clone());
        assert_eq!(call("read([CII)I", &[reader.clone(), arr.clone(), Value::Int(2), Value::Int(3)]), Value::Int(3));
        assert!(matches!(
            array.get_field_value("value"),
            Some(FieldValue::Ints(c)) if c == vec![0, 0, 'l' as i64, 'l' as i64, 'o' as i64]
        ));
        assert_eq!(call("ready()Z", &[reader.clone()]), Value::Int(0));
        assert_eq!(call("read([C)I", &[reader.clone(), arr.clone()]), Value::Int(-1));
        assert_eq!(call("read()I", &[reader.clone()]), Value::Int(-1));

        let err = invoke(
            "java/io/FileReader.read([CII)I",
            &[reader.clone(), arr, Value::Int(-1), Value::Int(1)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IndexOutOfBoundsException);

        invoke("java/io/FileReader.close()V", &[reader.clone()]).unwrap();
        let err = invoke("java/io/FileReader.ready()Z", &[reader]).unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IOException);
        fs::remove_file(path).unwrap();
    }
}
