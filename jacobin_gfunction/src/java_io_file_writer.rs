use crate::gfunction_helpers::{check_bounds, int_arg, int_array, object_arg, string_arg};
use crate::java_io_file_output_stream::{open_writer, sync_file, write_bytes};
use crate::java_io_helpers::{close_handle, encode_chars};
use jacobin_core::java_exception::ErrorBlock;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{
    clinit_generic, return_charset_name, with_gfunction_table, GFunctionResult,
};

pub const FILE_WRITER_CLASS: &str = "java/io/FileWriter";

fn writer_init(args: &[Value]) -> GFunctionResult {
    open_writer(args, "FileWriter.<init>")?;
    Ok(None)
}

pub fn writer_close(args: &[Value]) -> GFunctionResult {
    let who = "Writer.close()";
    let obj = object_arg(args, 0, who)?;
    close_handle(&obj, who)?;
    Ok(None)
}

pub fn writer_flush(args: &[Value]) -> GFunctionResult {
    let who = "Writer.flush()";
    let obj = object_arg(args, 0, who)?;
    sync_file(&obj, who)?;
    Ok(None)
}

/// Writes the low sixteen bits of `args[1]` as one character.
pub fn writer_write_char(args: &[Value]) -> GFunctionResult {
    let who = "Writer.write(I)";
    let this = object_arg(args, 0, who)?;
    let ch = int_arg(args, 1, who)? & 0xffff;
    write_bytes(&this, &encode_chars(&[ch]), who)?;
    Ok(None)
}

/// `len` characters of `text` starting at `off`, counted in chars.
pub fn write_substring(args: &[Value], who: &str) -> Result<(), ErrorBlock> {
    let this = object_arg(args, 0, who)?;
    let text: Vec<i64> = string_arg(args, 1, who)?
        .encode_utf16()
        .map(|unit| unit as i64)
        .collect();
    let (off, len) = check_bounds(text.len(), int_arg(args, 2, who)?, int_arg(args, 3, who)?, who)?;
    if len > 0 {
        write_bytes(&this, &encode_chars(&text[off..off + len]), who)?;
    }
    Ok(())
}

pub fn writer_write_string_range(args: &[Value]) -> GFunctionResult {
    write_substring(args, "Writer.write(String,II)")?;
    Ok(None)
}

fn writer_write_string(args: &[Value]) -> GFunctionResult {
    let who = "Writer.write(String)";
    let this = object_arg(args, 0, who)?;
    let text = string_arg(args, 1, who)?;
    write_bytes(&this, text.as_bytes(), who)?;
    Ok(None)
}

pub fn writer_write_chars(args: &[Value]) -> GFunctionResult {
    let who = "Writer.write([CII)";
    let this = object_arg(args, 0, who)?;
    let chars = int_array(&object_arg(args, 1, who)?, who)?;
    let (off, len) = check_bounds(chars.len(), int_arg(args, 2, who)?, int_arg(args, 3, who)?, who)?;
    if len > 0 {
        write_bytes(&this, &encode_chars(&chars[off..off + len]), who)?;
    }
    Ok(None)
}

pub fn load_file_writer() {
    with_gfunction_table(|t| {
        let c = FILE_WRITER_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;)V", 1, writer_init);
        t.registry_gfunction(c, "<init>", "(Ljava/io/File;Z)V", 2, writer_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, writer_init);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;Z)V", 2, writer_init);
        t.registry_gfunction(c, "close", "()V", 0, writer_close);
        t.registry_gfunction(c, "flush", "()V", 0, writer_flush);
        t.registry_gfunction(c, "getEncoding", "()Ljava/lang/String;", 0, return_charset_name);
        t.registry_gfunction(c, "write", "(I)V", 1, writer_write_char);
        t.registry_gfunction(c, "write", "(Ljava/lang/String;)V", 1, writer_write_string);
        t.registry_gfunction(c, "write", "(Ljava/lang/String;II)V", 3, writer_write_string_range);
        t.registry_gfunction(c, "write", "([CII)V", 3, writer_write_chars);
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::java_io_file_writer::FILE_WRITER_CLASS;
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::{make_array_object, make_empty_object_with_class_name, FieldValue};
    use std::fs;

    #[test]
    fn test_writer_variants() {
        load_gfunctions();
        let path = std::env::temp_dir().join(format!("jacobin_writer_{}", std::process::id()));
        let writer = Value::ObjectRef(make_empty_object_with_class_name(FILE_WRITER_CLASS));
        invoke(
            "java/io/FileWriter.<init>(Ljava/lang/String;)V",
            &[writer.clone(), string_value(&path.to_string_lossy())],
        )
        .unwrap();
        invoke("java/io/FileWriter.write(Ljava/lang/String;)V", &[writer.clone(), string_value("ab")]).unwrap();
        invoke("java/io/FileWriter.write(I)V", &[writer.clone(), Value::Int(0xe9)]).unwrap();
        invoke(
            "java/io/FileWriter.write(Ljava/lang/String;II)V",
            &[writer.clone(), string_value("xyz"), Value::Int(1), Value::Int(2)],
        )
        .unwrap();
        let chars = Value::ObjectRef(make_array_object("[C", FieldValue::Ints(vec!['!' as i64, '?' as i64])));
        invoke(
            "java/io/FileWriter.write([CII)V",
            &[writer.clone(), chars.clone(), Value::Int(1), Value::Int(1)],
        )
        .unwrap();
        let err = invoke(
            "java/io/FileWriter.write([CII)V",
            &[writer.clone(), chars, Value::Int(1), Value::Int(2)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IndexOutOfBoundsException);
        invoke("java/io/FileWriter.flush()V", &[writer.clone()]).unwrap();
        invoke("java/io/FileWriter.close()V", &[writer]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "abéyz?");
        fs::remove_file(path).unwrap();
    }
}
