use crate::gfunction_helpers::{int_arg, object_arg, optional_object_arg};
use crate::java_io_file_output_stream::write_bytes;
use crate::java_io_file_writer::{
    writer_close, writer_flush, writer_write_char, writer_write_chars, writer_write_string_range,
};
use crate::java_io_helpers::{encode_chars, share_handle};
use crate::string_coercion::object_string;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{clinit_generic, with_gfunction_table, GFunctionResult};

pub const BUFFERED_WRITER_CLASS: &str = "java/io/BufferedWriter";

/// `<init>(Writer)` and `<init>(Writer,I)`; the buffer size is ignored.
fn buffered_writer_init(args: &[Value]) -> GFunctionResult {
    let who = "BufferedWriter.<init>";
    let this = object_arg(args, 0, who)?;
    let writer = object_arg(args, 1, who)?;
    share_handle(&this, &writer, who)?;
    Ok(None)
}

fn buffered_writer_new_line(args: &[Value]) -> GFunctionResult {
    let who = "BufferedWriter.newLine()";
    let obj = object_arg(args, 0, who)?;
    write_bytes(&obj, b"\n", who)?;
    Ok(None)
}

fn buffered_writer_append_char(args: &[Value]) -> GFunctionResult {
    let who = "BufferedWriter.append(C)";
    let this = object_arg(args, 0, who)?;
    let ch = int_arg(args, 1, who)? & 0xffff;
    write_bytes(&this, &encode_chars(&[ch]), who)?;
    Ok(Some(Value::ObjectRef(this)))
}

/// A null sequence appends the four characters `null`.
fn buffered_writer_append_sequence(args: &[Value]) -> GFunctionResult {
    let who = "BufferedWriter.append(CharSequence)";
    let this = object_arg(args, 0, who)?;
    let text = match optional_object_arg(args, 1, who)? {
        Some(seq) => object_string(&seq)?,
        None => "null".to_string(),
    };
    write_bytes(&this, text.as_bytes(), who)?;
    Ok(Some(Value::ObjectRef(this)))
}

pub fn load_buffered_writer() {
    with_gfunction_table(|t| {
        let c = BUFFERED_WRITER_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/io/Writer;)V", 1, buffered_writer_init);
        t.registry_gfunction(c, "<init>", "(Ljava/io/Writer;I)V", 2, buffered_writer_init);
        t.registry_gfunction(c, "append", "(C)Ljava/io/Writer;", 1, buffered_writer_append_char);
        t.registry_gfunction(
            c,
            "append",
            "(Ljava/lang/CharSequence;)Ljava/io/Writer;",
            1,
            buffered_writer_append_sequence,
        );
        t.registry_gfunction(c, "close", "()V", 0, writer_close);
        t.registry_gfunction(c, "flush", "()V", 0, writer_flush);
        t.registry_gfunction(c, "newLine", "()V", 0, buffered_writer_new_line);
        t.registry_gfunction(c, "write", "(I)V", 1, writer_write_char);
        t.registry_gfunction(c, "write", "(Ljava/lang/String;II)V", 3, writer_write_string_range);
        t.registry_gfunction(c, "write", "([CII)V", 3, writer_write_chars);
    });
}

#[cfg(test)]
mod tests {
    use crate::gfunction_helpers::string_value;
    use crate::java_io_buffered_writer::BUFFERED_WRITER_CLASS;
    use crate::java_io_file_writer::FILE_WRITER_CLASS;
    use crate::load_gfunctions;
    use jacobin_core::java_exception::ExceptionKind;
    use jacobin_core::jvm_values::Value;
    use jacobin_core::native_method_area::invoke;
    use jacobin_core::object::make_empty_object_with_class_name;
    use std::fs;

    #[test]
    fn test_buffered_writer() {
        load_gfunctions();
        let path = std::env::temp_dir().join(format!("jacobin_bwriter_{}", std::process::id()));
        let writer = Value::ObjectRef(make_empty_object_with_class_name(FILE_WRITER_CLASS));
        invoke(
            "java/io/FileWriter.<init>(Ljava/lang/String;)V",
            &[writer.clone(), string_value(&path.to_string_lossy())],
        )
        .unwrap();
        let buffered = Value::ObjectRef(make_empty_object_with_class_name(BUFFERED_WRITER_CLASS));
        invoke("java/io/BufferedWriter.<init>(Ljava/io/Writer;I)V", &[buffered.clone(), writer, Value::Int(8)])
            .unwrap();

        invoke(
            "java/io/BufferedWriter.write(Ljava/lang/String;II)V",
            &[buffered.clone(), string_value("hello world"), Value::Int(0), Value::Int(5)],
        )
        .unwrap();
        invoke("java/io/BufferedWriter.newLine()V", &[buffered.clone()]).unwrap();
        let same = invoke("java/io/BufferedWriter.append(C)Ljava/io/Writer;", &[buffered.clone(), Value::Int('>' as i64)])
            .unwrap()
            .unwrap();
        assert_eq!(same, buffered);
        invoke(
            "java/io/BufferedWriter.append(Ljava/lang/CharSequence;)Ljava/io/Writer;",
            &[buffered.clone(), Value::Null],
        )
        .unwrap();
        let err = invoke(
            "java/io/BufferedWriter.write(Ljava/lang/String;II)V",
            &[buffered.clone(), string_value("abc"), Value::Int(2), Value::Int(2)],
        )
        .unwrap_err();
        assert_eq!(err.kind, ExceptionKind::IndexOutOfBoundsException);
        invoke("java/io/BufferedWriter.close()V", &[buffered.clone()]).unwrap();
        invoke("java/io/BufferedWriter.close()V", &[buffered]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n>null");
        fs::remove_file(path).unwrap();
    }
}
