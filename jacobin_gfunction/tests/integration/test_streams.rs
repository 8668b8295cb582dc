use crate::utils::{construct, init_logger, string, text};
use jacobin_core::java_exception::ExceptionKind;
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::invoke;
use jacobin_core::object::{make_array_object, FieldValue};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("jacobin_it_{}_{}", std::process::id(), name));
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_read_line_sequence() {
    init_logger();
    let path = temp_file("lines", b"Line1\r\nLine2\nLine3");
    let file = construct("java/io/File", "(Ljava/lang/String;)V", &[string(&path.to_string_lossy())]);
    let reader = construct("java/io/FileReader", "(Ljava/io/File;)V", &[file]);
    let buffered = construct("java/io/BufferedReader", "(Ljava/io/Reader;)V", &[reader]);
    let read_line = || {
        invoke("java/io/BufferedReader.readLine()Ljava/lang/String;", &[buffered.clone()])
            .unwrap()
            .unwrap()
    };
    assert_eq!(text(&read_line()).as_deref(), Some("Line1"));
    assert_eq!(text(&read_line()).as_deref(), Some("Line2"));
    assert_eq!(text(&read_line()).as_deref(), Some("Line3"));
    assert_eq!(read_line(), Value::Null);
    assert_eq!(read_line(), Value::Null);
    invoke("java/io/BufferedReader.close()V", &[buffered]).unwrap();
    fs::remove_file(path).unwrap();
}

#[test]
fn test_read_stays_at_eof() {
    init_logger();
    let path = temp_file("eof", b"z");
    let stream = construct("java/io/FileInputStream", "(Ljava/lang/String;)V", &[string(&path.to_string_lossy())]);
    let read = || invoke("java/io/FileInputStream.read()I", &[stream.clone()]).unwrap().unwrap();
    assert_eq!(read(), Value::Int('z' as i64));
    for _ in 0..3 {
        assert_eq!(read(), Value::Int(-1));
    }
    fs::remove_file(path).unwrap();
}

#[test]
fn test_bounds_are_reported() {
    init_logger();
    let path = temp_file("bounds", b"0123456789");
    let input = construct("java/io/FileInputStream", "(Ljava/lang/String;)V", &[string(&path.to_string_lossy())]);
    let output = construct(
        "java/io/FileOutputStream",
        "(Ljava/lang/String;Z)V",
        &[string(&path.to_string_lossy()), Value::Int(1)],
    );
    let array = Value::ObjectRef(make_array_object("[B", FieldValue::Bytes(vec![0; 5])));
    for (off, len) in [(0, 6), (3, 3), (5, 1), (-1, 2)] {
        let read = invoke(
            "java/io/FileInputStream.read([BII)I",
            &[input.clone(), array.clone(), Value::Int(off), Value::Int(len)],
        )
        .unwrap_err();
        assert_eq!(read.kind, ExceptionKind::IndexOutOfBoundsException);
        let write = invoke(
            "java/io/FileOutputStream.write([BII)V",
            &[output.clone(), array.clone(), Value::Int(off), Value::Int(len)],
        )
        .unwrap_err();
        assert_eq!(write.kind, ExceptionKind::IndexOutOfBoundsException);
    }
    invoke("java/io/FileOutputStream.close()V", &[output]).unwrap();
    invoke("java/io/FileInputStream.close()V", &[input]).unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"0123456789");
    fs::remove_file(path).unwrap();
}
