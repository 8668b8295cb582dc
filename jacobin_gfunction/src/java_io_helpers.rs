use crate::gfunction_helpers::{arg, illegal_argument, null_pointer};
use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::{host_string_from_java_bytes, java_bytes_from_host_string, HostResource, Value};
use jacobin_core::object::{string_from_string_object, FieldValue, Object};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::sync::Arc;

pub const FILE_PATH: &str = "FilePath";
pub const FILE_HANDLE: &str = "FileHandle";
pub const EOF: &str = "EOF";

pub fn io_error(who: &str, err: io::Error) -> ErrorBlock {
    get_error_block(ExceptionKind::IOException, format!("{}: {}", who, err))
}

pub fn set_file_path(obj: &Object, path: &str) {
    obj.set_field(FILE_PATH, "[B", FieldValue::Bytes(java_bytes_from_host_string(path)));
}

pub fn file_path_of(obj: &Object) -> Option<String> {
    match obj.get_field_value(FILE_PATH)? {
        FieldValue::Bytes(bytes) => Some(host_string_from_java_bytes(&bytes)),
        _ => None,
    }
}

/// A path given either as a String or as an object carrying `FilePath` (a `java/io/File`).
pub fn path_arg(args: &[Value], index: usize, who: &str) -> Result<String, ErrorBlock> {
    match arg(args, index, who)? {
        Value::ObjectRef(obj) => string_from_string_object(obj)
            .or_else(|| file_path_of(obj))
            .ok_or_else(|| illegal_argument(who, "argument is neither a String nor a File")),
        Value::Null => Err(null_pointer(who, "path is null")),
        _ => Err(illegal_argument(who, "argument is not an object")),
    }
}

pub fn open_for_read(path: &str, who: &str) -> Result<File, ErrorBlock> {
    File::open(path).map_err(|err| {
        get_error_block(
            ExceptionKind::FileNotFoundException,
            format!("{}: open({}) failed: {}", who, path, err),
        )
    })
}

/// Truncating create, or `O_APPEND|O_CREAT|O_WRONLY` when `append`; new files get mode 0644.
pub fn open_for_write(path: &str, append: bool, who: &str) -> Result<File, ErrorBlock> {
    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path).map_err(|err| {
        get_error_block(
            ExceptionKind::FileNotFoundException,
            format!("{}: open({}) failed: {}", who, path, err),
        )
    })
}

pub fn attach_handle(obj: &Object, path: &str, file: File) {
    set_file_path(obj, path);
    obj.set_field(FILE_HANDLE, "Ljava/io/FileDescriptor;", FieldValue::Raw(HostResource::from_file(file)));
    obj.set_field(EOF, "Z", FieldValue::Int(0));
}

pub fn handle_of(obj: &Object, who: &str) -> Result<Arc<HostResource>, ErrorBlock> {
    match obj.get_field_value(FILE_HANDLE) {
        Some(FieldValue::Raw(handle)) => Ok(handle),
        _ => Err(get_error_block(
            ExceptionKind::IOException,
            format!("{}: object lacks a FileHandle field", who),
        )),
    }
}

/// Shares `from`'s path and host handle with `to`, as a wrapping reader or writer does.
pub fn share_handle(to: &Object, from: &Object, who: &str) -> Result<(), ErrorBlock> {
    let handle = handle_of(from, who).map_err(|_| {
        get_error_block(
            ExceptionKind::InvalidTypeException,
            format!("{}: argument lacks a FileHandle field", who),
        )
    })?;
    to.set_field(FILE_PATH, "[B", from.get_field_value(FILE_PATH).unwrap_or(FieldValue::Null));
    to.set_field(FILE_HANDLE, "Ljava/io/FileDescriptor;", FieldValue::Raw(handle));
    to.set_field(EOF, "Z", FieldValue::Int(0));
    Ok(())
}

/// Runs `op` on the open file behind `obj`; a closed stream is an `IOException`.
pub fn with_file<R>(
    obj: &Object,
    who: &str,
    op: impl FnOnce(&mut File) -> io::Result<R>,
) -> Result<R, ErrorBlock> {
    let handle = handle_of(obj, who)?;
    match handle.as_ref() {
        HostResource::File(slot) => {
            let mut guard = slot.lock();
            let file = guard.as_mut().ok_or_else(|| {
                get_error_block(ExceptionKind::IOException, format!("{}: stream closed", who))
            })?;
            op(file).map_err(|err| io_error(who, err))
        }
        other => Err(illegal_argument(who, &format!("{:?} is not a file handle", other))),
    }
}

/// Drops the host file. Closing twice is allowed; later I/O fails.
pub fn close_handle(obj: &Object, who: &str) -> Result<(), ErrorBlock> {
    if let HostResource::File(slot) = handle_of(obj, who)?.as_ref() {
        drop(slot.lock().take());
    }
    Ok(())
}

pub fn eof_get(obj: &Object) -> bool {
    obj.int_field(EOF).is_some_and(|v| v != 0)
}

pub fn eof_set(obj: &Object, value: bool) {
    obj.set_field(EOF, "Z", FieldValue::Int(value as i64));
}

pub fn read_byte(file: &mut File) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match file.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}

/// Fills as much of `buf` as the file provides; returns the count, 0 only at end of file.
pub fn read_fully(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match file.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(total)
}

/// Bytes between the current position and the end of the file.
pub fn remaining(file: &mut File) -> io::Result<u64> {
    let len = file.metadata()?.len();
    let pos = file.stream_position()?;
    Ok(len.saturating_sub(pos))
}

pub fn skip_bytes(file: &mut File, n: i64) -> io::Result<i64> {
    if n <= 0 {
        return Ok(0);
    }
    file.seek(SeekFrom::Current(n))?;
    Ok(n)
}

/// Decodes one UTF-8 character; malformed input yields U+FFFD.
pub fn read_char(file: &mut File) -> io::Result<Option<u32>> {
    let first = match read_byte(file)? {
        Some(b) => b,
        None => return Ok(None),
    };
    let extra = match first {
        0x00..=0x7f => return Ok(Some(first as u32)),
        0xc0..=0xdf => 1,
        0xe0..=0xef => 2,
        0xf0..=0xf7 => 3,
        _ => return Ok(Some(char::REPLACEMENT_CHARACTER as u32)),
    };
    let mut bytes = vec![first];
    for _ in 0..extra {
        match read_byte(file)? {
            Some(b) => bytes.push(b),
            None => break,
        }
    }
    let decoded = std::str::from_utf8(&bytes)
        .ok()
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Ok(Some(decoded as u32))
}

/// Reads up to `len` characters; `None` when the file is already exhausted.
pub fn read_chars(file: &mut File, len: usize) -> io::Result<Option<Vec<i64>>> {
    let mut chars = Vec::with_capacity(len);
    while chars.len() < len {
        match read_char(file)? {
            Some(c) => chars.push(c as i64),
            None => break,
        }
    }
    if chars.is_empty() && len > 0 {
        Ok(None)
    } else {
        Ok(Some(chars))
    }
}

const LINE_BUFFER: usize = 8192;

/// A line without its terminator; `\r` bytes are dropped. `None` at end of file.
/// Bytes buffered past the terminator are given back with a seek.
pub fn read_line(file: &mut File) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut reader = BufReader::with_capacity(LINE_BUFFER, &mut *file);
    let count = reader.read_until(b'\n', &mut line)?;
    let unread = reader.buffer().len() as i64;
    drop(reader);
    if unread > 0 {
        file.seek(SeekFrom::Current(-unread))?;
    }
    if count == 0 {
        return Ok(None);
    }
    line.retain(|b| *b != b'\n' && *b != b'\r');
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// UTF-8 encoding of Java `char` values.
pub fn encode_chars(chars: &[i64]) -> Vec<u8> {
    let units: Vec<u16> = chars.iter().map(|c| *c as u16).collect();
    String::from_utf16_lossy(&units).into_bytes()
}
