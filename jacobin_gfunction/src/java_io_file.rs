use crate::gfunction_helpers::{illegal_argument, object_arg, optional_object_arg, string_value};
use crate::java_io_helpers::{file_path_of, io_error, set_file_path};
use jacobin_core::java_exception::{get_error_block, ErrorBlock, ExceptionKind};
use jacobin_core::jvm_values::Value;
use jacobin_core::native_method_area::{clinit_generic, with_gfunction_table, GFunctionResult};
use jacobin_core::object::{
    string_from_string_object, string_object_from_str, FieldValue, Object, STRING_DESCRIPTOR,
};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{self, Path, MAIN_SEPARATOR};

pub const FILE_CLASS: &str = "java/io/File";

/// The absolute path stored by `<init>`.
fn absolute_path(obj: &Object, who: &str) -> Result<String, ErrorBlock> {
    file_path_of(obj).ok_or_else(|| {
        get_error_block(
            ExceptionKind::IOException,
            format!("{}: File object lacks a FilePath field", who),
        )
    })
}

fn this_path(args: &[Value], who: &str) -> Result<String, ErrorBlock> {
    let obj = object_arg(args, 0, who)?;
    absolute_path(&obj, who)
}

fn file_init(args: &[Value]) -> GFunctionResult {
    let who = "File.<init>(String)";
    let this = object_arg(args, 0, who)?;
    let given = match optional_object_arg(args, 1, who)? {
        Some(obj) => string_from_string_object(&obj)
            .ok_or_else(|| illegal_argument(who, "argument is not a String"))?,
        None => {
            return Err(get_error_block(
                ExceptionKind::NullPointerException,
                format!("{}: path is null", who),
            ))
        }
    };
    let absolute = if given.is_empty() {
        given.clone()
    } else {
        path::absolute(&given)
            .map_err(|err| io_error(who, err))?
            .to_string_lossy()
            .into_owned()
    };
    this.set_field("path", STRING_DESCRIPTOR, FieldValue::Ref(string_object_from_str(&given)));
    set_file_path(&this, &absolute);
    this.set_field("separatorChar", "C", FieldValue::Int(MAIN_SEPARATOR as i64));
    Ok(None)
}

fn file_get_path(args: &[Value]) -> GFunctionResult {
    let this = object_arg(args, 0, "File.getPath()")?;
    match this.ref_field("path") {
        Some(path) => Ok(Some(Value::ObjectRef(path))),
        None => Ok(Some(string_value(&absolute_path(&this, "File.getPath()")?))),
    }
}

fn file_get_absolute_path(args: &[Value]) -> GFunctionResult {
    Ok(Some(string_value(&this_path(args, "File.getAbsolutePath()")?)))
}

fn file_get_name(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.getName()")?;
    let name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(string_value(&name)))
}

fn file_exists(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.exists()")?;
    Ok(Some(Value::bool(Path::new(&path).exists())))
}

fn file_is_file(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.isFile()")?;
    Ok(Some(Value::bool(Path::new(&path).is_file())))
}

fn file_is_directory(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.isDirectory()")?;
    Ok(Some(Value::bool(Path::new(&path).is_dir())))
}

/// Size in bytes, `0` when the file does not exist.
fn file_length(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.length()")?;
    let len = fs::metadata(&path).map(|m| m.len() as i64).unwrap_or(0);
    Ok(Some(Value::Int(len)))
}

fn file_delete(args: &[Value]) -> GFunctionResult {
    let path = this_path(args, "File.delete()")?;
    let target = Path::new(&path);
    let removed = if target.is_dir() {
        fs::remove_dir(target)
    } else {
        fs::remove_file(target)
    };
    Ok(Some(Value::bool(removed.is_ok())))
}

/// `true` if a new empty file was created, `false` if it already existed.
fn file_create_new_file(args: &[Value]) -> GFunctionResult {
    let who = "File.createNewFile()";
    let path = this_path(args, who)?;
    match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(_) => Ok(Some(Value::bool(true))),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(Some(Value::bool(false))),
        Err(err) => Err(io_error(who, err)),
    }
}

pub fn load_file() {
    with_gfunction_table(|t| {
        let c = FILE_CLASS;
        t.registry_gfunction(c, "<clinit>", "()V", 0, clinit_generic);
        t.registry_gfunction(c, "<init>", "(Ljava/lang/String;)V", 1, file_init);
        t.registry_gfunction(c, "createNewFile", "()Z", 0, file_create_new_file);
        t.registry_gfunction(c, "delete", "()Z", 0, file_delete);
        t.registry_gfunction(c, "exists", "()Z", 0, file_exists);
        t.registry_gfunction(c, "getAbsolutePath", "()Ljava/lang/String;", 0, file_get_absolute_path);
        t.registry_gfunction(c, "getName", "()Ljava/lang/String;", 0, file_get_name);
        t.registry_gfunction(c, "getPath", "()Ljava/lang/String;", 0, file_get_path);
        t.registry_gfunction(c, "isDirectory", "()Z", 0, file_is_directory);
        t.registry_gfunction(c, "isFile", "()Z", 0, file_is_file);
        t.registry_gfunction(c, "length", "()J", 0, file_length);
    });
}
