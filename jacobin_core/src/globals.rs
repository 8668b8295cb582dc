use crate::java_exception::{minimal_abort, ExceptionKind};
use crate::jvm_error::{VmError, VmExecResult};
use crate::system_properties::build_system_properties;
use log::{error, info, warn};
use parking_lot::RwLock;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::LazyLock;
use std::time::SystemTime;

pub const MAX_JAVA_VERSION: u32 = 21;

/// Process-wide configuration, filled in once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Globals {
    pub prog_name: String,
    pub java_home: String,
    pub java_version: String,
    pub jdk_major_version: u32,
    pub jacobin_home: String,
    pub classpath: Vec<String>,
    pub classpath_raw: String,
    pub file_encoding: String,
    pub file_name_encoding: String,
    pub headless: bool,
    pub start_time: SystemTime,
    pub strict_jdk: bool,
    pub max_java_version: u32,
    pub version: String,
}

fn default_file_encoding() -> &'static str {
    if cfg!(windows) {
        "windows-1252"
    } else {
        "UTF-8"
    }
}

impl Default for Globals {
    fn default() -> Self {
        Globals {
            prog_name: String::new(),
            java_home: String::new(),
            java_version: String::new(),
            jdk_major_version: 0,
            jacobin_home: String::new(),
            classpath: Vec::new(),
            classpath_raw: String::new(),
            file_encoding: default_file_encoding().to_string(),
            file_name_encoding: default_file_encoding().to_string(),
            headless: false,
            start_time: SystemTime::now(),
            strict_jdk: false,
            max_java_version: MAX_JAVA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

static GLOBALS: LazyLock<RwLock<Globals>> = LazyLock::new(|| RwLock::new(Globals::default()));

/// Snapshot of the current configuration.
pub fn get_globals() -> Globals {
    GLOBALS.read().clone()
}

pub fn get_charset_name() -> String {
    GLOBALS.read().file_encoding.clone()
}

fn strip_trailing_separators(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() && !path.is_empty() {
        MAIN_SEPARATOR.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `JAVA_VERSION="x.y.z"` from a JDK `release` file: the full version and its major number.
/// A legacy `1.x` version has major `x`.
pub fn parse_java_version(release: &str) -> Option<(String, u32)> {
    let line = release
        .lines()
        .find_map(|line| line.trim().strip_prefix("JAVA_VERSION="))?;
    let version = line.trim().trim_matches('"').to_string();
    let mut parts = version.split('.');
    let first = parts.next()?;
    let major_text = if first == "1" { parts.next()? } else { first };
    let major = major_text.parse::<u32>().ok()?;
    Some((version, major))
}

fn read_java_version(java_home: &str) -> VmExecResult<(String, u32)> {
    if java_home.is_empty() {
        return Err(VmError::GlobalsInit("JAVA_HOME is not set".to_string()));
    }
    let release_path = Path::new(java_home).join("release");
    let release = std::fs::read_to_string(&release_path).map_err(|e| {
        VmError::GlobalsInit(format!("cannot read {}: {}", release_path.display(), e))
    })?;
    parse_java_version(&release).ok_or_else(|| {
        VmError::GlobalsInit(format!(
            "no usable JAVA_VERSION in {}",
            release_path.display()
        ))
    })
}

fn make_jacobin_home() -> VmExecResult<String> {
    let home = match std::env::var("JACOBIN_HOME") {
        Ok(value) if !value.is_empty() => value,
        _ => {
            let user_home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .map_err(|_| VmError::GlobalsInit("cannot determine home directory".to_string()))?;
            Path::new(&user_home)
                .join("jacobin_data")
                .to_string_lossy()
                .into_owned()
        }
    };
    let home = strip_trailing_separators(&home);
    create_dir_all_0755(Path::new(&home))?;
    Ok(home)
}

#[cfg(unix)]
fn create_dir_all_0755(path: &Path) -> VmExecResult<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o755)
        .create(path)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_dir_all_0755(path: &Path) -> VmExecResult<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

fn read_classpath() -> (String, Vec<String>) {
    match std::env::var_os("CLASSPATH") {
        Some(raw) if !raw.is_empty() => {
            let entries = std::env::split_paths(&raw)
                .map(|p: PathBuf| p.to_string_lossy().into_owned())
                .filter(|p| !p.is_empty())
                .collect();
            (raw.to_string_lossy().into_owned(), entries)
        }
        _ => {
            let cwd = std::env::current_dir()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| ".".to_string());
            (cwd.clone(), vec![cwd])
        }
    }
}

/// Populates the process globals and the system properties from the environment.
///
/// A missing or malformed `$JAVA_HOME/release` aborts the process unless `prog_name` is
/// `"test"`, in which case it is logged and left blank.
pub fn init_globals(prog_name: &str) -> VmExecResult<Globals> {
    let mut globals = Globals {
        prog_name: prog_name.to_string(),
        ..Globals::default()
    };

    globals.java_home = strip_trailing_separators(&std::env::var("JAVA_HOME").unwrap_or_default());
    match read_java_version(&globals.java_home) {
        Ok((version, major)) => {
            info!("java version {} (major {})", version, major);
            globals.java_version = version;
            globals.jdk_major_version = major;
        }
        Err(e) if prog_name == "test" => warn!("{}", e),
        Err(e) => {
            error!("{}", e);
            minimal_abort(ExceptionKind::InternalError, &e.to_string());
            return Err(e);
        }
    }

    match make_jacobin_home() {
        Ok(home) => globals.jacobin_home = home,
        Err(e) if prog_name == "test" => warn!("{}", e),
        Err(e) => return Err(e),
    }

    let (raw, entries) = read_classpath();
    globals.classpath_raw = raw;
    globals.classpath = entries;
    globals.headless = std::env::var("java.awt.headless")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    info!(
        "globals: java_home={} jacobin_home={} classpath={:?}",
        globals.java_home, globals.jacobin_home, globals.classpath
    );
    *GLOBALS.write() = globals.clone();
    build_system_properties(&globals);
    Ok(globals)
}
