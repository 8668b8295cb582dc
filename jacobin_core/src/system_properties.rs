use crate::globals::{get_charset_name, Globals};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::LazyLock;

static PROPERTIES: LazyLock<RwLock<HashMap<String, String>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

fn os_name() -> String {
    match std::env::consts::OS {
        "linux" => "Linux".to_string(),
        "macos" => "Mac OS X".to_string(),
        "windows" => "Windows".to_string(),
        other => other.to_string(),
    }
}

fn os_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        other => other,
    }
}

fn os_version() -> String {
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn env_or(key: &str, fallback: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Rebuilds the property map from OS values and the discovered configuration.
pub fn build_system_properties(globals: &Globals) {
    let separator = std::path::MAIN_SEPARATOR.to_string();
    let path_separator = if cfg!(windows) { ";" } else { ":" };
    let line_separator = if cfg!(windows) { "\r\n" } else { "\n" };
    let charset = get_charset_name();
    let user_dir = std::env::current_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let entries: Vec<(&str, String)> = vec![
        ("file.encoding", globals.file_encoding.clone()),
        ("file.separator", separator),
        ("java.class.path", globals.classpath_raw.clone()),
        ("java.compiler", "no JIT".to_string()),
        ("java.home", globals.java_home.clone()),
        ("java.io.tmpdir", std::env::temp_dir().to_string_lossy().into_owned()),
        ("java.library.path", String::new()),
        ("java.vendor", "Jacobin".to_string()),
        ("java.vendor.url", "https://jacobin.org".to_string()),
        ("java.vendor.version", globals.version.clone()),
        ("java.version", globals.java_version.clone()),
        ("java.vm.name", "Jacobin VM".to_string()),
        ("java.vm.vendor", "Jacobin".to_string()),
        ("java.vm.version", globals.max_java_version.to_string()),
        ("jdk.major.version", globals.jdk_major_version.to_string()),
        ("line.separator", line_separator.to_string()),
        ("native.encoding", charset.clone()),
        ("os.arch", os_arch().to_string()),
        ("os.name", os_name()),
        ("os.version", os_version()),
        ("path.separator", path_separator.to_string()),
        ("stdout.encoding", charset.clone()),
        ("stderr.encoding", charset),
        ("sun.jnu.encoding", globals.file_name_encoding.clone()),
        ("user.dir", user_dir),
        ("user.home", env_or("HOME", "")),
        ("user.name", std::env::var("USER").unwrap_or_else(|_| env_or("USERNAME", ""))),
        ("user.timezone", env_or("TZ", "UTC")),
    ];
    let map = entries
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    replace_system_properties(map);
}

pub fn get_system_property(key: &str) -> Option<String> {
    PROPERTIES.read().get(key).cloned()
}

/// Adds or updates a property, returning the previous value.
pub fn set_system_property(key: &str, value: &str) -> Option<String> {
    PROPERTIES
        .write()
        .insert(key.to_string(), value.to_string())
}

pub fn remove_system_property(key: &str) -> Option<String> {
    PROPERTIES.write().remove(key)
}

pub fn replace_system_properties(properties: HashMap<String, String>) {
    *PROPERTIES.write() = properties;
}

pub fn system_properties() -> HashMap<String, String> {
    PROPERTIES.read().clone()
}
