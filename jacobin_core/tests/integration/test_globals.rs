use crate::utils::init_logger;
use jacobin_core::globals::{get_globals, init_globals};
use jacobin_core::system_properties::get_system_property;
use std::fs;

#[test]
fn test_init_globals_from_environment() {
    init_logger();
    let base = std::env::temp_dir().join(format!("jacobin_globals_{}", std::process::id()));
    let java_home = base.join("jdk");
    fs::create_dir_all(&java_home).unwrap();
    fs::write(java_home.join("release"), "JAVA_VERSION=\"17.0.9\"\n").unwrap();
    let jacobin_home = base.join("data");

    std::env::set_var("JAVA_HOME", &java_home);
    std::env::set_var("JACOBIN_HOME", format!("{}/", jacobin_home.display()));
    std::env::set_var("CLASSPATH", "/tmp/a:/tmp/b");

    let globals = init_globals("test").unwrap();
    assert_eq!(globals.java_version, "17.0.9");
    assert_eq!(globals.jdk_major_version, 17);
    assert_eq!(globals.jacobin_home, jacobin_home.to_string_lossy());
    assert!(jacobin_home.is_dir());
    assert_eq!(globals.classpath, vec!["/tmp/a".to_string(), "/tmp/b".to_string()]);
    assert_eq!(get_globals().jdk_major_version, 17);

    assert_eq!(get_system_property("java.vendor").as_deref(), Some("Jacobin"));
    assert_eq!(get_system_property("java.version").as_deref(), Some("17.0.9"));
    assert_eq!(get_system_property("file.encoding").as_deref(), Some("UTF-8"));

    std::env::set_var("JAVA_HOME", base.join("missing"));
    let soft = init_globals("test").unwrap();
    assert_eq!(soft.jdk_major_version, 0);

    let _ = fs::remove_dir_all(&base);
}
