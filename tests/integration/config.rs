//! Properties files and environment fallbacks.

use gleaner::compat::CompatVersionResolver;
use gleaner::config::{OUTPUT_FILE_ENV, Properties};
use gleaner::core::GleanerError;
use gleaner::filter::DependencyFilter;
use gleaner::test_utils::TestEnvironment;
use serial_test::serial;
use std::path::PathBuf;

#[test]
fn test_properties_file_drives_filter_and_compat() {
    let env = TestEnvironment::new().unwrap();
    let path = env
        .write_properties(&[
            ("gleaner.filter.b", r"org\.example:.*"),
            ("gleaner.filter.a", "junit:junit"),
            ("gleaner.version.2", "junit:.*=3"),
            ("gleaner.version.1", "junit:junit=4"),
        ])
        .unwrap();
    let properties = Properties::load(&path).unwrap();

    let filter = DependencyFilter::from_properties(&properties).unwrap();
    assert_eq!(filter.len(), 2);
    assert!(filter.is_key_filtered("org.example:lib"));
    assert!(!filter.is_key_filtered("org.example.sub:lib"));

    let compat = CompatVersionResolver::from_properties(&properties).unwrap();
    assert_eq!(compat.resolve_version_for_key("junit:junit"), "4");
    assert_eq!(compat.resolve_version_for_key("junit:other"), "3");
    assert_eq!(compat.resolve_version_for_key("other:junit"), "SYSTEM");
}

#[test]
fn test_missing_properties_file() {
    let env = TestEnvironment::new().unwrap();
    assert!(matches!(
        Properties::load(&env.path("absent.toml")),
        Err(GleanerError::ConfigNotFound { .. })
    ));
}

#[test]
#[serial]
fn test_output_file_from_environment() {
    unsafe {
        std::env::set_var(OUTPUT_FILE_ENV, "/tmp/from-env.txt");
    }
    let from_env = Properties::new().output_file();
    let from_property =
        Properties::from_defines(["gleaner.outputFile=/tmp/prop.txt"]).output_file();
    unsafe {
        std::env::remove_var(OUTPUT_FILE_ENV);
    }

    assert_eq!(from_env, Some(PathBuf::from("/tmp/from-env.txt")));
    assert_eq!(from_property, Some(PathBuf::from("/tmp/prop.txt")));
}
