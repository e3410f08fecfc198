//! Full harvests against a Maven-layout repository on disk.

use gleaner::config::Properties;
use gleaner::core::GleanerError;
use gleaner::gleaner::{GleanReport, Gleaner, GleanerConfig, Stage};
use gleaner::host::StaticBuildHost;
use gleaner::test_utils::{BuildFixture, TestEnvironment};
use std::collections::BTreeSet;
use std::fs;

fn harvest(env: &TestEnvironment, fixture: &BuildFixture, defines: &[&str]) -> GleanReport {
    let build = env.write_build(fixture).unwrap();
    let host = StaticBuildHost::load(&build).unwrap();
    let repository = env.repository();
    let plugins = host.plugin_manager(&repository);
    let config = GleanerConfig::from_properties(&Properties::from_defines(defines)).unwrap();
    Gleaner::new(config).execute(&host, &repository, &plugins).unwrap()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_single_module_complete() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(BuildFixture::single_module_artifacts()).unwrap();

    let report = harvest(&env, &BuildFixture::single_module(), &[]);

    assert!(report.complete);
    assert_eq!(report.stage, Stage::Exec);
    assert_eq!(
        report.build_requires,
        set(&[
            "mvn(com.google.guava:guava)",
            "mvn(org.apache.maven.plugins:maven-compiler-plugin)",
            "mvn(org.apache.maven.plugins:maven-jar-plugin)",
            "mvn(org.example:example-parent:pom:)",
            "mvn(org.junit.jupiter:junit-jupiter)",
        ])
    );
}

#[test]
fn test_missing_test_dependency_is_reported() {
    let env = TestEnvironment::new().unwrap();
    for id in BuildFixture::single_module_artifacts() {
        if !id.contains("junit") {
            env.install(id).unwrap();
        }
    }

    let report = harvest(&env, &BuildFixture::single_module(), &[]);

    assert!(!report.complete);
    assert_eq!(report.stage, Stage::Exec);
    assert_eq!(report.missing, vec!["org.junit.jupiter:junit-jupiter:jar:5.10.0".to_string()]);
    assert!(report.build_requires.contains("mvn(org.junit.jupiter:junit-jupiter)"));
}

#[test]
fn test_output_file_written_on_failure() {
    let env = TestEnvironment::new().unwrap();
    let output = env.path("brs.txt");
    let define = format!("gleaner.outputFile={}", output.display());

    let report = harvest(&env, &BuildFixture::single_module(), &[&define]);

    assert_eq!(report.stage, Stage::Model);
    assert_eq!(fs::read_to_string(&output).unwrap(), "mvn(org.example:example-parent:pom:)\n");
}

#[test]
fn test_multi_module_skips_reactor() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(&[
        "org.junit:junit-bom:pom:5.10.0",
        "org.apache.maven.plugins:maven-compiler-plugin:jar:3.13.0",
    ])
    .unwrap();

    let report = harvest(&env, &BuildFixture::multi_module(), &[]);

    assert!(report.complete);
    // The bom is only loaded while computing plans, so it stays weak and,
    // once resolved, is not reported.
    assert_eq!(report.build_requires, set(&["mvn(org.apache.maven.plugins:maven-compiler-plugin)"]));
    assert_eq!(report.weak, 1);
}

#[test]
fn test_missing_bom_is_weak_failure() {
    let env = TestEnvironment::new().unwrap();
    env.install("org.apache.maven.plugins:maven-compiler-plugin:jar:3.13.0").unwrap();

    let report = harvest(&env, &BuildFixture::multi_module(), &[]);

    assert_eq!(report.stage, Stage::Plan);
    assert_eq!(report.build_requires, set(&["mvn(org.junit:junit-bom:pom:)"]));
}

#[test]
fn test_compat_version_and_namespace() {
    let env = TestEnvironment::new().unwrap();
    env.install_all(BuildFixture::single_module_artifacts()).unwrap();

    let report = harvest(
        &env,
        &BuildFixture::single_module(),
        &[
            r"gleaner.version.1=com\.google\..*=33",
            r"gleaner.filter.1=org\.apache\.maven\.plugins:.*",
            "gleaner.namespace=ns",
        ],
    );

    assert_eq!(
        report.build_requires,
        set(&[
            "ns-mvn(com.google.guava:guava:33)",
            "ns-mvn(org.example:example-parent:pom:)",
            "ns-mvn(org.junit.jupiter:junit-jupiter)",
        ])
    );
}

#[test]
fn test_invalid_build_description() {
    let env = TestEnvironment::new().unwrap();
    let build = env.write_build(&BuildFixture::invalid_syntax()).unwrap();
    assert!(matches!(StaticBuildHost::load(&build), Err(GleanerError::ConfigParseError { .. })));
}
