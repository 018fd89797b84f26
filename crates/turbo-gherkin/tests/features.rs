//! Smoke tests over the feature files under `tests/features`.
#![expect(clippy::expect_used, reason = "fixture I/O failures should abort the test")]

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rstest::{fixture, rstest};
use turbo_gherkin::parse_bytes;

fn fixtures_dir(kind: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("features")
        .join(kind)
}

/// Every `.feature` file in a fixture directory with its raw contents.
fn load(kind: &str) -> Vec<(String, Vec<u8>)> {
    let dir = Dir::open_ambient_dir(fixtures_dir(kind), ambient_authority())
        .expect("open fixture directory");
    let mut files: Vec<_> = dir
        .entries()
        .expect("list fixture directory")
        .map(|entry| entry.and_then(|entry| entry.file_name()).expect("entry name"))
        .filter(|name| name.ends_with(".feature"))
        .map(|name| {
            let bytes = dir.read(&name).expect("read fixture");
            (name, bytes)
        })
        .collect();
    files.sort();
    files
}

#[fixture]
fn valid() -> Vec<(String, Vec<u8>)> {
    load("valid")
}

#[fixture]
fn invalid() -> Vec<(String, Vec<u8>)> {
    load("invalid")
}

#[rstest]
fn valid_files_parse_cleanly(valid: Vec<(String, Vec<u8>)>) {
    assert!(!valid.is_empty());
    for (name, bytes) in &valid {
        let tree = parse_bytes(bytes).expect("fixtures are UTF-8");
        assert!(!tree.has_error(), "{name}: {:?}", tree.diagnostics());
        assert_eq!(tree.errors().count(), 0, "{name}");
        let scenarios = tree
            .root()
            .descendants()
            .into_iter()
            .filter(|node| {
                matches!(
                    node.kind(),
                    turbo_gherkin::RuleKind::Scenario | turbo_gherkin::RuleKind::ScenarioOutline
                )
            })
            .count();
        assert!(scenarios > 0, "{name}");
    }
}

#[rstest]
fn invalid_files_report_errors(invalid: Vec<(String, Vec<u8>)>) {
    assert!(!invalid.is_empty());
    for (name, bytes) in &invalid {
        let tree = parse_bytes(bytes).expect("fixtures are UTF-8");
        assert!(tree.has_error(), "{name}");
        assert!(tree.errors().count() > 0, "{name}");
        for diagnostic in tree.errors() {
            assert!(!diagnostic.to_string().is_empty(), "{name}");
        }
    }
}

#[rstest]
fn token_streams_rebuild_every_fixture(
    valid: Vec<(String, Vec<u8>)>,
    invalid: Vec<(String, Vec<u8>)>,
) {
    for (name, bytes) in valid.iter().chain(&invalid) {
        let tree = parse_bytes(bytes).expect("fixtures are UTF-8");
        let rebuilt: String = tree.tokens().iter().map(|token| token.text).collect();
        assert_eq!(rebuilt.as_bytes(), bytes.as_slice(), "{name}");
    }
}
