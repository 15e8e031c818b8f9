//! Unit tests for release table loading and target resolution.

use super::*;
use crate::artefact::error::ArtefactError;
use crate::test_utils::release_table_toml;
use rstest::{fixture, rstest};

fn digest(seed: &str) -> String {
    Sha256Digest::of(seed.as_bytes()).into_inner()
}

#[fixture]
fn full_table() -> ReleaseTable {
    let entries: Vec<(String, String)> = Platform::all()
        .iter()
        .map(|platform| (platform.key(), digest(&platform.key())))
        .collect();
    let pairs: Vec<(&str, &str)> = entries
        .iter()
        .map(|(key, sha)| (key.as_str(), sha.as_str()))
        .collect();
    ReleaseTable::parse(&release_table_toml("1.0.0", &pairs), "test").expect("valid table")
}

fn version(value: &str) -> ReleaseVersion {
    ReleaseVersion::try_from(value).expect("valid version")
}

#[rstest]
fn resolve_target_encodes_os_and_arch_for_every_platform(full_table: ReleaseTable) {
    for platform in Platform::all() {
        let target = full_table
            .resolve_target(platform, &version("1.0.0"))
            .expect("entry exists");
        let suffix = format!(
            "_{}_{}.tar.gz",
            platform.os.as_str(),
            platform.arch.as_str()
        );
        assert!(
            target.url().ends_with(&suffix),
            "{} does not end with {suffix}",
            target.url()
        );
        assert_eq!(target.operating_system(), platform.os);
        assert_eq!(target.architecture(), platform.arch);
        assert_eq!(target.expected_checksum().as_str(), digest(&platform.key()));
    }
}

#[rstest]
fn resolve_target_uses_release_download_layout(full_table: ReleaseTable) {
    let platform: Platform = "darwin-arm64".parse().expect("valid key");
    let target = full_table
        .resolve_target(platform, &version("1.0.0"))
        .expect("entry exists");
    assert_eq!(
        target.url(),
        "https://github.com/cdobratz/AzGuard/releases/download/v1.0.0/azguard_1.0.0_darwin_arm64.tar.gz"
    );
    assert_eq!(target.binary().as_str(), "azguard");
}

#[rstest]
fn resolve_target_rejects_other_versions(full_table: ReleaseTable) {
    let platform: Platform = "linux-amd64".parse().expect("valid key");
    let err = full_table
        .resolve_target(platform, &version("2.0.0"))
        .expect_err("version mismatch");
    assert!(matches!(
        err,
        InstallerError::UnknownTarget { ref version, .. } if version == "2.0.0"
    ));
}

#[test]
fn resolve_target_rejects_missing_platform() {
    let sha = digest("linux");
    let table = ReleaseTable::parse(
        &release_table_toml("1.0.0", &[("linux-amd64", sha.as_str())]),
        "test",
    )
    .expect("valid table");
    let err = table
        .resolve_target("darwin-arm64".parse().expect("valid key"), &version("1.0.0"))
        .expect_err("no darwin entry");
    assert!(matches!(
        err,
        InstallerError::UnknownTarget { ref platform, .. } if platform == "darwin-arm64"
    ));
}

#[test]
fn builtin_table_is_rejected_for_placeholder_checksums() {
    let err = ReleaseTable::builtin().expect_err("placeholders must not load");
    match err {
        ReleaseError::InvalidEntry { source, .. } => assert!(matches!(
            source,
            ArtefactError::PlaceholderDigest { ref value } if value == "REPLACE_WITH_ACTUAL_SHA256"
        )),
        other => panic!("expected InvalidEntry, got {other:?}"),
    }
}

#[rstest]
#[case::empty("")]
#[case::marker("REPLACE_WITH_ACTUAL_SHA256")]
#[case::zero("0000000000000000000000000000000000000000000000000000000000000000")]
fn rejects_unfilled_checksums(#[case] sha: &str) {
    let result = ReleaseTable::parse(&release_table_toml("1.0.0", &[("linux-amd64", sha)]), "test");
    assert!(
        matches!(
            result,
            Err(ReleaseError::InvalidEntry {
                source: ArtefactError::PlaceholderDigest { .. },
                ..
            })
        ),
        "expected placeholder rejection for {sha:?}, got {result:?}"
    );
}

#[test]
fn rejects_unknown_platform_key() {
    let sha = digest("windows");
    let result = ReleaseTable::parse(
        &release_table_toml("1.0.0", &[("windows-amd64", sha.as_str())]),
        "test",
    );
    assert!(matches!(result, Err(ReleaseError::UnsupportedPlatformKey(_))));
}

#[test]
fn rejects_plain_http_url() {
    let sha = digest("linux");
    let text = format!(
        "version = \"1.0.0\"\n\n[targets.linux-amd64]\nsha256 = \"{sha}\"\nurl = \"http://example.test/azguard.tar.gz\"\n"
    );
    let result = ReleaseTable::parse(&text, "test");
    assert!(matches!(result, Err(ReleaseError::InsecureUrl { .. })));
}

#[test]
fn rejects_unknown_fields() {
    let sha = digest("linux");
    let text = format!(
        "version = \"1.0.0\"\nchannel = \"stable\"\n\n[targets.linux-amd64]\nsha256 = \"{sha}\"\n"
    );
    let result = ReleaseTable::parse(&text, "test");
    assert!(matches!(result, Err(ReleaseError::Parse { .. })));
}

#[test]
fn rejects_empty_target_list() {
    let result = ReleaseTable::parse("version = \"1.0.0\"\n\n[targets]\n", "test");
    assert!(matches!(result, Err(ReleaseError::EmptyTable)));
}

#[test]
fn explicit_url_overrides_derived_one() {
    let sha = digest("linux");
    let text = format!(
        "version = \"1.0.0\"\n\n[targets.linux-amd64]\nsha256 = \"{sha}\"\nurl = \"https://mirror.example.test/azguard.tar.gz\"\n"
    );
    let table = ReleaseTable::parse(&text, "test").expect("valid table");
    let target = table
        .resolve_target("linux-amd64".parse().expect("valid key"), &version("1.0.0"))
        .expect("entry exists");
    assert_eq!(target.url(), "https://mirror.example.test/azguard.tar.gz");
}

#[test]
fn custom_binary_and_base_url_shape_derived_urls() {
    let sha = digest("linux");
    let text = format!(
        "version = \"v2.1.0\"\nbinary = \"azg\"\nbase_url = \"https://dl.example.test/releases/\"\n\n[targets.linux-arm64]\nsha256 = \"{sha}\"\n"
    );
    let table = ReleaseTable::parse(&text, "test").expect("valid table");
    let target = table
        .resolve_target("linux-arm64".parse().expect("valid key"), &version("2.1.0"))
        .expect("entry exists");
    assert_eq!(
        target.url(),
        "https://dl.example.test/releases/v2.1.0/azg_2.1.0_linux_arm64.tar.gz"
    );
}

#[rstest]
fn to_toml_round_trips_through_parse(full_table: ReleaseTable) {
    let text = full_table.to_toml().expect("serialize");
    assert!(!text.contains("base_url"), "default base_url is omitted");
    assert!(!text.contains("url ="), "derived URLs are omitted");
    let reparsed = ReleaseTable::parse(&text, "round-trip").expect("reparse");
    assert_eq!(reparsed, full_table);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = camino::Utf8PathBuf::try_from(dir.path().join("absent.toml")).expect("UTF-8 path");
    let result = ReleaseTable::load(&path);
    assert!(matches!(result, Err(ReleaseError::Read { .. })));
}

#[test]
fn from_digests_requires_at_least_one_entry() {
    let binary = BinaryName::try_from(DEFAULT_BINARY).expect("valid");
    let result = ReleaseTable::from_digests(version("1.0.0"), binary, DEFAULT_BASE_URL, BTreeMap::new());
    assert!(matches!(result, Err(ReleaseError::EmptyTable)));
}
