//! End-to-end properties of revisioning and manifest generation.

use std::path::PathBuf;

use hashrev_common::{Contents, FileRecord, Fingerprint};
use hashrev_conformance::{file, full_pipeline, full_pipeline_with, PipelineError, BASE};
use hashrev_engine::{EngineOptions, RevError};
use hashrev_manifest::{ManifestOptions, MemoryManifestReader};

fn fp(contents: &str) -> Fingerprint {
    Fingerprint::from_bytes(contents.as_bytes())
}

#[test]
fn single_artifact_manifest() {
    let result = full_pipeline(vec![file("css/app.css", "h1")]).unwrap();
    let h = fp("h1");
    assert_eq!(result.relative_paths(), vec![format!("css/app-{h}.css")]);
    assert_eq!(
        result.manifest_text().unwrap(),
        format!("{{\n  \"css/app.css\": \"css/app-{h}.css\"\n}}")
    );
}

#[test]
fn zero_artifacts_produce_no_manifest() {
    let result = full_pipeline(vec![]).unwrap();
    assert!(result.files.is_empty());
    assert!(result.manifest.is_none());
}

#[test]
fn null_records_alone_produce_no_manifest() {
    let dir = FileRecord::new(BASE, format!("{BASE}/css"), Contents::Null);
    let result = full_pipeline(vec![dir]).unwrap();
    assert_eq!(result.files.len(), 1);
    assert!(result.manifest.is_none());
}

#[test]
fn identical_content_distinct_entries() {
    let result = full_pipeline(vec![file("a.js", "x"), file("b.js", "x")]).unwrap();
    let h = fp("x");
    let a = result.by_original("a.js").unwrap();
    let b = result.by_original("b.js").unwrap();
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_eq!(a.relative(), format!("a-{h}.js"));
    assert_eq!(b.relative(), format!("b-{h}.js"));
    assert_eq!(
        result.manifest_text().unwrap(),
        format!("{{\n  \"a.js\": \"a-{h}.js\",\n  \"b.js\": \"b-{h}.js\"\n}}")
    );
}

#[test]
fn manifest_keys_sorted_regardless_of_input_order() {
    let forward = full_pipeline(vec![
        file("z.js", "z"),
        file("a/b.js", "b"),
        file("m.css", "m"),
    ])
    .unwrap();
    let backward = full_pipeline(vec![
        file("m.css", "m"),
        file("a/b.js", "b"),
        file("z.js", "z"),
    ])
    .unwrap();
    assert_eq!(forward.manifest_text(), backward.manifest_text());

    let text = forward.manifest_text().unwrap();
    let a = text.find("\"a/b.js\"").unwrap();
    let m = text.find("\"m.css\"").unwrap();
    let z = text.find("\"z.js\"").unwrap();
    assert!(a < m && m < z);
}

#[test]
fn multi_dot_names_keep_suffix_chain() {
    let result = full_pipeline(vec![file("js/vendor.min.js", "v")]).unwrap();
    let h = fp("v");
    assert_eq!(result.relative_paths(), vec![format!("js/vendor-{h}.min.js")]);
    assert!(result
        .manifest_text()
        .unwrap()
        .contains(&format!("\"js/vendor.min.js\": \"js/vendor-{h}.min.js\"")));
}

#[test]
fn merge_with_prior_manifest() {
    let mut reader = MemoryManifestReader::new();
    reader.insert("rev-manifest.json", r#"{"old.js": "old-abc.js"}"#);
    let result = full_pipeline_with(
        vec![file("new.js", "def")],
        EngineOptions::default(),
        ManifestOptions::default().merge(true),
        reader,
    )
    .unwrap();
    let h = fp("def");
    assert_eq!(
        result.manifest_text().unwrap(),
        format!("{{\n  \"new.js\": \"new-{h}.js\",\n  \"old.js\": \"old-abc.js\"\n}}")
    );
}

#[test]
fn merge_new_entries_override_prior() {
    let mut reader = MemoryManifestReader::new();
    reader.insert("rev-manifest.json", r#"{"app.js": "app-0000000000.js"}"#);
    let result = full_pipeline_with(
        vec![file("app.js", "a")],
        EngineOptions::default(),
        ManifestOptions::default().merge(true),
        reader,
    )
    .unwrap();
    let h = fp("a");
    assert_eq!(
        result.manifest_text().unwrap(),
        format!("{{\n  \"app.js\": \"app-{h}.js\"\n}}")
    );
}

#[test]
fn hash_in_query_mode() {
    let result = full_pipeline_with(
        vec![file("css/app.css", "c")],
        EngineOptions {
            hash_in_query: true,
        },
        ManifestOptions::default().hash_in_query(true),
        MemoryManifestReader::new(),
    )
    .unwrap();
    let h = fp("c");
    assert_eq!(result.relative_paths(), vec!["css/app.css".to_string()]);
    assert_eq!(
        result.manifest_text().unwrap(),
        format!("{{\n  \"css/app.css\": \"css/app.css?v={h}\"\n}}")
    );
}

#[cfg(unix)]
#[test]
fn non_utf8_name_gets_no_manifest_entry() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let path = std::path::Path::new(OsStr::from_bytes(b"/build/\xffapp.js"));
    let result = full_pipeline(vec![FileRecord::buffer(BASE, path, "a")]).unwrap();
    assert_eq!(result.files.len(), 1);
    assert!(!result.files[0].is_revisioned());
    assert!(result.manifest.is_none());
}

#[test]
fn stream_record_aborts_without_manifest() {
    let stream = FileRecord::new(
        BASE,
        format!("{BASE}/big.js"),
        Contents::Stream(Box::new(std::io::empty())),
    );
    let err = full_pipeline(vec![file("a.js", "a"), stream]).unwrap_err();
    match err {
        PipelineError::Rev(RevError::StreamingUnsupported { path }) => {
            assert_eq!(path, PathBuf::from("/build/big.js"));
        }
        other => panic!("expected StreamingUnsupported, got {other}"),
    }
}

#[test]
fn manifest_read_failure_aborts() {
    struct Denied;
    impl hashrev_manifest::ManifestReader for Denied {
        fn read(&self, _: &std::path::Path) -> std::io::Result<Option<Vec<u8>>> {
            Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "denied",
            ))
        }
    }
    let err = full_pipeline_with(
        vec![file("a.js", "a")],
        EngineOptions::default(),
        ManifestOptions::default(),
        Denied,
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Manifest(_)));
}

#[test]
fn identical_inputs_give_byte_identical_manifests() {
    let run = || {
        full_pipeline(vec![file("a.js", "a"), file("b.css", "b")])
            .unwrap()
            .manifest_text()
            .map(str::to_string)
    };
    assert_eq!(run(), run());
}
