use classmap_core::{DebugLog, FilterDecision, ScanOptions};

#[test]
fn test_options_from_json_uses_defaults() {
    let options: ScanOptions =
        serde_json::from_str(r#"{ "exclude_dirs": ["temp", "tests"], "enable_debug": true }"#)
            .unwrap();

    assert_eq!(options.exclude_dirs, vec!["temp", "tests"]);
    assert_eq!(options.exclude_files, vec!["~*.php", "~*.inc"]);
    assert_eq!(options.extensions, vec![".php", ".inc"]);
    assert!(options.enable_debug);
    assert!(options.recursive);
    assert!(!options.follow_symlinks);
}

#[test]
fn test_options_json_roundtrip() {
    let options = ScanOptions::builder()
        .exclude_files(vec!["B.*".to_string()])
        .recursive(false)
        .build()
        .unwrap();

    let json = serde_json::to_string(&options).unwrap();
    let back: ScanOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(options, back);
}

#[test]
fn test_default_filter_skips_backup_files() {
    let filter = ScanOptions::default().compile_filter().unwrap();

    assert_eq!(
        filter.classify("/app/src/Foo.php", "Foo.php"),
        FilterDecision::Parse
    );
    assert_eq!(
        filter.classify("/app/src/Foo.INC", "Foo.INC"),
        FilterDecision::Parse
    );
    assert_eq!(
        filter.classify("/app/src/~Foo.php", "~Foo.php"),
        FilterDecision::ExcludedFile
    );
    assert_eq!(
        filter.classify("/app/.svn/text-base/Foo.php", "Foo.php"),
        FilterDecision::ExcludedDir
    );
    assert_eq!(
        filter.classify("/app/README.md", "README.md"),
        FilterDecision::NotParsed
    );
}

#[test]
fn test_directory_exclusion_is_case_insensitive() {
    let options = ScanOptions::builder()
        .exclude_dirs(vec!["Vendor".to_string()])
        .build()
        .unwrap();
    let filter = options.compile_filter().unwrap();

    assert_eq!(
        filter.classify("/app/VENDOR/lib/Foo.php", "Foo.php"),
        FilterDecision::ExcludedDir
    );
}

#[test]
fn test_debug_log_formatting() {
    let log = DebugLog::new(true);
    log.push("scan_directory: Processing dir /app");
    log.push("scan_file: Processing file /app/Foo.php");

    let text = log.formatted(" | ", "[%s]").unwrap();
    assert_eq!(
        text,
        "[scan_directory: Processing dir /app | scan_file: Processing file /app/Foo.php]"
    );
}
