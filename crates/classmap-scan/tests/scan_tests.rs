use std::fs;
use std::path::Path;
use std::sync::Arc;

use classmap_scan::{DebugLog, DeclarationScanner, ScanError, ScanOptions, TreeWalker};
use tempfile::TempDir;

fn canonical(path: &Path) -> String {
    path.canonicalize()
        .unwrap()
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/")
}

fn src_options() -> ScanOptions {
    ScanOptions::builder()
        .extensions(vec![".src".to_string()])
        .build()
        .unwrap()
}

#[test]
fn test_end_to_end_exclusions() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("ns")).unwrap();
    fs::create_dir_all(root.join("skip")).unwrap();
    fs::write(root.join("ns/A.src"), "<?php\nnamespace NS;\nclass A {}\n").unwrap();
    fs::write(root.join("ns/B.src"), "<?php\nnamespace NS;\nclass B {}\n").unwrap();
    fs::write(root.join("skip/C.src"), "<?php\nnamespace NS;\nclass C {}\n").unwrap();

    let options = ScanOptions::builder()
        .exclude_dirs(vec!["skip".to_string()])
        .exclude_files(vec!["B.*".to_string()])
        .extensions(vec![".src".to_string()])
        .build()
        .unwrap();
    let found = TreeWalker::new(options).unwrap().scan_directory(root);

    assert_eq!(found.len(), 1);
    assert_eq!(
        found.get("NS\\A"),
        Some(&format!("{}/ns/A.src", canonical(root)))
    );
}

#[test]
fn test_directory_exclusion_is_case_insensitive() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("Generated")).unwrap();
    fs::write(root.join("Generated/Proxy.src"), "<?php class Proxy {}").unwrap();
    fs::write(root.join("Kept.src"), "<?php class Kept {}").unwrap();

    let options = ScanOptions::builder()
        .exclude_dirs(vec!["GENERATED".to_string()])
        .extensions(vec![".src".to_string()])
        .build()
        .unwrap();
    let found = TreeWalker::new(options).unwrap().scan_directory(root);

    assert!(found.get("Proxy").is_none());
    assert!(found.get("Kept").is_some());
}

#[test]
fn test_duplicate_declaration_last_file_wins() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("a.src"), "<?php namespace Dup; class Same {}").unwrap();
    fs::write(root.join("b.src"), "<?php namespace Dup; class Same {}").unwrap();

    let found = TreeWalker::new(src_options()).unwrap().scan_directory(root);

    assert_eq!(found.len(), 1);
    assert_eq!(
        found.get("Dup\\Same"),
        Some(&format!("{}/b.src", canonical(root)))
    );
}

#[test]
fn test_scan_roots_merges_in_order() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    fs::write(first.path().join("x.src"), "<?php class Shared {} class OnlyFirst {}").unwrap();
    fs::write(second.path().join("y.src"), "<?php class Shared {}").unwrap();

    let walker = TreeWalker::new(src_options()).unwrap();
    let found = walker.scan_roots(&[first.path(), second.path()]);

    assert_eq!(found.len(), 2);
    assert_eq!(
        found.get("Shared"),
        Some(&format!("{}/y.src", canonical(second.path())))
    );
}

#[test]
fn test_anonymous_class_after_named_declaration() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("anon.src");
    fs::write(
        &file,
        "<?php\nclass Factory {}\nreturn new class extends Factory {};\n",
    )
    .unwrap();

    let scanner = DeclarationScanner::new(Arc::new(DebugLog::disabled()));
    let found = scanner.extract_declarations(&file).unwrap();

    assert_eq!(found.keys().collect::<Vec<_>>(), vec!["Factory"]);
}

#[test]
fn test_heredoc_lookalike_contributes_nothing() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("doc.src");
    fs::write(
        &file,
        "<?php\n$template = <<<TPL\n<?php\nclass Evil {}\nTPL;\n",
    )
    .unwrap();

    let scanner = DeclarationScanner::new(Arc::new(DebugLog::disabled()));
    assert!(scanner.extract_declarations(&file).unwrap().is_empty());
}

#[test]
fn test_extract_declarations_missing_file() {
    let scanner = DeclarationScanner::new(Arc::new(DebugLog::disabled()));
    let result = scanner.extract_declarations(Path::new("/no/such/file.src"));
    assert!(matches!(result, Err(ScanError::FileAccess { .. })));
}

#[test]
fn test_extract_declarations_on_directory() {
    let temp = TempDir::new().unwrap();
    let scanner = DeclarationScanner::new(Arc::new(DebugLog::disabled()));
    let result = scanner.extract_declarations(temp.path());
    assert!(matches!(result, Err(ScanError::FileAccess { .. })));
}

#[test]
fn test_invalid_utf8_file_does_not_abort_walk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(root.join("good.src"), "<?php class Good {}").unwrap();
    fs::write(root.join("bad.src"), b"<?php class \xff\xfe Bad {}").unwrap();

    let found = TreeWalker::new(src_options()).unwrap().scan_directory(root);
    assert!(found.get("Good").is_some());
}

#[test]
fn test_shared_debug_log() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.src"), "<?php class A {}").unwrap();

    let log = Arc::new(DebugLog::new(true));
    let walker = TreeWalker::with_log(src_options(), log.clone()).unwrap();
    walker.scan_directory(temp.path());

    assert!(Arc::ptr_eq(walker.debug_log(), &log));
    assert!(log.len() >= 3);
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_followed_only_when_enabled() {
    let temp = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("Linked.src"), "<?php class Linked {}").unwrap();
    std::os::unix::fs::symlink(outside.path(), temp.path().join("link")).unwrap();

    let found = TreeWalker::new(src_options()).unwrap().scan_directory(temp.path());
    assert!(found.is_empty());

    let options = ScanOptions::builder()
        .extensions(vec![".src".to_string()])
        .follow_symlinks(true)
        .build()
        .unwrap();
    let found = TreeWalker::new(options).unwrap().scan_directory(temp.path());
    assert!(found.get("Linked").is_some());
}
