use genmake::parser::{scan_file, scan_source, CGO_IMPORT, UNSAFE_IMPORT};
use genmake::GenError;
use std::fs;
use std::path::Path;

#[test]
fn test_realistic_file_header() {
    let source = r#"// Copyright 2010 The Go Authors. All rights reserved.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

/*
Package http implements HTTP client and server.
*/
package http

import (
	"bufio"
	"io"
	"net"
	"unsafe"
)

// DefaultMaxHeaderBytes is the maximum permitted size of the headers.
const DefaultMaxHeaderBytes = 1 << 20

func weird() string { return `never scanned` }
"#;

    let scan = scan_source(Path::new("server.go"), source).unwrap();
    let imports: Vec<&str> = scan.imports.iter().map(String::as_str).collect();
    assert_eq!(imports, vec!["bufio", "io", "net"]);
    assert!(!scan.imports.contains(UNSAFE_IMPORT));
    assert!(!scan.uses_cgo);
}

#[test]
fn test_cgo_marker_is_reported_separately() {
    let source = "package user\n\n/*\n#include <pwd.h>\n*/\nimport \"C\"\n\nimport \"os\"\n";
    let scan = scan_source(Path::new("lookup.go"), source).unwrap();
    assert!(scan.uses_cgo);
    assert!(!scan.imports.contains(CGO_IMPORT));
    assert!(scan.imports.contains("os"));
}

#[test]
fn test_body_after_imports_is_not_scanned() {
    let source = "package main\nimport \"fmt\"\nvar s = \"unterminated\n/* unterminated";
    let scan = scan_source(Path::new("main.go"), source).unwrap();
    assert_eq!(scan.imports.len(), 1);
}

#[test]
fn test_scan_file_reports_path_and_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.go");
    fs::write(&path, "package broken\n\nimport (\n\t\"fmt\"\n\t42\n)\n").unwrap();

    match scan_file(&path).unwrap_err() {
        GenError::Scan { path: failed, line, message } => {
            assert_eq!(failed, path);
            assert_eq!(line, 5);
            assert!(message.contains("expected import path"), "{}", message);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_scan_file_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = scan_file(&dir.path().join("absent.go")).unwrap_err();
    assert!(matches!(err, GenError::Io { .. }));
}

#[test]
fn test_invalid_utf8_is_a_scan_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.go");
    fs::write(&path, b"package x\n// caf\xe9\n").unwrap();

    let err = scan_file(&path).unwrap_err();
    assert!(matches!(err, GenError::Scan { .. }));
    assert!(err.to_string().contains("latin1.go"));
}

#[test]
fn test_invalid_utf8_after_imports_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("body.go");
    fs::write(&path, b"package x\n\nimport \"fmt\"\n\nfunc f() string { return \"caf\xe9\" }\n").unwrap();

    let scan = scan_file(&path).unwrap();
    assert!(scan.imports.contains("fmt"));
}

#[test]
fn test_invalid_utf8_inside_imports_reports_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("header.go");
    fs::write(&path, b"package x\n\nimport (\n\t\"caf\xe9\"\n)\n").unwrap();

    match scan_file(&path).unwrap_err() {
        GenError::Scan { line, message, .. } => {
            assert_eq!(line, 4);
            assert!(message.contains("UTF-8"), "{}", message);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_missing_separators_are_fatal() {
    let malformed = [
        "package p\nimport \"a\" \"b\"\n",
        "package p import \"a\"\n",
        "package p\nimport ( \"a\" \"b\" )\n",
    ];

    for source in malformed {
        match scan_source(Path::new("sep.go"), source) {
            Err(GenError::Scan { message, .. }) => assert!(message.contains("expected ';'"), "{}", message),
            other => panic!("{:?} gave {:?}", source, other),
        }
    }
}

#[test]
fn test_import_path_with_space_is_rejected() {
    let err = scan_source(Path::new("space.go"), "package p\nimport \"a b\"\n").unwrap_err();
    assert!(err.to_string().contains("invalid import path"), "{}", err);
}
