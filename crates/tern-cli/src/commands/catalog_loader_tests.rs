use std::path::PathBuf;

use super::catalog_loader::*;

#[test]
fn module_spec_splits_on_first_colon() {
    let (name, path) = parse_module_spec("greet:scripts/greet.js").unwrap();
    assert_eq!(name, "greet");
    assert_eq!(path, PathBuf::from("scripts/greet.js"));

    let (name, path) = parse_module_spec("x:a:b.js").unwrap();
    assert_eq!(name, "x");
    assert_eq!(path, PathBuf::from("a:b.js"));
}

#[test]
fn module_spec_needs_both_halves() {
    for spec in ["greet", ":greet.js", "greet:", ""] {
        let err = parse_module_spec(spec).unwrap_err();
        assert!(matches!(err, LoadError::InvalidSpec(_)), "{spec}");
    }
    insta::assert_snapshot!(
        parse_module_spec("greet").unwrap_err().to_string(),
        @"invalid module 'greet': expected NAME:FILE"
    );
}

#[test]
fn missing_file_names_the_path() {
    let specs = vec!["greet:/nonexistent/tern/greet.js".to_owned()];
    let err = load_scripts(&specs, None).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
    assert!(
        err.to_string()
            .starts_with("failed to read '/nonexistent/tern/greet.js': ")
    );
}

#[test]
fn no_scripts_uses_the_shared_catalog() {
    let scripts = load_scripts(&[], None).unwrap();
    assert!(scripts.is_empty());

    let runtime = start_runtime(&scripts).unwrap();
    assert_eq!(runtime.list_loadable_module_names(), "hash");
}

#[test]
fn bundled_scripts_are_listed_after_libraries() {
    let scripts = Scripts {
        modules: vec![("greet".to_owned(), "exports.hi = 1;".to_owned())],
        boot: Some("print('boot');".to_owned()),
    };
    let runtime = start_runtime(&scripts).unwrap();
    assert_eq!(runtime.list_loadable_module_names(), "hash,greet");
}

#[test]
fn script_cannot_shadow_a_library() {
    let scripts = Scripts {
        modules: vec![("hash".to_owned(), String::new())],
        boot: None,
    };
    assert!(start_runtime(&scripts).is_err());
}
