use super::catalog_loader::{Scripts, start_runtime};
use super::modules::describe_module;

#[test]
fn library_lists_its_members() {
    let mut rt = start_runtime(&Scripts::default()).unwrap();
    let text = describe_module(&mut rt, "hash").unwrap();

    insta::assert_snapshot!(text, @r"
    library hash (#7 hash)
      crc32  (jsvar) -> float
    ");
}

#[test]
fn script_prints_its_source() {
    let scripts = Scripts {
        modules: vec![("greet".to_owned(), "exports.hi = 1;".to_owned())],
        boot: None,
    };
    let mut rt = start_runtime(&scripts).unwrap();

    assert_eq!(
        describe_module(&mut rt, "greet").unwrap(),
        "script greet\nexports.hi = 1;\n"
    );
}

#[test]
fn startup_script_is_not_a_module() {
    let scripts = Scripts {
        modules: Vec::new(),
        boot: Some("boot();".to_owned()),
    };
    let mut rt = start_runtime(&scripts).unwrap();

    assert_eq!(
        describe_module(&mut rt, "_").unwrap_err(),
        "no module named '_'"
    );
    assert_eq!(rt.list_loadable_module_names(), "hash");
}
