use super::*;
use std::env::consts::EXE_SUFFIX;

#[test]
fn arguments_start_at_one() {
    let argv = ArgVector::from_args(["/usr/bin/tool", "-v", "input.txt"]).unwrap();
    assert_eq!(argv.arg0(), "/usr/bin/tool");
    assert_eq!(argv.args().min_index(), 1);
    assert_eq!(argv.args().max_index(), 2);
    assert_eq!(argv.args()[1], "-v");
    assert_eq!(argv.args()[2], "input.txt");
}

#[test]
fn no_arguments_after_arg0() {
    let argv = ArgVector::from_args(["tool"]).unwrap();
    assert!(argv.args().is_empty());
    assert_eq!(argv.args().min_index(), 1);
    assert_eq!(argv.args().max_index(), 0);
}

#[test]
fn missing_arg0() {
    let argv = ArgVector::from_args(Vec::<OsString>::new()).unwrap();
    assert_eq!(argv.arg0(), "");
    assert_eq!(argv.program_name(), "");
    assert!(argv.into_args().is_empty());
}

#[cfg(unix)]
#[test]
fn non_unicode_argument_is_rejected() {
    use std::os::unix::ffi::OsStringExt;

    let bad = OsString::from_vec(vec![b'a', 0xff, b'b']);
    let err = ArgVector::from_args([OsString::from("tool"), bad]).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Memory);
    assert_eq!(err.operation, "from_args");
}

#[test]
fn program_name_strips_directories() {
    assert_eq!(program_name("/usr/local/bin/tool"), "tool");
    assert_eq!(program_name("./tool"), "tool");
    assert_eq!(program_name("tool"), "tool");
    assert_eq!(program_name("dir/"), "");
}

#[test]
fn program_name_strips_exe_suffix() {
    let invoked = format!("bin/tool{EXE_SUFFIX}");
    assert_eq!(program_name(&invoked), "tool");
}

#[cfg(windows)]
#[test]
fn program_name_handles_backslashes() {
    assert_eq!(program_name(r"C:\tools\tool.exe"), "tool");
    assert_eq!(program_name(".exe"), ".exe");
}

#[test]
fn program_name_method_matches_function() {
    let argv = ArgVector::from_args(["/opt/x/runner", "a"]).unwrap();
    assert_eq!(argv.program_name(), "runner");
}

#[test]
fn executable_path_is_absolute() {
    let argv = ArgVector::from_env().unwrap();
    let path = argv.executable_path().unwrap();
    assert!(path.is_absolute(), "{path:?}");
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("flexarr-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn resolve_absolute_arg0() {
    let abs = std::env::temp_dir().join("some-tool");
    let found = resolve_executable(abs.to_str().unwrap(), None, None);
    assert_eq!(found, Some(abs));
}

#[test]
fn resolve_relative_arg0_against_cwd() {
    let cwd = std::env::temp_dir();
    let found = resolve_executable("./bin/tool", None, Some(&cwd));
    assert_eq!(found, Some(cwd.join("./bin/tool")));
    assert_eq!(resolve_executable("./bin/tool", None, None), None);
}

#[test]
fn resolve_bare_name_through_path() {
    let empty = scratch_dir("path-empty");
    let full = scratch_dir("path-full");
    let exe = full.join("flexarr-lookup");
    std::fs::write(&exe, b"").unwrap();

    let path_var = std::env::join_paths([&empty, &full]).unwrap();
    let found = resolve_executable("flexarr-lookup", Some(&path_var), None);
    assert_eq!(found, Some(exe.clone()));

    let only_empty = std::env::join_paths([&empty]).unwrap();
    assert_eq!(resolve_executable("flexarr-lookup", Some(&only_empty), None), None);
    assert_eq!(resolve_executable("flexarr-lookup", None, None), None);

    std::fs::remove_file(&exe).unwrap();
}

#[test]
fn resolve_empty_arg0() {
    assert_eq!(resolve_executable("", None, Some(Path::new("/"))), None);
}

#[test]
fn resolve_links_keeps_missing_path() {
    let missing = scratch_dir("links").join("no-such-executable");
    assert_eq!(resolve_links(missing.clone()), missing);
}

#[test]
fn resolve_links_follows_existing_path() {
    let dir = scratch_dir("links-existing");
    let exe = dir.join("present");
    std::fs::write(&exe, b"").unwrap();
    let resolved = resolve_links(dir.join(".").join("present"));
    assert_eq!(resolved, std::fs::canonicalize(&exe).unwrap());
    std::fs::remove_file(&exe).unwrap();
}
