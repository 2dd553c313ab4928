mod common;

use std::collections::HashMap;

use dotref::resolve;

#[test]
fn test_plain_reference() {
    let mut env = env_map!();
    assert_eq!(resolve("${ENV_TEST}/bin", &mut env), "/bin");

    env.insert("ENV_TEST".into(), "/usr/local".into());
    assert_eq!(resolve("${ENV_TEST}/bin", &mut env), "/usr/local/bin");

    env.insert("ENV_TEST_BIN".into(), "bin".into());
    assert_eq!(resolve("${ENV_TEST}/${ENV_TEST_BIN}", &mut env), "/usr/local/bin");
}

#[test]
fn test_nested_reference() {
    let mut env = env_map!(
        "ENV_TEST" => "/usr/local",
        "TEST_USER" => "TEST",
    );
    assert_eq!(resolve("${ENV_${TEST_USER}}/bin/${TEST_USER}", &mut env), "/usr/local/bin/TEST");
}

#[test]
fn test_fallback_does_not_modify_env() {
    let mut env = env_map!();
    assert_eq!(resolve("${A:-x}", &mut env), "x");
    assert!(env.is_empty());

    env.insert("A".into(), "bingo".into());
    assert_eq!(resolve("${A:-x}", &mut env), "bingo");
    assert_env_eq!(env, [("A", "bingo")]);
    assert_eq!(env.len(), 1);
}

#[test]
fn test_assign_sets_only_when_unset() {
    let mut env = env_map!();
    assert_eq!(resolve("${A:=x}", &mut env), "x");
    assert_env_eq!(env, [("A", "x")]);

    env.insert("A".into(), "bingo".into());
    assert_eq!(resolve("${A:=y}", &mut env), "bingo");
    assert_env_eq!(env, [("A", "bingo")]);
}

#[test]
fn test_empty_value_counts_as_set() {
    let mut env = env_map!("A" => "");
    assert_eq!(resolve("[${A:-x}]", &mut env), "[]");
    assert_eq!(resolve("[${A:=x}]", &mut env), "[]");
    assert_env_eq!(env, [("A", "")]);
}

#[test]
fn test_assign_is_visible_later_in_same_value() {
    let mut env = env_map!();
    assert_eq!(resolve("${A:=one}-${A:-two}-${A}", &mut env), "one-one-one");
}

#[test]
fn test_nested_defaults() {
    let mut env = env_map!();
    assert_eq!(
        resolve("${MY_ROOT:-${HOME_DIR:=/home}/my}/${ETC_NAME:=etc}", &mut env),
        "/home/my/etc");
    assert_env_eq!(env, [("HOME_DIR", "/home"), ("ETC_NAME", "etc")]);
    assert!(!env.contains_key("MY_ROOT"));

    // the default is resolved even when it isn't used
    let mut env = env_map!("MY_ROOT" => "/myroot");
    assert_eq!(
        resolve("${MY_ROOT:-${HOME_DIR:=/home}/my}/${ETC_NAME:=etc}", &mut env),
        "/myroot/etc");
    assert_env_eq!(env, [("HOME_DIR", "/home")]);
}

#[test]
fn test_only_first_operator_splits() {
    let mut env = env_map!();
    assert_eq!(resolve("${A:-x:=y}", &mut env), "x:=y");
    assert!(env.is_empty());

    assert_eq!(resolve("${B:=x:-y}", &mut env), "x:-y");
    assert_env_eq!(env, [("B", "x:-y")]);
}

#[test]
fn test_unbalanced_is_literal() {
    let mut env = env_map!("B" => "b");
    assert_eq!(resolve("${A", &mut env), "${A");
    assert_eq!(resolve("x${A_${B}", &mut env), "x${A_b");
    assert_eq!(resolve("}${B}}", &mut env), "}b}");
    assert_eq!(resolve("$B {B}", &mut env), "$B {B}");
}

#[test]
fn test_values_are_not_rescanned() {
    let mut env = env_map!("A" => "${B}", "B" => "b");
    assert_eq!(resolve("${A}", &mut env), "${B}");
}

#[test]
fn test_invalid_assign_name_is_not_stored() {
    let mut env = HashMap::<String, String>::new();
    assert_eq!(resolve("${:=x}", &mut env), "x");
    assert!(env.is_empty());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 50_000;
    let mut env = env_map!();
    let raw = format!("{}{}", "${".repeat(depth), "}".repeat(depth));
    assert_eq!(resolve(&raw, &mut env), "");

    let mut env = env_map!("A" => "deep");
    let raw = format!("{}A{}", "${A:-".repeat(depth), "}".repeat(depth));
    assert_eq!(resolve(&raw, &mut env), "deep");
}

#[test]
fn test_long_unbalanced_input_is_linear() {
    let mut env = env_map!();
    let raw = "${".repeat(40_000);
    let started = std::time::Instant::now();
    assert_eq!(resolve(&raw, &mut env), raw);
    assert!(started.elapsed() < std::time::Duration::from_secs(5), "took {:?}", started.elapsed());
}
