#[macro_export]
macro_rules! assert_env_eq {
    ($env:ident, $fixture:expr) => {
        for (key, expected_value) in $fixture {
            let actual_value = $env.get(key);

            assert!(actual_value.is_some(), "{key} is expected to be set, but isn't");
            let actual_value = actual_value.unwrap();
            assert_eq!(actual_value, expected_value, "{key} is expected to be {expected_value:?}, but is {actual_value:?}");
        }
    };
}

#[macro_export]
macro_rules! env_map {
    ($($key:expr => $value:expr),* $(,)?) => {
        std::collections::HashMap::<String, String>::from([
            $(($key.to_string(), $value.to_string())),*
        ])
    };
}
