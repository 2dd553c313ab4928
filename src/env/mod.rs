pub mod system;

use std::{borrow::Cow, collections::HashMap, ffi::{OsStr, OsString}, hash::BuildHasher};

use tracing::warn;

use crate::{options::{IllegalOption, OptionType, DEFAULT_OVERRIDE_ENV, DEFAULT_PATH, DEFAULT_REQUIRED}, Result};

pub use system::{SystemEnv, SYSTEM_ENV};

pub const CONFIG_PATH_KEY: &str = "DOTREF_CONFIG_PATH";
pub const CONFIG_OVERRIDE_KEY: &str = "DOTREF_CONFIG_OVERRIDE";
pub const CONFIG_REQUIRED_KEY: &str = "DOTREF_CONFIG_REQUIRED";

pub fn parse_bool(value: &OsStr) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Some(false)
    } else {
        None
    }
}

/// Whether the operating system accepts `key`/`value` as an environment
/// variable: the key must be non-empty and neither may contain `=` (key only)
/// or NUL.
pub fn is_settable(key: &OsStr, value: &OsStr) -> bool {
    let key = key.as_encoded_bytes();
    !key.is_empty() &&
    !key.contains(&b'=') &&
    !key.contains(&0) &&
    !value.as_encoded_bytes().contains(&0)
}

/// Read access to an environment store.
pub trait GetEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>>;

    /// Value of `key` as a string, decoding lossily.
    #[inline]
    fn get_lossy(&self, key: &str) -> Option<String> {
        self.get(key.as_ref()).map(|value| value.to_string_lossy().into_owned())
    }

    #[inline]
    fn contains(&self, key: &OsStr) -> bool {
        self.get(key).is_some()
    }

    #[inline]
    fn get_config_path(&self) -> Cow<'_, OsStr> {
        self.get(CONFIG_PATH_KEY.as_ref())
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| {
                Cow::from(OsStr::new(DEFAULT_PATH))
            })
    }

    #[inline]
    fn get_override_env(&self) -> Result<bool> {
        self.get_bool(CONFIG_OVERRIDE_KEY.as_ref(), DEFAULT_OVERRIDE_ENV)
    }

    #[inline]
    fn get_required(&self) -> Result<bool> {
        self.get_bool(CONFIG_REQUIRED_KEY.as_ref(), DEFAULT_REQUIRED)
    }

    fn get_bool(&self, key: &OsStr, default_value: bool) -> Result<bool> {
        let Some(value) = self.get(key) else {
            return Ok(default_value);
        };

        if value.is_empty() {
            return Ok(default_value);
        }

        let Some(flag) = parse_bool(&value) else {
            return Err(IllegalOption::new(
                key.to_owned(),
                value.into_owned(),
                OptionType::Bool).into());
        };

        Ok(flag)
    }
}

/// Read/write access to an environment store.
pub trait Env: GetEnv {
    fn set(&mut self, key: &OsStr, value: &OsStr);

    /// Like [`Env::set`], but refuses keys and values the operating system
    /// would reject. Returns whether the value was stored.
    fn try_set(&mut self, key: &OsStr, value: &OsStr) -> bool {
        if !is_settable(key, value) {
            warn!(?key, ?value, "not a valid environment variable, ignored");
            return false;
        }
        self.set(key, value);
        true
    }
}

impl<T: GetEnv + ?Sized> GetEnv for &T {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        (**self).get(key)
    }
}

impl<T: GetEnv + ?Sized> GetEnv for &mut T {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        (**self).get(key)
    }
}

impl<T: Env + ?Sized> Env for &mut T {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        (**self).set(key, value);
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<OsString, OsString, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key).map(|value| Cow::Borrowed(value.as_os_str()))
    }
}

impl<BH: BuildHasher> Env for HashMap<OsString, OsString, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        self.insert(key.to_os_string(), value.to_os_string());
    }
}

impl<BH: BuildHasher> GetEnv for HashMap<String, String, BH> {
    #[inline]
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        HashMap::get(self, key.to_string_lossy().as_ref()).map(|value| {
            let value: &OsStr = value.as_ref();
            Cow::from(value)
        })
    }
}

impl<BH: BuildHasher> Env for HashMap<String, String, BH> {
    #[inline]
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        self.insert(key.to_string_lossy().into_owned(), value.to_string_lossy().into_owned());
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, ffi::OsStr};

    use super::{is_settable, GetEnv};

    #[test]
    fn settable_keys() {
        assert!(is_settable(OsStr::new("FOO"), OsStr::new("")));
        assert!(!is_settable(OsStr::new(""), OsStr::new("x")));
        assert!(!is_settable(OsStr::new("A=B"), OsStr::new("x")));
        assert!(!is_settable(OsStr::new("A\0"), OsStr::new("x")));
        assert!(!is_settable(OsStr::new("A"), OsStr::new("x\0y")));
    }

    #[test]
    fn bool_options() {
        let mut env = HashMap::<String, String>::new();
        assert_eq!(env.get_bool("FLAG".as_ref(), true).ok(), Some(true));

        env.insert("FLAG".into(), "".into());
        assert_eq!(env.get_bool("FLAG".as_ref(), true).ok(), Some(true));

        env.insert("FLAG".into(), "FALSE".into());
        assert_eq!(env.get_bool("FLAG".as_ref(), true).ok(), Some(false));

        env.insert("FLAG".into(), "1".into());
        assert_eq!(env.get_bool("FLAG".as_ref(), false).ok(), Some(true));

        env.insert("FLAG".into(), "yes".into());
        assert!(env.get_bool("FLAG".as_ref(), false).is_err());
    }
}
