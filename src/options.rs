use std::{borrow::Cow, collections::HashMap, ffi::{OsStr, OsString}, path::Path};

use thiserror::Error;

use crate::{env::{Env, GetEnv, SystemEnv, SYSTEM_ENV}, Result};

#[derive(Debug, PartialEq, Clone)]
pub struct Options<P=&'static str>
where P: AsRef<Path> + Clone {
    /// Override existing environment variables.
    pub override_env: bool,

    /// Fail when the file can't be read. When `false` an unreadable file is
    /// logged and treated as empty.
    pub required: bool,

    pub path: P,
}

pub const DEFAULT_PATH: &str = ".env";
pub const DEFAULT_OVERRIDE_ENV: bool = false;
pub const DEFAULT_REQUIRED: bool = true;

impl Default for Options {
    #[inline]
    fn default() -> Self {
        Self::with_path(DEFAULT_PATH)
    }
}

impl<'a> Options<Cow<'a, OsStr>> {
    /// Reads `DOTREF_CONFIG_PATH`, `DOTREF_CONFIG_OVERRIDE` and
    /// `DOTREF_CONFIG_REQUIRED` from `env`.
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let override_env = env.get_override_env()?;
        let required = env.get_required()?;
        let path = env.get_config_path();

        Ok(Self { override_env, required, path })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        Self::try_from(&SYSTEM_ENV)
    }
}

impl<P> Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            override_env: DEFAULT_OVERRIDE_ENV,
            required: DEFAULT_REQUIRED,
            path,
        }
    }

    /// Loads into the process environment.
    #[inline]
    pub fn config(&self) -> Result<()> {
        crate::config_with_options(&mut SystemEnv(), self)
    }

    #[inline]
    pub fn config_env(&self, env: &mut impl Env) -> Result<()> {
        crate::config_with_options(env, self)
    }

    /// Loads into a fresh map. References only see variables the file itself
    /// defines.
    #[inline]
    pub fn config_new(&self) -> Result<HashMap<OsString, OsString>> {
        let mut env = HashMap::new();
        crate::config_with_options(&mut env, self)?;
        Ok(env)
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum OptionType {
    Bool,
}

impl std::fmt::Display for OptionType {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self, f)
    }
}

#[derive(Debug, Error)]
#[error("{option_type} option has illegal value: {name:?}={value:?}")]
pub struct IllegalOption {
    name: OsString,
    value: OsString,
    option_type: OptionType,
}

impl IllegalOption {
    #[inline]
    pub fn new(name: OsString, value: OsString, option_type: OptionType) -> Self {
        Self { name, value, option_type }
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &OsStr {
        &self.value
    }

    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Builder<P=&'static str>
where P: AsRef<Path> + Clone {
    options: Options<P>,
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Self { options: Options::default() }
    }
}

impl Builder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<'a> Builder<Cow<'a, OsStr>> {
    #[inline]
    pub fn try_from(env: &'a impl GetEnv) -> Result<Self> {
        let options = Options::try_from(env)?;
        Ok(Self { options })
    }

    #[inline]
    pub fn try_from_env() -> Result<Self> {
        let options = Options::try_from_env()?;
        Ok(Self { options })
    }
}

impl<P> Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    pub fn with_path(path: P) -> Self {
        Self {
            options: Options::with_path(path)
        }
    }

    #[inline]
    pub fn override_env(mut self, value: bool) -> Self {
        self.options.override_env = value;
        self
    }

    #[inline]
    pub fn required(mut self, value: bool) -> Self {
        self.options.required = value;
        self
    }

    pub fn path<NewP>(&self, value: NewP) -> Builder<NewP>
    where NewP: AsRef<Path> + Clone {
        Builder {
            options: Options {
                override_env: self.options.override_env,
                required: self.options.required,
                path: value,
            }
        }
    }

    #[inline]
    pub fn options(&self) -> &Options<P> {
        &self.options
    }

    #[inline]
    pub fn into_options(self) -> Options<P> {
        self.options
    }

    #[inline]
    pub fn config(self) -> Result<Self> {
        self.options.config()?;
        Ok(self)
    }

    #[inline]
    pub fn config_env(self, env: &mut impl Env) -> Result<Self> {
        self.options.config_env(env)?;
        Ok(self)
    }

    #[inline]
    pub fn config_new(&self) -> Result<HashMap<OsString, OsString>> {
        self.options.config_new()
    }
}

impl<P> From<Options<P>> for Builder<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(options: Options<P>) -> Self {
        Self { options }
    }
}

impl<P> From<Builder<P>> for Options<P>
where P: AsRef<Path> + Clone {
    #[inline]
    fn from(value: Builder<P>) -> Self {
        value.into_options()
    }
}
