use std::{ffi::OsStr, io::Read, path::Path};

use tracing::{debug, trace};

use crate::{env::{Env, SystemEnv}, interpolate::resolve, parser::parse_bytes, Error, Result};

/// Applies `.env` files and key/value mappings to an environment store.
///
/// Calls are applied strictly in order: a value may reference anything set
/// by an earlier key, including defaults assigned through `${NAME:=...}`.
/// Nothing is rolled back if a later call fails.
///
/// ```no_run
/// # fn main() -> dotref::Result<()> {
/// dotref::Loader::new()
///     .load(".env", false)?
///     .parse([("LOG_DIR", "${APP_ROOT:-/srv/app}/log")], false);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Loader<E: Env = SystemEnv> {
    env: E,
}

impl Loader<SystemEnv> {
    /// Loader writing to the process environment.
    #[inline]
    pub fn new() -> Self {
        Self { env: SystemEnv() }
    }
}

impl<E: Env> Loader<E> {
    #[inline]
    pub fn with_env(env: E) -> Self {
        Self { env }
    }

    #[inline]
    pub fn env(&self) -> &E {
        &self.env
    }

    #[inline]
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[inline]
    pub fn into_env(self) -> E {
        self.env
    }

    /// Reads, parses and applies the file at `path`.
    ///
    /// An unreadable file is an [`Error::Io`]. An empty file is not an error.
    pub fn load(&mut self, path: impl AsRef<Path>, overwrite: bool) -> Result<&mut Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| Error::io(path, err))?;
        debug!(path = %path.display(), size = bytes.len(), "loading");
        Ok(self.parse(parse_bytes(&bytes), overwrite))
    }

    /// Like [`Loader::load`] for an arbitrary byte source.
    pub fn load_reader(&mut self, mut reader: impl Read, overwrite: bool) -> Result<&mut Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|err| Error::io("<reader>", err))?;
        Ok(self.parse(parse_bytes(&bytes), overwrite))
    }

    /// Dereferences every value and applies it with [`Loader::set_env`], in
    /// iteration order.
    pub fn parse<I, K, V>(&mut self, pairs: I, overwrite: bool) -> &mut Self
    where I: IntoIterator<Item=(K, V)>, K: AsRef<str>, V: AsRef<str> {
        for (key, value) in pairs {
            let value = resolve(value.as_ref(), &mut self.env);
            self.set_env(key.as_ref(), &value, overwrite);
        }
        self
    }

    /// Stores `value` under `key` if `overwrite` is set or `key` is absent.
    /// Returns whether the store was written.
    pub fn set_env(&mut self, key: &str, value: &str, overwrite: bool) -> bool {
        let key = OsStr::new(key);

        if !overwrite && self.env.contains(key) {
            debug!(?key, "already defined and was NOT overwritten");
            return false;
        }

        let stored = self.env.try_set(key, OsStr::new(value));
        if stored {
            trace!(?key, value, "set");
        }
        stored
    }
}
