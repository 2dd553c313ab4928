//! Load `.env` files into the process environment.
//!
//! ```text
//! # comment
//! ROOT_DIR=/usr/local
//! BIN_DIR=${ROOT_DIR}/bin          # reference an earlier key
//! TMP_DIR=${MY_TMP_DIR:-/tmp}      # fallback, MY_TMP_DIR stays unset
//! CONF_DIR=${MY_DIR:=${ROOT_DIR}/my}/etc  # default is also assigned to MY_DIR
//! NAME='single quoted # not a comment'
//! ```
//!
//! Values are dereferenced in file order against the target environment,
//! so later lines see what earlier lines (and `:=` defaults) have set.

use std::path::Path;

use tracing::warn;

pub mod env;
pub use env::{Env, GetEnv, SystemEnv};

pub mod error;
pub use error::{Error, Result};

pub mod interpolate;
pub use interpolate::{resolve, Expansion};

pub mod line_splitter;

pub mod loader;
pub use loader::Loader;

pub mod options;
pub use options::{Builder, Options};

pub mod parsed_file;
pub use parsed_file::ParsedFile;

pub mod parser;
pub use parser::{parse_bytes, parse_line, parse_str, Line};

/// Loads the file named by `DOTREF_CONFIG_PATH` (default `.env`) into the
/// process environment, configured through the `DOTREF_CONFIG_*` variables.
#[inline]
pub fn load() -> Result<()> {
    Options::try_from_env()?.config()
}

/// Loads `path` into the process environment without overwriting existing
/// variables.
#[inline]
pub fn load_from(path: impl AsRef<Path>) -> Result<()> {
    Loader::new().load(path, false)?;
    Ok(())
}

#[inline]
pub fn build() -> Builder {
    Builder::new()
}

pub(crate) fn config_with_options<P>(env: &mut impl Env, options: &Options<P>) -> Result<()>
where P: AsRef<Path> + Clone {
    let mut loader = Loader::with_env(env);

    match loader.load(options.path.as_ref(), options.override_env) {
        Ok(_) => Ok(()),
        Err(err @ Error::Io { .. }) if !options.required => {
            warn!("{err}");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
