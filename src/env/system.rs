use std::{borrow::Cow, ffi::OsStr, sync::Mutex};

use tracing::warn;

use super::{is_settable, Env, GetEnv};

/// `std::env::set_var` is not thread safe. This mutex only serializes access
/// made through [`SystemEnv`]; other code touching the environment directly
/// is not covered.
static MUTEX: Mutex<()> = Mutex::new(());

/// The process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv();

pub const SYSTEM_ENV: SystemEnv = SystemEnv();

impl SystemEnv {
    #[inline]
    pub fn new() -> Self {
        Self()
    }
}

impl GetEnv for SystemEnv {
    fn get<'a>(&'a self, key: &OsStr) -> Option<Cow<'a, OsStr>> {
        if !is_settable(key, OsStr::new("")) {
            return None;
        }

        let _lock = MUTEX.lock();
        std::env::var_os(key).map(Cow::from)
    }
}

impl Env for SystemEnv {
    fn set(&mut self, key: &OsStr, value: &OsStr) {
        // set_var panics on these instead of returning an error
        if !is_settable(key, value) {
            warn!(?key, ?value, "not a valid environment variable, ignored");
            return;
        }

        let _lock = MUTEX.lock();
        std::env::set_var(key, value);
    }
}
