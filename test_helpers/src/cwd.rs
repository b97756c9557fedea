//! Helpers for safely changing the process working directory in tests.
//!
//! Relative paths given to `parse_file` resolve against the working
//! directory, which is process-global. [`set_dir`] serialises access with a
//! global mutex and restores the previous directory when the guard drops.
//!
//! # Examples
//!
//! ```no_run
//! use hpman_test_helpers::cwd;
//!
//! let guard = cwd::set_dir("/tmp/sources").expect("set cwd");
//! assert!(!guard.original().as_str().is_empty());
//! ```

use std::sync::LazyLock;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::{Mutex, MutexGuard};

static CWD_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(Mutex::default);

/// Restores the working directory on drop.
#[must_use = "dropping restores the prior working directory"]
pub struct CwdGuard {
    original: Utf8PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Directory that was current before the guard was created.
    #[must_use]
    pub fn original(&self) -> &Utf8Path {
        &self.original
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _restored = std::env::set_current_dir(&self.original);
    }
}

/// Changes the working directory to `path` until the returned guard drops.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read, is not UTF-8,
/// or `path` cannot be entered.
pub fn set_dir(path: impl AsRef<Utf8Path>) -> Result<CwdGuard> {
    let lock = CWD_MUTEX.lock();
    let current = std::env::current_dir().context("read current dir")?;
    let original = Utf8PathBuf::from_path_buf(current)
        .map_err(|non_utf8| anyhow!("cwd is not valid UTF-8: {}", non_utf8.display()))?;
    std::env::set_current_dir(path.as_ref()).context("set current dir")?;
    Ok(CwdGuard {
        original,
        _lock: lock,
    })
}
