//! Locate and bind the pdfium shared library.
//!
//! Resolution order (first match wins):
//!
//! 1. `PDFIUM_LIB_PATH`: explicit path to `libpdfium.{so,dylib}` / `pdfium.dll`.
//! 2. The platform library next to the running executable.
//! 3. The platform library in the current working directory.
//! 4. The system library search path.
//!
//! pdfium is initialised once per process. `Pdfium::new` initialises the
//! library and dropping a `Pdfium` destroys it, so a second instance going
//! out of scope would pull the engine from under every other open document.
//! All callers share the instance returned by [`shared_pdfium`].

use crate::error::DeblankError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

// ── Process-wide engine ──────────────────────────────────────────────────────

static PDFIUM: OnceLock<Pdfium> = OnceLock::new();
static BIND_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide pdfium instance, bound on first use.
///
/// A failed bind is not cached; the next call tries again.
pub fn shared_pdfium() -> Result<&'static Pdfium, DeblankError> {
    if let Some(pdfium) = PDFIUM.get() {
        return Ok(pdfium);
    }

    // Only one thread may construct a `Pdfium`: a losing duplicate would
    // tear the library down when dropped.
    let _guard = BIND_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(pdfium) = PDFIUM.get() {
        return Ok(pdfium);
    }
    let bound = bind_pdfium()?;
    info!("pdfium bound");
    Ok(PDFIUM.get_or_init(|| bound))
}

// ── Library resolution ───────────────────────────────────────────────────────

fn bind_pdfium() -> Result<Pdfium, DeblankError> {
    if let Ok(p) = std::env::var(PDFIUM_LIB_PATH_ENV) {
        if !p.is_empty() {
            return bind_pdfium_from_path(Path::new(&p));
        }
    }

    for dir in candidate_dirs() {
        let lib = Pdfium::pdfium_platform_library_name_at_path(&dir);
        if lib.exists() {
            debug!("Binding pdfium from {}", lib.display());
            return bind_pdfium_from_path(&lib);
        }
    }

    debug!("Binding pdfium from the system library path");
    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| DeblankError::EngineUnavailable(e.to_string()))
}

fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, DeblankError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| {
            DeblankError::EngineUnavailable(format!("'{}': {}", path.display(), e))
        })
}

fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }
    dirs.push(PathBuf::from("./"));
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_dirs_end_with_cwd() {
        let dirs = candidate_dirs();
        assert_eq!(dirs.last(), Some(&PathBuf::from("./")));
    }

    #[test]
    fn missing_library_is_engine_unavailable() {
        let err = bind_pdfium_from_path(Path::new("/definitely/not/libpdfium.so")).unwrap_err();
        assert!(matches!(err, DeblankError::EngineUnavailable(_)));
        assert!(err.to_string().contains("/definitely/not/libpdfium.so"));
    }
}
