//! Command line arguments as a [`FlexArray`] anchored at `1`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::{Error, ErrorKind, FlexArray};

/// The arguments a program was started with.
///
/// `argv[0]` is kept apart as [`arg0`](Self::arg0); the remaining arguments
/// form [`args`](Self::args) with bounds `1 ..= argc - 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgVector {
    arg0: String,
    args: FlexArray<String>,
}

fn into_string(arg: OsString) -> Result<String, Error> {
    arg.into_string().map_err(|_| {
        Error::new(
            ErrorKind::Memory,
            "from_args",
            "argument is not valid unicode",
        )
    })
}

impl ArgVector {
    /// Collects the arguments of the current process.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_args(std::env::args_os())
    }

    /// Builds an argument vector from an explicit `argv`.
    ///
    /// A missing `argv[0]` is treated as the empty string. An argument that
    /// is not valid Unicode fails with [`Memory`](ErrorKind::Memory).
    pub fn from_args<I>(argv: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        let mut argv = argv.into_iter();
        let arg0 = match argv.next() {
            Some(arg) => into_string(arg.into())?,
            None => String::new(),
        };
        let rest = argv
            .map(|arg| into_string(arg.into()))
            .collect::<Result<Vec<_>, _>>()?;
        log::trace!("from_args({arg0:?}, {} arguments)", rest.len());
        let args = FlexArray::from_vec(1, rest).map_err(|e| e.during("from_args"))?;
        Ok(Self { arg0, args })
    }

    /// The program name exactly as it was invoked.
    pub fn arg0(&self) -> &str {
        &self.arg0
    }

    /// The arguments after `argv[0]`, indexed from `1`.
    pub fn args(&self) -> &FlexArray<String> {
        &self.args
    }

    /// Consumes the vector, returning the arguments indexed from `1`.
    pub fn into_args(self) -> FlexArray<String> {
        self.args
    }

    /// The base name of `argv[0]` without the platform executable suffix.
    pub fn program_name(&self) -> &str {
        program_name(&self.arg0)
    }

    /// Absolute path of the running executable.
    ///
    /// The operating system is asked first. If it cannot answer, `argv[0]`
    /// is resolved: an absolute path is taken as is, a bare name is looked
    /// up in `PATH` and a relative path is joined to the current directory.
    /// Fails with [`Memory`](ErrorKind::Memory) when nothing is found.
    pub fn executable_path(&self) -> Result<PathBuf, Error> {
        match std::env::current_exe() {
            Ok(path) => return Ok(resolve_links(path)),
            Err(err) => log::debug!("executable_path: falling back to argv[0]: {err}"),
        }
        let path_var = std::env::var_os("PATH");
        let cwd = std::env::current_dir().ok();
        resolve_executable(&self.arg0, path_var.as_deref(), cwd.as_deref())
            .map(resolve_links)
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::Memory,
                    "executable_path",
                    "executable could not be located",
                )
            })
    }
}

/// Resolves symlinks in `path`, keeping it unresolved if that fails.
pub(crate) fn resolve_links(path: PathBuf) -> PathBuf {
    match std::fs::canonicalize(&path) {
        Ok(resolved) => resolved,
        Err(err) => {
            log::debug!("executable_path: keeping {path:?} unresolved: {err}");
            path
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// Strips the directory part and the platform executable suffix from
/// `arg0`.
///
/// The suffix is only removed when `arg0` is strictly longer than it.
pub fn program_name(arg0: &str) -> &str {
    let suffix = std::env::consts::EXE_SUFFIX;
    let mut name = arg0;
    if !suffix.is_empty() && name.len() > suffix.len() && name.ends_with(suffix) {
        name = &name[..name.len() - suffix.len()];
    }
    match name.rfind(is_separator) {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Locates `arg0` without asking the operating system.
pub(crate) fn resolve_executable(
    arg0: &str,
    path_var: Option<&OsStr>,
    cwd: Option<&Path>,
) -> Option<PathBuf> {
    if arg0.is_empty() {
        return None;
    }
    let path = Path::new(arg0);
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else if !arg0.contains(is_separator) {
        std::env::split_paths(path_var?)
            .map(|dir| dir.join(arg0))
            .find(|candidate| candidate.is_file())
    } else {
        cwd.map(|cwd| cwd.join(path))
    }
}

#[cfg(test)]
#[path = "./argv_tests.rs"]
mod tests;
