use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// Well-known database filename produced by the build system.
pub const COMPILE_COMMANDS_FILE: &str = "compile_commands.json";

/// One entry of a compilation database: a single compiled source file.
///
/// Matches the de facto standard `compile_commands.json` element. Extra
/// fields emitted by some build systems (`output`, `arguments`, ...) are
/// ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileCommand {
    /// Working directory the command was issued from.
    pub directory: String,

    /// Source file path, usually relative to `directory`.
    pub file: String,

    /// Exact shell command line used to compile the file.
    pub command: String,
}

/// Failure to load the compilation database. Always fatal: the run aborts
/// before any analyzer process is spawned.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("compilation database not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read compilation database at {}", path.display())]
    Io {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to parse compilation database at {}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load `compile_commands.json` from a build directory.
///
/// The database is a JSON array of [`CompileCommand`] objects; entry order
/// is preserved. The file is read once and never written back.
pub fn load(build_dir: &Path) -> Result<Vec<CompileCommand>, DbError> {
    let path = build_dir.join(COMPILE_COMMANDS_FILE);

    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(DbError::NotFound { path });
        }
        Err(e) => return Err(DbError::Io { path, source: e }),
    };

    serde_json::from_str(&contents).map_err(|e| DbError::Parse { path, source: e })
}
