//! Compiler command line to analyzer command line rewriting.
//!
//! Each rewrite is a textual substitution over the shell command recorded in
//! the compilation database, not a full argument parse. Arguments with
//! unusual quoting or whitespace are outside the contract; the result is not
//! validated here and any breakage surfaces when the command is executed.

use regex::Regex;
use std::sync::LazyLock;

/// Invocation prefix selecting analyze-only mode with textual diagnostics.
pub const ANALYZER_PREFIX: &str = "clang++ --analyze -Xanalyzer -analyzer-output=text";

/// Leading compiler executable, permissively matched as everything up
/// through the first `++` token (`g++`, `ccache g++`, `/usr/bin/clang++`).
static COMPILER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^.*?\+\+").unwrap());

/// Object-file output flag and its (optionally quoted) argument.
static OBJECT_OUT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" -o '?.*\.o'?").unwrap());

static PIPE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" '?-pipe'?").unwrap());

/// Warning-control flags. The analyzer has its own diagnostic surface and
/// does not understand every compiler warning flag.
static WARNING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" '?-W[a-z0-9-=]+'?").unwrap());

/// Dependency-file generation flags without an argument: -M, -MM, -MG, -MP,
/// -MD, -MMD. Only stripped when another argument follows; the trailing
/// space is consumed and restored by the replacement.
static DEP_FLAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" '?-M(?:MD|[MGPD])?'? ").unwrap());

/// Dependency flags taking a filename argument: -MF, -MT, -MQ plus the
/// following .d/.o path, optionally quoted.
static DEP_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" '?-M[FTQ]'? '?.*?\.[do]'? ").unwrap());

/// Rewrite a compiler invocation into the equivalent analyzer invocation.
///
/// Substitutions are applied in a fixed order; the output for a given input
/// never changes between runs.
pub fn analyzer_invocation(command: &str) -> String {
    let args = COMPILER_RE.replace(command, ANALYZER_PREFIX).into_owned();
    let args = args.replace(" -c", "");
    let args = OBJECT_OUT_RE.replace_all(&args, "").into_owned();
    let args = PIPE_RE.replace_all(&args, "").into_owned();
    let args = WARNING_RE.replace_all(&args, "").into_owned();
    let args = strip_repeated(&DEP_FLAG_RE, &args);
    strip_repeated(&DEP_FILE_RE, &args)
}

/// Apply a space-delimited strip until it no longer matches.
///
/// The dependency-flag patterns consume the space after the flag to know
/// another argument follows, so a run of consecutive flags (`-MMD -MF
/// foo.d`) needs repeated passes: each pass reopens the gap the next flag
/// needs to match against.
fn strip_repeated(re: &Regex, args: &str) -> String {
    let mut current = args.to_string();

    loop {
        let next = re.replace_all(&current, " ").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}
