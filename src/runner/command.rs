//! Process execution
//!
//! Tasks run with the parent's stdin, stdout and stderr so their output
//! streams live. The exit status is handed back untouched.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::ExecutionContext;
use crate::script::FALLBACK_SHELL;
use std::io;
use std::path::Path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};

/// Spawn the task described by `ctx` and wait for it to finish
pub fn execute(ctx: &ExecutionContext) -> ExecutionResult<i32> {
    let mut command = StdCommand::new(&ctx.program);
    command.args(&ctx.args);
    command.current_dir(&ctx.working_dir);

    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command.status().map_err(|e| ExecutionError::SpawnFailed {
        program: ctx.program.display().to_string(),
        source: e,
    })?;

    Ok(exit_code(status))
}

/// Check if a shell command succeeds, output suppressed
pub fn check_command(cmd_str: &str, dir: &Path) -> bool {
    StdCommand::new(FALLBACK_SHELL)
        .arg("-c")
        .arg(cmd_str)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Exit code of a finished child; signals map to `128 + signal`
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Add the user execute bit to a script that lacks it
#[cfg(unix)]
pub fn ensure_executable(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    let mode = permissions.mode();
    if mode & 0o100 != 0 {
        return Ok(false);
    }

    permissions.set_mode(mode | 0o100);
    std::fs::set_permissions(path, permissions)?;
    Ok(true)
}

#[cfg(not(unix))]
pub fn ensure_executable(_path: &Path) -> io::Result<bool> {
    Ok(false)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sh(script: &str, dir: &Path) -> ExecutionContext {
        ExecutionContext {
            working_dir: dir.to_path_buf(),
            program: PathBuf::from("sh"),
            args: vec![OsString::from("-c"), OsString::from(script)],
            changes_dir: false,
        }
    }

    #[test]
    fn test_execute_success() {
        let temp = TempDir::new().unwrap();
        assert_eq!(execute(&sh("true", temp.path())).unwrap(), 0);
    }

    #[test]
    fn test_execute_returns_exact_exit_code() {
        let temp = TempDir::new().unwrap();
        assert_eq!(execute(&sh("exit 42", temp.path())).unwrap(), 42);
    }

    #[test]
    fn test_execute_in_working_dir() {
        let temp = TempDir::new().unwrap();
        let code = execute(&sh("pwd > here.txt", temp.path())).unwrap();
        assert_eq!(code, 0);

        let written = fs::read_to_string(temp.path().join("here.txt")).unwrap();
        assert_eq!(
            PathBuf::from(written.trim()).canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn test_signal_exit_code() {
        let temp = TempDir::new().unwrap();
        assert_eq!(execute(&sh("kill -9 $$", temp.path())).unwrap(), 137);
    }

    #[test]
    fn test_spawn_failure_is_distinct() {
        let temp = TempDir::new().unwrap();
        let ctx = ExecutionContext {
            working_dir: temp.path().to_path_buf(),
            program: PathBuf::from("qox-no-such-interpreter-4711"),
            args: vec![],
            changes_dir: false,
        };

        assert!(matches!(
            execute(&ctx),
            Err(ExecutionError::SpawnFailed { .. })
        ));
    }

    #[test]
    fn test_check_command() {
        let temp = TempDir::new().unwrap();
        assert!(check_command("true", temp.path()));
        assert!(!check_command("false", temp.path()));
        assert!(!check_command("true", &temp.path().join("missing")));
    }

    #[test]
    fn test_ensure_executable() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("a.sh");
        fs::write(&script, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

        assert!(ensure_executable(&script).unwrap());
        assert!(!ensure_executable(&script).unwrap());

        let mode = fs::metadata(&script).unwrap().permissions().mode();
        assert_ne!(mode & 0o100, 0);
    }
}
