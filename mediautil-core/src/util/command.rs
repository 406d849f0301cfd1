use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error};

use crate::error::{CoreError, CoreResult};

/// How often a running child is polled when a timeout is set.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a killed command's output pipe may stay open before we stop reading.
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Options controlling a single [`run_cmd`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Print the command and return without executing it.
    pub dry_run: bool,
    /// Print the command before executing it.
    pub verbose: bool,
    /// Kill the process if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Executes an argument-array command and returns its combined output.
///
/// Implemented by [`SystemCommandRunner`] for real processes. Tests substitute
/// their own implementation to feed canned tool output to callers such as the
/// ffprobe wrapper.
pub trait CommandRunner {
    /// Returns `Ok(None)` for dry runs, `Ok(Some(output))` otherwise.
    fn run(&self, cmd: &[String], options: &RunOptions) -> CoreResult<Option<String>>;
}

/// [`CommandRunner`] that spawns real processes through [`run_cmd`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, cmd: &[String], options: &RunOptions) -> CoreResult<Option<String>> {
        run_cmd(cmd, options)
    }
}

/// Run a command passed as an argument array, without a shell.
///
/// With `dry_run` or `verbose` set, the shell-quoted command is printed to
/// stdout first; a dry run stops there and returns `Ok(None)`. Otherwise the
/// process runs with stdout and stderr attached to one shared pipe, so the
/// returned text keeps the order in which the two streams were written.
///
/// A non-zero exit yields [`CoreError::CommandFailed`]; spawn failures,
/// timeouts and read errors yield [`CoreError::CommandError`]. Both carry the
/// rendered command and everything captured.
pub fn run_cmd<S: AsRef<str>>(cmd: &[S], options: &RunOptions) -> CoreResult<Option<String>> {
    let rendered = quote_command(cmd);

    if options.dry_run || options.verbose {
        println!("{rendered}");
        if options.dry_run {
            return Ok(None);
        }
    }

    let Some((program, args)) = cmd.split_first() else {
        return Err(CoreError::CommandError {
            command: rendered,
            output: "empty command".to_string(),
        });
    };

    debug!("Executing command: {rendered}");

    let (reader, writer) = io::pipe().map_err(|e| general_error(&rendered, "Failed to create output pipe", e))?;
    let stderr_writer = writer
        .try_clone()
        .map_err(|e| general_error(&rendered, "Failed to create output pipe", e))?;

    let mut command = Command::new(program.as_ref());
    command
        .args(args.iter().map(AsRef::as_ref))
        .stdout(writer)
        .stderr(stderr_writer);

    // A timed-out command is killed as a whole group, so helpers it started
    // cannot keep the output pipe open.
    #[cfg(unix)]
    if options.timeout.is_some() {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let spawned = command.spawn();
    // The write ends live inside `command`; the reader only sees EOF once
    // they are closed here and in the child.
    drop(command);

    let mut child = spawned.map_err(|e| {
        error!("Failed to spawn command {rendered}: {e}");
        general_error(&rendered, "Failed to spawn command", e)
    })?;

    let buffer = Arc::new(Mutex::new(Vec::new()));
    let collector = spawn_collector(reader, Arc::clone(&buffer));

    let waited = match options.timeout {
        Some(timeout) => wait_with_timeout(&mut child, timeout),
        None => child.wait().map(Some),
    };
    if waited.is_err() {
        let _ = child.kill();
        let _ = child.wait();
    }

    let grace = matches!(waited, Ok(None) | Err(_)).then_some(DRAIN_GRACE);
    let output = finish_collector(collector, &buffer, grace)
        .map_err(|e| general_error(&rendered, "Failed to read command output", e))?;

    match waited {
        Ok(Some(status)) if status.success() => Ok(Some(output)),
        Ok(Some(status)) => {
            error!(
                "Command failed with exit code {}: {rendered}",
                status.code().unwrap_or(-1)
            );
            Err(CoreError::CommandFailed {
                command: rendered,
                code: status.code(),
                output,
            })
        }
        Ok(None) => {
            let secs = options.timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
            error!("Command timed out after {secs} seconds: {rendered}");
            Err(CoreError::CommandError {
                command: rendered,
                output: format!("Command timed out after {secs} seconds\n{output}"),
            })
        }
        Err(e) => Err(CoreError::CommandError {
            command: rendered,
            output: format!("Error waiting for process: {e}\n{output}"),
        }),
    }
}

fn general_error(command: &str, context: &str, err: io::Error) -> CoreError {
    CoreError::CommandError {
        command: command.to_string(),
        output: format!("{context}: {err}"),
    }
}

fn lock(buffer: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_collector(
    mut reader: io::PipeReader,
    buffer: Arc<Mutex<Vec<u8>>>,
) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        let mut chunk = [0u8; 8192];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => return Ok(()),
                Ok(n) => lock(&buffer).extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    })
}

/// Waits for the reader thread and decodes what it captured.
///
/// With `grace` set the wait is bounded: a process outside our control may
/// still hold the pipe, in which case the reader is left behind and the
/// output captured so far is returned.
fn finish_collector(
    collector: JoinHandle<io::Result<()>>,
    buffer: &Mutex<Vec<u8>>,
    grace: Option<Duration>,
) -> io::Result<String> {
    if let Some(grace) = grace {
        let deadline = Instant::now() + grace;
        while !collector.is_finished() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
        if !collector.is_finished() {
            debug!("Output pipe still open after kill, keeping partial output");
            return Ok(String::from_utf8_lossy(&lock(buffer)).into_owned());
        }
    }

    collector
        .join()
        .map_err(|_| io::Error::other("output reader thread panicked"))??;
    Ok(String::from_utf8_lossy(&lock(buffer)).into_owned())
}

/// Polls the child until it exits or `timeout` elapses.
///
/// Returns `Ok(None)` after killing and reaping a child that ran too long.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            kill_process_group(child)?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kills the child and, on unix, every process in the group it leads.
///
/// Only valid for children spawned with `process_group(0)`.
fn kill_process_group(child: &mut Child) -> io::Result<()> {
    #[cfg(unix)]
    {
        if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
            // SAFETY: killpg only sends a signal. The group id is our own
            // child's pid, which stays reserved until we reap it.
            if unsafe { libc::killpg(pgid, libc::SIGKILL) } == 0 {
                return Ok(());
            }
        }
    }
    child.kill()
}

/// Quote a single token for a POSIX shell.
///
/// Tokens made only of `[A-Za-z0-9_@%+=:,./-]` are returned unchanged, the
/// empty string becomes `''`, anything else is single-quoted.
pub fn shell_quote(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if token.bytes().all(|b| {
        matches!(b,
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' |
            b'_' | b'@' | b'%' | b'+' | b'=' | b':' | b',' | b'.' | b'/' | b'-'
        )
    }) {
        return token.to_string();
    }

    let mut out = String::with_capacity(token.len() + 2);
    out.push('\'');
    for ch in token.chars() {
        if ch == '\'' {
            out.push_str("'\"'\"'");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Render an argument array as a copy-pasteable shell command line.
pub fn quote_command<S: AsRef<str>>(cmd: &[S]) -> String {
    cmd.iter()
        .map(|token| shell_quote(token.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote(""), "''");
        assert_eq!(shell_quote("ffprobe"), "ffprobe");
        assert_eq!(shell_quote("-select_streams"), "-select_streams");
        assert_eq!(shell_quote("v:0"), "v:0");
        assert_eq!(shell_quote("/tmp/a,b=c@d%e+f.mkv"), "/tmp/a,b=c@d%e+f.mkv");
        assert_eq!(shell_quote("my file.mkv"), "'my file.mkv'");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote("it's"), "'it'\"'\"'s'");
    }

    #[test]
    fn test_quote_command() {
        let cmd = ["echo", "hello world", "a;b"];
        assert_eq!(quote_command(&cmd), "echo 'hello world' 'a;b'");
        assert_eq!(quote_command::<&str>(&[]), "");
    }

    #[test]
    fn test_dry_run_skips_execution() {
        let cmd = ["surely-not-a-real-program-4a1f", "--flag"];
        let result = run_cmd(&cmd, &RunOptions::new().dry_run(true));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_empty_command_is_an_error() {
        let cmd: [&str; 0] = [];
        let result = run_cmd(&cmd, &RunOptions::new());
        assert!(matches!(result, Err(CoreError::CommandError { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_echo() {
        let output = run_cmd(&["echo", "test"], &RunOptions::new()).unwrap();
        assert_eq!(output.as_deref(), Some("test\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_and_stderr_are_combined_in_order() {
        let cmd = ["sh", "-c", "echo out; echo err 1>&2; echo again"];
        let output = run_cmd(&cmd, &RunOptions::new()).unwrap();
        assert_eq!(output.as_deref(), Some("out\nerr\nagain\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_carries_output() {
        let cmd = ["sh", "-c", "echo partial; echo broken 1>&2; exit 3"];
        match run_cmd(&cmd, &RunOptions::new()) {
            Err(CoreError::CommandFailed { command, code, output }) => {
                assert_eq!(command, "sh -c 'echo partial; echo broken 1>&2; exit 3'");
                assert_eq!(code, Some(3));
                assert_eq!(output, "partial\nbroken\n");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_false_fails() {
        let err = run_cmd(&["false"], &RunOptions::new()).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed { code: Some(1), .. }));
        assert_eq!(err.output(), Some(""));
    }

    #[test]
    fn test_missing_program_is_command_error() {
        let err = run_cmd(&["surely-not-a-real-program-4a1f"], &RunOptions::new()).unwrap_err();
        match err {
            CoreError::CommandError { command, output } => {
                assert_eq!(command, "surely-not-a-real-program-4a1f");
                assert!(output.starts_with("Failed to spawn command"));
            }
            other => panic!("expected CommandError, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let options = RunOptions::new().timeout(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = run_cmd(&["sleep", "5"], &options).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(4));
        match err {
            CoreError::CommandError { output, .. } => assert!(output.contains("timed out")),
            other => panic!("expected CommandError, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_grandchildren() {
        let options = RunOptions::new().timeout(Some(Duration::from_millis(300)));
        let start = Instant::now();
        let err = run_cmd(&["sh", "-c", "echo started; sleep 4; echo done"], &options).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(2));
        match err {
            CoreError::CommandError { output, .. } => {
                assert!(output.contains("timed out"));
                assert!(output.contains("started"));
                assert!(!output.contains("done"));
            }
            other => panic!("expected CommandError, got {other:?}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_timeout_returns_when_pipe_outlives_group() {
        // setsid moves the sleeper out of our process group, so only the
        // bounded drain gets us out.
        let options = RunOptions::new().timeout(Some(Duration::from_millis(300)));
        let start = Instant::now();
        let err = run_cmd(&["sh", "-c", "setsid sleep 4 & wait"], &options).unwrap_err();
        assert!(start.elapsed() < Duration::from_secs(2));
        assert!(matches!(err, CoreError::CommandError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_not_hit_returns_output() {
        let options = RunOptions::new().timeout(Some(Duration::from_secs(10)));
        let output = run_cmd(&["echo", "quick"], &options).unwrap();
        assert_eq!(output.as_deref(), Some("quick\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_delegates() {
        let cmd = vec!["printf".to_string(), "%s".to_string(), "x".to_string()];
        let output = SystemCommandRunner.run(&cmd, &RunOptions::new()).unwrap();
        assert_eq!(output.as_deref(), Some("x"));
    }
}
