use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Exit code recorded when the build is killed after the timeout. Kept
/// distinct from anything a real compiler run reports.
pub const TIMEOUT_EXIT_CODE: i32 = -9;

#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
    pub success: bool,
    pub cmd: Vec<String>,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl BuildResult {
    pub fn summary(&self) -> String {
        format!(
            "Command: {}\nExit: {}\nSuccess: {}",
            self.cmd.join(" "),
            self.exit_code,
            self.success
        )
    }
}

/// Work out how to build the repo: wrapper script first, then a system tool
/// if the project marker is present. No recognizable tool is a fatal error.
pub fn detect_command(repo: &Path, skip_tests: bool) -> Result<Vec<String>, String> {
    let gradlew = repo.join(if cfg!(windows) { "gradlew.bat" } else { "gradlew" });
    let mvnw = repo.join(if cfg!(windows) { "mvnw.cmd" } else { "mvnw" });

    if gradlew.is_file() {
        make_executable(&gradlew);
        return Ok(gradle_command(
            gradlew.to_string_lossy().into_owned(),
            skip_tests,
        ));
    }
    if mvnw.is_file() {
        make_executable(&mvnw);
        return Ok(maven_command(
            mvnw.to_string_lossy().into_owned(),
            skip_tests,
        ));
    }

    let has_gradle =
        repo.join("build.gradle").exists() || repo.join("build.gradle.kts").exists();
    let has_maven = repo.join("pom.xml").exists();

    if has_gradle {
        return Ok(gradle_command("gradle".to_string(), skip_tests));
    }
    if has_maven {
        return Ok(maven_command("mvn".to_string(), skip_tests));
    }
    Err(format!(
        "Could not detect a build tool in {}",
        repo.display()
    ))
}

fn gradle_command(tool: String, skip_tests: bool) -> Vec<String> {
    let mut cmd = vec![
        tool,
        "--no-daemon".to_string(),
        "clean".to_string(),
        "build".to_string(),
    ];
    if skip_tests {
        cmd.push("-x".to_string());
        cmd.push("test".to_string());
    }
    cmd
}

fn maven_command(tool: String, skip_tests: bool) -> Vec<String> {
    let mut cmd = vec![
        tool,
        "-B".to_string(),
        "-q".to_string(),
        "clean".to_string(),
        "package".to_string(),
    ];
    if skip_tests {
        cmd.push("-DskipTests=true".to_string());
    }
    cmd
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Ok(meta) = std::fs::metadata(path) {
        let mut perms = meta.permissions();
        if perms.mode() & 0o111 == 0 {
            perms.set_mode(perms.mode() | 0o755);
            let _ = std::fs::set_permissions(path, perms);
        }
    }
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Detect, invoke, drain, wait, classify.
pub fn run_build(repo: &Path, skip_tests: bool, timeout: Duration) -> Result<BuildResult, String> {
    let cmd = detect_command(repo, skip_tests)?;
    run_command(repo, cmd, timeout)
}

/// Run a prepared command under the build rules: both output streams drained
/// concurrently, bounded wait, forced kill on timeout.
pub fn run_command(
    repo: &Path,
    cmd: Vec<String>,
    timeout: Duration,
) -> Result<BuildResult, String> {
    let mut command = Command::new(&cmd[0]);
    command
        .args(&cmd[1..])
        .current_dir(repo)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(home) = alternate_java_home() {
        command.env("JAVA_HOME", home);
    }

    let mut child = command
        .spawn()
        .map_err(|e| format!("Failed to run {}: {}", cmd[0], e))?;

    // One drain task per stream. A single blocking read would deadlock once
    // the other pipe's buffer fills.
    let stdout_task = drain(child.stdout.take());
    let stderr_task = drain(child.stderr.take());

    let exit_code = wait_with_timeout(&mut child, timeout);

    let stdout = stdout_task.join().unwrap_or_default();
    let stderr = stderr_task.join().unwrap_or_default();

    Ok(BuildResult {
        success: exit_code == 0,
        cmd,
        exit_code,
        stdout,
        stderr,
    })
}

/// Prefer an explicitly pinned JDK for the child build, if the caller's
/// environment provides one.
fn alternate_java_home() -> Option<String> {
    ["JAVA_HOME_17", "JAVA17_HOME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_string(&mut buf);
        }
        buf
    })
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> i32 {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.code().unwrap_or(-1),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return TIMEOUT_EXIT_CODE;
                }
                thread::sleep(Duration::from_millis(25));
            }
            Err(_) => return -1,
        }
    }
}
