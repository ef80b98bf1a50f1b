//! Process-level tests against the built daemon binary.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

const DAEMON: &str = env!("CARGO_BIN_EXE_telephony-daemon");

/// A daemon command isolated from the caller's configuration.
fn daemon(cwd: &Path) -> Command {
    let mut cmd = Command::new(DAEMON);
    cmd.current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("NOTIFY_SOCKET")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    cmd
}

fn status_of(cmd: &mut Command) -> ExitStatus {
    cmd.status().expect("Failed to run daemon")
}

#[cfg(unix)]
fn send_signal(pid: u32, signal: &str) {
    let status = Command::new("kill")
        .arg(format!("-{signal}"))
        .arg(pid.to_string())
        .status()
        .expect("Failed to run kill");
    assert!(status.success(), "kill -{signal} {pid} failed");
}

#[test]
fn test_help_exits_zero() {
    let cwd = tempfile::tempdir().expect("tempdir");
    let output = daemon(cwd.path())
        .arg("-h")
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run daemon");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--testload"));
}

#[test]
fn test_missing_directory_exits_non_zero() {
    let cwd = tempfile::tempdir().expect("tempdir");
    let missing = cwd.path().join("no-such-plugins");

    let status = status_of(daemon(cwd.path()).arg(&missing));
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_missing_directory_in_testload_exits_non_zero() {
    let cwd = tempfile::tempdir().expect("tempdir");
    let missing = cwd.path().join("no-such-plugins");

    let status = status_of(daemon(cwd.path()).arg("-T").arg(&missing));
    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_testload_on_empty_directory_exits_zero() {
    let plugins = tempfile::tempdir().expect("tempdir");

    let status = status_of(daemon(plugins.path()).arg("-T").arg(plugins.path()));
    assert!(status.success());
}

#[test]
fn test_unknown_arguments_are_ignored() {
    let plugins = tempfile::tempdir().expect("tempdir");

    let status = status_of(
        daemon(plugins.path())
            .arg("--bogus")
            .arg("-T")
            .arg(plugins.path())
            .arg("/opt/unused"),
    );
    assert!(status.success());
}

#[test]
fn test_testload_reports_broken_module_but_exits_zero() {
    let plugins = tempfile::tempdir().expect("tempdir");
    std::fs::write(plugins.path().join("modA.so"), b"not an object").expect("write");

    let status = status_of(daemon(plugins.path()).arg("-T").arg(plugins.path()));
    assert!(status.success());
}

/// The daemon announces readiness, survives a dump request and exits
/// cleanly on SIGTERM.
#[cfg(unix)]
#[test]
fn test_ready_dump_and_terminate() {
    use std::os::unix::net::UnixDatagram;
    use std::time::Duration;

    let plugins = tempfile::tempdir().expect("tempdir");
    let supervisor = tempfile::tempdir().expect("tempdir");
    let socket_path = supervisor.path().join("notify.sock");
    let socket = UnixDatagram::bind(&socket_path).expect("bind notify socket");
    socket
        .set_read_timeout(Some(Duration::from_secs(30)))
        .expect("set timeout");

    let mut child = daemon(plugins.path())
        .env("NOTIFY_SOCKET", &socket_path)
        .arg(plugins.path())
        .spawn()
        .expect("Failed to spawn daemon");

    let mut buf = [0u8; 64];
    let len = socket.recv(&mut buf).expect("readiness notification");
    assert_eq!(&buf[..len], b"READY=1");

    send_signal(child.id(), "USR1");
    send_signal(child.id(), "TERM");

    let status = child.wait().expect("wait");
    assert!(status.success(), "daemon exited with {status:?}");
}

/// SIGUSR1 arriving while a dry run is still opening modules must not
/// kill the process.
#[cfg(unix)]
#[test]
fn test_dump_signal_during_testload_is_absorbed() {
    use std::io::Write;
    use std::sync::mpsc;
    use std::time::Duration;

    let plugins = tempfile::tempdir().expect("tempdir");
    let fifo = plugins.path().join("modA.so");
    let made = Command::new("mkfifo").arg(&fifo).status().expect("Failed to run mkfifo");
    assert!(made.success());

    let mut child = daemon(plugins.path())
        .arg("-T")
        .arg(plugins.path())
        .spawn()
        .expect("Failed to spawn daemon");

    // Opening the write end blocks until the loader opens the module.
    let (tx, rx) = mpsc::channel();
    let writer_path = fifo.clone();
    std::thread::spawn(move || {
        let writer = std::fs::OpenOptions::new().write(true).open(writer_path);
        let _ = tx.send(writer);
    });
    let mut writer = rx
        .recv_timeout(Duration::from_secs(30))
        .expect("loader never opened the module")
        .expect("open fifo for writing");

    send_signal(child.id(), "USR1");
    std::thread::sleep(Duration::from_millis(200));

    writer.write_all(b"not an object").expect("write fifo");
    drop(writer);

    let status = child.wait().expect("wait");
    assert!(status.success(), "daemon exited with {status:?}");
}
