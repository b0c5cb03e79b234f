#![cfg(feature = "cli")]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::thread::{self, JoinHandle};

/// Accept one connection, collect the command line, answer with `reply`.
fn shell_stub(reply: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let addr = listener.local_addr().expect("local addr").to_string();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("client should connect");
        let mut received = Vec::new();
        let mut buf = [0u8; 256];
        while !(received.ends_with(b"\n")
            && String::from_utf8_lossy(&received).contains("service call"))
        {
            let n = stream.read(&mut buf).expect("command should arrive");
            if n == 0 {
                break;
            }
            received.extend_from_slice(&buf[..n]);
        }
        stream.write_all(reply.as_bytes()).expect("reply should send");
        String::from_utf8_lossy(&received).into_owned()
    });

    (addr, handle)
}

fn svccall(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_svccall"));
    command.args(["--log-level", "error"]).args(args);
    command
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = svccall(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("svccall should start");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(stdin.as_bytes())
        .expect("stdin should accept input");
    child.wait_with_output().expect("svccall should finish")
}

#[test]
fn call_prints_typed_result_and_sends_exact_command() {
    let (addr, stub) = shell_stub("Result: Parcel(00000000 00000001   '........')\n");

    let output = svccall(&[
        "--format",
        "json",
        "call",
        "--addr",
        &addr,
        "--read-timeout",
        "5s",
        "oem_lock",
        "isOemUnlockAllowed",
    ])
    .output()
    .expect("call should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(stdout["service"], "oem_lock");
    assert_eq!(stdout["method"], "isOemUnlockAllowed");
    assert_eq!(stdout["code"], 5);
    assert_eq!(stdout["value"], true);

    let received = stub.join().expect("stub should finish");
    assert_eq!(received, "\nservice call oem_lock 5\n");
}

#[test]
fn call_with_arguments_without_prime() {
    let (addr, stub) = shell_stub("Result: Parcel(00000000    '....')\n");

    let output = svccall(&[
        "--format",
        "json",
        "call",
        "--addr",
        &addr,
        "--no-prime",
        "--read-timeout",
        "5s",
        "oem_lock",
        "setOemUnlockAllowedByUser",
        "true",
    ])
    .output()
    .expect("call should run");

    assert!(output.status.success());
    let stdout: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(stdout["value"], serde_json::Value::Null);

    let received = stub.join().expect("stub should finish");
    assert_eq!(received, "service call oem_lock 3 i32 1\n");
}

#[test]
fn remote_status_exits_70() {
    let (addr, stub) = shell_stub("Result: Parcel(fffffffb 00000000   '........')\n");

    let output = svccall(&[
        "call",
        "--addr",
        &addr,
        "--no-prime",
        "--read-timeout",
        "5s",
        "oem_lock",
        "isDeviceOemUnlocked",
    ])
    .output()
    .expect("call should run");

    assert_eq!(output.status.code(), Some(70));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("isDeviceOemUnlocked()"), "stderr: {stderr}");
    let _ = stub.join();
}

#[test]
fn wrong_arity_is_usage_error_before_connecting() {
    let output = svccall(&[
        "call",
        "--addr",
        "127.0.0.1:1",
        "oem_lock",
        "isOemUnlockAllowed",
        "extra",
    ])
    .output()
    .expect("call should run");

    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn unknown_method_is_usage_error() {
    let output = svccall(&["call", "oem_lock", "unlockEverything"])
        .output()
        .expect("call should run");

    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unlockEverything"));
}

#[test]
fn refused_connection_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
        listener.local_addr().expect("local addr").to_string()
    };

    let output = svccall(&["call", "--addr", &addr, "oem_lock", "getLockName"])
        .output()
        .expect("call should run");

    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn describe_lists_ordinal_codes() {
    let output = svccall(&["--format", "json", "describe", "oem_lock"])
        .output()
        .expect("describe should run");

    assert!(output.status.success());
    let rows: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    let rows = rows.as_array().expect("describe should print an array");
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["name"], "getLockName");
    assert_eq!(rows[0]["code"], 0);
    assert_eq!(rows[0]["returns"], "string");
    assert_eq!(rows[6]["name"], "isDeviceOemUnlocked");
    assert_eq!(rows[6]["code"], 6);
}

#[test]
fn decode_reads_dump_from_stdin() {
    let output = run_with_stdin(
        &["--format", "json", "decode", "--return-type", "int32"],
        "Result: Parcel(00000000 0000002a   '....*...')\n",
    );

    assert!(output.status.success());
    let stdout: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(stdout["status"], 0);
    assert_eq!(stdout["value"], 42);
}

#[test]
fn decode_rejects_garbage() {
    let output = run_with_stdin(&["decode"], "sh: service: not found\n");
    assert_eq!(output.status.code(), Some(60));
}
