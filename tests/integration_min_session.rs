// Drives the compiled binary through a PTY: real event loop, real crossterm input.
//
// Requires a TTY (expectrl allocates a pseudo terminal), so it is Unix-only and
// ignored by default. Run via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("alphabet-typer");
    let cmd = format!("{} -L ab -c 1", bin.display());

    let mut p = spawn(cmd)?;
    std::thread::sleep(Duration::from_millis(200));

    // start, then wait out the one second countdown
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(1300));

    p.send("ab")?;
    std::thread::sleep(Duration::from_millis(200));

    // ESC quits from the score board
    p.send("\x1b")?;
    p.expect(Eof)?;
    Ok(())
}
