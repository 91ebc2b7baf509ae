use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use super::DecodeError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Decodes a legacy Word document with `antiword`.
///
/// The payload is written to a named temp file that is deleted when `file` drops,
/// which covers the success path, a failing decoder, a timeout and an early `?` return
/// alike. The decoder's stdout and stderr go to anonymous temp files so a large output
/// can never block the child on a full pipe while it is being polled.
pub(super) fn extract(
    bytes: &[u8],
    antiword_path: &str,
    timeout: Duration,
) -> Result<String, DecodeError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".doc")
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;

    let mut stdout = tempfile::tempfile()?;
    let mut stderr = tempfile::tempfile()?;

    let child = Command::new(antiword_path)
        .args(["-m", "UTF-8.txt"])
        .arg(file.path())
        .stdin(Stdio::null())
        .stdout(stdout.try_clone()?)
        .stderr(stderr.try_clone()?)
        .spawn()?;

    let status = wait_with_timeout(child, timeout)?;

    if !status.success() {
        return Err(DecodeError::Antiword {
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&read_back(&mut stderr)?).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&read_back(&mut stdout)?).into_owned())
}

/// Polls the child until it exits, killing it once `timeout` has elapsed.
fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<ExitStatus, DecodeError> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            return Err(DecodeError::Timeout(timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn read_back(file: &mut File) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    /// Writes an executable stand-in for antiword into `dir`.
    fn fake_antiword(dir: &Path, body: &str) -> String {
        let path = dir.join("antiword");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_temp_file_is_removed_after_success() {
        let dir = tempfile::tempdir().unwrap();
        // Last argument is the temp file; print its path and contents.
        let bin = fake_antiword(dir.path(), r#"for f; do :; done; echo "$f"; cat "$f""#);

        let out = extract("Experiencia en minería".as_bytes(), &bin, TIMEOUT).unwrap();
        let mut lines = out.lines();
        let temp_path = lines.next().unwrap();

        assert!(temp_path.ends_with(".doc"));
        assert_eq!(lines.next(), Some("Experiencia en minería"));
        assert!(!Path::new(temp_path).exists());
    }

    #[test]
    fn test_temp_file_is_removed_after_decoder_failure() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("seen");
        let bin = fake_antiword(
            dir.path(),
            &format!(
                r#"for f; do :; done; echo "$f" > "{}"; echo "not a Word file" >&2; exit 1"#,
                record.display()
            ),
        );

        let err = extract(b"garbage", &bin, TIMEOUT).unwrap_err();
        assert!(matches!(err, DecodeError::Antiword { ref stderr, .. } if stderr == "not a Word file"));

        let temp_path = fs::read_to_string(&record).unwrap();
        assert!(!Path::new(temp_path.trim()).exists());
    }

    #[test]
    fn test_hung_decoder_is_killed_and_temp_file_removed() {
        let dir = tempfile::tempdir().unwrap();
        let record = dir.path().join("seen");
        let bin = fake_antiword(
            dir.path(),
            &format!(r#"for f; do :; done; echo "$f" > "{}"; exec sleep 30"#, record.display()),
        );

        let start = Instant::now();
        let err = extract(b"x", &bin, Duration::from_millis(500)).unwrap_err();
        assert!(matches!(err, DecodeError::Timeout(_)));
        assert!(start.elapsed() < Duration::from_secs(10));

        let temp_path = fs::read_to_string(&record).unwrap();
        assert!(!Path::new(temp_path.trim()).exists());
    }

    #[test]
    fn test_large_output_does_not_block_the_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_antiword(dir.path(), "head -c 300000 /dev/zero | tr '\\0' 'a'");
        assert_eq!(extract(b"x", &bin, TIMEOUT).unwrap().len(), 300_000);
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let err = extract(b"x", "/nonexistent/antiword", TIMEOUT).unwrap_err();
        assert!(matches!(err, DecodeError::Io(_)));
    }

    #[test]
    fn test_invalid_utf8_output_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_antiword(dir.path(), r#"printf 'caf\351'"#);
        assert_eq!(extract(b"x", &bin, TIMEOUT).unwrap(), "caf\u{FFFD}");
    }
}
