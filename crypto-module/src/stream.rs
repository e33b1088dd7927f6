//! Chunked file transformation with progress reporting.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use crate::errors::CryptoModuleError;

/// Reads `input` in chunks of `chunk_size` bytes, passes each through `transform` and
/// appends the result to `output`. `on_progress` receives the percentage of input consumed
/// after every chunk (100 for an empty input).
///
/// Every chunk except the last is exactly `chunk_size` bytes long. Returns the number of
/// bytes written. A zero `chunk_size` is rejected before either file is opened.
pub(crate) fn transform_file<F, P>(
    input: &Path,
    output: &Path,
    chunk_size: usize,
    mut transform: F,
    mut on_progress: P,
) -> Result<u64, CryptoModuleError>
where
    F: FnMut(&[u8]) -> Result<Vec<u8>, CryptoModuleError>,
    P: FnMut(u8),
{
    if chunk_size == 0 {
        return Err(CryptoModuleError::InvalidArgument(
            "File chunk size must be > 0".to_string(),
        ));
    }

    let source = File::open(input).map_err(|e| io_failure(input, e))?;
    let total = source.metadata().map_err(|e| io_failure(input, e))?.len();
    let sink = File::create(output).map_err(|e| io_failure(output, e))?;

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(sink);
    let mut chunk = vec![0u8; chunk_size];
    let mut consumed = 0u64;
    let mut written = 0u64;

    loop {
        let size = read_chunk(&mut reader, &mut chunk).map_err(|e| io_failure(input, e))?;
        if size == 0 {
            break;
        }

        let processed = transform(&chunk[..size])?;
        writer
            .write_all(&processed)
            .map_err(|e| io_failure(output, e))?;

        consumed += size as u64;
        written += processed.len() as u64;
        log::trace!("Processed {} of {} bytes from {}", consumed, total, input.display());
        on_progress(percent(consumed, total));
    }

    writer.flush().map_err(|e| io_failure(output, e))?;

    if total == 0 {
        on_progress(100);
    }

    log::info!(
        "Wrote {} bytes to {} from {} input bytes",
        written,
        output.display(),
        consumed
    );

    Ok(written)
}

/// Fills `buffer` as far as the reader allows; a short count means EOF.
fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

fn percent(consumed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }

    (consumed.saturating_mul(100) / total).min(100) as u8
}

fn io_failure(path: &Path, source: std::io::Error) -> CryptoModuleError {
    log::warn!("I/O failure on {}: {}", path.display(), source);
    CryptoModuleError::io(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn test_read_chunk_fills_buffer() {
        let mut reader = Cursor::new(vec![7u8; 10]);
        let mut buffer = [0u8; 4];

        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 2);
        assert_eq!(read_chunk(&mut reader, &mut buffer).unwrap(), 0);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 0), 100);
        assert_eq!(percent(50, 200), 25);
        assert_eq!(percent(200, 200), 100);
    }

    #[test]
    fn test_transform_file_reports_progress() -> Result<(), CryptoModuleError> {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let output = dir.path().join("output.bin");
        std::fs::write(&input, vec![1u8; 10]).unwrap();

        let mut reports = Vec::new();
        let written = transform_file(
            &input,
            &output,
            4,
            |chunk| Ok(chunk.iter().map(|b| b + 1).collect()),
            |p| reports.push(p),
        )?;

        assert_eq!(written, 10);
        assert_eq!(reports, vec![40, 80, 100]);
        assert_eq!(std::fs::read(&output).unwrap(), vec![2u8; 10]);
        Ok(())
    }

    #[test]
    fn test_missing_input_is_recoverable() {
        let dir = tempfile::tempdir().unwrap();
        let result = transform_file(
            &dir.path().join("missing.bin"),
            &dir.path().join("out.bin"),
            16,
            |chunk| Ok(chunk.to_vec()),
            |_| {},
        );

        let err = result.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let output = dir.path().join("output.bin");
        std::fs::write(&input, vec![1u8; 100]).unwrap();

        let mut reports = Vec::new();
        let result = transform_file(&input, &output, 0, |chunk| Ok(chunk.to_vec()), |p| {
            reports.push(p)
        });

        assert!(matches!(result, Err(CryptoModuleError::InvalidArgument(_))));
        assert!(reports.is_empty());
        assert!(!output.exists());
    }
}
