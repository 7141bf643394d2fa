// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch decoding of many control files across scoped worker threads.

use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info, instrument, warn};

use ippspool_core::Message;
use ippspool_core::error::{IppspoolError, Result};
use ippspool_decode::Decoder;

/// Per-file results of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub decoded: Vec<(PathBuf, Message)>,
    pub failures: Vec<(PathBuf, IppspoolError)>,
}

/// Read and decode a single file.
pub fn decode_file(decoder: &Decoder, path: &Path) -> Result<Message> {
    let data = std::fs::read(path)?;
    let message = decoder.decode(&data)?;
    debug!(path = %path.display(), groups = message.groups.len(), "file decoded");
    Ok(message)
}

/// Decode every path, continuing past failures.
///
/// `workers` of 0 uses one thread per available core.  Results keep the
/// order of `paths` whatever the thread count.
#[instrument(skip_all, fields(files = paths.len(), workers = tracing::field::Empty))]
pub fn decode_batch(decoder: &Decoder, paths: &[PathBuf], workers: usize) -> BatchReport {
    let workers = match workers {
        0 => thread::available_parallelism().map_or(1, |n| n.get()),
        n => n,
    }
    .clamp(1, paths.len().max(1));
    tracing::Span::current().record("workers", workers as u64);

    let chunk = paths.len().div_ceil(workers).max(1);
    let results: Vec<Result<Message>> = thread::scope(|scope| {
        let handles: Vec<_> = paths
            .chunks(chunk)
            .map(|slice| {
                let handle = scope.spawn(move || {
                    slice
                        .iter()
                        .map(|path| decode_file(decoder, path))
                        .collect::<Vec<_>>()
                });
                (slice.len(), handle)
            })
            .collect();

        handles
            .into_iter()
            .flat_map(|(len, handle)| {
                handle.join().unwrap_or_else(|_| {
                    (0..len)
                        .map(|_| Err(IppspoolError::Scan("decode worker panicked".into())))
                        .collect()
                })
            })
            .collect()
    });

    let mut report = BatchReport::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(message) => report.decoded.push((path.clone(), message)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "decode failed");
                report.failures.push((path.clone(), e));
            }
        }
    }
    info!(
        decoded = report.decoded.len(),
        failed = report.failures.len(),
        "batch finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use ippspool_core::DecodeError;

    /// `01 01 00 01 00 00 00 <id>`, one operation group, end tag.
    fn control_file(request_id: u8) -> Vec<u8> {
        let mut data = vec![0x01, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, request_id, 0x01, 0x44];
        data.extend_from_slice(&18u16.to_be_bytes());
        data.extend_from_slice(b"attributes-charset");
        data.extend_from_slice(&5u16.to_be_bytes());
        data.extend_from_slice(b"utf-8");
        data.push(0x03);
        data
    }

    fn write_inputs(dir: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for i in 0..7u8 {
            let path = dir.join(format!("c{:05}", i));
            let data = if i == 3 {
                control_file(i)[..10].to_vec()
            } else {
                control_file(i)
            };
            std::fs::write(&path, data).unwrap();
            paths.push(path);
        }
        paths.push(dir.join("c99999"));
        paths
    }

    #[test]
    fn failures_do_not_stop_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = write_inputs(tmp.path());

        let report = decode_batch(&Decoder::default(), &paths, 1);
        assert_eq!(report.decoded.len(), 6);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0, paths[3]);
        assert!(matches!(
            report.failures[0].1,
            IppspoolError::Decode(DecodeError::TruncatedInput { .. })
        ));
        assert!(matches!(report.failures[1].1, IppspoolError::Io(_)));
    }

    #[test]
    fn thread_count_does_not_change_order() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = write_inputs(tmp.path());

        let ids = |workers| {
            decode_batch(&Decoder::default(), &paths, workers)
                .decoded
                .iter()
                .map(|(_, m)| m.request_id)
                .collect::<Vec<_>>()
        };
        let serial = ids(1);
        assert_eq!(serial, vec![0, 1, 2, 4, 5, 6]);
        assert_eq!(ids(3), serial);
        assert_eq!(ids(0), serial);
        assert_eq!(ids(64), serial);
    }

    #[test]
    fn empty_batch() {
        let report = decode_batch(&Decoder::default(), &[], 0);
        assert!(report.decoded.is_empty());
        assert!(report.failures.is_empty());
    }
}
