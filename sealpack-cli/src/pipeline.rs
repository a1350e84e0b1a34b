//! Per-file processing pipeline.
//!
//! A job reads each input file, applies the codec and/or cipher stages,
//! and writes the result next to the configured output path. Directory
//! inputs are processed file by file on a rayon pool; one failing file is
//! reported and counted without stopping the others.
//!
//! Stage order is fixed for reversibility: packing compresses first and
//! encrypts second, so unpacking decrypts first and decompresses second.

use crate::report::FileReport;
use crate::utils::create_progress_bar;
use rayon::prelude::*;
use sealpack_codecs::{compress_data, decompress_data, Algorithm};
use sealpack_core::{Buffer, Result, SealpackError};
use sealpack_crypto::{decrypt_data, encrypt_data, Cipher};
use std::fs;
use std::path::{Path, PathBuf};

/// What a job does to each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Compress, then encrypt if a key is present.
    Pack,
    /// Decrypt if a key is present, then decompress.
    Unpack,
    /// Encrypt only.
    Encrypt,
    /// Decrypt only.
    Decrypt,
}

/// A fully-resolved processing job.
#[derive(Debug, Clone)]
pub struct Job {
    /// The operation to apply to each file.
    pub operation: Operation,
    /// Codec for pack and unpack.
    pub algorithm: Algorithm,
    /// Cipher for the encryption stages.
    pub cipher: Cipher,
    /// Passphrase; required for encrypt and decrypt, optional for pack
    /// and unpack.
    pub key: Option<String>,
    /// Worker thread count for directory inputs.
    pub threads: usize,
    /// Print per-file details.
    pub verbose: bool,
    /// Emit the report as JSON instead of a table.
    pub json: bool,
}

impl Job {
    fn key_bytes(&self) -> Result<&[u8]> {
        self.key
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| SealpackError::invalid_argument("this operation requires --key"))
    }
}

/// Apply the job's stages to one file's contents.
pub fn transform(data: &[u8], job: &Job) -> Result<Buffer> {
    match job.operation {
        Operation::Pack => {
            let packed = compress_data(data, job.algorithm)?;
            match &job.key {
                Some(key) => encrypt_data(&packed, key.as_bytes(), job.cipher),
                None => Ok(packed),
            }
        }
        Operation::Unpack => {
            let sealed;
            let packed = match &job.key {
                Some(key) => {
                    sealed = decrypt_data(data, key.as_bytes(), job.cipher)?;
                    sealed.as_slice()
                }
                None => data,
            };
            decompress_data(packed, job.algorithm)
        }
        Operation::Encrypt => encrypt_data(data, job.key_bytes()?, job.cipher),
        Operation::Decrypt => decrypt_data(data, job.key_bytes()?, job.cipher),
    }
}

/// List the files a job will process.
///
/// A file input is the single-element list. A directory input lists its
/// regular files, non-recursively, in name order; subdirectories are
/// skipped.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(SealpackError::invalid_argument(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

fn process_file(input_path: &Path, output_path: &Path, job: &Job) -> FileReport {
    let mut report = FileReport {
        input: input_path.to_path_buf(),
        output: output_path.to_path_buf(),
        input_size: 0,
        output_size: 0,
        success: false,
        error: None,
    };

    let outcome = fs::read(input_path)
        .map_err(SealpackError::from)
        .and_then(|data| {
            report.input_size = data.len() as u64;
            transform(&data, job)
        })
        .and_then(|result| {
            report.output_size = result.len() as u64;
            fs::write(output_path, result.as_slice()).map_err(SealpackError::from)
        });

    match outcome {
        Ok(()) => report.success = true,
        Err(e) => report.error = Some(e.to_string()),
    }
    report
}

/// Run a job over a file or directory input.
///
/// Returns the per-file reports; the caller decides how to present them
/// and what exit code failures deserve.
pub fn run(input: &Path, output: &Path, job: &Job) -> Result<Vec<FileReport>> {
    let files = collect_inputs(input)?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let directory_mode = input.is_dir();
    if directory_mode && !output.is_dir() {
        fs::create_dir_all(output)?;
    }

    let targets: Vec<(PathBuf, PathBuf)> = files
        .into_iter()
        .map(|file| {
            let target = if directory_mode {
                // Directory outputs keep the source file name.
                match file.file_name() {
                    Some(name) => output.join(name),
                    None => output.to_path_buf(),
                }
            } else {
                output.to_path_buf()
            };
            (file, target)
        })
        .collect();

    let threads = job.threads.clamp(1, targets.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| SealpackError::invalid_argument(format!("thread pool: {e}")))?;

    // Hidden in JSON mode so stdout stays machine-readable; verbose lines
    // are dropped with it.
    let progress = create_progress_bar(targets.len() as u64, !job.json);
    let reports: Vec<FileReport> = pool.install(|| {
        targets
            .par_iter()
            .map(|(input_path, output_path)| {
                if job.verbose && !job.json {
                    progress.println(format!(
                        "Processing: {} -> {}",
                        input_path.display(),
                        output_path.display()
                    ));
                }
                let report = process_file(input_path, output_path, job);
                progress.inc(1);
                report
            })
            .collect()
    });
    progress.finish_and_clear();

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(operation: Operation, key: Option<&str>) -> Job {
        Job {
            operation,
            algorithm: Algorithm::Lz77,
            cipher: Cipher::Chacha20,
            key: key.map(str::to_string),
            threads: 2,
            verbose: false,
            json: false,
        }
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let data = b"pipeline roundtrip pipeline roundtrip pipeline roundtrip";
        let packed = transform(data, &job(Operation::Pack, None)).unwrap();
        let unpacked = transform(&packed, &job(Operation::Unpack, None)).unwrap();
        assert_eq!(unpacked.as_slice(), data);
    }

    #[test]
    fn test_pack_unpack_with_key() {
        let data = b"compressed and encrypted in one pass";
        let packed = transform(data, &job(Operation::Pack, Some("hunter2"))).unwrap();
        // Without the key the payload is ciphertext, not a codec stream.
        assert!(transform(&packed, &job(Operation::Unpack, None)).is_err());
        let unpacked = transform(&packed, &job(Operation::Unpack, Some("hunter2"))).unwrap();
        assert_eq!(unpacked.as_slice(), data);
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let data = b"cipher only";
        let sealed = transform(data, &job(Operation::Encrypt, Some("k"))).unwrap();
        let opened = transform(&sealed, &job(Operation::Decrypt, Some("k"))).unwrap();
        assert_eq!(opened.as_slice(), data);
    }

    #[test]
    fn test_cipher_stages_require_key() {
        assert!(matches!(
            transform(b"data", &job(Operation::Encrypt, None)),
            Err(SealpackError::InvalidArgument { .. })
        ));
        assert!(matches!(
            transform(b"data", &job(Operation::Decrypt, None)),
            Err(SealpackError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_collect_inputs() {
        let root = std::env::temp_dir().join(format!("sealpack-cli-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("b.txt"), b"b").unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();

        let files = collect_inputs(&root).unwrap();
        assert_eq!(files, vec![root.join("a.txt"), root.join("b.txt")]);

        let single = collect_inputs(&root.join("a.txt")).unwrap();
        assert_eq!(single, vec![root.join("a.txt")]);

        assert!(collect_inputs(&root.join("missing")).is_err());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_run_over_directory() {
        let root = std::env::temp_dir().join(format!("sealpack-run-test-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let input = root.join("in");
        let output = root.join("out");
        let restored = root.join("back");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("one.txt"), b"first file first file first").unwrap();
        fs::write(input.join("two.txt"), b"second file second file").unwrap();

        let reports = run(&input, &output, &job(Operation::Pack, None)).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.success));

        let reports = run(&output, &restored, &job(Operation::Unpack, None)).unwrap();
        assert!(reports.iter().all(|r| r.success));
        assert_eq!(
            fs::read(restored.join("one.txt")).unwrap(),
            b"first file first file first"
        );
        assert_eq!(
            fs::read(restored.join("two.txt")).unwrap(),
            b"second file second file"
        );
        fs::remove_dir_all(&root).unwrap();
    }
}
