//! Sealpack CLI - compression and encryption for files and directories.
//!
//! Codecs: LZ77, Huffman, RLE, LZW. Ciphers: ChaCha20, Salsa20, RC4.

mod pipeline;
mod report;
mod utils;

use clap::{Parser, Subcommand};
use pipeline::{Job, Operation};
use report::{print_reports, print_reports_json};
use sealpack_codecs::Algorithm;
use sealpack_crypto::Cipher;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sealpack")]
#[command(author, version, about = "Compress and encrypt files and directories")]
#[command(long_about = "
Sealpack compresses and encrypts files. A directory input processes every
regular file in it (non-recursive) on a worker pool, writing results of
the same name into the output directory.

Unpacking needs the same algorithm (and cipher, if a key was used) that
packed the data; the streams do not record which codec produced them.

Examples:
  sealpack pack notes.txt -o notes.sealed
  sealpack pack logs/ -o packed/ -a huffman -t 8
  sealpack pack secrets.db -o secrets.sealed -k hunter2
  sealpack unpack notes.sealed -o notes.txt
  sealpack unpack secrets.sealed -o secrets.db -k hunter2
  sealpack encrypt report.pdf -o report.enc -k hunter2 -c salsa20
  sealpack decrypt report.enc -o report.pdf -k hunter2 -c salsa20
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file or directory, optionally encrypting the result
    #[command(alias = "p")]
    Pack {
        /// File or directory to compress
        input: PathBuf,

        /// Output file, or output directory for a directory input
        #[arg(short, long)]
        output: PathBuf,

        /// Compression algorithm: lz77, huffman, rle, lzw
        #[arg(short, long, default_value = "lz77")]
        algorithm: Algorithm,

        /// Encrypt the compressed data with this passphrase
        #[arg(short, long)]
        key: Option<String>,

        /// Cipher used when --key is given: chacha20, salsa20, rc4
        #[arg(short, long, default_value = "chacha20")]
        cipher: Cipher,

        /// Worker threads for directory inputs
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Show per-file details
        #[arg(short, long)]
        verbose: bool,

        /// Output the report as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Reverse a pack: decrypt if a key is given, then decompress
    #[command(alias = "u")]
    Unpack {
        /// File or directory to restore
        input: PathBuf,

        /// Output file, or output directory for a directory input
        #[arg(short, long)]
        output: PathBuf,

        /// Algorithm the data was packed with
        #[arg(short, long, default_value = "lz77")]
        algorithm: Algorithm,

        /// Passphrase the data was packed with
        #[arg(short, long)]
        key: Option<String>,

        /// Cipher the data was packed with
        #[arg(short, long, default_value = "chacha20")]
        cipher: Cipher,

        /// Worker threads for directory inputs
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Show per-file details
        #[arg(short, long)]
        verbose: bool,

        /// Output the report as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Encrypt a file or directory without compressing
    #[command(alias = "e")]
    Encrypt {
        /// File or directory to encrypt
        input: PathBuf,

        /// Output file, or output directory for a directory input
        #[arg(short, long)]
        output: PathBuf,

        /// Encryption passphrase
        #[arg(short, long)]
        key: String,

        /// Cipher: chacha20, salsa20, rc4
        #[arg(short, long, default_value = "chacha20")]
        cipher: Cipher,

        /// Worker threads for directory inputs
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Show per-file details
        #[arg(short, long)]
        verbose: bool,

        /// Output the report as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decrypt a file or directory
    #[command(alias = "d")]
    Decrypt {
        /// File or directory to decrypt
        input: PathBuf,

        /// Output file, or output directory for a directory input
        #[arg(short, long)]
        output: PathBuf,

        /// Decryption passphrase
        #[arg(short, long)]
        key: String,

        /// Cipher the data was encrypted with
        #[arg(short, long, default_value = "chacha20")]
        cipher: Cipher,

        /// Worker threads for directory inputs
        #[arg(short, long, default_value_t = 4)]
        threads: usize,

        /// Show per-file details
        #[arg(short, long)]
        verbose: bool,

        /// Output the report as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let (input, output, job) = match cli.command {
        Commands::Pack {
            input,
            output,
            algorithm,
            key,
            cipher,
            threads,
            verbose,
            json,
        } => (
            input,
            output,
            Job {
                operation: Operation::Pack,
                algorithm,
                cipher,
                key,
                threads,
                verbose,
                json,
            },
        ),
        Commands::Unpack {
            input,
            output,
            algorithm,
            key,
            cipher,
            threads,
            verbose,
            json,
        } => (
            input,
            output,
            Job {
                operation: Operation::Unpack,
                algorithm,
                cipher,
                key,
                threads,
                verbose,
                json,
            },
        ),
        Commands::Encrypt {
            input,
            output,
            key,
            cipher,
            threads,
            verbose,
            json,
        } => (
            input,
            output,
            Job {
                operation: Operation::Encrypt,
                algorithm: Algorithm::default(),
                cipher,
                key: Some(key),
                threads,
                verbose,
                json,
            },
        ),
        Commands::Decrypt {
            input,
            output,
            key,
            cipher,
            threads,
            verbose,
            json,
        } => (
            input,
            output,
            Job {
                operation: Operation::Decrypt,
                algorithm: Algorithm::default(),
                cipher,
                key: Some(key),
                threads,
                verbose,
                json,
            },
        ),
    };

    let reports = match pipeline::run(&input, &output, &job) {
        Ok(reports) => reports,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if job.json {
        print_reports_json(&reports);
    } else {
        print_reports(&reports, job.verbose);
    }

    if reports.iter().any(|r| !r.success) {
        std::process::exit(1);
    }
}
