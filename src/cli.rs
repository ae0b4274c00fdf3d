use crate::constants::{
    DEFAULT_COMPRESSED_DIR, DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT, DEFAULT_STATIC_DIR,
    DEFAULT_UPLOADS_DIR,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "file-squeeze",
    about = "A small web front end that squeezes uploaded files down to a target size",
    long_about = "file-squeeze accepts an uploaded file and a target size in megabytes. \
                  JPEG, PNG and WebP images are re-encoded at decreasing quality until they fit; \
                  every other file type is wrapped in a deflate-compressed zip archive.",
    version = "0.1.0",
    after_help = "EXAMPLES:\n  \
    file-squeeze serve --port 8080\n  \
    file-squeeze compress photo.jpg ./out --size 1\n  \
    file-squeeze compress notes.txt ./out --size 1"
)]
pub struct Args {
    #[arg(short = 'q', long, global = true, help = "Only print warnings and errors")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        conflicts_with = "quiet",
        help = "Print debug output, including every quality attempt"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Run the web front end",
        long_about = "Serve the upload form on GET /, accept uploads on POST /, \
                      and serve results from /download/{filename} and previews from /static."
    )]
    Serve {
        #[arg(long, env = "FILE_SQUEEZE_HOST", default_value = DEFAULT_HOST, help = "Address to bind")]
        host: String,

        #[arg(short = 'p', long, env = "FILE_SQUEEZE_PORT", default_value_t = DEFAULT_PORT, help = "Port to bind")]
        port: u16,

        #[arg(
            long,
            env = "FILE_SQUEEZE_UPLOADS_DIR",
            default_value = DEFAULT_UPLOADS_DIR,
            help = "Directory receiving raw uploads"
        )]
        uploads_dir: PathBuf,

        #[arg(
            long,
            env = "FILE_SQUEEZE_COMPRESSED_DIR",
            default_value = DEFAULT_COMPRESSED_DIR,
            help = "Directory holding compressed results for download"
        )]
        compressed_dir: PathBuf,

        #[arg(
            long,
            env = "FILE_SQUEEZE_STATIC_DIR",
            default_value = DEFAULT_STATIC_DIR,
            help = "Public directory receiving image previews"
        )]
        static_dir: PathBuf,

        #[arg(
            long,
            env = "FILE_SQUEEZE_MAX_UPLOAD_MB",
            default_value_t = DEFAULT_MAX_UPLOAD_MB,
            help = "Largest accepted upload in megabytes"
        )]
        max_upload_mb: u64,
    },

    #[command(
        about = "Compress a single local file",
        long_about = "Run the same size reduction the web front end uses against a local file. \
                      Images keep their name inside the output directory; other files become <name>.zip."
    )]
    Compress {
        #[arg(help = "Input file path")]
        input: PathBuf,

        #[arg(help = "Output directory")]
        output: PathBuf,

        #[arg(
            short = 's',
            long,
            help = "Target size in megabytes (positive whole number)",
            long_help = "Maximum output size in megabytes. Only used for images; \
                         other files are archived regardless of size."
        )]
        size: String,
    },
}
