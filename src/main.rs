use clap::Parser;
use file_squeeze::cli::{Args, Commands};
use file_squeeze::config::ServerConfig;
use file_squeeze::constants::{ERROR_PREFIX, ORIGINAL_SIZE_PREFIX, SUCCESS_PREFIX, WARNING_PREFIX};
use file_squeeze::dispatch::{dispatch, output_path_for};
use file_squeeze::error::{CompressionError, Result};
use file_squeeze::storage::{StorageDirs, StoredAsset};
use file_squeeze::target::{CompressionMethod, CompressionTarget};
use file_squeeze::utils::{create_progress_spinner, format_file_size, print_compression_result};
use file_squeeze::{logger, report, web};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(args.quiet, args.verbose);

    let outcome = match args.command {
        Commands::Serve {
            host,
            port,
            uploads_dir,
            compressed_dir,
            static_dir,
            max_upload_mb,
        } => {
            let dirs = StorageDirs::new(uploads_dir, compressed_dir, static_dir);
            ServerConfig::new(host, port, dirs, max_upload_mb).and_then(run_server)
        }
        Commands::Compress {
            input,
            output,
            size,
        } => compress_file(&input, &output, &size),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", ERROR_PREFIX, err);
            ExitCode::FAILURE
        }
    }
}

fn run_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(web::serve(config))
}

fn compress_file(input: &Path, output_dir: &Path, size: &str) -> Result<()> {
    let target: CompressionTarget = size.parse()?;
    let asset = StoredAsset::local(input)?;

    let destination = output_path_for(&asset, output_dir);
    let overwrites_input = match (destination.canonicalize(), input.canonicalize()) {
        (Ok(dest), Ok(src)) => dest == src,
        _ => false,
    };
    if overwrites_input {
        return Err(CompressionError::UnsupportedParameter(
            "output directory must differ from the input file's directory".to_string(),
        ));
    }

    report!("🗜️  Compressing {:?} ({})", input, asset.kind);
    report!("📁 Output: {:?}", destination);
    report!(
        "{} {} ({})",
        ORIGINAL_SIZE_PREFIX,
        asset.size,
        format_file_size(asset.size)
    );

    let pb = create_progress_spinner("Compressing...");
    let result = dispatch(&asset, target, output_dir);
    pb.finish_and_clear();
    let result = result?;

    if !logger::is_quiet() {
        print_compression_result(asset.size, result.size);
    }

    match result.method {
        CompressionMethod::Recompressed {
            quality,
            met: true,
            ..
        } => report!("{} Target met at quality {}", SUCCESS_PREFIX, quality),
        CompressionMethod::Recompressed { quality, .. } => report!(
            "{}  Target of {} not reachable; kept quality {}",
            WARNING_PREFIX,
            format_file_size(target.bytes()),
            quality
        ),
        CompressionMethod::Archived { entry_name } => {
            report!("{} Archived {} into {:?}", SUCCESS_PREFIX, entry_name, result.stored)
        }
    }

    Ok(())
}
