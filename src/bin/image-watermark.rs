use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use image_watermark::{Position, ProcessOptions, ProcessResult, Watermarker};

#[derive(Parser)]
#[command(
    name = "image-watermark",
    about = "Overlay a watermark image onto photos",
    version,
    after_help = "Outputs land in the output directory as watermarked_<name>.\n\
                  Recognized input formats: jpg, jpeg, png, gif, bmp."
)]
struct Cli {
    /// Image file or directory of images to watermark (prompted if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Watermark image path (prompted if omitted)
    #[arg(short, long)]
    watermark: Option<PathBuf>,

    /// Watermark anchor: top-left, bottom-left, top-right, bottom-right, center
    #[arg(
        short = 'p',
        long,
        aliases = ["wp", "watermark_position"],
        default_value = "center"
    )]
    watermark_position: Position,

    /// Watermark size as a fraction of each base image's dimensions
    #[arg(
        short = 's',
        long,
        aliases = ["sw", "scale_watermark"],
        default_value_t = 0.5
    )]
    scale_watermark: f64,

    /// Output directory (default: <cwd>/watermarked_images, created if absent)
    #[arg(short, long, aliases = ["output_directory"])]
    output_directory: Option<PathBuf>,

    /// Suppress per-file success output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.scale_watermark <= 0.0 || cli.scale_watermark.is_nan() {
        eprintln!(
            "Error: scale factor must be greater than 0 (got {})",
            cli.scale_watermark
        );
        process::exit(2);
    }

    let input = cli.input.unwrap_or_else(|| {
        prompt("Enter path to image file or directory of images that you want to watermark: ")
    });
    let watermark_path = cli
        .watermark
        .unwrap_or_else(|| prompt("Enter path to watermark file: "));

    let output_dir = match cli.output_directory {
        Some(dir) => dir,
        None => match env::current_dir() {
            Ok(cwd) => cwd.join("watermarked_images"),
            Err(e) => {
                eprintln!("Error: cannot determine current directory: {e}");
                process::exit(1);
            }
        },
    };
    if let Err(e) = std::fs::create_dir_all(&output_dir) {
        eprintln!(
            "Error: cannot create output directory {}: {e}",
            output_dir.display()
        );
        process::exit(1);
    }

    let watermarker = match Watermarker::open(&watermark_path) {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: failed to load watermark: {e}");
            process::exit(1);
        }
    };

    let opts = ProcessOptions {
        position: cli.watermark_position,
        scale_factor: cli.scale_watermark,
    };

    let results = if input.is_file() {
        vec![watermarker.process_file(&input, &output_dir, &opts)]
    } else if input.is_dir() {
        watermarker.process_directory(&input, &output_dir, &opts)
    } else {
        eprintln!("Error: {} does not exist", input.display());
        process::exit(2);
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r, &watermark_path, opts.position, cli.quiet);
        if r.is_success() {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 && !cli.quiet {
        eprintln!();
        eprint!("[Summary] Watermarked: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn print_result(result: &ProcessResult, watermark: &Path, position: Position, quiet: bool) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    match &result.error {
        None => {
            if !quiet {
                eprintln!(
                    "[OK] {filename}: watermark ({}) applied at {position}",
                    watermark.display()
                );
            }
        }
        Some(e) => eprintln!("[FAIL] {filename}: {e}"),
    }
}

fn prompt(message: &str) -> PathBuf {
    print!("{message}");
    let _ = io::stdout().flush();

    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() || line.trim().is_empty() {
        eprintln!("Error: no path provided");
        process::exit(2);
    }
    PathBuf::from(line.trim())
}
