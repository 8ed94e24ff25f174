use std::process::ExitCode;

use cogify::cli::Args;
use cogify::convert::{self, ConversionOptions, ConvertError, Gdal};

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,

        Err(e) => {
            let _ = e.print();

            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| convert::output_path_for(&args.input));

    let gdal = Gdal::default();
    let options = ConversionOptions::default();

    match convert::run(&gdal, &options, &args.input, &output) {
        Ok(()) => {
            println!("Conversion completed successfully!");
            println!("Input file: {}", args.input.display());
            println!("Output file: {}", output.display());
            ExitCode::SUCCESS
        }

        Err(e @ ConvertError::GdalUnavailable) => {
            eprintln!("Error: {e}.");
            eprintln!("Please install GDAL first:");
            eprintln!("  Ubuntu/Debian: sudo apt-get install gdal-bin");
            eprintln!("  macOS: brew install gdal");
            eprintln!("  Windows: Install GDAL from https://trac.osgeo.org/osgeo4w/");
            ExitCode::FAILURE
        }

        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
