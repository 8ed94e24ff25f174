use std::error;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use derive_more::derive::Display;
use log::debug;

/// Suffix inserted before the extension when no output path is given.
pub const OUTPUT_SUFFIX: &str = "_cog";

#[derive(Display, Debug)]
pub enum ConvertError {
    #[display("input file `{}` does not exist", _0.display())]
    MissingInput(PathBuf),

    #[display("GDAL is not installed or not in PATH")]
    GdalUnavailable,

    #[display("could not launch `{program}`: {source}")]
    Launch { program: String, source: io::Error },

    #[display("gdal_translate failed: {_0}")]
    Failed(ExitStatus),
}

impl error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Launch { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// The fixed creation options handed to `gdal_translate`. Constructed once
/// per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    pub driver: &'static str,
    pub compress: &'static str,
    pub predictor: u8,
    pub tiled: bool,
    pub block_size: (u32, u32),
    pub copy_src_overviews: bool,
    pub bigtiff: &'static str,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            driver: "COG",
            compress: "DEFLATE",
            predictor: 2,
            tiled: true,
            block_size: (512, 512),
            copy_src_overviews: true,
            bigtiff: "IF_SAFER",
        }
    }
}

impl ConversionOptions {
    /// The `KEY=VALUE` pairs passed via `-co`, in a fixed order.
    pub fn creation_options(&self) -> Vec<String> {
        let mut opts = vec![
            format!("COMPRESS={}", self.compress),
            format!("PREDICTOR={}", self.predictor),
        ];

        if self.tiled {
            opts.push("TILED=YES".to_string());
        }

        opts.push(format!("BLOCKXSIZE={}", self.block_size.0));
        opts.push(format!("BLOCKYSIZE={}", self.block_size.1));

        if self.copy_src_overviews {
            opts.push("COPY_SRC_OVERVIEWS=YES".to_string());
        }

        opts.push(format!("BIGTIFF={}", self.bigtiff));
        opts
    }
}

/// Names of the external GDAL programs. The defaults are the real binaries;
/// tests substitute stand-ins to simulate a missing or failing install.
#[derive(Debug, Clone)]
pub struct Gdal {
    info: String,
    translate: String,
}

impl Default for Gdal {
    fn default() -> Self {
        Self {
            info: "gdalinfo".to_string(),
            translate: "gdal_translate".to_string(),
        }
    }
}

impl Gdal {
    pub fn with_programs(info: impl Into<String>, translate: impl Into<String>) -> Self {
        Self {
            info: info.into(),
            translate: translate.into(),
        }
    }

    /// Checks that GDAL is installed by running the version query. Any
    /// failure, from a missing binary to a non-zero exit, counts as
    /// unavailable.
    pub fn probe(&self) -> Result<(), ConvertError> {
        let status = Command::new(&self.info)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(ConvertError::GdalUnavailable),
        }
    }

    /// The full argument vector for the conversion: `-of <driver>`, the
    /// `-co` options, then the input and output paths.
    pub fn translate_args(
        &self,
        options: &ConversionOptions,
        input: &Path,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-of".into(), options.driver.into()];

        for opt in options.creation_options() {
            args.push("-co".into());
            args.push(opt.into());
        }

        args.push(input.into());
        args.push(output.into());
        args
    }

    /// Runs `gdal_translate` to completion with inherited stdio, so GDAL's
    /// own progress output streams straight to the terminal.
    pub fn convert(
        &self,
        options: &ConversionOptions,
        input: &Path,
        output: &Path,
    ) -> Result<(), ConvertError> {
        let args = self.translate_args(options, input, output);
        debug!("running {} {:?}", self.translate, args);

        let status = Command::new(&self.translate)
            .args(&args)
            .status()
            .map_err(|source| ConvertError::Launch {
                program: self.translate.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ConvertError::Failed(status))
        }
    }
}

/// Derives the default output path: the input path with [`OUTPUT_SUFFIX`]
/// inserted between the stem and the extension.
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or_default().to_os_string();
    name.push(OUTPUT_SUFFIX);

    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    input.with_file_name(name)
}

/// One conversion run: input existence check, GDAL availability probe,
/// then the blocking `gdal_translate` invocation. Every failure is
/// terminal; nothing is retried.
pub fn run(
    gdal: &Gdal,
    options: &ConversionOptions,
    input: &Path,
    output: &Path,
) -> Result<(), ConvertError> {
    if !input.exists() {
        return Err(ConvertError::MissingInput(input.to_path_buf()));
    }

    gdal.probe()?;

    println!("Converting {} to Cloud Optimized GeoTIFF...", input.display());

    gdal.convert(options, input, output)
}
