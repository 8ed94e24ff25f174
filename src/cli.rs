use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(about = "Convert a GeoTIFF into a Cloud Optimized GeoTIFF via gdal_translate")]
pub struct Args {
    /// Path to the input GeoTIFF.
    pub input: PathBuf,

    /// Path to the output file. Defaults to the input path with a `_cog` suffix.
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn try_parse() -> Result<Self, clap::Error> {
        <Self as clap::Parser>::try_parse()
    }
}
