use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geostack", version, about = "GEOSTACK CLI")]
pub struct CliArgs {
    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,

    /// Optional JSON file with processing options (buffer segments, legend ticks)
    #[arg(long)]
    pub options: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print dataset metadata for a raster or vector file
    Info {
        /// Dataset file (.tif, .tiff, .img or .shp)
        input: PathBuf,
    },

    /// Normalized difference vegetation index: (nir - red) / (nir + red)
    Ndvi {
        #[arg(short, long)]
        input: PathBuf,
        /// NIR band (1-based)
        #[arg(long)]
        nir: usize,
        /// Red band (1-based)
        #[arg(long)]
        red: usize,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Normalized difference built-up index: (swir - nir) / (swir + nir)
    Ndbi {
        #[arg(short, long)]
        input: PathBuf,
        /// SWIR band (1-based)
        #[arg(long)]
        swir: usize,
        /// NIR band (1-based)
        #[arg(long)]
        nir: usize,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Land surface temperature from a thermal band, in degrees Celsius
    Lst {
        #[arg(short, long)]
        input: PathBuf,
        /// Thermal band (1-based)
        #[arg(long)]
        band: usize,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Urban heat island overlay: lst - (ndvi + ndbi) / 2
    Overlay {
        /// Already-computed LST raster
        #[arg(long)]
        lst: PathBuf,
        /// Already-computed NDVI raster
        #[arg(long)]
        ndvi: PathBuf,
        /// Already-computed NDBI raster
        #[arg(long)]
        ndbi: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Buffer every feature by a distance in map units
    Buffer {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        distance: f64,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Clip features to the boundary of a clip layer
    Clip {
        #[arg(short, long)]
        input: PathBuf,
        /// Clip layer file
        #[arg(short, long)]
        clip: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Pairwise intersection of two vector layers
    Intersect {
        /// First input layer
        #[arg(short = 'a', long)]
        first: PathBuf,
        /// Second input layer
        #[arg(short = 'b', long)]
        second: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}
