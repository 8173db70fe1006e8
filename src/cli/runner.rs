use tracing::info;

use geostack::{
    DataFormat, GisSession, LayerKind, NullSurface, ProcessingOptions, RasterReader,
    VectorDataset,
};

use super::args::{CliArgs, Command};
use super::errors::AppError;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let options = match &args.options {
        Some(path) => ProcessingOptions::from_json_file(path).map_err(AppError::Core)?,
        None => ProcessingOptions::default(),
    };

    let mut session = GisSession::with_options(Box::new(NullSurface), options);

    match args.command {
        Command::Info { input } => {
            let format = DataFormat::from_path(&input)
                .ok_or_else(|| AppError::UnsupportedInput(input.display().to_string()))?;
            match format.kind() {
                LayerKind::Raster => {
                    let reader = RasterReader::open(&input)?;
                    let profile = reader.profile();
                    println!("raster {}", input.display());
                    println!("  size: {}x{}", profile.width, profile.height);
                    println!("  bands: {}", reader.band_count());
                    println!("  geotransform: {:?}", profile.geotransform);
                    println!("  nodata: {:?}", profile.nodata);
                    if !profile.projection.is_empty() {
                        println!("  projection: {}", profile.projection);
                    }
                }
                LayerKind::Vector => {
                    let dataset = VectorDataset::open(&input)?;
                    println!("vector {}", input.display());
                    println!("  features: {}", dataset.feature_count());
                    let fields: Vec<&str> =
                        dataset.schema.iter().map(|f| f.name.as_str()).collect();
                    println!("  fields: {}", fields.join(", "));
                }
            }
        }
        Command::Ndvi {
            input,
            nir,
            red,
            output,
        } => {
            session.ndvi(&input, nir, red, &output)?;
            info!("NDVI complete: {:?} -> {:?}", input, output);
        }
        Command::Ndbi {
            input,
            swir,
            nir,
            output,
        } => {
            session.ndbi(&input, swir, nir, &output)?;
            info!("NDBI complete: {:?} -> {:?}", input, output);
        }
        Command::Lst {
            input,
            band,
            output,
        } => {
            session.lst(&input, band, &output)?;
            info!("LST complete: {:?} -> {:?}", input, output);
        }
        Command::Overlay {
            lst,
            ndvi,
            ndbi,
            output,
        } => {
            session.overlay(&lst, &ndvi, &ndbi, &output)?;
            info!("overlay complete: {:?}", output);
        }
        Command::Buffer {
            input,
            distance,
            output,
        } => {
            session.buffer(&input, &output, distance)?;
            info!("buffer complete: {:?} -> {:?}", input, output);
        }
        Command::Clip {
            input,
            clip,
            output,
        } => {
            session.clip(&input, &clip, &output)?;
            info!("clip complete: {:?} -> {:?}", input, output);
        }
        Command::Intersect {
            first,
            second,
            output,
        } => {
            session.intersect(&first, &second, &output)?;
            info!("intersect complete: {:?}", output);
        }
    }

    Ok(())
}
