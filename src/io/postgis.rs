//! Database import boundary: pull a table with a `geom` geometry column out
//! of a PostGIS database as an ordinary [`VectorDataset`], via GDAL's `PG:`
//! driver. Credential collection and connection pooling are the caller's
//! concern; the core only consumes the resulting feature collection.
use gdal::{Dataset, DatasetOptions, GdalOpenFlags};
use tracing::info;

use crate::error::{Error, Result};
use crate::io::vector::VectorDataset;

/// Connection parameters for a PostGIS database.
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DatabaseConnection {
    /// GDAL `PG:` connection string.
    fn connection_string(&self) -> String {
        format!(
            "PG:host={} port={} dbname={} user={} password={}",
            self.host, self.port, self.database, self.user, self.password
        )
    }

    /// Import `SELECT * FROM <table>` as a vector dataset.
    ///
    /// The geometry is taken from the table's `geom` column, which the PG
    /// driver resolves as the layer geometry. The result is indistinguishable
    /// from a file-loaded [`VectorDataset`].
    pub fn import_table(&self, table: &str) -> Result<VectorDataset> {
        if table.is_empty() {
            return Err(Error::InvalidParameter {
                param: "table",
                value: "<empty>".to_string(),
            });
        }
        let dataset = Dataset::open_ex(
            self.connection_string(),
            DatasetOptions {
                open_flags: GdalOpenFlags::GDAL_OF_VECTOR | GdalOpenFlags::GDAL_OF_READONLY,
                ..Default::default()
            },
        )
        .map_err(Error::processing)?;
        let mut layer = dataset.layer_by_name(table).map_err(Error::processing)?;
        let imported = VectorDataset::from_layer(&mut layer)?;
        info!(
            "imported {} features from table {table}",
            imported.feature_count()
        );
        Ok(imported)
    }
}
