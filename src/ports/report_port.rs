//! Report generation port trait.

use crate::domain::error::FincastError;
use crate::domain::projection::Projection;
use crate::domain::settings::ProjectionSettings;

/// Port for writing projection reports.
pub trait ReportPort {
    fn write(
        &self,
        projection: &Projection,
        settings: &ProjectionSettings,
        output_path: &str,
    ) -> Result<(), FincastError>;
}
