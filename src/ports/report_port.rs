//! Chart output port.

use std::path::Path;

use crate::domain::error::ChartError;
use crate::domain::plot_spec::ChartOutcome;

/// Port for writing a built chart to a file.
pub trait ChartReportPort {
    fn render(&self, outcome: &ChartOutcome) -> Result<String, ChartError>;

    fn write(&self, outcome: &ChartOutcome, output_path: &Path) -> Result<(), ChartError> {
        let content = self.render(outcome)?;
        std::fs::write(output_path, content)?;
        Ok(())
    }
}
