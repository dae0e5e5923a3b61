use crate::types::*;

/// Paper, border and overlap configuration for a tiling run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TilingOptions {
    pub paper: PaperSize,
    pub border: BorderSpec,
    pub overlap: OverlapSpec,
}

impl Default for TilingOptions {
    fn default() -> Self {
        Self {
            paper: PaperSize::A4,
            border: BorderSpec::default(),
            overlap: OverlapSpec::default(),
        }
    }
}

impl TilingOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options: Self = serde_json::from_slice(&bytes)
            .map_err(|e| TilingError::Config(format!("Failed to parse config: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TilingError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let b = &self.border;
        if b.north_mm < 0.0 || b.east_mm < 0.0 || b.south_mm < 0.0 || b.west_mm < 0.0 {
            return Err(TilingError::Config(
                "Border margins must be non-negative".to_string(),
            ));
        }
        if self.overlap.east_mm < 0.0 || self.overlap.south_mm < 0.0 {
            return Err(TilingError::Config(
                "Overlaps must be non-negative".to_string(),
            ));
        }

        let (paper_width, paper_height) = self.paper.dimensions_mm();
        if paper_width <= 0.0 || paper_height <= 0.0 {
            return Err(TilingError::Config(format!(
                "Paper size must be positive, was {paper_width}x{paper_height} mm"
            )));
        }
        if b.east_mm + b.west_mm >= paper_width || b.north_mm + b.south_mm >= paper_height {
            return Err(TilingError::Config(format!(
                "Borders leave no printable area on {} paper",
                self.paper.label()
            )));
        }

        Ok(())
    }
}
