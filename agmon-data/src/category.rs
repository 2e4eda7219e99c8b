//! NDVI to vegetation category mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of "Low Vegetation"; anything below is bare soil.
pub const LOW_VEGETATION_MIN: f64 = 0.2;
pub const MODERATE_VEGETATION_MIN: f64 = 0.3;
pub const GOOD_VEGETATION_MIN: f64 = 0.5;
pub const EXCELLENT_VEGETATION_MIN: f64 = 0.7;

/// Vegetation category shown next to an NDVI reading.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VegetationCategory {
    #[serde(rename = "Bare Soil")]
    BareSoil,
    #[serde(rename = "Low Vegetation")]
    LowVegetation,
    #[serde(rename = "Moderate Vegetation")]
    ModerateVegetation,
    #[serde(rename = "Good Vegetation")]
    GoodVegetation,
    #[serde(rename = "Excellent Vegetation")]
    ExcellentVegetation,
}

impl VegetationCategory {
    /// Map an NDVI value onto its category.
    ///
    /// Bins are closed on the left: 0.2 is already Low Vegetation. Callers
    /// must substitute a value for absent or NaN readings first; NaN fails
    /// every comparison and lands in the top bin.
    pub fn from_ndvi(ndvi: f64) -> Self {
        if ndvi < LOW_VEGETATION_MIN {
            VegetationCategory::BareSoil
        } else if ndvi < MODERATE_VEGETATION_MIN {
            VegetationCategory::LowVegetation
        } else if ndvi < GOOD_VEGETATION_MIN {
            VegetationCategory::ModerateVegetation
        } else if ndvi < EXCELLENT_VEGETATION_MIN {
            VegetationCategory::GoodVegetation
        } else {
            VegetationCategory::ExcellentVegetation
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VegetationCategory::BareSoil => "Bare Soil",
            VegetationCategory::LowVegetation => "Low Vegetation",
            VegetationCategory::ModerateVegetation => "Moderate Vegetation",
            VegetationCategory::GoodVegetation => "Good Vegetation",
            VegetationCategory::ExcellentVegetation => "Excellent Vegetation",
        }
    }
}

impl fmt::Display for VegetationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shorthand for [`VegetationCategory::from_ndvi`].
pub fn categorize(ndvi: f64) -> VegetationCategory {
    VegetationCategory::from_ndvi(ndvi)
}
