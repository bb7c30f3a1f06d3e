//! Supersampling degree, validated at the configuration boundary.

use thiserror::Error;

/// Error returned when a supersampling degree is not one of the supported
/// values.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported supersampling degree {0} (expected 1, 2, 4, 8 or 16)")]
pub struct SuperSamplingError(pub u32);

/// Per-axis supersampling degree.
///
/// A degree of N traces an N x N grid of sub-pixel samples (N^2 total)
/// and averages them into the final pixel color. Only the degrees below
/// are supported; anything else is rejected by `TryFrom` before it can
/// reach the kernel, which never re-validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuperSampling {
    #[default]
    X1,
    X2,
    X4,
    X8,
    X16,
}

impl SuperSampling {
    /// Sub-samples per pixel axis.
    #[inline]
    pub fn degree(self) -> u32 {
        match self {
            SuperSampling::X1 => 1,
            SuperSampling::X2 => 2,
            SuperSampling::X4 => 4,
            SuperSampling::X8 => 8,
            SuperSampling::X16 => 16,
        }
    }

    /// Total sub-samples per pixel (degree squared).
    #[inline]
    pub fn samples_per_pixel(self) -> u32 {
        let n = self.degree();
        n * n
    }
}

impl TryFrom<u32> for SuperSampling {
    type Error = SuperSamplingError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SuperSampling::X1),
            2 => Ok(SuperSampling::X2),
            4 => Ok(SuperSampling::X4),
            8 => Ok(SuperSampling::X8),
            16 => Ok(SuperSampling::X16),
            other => Err(SuperSamplingError(other)),
        }
    }
}
