/*
 * Error Module
 *
 * The steering math itself never fails. The only fallible surface is building
 * or loading a FlockSettings record, which is rejected up front instead of
 * being tolerated mid-simulation.
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("{field} must be a finite, non-negative value (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("min_speed must be positive (got {0})")]
    NonPositiveMinSpeed(f32),

    #[error("min_speed {min} exceeds max_speed {max}")]
    SpeedRange { min: f32, max: f32 },

    #[error("fixed step must be positive (got {0} seconds)")]
    InvalidStep(f32),

    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type SettingsResult<T> = Result<T, SettingsError>;
