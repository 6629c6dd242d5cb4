use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    Low,
    #[default]
    Medium,
    High,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Low => "low_quality",
            Quality::Medium => "medium_quality",
            Quality::High => "high_quality",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("unknown difficulty {0:?} (expected beginner, intermediate or advanced)")]
    UnknownDifficulty(String),
    #[error("unknown quality {0:?} (expected low_quality, medium_quality or high_quality)")]
    UnknownQuality(String),
    #[error("duration must be a positive number of seconds")]
    ZeroDuration,
}

impl FromStr for Difficulty {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(OptionsError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl FromStr for Quality {
    type Err = OptionsError;

    /// Accepts the wire names and their short forms (`low`, `medium`, `high`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low_quality" | "low" => Ok(Quality::Low),
            "medium_quality" | "medium" => Ok(Quality::Medium),
            "high_quality" | "high" => Ok(Quality::High),
            _ => Err(OptionsError::UnknownQuality(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DEFAULT_DURATION_SECS: u32 = 45;

/// Options submitted alongside a query. Immutable once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    difficulty: Difficulty,
    quality: Quality,
    duration_secs: u32,
}

impl GenerationOptions {
    pub fn new(
        difficulty: Difficulty,
        quality: Quality,
        duration_secs: u32,
    ) -> Result<Self, OptionsError> {
        if duration_secs == 0 {
            return Err(OptionsError::ZeroDuration);
        }
        Ok(Self {
            difficulty,
            quality,
            duration_secs,
        })
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            quality: Quality::default(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}
