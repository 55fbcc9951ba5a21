use std::fmt;

use crate::error::ConfigError;

/// Maya release number. Only `.5` point releases keep their decimal;
/// everything else is truncated to the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MayaVersion {
    year: u32,
    half: bool,
}

impl MayaVersion {
    pub const fn new(year: u32, half: bool) -> Self {
        Self { year, half }
    }

    /// Parse the leading number of a version entry such as `2023`,
    /// `2016.5` or `2024.2 (update)`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let leading = leading_number(raw.trim())
            .ok_or_else(|| ConfigError::invalid("Version", "version", raw))?;
        let tenths = (leading * 10.0).trunc() as u64;
        let year = (tenths / 10) as u32;
        Ok(Self {
            year,
            half: tenths % 10 == 5,
        })
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn is_half_release(&self) -> bool {
        self.half
    }

    pub fn at_least(&self, year: u32, half: bool) -> bool {
        *self >= Self::new(year, half)
    }

    /// Suffix used by the worker configuration, e.g. `2023_0` or `2016_5`.
    pub fn executable_key(&self) -> String {
        format!("{}_{}", self.year, if self.half { 5 } else { 0 })
    }
}

impl fmt::Display for MayaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.half {
            write!(f, "{}.5", self.year)
        } else {
            write!(f, "{}", self.year)
        }
    }
}

fn leading_number(s: &str) -> Option<f64> {
    let end = s
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*c == '.' && *i > 0)))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let candidate = s[..end].trim_end_matches('.');
    if candidate.is_empty() {
        return None;
    }
    candidate.parse::<f64>().ok()
}
