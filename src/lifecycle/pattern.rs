use super::IndexMetadata;
use super::Periodicity;
use crate::errors::LifecycleError;
use crate::Result;

/// Matcher and extractor for one family's partition names.
///
/// A partition name is the family prefix immediately followed by a
/// zero-padded date suffix whose width is fixed by the periodicity, e.g.
/// `logs-20240610` for a daily family named `logs-`.
#[derive(Debug, Clone)]
pub struct IndexNamePattern {
    family: String,
    periodicity: Periodicity,
}

impl IndexNamePattern {
    pub fn new(
        family: impl Into<String>,
        periodicity: Periodicity,
    ) -> Self {
        Self {
            family: family.into(),
            periodicity,
        }
    }

    pub fn for_metadata(metadata: &IndexMetadata) -> Self {
        metadata.pattern()
    }

    /// Structural check: some prefix plus an all-digit suffix of the
    /// expected width that decodes to a real calendar value.
    ///
    /// Purely shape-based. `filter` accepts partitions of any family with
    /// the same periodicity; `matches` adds the family comparison.
    pub fn filter(
        &self,
        candidate: &str,
    ) -> bool {
        let suffix_len = self.periodicity.suffix_len();
        let bytes = candidate.as_bytes();
        if bytes.len() <= suffix_len {
            return false;
        }

        let split_at = bytes.len() - suffix_len;
        if !bytes[split_at..].iter().all(|b| b.is_ascii_digit()) {
            return false;
        }

        // The suffix is pure ASCII here, so the byte offset is a char
        // boundary and the slice below cannot panic.
        candidate[split_at..]
            .parse::<u32>()
            .map(|value| self.periodicity.is_valid_value(value))
            .unwrap_or(false)
    }

    /// Candidate with the date suffix stripped.
    ///
    /// Yields an empty string for names shorter than the suffix width, which
    /// never compares equal to a validated family name.
    pub fn name_part<'a>(
        &self,
        candidate: &'a str,
    ) -> &'a str {
        let cut = candidate.len().saturating_sub(self.periodicity.suffix_len());
        candidate.get(..cut).unwrap_or("")
    }

    /// Integer date value embedded in the candidate's suffix.
    pub fn date_value(
        &self,
        candidate: &str,
    ) -> Result<u32> {
        if !self.filter(candidate) {
            return Err(LifecycleError::UnparsableDateSuffix {
                name: candidate.to_string(),
            }
            .into());
        }

        let split_at = candidate.len() - self.periodicity.suffix_len();
        candidate[split_at..].parse::<u32>().map_err(|_| {
            LifecycleError::UnparsableDateSuffix {
                name: candidate.to_string(),
            }
            .into()
        })
    }

    /// Partition name for an encoded date value.
    pub fn render(
        &self,
        date_value: u32,
    ) -> String {
        format!(
            "{}{:0width$}",
            self.family,
            date_value,
            width = self.periodicity.suffix_len()
        )
    }

    /// True when the candidate is a partition of this family. Family
    /// comparison is case-insensitive, matching how the cluster treats
    /// index names.
    pub fn matches(
        &self,
        candidate: &str,
    ) -> bool {
        self.filter(candidate) && self.name_part(candidate).eq_ignore_ascii_case(&self.family)
    }
}
