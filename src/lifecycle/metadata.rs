use chrono::Datelike;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;

use super::IndexNamePattern;
use crate::errors::LifecycleError;
use crate::Result;

/// Calendar granularity at which a managed index family is partitioned.
///
/// The granularity fixes both the arithmetic step (one day, one 7-day week,
/// one calendar month, one calendar year) and the width of the zero-padded
/// date suffix appended to partition names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Periodicity {
    /// Digit count of the date suffix for this granularity.
    ///
    /// Weekly families keep the full day-resolution suffix of the week's
    /// anchor day, so weekly and daily names are indistinguishable in shape.
    pub fn suffix_len(&self) -> usize {
        match self {
            Periodicity::Daily | Periodicity::Weekly => 8, // YYYYMMDD
            Periodicity::Monthly => 6,                     // YYYYMM
            Periodicity::Yearly => 4,                      // YYYY
        }
    }

    /// Encodes a calendar date at this granularity as an integer.
    ///
    /// Fixed suffix width plus zero padding keeps integer ordering identical
    /// to chronological ordering, so cutoff comparisons are plain `<=`.
    pub fn encode(&self, date: NaiveDate) -> u32 {
        match self {
            Periodicity::Daily | Periodicity::Weekly => {
                date.year() as u32 * 10_000 + date.month() * 100 + date.day()
            }
            Periodicity::Monthly => date.year() as u32 * 100 + date.month(),
            Periodicity::Yearly => date.year() as u32,
        }
    }

    /// True when a suffix-width-bounded integer decodes to a real calendar
    /// value at this granularity. Rejects shapes like `20240431`.
    pub(crate) fn is_valid_value(&self, value: u32) -> bool {
        match self {
            Periodicity::Daily | Periodicity::Weekly => {
                let (year, month, day) = (value / 10_000, value / 100 % 100, value % 100);
                NaiveDate::from_ymd_opt(year as i32, month, day).is_some()
            }
            Periodicity::Monthly => (1..=12).contains(&(value % 100)),
            Periodicity::Yearly => true,
        }
    }

    pub(crate) fn unit_name(&self) -> &'static str {
        match self {
            Periodicity::Daily => "days",
            Periodicity::Weekly => "weeks",
            Periodicity::Monthly => "months",
            Periodicity::Yearly => "years",
        }
    }
}

/// One operator-declared managed index family.
///
/// Deserialized from the JSON descriptor list in configuration. The list is
/// re-parsed on every tick so retention edits take effect without a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexMetadata {
    /// Literal prefix shared by every partition of the family
    pub index_name: String,

    pub periodicity: Periodicity,

    /// Number of periods kept; older partitions become delete-eligible
    pub retention_count: u32,

    /// Create the next period's partition ahead of need
    #[serde(default)]
    pub pre_create: bool,
}

impl IndexMetadata {
    /// Matcher for this family's partition names.
    pub fn pattern(&self) -> IndexNamePattern {
        IndexNamePattern::new(self.index_name.clone(), self.periodicity)
    }

    /// Checks naming invariants a descriptor must satisfy.
    ///
    /// A family name ending in a digit would bleed into the date suffix and
    /// make prefix matching ambiguous, so it is rejected outright.
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(LifecycleError::InvalidIndexName {
                name: self.index_name.clone(),
                reason: "name must not be empty",
            }
            .into());
        }

        if self.index_name.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(LifecycleError::InvalidIndexName {
                name: self.index_name.clone(),
                reason: "name must not end with a digit",
            }
            .into());
        }

        Ok(())
    }
}

/// Parses and validates the operator-supplied JSON descriptor list.
pub fn parse_descriptors(raw: &str) -> Result<Vec<IndexMetadata>> {
    let entries: Vec<IndexMetadata> = serde_json::from_str(raw).map_err(LifecycleError::Descriptors)?;

    for entry in &entries {
        entry.validate()?;
    }

    Ok(entries)
}
