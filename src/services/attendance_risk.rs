use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::class_instance::AttendanceStatus;

pub const DEFAULT_THRESHOLD: i64 = 75;
pub const DEFAULT_BORDERLINE_BAND: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskState {
    Critical,
    Borderline,
    Safe,
}

/// How an excused absence enters the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcusedPolicy {
    /// Counted as a held class that was not attended.
    #[default]
    DenominatorOnly,
    AsPresent,
    Excluded,
}

impl FromStr for ExcusedPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "denominator_only" => Ok(Self::DenominatorOnly),
            "as_present" => Ok(Self::AsPresent),
            "excluded" => Ok(Self::Excluded),
            other => Err(Error::Config(format!("Unknown excused policy: {}", other))),
        }
    }
}

/// Raw mark counts for one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceTally {
    pub present: i64,
    pub absent: i64,
    pub excused: i64,
    pub cancelled: i64,
    pub unmarked: i64,
}

impl AttendanceTally {
    pub fn from_marks<I>(marks: I) -> Self
    where
        I: IntoIterator<Item = AttendanceStatus>,
    {
        let mut tally = Self::default();
        for mark in marks {
            tally.record(mark, 1);
        }
        tally
    }

    pub fn from_counts(present: i64, absent: i64, excused: i64) -> Result<Self> {
        let tally = Self {
            present,
            absent,
            excused,
            ..Self::default()
        };
        tally.validate()?;
        Ok(tally)
    }

    pub fn record(&mut self, mark: AttendanceStatus, count: i64) {
        match mark {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Excused => self.excused += count,
            AttendanceStatus::Cancelled | AttendanceStatus::NoClass => self.cancelled += count,
            AttendanceStatus::Unmarked => self.unmarked += count,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("present", self.present),
            ("absent", self.absent),
            ("excused", self.excused),
            ("cancelled", self.cancelled),
            ("unmarked", self.unmarked),
        ];
        for (name, value) in counts {
            if value < 0 {
                return Err(Error::BadRequest(format!(
                    "Attendance count '{}' cannot be negative (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectAttendanceStats {
    #[serde(flatten)]
    pub tally: AttendanceTally,
    pub attended: i64,
    pub total: i64,
    pub percentage: i64,
    pub risk: RiskState,
    /// Assumes every upcoming class is attended.
    pub classes_needed: i64,
    pub classes_can_skip: i64,
    pub threshold: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttendancePolicy {
    threshold: i64,
    borderline_band: i64,
    excused: ExcusedPolicy,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            borderline_band: DEFAULT_BORDERLINE_BAND,
            excused: ExcusedPolicy::DenominatorOnly,
        }
    }
}

impl AttendancePolicy {
    pub fn new(threshold: i64, borderline_band: i64, excused: ExcusedPolicy) -> Result<Self> {
        if !(1..=99).contains(&threshold) {
            return Err(Error::Config(format!(
                "Attendance threshold must be between 1 and 99, got {}",
                threshold
            )));
        }
        if borderline_band < 0 || borderline_band > threshold {
            return Err(Error::Config(format!(
                "Borderline band must be between 0 and the threshold ({}), got {}",
                threshold, borderline_band
            )));
        }
        Ok(Self {
            threshold,
            borderline_band,
            excused,
        })
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn borderline_band(&self) -> i64 {
        self.borderline_band
    }

    pub fn excused(&self) -> ExcusedPolicy {
        self.excused
    }

    /// Returns `(attended, total)` under this policy.
    pub fn countable(&self, tally: &AttendanceTally) -> (i64, i64) {
        match self.excused {
            ExcusedPolicy::DenominatorOnly => {
                (tally.present, tally.present + tally.absent + tally.excused)
            }
            ExcusedPolicy::AsPresent => (
                tally.present + tally.excused,
                tally.present + tally.absent + tally.excused,
            ),
            ExcusedPolicy::Excluded => (tally.present, tally.present + tally.absent),
        }
    }

    pub fn evaluate(&self, tally: &AttendanceTally) -> Result<SubjectAttendanceStats> {
        tally.validate()?;
        let (attended, total) = self.countable(tally);

        Ok(SubjectAttendanceStats {
            tally: *tally,
            attended,
            total,
            percentage: percentage(attended, total),
            risk: self.classify(attended, total),
            classes_needed: self.classes_needed(attended, total),
            classes_can_skip: self.classes_can_skip(attended, total),
            threshold: self.threshold,
        })
    }

    /// Bands are compared against the displayed (rounded) percentage.
    pub fn classify(&self, attended: i64, total: i64) -> RiskState {
        let pct = percentage(attended, total);
        if pct >= self.threshold {
            RiskState::Safe
        } else if pct >= self.threshold - self.borderline_band {
            RiskState::Borderline
        } else {
            RiskState::Critical
        }
    }

    /// Zero whenever the subject already classifies as SAFE.
    pub fn classes_needed(&self, attended: i64, total: i64) -> i64 {
        if self.classify(attended, total) == RiskState::Safe {
            return 0;
        }
        let deficit = self.threshold * total - 100 * attended;
        if deficit <= 0 {
            return 0;
        }
        div_ceil(deficit, 100 - self.threshold)
    }

    /// Largest number of consecutive future absences that keeps the subject SAFE.
    pub fn classes_can_skip(&self, attended: i64, total: i64) -> i64 {
        // SAFE after k absences iff 200 * attended >= (2T - 1) * (total + k).
        let bound = 2 * self.threshold - 1;
        let surplus = 200 * attended - bound * total;
        if total == 0 || surplus < 0 {
            return 0;
        }
        surplus / bound
    }
}

/// Rounded half up; an empty history reports 100.
pub fn percentage(attended: i64, total: i64) -> i64 {
    if total <= 0 {
        return 100;
    }
    ((200 * attended + total) / (2 * total)).clamp(0, 100)
}

fn div_ceil(numerator: i64, denominator: i64) -> i64 {
    (numerator + denominator - 1) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_instance::AttendanceStatus::*;

    fn policy() -> AttendancePolicy {
        AttendancePolicy::default()
    }

    #[test]
    fn three_of_four_is_exactly_safe() {
        let tally = AttendanceTally::from_marks([Present, Present, Absent, Present]);
        let stats = policy().evaluate(&tally).unwrap();
        assert_eq!(stats.attended, 3);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.percentage, 75);
        assert_eq!(stats.risk, RiskState::Safe);
        assert_eq!(stats.classes_needed, 0);
    }

    #[test]
    fn one_of_three_is_critical_and_needs_five() {
        let tally = AttendanceTally::from_marks([Absent, Absent, Present]);
        let stats = policy().evaluate(&tally).unwrap();
        assert_eq!(stats.percentage, 33);
        assert_eq!(stats.risk, RiskState::Critical);
        assert_eq!(stats.classes_needed, 5);

        // 6 / 8 = 75%
        let recovered = policy().classify(1 + 5, 3 + 5);
        assert_eq!(recovered, RiskState::Safe);
    }

    #[test]
    fn empty_history_defaults_to_safe() {
        let stats = policy().evaluate(&AttendanceTally::default()).unwrap();
        assert_eq!(stats.percentage, 100);
        assert_eq!(stats.risk, RiskState::Safe);
        assert_eq!(stats.classes_needed, 0);
    }

    #[test]
    fn cancelled_and_unmarked_are_ignored() {
        let tally =
            AttendanceTally::from_marks([Present, Cancelled, NoClass, Unmarked, Unmarked, Absent]);
        let stats = policy().evaluate(&tally).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.attended, 1);
        assert_eq!(stats.tally.cancelled, 2);
        assert_eq!(stats.tally.unmarked, 2);
    }

    #[test]
    fn excused_policy_changes_the_ratio() {
        let tally = AttendanceTally::from_marks([Present, Present, Excused, Absent]);

        let (a, t) = policy().countable(&tally);
        assert_eq!((a, t), (2, 4));

        let lenient = AttendancePolicy::new(75, 10, ExcusedPolicy::AsPresent).unwrap();
        assert_eq!(lenient.countable(&tally), (3, 4));

        let excluded = AttendancePolicy::new(75, 10, ExcusedPolicy::Excluded).unwrap();
        assert_eq!(excluded.countable(&tally), (2, 3));
    }

    #[test]
    fn borderline_band_sits_below_threshold() {
        let p = policy();
        assert_eq!(p.classify(7, 10), RiskState::Borderline);
        assert_eq!(p.classify(65, 100), RiskState::Borderline);
        assert_eq!(p.classify(64, 100), RiskState::Critical);
        assert_eq!(p.classify(75, 100), RiskState::Safe);
    }

    #[test]
    fn rounded_percentage_decides_the_band() {
        // 56 / 75 = 74.67%, shown as 75
        let nearly = AttendanceTally::from_counts(56, 19, 0).unwrap();
        let stats = policy().evaluate(&nearly).unwrap();
        assert_eq!(stats.percentage, 75);
        assert_eq!(stats.risk, RiskState::Safe);
        assert_eq!(stats.classes_needed, 0);

        // 42 / 65 = 64.62%, shown as 65
        let edge = AttendanceTally::from_counts(42, 23, 0).unwrap();
        let stats = policy().evaluate(&edge).unwrap();
        assert_eq!(stats.percentage, 65);
        assert_eq!(stats.risk, RiskState::Borderline);
        assert!(stats.classes_needed > 0);

        assert_eq!(policy().classify(41, 65), RiskState::Critical);
    }

    #[test]
    fn percentage_stays_in_bounds() {
        for total in 0..40 {
            for attended in 0..=total {
                let pct = percentage(attended, total);
                assert!((0..=100).contains(&pct), "{}/{} -> {}", attended, total, pct);
            }
        }
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
    }

    #[test]
    fn risk_is_monotonic_in_attended() {
        let p = policy();
        for total in 1..40 {
            let mut previous = p.classify(0, total);
            for attended in 1..=total {
                let current = p.classify(attended, total);
                assert!(current >= previous, "{}/{}", attended, total);
                previous = current;
            }
        }
    }

    #[test]
    fn classes_needed_shrinks_with_each_attended_class() {
        let p = policy();
        let (mut attended, mut total) = (2, 10);
        let mut needed = p.classes_needed(attended, total);
        assert!(needed > 0);
        while needed > 0 {
            attended += 1;
            total += 1;
            let next = p.classes_needed(attended, total);
            assert!(next < needed);
            needed = next;
        }
        assert_eq!(p.classify(attended, total), RiskState::Safe);
    }

    #[test]
    fn classes_needed_is_zero_when_safe() {
        let p = policy();
        for total in 1..30 {
            for attended in 0..=total {
                if p.classify(attended, total) == RiskState::Safe {
                    assert_eq!(p.classes_needed(attended, total), 0);
                }
            }
        }
    }

    #[test]
    fn skip_allowance_keeps_subject_safe() {
        let p = policy();
        let skip = p.classes_can_skip(18, 20);
        assert_eq!(skip, 4);
        assert_eq!(p.classify(18, 20 + skip), RiskState::Safe);
        assert_ne!(p.classify(18, 20 + skip + 1), RiskState::Safe);
    }

    #[test]
    fn negative_counts_are_rejected() {
        assert!(AttendanceTally::from_counts(-1, 2, 0).is_err());
        let tally = AttendanceTally {
            absent: -3,
            ..AttendanceTally::default()
        };
        assert!(policy().evaluate(&tally).is_err());
    }

    #[test]
    fn policy_bounds_are_validated() {
        assert!(AttendancePolicy::new(0, 0, ExcusedPolicy::default()).is_err());
        assert!(AttendancePolicy::new(100, 10, ExcusedPolicy::default()).is_err());
        assert!(AttendancePolicy::new(50, 60, ExcusedPolicy::default()).is_err());
        assert_eq!("as_present".parse::<ExcusedPolicy>().unwrap(), ExcusedPolicy::AsPresent);
    }
}
