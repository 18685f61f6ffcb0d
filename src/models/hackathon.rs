use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::priority::Priority;

text_enum! {
    /// Lifecycle of a tracked hackathon. Every transition is a user action;
    /// nothing here moves a hackathon between states on its own.
    HackathonStatus {
        Discovered => "discovered",
        Applied => "applied",
        UnderReview => "under_review",
        Shortlisted => "shortlisted",
        TeamFormation => "team_formation",
        Upcoming => "upcoming",
        Registered => "registered",
        InProgress => "in_progress",
        Submission => "submission",
        Submitted => "submitted",
        ResultsPending => "results_pending",
        Selected => "selected",
        NotSelected => "not_selected",
        Completed => "completed",
        Missed => "missed",
        Withdrawn => "withdrawn",
    }
}

impl HackathonStatus {
    /// Closed hackathons contribute nothing to upcoming deadlines.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            HackathonStatus::Completed | HackathonStatus::Missed | HackathonStatus::Withdrawn
        )
    }

    pub fn is_pre_submission(&self) -> bool {
        matches!(
            self,
            HackathonStatus::Discovered
                | HackathonStatus::Applied
                | HackathonStatus::UnderReview
                | HackathonStatus::Shortlisted
                | HackathonStatus::TeamFormation
                | HackathonStatus::Upcoming
                | HackathonStatus::Registered
                | HackathonStatus::InProgress
                | HackathonStatus::Submission
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Hackathon {
    pub id: String,
    pub name: String,
    pub organizer: Option<String>,
    pub website: Option<String>,
    pub status: HackathonStatus,
    pub priority: Option<Priority>,
    pub registration_deadline: Option<NaiveDate>,
    pub submission_deadline: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Hackathon {
    /// Advisory only: the stored status is never rewritten from this.
    pub fn appears_missed(&self, today: NaiveDate) -> bool {
        self.status.is_pre_submission()
            && self
                .submission_deadline
                .is_some_and(|deadline| deadline < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hackathon(status: HackathonStatus, submission: Option<NaiveDate>) -> Hackathon {
        let now = Utc::now();
        Hackathon {
            id: "h1".into(),
            name: "Build Week".into(),
            organizer: None,
            website: None,
            status,
            priority: None,
            registration_deadline: None,
            submission_deadline: submission,
            start_date: None,
            end_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn missed_inference_needs_a_passed_deadline_and_open_status() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let yesterday = today.pred_opt();

        assert!(hackathon(HackathonStatus::Registered, yesterday).appears_missed(today));
        assert!(!hackathon(HackathonStatus::Submitted, yesterday).appears_missed(today));
        assert!(!hackathon(HackathonStatus::Registered, Some(today)).appears_missed(today));
        assert!(!hackathon(HackathonStatus::Registered, None).appears_missed(today));
    }

    #[test]
    fn status_parsing_accepts_loose_spellings() {
        assert_eq!(
            "Under Review".parse::<HackathonStatus>().unwrap(),
            HackathonStatus::UnderReview
        );
        assert_eq!(
            "results-pending".parse::<HackathonStatus>().unwrap(),
            HackathonStatus::ResultsPending
        );
        assert!("abandoned".parse::<HackathonStatus>().is_err());
        assert_eq!(HackathonStatus::ALL.len(), 16);
    }
}
