use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

text_enum! {
    ApplicationKind {
        Internship => "internship",
        Placement => "placement",
        FullTime => "full_time",
    }
}

text_enum! {
    ApplicationStage {
        Wishlist => "wishlist",
        Applied => "applied",
        OnlineAssessment => "online_assessment",
        Interviewing => "interviewing",
        Offer => "offer",
        Accepted => "accepted",
        Rejected => "rejected",
        Withdrawn => "withdrawn",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: String,
    pub company: String,
    pub role: String,
    pub kind: ApplicationKind,
    pub stage: ApplicationStage,
    pub location: Option<String>,
    pub url: Option<String>,
    pub applied_on: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
