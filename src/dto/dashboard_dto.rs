use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::attendance_dto::AttendanceOverviewResponse;
use super::hackathon_dto::HackathonResponse;
use crate::services::calendar_aggregator::AnnotatedItem;

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub today: NaiveDate,
    pub attendance: AttendanceOverviewResponse,
    pub upcoming: Vec<AnnotatedItem>,
    pub tasks_by_status: BTreeMap<String, i64>,
    pub applications_by_stage: BTreeMap<String, i64>,
    pub missed_hackathons: Vec<HackathonResponse>,
}
