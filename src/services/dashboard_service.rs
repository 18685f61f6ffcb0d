use chrono::NaiveDate;

use crate::dto::dashboard_dto::DashboardResponse;
use crate::dto::hackathon_dto::HackathonResponse;
use crate::error::Result;
use crate::services::{
    application_service::ApplicationService, attendance_service::AttendanceService,
    calendar_aggregator, calendar_service::CalendarService, hackathon_service::HackathonService,
    subject_service::SubjectService, task_service::TaskService,
};

/// Read-only summary across every area of the console.
#[derive(Clone)]
pub struct DashboardService {
    subjects: SubjectService,
    attendance: AttendanceService,
    calendar: CalendarService,
    tasks: TaskService,
    applications: ApplicationService,
    hackathons: HackathonService,
}

impl DashboardService {
    pub fn new(
        subjects: SubjectService,
        attendance: AttendanceService,
        calendar: CalendarService,
        tasks: TaskService,
        applications: ApplicationService,
        hackathons: HackathonService,
    ) -> Self {
        Self {
            subjects,
            attendance,
            calendar,
            tasks,
            applications,
            hackathons,
        }
    }

    pub async fn summary(&self, today: NaiveDate) -> Result<DashboardResponse> {
        let subjects = self.subjects.list_subjects().await?;
        let attendance = self.attendance.overview(subjects).await?;
        let upcoming = self.calendar.upcoming_items(None, today).await?;
        let tasks_by_status = self.tasks.count_by_status().await?;
        let applications_by_stage = self.applications.count_by_stage().await?;

        let hackathons = self.hackathons.list_all().await?;
        let missed_hackathons = calendar_aggregator::missed_advisory(&hackathons, today)
            .into_iter()
            .map(|hackathon| HackathonResponse::new(hackathon.clone(), today))
            .collect();

        Ok(DashboardResponse {
            today,
            attendance,
            upcoming,
            tasks_by_status,
            applications_by_stage,
            missed_hackathons,
        })
    }
}
