use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::models::calendar_event::{CalendarEvent, EventType};
use crate::models::hackathon::Hackathon;
use crate::models::priority::Priority;
use crate::models::project::Project;

pub const DEFAULT_TIGHT_DAYS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Manual,
    Hackathon,
    Project,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineKind {
    Event,
    Registration,
    EventStart,
    EventEnd,
    Submission,
    ProjectDeadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    Hackathon,
    Project,
}

/// Drill-through reference to the entity behind a calendar item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    pub target: LinkTarget,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarItem {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub item_type: EventType,
    pub priority: Option<Priority>,
    pub deadline_kind: DeadlineKind,
    pub source: SourceKind,
    pub link: Option<SourceLink>,
    /// Derived items mirror a source entity field and cannot be deleted here.
    pub derived: bool,
    /// The source entity is finished; kept in range views, hidden from upcoming.
    pub closed: bool,
    /// A back-reference that no longer resolves.
    pub orphaned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    AtRisk,
    Tight,
    OnTrack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedItem {
    #[serde(flatten)]
    pub item: CalendarItem,
    pub days_until: i64,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrgencyPolicy {
    pub tight_days: i64,
}

impl Default for UrgencyPolicy {
    fn default() -> Self {
        Self {
            tight_days: DEFAULT_TIGHT_DAYS,
        }
    }
}

impl UrgencyPolicy {
    pub fn urgency(&self, date: NaiveDate, today: NaiveDate) -> Urgency {
        let days_until = (date - today).num_days();
        if days_until <= 0 {
            Urgency::AtRisk
        } else if days_until <= self.tight_days {
            Urgency::Tight
        } else {
            Urgency::OnTrack
        }
    }
}

pub struct DeadlineSources<'a> {
    pub events: &'a [CalendarEvent],
    pub hackathons: &'a [Hackathon],
    pub projects: &'a [Project],
}

pub fn is_derived_id(id: &str) -> bool {
    id.starts_with("hackathon:") || id.starts_with("project:")
}

pub fn project_sources(sources: &DeadlineSources<'_>) -> Vec<CalendarItem> {
    let hackathon_ids: HashSet<&str> = sources.hackathons.iter().map(|h| h.id.as_str()).collect();
    let project_ids: HashSet<&str> = sources.projects.iter().map(|p| p.id.as_str()).collect();

    let mut items = Vec::new();

    for event in sources.events {
        items.push(from_manual_event(event, &hackathon_ids, &project_ids));
    }

    for hackathon in sources.hackathons {
        items.extend(from_hackathon(hackathon));
    }

    for project in sources.projects {
        if let Some(item) = from_project(project) {
            items.push(item);
        }
    }

    items
}

/// Projects every source and returns the merged chronological view.
pub fn aggregate(sources: &DeadlineSources<'_>) -> Vec<CalendarItem> {
    merge(project_sources(sources))
}

pub fn merge(mut items: Vec<CalendarItem>) -> Vec<CalendarItem> {
    items.sort_by(compare_items);
    items
}

fn compare_items(a: &CalendarItem, b: &CalendarItem) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| Priority::rank(b.priority).cmp(&Priority::rank(a.priority)))
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn within(items: Vec<CalendarItem>, from: NaiveDate, to: NaiveDate) -> Vec<CalendarItem> {
    items
        .into_iter()
        .filter(|item| item.date >= from && item.date <= to)
        .collect()
}

/// Expects merged input.
pub fn upcoming(items: Vec<CalendarItem>, today: NaiveDate, limit: usize) -> Vec<CalendarItem> {
    items
        .into_iter()
        .filter(|item| !item.closed && item.date >= today)
        .take(limit)
        .collect()
}

pub fn annotate(
    items: Vec<CalendarItem>,
    today: NaiveDate,
    policy: &UrgencyPolicy,
) -> Vec<AnnotatedItem> {
    items
        .into_iter()
        .map(|item| AnnotatedItem {
            days_until: (item.date - today).num_days(),
            urgency: policy.urgency(item.date, today),
            item,
        })
        .collect()
}

/// Hackathons whose submission deadline passed while still open. Advisory only.
pub fn missed_advisory(hackathons: &[Hackathon], today: NaiveDate) -> Vec<&Hackathon> {
    hackathons
        .iter()
        .filter(|h| h.appears_missed(today))
        .collect()
}

fn from_manual_event(
    event: &CalendarEvent,
    hackathon_ids: &HashSet<&str>,
    project_ids: &HashSet<&str>,
) -> CalendarItem {
    let mut orphaned = false;
    let mut link = None;

    if let Some(id) = event.hackathon_id.as_deref() {
        if hackathon_ids.contains(id) {
            link = Some(SourceLink {
                target: LinkTarget::Hackathon,
                id: id.to_string(),
            });
        } else {
            orphaned = true;
        }
    }
    if link.is_none() {
        if let Some(id) = event.project_id.as_deref() {
            if project_ids.contains(id) {
                link = Some(SourceLink {
                    target: LinkTarget::Project,
                    id: id.to_string(),
                });
                orphaned = false;
            } else {
                orphaned = true;
            }
        }
    }

    CalendarItem {
        id: event.id.clone(),
        title: event.title.clone(),
        date: event.event_date,
        time: event.event_time,
        item_type: event.event_type,
        priority: event.priority,
        deadline_kind: DeadlineKind::Event,
        source: SourceKind::Manual,
        link,
        derived: false,
        closed: false,
        orphaned,
    }
}

fn from_hackathon(hackathon: &Hackathon) -> Vec<CalendarItem> {
    let dates = [
        (
            hackathon.registration_deadline,
            DeadlineKind::Registration,
            "registration",
            format!("{}: registration closes", hackathon.name),
        ),
        (
            hackathon.start_date,
            DeadlineKind::EventStart,
            "start",
            format!("{} starts", hackathon.name),
        ),
        (
            hackathon.submission_deadline,
            DeadlineKind::Submission,
            "submission",
            format!("{}: submission due", hackathon.name),
        ),
        (
            hackathon.end_date,
            DeadlineKind::EventEnd,
            "end",
            format!("{} ends", hackathon.name),
        ),
    ];

    dates
        .into_iter()
        .filter_map(|(date, kind, suffix, title)| {
            date.map(|date| CalendarItem {
                id: format!("hackathon:{}:{}", hackathon.id, suffix),
                title,
                date,
                time: None,
                item_type: EventType::Hackathon,
                priority: hackathon.priority,
                deadline_kind: kind,
                source: SourceKind::Hackathon,
                link: Some(SourceLink {
                    target: LinkTarget::Hackathon,
                    id: hackathon.id.clone(),
                }),
                derived: true,
                closed: hackathon.status.is_closed(),
                orphaned: false,
            })
        })
        .collect()
}

fn from_project(project: &Project) -> Option<CalendarItem> {
    let deadline = project.deadline?;
    Some(CalendarItem {
        id: format!("project:{}:deadline", project.id),
        title: format!("{}: deadline", project.name),
        date: deadline,
        time: None,
        item_type: EventType::Project,
        priority: project.priority,
        deadline_kind: DeadlineKind::ProjectDeadline,
        source: SourceKind::Project,
        link: Some(SourceLink {
            target: LinkTarget::Project,
            id: project.id.clone(),
        }),
        derived: true,
        closed: project.status.is_closed(),
        orphaned: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hackathon::HackathonStatus;
    use crate::models::project::ProjectStatus;
    use chrono::Utc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn event(id: &str, title: &str, date: NaiveDate, priority: Option<Priority>) -> CalendarEvent {
        let now = Utc::now();
        CalendarEvent {
            id: id.into(),
            title: title.into(),
            description: None,
            event_date: date,
            event_time: None,
            event_type: EventType::Academic,
            priority,
            hackathon_id: None,
            project_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn hackathon(id: &str, status: HackathonStatus, submission: NaiveDate) -> Hackathon {
        let now = Utc::now();
        Hackathon {
            id: id.into(),
            name: format!("Hack {}", id),
            organizer: None,
            website: None,
            status,
            priority: Some(Priority::High),
            registration_deadline: None,
            submission_deadline: Some(submission),
            start_date: None,
            end_date: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn project(id: &str, deadline: NaiveDate) -> Project {
        let now = Utc::now();
        Project {
            id: id.into(),
            name: format!("Project {}", id),
            description: None,
            status: ProjectStatus::Active,
            priority: None,
            deadline: Some(deadline),
            repo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn merge_orders_by_date_then_priority_then_title() {
        let events = vec![
            event("e1", "Zeta quiz", day(20), Some(Priority::Low)),
            event("e2", "Alpha quiz", day(20), Some(Priority::Low)),
            event("e3", "Lab viva", day(20), Some(Priority::High)),
            event("e4", "Midterm", day(18), None),
        ];
        let sources = DeadlineSources {
            events: &events,
            hackathons: &[],
            projects: &[],
        };

        let titles: Vec<String> = aggregate(&sources).into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["Midterm", "Lab viva", "Alpha quiz", "Zeta quiz"]);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let events = vec![
            event("e1", "Same", day(20), None),
            event("e2", "Same", day(20), None),
        ];
        let hackathons = vec![hackathon("h1", HackathonStatus::Registered, day(20))];
        let projects = vec![project("p1", day(20))];
        let sources = DeadlineSources {
            events: &events,
            hackathons: &hackathons,
            projects: &projects,
        };

        let first = aggregate(&sources);
        let mut reversed = project_sources(&sources);
        reversed.reverse();
        assert_eq!(first, merge(reversed));
        assert_eq!(first, merge(first.clone()));
    }

    #[test]
    fn missed_hackathons_never_show_as_upcoming() {
        let hackathons = vec![
            hackathon("open", HackathonStatus::Registered, day(25)),
            hackathon("gone", HackathonStatus::Missed, day(25)),
            hackathon("done", HackathonStatus::Completed, day(26)),
        ];
        let sources = DeadlineSources {
            events: &[],
            hackathons: &hackathons,
            projects: &[],
        };

        let merged = aggregate(&sources);
        assert_eq!(merged.len(), 3);

        let upcoming = upcoming(merged, day(15), 10);
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, "hackathon:open:submission");
    }

    #[test]
    fn upcoming_skips_past_items_and_honours_limit() {
        let events = vec![
            event("past", "Past", day(10), None),
            event("a", "A", day(15), None),
            event("b", "B", day(16), None),
            event("c", "C", day(17), None),
        ];
        let sources = DeadlineSources {
            events: &events,
            hackathons: &[],
            projects: &[],
        };
        let ids: Vec<String> = upcoming(aggregate(&sources), day(15), 2)
            .into_iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn dangling_back_references_are_tolerated() {
        let mut linked = event("e1", "Demo prep", day(21), None);
        linked.hackathon_id = Some("deleted".into());
        let mut project_linked = event("e2", "Sprint review", day(22), None);
        project_linked.project_id = Some("p1".into());
        let events = vec![linked, project_linked];
        let projects = vec![project("p1", day(30))];
        let sources = DeadlineSources {
            events: &events,
            hackathons: &[],
            projects: &projects,
        };

        let items = aggregate(&sources);
        let orphan = items.iter().find(|i| i.id == "e1").unwrap();
        assert!(orphan.orphaned);
        assert!(orphan.link.is_none());

        let resolved = items.iter().find(|i| i.id == "e2").unwrap();
        assert!(!resolved.orphaned);
        assert_eq!(
            resolved.link,
            Some(SourceLink {
                target: LinkTarget::Project,
                id: "p1".into()
            })
        );
    }

    #[test]
    fn urgency_bands() {
        let policy = UrgencyPolicy::default();
        let today = day(15);
        assert_eq!(policy.urgency(day(14), today), Urgency::AtRisk);
        assert_eq!(policy.urgency(day(15), today), Urgency::AtRisk);
        assert_eq!(policy.urgency(day(16), today), Urgency::Tight);
        assert_eq!(policy.urgency(day(17), today), Urgency::Tight);
        assert_eq!(policy.urgency(day(18), today), Urgency::OnTrack);

        let annotated = annotate(vec![from_project(&project("p", day(18))).unwrap()], today, &policy);
        assert_eq!(annotated[0].days_until, 3);
    }

    #[test]
    fn range_filter_is_inclusive() {
        let events = vec![
            event("a", "A", day(1), None),
            event("b", "B", day(31), None),
            event("c", "C", day(12), None),
        ];
        let sources = DeadlineSources {
            events: &events,
            hackathons: &[],
            projects: &[],
        };
        let items = within(aggregate(&sources), day(1), day(12));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn derived_ids_are_recognised() {
        assert!(is_derived_id("hackathon:abc:submission"));
        assert!(is_derived_id("project:abc:deadline"));
        assert!(!is_derived_id("5d1f6c1e-0000-4000-8000-000000000000"));
    }
}
