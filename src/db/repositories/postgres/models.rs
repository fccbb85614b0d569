//! Diesel row models and conversions to the domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{events, gcn_notices, localizations, planned_observations, plans};
use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::gcn::NoticeType;
use crate::models::{Event, GcnNotice, Localization, Plan, PlanStatus, PlannedObservation};

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub struct EventRow {
    pub dateobs: DateTime<Utc>,
    pub tags: serde_json::Value,
}

impl EventRow {
    pub fn from_domain(event: &Event) -> Self {
        Self {
            dateobs: event.dateobs,
            tags: serde_json::Value::from(event.tags.clone()),
        }
    }

    pub fn into_domain(self) -> RepositoryResult<Event> {
        let tags: Vec<String> = serde_json::from_value(self.tags)
            .map_err(|e| RepositoryError::validation(format!("Malformed event tags: {e}")))?;
        Ok(Event::new(self.dateobs, tags))
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = gcn_notices)]
pub struct NoticeRow {
    pub ivorn: String,
    pub event_dateobs: DateTime<Utc>,
    pub dateobs: DateTime<Utc>,
    pub notice_type: i64,
    pub stream: String,
    pub date: DateTime<Utc>,
    pub content: Vec<u8>,
}

impl NoticeRow {
    pub fn from_domain(notice: &GcnNotice) -> Self {
        Self {
            ivorn: notice.ivorn.clone(),
            event_dateobs: notice.event_dateobs(),
            dateobs: notice.dateobs,
            notice_type: notice.notice_type.code(),
            stream: notice.stream.clone(),
            date: notice.date,
            content: notice.content.clone(),
        }
    }

    pub fn into_domain(self) -> RepositoryResult<GcnNotice> {
        let notice_type = NoticeType::try_from(self.notice_type)
            .map_err(|e| RepositoryError::validation(e.to_string()))?;
        Ok(GcnNotice {
            ivorn: self.ivorn,
            notice_type,
            stream: self.stream,
            date: self.date,
            dateobs: self.dateobs,
            content: self.content,
        })
    }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = localizations)]
pub struct LocalizationRow {
    pub event_dateobs: DateTime<Utc>,
    pub localization_name: String,
    pub flat_2d: serde_json::Value,
    pub credible_area_deg2: Option<f64>,
}

impl LocalizationRow {
    pub fn from_domain(localization: &Localization) -> Self {
        Self {
            event_dateobs: localization.dateobs,
            localization_name: localization.localization_name.clone(),
            flat_2d: serde_json::Value::from(localization.flat_2d.clone()),
            credible_area_deg2: localization.credible_area_deg2,
        }
    }

    pub fn into_domain(self) -> RepositoryResult<Localization> {
        let flat_2d: Vec<f64> = serde_json::from_value(self.flat_2d)
            .map_err(|e| RepositoryError::validation(format!("Malformed flat_2d: {e}")))?;
        Ok(Localization {
            dateobs: self.event_dateobs,
            localization_name: self.localization_name,
            flat_2d,
            credible_area_deg2: self.credible_area_deg2,
        })
    }
}

#[derive(Debug, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub dateobs: DateTime<Utc>,
    pub telescope: String,
    pub plan_name: String,
    pub validity_window_start: DateTime<Utc>,
    pub validity_window_end: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn status_to_str(status: PlanStatus) -> &'static str {
    match status {
        PlanStatus::Working => "working",
        PlanStatus::Ready => "ready",
        PlanStatus::Submitted => "submitted",
    }
}

fn status_from_str(s: &str) -> RepositoryResult<PlanStatus> {
    match s {
        "working" => Ok(PlanStatus::Working),
        "ready" => Ok(PlanStatus::Ready),
        "submitted" => Ok(PlanStatus::Submitted),
        other => Err(RepositoryError::validation(format!(
            "Unknown plan status: {other}"
        ))),
    }
}

impl PlanRow {
    pub fn from_domain(plan: &Plan) -> Self {
        Self {
            dateobs: plan.dateobs,
            telescope: plan.telescope.clone(),
            plan_name: plan.plan_name.clone(),
            validity_window_start: plan.validity_window_start,
            validity_window_end: plan.validity_window_end,
            status: status_to_str(plan.status).to_string(),
            created_at: plan.created_at,
        }
    }

    pub fn into_domain(self) -> RepositoryResult<Plan> {
        Ok(Plan {
            dateobs: self.dateobs,
            telescope: self.telescope,
            plan_name: self.plan_name,
            validity_window_start: self.validity_window_start,
            validity_window_end: self.validity_window_end,
            status: status_from_str(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = planned_observations)]
pub struct PlannedObservationRow {
    pub dateobs: DateTime<Utc>,
    pub telescope: String,
    pub plan_name: String,
    pub obs_order: i64,
    pub field_id: i64,
    pub filter_id: String,
    pub exposure_time: f64,
    pub weight: f64,
}

impl PlannedObservationRow {
    pub fn from_domain(obs: &PlannedObservation) -> Self {
        Self {
            dateobs: obs.dateobs,
            telescope: obs.telescope.clone(),
            plan_name: obs.plan_name.clone(),
            obs_order: obs.obs_order as i64,
            field_id: obs.field_id as i64,
            filter_id: obs.filter_id.clone(),
            exposure_time: obs.exposure_time,
            weight: obs.weight,
        }
    }

    pub fn into_domain(self) -> RepositoryResult<PlannedObservation> {
        let field_id = u32::try_from(self.field_id)
            .map_err(|_| RepositoryError::validation("Negative field_id"))?;
        let obs_order = u32::try_from(self.obs_order)
            .map_err(|_| RepositoryError::validation("Negative obs_order"))?;
        Ok(PlannedObservation {
            dateobs: self.dateobs,
            telescope: self.telescope,
            plan_name: self.plan_name,
            field_id,
            filter_id: self.filter_id,
            exposure_time: self.exposure_time,
            weight: self.weight,
            obs_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time::parse_isotime;

    #[test]
    fn test_plan_status_round_trip() {
        for status in [PlanStatus::Working, PlanStatus::Ready, PlanStatus::Submitted] {
            assert_eq!(status_from_str(status_to_str(status)).unwrap(), status);
        }
        assert!(status_from_str("archived").is_err());
    }

    #[test]
    fn test_event_row_round_trip() {
        let event = Event::new(
            parse_isotime("2018-01-16T00:36:53").unwrap(),
            vec!["Fermi".into(), "long".into(), "GRB".into()],
        );
        let restored = EventRow::from_domain(&event).into_domain().unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn test_notice_row_keys_event_by_rounded_dateobs() {
        let notice = GcnNotice {
            ivorn: "ivo://nasa.gsfc.gcn/Fermi#test".into(),
            notice_type: NoticeType::FermiGbmFinPos,
            stream: "Fermi".into(),
            date: parse_isotime("2018-01-16T00:46:05").unwrap(),
            dateobs: parse_isotime("2018-01-16T00:36:52.81").unwrap(),
            content: b"<xml/>".to_vec(),
        };
        let row = NoticeRow::from_domain(&notice);
        assert_eq!(
            row.event_dateobs,
            parse_isotime("2018-01-16T00:36:53").unwrap()
        );
        assert_eq!(row.into_domain().unwrap(), notice);
    }
}
