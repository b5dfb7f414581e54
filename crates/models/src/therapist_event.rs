use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::user;

/// A block of therapist time (a session, charting, a meeting...).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "therapist_event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub event_id: i32,
    pub therapist_id: i32,
    pub activity_name: String,
    pub start_time: DateTime,
    pub end_time: DateTime,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[serde(default = "crate::default_active")]
    pub active: bool,
    #[serde(default)]
    pub row_version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Therapist,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Therapist => Entity::belongs_to(user::Entity)
                .from(Column::TherapistId)
                .to(user::Column::UserId)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Closed-interval overlap with `[start, end]`: boundaries touching count.
    pub fn overlaps(&self, start: DateTime, end: DateTime) -> bool {
        self.start_time <= end && self.end_time >= start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32) -> DateTime {
        NaiveDate::from_ymd_opt(2010, 2, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn event(start: DateTime, end: DateTime) -> Model {
        Model {
            event_id: 1,
            therapist_id: 1,
            activity_name: "gait".into(),
            start_time: start,
            end_time: end,
            notes: None,
            active: true,
            row_version: 0,
        }
    }

    #[test]
    fn overlap_is_inclusive_on_both_ends() {
        let (s, e) = (at(8), at(12));
        assert!(event(at(8), at(12)).overlaps(s, e));
        assert!(event(at(9), at(10)).overlaps(s, e));
        assert!(event(at(10), at(8)).overlaps(s, e));
        assert!(event(at(5), at(8)).overlaps(s, e));
        assert!(event(at(12), at(20)).overlaps(s, e));
        assert!(event(at(1), at(28)).overlaps(s, e));
    }

    #[test]
    fn disjoint_events_do_not_overlap() {
        let (s, e) = (at(8), at(12));
        assert!(!event(at(1), at(7)).overlaps(s, e));
        assert!(!event(at(13), at(14)).overlaps(s, e));
    }
}
