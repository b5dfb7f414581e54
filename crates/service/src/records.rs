//! Binds each `models` entity to the store traits.

use sea_orm::Value;

use models::{hours_worked, location, patient, permission, therapist_activity, therapist_event, user};

use crate::store::{Record, SeaOrmRecord};

macro_rules! record {
    ($module:ident, $kind:literal, $id_field:ident: $id_ty:ty, $id_col:ident) => {
        impl Record for $module::Model {
            type Id = $id_ty;
            const KIND: &'static str = $kind;

            fn id(&self) -> $id_ty {
                self.$id_field.clone()
            }

            fn row_version(&self) -> i32 {
                self.row_version
            }

            fn set_row_version(&mut self, version: i32) {
                self.row_version = version;
            }
        }

        impl SeaOrmRecord for $module::Model {
            type Entity = $module::Entity;
            type ActiveModel = $module::ActiveModel;

            fn id_column() -> $module::Column {
                $module::Column::$id_col
            }

            fn version_column() -> $module::Column {
                $module::Column::RowVersion
            }

            fn id_value(id: &$id_ty) -> Value {
                Value::from(id.clone())
            }
        }
    };
}

record!(user, "user", user_id: i32, UserId);
record!(permission, "permission", permission_id: i32, PermissionId);
record!(patient, "patient", patient_id: i32, PatientId);
record!(therapist_event, "therapist event", event_id: i32, EventId);
record!(hours_worked, "hours worked", hours_worked_id: i32, HoursWorkedId);
record!(location, "location", location_id: i32, LocationId);
record!(therapist_activity, "therapist activity", activity_name: String, ActivityName);
