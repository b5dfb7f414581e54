use async_trait::async_trait;

use models::patient;

use crate::crud::{CrudService, EntityRules};
use crate::errors::ServiceError;
use crate::store::EntityStore;

pub type PatientService = CrudService<patient::Model, dyn EntityStore<patient::Model>>;

/// Admissions are always stored active; discharge goes through update.
pub struct PatientRules;

#[async_trait]
impl EntityRules<patient::Model> for PatientRules {
    async fn prepare(&self, mut record: patient::Model, existing: Option<&patient::Model>) -> Result<patient::Model, ServiceError> {
        if existing.is_none() {
            record.active = true;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{patient, services};

    #[tokio::test]
    async fn created_patient_is_active_until_updated() {
        let s = services();
        let mut p = patient(1);
        p.active = false;
        assert!(s.patients.create(p.clone()).await.unwrap().active);

        let discharged = s.patients.update(&1, p).await.unwrap();
        assert!(!discharged.active);
    }
}
