use crate::error::StoreError;
use crate::model::{Condition, Equipment, EquipmentFields};
use crate::store::Store;
use crate::supervisors::required;
use uuid::Uuid;

impl EquipmentFields {
    fn apply(&self, e: &mut Equipment) {
        if let Some(v) = &self.kind {
            e.kind = v.clone();
        }
        if let Some(v) = &self.serial {
            e.serial = v.clone();
        }
        if let Some(c) = self.condition {
            e.condition = c;
        }
        if let Some(c) = self.cleanliness {
            e.cleanliness = c;
        }
        if let Some(v) = &self.notes {
            e.notes = v.clone();
        }
    }
}

fn validate(e: &mut Equipment) -> Result<(), StoreError> {
    e.kind = required("kind", &e.kind)?;
    e.serial = required("serial", &e.serial)?;
    Ok(())
}

impl Store {
    pub fn add_equipment(&mut self, fields: &EquipmentFields) -> Result<Equipment, StoreError> {
        let mut item = Equipment {
            id: Uuid::new_v4().to_string(),
            kind: String::new(),
            serial: String::new(),
            condition: Condition::Excellent,
            cleanliness: Condition::Good,
            notes: String::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            modified_at: None,
        };
        fields.apply(&mut item);
        validate(&mut item)?;
        self.equipment.push(item.clone());
        tracing::info!(equipment_id = %item.id, kind = %item.kind, "added equipment");
        Ok(item)
    }

    pub fn update_equipment(
        &mut self,
        equipment_id: &str,
        fields: &EquipmentFields,
    ) -> Result<Equipment, StoreError> {
        let idx = self
            .equipment
            .iter()
            .position(|e| e.id == equipment_id)
            .ok_or_else(|| StoreError::not_found("equipment", equipment_id))?;
        let mut updated = self.equipment[idx].clone();
        fields.apply(&mut updated);
        validate(&mut updated)?;
        updated.modified_at = Some(chrono::Utc::now().to_rfc3339());
        self.equipment[idx] = updated.clone();
        Ok(updated)
    }

    pub fn remove_equipment(&mut self, equipment_id: &str) -> Result<Equipment, StoreError> {
        let idx = self
            .equipment
            .iter()
            .position(|e| e.id == equipment_id)
            .ok_or_else(|| StoreError::not_found("equipment", equipment_id))?;
        Ok(self.equipment.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> EquipmentFields {
        EquipmentFields {
            kind: Some("Projector".into()),
            serial: Some("PJ-204".into()),
            ..EquipmentFields::default()
        }
    }

    #[test]
    fn add_requires_kind_and_serial() {
        let mut store = Store::new();
        let item = store.add_equipment(&projector()).expect("add");
        assert_eq!(item.condition, Condition::Excellent);
        assert_eq!(item.cleanliness, Condition::Good);

        let no_serial = EquipmentFields {
            serial: Some(" ".into()),
            ..projector()
        };
        assert!(store.add_equipment(&no_serial).is_err());
        let no_kind = EquipmentFields {
            kind: None,
            ..projector()
        };
        assert!(store.add_equipment(&no_kind).is_err());
        assert_eq!(store.equipment().len(), 1);
    }

    #[test]
    fn update_merges_fields_and_stamps_modification() {
        let mut store = Store::new();
        let item = store.add_equipment(&projector()).expect("add");
        let updated = store
            .update_equipment(
                &item.id,
                &EquipmentFields {
                    condition: Some(Condition::Poor),
                    notes: Some("lamp flickers".into()),
                    ..EquipmentFields::default()
                },
            )
            .expect("update");
        assert_eq!(updated.serial, "PJ-204");
        assert_eq!(updated.condition, Condition::Poor);
        assert!(updated.modified_at.is_some());
        assert!(store.update_equipment("nope", &projector()).is_err());
    }

    #[test]
    fn remove_by_id() {
        let mut store = Store::new();
        let item = store.add_equipment(&projector()).expect("add");
        assert_eq!(store.remove_equipment(&item.id).expect("remove").kind, "Projector");
        assert!(matches!(
            store.remove_equipment(&item.id),
            Err(StoreError::NotFound { kind: "equipment", .. })
        ));
    }
}
