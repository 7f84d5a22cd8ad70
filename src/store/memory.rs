use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use uuid::Uuid;

use super::{StoreError, StoreResult};
use crate::models::Record;

type Collections = HashMap<&'static str, Box<dyn Any + Send + Sync>>;

/// In-process store. Each collection is a `Vec<E>` in insertion order, keyed
/// by [`Record::COLLECTION`].
///
/// Intended for tests/dev. Every operation takes the one lock, so writes are
/// serialized and a single update is atomic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<E: Record, T>(&self, f: impl FnOnce(&[E]) -> T) -> StoreResult<T> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        match collections.get(E::COLLECTION) {
            None => Ok(f(&[])),
            Some(records) => records
                .downcast_ref::<Vec<E>>()
                .map(|records| f(records))
                .ok_or(StoreError::Corrupted(E::COLLECTION)),
        }
    }

    fn write<E: Record, T>(
        &self,
        f: impl FnOnce(&mut Vec<E>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let records = collections
            .entry(E::COLLECTION)
            .or_insert_with(|| Box::new(Vec::<E>::new()) as Box<dyn Any + Send + Sync>)
            .downcast_mut::<Vec<E>>()
            .ok_or(StoreError::Corrupted(E::COLLECTION))?;
        f(records)
    }

    pub fn list<E: Record>(&self) -> StoreResult<Vec<E>> {
        self.read(|records: &[E]| records.to_vec())
    }

    pub fn find<E: Record>(&self, id: Uuid) -> StoreResult<Option<E>> {
        self.read(|records: &[E]| records.iter().find(|r| r.id() == id).cloned())
    }

    pub fn count<E: Record>(&self) -> StoreResult<usize> {
        self.read(|records: &[E]| records.len())
    }

    pub fn insert<E: Record>(&self, record: E) -> StoreResult<E> {
        self.write(|records: &mut Vec<E>| {
            ensure_unique(records, &record)?;
            records.push(record.clone());
            Ok(record)
        })
    }

    pub fn update<E, F>(&self, id: Uuid, change: F) -> StoreResult<Option<E>>
    where
        E: Record,
        F: FnOnce(&mut E),
    {
        self.write(|records: &mut Vec<E>| {
            let Some(index) = records.iter().position(|r| r.id() == id) else {
                return Ok(None);
            };

            let mut updated = records[index].clone();
            change(&mut updated);
            updated.touch(Utc::now());
            ensure_unique(records, &updated)?;

            records[index] = updated.clone();
            Ok(Some(updated))
        })
    }

    pub fn delete<E: Record>(&self, id: Uuid) -> StoreResult<bool> {
        self.write(|records: &mut Vec<E>| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            Ok(records.len() != before)
        })
    }
}

/// Rejects `candidate` if another record already holds its unique value.
fn ensure_unique<E: Record>(records: &[E], candidate: &E) -> StoreResult<()> {
    let (Some(column), Some(value)) = (E::UNIQUE, candidate.unique_value()) else {
        return Ok(());
    };

    let taken = records
        .iter()
        .any(|r| r.id() != candidate.id() && r.unique_value() == Some(value));

    if taken {
        return Err(StoreError::Duplicate(format!(
            "duplicate key value violates unique constraint \"{}_{}_key\": {} = {:?}",
            E::COLLECTION,
            column,
            column,
            value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branch, Category, Expense, NewBranch, NewCategory, NewExpense};

    fn branch(name: &str) -> Branch {
        let draft = NewBranch {
            name: Some(name.to_string()),
            location: Some("Main St".to_string()),
            contact: Some("555-0100".to_string()),
        };
        Branch::from_draft(draft, Uuid::new_v4(), Utc::now()).unwrap()
    }

    #[test]
    fn insert_keeps_collections_apart() {
        let store = MemoryStore::new();
        store.insert(branch("A")).unwrap();
        store.insert(branch("B")).unwrap();

        let category = Category::from_draft(
            NewCategory {
                name: Some("A".to_string()),
                description: None,
            },
            Uuid::new_v4(),
            Utc::now(),
        )
        .unwrap();
        store.insert(category).unwrap();

        let names: Vec<String> = store.list::<Branch>().unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(store.count::<Category>().unwrap(), 1);
    }

    #[test]
    fn duplicate_unique_value_is_rejected() {
        let store = MemoryStore::new();
        store.insert(branch("A")).unwrap();

        let err = store.insert(branch("A")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(msg) if msg.contains("branches_name_key")));
        assert_eq!(store.count::<Branch>().unwrap(), 1);
    }

    #[test]
    fn update_cannot_steal_a_unique_value() {
        let store = MemoryStore::new();
        store.insert(branch("A")).unwrap();
        let b = store.insert(branch("B")).unwrap();

        let err = store
            .update(b.id, |r: &mut Branch| r.name = "A".to_string())
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.find::<Branch>(b.id).unwrap().unwrap().name, "B");

        let renamed = store
            .update(b.id, |r: &mut Branch| r.contact = "555-0199".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(renamed.contact, "555-0199");
        assert!(renamed.updated_at >= renamed.created_at);
    }

    #[test]
    fn missing_ids_are_reported() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(store.find::<Branch>(id).unwrap().is_none());
        assert!(store.update(id, |_: &mut Branch| {}).unwrap().is_none());
        assert!(!store.delete::<Branch>(id).unwrap());
    }

    #[test]
    fn collections_without_unique_column_accept_repeats() {
        let store = MemoryStore::new();
        for _ in 0..2 {
            let draft: NewExpense = serde_json::from_str(r#"{"name": "Rent", "amount": 10}"#).unwrap();
            store
                .insert(Expense::from_draft(draft, Uuid::new_v4(), Utc::now()).unwrap())
                .unwrap();
        }
        assert_eq!(store.count::<Expense>().unwrap(), 2);
    }
}
