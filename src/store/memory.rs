//! In-memory storage implementation

use std::cmp::Ordering;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{ListStore, OrderBy, StoreQuery};
use crate::domain::{ListError, ListResult, Listable};
use crate::shared::SortOrder;

/// In-memory store for development and testing.
///
/// Records live in a keyed map; each query materializes the matching rows
/// once, so the returned window and total always agree with each other.
pub struct MemoryStore<T: Listable> {
    records: DashMap<T::Key, T>,
}

impl<T: Listable> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn insert(&self, record: T) {
        self.records.insert(record.key(), record);
    }

    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.records.get(key).map(|r| r.clone())
    }

    /// Apply a mutation to one record, bumping nothing else.
    pub fn update_with(&self, key: &T::Key, f: impl FnOnce(&mut T)) -> ListResult<()> {
        let mut entry = self.records.get_mut(key).ok_or_else(|| ListError::NotFound {
            entity: T::entity(),
            field: "id",
            value: format!("{key:?}"),
        })?;
        f(entry.value_mut());
        Ok(())
    }

    pub fn remove(&self, key: &T::Key) -> ListResult<T> {
        self.records
            .remove(key)
            .map(|(_, record)| record)
            .ok_or_else(|| ListError::NotFound {
                entity: T::entity(),
                field: "id",
                value: format!("{key:?}"),
            })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Listable> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_on_field<T: Listable>(a: &T, b: &T, field: &str) -> Ordering {
    match (a.field(field), b.field(field)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl<T: Listable> ListStore<T> for MemoryStore<T> {
    async fn find_and_count(&self, query: &StoreQuery) -> ListResult<(Vec<T>, u64)> {
        // Relations are embedded on the records themselves; the hints in
        // `query.relations` are accepted for interface parity.
        let mut matching: Vec<T> = self
            .records
            .iter()
            .filter(|entry| {
                query
                    .filters
                    .iter()
                    .all(|(field, value)| entry.value().matches(field, value))
            })
            .map(|entry| entry.value().clone())
            .collect();

        match &query.order {
            OrderBy::Field(field, order) => {
                matching.sort_by(|a, b| {
                    let cmp = compare_on_field(a, b, field);
                    let cmp = match order {
                        SortOrder::Asc => cmp,
                        SortOrder::Desc => cmp.reverse(),
                    };
                    // Key as secondary criterion keeps pagination stable.
                    cmp.then_with(|| a.key().cmp(&b.key()))
                });
            }
            OrderBy::LastModified => {
                matching.sort_by(|a, b| {
                    b.updated_at()
                        .cmp(&a.updated_at())
                        .then_with(|| b.key().cmp(&a.key()))
                });
            }
        }

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(query.skip as usize)
            .take(query.take as usize)
            .collect();

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Lesson, User, UserType};
    use crate::shared::FilterSet;
    use chrono::{Duration, Utc};

    fn lesson(id: u64, name: &str, course: &str, archived: bool) -> Lesson {
        let mut lesson = Lesson::new(id, name, course);
        lesson.archived = archived;
        lesson
    }

    fn query(filters: FilterSet, order: OrderBy, skip: u64, take: u64) -> StoreQuery {
        StoreQuery {
            filters,
            order,
            skip,
            take,
            relations: vec![],
        }
    }

    #[tokio::test]
    async fn window_and_total_come_from_one_snapshot() {
        let store = MemoryStore::new();
        for id in 1..=25 {
            store.insert(lesson(id, &format!("Lesson {id}"), "Rust", false));
        }

        let (items, total) = store
            .find_and_count(&query(FilterSet::new(), OrderBy::LastModified, 20, 10))
            .await
            .unwrap();
        assert_eq!(total, 25);
        assert_eq!(items.len(), 5);
    }

    #[tokio::test]
    async fn filters_are_a_conjunction() {
        let store = MemoryStore::new();
        store.insert(lesson(1, "Ownership", "Rust Basics", true));
        store.insert(lesson(2, "Borrowing", "Rust Basics", false));
        store.insert(lesson(3, "Ownership II", "Advanced Rust", true));

        let filters = FilterSet::new().with("archived", true).with("search", "ownership");
        let (items, total) = store
            .find_and_count(&query(filters, OrderBy::LastModified, 0, 10))
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|l| l.archived));
    }

    #[tokio::test]
    async fn default_order_is_last_modified_desc_with_key_tiebreak() {
        let store = MemoryStore::new();
        let stamp = Utc::now();
        for id in [3u64, 1, 2] {
            let mut l = lesson(id, &format!("Lesson {id}"), "Rust", false);
            l.created_at = stamp;
            l.updated_at = stamp;
            store.insert(l);
        }
        let mut newer = lesson(10, "Newest", "Rust", false);
        newer.updated_at = stamp + Duration::seconds(5);
        store.insert(newer);

        let (items, _) = store
            .find_and_count(&query(FilterSet::new(), OrderBy::LastModified, 0, 10))
            .await
            .unwrap();
        let ids: Vec<u64> = items.iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![10, 3, 2, 1]);
    }

    #[tokio::test]
    async fn explicit_sort_orders_by_field() {
        let store = MemoryStore::new();
        store.insert(User::new(1, "Cleo", "Zheng", "cleo@example.com", UserType::Member));
        store.insert(User::new(2, "Ada", "Lovelace", "ada@example.com", UserType::Admin));
        store.insert(User::new(3, "Bram", "Stoker", "bram@example.com", UserType::Editor));

        let order = OrderBy::Field("first_name".to_string(), SortOrder::Asc);
        let (items, _) = store
            .find_and_count(&query(FilterSet::new(), order, 0, 10))
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|u| u.first_name.as_str()).collect();
        assert_eq!(names, vec!["Ada", "Bram", "Cleo"]);
    }

    #[tokio::test]
    async fn update_and_remove_report_missing_records() {
        let store: MemoryStore<Lesson> = MemoryStore::new();
        store.insert(lesson(1, "Ownership", "Rust", false));

        store.update_with(&1, |l| l.archive("admin")).unwrap();
        assert!(store.get(&1).unwrap().archived);

        let err = store.update_with(&42, |_| {}).unwrap_err();
        assert!(matches!(err, ListError::NotFound { .. }));

        store.remove(&1).unwrap();
        assert!(store.is_empty());
        assert!(matches!(store.remove(&1), Err(ListError::NotFound { .. })));
    }
}
