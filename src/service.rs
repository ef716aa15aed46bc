//! Reservation backing-store contract and an in-memory implementation.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::engine::BackendError;
use crate::model::{Checkout, CheckoutId};
use crate::seed;

/// CRUD over the store of checkouts. Every failure is a [`BackendError`];
/// callers surface it without retrying.
#[async_trait]
pub trait ReservationService: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Checkout>, BackendError>;

    async fn list_by_server(&self, server: &str) -> Result<Vec<Checkout>, BackendError>;

    async fn fetch(&self, id: CheckoutId) -> Result<Checkout, BackendError>;

    /// Store a new checkout. The store assigns the id.
    async fn create(&self, checkout: Checkout) -> Result<Checkout, BackendError>;

    async fn update(&self, checkout: Checkout) -> Result<Checkout, BackendError>;

    async fn delete(&self, id: CheckoutId) -> Result<(), BackendError>;

    /// Look a checkout up by its route id. `"0"` yields a fresh unsaved
    /// checkout without touching the store.
    async fn get_by_id(&self, id: &str) -> Result<Checkout, BackendError> {
        if id == "0" {
            return Ok(Checkout::unsaved());
        }
        let id: CheckoutId = id
            .trim()
            .parse()
            .map_err(|_| BackendError::new(format!("invalid checkout id: {id}")))?;
        self.fetch(id).await
    }

    /// Create when unsaved, update otherwise.
    async fn save(&self, checkout: Checkout) -> Result<Checkout, BackendError> {
        if checkout.is_unsaved() {
            self.create(checkout).await
        } else {
            self.update(checkout).await
        }
    }
}

fn log_json<T: serde::Serialize>(op: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => debug!("{op}: {json}"),
        Err(e) => debug!("{op}: <unserializable: {e}>"),
    }
}

/// Checkouts held in a concurrent map. Ids are handed out from a counter
/// that starts above the highest id it was seeded with.
pub struct InMemoryReservationService {
    checkouts: DashMap<CheckoutId, Checkout>,
    next_id: AtomicI64,
    next_owner_id: AtomicI64,
}

impl Default for InMemoryReservationService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryReservationService {
    pub fn new() -> Self {
        Self::with_checkouts(Vec::new())
    }

    /// Store preloaded with [`seed::demo_checkouts`].
    pub fn seeded() -> Self {
        Self::with_checkouts(seed::demo_checkouts())
    }

    pub fn with_checkouts(checkouts: Vec<Checkout>) -> Self {
        let max_id = checkouts.iter().map(|c| c.id).max().unwrap_or(0);
        let max_owner_id = checkouts
            .iter()
            .flat_map(|c| c.owners.iter().map(|o| o.id))
            .max()
            .unwrap_or(0);
        let map = DashMap::new();
        for c in checkouts {
            map.insert(c.id, c);
        }
        Self {
            checkouts: map,
            next_id: AtomicI64::new(max_id + 1),
            next_owner_id: AtomicI64::new(max_owner_id + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.checkouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkouts.is_empty()
    }

    fn sorted(&self, keep: impl Fn(&Checkout) -> bool) -> Vec<Checkout> {
        let mut out: Vec<Checkout> = self
            .checkouts
            .iter()
            .filter(|e| keep(e.value()))
            .map(|e| e.value().clone())
            .collect();
        out.sort_by_key(|c| c.id);
        out
    }

    /// Point owners at their checkout and give unsaved owners an id.
    fn stamp_owners(&self, checkout: &mut Checkout) {
        for owner in &mut checkout.owners {
            owner.checkout_id = checkout.id;
            if owner.id == 0 {
                owner.id = self.next_owner_id.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[async_trait]
impl ReservationService for InMemoryReservationService {
    async fn list_all(&self) -> Result<Vec<Checkout>, BackendError> {
        let all = self.sorted(|_| true);
        log_json("list_all", &all);
        Ok(all)
    }

    async fn list_by_server(&self, server: &str) -> Result<Vec<Checkout>, BackendError> {
        let hits = self.sorted(|c| c.server.eq_ignore_ascii_case(server));
        log_json("list_by_server", &hits);
        Ok(hits)
    }

    async fn fetch(&self, id: CheckoutId) -> Result<Checkout, BackendError> {
        let found = self
            .checkouts
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or_else(|| BackendError::new(format!("checkout {id} not found")))?;
        log_json("fetch", &found);
        Ok(found)
    }

    async fn create(&self, mut checkout: Checkout) -> Result<Checkout, BackendError> {
        if !checkout.is_unsaved() {
            return Err(BackendError::new(format!(
                "checkout {} already has an id",
                checkout.id
            )));
        }
        checkout.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.stamp_owners(&mut checkout);
        self.checkouts.insert(checkout.id, checkout.clone());
        log_json("create", &checkout);
        Ok(checkout)
    }

    async fn update(&self, mut checkout: Checkout) -> Result<Checkout, BackendError> {
        let Some(mut slot) = self.checkouts.get_mut(&checkout.id) else {
            return Err(BackendError::new(format!("checkout {} not found", checkout.id)));
        };
        self.stamp_owners(&mut checkout);
        *slot = checkout.clone();
        drop(slot);
        log_json("update", &checkout);
        Ok(checkout)
    }

    async fn delete(&self, id: CheckoutId) -> Result<(), BackendError> {
        self.checkouts
            .remove(&id)
            .map(|_| debug!("delete: {id}"))
            .ok_or_else(|| BackendError::new(format!("checkout {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Owner;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let svc = InMemoryReservationService::seeded();
        let all = svc.list_all().await.unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn list_by_server_filters() {
        let svc = InMemoryReservationService::seeded();
        assert_eq!(svc.list_by_server("UX04").await.unwrap().len(), 6);
        assert_eq!(svc.list_by_server("ux04").await.unwrap().len(), 6);
        assert!(svc.list_by_server("QXA").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_zero_is_local() {
        let svc = InMemoryReservationService::new();
        let c = svc.get_by_id("0").await.unwrap();
        assert_eq!(c, Checkout::unsaved());
        assert!(svc.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_parses_and_fetches() {
        let svc = InMemoryReservationService::seeded();
        let c = assert_ok!(svc.get_by_id("3").await);
        assert_eq!(c.client_code, "WR");
        assert_err!(svc.get_by_id("abc").await);
        let e = svc.get_by_id("99").await.unwrap_err();
        assert_eq!(e.message, "checkout 99 not found");
    }

    #[tokio::test]
    async fn save_dispatches_create_and_update() {
        let svc = InMemoryReservationService::seeded();
        let new = Checkout {
            client_code: "NEW".into(),
            owners: vec![Owner {
                primary: true,
                ..Owner::default()
            }],
            ..Checkout::unsaved()
        };
        let created = svc.save(new).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(created.owners[0].id, 13);
        assert_eq!(created.owners[0].checkout_id, 7);
        assert_eq!(svc.len(), 7);

        let mut edited = created.clone();
        edited.notes = "changed".into();
        let updated = svc.save(edited).await.unwrap();
        assert_eq!(updated.id, 7);
        assert_eq!(svc.fetch(7).await.unwrap().notes, "changed");
        assert_eq!(svc.len(), 7);
    }

    #[tokio::test]
    async fn update_unknown_id_fails() {
        let svc = InMemoryReservationService::new();
        let ghost = Checkout {
            id: 42,
            ..Checkout::unsaved()
        };
        assert_err!(svc.update(ghost).await);
        assert!(svc.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_existing_id() {
        let svc = InMemoryReservationService::new();
        let c = Checkout {
            id: 5,
            ..Checkout::unsaved()
        };
        assert_err!(svc.create(c).await);
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let svc = InMemoryReservationService::seeded();
        assert_ok!(svc.delete(2).await);
        assert_err!(svc.fetch(2).await);
        assert_err!(svc.delete(2).await);
        assert_eq!(svc.len(), 5);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let svc = InMemoryReservationService::seeded();
        svc.delete(6).await.unwrap();
        let created = svc.save(Checkout::unsaved()).await.unwrap();
        assert_eq!(created.id, 7);
    }
}
