use std::sync::Arc;

use chrono::NaiveDate;

use checkouts::engine::{CheckoutError, InvariantViolation, SortColumn, SortDirection};
use checkouts::form::{Field, FormMode, OwnerField};
use checkouts::model::{parse_day, Checkout};
use checkouts::service::{InMemoryReservationService, ReservationService};
use checkouts::session::{BrowsingSession, Confirmation, SaveOutcome, Severity};

// ── Test infrastructure ──────────────────────────────────────

fn day(text: &str) -> NaiveDate {
    parse_day(text).unwrap()
}

async fn start_session(today: &str) -> (BrowsingSession, Arc<InMemoryReservationService>) {
    let svc = Arc::new(InMemoryReservationService::seeded());
    let mut session = BrowsingSession::new(svc.clone(), day(today));
    session.load_all().await.unwrap();
    (session, svc)
}

fn codes(rows: &[Checkout]) -> Vec<&str> {
    rows.iter().map(|c| c.client_code.as_str()).collect()
}

fn fill_new_checkout(session: &mut BrowsingSession, code: &str) {
    let form = session.editor_mut().unwrap();
    form.input(Field::Server, "UX04");
    form.input(Field::ClientCode, code);
    form.input(Field::StartDate, "07/01/2018");
    form.input(Field::EndDate, "07/15/2018");
    form.input(Field::Jira, "HEK-900");
    form.owner_input(0, OwnerField::FirstName, "Grace");
    form.owner_input(0, OwnerField::LastName, "Hopper");
    form.owner_input(0, OwnerField::Email, "grace@navy.mil");
    form.set_owner_primary(0, true);
}

// ── Browsing ─────────────────────────────────────────────────

#[tokio::test]
async fn search_by_owner_department() {
    let (mut session, _) = start_session("05/15/2018").await;
    session.set_filter("xrp");
    assert_eq!(codes(session.visible()), vec!["FM"]);
    assert!(session.is_checked_out(&session.visible()[0]));
}

#[tokio::test]
async fn status_column_follows_today() {
    let (mut session, _) = start_session("06/15/2018").await;
    assert_eq!(session.sort(SortColumn::Status), SortDirection::Ascending);
    assert_eq!(codes(session.visible()), vec!["FM", "SX", "CK", "WR", "GN", "GX"]);
    assert_eq!(session.sort(SortColumn::Status), SortDirection::Descending);
    assert_eq!(codes(session.visible()), vec!["CK", "WR", "GN", "GX", "FM", "SX"]);
    assert_eq!(session.sort(SortColumn::Jira), SortDirection::Ascending);
}

#[tokio::test]
async fn server_selection_scopes_the_collection() {
    let (mut session, svc) = start_session("05/15/2018").await;
    let mut moved = svc.fetch(2).await.unwrap();
    moved.server = "QXA".into();
    svc.update(moved).await.unwrap();

    session.select_server("QXA").await.unwrap();
    assert_eq!(codes(session.checkouts()), vec!["CK"]);
    session.load_all().await.unwrap();
    assert_eq!(session.checkouts().len(), 6);
}

// ── Editing ──────────────────────────────────────────────────

#[tokio::test]
async fn create_then_find_it() {
    let (mut session, svc) = start_session("07/04/2018").await;
    session.open("0").await.unwrap();
    assert_eq!(session.editor().unwrap().mode(), FormMode::Add);
    fill_new_checkout(&mut session, "NAVY");

    let outcome = session.save().await.unwrap();
    let SaveOutcome::Created(saved) = outcome else {
        panic!("expected create, got {outcome:?}");
    };
    assert_eq!(saved.start_date.as_deref(), Some("7/1/2018"));
    assert_eq!(saved.owners[0].checkout_id, saved.id);
    assert_eq!(svc.len(), 7);

    session.set_filter("hopper");
    assert_eq!(codes(session.visible()), vec!["NAVY"]);
    assert!(session.is_checked_out(&session.visible()[0]));

    let notes = session.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Success);
    assert_eq!(notes[0].detail, "New Checkout Record Added!");
}

#[tokio::test]
async fn edit_existing_checkout() {
    let (mut session, svc) = start_session("05/15/2018").await;
    session.open("4").await.unwrap();
    assert_eq!(session.editor().unwrap().mode(), FormMode::Display);
    assert!(session.begin_edit());
    let form = session.editor_mut().unwrap();
    form.input(Field::EndDate, "2018-06-30");
    form.toggle_owner_alert(1);

    let outcome = session.save().await.unwrap();
    assert!(matches!(outcome, SaveOutcome::Updated(_)));
    let stored = svc.fetch(4).await.unwrap();
    assert_eq!(stored.end_date.as_deref(), Some("6/30/2018"));
    assert_eq!(stored.start_date.as_deref(), Some("5/1/2018"));
    assert!(stored.owners[1].alert);
    assert_eq!(svc.len(), 6);
}

#[tokio::test]
async fn rejected_saves_send_nothing() {
    let (mut session, svc) = start_session("05/15/2018").await;
    session.open("0").await.unwrap();
    fill_new_checkout(&mut session, "NAVY");
    session.editor_mut().unwrap().input(Field::EndDate, "06/01/2018");

    let Err(CheckoutError::Validation(errors)) = session.save().await else {
        panic!("expected validation failure");
    };
    assert!(errors.iter().any(|e| e.field == "dateRangeGroup"));

    let form = session.editor_mut().unwrap();
    form.input(Field::EndDate, "07/31/2018");
    form.set_owner_primary(0, false);
    assert_eq!(
        session.save().await,
        Err(CheckoutError::Invariant(InvariantViolation::PrimaryOwnerCount(0)))
    );
    assert_eq!(svc.len(), 6);
    assert!(session.editor().is_some());
}

#[tokio::test]
async fn permanent_checkout_never_expires() {
    let (mut session, svc) = start_session("05/15/2018").await;
    session.open("0").await.unwrap();
    fill_new_checkout(&mut session, "PERM");
    session.editor_mut().unwrap().set_permanent(true);
    let Ok(SaveOutcome::Created(saved)) = session.save().await else {
        panic!("expected create");
    };
    assert!(saved.permanent);
    assert_eq!(saved.start_date, None);

    let stored = svc.fetch(saved.id).await.unwrap();
    let mut later = BrowsingSession::new(svc.clone(), day("12/31/2030"));
    later.load_all().await.unwrap();
    assert!(later.is_checked_out(&stored));
}

#[tokio::test]
async fn delete_needs_confirmation() {
    let (mut session, svc) = start_session("05/15/2018").await;
    session.open("5").await.unwrap();
    let confirmation = session.request_delete().unwrap();
    assert_eq!(confirmation, Confirmation::Delete(5));

    session.dismiss();
    session.confirm(confirmation).await.unwrap();
    assert_eq!(svc.len(), 6);

    session.request_delete().unwrap();
    session.confirm(confirmation).await.unwrap();
    assert_eq!(svc.len(), 5);
    assert!(!codes(session.checkouts()).contains(&"GN"));
    assert_eq!(
        session.take_notifications().last().map(|n| n.detail.clone()),
        Some("Checkout Record has succesfully been removed!".to_string())
    );
}

#[tokio::test]
async fn concurrent_edits_last_write_wins() {
    let svc = Arc::new(InMemoryReservationService::seeded());
    let mut alice = BrowsingSession::new(svc.clone(), day("05/15/2018"));
    let mut bob = BrowsingSession::new(svc.clone(), day("05/15/2018"));
    for (session, note) in [(&mut alice, "alice"), (&mut bob, "bob")] {
        session.open("1").await.unwrap();
        session.begin_edit();
        session.editor_mut().unwrap().input(Field::Notes, note);
    }

    let (a, b) = futures::future::join(alice.save(), bob.save()).await;
    assert!(matches!(a, Ok(SaveOutcome::Updated(_))));
    assert!(matches!(b, Ok(SaveOutcome::Updated(_))));

    let stored = svc.fetch(1).await.unwrap();
    assert!(stored.notes == "alice" || stored.notes == "bob");
    assert_eq!(svc.len(), 6);
}
