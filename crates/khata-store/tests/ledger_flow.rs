//! End-to-end bookkeeping flows over the JSON file-backed store.

use std::sync::Arc;

use tempfile::TempDir;

use khata_core::{NewBill, NewParty, NewTransaction, Party, TransactionKind};
use khata_store::{JsonStore, Ledger};

fn create_test_ledger() -> (Ledger, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::open(dir.path()).unwrap();
    (Ledger::new(Arc::new(store)), dir)
}

fn reopen(dir: &TempDir) -> Ledger {
    Ledger::new(Arc::new(JsonStore::open(dir.path()).unwrap()))
}

fn create_party(ledger: &Ledger, name: &str) -> Party {
    ledger
        .create_party(
            None,
            NewParty {
                name: name.into(),
                ..NewParty::default()
            },
        )
        .unwrap()
}

fn entry(party: &Party, kind: TransactionKind, amount_paise: i64) -> NewTransaction {
    NewTransaction {
        party_id: party.id,
        kind,
        amount_paise,
        date: None,
        reference: None,
        notes: None,
    }
}

#[test]
fn balances_survive_reopen() {
    let (ledger, dir) = create_test_ledger();
    let party = create_party(&ledger, "Sharma Traders");

    ledger
        .create_transaction(Some("ramesh"), entry(&party, TransactionKind::Credit, 50_000))
        .unwrap();
    ledger
        .create_transaction(Some("ramesh"), entry(&party, TransactionKind::Deposit, 20_000))
        .unwrap();
    drop(ledger);

    let reopened = reopen(&dir);
    let party = reopened.get_party(party.id).unwrap().unwrap();
    assert_eq!(party.balance_paise, 30_000);
    assert_eq!(reopened.transactions_for_party(party.id).unwrap().len(), 2);
}

#[test]
fn upload_workflow_survives_reopen_with_links_intact() {
    let (ledger, dir) = create_test_ledger();
    let party = create_party(&ledger, "Verma Textiles");

    let upload = ledger
        .upload_bill(
            Some("ramesh"),
            NewBill {
                party_id: party.id,
                filename: "inv-042.pdf".into(),
                filepath: "uploads/inv-042.pdf".into(),
                reference: Some("INV-042".into()),
                amount_paise: Some(125_000),
                uploaded_at: None,
            },
        )
        .unwrap();
    let transaction = upload.transaction.expect("auto-created credit");
    drop(ledger);

    let reopened = reopen(&dir);
    let bill = reopened.get_bill(upload.bill.id).unwrap().unwrap();
    let tx = reopened.get_transaction(transaction.id).unwrap().unwrap();
    assert_eq!(bill.transaction_id, Some(tx.id));
    assert_eq!(tx.bill_id, Some(bill.id));
    assert_eq!(
        reopened.get_party(party.id).unwrap().unwrap().balance_paise,
        125_000
    );
    // The auto-created entry carries the bill's reference.
    assert_eq!(tx.reference.as_deref(), Some("INV-042"));
}

#[test]
fn audit_trail_is_replayed_newest_first() {
    let (ledger, dir) = create_test_ledger();
    let party = create_party(&ledger, "Gupta Hardware");
    ledger
        .create_transaction(None, entry(&party, TransactionKind::Credit, 500))
        .unwrap();
    ledger
        .create_transaction(None, entry(&party, TransactionKind::Deposit, 200))
        .unwrap();
    drop(ledger);

    let reopened = reopen(&dir);
    let activities = reopened.activities().unwrap();
    assert_eq!(activities.len(), 3);
    assert!(activities.windows(2).all(|w| w[0].at >= w[1].at));
    assert!(activities
        .last()
        .unwrap()
        .description
        .contains("Gupta Hardware"));
}

#[test]
fn recent_transactions_limit_spans_parties() {
    let (ledger, _dir) = create_test_ledger();
    let first = create_party(&ledger, "First");
    let second = create_party(&ledger, "Second");

    for amount in [100, 200, 300] {
        ledger
            .create_transaction(None, entry(&first, TransactionKind::Credit, amount))
            .unwrap();
        ledger
            .create_transaction(None, entry(&second, TransactionKind::Credit, amount))
            .unwrap();
    }

    let recent = ledger.recent_transactions(4).unwrap();
    assert_eq!(recent.len(), 4);
    assert!(recent.windows(2).all(|w| w[0].date >= w[1].date));
}

#[test]
fn ids_keep_advancing_across_restarts() {
    let (ledger, dir) = create_test_ledger();
    let party = create_party(&ledger, "First");
    ledger
        .create_transaction(None, entry(&party, TransactionKind::Credit, 100))
        .unwrap();
    drop(ledger);

    let reopened = reopen(&dir);
    let party2 = create_party(&reopened, "Second");
    let tx2 = reopened
        .create_transaction(None, entry(&party2, TransactionKind::Credit, 100))
        .unwrap();
    assert_eq!(party2.id.value(), party.id.value() + 1);
    assert_eq!(tx2.id.value(), 2);
}
