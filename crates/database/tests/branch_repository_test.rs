mod common;

use core_types::{BankUpdate, BranchChanges, NewBank, NewBranch};
use database::{BankRepository, BranchRepository, DbError};

struct Fixture {
    banks: BankRepository,
    branches: BranchRepository,
}

async fn fixture() -> Fixture {
    let pool = common::test_pool().await;
    let banks = BankRepository::new(pool.clone());
    banks
        .create(&NewBank {
            id: 1,
            name: "Alpha".to_string(),
        })
        .await
        .unwrap();
    banks
        .create(&NewBank {
            id: 2,
            name: "Omega".to_string(),
        })
        .await
        .unwrap();
    Fixture {
        banks,
        branches: BranchRepository::new(pool),
    }
}

fn new_branch(ifsc: &str, bank_id: i64, city: &str) -> NewBranch {
    NewBranch {
        ifsc: ifsc.to_string(),
        bank_id,
        branch: format!("{ifsc} branch"),
        address: "1 High Street".to_string(),
        city: city.to_string(),
        district: "D".to_string(),
        state: "S".to_string(),
    }
}

#[tokio::test]
async fn create_resolves_bank_name() {
    let fx = fixture().await;

    let created = fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();
    assert_eq!(created.ifsc, "AAA0001");
    assert_eq!(created.bank_id, 1);
    assert_eq!(created.bank_name, "Alpha");
    assert_eq!(created.branch, "AAA0001 branch");
    assert_eq!(fx.branches.get("AAA0001").await.unwrap(), created);
}

#[tokio::test]
async fn duplicate_ifsc_is_a_conflict() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();

    let err = fx.branches.create(&new_branch("AAA0001", 2, "Y")).await.unwrap_err();
    assert!(
        matches!(&err, DbError::Conflict(msg) if msg == "Branch with IFSC AAA0001 already exists"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn unknown_bank_is_an_invalid_reference_on_create() {
    let fx = fixture().await;

    let err = fx.branches.create(&new_branch("NEW0001", 99, "X")).await.unwrap_err();
    assert!(
        matches!(&err, DbError::InvalidReference(msg) if msg == "Bank with ID 99 does not exist"),
        "unexpected error: {err:?}"
    );
    assert!(matches!(fx.branches.get("NEW0001").await, Err(DbError::NotFound(_))));
}

#[tokio::test]
async fn update_reflects_every_field_and_the_new_bank_name() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();

    let changes = BranchChanges {
        bank_id: 2,
        branch: "Harbour".to_string(),
        address: "9 Quay".to_string(),
        city: "Y".to_string(),
        district: "E".to_string(),
        state: "T".to_string(),
    };
    let updated = fx.branches.update("AAA0001", &changes).await.unwrap();
    assert_eq!(updated.bank_name, "Omega");

    let fetched = fx.branches.get("AAA0001").await.unwrap();
    assert_eq!(fetched.ifsc, "AAA0001");
    assert_eq!(fetched.bank_id, 2);
    assert_eq!(fetched.bank_name, "Omega");
    assert_eq!(fetched.branch, "Harbour");
    assert_eq!(fetched.address, "9 Quay");
    assert_eq!(fetched.city, "Y");
    assert_eq!(fetched.district, "E");
    assert_eq!(fetched.state, "T");
}

#[tokio::test]
async fn update_checks_branch_then_bank() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();

    let mut changes = new_branch("AAA0001", 1, "X").changes();
    assert!(matches!(
        fx.branches.update("ZZZ9999", &changes).await,
        Err(DbError::NotFound(_))
    ));

    changes.bank_id = 99;
    assert!(matches!(
        fx.branches.update("AAA0001", &changes).await,
        Err(DbError::InvalidReference(_))
    ));
    assert_eq!(fx.branches.get("AAA0001").await.unwrap().bank_id, 1);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();

    fx.branches.delete("AAA0001").await.unwrap();
    assert!(matches!(fx.branches.get("AAA0001").await, Err(DbError::NotFound(_))));
    assert!(matches!(fx.branches.delete("AAA0001").await, Err(DbError::NotFound(_))));
}

#[tokio::test]
async fn bank_name_is_read_through_the_join() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();
    assert_eq!(fx.branches.get("AAA0001").await.unwrap().bank_name, "Alpha");

    fx.banks
        .update(
            1,
            &BankUpdate {
                name: "Beta".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(fx.branches.get("AAA0001").await.unwrap().bank_name, "Beta");
    assert_eq!(fx.branches.list().await.unwrap()[0].bank_name, "Beta");
}

#[tokio::test]
async fn city_filter_matches_both_predicates_exactly() {
    let fx = fixture().await;
    fx.branches.create(&new_branch("AAA0002", 1, "X")).await.unwrap();
    fx.branches.create(&new_branch("AAA0001", 1, "X")).await.unwrap();
    fx.branches.create(&new_branch("AAA0003", 1, "Y")).await.unwrap();
    fx.branches.create(&new_branch("OOO0001", 2, "X")).await.unwrap();
    fx.branches.create(&new_branch("AAA0004", 1, "x")).await.unwrap();

    let rows = fx.branches.list_by_city_and_bank("X", 1).await.unwrap();
    let ifscs: Vec<&str> = rows.iter().map(|r| r.ifsc.as_str()).collect();
    assert_eq!(ifscs, vec!["AAA0001", "AAA0002"]);
    assert!(rows.iter().all(|r| r.city == "X" && r.bank_name == "Alpha"));
}

#[tokio::test]
async fn empty_city_filter_is_not_found_while_empty_list_is_ok() {
    let fx = fixture().await;

    assert!(fx.branches.list().await.unwrap().is_empty());
    let err = fx.branches.list_by_city_and_bank("Nowhere", 1).await.unwrap_err();
    assert!(
        matches!(&err, DbError::NotFound(msg) if msg == "No branches found for the given city and bank ID"),
        "unexpected error: {err:?}"
    );
}
