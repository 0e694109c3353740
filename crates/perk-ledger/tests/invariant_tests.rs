use perk_ledger::{LedgerEngine, MemoryStorage};
use perk_types::{CallerId, Category, LedgerError, TokenAmount};
use std::sync::Arc;

fn caller(byte: u8) -> CallerId {
    CallerId::from_bytes([byte; 32])
}

async fn engine_with_admin() -> (Arc<LedgerEngine>, CallerId) {
    let engine = Arc::new(LedgerEngine::new(Arc::new(MemoryStorage::new())));
    let admin = caller(1);
    engine.bootstrap_admin(admin).await;
    (engine, admin)
}

/// The credit attributable to one (task, user) pair is applied exactly once
/// no matter how approvals are sequenced.
#[tokio::test]
async fn test_exactly_once_credit_sequential() {
    let (engine, admin) = engine_with_admin().await;
    let user = caller(2);
    engine.profiles.register(user, "alice").await.unwrap();

    let task = engine
        .tasks
        .add(admin, "Buy coffee", "Beans", TokenAmount::from_units(10), Category::Coffee)
        .await
        .unwrap();
    engine.completions.submit(user, task.id).await.unwrap();

    engine.completions.approve(admin, task.id, user).await.unwrap();
    for _ in 0..5 {
        let result = engine.completions.approve(admin, task.id, user).await;
        assert!(matches!(result, Err(LedgerError::AlreadyApproved { .. })));
    }

    assert_eq!(
        engine.profiles.balance_of(user).await.unwrap(),
        TokenAmount::from_units(10)
    );
}

/// Racing approvals of the same pair: exactly one wins, the rest resolve to
/// `AlreadyApproved`, and the credit lands once.
#[tokio::test]
async fn test_exactly_once_credit_concurrent() {
    let (engine, admin) = engine_with_admin().await;
    let user = caller(2);
    engine.profiles.register(user, "alice").await.unwrap();

    let task = engine
        .tasks
        .add(admin, "Buy coffee", "Beans", TokenAmount::from_units(10), Category::Coffee)
        .await
        .unwrap();
    let task_id = task.id;
    engine.completions.submit(user, task_id).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.completions.approve(admin, task_id, user).await
        }));
    }

    let mut ok = 0;
    let mut already = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(LedgerError::AlreadyApproved { .. }) => already += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(ok, 1);
    assert_eq!(already, 9);
    assert_eq!(
        engine.profiles.balance_of(user).await.unwrap(),
        TokenAmount::from_units(10)
    );
}

/// Concurrent approvals of different tasks crediting the same identity must
/// not lose an update: the final balance is the sum of all rewards.
#[tokio::test]
async fn test_no_lost_credit_across_tasks() {
    let (engine, admin) = engine_with_admin().await;
    let user = caller(2);
    engine.profiles.register(user, "alice").await.unwrap();

    let mut expected = 0u64;
    let mut task_ids = Vec::new();
    for i in 1..=20u64 {
        let task = engine
            .tasks
            .add(
                admin,
                &format!("Task {}", i),
                "desc",
                TokenAmount::from_units(i),
                Category::Snacks,
            )
            .await
            .unwrap();
        engine.completions.submit(user, task.id).await.unwrap();
        expected += i;
        task_ids.push(task.id);
    }

    let mut handles = Vec::new();
    for task_id in task_ids {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.completions.approve(admin, task_id, user).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        engine.profiles.balance_of(user).await.unwrap(),
        TokenAmount::from_units(expected)
    );
}

/// Task ids stay unique and monotonic under concurrent creation.
#[tokio::test]
async fn test_unique_ids_under_concurrent_adds() {
    let (engine, admin) = engine_with_admin().await;

    let mut handles = Vec::new();
    for i in 0..50 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine
                .tasks
                .add(
                    admin,
                    &format!("Task {}", i),
                    "desc",
                    TokenAmount::from_units(1),
                    Category::Meals,
                )
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap().id);
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 50);

    // All 50 are listed, in ascending id order
    let listed = engine.tasks.list_available().await;
    assert_eq!(listed.len(), 50);
    assert!(listed.windows(2).all(|w| w[0].id < w[1].id));
}

/// Racing duplicate submissions of one pair: only one pending record lands.
#[tokio::test]
async fn test_single_pending_under_concurrent_submits() {
    let (engine, admin) = engine_with_admin().await;
    let user = caller(2);
    engine.profiles.register(user, "alice").await.unwrap();

    let task = engine
        .tasks
        .add(admin, "Buy tea", "Green", TokenAmount::from_units(5), Category::Tea)
        .await
        .unwrap();
    let task_id = task.id;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.completions.submit(user, task_id).await
        }));
    }

    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(LedgerError::AlreadySubmitted { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(engine.completions.list_for(user).await.len(), 1);
}

/// Balances only ever grow, and only through approval: a recorded withdrawal
/// changes nothing.
#[tokio::test]
async fn test_balance_never_decreases() {
    let (engine, admin) = engine_with_admin().await;
    let user = caller(2);
    engine.profiles.register(user, "alice").await.unwrap();

    let task = engine
        .tasks
        .add(admin, "Lunch run", "Pho", TokenAmount::from_units(15), Category::Meals)
        .await
        .unwrap();
    engine.completions.submit(user, task.id).await.unwrap();
    engine.completions.approve(admin, task.id, user).await.unwrap();

    engine
        .withdrawals
        .request(user, TokenAmount::from_units(15))
        .await
        .unwrap();
    engine
        .withdrawals
        .request(user, TokenAmount::from_units(1))
        .await
        .unwrap();

    assert_eq!(
        engine.profiles.balance_of(user).await.unwrap(),
        TokenAmount::from_units(15)
    );
}
