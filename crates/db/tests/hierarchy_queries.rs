//! Integration tests for the business process repositories.
//!
//! Runs every query against a real database seeded per test:
//! - Top-level listing and ordering
//! - Detection and deletion of parent links on top-level children
//! - Orphan and multiple-parent detection
//! - Edge ordering for tree rendering

use bpaudit_core::hierarchy::TOP_LEVEL;
use bpaudit_db::repositories::{BusinessProcessRepo, ProcessRelationshipRepo};
use sqlx::{PgConnection, PgPool};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_process(conn: &mut PgConnection, name: &str, level: &str) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO business_processes (business_process, level, status)
         VALUES ($1, $2, 'active')
         RETURNING id",
    )
    .bind(name)
    .bind(level)
    .fetch_one(conn)
    .await
    .unwrap()
}

async fn link(conn: &mut PgConnection, parent: i32, child: i32, seq: i32) {
    sqlx::query(
        "INSERT INTO business_process_relationships
            (parent_process_id, child_process_id, sequence_number)
         VALUES ($1, $2, $3)",
    )
    .bind(parent)
    .bind(child)
    .bind(seq)
    .execute(conn)
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    bpaudit_db::health_check(&mut conn).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_level_orders_by_name(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    insert_process(&mut conn, "Sell", "A").await;
    insert_process(&mut conn, "Buy", "A").await;
    insert_process(&mut conn, "Invoice", "B").await;

    let top = BusinessProcessRepo::list_by_level(&mut conn, TOP_LEVEL)
        .await
        .unwrap();

    let names: Vec<&str> = top.iter().map(|p| p.business_process.as_str()).collect();
    assert_eq!(names, vec!["Buy", "Sell"]);
    assert!(top.iter().all(|p| p.level == "A" && p.status == "active"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_top_level_child_link_detected_and_deleted(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let sell = insert_process(&mut conn, "Sell", "A").await;
    let corp = insert_process(&mut conn, "Corp", "A").await;
    let invoice = insert_process(&mut conn, "Invoice", "B").await;
    link(&mut conn, corp, sell, 1).await;
    link(&mut conn, sell, invoice, 1).await;

    let invalid = ProcessRelationshipRepo::list_with_child_level(&mut conn, TOP_LEVEL)
        .await
        .unwrap();
    assert_eq!(invalid.len(), 1);
    assert_eq!(invalid[0].child_id, sell);
    assert_eq!(invalid[0].child_name, "Sell");
    assert_eq!(invalid[0].parent_id, corp);
    assert_eq!(invalid[0].parent_name, "Corp");
    assert_eq!(invalid[0].parent_level, "A");

    let removed = ProcessRelationshipRepo::delete_link(&mut conn, sell, corp)
        .await
        .unwrap();
    assert_eq!(removed, 1);

    let remaining = ProcessRelationshipRepo::list_by_child(&mut conn, sell)
        .await
        .unwrap();
    assert!(remaining.is_empty());

    // The B-level link is untouched.
    let kept = ProcessRelationshipRepo::list_by_child(&mut conn, invoice)
        .await
        .unwrap();
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].parent_process_id, sell);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_link_missing_pair_removes_nothing(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let a = insert_process(&mut conn, "Sell", "A").await;
    let b = insert_process(&mut conn, "Quote", "B").await;
    link(&mut conn, a, b, 1).await;

    let removed = ProcessRelationshipRepo::delete_link(&mut conn, a, b)
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_orphans_exclude_top_level_and_linked(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let sell = insert_process(&mut conn, "Sell", "A").await;
    let quote = insert_process(&mut conn, "Quote", "B").await;
    let invoice = insert_process(&mut conn, "Invoice", "B").await;
    let print = insert_process(&mut conn, "Print", "C").await;
    link(&mut conn, sell, quote, 1).await;

    let orphans = BusinessProcessRepo::list_orphans(&mut conn, TOP_LEVEL)
        .await
        .unwrap();

    let ids: Vec<i32> = orphans.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![invoice, print]);
    assert!(orphans.iter().all(|p| p.level != "A"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_multiple_parents_counted_by_distinct_parent(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let sell = insert_process(&mut conn, "Sell", "A").await;
    let buy = insert_process(&mut conn, "Buy", "A").await;
    let quote = insert_process(&mut conn, "Quote", "B").await;
    let invoice = insert_process(&mut conn, "Invoice", "B").await;
    link(&mut conn, sell, quote, 1).await;
    link(&mut conn, buy, quote, 1).await;
    link(&mut conn, sell, invoice, 2).await;
    link(&mut conn, sell, invoice, 3).await;

    let multi = BusinessProcessRepo::list_with_multiple_parents(&mut conn, TOP_LEVEL)
        .await
        .unwrap();

    assert_eq!(multi.len(), 1);
    assert_eq!(multi[0].id, quote);
    assert_eq!(multi[0].parent_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_edges_ordered_by_parent_then_sequence(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let sell = insert_process(&mut conn, "Sell", "A").await;
    let buy = insert_process(&mut conn, "Buy", "A").await;
    let y = insert_process(&mut conn, "Y", "B").await;
    let x = insert_process(&mut conn, "X", "B").await;
    let z = insert_process(&mut conn, "Z", "B").await;
    link(&mut conn, sell, y, 2).await;
    link(&mut conn, sell, x, 1).await;
    link(&mut conn, buy, z, 1).await;

    let edges = ProcessRelationshipRepo::list_edges(&mut conn).await.unwrap();

    let order: Vec<(&str, &str, i32)> = edges
        .iter()
        .map(|e| (e.parent_name.as_str(), e.child_name.as_str(), e.sequence_number))
        .collect();
    assert_eq!(order, vec![("Buy", "Z", 1), ("Sell", "X", 1), ("Sell", "Y", 2)]);
}
