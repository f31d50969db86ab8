use sqlx::PgPool;

use nps_db::repositories::RoleRepo;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    nps_db::health_check(&pool).await.unwrap();

    for table in ["roles", "users", "contact_messages", "news_articles", "projects"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 >= 0);
    }
}

/// The three roles are seeded in a fixed order.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_seeded(pool: PgPool) {
    let names: Vec<String> = RoleRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["admin", "editor", "user"]);

    let admin = RoleRepo::find_by_name(&pool, "admin").await.unwrap().unwrap();
    assert_eq!(RoleRepo::resolve_name(&pool, admin.id).await.unwrap(), "admin");
    assert_eq!(RoleRepo::resolve_name(&pool, 9999).await.unwrap(), "unknown");
}

/// Indexes backing the listing filters exist.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filter_indexes_exist(pool: PgPool) {
    let indexes: Vec<(String,)> =
        sqlx::query_as("SELECT indexname::TEXT FROM pg_indexes WHERE schemaname = 'public'")
            .fetch_all(&pool)
            .await
            .unwrap();
    let names: Vec<&str> = indexes.iter().map(|(n,)| n.as_str()).collect();
    for expected in [
        "idx_contact_messages_created_at",
        "idx_contact_messages_is_read",
        "idx_news_articles_published_date",
        "idx_news_articles_is_published",
        "idx_projects_is_active",
    ] {
        assert!(names.contains(&expected), "missing index {expected}");
    }
}
