use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bootstrap(pool: PgPool) {
    labelstack_db::health_check(&pool).await.unwrap();

    let statuses: Vec<String> =
        sqlx::query_scalar("SELECT name FROM job_statuses ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(statuses, vec!["pending", "running", "completed", "failed"]);
}
