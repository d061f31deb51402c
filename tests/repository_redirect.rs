use redirecter::domain::entities::{NewRedirect, Redirect};
use redirecter::domain::repositories::RedirectRepository;
use redirecter::error::LoadError;
use redirecter::infrastructure::persistence::PgRedirectRepository;
use sqlx::PgPool;
use sqlx::postgres::PgConnectOptions;

async fn insert_row(pool: &PgPool, domain: Option<&str>, source: &str, destination: &str) {
    sqlx::query("INSERT INTO redirects (domain, src_path, dest_path) VALUES ($1, $2, $3)")
        .bind(domain)
        .bind(source)
        .bind(destination)
        .execute(pool)
        .await
        .unwrap();
}

fn repository(pool: &PgPool, domain: Option<&str>) -> PgRedirectRepository {
    PgRedirectRepository::with_connect_options(
        (*pool.connect_options()).clone(),
        domain.map(str::to_owned),
    )
}

#[sqlx::test]
async fn test_load_all_returns_every_row(pool: PgPool) {
    insert_row(&pool, None, "/old-page", "/new-page").await;
    insert_row(&pool, None, "/blog/2019/post", "https://blog.example.com/post").await;

    let rows = repository(&pool, None).load_all().await.unwrap();

    assert_eq!(
        rows,
        vec![
            Redirect::new("/old-page", "/new-page"),
            Redirect::new("/blog/2019/post", "https://blog.example.com/post"),
        ]
    );
}

#[sqlx::test]
async fn test_load_all_on_empty_table(pool: PgPool) {
    let rows = repository(&pool, None).load_all().await.unwrap();

    assert!(rows.is_empty());
}

#[sqlx::test]
async fn test_domain_scope_filters_rows(pool: PgPool) {
    insert_row(&pool, Some("example.com"), "/promo", "/com-promo").await;
    insert_row(&pool, Some("example.org"), "/promo", "/org-promo").await;
    insert_row(&pool, None, "/unscoped", "/anywhere").await;

    let scoped = repository(&pool, Some("example.com")).load_all().await.unwrap();
    assert_eq!(scoped, vec![Redirect::new("/promo", "/com-promo")]);

    let unscoped = repository(&pool, None).load_all().await.unwrap();
    assert_eq!(unscoped.len(), 3);
}

#[sqlx::test]
async fn test_domain_scope_ignores_case(pool: PgPool) {
    insert_row(&pool, Some("Example.com"), "/blog/x", "/articles/x").await;

    let repo = repository(&pool, Some("EXAMPLE.com"));
    let rows = repo.load_all().await.unwrap();
    assert_eq!(rows, vec![Redirect::new("/blog/x", "/articles/x")]);

    repo.insert(&NewRedirect {
        domain: Some("Example.COM".to_string()),
        source: "/promo".to_string(),
        destination: "/sale".to_string(),
    })
    .await
    .unwrap();
    let stored: Option<String> =
        sqlx::query_scalar("SELECT domain FROM redirects WHERE src_path = '/promo'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(stored.as_deref(), Some("example.com"));

    assert_eq!(repo.delete("/blog/x", Some("example.COM")).await.unwrap(), 1);
    assert_eq!(repo.load_all().await.unwrap().len(), 1);
}

#[sqlx::test]
async fn test_rows_come_back_in_insertion_order(pool: PgPool) {
    insert_row(&pool, None, "/dup", "/first").await;
    insert_row(&pool, None, "/dup", "/second").await;

    let rows = repository(&pool, None).load_all().await.unwrap();

    assert_eq!(rows.last().unwrap().destination, "/second");
}

#[sqlx::test]
async fn test_insert_and_delete(pool: PgPool) {
    let repo = repository(&pool, Some("example.com"));

    let id = repo
        .insert(&NewRedirect {
            domain: Some("example.com".to_string()),
            source: "/old".to_string(),
            destination: "/new".to_string(),
        })
        .await
        .unwrap();
    assert!(id > 0);
    insert_row(&pool, None, "/old", "/unscoped").await;

    assert_eq!(repo.load_all().await.unwrap().len(), 1);

    let removed = repo.delete("/old", Some("example.com")).await.unwrap();
    assert_eq!(removed, 1);
    assert!(repo.load_all().await.unwrap().is_empty());

    // The unscoped row is untouched.
    let remaining = repository(&pool, None).load_all().await.unwrap();
    assert_eq!(remaining, vec![Redirect::new("/old", "/unscoped")]);
}

#[sqlx::test]
async fn test_ping(pool: PgPool) {
    repository(&pool, None).ping().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_database_is_a_load_error() {
    let options = PgConnectOptions::new()
        .host("127.0.0.1")
        .port(1)
        .username("redirecter")
        .password("secret")
        .database("redirecter");
    let repo = PgRedirectRepository::with_connect_options(options, None);

    let result = repo.load_all().await;

    assert!(matches!(result, Err(LoadError::Database(_))));
}
