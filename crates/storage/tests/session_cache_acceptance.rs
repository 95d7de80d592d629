use shared::domain::{CompanyId, UserData, UserId};
use storage::{keys, SessionStore, Storage};

#[tokio::test]
async fn cached_session_survives_reopening_the_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("cache").join("session.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let user = UserData {
        id: UserId(42),
        name: "Ravi".into(),
        mobile: "9000000001".into(),
        role: "manager".into(),
        cid: CompanyId(5),
        token: "persisted-token".into(),
        ..UserData::default()
    };

    {
        let storage = Storage::new(&database_url).await.expect("open");
        storage.save_user(&user).await.expect("save");
        storage.remember_contact("9000000001").await.expect("contact");
    }

    let reopened = Storage::new(&database_url).await.expect("reopen");
    let loaded = reopened.load_user().await.expect("load").expect("user");
    assert_eq!(loaded.id, UserId(42));
    assert_eq!(loaded.cid, CompanyId(5));
    assert_eq!(
        reopened
            .get_item(keys::CHECKED_USER_MOBILE)
            .await
            .expect("checked")
            .as_deref(),
        Some("9000000001")
    );

    let as_store: &dyn SessionStore = &reopened;
    as_store.clear_session().await.expect("clear");
    assert!(reopened.load_user().await.expect("load").is_none());
}
