//! Session persistence through the file-backed store.

use std::sync::Arc;

use camino::Utf8PathBuf;
use campaign_auth::domain::ports::SessionStore;
use campaign_auth::domain::{AuthState, ELECTORAL_USER_KEY, LoginCredentials, SessionManager};
use campaign_auth::outbound::storage::FileSessionStore;
use campaign_auth::test_support::{DEMO_REGISTRY_JSON, fast_hasher, repository_from_json};
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Harness {
    fn manager(&self) -> SessionManager<FileSessionStore> {
        self.manager_over(DEMO_REGISTRY_JSON)
    }

    fn manager_over(&self, registry: &str) -> SessionManager<FileSessionStore> {
        let hasher = fast_hasher();
        let repository = repository_from_json(registry, &hasher);
        let store = FileSessionStore::open(&self.root).expect("open store");
        SessionManager::new(Arc::new(repository), hasher, store)
    }
}

#[fixture]
fn harness() -> Harness {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().join("state")).expect("utf8 path");
    Harness { _dir: dir, root }
}

fn credentials(identifier: &str, password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(identifier, password).expect("valid credentials")
}

#[rstest]
#[tokio::test]
async fn login_survives_a_new_manager(harness: Harness) {
    let mut first = harness.manager();
    first.restore().expect("restore");
    let user = first
        .login(&credentials("master@campana.com", "master123"))
        .await
        .expect("login succeeds");

    let mut second = harness.manager();
    assert!(second.is_loading());
    let state = second.restore().expect("restore").clone();
    assert_eq!(state, AuthState::Authenticated(user));
}

const VOLUNTEER_REGISTRY: &str = r#"{
    "version": 1,
    "credentials": [{
        "id": "voluntario-1",
        "name": "Voluntaria Sin Zona",
        "username": "voluntaria",
        "email": "voluntaria@campana.com",
        "password": "voluntaria1",
        "role": "votante",
        "permissions": ["dashboard"],
        "created": "2024-02-01",
        "isDemoUser": true
    }]
}"#;

#[rstest]
#[case::with_territory(
    DEMO_REGISTRY_JSON,
    "candidato",
    "candidato1",
    &["email", "id", "isDemoUser", "name", "permissions", "role", "territory", "username"]
)]
#[case::without_territory(
    VOLUNTEER_REGISTRY,
    "voluntaria",
    "voluntaria1",
    &["email", "id", "isDemoUser", "name", "permissions", "role", "username"]
)]
#[tokio::test]
async fn stored_blob_holds_only_projection_fields(
    harness: Harness,
    #[case] registry: &str,
    #[case] identifier: &str,
    #[case] password: &str,
    #[case] expected_keys: &[&str],
) {
    let mut manager = harness.manager_over(registry);
    manager.restore().expect("restore");
    manager
        .login(&credentials(identifier, password))
        .await
        .expect("login succeeds");

    let raw = manager
        .into_store()
        .get(ELECTORAL_USER_KEY)
        .expect("read")
        .expect("blob present");
    let blob: serde_json::Value = serde_json::from_str(&raw).expect("json blob");
    let mut keys: Vec<&str> = blob
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, expected_keys);
}

#[rstest]
#[tokio::test]
async fn corrupt_file_is_discarded(harness: Harness) {
    let store = FileSessionStore::open(&harness.root).expect("open store");
    store
        .set(ELECTORAL_USER_KEY, "{\"id\": 42}")
        .expect("write corrupt blob");

    let mut manager = harness.manager();
    assert_eq!(manager.restore().expect("restore"), &AuthState::Anonymous);
    assert!(!harness.root.join("electoral_user.json").exists());
}

#[rstest]
#[tokio::test]
async fn logout_deletes_the_file(harness: Harness) {
    let mut manager = harness.manager();
    manager.restore().expect("restore");
    manager
        .login(&credentials("votante", "votante1"))
        .await
        .expect("login succeeds");
    assert!(harness.root.join("electoral_user.json").exists());

    manager.logout().expect("logout");
    assert!(!harness.root.join("electoral_user.json").exists());
    assert!(!manager.is_authenticated());
}
