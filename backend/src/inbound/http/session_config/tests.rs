//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write as _;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp key file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

#[fixture]
fn release_key() -> NamedTempFile {
    key_file(SESSION_KEY_MIN_LEN)
}

fn env_from(vars: &[(&str, &str)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

fn release_env(key: &NamedTempFile, overrides: &[(&str, &str)]) -> MockEnv {
    let path = key.path().to_string_lossy().into_owned();
    let mut vars: Vec<(&str, &str)> = vec![
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ];
    for &(name, value) in overrides {
        vars.retain(|&(existing, _)| existing != name);
        vars.push((name, value));
    }
    env_from(&vars)
}

fn release_error(env: &MockEnv) -> SessionConfigError {
    match session_settings_from_env(env, BuildMode::Release) {
        Ok(_) => panic!("release settings should be rejected"),
        Err(error) => error,
    }
}

#[rstest]
fn release_valid_settings_succeed(release_key: NamedTempFile) {
    let settings = session_settings_from_env(&release_env(&release_key, &[]), BuildMode::Release)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl, Duration::minutes(SESSION_TTL_DEFAULT_MINUTES));
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(#[case] missing: &'static str) {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let path = key.path().to_string_lossy().into_owned();
    let vars: Vec<(&str, &str)> = [
        (KEY_FILE_ENV, path.as_str()),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]
    .into_iter()
    .filter(|(name, _)| *name != missing)
    .collect();

    let error = release_error(&env_from(&vars));
    assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sideways")]
#[case(TTL_ENV, "0")]
#[case(TTL_ENV, "soon")]
fn release_rejects_malformed_values(
    release_key: NamedTempFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let error = release_error(&release_env(&release_key, &[(name, value)]));
    assert!(matches!(error, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_ephemeral_keys(release_key: NamedTempFile) {
    let error = release_error(&release_env(&release_key, &[(ALLOW_EPHEMERAL_ENV, "yes")]));
    assert!(matches!(error, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = key_file(SESSION_KEY_MIN_LEN - 1);
    let error = release_error(&release_env(&short, &[]));
    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_requires_readable_key_file() {
    let env = env_from(&[
        (KEY_FILE_ENV, "/nonexistent/campaign-auth/session_key"),
        (COOKIE_SECURE_ENV, "1"),
        (SAMESITE_ENV, "Strict"),
        (ALLOW_EPHEMERAL_ENV, "0"),
    ]);
    assert!(matches!(release_error(&env), SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_rejects_insecure_same_site_none(release_key: NamedTempFile) {
    let env = release_env(&release_key, &[(COOKIE_SECURE_ENV, "0"), (SAMESITE_ENV, "None")]);
    assert!(matches!(
        release_error(&env),
        SessionConfigError::InsecureSameSiteNone
    ));
}

#[rstest]
fn release_honours_ttl_override(release_key: NamedTempFile) {
    let settings = session_settings_from_env(
        &release_env(&release_key, &[(TTL_ENV, "15")]),
        BuildMode::Release,
    )
    .expect("valid settings");
    assert_eq!(settings.ttl, Duration::minutes(15));
}

#[rstest]
fn debug_defaults_are_lenient() {
    let settings = session_settings_from_env(&env_from(&[]), BuildMode::Debug)
        .expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn debug_falls_back_on_malformed_values(release_key: NamedTempFile) {
    let env = release_env(
        &release_key,
        &[
            (COOKIE_SECURE_ENV, "perhaps"),
            (SAMESITE_ENV, "sideways"),
            (TTL_ENV, "-5"),
        ],
    );
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug fallback");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl, Duration::minutes(SESSION_TTL_DEFAULT_MINUTES));
}

#[rstest]
#[case("1", Some(true))]
#[case(" Yes ", Some(true))]
#[case("n", Some(false))]
#[case("FALSE", Some(false))]
#[case("2", None)]
fn parses_boolean_toggles(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}
