//! Tests for the environment credential provider.

use storyloom::{CredentialProvider, EnvCredentials, StoryloomErrorKind};

#[tokio::test]
async fn test_present_variable_is_a_credential() {
    // PATH is set in every test environment.
    let credentials = EnvCredentials::new("PATH");
    assert!(credentials.has_credential().await);
}

#[tokio::test]
async fn test_missing_variable_is_not_a_credential() -> anyhow::Result<()> {
    let credentials = EnvCredentials::new("STORYLOOM_TEST_KEY_THAT_IS_NEVER_SET");
    assert!(!credentials.has_credential().await);

    let err = credentials
        .select_credential()
        .await
        .expect_err("selection should fail without the variable");
    assert!(matches!(err.kind(), StoryloomErrorKind::Gemini(_)));
    assert!(err.user_message().contains("STORYLOOM_TEST_KEY_THAT_IS_NEVER_SET"));
    Ok(())
}

#[tokio::test]
async fn test_selection_succeeds_when_present() -> anyhow::Result<()> {
    EnvCredentials::new("PATH").select_credential().await?;
    Ok(())
}
