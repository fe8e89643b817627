//! Logout command: forget the stored session.

use crate::traits::{CredentialsError, CredentialsProvider};

/// Clear the stored credential. Returns whether one was present.
pub async fn handle_logout_command(
    credentials: &dyn CredentialsProvider,
) -> Result<bool, CredentialsError> {
    let had_session = credentials.has().await;
    credentials.clear().await?;
    if had_session {
        tracing::info!("Stored session removed");
    } else {
        tracing::info!("No stored session");
    }
    Ok(had_session)
}
