//! Token show / set / reset.

use anyhow::Result;
use imall_admin::SessionContext;

pub fn show(session: &SessionContext) {
    match session.jwt().value() {
        Some(token) => println!("{}", token),
        None => println!("(anonymous)"),
    }
}

/// Store `token` and make sure it reached storage.
pub fn set(session: &SessionContext, token: &str) -> Result<()> {
    if token.is_empty() {
        anyhow::bail!("Token cannot be empty.");
    }
    session.login(token);
    session.jwt().flush()?;
    println!("Token saved.");
    Ok(())
}

pub fn reset(session: &SessionContext) -> Result<()> {
    session.logout();
    session.jwt().flush()?;
    println!("Token cleared.");
    Ok(())
}
