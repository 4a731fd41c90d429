//! `pulumi-auto whoami`: show the logged-in user.

use anyhow::Result;

use crate::app::AppContext;

/// Run `pulumi-auto whoami`.
///
/// # Errors
///
/// Returns an error if the CLI is not logged in or cannot be run.
pub async fn run(app: &AppContext) -> Result<()> {
    let workspace = app.workspace().await?;
    let who = workspace.who_am_i(&app.cancel).await?;
    app.renderer().render_whoami(&who)
}
