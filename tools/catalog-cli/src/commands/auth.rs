//! Admin session commands.

use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use serde_json::json;

use super::LoginArgs;
use crate::context::Context;

/// Sign in and keep the session for later commands.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let mut app = ctx.connect().await?;

    let email = match args.email.or_else(|| ctx.config.admin.email.clone()) {
        Some(email) => email,
        None if ctx.output.is_json() => bail!("Pass --email or set CATALOG_ADMIN_EMAIL"),
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match std::env::var("CATALOG_ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ if ctx.output.is_json() => bail!("Set CATALOG_ADMIN_PASSWORD to sign in with --json"),
        _ => Password::new().with_prompt("Password").interact()?,
    };

    let user = app.sign_in(&email, &password).await?.clone();
    ctx.save_session(&user)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "id": user.id, "email": user.email }));
    } else {
        ctx.output.success(&format!("Signed in as {}", user.email));
    }
    Ok(())
}

/// End the session, locally and on the store.
pub async fn logout(ctx: &Context) -> Result<()> {
    let mut app = ctx.connect().await?;
    let was_signed_in = app.session().is_signed_in();
    app.sign_out().await?;
    ctx.clear_session()?;

    if was_signed_in {
        ctx.output.success("Signed out");
    } else {
        ctx.output.info("Not signed in");
    }
    Ok(())
}

/// Show who is signed in.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;

    match app.current_user() {
        Some(user) if ctx.output.is_json() => {
            ctx.output
                .json(&json!({ "id": user.id, "email": user.email, "expires_at": user.expires_at }));
        }
        Some(user) => {
            ctx.output.kv("email", &user.email);
            ctx.output.kv("id", user.id.as_str());
        }
        None if ctx.output.is_json() => ctx.output.json(&json!({ "signed_in": false })),
        None => ctx.output.info("Not signed in. Run `catalog login`."),
    }
    Ok(())
}
