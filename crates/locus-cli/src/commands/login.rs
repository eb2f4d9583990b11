//! `locus login` and `locus logout`.
//!
//! Both only touch local storage. The API client picks the token up on its
//! next request.

use locus_core::error::{LocusError, LocusResult};

use super::CommandContext;

/// Store the bearer token under the configured key
pub async fn login(token: String, ctx: &CommandContext) -> LocusResult<()> {
    let token = token.trim();
    if token.is_empty() {
        return Err(LocusError::InvalidRequest {
            message: "Token must not be empty".to_string(),
        });
    }

    let key = &ctx.config.client.token_key;
    let store = ctx.token_store()?;
    if store.get_item(key)?.is_some() {
        ctx.output.warn("Replacing the previously stored token");
    }
    store.set_item(key, token)?;

    ctx.output.success("Token stored");
    Ok(())
}

/// Remove the stored bearer token
pub async fn logout(ctx: &CommandContext) -> LocusResult<()> {
    let store = ctx.token_store()?;
    store.remove_item(&ctx.config.client.token_key)?;

    ctx.output.success("Token removed");
    Ok(())
}
