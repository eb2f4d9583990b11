//! `locus get` and `locus request` command implementations.

use locus_client::{ApiResponse, RequestDescriptor};
use locus_core::error::{LocusError, LocusResult};
use locus_core::types::HttpMethod;

use super::CommandContext;

/// Execute `locus get <url>`
pub async fn get(url: String, no_cache: bool, ctx: &CommandContext) -> LocusResult<()> {
    let mut descriptor = RequestDescriptor::get(url);
    if no_cache {
        descriptor = descriptor.no_cache();
    }

    let response = ctx.client()?.request(descriptor).await?;
    print_response(&response, ctx);
    Ok(())
}

/// Execute `locus request <METHOD> <url> [--data JSON]`
pub async fn execute(
    method: String,
    url: String,
    data: Option<String>,
    ctx: &CommandContext,
) -> LocusResult<()> {
    let descriptor = build_descriptor(&method, url, data.as_deref())?;
    let response = ctx.client()?.request(descriptor).await?;
    print_response(&response, ctx);
    Ok(())
}

/// Turn command arguments into a request descriptor
pub fn build_descriptor(method: &str, url: String, data: Option<&str>) -> LocusResult<RequestDescriptor> {
    let method: HttpMethod = method.parse().map_err(|e| LocusError::InvalidRequest {
        message: format!("{}", e),
    })?;

    let mut descriptor = RequestDescriptor::new(method, url);

    if let Some(raw) = data {
        if !method.has_body() {
            return Err(LocusError::InvalidRequest {
                message: format!("{} requests do not carry a body", method),
            });
        }
        let body: serde_json::Value = serde_json::from_str(raw).map_err(|e| LocusError::InvalidRequest {
            message: format!("--data is not valid JSON: {}", e),
        })?;
        descriptor = descriptor.with_json(&body)?;
    }

    Ok(descriptor)
}

fn print_response(response: &ApiResponse, ctx: &CommandContext) {
    let origin = if response.cached { " (cached)" } else { "" };
    ctx.output.info(&format!("{} {}{}", response.status, response.url, origin));

    match response.json::<serde_json::Value>() {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => ctx.output.print(&pretty),
            Err(_) => ctx.output.print(&response.text()),
        },
        Err(_) => ctx.output.print(&response.text()),
    }
}
