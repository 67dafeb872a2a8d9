//! `GET /` - API info.

use crate::context::{RunContext, Verdict};
use crate::transport::ApiRequest;
use crate::Result;
use serde_json::Value;

pub const NAME: &str = "Root API endpoint";

pub async fn run(ctx: &mut RunContext<'_>) {
    let outcome = check(ctx).await;
    ctx.conclude(NAME, outcome);
}

async fn check(ctx: &RunContext<'_>) -> Result<Verdict> {
    let request = ApiRequest::get("/", ctx.config().read_timeout);
    let response = ctx.send(&request).await?;
    if response.status != 200 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    let product = ctx.config().product_name.as_str();
    match body.get("message").and_then(Value::as_str) {
        Some(message) if message.contains(product) => Ok(Verdict::pass(
            format!("API info returned correctly: {}", message),
            200,
        )),
        _ => Ok(Verdict::fail(
            format!("Unexpected response format: {}", body),
            200,
        )),
    }
}
