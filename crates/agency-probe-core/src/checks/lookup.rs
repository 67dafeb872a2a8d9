//! `GET /agencies/{id}` for a known and an unknown id.

use crate::checks::{agency_id_of, has_keys, key_list};
use crate::context::{IdPick, RunContext, Verdict};
use crate::transport::ApiRequest;
use crate::Result;
use serde_json::Value;

pub const VALID_NAME: &str = "Get single agency - Valid ID";
pub const INVALID_NAME: &str = "Get single agency - Invalid ID";

/// An id no backend should know.
pub const UNKNOWN_ID: &str = "invalid-id-123";

pub async fn run(ctx: &mut RunContext<'_>) {
    if let Some(id) = ctx.require_agency_id(VALID_NAME, IdPick::First) {
        let outcome = check_known(ctx, &id).await;
        ctx.conclude(VALID_NAME, outcome);
    }

    let outcome = check_unknown(ctx).await;
    ctx.conclude(INVALID_NAME, outcome);
}

async fn check_known(ctx: &RunContext<'_>, id: &str) -> Result<Verdict> {
    let request = ApiRequest::get(format!("/agencies/{}", id), ctx.config().read_timeout);
    let response = ctx.send(&request).await?;
    if response.status != 200 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    let agency = &body["agency"];
    if agency_id_of(agency).as_deref() == Some(id) {
        let name = agency
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        Ok(Verdict::pass(
            format!("Agency retrieved successfully: {}", name),
            200,
        ))
    } else {
        Ok(Verdict::fail(
            format!("Unexpected response format: {}", key_list(&body)),
            200,
        ))
    }
}

async fn check_unknown(ctx: &RunContext<'_>) -> Result<Verdict> {
    let request = ApiRequest::get(
        format!("/agencies/{}", UNKNOWN_ID),
        ctx.config().read_timeout,
    );
    let response = ctx.send(&request).await?;
    if response.status != 404 {
        return Ok(Verdict::fail(
            format!("Expected 404, got {}", response.status),
            response.status,
        ));
    }

    let body = response.json()?;
    if has_keys(&body, &["error"]) {
        Ok(Verdict::pass("Correctly returned 404 for invalid ID", 404))
    } else {
        Ok(Verdict::fail(
            format!("404 returned but missing error field: {}", body),
            404,
        ))
    }
}
