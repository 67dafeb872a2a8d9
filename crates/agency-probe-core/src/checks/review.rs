//! `POST /agencies/{id}/reviews`.

use crate::checks::payloads::ReviewSubmission;
use crate::checks::{has_keys, is_true, key_list};
use crate::context::{IdPick, RunContext, Verdict};
use crate::transport::ApiRequest;
use crate::Result;
use serde_json::Value;

pub const NAME: &str = "Add agency review";

pub const MISMATCH_DETAILS: &str = "Review data mismatch or missing rating update";

pub async fn run(ctx: &mut RunContext<'_>) {
    let Some(id) = ctx.require_agency_id(NAME, IdPick::First) else {
        return;
    };
    let outcome = check(ctx, &id, &ReviewSubmission::sample()).await;
    ctx.conclude(NAME, outcome);
}

async fn check(ctx: &RunContext<'_>, id: &str, review: &ReviewSubmission) -> Result<Verdict> {
    let request = ApiRequest::post(
        format!("/agencies/{}/reviews", id),
        ctx.config().read_timeout,
    )
    .with_json(review)?;
    let response = ctx.send(&request).await?;
    if response.status != 201 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    if !(is_true(body.get("success")) && has_keys(&body, &["review", "agency"])) {
        return Ok(Verdict::fail(
            format!("Unexpected response format: {}", key_list(&body)),
            201,
        ));
    }

    let echoed = &body["review"];
    let comment_matches =
        echoed.get("comment").and_then(Value::as_str) == Some(review.comment.as_str());
    let stars_match = echoed.get("stars").and_then(Value::as_f64) == Some(f64::from(review.stars));
    // A rating on the returned agency shows the server recomputed it.
    let rating_present = body["agency"].get("rating").is_some();

    if comment_matches && stars_match && rating_present {
        Ok(Verdict::pass(
            "Review added successfully, agency rating updated",
            201,
        ))
    } else {
        Ok(Verdict::fail(MISMATCH_DETAILS, 201))
    }
}
