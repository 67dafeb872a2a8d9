//! `POST /agencies` and `PUT /agencies/{id}`.

use crate::checks::payloads::{AgencyUpdate, NewAgency};
use crate::checks::{agency_id_of, has_keys, is_true, key_list, unechoed_fields};
use crate::context::{IdPick, RunContext, Verdict};
use crate::transport::ApiRequest;
use crate::Result;
use serde_json::Value;
use tracing::info;

pub const CREATE_NAME: &str = "Create agency";
pub const UPDATE_NAME: &str = "Update agency";

pub async fn run_create(ctx: &mut RunContext<'_>) {
    let outcome = create(ctx, &NewAgency::sample()).await;
    ctx.conclude(CREATE_NAME, outcome);
}

/// Targets the most recently discovered id, which is the agency created
/// earlier in this run when creation succeeded.
pub async fn run_update(ctx: &mut RunContext<'_>) {
    let Some(id) = ctx.require_agency_id(UPDATE_NAME, IdPick::Last) else {
        return;
    };
    let outcome = update(ctx, &id, &AgencyUpdate::sample()).await;
    ctx.conclude(UPDATE_NAME, outcome);
}

async fn create(ctx: &mut RunContext<'_>, agency: &NewAgency) -> Result<Verdict> {
    let request = ApiRequest::post("/agencies", ctx.config().read_timeout).with_json(agency)?;
    let response = ctx.send(&request).await?;
    if response.status != 201 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    if !(is_true(body.get("success")) && has_keys(&body, &["agency"])) {
        return Ok(Verdict::fail(
            format!("Unexpected response format: {}", key_list(&body)),
            201,
        ));
    }

    let created = &body["agency"];
    let created_name = created.get("name").and_then(Value::as_str);
    if created_name != Some(agency.name.as_str()) {
        return Ok(Verdict::fail(
            format!(
                "Created agency data mismatch: {}",
                created_name.unwrap_or("null")
            ),
            201,
        ));
    }

    let Some(id) = agency_id_of(created) else {
        return Ok(Verdict::fail("Created agency has no id", 201));
    };
    info!(agency_id = %id, "created agency");
    ctx.state.push(id);

    Ok(Verdict::pass(
        format!("Agency created successfully: {}", agency.name),
        201,
    ))
}

async fn update(ctx: &RunContext<'_>, id: &str, changes: &AgencyUpdate) -> Result<Verdict> {
    let request = ApiRequest::put(format!("/agencies/{}", id), ctx.config().read_timeout)
        .with_json(changes)?;
    let response = ctx.send(&request).await?;
    if response.status != 200 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    if !(is_true(body.get("success")) && has_keys(&body, &["agency"])) {
        return Ok(Verdict::fail(
            format!("Unexpected response format: {}", key_list(&body)),
            200,
        ));
    }

    let stale = match &request.body {
        Some(submitted) => unechoed_fields(submitted, &body["agency"]),
        None => Vec::new(),
    };
    if stale.is_empty() {
        Ok(Verdict::pass("Agency updated successfully", 200))
    } else {
        Ok(Verdict::fail(
            format!("Update data not reflected in response: {:?}", stale),
            200,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use crate::fakes::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_appends_id() {
        let transport = ScriptedTransport::new().on_json(
            "POST /agencies",
            201,
            json!({
                "success": true,
                "agency": { "id": "new-1", "name": "Test Foster Care Agency" }
            }),
        );
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);
        ctx.state.seed(vec!["a1".to_string()]);

        run_create(&mut ctx).await;

        assert!(ctx.log.entries()[0].passed);
        assert_eq!(ctx.state.agency_ids().to_vec(), vec!["a1", "new-1"]);

        let sent = transport.sent_requests();
        assert_eq!(
            sent[0].body.as_ref().unwrap()["name"],
            "Test Foster Care Agency"
        );
    }

    #[tokio::test]
    async fn test_create_name_mismatch() {
        let transport = ScriptedTransport::new().on_json(
            "POST /agencies",
            201,
            json!({ "success": true, "agency": { "id": "new-1", "name": "Other" } }),
        );
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);

        run_create(&mut ctx).await;

        let entry = &ctx.log.entries()[0];
        assert!(!entry.passed);
        assert_eq!(entry.details, "Created agency data mismatch: Other");
        assert!(ctx.state.agency_ids().is_empty());
    }

    #[tokio::test]
    async fn test_create_requires_success_flag() {
        let transport = ScriptedTransport::new().on_json(
            "POST /agencies",
            201,
            json!({
                "success": false,
                "agency": { "id": "x", "name": "Test Foster Care Agency" }
            }),
        );
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);

        run_create(&mut ctx).await;

        let details = &ctx.log.entries()[0].details;
        assert!(details.starts_with("Unexpected response format"));
    }

    #[tokio::test]
    async fn test_update_targets_last_id() {
        let transport = ScriptedTransport::new().on_json(
            "PUT /agencies/new-1",
            200,
            json!({
                "success": true,
                "agency": {
                    "id": "new-1",
                    "description": "Updated description for testing",
                    "recruiting": false
                }
            }),
        );
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);
        ctx.state.seed(vec!["a1".to_string()]);
        ctx.state.push("new-1".to_string());

        run_update(&mut ctx).await;

        assert!(ctx.log.entries()[0].passed);
        assert_eq!(transport.sent_routes(), vec!["PUT /agencies/new-1"]);
    }

    #[tokio::test]
    async fn test_update_not_reflected() {
        let transport = ScriptedTransport::new().on_json(
            "PUT /agencies/a1",
            200,
            json!({
                "success": true,
                "agency": { "id": "a1", "description": "old", "recruiting": false }
            }),
        );
        let config = ProbeConfig::default();
        let mut ctx = RunContext::new(&transport, &config);
        ctx.state.seed(vec!["a1".to_string()]);

        run_update(&mut ctx).await;

        let entry = &ctx.log.entries()[0];
        assert!(!entry.passed);
        assert!(entry.details.contains("description"));
        assert!(!entry.details.contains("recruiting"));
    }
}
