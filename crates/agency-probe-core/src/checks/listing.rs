//! `GET /agencies` with each supported filter.

use crate::checks::{agency_id_of, has_keys, key_list};
use crate::context::{RunContext, Verdict};
use crate::transport::ApiRequest;
use crate::Result;
use serde_json::Value;
use tracing::debug;

pub const SEARCH_TERM: &str = "London";
pub const TYPE_FILTER: &str = "Private";
pub const PAGE_LIMIT: usize = 3;

const REQUIRED_KEYS: &[&str] = &["agencies", "pagination"];

/// One listing request and the property its response must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScenario {
    Basic,
    Featured,
    SearchLocation,
    TypeFilter,
    Pagination,
}

impl ListScenario {
    pub const ALL: [ListScenario; 5] = [
        ListScenario::Basic,
        ListScenario::Featured,
        ListScenario::SearchLocation,
        ListScenario::TypeFilter,
        ListScenario::Pagination,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ListScenario::Basic => "Basic list",
            ListScenario::Featured => "Featured agencies",
            ListScenario::SearchLocation => "Search by location",
            ListScenario::TypeFilter => "Filter by type",
            ListScenario::Pagination => "Pagination",
        }
    }

    /// Result name, e.g. `List agencies - Featured agencies`.
    pub fn name(&self) -> String {
        format!("List agencies - {}", self.label())
    }

    pub fn query(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ListScenario::Basic => &[],
            ListScenario::Featured => &[("featured", "true")],
            ListScenario::SearchLocation => &[("search", SEARCH_TERM)],
            ListScenario::TypeFilter => &[("type", TYPE_FILTER)],
            ListScenario::Pagination => &[("page", "1"), ("limit", "3")],
        }
    }

    /// Only the unfiltered listing seeds the run's agency ids.
    pub fn seeds_agency_ids(&self) -> bool {
        matches!(self, ListScenario::Basic)
    }

    /// Check the returned agencies. Filter properties are vacuous on an
    /// empty list; the page limit is not.
    pub fn evaluate(&self, agencies: &[Value]) -> std::result::Result<(), String> {
        match self {
            ListScenario::Basic => Ok(()),
            ListScenario::Featured => {
                let all_featured = agencies
                    .iter()
                    .all(|a| a.get("featured").and_then(Value::as_bool).unwrap_or(false));
                if all_featured || agencies.is_empty() {
                    Ok(())
                } else {
                    Err("Featured filter not working correctly".to_string())
                }
            }
            ListScenario::SearchLocation => {
                let needle = SEARCH_TERM.to_lowercase();
                let any_match = agencies.iter().any(|a| {
                    a.get("location")
                        .map(|l| l.to_string().to_lowercase().contains(&needle))
                        .unwrap_or(false)
                });
                if any_match || agencies.is_empty() {
                    Ok(())
                } else {
                    Err("Search filter not working correctly".to_string())
                }
            }
            ListScenario::TypeFilter => {
                let all_typed = agencies
                    .iter()
                    .all(|a| a.get("type").and_then(Value::as_str) == Some(TYPE_FILTER));
                if all_typed || agencies.is_empty() {
                    Ok(())
                } else {
                    Err("Type filter not working correctly".to_string())
                }
            }
            ListScenario::Pagination => {
                if agencies.len() > PAGE_LIMIT {
                    Err(format!(
                        "Pagination limit not respected: got {} agencies",
                        agencies.len()
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

pub async fn run(ctx: &mut RunContext<'_>) {
    for scenario in ListScenario::ALL {
        let outcome = check(ctx, scenario).await;
        ctx.conclude(&scenario.name(), outcome);
    }
}

async fn check(ctx: &mut RunContext<'_>, scenario: ListScenario) -> Result<Verdict> {
    let request =
        ApiRequest::get("/agencies", ctx.config().read_timeout).with_query(scenario.query());
    let response = ctx.send(&request).await?;
    if response.status != 200 {
        return Ok(Verdict::fail("Unexpected status code", response.status));
    }

    let body = response.json()?;
    if !has_keys(&body, REQUIRED_KEYS) {
        return Ok(Verdict::fail(
            format!("Missing required fields in response: {}", key_list(&body)),
            200,
        ));
    }
    let Some(agencies) = body["agencies"].as_array() else {
        return Ok(Verdict::fail(
            format!("Unexpected response format: agencies is {}", body["agencies"]),
            200,
        ));
    };

    if scenario.seeds_agency_ids() && ctx.state.seed(agencies.iter().filter_map(agency_id_of)) {
        debug!(ids = ?ctx.state.agency_ids(), "seeded agency ids from listing");
    }

    if let Err(details) = scenario.evaluate(agencies) {
        return Ok(Verdict::fail(details, 200));
    }

    Ok(Verdict::pass(
        format!("Returned {} agencies with proper structure", agencies.len()),
        200,
    ))
}
