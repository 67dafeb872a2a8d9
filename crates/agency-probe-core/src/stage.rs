//! Check stage definitions.
//!
//! A stage groups the checks for one endpoint. Stages declare whether they
//! consume or produce agency ids so a plan's data flow can be validated
//! before anything is sent.

use crate::checks;
use crate::context::RunContext;
use crate::error::ProbeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Check stages, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum CheckStage {
    /// GET /
    Root,

    /// GET /agencies with each filter
    Listing,

    /// GET /agencies/{id}, known and unknown
    Lookup,

    /// POST /agencies
    Create,

    /// PUT /agencies/{id}
    Update,

    /// POST /agencies/{id}/reviews
    Review,

    /// POST /contact/agency
    ContactAgency,

    /// POST /contact/general
    ContactGeneral,
}

impl CheckStage {
    /// The fixed execution order.
    pub const ORDER: [CheckStage; 8] = [
        CheckStage::Root,
        CheckStage::Listing,
        CheckStage::Lookup,
        CheckStage::Create,
        CheckStage::Update,
        CheckStage::Review,
        CheckStage::ContactAgency,
        CheckStage::ContactGeneral,
    ];

    /// Get the stage name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            CheckStage::Root => "root",
            CheckStage::Listing => "listing",
            CheckStage::Lookup => "lookup",
            CheckStage::Create => "create",
            CheckStage::Update => "update",
            CheckStage::Review => "review",
            CheckStage::ContactAgency => "contact-agency",
            CheckStage::ContactGeneral => "contact-general",
        }
    }

    /// Position in [`CheckStage::ORDER`].
    pub fn position(&self) -> usize {
        match self {
            CheckStage::Root => 0,
            CheckStage::Listing => 1,
            CheckStage::Lookup => 2,
            CheckStage::Create => 3,
            CheckStage::Update => 4,
            CheckStage::Review => 5,
            CheckStage::ContactAgency => 6,
            CheckStage::ContactGeneral => 7,
        }
    }

    /// Whether some check in this stage targets a discovered agency id.
    pub fn requires_agency_ids(&self) -> bool {
        matches!(
            self,
            CheckStage::Lookup | CheckStage::Update | CheckStage::Review | CheckStage::ContactAgency
        )
    }

    /// Whether this stage adds to the discovered agency ids.
    pub fn produces_agency_ids(&self) -> bool {
        matches!(self, CheckStage::Listing | CheckStage::Create)
    }

    /// Results the stage records on every run.
    pub fn result_count(&self) -> usize {
        match self {
            CheckStage::Listing => checks::listing::ListScenario::ALL.len(),
            CheckStage::Lookup => 2,
            _ => 1,
        }
    }

    /// Run the stage's checks against the context.
    pub async fn execute(self, ctx: &mut RunContext<'_>) {
        match self {
            CheckStage::Root => checks::root::run(ctx).await,
            CheckStage::Listing => checks::listing::run(ctx).await,
            CheckStage::Lookup => checks::lookup::run(ctx).await,
            CheckStage::Create => checks::agency::run_create(ctx).await,
            CheckStage::Update => checks::agency::run_update(ctx).await,
            CheckStage::Review => checks::review::run(ctx).await,
            CheckStage::ContactAgency => checks::contact::run_agency(ctx).await,
            CheckStage::ContactGeneral => checks::contact::run_general(ctx).await,
        }
    }
}

impl fmt::Display for CheckStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CheckStage {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        CheckStage::ORDER
            .into_iter()
            .find(|stage| stage.name() == wanted)
            .ok_or_else(|| ProbeError::UnknownStage(s.to_string()))
    }
}
