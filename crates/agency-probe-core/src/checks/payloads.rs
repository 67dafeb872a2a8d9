//! Request bodies sent by the checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub region: String,
    pub postcode: String,
    pub address: String,
}

/// Body of `POST /agencies`: a full agency minus its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgency {
    pub name: String,
    pub description: String,
    pub location: Location,
    #[serde(rename = "type")]
    pub agency_type: String,
    pub services: Vec<String>,
    pub contact_email: String,
    pub contact_phone: String,
    pub recruiting: bool,
}

impl NewAgency {
    pub fn sample() -> Self {
        Self {
            name: "Test Foster Care Agency".to_string(),
            description: "A test agency for API testing purposes".to_string(),
            location: Location {
                city: "Test City".to_string(),
                region: "Test Region".to_string(),
                postcode: "TE1 1ST".to_string(),
                address: "123 Test Street".to_string(),
            },
            agency_type: "Private".to_string(),
            services: vec![
                "Long-term Fostering".to_string(),
                "Emergency Care".to_string(),
            ],
            contact_email: "test@testfoster.co.uk".to_string(),
            contact_phone: "01234 567890".to_string(),
            recruiting: true,
        }
    }
}

/// Body of `PUT /agencies/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recruiting: Option<bool>,
}

impl AgencyUpdate {
    pub fn sample() -> Self {
        Self {
            description: Some("Updated description for testing".to_string()),
            recruiting: Some(false),
        }
    }
}

/// Body of `POST /agencies/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub user_id: String,
    pub user_name: String,
    pub comment: String,
    pub stars: u8,
}

impl ReviewSubmission {
    pub fn sample() -> Self {
        Self {
            user_id: "test-user-123".to_string(),
            user_name: "Sarah Foster".to_string(),
            comment: "Excellent agency with great support for foster families. Highly recommended!"
                .to_string(),
            stars: 5,
        }
    }
}

/// Body of `POST /contact/agency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgencyEnquiry {
    pub agency_id: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

impl AgencyEnquiry {
    pub fn sample(agency_id: &str) -> Self {
        Self {
            agency_id: agency_id.to_string(),
            name: "John Smith".to_string(),
            email: "john.smith@example.com".to_string(),
            message: "I am interested in becoming a foster carer with your agency. \
                      Could you please provide more information about your training \
                      programs and support services?"
                .to_string(),
        }
    }
}

/// Body of `POST /contact/general`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralEnquiry {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl GeneralEnquiry {
    pub fn sample() -> Self {
        Self {
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            message: "I have a general question about the foster care process in the UK. \
                      Could someone please get back to me with more information?"
                .to_string(),
        }
    }
}
