//! Wire types for the LMIS REST API
//!
//! All bodies are JSON with camelCase field names.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

/// Login credentials, also used for HTTP basic auth
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Response of `POST /rest-api/login`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_information: UserInformation,
    pub facility_supported_programs: Vec<SupportedProgram>,
}

impl LoginResponse {
    /// Find a supported program by its code
    pub fn program(&self, code: &str) -> Option<&SupportedProgram> {
        self.facility_supported_programs
            .iter()
            .find(|p| p.program_code == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInformation {
    pub user_name: String,
    pub user_first_name: Option<String>,
    pub user_last_name: Option<String>,
    pub facility_code: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub facility_id: Option<String>,
    pub facility_name: Option<String>,
}

impl UserInformation {
    /// The fields that identify a user independently of server-assigned ids
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            user_name: self.user_name.clone(),
            first_name: self.user_first_name.clone().unwrap_or_default(),
            last_name: self.user_last_name.clone().unwrap_or_default(),
            facility_code: self.facility_code.clone().unwrap_or_default(),
        }
    }
}

/// Stable identity of a user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub facility_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedProgram {
    pub program_code: String,
    pub parent_code: Option<String>,
    pub program_name: String,
}

/// Requisition document submitted by a facility for one program
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Requisition {
    pub program_code: String,
    pub agent_code: String,
    pub products: Vec<ProductLine>,
    pub patient_quantification: Vec<PatientBucket>,
    pub regimens: Vec<Regimen>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductLine {
    pub product_code: String,
    pub beginning_balance: i64,
    pub quantity_received: i64,
    pub quantity_dispensed: i64,
    pub total_losses_and_adjustments: i64,
    pub stock_in_hand: i64,
    pub new_patient_count: i64,
    pub stock_out_days: i64,
    pub quantity_requested: i64,
    pub reason_for_requested_quantity: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientBucket {
    pub category: String,
    pub value: i64,
}

/// Treatment counts for one regimen, split by age band
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Regimen {
    pub code: String,
    pub name: String,
    pub patients_on_treatment: i64,
    pub patients_to_initiate_treatment: i64,
    pub patients_stopped_treatment: i64,
    pub patients_on_treatment_adult: i64,
    pub patients_to_initiate_treatment_adult: i64,
    pub patients_stopped_treatment_adult: i64,
    pub patients_on_treatment_children: i64,
    pub patients_to_initiate_treatment_children: i64,
    pub patients_stopped_treatment_children: i64,
    pub remarks: String,
}

/// Response of `POST /rest-api/requisitions`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionCreated {
    pub requisition_id: Option<i64>,
}

/// Response of `GET /rest-api/requisitions/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct RequisitionEnvelope {
    pub requisition: RequisitionRecord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequisitionRecord {
    pub id: i64,
    pub program_code: String,
    pub agent_code: String,
    pub emergency: bool,
    pub requisition_status: RequisitionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequisitionStatus {
    Initiated,
    Submitted,
    Authorized,
    InApproval,
    Approved,
    Released,
    #[serde(untagged)]
    Other(String),
}

/// A single inventory movement pushed during stock card sync
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCardEvent {
    pub facility_id: i64,
    pub product_code: String,
    pub quantity: i64,
    pub reason_name: String,
    #[serde(serialize_with = "basic_timestamp::serialize")]
    pub occurred: NaiveDateTime,
}

/// `20151010T030530Z` style UTC timestamps
pub mod basic_timestamp {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub const FORMAT: &str = "%Y%m%dT%H%M%SZ";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_accepts_numeric_facility_id() {
        let body = json!({
            "userInformation": {
                "userName": "superuser",
                "userFirstName": "Super",
                "userLastName": "User",
                "facilityCode": "F10",
                "facilityId": 408
            },
            "facilitySupportedPrograms": []
        });
        let resp: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.user_information.facility_id.as_deref(), Some("408"));
    }

    #[test]
    fn test_login_response_null_facility_id() {
        let body = json!({
            "userInformation": { "userName": "x", "facilityId": null },
            "facilitySupportedPrograms": []
        });
        let resp: LoginResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.user_information.facility_id, None);
        assert!(resp.facility_supported_programs.is_empty());
    }

    #[test]
    fn test_login_response_requires_program_list() {
        let body = json!({
            "userInformation": { "userName": "superuser", "facilityId": 408 }
        });
        assert!(serde_json::from_value::<LoginResponse>(body).is_err());
    }

    #[test]
    fn test_requisition_status_unknown_value_is_kept() {
        let known: RequisitionStatus = serde_json::from_value(json!("AUTHORIZED")).unwrap();
        assert_eq!(known, RequisitionStatus::Authorized);

        let other: RequisitionStatus = serde_json::from_value(json!("REJECTED")).unwrap();
        assert_eq!(other, RequisitionStatus::Other("REJECTED".to_string()));
    }

    #[test]
    fn test_stock_card_event_timestamp_format() {
        let event = StockCardEvent {
            facility_id: 408,
            product_code: "08S42".to_string(),
            quantity: 20,
            reason_name: "STOLEN".to_string(),
            occurred: NaiveDateTime::parse_from_str("20151015T030530Z", basic_timestamp::FORMAT)
                .unwrap(),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["occurred"], "20151015T030530Z");
        assert_eq!(value["reasonName"], "STOLEN");
        assert_eq!(value["facilityId"], 408);
    }
}
