//! Address Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Delivery address. Field names follow the storefront client
/// (`address_line1` is snake case, the rest camel case).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub mobile: String,
    pub landmark: String,
    #[serde(rename = "addressType")]
    pub address_type: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "updatedAt")]
    pub updated_at: i64,
}

impl Address {
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }
}

/// `POST /api/address/add`; every field is required
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddressInput {
    pub address_line1: String,
    pub city: String,
    pub state: String,
    #[serde(deserialize_with = "serde_helpers::string_or_number")]
    pub pincode: String,
    pub country: String,
    #[serde(deserialize_with = "serde_helpers::string_or_number")]
    pub mobile: String,
    pub landmark: String,
    #[serde(rename = "addressType")]
    pub address_type: String,
}

impl AddressInput {
    pub fn is_complete(&self) -> bool {
        [
            &self.address_line1,
            &self.city,
            &self.state,
            &self.pincode,
            &self.country,
            &self.mobile,
            &self.landmark,
            &self.address_type,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }
}

/// Partial address update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landmark: Option<String>,
    #[serde(rename = "addressType", skip_serializing_if = "Option::is_none")]
    pub address_type: Option<String>,
    #[serde(rename = "updatedAt", skip_deserializing)]
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_accepts_numeric_pincode() {
        let input: AddressInput = serde_json::from_value(serde_json::json!({
            "address_line1": "1 Main St",
            "city": "Pune",
            "state": "MH",
            "pincode": 411001,
            "country": "IN",
            "mobile": "9999999999",
            "landmark": "Park",
            "addressType": "Home",
        }))
        .unwrap();
        assert_eq!(input.pincode, "411001");
        assert!(input.is_complete());
    }

    #[test]
    fn test_input_incomplete() {
        let input: AddressInput =
            serde_json::from_value(serde_json::json!({"city": "Pune", "landmark": " "})).unwrap();
        assert!(!input.is_complete());
    }
}
