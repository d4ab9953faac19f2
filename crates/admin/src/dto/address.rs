use bacoge_core::{AddressType, UserId};
use serde::Deserialize;
use validator::Validate;

use crate::models::Address;

/// Body of `POST /admin/api/addresses`. Either label may be sent.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddressRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub address_name: Option<String>,
    #[validate(length(min = 1, max = 255, message = "La rue est obligatoire"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "La ville est obligatoire"))]
    pub city: String,
    #[validate(length(min = 1, max = 20, message = "Le code postal est obligatoire"))]
    pub postal_code: String,
    #[validate(length(min = 1, max = 100, message = "Le pays est obligatoire"))]
    pub country: String,
    #[serde(rename = "type")]
    pub address_type: AddressType,
    #[serde(default)]
    pub is_default: bool,
    pub user_id: UserId,
}

impl CreateAddressRequest {
    /// Build the unsaved address; labels go through the syncing setters.
    #[must_use]
    pub fn into_address(self) -> Address {
        let mut address = Address::unnamed(
            self.street,
            self.city,
            self.postal_code,
            self.country,
            self.address_type,
            self.user_id,
        );
        if let Some(name) = self.name {
            address.set_name(Some(name));
        }
        if let Some(address_name) = self.address_name {
            address.set_address_name(Some(address_name));
        }
        address.is_default = self.is_default;
        address
    }
}

/// Body of `PUT /admin/api/addresses/{id}`. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub address_name: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub street: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub address_type: Option<AddressType>,
    pub is_default: Option<bool>,
}

impl UpdateAddressRequest {
    pub fn apply(self, address: &mut Address) {
        if let Some(name) = self.name {
            address.set_name(Some(name));
        }
        if let Some(address_name) = self.address_name {
            address.set_address_name(Some(address_name));
        }
        if let Some(street) = self.street {
            address.street = street;
        }
        if let Some(city) = self.city {
            address.city = city;
        }
        if let Some(postal_code) = self.postal_code {
            address.postal_code = postal_code;
        }
        if let Some(country) = self.country {
            address.country = country;
        }
        if let Some(address_type) = self.address_type {
            address.address_type = address_type;
        }
        if let Some(is_default) = self.is_default {
            address.is_default = is_default;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_address_name_only_fills_both_labels() {
        let request: CreateAddressRequest = serde_json::from_str(
            r#"{
                "addressName": "Chantier Est",
                "street": "3 rue du Four",
                "city": "Lille",
                "postalCode": "59000",
                "country": "France",
                "type": "shipping",
                "userId": 4
            }"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        let address = request.into_address();
        assert_eq!(address.name(), Some("Chantier Est"));
        assert_eq!(address.address_name(), Some("Chantier Est"));
        assert_eq!(address.address_type, AddressType::Shipping);
        assert!(!address.is_default);
    }

    #[test]
    fn test_unnamed_request_builds_unnamed_address() {
        let request: CreateAddressRequest = serde_json::from_str(
            r#"{
                "street": "3 rue du Four",
                "city": "Lille",
                "postalCode": "59000",
                "country": "France",
                "type": "BILLING",
                "userId": 4
            }"#,
        )
        .unwrap();
        let address = request.into_address();
        assert_eq!(address.label(), "");
        assert!(address.name().is_none());
    }

    #[test]
    fn test_update_keeps_absent_fields() {
        let mut address = Address::new(
            "Dépôt",
            "1 rue A",
            "Nantes",
            "44000",
            "France",
            AddressType::Both,
            UserId::new(1),
        );
        UpdateAddressRequest {
            city: Some("Rennes".to_string()),
            is_default: Some(true),
            ..Default::default()
        }
        .apply(&mut address);

        assert_eq!(address.city, "Rennes");
        assert_eq!(address.street, "1 rue A");
        assert!(address.is_default);
        assert_eq!(address.name(), Some("Dépôt"));
    }
}
