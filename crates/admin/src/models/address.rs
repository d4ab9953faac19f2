//! Customer addresses.
//!
//! An address carries two label columns, `name` and `address_name`, that
//! older and newer clients fill in respectively. At least one must be set,
//! and whichever is missing mirrors the other.

use bacoge_core::{AddressId, AddressType, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("at least one of 'name' or 'addressName' must be set")]
    MissingName,
}

/// A postal address owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// `None` until inserted.
    pub id: Option<AddressId>,
    name: Option<String>,
    address_name: Option<String>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(rename = "type")]
    pub address_type: AddressType,
    pub is_default: bool,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    /// A named address; both label fields are set to `name`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
        address_type: AddressType,
        user_id: UserId,
    ) -> Self {
        let name = name.into();
        let mut address = Self::unnamed(street, city, postal_code, country, address_type, user_id);
        address.address_name = Some(name.clone());
        address.name = Some(name);
        address
    }

    /// An address with neither label set. Callers must set one before
    /// [`Address::prepare_insert`] will accept it.
    #[must_use]
    pub fn unnamed(
        street: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
        address_type: AddressType,
        user_id: UserId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: None,
            address_name: None,
            street: street.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            address_type,
            is_default: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a persisted address without touching the label rules.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id: AddressId,
        name: Option<String>,
        address_name: Option<String>,
        street: String,
        city: String,
        postal_code: String,
        country: String,
        address_type: AddressType,
        is_default: bool,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            address_name,
            street,
            city,
            postal_code,
            country,
            address_type,
            is_default,
            user_id,
            created_at,
            updated_at,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn address_name(&self) -> Option<&str> {
        self.address_name.as_deref()
    }

    /// Set `name`; also fills `address_name` if it is unset.
    pub fn set_name(&mut self, name: Option<String>) {
        if self.address_name.is_none() {
            self.address_name.clone_from(&name);
        }
        self.name = name;
    }

    /// Set `address_name`; also fills `name` if it is unset.
    pub fn set_address_name(&mut self, address_name: Option<String>) {
        if self.name.is_none() {
            self.name.clone_from(&address_name);
        }
        self.address_name = address_name;
    }

    /// Run before the first insert: stamps both timestamps, then enforces
    /// and reconciles the label fields.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::MissingName` if neither label is set.
    pub fn prepare_insert(&mut self, now: DateTime<Utc>) -> Result<(), AddressError> {
        self.created_at = now;
        self.updated_at = now;

        match (&self.name, &self.address_name) {
            (None, None) => Err(AddressError::MissingName),
            (None, Some(label)) => {
                self.name = Some(label.clone());
                Ok(())
            }
            (Some(label), None) => {
                self.address_name = Some(label.clone());
                Ok(())
            }
            (Some(_), Some(_)) => Ok(()),
        }
    }

    /// Run before every update.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Label for display: `name`, then `address_name`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.address_name.as_deref())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn unnamed() -> Address {
        Address::unnamed(
            "12 rue des Maçons",
            "Lyon",
            "69003",
            "France",
            AddressType::Shipping,
            UserId::new(1),
        )
    }

    #[test]
    fn test_new_sets_both_names() {
        let address = Address::new(
            "Chantier Nord",
            "1 quai du Port",
            "Marseille",
            "13002",
            "France",
            AddressType::Both,
            UserId::new(7),
        );
        assert_eq!(address.name(), Some("Chantier Nord"));
        assert_eq!(address.address_name(), Some("Chantier Nord"));
        assert!(!address.is_default);
        assert!(address.id.is_none());
        assert_eq!(address.created_at, address.updated_at);
    }

    #[test]
    fn test_set_name_fills_unset_address_name() {
        let mut address = unnamed();
        address.set_name(Some("Dépôt".to_string()));
        assert_eq!(address.name(), Some("Dépôt"));
        assert_eq!(address.address_name(), Some("Dépôt"));

        // Already set: left alone.
        address.set_name(Some("Entrepôt".to_string()));
        assert_eq!(address.name(), Some("Entrepôt"));
        assert_eq!(address.address_name(), Some("Dépôt"));
    }

    #[test]
    fn test_set_address_name_fills_unset_name() {
        let mut address = unnamed();
        address.set_address_name(Some("Bureau".to_string()));
        assert_eq!(address.name(), Some("Bureau"));
        assert_eq!(address.address_name(), Some("Bureau"));
    }

    #[test]
    fn test_prepare_insert_rejects_unnamed() {
        let mut address = unnamed();
        assert_eq!(
            address.prepare_insert(Utc::now()),
            Err(AddressError::MissingName)
        );
    }

    #[test]
    fn test_prepare_insert_stamps_and_reconciles() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let mut address = unnamed();
        address.address_name = Some("Atelier".to_string());

        address.prepare_insert(now).unwrap();

        assert_eq!(address.name(), Some("Atelier"));
        assert_eq!(address.created_at, now);
        assert_eq!(address.updated_at, now);
    }

    #[test]
    fn test_touch_only_moves_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut address = unnamed();
        address.set_name(Some("Maison".to_string()));
        address.prepare_insert(created).unwrap();

        let later = created + Duration::days(3);
        address.touch(later);
        assert_eq!(address.created_at, created);
        assert_eq!(address.updated_at, later);
    }

    #[test]
    fn test_serializes_type_field() {
        let address = Address::new(
            "Siège",
            "5 avenue Foch",
            "Paris",
            "75016",
            "France",
            AddressType::Billing,
            UserId::new(3),
        );
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["type"], "BILLING");
        assert_eq!(json["addressName"], "Siège");
        assert_eq!(json["postalCode"], "75016");
        assert_eq!(json["isDefault"], false);
    }
}
