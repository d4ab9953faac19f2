//! Status and kind enums shared by the admin backend.
//!
//! Every enum is stored as a Postgres enum type, serialized as
//! `SCREAMING_SNAKE_CASE`, and parsed case-insensitively so that legacy
//! clients sending `"active"` keep working.

use serde::{Deserialize, Serialize};

/// A string did not name any variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `as_str`, `ALL`, `Display`, case-insensitive `FromStr` and
/// `TryFrom<String>` for a fieldless enum.
macro_rules! wire_enum {
    ($name:ident, $kind:literal { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stored and serialized name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

/// What an address is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "address_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum AddressType {
    Billing,
    Shipping,
    Both,
}

wire_enum!(AddressType, "address type" {
    Billing => "BILLING",
    Shipping => "SHIPPING",
    Both => "BOTH",
});

impl AddressType {
    /// Label shown in the (French-language) back office.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Billing => "Facturation",
            Self::Shipping => "Livraison",
            Self::Both => "Facturation et Livraison",
        }
    }
}

/// Account role. Only `Admin` may use the admin backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum UserRole {
    Admin,
    Client,
}

wire_enum!(UserRole, "user role" {
    Admin => "ADMIN",
    Client => "CLIENT",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum UserStatus {
    Active,
    Inactive,
}

wire_enum!(UserStatus, "user status" {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "category_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum CategoryStatus {
    #[default]
    Active,
    Inactive,
}

wire_enum!(CategoryStatus, "category status" {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "product_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    OutOfStock,
}

wire_enum!(ProductStatus, "product status" {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    OutOfStock => "OUT_OF_STOCK",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "promotion_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum PromotionStatus {
    #[default]
    Active,
    Inactive,
    Expired,
}

wire_enum!(PromotionStatus, "promotion status" {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Expired => "EXPIRED",
});

/// How a promotion reduces the price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "discount_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum DiscountType {
    #[default]
    Percentage,
    FixedAmount,
}

wire_enum!(DiscountType, "discount type" {
    Percentage => "PERCENTAGE",
    FixedAmount => "FIXED_AMOUNT",
});

/// Moderation state of a product review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "review_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

wire_enum!(ReviewStatus, "review status" {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

/// Order lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

wire_enum!(OrderStatus, "order status" {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Processing => "PROCESSING",
    Shipped => "SHIPPED",
    Delivered => "DELIVERED",
    Cancelled => "CANCELLED",
});

/// Who wrote a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "sender_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum SenderType {
    Admin,
    User,
    System,
}

wire_enum!(SenderType, "sender type" {
    Admin => "ADMIN",
    User => "USER",
    System => "SYSTEM",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("active".parse::<CategoryStatus>().unwrap(), CategoryStatus::Active);
        assert_eq!("Inactive".parse::<CategoryStatus>().unwrap(), CategoryStatus::Inactive);
        assert_eq!("out_of_stock".parse::<ProductStatus>().unwrap(), ProductStatus::OutOfStock);
    }

    #[test]
    fn test_parse_unknown_variant() {
        let err = "archived".parse::<CategoryStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid category status: archived");
    }

    #[test]
    fn test_serde_accepts_lowercase_and_writes_uppercase() {
        let status: CategoryStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, CategoryStatus::Inactive);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"INACTIVE\"");
        assert_eq!(
            serde_json::to_string(&DiscountType::FixedAmount).unwrap(),
            "\"FIXED_AMOUNT\""
        );
    }

    #[test]
    fn test_address_type_labels() {
        assert_eq!(AddressType::Billing.display_name(), "Facturation");
        assert_eq!(AddressType::Both.display_name(), "Facturation et Livraison");
        assert_eq!(AddressType::Shipping.to_string(), "SHIPPING");
    }
}
