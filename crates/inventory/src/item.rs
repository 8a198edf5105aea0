use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bizlens_core::{DomainError, DomainResult, Entity, RecordId, UserId};

/// Inventory row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: RecordId,
    pub owner_id: UserId,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: i64,
    pub minimum_level: i64,
    #[serde(default)]
    pub unit_price: f64,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Build a stored row from validated input.
    pub fn from_new(owner_id: UserId, input: NewInventoryItem, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        Ok(Self {
            id: RecordId::new(),
            owner_id,
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            quantity: input.quantity,
            minimum_level: input.minimum_level,
            unit_price: input.unit_price,
            updated_at: now,
        })
    }

    /// Quantity after applying `delta`; stock cannot go negative.
    pub fn adjusted_quantity(&self, delta: i64) -> DomainResult<i64> {
        if delta == 0 {
            return Err(DomainError::validation("delta cannot be zero"));
        }
        let new_quantity = self
            .quantity
            .checked_add(delta)
            .ok_or_else(|| DomainError::invariant("quantity overflow"))?;
        if new_quantity < 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        Ok(new_quantity)
    }

    /// Apply a validated patch in place.
    pub fn apply_patch(&mut self, patch: &InventoryPatch, now: DateTime<Utc>) -> DomainResult<()> {
        patch.validate()?;
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(sku) = &patch.sku {
            self.sku = sku.trim().to_string();
        }
        if let Some(q) = patch.quantity {
            self.quantity = q;
        }
        if let Some(min) = patch.minimum_level {
            self.minimum_level = min;
        }
        if let Some(price) = patch.unit_price {
            self.unit_price = price;
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for InventoryItem {
    fn id(&self) -> RecordId {
        self.id
    }

    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// Input for creating an inventory row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryItem {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: i64,
    pub minimum_level: i64,
    #[serde(default)]
    pub unit_price: f64,
}

impl NewInventoryItem {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        validate_quantity(self.quantity)?;
        validate_minimum(self.minimum_level)?;
        validate_price(self.unit_price)
    }
}

/// Partial update of an inventory row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl InventoryPatch {
    pub fn quantity(quantity: i64) -> Self {
        Self {
            quantity: Some(quantity),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.is_empty() {
            return Err(DomainError::validation("patch has no fields"));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(q) = self.quantity {
            validate_quantity(q)?;
        }
        if let Some(min) = self.minimum_level {
            validate_minimum(min)?;
        }
        if let Some(price) = self.unit_price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_quantity(quantity: i64) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::validation("quantity cannot be negative"));
    }
    Ok(())
}

fn validate_minimum(minimum_level: i64) -> DomainResult<()> {
    if minimum_level < 0 {
        return Err(DomainError::validation("minimum_level cannot be negative"));
    }
    Ok(())
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("unit_price must be a finite non-negative number"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(quantity: i64, minimum_level: i64) -> NewInventoryItem {
        NewInventoryItem {
            name: " Widget ".to_string(),
            sku: "W-1".to_string(),
            quantity,
            minimum_level,
            unit_price: 9.5,
        }
    }

    #[test]
    fn from_new_trims_and_keeps_owner() {
        let owner = UserId::new();
        let item = InventoryItem::from_new(owner, new_item(5, 2), Utc::now()).unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.owner_id, owner);
        assert_eq!(item.quantity, 5);
    }

    #[test]
    fn rejects_blank_name_and_negative_quantity() {
        let mut input = new_item(1, 1);
        input.name = "  ".to_string();
        assert!(matches!(input.validate(), Err(DomainError::Validation(_))));
        assert!(matches!(new_item(-1, 0).validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn adjust_cannot_go_negative() {
        let item = InventoryItem::from_new(UserId::new(), new_item(3, 1), Utc::now()).unwrap();
        assert_eq!(item.adjusted_quantity(-3).unwrap(), 0);
        assert!(matches!(item.adjusted_quantity(-4), Err(DomainError::InvariantViolation(_))));
        assert!(matches!(item.adjusted_quantity(0), Err(DomainError::Validation(_))));
    }

    #[test]
    fn apply_patch_only_touches_given_fields() {
        let mut item = InventoryItem::from_new(UserId::new(), new_item(3, 1), Utc::now()).unwrap();
        item.apply_patch(&InventoryPatch::quantity(10), Utc::now()).unwrap();
        assert_eq!(item.quantity, 10);
        assert_eq!(item.minimum_level, 1);
        assert_eq!(item.name, "Widget");
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert!(InventoryPatch::default().validate().is_err());
    }
}
