use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use stocktake_audit::{AuditSession, InventoryItem, Reconciliation};
use stocktake_auth::{NewUser, Role};
use stocktake_core::Entity;

use crate::context::PrincipalContext;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl From<CreateUserRequest> for NewUser {
    fn from(body: CreateUserRequest) -> Self {
        NewUser {
            username: body.username,
            password: body.password,
            name: body.name,
            role: body.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub store_name: String,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ItemInput {
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub theoretical_qty: i64,
}

/// Inventory comes either as CSV text (with a header row) or as item objects.
#[derive(Debug, Deserialize)]
pub struct CreateAuditRequest {
    pub store_name: String,
    /// Defaults to the caller's display name.
    #[serde(default)]
    pub auditor_name: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<ItemInput>>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: String,
}

#[derive(Debug, Deserialize)]
pub struct ManualModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ObservationsRequest {
    #[serde(default)]
    pub observations: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub q: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn principal_to_json(principal: &PrincipalContext) -> Value {
    json!({
        "username": principal.username(),
        "name": principal.name(),
        "role": principal.role(),
    })
}

pub fn item_to_json(item: &InventoryItem) -> Value {
    json!({
        "id": item.id(),
        "sku": item.sku(),
        "description": item.description(),
        "theoretical_qty": item.theoretical_qty(),
        "physical_qty": item.physical_qty(),
        "difference": item.difference(),
        "scanned_at": item.scanned_at(),
    })
}

/// Active-audit view: items by recency (optionally filtered), progress and
/// the station's feedback state.
pub fn audit_to_json(session: &AuditSession, query: Option<&str>) -> Value {
    let station = session.station();
    let query = query.map(str::trim).unwrap_or_default();
    let items: Vec<Value> = session.ledger().search(query).into_iter().map(item_to_json).collect();

    json!({
        "id": session.id(),
        "store_name": session.store_name(),
        "auditor_name": session.auditor_name(),
        "status": session.status(),
        "started_at": session.started_at(),
        "completed_at": session.completed_at(),
        "observations": session.observations(),
        "manual_entry": station.manual_entry(),
        "station": station.state(),
        "pending_item": station.pending_item().map(item_to_json),
        "last_scan": station.last_scan(),
        "last_error": station.last_error(),
        "progress": session.ledger().progress(),
        "items": items,
    })
}

pub fn summary_to_json(session: &AuditSession, summary: &Reconciliation) -> Value {
    json!({
        "id": session.id(),
        "store_name": session.store_name(),
        "status": session.status(),
        "total_items": summary.total_items,
        "total_physical": summary.total_physical,
        "discrepancy_count": summary.discrepancy_count,
        "accuracy": summary.accuracy,
        "accuracy_label": summary.accuracy_label(),
        "meets_target": summary.meets_target(),
        "discrepancies": summary.discrepancies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stocktake_audit::AuditSetup;

    fn session() -> AuditSession {
        let mut session = AuditSetup {
            store_name: "Centro".to_string(),
            auditor_name: "Ana".to_string(),
            items: vec![
                InventoryItem::new("A1", "Phone case", 1),
                InventoryItem::new("B2", "Charger", 1),
            ],
        }
        .start(Utc::now())
        .unwrap();
        session.scan("B2", Utc::now()).unwrap();
        session
    }

    #[test]
    fn audit_view_lists_recent_items_first() {
        let view = audit_to_json(&session(), None);
        assert_eq!(view["items"][0]["sku"], "B2");
        assert_eq!(view["items"][1]["sku"], "A1");
        assert_eq!(view["progress"]["counted_items"], 1);
        assert_eq!(view["station"]["state"], "idle");
        assert_eq!(view["last_scan"]["delta"], 1);
    }

    #[test]
    fn audit_view_filters_by_query() {
        let view = audit_to_json(&session(), Some("PHONE"));
        let items = view["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["sku"], "A1");

        let view = audit_to_json(&session(), Some("  "));
        assert_eq!(view["items"].as_array().unwrap().len(), 2);
    }
}
