//! Property resources: plots, rooms, and tenants.
//!
//! Each resource comes in three shapes:
//! - the record the server returns (`Plot`),
//! - the payload to create one (`NewPlot`),
//! - a partial update (`PlotUpdate`) where every field is optional and
//!   `None` fields are left out of the JSON, so a PUT only touches what
//!   the caller set.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Plot
// ---------------------------------------------------------------------------

/// A property (building or compound) that contains rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_rooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlot {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Room
// ---------------------------------------------------------------------------

/// Occupancy of a room.
///
/// Serialized lowercase (`"vacant"`), matching the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[default]
    Vacant,
    Occupied,
    Maintenance,
}

/// A rentable unit inside a plot.
///
/// `rent` is the monthly amount in the account's currency, as the server
/// sends it (a JSON number).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub plot_id: String,
    pub name: String,
    pub rent: f64,
    #[serde(default)]
    pub status: RoomStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    pub plot_id: String,
    pub name: String,
    pub rent: f64,
    #[serde(default)]
    pub status: RoomStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
}

// ---------------------------------------------------------------------------
// Tenant
// ---------------------------------------------------------------------------

/// A person renting (or formerly renting) a room.
///
/// `room_id` is `None` for tenants who have moved out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub move_in_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_room_status_serializes_lowercase() {
        let json = serde_json::to_string(&RoomStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
    }

    #[test]
    fn test_room_without_status_defaults_to_vacant() {
        let room: Room = serde_json::from_value(json!({
            "id": "r1", "plotId": "p1", "name": "A1", "rent": 450.0
        }))
        .unwrap();
        assert_eq!(room.status, RoomStatus::Vacant);
        assert_eq!(room.plot_id, "p1");
    }

    #[test]
    fn test_plot_update_sends_only_set_fields() {
        let update = PlotUpdate {
            name: Some("Riverside".into()),
            ..PlotUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, json!({ "name": "Riverside" }));
    }

    #[test]
    fn test_new_tenant_uses_camel_case_keys() {
        let tenant = NewTenant {
            room_id: Some("r1".into()),
            name: "Ada".into(),
            phone: "0700".into(),
            email: None,
            id_number: Some("ID-9".into()),
            move_in_date: Some("2024-03-01".into()),
        };
        let json = serde_json::to_value(&tenant).unwrap();
        assert_eq!(json["roomId"], "r1");
        assert_eq!(json["idNumber"], "ID-9");
        assert_eq!(json["moveInDate"], "2024-03-01");
        assert!(json.get("email").is_none());
    }
}
