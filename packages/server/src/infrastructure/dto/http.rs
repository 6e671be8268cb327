//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Room summary for `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub room: String,
    /// Usernames in join order
    pub occupants: Vec<String>,
    /// RFC 3339
    pub created_at: String,
}

/// Room detail for `GET /api/rooms/{room}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub room: String,
    pub occupants: Vec<OccupantDetailDto>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupantDetailDto {
    pub connection_id: String,
    pub username: String,
    /// RFC 3339
    pub joined_at: String,
}
