//! Wire records of the catalogue API
//!
//! Every field is required. Decoding goes through [`decode`], which turns a
//! missing or mistyped field into a `CatalogueError::Parse` naming the
//! endpoint instead of defaulting it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CatalogueError;

/// Collector identity without the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub location: String,
    pub brick_count: i64,
}

/// One colour variant of a piece type in a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceVariant {
    pub color: String,
    pub count: i64,
}

/// A piece type with all its colour variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPiece {
    pub piece_id: String,
    pub variants: Vec<PieceVariant>,
}

/// Collector identity with the full collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFull {
    pub id: String,
    pub username: String,
    pub location: String,
    pub brick_count: i64,
    pub collection: Vec<CollectionPiece>,
}

impl UserFull {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            location: self.location.clone(),
            brick_count: self.brick_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(rename = "Users")]
    pub users: Vec<UserSummary>,
}

/// Set identity and size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSummary {
    pub id: String,
    pub name: String,
    pub set_number: String,
    pub total_pieces: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPart {
    #[serde(rename = "designID")]
    pub design_id: String,
    pub material: u32,
    pub part_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetPiece {
    pub part: SetPart,
    pub quantity: i64,
}

/// Set identity with its full piece list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFull {
    pub id: String,
    pub name: String,
    pub set_number: String,
    pub total_pieces: i64,
    pub pieces: Vec<SetPiece>,
}

impl SetFull {
    pub fn summary(&self) -> SetSummary {
        SetSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            set_number: self.set_number.clone(),
            total_pieces: self.total_pieces,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetsResponse {
    #[serde(rename = "Sets")]
    pub sets: Vec<SetSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRecord {
    pub name: String,
    pub code: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorsResponse {
    pub colours: Vec<ColorRecord>,
    pub disclaimer: String,
}

/// Decode a JSON body into a typed record
pub fn decode<T: DeserializeOwned>(context: &str, body: &[u8]) -> Result<T, CatalogueError> {
    serde_json::from_slice(body).map_err(|e| CatalogueError::parse(context, e))
}
