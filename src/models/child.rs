use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A child profile as the backend returns it.
///
/// The client treats this as a pass-through record: fields are decoded and
/// displayed, never recomputed. `age` in particular is server-calculated
/// from `date_of_birth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    /// MongoDB ObjectId, serialized under the `_id` alias
    #[serde(rename = "_id")]
    pub id: String,
    /// ObjectId of the guardian who owns this child
    pub guardian_id: String,
    pub name: String,
    /// ISO date, e.g. `2016-01-15`
    pub date_of_birth: NaiveDate,
    /// Age in years, computed by the server
    pub age: u8,
    pub home_address: String,
    /// `[longitude, latitude]`
    pub home_coordinates: Vec<f64>,
    pub school_name: String,
    pub school_address: String,
    /// `[longitude, latitude]`
    pub school_coordinates: Vec<f64>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub allergies: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Naive UTC timestamp; the backend serializes without an offset
    pub created_at: NaiveDateTime,
}

/// Input payload for creating or updating a child.
///
/// This is the one canonical schema: snake_case field names, ISO date of
/// birth, coordinates as bare `[longitude, latitude]` pairs. Coordinates
/// stay optional here because the original entry forms could submit without
/// a map selection; the gateway rejects such payloads before any network
/// call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildPayload {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub home_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_coordinates: Option<Vec<f64>>,
    pub school_name: String,
    pub school_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_coordinates: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_child_decodes_backend_shape() {
        let json = r#"{
            "_id": "507f1f77bcf86cd799439011",
            "guardian_id": "507f1f77bcf86cd799439012",
            "name": "Emma Johnson",
            "date_of_birth": "2016-01-15",
            "age": 8,
            "home_address": "123 Oak Street, Springfield, IL 62701",
            "home_coordinates": [-89.6501, 39.7817],
            "school_name": "Springfield Elementary School",
            "school_address": "456 Elm Avenue, Springfield, IL 62701",
            "school_coordinates": [-89.6445, 39.7890],
            "photo_url": "https://example.com/photos/emma.jpg",
            "allergies": "Peanuts, shellfish",
            "notes": null,
            "created_at": "2024-01-15T10:30:00"
        }"#;

        let child: Child = serde_json::from_str(json).unwrap();
        assert_eq!(child.id, "507f1f77bcf86cd799439011");
        assert_eq!(child.name, "Emma Johnson");
        assert_eq!(child.age, 8);
        assert_eq!(child.home_coordinates, vec![-89.6501, 39.7817]);
        assert_eq!(
            child.date_of_birth,
            NaiveDate::from_ymd_opt(2016, 1, 15).unwrap()
        );
        assert!(child.notes.is_none());
    }

    #[test]
    fn test_payload_omits_absent_optionals() {
        let payload = ChildPayload {
            name: "Test Child".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2016, 1, 15).unwrap(),
            home_address: "1 Home St".to_string(),
            home_coordinates: None,
            school_name: "Some School".to_string(),
            school_address: "2 School Ave".to_string(),
            school_coordinates: Some(vec![-74.0060, 40.7128]),
            photo_url: None,
            allergies: None,
            notes: None,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("home_coordinates").is_none());
        assert!(value.get("photo_url").is_none());
        assert_eq!(value["date_of_birth"], "2016-01-15");
        assert_eq!(value["school_coordinates"][0], -74.0060);
    }
}
