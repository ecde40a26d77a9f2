use crate::state::PlantSnapshot;
use serde::Serialize;

/// Server → Client: periodic plant snapshot
///
/// Serializes as `{"type": "update", "data": {furnaces, sensors, kpis, timestamp}}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub data: PlantSnapshot,
}

impl From<PlantSnapshot> for UpdateMessage {
    fn from(snapshot: PlantSnapshot) -> Self {
        Self {
            msg_type: "update".to_string(),
            data: snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HistoryConfig;
    use crate::state::PlantStore;

    #[test]
    fn test_update_message_shape() {
        let store = PlantStore::seeded(&HistoryConfig::default());
        let msg = UpdateMessage::from(store.snapshot());

        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "update");
        assert_eq!(json["data"]["furnaces"].as_array().unwrap().len(), 6);
        assert_eq!(json["data"]["sensors"].as_array().unwrap().len(), 18);
        assert_eq!(json["data"]["kpis"].as_array().unwrap().len(), 4);
        assert!(json["data"]["timestamp"].is_string());

        // Alerts, metrics and cameras are fetched over REST
        assert!(json["data"].get("alerts").is_none());
        assert!(json["data"].get("cameras").is_none());
    }
}
