//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Candidate, GameMode, Level, LevelSource};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    NewLevel {
        #[serde(default)]
        difficulty: Option<u32>,
        #[serde(default)]
        mode: Option<GameMode>,
    },
    CheckCandidate {
        #[serde(rename = "levelId")]
        level_id: String,
        text: String,
    },
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Level {
        level: LevelOut,
    },
    CheckResult {
        #[serde(rename = "levelId")]
        level_id: String,
        text: String,
        known: bool,
        #[serde(rename = "isMatch")]
        is_match: bool,
    },
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for level delivery.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOut {
    pub id: String,
    pub difficulty: u32,
    pub mode: GameMode,
    pub source: LevelSource,
    pub regex: String,
    pub description: String,
    pub candidates: Vec<Candidate>,
}

/// Convert a stored `Level` to the public DTO.
pub fn to_out(l: &Level) -> LevelOut {
    LevelOut {
        id: l.id.clone(),
        difficulty: l.difficulty,
        mode: l.mode,
        source: l.source,
        regex: l.regex.clone(),
        description: l.description.clone(),
        candidates: l.candidates.clone(),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct LevelQuery {
    pub difficulty: Option<u32>,
    pub mode: Option<GameMode>,
}

#[derive(Debug, Deserialize)]
pub struct CheckIn {
    #[serde(rename = "levelId")]
    pub level_id: String,
    pub text: String,
}
#[derive(Debug, Serialize)]
pub struct CheckOut {
    pub known: bool,
    #[serde(rename = "isMatch")]
    pub is_match: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_parse_with_optional_fields() {
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"new_level","difficulty":4,"mode":"fullmatch"}"#)
            .expect("new_level parses");
        assert!(matches!(
            m,
            ClientWsMessage::NewLevel { difficulty: Some(4), mode: Some(GameMode::FullMatch) }
        ));

        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"new_level"}"#).expect("bare new_level parses");
        assert!(matches!(m, ClientWsMessage::NewLevel { difficulty: None, mode: None }));

        let m: ClientWsMessage =
            serde_json::from_str(r#"{"type":"check_candidate","levelId":"abc","text":"123"}"#).expect("check parses");
        assert!(matches!(m, ClientWsMessage::CheckCandidate { ref level_id, ref text } if level_id == "abc" && text == "123"));
    }

    #[test]
    fn unknown_modes_are_rejected() {
        assert!(serde_json::from_str::<ClientWsMessage>(r#"{"type":"new_level","mode":"glob"}"#).is_err());
    }

    #[test]
    fn server_messages_use_camel_case_fields() {
        let out = ServerWsMessage::CheckResult {
            level_id: "x".into(),
            text: "abc".into(),
            known: true,
            is_match: false,
        };
        let v = serde_json::to_value(&out).expect("serializes");
        assert_eq!(v["type"], "check_result");
        assert_eq!(v["levelId"], "x");
        assert_eq!(v["isMatch"], false);

        let level = Level {
            id: "id".into(),
            difficulty: 3,
            mode: GameMode::Match,
            source: LevelSource::Procedural,
            regex: r"^\d{3}".into(),
            description: "3 digits".into(),
            candidates: vec![Candidate { text: "123".into(), is_match: true }],
        };
        let v = serde_json::to_value(ServerWsMessage::Level { level: to_out(&level) }).expect("serializes");
        assert_eq!(v["type"], "level");
        assert_eq!(v["level"]["mode"], "match");
        assert_eq!(v["level"]["source"], "procedural");
        assert_eq!(v["level"]["candidates"][0]["isMatch"], true);
    }
}
