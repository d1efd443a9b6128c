use serde::{Deserialize, Deserializer, Serialize};

/// A game server entry as returned by the hub API.
///
/// `name`, `description` and `status` come straight from the BYOND hub and
/// may contain HTML fragments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameServer {
    /// Network address in `ip:port` form.
    pub address: String,

    /// BYOND world identifier.
    pub world_id: u64,

    /// Server name.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Hub status line.
    #[serde(default)]
    pub status: String,

    /// Live round information, when the poller could reach the topic port.
    #[serde(default)]
    pub topic_status: Option<TopicStatus>,

    /// Current player count.
    #[serde(default)]
    pub players: u32,

    /// When the poller last refreshed this entry (UTC, may lack a zone suffix).
    pub updated_at: String,

    /// Whether the server answered the last poll.
    #[serde(default)]
    pub online: bool,
}

impl GameServer {
    /// `byond://` URL understood by the BYOND client.
    pub fn connect_url(&self) -> String {
        format!("byond://BYOND.world.{}", self.world_id)
    }

    /// Split `address` into host and port, when well formed.
    pub fn host_port(&self) -> Option<(&str, u16)> {
        let (host, port) = self.address.split_once(':')?;
        Some((host, port.parse().ok()?))
    }
}

/// Live round information queried from a server's topic port.
///
/// Every field is optional; codebases differ wildly in what they report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicStatus {
    #[serde(default)]
    pub mode: Option<String>,

    #[serde(default)]
    pub map_name: Option<String>,

    /// Older codebases report the map under this key instead of `map_name`.
    #[serde(default)]
    pub map: Option<String>,

    #[serde(default)]
    pub public_address: Option<String>,

    #[serde(default)]
    pub round_id: Option<u64>,

    /// Round duration; negative for a lobby countdown, and either seconds
    /// or deciseconds depending on the codebase.
    #[serde(default)]
    pub round_duration: Option<f64>,

    #[serde(default)]
    pub security_level: Option<SecurityLevel>,

    #[serde(default)]
    pub version: Option<String>,

    /// Player cap; some servers send `""` when unset.
    #[serde(default, deserialize_with = "number_or_empty")]
    pub popcap: Option<u32>,

    /// Admins online; some servers send `""` when unset.
    #[serde(default, deserialize_with = "number_or_empty")]
    pub admins: Option<u32>,

    #[serde(default)]
    pub shuttle_mode: Option<ShuttleMode>,

    /// Shuttle countdown in seconds.
    #[serde(default)]
    pub shuttle_timer: Option<f64>,
}

impl TopicStatus {
    /// Preferred map label: `map_name`, falling back to `map`.
    pub fn map_display(&self) -> Option<&str> {
        self.map_name.as_deref().or(self.map.as_deref())
    }

    /// Whether enough fields are populated to render a round panel.
    pub fn has_round_info(&self) -> bool {
        self.mode.as_deref().is_some_and(|m| !m.is_empty())
            || self.map_display().is_some_and(|m| !m.is_empty())
            || self.round_id.is_some_and(|id| id != 0)
            || self.round_duration.is_some()
            || self.security_level.is_some()
    }
}

/// Accept a number, an empty string, or a numeric string.
fn number_or_empty<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Station alert level reported over the topic port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityLevel {
    Green,
    Blue,
    Red,
    /// Some codebases report this instead of `green`.
    NoWarning,
    #[serde(other)]
    Unknown,
}

impl SecurityLevel {
    /// Display label; `no_warning` is presented as green.
    pub fn label(&self) -> &'static str {
        match self {
            SecurityLevel::Green | SecurityLevel::NoWarning => "Green",
            SecurityLevel::Blue => "Blue",
            SecurityLevel::Red => "Red",
            SecurityLevel::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Escape shuttle state, as reported by /tg/-derived codebases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuttleMode {
    Idle,
    Igniting,
    Recalled,
    Called,
    Docked,
    Stranded,
    Disabled,
    Escape,
    #[serde(rename = "endgame: game over")]
    Endgame,
    Recharging,
    Landing,
    #[serde(other)]
    Unknown,
}

impl ShuttleMode {
    pub fn label(&self) -> &'static str {
        match self {
            ShuttleMode::Idle => "Idle",
            ShuttleMode::Igniting => "Igniting",
            ShuttleMode::Recalled => "Recalled",
            ShuttleMode::Called => "Called",
            ShuttleMode::Docked => "Docked",
            ShuttleMode::Stranded => "Stranded",
            ShuttleMode::Disabled => "Disabled",
            ShuttleMode::Escape => "Escape",
            ShuttleMode::Endgame => "Game over",
            ShuttleMode::Recharging => "Recharging",
            ShuttleMode::Landing => "Landing",
            ShuttleMode::Unknown => "Unknown",
        }
    }

    /// Whether the countdown timer means anything in this state.
    pub fn has_timer(&self) -> bool {
        matches!(
            self,
            ShuttleMode::Igniting | ShuttleMode::Called | ShuttleMode::Docked | ShuttleMode::Escape
        )
    }
}

impl std::fmt::Display for ShuttleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_server() {
        let json = r#"{
            "address": "64.38.221.151:1400",
            "world_id": 1234,
            "name": "CM-SS13",
            "description": "USS Almayer",
            "status": "<b>CM-SS13</b> - Distress Signal",
            "topic_status": {
                "mode": "extended",
                "map_name": "LV-624",
                "round_id": 19842,
                "round_duration": 45720,
                "security_level": "blue",
                "version": "cm13",
                "popcap": 120,
                "admins": 3,
                "shuttle_mode": "idle",
                "shuttle_timer": 0
            },
            "players": 87,
            "updated_at": "2024-01-15T12:30:00",
            "online": true
        }"#;

        let server: GameServer = serde_json::from_str(json).unwrap();

        assert_eq!(server.world_id, 1234);
        assert_eq!(server.players, 87);
        assert_eq!(server.host_port(), Some(("64.38.221.151", 1400)));
        assert_eq!(server.connect_url(), "byond://BYOND.world.1234");

        let ts = server.topic_status.unwrap();
        assert_eq!(ts.map_display(), Some("LV-624"));
        assert_eq!(ts.security_level, Some(SecurityLevel::Blue));
        assert_eq!(ts.popcap, Some(120));
        assert!(ts.has_round_info());
    }

    #[test]
    fn test_empty_string_popcap_and_admins() {
        let json = r#"{"mode": "secret", "popcap": "", "admins": ""}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.popcap, None);
        assert_eq!(ts.admins, None);
    }

    #[test]
    fn test_numeric_string_popcap() {
        let json = r#"{"popcap": "150"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.popcap, Some(150));
    }

    #[test]
    fn test_map_fallback() {
        let json = r#"{"map": "Box Station"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.map_display(), Some("Box Station"));

        let json = r#"{"map_name": "Delta", "map": "Box Station"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.map_display(), Some("Delta"));
    }

    #[test]
    fn test_endgame_shuttle_mode() {
        let json = r#"{"shuttle_mode": "endgame: game over"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.shuttle_mode, Some(ShuttleMode::Endgame));
        assert_eq!(ShuttleMode::Endgame.label(), "Game over");
    }

    #[test]
    fn test_unknown_enum_values() {
        let json = r#"{"security_level": "delta", "shuttle_mode": "panic"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.security_level, Some(SecurityLevel::Unknown));
        assert_eq!(ts.shuttle_mode, Some(ShuttleMode::Unknown));
    }

    #[test]
    fn test_no_warning_is_green() {
        let json = r#"{"security_level": "no_warning"}"#;
        let ts: TopicStatus = serde_json::from_str(json).unwrap();

        assert_eq!(ts.security_level, Some(SecurityLevel::NoWarning));
        assert_eq!(SecurityLevel::NoWarning.label(), "Green");
    }

    #[test]
    fn test_empty_topic_has_no_round_info() {
        let ts = TopicStatus::default();
        assert!(!ts.has_round_info());

        // Blank strings and a zero round id do not count either.
        let ts = TopicStatus {
            mode: Some(String::new()),
            map_name: Some(String::new()),
            round_id: Some(0),
            ..TopicStatus::default()
        };
        assert!(!ts.has_round_info());
    }
}
