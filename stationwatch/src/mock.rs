//! Mock hub data generator for testing.
//!
//! Provides functions to generate realistic server and stats payloads
//! without talking to an actual hub.

use chrono::{Duration, SecondsFormat, Utc};

use stationwatch_common::{
    GameServer, HistoryPoint, Period, PeriodStats, SecurityLevel, ShuttleMode, TopicStatus,
};

/// Current time as the hub would report it.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Generate a mock server entry.
pub fn game_server(world_id: u64, name: &str, players: u32) -> GameServer {
    GameServer {
        address: format!("game{}.example.com:{}", world_id, 1000 + world_id),
        world_id,
        name: name.to_string(),
        description: format!("{} is a Space Station 13 server", name),
        status: format!("<b>{}</b> | Round in progress | {} players", name, players),
        topic_status: None,
        players,
        updated_at: now_iso(),
        online: true,
    }
}

/// Round info in the style of a /tg/-derived codebase.
///
/// Reports its round duration in deciseconds, above the detection
/// threshold for any round older than 18 minutes.
pub fn tg_topic(round_minutes: i64) -> TopicStatus {
    TopicStatus {
        mode: Some("dynamic".to_string()),
        map_name: Some("MetaStation".to_string()),
        map: None,
        public_address: None,
        round_id: Some(238_000 + round_minutes as u64),
        round_duration: Some((round_minutes * 600) as f64),
        security_level: Some(SecurityLevel::Blue),
        version: Some("/tg/station revision: 9f2c1ab".to_string()),
        popcap: Some(90),
        admins: Some(3),
        shuttle_mode: Some(ShuttleMode::Idle),
        shuttle_timer: None,
    }
}

/// Round info in the style of a Goonstation codebase.
///
/// Reports the map under the legacy `map` key and the duration in
/// plain seconds.
pub fn goon_topic(round_minutes: i64) -> TopicStatus {
    TopicStatus {
        mode: Some("secret".to_string()),
        map_name: None,
        map: Some("Cogmap 2".to_string()),
        public_address: None,
        round_id: None,
        round_duration: Some((round_minutes * 60) as f64),
        security_level: Some(SecurityLevel::Green),
        version: Some("Goonstation 13".to_string()),
        popcap: None,
        admins: Some(1),
        shuttle_mode: None,
        shuttle_timer: None,
    }
}

/// A fleet of mock servers with varied topic shapes.
pub fn fleet() -> Vec<GameServer> {
    let mut paradise = game_server(1, "Paradise Station", 64);
    paradise.topic_status = Some(tg_topic(95));

    let mut goon = game_server(2, "Goonstation Classic", 41);
    goon.topic_status = Some(goon_topic(42));

    let mut colonial = game_server(3, "CM-SS13 Colonial Marines", 88);
    let mut cm_topic = tg_topic(130);
    cm_topic.mode = Some("distress signal".to_string());
    cm_topic.map_name = Some("LV-624".to_string());
    cm_topic.security_level = Some(SecurityLevel::Red);
    cm_topic.shuttle_mode = Some(ShuttleMode::Called);
    cm_topic.shuttle_timer = Some(303.0);
    colonial.topic_status = Some(cm_topic);

    let bare = game_server(4, "Quiet Outpost", 3);

    let mut closed = game_server(5, "Midnight Station", 0);
    closed.online = false;
    closed.status = String::new();

    vec![paradise, goon, colonial, bare, closed]
}

/// Generate plausible stats for a period.
///
/// Hourly averages follow a diurnal curve peaking in the evening (UTC),
/// weekday averages peak on the weekend, and the history is hourly
/// samples counting back from now.
pub fn period_stats(period: Period, base_players: f64) -> PeriodStats {
    let hourly_averages: Vec<f64> = (0..24)
        .map(|h| {
            let phase = (h as f64 - 20.0) / 24.0 * std::f64::consts::TAU;
            base_players * (0.7 + 0.3 * phase.cos())
        })
        .collect();

    let weekday_averages: Vec<f64> = (0..7)
        .map(|d| {
            let weekend_boost = if d == 0 || d == 6 { 1.25 } else { 1.0 };
            base_players * weekend_boost
        })
        .collect();

    let points = history_len(period);
    let now = Utc::now();
    let history: Vec<HistoryPoint> = (0..points)
        .rev()
        .map(|i| {
            let at = now - Duration::hours(i as i64);
            let hour = (at.timestamp() / 3600).rem_euclid(24) as usize;
            HistoryPoint {
                timestamp: at.to_rfc3339_opts(SecondsFormat::Secs, true),
                players: hourly_averages[hour],
            }
        })
        .collect();

    let max = history.iter().map(|p| p.players).fold(0.0, f64::max);
    let min = history.iter().map(|p| p.players).fold(f64::INFINITY, f64::min);
    let avg = if history.is_empty() {
        0.0
    } else {
        history.iter().map(|p| p.players).sum::<f64>() / history.len() as f64
    };

    PeriodStats {
        period,
        total_records: points as u64 * 60,
        avg_players: avg,
        max_players: max.round() as u32,
        min_players: if min.is_finite() { min.round() as u32 } else { 0 },
        weekday_averages,
        hourly_averages,
        history,
    }
    .normalize()
}

/// How many hourly history samples a period covers.
fn history_len(period: Period) -> usize {
    match period {
        Period::Day => 24,
        Period::Week => 24 * 7,
        Period::Month => 24 * 30,
        Period::Year => 24 * 90,
        Period::All => 24 * 120,
    }
}
