//! Demo mode simulation engine.
//!
//! Provides plausible, time-varying hub data for demonstrating
//! StationWatch without a reachable hub.

use std::collections::HashMap;

use chrono::{SecondsFormat, Timelike, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use stationwatch_common::{GameServer, Period, PeriodStats, SecurityLevel, ShuttleMode};

use crate::message::ServerTarget;
use crate::mock;

/// Simulated round minutes that pass between two refreshes.
const MINUTES_PER_TICK: u64 = 7;

/// How fast a called shuttle's countdown drains per refresh, in seconds.
const SHUTTLE_DRAIN_PER_TICK: i64 = 90;

/// Demo simulation state.
///
/// Maintains per-server round bookkeeping and generates time-varying
/// player counts so the dashboard has something to show.
pub struct DemoSimulator {
    /// Random number generator.
    rng: SmallRng,
    /// Simulation tick counter, advanced once per fleet refresh.
    tick: u64,
    /// Baseline player count per server.
    base_players: HashMap<u64, f64>,
    /// Round bookkeeping for servers that report round info.
    rounds: HashMap<u64, RoundState>,
    /// Servers eligible for population and outage events.
    online_worlds: Vec<u64>,
    /// Servers whose codebase reports shuttle state.
    shuttle_worlds: Vec<u64>,
    /// Scheduled events (tick -> event type).
    events: Vec<ScheduledEvent>,
    /// Currently active anomalies.
    active: Vec<Anomaly>,
}

/// Per-server round bookkeeping.
#[derive(Debug, Clone)]
struct RoundState {
    /// Round identifier reported over topic.
    round_id: u64,
    /// Tick the current round started on.
    started: u64,
    /// Minutes already on the clock when the simulation began.
    base_minutes: u64,
    /// Whether this codebase reports its duration in deciseconds.
    deciseconds: bool,
}

/// A scheduled event that affects the simulation.
#[derive(Debug, Clone)]
struct ScheduledEvent {
    /// Tick when this event triggers.
    tick: u64,
    /// Type of event.
    event_type: EventType,
}

/// Types of events that can occur.
#[derive(Debug, Clone)]
enum EventType {
    /// Crew calls the evacuation shuttle.
    ShuttleCall { world_id: u64 },
    /// Round over, a new one starts and the lobby empties out.
    RoundEnd { world_id: u64 },
    /// A wave of players joins or drifts away.
    PopulationShift { world_id: u64, multiplier: f64 },
    /// Server stops reporting to the hub.
    Outage { world_id: u64 },
    /// Server resumes reporting after an outage.
    Recovery { world_id: u64 },
    /// Admins raise the security level for a while.
    SecurityEscalation { world_id: u64, level: SecurityLevel },
}

/// An active anomaly affecting generated values.
#[derive(Debug, Clone)]
struct Anomaly {
    /// When this anomaly started.
    start_tick: u64,
    /// How long it lasts.
    duration_ticks: u64,
    /// Type of anomaly.
    anomaly_type: AnomalyType,
}

#[derive(Debug, Clone)]
enum AnomalyType {
    /// Shuttle called; countdown drains until the round ends.
    ShuttleCalled { world_id: u64, timer_secs: i64 },
    /// Population scaled by a factor.
    PopulationShift { world_id: u64, multiplier: f64 },
    /// Hub record frozen at the moment contact was lost.
    Silent { world_id: u64, since: String },
    /// Elevated security level.
    Elevated { world_id: u64, level: SecurityLevel },
}

impl DemoSimulator {
    /// Create a new demo simulator seeded from the mock fleet.
    pub fn new() -> Self {
        let mut sim = Self {
            rng: SmallRng::from_os_rng(),
            tick: 0,
            base_players: HashMap::new(),
            rounds: HashMap::new(),
            online_worlds: Vec::new(),
            shuttle_worlds: Vec::new(),
            events: Vec::new(),
            active: Vec::new(),
        };

        for server in mock::fleet() {
            sim.base_players
                .insert(server.world_id, server.players as f64);
            if server.online {
                sim.online_worlds.push(server.world_id);
            }

            let Some(topic) = &server.topic_status else {
                continue;
            };

            // tg-derived codebases report round time in deciseconds
            let deciseconds = topic
                .version
                .as_deref()
                .is_some_and(|v| v.contains("/tg/"));
            let base_minutes = match topic.round_duration {
                Some(d) if deciseconds => (d / 600.0).max(0.0) as u64,
                Some(d) => (d / 60.0).max(0.0) as u64,
                None => 0,
            };
            sim.rounds.insert(
                server.world_id,
                RoundState {
                    round_id: topic.round_id.unwrap_or(90_000 + server.world_id),
                    started: 0,
                    base_minutes,
                    deciseconds,
                },
            );

            if topic.shuttle_mode.is_some() {
                sim.shuttle_worlds.push(server.world_id);
            }

            // A fleet entry that starts mid-evacuation keeps evacuating
            if let Some(timer) = topic.shuttle_timer
                && topic.shuttle_mode == Some(ShuttleMode::Called)
            {
                sim.active.push(Anomaly {
                    start_tick: 0,
                    duration_ticks: u64::MAX,
                    anomaly_type: AnomalyType::ShuttleCalled {
                        world_id: server.world_id,
                        timer_secs: timer as i64,
                    },
                });
                sim.events.push(ScheduledEvent {
                    tick: 3,
                    event_type: EventType::RoundEnd {
                        world_id: server.world_id,
                    },
                });
            }
        }

        sim.schedule_random_events(0, 20);
        sim
    }

    /// Advance the simulation and return the current fleet.
    pub fn servers(&mut self) -> Vec<GameServer> {
        self.tick += 1;
        self.process_events();
        self.fleet_now()
    }

    /// Look up one server without advancing the clock.
    pub fn server(&mut self, target: &ServerTarget) -> Result<GameServer, String> {
        self.find(target)
    }

    /// Stats for one server, shaped around its baseline population.
    pub fn server_stats(
        &mut self,
        target: &ServerTarget,
        period: Period,
    ) -> Result<PeriodStats, String> {
        let server = self.find(target)?;
        let base = self
            .base_players
            .get(&server.world_id)
            .copied()
            .unwrap_or(server.players as f64);
        Ok(mock::period_stats(period, base.max(1.0)))
    }

    /// Hub-wide stats, shaped around the whole fleet's baseline.
    pub fn global_stats(&mut self, period: Period) -> PeriodStats {
        let total: f64 = self.base_players.values().sum();
        mock::period_stats(period, total.max(1.0))
    }

    /// Process events for the current tick.
    fn process_events(&mut self) {
        let triggered: Vec<_> = self
            .events
            .iter()
            .filter(|e| e.tick <= self.tick)
            .cloned()
            .collect();
        self.events.retain(|e| e.tick > self.tick);

        for event in triggered {
            match event.event_type {
                EventType::ShuttleCall { world_id } => {
                    let timer = self.rng.random_range(280..=420);
                    self.active.push(Anomaly {
                        start_tick: self.tick,
                        duration_ticks: u64::MAX, // until RoundEnd
                        anomaly_type: AnomalyType::ShuttleCalled {
                            world_id,
                            timer_secs: timer,
                        },
                    });
                }
                EventType::RoundEnd { world_id } => {
                    if let Some(round) = self.rounds.get_mut(&world_id) {
                        round.round_id += 1;
                        round.started = self.tick;
                        round.base_minutes = 0;
                    }
                    self.active.retain(|a| {
                        !matches!(&a.anomaly_type, AnomalyType::ShuttleCalled { world_id: w, .. }
                            if *w == world_id)
                    });
                    // Lobby empties out, then the next round fills back up
                    let dip = self.rng.random_range(0.4..0.7);
                    self.active.push(Anomaly {
                        start_tick: self.tick,
                        duration_ticks: self.rng.random_range(1..=2),
                        anomaly_type: AnomalyType::PopulationShift {
                            world_id,
                            multiplier: dip,
                        },
                    });
                }
                EventType::PopulationShift {
                    world_id,
                    multiplier,
                } => {
                    self.active.push(Anomaly {
                        start_tick: self.tick,
                        duration_ticks: self.rng.random_range(3..=8),
                        anomaly_type: AnomalyType::PopulationShift {
                            world_id,
                            multiplier,
                        },
                    });
                }
                EventType::Outage { world_id } => {
                    // Pretend the hub already missed a few polls
                    let since = (Utc::now() - chrono::Duration::minutes(10))
                        .to_rfc3339_opts(SecondsFormat::Secs, true);
                    self.active.push(Anomaly {
                        start_tick: self.tick,
                        duration_ticks: u64::MAX, // until Recovery
                        anomaly_type: AnomalyType::Silent { world_id, since },
                    });
                }
                EventType::Recovery { world_id } => {
                    self.active.retain(|a| {
                        !matches!(&a.anomaly_type, AnomalyType::Silent { world_id: w, .. }
                            if *w == world_id)
                    });
                }
                EventType::SecurityEscalation { world_id, level } => {
                    self.active.push(Anomaly {
                        start_tick: self.tick,
                        duration_ticks: self.rng.random_range(4..=10),
                        anomaly_type: AnomalyType::Elevated { world_id, level },
                    });
                }
            }
        }

        // Remove expired anomalies
        self.active.retain(|a| {
            self.tick < a.start_tick.saturating_add(a.duration_ticks)
        });

        // Schedule more events if we're running low
        if self.events.len() < 3 {
            self.schedule_random_events(self.tick, 20);
        }
    }

    /// Schedule random events for the future.
    fn schedule_random_events(&mut self, start_tick: u64, range: u64) {
        let num_events = self.rng.random_range(2..=4);

        for _ in 0..num_events {
            let tick = start_tick + self.rng.random_range(1..range);
            let event_type = match self.rng.random_range(0..10) {
                0..=3 => {
                    let world_id = self.pick(&self.online_worlds.clone());
                    EventType::PopulationShift {
                        world_id,
                        multiplier: self.rng.random_range(1.2..1.8),
                    }
                }
                4..=6 => {
                    let world_id = self.pick(&self.shuttle_worlds.clone());
                    // Round ends a few ticks after the shuttle is called
                    self.events.push(ScheduledEvent {
                        tick: tick + self.rng.random_range(3..=5),
                        event_type: EventType::RoundEnd { world_id },
                    });
                    EventType::ShuttleCall { world_id }
                }
                7 => {
                    let world_id = self.pick(&self.online_worlds.clone());
                    // Schedule it to come back
                    self.events.push(ScheduledEvent {
                        tick: tick + self.rng.random_range(3..=8),
                        event_type: EventType::Recovery { world_id },
                    });
                    EventType::Outage { world_id }
                }
                _ => {
                    let world_id = self.pick(&self.shuttle_worlds.clone());
                    let level = if self.rng.random_range(0..3) == 0 {
                        SecurityLevel::Red
                    } else {
                        SecurityLevel::Blue
                    };
                    EventType::SecurityEscalation { world_id, level }
                }
            };

            self.events.push(ScheduledEvent { tick, event_type });
        }

        self.events.sort_by_key(|e| e.tick);
    }

    /// Pick a random world id from a candidate list.
    fn pick(&mut self, worlds: &[u64]) -> u64 {
        if worlds.is_empty() {
            return 0;
        }
        worlds[self.rng.random_range(0..worlds.len())]
    }

    /// Build the fleet at the current tick without advancing.
    fn fleet_now(&mut self) -> Vec<GameServer> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut servers = mock::fleet();

        for server in &mut servers {
            if !server.online {
                continue;
            }

            // A silent server's hub record stays frozen at the last poll
            if let Some(since) = self.silent_since(server.world_id) {
                server.updated_at = since;
                continue;
            }

            let players = self.population(server.world_id);
            server.players = players;
            server.status = format!(
                "<b>{}</b> | Round in progress | {} players",
                server.name, players
            );
            server.updated_at = now.clone();

            let Some(topic) = server.topic_status.as_mut() else {
                continue;
            };

            if let Some(round) = self.rounds.get(&server.world_id) {
                let minutes =
                    round.base_minutes + (self.tick - round.started) * MINUTES_PER_TICK;
                topic.round_duration = Some(if round.deciseconds {
                    (minutes * 600) as f64
                } else {
                    (minutes * 60) as f64
                });
                if topic.round_id.is_some() {
                    topic.round_id = Some(round.round_id);
                }
            }

            for anomaly in &self.active {
                match &anomaly.anomaly_type {
                    AnomalyType::Elevated { world_id, level }
                        if *world_id == server.world_id =>
                    {
                        topic.security_level = Some(*level);
                    }
                    AnomalyType::ShuttleCalled {
                        world_id,
                        timer_secs,
                    } if *world_id == server.world_id => {
                        let elapsed = (self.tick - anomaly.start_tick) as i64;
                        let remaining = timer_secs - elapsed * SHUTTLE_DRAIN_PER_TICK;
                        if remaining > 0 {
                            topic.shuttle_mode = Some(ShuttleMode::Called);
                            topic.shuttle_timer = Some(remaining as f64);
                        } else {
                            topic.shuttle_mode = Some(ShuttleMode::Docked);
                            topic.shuttle_timer = None;
                        }
                    }
                    _ => {}
                }
            }

            // Outside an evacuation the shuttle sits at the station
            if topic.shuttle_mode.is_some()
                && !self.active.iter().any(|a| {
                    matches!(&a.anomaly_type, AnomalyType::ShuttleCalled { world_id, .. }
                        if *world_id == server.world_id)
                })
            {
                topic.shuttle_mode = Some(ShuttleMode::Idle);
                topic.shuttle_timer = None;
            }
        }

        servers
    }

    /// Current player count for a server.
    fn population(&mut self, world_id: u64) -> u32 {
        let base = *self.base_players.get(&world_id).unwrap_or(&20.0);
        let mut value = base * diurnal_factor(Utc::now().hour());

        for anomaly in &self.active {
            if let AnomalyType::PopulationShift {
                world_id: w,
                multiplier,
            } = &anomaly.anomaly_type
                && *w == world_id
            {
                value *= multiplier;
            }
        }

        let noise = self.rng.random_range(-3.0..3.0);
        (value + noise).max(0.0).round() as u32
    }

    /// Frozen hub timestamp for a server in outage, if any.
    fn silent_since(&self, world_id: u64) -> Option<String> {
        self.active.iter().find_map(|a| {
            if let AnomalyType::Silent { world_id: w, since } = &a.anomaly_type
                && *w == world_id
            {
                Some(since.clone())
            } else {
                None
            }
        })
    }

    /// Find one server in the current fleet snapshot.
    fn find(&mut self, target: &ServerTarget) -> Result<GameServer, String> {
        let fleet = self.fleet_now();
        match target {
            ServerTarget::Id(id) => fleet.into_iter().find(|s| s.world_id == *id),
            ServerTarget::Address { host, port } => fleet.into_iter().find(|s| {
                s.host_port()
                    .is_some_and(|(h, p)| h == host.as_str() && p == *port)
            }),
        }
        .ok_or_else(|| format!("no demo server matches {}", target))
    }
}

impl Default for DemoSimulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Population factor for an hour of the day, peaking in the evening.
fn diurnal_factor(hour: u32) -> f64 {
    let phase = (hour as f64 - 20.0) / 24.0 * std::f64::consts::TAU;
    0.7 + 0.3 * phase.cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_simulator_generates_fleet() {
        let mut sim = DemoSimulator::new();
        let servers = sim.servers();

        assert!(!servers.is_empty());
        assert!(servers.iter().any(|s| s.online));
        assert!(servers.iter().any(|s| !s.online));
        assert!(servers.iter().any(|s| s.topic_status.is_some()));
    }

    #[test]
    fn test_demo_round_clock_advances() {
        let mut sim = DemoSimulator::new();

        let duration_at = |servers: &[GameServer], id: u64| {
            servers
                .iter()
                .find(|s| s.world_id == id)
                .and_then(|s| s.topic_status.as_ref())
                .and_then(|t| t.round_duration)
        };

        let first = sim.servers();
        let second = sim.servers();

        // Unless a round ended in between, the clock only moves forward
        if let (Some(a), Some(b)) = (duration_at(&first, 1), duration_at(&second, 1))
            && b >= a
        {
            assert!(b - a >= (MINUTES_PER_TICK * 600) as f64);
        }
    }

    #[test]
    fn test_demo_lookup_by_id_and_address() {
        let mut sim = DemoSimulator::new();
        let servers = sim.servers();
        let known = &servers[0];

        assert!(sim.server(&ServerTarget::Id(known.world_id)).is_ok());

        if let Some((host, port)) = known.host_port() {
            let target = ServerTarget::Address {
                host: host.to_string(),
                port,
            };
            assert!(sim.server(&target).is_ok());
        }

        assert!(sim.server(&ServerTarget::Id(999)).is_err());
    }

    #[test]
    fn test_demo_stats_track_fleet_size() {
        let mut sim = DemoSimulator::new();
        let single = sim
            .server_stats(&ServerTarget::Id(1), Period::Week)
            .unwrap();
        let global = sim.global_stats(Period::Week);

        assert!(global.avg_players > single.avg_players);
        assert_eq!(global.hourly_averages.len(), 24);
    }
}
