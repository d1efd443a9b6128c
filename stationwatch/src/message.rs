use stationwatch_common::{GameServer, Period, PeriodStats};

/// Messages for the StationWatch application.
#[derive(Debug, Clone)]
pub enum Message {
    /// Server list fetch completed (tagged with the request generation).
    ServersFetched(u64, Result<Vec<GameServer>, String>),

    /// Single server fetch completed (tagged with the request generation).
    ServerFetched(u64, Result<GameServer, String>),

    /// Stats fetch completed (tagged with the request generation).
    StatsFetched(u64, Result<PeriodStats, String>),

    /// User selected a server from the dashboard.
    OpenServer(ServerTarget),

    /// User opened the global statistics view.
    OpenGlobalStats,

    /// User navigated back to the dashboard.
    OpenDashboard,

    /// User changed the stats period on the current view.
    SetPeriod(Period),

    /// User toggled the raw topic data panel on the server view.
    ToggleRawTopic,

    /// User toggled rendering of hub status lines on the dashboard.
    SetShowStatus(bool),

    /// User toggled visibility of offline servers on the dashboard.
    SetShowOffline(bool),

    /// User edited the address lookup field on the dashboard.
    SetAddressLookup(String),

    /// User submitted the address lookup field.
    SubmitAddressLookup,

    /// User pressed a Connect button; copies the BYOND URL.
    CopyConnectUrl(String),

    /// Periodic refetch of whatever the current view shows.
    Refresh,

    /// Tick for periodic UI updates (e.g., relative timestamps).
    Tick,

    // Settings messages
    /// Open the settings view.
    OpenSettings,

    /// Close the settings view.
    CloseSettings,

    /// Set the hub base URL.
    SetHubUrl(String),

    /// Set the refresh interval.
    SetRefreshInterval(String),

    /// Set the stale threshold.
    SetStaleThreshold(String),

    /// Save settings.
    SaveSettings,

    /// Reset settings to defaults.
    ResetSettings,
}

/// How to address a server on the hub (by world id or by host and port).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServerTarget {
    Id(u64),
    Address { host: String, port: u16 },
}

impl ServerTarget {
    pub fn from_server(server: &GameServer) -> Self {
        Self::Id(server.world_id)
    }

    /// Parse a "host:port" string as entered in the lookup field.
    pub fn parse_address(input: &str) -> Option<Self> {
        let (host, port) = input.trim().rsplit_once(':')?;
        let port: u16 = port.parse().ok()?;
        if host.is_empty() {
            return None;
        }
        Some(Self::Address {
            host: host.to_string(),
            port,
        })
    }
}

impl std::fmt::Display for ServerTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Address { host, port } => write!(f, "{host}:{port}"),
        }
    }
}
