//! Hub fetch tasks and timer subscriptions.
//!
//! Every fetch is tagged with the request generation captured at spawn.
//! `update()` drops any result whose generation no longer matches, so a
//! slow response can never overwrite a newer view.

use iced::{Subscription, Task};

use stationwatch_common::{HubClient, Period};

use crate::message::{Message, ServerTarget};

/// Fetch the hub server list.
pub fn fetch_servers(client: HubClient, generation: u64) -> Task<Message> {
    Task::perform(
        async move {
            client.servers().await.map_err(|e| {
                tracing::warn!(error = %e, "Server list fetch failed");
                e.to_string()
            })
        },
        move |result| Message::ServersFetched(generation, result),
    )
}

/// Fetch a single server by id or address.
pub fn fetch_server(client: HubClient, target: ServerTarget, generation: u64) -> Task<Message> {
    Task::perform(
        async move {
            let result = match &target {
                ServerTarget::Id(id) => client.server(*id).await,
                ServerTarget::Address { host, port } => {
                    client.server_by_address(host, *port).await
                }
            };
            result.map_err(|e| {
                tracing::warn!(server = %target, error = %e, "Server fetch failed");
                e.to_string()
            })
        },
        move |result| Message::ServerFetched(generation, result),
    )
}

/// Fetch per-server stats for the given period.
pub fn fetch_server_stats(
    client: HubClient,
    target: ServerTarget,
    period: Period,
    generation: u64,
) -> Task<Message> {
    Task::perform(
        async move {
            let result = match &target {
                ServerTarget::Id(id) => client.server_stats(*id, period).await,
                ServerTarget::Address { host, port } => {
                    client.server_stats_by_address(host, *port, period).await
                }
            };
            result.map_err(|e| {
                tracing::warn!(server = %target, %period, error = %e, "Stats fetch failed");
                e.to_string()
            })
        },
        move |result| Message::StatsFetched(generation, result),
    )
}

/// Fetch hub-wide stats for the given period.
pub fn fetch_global_stats(client: HubClient, period: Period, generation: u64) -> Task<Message> {
    Task::perform(
        async move {
            client.global_stats(period).await.map_err(|e| {
                tracing::warn!(%period, error = %e, "Global stats fetch failed");
                e.to_string()
            })
        },
        move |result| Message::StatsFetched(generation, result),
    )
}

/// Create a tick subscription for periodic UI updates.
pub fn tick_subscription() -> Subscription<Message> {
    iced::time::every(std::time::Duration::from_secs(1)).map(|_| Message::Tick)
}

/// Create the periodic refetch subscription for the current view.
pub fn refresh_subscription(refresh_secs: u64) -> Subscription<Message> {
    iced::time::every(std::time::Duration::from_secs(refresh_secs.max(1)))
        .map(|_| Message::Refresh)
}
