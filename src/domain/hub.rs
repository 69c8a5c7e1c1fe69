//! Real-time broadcast hub.
//!
//! [`Hub`] is a cheap, cloneable handle to a single coordinator task that
//! exclusively owns the [`Registry`] of live connections. Registration,
//! removal, and broadcast are sent to the coordinator as [`HubCommand`]s
//! over one unbounded channel, so their effects never interleave and no
//! caller ever blocks on a slow consumer.
//!
//! Each registered [`Member`] owns the producer half of a bounded outbound
//! queue. Broadcast performs a non-blocking `try_send` into every queue; a
//! queue that is full (or already closed) gets its connection evicted and
//! its queue closed, without delaying delivery to anyone else.

use std::collections::HashMap;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};

use super::{ConnectionId, Event, UserId};

/// Registry entry for one admitted connection.
///
/// Dropping a `Member` drops the only producer of its outbound queue,
/// which closes the queue once the consumer has drained what is left.
#[derive(Debug)]
pub struct Member {
    id: ConnectionId,
    user_id: Option<UserId>,
    outbound: mpsc::Sender<Event>,
}

impl Member {
    /// Creates a member with a fresh id and an outbound queue holding at
    /// most `capacity` events. Returns the consumer half of the queue.
    #[must_use]
    pub fn new(user_id: Option<UserId>, capacity: usize) -> (Self, mpsc::Receiver<Event>) {
        Self::with_id(ConnectionId::new(), user_id, capacity)
    }

    /// Same as [`Member::new`] with a caller-chosen id.
    ///
    /// A zero `capacity` is raised to one.
    #[must_use]
    pub fn with_id(
        id: ConnectionId,
        user_id: Option<UserId>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Event>) {
        let (outbound, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                id,
                user_id,
                outbound,
            },
            rx,
        )
    }

    /// Connection identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Identity resolved at admission, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Result of a single fan-out pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOut {
    /// Connections the event was enqueued for.
    pub delivered: usize,
    /// Connections evicted during this pass.
    pub evicted: usize,
}

/// The set of admitted connections.
///
/// Plain synchronous state: only the hub coordinator touches it, which is
/// what makes every mutation mutually exclusive.
#[derive(Debug, Default)]
pub struct Registry {
    members: HashMap<ConnectionId, Member>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `member` unless a member with the same id is already present.
    ///
    /// Returns `true` if the member was inserted. A duplicate is dropped
    /// and the existing entry is left untouched.
    pub fn insert(&mut self, member: Member) -> bool {
        if self.members.contains_key(&member.id) {
            return false;
        }
        self.members.insert(member.id, member);
        true
    }

    /// Removes the member with the given id, closing its outbound queue.
    ///
    /// Returns `true` if a member was removed.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id).is_some()
    }

    /// Enqueues `event` for every member without waiting.
    ///
    /// Members whose queue is full or closed are evicted; the event is not
    /// delivered to them.
    pub fn fan_out(&mut self, event: &Event) -> FanOut {
        let mut result = FanOut::default();
        if self.members.is_empty() {
            return result;
        }

        let mut evicted = Vec::new();
        for member in self.members.values() {
            match member.outbound.try_send(event.clone()) {
                Ok(()) => result.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(
                        conn_id = %member.id,
                        user_id = ?member.user_id,
                        "outbound queue full, evicting slow connection"
                    );
                    evicted.push(member.id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(conn_id = %member.id, "outbound queue already closed");
                    evicted.push(member.id);
                }
            }
        }

        for id in evicted {
            if self.members.remove(&id).is_some() {
                result.evicted += 1;
            }
        }
        result
    }

    /// Returns `true` if a member with this id is registered.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    /// Number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if no member is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes every member, closing all outbound queues.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}

/// Requests processed, in arrival order, by the hub coordinator.
#[derive(Debug)]
pub enum HubCommand {
    /// Admit a connection.
    Register(Member),
    /// Remove a connection and close its queue.
    Unregister(ConnectionId),
    /// Fan an event out to every admitted connection.
    Broadcast(Event),
    /// Report the current registry size.
    Count {
        /// Reply channel.
        reply: oneshot::Sender<usize>,
    },
    /// Close every queue and stop the coordinator.
    Shutdown,
}

/// Handle to the broadcast hub coordinator.
///
/// Every method is a non-blocking send to the coordinator. Once the
/// coordinator has stopped (after [`Hub::shutdown`], or when every handle
/// is dropped) further requests are ignored.
#[derive(Debug, Clone)]
pub struct Hub {
    commands: mpsc::UnboundedSender<HubCommand>,
    queue_capacity: usize,
}

impl Hub {
    /// Spawns the coordinator on the current Tokio runtime and returns a
    /// handle to it. `queue_capacity` is the bound K of every outbound
    /// queue created through [`Hub::admit`] (raised to one if zero).
    #[must_use]
    pub fn start(queue_capacity: usize) -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_coordinator(rx));
        Self {
            commands,
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Outbound queue capacity used for admitted connections.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Creates a member with this hub's queue capacity and registers it.
    ///
    /// Returns the new connection id and the consumer half of its queue.
    #[must_use]
    pub fn admit(&self, user_id: Option<UserId>) -> (ConnectionId, mpsc::Receiver<Event>) {
        let (member, rx) = Member::new(user_id, self.queue_capacity);
        let id = member.id();
        self.register(member);
        (id, rx)
    }

    /// Registers a member. Re-registering a present id is a no-op.
    pub fn register(&self, member: Member) {
        self.send(HubCommand::Register(member));
    }

    /// Unregisters a connection and closes its queue. Idempotent.
    pub fn unregister(&self, id: ConnectionId) {
        self.send(HubCommand::Unregister(id));
    }

    /// Fans `event` out to every connection registered when the
    /// coordinator processes the request. Never blocks and never fails.
    pub fn broadcast(&self, event: Event) {
        self.send(HubCommand::Broadcast(event));
    }

    /// Returns the number of registered connections, after every request
    /// sent earlier from this task has been applied. Returns zero once the
    /// coordinator has stopped.
    pub async fn connection_count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        self.send(HubCommand::Count { reply });
        rx.await.unwrap_or(0)
    }

    /// Closes every outbound queue and stops the coordinator.
    pub fn shutdown(&self) {
        self.send(HubCommand::Shutdown);
    }

    fn send(&self, command: HubCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!("hub coordinator stopped, request ignored");
        }
    }
}

/// Coordinator loop: the only code that ever touches the [`Registry`].
async fn run_coordinator(mut commands: mpsc::UnboundedReceiver<HubCommand>) {
    let mut registry = Registry::new();
    tracing::debug!("hub coordinator started");

    while let Some(command) = commands.recv().await {
        match command {
            HubCommand::Register(member) => {
                let id = member.id();
                let user_id = member.user_id();
                if registry.insert(member) {
                    tracing::debug!(conn_id = %id, ?user_id, total = registry.len(), "connection registered");
                }
            }
            HubCommand::Unregister(id) => {
                if registry.remove(id) {
                    tracing::debug!(conn_id = %id, total = registry.len(), "connection unregistered");
                }
            }
            HubCommand::Broadcast(event) => {
                let outcome = registry.fan_out(&event);
                tracing::trace!(
                    delivered = outcome.delivered,
                    evicted = outcome.evicted,
                    "event broadcast"
                );
            }
            HubCommand::Count { reply } => {
                let _ = reply.send(registry.len());
            }
            HubCommand::Shutdown => break,
        }
    }

    let remaining = registry.len();
    registry.clear();
    tracing::info!(closed = remaining, "hub coordinator stopped");
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn event(text: &str) -> Event {
        Event::from_text(text)
    }

    async fn recv(rx: &mut mpsc::Receiver<Event>) -> Option<Event> {
        let Ok(received) = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await else {
            panic!("timed out waiting on outbound queue");
        };
        received
    }

    #[test]
    fn registry_insert_is_idempotent() {
        let mut registry = Registry::new();
        let id = ConnectionId::new();
        let (first, _rx1) = Member::with_id(id, None, 4);
        let (dup, _rx2) = Member::with_id(id, None, 4);

        assert!(registry.insert(first));
        assert!(!registry.insert(dup));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(id));
    }

    #[test]
    fn registry_remove_is_idempotent() {
        let mut registry = Registry::new();
        let (member, _rx) = Member::new(None, 4);
        let id = member.id();
        registry.insert(member);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn fan_out_on_empty_registry_does_nothing() {
        let mut registry = Registry::new();
        assert_eq!(registry.fan_out(&event("x")), FanOut::default());
    }

    #[test]
    fn remove_closes_queue() {
        let mut registry = Registry::new();
        let (member, mut rx) = Member::new(None, 4);
        let id = member.id();
        registry.insert(member);
        registry.remove(id);
        assert!(rx.try_recv().is_err());
        assert!(rx.is_closed());
    }

    #[test]
    fn full_queue_is_evicted_without_affecting_others() {
        let mut registry = Registry::new();
        let (slow, mut slow_rx) = Member::new(None, 2);
        let (fast, mut fast_rx) = Member::new(None, 2);
        let slow_id = slow.id();
        let fast_id = fast.id();
        registry.insert(slow);
        registry.insert(fast);

        for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
            let outcome = registry.fan_out(&event(text));
            if i < 2 {
                assert_eq!(outcome, FanOut { delivered: 2, evicted: 0 });
            }
            // The fast consumer drains after every broadcast.
            assert!(fast_rx.try_recv().is_ok());
        }

        assert!(!registry.contains(slow_id));
        assert!(registry.contains(fast_id));

        let outcome = registry.fan_out(&event("d"));
        assert_eq!(outcome, FanOut { delivered: 1, evicted: 0 });

        // The evicted consumer sees what was queued, then a closed queue.
        assert_eq!(slow_rx.try_recv().ok(), Some(event("a")));
        assert_eq!(slow_rx.try_recv().ok(), Some(event("b")));
        assert!(slow_rx.try_recv().is_err());
        assert!(slow_rx.is_closed());
    }

    #[test]
    fn closed_queue_is_evicted() {
        let mut registry = Registry::new();
        let (member, rx) = Member::new(None, 2);
        let id = member.id();
        registry.insert(member);
        drop(rx);

        let outcome = registry.fan_out(&event("x"));
        assert_eq!(outcome, FanOut { delivered: 0, evicted: 1 });
        assert!(!registry.contains(id));
    }

    #[tokio::test]
    async fn register_and_unregister_track_count() {
        let hub = Hub::start(8);
        let (a, _rx_a) = hub.admit(None);
        let (b, _rx_b) = hub.admit(Some(UserId::new()));
        assert_eq!(hub.connection_count().await, 2);

        hub.unregister(a);
        hub.unregister(a);
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(b);
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn re_registering_keeps_original_entry() {
        let hub = Hub::start(8);
        let id = ConnectionId::new();
        let (first, mut first_rx) = Member::with_id(id, None, 8);
        let (dup, mut dup_rx) = Member::with_id(id, None, 8);

        hub.register(first);
        hub.register(dup);
        assert_eq!(hub.connection_count().await, 1);

        hub.broadcast(event("hello"));
        assert_eq!(recv(&mut first_rx).await, Some(event("hello")));
        // The rejected duplicate was dropped, closing its queue.
        assert_eq!(recv(&mut dup_rx).await, None);
    }

    #[tokio::test]
    async fn broadcast_on_empty_hub_is_noop() {
        let hub = Hub::start(8);
        hub.broadcast(event("nobody"));
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn zero_capacity_admits_with_queue_of_one() {
        let hub = Hub::start(0);
        assert_eq!(hub.queue_capacity(), 1);

        let (_id, mut rx) = hub.admit(None);
        hub.broadcast(event("kept"));
        hub.broadcast(event("overflow"));
        assert_eq!(hub.connection_count().await, 0);
        assert_eq!(recv(&mut rx).await, Some(event("kept")));
        assert_eq!(recv(&mut rx).await, None);
    }

    #[tokio::test]
    async fn slow_connection_is_evicted_on_third_broadcast() {
        let hub = Hub::start(2);
        let (_id, mut rx) = hub.admit(None);

        hub.broadcast(event("1"));
        hub.broadcast(event("2"));
        assert_eq!(hub.connection_count().await, 1);

        hub.broadcast(event("3"));
        assert_eq!(hub.connection_count().await, 0);

        hub.broadcast(event("4"));
        assert_eq!(recv(&mut rx).await, Some(event("1")));
        assert_eq!(recv(&mut rx).await, Some(event("2")));
        assert_eq!(recv(&mut rx).await, None);
    }

    #[tokio::test]
    async fn events_arrive_in_broadcast_order() {
        let hub = Hub::start(16);
        let (_a, mut rx_a) = hub.admit(None);
        let (_b, mut rx_b) = hub.admit(None);

        hub.broadcast(event("A"));
        hub.broadcast(event("B"));

        for rx in [&mut rx_a, &mut rx_b] {
            assert_eq!(recv(rx).await, Some(event("A")));
            assert_eq!(recv(rx).await, Some(event("B")));
        }
    }

    #[tokio::test]
    async fn unregistered_connection_receives_nothing_more() {
        let hub = Hub::start(8);
        let (id, mut rx) = hub.admit(None);
        hub.broadcast(event("before"));
        hub.unregister(id);
        hub.broadcast(event("after"));

        assert_eq!(recv(&mut rx).await, Some(event("before")));
        assert_eq!(recv(&mut rx).await, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_admissions_and_removals_leave_empty_registry() {
        const N: usize = 200;
        let hub = Hub::start(4);

        let mut joins = Vec::with_capacity(N);
        for _ in 0..N {
            let hub = hub.clone();
            joins.push(tokio::spawn(async move { hub.admit(None) }));
        }
        let mut admitted = Vec::with_capacity(N);
        for join in joins {
            let Ok(pair) = join.await else {
                panic!("admission task failed");
            };
            admitted.push(pair);
        }
        assert_eq!(hub.connection_count().await, N);

        let mut joins = Vec::with_capacity(N);
        for (id, _rx) in &admitted {
            let hub = hub.clone();
            let id = *id;
            joins.push(tokio::spawn(async move { hub.unregister(id) }));
        }
        for join in joins {
            assert!(join.await.is_ok());
        }
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn shutdown_closes_every_queue() {
        let hub = Hub::start(8);
        let (_a, mut rx_a) = hub.admit(None);
        let (_b, mut rx_b) = hub.admit(None);

        hub.shutdown();
        assert_eq!(recv(&mut rx_a).await, None);
        assert_eq!(recv(&mut rx_b).await, None);
        assert_eq!(hub.connection_count().await, 0);

        // Requests after shutdown are ignored.
        hub.broadcast(event("late"));
        let (_c, mut rx_c) = hub.admit(None);
        assert_eq!(recv(&mut rx_c).await, None);
    }
}
