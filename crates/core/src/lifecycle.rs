//! Per-connection lifecycle state machine.
//!
//! A relay connection moves `Connecting -> Joined -> Closed`. While joined,
//! every inbound data frame is forwarded (the repeatable "forwarding" step
//! does not change state). The socket task translates transport events
//! into [`ConnectionEvent`]s and performs whatever [`Action`] the
//! transition returns.

/// Where a connection is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Upgraded but not yet registered with its channel.
    Connecting,
    /// Registered; eligible to send and receive frames.
    Joined,
    /// Deregistered. Terminal.
    Closed,
}

/// One inbound event from the transport.
///
/// `F` is the transport's frame type, `E` its error type.
#[derive(Debug)]
pub enum ConnectionEvent<F, E> {
    /// A text or binary payload to relay.
    Data(F),
    /// Ping/pong housekeeping. Answered by the transport, never relayed.
    Control,
    /// Close frame received, or the inbound stream ended.
    Close,
    /// The transport reported an error without closing.
    Error(E),
}

/// What the socket task must do in response to an event.
#[derive(Debug, PartialEq, Eq)]
pub enum Action<F, E> {
    /// Send the frame to every other open member of the channel.
    Forward(F),
    /// Log the error. Membership is unchanged.
    Report(E),
    /// Remove the connection from its channel.
    Leave,
    /// Nothing to do.
    Ignore,
}

impl Lifecycle {
    /// Transition taken once the registry has accepted the connection.
    pub fn join(self) -> Self {
        match self {
            Lifecycle::Connecting => Lifecycle::Joined,
            other => other,
        }
    }

    pub fn is_closed(self) -> bool {
        self == Lifecycle::Closed
    }

    /// Apply one inbound event.
    ///
    /// Only a close moves a joined connection to `Closed`, and it yields
    /// `Leave` exactly once; every event after that is ignored.
    pub fn on_event<F, E>(self, event: ConnectionEvent<F, E>) -> (Self, Action<F, E>) {
        match (self, event) {
            (Lifecycle::Closed, _) => (Lifecycle::Closed, Action::Ignore),

            // Never registered, so there is nothing to leave.
            (Lifecycle::Connecting, ConnectionEvent::Close) => (Lifecycle::Closed, Action::Ignore),
            (Lifecycle::Connecting, ConnectionEvent::Error(e)) => {
                (Lifecycle::Connecting, Action::Report(e))
            }
            (Lifecycle::Connecting, _) => (Lifecycle::Connecting, Action::Ignore),

            (Lifecycle::Joined, ConnectionEvent::Data(frame)) => {
                (Lifecycle::Joined, Action::Forward(frame))
            }
            (Lifecycle::Joined, ConnectionEvent::Control) => (Lifecycle::Joined, Action::Ignore),
            (Lifecycle::Joined, ConnectionEvent::Error(e)) => (Lifecycle::Joined, Action::Report(e)),
            (Lifecycle::Joined, ConnectionEvent::Close) => (Lifecycle::Closed, Action::Leave),
        }
    }
}
