//! The plaintext TCP link session.
//!
//! A companion tool and this CLI coordinate over bare newline-separated
//! tokens on localhost: we listen on one well-known port and probe two
//! peer ports. `PING` refreshes the keepalive clock, `STOP` ends the
//! session, `DISCONNECT` drops the peer but keeps listening. Everything
//! is non-blocking and polled on a fixed tick; socket errors are
//! swallowed best-effort, and a failed send counts as a local
//! disconnect.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::time::{Duration, Instant};

/// Port this side listens on.
pub const LISTEN_PORT: u16 = 9334;

/// Ports a companion may be listening on.
pub const PEER_PORTS: [u16; 2] = [9333, 9335];

/// Poll tick.
pub const TICK: Duration = Duration::from_millis(100);

/// Interval between outgoing pings.
pub const PING_INTERVAL: Duration = Duration::from_secs(10);

/// Handshake and keepalive timeout.
pub const TIMEOUT: Duration = Duration::from_secs(60);

/// A protocol token. Anything else on the wire is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Keepalive.
    Ping,
    /// End the session.
    Stop,
    /// Drop the peer, keep listening.
    Disconnect,
}

impl Token {
    /// Parses one whitespace-delimited token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "PING" => Some(Token::Ping),
            "STOP" => Some(Token::Stop),
            "DISCONNECT" => Some(Token::Disconnect),
            _ => None,
        }
    }

    /// The wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Ping => "PING",
            Token::Stop => "STOP",
            Token::Disconnect => "DISCONNECT",
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The peer asked us to stop.
    Stopped,
    /// A connected peer went silent past the keepalive timeout.
    TimedOut,
    /// No peer connected within the handshake timeout.
    NoPeer,
}

/// Session tuning; the defaults are the protocol constants, tests shrink
/// them.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Port to listen on; 0 binds an ephemeral port.
    pub listen_port: u16,
    /// Peer ports to probe at startup.
    pub peer_ports: Vec<u16>,
    /// Poll tick.
    pub tick: Duration,
    /// Outgoing ping interval.
    pub ping_interval: Duration,
    /// Handshake and keepalive timeout.
    pub timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            listen_port: LISTEN_PORT,
            peer_ports: PEER_PORTS.to_vec(),
            tick: TICK,
            ping_interval: PING_INTERVAL,
            timeout: TIMEOUT,
        }
    }
}

/// One link session: a listener, at most one peer, and the clocks.
pub struct LinkSession {
    listener: TcpListener,
    peer: Option<TcpStream>,
    last_recv: Instant,
    last_ping: Instant,
    config: LinkConfig,
}

impl LinkSession {
    /// Binds the listener (non-blocking) and probes the peer ports.
    pub fn bind(config: LinkConfig) -> std::io::Result<Self> {
        let listener =
            TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, config.listen_port)))?;
        listener.set_nonblocking(true)?;
        let mut session = Self {
            listener,
            peer: None,
            last_recv: Instant::now(),
            last_ping: Instant::now(),
            config,
        };
        session.probe_peers();
        Ok(session)
    }

    /// The bound listener port.
    pub fn local_port(&self) -> u16 {
        self.listener
            .local_addr()
            .map(|a| a.port())
            .unwrap_or_default()
    }

    /// True while a peer is attached.
    pub fn connected(&self) -> bool {
        self.peer.is_some()
    }

    /// Best-effort outbound connect to each peer port, first hit wins.
    fn probe_peers(&mut self) {
        let ports: Vec<u16> = self.config.peer_ports.clone();
        for port in ports {
            let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
            if let Ok(stream) = TcpStream::connect_timeout(&addr, self.config.tick) {
                if stream.set_nonblocking(true).is_ok() {
                    self.attach(stream);
                    return;
                }
            }
        }
    }

    fn attach(&mut self, stream: TcpStream) {
        self.peer = Some(stream);
        self.last_recv = Instant::now();
        self.last_ping = Instant::now();
    }

    /// Runs the session until a terminal outcome.
    pub fn run(&mut self) -> LinkOutcome {
        let mut waiting_since = Instant::now();
        loop {
            std::thread::sleep(self.config.tick);
            self.accept_pending();

            if self.peer.is_none() {
                if waiting_since.elapsed() >= self.config.timeout {
                    return LinkOutcome::NoPeer;
                }
                continue;
            }

            match self.drain_tokens() {
                Some(Token::Stop) => return LinkOutcome::Stopped,
                Some(Token::Disconnect) => {
                    // The handshake window restarts for a reconnect.
                    self.peer = None;
                    waiting_since = Instant::now();
                    continue;
                }
                _ => {}
            }
            if self.peer.is_none() {
                // Read error or clean close; back to listening.
                waiting_since = Instant::now();
                continue;
            }
            if self.last_recv.elapsed() >= self.config.timeout {
                self.peer = None;
                return LinkOutcome::TimedOut;
            }
            if self.last_ping.elapsed() >= self.config.ping_interval {
                self.send(Token::Ping);
            }
        }
    }

    /// Accepts one pending inbound connection when unattached.
    fn accept_pending(&mut self) {
        if self.peer.is_some() {
            return;
        }
        if let Ok((stream, _)) = self.listener.accept() {
            if stream.set_nonblocking(true).is_ok() {
                self.attach(stream);
            }
        }
    }

    /// Reads whatever is pending and folds it into the keepalive clock;
    /// returns the most significant token seen this tick.
    fn drain_tokens(&mut self) -> Option<Token> {
        let stream = self.peer.as_mut()?;
        let mut buf = [0u8; 256];
        match stream.read(&mut buf) {
            Ok(0) => {
                // Peer closed.
                self.peer = None;
                None
            }
            Ok(n) => {
                self.last_recv = Instant::now();
                let text = String::from_utf8_lossy(&buf[..n]);
                let mut best = None;
                for token in text.split_whitespace().filter_map(Token::parse) {
                    match token {
                        Token::Stop => return Some(Token::Stop),
                        Token::Disconnect => best = Some(Token::Disconnect),
                        Token::Ping => best = best.or(Some(Token::Ping)),
                    }
                }
                best
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => None,
            Err(_) => {
                self.peer = None;
                None
            }
        }
    }

    /// Sends a token; a failed send is a local disconnect.
    pub fn send(&mut self, token: Token) {
        let Some(stream) = self.peer.as_mut() else {
            return;
        };
        let frame = format!("{}\n", token.as_str());
        if stream.write_all(frame.as_bytes()).is_err() {
            self.peer = None;
        } else {
            self.last_ping = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fast_config() -> LinkConfig {
        LinkConfig {
            listen_port: 0,
            peer_ports: Vec::new(),
            tick: Duration::from_millis(1),
            ping_interval: Duration::from_millis(20),
            timeout: Duration::from_millis(150),
        }
    }

    #[test]
    fn tokens_parse_exactly() {
        assert_eq!(Token::parse("PING"), Some(Token::Ping));
        assert_eq!(Token::parse("STOP"), Some(Token::Stop));
        assert_eq!(Token::parse("DISCONNECT"), Some(Token::Disconnect));
        assert_eq!(Token::parse("ping"), None);
        assert_eq!(Token::parse("HELLO"), None);
    }

    #[test]
    fn no_peer_times_out() {
        let mut session = LinkSession::bind(fast_config()).unwrap();
        assert_eq!(session.run(), LinkOutcome::NoPeer);
    }

    #[test]
    fn stop_token_ends_the_session() {
        let mut session = LinkSession::bind(fast_config()).unwrap();
        let port = session.local_port();
        let handle = std::thread::spawn(move || session.run());

        let mut client =
            TcpStream::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).unwrap();
        client.write_all(b"PING\nSTOP\n").unwrap();
        assert_eq!(handle.join().unwrap(), LinkOutcome::Stopped);
    }

    #[test]
    fn silent_peer_times_out() {
        let mut session = LinkSession::bind(fast_config()).unwrap();
        let port = session.local_port();
        let handle = std::thread::spawn(move || session.run());

        let _client =
            TcpStream::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).unwrap();
        assert_eq!(handle.join().unwrap(), LinkOutcome::TimedOut);
    }

    #[test]
    fn connected_peer_receives_pings() {
        let mut session = LinkSession::bind(fast_config()).unwrap();
        let port = session.local_port();
        let handle = std::thread::spawn(move || session.run());

        let mut client =
            TcpStream::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).unwrap();
        client
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();
        let mut buf = [0u8; 64];
        let n = client.read(&mut buf).unwrap();
        assert!(String::from_utf8_lossy(&buf[..n]).contains("PING"));

        client.write_all(b"STOP\n").unwrap();
        assert_eq!(handle.join().unwrap(), LinkOutcome::Stopped);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let mut session = LinkSession::bind(fast_config()).unwrap();
        let port = session.local_port();
        let handle = std::thread::spawn(move || session.run());

        let mut client =
            TcpStream::connect(SocketAddr::from((Ipv4Addr::LOCALHOST, port))).unwrap();
        client.write_all(b"HELLO WORLD\nSTOP\n").unwrap();
        assert_eq!(handle.join().unwrap(), LinkOutcome::Stopped);
    }
}
