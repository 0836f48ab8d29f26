//! Gateway client - the websocket session that delivers interactions.
//!
//! One [`GatewayClient::run`] call owns the connection for the life of the
//! process. Each session reads HELLO, identifies (or resumes), then loops
//! over heartbeats, inbound frames and shutdown. When a session ends the
//! client backs off and reconnects, resuming if the platform still knows the
//! session.

use crate::bot::Bot;
use crate::commands::Reply;
use crate::metrics;
use crate::platform::PlatformError;
use crate::platform::discord::{DiscordPlatform, to_invocation};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::{debug, error, info, trace, warn};
use warden_proto::{
    GatewayPayload, Hello, Identify, IdentifyProperties, Intents, Interaction, OpCode, ProtoError,
    Ready, Resume,
};

const GATEWAY_VERSION: u8 = 10;
const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg";
const HELLO_TIMEOUT: Duration = Duration::from_secs(15);
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] WsError),

    #[error("malformed gateway frame: {0}")]
    Proto(#[from] ProtoError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("no HELLO within {0:?}")]
    HelloTimeout(Duration),

    #[error("HELLO announced a zero heartbeat interval")]
    ZeroHeartbeat,

    #[error("expected HELLO, got opcode {0}")]
    UnexpectedFrame(u8),

    #[error("connection closed before HELLO")]
    ClosedEarly,

    #[error("heartbeat was not acknowledged")]
    Zombie,

    #[error("gateway closed the session with fatal code {code}: {reason}")]
    Fatal { code: u16, reason: String },
}

/// What to do after the gateway closes the socket with `code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Reconnect and resume the session.
    Resume,
    /// Reconnect with a fresh IDENTIFY.
    Reidentify,
    /// Stop; reconnecting cannot succeed.
    Fatal,
}

pub fn classify_close(code: u16) -> CloseAction {
    match code {
        // authentication failed, invalid shard, sharding required, invalid
        // API version, invalid or disallowed intents
        4004 | 4010..=4014 => CloseAction::Fatal,
        // invalid seq, session timed out
        4007 | 4009 => CloseAction::Reidentify,
        _ => CloseAction::Resume,
    }
}

/// Exponential reconnect delay, doubling from one second up to a minute.
#[derive(Debug, Default)]
pub struct Backoff {
    attempt: u32,
}

impl Backoff {
    pub fn next_delay(&mut self) -> Duration {
        let factor = 2u32.saturating_pow(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        INITIAL_BACKOFF.saturating_mul(factor).min(MAX_BACKOFF)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}

/// Resume bookkeeping carried across sessions.
#[derive(Debug, Default)]
struct SessionState {
    session_id: Option<String>,
    resume_url: Option<String>,
    seq: Option<u64>,
    /// Set once a session reaches READY or RESUMED.
    established: bool,
}

impl SessionState {
    fn resume(&self, token: &str) -> Option<Resume> {
        self.session_id.as_ref().map(|session_id| Resume {
            token: token.to_string(),
            session_id: session_id.clone(),
            seq: self.seq,
        })
    }

    fn on_ready(&mut self, ready: &Ready) {
        self.session_id = Some(ready.session_id.clone());
        self.resume_url = ready.resume_gateway_url.clone();
        self.established = true;
    }

    fn clear(&mut self) {
        self.session_id = None;
        self.resume_url = None;
        self.seq = None;
    }
}

enum SessionEnd {
    Shutdown,
    Reconnect,
}

pub struct GatewayClient {
    platform: Arc<DiscordPlatform>,
    bot: Arc<Bot>,
}

impl GatewayClient {
    pub fn new(platform: Arc<DiscordPlatform>, bot: Arc<Bot>) -> Self {
        Self { platform, bot }
    }

    /// Hold a gateway session open until `shutdown` fires or the platform
    /// closes the session with a fatal code.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) -> Result<(), GatewayError> {
        let default_url = match self.platform.rest().gateway_url().await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Gateway URL lookup failed, using default");
                DEFAULT_GATEWAY_URL.to_string()
            }
        };

        let mut state = SessionState::default();
        let mut backoff = Backoff::default();

        'reconnect_loop: loop {
            let url = state.resume_url.clone().unwrap_or_else(|| default_url.clone());
            info!(url = %url, resume = state.session_id.is_some(), "Connecting to gateway");

            match self.run_session(&url, &mut state, &mut shutdown).await {
                Ok(SessionEnd::Shutdown) => break 'reconnect_loop,
                Ok(SessionEnd::Reconnect) => {}
                Err(GatewayError::Fatal { code, reason }) => {
                    error!(code, reason = %reason, "Gateway closed the session permanently");
                    return Err(GatewayError::Fatal { code, reason });
                }
                Err(e) => warn!(error = %e, "Gateway session ended"),
            }

            if std::mem::take(&mut state.established) {
                backoff.reset();
            }
            let delay = jittered(backoff.next_delay());
            metrics::record_gateway_reconnect();
            info!(delay_ms = delay.as_millis() as u64, "Reconnecting to gateway");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.recv() => break 'reconnect_loop,
            }
        }

        info!("Gateway stopped");
        Ok(())
    }

    async fn run_session(
        &self,
        url: &str,
        state: &mut SessionState,
        shutdown: &mut broadcast::Receiver<()>,
    ) -> Result<SessionEnd, GatewayError> {
        let endpoint = format!("{url}/?v={GATEWAY_VERSION}&encoding=json");
        let (socket, _) = connect_async(endpoint.as_str()).await?;
        let (mut sink, mut stream) = socket.split();

        let hello = tokio::time::timeout(HELLO_TIMEOUT, read_hello(&mut stream))
            .await
            .map_err(|_| GatewayError::HelloTimeout(HELLO_TIMEOUT))??;
        let interval = heartbeat_interval(&hello)?;
        debug!(interval_ms = hello.heartbeat_interval, "Received HELLO");

        let token = self.platform.rest().token().as_str();
        let handshake = match state.resume(token) {
            Some(resume) => GatewayPayload::resume(&resume)?,
            None => GatewayPayload::identify(&Identify {
                token: token.to_string(),
                intents: Intents::GUILDS.union(Intents::GUILD_MEMBERS).bits(),
                properties: IdentifyProperties::for_library("warden"),
            })?,
        };
        send_payload(&mut sink, &handshake).await?;

        // First beat lands at a random point inside the interval.
        let first = interval.mul_f64(rand::thread_rng().gen_range(0.0..1.0));
        let mut heartbeat = tokio::time::interval_at(Instant::now() + first, interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut awaiting_ack = false;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => {
                    if awaiting_ack {
                        return Err(GatewayError::Zombie);
                    }
                    send_payload(&mut sink, &GatewayPayload::heartbeat(state.seq)).await?;
                    awaiting_ack = true;
                }
                frame = stream.next() => {
                    let Some(frame) = frame else {
                        return Ok(SessionEnd::Reconnect);
                    };
                    let text = match frame? {
                        Message::Text(text) => text,
                        Message::Close(close) => {
                            let (code, reason) = close
                                .map(|f| (u16::from(f.code), f.reason.into_owned()))
                                .unwrap_or((1000, String::new()));
                            return match classify_close(code) {
                                CloseAction::Fatal => Err(GatewayError::Fatal { code, reason }),
                                CloseAction::Reidentify => {
                                    info!(code, reason = %reason, "Gateway invalidated the session");
                                    state.clear();
                                    Ok(SessionEnd::Reconnect)
                                }
                                CloseAction::Resume => {
                                    info!(code, reason = %reason, "Gateway closed the connection");
                                    Ok(SessionEnd::Reconnect)
                                }
                            };
                        }
                        _ => continue,
                    };

                    let payload = match GatewayPayload::parse(&text) {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(error = %e, "Dropping malformed gateway frame");
                            continue;
                        }
                    };

                    match payload.opcode() {
                        Ok(OpCode::Dispatch) => {
                            if payload.s.is_some() {
                                state.seq = payload.s;
                            }
                            self.on_dispatch(payload, state);
                        }
                        Ok(OpCode::Heartbeat) => {
                            send_payload(&mut sink, &GatewayPayload::heartbeat(state.seq)).await?;
                        }
                        Ok(OpCode::HeartbeatAck) => awaiting_ack = false,
                        Ok(OpCode::Reconnect) => {
                            info!("Gateway requested a reconnect");
                            return Ok(SessionEnd::Reconnect);
                        }
                        Ok(OpCode::InvalidSession) => {
                            let resumable = payload.d.as_bool().unwrap_or(false);
                            info!(resumable, "Gateway reported an invalid session");
                            if !resumable {
                                state.clear();
                            }
                            return Ok(SessionEnd::Reconnect);
                        }
                        Ok(op) => trace!(?op, "Ignoring gateway frame"),
                        Err(e) => debug!(error = %e, "Ignoring unknown gateway opcode"),
                    }
                }
                _ = shutdown.recv() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(SessionEnd::Shutdown);
                }
            }
        }
    }

    fn on_dispatch(&self, payload: GatewayPayload, state: &mut SessionState) {
        match payload.t.as_deref() {
            Some("READY") => match payload.decode::<Ready>() {
                Ok(ready) => {
                    info!("{} is online.", ready.user.tag());
                    state.on_ready(&ready);
                }
                Err(e) => warn!(error = %e, "Malformed READY"),
            },
            Some("RESUMED") => {
                info!(seq = ?state.seq, "Session resumed");
                state.established = true;
            }
            Some("INTERACTION_CREATE") => match payload.decode::<Interaction>() {
                Ok(interaction) => self.spawn_interaction(interaction),
                Err(e) => warn!(error = %e, "Malformed INTERACTION_CREATE"),
            },
            other => trace!(event = ?other, "Ignoring dispatch"),
        }
    }

    fn spawn_interaction(&self, interaction: Interaction) {
        let bot = self.bot.clone();
        let platform = self.platform.clone();
        tokio::spawn(async move {
            match to_invocation(&interaction) {
                Ok(Some(invocation)) => {
                    let outcome = bot.handle(&invocation).await;
                    debug!(invocation = %invocation.id, ?outcome, "Invocation finished");
                }
                Ok(None) => trace!(interaction = %interaction.id, "Ignoring non-command interaction"),
                Err(e) => {
                    warn!(interaction = %interaction.id, error = %e, "Could not read interaction");
                    if let Err(e) = platform
                        .respond_raw(interaction.id, &interaction.token, &Reply::failure())
                        .await
                    {
                        warn!(interaction = %interaction.id, error = %e, "Failed to deliver reply");
                    }
                }
            }
        });
    }
}

async fn read_hello<S>(stream: &mut S) -> Result<Hello, GatewayError>
where
    S: Stream<Item = Result<Message, WsError>> + Unpin,
{
    while let Some(frame) = stream.next().await {
        if let Message::Text(text) = frame? {
            let payload = GatewayPayload::parse(&text)?;
            return match payload.opcode()? {
                OpCode::Hello => Ok(payload.decode()?),
                _ => Err(GatewayError::UnexpectedFrame(payload.op)),
            };
        }
    }
    Err(GatewayError::ClosedEarly)
}

fn heartbeat_interval(hello: &Hello) -> Result<Duration, GatewayError> {
    match hello.heartbeat_interval {
        0 => Err(GatewayError::ZeroHeartbeat),
        ms => Ok(Duration::from_millis(ms)),
    }
}

async fn send_payload<S>(sink: &mut S, payload: &GatewayPayload) -> Result<(), GatewayError>
where
    S: Sink<Message, Error = WsError> + Unpin,
{
    sink.send(Message::Text(payload.to_json()?)).await?;
    Ok(())
}

/// Scale `delay` by a random factor in `[0.5, 1.0]`.
fn jittered(delay: Duration) -> Duration {
    delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
}
