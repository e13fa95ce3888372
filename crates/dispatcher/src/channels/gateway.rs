//! GatewayChannel - JSON-lines bridge over TCP
//!
//! The process on the other end owns the messaging session. Each send is one
//! JSON object per line; the bridge answers every command with one line,
//! `{"ok":true}` or `{"ok":false,"error":"..."}`. A broken connection is
//! dropped and re-established on the next send.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use contracts::{ChannelAdapter, ContractError, PayloadKind};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, instrument, warn};

/// Configuration for GatewayChannel
#[derive(Debug, Clone)]
pub struct GatewayChannelConfig {
    /// Bridge address
    pub addr: SocketAddr,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl GatewayChannelConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, String> {
        let addr_str = params
            .get("addr")
            .ok_or_else(|| "missing 'addr' parameter".to_string())?;

        let addr: SocketAddr = addr_str
            .parse()
            .map_err(|e| format!("invalid address '{}': {}", addr_str, e))?;

        let connect_timeout = params
            .get("connect_timeout_ms")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(5));

        Ok(Self {
            addr,
            connect_timeout,
        })
    }
}

/// One send command on the wire
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum GatewayCommand<'a> {
    SendText {
        to: &'a str,
        text: &'a str,
    },
    SendImage {
        to: &'a str,
        path: &'a Path,
        caption: &'a str,
    },
    SendVideo {
        to: &'a str,
        path: &'a Path,
        caption: &'a str,
    },
    SendAudio {
        to: &'a str,
        path: &'a Path,
    },
    SendFile {
        to: &'a str,
        path: &'a Path,
        filename: &'a str,
        caption: &'a str,
    },
}

impl GatewayCommand<'_> {
    fn recipient(&self) -> &str {
        match self {
            Self::SendText { to, .. }
            | Self::SendImage { to, .. }
            | Self::SendVideo { to, .. }
            | Self::SendAudio { to, .. }
            | Self::SendFile { to, .. } => to,
        }
    }

    fn kind(&self) -> PayloadKind {
        match self {
            Self::SendText { .. } => PayloadKind::Text,
            Self::SendImage { .. } => PayloadKind::Image,
            Self::SendVideo { .. } => PayloadKind::Video,
            Self::SendAudio { .. } => PayloadKind::Audio,
            Self::SendFile { .. } => PayloadKind::File,
        }
    }
}

/// Bridge acknowledgement
#[derive(Debug, Deserialize)]
struct GatewayAck {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// Channel that forwards sends to a bridge process
pub struct GatewayChannel {
    name: String,
    config: GatewayChannelConfig,
    conn: Option<Connection>,
}

impl GatewayChannel {
    /// Create a GatewayChannel and connect to the bridge
    #[instrument(name = "gateway_channel_new", skip(name, config))]
    pub async fn new(
        name: impl Into<String>,
        config: GatewayChannelConfig,
    ) -> Result<Self, ContractError> {
        let mut channel = Self {
            name: name.into(),
            config,
            conn: None,
        };
        channel.conn = Some(channel.connect().await?);
        Ok(channel)
    }

    /// Create from params (for factory)
    pub async fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let config = GatewayChannelConfig::from_params(params)
            .map_err(|e| ContractError::channel_connection(&name, e))?;
        Self::new(name, config).await
    }

    async fn connect(&self) -> Result<Connection, ContractError> {
        let stream = tokio::time::timeout(
            self.config.connect_timeout,
            TcpStream::connect(self.config.addr),
        )
        .await
        .map_err(|_| {
            ContractError::channel_connection(
                &self.name,
                format!("connect to {} timed out", self.config.addr),
            )
        })?
        .map_err(|e| ContractError::channel_connection(&self.name, e.to_string()))?;

        debug!(channel = %self.name, target = %self.config.addr, "GatewayChannel connected");

        let (read, writer) = stream.into_split();
        Ok(Connection {
            reader: BufReader::new(read),
            writer,
        })
    }

    /// One command, one ack line
    ///
    /// The connection is held outside `self.conn` until its ack has been
    /// read in full. A caller that drops this future mid-exchange leaves the
    /// channel disconnected, so a late ack can never answer the next command.
    async fn exchange(&mut self, command: &GatewayCommand<'_>) -> Result<(), ContractError> {
        let name = self.name.clone();
        let send_error =
            |message: String| ContractError::channel_send(&name, command.recipient(), command.kind(), message);

        let mut line = serde_json::to_string(command).map_err(|e| send_error(e.to_string()))?;
        line.push('\n');

        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.connect().await?,
        };
        let mut reply = String::new();
        let io_result = async {
            conn.writer.write_all(line.as_bytes()).await?;
            conn.writer.flush().await?;
            conn.reader.read_line(&mut reply).await
        }
        .await;

        match io_result {
            Ok(0) => Err(ContractError::channel_connection(
                &name,
                "bridge closed the connection",
            )),
            Ok(_) => {
                if reply.ends_with('\n') {
                    self.conn = Some(conn);
                }
                let ack: GatewayAck = serde_json::from_str(reply.trim())
                    .map_err(|e| send_error(format!("invalid acknowledgement: {e}")))?;
                if ack.ok {
                    Ok(())
                } else {
                    Err(send_error(
                        ack.error.unwrap_or_else(|| "rejected by bridge".to_string()),
                    ))
                }
            }
            Err(e) => {
                warn!(channel = %name, error = %e, "Gateway connection lost");
                Err(ContractError::channel_connection(&name, e.to_string()))
            }
        }
    }
}

impl ChannelAdapter for GatewayChannel {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "gateway_channel_send_text", skip(self, text))]
    async fn send_text(&mut self, recipient_id: &str, text: &str) -> Result<(), ContractError> {
        self.exchange(&GatewayCommand::SendText {
            to: recipient_id,
            text,
        })
        .await
    }

    #[instrument(name = "gateway_channel_send_image", skip(self, caption))]
    async fn send_image(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.exchange(&GatewayCommand::SendImage {
            to: recipient_id,
            path,
            caption,
        })
        .await
    }

    #[instrument(name = "gateway_channel_send_video", skip(self, caption))]
    async fn send_video(
        &mut self,
        recipient_id: &str,
        path: &Path,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.exchange(&GatewayCommand::SendVideo {
            to: recipient_id,
            path,
            caption,
        })
        .await
    }

    #[instrument(name = "gateway_channel_send_audio", skip(self))]
    async fn send_audio(&mut self, recipient_id: &str, path: &Path) -> Result<(), ContractError> {
        self.exchange(&GatewayCommand::SendAudio {
            to: recipient_id,
            path,
        })
        .await
    }

    #[instrument(name = "gateway_channel_send_file", skip(self, caption))]
    async fn send_file(
        &mut self,
        recipient_id: &str,
        path: &Path,
        filename: &str,
        caption: &str,
    ) -> Result<(), ContractError> {
        self.exchange(&GatewayCommand::SendFile {
            to: recipient_id,
            path,
            filename,
            caption,
        })
        .await
    }
}
