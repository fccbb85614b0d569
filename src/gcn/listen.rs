//! VOEvent Transport Protocol client.
//!
//! The GCN broker speaks a thin TCP framing: every packet is a 4-byte
//! big-endian length followed by that many bytes of XML. The broker sends
//! iamalive heartbeats every ~60 s and drops clients that do not answer, so
//! heartbeats are acknowledged before anything else.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::GcnConfig;

use super::handler::{IngestOutcome, Pipeline};

/// Upper bound on a single frame; real notices are a few kilobytes.
pub const MAX_FRAME_LEN: usize = 1 << 20;

/// Read one length-prefixed frame. Returns `None` on a clean end of stream.
pub async fn read_frame<R>(reader: &mut R) -> anyhow::Result<Option<Vec<u8>>>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e).context("Failed to read frame length"),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len == 0 || len > MAX_FRAME_LEN {
        bail!("Unreasonable frame length: {len}");
    }

    let mut payload = vec![0u8; len];
    reader
        .read_exact(&mut payload)
        .await
        .context("Failed to read frame payload")?;
    Ok(Some(payload))
}

/// Write one length-prefixed frame.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let len = u32::try_from(payload.len()).context("Frame payload too large")?;
    writer.write_all(&len.to_be_bytes()).await?;
    writer.write_all(payload).await?;
    writer.flush().await?;
    Ok(())
}

fn iamalive_ack() -> String {
    format!(
        r#"<trn:Transport role="iamalive" version="1.0" xmlns:trn="http://telescope-networks.org/schema/Transport/v1.1"><Origin>ivo://nasa.gsfc.gcn</Origin><Response>ivo://too.pipeline/gcn</Response><TimeStamp>{}</TimeStamp></trn:Transport>"#,
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S")
    )
}

/// Long-running GCN broker client feeding the ingestion pipeline.
pub struct GcnListener {
    config: GcnConfig,
    pipeline: Arc<Pipeline>,
}

impl GcnListener {
    pub fn new(config: GcnConfig, pipeline: Arc<Pipeline>) -> Self {
        Self { config, pipeline }
    }

    /// Connect and ingest forever, reconnecting after dropped connections.
    pub async fn run(&self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        loop {
            log::info!("Connecting to GCN broker at {addr}");
            match TcpStream::connect(&addr).await {
                Ok(stream) => {
                    if let Err(e) = self.process_stream(stream).await {
                        log::warn!("GCN connection lost: {e:#}");
                    } else {
                        log::info!("GCN broker closed the connection");
                    }
                }
                Err(e) => log::warn!("GCN connection failed: {e}"),
            }
            tokio::time::sleep(Duration::from_secs(self.config.reconnect_delay_secs)).await;
        }
    }

    /// Ingest every frame on one connection until it closes.
    pub async fn process_stream<S>(&self, stream: S) -> anyhow::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);

        while let Some(payload) = read_frame(&mut reader).await? {
            match self.pipeline.handle(&payload).await {
                Ok(IngestOutcome::Iamalive) => {
                    write_frame(&mut writer, iamalive_ack().as_bytes()).await?;
                }
                Ok(IngestOutcome::Ingested { ivorn, tags, .. }) => {
                    log::info!("Ingested {ivorn} with tags {tags:?}");
                }
                Ok(IngestOutcome::Duplicate { ivorn }) => {
                    log::info!("Skipped duplicate notice {ivorn}");
                }
                // A malformed notice must not take the connection down.
                Err(e) => log::warn!("Failed to ingest notice: {e:#}"),
            }
        }
        Ok(())
    }
}
