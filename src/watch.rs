use crate::render::Renderer;
use anyhow::Result;
use log::{debug, info, warn};
use std::io::Write;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;
use torquemon_common::{indicators::BLINK_INTERVAL, DeviceStatus};

const CHANNEL_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    Eof,
    Cancelled,
}

/// Reads one status byte per line until EOF or cancellation, skipping
/// blanks, `#` comments and anything that doesn't decode.
pub async fn read_statuses<R>(
    input: R,
    tx: mpsc::Sender<DeviceStatus>,
    cancel: CancellationToken,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut line_no = 0usize;

    loop {
        let line = tokio::select! {
            l = lines.next_line() => l,
            _ = cancel.cancelled() => return Ok(()),
        }?;

        let Some(line) = line else {
            break;
        };
        line_no += 1;

        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.parse::<DeviceStatus>() {
            Ok(status) => {
                debug!("line {line_no}: {status}");
                if tx.send(status).await.is_err() {
                    // renderer is gone
                    break;
                }
            }
            Err(e) => warn!("line {line_no}: {e}, skipping"),
        }
    }

    info!("input ended after {line_no} lines");
    Ok(())
}

/// Renders every record read from `input` into `out`.
///
/// On cancellation the reader task is aborted and not waited for: a read
/// blocked on stdin can't be interrupted.
pub async fn run<R, W>(
    input: R,
    out: &mut W,
    renderer: Renderer,
    blink: bool,
    cancel: CancellationToken,
) -> Result<Ending>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write,
{
    let (tx, mut rx) = mpsc::channel(CHANNEL_SIZE);
    let reader = tokio::spawn(read_statuses(input, tx, cancel.child_token()));

    let mut ticker = tokio::time::interval(BLINK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut current: Option<DeviceStatus> = None;
    let mut lit = true;

    loop {
        tokio::select! {
            received = rx.recv() => match received {
                Some(status) => {
                    renderer.status(out, &status)?;
                    out.flush()?;
                    current = Some(status);
                    lit = true;
                    ticker.reset();
                }
                None => break,
            },

            _ = ticker.tick(), if blink => {
                if let Some(status) = current.filter(DeviceStatus::has_critical_error) {
                    lit = !lit;
                    renderer.blink(out, &status, lit)?;
                    out.flush()?;
                }
            }

            _ = cancel.cancelled() => {
                info!("interrupted");
                reader.abort();
                return Ok(Ending::Cancelled);
            }
        }
    }

    reader.await??;
    Ok(Ending::Eof)
}
