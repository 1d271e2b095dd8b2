//! Channel-backed confirmation for the branch resolver.
//!
//! The resolver asks a yes/no question ("use the headquarters instead of this
//! branch?") through a plain async function. [`ChannelConfirmer`] turns that
//! question into a [`ConfirmRequest`] message so that whoever owns the user
//! interaction can answer it from another task.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> cnpj_core::Result<()> {
//! use cnpj_core::{branch, confirm};
//!
//! let (confirmer, mut requests) = confirm::channel(1);
//! tokio::spawn(async move {
//!     while let Some(request) = requests.recv().await {
//!         request.respond(true);
//!     }
//! });
//!
//! let id = branch::decide_final("54550752000236", "", |hq, br| confirmer.confirm(hq, br)).await?;
//! assert_eq!(id, "54550752000155");
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use crate::error::{Error, Result};

/// A pending question for the user.
#[derive(Debug)]
pub struct ConfirmRequest {
    pub headquarters: String,
    pub branch: String,
    reply: oneshot::Sender<bool>,
}

impl ConfirmRequest {
    /// Answer the request. Answering after the asker gave up is a no-op.
    pub fn respond(self, accept: bool) {
        let _ = self.reply.send(accept);
    }
}

/// Sending half handed to the resolver.
#[derive(Debug, Clone)]
pub struct ChannelConfirmer {
    tx: mpsc::Sender<ConfirmRequest>,
    timeout: Option<Duration>,
}

/// Create a confirmer and the receiver its requests arrive on.
pub fn channel(buffer: usize) -> (ChannelConfirmer, mpsc::Receiver<ConfirmRequest>) {
    let (tx, rx) = mpsc::channel(buffer.max(1));
    (ChannelConfirmer { tx, timeout: None }, rx)
}

impl ChannelConfirmer {
    /// Bound how long a single question may stay unanswered.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Ask the question and wait for the single reply.
    pub async fn confirm(&self, headquarters: String, branch: String) -> Result<bool> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.ask(headquarters, branch))
                .await
                .map_err(|_| Error::ConfirmationTimedOut(limit))?,
            None => self.ask(headquarters, branch).await,
        }
    }

    async fn ask(&self, headquarters: String, branch: String) -> Result<bool> {
        let (reply, answer) = oneshot::channel();
        trace!(%headquarters, %branch, "sending confirmation request");

        self.tx
            .send(ConfirmRequest {
                headquarters,
                branch,
                reply,
            })
            .await
            .map_err(|_| Error::ConfirmationCancelled)?;

        answer.await.map_err(|_| Error::ConfirmationCancelled)
    }
}
