// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Classhelp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The only link between a popup and its opener.

use tokio::sync::mpsc;

use super::SessionHandle;
use crate::model::SerializedValue;

/// The single closing message a popup sends to its opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupMessage {
    Applied { handle: SessionHandle, value: SerializedValue },
    Cancelled { handle: SessionHandle, cause: Option<String> },
}

impl PopupMessage {
    pub fn handle(&self) -> &SessionHandle {
        match self {
            Self::Applied { handle, .. } | Self::Cancelled { handle, .. } => handle,
        }
    }
}

/// Popup side of the channel.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<PopupMessage>,
}

/// Opener side of the channel.
#[derive(Debug)]
pub struct Inbox {
    rx: mpsc::UnboundedReceiver<PopupMessage>,
}

pub fn channel() -> (Outbox, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Outbox { tx }, Inbox { rx })
}

impl Outbox {
    /// Returns `false` when the opener is gone; the message is dropped.
    pub fn send(&self, message: PopupMessage) -> bool {
        match self.tx.send(message) {
            Ok(()) => true,
            Err(mpsc::error::SendError(message)) => {
                tracing::warn!(handle = %message.handle(), "opener gone; popup message dropped");
                false
            }
        }
    }
}

impl Inbox {
    pub fn try_recv(&mut self) -> Option<PopupMessage> {
        self.rx.try_recv().ok()
    }

    pub async fn recv(&mut self) -> Option<PopupMessage> {
        self.rx.recv().await
    }
}
