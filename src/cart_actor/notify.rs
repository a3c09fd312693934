//! The user-facing notification side channel.
//!
//! Failed cart operations do not return errors to the caller; they raise a
//! [`Notice`] through a [`Notifier`] instead, which the presentation layer shows.

use std::fmt;

use tokio::sync::mpsc;
use tracing::warn;

use crate::domain::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    StockExceeded,
    AddFailed,
    RemoveFailed,
    UpdateFailed,
}

impl NoticeKind {
    pub fn message(self) -> &'static str {
        match self {
            NoticeKind::StockExceeded => "Requested quantity is out of stock",
            NoticeKind::AddFailed => "Error adding product",
            NoticeKind::RemoveFailed => "Error removing product",
            NoticeKind::UpdateFailed => "Error updating product amount",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub product_id: ProductId,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, product_id: ProductId) -> Self {
        Self {
            kind,
            product_id,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log. Used when no UI is attached.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        warn!(kind = ?notice.kind, product_id = notice.product_id, "{}", notice.message);
    }
}

/// Forwards notices to a channel the presentation layer drains.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // Nobody listening any more; the notice has nowhere to go.
        let _ = self.sender.send(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_notifier_delivers_in_order() {
        let (notifier, mut rx) = ChannelNotifier::new();
        notifier.notify(Notice::new(NoticeKind::AddFailed, 1));
        notifier.notify(Notice::new(NoticeKind::StockExceeded, 2));

        let first = rx.try_recv().unwrap();
        assert_eq!(first.kind, NoticeKind::AddFailed);
        assert_eq!(first.to_string(), "Error adding product");
        assert_eq!(rx.try_recv().unwrap().product_id, 2);
    }

    #[test]
    fn channel_notifier_survives_dropped_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notice::new(NoticeKind::RemoveFailed, 3));
    }
}
