use tokio::sync::mpsc;

use crate::search::RemoteSearchEvent;

/// Sink for remote search notifications.
///
/// Emitting must not block: it is called from timer and network tasks.
pub trait SearchEventPort: Send + Sync {
    fn emit(&self, event: RemoteSearchEvent);
}

/// Forward events into a channel; a closed receiver just drops them.
impl SearchEventPort for mpsc::UnboundedSender<RemoteSearchEvent> {
    fn emit(&self, event: RemoteSearchEvent) {
        let _ = self.send(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSearchEvents;

impl SearchEventPort for NoopSearchEvents {
    fn emit(&self, _event: RemoteSearchEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_sink_forwards_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.emit(RemoteSearchEvent::Started {
            seq: 1,
            term: "tax".into(),
        });
        let event = rx.try_recv().unwrap();
        assert_eq!(event.seq(), 1);
    }

    #[test]
    fn closed_channel_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        tx.emit(RemoteSearchEvent::Started {
            seq: 2,
            term: String::new(),
        });
    }
}
