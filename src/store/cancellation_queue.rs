use tracing::debug;

use super::MessageNumber;
use crate::Entity;
use crate::EventPublisher;
use crate::Operation;
use crate::RwLatch;
use crate::Snapshot;

/// Pending cancel-by-number requests, in submission order.
#[derive(Debug)]
pub struct CancellationQueue {
    pending: RwLatch<Vec<MessageNumber>>,
    events: EventPublisher,
}

impl CancellationQueue {
    pub fn new(events: EventPublisher) -> Self {
        Self {
            pending: RwLatch::new("cancellation_queue", Vec::new()),
            events,
        }
    }

    pub fn add(
        &self,
        number: MessageNumber,
    ) {
        let snapshot = self.pending.write(|pending| {
            pending.push(number);
            self.capture(pending)
        });
        self.events
            .publish(Entity::Cancellation, number, Operation::Queued, snapshot);
    }

    pub fn exists(
        &self,
        number: MessageNumber,
    ) -> bool {
        self.pending.read(|pending| pending.contains(&number))
    }

    /// Empties the queue and calls `apply` once per drained request, in
    /// submission order. `apply` returns whether it removed an alarm; a miss
    /// still consumes the request.
    ///
    /// The queue latch is released before `apply` runs, so `apply` may take
    /// another collection's latch without nesting.
    pub fn drain_and_apply(
        &self,
        mut apply: impl FnMut(MessageNumber) -> bool,
    ) -> Vec<(MessageNumber, bool)> {
        let (drained, snapshot) = self.pending.write(|pending| {
            let drained = std::mem::take(pending);
            (drained, self.capture(pending))
        });
        if drained.is_empty() {
            return Vec::new();
        }

        let applied: Vec<(MessageNumber, bool)> = drained
            .into_iter()
            .map(|number| (number, apply(number)))
            .collect();
        debug!("applied cancellations: {:?}", applied);

        for (number, removed) in &applied {
            self.events.publish(
                Entity::Cancellation,
                *number,
                Operation::Applied { removed: *removed },
                snapshot.clone(),
            );
        }
        applied
    }

    pub fn snapshot(&self) -> Vec<MessageNumber> {
        self.pending.read(|pending| pending.clone())
    }

    pub fn len(&self) -> usize {
        self.pending.read(|pending| pending.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capture(
        &self,
        pending: &[MessageNumber],
    ) -> Option<Snapshot> {
        self.events
            .wants_snapshots()
            .then(|| Snapshot::Cancellations(pending.to_vec()))
    }
}
