//! Wakeups exchanged between the table and its participants.
//!
//! Every participant owns a [`WaitSlot`]: a capacity-1 channel whose sending
//! half stays with the table. Signals are always directed at one slot, and a
//! signal sent before its target parks stays buffered instead of being lost.

use log::debug;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Why a participant was woken.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wakeup {
    /// A player checked in before the first deal.
    Keepalive,
    /// The last active player reported for this round.
    RoundReported(u32),
    /// The player's card for this round is in its hand.
    CardDealt(u32),
}

/// What a player's report amounted to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReportStatus {
    /// No card has been dealt yet; the dealer was pinged.
    Keepalive,
    /// Counted for `round`; `candidate` is set when the score crossed the
    /// threshold.
    Reported { round: u32, candidate: bool },
    /// Already counted this round, nothing changed.
    AlreadyReported,
    /// The player is no longer seated.
    Out,
}

/// Table-side half of a participant's slot.
#[derive(Clone, Debug)]
pub struct SlotSender {
    sender: mpsc::Sender<Wakeup>,
}

impl SlotSender {
    /// Returns false once the participant has dropped its slot.
    pub fn signal(&self, wakeup: Wakeup) -> bool {
        match self.sender.try_send(wakeup) {
            Ok(()) => true,
            Err(TrySendError::Full(dropped)) => {
                debug!("wakeup already pending, dropping {dropped:?}");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Participant-side half of a slot.
#[derive(Debug)]
pub struct WaitSlot {
    inbox: mpsc::Receiver<Wakeup>,
}

impl WaitSlot {
    /// Parks until signalled. `None` means the table closed the slot.
    pub async fn wait(&mut self) -> Option<Wakeup> {
        self.inbox.recv().await
    }

    /// Throws away buffered wakeups, returning how many there were.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while self.inbox.try_recv().is_ok() {
            drained += 1;
        }
        drained
    }
}

pub fn wait_slot() -> (SlotSender, WaitSlot) {
    let (sender, inbox) = mpsc::channel(1);
    (SlotSender { sender }, WaitSlot { inbox })
}
