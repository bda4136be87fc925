use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio_util::sync::CancellationToken;

/// Handle for one issued listing request.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    pub token: u64,
    /// Cancelled as soon as a newer ticket is issued.
    pub cancel: CancellationToken,
}

/// Monotonic fetch token counter shared by every listing context.
///
/// `current` only advances while `in_flight` is locked, so a commit holding
/// the lock sees a stable token. Reads of the current token never lock.
#[derive(Debug, Default)]
pub struct FetchTokens {
    current: AtomicU64,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl FetchTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token and cancel the request it supersedes.
    pub fn issue(&self) -> FetchTicket {
        let mut in_flight = self.in_flight.lock();
        let token = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.take() {
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        *in_flight = Some(cancel.clone());
        FetchTicket { token, cancel }
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current() == token
    }

    /// Run `commit` only if `token` is still the newest one.
    ///
    /// No token can be issued while `commit` runs, so `commit` must not call
    /// [`FetchTokens::issue`]. Reading the current token from it is fine.
    pub fn commit_if_current<R>(&self, token: u64, commit: impl FnOnce() -> R) -> Option<R> {
        let _in_flight = self.in_flight.lock();
        if self.current() != token {
            return None;
        }
        Some(commit())
    }
}
