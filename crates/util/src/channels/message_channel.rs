//! This module defines the [Inbox] and [Outbox] types for working with a
//! one-way SPSC (single producer single consumer) queue, useful in situations
//! with a single thread producing data and another single thread reading it.
//!
//! The UI thread never blocks on an [Inbox] (it calls [Inbox::check_all] once
//! per frame); the worker thread blocks in [Inbox::wait] until work arrives.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::{ChannelError, ChannelResult, THREAD_PANIC_MSG};

/// The inbox (message receiver) of a one-way message channel. Also see
/// [Outbox].
#[derive(Debug)]
pub struct Inbox<T> {
    channel: Arc<OneWayChannel<T>>,
}

impl<T> Inbox<T> {
    /// Waits for a message from the outbox until one appears.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the other end
    /// of the connection was dropped and there are no more items in the queue.
    pub fn wait(&self) -> ChannelResult<T> {
        let mut state = self.channel.lock();

        loop {
            if let Some(msg) = state.queue.pop_front() {
                return Ok(msg);
            }

            // No messages means one of two things:
            // 1. The other end hung up.
            // 2. Nothing has been sent yet or this was a spurious wakeup (we
            //    should go back to sleep).
            state.ensure_open()?;
            state = self.channel.notifier.wait(state).expect(THREAD_PANIC_MSG);
        }
    }

    /// Waits for a message from the outbox for up to `timeout` time.
    ///
    /// After `timeout` time, a [ChannelError::Timeout] error is returned. Note
    /// that this function's execution may take slightly longer than `timeout`
    /// time.
    pub fn wait_timeout(&self, timeout: Duration) -> ChannelResult<T> {
        let deadline = Instant::now() + timeout;
        let mut state = self.channel.lock();

        loop {
            if let Some(msg) = state.queue.pop_front() {
                return Ok(msg);
            }
            state.ensure_open()?;

            let time_until_deadline = deadline.saturating_duration_since(Instant::now());
            if time_until_deadline.is_zero() {
                return Err(ChannelError::Timeout { timeout });
            }

            state = self
                .channel
                .notifier
                .wait_timeout(state, time_until_deadline)
                .expect(THREAD_PANIC_MSG)
                .0;
        }
    }

    /// Receives a message from the outbox if one is waiting, returning [None]
    /// otherwise. This function will block briefly if the outbox is currently
    /// sending a message.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the other end
    /// of the connection was dropped and there are no more items in the queue.
    pub fn check(&self) -> ChannelResult<Option<T>> {
        self.check_for_queue(|mut state| state.queue.pop_front())
            .map(Option::flatten)
    }

    /// Receives all waiting messages from the outbox, returning [None] if there
    /// are none.
    ///
    /// The returned [VecDeque] is guaranteed to have at least 1 element.
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the other end
    /// of the connection was dropped and there are no more items in the queue.
    pub fn check_all(&self) -> ChannelResult<Option<VecDeque<T>>> {
        self.check_for_queue(|mut state| state.queue.split_off(0))
    }

    /// Whether the other party still has their end of the connection alive.
    pub fn connection_open(&self) -> bool {
        !self.channel.lock().hung_up
    }

    /// See if the queue has at least 1 item in it. If it does, hand the queue
    /// to `f`.
    fn check_for_queue<F, R>(&self, f: F) -> ChannelResult<Option<R>>
    where
        F: FnOnce(MutexGuard<'_, ChannelState<T>>) -> R,
    {
        let state = self.channel.lock();

        if !state.queue.is_empty() {
            return Ok(Some(f(state)));
        }

        // If there are no messages we need to make sure the other end hasn't
        // hung up.
        state.ensure_open()?;

        Ok(None)
    }
}

/// The outbox (message sender) of a one-way message channel. Also see
/// [Inbox].
#[derive(Debug)]
pub struct Outbox<T> {
    channel: Arc<OneWayChannel<T>>,
}

impl<T> Outbox<T> {
    /// Sends a message to the inbox, returning the number of messages that have
    /// been sent but not received (after sending the message).
    ///
    /// A [ChannelError::ConnectionDropped] error is returned if the other end
    /// of the connection was dropped.
    pub fn send(&self, msg: T) -> ChannelResult<usize> {
        let mut state = self.channel.lock();
        state.ensure_open()?;

        state.queue.push_back(msg);
        let in_flight = state.queue.len();

        // We need to notify the inbox that a message has arrived if it's
        // waiting.
        self.channel.notifier.notify_one();

        Ok(in_flight)
    }

    /// Whether the other party still has their end of the connection alive.
    pub fn connection_open(&self) -> bool {
        !self.channel.lock().hung_up
    }
}

// The inbox may be waiting. We have to notify it that no more messages are
// coming so it doesn't just wait forever.
impl<T> Drop for Outbox<T> {
    fn drop(&mut self) {
        self.channel.hang_up();
    }
}

impl<T> Drop for Inbox<T> {
    fn drop(&mut self) {
        self.channel.hang_up();
    }
}

/// Create a one-way message channel's [Inbox] and [Outbox].
///
/// - The inbox will be able to receive messages as long as the outbox hasn't
///   been dropped or while there are still pending messages.
/// - The outbox will be able to send messages as long as the inbox hasn't been
///   dropped.
pub fn new<T>() -> (Inbox<T>, Outbox<T>) {
    let channel = Arc::new(OneWayChannel {
        state: Mutex::new(ChannelState {
            queue: VecDeque::new(),
            hung_up: false,
        }),
        notifier: Condvar::default(),
    });

    (
        Inbox {
            channel: channel.clone(),
        },
        Outbox { channel },
    )
}

#[derive(Debug)]
struct OneWayChannel<T> {
    state: Mutex<ChannelState<T>>,
    notifier: Condvar,
}

impl<T> OneWayChannel<T> {
    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        self.state.lock().expect(THREAD_PANIC_MSG)
    }

    /// Marks the connection as closed and wakes the other end. The flag is set
    /// under the lock so a waiting inbox can't miss it.
    fn hang_up(&self) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        state.hung_up = true;
        self.notifier.notify_one();
    }
}

#[derive(Debug)]
struct ChannelState<T> {
    queue: VecDeque<T>,
    hung_up: bool,
}

impl<T> ChannelState<T> {
    fn ensure_open(&self) -> ChannelResult<()> {
        if self.hung_up {
            Err(ChannelError::ConnectionDropped)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn messages_can_be_received() {
        let (inbox, outbox) = new::<i32>();

        let thread = thread::spawn(move || {
            assert!(outbox.send(1).is_ok());
            assert!(outbox.send(2).is_ok());
            assert!(outbox.send(3).is_ok());
        });

        assert_eq!(inbox.wait(), Ok(1));
        assert_eq!(inbox.wait(), Ok(2));
        assert_eq!(inbox.wait(), Ok(3));

        thread.join().unwrap();
    }

    #[test]
    fn timeout_works() {
        let (inbox, outbox) = new::<i32>();

        assert!(outbox.send(1).is_ok());

        let timeout = Duration::from_millis(200);
        assert_eq!(inbox.wait_timeout(timeout), Ok(1));
        assert_eq!(
            inbox.wait_timeout(timeout),
            Err(ChannelError::Timeout { timeout })
        );
    }

    #[test]
    fn check_all_drains_everything() {
        let (inbox, outbox) = new::<&str>();

        assert_eq!(inbox.check_all(), Ok(None));

        outbox.send("probing").unwrap();
        outbox.send("done").unwrap();

        let msgs = inbox.check_all().unwrap().unwrap();
        assert_eq!(msgs, VecDeque::from(["probing", "done"]));
        assert_eq!(inbox.check(), Ok(None));
    }

    #[test]
    fn early_outbox_drop_is_fine() {
        let (inbox, outbox) = new::<i32>();

        thread::scope(|s| {
            s.spawn(move || {
                assert!(outbox.send(1).is_ok());
                assert!(outbox.send(2).is_ok());
                drop(outbox);
            });
        });

        assert_eq!(inbox.wait(), Ok(1));
        assert_eq!(inbox.wait(), Ok(2));
        assert_eq!(inbox.wait(), Err(ChannelError::ConnectionDropped));
        assert!(!inbox.connection_open());
    }

    #[test]
    fn sending_to_a_dropped_inbox_fails() {
        let (inbox, outbox) = new::<i32>();
        drop(inbox);

        assert_eq!(outbox.send(1), Err(ChannelError::ConnectionDropped));
        assert!(!outbox.connection_open());
    }
}
