//! This module contains the [DropJoinHandle] type, a thin wrapper type around
//! [JoinHandle] that joins the thread when the handle is dropped (RAII style).

use std::io;
use std::ops::Deref;
use std::thread::{self, JoinHandle};

/// A thin wrapper around [JoinHandle] that joins the thread when the handle is
/// dropped (RAII style).
///
/// Any error in joining the thread will be ignored. Make sure whatever the
/// thread is waiting on (usually a channel) is closed *before* this handle is
/// dropped or the drop will block forever.
#[derive(Debug)]
pub struct DropJoinHandle<T>(Option<JoinHandle<T>>);

impl<T> Deref for DropJoinHandle<T> {
    type Target = JoinHandle<T>;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref().expect(EXPECT_MSG)
    }
}

impl<T> From<JoinHandle<T>> for DropJoinHandle<T> {
    fn from(handle: JoinHandle<T>) -> Self {
        DropJoinHandle(Some(handle))
    }
}

impl<T> Drop for DropJoinHandle<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.0.take() {
            _ = handle.join();
        }
    }
}

/// The same as [thread::spawn], but the thread is named and a
/// [DropJoinHandle] is returned instead.
pub fn spawn_named<F, T>(name: &str, f: F) -> io::Result<DropJoinHandle<T>>
where
    F: FnOnce() -> T,
    F: Send + 'static,
    T: Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(f)
        .map(DropJoinHandle::from)
}

const EXPECT_MSG: &str = "The handle should be present.";

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn drop_waits_for_the_thread() {
        let finished = Arc::new(AtomicBool::new(false));

        let handle = {
            let finished = finished.clone();
            spawn_named("sleepy", move || {
                thread::sleep(std::time::Duration::from_millis(50));
                finished.store(true, Ordering::SeqCst);
            })
            .unwrap()
        };
        assert_eq!(handle.thread().name(), Some("sleepy"));

        drop(handle);
        assert!(finished.load(Ordering::SeqCst));
    }
}
