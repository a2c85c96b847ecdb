use super::Message;
use crossbeam::channel::Sender;
use std::any::Any;
use std::thread::{self, JoinHandle};

/// A running worker. Only the pool holds these, and `join` takes the
/// handle by value, so a worker can't be joined twice.
pub struct WorkerHandle {
    index: usize,
    thread: JoinHandle<()>,
}

impl WorkerHandle {
    pub fn new(index: usize, thread: JoinHandle<()>) -> Self {
        WorkerHandle { index, thread }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Blocks until the thread exits. `Err` carries the panic message.
    pub fn join(self) -> std::result::Result<(), String> {
        self.thread.join().map_err(panic_message)
    }
}

// reports the terminal state of one worker back to the pool
pub struct Notifier<T> {
    sender: Sender<Message<T>>,
    index: usize,
}

impl<T> Notifier<T> {
    pub fn new(sender: Sender<Message<T>>, index: usize) -> Self {
        Notifier { sender, index }
    }

    pub fn done(&self, outcome: std::result::Result<T, String>) {
        // the pool keeps its receiver until every worker is joined
        let _ = self.sender.send(Message::Done(self.index, outcome));
    }
}

impl<T> Drop for Notifier<T> {
    fn drop(&mut self) {
        if thread::panicking() {
            let _ = self.sender.send(Message::Dead(self.index));
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
