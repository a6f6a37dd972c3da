// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// A host event forwarded to the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// The drawable surface changed size, in pixels.
    Resized {
        /// New width.
        width: u32,
        /// New height.
        height: u32,
    },
    /// The host wants the loop to stop.
    CloseRequested,
}

/// A thread-safe channel carrying events of type `T` to the frame loop.
///
/// Any number of producers obtain a sender with [`EventBus::sender`]; only the
/// owner of the bus drains it.
#[derive(Debug)]
pub struct EventBus<T: Clone + Send + Sync + 'static> {
    sender: flume::Sender<T>,
    receiver: flume::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> EventBus<T> {
    /// Creates a bus over an unbounded channel.
    ///
    /// ## Returns
    /// A new, empty bus.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::debug!("Event bus initialized.");
        Self { sender, receiver }
    }

    /// Returns a new sender for producers.
    pub fn sender(&self) -> flume::Sender<T> {
        self.sender.clone()
    }

    /// Removes and returns every event received so far, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// The number of events waiting.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn drain_returns_events_in_order() {
        let bus = EventBus::<LoopEvent>::new();
        let sender = bus.sender();
        sender
            .send(LoopEvent::Resized {
                width: 1,
                height: 2,
            })
            .expect("Send should succeed");
        sender
            .send(LoopEvent::CloseRequested)
            .expect("Send should succeed");

        assert_eq!(bus.pending(), 2);
        assert_eq!(
            bus.drain(),
            vec![
                LoopEvent::Resized {
                    width: 1,
                    height: 2
                },
                LoopEvent::CloseRequested
            ]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn send_from_thread() {
        let bus = EventBus::<LoopEvent>::new();
        let sender = bus.sender();
        thread::spawn(move || {
            sender
                .send(LoopEvent::CloseRequested)
                .expect("Send from thread failed");
        })
        .join()
        .expect("Sender thread panicked");

        assert_eq!(bus.drain(), vec![LoopEvent::CloseRequested]);
    }
}
