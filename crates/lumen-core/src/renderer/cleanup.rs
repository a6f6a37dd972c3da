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

//! Deferred release of GPU objects.
//!
//! Native GPU objects may only be deleted on the thread that owns the graphics
//! context, but the wrappers that own them can be dropped anywhere. Wrappers
//! therefore push a [`GpuResource`] through a [`CleanupSender`], and the owner
//! of the [`CleanupQueue`] drains it once per frame on the context thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

use crate::renderer::api::GpuResource;
use crate::renderer::error::RenderError;
use crate::renderer::traits::GraphicsDevice;

/// A cloneable, thread-safe handle used to schedule GPU objects for deletion.
#[derive(Debug, Clone)]
pub struct CleanupSender {
    sender: flume::Sender<GpuResource>,
}

impl CleanupSender {
    /// Schedules `resource` for deletion on the context thread.
    ///
    /// Safe to call from any thread and from inside `Drop`. If the queue has
    /// already been torn down the resource is reported as leaked.
    ///
    /// ## Arguments
    /// * `resource` - The GPU object to release.
    pub fn enqueue(&self, resource: GpuResource) {
        log::trace!("Queueing {} {:?} for release.", resource.kind(), resource);
        if let Err(e) = self.sender.send(resource) {
            log::warn!(
                "Cleanup queue is gone, leaking {} {:?}.",
                e.0.kind(),
                e.0
            );
        }
    }
}

/// The receiving end of the deferred-deletion channel.
///
/// Created by the frame loop driver on the context thread, which is recorded
/// as the owner. Only the owner may call [`CleanupQueue::drain_and_release`].
#[derive(Debug)]
pub struct CleanupQueue {
    sender: flume::Sender<GpuResource>,
    receiver: flume::Receiver<GpuResource>,
    owner: ThreadId,
    draining: AtomicBool,
}

/// Clears the drain flag when the drain finishes, also on early return.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl CleanupQueue {
    /// Creates an empty queue owned by the calling thread.
    ///
    /// ## Returns
    /// A new, empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        log::info!("GPU cleanup queue initialized.");
        Self {
            sender,
            receiver,
            owner: thread::current().id(),
            draining: AtomicBool::new(false),
        }
    }

    /// Returns a new sender for this queue.
    pub fn sender(&self) -> CleanupSender {
        CleanupSender {
            sender: self.sender.clone(),
        }
    }

    /// The number of resources waiting to be released.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// The thread that created the queue and is allowed to drain it.
    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    /// Releases every resource pending at the moment of the call.
    ///
    /// Resources enqueued while the drain is running are left for the next
    /// drain. A failing delete is logged and does not stop the drain.
    ///
    /// ## Arguments
    /// * `device` - The device that owns the native objects.
    ///
    /// ## Returns
    /// The number of resources released, or [`RenderError::WrongThread`] if
    /// called from a thread other than the owner. A re-entrant call releases
    /// nothing and returns `Ok(0)`.
    pub fn drain_and_release(&self, device: &dyn GraphicsDevice) -> Result<usize, RenderError> {
        let caller = thread::current().id();
        if caller != self.owner {
            return Err(RenderError::WrongThread {
                owner: self.owner,
                caller,
            });
        }

        if self.draining.swap(true, Ordering::Acquire) {
            log::warn!("Cleanup queue drain re-entered; ignoring nested call.");
            return Ok(0);
        }
        let _guard = DrainGuard(&self.draining);

        let pending = self.receiver.len();
        let mut released = 0;
        for resource in self.receiver.try_iter().take(pending) {
            match device.release(resource) {
                Ok(()) => {
                    log::debug!("Released {} {:?}.", resource.kind(), resource);
                    released += 1;
                }
                Err(e) => log::error!("Failed to release {} {:?}: {e}", resource.kind(), resource),
            }
        }

        if released > 0 {
            log::trace!("Cleanup queue released {released} resource(s).");
        }
        Ok(released)
    }
}

impl Default for CleanupQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CleanupQueue {
    fn drop(&mut self) {
        let leaked = self.receiver.len();
        if leaked > 0 {
            log::warn!("Cleanup queue dropped with {leaked} unreleased GPU resource(s).");
        }
    }
}
