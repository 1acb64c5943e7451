// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-threaded event loop around a [`Session`].
//!
//! Host events and the debounce timer are multiplexed with
//! `crossbeam_channel::select!`, so a rescan runs on the same thread as
//! every other state change and never overlaps with event handling.

use std::time::Instant;

use crossbeam_channel::{Receiver, select};

use crate::host::Host;
use crate::session::{HostEvent, Session};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// A `HostEvent::Shutdown` was received
    Shutdown,
    /// Every event sender was dropped
    Disconnected,
}

/// Starts `session`, drives it until shutdown, then stops it.
pub fn run<H: Host + ?Sized>(session: &mut Session, host: &mut H, events: &Receiver<HostEvent>) -> Exit {
    session.start(host, Instant::now());

    let exit = loop {
        // The timer receiver changes whenever a notification reschedules.
        let timer = session.timer().clone();

        select! {
            recv(events) -> event => match event {
                Ok(HostEvent::Shutdown) => break Exit::Shutdown,
                Ok(event) => session.handle_event(host, event, Instant::now()),
                Err(_) => break Exit::Disconnected,
            },
            recv(timer) -> _ => {
                session.poll(host, Instant::now());
            }
        }
    };

    session.stop(host);
    tracing::debug!(?exit, "event loop finished");
    exit
}
