//! Controller events and their delivery to the registered listener.
//!
//! The native stack reports tags, peer links, host card emulation activity and
//! RF field changes from its own notification thread. The dispatcher forwards
//! each one to the listener as it arrives: no queue, no filtering, payloads
//! untouched.

use std::fmt;
use std::sync::Arc;
use std::sync::mpsc;

use tracing::{debug, info, trace};

/// Tag found by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTag {
    /// Native handle of the tag.
    pub handle: u32,
    /// Technologies the tag answered with.
    pub technologies: Vec<u32>,
    pub uid: Vec<u8>,
}

/// Remote peer of an LLCP link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeP2pDevice {
    pub handle: u32,
    /// Whether the local side is the initiator of the link.
    pub initiator: bool,
    pub general_bytes: Vec<u8>,
}

/// Events originating in the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    TagDiscovered(NativeTag),
    PeerLinkActivated(NativeP2pDevice),
    PeerLinkDeactivated(NativeP2pDevice),
    HostEmulationActivated { technology: u32 },
    HostEmulationData { technology: u32, data: Vec<u8> },
    HostEmulationDeactivated { technology: u32 },
    FieldActivated,
    FieldDeactivated,
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::TagDiscovered(_) => write!(f, "Tag Discovered"),
            HostEvent::PeerLinkActivated(_) => write!(f, "Peer Link Activated"),
            HostEvent::PeerLinkDeactivated(_) => write!(f, "Peer Link Deactivated"),
            HostEvent::HostEmulationActivated { .. } => write!(f, "Host Emulation Activated"),
            HostEvent::HostEmulationData { .. } => write!(f, "Host Emulation Data"),
            HostEvent::HostEmulationDeactivated { .. } => write!(f, "Host Emulation Deactivated"),
            HostEvent::FieldActivated => write!(f, "Field Activated"),
            HostEvent::FieldDeactivated => write!(f, "Field Deactivated"),
        }
    }
}

/// Receiver of controller events.
///
/// Called from the native notification thread; implementations handle their
/// own synchronization.
pub trait DeviceHostListener: Send + Sync {
    fn on_tag_discovered(&self, tag: NativeTag);
    fn on_peer_link_activated(&self, device: NativeP2pDevice);
    fn on_peer_link_deactivated(&self, device: NativeP2pDevice);
    fn on_host_emulation_activated(&self, technology: u32);
    fn on_host_emulation_data(&self, technology: u32, data: Vec<u8>);
    fn on_host_emulation_deactivated(&self, technology: u32);
    fn on_field_activated(&self);
    fn on_field_deactivated(&self);
}

/// No-op listener that discards all events.
pub struct NullListener;

impl DeviceHostListener for NullListener {
    fn on_tag_discovered(&self, _tag: NativeTag) {}
    fn on_peer_link_activated(&self, _device: NativeP2pDevice) {}
    fn on_peer_link_deactivated(&self, _device: NativeP2pDevice) {}
    fn on_host_emulation_activated(&self, _technology: u32) {}
    fn on_host_emulation_data(&self, _technology: u32, _data: Vec<u8>) {}
    fn on_host_emulation_deactivated(&self, _technology: u32) {}
    fn on_field_activated(&self) {}
    fn on_field_deactivated(&self) {}
}

/// Listener that logs events using tracing.
pub struct TracingListener;

impl DeviceHostListener for TracingListener {
    fn on_tag_discovered(&self, tag: NativeTag) {
        info!(handle = tag.handle, techs = ?tag.technologies, uid = %hex(&tag.uid), "Tag discovered");
    }

    fn on_peer_link_activated(&self, device: NativeP2pDevice) {
        info!(handle = device.handle, initiator = device.initiator, "LLCP link activated");
    }

    fn on_peer_link_deactivated(&self, device: NativeP2pDevice) {
        info!(handle = device.handle, "LLCP link deactivated");
    }

    fn on_host_emulation_activated(&self, technology: u32) {
        debug!(technology, "Host card emulation activated");
    }

    fn on_host_emulation_data(&self, technology: u32, data: Vec<u8>) {
        trace!(technology, len = data.len(), data = %hex(&data), "Host card emulation data");
    }

    fn on_host_emulation_deactivated(&self, technology: u32) {
        debug!(technology, "Host card emulation deactivated");
    }

    fn on_field_activated(&self) {
        debug!("RF field activated");
    }

    fn on_field_deactivated(&self) {
        debug!("RF field deactivated");
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

/// Listener that turns every callback back into a [`HostEvent`] and sends it
/// down a channel, for consumers that want events on their own thread.
pub struct ChannelListener {
    sender: mpsc::Sender<HostEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::Receiver<HostEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }

    fn post(&self, event: HostEvent) {
        if self.sender.send(event).is_err() {
            debug!("Event receiver dropped, discarding event");
        }
    }
}

impl DeviceHostListener for ChannelListener {
    fn on_tag_discovered(&self, tag: NativeTag) {
        self.post(HostEvent::TagDiscovered(tag));
    }

    fn on_peer_link_activated(&self, device: NativeP2pDevice) {
        self.post(HostEvent::PeerLinkActivated(device));
    }

    fn on_peer_link_deactivated(&self, device: NativeP2pDevice) {
        self.post(HostEvent::PeerLinkDeactivated(device));
    }

    fn on_host_emulation_activated(&self, technology: u32) {
        self.post(HostEvent::HostEmulationActivated { technology });
    }

    fn on_host_emulation_data(&self, technology: u32, data: Vec<u8>) {
        self.post(HostEvent::HostEmulationData { technology, data });
    }

    fn on_host_emulation_deactivated(&self, technology: u32) {
        self.post(HostEvent::HostEmulationDeactivated { technology });
    }

    fn on_field_activated(&self) {
        self.post(HostEvent::FieldActivated);
    }

    fn on_field_deactivated(&self) {
        self.post(HostEvent::FieldDeactivated);
    }
}

/// Routes controller events to the listener fixed at construction.
///
/// Cheap to clone; hand a clone to the driver's notification thread.
pub struct EventDispatcher<L: DeviceHostListener + ?Sized> {
    listener: Arc<L>,
}

impl<L: DeviceHostListener + ?Sized> Clone for EventDispatcher<L> {
    fn clone(&self) -> Self {
        Self {
            listener: Arc::clone(&self.listener),
        }
    }
}

impl<L: DeviceHostListener + ?Sized> EventDispatcher<L> {
    pub fn new(listener: Arc<L>) -> Self {
        Self { listener }
    }

    pub fn listener(&self) -> &Arc<L> {
        &self.listener
    }

    /// Deliver one event synchronously.
    pub fn dispatch(&self, event: HostEvent) {
        trace!(event = %event, "Dispatching controller event");
        match event {
            HostEvent::TagDiscovered(tag) => self.listener.on_tag_discovered(tag),
            HostEvent::PeerLinkActivated(device) => self.listener.on_peer_link_activated(device),
            HostEvent::PeerLinkDeactivated(device) => {
                self.listener.on_peer_link_deactivated(device)
            }
            HostEvent::HostEmulationActivated { technology } => {
                self.listener.on_host_emulation_activated(technology)
            }
            HostEvent::HostEmulationData { technology, data } => {
                self.listener.on_host_emulation_data(technology, data)
            }
            HostEvent::HostEmulationDeactivated { technology } => {
                self.listener.on_host_emulation_deactivated(technology)
            }
            HostEvent::FieldActivated => self.listener.on_field_activated(),
            HostEvent::FieldDeactivated => self.listener.on_field_deactivated(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records callbacks by name, in order.
    #[derive(Default)]
    struct RecordingListener {
        calls: Mutex<Vec<(&'static str, HostEvent)>>,
    }

    impl RecordingListener {
        fn push(&self, name: &'static str, event: HostEvent) {
            self.calls.lock().unwrap().push((name, event));
        }

        fn calls(&self) -> Vec<(&'static str, HostEvent)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DeviceHostListener for RecordingListener {
        fn on_tag_discovered(&self, tag: NativeTag) {
            self.push("tag", HostEvent::TagDiscovered(tag));
        }
        fn on_peer_link_activated(&self, device: NativeP2pDevice) {
            self.push("link_up", HostEvent::PeerLinkActivated(device));
        }
        fn on_peer_link_deactivated(&self, device: NativeP2pDevice) {
            self.push("link_down", HostEvent::PeerLinkDeactivated(device));
        }
        fn on_host_emulation_activated(&self, technology: u32) {
            self.push("hce_on", HostEvent::HostEmulationActivated { technology });
        }
        fn on_host_emulation_data(&self, technology: u32, data: Vec<u8>) {
            self.push("hce_data", HostEvent::HostEmulationData { technology, data });
        }
        fn on_host_emulation_deactivated(&self, technology: u32) {
            self.push("hce_off", HostEvent::HostEmulationDeactivated { technology });
        }
        fn on_field_activated(&self) {
            self.push("field_on", HostEvent::FieldActivated);
        }
        fn on_field_deactivated(&self) {
            self.push("field_off", HostEvent::FieldDeactivated);
        }
    }

    fn all_events() -> Vec<HostEvent> {
        let tag = NativeTag {
            handle: 7,
            technologies: vec![1, 3],
            uid: vec![0x04, 0xA1, 0xB2, 0xC3],
        };
        let peer = NativeP2pDevice {
            handle: 9,
            initiator: true,
            general_bytes: vec![0x46, 0x66, 0x6D],
        };
        vec![
            HostEvent::FieldActivated,
            HostEvent::TagDiscovered(tag),
            HostEvent::PeerLinkActivated(peer.clone()),
            HostEvent::HostEmulationActivated { technology: 1 },
            HostEvent::HostEmulationData {
                technology: 1,
                data: vec![0x00, 0xA4, 0x04, 0x00, 0xFF, 0x00],
            },
            HostEvent::HostEmulationDeactivated { technology: 1 },
            HostEvent::PeerLinkDeactivated(peer),
            HostEvent::FieldDeactivated,
        ]
    }

    #[test]
    fn test_each_event_routes_to_its_callback_in_order() {
        let listener = Arc::new(RecordingListener::default());
        let dispatcher = EventDispatcher::new(Arc::clone(&listener));

        let events = all_events();
        for event in events.clone() {
            dispatcher.dispatch(event);
        }

        let calls = listener.calls();
        let names: Vec<_> = calls.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "field_on",
                "tag",
                "link_up",
                "hce_on",
                "hce_data",
                "hce_off",
                "link_down",
                "field_off"
            ]
        );
        let received: Vec<_> = calls.into_iter().map(|(_, e)| e).collect();
        assert_eq!(received, events);
    }

    #[test]
    fn test_emulation_data_is_byte_exact() {
        let listener = Arc::new(RecordingListener::default());
        let dispatcher = EventDispatcher::new(Arc::clone(&listener));
        let data: Vec<u8> = (0..=255).collect();

        dispatcher.dispatch(HostEvent::HostEmulationData {
            technology: 2,
            data: data.clone(),
        });

        assert_eq!(
            listener.calls()[0].1,
            HostEvent::HostEmulationData {
                technology: 2,
                data
            }
        );
    }

    #[test]
    fn test_repeated_events_are_not_coalesced() {
        let dispatcher = EventDispatcher::new(Arc::new(RecordingListener::default()));
        let clone = dispatcher.clone();
        assert!(Arc::ptr_eq(dispatcher.listener(), clone.listener()));

        for _ in 0..3 {
            clone.dispatch(HostEvent::FieldActivated);
        }
        assert_eq!(dispatcher.listener().calls().len(), 3);
    }

    #[test]
    fn test_channel_listener_from_notification_thread() {
        let (listener, receiver) = ChannelListener::new();
        let dispatcher = EventDispatcher::new(Arc::new(listener));

        let events = all_events();
        let to_send = events.clone();
        let notifier = dispatcher.clone();
        std::thread::spawn(move || {
            for event in to_send {
                notifier.dispatch(event);
            }
        })
        .join()
        .unwrap();

        let received: Vec<_> = receiver.try_iter().collect();
        assert_eq!(received, events);
    }

    #[test]
    fn test_dyn_listener() {
        let dispatcher: EventDispatcher<dyn DeviceHostListener> =
            EventDispatcher::new(Arc::new(NullListener));
        dispatcher.dispatch(HostEvent::FieldDeactivated);
        dispatcher.dispatch(HostEvent::TagDiscovered(NativeTag {
            handle: 1,
            technologies: vec![],
            uid: vec![],
        }));
    }
}
