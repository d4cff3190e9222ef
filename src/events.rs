use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum EventTarget {
    Window,
    Node(NodeId),
}

/// Which controller reaction a listener runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    ToggleMenu,
    CloseMenuFromLink,
    CloseMenuOnOutsideClick,
    CloseMenuOnEscape,
    ScrollEffect,
    SmoothScrollAnchor,
    ActiveNavScroll,
    MediaLoadError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ListenerId(pub(crate) u64);

#[derive(Debug, Clone)]
pub(crate) struct Listener {
    pub(crate) id: ListenerId,
    pub(crate) target: EventTarget,
    pub(crate) event_type: String,
    pub(crate) handler: Handler,
}

#[derive(Debug, Default)]
pub(crate) struct ListenerStore {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl ListenerStore {
    pub(crate) fn add(&mut self, target: EventTarget, event_type: &str, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Listener {
            id,
            target,
            event_type: event_type.to_string(),
            handler,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.listeners.len() != before
    }

    /// Handlers registered on `target` for `event_type`, in registration order.
    pub(crate) fn get(&self, target: EventTarget, event_type: &str) -> Vec<(ListenerId, Handler)> {
        self.listeners
            .iter()
            .filter(|listener| listener.target == target && listener.event_type == event_type)
            .map(|listener| (listener.id, listener.handler))
            .collect()
    }

    pub(crate) fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|listener| listener.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: EventTarget,
    pub(crate) current_target: EventTarget,
    pub(crate) key: Option<String>,
    pub(crate) default_prevented: bool,
    pub(crate) propagation_stopped: bool,
    pub(crate) time_stamp: i64,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: EventTarget, time_stamp: i64) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            key: None,
            default_prevented: false,
            propagation_stopped: false,
            time_stamp,
        }
    }

    pub(crate) fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    pub(crate) fn target_node(&self) -> Option<NodeId> {
        match self.target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }

    pub(crate) fn current_node(&self) -> Option<NodeId> {
        match self.current_target {
            EventTarget::Node(node) => Some(node),
            EventTarget::Window => None,
        }
    }
}

pub(crate) fn event_bubbles(event_type: &str) -> bool {
    !matches!(
        event_type,
        "scroll" | "error" | "load" | "focus" | "blur" | "play" | "pause"
    )
}
