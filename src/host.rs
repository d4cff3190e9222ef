use super::*;

/// `offsetTop` / `offsetHeight` of a rendered element, in document units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutBox {
    pub(crate) top: f64,
    pub(crate) height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) scroll_y: f64,
    pub(crate) height: f64,
}

/// Something a controller registered and must release on teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Subscription {
    Listener(ListenerId),
    Observation(ObservationId),
}

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
        }
    }
}

/// The page the controllers act on: document, layout, viewport and the
/// browser capabilities (listeners, scheduler, observers, media).
#[derive(Debug)]
pub(crate) struct Host {
    pub(crate) dom: Dom,
    pub(crate) layout: HashMap<NodeId, LayoutBox>,
    pub(crate) viewport: Viewport,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) observers: ObserverRegistry,
    pub(crate) media: MediaRegistry,
    pub(crate) network: Option<NetworkInformation>,
    pub(crate) pending_events: VecDeque<EventState>,
    pub(crate) trace_state: TraceState,
    /// Bumped by every `init`; stamped on the tasks that controllers queue.
    pub(crate) generation: u64,
}

impl Host {
    pub(crate) fn new(dom: Dom, scheduler: Box<dyn Scheduler>, viewport_height: f64) -> Self {
        Self {
            dom,
            layout: HashMap::new(),
            viewport: Viewport {
                scroll_y: 0.0,
                height: viewport_height,
            },
            listeners: ListenerStore::default(),
            scheduler,
            observers: ObserverRegistry::default(),
            media: MediaRegistry::default(),
            network: None,
            pending_events: VecDeque::new(),
            trace_state: TraceState::default(),
            generation: 0,
        }
    }

    pub(crate) fn now_ms(&self) -> i64 {
        self.scheduler.now_ms()
    }

    pub(crate) fn query(&self, selector: &str) -> Result<Option<NodeId>> {
        self.dom.query_selector(selector)
    }

    pub(crate) fn query_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        self.dom.query_selector_all(selector)
    }

    pub(crate) fn layout_of(&self, node: NodeId) -> Option<LayoutBox> {
        if !self.dom.is_connected(node) {
            return None;
        }
        self.layout.get(&node).copied()
    }

    pub(crate) fn offset_top(&self, node: NodeId) -> f64 {
        self.layout_of(node).map(|layout| layout.top).unwrap_or(0.0)
    }

    pub(crate) fn offset_height(&self, node: NodeId) -> f64 {
        self.layout_of(node).map(|layout| layout.height).unwrap_or(0.0)
    }

    pub(crate) fn scroll_y(&self) -> f64 {
        self.viewport.scroll_y
    }

    /// `window.scrollTo(0, y)`. A change queues a single window `scroll`
    /// event until the page drains its event queue.
    pub(crate) fn scroll_to(&mut self, y: f64) {
        let y = if y.is_finite() { y.max(0.0) } else { 0.0 };
        if y == self.viewport.scroll_y {
            return;
        }
        self.viewport.scroll_y = y;
        let already_queued = self.pending_events.iter().any(|event| {
            event.target == EventTarget::Window && event.event_type == "scroll"
        });
        if !already_queued {
            let event = EventState::new("scroll", EventTarget::Window, self.now_ms());
            self.pending_events.push_back(event);
        }
    }

    pub(crate) fn add_listener(&mut self, target: EventTarget, event_type: &str, handler: Handler) -> Subscription {
        Subscription::Listener(self.listeners.add(target, event_type, handler))
    }

    pub(crate) fn observe(
        &mut self,
        owner: ObserverOwner,
        target: NodeId,
        options: IntersectionOptions,
    ) -> Subscription {
        Subscription::Observation(self.observers.observe(owner, target, options))
    }

    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) {
        match subscription {
            Subscription::Listener(id) => {
                self.listeners.remove(id);
            }
            Subscription::Observation(id) => {
                self.observers.remove(id);
            }
        }
    }

    pub(crate) fn play(&mut self, node: NodeId) -> std::result::Result<(), PlaybackError> {
        self.media.play(&self.dom, node)
    }

    pub(crate) fn pause(&mut self, node: NodeId) {
        self.media.pause(node);
    }

    /// Intersection changes for the current viewport and layout.
    pub(crate) fn collect_intersections(&mut self) -> Vec<(ObserverOwner, IntersectionEntry)> {
        let scroll_y = self.viewport.scroll_y;
        let height = self.viewport.height;
        let dom = &self.dom;
        let layout = &self.layout;
        self.observers.collect_changes(|target, options| {
            let layout = dom
                .is_connected(target)
                .then(|| layout.get(&target).copied())
                .flatten();
            let bottom = scroll_y + height + options.root_margin_bottom;
            intersection_ratio(layout, scroll_y, bottom)
        })
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.events {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace_state.enabled && self.trace_state.timers {
            self.trace_line(line);
        }
    }

    pub(crate) fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            log::debug!(target: "page_behavior", "{line}");
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }
}
