use super::*;

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

/// A loaded page plus the behavior controllers wired to it.
///
/// Every host action (`click`, `scroll_to`, `advance_time`, ...) runs to
/// completion: queued scroll events are delivered and intersection changes
/// are reported before the call returns.
#[derive(Debug)]
pub struct Page {
    host: Host,
    controllers: Option<Controllers>,
    config: PageConfig,
}

impl Page {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, PageConfig::default())
    }

    pub fn from_html_with_config(html: &str, config: PageConfig) -> Result<Self> {
        config.validate()?;
        let dom = html::parse_html(html)?;
        let scheduler = Box::new(VirtualScheduler::new(config.frame_interval_ms));
        let host = Host::new(dom, scheduler, config.viewport_height);
        Ok(Self {
            host,
            controllers: None,
            config,
        })
    }

    /// Replaces the scheduler. Only allowed before [`Page::init`].
    pub fn with_scheduler<S>(mut self, scheduler: S) -> Result<Self>
    where
        S: Scheduler + 'static,
    {
        if self.controllers.is_some() {
            return Err(Error::Runtime(
                "with_scheduler must be called before init".into(),
            ));
        }
        self.host.scheduler = Box::new(scheduler);
        Ok(self)
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Wires every controller, in order: navigation menu, scroll effect,
    /// smooth scroll, active navigation, media visibility, entrance
    /// animation.
    pub fn init(&mut self) -> Result<()> {
        if self.controllers.is_some() {
            return Err(Error::Runtime(
                "page behavior is already initialized; call teardown first".into(),
            ));
        }
        let controllers = Controllers::init(&mut self.host, &self.config)?;
        self.controllers = Some(controllers);
        self.settle()
    }

    /// Removes every listener and observation. Queued timers still fire
    /// but find no controller.
    pub fn teardown(&mut self) {
        if let Some(controllers) = self.controllers.take() {
            controllers.teardown(&mut self.host);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.controllers.is_some()
    }

    pub fn is_menu_open(&self) -> bool {
        self.controllers
            .as_ref()
            .is_some_and(|controllers| controllers.is_menu_open())
    }

    pub fn listener_count(&self) -> usize {
        self.host.listeners.len()
    }

    pub fn observation_count(&self) -> usize {
        self.host.observers.len()
    }

    pub fn is_observed(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.host.observers.is_observing(target))
    }

    /// `true` once the entrance animation has revealed the element.
    pub fn is_revealed(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self
            .controllers
            .as_ref()
            .and_then(|controllers| controllers.entrance.as_ref())
            .and_then(|entrance| entrance.state_of(target))
            == Some(controllers::entrance::RevealState::Revealed))
    }

    /// Smooth-scroll animations that have not reached their target yet.
    pub fn scroll_animations_in_flight(&self) -> usize {
        self.controllers
            .as_ref()
            .and_then(|controllers| controllers.smooth_scroll.as_ref())
            .map(|smooth_scroll| smooth_scroll.in_flight())
            .unwrap_or(0)
    }

    // Host actions.

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let event = EventState::new("click", EventTarget::Node(target), self.host.now_ms());
        self.dispatch_event(event)?;
        self.settle()
    }

    /// Dispatches `keydown` with `key` from the body, so it bubbles to the
    /// document.
    pub fn press_key(&mut self, key: &str) -> Result<()> {
        let target = self.host.dom.body().unwrap_or(self.host.dom.root);
        let event = EventState::new("keydown", EventTarget::Node(target), self.host.now_ms()).with_key(key);
        self.dispatch_event(event)?;
        self.settle()
    }

    pub fn dispatch(&mut self, selector: &str, event_type: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let event = EventState::new(event_type, EventTarget::Node(target), self.host.now_ms());
        self.dispatch_event(event)?;
        self.settle()
    }

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let is_field = self
            .host
            .dom
            .element(target)
            .is_some_and(|element| element.is_form_field());
        if !is_field {
            return Err(Error::Runtime(format!(
                "type_text target is not an input or textarea: {selector}"
            )));
        }
        self.host.dom.set_value(target, text)?;
        let event = EventState::new("input", EventTarget::Node(target), self.host.now_ms());
        self.dispatch_event(event)?;
        self.settle()
    }

    pub fn scroll_to(&mut self, y: f64) -> Result<()> {
        if !y.is_finite() {
            return Err(Error::Runtime(format!("scroll_to requires a finite offset, got {y}")));
        }
        self.host.scroll_to(y);
        self.settle()
    }

    pub fn scroll_y(&self) -> f64 {
        self.host.scroll_y()
    }

    /// Gives the first element matching `selector` an `offsetTop` and
    /// `offsetHeight`.
    pub fn set_layout(&mut self, selector: &str, top: f64, height: f64) -> Result<()> {
        if !top.is_finite() || !height.is_finite() || height < 0.0 {
            return Err(Error::Runtime(format!(
                "set_layout requires finite top and non-negative height (top={top}, height={height})"
            )));
        }
        let target = self.select_one(selector)?;
        self.host.layout.insert(target, LayoutBox { top, height });
        self.settle()
    }

    pub fn set_viewport_height(&mut self, height: f64) -> Result<()> {
        if !height.is_finite() || height <= 0.0 {
            return Err(Error::Runtime(format!(
                "set_viewport_height requires a positive height, got {height}"
            )));
        }
        self.host.viewport.height = height;
        self.settle()
    }

    pub fn set_autoplay_allowed(&mut self, allowed: bool) {
        self.host.media.autoplay_allowed = allowed;
    }

    /// `None` removes the network information capability.
    pub fn set_network_effective_type(&mut self, effective_type: Option<&str>) {
        self.host.network = effective_type.map(|effective_type| NetworkInformation {
            effective_type: effective_type.to_string(),
        });
    }

    /// Delivers an intersection entry with `ratio` for every observation of
    /// the first element matching `selector`.
    pub fn report_intersection(&mut self, selector: &str, ratio: f64) -> Result<()> {
        if !ratio.is_finite() {
            return Err(Error::Runtime(format!(
                "report_intersection requires a finite ratio, got {ratio}"
            )));
        }
        let target = self.select_one(selector)?;
        let entries = self.host.observers.forced(target, ratio);
        self.deliver_intersections(entries)?;
        self.settle()
    }

    pub fn is_playing(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        Ok(self.host.media.is_playing(target))
    }

    // Timers.

    pub fn now_ms(&self) -> i64 {
        self.host.now_ms()
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.host.scheduler.pending()
    }

    pub fn clear_timer(&mut self, timer_id: TimerId) -> bool {
        let existed = self.host.scheduler.cancel(timer_id);
        self.host
            .trace_timer_line(format!("[timer] clear id={timer_id} existed={existed}"));
        existed
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.host.scheduler.clear_all();
        self.host
            .trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    /// Runs every task due within `delta_ms`, moving the clock to each
    /// task's due time first, then leaves the clock at `now + delta_ms`.
    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.host.now_ms();
        let target = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(target))?;
        self.host.scheduler.set_now_ms(target);
        self.host.trace_timer_line(format!(
            "[timer] advance delta_ms={delta_ms} from={from} to={target} ran_due={ran}"
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let from = self.host.now_ms();
        if target_ms < from {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={from})"
            )));
        }
        let ran = self.run_timer_queue(Some(target_ms))?;
        self.host.scheduler.set_now_ms(target_ms);
        self.host.trace_timer_line(format!(
            "[timer] advance_to from={from} to={target_ms} ran_due={ran}"
        ));
        Ok(())
    }

    /// Runs tasks until the queue is empty, including ones scheduled while
    /// flushing.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.host.now_ms();
        let ran = self.run_timer_queue(None)?;
        self.host.trace_timer_line(format!(
            "[timer] flush from={from} to={} ran={ran}",
            self.host.now_ms()
        ));
        Ok(())
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.host.scheduler.take_next(None) else {
            self.host.trace_timer_line("[timer] run_next none".into());
            return Ok(false);
        };
        self.execute_task(task)?;
        Ok(true)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(task) = self.host.scheduler.take_next(due_limit) {
            steps += 1;
            if steps > self.config.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit, &task));
            }
            self.execute_task(task)?;
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>, next: &ScheduledTask) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        Error::Runtime(format!(
            "timer queue exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, next_task=id={},due_at={},task={:?}",
            self.config.timer_step_limit,
            self.host.now_ms(),
            next.id,
            next.due_at,
            next.task,
        ))
    }

    fn execute_task(&mut self, task: ScheduledTask) -> Result<()> {
        if task.due_at > self.host.now_ms() {
            self.host.scheduler.set_now_ms(task.due_at);
        }
        self.host.trace_timer_line(format!(
            "[timer] run id={} due_at={} kind={:?} task={:?} now_ms={}",
            task.id,
            task.due_at,
            task.kind,
            task.task,
            self.host.now_ms()
        ));
        if let Some(controllers) = self.controllers.as_mut() {
            controllers.run_task(&mut self.host, task.task, task.due_at)?;
        }
        self.settle()
    }

    // Event delivery.

    fn propagation_path(&self, event: &EventState) -> Vec<EventTarget> {
        let bubbles = event_bubbles(&event.event_type);
        let mut path = vec![event.target];
        if !bubbles {
            return path;
        }
        if let EventTarget::Node(node) = event.target {
            let mut cursor = self.host.dom.parent(node);
            while let Some(parent) = cursor {
                path.push(EventTarget::Node(parent));
                cursor = self.host.dom.parent(parent);
            }
            if self.host.dom.is_connected(node) {
                path.push(EventTarget::Window);
            }
        }
        path
    }

    fn dispatch_event(&mut self, mut event: EventState) -> Result<()> {
        let path = self.propagation_path(&event);
        let target_label = match event.target {
            EventTarget::Window => "window".to_string(),
            EventTarget::Node(node) => self.host.dom.node_label(node),
        };

        let mut handled = 0usize;
        for current in path {
            event.current_target = current;
            for (id, handler) in self.host.listeners.get(current, &event.event_type) {
                // Earlier handlers may have torn the page down.
                if !self.host.listeners.is_registered(id) {
                    continue;
                }
                let Some(controllers) = self.controllers.as_mut() else {
                    break;
                };
                controllers.handle_event(&mut self.host, handler, &mut event)?;
                handled += 1;
            }
            if event.propagation_stopped {
                break;
            }
        }

        self.host.trace_event_line(format!(
            "[event] {} target={target_label} handled={handled} default_prevented={}",
            event.event_type, event.default_prevented
        ));
        Ok(())
    }

    fn deliver_intersections(&mut self, entries: Vec<(ObserverOwner, IntersectionEntry)>) -> Result<()> {
        for (owner, entry) in entries {
            let label = self.host.dom.node_label(entry.target);
            self.host.trace_event_line(format!(
                "[intersection] {label} owner={owner:?} ratio={:.3} intersecting={}",
                entry.ratio, entry.is_intersecting
            ));
            if let Some(controllers) = self.controllers.as_mut() {
                controllers.deliver_intersection(&mut self.host, owner, entry)?;
            }
        }
        Ok(())
    }

    /// Drains queued events, then re-evaluates observations until nothing
    /// changes.
    fn settle(&mut self) -> Result<()> {
        let mut steps = 0usize;
        loop {
            steps += 1;
            if steps > self.config.timer_step_limit {
                return Err(Error::Runtime(format!(
                    "page did not settle within {} steps",
                    self.config.timer_step_limit
                )));
            }
            if let Some(event) = self.host.pending_events.pop_front() {
                self.dispatch_event(event)?;
                continue;
            }
            let entries = self.host.collect_intersections();
            if entries.is_empty() {
                return Ok(());
            }
            self.deliver_intersections(entries)?;
        }
    }

    // Forms.

    pub fn validate_form(&mut self, form_selector: &str) -> Result<bool> {
        let form = self.select_one(form_selector)?;
        let valid = forms::validate_form(&mut self.host.dom, form)?;
        self.host
            .trace_line(format!("[form] validate {form_selector} valid={valid}"));
        Ok(valid)
    }

    pub fn show_field_error(&mut self, selector: &str, message: &str) -> Result<()> {
        let field = self.select_one(selector)?;
        forms::show_error(&mut self.host.dom, field, message)
    }

    pub fn clear_field_error(&mut self, selector: &str) -> Result<()> {
        let field = self.select_one(selector)?;
        forms::clear_error(&mut self.host.dom, field)
    }

    // Inspection and assertions.

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.host
            .dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.host.dom.dump_node(node_id), 200)
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.host.dom.query_selector_all(selector)?.len())
    }

    pub fn has_class(&self, selector: &str, class_name: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.host.dom.class_contains(target, class_name)
    }

    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.attr(target, name))
    }

    pub fn style(&self, selector: &str, property: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.host.dom.style_get(target, property)
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.host.dom.value(target)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.class_contains(target, class_name)?;
        if actual != expected {
            let describe = |present: bool| {
                if present {
                    format!("class {class_name} present")
                } else {
                    format!("class {class_name} absent")
                }
            };
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: describe(expected),
                actual: describe(actual),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_attr(&self, selector: &str, name: &str, expected: Option<&str>) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.attr(target, name);
        if actual.as_deref() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{name}={expected:?}"),
                actual: format!("{name}={actual:?}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_style(&self, selector: &str, property: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.style_get(target, property)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("{property}: {expected}"),
                actual: format!("{property}: {actual}"),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.host.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.host.dom.dump_node(target))
    }

    // Trace.

    pub fn enable_trace(&mut self, enabled: bool) {
        self.host.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.host.trace_state.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.host.trace_state.timers = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.host.trace_state.log_limit = max_entries;
        while self.host.trace_state.logs.len() > max_entries {
            self.host.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.host.trace_state.logs.drain(..).collect()
    }
}
