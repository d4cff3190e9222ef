use super::*;

/// Cubic ease-in-out over `progress` in `[0, 1]`.
///
/// ```
/// use page_behavior::ease_in_out_cubic;
///
/// assert_eq!(ease_in_out_cubic(0.5), 0.5);
/// assert_eq!(ease_in_out_cubic(1.0), 1.0);
/// ```
pub fn ease_in_out_cubic(progress: f64) -> f64 {
    let p = progress.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}

/// Scroll offset at `progress` of an animation from `start` to `target`.
/// Returns `target` exactly once progress reaches 1.
pub fn scroll_position_at(start: f64, target: f64, progress: f64) -> f64 {
    if progress >= 1.0 {
        return target;
    }
    start + (target - start) * ease_in_out_cubic(progress)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Animation {
    start_y: f64,
    target_y: f64,
    started_at: Option<i64>,
}

/// In-page anchor scrolling. Animations are never cancelled: a second click
/// starts another one and both write the offset on their own frames.
#[derive(Debug)]
pub(crate) struct SmoothScrollController {
    navbar: Option<NodeId>,
    duration_ms: i64,
    animations: HashMap<u64, Animation>,
    next_animation: u64,
    generation: u64,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl SmoothScrollController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let anchors = host.query_all(&config.anchor_selector)?;
        if anchors.is_empty() {
            return Ok(None);
        }
        let navbar = host.query(&config.navbar_selector)?;
        let subscriptions = anchors
            .into_iter()
            .map(|anchor| host.add_listener(EventTarget::Node(anchor), "click", Handler::SmoothScrollAnchor))
            .collect();
        Ok(Some(Self {
            navbar,
            duration_ms: config.smooth_scroll_duration_ms,
            animations: HashMap::new(),
            next_animation: 0,
            generation: host.generation,
            subscriptions,
        }))
    }

    pub(crate) fn on_anchor_click(&mut self, host: &mut Host, event: &mut EventState) -> Result<()> {
        let Some(anchor) = event.current_node() else {
            return Ok(());
        };
        let Some(href) = host.dom.attr(anchor, "href") else {
            return Ok(());
        };
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(());
        };
        if fragment.is_empty() {
            return Ok(());
        }

        event.default_prevented = true;
        let Some(target) = host.dom.by_id(fragment) else {
            host.trace_line(format!("[smooth-scroll] missing target #{fragment}"));
            return Ok(());
        };

        let navbar_height = self.navbar.map(|navbar| host.offset_height(navbar)).unwrap_or(0.0);
        let target_y = (host.offset_top(target) - navbar_height).max(0.0);
        self.start(host, target_y);
        Ok(())
    }

    fn start(&mut self, host: &mut Host, target_y: f64) {
        self.next_animation += 1;
        let animation = self.next_animation;
        self.animations.insert(
            animation,
            Animation {
                start_y: host.scroll_y(),
                target_y,
                started_at: None,
            },
        );
        host.scheduler.request_animation_frame(Task::SmoothScrollFrame {
            generation: self.generation,
            animation,
        });
        host.trace_line(format!(
            "[smooth-scroll] start animation={animation} from={} to={target_y}",
            host.scroll_y()
        ));
    }

    pub(crate) fn on_frame(&mut self, host: &mut Host, animation: u64, timestamp: i64) {
        let Some(state) = self.animations.get_mut(&animation) else {
            return;
        };
        let started_at = *state.started_at.get_or_insert(timestamp);
        let elapsed = (timestamp - started_at).max(0) as f64;
        let progress = (elapsed / self.duration_ms as f64).min(1.0);
        host.scroll_to(scroll_position_at(state.start_y, state.target_y, progress));

        if progress < 1.0 {
            host.scheduler.request_animation_frame(Task::SmoothScrollFrame {
                generation: self.generation,
                animation,
            });
        } else {
            self.animations.remove(&animation);
        }
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.animations.len()
    }
}
