use super::*;

#[derive(Debug)]
pub(crate) struct ScrollEffectController {
    navbar: NodeId,
    threshold: f64,
    /// Set while a frame is outstanding; at most one is.
    ticking: bool,
    generation: u64,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl ScrollEffectController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let Some(navbar) = host.query(&config.navbar_selector)? else {
            return Ok(None);
        };
        let subscriptions = vec![host.add_listener(EventTarget::Window, "scroll", Handler::ScrollEffect)];
        let controller = Self {
            navbar,
            threshold: config.scroll_threshold,
            ticking: false,
            generation: host.generation,
            subscriptions,
        };
        controller.update(host)?;
        Ok(Some(controller))
    }

    pub(crate) fn on_scroll(&mut self, host: &mut Host) {
        if self.ticking {
            return;
        }
        host.scheduler.request_animation_frame(Task::ScrollEffectFrame {
            generation: self.generation,
        });
        self.ticking = true;
    }

    pub(crate) fn on_frame(&mut self, host: &mut Host) -> Result<()> {
        self.ticking = false;
        self.update(host)
    }

    fn update(&self, host: &mut Host) -> Result<()> {
        let scrolled = host.scroll_y() > self.threshold;
        host.dom.class_set(self.navbar, "scrolled", scrolled)
    }
}
