use super::*;

/// Marks the navigation link whose section contains the scroll offset.
/// Recomputation is deferred by a trailing timer; scroll events arriving
/// while one is pending are dropped.
#[derive(Debug)]
pub(crate) struct ActiveNavController {
    sections: Vec<NodeId>,
    links: Vec<NodeId>,
    navbar: Option<NodeId>,
    delay_ms: i64,
    offset: f64,
    pending: Option<TimerId>,
    generation: u64,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl ActiveNavController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let sections = host.query_all(&config.section_selector)?;
        if sections.is_empty() {
            return Ok(None);
        }
        let links = host.query_all(&config.nav_link_selector)?;
        let navbar = host.query(&config.navbar_selector)?;
        let subscriptions = vec![host.add_listener(EventTarget::Window, "scroll", Handler::ActiveNavScroll)];
        let controller = Self {
            sections,
            links,
            navbar,
            delay_ms: config.active_nav_delay_ms,
            offset: config.active_nav_offset,
            pending: None,
            generation: host.generation,
            subscriptions,
        };
        controller.recompute(host)?;
        Ok(Some(controller))
    }

    pub(crate) fn on_scroll(&mut self, host: &mut Host) {
        if self.pending.is_some() {
            return;
        }
        let task = Task::ActiveNavRecompute {
            generation: self.generation,
        };
        self.pending = Some(host.scheduler.set_timeout(task, self.delay_ms));
    }

    pub(crate) fn on_timer(&mut self, host: &mut Host) -> Result<()> {
        self.pending = None;
        self.recompute(host)
    }

    /// Id of the last section whose band contains the current offset.
    fn current_section(&self, host: &Host) -> Option<String> {
        let scroll_y = host.scroll_y();
        let navbar_height = self.navbar.map(|navbar| host.offset_height(navbar)).unwrap_or(0.0);
        self.sections
            .iter()
            .filter(|section| {
                let top = host.offset_top(**section) - navbar_height - self.offset;
                let height = host.offset_height(**section);
                scroll_y >= top && scroll_y < top + height
            })
            .filter_map(|section| host.dom.attr(*section, "id"))
            .last()
    }

    fn recompute(&self, host: &mut Host) -> Result<()> {
        let Some(current) = self.current_section(host) else {
            return Ok(());
        };
        let expected_href = format!("#{current}");
        for link in &self.links {
            host.dom.class_remove(*link, "active")?;
        }
        for link in &self.links {
            if host.dom.attr(*link, "href").as_deref() == Some(expected_href.as_str()) {
                host.dom.class_add(*link, "active")?;
            }
        }
        host.trace_line(format!("[active-nav] section={current}"));
        Ok(())
    }
}
