use super::*;

/// Plays the hero video while it is on screen and pauses it otherwise.
#[derive(Debug)]
pub(crate) struct MediaController {
    video: NodeId,
    pub(crate) subscriptions: Vec<Subscription>,
}

impl MediaController {
    pub(crate) fn init(host: &mut Host, config: &PageConfig) -> Result<Option<Self>> {
        let Some(video) = host.query(&config.hero_video_selector)? else {
            return Ok(None);
        };

        let slow = host.network.as_ref().is_some_and(|network| {
            config
                .slow_network_types
                .iter()
                .any(|slow| slow.eq_ignore_ascii_case(&network.effective_type))
        });
        if slow {
            host.dom.set_attr(video, "preload", "none")?;
            host.trace_line("[media] slow network, preload=none".to_string());
        }

        let options = IntersectionOptions {
            threshold: config.video_visibility_threshold,
            root_margin_bottom: 0.0,
        };
        let subscriptions = vec![
            host.observe(ObserverOwner::Media, video, options),
            host.add_listener(EventTarget::Node(video), "error", Handler::MediaLoadError),
        ];
        Ok(Some(Self { video, subscriptions }))
    }

    pub(crate) fn on_intersection(&mut self, host: &mut Host, entry: IntersectionEntry) -> Result<()> {
        if entry.target != self.video {
            return Ok(());
        }
        if !entry.is_intersecting {
            host.pause(self.video);
            return Ok(());
        }
        if let Err(err) = host.play(self.video) {
            let label = host.dom.node_label(self.video);
            log::debug!(target: "page_behavior", "autoplay prevented for {label}: {err}");
            host.trace_line(format!("[media] play rejected {label}: {err}"));
        }
        Ok(())
    }

    pub(crate) fn on_load_error(&mut self, host: &mut Host) -> Result<()> {
        host.dom.style_set(self.video, "display", "none")?;
        host.trace_line("[media] load error, hidden".to_string());
        Ok(())
    }
}
