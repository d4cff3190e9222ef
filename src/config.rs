use super::*;

/// Element contract and tuning constants for every controller.
///
/// `Default` matches the markup of the reference landing page; a host with
/// different ids or class names overrides the selectors and keeps the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pub navbar_selector: String,
    pub menu_trigger_selector: String,
    pub menu_panel_selector: String,
    pub nav_link_selector: String,
    pub anchor_selector: String,
    pub section_selector: String,
    pub hero_video_selector: String,
    pub animated_selector: String,

    /// The navigation bar is `scrolled` strictly past this offset.
    pub scroll_threshold: f64,
    pub smooth_scroll_duration_ms: i64,
    pub frame_interval_ms: i64,
    pub active_nav_delay_ms: i64,
    pub active_nav_offset: f64,
    pub video_visibility_threshold: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin_bottom: f64,
    /// Effective connection types that switch the hero video to `preload="none"`.
    pub slow_network_types: Vec<String>,
    pub viewport_height: f64,
    pub timer_step_limit: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            navbar_selector: "#navbar".to_string(),
            menu_trigger_selector: "#hamburger".to_string(),
            menu_panel_selector: "#nav-menu".to_string(),
            nav_link_selector: ".nav-link".to_string(),
            anchor_selector: r##"a[href^="#"]"##.to_string(),
            section_selector: "section[id]".to_string(),
            hero_video_selector: "#hero-video".to_string(),
            animated_selector: ".service-card, .feature-box, .contact-item, .stat-item".to_string(),
            scroll_threshold: 50.0,
            smooth_scroll_duration_ms: 800,
            frame_interval_ms: scheduler::FRAME_DELAY_MS,
            active_nav_delay_ms: 100,
            active_nav_offset: 100.0,
            video_visibility_threshold: 0.1,
            reveal_threshold: 0.1,
            reveal_root_margin_bottom: -50.0,
            slow_network_types: vec!["slow-2g".to_string(), "2g".to_string()],
            viewport_height: 800.0,
            timer_step_limit: 10_000,
        }
    }
}

impl PageConfig {
    pub fn validate(&self) -> Result<()> {
        let selectors = [
            ("navbar_selector", &self.navbar_selector),
            ("menu_trigger_selector", &self.menu_trigger_selector),
            ("menu_panel_selector", &self.menu_panel_selector),
            ("nav_link_selector", &self.nav_link_selector),
            ("anchor_selector", &self.anchor_selector),
            ("section_selector", &self.section_selector),
            ("hero_video_selector", &self.hero_video_selector),
            ("animated_selector", &self.animated_selector),
        ];
        for (name, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(Error::InvalidConfig(format!("{name} must not be empty")));
            }
            parse_selector_groups(selector)
                .map_err(|_| Error::InvalidConfig(format!("{name} is not a supported selector: {selector}")))?;
        }

        let durations = [
            ("smooth_scroll_duration_ms", self.smooth_scroll_duration_ms),
            ("frame_interval_ms", self.frame_interval_ms),
            ("active_nav_delay_ms", self.active_nav_delay_ms),
        ];
        for (name, value) in durations {
            if value <= 0 {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }

        let thresholds = [
            ("video_visibility_threshold", self.video_visibility_threshold),
            ("reveal_threshold", self.reveal_threshold),
        ];
        for (name, value) in thresholds {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be within (0, 1], got {value}"
                )));
            }
        }

        if !self.scroll_threshold.is_finite() || self.scroll_threshold < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "scroll_threshold must be a non-negative number, got {}",
                self.scroll_threshold
            )));
        }
        if !self.active_nav_offset.is_finite() || !self.reveal_root_margin_bottom.is_finite() {
            return Err(Error::InvalidConfig("offsets must be finite".into()));
        }
        if !(self.viewport_height.is_finite() && self.viewport_height > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "viewport_height must be positive, got {}",
                self.viewport_height
            )));
        }
        if self.timer_step_limit == 0 {
            return Err(Error::InvalidConfig(
                "timer_step_limit requires at least 1 step".into(),
            ));
        }
        Ok(())
    }
}
