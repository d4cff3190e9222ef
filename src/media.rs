use super::*;

/// Why the host refused to start playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The autoplay policy rejected the request.
    NotAllowed,
    /// The element is not a media element.
    NotSupported(String),
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed => write!(f, "NotAllowedError: play() was rejected by the autoplay policy"),
            Self::NotSupported(tag) => write!(f, "NotSupportedError: <{tag}> cannot play media"),
        }
    }
}

impl StdError for PlaybackError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NetworkInformation {
    pub(crate) effective_type: String,
}

#[derive(Debug)]
pub(crate) struct MediaRegistry {
    playing: HashSet<NodeId>,
    pub(crate) autoplay_allowed: bool,
}

impl Default for MediaRegistry {
    fn default() -> Self {
        Self {
            playing: HashSet::new(),
            autoplay_allowed: true,
        }
    }
}

pub(crate) fn is_media_tag(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("video") || tag.eq_ignore_ascii_case("audio")
}

impl MediaRegistry {
    pub(crate) fn play(&mut self, dom: &Dom, node: NodeId) -> std::result::Result<(), PlaybackError> {
        let tag = dom.tag_name(node).unwrap_or("#text");
        if !is_media_tag(tag) {
            return Err(PlaybackError::NotSupported(tag.to_string()));
        }
        if !self.autoplay_allowed {
            return Err(PlaybackError::NotAllowed);
        }
        self.playing.insert(node);
        Ok(())
    }

    pub(crate) fn pause(&mut self, node: NodeId) {
        self.playing.remove(&node);
    }

    pub(crate) fn is_playing(&self, node: NodeId) -> bool {
        self.playing.contains(&node)
    }
}
