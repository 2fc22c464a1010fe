/// The three mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabId {
    #[default]
    Query,
    Records,
    Report,
}

impl TabId {
    pub const ALL: [TabId; 3] = [TabId::Query, TabId::Records, TabId::Report];

    pub fn label(self) -> &'static str {
        match self {
            TabId::Query => "Query",
            TabId::Records => "Records",
            TabId::Report => "Report",
        }
    }

    /// Parses a tab name as typed by a user, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|tab| tab.label().eq_ignore_ascii_case(name))
    }
}

/// Tracks the visible tab. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabState {
    current: TabId,
}

impl TabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> TabId {
        self.current
    }

    /// Returns `false` when `id` is already visible, so callers can skip a redraw.
    pub fn switch_to(&mut self, id: TabId) -> bool {
        if self.current == id {
            return false;
        }
        self.current = id;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{TabId, TabState};

    #[test]
    fn starts_on_query() {
        assert_eq!(TabState::new().current(), TabId::Query);
    }

    #[test]
    fn switching_to_current_tab_is_noop() {
        let mut tabs = TabState::new();
        assert!(!tabs.switch_to(TabId::Query));
        assert!(tabs.switch_to(TabId::Report));
        assert!(!tabs.switch_to(TabId::Report));
        assert_eq!(tabs.current(), TabId::Report);
    }

    #[test]
    fn any_tab_reachable_from_any_tab() {
        for from in TabId::ALL {
            for to in TabId::ALL {
                let mut tabs = TabState::new();
                tabs.switch_to(from);
                tabs.switch_to(to);
                assert_eq!(tabs.current(), to);
            }
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(TabId::parse("records"), Some(TabId::Records));
        assert_eq!(TabId::parse(" REPORT "), Some(TabId::Report));
        assert_eq!(TabId::parse("settings"), None);
    }
}
