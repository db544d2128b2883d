use crate::state::SearchState;
use crate::types::SearchHit;

/// One dropdown entry
#[derive(Debug, Clone, PartialEq)]
pub struct HitRow {
    pub title: String,
    pub subtitle: String,
    pub badge: Option<String>,
    pub active: bool,
}

/// What the dropdown should show for the current state
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownView {
    pub visible: bool,
    pub rows: Vec<HitRow>,
    /// Shown instead of rows when there are none
    pub empty_text: Option<&'static str>,
    pub button_label: &'static str,
}

impl DropdownView {
    pub fn from_state(state: &SearchState) -> Self {
        let results = state.results();
        let long_enough = state.query().trim().chars().count() >= state.min_chars();
        let visible = state.is_open() && (!results.is_empty() || long_enough);

        let rows = results
            .iter()
            .enumerate()
            .map(|(i, hit)| HitRow {
                title: hit.title().to_string(),
                subtitle: hit.subtitle().to_string(),
                badge: badge(hit),
                active: state.active_index() == Some(i),
            })
            .collect::<Vec<_>>();

        let empty_text = if rows.is_empty() {
            Some(if state.is_loading() {
                "Searching…"
            } else {
                "No results"
            })
        } else {
            None
        };

        Self {
            visible,
            rows,
            empty_text,
            button_label: if state.is_loading() {
                "Searching…"
            } else {
                "Search"
            },
        }
    }
}

/// "4.2" for a professor's overall score, "Difficulty 3.0/5" for a class
pub fn badge(hit: &SearchHit) -> Option<String> {
    match hit {
        SearchHit::Professor { overall, .. } => overall.map(|score| format!("{score:.1}")),
        SearchHit::Class { difficulty, .. } => {
            difficulty.map(|level| format!("Difficulty {level:.1}/5"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Effect, Event};
    use std::time::Duration;

    fn loaded(hits: Vec<SearchHit>) -> SearchState {
        let mut state = SearchState::new(3, Duration::from_millis(300));
        state.apply(Event::Input("alg".into()));
        let effects = state.apply(Event::TimerFired { generation: 1 });
        let Some(Effect::Fetch { token, .. }) = effects.into_iter().next() else {
            panic!("expected fetch");
        };
        state.apply(Event::Response {
            token,
            outcome: Ok(hits),
        });
        state
    }

    #[test]
    fn test_badges() {
        assert_eq!(
            badge(&SearchHit::professor("a", "A", "", Some(4.24))).as_deref(),
            Some("4.2")
        );
        assert_eq!(
            badge(&SearchHit::class("b", "B", "", Some(3.0))).as_deref(),
            Some("Difficulty 3.0/5")
        );
        assert_eq!(badge(&SearchHit::class("b", "B", "", None)), None);
    }

    #[test]
    fn test_rows_mark_active_entry() {
        let mut state = loaded(vec![
            SearchHit::professor("a", "Ada", "Math", Some(4.9)),
            SearchHit::class("CS 2201", "Data Structures", "CS", Some(3.5)),
        ]);
        state.apply(Event::Hover(1));

        let view = DropdownView::from_state(&state);

        assert!(view.visible);
        assert_eq!(view.rows.len(), 2);
        assert!(!view.rows[0].active);
        assert!(view.rows[1].active);
        assert_eq!(view.rows[1].subtitle, "CS");
        assert_eq!(view.empty_text, None);
        assert_eq!(view.button_label, "Search");
    }

    #[test]
    fn test_empty_results_show_no_results() {
        let view = DropdownView::from_state(&loaded(Vec::new()));
        assert!(view.visible);
        assert_eq!(view.empty_text, Some("No results"));
    }

    #[test]
    fn test_loading_labels() {
        let mut state = SearchState::new(3, Duration::from_millis(300));
        state.apply(Event::Input("algo".into()));
        state.apply(Event::TimerFired { generation: 1 });

        let view = DropdownView::from_state(&state);
        assert!(!view.visible);
        assert_eq!(view.empty_text, Some("Searching…"));
        assert_eq!(view.button_label, "Searching…");
    }

    #[test]
    fn test_hidden_when_closed() {
        let mut state = loaded(vec![SearchHit::professor("a", "Ada", "Math", None)]);
        state.apply(Event::Blur);
        assert!(!DropdownView::from_state(&state).visible);
    }
}
