//! Read-side helpers the pages render from.

use crate::store::AppState;
use crate::structures::NewsItem;

pub const HOME_NEWS_COUNT: usize = 3;

pub fn published_news(state: &AppState) -> Vec<&NewsItem> {
    state.news.iter().filter(|n| n.is_published).collect()
}

pub fn news_detail<'a>(state: &'a AppState, id: &str) -> Option<&'a NewsItem> {
    state.news.iter().find(|n| n.id == id)
}

/// Sidebar news on the home page: the first `count` items as stored.
pub fn latest_news(state: &AppState, count: usize) -> &[NewsItem] {
    &state.news[..count.min(state.news.len())]
}

/// Position in the home page slider. Moves wrap around at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliderCursor {
    current: usize,
}

impl SliderCursor {
    pub fn current(&self) -> usize {
        self.current
    }

    pub fn next(&mut self, len: usize) {
        if len > 0 {
            self.current = (self.current + 1) % len;
        }
    }

    pub fn prev(&mut self, len: usize) {
        if len > 0 {
            self.current = (self.current % len + len - 1) % len;
        }
    }

    pub fn select(&mut self, index: usize, len: usize) {
        if index < len {
            self.current = index;
        }
    }

    /// Periodic auto-advance; also pulls the cursor back in range after the
    /// slider shrank.
    pub fn tick(&mut self, len: usize) {
        if self.current >= len {
            self.current = 0;
        } else {
            self.next(len);
        }
    }
}
