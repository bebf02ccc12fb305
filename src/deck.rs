// src/deck.rs
use crate::models::Insight;

/// Cursor over a computed slide sequence, revealed one slide at a time
#[derive(Debug, Clone)]
pub struct SlideDeck {
    slides: Vec<Insight>,
    current: usize,
}

impl SlideDeck {
    pub fn new(slides: Vec<Insight>) -> Self {
        Self { slides, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&Insight> {
        self.slides.get(self.current)
    }

    /// Move to the next slide, wrapping to the first after the last.
    pub fn advance(&mut self) -> Option<&Insight> {
        if self.slides.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.slides.len();
        self.current()
    }

    pub fn slides(&self) -> &[Insight] {
        &self.slides
    }
}
