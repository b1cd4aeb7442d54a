//! In-memory platform: a fake page, a recording renderer and a recording
//! audio sink. Used by the native demo and by tests.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;

use super::{Page, Renderer};
use crate::Color;
use crate::audio::{AudioGroup, AudioSink, SoundClip};
use crate::sim::Rect;

/// Overlay/DOM calls seen by a [`HeadlessPage`]
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    DestroyBlock(usize),
    ShowHelp,
    HideHelp,
    ShowScore(u64, f32),
    HideScore,
    ShowPause,
    HidePause,
    ShowLives(i32),
    HideLives,
}

/// A page made of fixed rectangles
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    blocks: Vec<Option<Rect>>,
    /// Rect the help overlay adds to the block list while shown
    help_block: Option<Rect>,
    help_visible: bool,
    pub destroyed: Vec<usize>,
    pub events: Vec<PageEvent>,
}

impl HeadlessPage {
    pub fn new(blocks: Vec<Rect>) -> Self {
        Self {
            blocks: blocks.into_iter().map(Some).collect(),
            ..Default::default()
        }
    }

    /// Rows x columns of equal blocks starting at `origin`
    pub fn grid(origin: Vec2, rows: usize, cols: usize, size: Vec2, gap: f32) -> Self {
        let mut blocks = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                blocks.push(Rect::new(
                    origin.x + col as f32 * (size.x + gap),
                    origin.y + row as f32 * (size.y + gap),
                    size.x,
                    size.y,
                ));
            }
        }
        Self::new(blocks)
    }

    /// The help overlay becomes a block of its own once shown
    pub fn with_help_block(mut self, rect: Rect) -> Self {
        self.help_block = Some(rect);
        self
    }

    /// Move/resize an element (simulates page reflow)
    pub fn set_block(&mut self, id: usize, rect: Option<Rect>) {
        if let Some(slot) = self.blocks.get_mut(id) {
            *slot = rect;
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn count(&self, event: &PageEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

impl Page for HeadlessPage {
    fn block_bounds(&self) -> Vec<Option<Rect>> {
        let mut bounds = self.blocks.clone();
        if self.help_visible {
            if let Some(help) = self.help_block {
                bounds.push(Some(help));
            }
        }
        bounds
    }

    fn destroy_block(&mut self, id: usize) {
        self.destroyed.push(id);
        self.events.push(PageEvent::DestroyBlock(id));
    }

    fn show_help(&mut self) {
        self.help_visible = true;
        self.events.push(PageEvent::ShowHelp);
    }

    fn hide_help(&mut self) {
        self.help_visible = false;
        self.events.push(PageEvent::HideHelp);
    }

    fn show_score(&mut self, score: u64, multiplier: f32) {
        self.events.push(PageEvent::ShowScore(score, multiplier));
    }

    fn hide_score(&mut self) {
        self.events.push(PageEvent::HideScore);
    }

    fn show_pause(&mut self) {
        self.events.push(PageEvent::ShowPause);
    }

    fn hide_pause(&mut self) {
        self.events.push(PageEvent::HidePause);
    }

    fn show_lives(&mut self, lives: i32) {
        self.events.push(PageEvent::ShowLives(lives));
    }

    fn hide_lives(&mut self) {
        self.events.push(PageEvent::HideLives);
    }
}

/// Keeps the draw calls of the last frame
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: u64,
    pub clear_color: Option<Color>,
    pub rects: Vec<(Rect, Color)>,
    pub trails: Vec<(Vec2, f32, Color)>,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self, color: Color) {
        self.frames += 1;
        self.clear_color = Some(color);
        self.rects.clear();
        self.trails.clear();
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.rects.push((rect, color));
    }

    fn draw_trail(&mut self, point: Vec2, size: f32, color: Color) {
        self.trails.push((point, size, color));
    }
}

/// Audio calls seen by a [`RecordingAudio`]
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Play(SoundClip, AudioGroup, bool),
    Stop(SoundClip, AudioGroup, f32),
}

/// Audio sink that records calls into a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudio {
    /// Shared handle to the log; stays valid after the sink is boxed
    pub fn events(&self) -> Rc<RefCell<Vec<AudioEvent>>> {
        Rc::clone(&self.events)
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, clip: SoundClip, group: AudioGroup, looped: bool) {
        self.events
            .borrow_mut()
            .push(AudioEvent::Play(clip, group, looped));
    }

    fn stop(&mut self, clip: SoundClip, group: AudioGroup, fade_seconds: f32) {
        self.events
            .borrow_mut()
            .push(AudioEvent::Stop(clip, group, fade_seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_layout() {
        let page = HeadlessPage::grid(Vec2::new(10.0, 20.0), 2, 3, Vec2::new(50.0, 10.0), 5.0);
        let bounds = page.block_bounds();
        assert_eq!(bounds.len(), 6);
        assert_eq!(bounds[4], Some(Rect::new(65.0, 35.0, 50.0, 10.0)));
    }

    #[test]
    fn test_help_block_appears_while_shown() {
        let help = Rect::new(0.0, 0.0, 200.0, 40.0);
        let mut page = HeadlessPage::new(vec![Rect::new(0.0, 100.0, 10.0, 10.0)]).with_help_block(help);
        assert_eq!(page.block_bounds().len(), 1);
        page.show_help();
        assert_eq!(page.block_bounds(), vec![Some(Rect::new(0.0, 100.0, 10.0, 10.0)), Some(help)]);
        page.hide_help();
        assert_eq!(page.block_bounds().len(), 1);
    }

    #[test]
    fn test_renderer_clear_starts_frame() {
        let mut r = RecordingRenderer::default();
        r.clear(Color::rgb(0.0, 0.0, 0.0));
        r.draw_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgb(1.0, 1.0, 1.0));
        r.clear(Color::rgb(0.0, 0.0, 0.0));
        assert!(r.rects.is_empty());
        assert_eq!(r.frames, 2);
    }
}
