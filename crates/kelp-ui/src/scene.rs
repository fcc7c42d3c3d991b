//! The scene: top-level windows and the per-frame driving loop.
//!
//! A host owns one [`Scene`], feeds it raw input through [`Scene::dispatch`],
//! ticks it with [`Scene::update`], and replays the [`DrawList`] filled by
//! [`Scene::render`]. Semantic events emitted during routing are
//! re-dispatched from the root; whatever no element consumes is queued for
//! the host to drain.

use std::collections::VecDeque;

use crate::coords::Vec2;
use crate::draw::{DrawList, Painter};
use crate::element::{Element, ElementKey, UpdateCtx};
use crate::event::{EventCtx, UiEvent};
use crate::text::FontMetrics;

/// Window stack plus the frame state that outlives any one pass.
///
/// Windows are kept in back-to-front paint order; events visit them
/// front-to-back, so the window painted on top gets the first look.
#[derive(Default)]
pub struct Scene {
    windows: Vec<Element>,
    host_events: Vec<UiEvent>,
    teardowns: Vec<ElementKey>,
    frame: u64,
    mouse: Vec2,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a window on top of the stack.
    pub fn add_window(&mut self, window: Element) {
        self.windows.push(window);
    }

    /// Pushes a batch of windows, e.g. everything a document load produced.
    pub fn add_windows(&mut self, windows: Vec<Element>) {
        self.windows.extend(windows);
    }

    pub fn windows(&self) -> &[Element] {
        &self.windows
    }

    /// Routes one host event through the scene, then re-dispatches every
    /// semantic event it triggers until the queue settles.
    ///
    /// [`UiEvent::MoveWindow`] and [`UiEvent::CloseWindow`] are handled
    /// here: elements know their own subtree but only the scene knows
    /// which window an element belongs to.
    pub fn dispatch(&mut self, event: UiEvent, fonts: &dyn FontMetrics) {
        let mut ctx = EventCtx::new(fonts);
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            match &event {
                UiEvent::MoveWindow { source, delta } => {
                    self.move_window(*source, *delta);
                    continue;
                }
                UiEvent::CloseWindow { source } => {
                    self.close_window(*source);
                    continue;
                }
                _ => {}
            }

            let mut consumed = false;
            for window in self.windows.iter_mut().rev() {
                if window.dispatch(&event, &mut ctx).is_consumed() {
                    consumed = true;
                    break;
                }
            }
            queue.extend(ctx.take_emitted());
            if !consumed {
                self.host_events.push(event);
            }
        }
    }

    fn move_window(&mut self, source: ElementKey, delta: Vec2) {
        match self.windows.iter_mut().find(|w| w.contains_key(source)) {
            Some(window) => {
                window.base.rect.origin = window.base.rect.origin + delta;
            }
            None => log::debug!("move request from unknown element {source:?}"),
        }
    }

    fn close_window(&mut self, source: ElementKey) {
        match self.windows.iter().position(|w| w.contains_key(source)) {
            Some(i) => {
                let window = self.windows.remove(i);
                window.collect_keys(&mut self.teardowns);
                log::info!("window `{}` closed", window.base.id);
            }
            None => log::debug!("close request from unknown element {source:?}"),
        }
    }

    /// Per-frame tick: advances the frame counter, refreshes absolute
    /// positions, and lets widgets update their hover and timer state.
    pub fn update(&mut self, mouse: Vec2) {
        self.frame += 1;
        self.mouse = mouse;
        let ctx = UpdateCtx { mouse, frame: self.frame };
        for window in &mut self.windows {
            window.update(Vec2::zero(), &ctx);
        }
    }

    /// Repaints every window, back to front, into `list`.
    pub fn render(&self, list: &mut DrawList, fonts: &dyn FontMetrics) {
        list.clear();
        let mut painter = Painter::new(list, fonts);
        for window in &self.windows {
            window.render(&mut painter);
        }
    }

    /// Drains the events no element consumed since the last call.
    pub fn take_host_events(&mut self) -> Vec<UiEvent> {
        std::mem::take(&mut self.host_events)
    }

    /// Drains the keys of elements torn down since the last call, children
    /// before parents.
    pub fn take_teardowns(&mut self) -> Vec<ElementKey> {
        std::mem::take(&mut self.teardowns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TreeBuilder, WidgetRegistry};
    use crate::composite::Templates;
    use crate::draw::DrawCmd;
    use crate::event::MouseButton;
    use crate::text::{BoxMetrics, NoImages};

    fn scene_from(src: &str) -> Scene {
        let registry = WidgetRegistry::with_builtins();
        let mut templates = Templates::new().unwrap();
        let fonts = BoxMetrics::new();
        let images = NoImages;
        let mut b = TreeBuilder::new(&registry, &mut templates, &fonts, &images);
        let windows = b.load_document("scene-test.xml", src).unwrap();

        let mut scene = Scene::new();
        scene.add_windows(windows);
        scene.update(Vec2::zero());
        scene
    }

    fn find_by_id<'a>(el: &'a Element, id: &str) -> Option<&'a Element> {
        if el.base.id == id {
            return Some(el);
        }
        el.behavior.children().iter().find_map(|c| find_by_id(c, id))
    }

    fn center_of(scene: &Scene, id: &str) -> Vec2 {
        let el = scene
            .windows()
            .iter()
            .find_map(|w| find_by_id(w, id))
            .unwrap_or_else(|| panic!("no element `{id}`"));
        let r = el.base.abs_rect();
        Vec2::new(r.left() + r.width() / 2.0, r.top() + r.height() / 2.0)
    }

    fn click(scene: &mut Scene, pos: Vec2, fonts: &dyn FontMetrics) {
        scene.dispatch(UiEvent::MouseDown { pos, button: MouseButton::Left }, fonts);
        scene.dispatch(UiEvent::MouseUp { pos, button: MouseButton::Left }, fonts);
    }

    #[test]
    fn button_click_reaches_the_host() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from(
            r#"<kelp>
                <Container>
                    <Button id="save">Save</Button>
                </Container>
            </kelp>"#,
        );

        let pos = center_of(&scene, "save");
        click(&mut scene, pos, &fonts);

        let events = scene.take_host_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, UiEvent::ButtonClick { id, .. } if id == "save")),
            "expected a ButtonClick in {events:?}"
        );
    }

    #[test]
    fn unconsumed_input_lands_in_host_events() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from("<kelp><Container><Button>hi</Button></Container></kelp>");

        scene.dispatch(
            UiEvent::MouseDown { pos: Vec2::new(900.0, 900.0), button: MouseButton::Left },
            &fonts,
        );
        let events = scene.take_host_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], UiEvent::MouseDown { .. }));
    }

    #[test]
    fn radio_group_stays_mutually_exclusive() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from(
            r#"<kelp>
                <Container>
                    <Radiobutton id="a" description="a"/>
                    <Radiobutton id="b" description="b" checked="true"/>
                    <Radiobutton id="c" description="c"/>
                </Container>
            </kelp>"#,
        );

        // Every click moves the mark; at most one member is ever checked.
        for id in ["a", "c", "b", "c"] {
            let pos = center_of(&scene, id);
            click(&mut scene, pos, &fonts);

            let mut list = DrawList::new();
            scene.render(&mut list, &fonts);
            let marks = list
                .cmds()
                .iter()
                .filter(|c| matches!(c, DrawCmd::Circle { border: None, .. }))
                .count();
            assert_eq!(marks, 1, "after clicking `{id}`");
        }
    }

    #[test]
    fn titlebar_drag_moves_the_whole_window() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from(
            r#"<kelp>
                <Frame id="win" caption="Demo">
                    <Button id="go">Go</Button>
                </Frame>
            </kelp>"#,
        );
        let before = scene.windows()[0].base.rect.origin;

        // Press on the title bar's free space, right of the buttons.
        let bar_rect = scene.windows()[0].behavior.children()[0].base.abs_rect();
        let press = Vec2::new(bar_rect.right() - 2.0, bar_rect.top() + 2.0);

        scene.dispatch(UiEvent::MouseDown { pos: press, button: MouseButton::Left }, &fonts);
        scene.dispatch(
            UiEvent::MouseMove { pos: press + Vec2::new(7.0, 9.0), delta: Vec2::new(7.0, 9.0) },
            &fonts,
        );

        let after = scene.windows()[0].base.rect.origin;
        assert_eq!(after, before + Vec2::new(7.0, 9.0));
    }

    #[test]
    fn close_button_tears_down_the_window() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from(
            r#"<kelp>
                <Frame id="win" caption="Demo">
                    <Button id="go">Go</Button>
                </Frame>
            </kelp>"#,
        );
        let window_key = scene.windows()[0].key();

        let pos = center_of(&scene, "close");
        click(&mut scene, pos, &fonts);

        assert!(scene.windows().is_empty());
        let keys = scene.take_teardowns();
        assert!(!keys.is_empty());
        // Children come before their parents; the window itself is last.
        assert_eq!(*keys.last().unwrap(), window_key);
    }

    #[test]
    fn closing_one_window_leaves_the_others() {
        let fonts = BoxMetrics::new();
        let mut scene = scene_from(
            r#"<kelp>
                <Frame id="one" caption="One" y="10"/>
                <Frame id="two" caption="Two" y="200"/>
            </kelp>"#,
        );
        assert_eq!(scene.windows().len(), 2);

        // Close the second window via its own close button.
        let close = scene
            .windows()
            .iter()
            .rev()
            .find_map(|w| find_by_id(w, "close"))
            .map(|el| el.base.abs_rect())
            .unwrap();
        let pos = Vec2::new(close.left() + 2.0, close.top() + 2.0);
        click(&mut scene, pos, &fonts);

        assert_eq!(scene.windows().len(), 1);
        assert_eq!(scene.windows()[0].base.id, "one");
    }

    #[test]
    fn update_advances_the_frame_counter() {
        let mut scene = scene_from("<kelp><Container><Button>hi</Button></Container></kelp>");
        scene.update(Vec2::zero());
        scene.update(Vec2::zero());
        assert_eq!(scene.frame, 3);
    }
}
