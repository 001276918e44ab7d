//! Scene graph arena and redraw propagation.
//!
//! Every surface lives in one [`Scene`], addressed by typed handles. A
//! parent owns its children through its containers; the child only records
//! the parent's handle so redraw marks can walk upward. No drawing happens
//! here: the compositor reads the tree and clears the flags it consumed.

use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::SceneConfig;
use crate::data_structures::BoundedList;
use crate::devices::framebuffer::color::Color;
use crate::error::{GfxError, Result};
use crate::ui::surface::{
    Image, ImageId, Label, LabelId, Surface, SurfaceId, View, ViewId, Window, WindowId,
};

struct Slot<'a> {
    generation: u32,
    surface: Option<Surface<'a>>,
}

/// Arena of surfaces. `'a` bounds the borrowed label text and image pixels.
pub struct Scene<'a> {
    slots: Vec<Slot<'a>>,
    free: Vec<u32>,
    live: usize,
    config: SceneConfig,
}

impl Default for Scene<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame of a window's content view: inset by `2 * border` horizontally,
/// by the title bar on top and by `border` at the bottom.
pub fn content_frame(window: Rectangle, border_width: u32, title_height: u32) -> Result<Rectangle> {
    let border = i64::from(border_width);
    let width = i64::from(window.size.width) - 4 * border;
    let height = i64::from(window.size.height) - i64::from(title_height) - 2 * border;
    if width < 0 || height < 0 {
        return Err(GfxError::InvalidGeometry);
    }

    let x = i32::try_from(2 * border).map_err(|_| GfxError::InvalidGeometry)?;
    let y = i32::try_from(title_height).map_err(|_| GfxError::InvalidGeometry)?;
    Ok(Rectangle::new(
        Point::new(x, y),
        Size::new(width as u32, height as u32),
    ))
}

impl<'a> Scene<'a> {
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Number of live surfaces.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    // -- Construction --

    pub fn create_view(&mut self, frame: Rectangle) -> Result<ViewId> {
        let view = View::new(
            frame,
            self.config.palette.view_background,
            self.config.child_capacity,
        )?;
        self.insert(Surface::View(view)).map(ViewId)
    }

    pub fn create_label(&mut self, frame: Rectangle, text: &'a str) -> Result<LabelId> {
        let label = Label {
            frame,
            text,
            text_color: self.config.palette.label_text,
            parent: None,
            needs_redraw: true,
        };
        self.insert(Surface::Label(label)).map(LabelId)
    }

    pub fn create_image(&mut self, frame: Rectangle, bitmap: &'a [u32]) -> Result<ImageId> {
        let image = Image {
            frame,
            bitmap,
            parent: None,
            needs_redraw: true,
        };
        self.insert(Surface::Image(image)).map(ImageId)
    }

    /// Builds a window together with its title view (bar and label) and its
    /// content view. The title view is built first: the content view's inset
    /// depends on the title's resolved height. Nothing stays allocated when
    /// any step fails.
    pub fn create_window(&mut self, frame: Rectangle) -> Result<WindowId> {
        let mut built = [None; 2];
        let window = self.build_window(frame, &mut built);
        if window.is_err() {
            for id in built.into_iter().flatten() {
                self.release_subtree(id);
            }
        }
        window
    }

    fn build_window(
        &mut self,
        frame: Rectangle,
        built: &mut [Option<SurfaceId>; 2],
    ) -> Result<WindowId> {
        let border_color = self.config.palette.window_border;
        let border_width = self.config.border_width;
        let title = self.config.default_title;

        let (title_view, title_label) = self.create_title_view(frame.size.width, border_color, title)?;
        built[0] = Some(title_view.0);

        let title_height = self.view(title_view)?.frame.size.height;
        let content_view = self.create_view(content_frame(frame, border_width, title_height)?)?;
        built[1] = Some(content_view.0);
        self.view_mut(content_view)?.background_color = self.config.palette.content_background;

        let window = Window {
            frame,
            border_color,
            border_width,
            title,
            subwindows: BoundedList::try_new(self.config.child_capacity)?,
            title_view,
            title_label,
            content_view,
            parent: None,
            needs_redraw: true,
        };
        let id = WindowId(self.insert(Surface::Window(window))?);

        self.get_mut(title_view.0)?.set_parent(Some(id.0));
        self.get_mut(content_view.0)?.set_parent(Some(id.0));
        Ok(id)
    }

    fn create_title_view(
        &mut self,
        width: u32,
        background: Color,
        title: &'a str,
    ) -> Result<(ViewId, LabelId)> {
        let bar = Rectangle::new(Point::zero(), Size::new(width, self.config.title_height));
        let view = self.create_view(bar)?;
        self.view_mut(view)?.background_color = background;

        let label = self
            .create_label(Rectangle::new(self.config.title_inset, bar.size), title)
            .and_then(|label| {
                self.label_mut(label)?.text_color = self.config.palette.title_text;
                self.add_sublabel(view, label)?;
                Ok(label)
            });
        match label {
            Ok(label) => Ok((view, label)),
            Err(err) => {
                self.release_subtree(view.0);
                Err(err)
            }
        }
    }

    // -- Lookup --

    pub fn contains(&self, id: impl Into<SurfaceId>) -> bool {
        self.get(id.into()).is_ok()
    }

    pub fn surface(&self, id: impl Into<SurfaceId>) -> Result<&Surface<'a>> {
        self.get(id.into())
    }

    pub fn view(&self, id: ViewId) -> Result<&View> {
        match self.get(id.0)? {
            Surface::View(view) => Ok(view),
            _ => Err(GfxError::NotFound),
        }
    }

    pub fn window(&self, id: WindowId) -> Result<&Window<'a>> {
        match self.get(id.0)? {
            Surface::Window(window) => Ok(window),
            _ => Err(GfxError::NotFound),
        }
    }

    pub fn label(&self, id: LabelId) -> Result<&Label<'a>> {
        match self.get(id.0)? {
            Surface::Label(label) => Ok(label),
            _ => Err(GfxError::NotFound),
        }
    }

    pub fn image(&self, id: ImageId) -> Result<&Image<'a>> {
        match self.get(id.0)? {
            Surface::Image(image) => Ok(image),
            _ => Err(GfxError::NotFound),
        }
    }

    pub fn frame(&self, id: impl Into<SurfaceId>) -> Result<Rectangle> {
        self.get(id.into()).map(Surface::frame)
    }

    pub fn parent(&self, id: impl Into<SurfaceId>) -> Result<Option<SurfaceId>> {
        self.get(id.into()).map(Surface::parent)
    }

    pub fn needs_redraw(&self, id: impl Into<SurfaceId>) -> Result<bool> {
        self.get(id.into()).map(Surface::needs_redraw)
    }

    // -- Invalidation --

    /// Marks `id` and its ancestors dirty, stopping at the first surface
    /// that already is. Returns how many surfaces changed state.
    pub fn mark_needs_redraw(&mut self, id: impl Into<SurfaceId>) -> Result<usize> {
        let mut next = Some(id.into());
        let mut marked = 0;
        while let Some(id) = next {
            let surface = self.get_mut(id)?;
            if surface.needs_redraw() {
                break;
            }
            surface.set_needs_redraw(true);
            marked += 1;
            next = surface.parent();
        }
        Ok(marked)
    }

    /// Clears the flag on `id` alone; ancestors are left as they are.
    pub fn clear_needs_redraw(&mut self, id: impl Into<SurfaceId>) -> Result<()> {
        self.get_mut(id.into())?.set_needs_redraw(false);
        Ok(())
    }

    // -- Mutation --

    pub fn set_background_color(&mut self, view: ViewId, color: Color) -> Result<()> {
        self.view_mut(view)?.background_color = color;
        self.mark_needs_redraw(view).map(drop)
    }

    pub fn set_frame(&mut self, id: impl Into<SurfaceId>, frame: Rectangle) -> Result<()> {
        let id = id.into();
        self.get_mut(id)?.set_frame(frame);
        self.mark_needs_redraw(id).map(drop)
    }

    pub fn set_border_width(&mut self, window: WindowId, width: u32) -> Result<()> {
        self.window_mut(window)?.border_width = width;
        self.mark_needs_redraw(window).map(drop)
    }

    pub fn set_label_text(&mut self, label: LabelId, text: &'a str) -> Result<()> {
        self.label_mut(label)?.text = text;
        self.mark_needs_redraw(label).map(drop)
    }

    pub fn set_text_color(&mut self, label: LabelId, color: Color) -> Result<()> {
        self.label_mut(label)?.text_color = color;
        self.mark_needs_redraw(label).map(drop)
    }

    /// Renames the window and rewrites its title label, if that label is
    /// still alive.
    pub fn set_title(&mut self, window: WindowId, title: &'a str) -> Result<()> {
        let w = self.window_mut(window)?;
        w.title = title;
        let label = w.title_label;
        if self.contains(label) {
            self.set_label_text(label, title)?;
        }
        self.mark_needs_redraw(window).map(drop)
    }

    // -- Topology --

    pub fn add_sublabel(&mut self, view: ViewId, label: LabelId) -> Result<()> {
        self.attach(view.0, label.0, |parent| match parent {
            Surface::View(v) => v.labels.push(label),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn remove_sublabel(&mut self, view: ViewId, label: LabelId) -> Result<()> {
        self.detach(view.0, label.0, |parent| match parent {
            Surface::View(v) => v.labels.remove_item(&label),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn add_subimage(&mut self, view: ViewId, image: ImageId) -> Result<()> {
        self.attach(view.0, image.0, |parent| match parent {
            Surface::View(v) => v.images.push(image),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn remove_subimage(&mut self, view: ViewId, image: ImageId) -> Result<()> {
        self.detach(view.0, image.0, |parent| match parent {
            Surface::View(v) => v.images.remove_item(&image),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn add_subview(&mut self, view: ViewId, subview: ViewId) -> Result<()> {
        self.attach(view.0, subview.0, |parent| match parent {
            Surface::View(v) => v.subviews.push(subview),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn remove_subview(&mut self, view: ViewId, subview: ViewId) -> Result<()> {
        self.detach(view.0, subview.0, |parent| match parent {
            Surface::View(v) => v.subviews.remove_item(&subview),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn add_subwindow(&mut self, window: WindowId, subwindow: WindowId) -> Result<()> {
        self.attach(window.0, subwindow.0, |parent| match parent {
            Surface::Window(w) => w.subwindows.push(subwindow),
            _ => Err(GfxError::NotFound),
        })
    }

    pub fn remove_subwindow(&mut self, window: WindowId, subwindow: WindowId) -> Result<()> {
        self.detach(window.0, subwindow.0, |parent| match parent {
            Surface::Window(w) => w.subwindows.remove_item(&subwindow),
            _ => Err(GfxError::NotFound),
        })
    }

    /// Releases `id` and everything it owns. The surface is first unlinked
    /// from its parent, which is marked dirty. A window's title and content
    /// views go away with the window only.
    pub fn destroy(&mut self, id: impl Into<SurfaceId>) -> Result<()> {
        let id = id.into();
        if let Some(parent) = self.get(id)?.parent() {
            match self.get_mut(parent)? {
                Surface::Window(w) if w.owns_view(id) => return Err(GfxError::InvalidHierarchy),
                surface => surface.remove_child(id)?,
            }
            self.mark_needs_redraw(parent)?;
        }
        self.release_subtree(id);
        Ok(())
    }

    fn attach(
        &mut self,
        parent: SurfaceId,
        child: SurfaceId,
        insert: impl FnOnce(&mut Surface<'a>) -> Result<()>,
    ) -> Result<()> {
        if self.get(child)?.parent().is_some() || self.is_ancestor_or_self(child, parent)? {
            return Err(GfxError::InvalidHierarchy);
        }
        insert(self.get_mut(parent)?)?;

        let surface = self.get_mut(child)?;
        surface.set_parent(Some(parent));
        surface.set_needs_redraw(true);
        self.mark_needs_redraw(parent).map(drop)
    }

    fn detach(
        &mut self,
        parent: SurfaceId,
        child: SurfaceId,
        remove: impl FnOnce(&mut Surface<'a>) -> Result<usize>,
    ) -> Result<()> {
        self.get(child)?;
        remove(self.get_mut(parent)?)?;

        let surface = self.get_mut(child)?;
        surface.set_parent(None);
        surface.set_needs_redraw(true);
        self.mark_needs_redraw(parent).map(drop)
    }

    fn is_ancestor_or_self(&self, candidate: SurfaceId, of: SurfaceId) -> Result<bool> {
        let mut next = Some(of);
        while let Some(id) = next {
            if id == candidate {
                return Ok(true);
            }
            next = self.get(id)?.parent();
        }
        Ok(false)
    }

    // -- Slots --

    fn insert(&mut self, surface: Surface<'a>) -> Result<SurfaceId> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| GfxError::ResourceExhausted)?;
                self.slots.try_reserve(1)?;
                self.slots.push(Slot {
                    generation: 0,
                    surface: None,
                });
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.surface = Some(surface);
        self.live += 1;
        Ok(SurfaceId {
            index,
            generation: slot.generation,
        })
    }

    fn get(&self, id: SurfaceId) -> Result<&Surface<'a>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.surface.as_ref())
            .ok_or(GfxError::NotFound)
    }

    fn get_mut(&mut self, id: SurfaceId) -> Result<&mut Surface<'a>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.surface.as_mut())
            .ok_or(GfxError::NotFound)
    }

    fn view_mut(&mut self, id: ViewId) -> Result<&mut View> {
        match self.get_mut(id.0)? {
            Surface::View(view) => Ok(view),
            _ => Err(GfxError::NotFound),
        }
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut Window<'a>> {
        match self.get_mut(id.0)? {
            Surface::Window(window) => Ok(window),
            _ => Err(GfxError::NotFound),
        }
    }

    fn label_mut(&mut self, id: LabelId) -> Result<&mut Label<'a>> {
        match self.get_mut(id.0)? {
            Surface::Label(label) => Ok(label),
            _ => Err(GfxError::NotFound),
        }
    }

    fn take(&mut self, id: SurfaceId) -> Option<Surface<'a>> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)?;
        let surface = slot.surface.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.live -= 1;
        // A slot that cannot be queued for reuse is simply never handed out again.
        if self.free.try_reserve(1).is_ok() {
            self.free.push(id.index);
        }
        Some(surface)
    }

    fn release_subtree(&mut self, id: SurfaceId) {
        if let Some(surface) = self.take(id) {
            for child in surface.children() {
                self.release_subtree(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn rect(x: i32, y: i32, w: u32, h: u32) -> Rectangle {
        Rectangle::new(Point::new(x, y), Size::new(w, h))
    }

    fn clean_all(scene: &mut Scene<'_>, ids: &[SurfaceId]) {
        for &id in ids {
            scene.clear_needs_redraw(id).unwrap();
        }
    }

    #[test]
    fn new_view_has_defaults() {
        let mut scene = Scene::new();
        let view = scene.create_view(rect(1, 2, 30, 40)).unwrap();
        let v = scene.view(view).unwrap();

        assert_eq!(v.frame(), rect(1, 2, 30, 40));
        assert_eq!(v.background_color(), Color::GREEN);
        assert_eq!(v.parent(), None);
        assert!(v.needs_redraw());
        assert!(v.subviews().is_empty() && v.labels().is_empty() && v.images().is_empty());
    }

    #[test]
    fn window_builds_title_and_content_views() {
        let mut scene = Scene::new();
        let window = scene.create_window(rect(0, 0, 300, 200)).unwrap();
        let w = scene.window(window).unwrap();
        assert_eq!(w.title(), "Window");
        assert_eq!(w.border_color(), Color::BLUE);
        assert_eq!(w.border_width(), 1);

        let title = scene.view(w.title_view()).unwrap();
        assert_eq!(title.frame(), rect(0, 0, 300, 20));
        assert_eq!(title.background_color(), Color::BLUE);
        assert_eq!(title.parent(), Some(window.id()));

        let label = scene.label(title.labels()[0]).unwrap();
        assert_eq!(label.text(), "Window");
        assert_eq!(label.text_color(), Color::WHITE);
        assert_eq!(label.frame(), rect(15, 5, 300, 20));

        let content = scene.view(w.content_view()).unwrap();
        assert_eq!(content.frame(), rect(2, 20, 296, 178));
        assert_eq!(content.background_color(), Color::WHITE);
        assert_eq!(content.parent(), Some(window.id()));
    }

    #[test]
    fn content_frame_follows_border_and_title_height() {
        let frame = rect(0, 0, 640, 480);
        assert_eq!(content_frame(frame, 3, 20).unwrap(), rect(6, 20, 628, 454));
        assert_eq!(content_frame(frame, 0, 0).unwrap(), rect(0, 0, 640, 480));
    }

    #[test]
    fn window_too_small_for_its_border_is_rejected() {
        let mut scene = Scene::new();
        assert_eq!(
            scene.create_window(rect(0, 0, 3, 100)),
            Err(GfxError::InvalidGeometry)
        );
        assert_eq!(
            scene.create_window(rect(0, 0, 100, 21)),
            Err(GfxError::InvalidGeometry)
        );
        assert!(scene.is_empty());
    }

    #[test]
    fn marking_propagates_to_every_ancestor_only() {
        let mut scene = Scene::new();
        let root = scene.create_view(rect(0, 0, 100, 100)).unwrap();
        let left = scene.create_view(rect(0, 0, 50, 100)).unwrap();
        let right = scene.create_view(rect(50, 0, 50, 100)).unwrap();
        let leaf = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        scene.add_subview(root, left).unwrap();
        scene.add_subview(root, right).unwrap();
        scene.add_subview(left, leaf).unwrap();
        clean_all(&mut scene, &[root.0, left.0, right.0, leaf.0]);

        assert_eq!(scene.mark_needs_redraw(leaf), Ok(3));
        assert!(scene.needs_redraw(leaf).unwrap());
        assert!(scene.needs_redraw(left).unwrap());
        assert!(scene.needs_redraw(root).unwrap());
        assert!(!scene.needs_redraw(right).unwrap());
    }

    #[test]
    fn marking_twice_does_no_extra_work() {
        let mut scene = Scene::new();
        let root = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let child = scene.create_view(rect(0, 0, 5, 5)).unwrap();
        scene.add_subview(root, child).unwrap();
        clean_all(&mut scene, &[root.0, child.0]);

        assert_eq!(scene.mark_needs_redraw(child), Ok(2));
        assert_eq!(scene.mark_needs_redraw(child), Ok(0));
        assert_eq!(scene.mark_needs_redraw(root), Ok(0));
    }

    #[test]
    fn marking_stops_at_first_dirty_ancestor() {
        let mut scene = Scene::new();
        let root = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let mid = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let leaf = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        scene.add_subview(root, mid).unwrap();
        scene.add_subview(mid, leaf).unwrap();
        clean_all(&mut scene, &[root.0, leaf.0]);

        // mid is still dirty, so root must not be reached
        assert_eq!(scene.mark_needs_redraw(leaf), Ok(1));
        assert!(!scene.needs_redraw(root).unwrap());
    }

    #[test]
    fn dirt_inside_a_window_reaches_the_window() {
        let mut scene = Scene::new();
        let window = scene.create_window(rect(0, 0, 200, 100)).unwrap();
        let content = scene.window(window).unwrap().content_view();
        clean_all(&mut scene, &[window.0, content.0]);

        scene.set_background_color(content, Color::RED).unwrap();
        assert!(scene.needs_redraw(window).unwrap());
    }

    #[test]
    fn container_capacity_is_a_hard_ceiling() {
        let mut scene = Scene::new();
        let view = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        for _ in 0..64 {
            let label = scene.create_label(rect(0, 0, 1, 1), "x").unwrap();
            scene.add_sublabel(view, label).unwrap();
        }
        let extra = scene.create_label(rect(0, 0, 1, 1), "x").unwrap();

        assert_eq!(scene.add_sublabel(view, extra), Err(GfxError::ResourceExhausted));
        assert_eq!(scene.view(view).unwrap().labels().len(), 64);
        assert!(!scene.view(view).unwrap().labels().contains(&extra));
        assert_eq!(scene.parent(extra), Ok(None));
    }

    #[test]
    fn subview_capacity_is_a_hard_ceiling() {
        let mut scene = Scene::new();
        let view = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        for _ in 0..64 {
            let child = scene.create_view(rect(0, 0, 1, 1)).unwrap();
            scene.add_subview(view, child).unwrap();
        }
        let extra = scene.create_view(rect(0, 0, 1, 1)).unwrap();

        assert_eq!(scene.add_subview(view, extra), Err(GfxError::ResourceExhausted));
        assert_eq!(scene.view(view).unwrap().subviews().len(), 64);
        assert_eq!(scene.parent(extra), Ok(None));
    }

    #[test]
    fn subimage_capacity_is_a_hard_ceiling() {
        let mut scene = Scene::new();
        let view = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        for _ in 0..64 {
            let image = scene.create_image(rect(0, 0, 1, 1), &[0]).unwrap();
            scene.add_subimage(view, image).unwrap();
        }
        let extra = scene.create_image(rect(0, 0, 1, 1), &[0]).unwrap();

        assert_eq!(scene.add_subimage(view, extra), Err(GfxError::ResourceExhausted));
        assert_eq!(scene.view(view).unwrap().images().len(), 64);
        assert_eq!(scene.parent(extra), Ok(None));
    }

    #[test]
    fn subwindow_capacity_is_a_hard_ceiling() {
        let mut scene = Scene::new();
        let root = scene.create_window(rect(0, 0, 400, 300)).unwrap();
        for _ in 0..64 {
            let child = scene.create_window(rect(0, 0, 40, 40)).unwrap();
            scene.add_subwindow(root, child).unwrap();
        }
        let extra = scene.create_window(rect(0, 0, 40, 40)).unwrap();

        assert_eq!(scene.add_subwindow(root, extra), Err(GfxError::ResourceExhausted));
        assert_eq!(scene.window(root).unwrap().subwindows().len(), 64);
        assert_eq!(scene.parent(extra), Ok(None));
    }

    #[test]
    fn add_then_remove_subview() {
        let mut scene = Scene::new();
        let parent = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let child = scene.create_view(rect(0, 0, 5, 5)).unwrap();

        scene.add_subview(parent, child).unwrap();
        assert_eq!(scene.view(parent).unwrap().subviews(), &[child]);
        assert_eq!(scene.parent(child), Ok(Some(parent.id())));

        scene.clear_needs_redraw(parent).unwrap();
        scene.remove_subview(parent, child).unwrap();
        assert!(scene.view(parent).unwrap().subviews().is_empty());
        assert_eq!(scene.parent(child), Ok(None));
        assert!(scene.needs_redraw(parent).unwrap());
    }

    #[test]
    fn removing_a_stranger_is_not_found() {
        let mut scene = Scene::new();
        let parent = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let kept = scene.create_view(rect(0, 0, 5, 5)).unwrap();
        let stranger = scene.create_view(rect(0, 0, 5, 5)).unwrap();
        scene.add_subview(parent, kept).unwrap();

        assert_eq!(scene.remove_subview(parent, stranger), Err(GfxError::NotFound));
        assert_eq!(scene.view(parent).unwrap().subviews(), &[kept]);

        let label = scene.create_label(rect(0, 0, 1, 1), "a").unwrap();
        assert_eq!(scene.remove_sublabel(parent, label), Err(GfxError::NotFound));
        let image = scene.create_image(rect(0, 0, 1, 1), &[0]).unwrap();
        assert_eq!(scene.remove_subimage(parent, image), Err(GfxError::NotFound));
    }

    #[test]
    fn labels_and_images_attach_and_detach() {
        let mut scene = Scene::new();
        let pixels = [0x00FF_0000u32; 4];
        let view = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let label = scene.create_label(rect(0, 0, 10, 10), "hi").unwrap();
        let image = scene.create_image(rect(0, 0, 2, 2), &pixels).unwrap();

        scene.add_sublabel(view, label).unwrap();
        scene.add_subimage(view, image).unwrap();
        assert_eq!(scene.parent(label), Ok(Some(view.id())));
        assert_eq!(scene.image(image).unwrap().bitmap(), &pixels);

        scene.remove_subimage(view, image).unwrap();
        scene.remove_sublabel(view, label).unwrap();
        assert_eq!(scene.parent(image), Ok(None));
        assert!(scene.needs_redraw(label).unwrap());
    }

    #[test]
    fn subwindows_attach_and_detach() {
        let mut scene = Scene::new();
        let desktop = scene.create_window(rect(0, 0, 400, 300)).unwrap();
        let child = scene.create_window(rect(10, 10, 100, 80)).unwrap();

        scene.add_subwindow(desktop, child).unwrap();
        assert_eq!(scene.window(desktop).unwrap().subwindows(), &[child]);
        scene.remove_subwindow(desktop, child).unwrap();
        assert_eq!(scene.remove_subwindow(desktop, child), Err(GfxError::NotFound));
    }

    #[test]
    fn second_parent_and_cycles_are_rejected() {
        let mut scene = Scene::new();
        let a = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let b = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        let c = scene.create_view(rect(0, 0, 10, 10)).unwrap();
        scene.add_subview(a, b).unwrap();

        assert_eq!(scene.add_subview(c, b), Err(GfxError::InvalidHierarchy));
        assert_eq!(scene.add_subview(b, a), Err(GfxError::InvalidHierarchy));
        assert_eq!(scene.add_subview(a, a), Err(GfxError::InvalidHierarchy));

        let window = scene.create_window(rect(0, 0, 100, 100)).unwrap();
        let title = scene.window(window).unwrap().title_view();
        assert_eq!(scene.add_subview(a, title), Err(GfxError::InvalidHierarchy));
    }

    #[test]
    fn setters_mark_dirty() {
        let mut scene = Scene::new();
        let window = scene.create_window(rect(0, 0, 100, 100)).unwrap();
        let view = scene.create_view(rect(0, 0, 10, 10)).unwrap();

        scene.clear_needs_redraw(window).unwrap();
        scene.set_border_width(window, 4).unwrap();
        assert_eq!(scene.window(window).unwrap().border_width(), 4);
        assert!(scene.needs_redraw(window).unwrap());

        scene.clear_needs_redraw(view).unwrap();
        scene.set_frame(view, rect(5, 5, 1, 1)).unwrap();
        assert_eq!(scene.frame(view), Ok(rect(5, 5, 1, 1)));
        assert!(scene.needs_redraw(view).unwrap());
    }

    #[test]
    fn set_title_rewrites_the_title_label() {
        let mut scene = Scene::new();
        let window = scene.create_window(rect(0, 0, 100, 100)).unwrap();
        scene.set_title(window, "Terminal").unwrap();

        let w = scene.window(window).unwrap();
        assert_eq!(w.title(), "Terminal");
        assert_eq!(scene.label(w.title_label()).unwrap().text(), "Terminal");
    }

    #[test]
    fn destroy_releases_the_whole_subtree() {
        let mut scene = Scene::new();
        let desktop = scene.create_window(rect(0, 0, 400, 300)).unwrap();
        let child = scene.create_window(rect(10, 10, 100, 80)).unwrap();
        scene.add_subwindow(desktop, child).unwrap();
        let content = scene.window(child).unwrap().content_view();
        let label = scene.create_label(rect(0, 0, 10, 10), "bye").unwrap();
        scene.add_sublabel(content, label).unwrap();
        let before = scene.len();

        scene.clear_needs_redraw(desktop).unwrap();
        scene.destroy(child).unwrap();

        // window, title view, title label, content view, label
        assert_eq!(scene.len(), before - 5);
        assert!(!scene.contains(child));
        assert!(!scene.contains(content));
        assert!(!scene.contains(label));
        assert!(scene.window(desktop).unwrap().subwindows().is_empty());
        assert!(scene.needs_redraw(desktop).unwrap());
    }

    #[test]
    fn owned_window_views_cannot_be_destroyed_alone() {
        let mut scene = Scene::new();
        let window = scene.create_window(rect(0, 0, 100, 100)).unwrap();
        let content = scene.window(window).unwrap().content_view();
        assert_eq!(scene.destroy(content), Err(GfxError::InvalidHierarchy));
        assert!(scene.contains(content));
    }

    #[test]
    fn stale_handles_are_not_found_after_slot_reuse() {
        let mut scene = Scene::new();
        let old = scene.create_view(rect(0, 0, 1, 1)).unwrap();
        scene.destroy(old).unwrap();
        let new = scene.create_view(rect(0, 0, 2, 2)).unwrap();

        assert_eq!(new.id().index, old.id().index);
        assert_eq!(scene.view(old).err(), Some(GfxError::NotFound));
        assert_eq!(scene.mark_needs_redraw(old), Err(GfxError::NotFound));
        assert!(scene.view(new).is_ok());
    }
}
