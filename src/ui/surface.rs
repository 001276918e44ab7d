//! Surface records stored in the scene arena.
//!
//! Four kinds share one arena: [`View`] and [`Window`] own child containers,
//! [`Label`] and [`Image`] are leaves. [`Surface`] is the tagged union the
//! arena stores and exposes the capabilities every kind has in common.

use embedded_graphics::primitives::Rectangle;

use crate::data_structures::BoundedList;
use crate::devices::framebuffer::color::Color;
use crate::error::{GfxError, Result};

/// Untyped arena handle. The generation invalidates handles to freed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

macro_rules! surface_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SurfaceId);

        impl $name {
            pub fn id(self) -> SurfaceId {
                self.0
            }
        }

        impl From<$name> for SurfaceId {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

surface_handle!(
    /// Handle to a [`View`].
    ViewId
);
surface_handle!(
    /// Handle to a [`Window`].
    WindowId
);
surface_handle!(LabelId);
surface_handle!(ImageId);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    View,
    Window,
    Label,
    Image,
}

/// Rectangular region with a background and three child containers.
#[derive(Debug)]
pub struct View {
    pub(crate) frame: Rectangle,
    pub(crate) background_color: Color,
    pub(crate) subviews: BoundedList<ViewId>,
    pub(crate) labels: BoundedList<LabelId>,
    pub(crate) images: BoundedList<ImageId>,
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) needs_redraw: bool,
}

impl View {
    pub(crate) fn new(frame: Rectangle, background_color: Color, capacity: usize) -> Result<Self> {
        Ok(Self {
            frame,
            background_color,
            subviews: BoundedList::try_new(capacity)?,
            labels: BoundedList::try_new(capacity)?,
            images: BoundedList::try_new(capacity)?,
            parent: None,
            needs_redraw: true,
        })
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn subviews(&self) -> &[ViewId] {
        &self.subviews
    }

    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    pub fn images(&self) -> &[ImageId] {
        &self.images
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}

/// Top-level surface: a bordered frame owning a title view, a content view
/// and any number of child windows.
#[derive(Debug)]
pub struct Window<'a> {
    pub(crate) frame: Rectangle,
    pub(crate) border_color: Color,
    pub(crate) border_width: u32,
    pub(crate) title: &'a str,
    pub(crate) subwindows: BoundedList<WindowId>,
    pub(crate) title_view: ViewId,
    pub(crate) title_label: LabelId,
    pub(crate) content_view: ViewId,
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) needs_redraw: bool,
}

impl<'a> Window<'a> {
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn border_width(&self) -> u32 {
        self.border_width
    }

    pub fn title(&self) -> &'a str {
        self.title
    }

    pub fn subwindows(&self) -> &[WindowId] {
        &self.subwindows
    }

    pub fn title_view(&self) -> ViewId {
        self.title_view
    }

    pub fn title_label(&self) -> LabelId {
        self.title_label
    }

    pub fn content_view(&self) -> ViewId {
        self.content_view
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub(crate) fn owns_view(&self, id: SurfaceId) -> bool {
        self.title_view.0 == id || self.content_view.0 == id
    }
}

/// Text leaf. The text is borrowed for the label's lifetime.
#[derive(Debug)]
pub struct Label<'a> {
    pub(crate) frame: Rectangle,
    pub(crate) text: &'a str,
    pub(crate) text_color: Color,
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) needs_redraw: bool,
}

impl<'a> Label<'a> {
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}

/// Bitmap leaf over externally owned `0x00RRGGBB` pixels, row-major, one
/// row per frame width.
#[derive(Debug)]
pub struct Image<'a> {
    pub(crate) frame: Rectangle,
    pub(crate) bitmap: &'a [u32],
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) needs_redraw: bool,
}

impl<'a> Image<'a> {
    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    pub fn bitmap(&self) -> &'a [u32] {
        self.bitmap
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }
}

#[derive(Debug)]
pub enum Surface<'a> {
    View(View),
    Window(Window<'a>),
    Label(Label<'a>),
    Image(Image<'a>),
}

impl<'a> Surface<'a> {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Surface::View(_) => SurfaceKind::View,
            Surface::Window(_) => SurfaceKind::Window,
            Surface::Label(_) => SurfaceKind::Label,
            Surface::Image(_) => SurfaceKind::Image,
        }
    }

    pub fn frame(&self) -> Rectangle {
        match self {
            Surface::View(v) => v.frame,
            Surface::Window(w) => w.frame,
            Surface::Label(l) => l.frame,
            Surface::Image(i) => i.frame,
        }
    }

    pub(crate) fn set_frame(&mut self, frame: Rectangle) {
        match self {
            Surface::View(v) => v.frame = frame,
            Surface::Window(w) => w.frame = frame,
            Surface::Label(l) => l.frame = frame,
            Surface::Image(i) => i.frame = frame,
        }
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        match self {
            Surface::View(v) => v.parent,
            Surface::Window(w) => w.parent,
            Surface::Label(l) => l.parent,
            Surface::Image(i) => i.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<SurfaceId>) {
        match self {
            Surface::View(v) => v.parent = parent,
            Surface::Window(w) => w.parent = parent,
            Surface::Label(l) => l.parent = parent,
            Surface::Image(i) => i.parent = parent,
        }
    }

    pub fn needs_redraw(&self) -> bool {
        match self {
            Surface::View(v) => v.needs_redraw,
            Surface::Window(w) => w.needs_redraw,
            Surface::Label(l) => l.needs_redraw,
            Surface::Image(i) => i.needs_redraw,
        }
    }

    pub(crate) fn set_needs_redraw(&mut self, dirty: bool) {
        match self {
            Surface::View(v) => v.needs_redraw = dirty,
            Surface::Window(w) => w.needs_redraw = dirty,
            Surface::Label(l) => l.needs_redraw = dirty,
            Surface::Image(i) => i.needs_redraw = dirty,
        }
    }

    /// The color the surface paints with: background, border or text.
    /// Images carry their own pixels and have none.
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Surface::View(v) => Some(v.background_color),
            Surface::Window(w) => Some(w.border_color),
            Surface::Label(l) => Some(l.text_color),
            Surface::Image(_) => None,
        }
    }

    /// Every surface this one owns, owned views of a window first.
    pub fn children(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        let owned = match self {
            Surface::Window(w) => [Some(w.title_view.0), Some(w.content_view.0)],
            _ => [None, None],
        };
        let views: &[ViewId] = match self {
            Surface::View(v) => v.subviews.as_slice(),
            _ => &[],
        };
        let labels: &[LabelId] = match self {
            Surface::View(v) => v.labels.as_slice(),
            _ => &[],
        };
        let images: &[ImageId] = match self {
            Surface::View(v) => v.images.as_slice(),
            _ => &[],
        };
        let windows: &[WindowId] = match self {
            Surface::Window(w) => w.subwindows.as_slice(),
            _ => &[],
        };

        owned
            .into_iter()
            .flatten()
            .chain(views.iter().map(|v| v.0))
            .chain(labels.iter().map(|l| l.0))
            .chain(images.iter().map(|i| i.0))
            .chain(windows.iter().map(|w| w.0))
    }

    /// Drops `child` from whichever container holds it.
    pub(crate) fn remove_child(&mut self, child: SurfaceId) -> Result<()> {
        let removed = match self {
            Surface::View(v) => v
                .subviews
                .remove_item(&ViewId(child))
                .or_else(|_| v.labels.remove_item(&LabelId(child)))
                .or_else(|_| v.images.remove_item(&ImageId(child))),
            Surface::Window(w) => w.subwindows.remove_item(&WindowId(child)),
            Surface::Label(_) | Surface::Image(_) => Err(GfxError::NotFound),
        };
        removed.map(|_| ())
    }
}
