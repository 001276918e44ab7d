//! # User Interface Module
//!
//! Scene graph of nested surfaces and the compositor that paints it.
//!
//! ## Modules
//!
//! - `surface`: the four surface kinds and their typed handles
//! - `scene`: the arena owning every surface, topology edits and redraw marks
//! - `compositor`: full-tree repaint into the display canvas
//! - `theme`: default colors for new surfaces
//!
//! ## Overview
//!
//! A window always owns two views: a title bar carrying one label, and a
//! content view below it. Everything else hangs off content views as
//! sub-views, labels and images, or off windows as child windows. Changing
//! a surface marks it and every ancestor as needing a redraw; the refresh
//! tick asks the compositor to repaint only when the root is marked.
//!
//! ## Example
//!
//! ```ignore
//! let mut scene = Scene::new();
//! let window = scene.create_window(Rectangle::new(Point::zero(), Size::new(320, 200)))?;
//! let content = scene.window(window)?.content_view();
//! let label = scene.create_label(Rectangle::new(Point::new(8, 8), Size::new(200, 13)), "hello")?;
//! scene.add_sublabel(content, label)?;
//! ```

pub mod compositor;
pub mod scene;
pub mod surface;
pub mod theme;

pub use compositor::SceneCompositor;
pub use scene::Scene;
pub use surface::{ImageId, LabelId, Surface, SurfaceId, SurfaceKind, ViewId, WindowId};
pub use theme::Palette;
