//! Parent container capability and a ready-made container.
//!
//! The engine never owns the scene it draws into. It only needs to add a
//! sprite, move it every tick, and take it out again, which is exactly what
//! [`SceneGraph`] exposes. Hosts with their own scene graph implement the
//! trait; everyone else can use [`Scene`].
//!
//! # Sharing
//!
//! The trait is implemented for `&mut T` and `Rc<RefCell<T>>`, so the host
//! can either lend its scene to the engine or keep a shared handle and read
//! it between frames:
//!
//! ```ignore
//! let scene = Rc::new(RefCell::new(Scene::new()));
//! let mut smoke = ParticleSystem::builder()
//!     .parent(Rc::clone(&scene))
//!     // ...
//!     .build()?;
//!
//! smoke.update(dt);
//! renderer.upload(&scene.borrow().instances());
//! ```

use crate::textures::Texture;
use glam::{Quat, Vec3};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Handle to a child inserted into a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

/// Per-tick visual state of a sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    /// World-space center.
    pub position: Vec3,
    /// Orientation; the sprite's local +Z faces the viewer.
    pub rotation: Quat,
    /// Uniform size in world units.
    pub scale: f32,
    /// Alpha multiplier in `0.0..=1.0`.
    pub opacity: f32,
}

impl Default for Billboard {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
            opacity: 1.0,
        }
    }
}

/// A textured billboard living in a scene.
///
/// The texture is shared; cloning a sprite clones the `Rc`, not the pixels.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Current transform and opacity.
    pub billboard: Billboard,
    /// Shared read-only texture.
    pub texture: Rc<Texture>,
}

impl Sprite {
    /// Create a sprite with the given state and texture.
    pub fn new(billboard: Billboard, texture: Rc<Texture>) -> Self {
        Self { billboard, texture }
    }
}

/// Capability the engine needs from its parent container.
pub trait SceneGraph {
    /// Insert a child and return its handle.
    fn add_child(&mut self, sprite: Sprite) -> NodeId;

    /// Detach a child. Returns the sprite if the handle was present.
    fn remove_child(&mut self, node: NodeId) -> Option<Sprite>;

    /// Overwrite a child's transform and opacity. Unknown handles are ignored.
    fn update_child(&mut self, node: NodeId, billboard: Billboard);
}

impl<T: SceneGraph + ?Sized> SceneGraph for &mut T {
    fn add_child(&mut self, sprite: Sprite) -> NodeId {
        (**self).add_child(sprite)
    }

    fn remove_child(&mut self, node: NodeId) -> Option<Sprite> {
        (**self).remove_child(node)
    }

    fn update_child(&mut self, node: NodeId, billboard: Billboard) {
        (**self).update_child(node, billboard)
    }
}

impl<T: SceneGraph + ?Sized> SceneGraph for Rc<RefCell<T>> {
    fn add_child(&mut self, sprite: Sprite) -> NodeId {
        self.borrow_mut().add_child(sprite)
    }

    fn remove_child(&mut self, node: NodeId) -> Option<Sprite> {
        self.borrow_mut().remove_child(node)
    }

    fn update_child(&mut self, node: NodeId, billboard: Billboard) {
        self.borrow_mut().update_child(node, billboard)
    }
}

/// GPU-ready packing of one sprite for instanced quad rendering.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteInstance {
    /// World-space center.
    pub position: [f32; 3],
    /// Uniform size in world units.
    pub scale: f32,
    /// Orientation quaternion (x, y, z, w).
    pub rotation: [f32; 4],
    /// Alpha multiplier.
    pub opacity: f32,
    /// Keeps the struct 16-byte aligned for uniform/storage buffers.
    pub _pad: [f32; 3],
}

impl From<&Billboard> for SpriteInstance {
    fn from(b: &Billboard) -> Self {
        Self {
            position: b.position.to_array(),
            scale: b.scale,
            rotation: b.rotation.to_array(),
            opacity: b.opacity,
            _pad: [0.0; 3],
        }
    }
}

/// Minimal flat scene: a map of sprites keyed by insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    children: BTreeMap<NodeId, Sprite>,
    next_id: u64,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children currently attached.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the scene has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Look up a child.
    pub fn get(&self, node: NodeId) -> Option<&Sprite> {
        self.children.get(&node)
    }

    /// Whether `node` is currently attached.
    pub fn contains(&self, node: NodeId) -> bool {
        self.children.contains_key(&node)
    }

    /// Iterate children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Sprite)> {
        self.children.iter().map(|(id, sprite)| (*id, sprite))
    }

    /// Pack every child for an instanced draw call.
    pub fn instances(&self) -> Vec<SpriteInstance> {
        self.children
            .values()
            .map(|sprite| SpriteInstance::from(&sprite.billboard))
            .collect()
    }
}

impl SceneGraph for Scene {
    fn add_child(&mut self, sprite: Sprite) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.children.insert(id, sprite);
        id
    }

    fn remove_child(&mut self, node: NodeId) -> Option<Sprite> {
        self.children.remove(&node)
    }

    fn update_child(&mut self, node: NodeId, billboard: Billboard) {
        if let Some(sprite) = self.children.get_mut(&node) {
            sprite.billboard = billboard;
        }
    }
}
