// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing what the view should follow: dragged objects and focused nodes.
//!
//! The controller never inspects the scene directly. Hosts describe it
//! through [`SceneGeometry`] and [`FocusRegister`], and drag listeners opt in
//! to auto-follow by implementing [`FollowSource`].

use alloc::rc::Weak;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::keep_in_view::Axis;
use crate::presses::PointerId;

/// Attached pointer count above which the set is assumed to be leaking.
const ATTACHED_POINTER_LEAK_LIMIT: usize = 16;

/// A region the view should keep visible, in the global frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FollowRegion {
    /// Region to keep in view.
    pub region: Rect,
    /// Optional restriction to one pan axis.
    pub axis: Option<Axis>,
}

/// Capability implemented by drag listeners that want auto-follow.
///
/// Return `None` when the listener has nothing to follow right now (for
/// example, because its press has already ended).
pub trait FollowSource {
    /// The region to keep in view while this listener is dragging.
    fn try_get_follow_region(&self) -> Option<FollowRegion>;
}

/// Host-side description of the scene below the animated content node.
///
/// `K` identifies nodes. All rectangles are in the global frame.
pub trait SceneGeometry<K> {
    /// Nodes from the animated content node (exclusive) down to `node`
    /// (inclusive).
    fn chain_to(&self, node: &K) -> Vec<K>;

    /// A counter that changes whenever the transform of `node` changes.
    fn transform_revision(&self, node: &K) -> u64;

    /// Visible bounds of `node`.
    fn visible_bounds(&self, node: &K) -> Option<Rect>;

    /// A custom region the node wants kept in view instead of its bounds.
    fn pan_target_bounds(&self, node: &K) -> Option<Rect> {
        let _ = node;
        None
    }

    /// A counter that changes whenever [`Self::pan_target_bounds`] changes.
    fn pan_target_revision(&self, node: &K) -> u64 {
        let _ = node;
        0
    }

    /// Axis the view may pan along while following `node`.
    fn axis_restriction(&self, node: &K) -> Option<Axis> {
        let _ = node;
        None
    }
}

/// Host-side accessibility focus register.
pub trait FocusRegister<K> {
    /// The currently focused node.
    fn focused(&self) -> Option<K>;

    /// The first focusable node in document order.
    fn first_focusable(&self) -> Option<K>;
}

/// The region `node` wants followed: its custom pan target if it declares
/// one, else its visible bounds.
pub(crate) fn node_follow_region<K, G>(geometry: &G, node: &K) -> Option<FollowRegion>
where
    G: SceneGeometry<K> + ?Sized,
{
    geometry
        .pan_target_bounds(node)
        .or_else(|| geometry.visible_bounds(node))
        .map(|region| FollowRegion {
            region,
            axis: geometry.axis_restriction(node),
        })
}

#[derive(Clone, Debug)]
struct AttachedPointer {
    pointer: PointerId,
    point: Point,
    source: Option<Weak<dyn FollowSource>>,
}

/// Pressed pointers with drag intent, and the listeners they drive.
#[derive(Clone, Debug, Default)]
pub(crate) struct AttachedPointers {
    entries: SmallVec<[AttachedPointer; 4]>,
}

impl AttachedPointers {
    pub(crate) fn insert(&mut self, pointer: PointerId, point: Point) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.pointer == pointer) {
            entry.point = point;
            return;
        }
        self.entries.push(AttachedPointer {
            pointer,
            point,
            source: None,
        });
        debug_assert!(
            self.entries.len() <= ATTACHED_POINTER_LEAK_LIMIT,
            "attached pointers are leaking ({} entries)",
            self.entries.len()
        );
    }

    /// Binds a follow listener to a pressed pointer. Returns `false` if the
    /// pointer is not pressed with drag intent.
    pub(crate) fn attach(&mut self, pointer: PointerId, source: Weak<dyn FollowSource>) -> bool {
        match self.entries.iter_mut().find(|e| e.pointer == pointer) {
            Some(entry) => {
                entry.source = Some(source);
                true
            }
            None => false,
        }
    }

    /// Records the latest pointer location. Returns `true` if tracked.
    pub(crate) fn update_point(&mut self, pointer: PointerId, point: Point) -> bool {
        match self.entries.iter_mut().find(|e| e.pointer == pointer) {
            Some(entry) => {
                entry.point = point;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, pointer: PointerId) {
        self.entries.retain(|e| e.pointer != pointer);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops entries whose listener has gone away.
    pub(crate) fn prune(&mut self) {
        self.entries.retain(|e| match &e.source {
            Some(source) => source.strong_count() > 0,
            None => true,
        });
    }

    /// Prunes, then asks the first bound listener for its follow region.
    pub(crate) fn current_follow_region(&mut self) -> Option<FollowRegion> {
        self.prune();
        self.entries
            .iter()
            .find_map(|e| e.source.as_ref())
            .and_then(Weak::upgrade)
            .and_then(|source| source.try_get_follow_region())
    }
}

/// Live subscription on the chain from the content node to a focused node.
///
/// Instead of callbacks, the subscription records the revisions it last saw
/// and reports a change when any of them move.
#[derive(Clone, Debug)]
pub(crate) struct FocusFollow<K> {
    node: K,
    chain: Vec<(K, u64)>,
    pan_target_revision: Option<u64>,
}

impl<K: Clone> FocusFollow<K> {
    pub(crate) fn subscribe<G>(node: K, geometry: &G) -> Self
    where
        G: SceneGeometry<K> + ?Sized,
    {
        let chain = geometry
            .chain_to(&node)
            .into_iter()
            .map(|k| {
                let revision = geometry.transform_revision(&k);
                (k, revision)
            })
            .collect();
        let pan_target_revision = geometry
            .pan_target_bounds(&node)
            .map(|_| geometry.pan_target_revision(&node));
        Self {
            node,
            chain,
            pan_target_revision,
        }
    }

    pub(crate) fn node(&self) -> &K {
        &self.node
    }

    /// Refreshes recorded revisions, returning `true` if any changed.
    pub(crate) fn poll_changed<G>(&mut self, geometry: &G) -> bool
    where
        G: SceneGeometry<K> + ?Sized,
    {
        let mut changed = false;
        for (node, seen) in &mut self.chain {
            let revision = geometry.transform_revision(node);
            if revision != *seen {
                *seen = revision;
                changed = true;
            }
        }
        if let Some(seen) = &mut self.pan_target_revision {
            let revision = geometry.pan_target_revision(&self.node);
            if revision != *seen {
                *seen = revision;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::{Rc, Weak};
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use kurbo::{Point, Rect};

    use super::*;

    struct Listener(Cell<Option<Rect>>);

    impl FollowSource for Listener {
        fn try_get_follow_region(&self) -> Option<FollowRegion> {
            self.0.get().map(|region| FollowRegion { region, axis: None })
        }
    }

    fn weak(listener: &Rc<Listener>) -> Weak<dyn FollowSource> {
        let strong: Rc<dyn FollowSource> = listener.clone();
        Rc::downgrade(&strong)
    }

    #[test]
    fn detached_listeners_are_pruned() {
        let mut attached = AttachedPointers::default();
        attached.insert(PointerId(1), Point::ZERO);
        let listener = Rc::new(Listener(Cell::new(Some(Rect::new(0.0, 0.0, 1.0, 1.0)))));
        assert!(attached.attach(PointerId(1), weak(&listener)));
        assert!(attached.current_follow_region().is_some());

        drop(listener);
        assert_eq!(attached.current_follow_region(), None);
        assert!(attached.is_empty());
    }

    #[test]
    fn unbound_pointer_is_kept_but_not_followed() {
        let mut attached = AttachedPointers::default();
        attached.insert(PointerId(1), Point::ZERO);
        assert_eq!(attached.current_follow_region(), None);
        assert_eq!(attached.len(), 1);
        assert!(!attached.attach(PointerId(2), Weak::<Listener>::new()));
    }

    #[test]
    fn first_bound_listener_wins() {
        let mut attached = AttachedPointers::default();
        attached.insert(PointerId(1), Point::ZERO);
        attached.insert(PointerId(2), Point::ZERO);
        let a = Rc::new(Listener(Cell::new(Some(Rect::new(0.0, 0.0, 1.0, 1.0)))));
        let b = Rc::new(Listener(Cell::new(Some(Rect::new(5.0, 5.0, 6.0, 6.0)))));
        attached.attach(PointerId(2), weak(&b));
        attached.attach(PointerId(1), weak(&a));
        assert_eq!(
            attached.current_follow_region().map(|f| f.region),
            Some(Rect::new(0.0, 0.0, 1.0, 1.0))
        );
        attached.remove(PointerId(1));
        assert_eq!(
            attached.current_follow_region().map(|f| f.region),
            Some(Rect::new(5.0, 5.0, 6.0, 6.0))
        );
    }

    struct Scene {
        revisions: Vec<u64>,
        custom: Option<Rect>,
        custom_revision: u64,
    }

    impl SceneGeometry<usize> for Scene {
        fn chain_to(&self, node: &usize) -> Vec<usize> {
            (0..=*node).collect()
        }
        fn transform_revision(&self, node: &usize) -> u64 {
            self.revisions[*node]
        }
        fn visible_bounds(&self, node: &usize) -> Option<Rect> {
            let n = *node as f64;
            Some(Rect::new(n, n, n + 1.0, n + 1.0))
        }
        fn pan_target_bounds(&self, _node: &usize) -> Option<Rect> {
            self.custom
        }
        fn pan_target_revision(&self, _node: &usize) -> u64 {
            self.custom_revision
        }
    }

    #[test]
    fn subscription_reports_chain_and_custom_region_changes() {
        let mut scene = Scene {
            revisions: vec![0, 0, 0],
            custom: None,
            custom_revision: 0,
        };
        let mut sub = FocusFollow::subscribe(2, &scene);
        assert!(!sub.poll_changed(&scene));

        scene.revisions[1] = 7;
        assert!(sub.poll_changed(&scene));
        assert!(!sub.poll_changed(&scene));

        // Without a declared custom region its revision is not watched.
        scene.custom_revision = 3;
        assert!(!sub.poll_changed(&scene));

        scene.custom = Some(Rect::new(0.0, 0.0, 9.0, 9.0));
        let mut sub = FocusFollow::subscribe(2, &scene);
        scene.custom_revision = 4;
        assert!(sub.poll_changed(&scene));
        assert_eq!(*sub.node(), 2);
    }

    #[test]
    fn custom_region_overrides_visible_bounds() {
        let mut scene = Scene {
            revisions: vec![0],
            custom: None,
            custom_revision: 0,
        };
        assert_eq!(
            node_follow_region(&scene, &0).map(|f| f.region),
            Some(Rect::new(0.0, 0.0, 1.0, 1.0))
        );
        scene.custom = Some(Rect::new(0.0, 0.0, 9.0, 9.0));
        assert_eq!(
            node_follow_region(&scene, &0).map(|f| f.region),
            Some(Rect::new(0.0, 0.0, 9.0, 9.0))
        );
    }
}
