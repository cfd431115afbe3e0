//! Segmented point-cloud editing.
//!
//! [`PointCloudEditor`] owns one merged point buffer assembled from every
//! added point cloud, the per-id [`SegmentTable`] describing which slice of
//! the buffer each added cloud occupies, and the [`PickedIndices`] the user
//! selected. All three are edited together so that a removal never leaves
//! a stale range or a dangling pick behind.
//!
//! Rendering is reached through the [`EditorHost`] seam: the editor lends
//! the host a `&PointCloud` whenever the buffer changes and never hands out
//! ownership.

mod picked;
mod segments;

use std::ops::Range;

use glam::Vec3;

pub use picked::PickedIndices;
pub use segments::{Segment, SegmentTable};

use crate::error::{EditorError, RendererError};
use crate::geometry::{Aabb, Geometry, PointCloud};
use crate::picking::color_code;

/// Rendering-side collaborator driven by the editor.
pub trait EditorHost {
    /// Whether a rendering context is live. Edits fail without one.
    fn is_initialized(&self) -> bool;

    /// Attach a renderer to a freshly started merged cloud. Called before
    /// the editor commits the cloud; an error aborts the add.
    fn register_renderer(
        &mut self,
        cloud: &PointCloud,
    ) -> Result<(), RendererError>;

    /// The merged cloud changed; re-upload whatever was derived from it.
    fn geometry_changed(&mut self, cloud: &PointCloud);

    /// Fit the camera to `bounds` and reset the view.
    fn fit_view(&mut self, bounds: Aabb);
}

/// Outcome of a pick, as delivered to the pick callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickEvent {
    /// Nothing under the cursor, or picking failed.
    NoHit,
    /// A point was hit.
    Point {
        /// Index into the merged buffer.
        index: usize,
        /// Class id of the point, when the buffer carries classes.
        class: Option<i32>,
    },
}

impl PickEvent {
    /// Integer handed to `fn(int)` scripting callbacks: the class id on a
    /// labeled hit, `-1` for no hit.
    ///
    /// An unlabeled hit has no integer form and returns `None`; integer
    /// callbacks are skipped for it. The index is still in
    /// [`PickEvent::Point`].
    #[must_use]
    pub fn callback_code(&self) -> Option<i32> {
        match *self {
            Self::NoHit => Some(-1),
            Self::Point { class, .. } => class,
        }
    }
}

/// Callback invoked after every pick attempt.
pub type PickCallback = Box<dyn FnMut(PickEvent)>;

/// Merged point buffer plus segment and pick bookkeeping.
pub struct PointCloudEditor {
    cloud: PointCloud,
    segments: SegmentTable,
    picked: PickedIndices,
    on_pick: Option<PickCallback>,
}

impl Default for PointCloudEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCloudEditor {
    /// Empty editor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cloud: PointCloud::default(),
            segments: SegmentTable::new(),
            picked: PickedIndices::new(),
            on_pick: None,
        }
    }

    /// Merge `geometry` into the buffer and record a segment for it.
    ///
    /// The first cloud (or the first added while the buffer is empty)
    /// becomes the buffer itself: a renderer is registered for it and the
    /// view is fitted to its bounds. Later clouds are appended. The
    /// geometry is copied, so later changes to the caller's value do not
    /// reach the editor.
    ///
    /// Returns the new segment's range.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotInitialized`] without a live context,
    /// [`EditorError::UnsupportedGeometry`] for anything but a point cloud,
    /// [`EditorError::Renderer`] for malformed clouds or a refused
    /// renderer, [`EditorError::ColumnMismatch`] when an appended cloud's
    /// optional columns differ from the buffer's. Nothing changes on error.
    pub fn add_geometry(
        &mut self,
        host: &mut impl EditorHost,
        geometry: &Geometry,
    ) -> Result<Range<usize>, EditorError> {
        if !host.is_initialized() {
            return Err(EditorError::NotInitialized);
        }
        let incoming = match geometry {
            Geometry::PointCloud(cloud) => cloud,
            Geometry::Other(kind) => {
                log::warn!("add_geometry: rejected {kind:?} geometry");
                return Err(EditorError::UnsupportedGeometry(*kind));
            }
        };
        if let Some((column, found)) = incoming.inconsistent_column() {
            return Err(RendererError::ColumnLength {
                column,
                expected: incoming.len(),
                found,
            }
            .into());
        }

        // Zero-length segments can outlive every point; an empty buffer
        // starts over either way.
        let range = if self.cloud.is_empty() {
            let fresh = incoming.clone();
            host.register_renderer(&fresh)?;
            self.cloud = fresh;
            let range = self.segments.push(incoming.id.clone(), incoming.len());
            if let Some(bounds) = self.cloud.bounds() {
                host.fit_view(bounds);
            }
            range
        } else {
            if !self.cloud.is_empty() && !incoming.is_empty() {
                if let Some(column) =
                    self.cloud.presence().first_mismatch(incoming.presence())
                {
                    return Err(EditorError::ColumnMismatch { column });
                }
            }
            self.cloud.append(incoming);
            self.segments.push(incoming.id.clone(), incoming.len())
        };

        let pickable = color_code::pickable_len(self.cloud.len());
        if pickable < self.cloud.len() {
            log::warn!(
                "merged cloud has {} points; only the first {pickable} can be picked",
                self.cloud.len()
            );
        }

        log::info!(
            "added '{}' as {range:?}, merged cloud now {} points",
            incoming.id,
            self.cloud.len()
        );
        host.geometry_changed(&self.cloud);
        Ok(range)
    }

    /// Erase the segment tagged `id` from the buffer.
    ///
    /// Later segments shift left by the removed length; picks inside the
    /// removed range are dropped and picks above it are renumbered.
    /// Returns the range the segment occupied.
    ///
    /// # Errors
    ///
    /// [`EditorError::NotInitialized`] without a live context,
    /// [`EditorError::NotFound`] for an unknown id. Nothing changes on
    /// error.
    pub fn remove_geometry(
        &mut self,
        host: &mut impl EditorHost,
        id: &str,
    ) -> Result<Range<usize>, EditorError> {
        if !host.is_initialized() {
            return Err(EditorError::NotInitialized);
        }
        let removed = self
            .segments
            .remove(id)
            .ok_or_else(|| EditorError::NotFound(id.to_owned()))?;

        self.cloud.erase_range(removed.clone());
        self.picked.remove_range(&removed);

        log::info!(
            "removed '{id}' ({removed:?}), merged cloud now {} points",
            self.cloud.len()
        );
        host.geometry_changed(&self.cloud);
        Ok(removed)
    }

    /// Register the callback run after every pick, replacing any earlier
    /// one.
    pub fn register_onpick_callback(
        &mut self,
        callback: impl FnMut(PickEvent) + 'static,
    ) {
        self.on_pick = Some(Box::new(callback));
    }

    /// Turn a decoded pick result into a [`PickEvent`]: a valid index is
    /// appended to the picked set, then the callback (if any) runs.
    /// Indices outside the current buffer count as no hit.
    pub fn resolve_pick(&mut self, hit: Option<usize>) -> PickEvent {
        let event = match hit {
            Some(index) if index < self.cloud.len() => {
                self.picked.push(index);
                PickEvent::Point {
                    index,
                    class: self.cloud.class_of(index),
                }
            }
            _ => PickEvent::NoHit,
        };
        match event {
            PickEvent::Point { index, class } => {
                log::info!("picked point #{index} (class {class:?})");
            }
            PickEvent::NoHit => log::info!("no point under cursor"),
        }
        if let Some(callback) = self.on_pick.as_mut() {
            callback(event);
        }
        event
    }

    /// Drop the most recent pick.
    pub fn unpick_last(&mut self) -> Option<usize> {
        let index = self.picked.pop()?;
        log::info!("removed picked point #{index} from pick queue");
        Some(index)
    }

    /// The merged point buffer.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Segments in insertion order.
    #[must_use]
    pub fn segments(&self) -> &SegmentTable {
        &self.segments
    }

    /// Picked indices, oldest first.
    #[must_use]
    pub fn picked(&self) -> &PickedIndices {
        &self.picked
    }

    /// Positions of the picked points, oldest first.
    #[must_use]
    pub fn picked_positions(&self) -> Vec<Vec3> {
        self.picked
            .as_slice()
            .iter()
            .filter_map(|&i| self.cloud.positions.get(i).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::geometry::{Column, GeometryType};

    #[derive(Default)]
    struct RecordingHost {
        initialized: bool,
        refuse: bool,
        registered: usize,
        changed: usize,
        fitted: Vec<Aabb>,
        last_len: usize,
    }

    impl RecordingHost {
        fn live() -> Self {
            Self {
                initialized: true,
                ..Self::default()
            }
        }
    }

    impl EditorHost for RecordingHost {
        fn is_initialized(&self) -> bool {
            self.initialized
        }

        fn register_renderer(
            &mut self,
            cloud: &PointCloud,
        ) -> Result<(), RendererError> {
            if self.refuse || cloud.is_empty() {
                return Err(RendererError::EmptyGeometry);
            }
            self.registered += 1;
            Ok(())
        }

        fn geometry_changed(&mut self, cloud: &PointCloud) {
            self.changed += 1;
            self.last_len = cloud.len();
        }

        fn fit_view(&mut self, bounds: Aabb) {
            self.fitted.push(bounds);
        }
    }

    fn cloud(id: &str, n: usize) -> Geometry {
        PointCloud::from_positions(
            id,
            (0..n).map(|i| Vec3::new(i as f32, 1.0, 0.0)).collect(),
        )
        .into()
    }

    fn labeled(id: &str, classes: Vec<i32>) -> Geometry {
        let n = classes.len();
        PointCloud::from_positions(id, vec![Vec3::ZERO; n])
            .with_classes(classes)
            .into()
    }

    fn ranges(editor: &PointCloudEditor) -> Vec<(String, Range<usize>)> {
        editor
            .segments()
            .iter()
            .map(|s| (s.id.clone(), s.range.clone()))
            .collect()
    }

    #[test]
    fn add_two_clouds_then_remove_first() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();

        assert_eq!(editor.add_geometry(&mut host, &cloud("A", 100)), Ok(0..100));
        assert_eq!(
            editor.add_geometry(&mut host, &cloud("B", 50)),
            Ok(100..150)
        );
        assert_eq!(editor.cloud().len(), 150);
        assert_eq!(host.registered, 1);
        assert_eq!(host.fitted.len(), 1);

        for index in [5, 120, 99, 100, 149] {
            let _ = editor.resolve_pick(Some(index));
        }

        assert_eq!(editor.remove_geometry(&mut host, "A"), Ok(0..100));
        assert_eq!(ranges(&editor), vec![("B".to_owned(), 0..50)]);
        assert_eq!(editor.cloud().len(), 50);
        assert_eq!(editor.picked().as_slice(), &[20, 0, 49]);
        assert_eq!(host.last_len, 50);
        assert_eq!(host.changed, 3);
    }

    #[test]
    fn first_add_copies_geometry() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let mut source = cloud("A", 3);
        let _ = editor.add_geometry(&mut host, &source).unwrap();

        if let Geometry::PointCloud(c) = &mut source {
            c.positions[0] = Vec3::splat(42.0);
        }
        assert_eq!(editor.cloud().positions[0], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn uninitialized_editor_rejects_edits() {
        let mut host = RecordingHost::default();
        let mut editor = PointCloudEditor::new();
        assert_eq!(
            editor.add_geometry(&mut host, &cloud("A", 3)),
            Err(EditorError::NotInitialized)
        );
        assert_eq!(
            editor.remove_geometry(&mut host, "A"),
            Err(EditorError::NotInitialized)
        );
        assert!(editor.cloud().is_empty());
    }

    #[test]
    fn non_point_cloud_geometry_is_rejected() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 2)).unwrap();

        for kind in [GeometryType::Unspecified, GeometryType::TriangleMesh] {
            assert_eq!(
                editor.add_geometry(&mut host, &Geometry::Other(kind)),
                Err(EditorError::UnsupportedGeometry(kind))
            );
        }
        assert_eq!(editor.segments().len(), 1);
        assert_eq!(editor.cloud().len(), 2);
    }

    #[test]
    fn refused_renderer_leaves_editor_empty() {
        let mut host = RecordingHost {
            refuse: true,
            ..RecordingHost::live()
        };
        let mut editor = PointCloudEditor::new();
        assert_eq!(
            editor.add_geometry(&mut host, &cloud("A", 4)),
            Err(EditorError::Renderer(RendererError::EmptyGeometry))
        );
        assert!(editor.segments().is_empty());
        assert!(editor.cloud().is_empty());
        assert_eq!(host.changed, 0);
    }

    #[test]
    fn column_presence_mismatch_is_rejected_before_mutation() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor
            .add_geometry(&mut host, &labeled("A", vec![1, 2]))
            .unwrap();

        assert_eq!(
            editor.add_geometry(&mut host, &cloud("B", 3)),
            Err(EditorError::ColumnMismatch {
                column: Column::Classes
            })
        );
        assert_eq!(editor.cloud().len(), 2);
        assert_eq!(editor.cloud().classes.len(), 2);
        assert_eq!(editor.segments().len(), 1);
    }

    #[test]
    fn remove_unknown_id_changes_nothing() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 4)).unwrap();
        let _ = editor.resolve_pick(Some(2));

        assert_eq!(
            editor.remove_geometry(&mut host, "nope"),
            Err(EditorError::NotFound("nope".to_owned()))
        );
        assert_eq!(editor.cloud().len(), 4);
        assert_eq!(editor.picked().as_slice(), &[2]);
    }

    #[test]
    fn removing_last_segment_empties_buffer_and_picks_miss() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 4)).unwrap();
        let _ = editor.resolve_pick(Some(1));
        let _ = editor.remove_geometry(&mut host, "A").unwrap();

        assert!(editor.cloud().is_empty());
        assert!(editor.segments().is_empty());
        assert!(editor.picked().is_empty());
        assert_eq!(editor.resolve_pick(Some(0)), PickEvent::NoHit);
    }

    #[test]
    fn readd_after_removal_starts_at_buffer_end() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 10)).unwrap();
        let _ = editor.add_geometry(&mut host, &cloud("B", 5)).unwrap();
        let _ = editor.remove_geometry(&mut host, "A").unwrap();

        assert_eq!(editor.add_geometry(&mut host, &cloud("A", 10)), Ok(5..15));
        assert!(editor.segments().is_contiguous());
        assert_eq!(editor.segments().total_len(), editor.cloud().len());
    }

    #[test]
    fn pick_labeled_point_then_unpick() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let classes: Vec<i32> = (0..10).map(|i| i % 3).collect();
        let _ = editor
            .add_geometry(&mut host, &labeled("A", classes))
            .unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.register_onpick_callback(move |event| {
            sink.borrow_mut().push(event.callback_code());
        });

        assert_eq!(
            editor.resolve_pick(Some(7)),
            PickEvent::Point {
                index: 7,
                class: Some(1)
            }
        );
        assert_eq!(*seen.borrow(), vec![Some(1)]);
        assert_eq!(editor.picked().as_slice(), &[7]);

        assert_eq!(editor.unpick_last(), Some(7));
        assert!(editor.picked().is_empty());
        assert_eq!(editor.unpick_last(), None);
    }

    #[test]
    fn out_of_range_pick_reports_no_hit_to_callback() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 3)).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        editor.register_onpick_callback(move |event| {
            sink.borrow_mut().push(event);
        });

        assert_eq!(editor.resolve_pick(Some(3)), PickEvent::NoHit);
        assert_eq!(editor.resolve_pick(None), PickEvent::NoHit);
        assert_eq!(*seen.borrow(), vec![PickEvent::NoHit, PickEvent::NoHit]);
        assert!(editor.picked().is_empty());
    }

    #[test]
    fn unlabeled_hit_has_no_callback_code() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 3)).unwrap();

        let event = editor.resolve_pick(Some(2));
        assert_eq!(
            event,
            PickEvent::Point {
                index: 2,
                class: None
            }
        );
        assert_eq!(event.callback_code(), None);
        assert_eq!(editor.picked().as_slice(), &[2]);
        assert_eq!(editor.resolve_pick(None).callback_code(), Some(-1));
    }

    #[test]
    fn add_after_emptied_buffer_starts_fresh() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 5)).unwrap();
        assert_eq!(editor.add_geometry(&mut host, &cloud("B", 0)), Ok(5..5));
        let _ = editor.remove_geometry(&mut host, "A").unwrap();
        assert!(editor.cloud().is_empty());
        assert_eq!(editor.segments().len(), 1);

        assert_eq!(editor.add_geometry(&mut host, &cloud("C", 3)), Ok(0..3));
        assert_eq!(host.registered, 2);
        assert_eq!(host.fitted.len(), 2);
        assert_eq!(
            ranges(&editor),
            vec![("B".to_owned(), 0..0), ("C".to_owned(), 0..3)]
        );
        assert!(editor.segments().is_contiguous());
        assert_eq!(editor.segments().total_len(), editor.cloud().len());
    }

    #[test]
    fn registering_callback_replaces_previous() {
        let mut editor = PointCloudEditor::new();
        let hits = Rc::new(RefCell::new((0, 0)));
        let first = Rc::clone(&hits);
        editor.register_onpick_callback(move |_| first.borrow_mut().0 += 1);
        let second = Rc::clone(&hits);
        editor.register_onpick_callback(move |_| second.borrow_mut().1 += 1);

        let _ = editor.resolve_pick(None);
        assert_eq!(*hits.borrow(), (0, 1));
    }

    #[test]
    fn picked_positions_follow_picks() {
        let mut host = RecordingHost::live();
        let mut editor = PointCloudEditor::new();
        let _ = editor.add_geometry(&mut host, &cloud("A", 5)).unwrap();
        let _ = editor.resolve_pick(Some(4));
        let _ = editor.resolve_pick(Some(2));
        assert_eq!(
            editor.picked_positions(),
            vec![Vec3::new(4.0, 1.0, 0.0), Vec3::new(2.0, 1.0, 0.0)]
        );
    }
}
