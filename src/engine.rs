//! The rotation engine: one animated turn at a time, everything else waits
//! in line.
//!
//! Requests go into a FIFO queue. The request at the front resolves its
//! pieces only when it starts, so it always sees the cube as the previous
//! turn left it. A turn attaches its pieces to a pivot, tweens the pivot
//! about one axis, then detaches the pieces and zeroes the pivot.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::channel::oneshot;
use futures::FutureExt;
use glam::Quat;
use rustc_hash::FxHashSet;

use crate::anim::{Easing, Tween};
use crate::error::{GeometryError, RotationError};
use crate::face::{Axis, Direction, Face};
use crate::geometry::{attach, detach};
use crate::membership::identify_face_pieces;
use crate::model::{CubeModel, Parent, PieceId};

/// What a rotation request turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationKind {
    /// One outer face. `direction` is as seen from outside that face.
    Face {
        face: Face,
        direction: Direction,
        turns: u8,
    },
    /// The whole cube minus the pieces of `exclude`. `direction` is as seen
    /// from the positive end of `axis`.
    Cube {
        axis: Axis,
        direction: Direction,
        turns: u8,
        exclude: Vec<Face>,
    },
}

impl RotationKind {
    fn pivot(&self) -> Parent {
        match self {
            RotationKind::Face { face, .. } => Parent::FacePivot(*face),
            RotationKind::Cube { .. } => Parent::CubePivot,
        }
    }

    fn axis(&self) -> Axis {
        match self {
            RotationKind::Face { face, .. } => face.axis(),
            RotationKind::Cube { axis, .. } => *axis,
        }
    }

    fn target_angle(&self) -> f32 {
        match self {
            RotationKind::Face {
                face,
                direction,
                turns,
            } => face.turn_angle(*direction, *turns),
            RotationKind::Cube {
                direction, turns, ..
            } => direction.angle(*turns),
        }
    }
}

type Completion = oneshot::Sender<Result<(), RotationError>>;

/// A queued rotation and the channel that reports its outcome.
#[derive(Debug)]
struct RotationRequest {
    kind: RotationKind,
    duration: Duration,
    done: Completion,
}

/// The rotation currently animating.
#[derive(Debug)]
struct ActiveRotation {
    kind: RotationKind,
    pivot: Parent,
    pieces: Vec<PieceId>,
    tween: Tween,
    done: Completion,
}

/// Resolves when a rotation request completes or fails.
#[derive(Debug)]
#[must_use = "a rotation handle does nothing unless awaited or dropped on purpose"]
pub struct RotationHandle {
    receiver: oneshot::Receiver<Result<(), RotationError>>,
}

impl RotationHandle {
    /// A handle that has already failed.
    pub fn rejected(error: RotationError) -> Self {
        let (sender, receiver) = oneshot::channel();
        let _ = sender.send(Err(error));
        Self { receiver }
    }
}

impl Future for RotationHandle {
    type Output = Result<(), RotationError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.receiver
            .poll_unpin(cx)
            .map(|outcome| outcome.unwrap_or(Err(RotationError::Cancelled)))
    }
}

/// Serializes rotation requests against a [`CubeModel`].
#[derive(Debug)]
pub struct RotationEngine {
    model: CubeModel,
    queue: VecDeque<RotationRequest>,
    active: Option<ActiveRotation>,
    easing: Easing,
}

impl RotationEngine {
    pub fn new(model: CubeModel, easing: Easing) -> Self {
        Self {
            model,
            queue: VecDeque::new(),
            active: None,
            easing,
        }
    }

    pub fn model(&self) -> &CubeModel {
        &self.model
    }

    /// Queues a rotation. It starts right away if nothing else is animating.
    pub fn enqueue(&mut self, kind: RotationKind, duration: Duration) -> RotationHandle {
        let (done, receiver) = oneshot::channel();
        self.queue.push_back(RotationRequest {
            kind,
            duration,
            done,
        });
        if self.active.is_none() {
            self.start_next();
        }
        RotationHandle { receiver }
    }

    /// Whether a rotation is animating or waiting.
    pub fn is_busy(&self) -> bool {
        self.active.is_some() || !self.queue.is_empty()
    }

    pub fn is_face_rotating(&self) -> bool {
        matches!(
            self.active,
            Some(ActiveRotation {
                kind: RotationKind::Face { .. },
                ..
            })
        )
    }

    pub fn is_cube_rotating(&self) -> bool {
        matches!(
            self.active,
            Some(ActiveRotation {
                kind: RotationKind::Cube { .. },
                ..
            })
        )
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Steps the animating rotation forward by one frame.
    ///
    /// A rotation that finishes is committed and the next queued one is
    /// started in the same call.
    pub fn advance(&mut self, delta: Duration) {
        if let Some(active) = &mut self.active {
            let angle = active.tween.proceed(delta);
            let finished = active.tween.is_finished();
            let (pivot, axis) = (active.pivot, active.kind.axis());
            if let Some(pivot) = self.model.pivot_mut(pivot) {
                pivot.rotation = Quat::from_axis_angle(axis.unit(), angle);
            }
            if finished {
                if let Some(active) = self.active.take() {
                    self.finish(active);
                }
            }
        }
        if self.active.is_none() {
            self.start_next();
        }
    }

    /// Rejects every request that has not started yet.
    pub fn reject_pending(&mut self, error: RotationError) {
        for request in self.queue.drain(..) {
            let _ = request.done.send(Err(error.clone()));
        }
    }

    /// Stops the animating rotation where it is and rejects everything.
    ///
    /// The animating pieces are detached at their current pose, so no piece
    /// stays on a pivot.
    pub fn cancel_all(&mut self) {
        self.reject_pending(RotationError::Cancelled);
        if let Some(active) = self.active.take() {
            log::debug!("cancelling in-flight {:?}", active.kind);
            self.release(&active.pieces, active.pivot);
            let _ = active.done.send(Err(RotationError::Cancelled));
        }
    }

    /// Swaps in a freshly loaded model. Call [`Self::cancel_all`] first.
    pub fn replace_model(&mut self, model: CubeModel) {
        self.model = model;
    }

    fn start_next(&mut self) {
        while let Some(request) = self.queue.pop_front() {
            match self.begin(&request.kind) {
                Ok((pivot, pieces)) => {
                    let tween = Tween::new(request.kind.target_angle(), request.duration, self.easing);
                    self.active = Some(ActiveRotation {
                        kind: request.kind,
                        pivot,
                        pieces,
                        tween,
                        done: request.done,
                    });
                    return;
                }
                Err(error) => {
                    log::error!("{error}");
                    let _ = request.done.send(Err(error));
                }
            }
        }
    }

    /// Resolves the pieces for a request and attaches them to its pivot.
    fn begin(&mut self, kind: &RotationKind) -> Result<(Parent, Vec<PieceId>), RotationError> {
        let face_pieces = identify_face_pieces(&self.model);
        let pieces = match kind {
            RotationKind::Face { face, .. } => {
                let pieces = face_pieces[*face].clone();
                if pieces.is_empty() {
                    return Err(GeometryError::NoPieces(*face).into());
                }
                pieces
            }
            RotationKind::Cube { exclude, .. } => {
                let excluded: FxHashSet<PieceId> = exclude
                    .iter()
                    .flat_map(|face| face_pieces[*face].iter().copied())
                    .collect();
                (0..self.model.pieces().len())
                    .filter(|id| !excluded.contains(id))
                    .collect()
            }
        };

        let pivot = kind.pivot();
        for &piece in &pieces {
            attach(&mut self.model, piece, pivot);
        }
        Ok((pivot, pieces))
    }

    fn finish(&mut self, active: ActiveRotation) {
        self.release(&active.pieces, active.pivot);
        if let RotationKind::Cube { .. } = active.kind {
            if let Err(error) = self.model.refresh_center_pieces() {
                log::error!("after {:?}: {error}", active.kind);
            }
            self.model.position_face_pivots();
        }
        let _ = active.done.send(Ok(()));
    }

    /// Detaches `pieces` from `pivot` and zeroes it.
    fn release(&mut self, pieces: &[PieceId], pivot: Parent) {
        for &piece in pieces {
            detach(&mut self.model, piece, pivot);
        }
        if let Some(pivot) = self.model.pivot_mut(pivot) {
            pivot.rotation = Quat::IDENTITY;
        }
    }
}
