//! The [`Cube`] handle: rotation engine, algorithm playback, solve and reset.
//!
//! Everything runs on one thread. The handle is cheap to clone and every
//! operation returns a `'static` future, so callers can spawn them on a
//! local executor and keep using the handle. Nothing moves unless somebody
//! calls [`Cube::advance`] with the time since the last frame.

use std::cell::RefCell;
use std::future::Future;
use std::pin::pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::channel::oneshot;
use futures::task::noop_waker;

use crate::anim::Timers;
use crate::asset::ModelLoader;
use crate::config::CubeConfig;
use crate::engine::{RotationEngine, RotationHandle, RotationKind};
use crate::error::{LoadError, MoveError, RotationError};
use crate::face::{Axis, Direction, Face, FaceMap};
use crate::geometry::Transform;
use crate::membership::identify_face_pieces;
use crate::model::{CubeModel, PieceId};
use crate::notation::{invert_sequence, tokens, Move};

/// How an algorithm run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// Every token was tried. Failed tokens are logged and skipped.
    Completed,
    /// A reset stopped the run between tokens.
    Interrupted,
}

struct CubeState {
    engine: RotationEngine,
    timers: Timers,
    config: CubeConfig,
    loader: Box<dyn ModelLoader>,
    /// Tokens of the last algorithm that ran to completion.
    last_algorithm: Option<Vec<String>>,
    resetting: bool,
    /// Bumped by every reset; runs started under an older epoch stop.
    epoch: u64,
    solving: bool,
}

/// Clears the solving flag when a solve finishes or is dropped, unless a
/// reset has happened since it started.
struct SolvingGuard {
    state: Rc<RefCell<CubeState>>,
    epoch: u64,
}

impl Drop for SolvingGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            if state.epoch == self.epoch {
                state.solving = false;
            }
        }
    }
}

/// Shared handle to the cube.
#[derive(Clone)]
pub struct Cube {
    state: Rc<RefCell<CubeState>>,
}

impl Cube {
    /// Loads the model once and builds an idle cube.
    pub fn new(config: CubeConfig, loader: impl ModelLoader + 'static) -> Result<Self, LoadError> {
        let model = CubeModel::from_asset(&loader.load()?)?;
        let state = CubeState {
            engine: RotationEngine::new(model, config.easing),
            timers: Timers::default(),
            config,
            loader: Box::new(loader),
            last_algorithm: None,
            resetting: false,
            epoch: 0,
            solving: false,
        };
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
        })
    }

    pub fn config(&self) -> CubeConfig {
        self.state.borrow().config.clone()
    }

    /// Queues a turn of one face.
    pub fn rotate_face(
        &self,
        face: Face,
        direction: Direction,
        turns: u8,
        duration: Duration,
    ) -> RotationHandle {
        self.request(
            RotationKind::Face {
                face,
                direction,
                turns,
            },
            duration,
        )
    }

    /// Queues a turn of the whole cube, minus the pieces of `exclude`.
    pub fn rotate_cube(
        &self,
        axis: Axis,
        direction: Direction,
        turns: u8,
        duration: Duration,
        exclude: &[Face],
    ) -> RotationHandle {
        self.request(
            RotationKind::Cube {
                axis,
                direction,
                turns,
                exclude: exclude.to_vec(),
            },
            duration,
        )
    }

    fn request(&self, kind: RotationKind, duration: Duration) -> RotationHandle {
        let mut state = self.state.borrow_mut();
        if state.resetting {
            return RotationHandle::rejected(RotationError::Resetting);
        }
        state.engine.enqueue(kind, duration)
    }

    /// Parses one token and queues its rotation.
    ///
    /// The rotation is queued right away; the future only reports the
    /// outcome.
    pub fn execute_move(
        &self,
        token: &str,
        duration: Duration,
    ) -> impl Future<Output = Result<(), MoveError>> + 'static {
        let handle = token
            .parse::<Move>()
            .map(|parsed| self.request(parsed.rotation(), duration));
        async move {
            let handle = handle?;
            handle.await.map_err(MoveError::from)
        }
    }

    /// Runs a whitespace-separated sequence, one token at a time.
    ///
    /// On completion the sequence becomes the last algorithm, which
    /// [`Self::solve`] undoes.
    pub fn execute_algorithm(
        &self,
        sequence: &str,
        duration: Duration,
    ) -> impl Future<Output = Playback> + 'static {
        let cube = self.clone();
        let moves: Vec<String> = tokens(sequence).map(str::to_owned).collect();
        let epoch = self.state.borrow().epoch;
        async move { cube.play(moves, duration, epoch).await }
    }

    /// Runs the inverse of `sequence`.
    pub fn execute_reverse(
        &self,
        sequence: &str,
        duration: Duration,
    ) -> impl Future<Output = Playback> + 'static {
        self.execute_algorithm(&invert_sequence(sequence), duration)
    }

    /// Scrambles the cube into the state `sequence` solves.
    pub fn set_up(&self, sequence: &str) -> impl Future<Output = Playback> + 'static {
        let duration = self.state.borrow().config.setup();
        self.execute_reverse(sequence, duration)
    }

    /// Undoes the last algorithm, then forgets it.
    ///
    /// [`Self::can_solve`] turns false as soon as this is called. Dropping the
    /// returned future before it finishes turns it back on.
    ///
    /// Resolves to `None` without doing anything if there is nothing to undo,
    /// a solve is already running, or the cube is resetting.
    pub fn solve(&self) -> impl Future<Output = Option<Playback>> + 'static {
        let start = {
            let mut state = self.state.borrow_mut();
            if state.solving || state.resetting {
                None
            } else {
                let moves = state.last_algorithm.clone();
                state.solving = moves.is_some();
                moves.map(|moves| (moves, state.epoch, state.config.solve()))
            }
        };
        let guard = start.as_ref().map(|(_, epoch, _)| SolvingGuard {
            state: Rc::clone(&self.state),
            epoch: *epoch,
        });

        let cube = self.clone();
        async move {
            let _guard = guard;
            let (moves, epoch, duration) = start?;
            let inverse = invert_sequence(&moves.join(" "));
            let moves = tokens(&inverse).map(str::to_owned).collect();
            let playback = cube.play(moves, duration, epoch).await;

            {
                let mut state = cube.state.borrow_mut();
                if state.epoch == epoch {
                    state.last_algorithm = None;
                }
            }
            Some(playback)
        }
    }

    /// Stops everything and reloads the model from the loader.
    ///
    /// Queued turns are rejected at once. An in-flight turn gets
    /// [`CubeConfig::reset_settle`] to finish, then is cut short. If the
    /// reload fails the cube is left empty and the error is returned.
    pub fn reset_cube(&self) -> impl Future<Output = Result<(), LoadError>> + 'static {
        let (epoch, busy, settle) = {
            let mut state = self.state.borrow_mut();
            state.resetting = true;
            state.epoch += 1;
            state.engine.reject_pending(RotationError::Cancelled);
            log::info!("resetting cube");
            (state.epoch, state.engine.is_busy(), state.config.settle())
        };

        let cube = self.clone();
        async move {
            if busy {
                let _ = cube.sleep(settle).await;
            }
            cube.reload(epoch)
        }
    }

    fn reload(&self, epoch: u64) -> Result<(), LoadError> {
        let mut state = self.state.borrow_mut();
        let state = &mut *state;
        if state.epoch != epoch {
            // a later reset owns the reload
            log::debug!("reset {epoch} superseded by reset {}", state.epoch);
            return Ok(());
        }
        state.engine.cancel_all();
        state.last_algorithm = None;
        state.solving = false;

        let loaded = state
            .loader
            .load()
            .and_then(|root| CubeModel::from_asset(&root));
        let result = match loaded {
            Ok(model) => {
                state.engine.replace_model(model);
                Ok(())
            }
            Err(error) => {
                log::error!("failed to reload cube: {error}");
                state.engine.replace_model(CubeModel::empty());
                Err(error)
            }
        };

        state.resetting = false;
        result
    }

    async fn play(&self, moves: Vec<String>, duration: Duration, epoch: u64) -> Playback {
        log::info!("running {}", moves.join(" "));
        for token in &moves {
            if self.interrupted(epoch) {
                log::info!("stopped before {token} by reset");
                return Playback::Interrupted;
            }
            log::debug!("move {token}");
            if let Err(error) = self.execute_move(token, duration).await {
                if self.interrupted(epoch) {
                    return Playback::Interrupted;
                }
                log::error!("move {token} failed: {error}");
                let retry = self.state.borrow().config.retry();
                let _ = self.sleep(retry).await;
            }
        }

        let mut state = self.state.borrow_mut();
        if state.resetting || state.epoch != epoch {
            return Playback::Interrupted;
        }
        state.last_algorithm = Some(moves);
        Playback::Completed
    }

    fn interrupted(&self, epoch: u64) -> bool {
        let state = self.state.borrow();
        state.resetting || state.epoch != epoch
    }

    /// Steps timers and the in-flight turn by one frame.
    pub fn advance(&self, delta: Duration) {
        let mut state = self.state.borrow_mut();
        state.timers.advance(delta);
        state.engine.advance(delta);
    }

    /// Resolves after `duration` of frame time.
    pub fn sleep(&self, duration: Duration) -> oneshot::Receiver<()> {
        self.state.borrow_mut().timers.sleep(duration)
    }

    /// Drives `future` to completion, advancing the cube by `frame` between
    /// polls.
    ///
    /// `frame` must be non-zero or a pending turn never finishes.
    pub fn run_until_complete<F: Future>(&self, future: F, frame: Duration) -> F::Output {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut future = pin!(future);
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
            self.advance(frame);
        }
    }

    /// Whether `solve` would do anything right now.
    pub fn can_solve(&self) -> bool {
        let state = self.state.borrow();
        state.last_algorithm.is_some() && !state.solving && !state.resetting
    }

    pub fn is_resetting(&self) -> bool {
        self.state.borrow().resetting
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().engine.is_busy()
    }

    pub fn is_face_rotating(&self) -> bool {
        self.state.borrow().engine.is_face_rotating()
    }

    pub fn is_cube_rotating(&self) -> bool {
        self.state.borrow().engine.is_cube_rotating()
    }

    pub fn last_algorithm(&self) -> Option<String> {
        self.state
            .borrow()
            .last_algorithm
            .as_ref()
            .map(|moves| moves.join(" "))
    }

    /// World transform of every piece, by id.
    pub fn piece_transforms(&self) -> Vec<Transform> {
        self.with_model(|model| {
            (0..model.pieces().len())
                .map(|id| model.world_transform(id))
                .collect()
        })
    }

    /// Current face membership.
    pub fn face_pieces(&self) -> FaceMap<Vec<PieceId>> {
        self.with_model(identify_face_pieces)
    }

    /// Runs `f` against the current model. Do not call back into the cube
    /// from `f`.
    pub fn with_model<R>(&self, f: impl FnOnce(&CubeModel) -> R) -> R {
        f(self.state.borrow().engine.model())
    }
}
