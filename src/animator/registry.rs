use std::collections::HashMap;
use std::str::FromStr;

use crate::animator::lifecycle::Animator;
use crate::animator::scheduler::{FrameOutcome, FrameScheduler, FrameTicket};
use crate::config::options::{LoaderOptions, PartialOptions};
use crate::foundation::core::SurfaceId;
use crate::foundation::error::LoaderError;
use crate::render::surface::Surface;

/// Plugin-style command addressed to one surface's animator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Options(PartialOptions),
}

impl FromStr for Command {
    type Err = LoaderError;

    /// Parses the lifecycle verbs; `end` is accepted for `stop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" | "end" => Ok(Self::Stop),
            "reset" => Ok(Self::Reset),
            other => Err(LoaderError::validation(format!(
                "unknown loader command \"{other}\""
            ))),
        }
    }
}

/// Pending frame requests of every animator in a registry, tagged with their surface.
struct TaggedQueue<'a> {
    id: SurfaceId,
    queue: &'a mut Vec<(SurfaceId, FrameTicket)>,
}

impl FrameScheduler for TaggedQueue<'_> {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.queue.push((self.id, ticket));
    }
}

/// At most one [`Animator`] per surface.
///
/// The registry also acts as the frame scheduler of its animators: [`AnimatorRegistry::frame`]
/// delivers every request made since the previous call.
pub struct AnimatorRegistry<S: Surface> {
    animators: HashMap<SurfaceId, Animator<S>>,
    pending: Vec<(SurfaceId, FrameTicket)>,
}

impl<S: Surface> Default for AnimatorRegistry<S> {
    fn default() -> Self {
        Self {
            animators: HashMap::new(),
            pending: Vec::new(),
        }
    }
}

impl<S: Surface> AnimatorRegistry<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the animator of `id`, creating it from `make_surface` and `options` when missing.
    ///
    /// An existing animator is returned untouched; `options` are ignored in that case.
    pub fn insert_with(
        &mut self,
        id: SurfaceId,
        make_surface: impl FnOnce() -> S,
        options: LoaderOptions,
    ) -> &mut Animator<S> {
        self.animators.entry(id).or_insert_with(|| {
            tracing::debug!(?id, "animator created");
            Animator::new(make_surface(), options)
        })
    }

    /// Register an already built animator, returning the one it replaced (reset first).
    ///
    /// Frames requested by the replaced animator are dropped.
    pub fn insert(&mut self, id: SurfaceId, animator: Animator<S>) -> Option<Animator<S>> {
        let mut old = self.animators.insert(id, animator)?;
        old.reset();
        self.pending.retain(|(pid, _)| *pid != id);
        Some(old)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Animator<S>> {
        self.animators.get(&id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Animator<S>> {
        self.animators.get_mut(&id)
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.animators.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.animators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animators.is_empty()
    }

    /// Detach and return the animator of `id`, reset so its surface is clear.
    pub fn remove(&mut self, id: SurfaceId) -> Option<Animator<S>> {
        let mut animator = self.animators.remove(&id)?;
        animator.reset();
        self.pending.retain(|(pid, _)| *pid != id);
        tracing::debug!(?id, "animator removed");
        Some(animator)
    }

    /// Number of frame requests waiting for [`AnimatorRegistry::frame`].
    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Apply `cmd` to the animator of `id`. Returns `false` when no animator is registered.
    pub fn dispatch(&mut self, id: SurfaceId, cmd: Command) -> bool {
        let Some(animator) = self.animators.get_mut(&id) else {
            return false;
        };
        match cmd {
            Command::Start => {
                let mut sched = TaggedQueue {
                    id,
                    queue: &mut self.pending,
                };
                animator.start(&mut sched);
            }
            Command::Stop => animator.stop(),
            Command::Reset => animator.reset(),
            Command::Options(partial) => animator.update_options(&partial),
        }
        true
    }

    pub fn start(&mut self, id: SurfaceId) -> bool {
        self.dispatch(id, Command::Start)
    }

    pub fn stop(&mut self, id: SurfaceId) -> bool {
        self.dispatch(id, Command::Stop)
    }

    pub fn reset(&mut self, id: SurfaceId) -> bool {
        self.dispatch(id, Command::Reset)
    }

    pub fn update_options(&mut self, id: SurfaceId, partial: PartialOptions) -> bool {
        self.dispatch(id, Command::Options(partial))
    }

    /// Deliver every outstanding frame request at `time_ms`.
    ///
    /// Requests made while delivering wait for the next call.
    pub fn frame(&mut self, time_ms: f64) -> Vec<(SurfaceId, FrameOutcome)> {
        let due = std::mem::take(&mut self.pending);
        let mut outcomes = Vec::with_capacity(due.len());
        for (id, ticket) in due {
            let Some(animator) = self.animators.get_mut(&id) else {
                continue;
            };
            let mut sched = TaggedQueue {
                id,
                queue: &mut self.pending,
            };
            outcomes.push((id, animator.on_frame(ticket, time_ms, &mut sched)));
        }
        outcomes
    }
}
