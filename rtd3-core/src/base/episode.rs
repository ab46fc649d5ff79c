//! Transitions and episodes.

/// One environment interaction.
///
/// `last_act` is the action applied on the step before this one; it is an
/// auxiliary input to the recurrent function approximators. A transition is
/// immutable once recorded.
#[derive(Clone, Debug)]
pub struct Transition<O, A> {
    /// Observation before the step.
    pub obs: O,

    /// Action applied at this step.
    pub act: A,

    /// Action applied at the previous step.
    pub last_act: A,

    /// Immediate reward.
    pub reward: f32,

    /// Observation after the step.
    pub next_obs: O,

    /// Flag denoting if the episode terminated at this step.
    pub is_done: bool,
}

/// An ordered sequence of transitions sharing one rollout.
///
/// The length varies between episodes, bounded by the per-episode step cap
/// of the training loop. An episode is never mutated after it has been
/// pushed into a replay buffer.
#[derive(Clone, Debug)]
pub struct Episode<O, A> {
    transitions: Vec<Transition<O, A>>,
}

impl<O, A> Episode<O, A> {
    /// Creates an empty episode.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Appends a transition.
    pub fn push(&mut self, tr: Transition<O, A>) {
        self.transitions.push(tr);
    }

    /// Returns the number of recorded transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns true if no transition has been recorded.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Iterates over the transitions in rollout order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transition<O, A>> {
        self.transitions.iter()
    }

    /// Sum of rewards over the episode.
    pub fn ret(&self) -> f32 {
        self.transitions.iter().map(|tr| tr.reward).sum()
    }
}

impl<O, A> Default for Episode<O, A> {
    fn default() -> Self {
        Self::new()
    }
}
