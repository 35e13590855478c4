//! World state: the live bubble set and everything the tick loop mutates
//!
//! Bubbles are kept in spawn order, which is also ascending id order and the
//! order they are drawn in (later bubbles on top).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bubble::Bubble;

/// Stable handle for a live bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BubbleId(pub u32);

/// Something the host may want to react to (redraw HUD, play a sound, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelChanged { level: u32 },
    AchievedLevelRaised { level: u32 },
    ScoreChanged { score: u64 },
    BubbleSpawned { id: BubbleId },
    BubblePopped { id: BubbleId },
    BubbleCulled { id: BubbleId },
}

/// Playfield bounds in world units, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Does `bubble` still overlap the playfield?
    #[inline]
    pub fn overlaps(&self, bubble: &Bubble) -> bool {
        bubble.intersects(0.0, 0.0, self.width, self.height)
    }
}

/// A bubble owned by the world
#[derive(Debug, Clone, PartialEq)]
pub struct LiveBubble {
    pub id: BubbleId,
    pub bubble: Bubble,
}

/// Read-only drawing data for one bubble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleView {
    pub id: BubbleId,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub rotation: f32,
    pub revision: u64,
}

impl From<&LiveBubble> for BubbleView {
    fn from(live: &LiveBubble) -> Self {
        let center = live.bubble.center();
        Self {
            id: live.id,
            x: center.x,
            y: center.y,
            radius: live.bubble.radius(),
            rotation: live.bubble.rotation(),
            revision: live.bubble.revision(),
        }
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Live simulation objects
#[derive(Debug, Clone)]
pub struct World {
    pub rng_state: RngState,
    rng: Pcg32,
    bubbles: Vec<LiveBubble>,
    /// `None` until the host reports its layout; nothing is culled before that
    playfield: Option<Playfield>,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl World {
    pub fn new(seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            bubbles: Vec::new(),
            playfield: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn playfield(&self) -> Option<Playfield> {
        self.playfield
    }

    pub fn set_playfield(&mut self, playfield: Option<Playfield>) {
        self.playfield = playfield;
    }

    pub fn bubbles(&self) -> &[LiveBubble] {
        &self.bubbles
    }

    pub fn bubbles_mut(&mut self) -> &mut [LiveBubble] {
        &mut self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles
            .iter()
            .find(|live| live.id == id)
            .map(|live| &live.bubble)
    }

    /// Take ownership of `bubble`, placing it on top
    pub fn insert(&mut self, bubble: Bubble) -> BubbleId {
        let id = self.next_entity_id();
        self.bubbles.push(LiveBubble { id, bubble });
        self.events.push(GameEvent::BubbleSpawned { id });
        id
    }

    /// Topmost bubble containing the point
    pub fn hit_test(&self, x: f32, y: f32) -> Option<BubbleId> {
        self.bubbles
            .iter()
            .rev()
            .find(|live| live.bubble.contains(x, y))
            .map(|live| live.id)
    }

    /// Remove a popped bubble
    pub fn pop(&mut self, id: BubbleId) -> Option<Bubble> {
        let index = self.bubbles.iter().position(|live| live.id == id)?;
        let live = self.bubbles.remove(index);
        self.events.push(GameEvent::BubblePopped { id });
        Some(live.bubble)
    }

    /// Drop every bubble whose id is in `ids` (sorted), keeping order
    pub(crate) fn cull(&mut self, ids: &[BubbleId]) {
        if ids.is_empty() {
            return;
        }
        self.bubbles.retain(|live| ids.binary_search(&live.id).is_err());
        self.events
            .extend(ids.iter().map(|&id| GameEvent::BubbleCulled { id }));
    }

    /// Remove all bubbles without emitting events and restart id allocation
    /// (used on restore)
    pub(crate) fn clear(&mut self) {
        self.bubbles.clear();
        self.next_id = 1;
    }

    pub fn view(&self) -> Vec<BubbleView> {
        self.bubbles.iter().map(BubbleView::from).collect()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
