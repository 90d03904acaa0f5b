//! Sound cue queue
//!
//! The simulation never plays audio itself. `AudioQueue` listens to
//! simulation events, turns them into cues and holds them until the host's
//! audio backend drains them. Nothing here ever blocks the tick.

use crate::sim::{DamageCause, EventSink, GameEvent, Material};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Soil or grass cleared
    Dig,
    /// Rock cracked but not broken
    RockCrack,
    /// Rock broken
    RockBreak,
    /// Gem dug out
    GemCollect,
    /// Falling block landed on the creature
    Crush,
    /// Water damage
    Splash,
    /// Lava contact
    Sizzle,
    Death,
    LevelClear,
    Victory,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Dug {
                material: Material::Rock,
                cleared: false,
                ..
            } => Some(Self::RockCrack),
            GameEvent::Dug {
                material: Material::Rock,
                ..
            } => Some(Self::RockBreak),
            // The gem cue comes from GemCollected
            GameEvent::Dug {
                material: Material::Gem,
                ..
            } => None,
            GameEvent::Dug { .. } => Some(Self::Dig),
            GameEvent::GemCollected { .. } => Some(Self::GemCollect),
            GameEvent::Damaged { cause, .. } => Some(match cause {
                DamageCause::Crush => Self::Crush,
                DamageCause::Water => Self::Splash,
                DamageCause::Lava => Self::Sizzle,
            }),
            GameEvent::Died { .. } => Some(Self::Death),
            GameEvent::LevelCompleted { .. } => Some(Self::LevelClear),
            GameEvent::Victory { .. } => Some(Self::Victory),
            GameEvent::RunEnded { .. } => None,
        }
    }

    /// Mix level relative to the other cues
    fn base_gain(self) -> f32 {
        match self {
            SoundEffect::Dig => 0.3,
            SoundEffect::RockCrack => 0.25,
            SoundEffect::RockBreak => 0.4,
            SoundEffect::GemCollect => 0.6,
            SoundEffect::Crush => 0.7,
            SoundEffect::Splash => 0.35,
            SoundEffect::Sizzle => 0.8,
            SoundEffect::Death => 0.8,
            SoundEffect::LevelClear => 0.7,
            SoundEffect::Victory => 0.9,
        }
    }
}

/// A cue ready for playback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub effect: SoundEffect,
    /// Final gain (0.0 - 1.0)
    pub gain: f32,
}

/// Fire-and-forget cue queue fed by simulation events
#[derive(Debug, Clone)]
pub struct AudioQueue {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    pending: Vec<Cue>,
}

impl Default for AudioQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioQueue {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            pending: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute; muting also drops anything already queued
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.pending.clear();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Queue a cue unless it would be silent
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.pending.push(Cue {
            effect,
            gain: vol * effect.base_gain(),
        });
    }

    /// Take every queued cue, oldest first
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl EventSink for AudioQueue {
    fn emit(&mut self, event: GameEvent) {
        if let Some(effect) = SoundEffect::for_event(&event) {
            self.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn dug(material: Material, cleared: bool) -> GameEvent {
        GameEvent::Dug {
            pos: IVec2::ZERO,
            material,
            cleared,
        }
    }

    #[test]
    fn test_dig_cues_by_material() {
        assert_eq!(
            SoundEffect::for_event(&dug(Material::Soil, true)),
            Some(SoundEffect::Dig)
        );
        assert_eq!(
            SoundEffect::for_event(&dug(Material::Rock, false)),
            Some(SoundEffect::RockCrack)
        );
        assert_eq!(
            SoundEffect::for_event(&dug(Material::Rock, true)),
            Some(SoundEffect::RockBreak)
        );
        assert_eq!(SoundEffect::for_event(&dug(Material::Gem, true)), None);
    }

    #[test]
    fn test_damage_cues_by_cause() {
        let damaged = |cause| GameEvent::Damaged {
            amount: 5,
            cause,
            health: 50,
        };
        assert_eq!(
            SoundEffect::for_event(&damaged(DamageCause::Crush)),
            Some(SoundEffect::Crush)
        );
        assert_eq!(
            SoundEffect::for_event(&damaged(DamageCause::Water)),
            Some(SoundEffect::Splash)
        );
        assert_eq!(
            SoundEffect::for_event(&damaged(DamageCause::Lava)),
            Some(SoundEffect::Sizzle)
        );
    }

    #[test]
    fn test_queue_collects_in_order() {
        let mut queue = AudioQueue::new();
        queue.emit(dug(Material::Gem, true));
        queue.emit(GameEvent::GemCollected {
            pos: IVec2::ZERO,
            points: 50,
            gems_collected: 1,
        });
        queue.emit(GameEvent::RunEnded {
            score: 10,
            level: 0,
            victory: false,
        });
        queue.emit(GameEvent::Died {
            cause: DamageCause::Lava,
        });

        let effects: Vec<_> = queue.drain().iter().map(|c| c.effect).collect();
        assert_eq!(effects, vec![SoundEffect::GemCollect, SoundEffect::Death]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_mute_silences_and_clears() {
        let mut queue = AudioQueue::new();
        queue.play(SoundEffect::Dig);
        queue.set_muted(true);
        assert!(queue.is_empty());
        queue.play(SoundEffect::Victory);
        assert!(queue.is_empty());

        queue.set_muted(false);
        queue.set_master_volume(0.0);
        queue.play(SoundEffect::Victory);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_gain_scales_with_volume() {
        let mut queue = AudioQueue::new();
        queue.set_master_volume(1.0);
        queue.set_sfx_volume(0.5);
        queue.play(SoundEffect::Victory);
        let cue = queue.drain()[0];
        assert!((cue.gain - 0.45).abs() < 1e-6);
    }
}
