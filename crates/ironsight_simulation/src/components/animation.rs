//! Animation cue компоненты
//!
//! AI не блендит анимации сам: только просит "сыграй cue X за blend секунд".
//! Host (engine animator) читает `CueTrack` через Changed<CueTrack>.

use bevy::prelude::*;

/// Контракт проигрывания animation cue (fire-and-forget)
pub trait CuePlayer {
    fn play_cue(&mut self, name: &str, blend_time: f32);
}

/// Последний запрошенный cue
#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct AnimationCue {
    pub name: String,
    pub blend_time: f32,
}

/// Headless cue player: хранит текущий cue и счётчик запросов
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CueTrack {
    pub current: Option<AnimationCue>,
    pub requests: u32,
}

impl CueTrack {
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_ref().map(|cue| cue.name.as_str())
    }
}

impl CuePlayer for CueTrack {
    fn play_cue(&mut self, name: &str, blend_time: f32) {
        self.current = Some(AnimationCue {
            name: name.to_string(),
            blend_time,
        });
        self.requests += 1;
    }
}
