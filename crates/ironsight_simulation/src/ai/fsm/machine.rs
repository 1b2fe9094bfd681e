//! Generic state machine: current/previous + guarded transitions.
//!
//! Машина не владеет states: ими владеет `StateSet` (обычно struct с полем
//! на каждый state). Машина хранит только ключи, поэтому states можно мутировать
//! снаружи (set_target и т.п.) между тиками без борьбы с borrow checker'ом.

/// Один behavior unit с lifecycle Enter → Tick* → Exit
///
/// `C`: контекст, через который state общается с агентом.
pub trait State<C: ?Sized> {
    fn enter(&mut self, ctx: &mut C);

    fn tick(&mut self, ctx: &mut C);

    fn exit(&mut self, _ctx: &mut C) {}
}

/// Владелец state instances: ключ → `&mut dyn State`
pub trait StateSet<K, C: ?Sized> {
    fn state_mut(&mut self, key: K) -> &mut dyn State<C>;
}

/// Current + previous state (ключи), one-level revert
///
/// Инварианты:
/// - после первого перехода current всегда Some
/// - переход в текущий state: no-op (Enter не вызывается повторно)
/// - previous меняется только реальным переходом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMachine<K> {
    current: Option<K>,
    previous: Option<K>,
}

impl<K> Default for StateMachine<K> {
    fn default() -> Self {
        Self {
            current: None,
            previous: None,
        }
    }
}

impl<K: Copy + PartialEq> StateMachine<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<K> {
        self.current
    }

    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    /// Exit(current) → previous = current → current = next → Enter(next)
    ///
    /// Возвращает false если next уже текущий (no-op).
    pub fn change_state<S, C>(&mut self, states: &mut S, ctx: &mut C, next: K) -> bool
    where
        S: StateSet<K, C> + ?Sized,
        C: ?Sized,
    {
        if self.current == Some(next) {
            return false;
        }

        if let Some(current) = self.current {
            states.state_mut(current).exit(ctx);
        }

        self.previous = self.current;
        self.current = Some(next);
        states.state_mut(next).enter(ctx);

        true
    }

    /// Tick текущего state (no-op до первого перехода)
    pub fn tick<S, C>(&mut self, states: &mut S, ctx: &mut C)
    where
        S: StateSet<K, C> + ?Sized,
        C: ?Sized,
    {
        if let Some(current) = self.current {
            states.state_mut(current).tick(ctx);
        }
    }

    /// Вернуться в previous (полный re-enter, не "resume")
    ///
    /// false если previous нет: caller сам решает куда падать (обычно Idle).
    pub fn revert_to_previous<S, C>(&mut self, states: &mut S, ctx: &mut C) -> bool
    where
        S: StateSet<K, C> + ?Sized,
        C: ?Sized,
    {
        match self.previous {
            Some(previous) => self.change_state(states, ctx, previous),
            None => false,
        }
    }
}
