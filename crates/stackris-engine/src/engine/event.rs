use derive_more::{From, IsVariant};

use super::game_stats::GameStats;

/// Notifications queued by the engine and drained by the caller.
///
/// The two kinds serve different consumers: a renderer reacts to
/// [`GameEvent::GridChanged`] by resampling cells, while a status display
/// only cares about [`GameEvent::StatsChanged`] and gets the full snapshot
/// in the event itself.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant, From)]
pub enum GameEvent {
    /// The grid imprint changed (piece moved, locked, rows cleared).
    GridChanged,
    /// A stat changed; carries the updated snapshot.
    StatsChanged(GameStats),
}
