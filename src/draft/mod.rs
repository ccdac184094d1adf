// Draft domain logic: snapshot reconciliation and selection legality.

pub mod reconcile;

pub use reconcile::{
    check_select, current_action, is_actionable, is_champion_taken, partition_by_team,
    reconcile, remaining_seconds, ReconciledView, Rejection, TeamBoard,
};
