// Snapshot reconciliation: derive actionable view state from a server
// snapshot without mutating it.
//
// The server owns turn sequencing, the clock, and legality enforcement.
// Everything here is a pure function over the last fetched `DraftStatus`;
// the same checks the server applies are run locally first so an illegal
// selection never produces a network call. Network I/O lives in `api` and
// `app`, never here.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{ActionType, DraftStatus, Selection, TeamSide};

// ---------------------------------------------------------------------------
// Rejection
// ---------------------------------------------------------------------------

/// Why a selection attempt was refused locally, before any request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No snapshot has been fetched yet; nothing can be legal.
    #[error("draft state not loaded yet")]
    NoSnapshot,

    /// The draft is not in the DRAFTING lifecycle.
    #[error("draft is {status}, selections are closed")]
    NotDrafting { status: String },

    /// The champion is already banned or picked by either team.
    #[error("{champion_id} is already taken in this draft")]
    ChampionTaken { champion_id: String },
}

// ---------------------------------------------------------------------------
// Core derivations
// ---------------------------------------------------------------------------

/// The action the current turn demands.
///
/// PICK if and only if the phase label does not indicate a ban. With no
/// snapshot this fails safe to BAN, which keeps speculative picks
/// disabled until real state arrives.
pub fn current_action(status: Option<&DraftStatus>) -> ActionType {
    match status {
        Some(s) if !s.current_phase.contains("BAN") => ActionType::Pick,
        _ => ActionType::Ban,
    }
}

/// Whether the local viewer may act at all on this snapshot.
pub fn is_actionable(status: &DraftStatus) -> bool {
    status.status.is_drafting()
}

/// One team's selections, split by action kind.
///
/// Both partitions preserve the original turn order of the snapshot's
/// selection sequence.
#[derive(Debug, Clone, Default)]
pub struct TeamBoard {
    pub bans: Vec<Selection>,
    pub picks: Vec<Selection>,
}

impl TeamBoard {
    /// The pick made for a role, if any.
    pub fn pick_for_role(&self, role: crate::models::Role) -> Option<&Selection> {
        self.picks.iter().find(|s| s.role == Some(role))
    }
}

/// Split the snapshot's selections for one side into bans and picks.
///
/// Membership is decided by `team` field equality only; calling this once
/// per side yields disjoint boards that together cover every selection.
pub fn partition_by_team(status: &DraftStatus, team: TeamSide) -> TeamBoard {
    let mut board = TeamBoard::default();
    for selection in status.selections.iter().filter(|s| s.team == team) {
        match selection.action {
            ActionType::Ban => board.bans.push(selection.clone()),
            ActionType::Pick => board.picks.push(selection.clone()),
        }
    }
    board
}

/// Whether a champion has been claimed by any selection, either side,
/// either action. Selections are append-only, so once this is true for a
/// champion it stays true for the rest of the draft.
pub fn is_champion_taken(status: &DraftStatus, champion_id: &str) -> bool {
    status
        .selections
        .iter()
        .any(|s| s.champion.id == champion_id)
}

/// Whole seconds remaining until `timer_end`, clamped to zero.
///
/// Clock skew or an already-elapsed deadline must never yield a negative
/// countdown.
pub fn remaining_seconds(timer_end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = timer_end.signed_duration_since(now).num_milliseconds();
    (millis / 1000).max(0)
}

/// Local legality gate for a selection attempt.
///
/// Mirrors the server's checks so an illegal attempt is refused before
/// any network call. On success, returns the action type the request
/// must carry.
pub fn check_select(
    status: Option<&DraftStatus>,
    champion_id: &str,
) -> Result<ActionType, Rejection> {
    let status = status.ok_or(Rejection::NoSnapshot)?;

    if !is_actionable(status) {
        return Err(Rejection::NotDrafting {
            status: status.status.to_string(),
        });
    }

    if is_champion_taken(status, champion_id) {
        return Err(Rejection::ChampionTaken {
            champion_id: champion_id.to_string(),
        });
    }

    Ok(current_action(Some(status)))
}

// ---------------------------------------------------------------------------
// ReconciledView
// ---------------------------------------------------------------------------

/// Everything the UI needs from one snapshot, derived in one pass.
///
/// Built identically whether the snapshot arrived by poll or by push
/// notification; there is no delivery-path-specific state.
#[derive(Debug, Clone)]
pub struct ReconciledView {
    pub lifecycle: crate::models::Lifecycle,
    pub actionable: bool,
    pub action: ActionType,
    pub current_team: TeamSide,
    pub current_turn: u32,
    pub blue: TeamBoard,
    pub red: TeamBoard,
    /// Seconds left on the server's turn timer, if one is running.
    pub remaining: Option<i64>,
}

/// Derive the full view state from a snapshot at a given instant.
pub fn reconcile(status: &DraftStatus, now: DateTime<Utc>) -> ReconciledView {
    ReconciledView {
        lifecycle: status.status,
        actionable: is_actionable(status),
        action: current_action(Some(status)),
        current_team: status.current_team,
        current_turn: status.current_turn,
        blue: partition_by_team(status, TeamSide::Blue),
        red: partition_by_team(status, TeamSide::Red),
        remaining: status.timer_end.map(|end| remaining_seconds(end, now)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Champion, DraftStatus, Lifecycle, Role, Selection, TeamsOverview,
    };
    use chrono::Duration;

    fn champion(id: &str) -> Champion {
        Champion {
            id: id.to_string(),
            name: id.to_string(),
            title: String::new(),
            tags: vec![],
            info: Default::default(),
            image: Default::default(),
            pick_rate: None,
            ban_rate: None,
            win_rate: None,
        }
    }

    fn selection(
        turn: u32,
        team: TeamSide,
        action: ActionType,
        champ: &str,
        role: Option<Role>,
    ) -> Selection {
        Selection {
            turn,
            team,
            action,
            champion: champion(champ),
            role,
            time_taken: None,
        }
    }

    fn snapshot(lifecycle: Lifecycle, phase: &str, selections: Vec<Selection>) -> DraftStatus {
        DraftStatus {
            id: "d1".to_string(),
            status: lifecycle,
            current_turn: selections.len() as u32 + 1,
            current_team: TeamSide::Blue,
            current_phase: phase.to_string(),
            timer_end: None,
            teams: TeamsOverview::default(),
            selections,
        }
    }

    #[test]
    fn ban_phase_label_means_ban() {
        for phase in ["BLUE_BAN", "RED_BAN_3", "BAN"] {
            let status = snapshot(Lifecycle::Drafting, phase, vec![]);
            assert_eq!(current_action(Some(&status)), ActionType::Ban, "{phase}");
        }
    }

    #[test]
    fn non_ban_phase_label_means_pick() {
        for phase in ["BLUE_PICK", "RED_PICK_2", "anything-else", ""] {
            let status = snapshot(Lifecycle::Drafting, phase, vec![]);
            assert_eq!(current_action(Some(&status)), ActionType::Pick, "{phase}");
        }
    }

    #[test]
    fn missing_snapshot_fails_safe_to_ban() {
        assert_eq!(current_action(None), ActionType::Ban);
    }

    #[test]
    fn only_drafting_is_actionable() {
        for (lifecycle, expected) in [
            (Lifecycle::Waiting, false),
            (Lifecycle::Drafting, true),
            (Lifecycle::Completed, false),
            (Lifecycle::Cancelled, false),
        ] {
            let status = snapshot(lifecycle, "BLUE_PICK", vec![]);
            assert_eq!(is_actionable(&status), expected, "{lifecycle}");
        }
    }

    #[test]
    fn partition_is_exact_and_disjoint() {
        let selections = vec![
            selection(1, TeamSide::Blue, ActionType::Ban, "zed", None),
            selection(2, TeamSide::Red, ActionType::Ban, "yasuo", None),
            selection(3, TeamSide::Blue, ActionType::Pick, "ahri", Some(Role::Mid)),
            selection(4, TeamSide::Red, ActionType::Pick, "jinx", Some(Role::Adc)),
            selection(5, TeamSide::Blue, ActionType::Ban, "leblanc", None),
        ];
        let status = snapshot(Lifecycle::Drafting, "RED_PICK", selections);

        let blue = partition_by_team(&status, TeamSide::Blue);
        let red = partition_by_team(&status, TeamSide::Red);

        // Union covers every selection, no overlap between sides.
        assert_eq!(
            blue.bans.len() + blue.picks.len() + red.bans.len() + red.picks.len(),
            status.selections.len()
        );
        assert!(blue
            .bans
            .iter()
            .chain(&blue.picks)
            .all(|s| s.team == TeamSide::Blue));
        assert!(red
            .bans
            .iter()
            .chain(&red.picks)
            .all(|s| s.team == TeamSide::Red));

        // Turn order preserved within each partition.
        assert_eq!(
            blue.bans.iter().map(|s| s.turn).collect::<Vec<_>>(),
            vec![1, 5]
        );
        assert_eq!(blue.picks[0].champion.id, "ahri");
        assert_eq!(red.picks[0].role, Some(Role::Adc));
    }

    #[test]
    fn pick_for_role_finds_selection() {
        let selections = vec![selection(
            1,
            TeamSide::Blue,
            ActionType::Pick,
            "ahri",
            Some(Role::Mid),
        )];
        let status = snapshot(Lifecycle::Drafting, "RED_PICK", selections);
        let blue = partition_by_team(&status, TeamSide::Blue);
        assert_eq!(blue.pick_for_role(Role::Mid).unwrap().champion.id, "ahri");
        assert!(blue.pick_for_role(Role::Top).is_none());
    }

    #[test]
    fn champion_taken_regardless_of_side_or_action() {
        let selections = vec![
            selection(1, TeamSide::Blue, ActionType::Ban, "zed", None),
            selection(2, TeamSide::Red, ActionType::Pick, "ahri", Some(Role::Mid)),
        ];
        let status = snapshot(Lifecycle::Drafting, "BLUE_PICK", selections);

        assert!(is_champion_taken(&status, "zed"));
        assert!(is_champion_taken(&status, "ahri"));
        assert!(!is_champion_taken(&status, "lux"));
    }

    #[test]
    fn champion_taken_is_monotonic_under_append() {
        let mut selections = vec![selection(1, TeamSide::Blue, ActionType::Ban, "zed", None)];
        let status = snapshot(Lifecycle::Drafting, "RED_BAN", selections.clone());
        assert!(is_champion_taken(&status, "zed"));

        // Selections are append-only; later snapshots keep the claim.
        selections.push(selection(2, TeamSide::Red, ActionType::Ban, "yasuo", None));
        selections.push(selection(3, TeamSide::Blue, ActionType::Pick, "ahri", Some(Role::Mid)));
        let later = snapshot(Lifecycle::Drafting, "RED_PICK", selections);
        assert!(is_champion_taken(&later, "zed"));
    }

    #[test]
    fn remaining_seconds_counts_down() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now + Duration::seconds(30), now), 30);
        assert_eq!(remaining_seconds(now + Duration::milliseconds(1500), now), 1);
        assert_eq!(remaining_seconds(now + Duration::milliseconds(999), now), 0);
    }

    #[test]
    fn remaining_seconds_never_negative() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now, now), 0);
        assert_eq!(remaining_seconds(now - Duration::seconds(10), now), 0);
        assert_eq!(remaining_seconds(now - Duration::milliseconds(1), now), 0);
    }

    #[test]
    fn check_select_requires_snapshot() {
        assert_eq!(check_select(None, "zed"), Err(Rejection::NoSnapshot));
    }

    #[test]
    fn check_select_rejects_outside_drafting() {
        for lifecycle in [Lifecycle::Waiting, Lifecycle::Completed, Lifecycle::Cancelled] {
            let status = snapshot(lifecycle, "BLUE_PICK", vec![]);
            let err = check_select(Some(&status), "zed").unwrap_err();
            assert!(matches!(err, Rejection::NotDrafting { .. }), "{lifecycle}");
        }
    }

    #[test]
    fn check_select_rejects_taken_champion() {
        let selections = vec![selection(1, TeamSide::Red, ActionType::Ban, "zed", None)];
        let status = snapshot(Lifecycle::Drafting, "BLUE_PICK", selections);
        assert_eq!(
            check_select(Some(&status), "zed"),
            Err(Rejection::ChampionTaken {
                champion_id: "zed".to_string()
            })
        );
    }

    #[test]
    fn check_select_returns_phase_action() {
        let ban_turn = snapshot(Lifecycle::Drafting, "BLUE_BAN_1", vec![]);
        assert_eq!(check_select(Some(&ban_turn), "zed"), Ok(ActionType::Ban));

        let pick_turn = snapshot(Lifecycle::Drafting, "BLUE_PICK_1", vec![]);
        assert_eq!(check_select(Some(&pick_turn), "zed"), Ok(ActionType::Pick));
    }

    #[test]
    fn reconcile_fresh_ban_phase_snapshot() {
        // Scenario: BLUE_BAN, turn 3, no selections yet.
        let mut status = snapshot(Lifecycle::Drafting, "BLUE_BAN", vec![]);
        status.current_turn = 3;

        let view = reconcile(&status, Utc::now());
        assert_eq!(view.action, ActionType::Ban);
        assert!(view.actionable);
        assert_eq!(view.current_turn, 3);
        assert!(view.blue.bans.is_empty() && view.blue.picks.is_empty());
        assert!(view.red.bans.is_empty() && view.red.picks.is_empty());
        assert!(view.remaining.is_none());
    }

    #[test]
    fn reconcile_single_pick_snapshot() {
        // Scenario: one BLUE MID pick of X, phase RED_PICK.
        let selections = vec![selection(
            1,
            TeamSide::Blue,
            ActionType::Pick,
            "x",
            Some(Role::Mid),
        )];
        let status = snapshot(Lifecycle::Drafting, "RED_PICK", selections);

        let view = reconcile(&status, Utc::now());
        assert_eq!(view.action, ActionType::Pick);
        assert_eq!(view.blue.picks.len(), 1);
        assert_eq!(view.blue.picks[0].champion.id, "x");
        assert_eq!(view.blue.picks[0].role, Some(Role::Mid));
        assert!(view.blue.bans.is_empty());
        assert!(is_champion_taken(&status, "x"));
        assert!(!is_champion_taken(&status, "y"));
    }

    #[test]
    fn reconcile_elapsed_timer_clamps_to_zero() {
        let mut status = snapshot(Lifecycle::Drafting, "BLUE_PICK", vec![]);
        let now = Utc::now();
        status.timer_end = Some(now - Duration::seconds(10));
        let view = reconcile(&status, now);
        assert_eq!(view.remaining, Some(0));
    }
}
