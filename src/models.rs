// Wire types for the draft service API.
//
// These mirror the JSON the service emits. Field casing is uneven on the
// wire (camelCase on status snapshots, snake_case on selections), so the
// serde renames below are contract-faithful rather than tidy. Collections
// default to empty so a partial snapshot deserializes instead of failing.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle of a draft session, owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Lifecycle {
    Waiting,
    Drafting,
    Completed,
    Cancelled,
}

impl Lifecycle {
    /// Once a draft leaves DRAFTING it is terminal for client-side
    /// action purposes: no further selections are ever legal.
    pub fn is_drafting(self) -> bool {
        matches!(self, Lifecycle::Drafting)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Waiting => "WAITING",
            Lifecycle::Drafting => "DRAFTING",
            Lifecycle::Completed => "COMPLETED",
            Lifecycle::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// The two draft sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamSide {
    Blue,
    Red,
}

impl TeamSide {
    pub fn display_str(self) -> &'static str {
        match self {
            TeamSide::Blue => "BLUE",
            TeamSide::Red => "RED",
        }
    }

    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::Blue => TeamSide::Red,
            TeamSide::Red => TeamSide::Blue,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// The two kinds of selection a turn can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionType {
    Ban,
    Pick,
}

impl ActionType {
    pub fn display_str(self) -> &'static str {
        match self {
            ActionType::Ban => "BAN",
            ActionType::Pick => "PICK",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

/// Champion roles. Meaningful on PICK selections and as a picker filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Adc,
    Support,
}

/// Display order for pick slots and the role filter cycle.
pub const ROLES: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

impl Role {
    /// Parse a role string as the service sends it.
    pub fn from_str_role(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "TOP" => Some(Role::Top),
            "JUNGLE" | "JGL" => Some(Role::Jungle),
            "MID" | "MIDDLE" => Some(Role::Mid),
            "ADC" | "BOT" | "BOTTOM" => Some(Role::Adc),
            "SUPPORT" | "SUP" => Some(Role::Support),
            _ => None,
        }
    }

    pub fn display_str(self) -> &'static str {
        match self {
            Role::Top => "TOP",
            Role::Jungle => "JUNGLE",
            Role::Mid => "MID",
            Role::Adc => "ADC",
            Role::Support => "SUPPORT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Champions
// ---------------------------------------------------------------------------

/// Numeric champion attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionInfo {
    #[serde(default)]
    pub difficulty: u8,
    #[serde(default)]
    pub attack: u8,
    #[serde(default)]
    pub defense: u8,
    #[serde(default)]
    pub magic: u8,
}

/// Image reference for a champion portrait.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionImage {
    #[serde(default)]
    pub url: String,
}

/// A champion as returned by the champion endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Champion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub info: ChampionInfo,
    #[serde(default)]
    pub image: ChampionImage,
    /// Aggregate rates are only present once the service has match data.
    #[serde(default)]
    pub pick_rate: Option<f64>,
    #[serde(default)]
    pub ban_rate: Option<f64>,
    #[serde(default)]
    pub win_rate: Option<f64>,
}

/// Paging metadata on the champion list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub has_more: bool,
}

/// One page of the champion list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChampionsPage {
    #[serde(default)]
    pub champions: Vec<Champion>,
    #[serde(default)]
    pub pagination: Pagination,
}

// ---------------------------------------------------------------------------
// Draft session
// ---------------------------------------------------------------------------

/// Summary returned when resolving a join code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    /// Database identifier. Not used to address any endpoint.
    pub id: String,
    /// The shareable join code. All draft endpoints and the push channel
    /// are keyed by this, not by `id`.
    pub unique_id: String,
    #[serde(default)]
    pub creator_id: String,
    pub status: Lifecycle,
}

impl DraftSummary {
    /// The server-canonical key for the status and select endpoints and
    /// the push channel.
    pub fn draft_key(&self) -> &str {
        &self.unique_id
    }
}

/// A single ban or pick, in the order the server recorded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub turn: u32,
    pub team: TeamSide,
    pub action: ActionType,
    pub champion: Champion,
    /// Present and meaningful only for PICK selections.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub time_taken: Option<f64>,
}

/// Per-team counters on a status snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamOverview {
    #[serde(default)]
    pub name: String,
    pub side: TeamSide,
    #[serde(default)]
    pub total_picks: u32,
    #[serde(default)]
    pub total_bans: u32,
}

/// Both teams' counters, keyed by side on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsOverview {
    pub blue: TeamOverview,
    pub red: TeamOverview,
}

impl Default for TeamsOverview {
    fn default() -> Self {
        TeamsOverview {
            blue: TeamOverview {
                name: String::new(),
                side: TeamSide::Blue,
                total_picks: 0,
                total_bans: 0,
            },
            red: TeamOverview {
                name: String::new(),
                side: TeamSide::Red,
                total_picks: 0,
                total_bans: 0,
            },
        }
    }
}

/// The full server-authoritative draft snapshot.
///
/// The client never mutates one of these in place; each refresh replaces
/// the previous snapshot wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftStatus {
    pub id: String,
    pub status: Lifecycle,
    #[serde(default)]
    pub current_turn: u32,
    pub current_team: TeamSide,
    /// Phase label, e.g. "BLUE_BAN_1" or "RED_PICK_3". A "BAN" substring
    /// is the contract's only signal that the turn is a ban.
    #[serde(default)]
    pub current_phase: String,
    #[serde(default)]
    pub timer_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub teams: TeamsOverview,
    #[serde(default)]
    pub selections: Vec<Selection>,
}

// ---------------------------------------------------------------------------
// Queue
// ---------------------------------------------------------------------------

/// Aggregate readiness stats for a guild queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStats {
    #[serde(default)]
    pub total_players: u32,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub is_ready: bool,
}

/// Per-role queue membership for a guild.
///
/// Member objects are opaque to this client; only their count matters,
/// so they stay as raw JSON values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueSnapshot {
    #[serde(default)]
    pub queues: HashMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub stats: QueueStats,
}

impl QueueSnapshot {
    /// Number of players queued for a role (missing role key = empty).
    pub fn role_count(&self, role: Role) -> usize {
        self.queues
            .get(role.display_str())
            .map(|members| members.len())
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_round_trip() {
        for (variant, text) in [
            (Lifecycle::Waiting, "\"WAITING\""),
            (Lifecycle::Drafting, "\"DRAFTING\""),
            (Lifecycle::Completed, "\"COMPLETED\""),
            (Lifecycle::Cancelled, "\"CANCELLED\""),
        ] {
            assert_eq!(serde_json::to_string(&variant).unwrap(), text);
            let parsed: Lifecycle = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, variant);
        }
    }

    #[test]
    fn only_drafting_is_actionable_lifecycle() {
        assert!(Lifecycle::Drafting.is_drafting());
        assert!(!Lifecycle::Waiting.is_drafting());
        assert!(!Lifecycle::Completed.is_drafting());
        assert!(!Lifecycle::Cancelled.is_drafting());
    }

    #[test]
    fn draft_key_is_the_join_code() {
        let json = r#"{"id": "17", "unique_id": "AB12CD", "status": "WAITING"}"#;
        let summary: DraftSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.draft_key(), "AB12CD");
        assert_ne!(summary.draft_key(), summary.id);
    }

    #[test]
    fn role_parsing_accepts_aliases() {
        assert_eq!(Role::from_str_role("TOP"), Some(Role::Top));
        assert_eq!(Role::from_str_role("jungle"), Some(Role::Jungle));
        assert_eq!(Role::from_str_role("BOT"), Some(Role::Adc));
        assert_eq!(Role::from_str_role("sup"), Some(Role::Support));
        assert_eq!(Role::from_str_role("FEEDER"), None);
    }

    #[test]
    fn status_snapshot_deserializes_full_payload() {
        let json = r#"{
            "id": "d1",
            "status": "DRAFTING",
            "currentTurn": 3,
            "currentTeam": "BLUE",
            "currentPhase": "BLUE_BAN_2",
            "timerEnd": "2026-03-01T18:30:00Z",
            "teams": {
                "blue": {"name": "Blue Side", "side": "BLUE", "totalPicks": 1, "totalBans": 2},
                "red": {"name": "Red Side", "side": "RED", "totalPicks": 1, "totalBans": 1}
            },
            "selections": [
                {
                    "turn": 1,
                    "team": "BLUE",
                    "action": "BAN",
                    "champion": {"id": "zed", "name": "Zed", "title": "the Master of Shadows"}
                },
                {
                    "turn": 2,
                    "team": "RED",
                    "action": "PICK",
                    "champion": {"id": "ahri", "name": "Ahri"},
                    "role": "MID",
                    "time_taken": 12.5
                }
            ]
        }"#;

        let status: DraftStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.current_turn, 3);
        assert_eq!(status.current_team, TeamSide::Blue);
        assert!(status.timer_end.is_some());
        assert_eq!(status.teams.blue.total_bans, 2);
        assert_eq!(status.selections.len(), 2);
        assert_eq!(status.selections[0].action, ActionType::Ban);
        assert_eq!(status.selections[0].role, None);
        assert_eq!(status.selections[1].role, Some(Role::Mid));
    }

    #[test]
    fn partial_snapshot_defaults_missing_collections() {
        // No selections, teams, phase, or timer: must still deserialize.
        let json = r#"{"id": "d2", "status": "WAITING", "currentTeam": "RED"}"#;
        let status: DraftStatus = serde_json::from_str(json).unwrap();
        assert!(status.selections.is_empty());
        assert_eq!(status.current_turn, 0);
        assert!(status.current_phase.is_empty());
        assert!(status.timer_end.is_none());
        assert_eq!(status.teams.blue.side, TeamSide::Blue);
        assert_eq!(status.teams.red.side, TeamSide::Red);
    }

    #[test]
    fn champion_optional_rates_default_to_none() {
        let json = r#"{"id": "lux", "name": "Lux"}"#;
        let champ: Champion = serde_json::from_str(json).unwrap();
        assert!(champ.tags.is_empty());
        assert!(champ.pick_rate.is_none());
        assert!(champ.win_rate.is_none());
        assert!(champ.image.url.is_empty());
    }

    #[test]
    fn queue_snapshot_counts_roles() {
        let json = r#"{
            "queues": {
                "TOP": [{"userId": "1"}, {"userId": "2"}],
                "MID": [{"userId": "3"}]
            },
            "stats": {"totalPlayers": 3, "progress": 0.3, "isReady": false}
        }"#;
        let queue: QueueSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(queue.role_count(Role::Top), 2);
        assert_eq!(queue.role_count(Role::Mid), 1);
        assert_eq!(queue.role_count(Role::Support), 0);
        assert_eq!(queue.stats.total_players, 3);
        assert!(!queue.stats.is_ready);
    }
}
