use chrono::{DateTime, Utc};

use crate::domain::{HistoryEvent, TeamAssignmentInterval, TeamId, TeamsChange};

/// Fold state threaded through the team-changing events.
#[derive(Debug, Default)]
struct Assignments {
    closed: Vec<TeamAssignmentInterval>,
    /// Teams currently assigned, in the order they were opened.
    open: Vec<(TeamId, DateTime<Utc>)>,
}

impl Assignments {
    fn is_open(&self, team: &str) -> bool {
        self.open.iter().any(|(t, _)| t == team)
    }

    fn open(&mut self, team: &TeamId, since: DateTime<Utc>) {
        if !self.is_open(team) {
            self.open.push((team.clone(), since));
        }
    }

    fn close(&mut self, team: &str, at: DateTime<Utc>) {
        if let Some(pos) = self.open.iter().position(|(t, _)| t == team) {
            let (team, start_date) = self.open.remove(pos);
            self.closed.push(TeamAssignmentInterval {
                team,
                start_date,
                end_date: at.max(start_date),
            });
        }
    }

    fn apply(mut self, date: DateTime<Utc>, change: &TeamsChange) -> Self {
        for team in change.left() {
            self.close(team, date);
        }
        for team in change.joined() {
            self.open(team, date);
        }
        self
    }

    fn finish(mut self, now: DateTime<Utc>) -> Vec<TeamAssignmentInterval> {
        let still_open = std::mem::take(&mut self.open);
        self.closed
            .extend(still_open.into_iter().map(|(team, start_date)| TeamAssignmentInterval {
                team,
                start_date,
                end_date: now.max(start_date),
            }));
        self.closed
    }
}

/// Rebuilds per-team assignment intervals from a person's history log.
///
/// Only events carrying an `assignedTeams` change are considered. Teams
/// listed as the previous assignment of the earliest such event are taken to
/// have been assigned since `creation_date`. Teams still assigned after the
/// last event get an interval ending at `now`.
pub fn reconstruct(
    events: &[HistoryEvent],
    creation_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<TeamAssignmentInterval> {
    let mut changes: Vec<(DateTime<Utc>, TeamsChange)> = events
        .iter()
        .filter_map(|e| e.teams_change().map(|change| (e.date, change)))
        .collect();
    changes.sort_by_key(|(date, _)| *date);

    let Some((first_date, first_change)) = changes.first() else {
        return vec![];
    };

    let seeded_since = creation_date.min(*first_date);
    let mut seed = Assignments::default();
    for team in &first_change.old_value {
        seed.open(team, seeded_since);
    }

    let intervals = changes
        .iter()
        .fold(seed, |acc, (date, change)| acc.apply(*date, change))
        .finish(now);

    tracing::debug!(
        "reconstructed {} team intervals from {} team changes",
        intervals.len(),
        changes.len()
    );
    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn teams_event(date: &str, old: serde_json::Value, new: serde_json::Value) -> HistoryEvent {
        serde_json::from_value(json!({
            "date": date,
            "user": "u1",
            "data": { "assignedTeams": { "oldValue": old, "newValue": new } }
        }))
        .expect("decode event")
    }

    fn other_event(date: &str) -> HistoryEvent {
        serde_json::from_value(json!({
            "date": date,
            "user": "u1",
            "data": { "name": { "oldValue": "Jo", "newValue": "Joe" } }
        }))
        .expect("decode event")
    }

    fn interval(team: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> TeamAssignmentInterval {
        TeamAssignmentInterval {
            team: team.to_string(),
            start_date: start,
            end_date: end,
        }
    }

    fn assert_disjoint_per_team(intervals: &[TeamAssignmentInterval]) {
        for (i, a) in intervals.iter().enumerate() {
            assert!(a.start_date <= a.end_date, "inverted interval {:?}", a);
            for b in &intervals[i + 1..] {
                if a.team == b.team {
                    assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn joined_on_first_event() {
        let now = at(2024, 6, 1);
        let events = vec![teams_event("2022-01-01", json!([]), json!(["A", "B"]))];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        assert_eq!(
            intervals,
            vec![
                interval("A", at(2022, 1, 1), now),
                interval("B", at(2022, 1, 1), now),
            ]
        );
    }

    #[test]
    fn initial_teams_seeded_from_creation() {
        let now = at(2024, 6, 1);
        let events = vec![teams_event("2022-03-01", json!(["A", "B"]), json!(["A"]))];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        assert_eq!(
            intervals,
            vec![
                interval("B", at(2022, 1, 1), at(2022, 3, 1)),
                interval("A", at(2022, 1, 1), now),
            ]
        );
    }

    #[test]
    fn empty_log_yields_nothing() {
        assert!(reconstruct(&[], at(2022, 1, 1), at(2024, 1, 1)).is_empty());
        let events = vec![other_event("2022-02-01")];
        assert!(reconstruct(&events, at(2022, 1, 1), at(2024, 1, 1)).is_empty());
    }

    #[test]
    fn rejoining_opens_a_new_interval() {
        let now = at(2024, 1, 1);
        let events = vec![
            teams_event("2022-01-10", json!([]), json!(["A"])),
            other_event("2022-02-01"),
            teams_event("2022-03-01", json!(["A"]), json!(["B"])),
            teams_event("2022-06-01", json!(["B"]), json!(["A", "B"])),
        ];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        assert_eq!(
            intervals,
            vec![
                interval("A", at(2022, 1, 10), at(2022, 3, 1)),
                interval("B", at(2022, 3, 1), now),
                interval("A", at(2022, 6, 1), now),
            ]
        );
        assert_disjoint_per_team(&intervals);
    }

    #[test]
    fn join_while_open_does_not_restart() {
        let now = at(2024, 1, 1);
        // Second event claims A was absent although it is still open.
        let events = vec![
            teams_event("2022-01-10", json!([]), json!(["A"])),
            teams_event("2022-02-10", json!([]), json!(["A"])),
        ];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        assert_eq!(intervals, vec![interval("A", at(2022, 1, 10), now)]);
    }

    #[test]
    fn leaving_an_unknown_team_is_ignored() {
        let now = at(2024, 1, 1);
        let events = vec![
            teams_event("2022-01-10", json!([]), json!(["A"])),
            teams_event("2022-02-10", json!(["A", "Z"]), json!(["A"])),
        ];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        assert_eq!(intervals, vec![interval("A", at(2022, 1, 10), now)]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let now = at(2024, 1, 1);
        let sorted = vec![
            teams_event("2022-01-10", json!(["C"]), json!(["A"])),
            teams_event("2022-03-01", json!(["A"]), json!(["B"])),
            teams_event("2022-06-01", json!(["B"]), json!(["A", "B"])),
        ];
        let mut shuffled = sorted.clone();
        shuffled.reverse();
        shuffled.swap(0, 1);

        assert_eq!(
            reconstruct(&sorted, at(2022, 1, 1), now),
            reconstruct(&shuffled, at(2022, 1, 1), now)
        );
    }

    #[test]
    fn repeated_calls_restamp_now() {
        let events = vec![teams_event("2022-01-10", json!([]), json!(["A"]))];
        let first = reconstruct(&events, at(2022, 1, 1), at(2024, 1, 1));
        let again = reconstruct(&events, at(2022, 1, 1), at(2024, 1, 1));
        let later = reconstruct(&events, at(2022, 1, 1), at(2025, 1, 1));

        assert_eq!(first, again);
        assert_eq!(later[0].end_date, at(2025, 1, 1));
    }

    #[test]
    fn still_assigned_teams_end_exactly_once_at_now() {
        let now = at(2024, 1, 1);
        let events = vec![
            teams_event("2022-01-10", json!(["X"]), json!(["A", "X"])),
            teams_event("2022-03-01", json!(["A", "X"]), json!(["B"])),
            teams_event("2022-06-01", json!(["B"]), json!(["A", "B"])),
        ];

        let intervals = reconstruct(&events, at(2022, 1, 1), now);

        for team in ["A", "B"] {
            let open = intervals
                .iter()
                .filter(|i| i.team == team && i.end_date == now)
                .count();
            assert_eq!(open, 1, "team {}", team);
        }
        assert!(intervals.iter().all(|i| i.team != "X" || i.end_date != now));
        assert_disjoint_per_team(&intervals);
    }

    #[test]
    fn creation_after_first_change_is_clamped() {
        let now = at(2024, 1, 1);
        let events = vec![teams_event("2022-01-10", json!(["A"]), json!([]))];

        let intervals = reconstruct(&events, at(2022, 5, 1), now);

        assert_eq!(intervals, vec![interval("A", at(2022, 1, 10), at(2022, 1, 10))]);
    }

    #[test]
    fn same_instant_events_apply_in_log_order() {
        let now = at(2024, 1, 1);
        let join_then_leave = vec![
            teams_event("2022-02-01", json!([]), json!(["A"])),
            teams_event("2022-02-01", json!(["A"]), json!([])),
        ];

        let intervals = reconstruct(&join_then_leave, at(2022, 1, 1), now);
        assert_eq!(intervals, vec![interval("A", at(2022, 2, 1), at(2022, 2, 1))]);

        let leave_then_join: Vec<_> = join_then_leave.into_iter().rev().collect();
        let intervals = reconstruct(&leave_then_join, at(2022, 1, 1), now);
        assert_eq!(
            intervals,
            vec![
                interval("A", at(2022, 1, 1), at(2022, 2, 1)),
                interval("A", at(2022, 2, 1), now),
            ]
        );
    }
}
