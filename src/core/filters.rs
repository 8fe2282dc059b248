use chrono::{DateTime, Utc};

use crate::models::{Game, GameList};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Case-insensitive substring match on either team name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFilter {
    needles: Vec<String>,
}

impl TeamFilter {
    /// Parse a comma-separated `team` parameter
    ///
    /// Returns `None` when no non-blank needle remains, in which case the
    /// team filter places no restriction on the list.
    pub fn parse(raw: &str) -> Option<Self> {
        let needles: Vec<String> = raw
            .split(',')
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();

        if needles.is_empty() {
            None
        } else {
            Some(Self { needles })
        }
    }

    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    #[inline]
    pub fn matches(&self, game: &Game) -> bool {
        let home = game.home_team().to_lowercase();
        let away = game.away_team().to_lowercase();

        self.needles
            .iter()
            .any(|n| home.contains(n.as_str()) || away.contains(n.as_str()))
    }
}

/// Forward-looking kickoff window `[now, now + hours]`, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFilter {
    start_ms: f64,
    end_ms: f64,
}

impl WindowFilter {
    pub fn new(now: DateTime<Utc>, hours: f64) -> Self {
        let start_ms = now.timestamp_millis() as f64;
        Self {
            start_ms,
            end_ms: start_ms + hours * MILLIS_PER_HOUR,
        }
    }

    /// Parse a `windowHours` parameter
    ///
    /// Blank, non-numeric, NaN and infinite values yield `None`: the window
    /// filter is then treated as absent. Zero and negative hours are kept.
    pub fn parse_hours(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|h| h.is_finite())
    }

    /// Games whose `commence_time` does not parse never match
    #[inline]
    pub fn matches(&self, game: &Game) -> bool {
        match game.commence_time() {
            Some(t) => {
                let t_ms = t.timestamp_millis() as f64;
                t_ms >= self.start_ms && t_ms <= self.end_ms
            }
            None => false,
        }
    }
}

/// Narrow a game list by the optional `team` and `windowHours` parameters
///
/// The window starts at the moment this function runs, not when the request
/// arrived. Upstream order is preserved.
pub fn filter_games(games: GameList, team: Option<&str>, window_hours: Option<&str>) -> GameList {
    filter_games_at(games, team, window_hours, Utc::now())
}

/// Same as [`filter_games`] with an explicit "now"
pub fn filter_games_at(
    games: GameList,
    team: Option<&str>,
    window_hours: Option<&str>,
    now: DateTime<Utc>,
) -> GameList {
    let team_filter = team.and_then(TeamFilter::parse);
    let window_filter = window_hours
        .and_then(WindowFilter::parse_hours)
        .map(|hours| WindowFilter::new(now, hours));

    if team_filter.is_none() && window_filter.is_none() {
        return games;
    }

    games
        .into_iter()
        .filter(|g| team_filter.as_ref().map_or(true, |f| f.matches(g)))
        .filter(|g| window_filter.as_ref().map_or(true, |f| f.matches(g)))
        .collect()
}
