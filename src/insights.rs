use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{BattingStats, BowlingStats, Player};

pub const MAX_INSIGHTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    StrikeRate,
    BattingAverage,
    TotalRuns,
    TotalFours,
    TotalSixes,
    BoundaryPercentage,
    Economy,
    TotalWickets,
    BowlingAverage,
}

impl Metric {
    pub fn category(self) -> Category {
        match self {
            Metric::Economy | Metric::TotalWickets | Metric::BowlingAverage => Category::Bowling,
            _ => Category::Batting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Batting,
    Bowling,
}

/// Threshold test on one metric value. `Between` is inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    GreaterThan(f64),
    LessThan(f64),
    AtLeast(f64),
    AtMost(f64),
    Between(f64, f64),
}

impl Comparison {
    pub fn applies(self, value: f64) -> bool {
        match self {
            Comparison::GreaterThan(t) => value > t,
            Comparison::LessThan(t) => value < t,
            Comparison::AtLeast(t) => value >= t,
            Comparison::AtMost(t) => value <= t,
            Comparison::Between(lo, hi) => value >= lo && value <= hi,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub metric: Metric,
    pub comparison: Comparison,
    pub icon: &'static str,
    pub tag: &'static str,
    pub narrative: &'static str,
    pub priority: u8,
}

const fn rule(
    metric: Metric,
    comparison: Comparison,
    icon: &'static str,
    tag: &'static str,
    narrative: &'static str,
    priority: u8,
) -> InsightRule {
    InsightRule {
        metric,
        comparison,
        icon,
        tag,
        narrative,
        priority,
    }
}

// Ranges overlap on purpose: a 120 strike rate is both explosive and balanced.
pub static BATTING_RULES: &[InsightRule] = &[
    rule(
        Metric::StrikeRate,
        Comparison::AtLeast(120.0),
        "🚀",
        "explosive",
        "Explosive striker targeting boundaries aggressively",
        1,
    ),
    rule(
        Metric::StrikeRate,
        Comparison::Between(105.0, 120.0),
        "⚡",
        "balanced attacking",
        "Balanced attacking approach rotating strike well",
        2,
    ),
    rule(
        Metric::StrikeRate,
        Comparison::Between(90.0, 105.0),
        "🏏",
        "steady accumulator",
        "Steady accumulator anchoring the innings",
        3,
    ),
    rule(
        Metric::BattingAverage,
        Comparison::AtLeast(35.0),
        "⭐",
        "elite",
        "Elite consistency among top division performers",
        1,
    ),
    rule(
        Metric::BattingAverage,
        Comparison::Between(25.0, 35.0),
        "✨",
        "key contributor",
        "Key contributor delivering regularly for team",
        2,
    ),
    rule(
        Metric::BattingAverage,
        Comparison::Between(18.0, 25.0),
        "📊",
        "solid",
        "Solid performer contributing valuable runs",
        3,
    ),
    rule(
        Metric::TotalRuns,
        Comparison::AtLeast(180.0),
        "🏆",
        "leading scorer",
        "Among division's leading run-scorers this season",
        1,
    ),
    rule(
        Metric::TotalRuns,
        Comparison::Between(140.0, 180.0),
        "🔥",
        "high-impact",
        "High-impact batsman with significant contributions",
        2,
    ),
    rule(
        Metric::TotalRuns,
        Comparison::Between(110.0, 140.0),
        "💪",
        "consistent",
        "Consistent contributor accumulating steadily",
        3,
    ),
    rule(
        Metric::TotalFours,
        Comparison::AtLeast(25.0),
        "🎯",
        "gap finder",
        "Gap finder hitting boundaries regularly",
        2,
    ),
    rule(
        Metric::TotalSixes,
        Comparison::AtLeast(8.0),
        "💥",
        "power hitter",
        "Power hitter clearing ropes consistently",
        2,
    ),
    rule(
        Metric::BoundaryPercentage,
        Comparison::AtLeast(50.0),
        "⚡",
        "aggressive",
        "Over half of runs from boundaries - aggressive approach",
        3,
    ),
];

pub static BOWLING_RULES: &[InsightRule] = &[
    rule(
        Metric::Economy,
        Comparison::LessThan(4.0),
        "🎯",
        "exceptional economy",
        "Exceptional economy among division's best",
        1,
    ),
    rule(
        Metric::Economy,
        Comparison::Between(4.0, 4.8),
        "✅",
        "economical",
        "Economical bowler restricting scoring effectively",
        2,
    ),
    rule(
        Metric::Economy,
        Comparison::Between(4.8, 5.5),
        "⚖️",
        "reliable",
        "Reliable bowler maintaining steady pressure",
        3,
    ),
    rule(
        Metric::Economy,
        Comparison::AtLeast(5.5),
        "⚡",
        "attacking",
        "Attacking approach trading runs for wickets",
        4,
    ),
    rule(
        Metric::TotalWickets,
        Comparison::AtLeast(13.0),
        "🏆",
        "elite wicket-taker",
        "Leading wicket-taker among division's elite",
        1,
    ),
    rule(
        Metric::TotalWickets,
        Comparison::Between(10.0, 13.0),
        "⭐",
        "strike bowler",
        "Strike bowler delivering crucial breakthroughs",
        2,
    ),
    rule(
        Metric::TotalWickets,
        Comparison::Between(8.0, 10.0),
        "💪",
        "consistent wicket-taker",
        "Consistent wicket-taker contributing regularly",
        3,
    ),
    rule(
        Metric::BowlingAverage,
        Comparison::AtMost(15.0),
        "🌟",
        "outstanding average",
        "Outstanding average indicating quality bowling",
        1,
    ),
    rule(
        Metric::BowlingAverage,
        Comparison::Between(15.0, 22.0),
        "👍",
        "strong average",
        "Strong average showing effective performance",
        2,
    ),
];

pub fn all_rules() -> impl Iterator<Item = &'static InsightRule> {
    BATTING_RULES.iter().chain(BOWLING_RULES.iter())
}

/// Metric values available for one player. Absent metrics never match a rule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    values: BTreeMap<Metric, f64>,
}

impl MetricSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.insert(metric, value);
        self
    }

    pub fn insert(&mut self, metric: Metric, value: f64) {
        self.values.insert(metric, value);
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values.get(&metric).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn from_batting(stats: &BattingStats) -> Self {
        Self::new()
            .with(Metric::StrikeRate, stats.strike_rate)
            .with(Metric::BattingAverage, stats.average)
            .with(Metric::TotalRuns, stats.runs as f64)
            .with(Metric::TotalFours, stats.fours as f64)
            .with(Metric::TotalSixes, stats.sixes as f64)
            .with(Metric::BoundaryPercentage, stats.boundary_percentage())
    }

    pub fn from_bowling(stats: &BowlingStats) -> Self {
        Self::new()
            .with(Metric::Economy, stats.economy)
            .with(Metric::TotalWickets, stats.wickets as f64)
            .with(Metric::BowlingAverage, stats.average)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInsight {
    pub icon: &'static str,
    pub tag: &'static str,
    pub text: &'static str,
    pub priority: u8,
    pub category: Category,
    pub metric: Metric,
}

impl From<&InsightRule> for PlayerInsight {
    fn from(rule: &InsightRule) -> Self {
        Self {
            icon: rule.icon,
            tag: rule.tag,
            text: rule.narrative,
            priority: rule.priority,
            category: rule.metric.category(),
            metric: rule.metric,
        }
    }
}

/// Every rule whose metric is present and whose threshold holds, in table order.
pub fn matching_rules(metrics: &MetricSet) -> Vec<&'static InsightRule> {
    all_rules()
        .filter(|r| metrics.get(r.metric).is_some_and(|v| r.comparison.applies(v)))
        .collect()
}

pub fn classify(metrics: &MetricSet) -> Vec<PlayerInsight> {
    let mut fired = matching_rules(metrics);
    fired.sort_by_key(|r| r.priority);
    fired
        .into_iter()
        .take(MAX_INSIGHTS)
        .map(PlayerInsight::from)
        .collect()
}

pub fn batting_insights(stats: &BattingStats) -> Vec<PlayerInsight> {
    classify(&MetricSet::from_batting(stats))
}

pub fn bowling_insights(stats: &BowlingStats) -> Vec<PlayerInsight> {
    classify(&MetricSet::from_bowling(stats))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerInsights {
    pub batting: Vec<PlayerInsight>,
    pub bowling: Vec<PlayerInsight>,
}

pub fn player_insights(player: &Player) -> PlayerInsights {
    PlayerInsights {
        batting: player
            .batting
            .as_ref()
            .map(batting_insights)
            .unwrap_or_default(),
        bowling: player
            .bowling
            .as_ref()
            .map(bowling_insights)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_is_inclusive() {
        assert!(Comparison::Between(105.0, 120.0).applies(120.0));
        assert!(Comparison::Between(105.0, 120.0).applies(105.0));
        assert!(!Comparison::Between(105.0, 120.0).applies(120.01));
        assert!(!Comparison::LessThan(4.0).applies(f64::NAN));
    }

    #[test]
    fn overlapping_strike_rate_fires_twice() {
        let metrics = MetricSet::new().with(Metric::StrikeRate, 120.0);
        let tags: Vec<_> = matching_rules(&metrics).iter().map(|r| r.tag).collect();
        assert_eq!(tags, vec!["explosive", "balanced attacking"]);
    }

    #[test]
    fn classify_caps_and_orders_by_priority() {
        let metrics = MetricSet::new()
            .with(Metric::TotalRuns, 150.0)
            .with(Metric::StrikeRate, 100.0)
            .with(Metric::BattingAverage, 40.0)
            .with(Metric::TotalSixes, 9.0);
        let insights = classify(&metrics);
        assert_eq!(insights.len(), MAX_INSIGHTS);
        let priorities: Vec<u8> = insights.iter().map(|i| i.priority).collect();
        assert_eq!(priorities, vec![1, 2, 2]);
        assert_eq!(insights[0].tag, "elite");
        // equal priorities keep table order
        assert_eq!(insights[1].metric, Metric::TotalRuns);
        assert_eq!(insights[2].metric, Metric::TotalSixes);
    }

    #[test]
    fn empty_metrics_yield_nothing() {
        assert!(classify(&MetricSet::new()).is_empty());
    }

    #[test]
    fn bowling_rules_tag_bowling_category() {
        let stats = BowlingStats {
            wickets: 14,
            overs: 28.0,
            runs: 105,
            average: 7.5,
            economy: 3.75,
            rank: 1,
        };
        let insights = bowling_insights(&stats);
        assert_eq!(insights.len(), 3);
        assert!(insights.iter().all(|i| i.category == Category::Bowling));
        assert!(insights.iter().all(|i| i.priority == 1));
    }
}
