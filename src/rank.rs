// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rank scoring over raw activity counters.
//!
//! Each counter is normalized against a typical ("median") value and passed
//! through one of two closed-form CDFs. The weighted average of those terms
//! measures how exceptional the account is; the rank fraction is its
//! complement, so lower percentiles are better grades.

use serde::{Deserialize, Serialize};

use crate::error::Error;

const COMMITS_MEDIAN: f64 = 250.0;
const COMMITS_WEIGHT: f64 = 2.0;
const PRS_MEDIAN: f64 = 50.0;
const PRS_WEIGHT: f64 = 3.0;
const ISSUES_MEDIAN: f64 = 25.0;
const ISSUES_WEIGHT: f64 = 1.0;
const REVIEWS_MEDIAN: f64 = 2.0;
const REVIEWS_WEIGHT: f64 = 1.0;
const STARS_MEDIAN: f64 = 50.0;
const STARS_WEIGHT: f64 = 4.0;
const FOLLOWERS_MEDIAN: f64 = 10.0;
const FOLLOWERS_WEIGHT: f64 = 1.0;

const TOTAL_WEIGHT: f64 = COMMITS_WEIGHT
    + PRS_WEIGHT
    + ISSUES_WEIGHT
    + REVIEWS_WEIGHT
    + STARS_WEIGHT
    + FOLLOWERS_WEIGHT;

/// Upper percentile bound of each level, ascending, paired with the level.
const THRESHOLDS: [(f64, RankLevel,); 9] = [
    (1.0, RankLevel::S,),
    (12.5, RankLevel::APlus,),
    (25.0, RankLevel::A,),
    (37.5, RankLevel::AMinus,),
    (50.0, RankLevel::BPlus,),
    (62.5, RankLevel::B,),
    (75.0, RankLevel::BMinus,),
    (87.5, RankLevel::CPlus,),
    (100.0, RankLevel::C,),
];

/// Letter grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
pub enum RankLevel
{
    /// Top percent.
    #[serde(rename = "S")]
    S,
    /// Up to 12.5.
    #[serde(rename = "A+")]
    APlus,
    /// Up to 25.
    #[serde(rename = "A")]
    A,
    /// Up to 37.5.
    #[serde(rename = "A-")]
    AMinus,
    /// Up to 50.
    #[serde(rename = "B+")]
    BPlus,
    /// Up to 62.5.
    #[serde(rename = "B")]
    B,
    /// Up to 75.
    #[serde(rename = "B-")]
    BMinus,
    /// Up to 87.5.
    #[serde(rename = "C+")]
    CPlus,
    /// Up to 100.
    #[serde(rename = "C")]
    C,
}

impl RankLevel
{
    /// Selects the first level whose threshold is at least `percentile`.
    ///
    /// Returns `None` when `percentile` exceeds 100 or is NaN.
    pub fn from_percentile(percentile: f64,) -> Option<Self,>
    {
        THRESHOLDS
            .iter()
            .find(|(threshold, _,)| percentile <= *threshold,)
            .map(|(_, level,)| *level,)
    }

    /// Returns the grade as printed in reports.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            Self::S => "S",
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
        }
    }
}

impl std::fmt::Display for RankLevel
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_,>,) -> std::fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

/// Raw counters fed to the scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq,)]
pub struct RankInput
{
    /// Commit contributions.
    pub commits:   u64,
    /// Authored pull requests.
    pub prs:       u64,
    /// Authored issues.
    pub issues:    u64,
    /// Review contributions.
    pub reviews:   u64,
    /// Owned repositories; accepted but not part of the score.
    pub repos:     u64,
    /// Stars over owned repositories.
    pub stars:     u64,
    /// Followers.
    pub followers: u64,
}

/// Letter grade and percentile of an account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize,)]
pub struct Rank
{
    /// Letter grade.
    pub level:      RankLevel,
    /// Rank fraction times 100; lower is better.
    pub percentile: f64,
}

fn exponential_cdf(x: f64,) -> f64
{
    1.0 - 2f64.powf(-x,)
}

// Approximation of the log-normal CDF.
fn log_normal_cdf(x: f64,) -> f64
{
    x / (1.0 + x)
}

/// Computes the rank percentile of the counters.
///
/// `input.repos` does not take part in the score.
pub fn percentile(input: &RankInput,) -> f64
{
    let weighted = COMMITS_WEIGHT * exponential_cdf(input.commits as f64 / COMMITS_MEDIAN,)
        + PRS_WEIGHT * exponential_cdf(input.prs as f64 / PRS_MEDIAN,)
        + ISSUES_WEIGHT * exponential_cdf(input.issues as f64 / ISSUES_MEDIAN,)
        + REVIEWS_WEIGHT * exponential_cdf(input.reviews as f64 / REVIEWS_MEDIAN,)
        + STARS_WEIGHT * log_normal_cdf(input.stars as f64 / STARS_MEDIAN,)
        + FOLLOWERS_WEIGHT * log_normal_cdf(input.followers as f64 / FOLLOWERS_MEDIAN,);

    (1.0 - weighted / TOTAL_WEIGHT) * 100.0
}

/// Calculates the rank of an account from its counters.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the percentile falls outside the graded
/// range and therefore has no letter grade.
///
/// # Examples
///
/// ```
/// use ghstat::{RankInput, RankLevel, calculate_rank};
///
/// let rank = calculate_rank(&RankInput::default(),)?;
/// assert_eq!(rank.level, RankLevel::C);
/// assert_eq!(rank.percentile, 100.0);
/// # Ok::<(), ghstat::Error>(())
/// ```
pub fn calculate_rank(input: &RankInput,) -> Result<Rank, Error,>
{
    let percentile = percentile(input,);
    let level = RankLevel::from_percentile(percentile,).ok_or_else(|| {
        Error::validation(format!("rank percentile {percentile} is outside the graded range"),)
    },)?;

    Ok(Rank {
        level,
        percentile,
    },)
}
