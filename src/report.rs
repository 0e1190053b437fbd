//! Human readable results and performance tiers.
//!
//! Everything here only reads its input. Reports work the same for a local [`BatchReport`] and
//! for a remote [`EvaluationJob`], both being reduced to [`AggregateStats`] first.

use std::fmt::{self, Display, Write};

use crate::evaluator::BatchReport;
use crate::remote::EvaluationJob;
use crate::stats::AggregateStats;

/// Number of individual games shown in reports.
pub const EXAMPLES_SHOWN: usize = 5;

/// Win rate needed to be considered ready for a remote submission.
pub const SUBMISSION_THRESHOLD: f64 = 50.0;

/// Qualitative performance bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Below 50%.
    NeedsImprovement,
    /// From 50% to 60%.
    Beginner,
    /// From 60% to 70%.
    Intermediate,
    /// 70% and above.
    Advanced,
}

impl Tier {
    /// Tier of a win rate given in percent.
    pub fn from_win_rate(win_rate: f64) -> Self {
        if win_rate >= 70.0 {
            Tier::Advanced
        } else if win_rate >= 60.0 {
            Tier::Intermediate
        } else if win_rate >= SUBMISSION_THRESHOLD {
            Tier::Beginner
        } else {
            Tier::NeedsImprovement
        }
    }

    /// Verdict line for this tier.
    pub fn message(self) -> &'static str {
        match self {
            Tier::Advanced => "EXCELLENT! Your bot meets the advanced target (70%+)",
            Tier::Intermediate => "GOOD! Your bot meets the intermediate target (60-70%)",
            Tier::Beginner => "FAIR! Your bot meets the beginner target (50-60%)",
            Tier::NeedsImprovement => {
                "NEEDS IMPROVEMENT! Consider enhancing your bot's algorithm"
            }
        }
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::Advanced => "advanced",
            Tier::Intermediate => "intermediate",
            Tier::Beginner => "beginner",
            Tier::NeedsImprovement => "needs improvement",
        })
    }
}

/// Tier of an evaluation together with the win rate it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    /// Selected tier.
    pub tier: Tier,
    /// Win rate in percent.
    pub win_rate: f64,
}

impl Verdict {
    /// Verdict of `stats`.
    pub fn of(stats: &AggregateStats) -> Self {
        Verdict {
            tier: Tier::from_win_rate(stats.win_rate),
            win_rate: stats.win_rate,
        }
    }

    /// True when the agent is good enough to be sent to the remote judge.
    pub fn is_ready_for_submission(&self) -> bool {
        self.win_rate >= SUBMISSION_THRESHOLD
    }
}

/// Report of a local evaluation.
pub fn render_local_report(report: &BatchReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    let _ = write_local(&mut out, report, stats);
    out
}

fn write_local(out: &mut String, report: &BatchReport, stats: &AggregateStats) -> fmt::Result {
    section(out, "HANGMAN BOT PERFORMANCE RESULTS")?;
    write_totals(out, stats)?;
    write_lengths(out, stats)?;

    writeln!(out, "\nExample Results:")?;
    writeln!(out, "{}", "-".repeat(20))?;
    for outcome in report.examples(EXAMPLES_SHOWN) {
        writeln!(
            out,
            "{}: {} ({} guesses, {} lives left)",
            outcome.word,
            won_or_lost(outcome.won),
            outcome.guesses,
            outcome.lives_left
        )?;
    }

    let verdict = Verdict::of(stats);
    write_verdict(out, &verdict)?;
    writeln!(out, "\nYour bot achieved {:.1}% win rate", verdict.win_rate)?;
    if verdict.is_ready_for_submission() {
        writeln!(out, "Your bot is ready for API submission!")
    } else {
        writeln!(out, "Improve your bot before submitting to the API")
    }
}

/// Report of a remote job, finished or not.
pub fn render_job_report(job: &EvaluationJob) -> String {
    let mut out = String::new();
    let _ = write_job(&mut out, job);
    out
}

fn write_job(out: &mut String, job: &EvaluationJob) -> fmt::Result {
    section(out, "API EVALUATION RESULTS")?;
    writeln!(out, "Job ID: {}", job.job_id)?;
    writeln!(out, "User ID: {}", job.user_id.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "Model Name: {}", job.model_name.as_deref().unwrap_or("N/A"))?;
    writeln!(out, "Status: {}", job.raw_status)?;

    let Some(results) = &job.results else {
        return writeln!(out, "\nNo results available");
    };
    let stats = results.to_aggregate_stats();
    if let Some(stats) = &stats {
        writeln!(out, "\nOverall Performance:")?;
        write_totals(out, stats)?;
    }
    if let Some(score) = results.overall_score {
        writeln!(out, "\nOverall Score: {score}/100")?;
    }
    if let Some(stats) = &stats {
        write_lengths(out, stats)?;
    }
    if !results.word_results.is_empty() {
        writeln!(out, "\nSample Results:")?;
        writeln!(out, "{}", "-".repeat(20))?;
        for result in results.word_results.iter().take(EXAMPLES_SHOWN) {
            writeln!(
                out,
                "{}: {} ({} guesses, {} lives left)",
                result.word,
                won_or_lost(result.won),
                or_na(result.guesses),
                or_na(result.lives_left)
            )?;
        }
    }
    if let Some(stats) = &stats {
        let verdict = Verdict::of(stats);
        write_verdict(out, &verdict)?;
        writeln!(
            out,
            "\nYour bot achieved {}% win rate on the official test set",
            verdict.win_rate
        )?;
    }
    Ok(())
}

fn section(out: &mut String, title: &str) -> fmt::Result {
    let rule = "=".repeat(60);
    writeln!(out, "{rule}\n{title}\n{rule}")
}

fn write_totals(out: &mut String, stats: &AggregateStats) -> fmt::Result {
    writeln!(out, "Total Tests: {}", stats.total_tests)?;
    writeln!(out, "Wins: {}", stats.wins)?;
    writeln!(out, "Losses: {}", stats.losses)?;
    writeln!(out, "Win Rate: {:.1}%", stats.win_rate)?;
    writeln!(out, "Average Guesses: {:.1}", stats.avg_guesses)?;
    writeln!(out, "Total Guesses: {}", stats.total_guesses)
}

fn write_lengths(out: &mut String, stats: &AggregateStats) -> fmt::Result {
    writeln!(out, "\nPerformance by Word Length:")?;
    writeln!(out, "{}", "-".repeat(30))?;
    for (len, data) in &stats.by_length {
        writeln!(
            out,
            "Length {len}: {}/{} ({:.1}%)",
            data.wins, data.total, data.win_rate
        )?;
    }
    Ok(())
}

fn write_verdict(out: &mut String, verdict: &Verdict) -> fmt::Result {
    writeln!(out)?;
    section(out, "SUCCESS CRITERIA")?;
    writeln!(out, "{}", verdict.tier.message())
}

fn won_or_lost(won: bool) -> &'static str {
    if won {
        "WON"
    } else {
        "LOST"
    }
}

fn or_na(value: Option<u32>) -> String {
    value.map_or_else(|| "N/A".to_owned(), |v| v.to_string())
}
