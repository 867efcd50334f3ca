//! Check run collection and summarization.

use super::CheckRunInfo;
use crate::record::{CheckRuns, CheckRunsSummary};

/// Conclusions that make the whole set of checks a failure.
const FAILING_CONCLUSIONS: [&str; 3] = ["failure", "timed_out", "cancelled"];

/// Builds the name to conclusion mapping stored in records.
///
/// Names are sorted; when a name appears more than once the last run wins.
#[must_use]
pub fn collect_check_runs(runs: impl IntoIterator<Item = CheckRunInfo>) -> CheckRuns {
    runs.into_iter()
        .map(|run| (run.name, run.conclusion))
        .collect()
}

/// Derives one overall outcome from individual check conclusions.
///
/// `pending` wins over everything, then `failure`; `success` requires every
/// check to have succeeded and any other mix is `neutral`.
#[must_use]
pub fn summarize_check_runs<'a>(
    conclusions: impl IntoIterator<Item = Option<&'a str>>,
) -> CheckRunsSummary {
    let conclusions: Vec<Option<&str>> = conclusions.into_iter().collect();

    if conclusions.iter().any(Option::is_none) {
        CheckRunsSummary::Pending
    } else if conclusions
        .iter()
        .flatten()
        .any(|c| FAILING_CONCLUSIONS.contains(c))
    {
        CheckRunsSummary::Failure
    } else if conclusions.iter().all(|c| *c == Some("success")) {
        CheckRunsSummary::Success
    } else {
        CheckRunsSummary::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(name: &str, conclusion: Option<&str>) -> CheckRunInfo {
        CheckRunInfo {
            name: name.to_string(),
            conclusion: conclusion.map(str::to_string),
        }
    }

    #[test]
    fn unset_conclusion_is_pending() {
        assert_eq!(summarize_check_runs([None]), CheckRunsSummary::Pending);
        assert_eq!(
            summarize_check_runs([Some("failure"), None]),
            CheckRunsSummary::Pending
        );
    }

    #[test]
    fn any_failure_is_failure() {
        assert_eq!(
            summarize_check_runs([Some("success"), Some("failure")]),
            CheckRunsSummary::Failure
        );
        assert_eq!(
            summarize_check_runs([Some("skipped"), Some("timed_out")]),
            CheckRunsSummary::Failure
        );
        assert_eq!(
            summarize_check_runs([Some("cancelled")]),
            CheckRunsSummary::Failure
        );
    }

    #[test]
    fn all_success_is_success() {
        assert_eq!(
            summarize_check_runs([Some("success"), Some("success")]),
            CheckRunsSummary::Success
        );
    }

    #[test]
    fn benign_mix_is_neutral() {
        assert_eq!(
            summarize_check_runs([Some("success"), Some("skipped")]),
            CheckRunsSummary::Neutral
        );
        assert_eq!(
            summarize_check_runs([Some("neutral")]),
            CheckRunsSummary::Neutral
        );
    }

    #[test]
    fn no_checks_is_success() {
        assert_eq!(
            summarize_check_runs(Vec::<Option<&str>>::new()),
            CheckRunsSummary::Success
        );
    }

    #[test]
    fn collects_sorted_by_name() {
        let runs = collect_check_runs([
            run("Jenkins", Some("success")),
            run("CodeQL", None),
            run("Jenkins", Some("failure")),
        ]);

        let names: Vec<_> = runs.keys().map(String::as_str).collect();
        assert_eq!(names, ["CodeQL", "Jenkins"]);
        assert_eq!(runs["Jenkins"].as_deref(), Some("failure"));
        assert_eq!(runs["CodeQL"], None);
    }
}
