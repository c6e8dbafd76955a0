//! 0-100 security score and letter grades.

use serde::Serialize;

use crate::risk::Risk;

/// Letter grade with the display color used by report front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub letter: char,
    pub color: &'static str,
}

/// Compute the score for a set of findings: start at 100 and charge each
/// finding its risk penalty, clamping at zero.
pub fn score(risks: &[Risk]) -> u32 {
    let mut remaining: u32 = 100;
    for risk in risks {
        remaining = remaining.saturating_sub(risk.penalty());
    }
    remaining
}

/// Map a score to its grade band.
pub fn grade(score: u32) -> Grade {
    match score {
        80..=u32::MAX => Grade { letter: 'A', color: "green" },
        60..=79 => Grade { letter: 'B', color: "blue" },
        40..=59 => Grade { letter: 'C', color: "yellow" },
        20..=39 => Grade { letter: 'D', color: "orange" },
        1..=19 => Grade { letter: 'E', color: "red" },
        0 => Grade { letter: 'F', color: "red" },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risks(high: usize, medium: usize, low: usize, info: usize) -> Vec<Risk> {
        let mut v = Vec::new();
        v.extend(std::iter::repeat(Risk::High).take(high));
        v.extend(std::iter::repeat(Risk::Medium).take(medium));
        v.extend(std::iter::repeat(Risk::Low).take(low));
        v.extend(std::iter::repeat(Risk::Informational).take(info));
        v
    }

    #[test]
    fn clean_report_scores_perfect() {
        assert_eq!(score(&[]), 100);
        assert_eq!(grade(100).letter, 'A');
    }

    #[test]
    fn informational_findings_are_free() {
        assert_eq!(score(&risks(0, 0, 0, 12)), 100);
    }

    #[test]
    fn high_findings_cost_twenty_each() {
        assert_eq!(score(&risks(1, 0, 0, 0)), 80);
        assert_eq!(score(&risks(2, 0, 0, 0)), 60);
        assert_eq!(score(&risks(3, 0, 0, 0)), 40);
        assert_eq!(score(&risks(4, 0, 0, 0)), 20);
        assert_eq!(score(&risks(5, 0, 0, 0)), 0);
    }

    #[test]
    fn mixed_findings_accumulate() {
        // 100 - 20 - 2*3 - 4*1 = 70
        assert_eq!(score(&risks(1, 2, 4, 3)), 70);
        // 100 - 4*20 - 2*3 = 14
        assert_eq!(score(&risks(4, 2, 0, 0)), 14);
    }

    #[test]
    fn score_never_goes_negative() {
        assert_eq!(score(&risks(10, 20, 30, 0)), 0);
    }

    #[test]
    fn grade_bands() {
        assert_eq!(grade(80), Grade { letter: 'A', color: "green" });
        assert_eq!(grade(60), Grade { letter: 'B', color: "blue" });
        assert_eq!(grade(79), Grade { letter: 'B', color: "blue" });
        assert_eq!(grade(40), Grade { letter: 'C', color: "yellow" });
        assert_eq!(grade(20), Grade { letter: 'D', color: "orange" });
        assert_eq!(grade(1), Grade { letter: 'E', color: "red" });
        assert_eq!(grade(0), Grade { letter: 'F', color: "red" });
    }
}
