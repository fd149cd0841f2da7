//! Hardcoded question sets.

use crate::types::{TriviaQuestion, TriviaResponse};

/// Served when a plain generation attempt cannot be validated.
pub fn fallback_trivia() -> TriviaResponse {
    TriviaResponse {
        data: vec![
            TriviaQuestion::new(
                "Which team won the inaugural IPL season in 2008?",
                [
                    "Rajasthan Royals",
                    "Chennai Super Kings",
                    "Mumbai Indians",
                    "Deccan Chargers",
                ],
                "Rajasthan Royals",
            ),
            TriviaQuestion::new(
                "How many players does a cricket team field at one time?",
                ["9", "10", "11", "12"],
                "11",
            ),
            TriviaQuestion::new(
                "Which country won the first Cricket World Cup in 1975?",
                ["West Indies", "Australia", "England", "India"],
                "West Indies",
            ),
            TriviaQuestion::new(
                "Who captained India to victory in the 2011 Cricket World Cup?",
                ["MS Dhoni", "Sourav Ganguly", "Virat Kohli", "Rahul Dravid"],
                "MS Dhoni",
            ),
            TriviaQuestion::new(
                "How many legal balls are bowled in a standard over in cricket?",
                ["4", "5", "6", "8"],
                "6",
            ),
        ],
    }
}

/// Canned sample for smoke tests of the HTTP surface; no model involved.
pub fn sample_trivia() -> TriviaResponse {
    TriviaResponse {
        data: vec![
            TriviaQuestion::new(
                "Which captain won the T20 World Cup, the Cricket World Cup and the Champions Trophy?",
                ["MS Dhoni", "Virat Kohli", "Rohit Sharma", "AB de Villiers"],
                "MS Dhoni",
            ),
            TriviaQuestion::new(
                "How many IPL titles had Mumbai Indians won by the end of the 2023 season?",
                ["3", "4", "5", "6"],
                "5",
            ),
            TriviaQuestion::new(
                "Which franchise won the 2023 IPL final?",
                [
                    "Chennai Super Kings",
                    "Gujarat Titans",
                    "Mumbai Indians",
                    "Rajasthan Royals",
                ],
                "Chennai Super Kings",
            ),
            TriviaQuestion::new(
                "Which stadium hosted the 2023 IPL final?",
                [
                    "Narendra Modi Stadium",
                    "Wankhede Stadium",
                    "Eden Gardens",
                    "M. A. Chidambaram Stadium",
                ],
                "Narendra Modi Stadium",
            ),
            TriviaQuestion::new(
                "Who scored the most runs in the 2016 IPL season?",
                ["Virat Kohli", "David Warner", "AB de Villiers", "Gautam Gambhir"],
                "Virat Kohli",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_sets_are_valid_and_distinct() {
        let fallback = fallback_trivia();
        let sample = sample_trivia();
        assert!(fallback.ensure_valid().is_ok());
        assert!(sample.ensure_valid().is_ok());
        assert_ne!(fallback, sample);
    }
}
