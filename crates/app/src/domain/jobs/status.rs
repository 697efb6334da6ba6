//! Cosmetic job status lines.

use rand::seq::SliceRandom;

pub const CREATED_STATUS: &str = "Job created successfully";

pub const STATUSES: [&str; 7] = [
    "Unwilling to accept basement-level pay",
    "You applied? You're kidding.",
    "Please!",
    "AI Hallucinations Resume",
    "You're number 1501 in the applicant pool",
    "You're now number 1499 in the applicant pool",
    "Am I hired? It is decidedly so!",
];

/// Pick one of [`STATUSES`] uniformly at random.
#[must_use]
pub fn random_status() -> &'static str {
    STATUSES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(CREATED_STATUS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_status_comes_from_the_fixed_list() {
        for _ in 0..32 {
            assert!(STATUSES.contains(&random_status()), "unexpected status");
        }
    }
}
