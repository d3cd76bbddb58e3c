pub mod leaderboard_tests;
pub mod submission_tests;
