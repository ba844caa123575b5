//! Agents: the decision-makers behind each seat.
//!
//! - [`Agent`]: the query points the turn loop calls
//! - [`RandomAgent`]: seeded coin flips, for fuzzing and baselines
//! - [`GreedyAgent`]: spends down to a cash reserve
//!
//! Both delegate bankruptcy to [`crate::bankruptcy::BankruptcyResolver`].

mod greedy;
mod random;
mod traits;

pub use greedy::GreedyAgent;
pub use random::RandomAgent;
pub use traits::Agent;
