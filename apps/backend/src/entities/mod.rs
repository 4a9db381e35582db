pub mod match_participants;
pub mod matches;
pub mod parties;
pub mod users;
