pub mod approval;
pub mod casework;
pub mod compliance;
pub mod distribution;
