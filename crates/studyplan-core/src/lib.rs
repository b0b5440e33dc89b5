//! studyplan-core: mastery projection, resource ranking, study planning and
//! peer similarity.
//!
//! Every scoring function here is pure: it reads only its arguments and
//! returns a fresh value, so callers can share a [`model::Dataset`] across
//! threads without coordination.

pub mod dataset;
pub mod error;
pub mod model;
pub mod planner;
pub mod predictor;
pub mod queries;
pub mod ranker;
pub mod recommend;
pub mod search;
pub mod similarity;
