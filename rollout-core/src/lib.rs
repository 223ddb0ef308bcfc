//! Rollout core library.
//!
//! Models a coaching graph of users and deploys feature versions to whole
//! connected components of it, so that a coach and their students always
//! see the same version of the site.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod feature;
mod graph;
mod infection;
mod shared;

#[cfg(test)]
mod test_utils;

pub use crate::{
    error::{Result, RolloutError, RolloutErrorCode},
    feature::Feature,
    graph::{User, UserGraph, UserIndex, UserSpec},
    infection::{
        Component, components, connected_component, limited_infection, plan_limited_infection,
        total_infection,
    },
    shared::SharedUserGraph,
};
