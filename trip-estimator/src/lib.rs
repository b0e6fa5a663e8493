//! Trip route-cost estimation server.
//!
//! A web application that answers: "what will it cost to drive this
//! lorry from here to there?" Routes and toll plazas come from Mappls.

pub mod cache;
pub mod config;
pub mod domain;
pub mod estimate;
pub mod mappls;
pub mod web;
